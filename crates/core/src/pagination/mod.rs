//! Print pagination for quote documents
//!
//! Greedy one-dimensional packing: rows accumulate onto a page until the
//! next row would overflow the content capacity, then a new page starts.
//! Trailing summary blocks (totals, deposit terms, banking/acceptance)
//! inline on the final row page only if they fit the remaining space with
//! headroom to spare; blocks that do not fit carry onto dedicated pages
//! packed by the same rule.
//!
//! All heights are in centimetres of printed output, matching the print
//! stylesheet the documents are rendered with.

use serde::Serialize;
use sunquote_domain::types::{ProductCategory, QuoteVersion};

/// Kind of a body row in the printable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    CategoryHeader,
    LineItem,
}

/// One body row with its printed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocRow {
    pub kind: RowKind,
    pub height: f64,
}

/// A trailing summary block candidate for the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryBlock {
    Totals,
    DepositTerms,
    Acceptance,
}

/// A summary block with its printed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailingBlock {
    pub block: SummaryBlock,
    pub height: f64,
}

/// Page geometry for the packer.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    /// Vertical space available for body content per page (page height
    /// minus header and footer reserves).
    pub content_height: f64,
    /// Safety margin required below inlined summary blocks.
    pub block_headroom: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        // A4 with the standard document header/footer reserves.
        Self { content_height: 20.0, block_headroom: 0.8 }
    }
}

/// Row heights for the standard quote table.
#[derive(Debug, Clone, Copy)]
pub struct RowHeights {
    pub category_header: f64,
    pub line_item: f64,
}

impl Default for RowHeights {
    fn default() -> Self {
        Self { category_header: 0.9, line_item: 0.7 }
    }
}

/// One output page: a contiguous range of row indices plus any summary
/// blocks placed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub row_start: usize,
    pub row_end: usize,
    pub blocks: Vec<SummaryBlock>,
}

impl Page {
    fn empty_at(index: usize) -> Self {
        Self { row_start: index, row_end: index, blocks: Vec::new() }
    }

    /// Number of body rows on this page.
    pub fn row_count(&self) -> usize {
        self.row_end - self.row_start
    }
}

/// Pack rows and trailing blocks into pages.
///
/// Properties (deterministic for a given input):
/// - no page's accumulated row height exceeds `content_height`, except a
///   single row taller than the capacity, which occupies a page alone;
/// - the page count is the minimum achievable without reordering rows;
/// - trailing blocks inline on the last row page only if their cumulative
///   height plus headroom fits the remaining space, otherwise they carry
///   onto dedicated pages packed greedily.
pub fn paginate(rows: &[DocRow], blocks: &[TrailingBlock], layout: &PageLayout) -> Vec<Page> {
    let capacity = layout.content_height;
    let mut pages: Vec<Page> = Vec::new();
    let mut current = Page::empty_at(0);
    let mut used = 0.0;

    for (index, row) in rows.iter().enumerate() {
        if current.row_count() > 0 && used + row.height > capacity {
            pages.push(current);
            current = Page::empty_at(index);
            used = 0.0;
        }
        current.row_end = index + 1;
        used += row.height;
    }
    pages.push(current);

    // Inline as many trailing blocks as fit beneath the last rows.
    let mut deferred = blocks.iter();
    let mut remaining = capacity - used;
    while let Some(block) = deferred.next() {
        if block.height + layout.block_headroom <= remaining {
            if let Some(last) = pages.last_mut() {
                last.blocks.push(block.block);
            }
            remaining -= block.height;
        } else {
            // Order must be preserved, so the first miss pushes this and
            // every later block onto dedicated pages.
            let mut overflow = Page::empty_at(rows.len());
            overflow.blocks.push(block.block);
            let mut overflow_used = block.height;
            for carried in deferred.by_ref() {
                if overflow_used + carried.height + layout.block_headroom > capacity {
                    pages.push(overflow);
                    overflow = Page::empty_at(rows.len());
                    overflow_used = 0.0;
                }
                overflow.blocks.push(carried.block);
                overflow_used += carried.height;
            }
            pages.push(overflow);
            break;
        }
    }

    pages
}

/// Flatten a quote into printable body rows: one header per category run,
/// one row per line. Lines are grouped in catalog order (core first).
pub fn quote_document_rows(quote: &QuoteVersion, heights: &RowHeights) -> Vec<DocRow> {
    let mut rows = Vec::new();
    let mut previous: Option<ProductCategory> = None;
    for line in &quote.lines {
        if previous != Some(line.category) {
            rows.push(DocRow { kind: RowKind::CategoryHeader, height: heights.category_header });
            previous = Some(line.category);
        }
        rows.push(DocRow { kind: RowKind::LineItem, height: heights.line_item });
    }
    rows
}

/// The standard trailing blocks for a quote document.
pub fn standard_trailing_blocks() -> Vec<TrailingBlock> {
    vec![
        TrailingBlock { block: SummaryBlock::Totals, height: 4.2 },
        TrailingBlock { block: SummaryBlock::DepositTerms, height: 3.4 },
        TrailingBlock { block: SummaryBlock::Acceptance, height: 5.0 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(height: f64) -> DocRow {
        DocRow { kind: RowKind::LineItem, height }
    }

    fn header(height: f64) -> DocRow {
        DocRow { kind: RowKind::CategoryHeader, height }
    }

    fn layout(content_height: f64, headroom: f64) -> PageLayout {
        PageLayout { content_height, block_headroom: headroom }
    }

    #[test]
    fn rows_pack_until_overflow() {
        // Capacity 10, rows of 4: two per page, five rows -> three pages.
        let rows = vec![item(4.0); 5];
        let pages = paginate(&rows, &[], &layout(10.0, 1.0));

        assert_eq!(pages.len(), 3);
        assert_eq!((pages[0].row_start, pages[0].row_end), (0, 2));
        assert_eq!((pages[1].row_start, pages[1].row_end), (2, 4));
        assert_eq!((pages[2].row_start, pages[2].row_end), (4, 5));
    }

    #[test]
    fn page_count_is_minimal_for_greedy_order() {
        // 3 + 3 + 3 fits one page of 10 exactly; the fourth row overflows.
        let rows = vec![item(3.0), item(3.0), item(3.0), item(3.0)];
        let pages = paginate(&rows, &[], &layout(10.0, 1.0));

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].row_count(), 3);
        assert_eq!(pages[1].row_count(), 1);
    }

    #[test]
    fn oversized_row_occupies_its_own_page() {
        let rows = vec![item(2.0), item(25.0), item(2.0)];
        let pages = paginate(&rows, &[], &layout(10.0, 1.0));

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].row_count(), 1);
    }

    #[test]
    fn blocks_inline_when_they_fit_with_headroom() {
        // One row of 2 leaves 8; blocks of 3 + 2 need 3+1 then 2+1 of the
        // remaining space, so both inline.
        let rows = vec![item(2.0)];
        let blocks = vec![
            TrailingBlock { block: SummaryBlock::Totals, height: 3.0 },
            TrailingBlock { block: SummaryBlock::DepositTerms, height: 2.0 },
        ];
        let pages = paginate(&rows, &blocks, &layout(10.0, 1.0));

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks, vec![SummaryBlock::Totals, SummaryBlock::DepositTerms]);
    }

    #[test]
    fn headroom_defers_a_block_that_would_barely_fit() {
        // Remaining space 4; block height 3.5 + headroom 1.0 > 4 -> deferred.
        let rows = vec![item(6.0)];
        let blocks = vec![TrailingBlock { block: SummaryBlock::Totals, height: 3.5 }];
        let pages = paginate(&rows, &blocks, &layout(10.0, 1.0));

        assert_eq!(pages.len(), 2);
        assert!(pages[0].blocks.is_empty());
        assert_eq!(pages[1].blocks, vec![SummaryBlock::Totals]);
        assert_eq!(pages[1].row_count(), 0);
    }

    #[test]
    fn a_miss_carries_all_later_blocks_to_preserve_order() {
        // First block fits, second does not; the third would fit inline but
        // must follow the second onto the overflow page.
        let rows = vec![item(4.0)];
        let blocks = vec![
            TrailingBlock { block: SummaryBlock::Totals, height: 2.0 },
            TrailingBlock { block: SummaryBlock::DepositTerms, height: 5.0 },
            TrailingBlock { block: SummaryBlock::Acceptance, height: 1.0 },
        ];
        let pages = paginate(&rows, &blocks, &layout(10.0, 1.0));

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks, vec![SummaryBlock::Totals]);
        assert_eq!(
            pages[1].blocks,
            vec![SummaryBlock::DepositTerms, SummaryBlock::Acceptance]
        );
    }

    #[test]
    fn overflow_blocks_split_across_dedicated_pages() {
        let rows = vec![item(9.5)];
        let blocks = vec![
            TrailingBlock { block: SummaryBlock::Totals, height: 6.0 },
            TrailingBlock { block: SummaryBlock::DepositTerms, height: 6.0 },
            TrailingBlock { block: SummaryBlock::Acceptance, height: 2.0 },
        ];
        let pages = paginate(&rows, &blocks, &layout(10.0, 1.0));

        // Page 1: the row. Page 2: totals (6 + 6 + 1 > 10 forces a split).
        // Page 3: deposit terms + acceptance (6 + 2 + 1 <= 10).
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1].blocks, vec![SummaryBlock::Totals]);
        assert_eq!(
            pages[2].blocks,
            vec![SummaryBlock::DepositTerms, SummaryBlock::Acceptance]
        );
    }

    #[test]
    fn empty_rows_yield_a_blocks_only_document() {
        let blocks = vec![TrailingBlock { block: SummaryBlock::Totals, height: 3.0 }];
        let pages = paginate(&[], &blocks, &layout(10.0, 1.0));

        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].row_count(), 0);
        assert_eq!(pages[0].blocks, vec![SummaryBlock::Totals]);
    }

    #[test]
    fn headers_and_items_mix_in_document_order() {
        let rows = vec![header(1.0), item(0.7), item(0.7), header(1.0), item(0.7)];
        let pages = paginate(&rows, &[], &layout(2.5, 0.5));

        assert_eq!(pages.len(), 2);
        assert_eq!((pages[0].row_start, pages[0].row_end), (0, 3));
        assert_eq!((pages[1].row_start, pages[1].row_end), (3, 5));
    }
}
