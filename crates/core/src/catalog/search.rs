//! Fuzzy product search
//!
//! In-memory multi-token matching over brand, model, and category. Every
//! query token must match at least one field; hits are ranked by a
//! deterministic score where prefix matches beat substring matches and
//! brand matches beat model and category matches. The catalog is small
//! enough (hundreds of rows) that a linear scan is the right tool.

use sunquote_domain::types::Product;

const BRAND_PREFIX: u32 = 30;
const MODEL_PREFIX: u32 = 25;
const CATEGORY_PREFIX: u32 = 10;
const BRAND_SUBSTRING: u32 = 15;
const MODEL_SUBSTRING: u32 = 12;
const CATEGORY_SUBSTRING: u32 = 5;

/// Search `products` with a free-text query.
///
/// An empty or whitespace-only query returns everything unchanged.
pub fn search_products(products: Vec<Product>, query: &str) -> Vec<Product> {
    let tokens: Vec<String> =
        query.split_whitespace().map(|t| t.to_lowercase()).filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return products;
    }

    let mut scored: Vec<(u32, Product)> = products
        .into_iter()
        .filter_map(|product| score_product(&product, &tokens).map(|score| (score, product)))
        .collect();

    scored.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| a.1.brand.cmp(&b.1.brand))
            .then_with(|| a.1.model.cmp(&b.1.model))
    });

    scored.into_iter().map(|(_, product)| product).collect()
}

/// Score one product against the query tokens; `None` when any token fails
/// to match every field.
fn score_product(product: &Product, tokens: &[String]) -> Option<u32> {
    let brand = product.brand.to_lowercase();
    let model = product.model.to_lowercase();
    let category = product.category.as_str();

    let mut total = 0;
    for token in tokens {
        let best = [
            field_score(&brand, token, BRAND_PREFIX, BRAND_SUBSTRING),
            field_score(&model, token, MODEL_PREFIX, MODEL_SUBSTRING),
            field_score(category, token, CATEGORY_PREFIX, CATEGORY_SUBSTRING),
        ]
        .into_iter()
        .flatten()
        .max()?;
        total += best;
    }
    Some(total)
}

fn field_score(field: &str, token: &str, prefix: u32, substring: u32) -> Option<u32> {
    // A prefix of any word in the field counts as a prefix match.
    if field.split_whitespace().any(|word| word.starts_with(token)) {
        Some(prefix)
    } else if field.contains(token) {
        Some(substring)
    } else {
        None
    }
}
