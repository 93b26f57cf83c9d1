//! Quote document types
//!
//! A quote version is an immutable snapshot of a BOM and its computed
//! totals. Once created, later catalog price changes never alter it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::ProductCategory;

/// Quote lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Declined,
}

impl QuoteStatus {
    /// Whether moving to `next` is a legal lifecycle transition.
    ///
    /// Legal transitions: Draft→Sent, Sent→Accepted, Sent→Declined.
    pub fn can_transition_to(self, next: QuoteStatus) -> bool {
        matches!(
            (self, next),
            (Self::Draft, Self::Sent)
                | (Self::Sent, Self::Accepted)
                | (Self::Sent, Self::Declined)
        )
    }

    /// Stable lowercase identifier used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Parse the storage identifier back into a status.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "sent" => Some(Self::Sent),
            "accepted" => Some(Self::Accepted),
            "declined" => Some(Self::Declined),
            _ => None,
        }
    }
}

/// A fully priced line frozen into a quote version.
///
/// Everything needed to reprint the document is denormalized here; the
/// catalog is never consulted for a stored quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub product_id: Uuid,
    pub category: ProductCategory,
    pub description: String,
    pub quantity: u32,
    pub unit_cost: f64,
    /// Effective margin at snapshot time, 0–1 fraction.
    pub margin: f64,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Immutable snapshot of a BOM at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteVersion {
    pub id: Uuid,
    pub project_id: Uuid,
    /// 1-based version number, unique per project.
    pub version: u32,
    pub status: QuoteStatus,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub lines: Vec<QuoteLine>,
    pub subtotal: f64,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_permits_only_forward_transitions() {
        use QuoteStatus::*;

        assert!(Draft.can_transition_to(Sent));
        assert!(Sent.can_transition_to(Accepted));
        assert!(Sent.can_transition_to(Declined));

        assert!(!Draft.can_transition_to(Accepted));
        assert!(!Draft.can_transition_to(Declined));
        assert!(!Sent.can_transition_to(Draft));
        assert!(!Accepted.can_transition_to(Declined));
        assert!(!Declined.can_transition_to(Sent));
        assert!(!Accepted.can_transition_to(Accepted));
    }

    #[test]
    fn status_round_trips_through_storage_identifier() {
        for status in
            [QuoteStatus::Draft, QuoteStatus::Sent, QuoteStatus::Accepted, QuoteStatus::Declined]
        {
            assert_eq!(QuoteStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuoteStatus::parse("archived"), None);
    }
}
