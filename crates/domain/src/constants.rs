//! Domain constants

/// Margin applied when neither the BOM line nor the catalog carries one.
pub const DEFAULT_CATALOG_MARGIN: f64 = 0.25;

/// Smallest quantity a BOM line may carry.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Interval length of stock load profiles, in minutes.
pub const LOAD_PROFILE_INTERVAL_MINUTES: u32 = 30;
