//! Analytics - read-only projections over a subscription snapshot
//!
//! Every function here is pure: it takes the subscriptions plus a reference
//! date and returns plain serializable values. Nothing reads the clock.
//!
//! - **Trend** - projected spend per calendar month
//! - **Category** - monthly-equivalent spend share per category
//! - **Buckets** - next renewals grouped by how soon they fall
//! - **Upcoming** - renewals inside a day window, soonest first
//! - **Summary** - the top-line numbers combined
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pulseboard_core::analytics::{project_spend, SpendTrendOptions};
//!
//! let trend = project_spend(&snapshot.subscriptions, &SpendTrendOptions::new(today));
//! ```

pub mod buckets;
pub mod category;
pub mod summary;
pub mod trend;
pub mod upcoming;

pub use buckets::{
    bucket_renewals, RenewalBucketLabel, RenewalBucketOptions, RenewalBucketPoint,
    DEFAULT_BUCKET_DAYS_AHEAD,
};
pub use category::{aggregate_by_category, CategorySpendPoint};
pub use summary::{build_summary, build_summary_with_limit, AnalyticsSummary};
pub use trend::{
    project_spend, write_trend_csv, SpendTrendOptions, SpendTrendPoint, DEFAULT_STEP_LIMIT,
    DEFAULT_TREND_MONTHS,
};
pub use upcoming::{upcoming_renewals, DEFAULT_UPCOMING_WINDOW_DAYS};
