//! Query-side types: paging, filters, and aggregate counts

mod filters;
mod page;
mod stats;

pub use filters::{DonationFilter, EventFilter, ParticipationFilter, UserFilter};
pub use page::{Page, PageMeta, PageRequest};
pub use stats::{
    DonationStats, DonationSummary, EventStats, EventStatusCounts, ParticipationStatusCounts,
    RoleCounts, UserStats,
};
