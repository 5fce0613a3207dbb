//! Click analytics: client classification, best-effort country
//! enrichment, and roll-up of raw click events into summary views.

pub mod aggregator;
pub mod classifier;
pub mod geo;
pub mod ip_extractor;

pub use aggregator::{aggregate_global, aggregate_link, GlobalAnalytics, LinkAnalytics};
pub use geo::CountryLookup;
pub use ip_extractor::client_ip;
