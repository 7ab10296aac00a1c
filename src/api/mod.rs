pub mod client;
pub mod endpoints;
pub mod models;

pub use client::{GlobalMatchup, GlobalSummary, StatsApiClient};
pub use endpoints::Endpoint;
