//! Pre-match caster insights for esports matchups.
//!
//! The `analysis` module is a set of pure functions over historical map
//! records. `api` talks to an optional cross-tournament stats service, and
//! `tournament` loads map records from disk.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod tournament;

pub use analysis::common_opponents::common_opponents;
pub use analysis::head_to_head::head_to_head;
pub use analysis::insights::insights;
pub use analysis::map_stats::map_stats;
pub use analysis::player_stats::{player_spotlight, player_stats};
pub use analysis::recent_form::recent_form;
pub use analysis::report::{MatchupReport, ReportOptions};
pub use analysis::{normalize, PlayerMapRecord, RawMapRecord};
pub use error::AppError;
