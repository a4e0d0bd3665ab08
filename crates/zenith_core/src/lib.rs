//! Core domain logic for Zenith goal tracking.
//! This crate is the single source of truth for goal invariants and the
//! share snapshot format.

pub mod db;
pub mod logging;
pub mod model;
pub mod plan;
pub mod repo;
pub mod service;
pub mod share;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{Goal, GoalCategory, GoalId, GoalStatus, GoalValidationError};
pub use model::progress::{summarize_progress, ProgressEntry};
pub use plan::draft::{normalize_kr_labels, parse_plan_draft, PlanDraft, PlanDraftError};
pub use repo::goal_repo::{GoalRepository, RepoError, RepoResult, SqliteGoalRepository};
pub use service::goal_service::{
    GoalService, GoalServiceError, GoalServiceResult, ImportMode, ShareLink,
};
pub use share::alphabet::{is_token_char, AlphabetError, TOKEN_ALPHABET};
pub use share::codec::{
    decode, decode_optional, encode, DecodeError, EncodeError, StructureError, SNAPSHOT_VERSION,
};
pub use share::link::{
    assess_link_size, build_share_url, decode_share_url, extract_token, LinkSize,
    LONG_LINK_CHARS, QR_CAPACITY_CHARS, SHARE_FRAGMENT_KEY,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
