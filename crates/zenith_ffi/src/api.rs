//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose sharing, import and plan-apply use-cases to Dart via FRB.
//! - Flatten typed core errors into stable `error_kind` strings for UI copy.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Goal lists cross the boundary as JSON text in the snapshot field naming.

use log::warn;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use zenith_core::db::open_db;
use zenith_core::{
    core_version as core_version_inner, decode, decode_share_url, encode,
    init_logging as init_logging_inner, parse_plan_draft, ping as ping_inner, Goal, GoalService,
    GoalServiceError, ImportMode, LinkSize, RepoError, SqliteGoalRepository,
};

const GOALS_DB_FILE_NAME: &str = "zenith_goals.sqlite3";
static GOALS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Result envelope for `share_encode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEncodeResponse {
    pub ok: bool,
    /// Share token; empty on failure.
    pub token: String,
    pub message: String,
}

/// Result envelope for `share_decode`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareDecodeResponse {
    pub ok: bool,
    /// Decoded goals as a JSON array; `[]` on failure.
    pub goals_json: String,
    /// `empty_or_missing|malformed_alphabet|malformed_structure|invalid_record`,
    /// empty on success.
    pub error_kind: String,
    pub message: String,
}

/// Result envelope for `share_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareUrlResponse {
    pub ok: bool,
    pub url: String,
    /// `comfortable|long|exceeds_qr_capacity`.
    pub size: String,
    pub message: String,
}

/// Result envelope for store-mutating imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub imported: u32,
    /// Same kinds as `ShareDecodeResponse::error_kind`, or `storage`/`plan`.
    pub error_kind: String,
    pub message: String,
}

impl ImportResponse {
    fn success(imported: usize) -> Self {
        Self {
            ok: true,
            imported: u32::try_from(imported).unwrap_or(u32::MAX),
            error_kind: String::new(),
            message: format!("Imported {imported} goal(s)."),
        }
    }

    fn failure(error_kind: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            imported: 0,
            error_kind: error_kind.to_string(),
            message: message.into(),
        }
    }
}

/// Encodes a JSON goal array into a share token.
///
/// # FFI contract
/// - Sync call, pure.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn share_encode(goals_json: String) -> ShareEncodeResponse {
    let goals: Vec<Goal> = match serde_json::from_str(&goals_json) {
        Ok(goals) => goals,
        Err(err) => {
            return ShareEncodeResponse {
                ok: false,
                token: String::new(),
                message: format!("share_encode failed: goals JSON is invalid: {err}"),
            };
        }
    };

    match encode(&goals) {
        Ok(token) => ShareEncodeResponse {
            ok: true,
            token,
            message: String::new(),
        },
        Err(err) => ShareEncodeResponse {
            ok: false,
            token: String::new(),
            message: format!("share_encode failed: {err}"),
        },
    }
}

/// Decodes a share URL or bare token without touching the store.
///
/// Input containing `#` is treated as a full URL; anything else as a token.
///
/// # FFI contract
/// - Sync call, pure.
/// - Never panics; every failure carries a distinct `error_kind`.
#[flutter_rust_bridge::frb(sync)]
pub fn share_decode(input: String) -> ShareDecodeResponse {
    let result = if input.contains('#') {
        decode_share_url(&input)
    } else {
        decode(&input)
    };

    match result {
        Ok(goals) => ShareDecodeResponse {
            ok: true,
            goals_json: serde_json::to_string(&goals).unwrap_or_else(|_| "[]".to_string()),
            error_kind: String::new(),
            message: format!("Decoded {} goal(s).", goals.len()),
        },
        Err(err) => ShareDecodeResponse {
            ok: false,
            goals_json: "[]".to_string(),
            error_kind: err.kind().to_string(),
            message: err.to_string(),
        },
    }
}

/// Builds a share link for the stored goal list.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn share_url(base_url: String) -> ShareUrlResponse {
    share_url_at(&resolve_goals_db_path(), &base_url)
}

pub(crate) fn share_url_at(db_path: &Path, base_url: &str) -> ShareUrlResponse {
    match with_goal_service(db_path, |service| service.share_url(base_url.trim())) {
        Ok(link) => ShareUrlResponse {
            ok: true,
            url: link.url,
            size: link_size_label(link.size).to_string(),
            message: String::new(),
        },
        Err(err) => ShareUrlResponse {
            ok: false,
            url: String::new(),
            size: String::new(),
            message: format!("share_url failed: {err}"),
        },
    }
}

/// Imports the snapshot in `url` into the stored goal list.
///
/// `replace=true` swaps the whole list; otherwise goals are appended.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - All-or-nothing: on any error the stored list is unchanged.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn share_import(url: String, replace: bool) -> ImportResponse {
    share_import_at(&resolve_goals_db_path(), &url, replace)
}

pub(crate) fn share_import_at(db_path: &Path, url: &str, replace: bool) -> ImportResponse {
    let mode = if replace {
        ImportMode::Replace
    } else {
        ImportMode::Append
    };
    match with_goal_service(db_path, |service| service.import_share_url(url, mode)) {
        Ok(goals) => ImportResponse::success(goals.len()),
        Err(GoalServiceError::Decode(err)) => {
            warn!(
                "event=ffi_share_import module=ffi status=error error_kind={}",
                err.kind()
            );
            ImportResponse::failure(err.kind(), err.to_string())
        }
        Err(err) => ImportResponse::failure("storage", err.to_string()),
    }
}

/// Validates plan generator output and appends the drafts as goals.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Rejects the whole draft when any item is invalid.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn plan_apply(draft_json: String) -> ImportResponse {
    plan_apply_at(&resolve_goals_db_path(), &draft_json)
}

pub(crate) fn plan_apply_at(db_path: &Path, draft_json: &str) -> ImportResponse {
    let drafts = match parse_plan_draft(draft_json) {
        Ok(drafts) => drafts,
        Err(err) => return ImportResponse::failure("plan", err.to_string()),
    };
    let result = with_goal_service(db_path, |service| service.apply_plan_drafts(drafts));
    match result {
        Ok(goals) => ImportResponse::success(goals.len()),
        Err(err) => ImportResponse::failure("storage", err.to_string()),
    }
}

fn link_size_label(size: LinkSize) -> &'static str {
    match size {
        LinkSize::Comfortable => "comfortable",
        LinkSize::Long => "long",
        LinkSize::ExceedsQrCapacity => "exceeds_qr_capacity",
    }
}

/// Store path for exported calls, read once per process.
///
/// Later changes to `ZENITH_DB_PATH` are ignored; tests use the `*_at` helpers.
fn resolve_goals_db_path() -> PathBuf {
    GOALS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ZENITH_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(GOALS_DB_FILE_NAME)
        })
        .clone()
}

fn with_goal_service<T>(
    db_path: &Path,
    f: impl FnOnce(&mut GoalService<SqliteGoalRepository<'_>>) -> Result<T, GoalServiceError>,
) -> Result<T, GoalServiceError> {
    let mut conn = open_db(db_path).map_err(RepoError::from)?;
    let repo = SqliteGoalRepository::try_new(&mut conn)?;
    let mut service = GoalService::new(repo);
    f(&mut service)
}
