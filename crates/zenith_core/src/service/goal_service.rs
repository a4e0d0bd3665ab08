//! Goal use-case service.
//!
//! # Responsibility
//! - Share the stored goal list as a token or link.
//! - Import shared snapshots and AI plan drafts into the store.
//! - Record progress updates.
//!
//! # Invariants
//! - Imports decode fully before touching the store; a decode failure leaves
//!   the stored list unchanged.
//! - Imported goals never overwrite local goals by id: colliding ids are
//!   re-minted.
//! - Service layer remains storage-agnostic.

use crate::model::goal::{Goal, GoalId};
use crate::plan::draft::{normalize_kr_labels, PlanDraft};
use crate::repo::goal_repo::{GoalRepository, RepoError};
use crate::share::codec::{decode, encode, DecodeError, EncodeError};
use crate::share::link::{assess_link_size, build_share_url, decode_share_url, LinkSize};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// How an imported snapshot combines with the local list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Discard local goals and adopt the snapshot.
    Replace,
    /// Keep local goals and add the snapshot after them.
    Append,
}

/// Share link plus its transport-size advice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub url: String,
    pub size: LinkSize,
}

/// Service error for goal use-cases.
#[derive(Debug)]
pub enum GoalServiceError {
    Repo(RepoError),
    Encode(EncodeError),
    Decode(DecodeError),
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<RepoError> for GoalServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<EncodeError> for GoalServiceError {
    fn from(value: EncodeError) -> Self {
        Self::Encode(value)
    }
}

impl From<DecodeError> for GoalServiceError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

pub type GoalServiceResult<T> = Result<T, GoalServiceError>;

/// Use-case service over a goal repository.
pub struct GoalService<R: GoalRepository> {
    repo: R,
}

impl<R: GoalRepository> GoalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_goals(&self) -> GoalServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals()?)
    }

    /// Creates or updates one goal.
    pub fn save_goal(&self, goal: &Goal) -> GoalServiceResult<()> {
        Ok(self.repo.upsert_goal(goal)?)
    }

    pub fn delete_goal(&self, id: &str) -> GoalServiceResult<()> {
        Ok(self.repo.delete_goal(id)?)
    }

    /// Sets the recorded progress of one goal.
    pub fn record_progress(&self, id: &str, actual: f64) -> GoalServiceResult<()> {
        Ok(self.repo.update_actual(id, actual)?)
    }

    /// Encodes the stored list into a share token.
    pub fn share_token(&self) -> GoalServiceResult<String> {
        let goals = self.repo.list_goals()?;
        Ok(encode(&goals)?)
    }

    /// Builds a share link for the stored list under `base_url`.
    pub fn share_url(&self, base_url: &str) -> GoalServiceResult<ShareLink> {
        let token = self.share_token()?;
        let url = build_share_url(base_url, &token);
        let size = assess_link_size(&url);
        Ok(ShareLink { url, size })
    }

    /// Imports a bare share token.
    ///
    /// Returns the goals as stored (ids may differ when they collided).
    pub fn import_token(&mut self, token: &str, mode: ImportMode) -> GoalServiceResult<Vec<Goal>> {
        let goals = decode(token)?;
        self.import_goals(goals, mode)
    }

    /// Imports the snapshot carried by a `#data=` share link.
    pub fn import_share_url(
        &mut self,
        url: &str,
        mode: ImportMode,
    ) -> GoalServiceResult<Vec<Goal>> {
        let goals = decode_share_url(url)?;
        self.import_goals(goals, mode)
    }

    /// Appends goals created from accepted plan drafts.
    ///
    /// Key-result labels are normalized before the goals are created.
    pub fn apply_plan_drafts(&mut self, mut drafts: Vec<PlanDraft>) -> GoalServiceResult<Vec<Goal>> {
        normalize_kr_labels(&mut drafts);
        let goals: Vec<Goal> = drafts.into_iter().map(PlanDraft::into_goal).collect();
        self.repo.append_goals(&goals)?;
        info!(
            "event=plan_apply module=service status=ok goals={}",
            goals.len()
        );
        Ok(goals)
    }

    fn import_goals(&mut self, goals: Vec<Goal>, mode: ImportMode) -> GoalServiceResult<Vec<Goal>> {
        let taken: HashSet<GoalId> = match mode {
            ImportMode::Replace => HashSet::new(),
            ImportMode::Append => self
                .repo
                .list_goals()?
                .into_iter()
                .map(|goal| goal.id)
                .collect(),
        };
        let (goals, reminted) = assign_unique_ids(goals, taken);

        match mode {
            ImportMode::Replace => self.repo.replace_all(&goals)?,
            ImportMode::Append => self.repo.append_goals(&goals)?,
        }
        info!(
            "event=snapshot_import module=service status=ok mode={:?} goals={} reminted_ids={}",
            mode,
            goals.len(),
            reminted
        );
        Ok(goals)
    }
}

/// Re-mints ids already present in `taken` or earlier in `goals`.
///
/// Returns the goals and how many ids were replaced.
fn assign_unique_ids(mut goals: Vec<Goal>, mut taken: HashSet<GoalId>) -> (Vec<Goal>, usize) {
    let mut reminted = 0;
    for goal in &mut goals {
        if !taken.insert(goal.id.clone()) {
            goal.id = Uuid::new_v4().to_string();
            taken.insert(goal.id.clone());
            reminted += 1;
        }
    }
    (goals, reminted)
}
