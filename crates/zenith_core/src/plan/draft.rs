//! Plan draft parsing and conversion.
//!
//! # Responsibility
//! - Validate the JSON array a plan generator returns for a vision statement.
//! - Convert accepted drafts into fresh goals.
//!
//! # Invariants
//! - Parsing is all-or-nothing, like snapshot decoding.
//! - Drafts carry no identity or progress; `into_goal` mints both.

use crate::model::goal::{Goal, GoalCategory, GoalValidationError};
use crate::share::record::{as_object, required_category, required_number, required_str};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static KR_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*kr[\s_\-#]*(\d+)\s*$").expect("valid kr label regex"));

/// One key result proposed by the plan generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanDraft {
    pub title: String,
    pub category: GoalCategory,
    pub kr_number: String,
    pub target: f64,
    pub unit: String,
    pub description: String,
}

impl PlanDraft {
    /// Materializes the draft as a new goal with zero progress.
    pub fn into_goal(self) -> Goal {
        Goal {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            category: self.category,
            kr_number: self.kr_number,
            target: self.target,
            actual: 0.0,
            unit: self.unit,
            description: self.description,
            due_date: None,
        }
    }
}

/// Parses generator output into drafts.
///
/// # Errors
/// - `Malformed` when the text is not a JSON array.
/// - `InvalidItem` for the first item missing a field, using an unknown
///   category, or carrying a negative/non-finite target.
pub fn parse_plan_draft(json: &str) -> Result<Vec<PlanDraft>, PlanDraftError> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| PlanDraftError::Malformed(err.to_string()))?;
    let Value::Array(items) = value else {
        return Err(PlanDraftError::Malformed(
            "plan draft must be a JSON array".to_string(),
        ));
    };

    let result = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            draft_from_value(item).map_err(|reason| PlanDraftError::InvalidItem { index, reason })
        })
        .collect::<Result<Vec<_>, _>>();

    match &result {
        Ok(drafts) => info!(
            "event=plan_draft_parse module=plan status=ok drafts={}",
            drafts.len()
        ),
        Err(err) => warn!(
            "event=plan_draft_parse module=plan status=error error={}",
            err
        ),
    }
    result
}

fn draft_from_value(value: &Value) -> Result<PlanDraft, GoalValidationError> {
    let object = as_object(value)?;
    let target = required_number(object, "target")?;
    if !target.is_finite() || target < 0.0 {
        return Err(GoalValidationError::InvalidTarget(target));
    }
    Ok(PlanDraft {
        title: required_str(object, "title")?,
        category: required_category(object)?,
        kr_number: required_str(object, "krNumber")?,
        target,
        unit: required_str(object, "unit")?,
        description: required_str(object, "description")?,
    })
}

/// Rewrites key-result labels into canonical `KR<n>` form.
///
/// Labels like `kr 2`, `Kr-2` or `KR#2` become `KR2`. Blank labels are filled
/// with the draft's 1-based position. Anything else is kept verbatim.
pub fn normalize_kr_labels(drafts: &mut [PlanDraft]) {
    for (index, draft) in drafts.iter_mut().enumerate() {
        if draft.kr_number.trim().is_empty() {
            draft.kr_number = format!("KR{}", index + 1);
            continue;
        }
        if let Some(number) = KR_LABEL_RE
            .captures(&draft.kr_number)
            .and_then(|caps| caps.get(1))
        {
            draft.kr_number = format!("KR{}", number.as_str());
        }
    }
}

/// Plan draft rejection.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanDraftError {
    Malformed(String),
    InvalidItem {
        index: usize,
        reason: GoalValidationError,
    },
}

impl Display for PlanDraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(message) => write!(f, "plan draft is malformed: {message}"),
            Self::InvalidItem { index, reason } => {
                write!(f, "plan draft item #{} is invalid: {reason}", index + 1)
            }
        }
    }
}

impl Error for PlanDraftError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(_) => None,
            Self::InvalidItem { reason, .. } => Some(reason),
        }
    }
}
