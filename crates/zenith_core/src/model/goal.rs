//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical key-result record tracked across one planning year.
//! - Own record-level invariants shared by persistence, sharing and plan import.
//!
//! # Invariants
//! - `id` is non-empty; uniqueness is enforced by callers, not by this type.
//! - `target` is finite and non-negative; `actual` is finite.
//! - `category` is always one of the closed `GoalCategory` variants.
//! - `due_date`, when set, is a `YYYY-MM-DD` calendar date.
//!
//! # See also
//! - docs/architecture/share-snapshot.md

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier of one goal.
///
/// Kept as a string so identifiers minted by other clients survive import
/// unchanged; locally created goals use UUID v4 text.
pub type GoalId = String;

/// Closed set of life areas a goal can belong to.
///
/// Wire names are the variant names verbatim (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    Health,
    Career,
    Finance,
    Learning,
    Relationships,
    Lifestyle,
}

impl GoalCategory {
    /// Every category in display order.
    pub const ALL: [GoalCategory; 6] = [
        GoalCategory::Health,
        GoalCategory::Career,
        GoalCategory::Finance,
        GoalCategory::Learning,
        GoalCategory::Relationships,
        GoalCategory::Lifestyle,
    ];

    /// Returns the stable wire/storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "Health",
            Self::Career => "Career",
            Self::Finance => "Finance",
            Self::Learning => "Learning",
            Self::Relationships => "Relationships",
            Self::Lifestyle => "Lifestyle",
        }
    }
}

impl Display for GoalCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalCategory {
    type Err = GoalValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| GoalValidationError::UnknownCategory(value.to_string()))
    }
}

/// Completion state derived from `actual` versus `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    InProgress,
    Done,
}

/// One trackable key result.
///
/// Field order is part of the share snapshot format: serialization emits
/// fields in declaration order, which keeps tokens deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub category: GoalCategory,
    /// Key-result label such as `KR1`.
    pub kr_number: String,
    pub target: f64,
    /// Progress recorded so far, in `unit`.
    pub actual: f64,
    pub unit: String,
    pub description: String,
    /// Optional `YYYY-MM-DD` deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Goal {
    /// Creates a goal with a generated UUID, zero progress and no due date.
    pub fn new(
        title: impl Into<String>,
        category: GoalCategory,
        kr_number: impl Into<String>,
        target: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            category,
            kr_number: kr_number.into(),
            target,
            actual: 0.0,
            unit: unit.into(),
            description: String::new(),
            due_date: None,
        }
    }

    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `InvalidTarget` when `target` is negative, NaN or infinite.
    /// - `NonFiniteActual` when `actual` is NaN or infinite.
    /// - `InvalidDueDate` when `due_date` is not `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.id.trim().is_empty() {
            return Err(GoalValidationError::EmptyId);
        }
        if !self.target.is_finite() || self.target < 0.0 {
            return Err(GoalValidationError::InvalidTarget(self.target));
        }
        if !self.actual.is_finite() {
            return Err(GoalValidationError::NonFiniteActual(self.actual));
        }
        if let Some(due_date) = self.due_date.as_deref() {
            validate_due_date(due_date)?;
        }
        Ok(())
    }

    /// Returns `actual / target`, or `None` when the target is zero.
    pub fn progress_ratio(&self) -> Option<f64> {
        if self.target == 0.0 {
            return None;
        }
        Some(self.actual / self.target)
    }

    /// A goal is done once `actual` reaches `target`.
    pub fn status(&self) -> GoalStatus {
        if self.actual >= self.target {
            GoalStatus::Done
        } else {
            GoalStatus::InProgress
        }
    }
}

/// Checks that a due date is an existing calendar day written as `YYYY-MM-DD`.
///
/// The stored text is never rewritten, so only the zero-padded form passes.
pub fn validate_due_date(value: &str) -> Result<(), GoalValidationError> {
    let padded = value.len() == 10
        && value.bytes().enumerate().all(|(index, byte)| match index {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if padded && NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).is_ok() {
        Ok(())
    } else {
        Err(GoalValidationError::InvalidDueDate(value.to_string()))
    }
}

/// Record-level validation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum GoalValidationError {
    EmptyId,
    MissingField(&'static str),
    /// A field is present with the wrong JSON type.
    InvalidField {
        field: &'static str,
        message: String,
    },
    InvalidTarget(f64),
    NonFiniteActual(f64),
    UnknownCategory(String),
    InvalidDueDate(String),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "goal id must not be empty"),
            Self::MissingField(field) => write!(f, "goal is missing required field `{field}`"),
            Self::InvalidField { field, message } => {
                write!(f, "goal field `{field}` is invalid: {message}")
            }
            Self::InvalidTarget(value) => {
                write!(f, "goal target must be finite and >= 0, got {value}")
            }
            Self::NonFiniteActual(value) => write!(f, "goal actual must be finite, got {value}"),
            Self::UnknownCategory(value) => write!(f, "unknown goal category `{value}`"),
            Self::InvalidDueDate(value) => {
                write!(f, "goal due date `{value}` is not YYYY-MM-DD")
            }
        }
    }
}

impl Error for GoalValidationError {}
