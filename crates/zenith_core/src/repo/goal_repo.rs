//! Goal repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the user's ordered goal list.
//! - Provide atomic bulk writes used by snapshot import and plan apply.
//!
//! # Invariants
//! - Write paths call `Goal::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - `list_goals` order is `position ASC`; bulk writes preserve input order.
//! - `replace_all` and `append_goals` commit fully or not at all.
//!
//! # See also
//! - docs/architecture/goal-store.md

use crate::db::DbError;
use crate::model::goal::{Goal, GoalCategory, GoalId, GoalValidationError};
use log::info;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const GOAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    category,
    kr_number,
    target,
    actual,
    unit,
    description,
    due_date
FROM goals";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for goal persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(GoalValidationError),
    Db(DbError),
    NotFound(GoalId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "goal not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted goal data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<GoalValidationError> for RepoError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the goal list.
pub trait GoalRepository {
    /// Lists all goals in display order.
    fn list_goals(&self) -> RepoResult<Vec<Goal>>;
    fn get_goal(&self, id: &str) -> RepoResult<Option<Goal>>;
    /// Inserts at the end of the list, or updates in place keeping position.
    fn upsert_goal(&self, goal: &Goal) -> RepoResult<()>;
    fn update_actual(&self, id: &str, actual: f64) -> RepoResult<()>;
    fn delete_goal(&self, id: &str) -> RepoResult<()>;
    /// Replaces the whole list in one transaction.
    fn replace_all(&mut self, goals: &[Goal]) -> RepoResult<()>;
    /// Appends goals after the current last position in one transaction.
    fn append_goals(&mut self, goals: &[Goal]) -> RepoResult<()>;
}

/// SQLite-backed goal repository.
pub struct SqliteGoalRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteGoalRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `InvalidData` when the `goals` table is missing (migrations not run).
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'goals');",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Err(RepoError::InvalidData(
                "goals table is missing; open the store through db::open_db".to_string(),
            ));
        }
        Ok(Self { conn })
    }
}

impl GoalRepository for SqliteGoalRepository<'_> {
    fn list_goals(&self) -> RepoResult<Vec<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} ORDER BY position ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut goals = Vec::new();
        while let Some(row) = rows.next()? {
            goals.push(parse_goal_row(row)?);
        }
        Ok(goals)
    }

    fn get_goal(&self, id: &str) -> RepoResult<Option<Goal>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GOAL_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_goal_row(row)?)),
            None => Ok(None),
        }
    }

    fn upsert_goal(&self, goal: &Goal) -> RepoResult<()> {
        goal.validate()?;
        self.conn.execute(
            "INSERT INTO goals (
                id, position, title, category, kr_number,
                target, actual, unit, description, due_date
            ) VALUES (
                ?1, (SELECT COALESCE(MAX(position), -1) + 1 FROM goals),
                ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            )
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                category = excluded.category,
                kr_number = excluded.kr_number,
                target = excluded.target,
                actual = excluded.actual,
                unit = excluded.unit,
                description = excluded.description,
                due_date = excluded.due_date,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                goal.id.as_str(),
                goal.title.as_str(),
                goal.category.as_str(),
                goal.kr_number.as_str(),
                goal.target,
                goal.actual,
                goal.unit.as_str(),
                goal.description.as_str(),
                goal.due_date.as_deref(),
            ],
        )?;
        Ok(())
    }

    fn update_actual(&self, id: &str, actual: f64) -> RepoResult<()> {
        if !actual.is_finite() {
            return Err(RepoError::Validation(GoalValidationError::NonFiniteActual(
                actual,
            )));
        }
        let changed = self.conn.execute(
            "UPDATE goals
             SET actual = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![actual, id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_goal(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM goals WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn replace_all(&mut self, goals: &[Goal]) -> RepoResult<()> {
        validate_all(goals)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM goals;", [])?;
        insert_from(&tx, goals, 0)?;
        tx.commit()?;
        info!(
            "event=goal_store_write module=repo status=ok op=replace_all goals={}",
            goals.len()
        );
        Ok(())
    }

    fn append_goals(&mut self, goals: &[Goal]) -> RepoResult<()> {
        validate_all(goals)?;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let next_position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM goals;",
            [],
            |row| row.get(0),
        )?;
        insert_from(&tx, goals, next_position)?;
        tx.commit()?;
        info!(
            "event=goal_store_write module=repo status=ok op=append goals={}",
            goals.len()
        );
        Ok(())
    }
}

fn validate_all(goals: &[Goal]) -> RepoResult<()> {
    for goal in goals {
        goal.validate()?;
    }
    Ok(())
}

fn insert_from(tx: &Transaction<'_>, goals: &[Goal], first_position: i64) -> RepoResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO goals (
            id, position, title, category, kr_number,
            target, actual, unit, description, due_date
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
    )?;
    for (offset, goal) in (0_i64..).zip(goals) {
        stmt.execute(params![
            goal.id.as_str(),
            first_position + offset,
            goal.title.as_str(),
            goal.category.as_str(),
            goal.kr_number.as_str(),
            goal.target,
            goal.actual,
            goal.unit.as_str(),
            goal.description.as_str(),
            goal.due_date.as_deref(),
        ])?;
    }
    Ok(())
}

fn parse_goal_row(row: &Row<'_>) -> RepoResult<Goal> {
    let category_text: String = row.get("category")?;
    let category = category_text.parse::<GoalCategory>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in goals.category"
        ))
    })?;

    let goal = Goal {
        id: row.get("id")?,
        title: row.get("title")?,
        category,
        kr_number: row.get("kr_number")?,
        target: row.get("target")?,
        actual: row.get("actual")?,
        unit: row.get("unit")?,
        description: row.get("description")?,
        due_date: row.get("due_date")?,
    };
    goal.validate()?;
    Ok(goal)
}
