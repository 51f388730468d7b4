//! Recommendation store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the keyed, insertion-ordered storage API the engine builds on.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Vote application (read, threshold check, delete) runs in one immediate
//!   transaction, so no reader ever observes a score below the floor.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::recommendation::{
    vote_outcome, Recommendation, RecommendationId, VoteDirection, VoteOutcome, SCORE_FLOOR,
};
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECOMMENDATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    link,
    score,
    created_at
FROM recommendations";

pub type RepoResult<T> = Result<T, RepoError>;

/// Engine-level error taxonomy for store and selection operations.
#[derive(Debug)]
pub enum RepoError {
    /// No live recommendation has the referenced id.
    NotFound(RecommendationId),
    /// A live recommendation already uses this name.
    Conflict(String),
    /// Random pick requested while the store holds zero live records.
    Empty,
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "recommendation not found: {id}"),
            Self::Conflict(name) => write!(f, "recommendation name already in use: {name}"),
            Self::Empty => write!(f, "no recommendations available"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted recommendation data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` on table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Store interface consumed by the engine service.
///
/// Mirrors the Recommendation Store collaborator contract: point lookup,
/// insertion with store-assigned ids, ordered scans, and atomic vote
/// application including threshold deletion.
pub trait RecommendationRepository {
    /// Inserts a recommendation with score 0 and returns the stored record.
    fn insert(&mut self, name: &str, link: &str) -> RepoResult<Recommendation>;
    /// Gets one live recommendation by id.
    fn get(&self, id: RecommendationId) -> RepoResult<Option<Recommendation>>;
    /// Applies one vote atomically, deleting the record when the post-vote
    /// score falls below the floor.
    fn apply_vote(
        &mut self,
        id: RecommendationId,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome>;
    /// Returns up to `limit` records, newest creation first.
    fn recent(&self, limit: u32) -> RepoResult<Vec<Recommendation>>;
    /// Returns up to `amount` records by score descending, id ascending.
    fn top_by_score(&self, amount: u32) -> RepoResult<Vec<Recommendation>>;
    /// Returns a consistent snapshot of every live record, oldest first.
    fn snapshot_all(&self) -> RepoResult<Vec<Recommendation>>;
}

/// SQLite-backed recommendation store.
pub struct SqliteRecommendationRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteRecommendationRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version does not match
    ///   this binary's migrations.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the expected
    ///   storage shape is absent.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RecommendationRepository for SqliteRecommendationRepository<'_> {
    fn insert(&mut self, name: &str, link: &str) -> RepoResult<Recommendation> {
        self.conn
            .execute(
                "INSERT INTO recommendations (name, link) VALUES (?1, ?2);",
                params![name, link],
            )
            .map_err(|err| map_insert_error(err, name))?;

        let id = self.conn.last_insert_rowid();
        info!("event=recommendation_created module=repo status=ok id={id}");

        match self.get(id)? {
            Some(record) => Ok(record),
            None => Err(RepoError::InvalidData(format!(
                "inserted recommendation {id} missing on readback"
            ))),
        }
    }

    fn get(&self, id: RecommendationId) -> RepoResult<Option<Recommendation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECOMMENDATION_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_recommendation_row(row)?));
        }

        Ok(None)
    }

    fn apply_vote(
        &mut self,
        id: RecommendationId,
        direction: VoteDirection,
    ) -> RepoResult<VoteOutcome> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let score = {
            let mut stmt = tx.prepare("SELECT score FROM recommendations WHERE id = ?1;")?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => row.get::<_, i64>(0)?,
                None => return Err(RepoError::NotFound(id)),
            }
        };

        let outcome = vote_outcome(score, direction);
        match outcome {
            VoteOutcome::Kept(next) => {
                tx.execute(
                    "UPDATE recommendations SET score = ?2 WHERE id = ?1;",
                    params![id, next],
                )?;
                debug!(
                    "event=vote_applied module=repo status=ok id={id} direction={direction:?} score={next}"
                );
            }
            VoteOutcome::Deleted => {
                tx.execute("DELETE FROM recommendations WHERE id = ?1;", [id])?;
                info!(
                    "event=threshold_delete module=repo status=ok id={id} last_score={score}"
                );
            }
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn recent(&self, limit: u32) -> RepoResult<Vec<Recommendation>> {
        self.query_ordered("ORDER BY id DESC LIMIT ?1", limit)
    }

    fn top_by_score(&self, amount: u32) -> RepoResult<Vec<Recommendation>> {
        self.query_ordered("ORDER BY score DESC, id ASC LIMIT ?1", amount)
    }

    fn snapshot_all(&self) -> RepoResult<Vec<Recommendation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECOMMENDATION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_recommendation_row(row)?);
        }

        Ok(records)
    }
}

impl SqliteRecommendationRepository<'_> {
    fn query_ordered(&self, order_clause: &str, limit: u32) -> RepoResult<Vec<Recommendation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECOMMENDATION_SELECT_SQL} {order_clause};"))?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_recommendation_row(row)?);
        }

        Ok(records)
    }
}

fn parse_recommendation_row(row: &Row<'_>) -> RepoResult<Recommendation> {
    let record = Recommendation {
        id: row.get("id")?,
        name: row.get("name")?,
        link: row.get("link")?,
        score: row.get("score")?,
        created_at: row.get("created_at")?,
    };

    if record.score < SCORE_FLOOR {
        return Err(RepoError::InvalidData(format!(
            "recommendation {} persisted with score {} below floor",
            record.id, record.score
        )));
    }

    Ok(record)
}

fn map_insert_error(err: rusqlite::Error, name: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, Some(message)) = &err {
        if failure.code == ErrorCode::ConstraintViolation && message.contains("recommendations.name")
        {
            return RepoError::Conflict(name.to_string());
        }
    }
    err.into()
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "recommendations")? {
        return Err(RepoError::MissingRequiredTable("recommendations"));
    }

    for column in ["id", "name", "link", "score", "created_at"] {
        if !table_has_column(conn, "recommendations", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "recommendations",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
