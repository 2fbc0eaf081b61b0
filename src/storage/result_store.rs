//! Where finished analyses go so they can be shown again later.

use std::{collections::HashMap, path::Path, sync::Mutex};

use log::info;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::models::analysis::AnalysisResult;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Stored analysis could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Result store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait ResultStore: Send + Sync {
    /// Saves `analysis` under `session_id`, replacing any earlier entry.
    fn save(&self, session_id: &str, analysis: &AnalysisResult) -> StoreResult<()>;

    fn load(&self, session_id: &str) -> StoreResult<Option<AnalysisResult>>;
}

pub struct SqliteResultStore {
    connection: Mutex<Connection>,
}

impl SqliteResultStore {
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<SqliteResultStore> {
        let connection = Connection::open(path.as_ref())?;
        info!("Opened result database at {}", path.as_ref().display());
        SqliteResultStore::with_connection(connection)
    }

    pub fn open_in_memory() -> StoreResult<SqliteResultStore> {
        SqliteResultStore::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> StoreResult<SqliteResultStore> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS quiz_results (
                session_id   TEXT PRIMARY KEY,
                topic        TEXT NOT NULL,
                percentage   INTEGER NOT NULL,
                pass_status  TEXT NOT NULL,
                completed_at TEXT NOT NULL,
                analysis     TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteResultStore {
            connection: Mutex::new(connection),
        })
    }
}

impl ResultStore for SqliteResultStore {
    fn save(&self, session_id: &str, analysis: &AnalysisResult) -> StoreResult<()> {
        let json = serde_json::to_string(analysis)?;
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        connection.execute(
            "INSERT OR REPLACE INTO quiz_results
                (session_id, topic, percentage, pass_status, completed_at, analysis)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session_id,
                analysis.topic,
                analysis.percentage,
                analysis.pass_status.to_string(),
                analysis.completed_at.to_rfc3339(),
                json
            ],
        )?;
        Ok(())
    }

    fn load(&self, session_id: &str) -> StoreResult<Option<AnalysisResult>> {
        let connection = self.connection.lock().map_err(|_| StoreError::Poisoned)?;
        let json: Option<String> = connection
            .query_row(
                "SELECT analysis FROM quiz_results WHERE session_id = ?1",
                params![session_id],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
pub struct InMemoryResultStore {
    results: Mutex<HashMap<String, AnalysisResult>>,
}

impl InMemoryResultStore {
    pub fn new() -> InMemoryResultStore {
        InMemoryResultStore::default()
    }
}

impl ResultStore for InMemoryResultStore {
    fn save(&self, session_id: &str, analysis: &AnalysisResult) -> StoreResult<()> {
        self.results
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(session_id.to_string(), analysis.clone());
        Ok(())
    }

    fn load(&self, session_id: &str) -> StoreResult<Option<AnalysisResult>> {
        Ok(self
            .results
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .get(session_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::quiz::AnswerMap,
        quiz::{fixtures::question_set, scoring::score_at},
    };
    use chrono::{TimeZone, Utc};

    fn analysis_at(hour: u32) -> AnalysisResult {
        let answers: AnswerMap = vec![(0, 0), (1, 1)].into_iter().collect();
        let completed_at = Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap();
        score_at(&question_set().with_topic("Rust"), &answers, completed_at)
    }

    fn exercise(store: &dyn ResultStore) {
        assert!(store.load("missing").unwrap().is_none());

        store.save("early", &analysis_at(8)).unwrap();
        store.save("late", &analysis_at(17)).unwrap();

        let loaded = store.load("early").unwrap().unwrap();
        assert_eq!(loaded, analysis_at(8));
        assert_eq!(store.load("late").unwrap().unwrap().completed_at, analysis_at(17).completed_at);
    }

    #[test]
    fn sqlite_store_round_trips() {
        exercise(&SqliteResultStore::open_in_memory().unwrap());
    }

    #[test]
    fn memory_store_round_trips() {
        exercise(&InMemoryResultStore::new());
    }
}
