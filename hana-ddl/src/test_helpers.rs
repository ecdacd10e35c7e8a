use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::connection::{CatalogRow, ConnectionParams, Connector, HanaConnection};
use crate::error::DriverError;

/// What happened on the connections of a [`RecordingConnector`].
#[derive(Debug, Clone, Default)]
pub struct RecordingLog {
    pub connects: usize,
    pub executed: Vec<String>,
    pub queries: Vec<String>,
    pub closed: bool,
}

#[derive(Default)]
struct RecordingState {
    log: RecordingLog,
    rows: HashMap<String, Vec<CatalogRow>>,
    failing: HashSet<String>,
    refuse_connections: bool,
}

/// An in-memory stand-in for a database driver.
///
/// Queries answer with the rows registered for their exact text, or no rows at all.
/// Statements and queries registered as failing return an error.
#[derive(Default, Clone)]
pub struct RecordingConnector {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingConnector {
    pub fn refusing() -> Self {
        let connector = RecordingConnector::default();
        connector.state.lock().unwrap().refuse_connections = true;
        connector
    }

    pub fn with_rows(self, sql: &str, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("rows must be objects, got {other}"),
            })
            .collect();
        self.state.lock().unwrap().rows.insert(sql.to_string(), rows);
        self
    }

    pub fn failing_on(self, sql: &str) -> Self {
        self.state.lock().unwrap().failing.insert(sql.to_string());
        self
    }

    pub fn log(&self) -> RecordingLog {
        self.state.lock().unwrap().log.clone()
    }
}

pub struct RecordingConnection {
    state: Arc<Mutex<RecordingState>>,
}

#[async_trait]
impl Connector for RecordingConnector {
    type Connection = RecordingConnection;

    async fn connect(&self, _params: &ConnectionParams) -> Result<Self::Connection, DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connections {
            return Err("connection refused".into());
        }
        state.log.connects += 1;

        Ok(RecordingConnection {
            state: self.state.clone(),
        })
    }
}

#[async_trait]
impl HanaConnection for RecordingConnection {
    async fn execute(&self, sql: &str) -> Result<(), DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(sql) {
            return Err(format!("could not execute `{sql}`").into());
        }
        state.log.executed.push(sql.to_string());
        Ok(())
    }

    async fn query(&self, sql: &str) -> Result<Vec<CatalogRow>, DriverError> {
        let mut state = self.state.lock().unwrap();
        if state.failing.contains(sql) {
            return Err(format!("could not query `{sql}`").into());
        }
        state.log.queries.push(sql.to_string());
        Ok(state.rows.get(sql).cloned().unwrap_or_default())
    }

    async fn close(&self) -> Result<(), DriverError> {
        self.state.lock().unwrap().log.closed = true;
        Ok(())
    }
}
