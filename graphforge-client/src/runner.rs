//! Driver abstraction: sessions, records and result summaries
//!
//! The client never talks to a wire protocol itself. It drives a
//! [`SessionProvider`], which hands out [`SessionHandle`]s; an
//! implementation backs these with a real driver, a connection pool or,
//! in tests, a mock.

use crate::error::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use graphforge::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One record of a result: named values in a single row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Counters reported by the server after a statement ran to completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub nodes_created: u64,
    pub nodes_deleted: u64,
    pub relationships_created: u64,
    pub relationships_deleted: u64,
    pub properties_set: u64,
}

/// A submitted statement: the record stream plus the summary that
/// resolves once the stream is exhausted
pub struct Submission {
    pub records: BoxStream<'static, Result<Record>>,
    pub summary: BoxFuture<'static, Result<ResultSummary>>,
}

/// A live session against one database.
///
/// Closing consumes the handle; the client guarantees exactly one close
/// per acquired handle, on every completion path.
#[async_trait]
pub trait SessionHandle: Send {
    /// Submit query text with its parameters
    async fn submit(
        &mut self,
        query: &str,
        parameters: &BTreeMap<String, Value>,
    ) -> Result<Submission>;

    /// Release the session back to its provider
    async fn close(self: Box<Self>) -> Result<()>;
}

/// Source of sessions, usually backed by a driver's connection pool
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Acquire a session, optionally pinned to a named database
    async fn acquire(&self, database: Option<&str>) -> Result<Box<dyn SessionHandle>>;
}
