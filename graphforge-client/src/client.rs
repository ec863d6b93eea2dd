//! Fluent statement execution
//!
//! [`GraphClient`] is the entry point. A statement flows through a chain
//! of spec values: bind parameters, choose a mapping, then call a
//! terminal. Every terminal acquires a session, submits, consumes and
//! releases the session exactly once, whatever the outcome.
//!
//! # Examples
//!
//! ```no_run
//! # use graphforge_client::{GraphClient, Result};
//! # async fn demo(client: GraphClient) -> Result<()> {
//! let names: Vec<String> = client
//!     .query("MATCH (u:User) WHERE u.age >= $age RETURN u.name AS name")
//!     .bind(18i64).to("age")
//!     .fetch_as::<String>()
//!     .mapped_by(|record| {
//!         Ok(record.get("name").and_then(|v| v.as_str()).unwrap_or_default().to_string())
//!     })
//!     .all()
//!     .await?;
//! # Ok(())
//! # }
//! ```

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::pipeline::SessionGuard;
use crate::runner::{Record, ResultSummary, SessionHandle, SessionProvider};
use futures::future::BoxFuture;
use futures::StreamExt;
use graphforge::ast::Statement;
use graphforge::{NamedParameters, Renderer, Value};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

type MapperError = Box<dyn std::error::Error + Send + Sync>;
type Mapper<T> = Box<dyn Fn(Record) -> std::result::Result<T, MapperError> + Send + Sync>;

/// Client executing statements through a session provider
pub struct GraphClient {
    provider: Arc<dyn SessionProvider>,
    config: ClientConfig,
}

impl GraphClient {
    pub fn new(provider: impl SessionProvider + 'static) -> Self {
        Self::with_config(provider, ClientConfig::default())
    }

    pub fn with_config(provider: impl SessionProvider + 'static, config: ClientConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config,
        }
    }

    /// Start a statement from raw query text
    pub fn query(&self, text: impl Into<String>) -> RunnableSpec<'_> {
        RunnableSpec {
            client: self,
            database: self
                .config
                .default_database
                .clone()
                .or_else(|| crate::config::DEFAULT_DATABASE.map(String::from)),
            query: text.into(),
            parameters: NamedParameters::new(),
        }
    }

    /// Start a statement from a query text supplier, invoked immediately
    pub fn query_with<F>(&self, supplier: F) -> RunnableSpec<'_>
    where
        F: FnOnce() -> String,
    {
        self.query(supplier())
    }

    /// Start a statement from a constructed tree. The tree is rendered
    /// here; parameters the renderer lifted out of it are pre-bound.
    pub fn statement(&self, statement: &Statement) -> Result<RunnableSpec<'_>> {
        let rendered = Renderer::render(statement)?;
        let mut spec = self.query(rendered.text);
        for (name, value) in rendered.parameters {
            spec.parameters.add(name, value);
        }
        Ok(spec)
    }

    /// Run caller-provided work against a scoped session.
    ///
    /// The session is acquired before the work runs and released exactly
    /// once afterwards, also when the work fails.
    pub async fn delegate_to<T, F>(&self, database: Option<&str>, work: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s mut dyn SessionHandle) -> BoxFuture<'s, Result<T>>,
    {
        let database = database.or(self.config.default_database.as_deref());
        let handle = self.provider.acquire(database).await?;
        let mut guard = SessionGuard::new(handle);
        let outcome = work(guard.handle_mut()).await;
        let close_outcome = guard.close().await;
        let value = outcome?;
        close_outcome?;
        Ok(value)
    }
}

/// A statement with its bound parameters, ready for a fetch mode or a
/// terminal
pub struct RunnableSpec<'a> {
    client: &'a GraphClient,
    database: Option<String>,
    query: String,
    parameters: NamedParameters,
}

impl<'a> RunnableSpec<'a> {
    /// Pin execution to a named database, overriding the configured
    /// default
    pub fn in_database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    /// Begin binding a value; follow with [`to`](OngoingBind::to) or
    /// [`with`](OngoingBind::with)
    pub fn bind<T>(self, value: T) -> OngoingBind<'a, T> {
        OngoingBind { spec: self, value }
    }

    /// Bind every entry of a parameter collection. Names already bound
    /// are overwritten.
    pub fn bind_all(mut self, parameters: &NamedParameters) -> Self {
        self.parameters.add_all(parameters);
        self
    }

    pub fn query_text(&self) -> &str {
        &self.query
    }

    pub fn parameters(&self) -> &NamedParameters {
        &self.parameters
    }

    /// Fetch raw records
    pub fn fetch(self) -> RecordFetchSpec<'a, Record> {
        RecordFetchSpec {
            client: self.client,
            database: self.database,
            query: self.query,
            parameters: self.parameters,
            mapper: Box::new(Ok),
        }
    }

    /// Fetch records mapped to `T`
    pub fn fetch_as<T>(self) -> MappingSpec<'a, T> {
        MappingSpec {
            spec: self,
            _marker: PhantomData,
        }
    }

    /// Execute for effect, discarding records, and return the summary
    pub async fn run(self) -> Result<ResultSummary> {
        let handle = self.client.provider.acquire(self.database.as_deref()).await?;
        let mut guard = SessionGuard::new(handle);
        let outcome = drain(&mut guard, &self.query, &self.parameters).await;
        let close_outcome = guard.close().await;
        let summary = outcome?;
        close_outcome?;
        Ok(summary)
    }
}

/// A value waiting for its parameter name or binder function
pub struct OngoingBind<'a, T> {
    spec: RunnableSpec<'a>,
    value: T,
}

impl<'a, T> OngoingBind<'a, T> {
    /// Bind the value under the given parameter name
    pub fn to(mut self, name: impl Into<String>) -> RunnableSpec<'a>
    where
        T: Into<Value>,
    {
        self.spec.parameters.add(name, self.value);
        self.spec
    }

    /// Convert the value into parameters through a binder function and
    /// bind them all
    pub fn with<F>(mut self, binder: F) -> RunnableSpec<'a>
    where
        F: FnOnce(T) -> NamedParameters,
    {
        let bound = binder(self.value);
        self.spec.parameters.add_all(&bound);
        self.spec
    }
}

/// A statement whose records will be mapped to `T`
pub struct MappingSpec<'a, T> {
    spec: RunnableSpec<'a>,
    _marker: PhantomData<T>,
}

impl<'a, T> MappingSpec<'a, T> {
    /// Map each record through the given function
    pub fn mapped_by<F>(self, mapper: F) -> RecordFetchSpec<'a, T>
    where
        F: Fn(Record) -> std::result::Result<T, MapperError> + Send + Sync + 'static,
    {
        RecordFetchSpec {
            client: self.spec.client,
            database: self.spec.database,
            query: self.spec.query,
            parameters: self.spec.parameters,
            mapper: Box::new(mapper),
        }
    }
}

impl<'a, T: DeserializeOwned> MappingSpec<'a, T> {
    /// Map each record through serde, treating the record as a map of
    /// column name to value
    pub fn fetch(self) -> RecordFetchSpec<'a, T> {
        self.mapped_by(|record| {
            let json = serde_json::to_value(&record)?;
            Ok(serde_json::from_value(json)?)
        })
    }
}

/// A fully specified statement offering the record terminals
pub struct RecordFetchSpec<'a, T> {
    client: &'a GraphClient,
    database: Option<String>,
    query: String,
    parameters: NamedParameters,
    mapper: Mapper<T>,
}

impl<'a, T> RecordFetchSpec<'a, T> {
    /// Exactly one record. Zero or several fail with
    /// [`Error::Cardinality`].
    ///
    /// Consumption stops once a second record proves the result is not
    /// singular, so `actual` reports at most 2 however many records the
    /// result holds.
    pub async fn one(self) -> Result<T> {
        let mut records = self.fetch_up_to(Some(2)).await?;
        if records.len() == 1 {
            Ok(records.remove(0))
        } else {
            Err(Error::Cardinality {
                actual: records.len(),
            })
        }
    }

    /// The first record, if any
    pub async fn first(self) -> Result<Option<T>> {
        Ok(self.fetch_up_to(Some(1)).await?.into_iter().next())
    }

    /// All records
    pub async fn all(self) -> Result<Vec<T>> {
        self.fetch_up_to(None).await
    }

    async fn fetch_up_to(self, limit: Option<usize>) -> Result<Vec<T>> {
        let handle = self.client.provider.acquire(self.database.as_deref()).await?;
        let mut guard = SessionGuard::new(handle);
        let outcome = collect(&mut guard, &self.query, &self.parameters, &self.mapper, limit).await;
        let close_outcome = guard.close().await;
        let records = outcome?;
        close_outcome?;
        Ok(records)
    }
}

async fn collect<T>(
    guard: &mut SessionGuard,
    query: &str,
    parameters: &NamedParameters,
    mapper: &Mapper<T>,
    limit: Option<usize>,
) -> Result<Vec<T>> {
    log::debug!("executing statement: {}", query);
    let parameters = parameters.to_map();
    let submission = guard.handle_mut().submit(query, &parameters).await?;
    let mut records = submission.records;
    let mut collected = Vec::new();
    while let Some(record) = records.next().await {
        let record = record?;
        collected.push(mapper(record).map_err(Error::Mapping)?);
        if limit.map(|l| collected.len() >= l).unwrap_or(false) {
            break;
        }
    }
    Ok(collected)
}

async fn drain(
    guard: &mut SessionGuard,
    query: &str,
    parameters: &NamedParameters,
) -> Result<ResultSummary> {
    log::debug!("running statement for summary: {}", query);
    let parameters = parameters.to_map();
    let submission = guard.handle_mut().submit(query, &parameters).await?;
    let mut records = submission.records;
    while let Some(record) = records.next().await {
        record?;
    }
    submission.summary.await
}
