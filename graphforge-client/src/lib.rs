//! GraphForge Client - Async execution for GraphForge statements
//!
//! This crate runs statements built with `graphforge` (or raw query
//! text) against any driver exposing the session traits. It offers a
//! fluent API for binding parameters, mapping records and choosing how
//! many results to consume, with strict scoped session management.
//!
//! # Quick Start
//!
//! ```no_run
//! use graphforge_client::{GraphClient, Result};
//!
//! # async fn demo(client: GraphClient) -> Result<()> {
//! let summary = client
//!     .query("CREATE (u:User {name: $name})")
//!     .bind("Alice").to("name")
//!     .run()
//!     .await?;
//! assert_eq!(summary.nodes_created, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Scoped sessions** - A session is acquired per statement and
//!   released exactly once, on success, failure and cancellation
//! - **Fluent binding** - `bind(value).to(name)`, binder functions for
//!   domain types, and whole-collection binds
//! - **Typed results** - Map records with a closure or through serde
//! - **Driver-agnostic** - Any connection layer can implement the
//!   session traits; tests run against mocks

pub mod client;
pub mod config;
pub mod error;
pub(crate) mod pipeline;
pub mod runner;

pub use client::{GraphClient, MappingSpec, OngoingBind, RecordFetchSpec, RunnableSpec};
pub use config::{ClientConfig, DEFAULT_DATABASE};
pub use error::{Error, Result};
pub use runner::{Record, ResultSummary, SessionHandle, SessionProvider, Submission};

// Statement building re-exports
pub use graphforge::{NamedParameters, RenderedStatement, Renderer, Value};
