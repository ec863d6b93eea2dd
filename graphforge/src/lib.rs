// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! GraphForge - A typed Cypher statement builder
//!
//! GraphForge builds Cypher statements as typed trees instead of strings.
//!
//! # Features
//!
//! - **Typed statement model**: Expressions, patterns and clauses are
//!   plain immutable values, validated at construction time
//! - **Visitor traversal**: An enter/leave protocol over the tree for
//!   renderers and analyzers
//! - **Rendering**: Deterministic query text with generated aliases,
//!   minimal parenthesization and identifier escaping
//! - **Auto-parameterization**: String literals render as parameters,
//!   keeping query text cacheable and injection-free
//!
//! # Usage
//!
//! ```no_run
//! use graphforge::ast::{Clause, Expression, NodePattern, PathPattern, ReturnItem, Statement};
//! use graphforge::Renderer;
//!
//! let user = NodePattern::labelled(["User"]).named("u").into_node();
//! let statement = Statement::new(vec![
//!     Clause::Match { optional: false, patterns: vec![PathPattern::node(user)] },
//!     Clause::Return { distinct: false, items: vec![ReturnItem::new(Expression::symbolic("u"))] },
//! ]);
//! let rendered = Renderer::render(&statement).unwrap();
//! assert_eq!(rendered.text, "MATCH (u:User) RETURN u");
//! ```

pub mod ast;
pub mod error;
pub mod params;
pub mod renderer;
pub mod value;

pub use error::{Error, Result};
pub use params::NamedParameters;
pub use renderer::{RenderedStatement, Renderer};
pub use value::Value;

/// GraphForge version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
