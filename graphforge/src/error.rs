// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Statement construction and rendering error types

use thiserror::Error;

/// Errors raised while constructing or rendering a statement.
///
/// All of these signal caller bugs. None of them is recoverable for the
/// statement at hand and none is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("operator {operator} takes {expected} operand(s), got {actual}")]
    Arity {
        operator: String,
        expected: usize,
        actual: usize,
    },

    #[error("relationship pattern cannot combine fixed type(s) with a dynamic target")]
    ConflictingPattern,

    #[error("a dynamic relationship is already registered for target '{target}'")]
    MultipleDynamicAssociation { target: String },

    #[error("statement cannot be rendered: {0}")]
    UnrenderableStatement(String),
}

pub type Result<T> = std::result::Result<T, Error>;
