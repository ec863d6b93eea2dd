// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Statement model and traversal

pub mod ast;
pub mod visitor;

pub use ast::*;
pub use visitor::{walk_statement, AstNode, Visitor};
