// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Rendering statements to query text

pub mod renderer;

pub use renderer::{escape_identifier, RenderedStatement, Renderer};
