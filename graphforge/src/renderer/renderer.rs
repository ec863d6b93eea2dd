// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Statement renderer: statement tree to query text plus parameters
//!
//! The renderer is a [`Visitor`] over the statement tree. Each render call
//! starts from fresh state, so generated names are stable for a given tree
//! within one call and two calls over the same tree produce identical
//! output.

use crate::ast::ast::{
    Clause, Direction, Expression, Literal, NodePattern, Operator, SortDirection, Statement,
};
use crate::ast::visitor::{walk_statement, AstNode, Visitor};
use crate::error::{Error, Result};
use crate::value::Value;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;

/// Result of rendering: query text plus the parameters the renderer
/// lifted out of the tree (auto-parameterized string literals).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedStatement {
    pub text: String,
    pub parameters: BTreeMap<String, Value>,
}

/// Renders statements to query text
pub struct Renderer;

impl Renderer {
    /// Render a statement.
    ///
    /// Clause order is validated first; a statement whose clauses cannot
    /// form a renderable query fails with
    /// [`Error::UnrenderableStatement`] before any text is produced.
    pub fn render(statement: &Statement) -> Result<RenderedStatement> {
        validate_clause_order(statement.clauses())?;
        log::debug!(
            "rendering statement with {} clause(s)",
            statement.clauses().len()
        );

        let mut visitor = RenderVisitor::default();
        walk_statement(&mut visitor, statement);

        Ok(RenderedStatement {
            text: visitor.out,
            parameters: visitor.parameters,
        })
    }
}

/// Reject clause sequences that cannot form a valid query
fn validate_clause_order(clauses: &[Clause]) -> Result<()> {
    if clauses.is_empty() {
        return Err(Error::UnrenderableStatement(
            "statement has no clauses".to_string(),
        ));
    }
    let mut returned = false;
    for (i, clause) in clauses.iter().enumerate() {
        if returned && !matches!(clause, Clause::OrderBy(_)) {
            return Err(Error::UnrenderableStatement(
                "only ORDER BY may follow RETURN".to_string(),
            ));
        }
        match clause {
            Clause::Where(_) => {
                let anchored = i > 0
                    && matches!(
                        clauses[i - 1],
                        Clause::Match { .. } | Clause::With { .. } | Clause::Unwind { .. }
                    );
                if !anchored {
                    return Err(Error::UnrenderableStatement(
                        "WHERE must directly follow MATCH, WITH or UNWIND".to_string(),
                    ));
                }
            }
            Clause::OrderBy(_) => {
                let anchored = i > 0
                    && matches!(clauses[i - 1], Clause::Return { .. } | Clause::With { .. });
                if !anchored {
                    return Err(Error::UnrenderableStatement(
                        "ORDER BY must directly follow RETURN or WITH".to_string(),
                    ));
                }
            }
            Clause::Return { .. } => returned = true,
            _ => {}
        }
    }
    Ok(())
}

/// Operator context for parenthesization decisions. A `None` operator
/// marks a grouping context (function arguments, list items, an already
/// wrapped property-access target) inside which no inherited parentheses
/// are needed.
struct Frame {
    operator: Option<Operator>,
    on_right: bool,
    wrapped: bool,
}

#[derive(Default)]
struct RenderVisitor {
    out: String,
    parameters: BTreeMap<String, Value>,
    node_aliases: HashMap<usize, String>,
    alias_counter: usize,
    param_counter: usize,
    frames: Vec<Frame>,
}

impl RenderVisitor {
    /// Alias for a node pattern without a variable, stable per pattern
    /// identity within this render call
    fn alias_for(&mut self, node: &Rc<NodePattern>) -> String {
        let key = Rc::as_ptr(node) as usize;
        if let Some(alias) = self.node_aliases.get(&key) {
            return alias.clone();
        }
        let alias = format!("gf_{}", self.alias_counter);
        self.alias_counter += 1;
        self.node_aliases.insert(key, alias.clone());
        alias
    }

    fn next_generated_alias(&mut self) -> String {
        let alias = format!("gf_{}", self.alias_counter);
        self.alias_counter += 1;
        alias
    }

    /// Lift a literal into the parameter map and reference it
    fn auto_parameter(&mut self, value: Value) -> String {
        let name = format!("gfp_{}", self.param_counter);
        self.param_counter += 1;
        log::debug!("lifting literal into parameter ${}", name);
        self.parameters.insert(name.clone(), value);
        name
    }

    /// Decide whether an operand rooted at `child` needs parentheses in
    /// the enclosing operator context
    fn child_needs_parens(&self, child: Operator) -> bool {
        let Some(frame) = self.frames.last() else {
            return false;
        };
        let Some(parent) = frame.operator else {
            return false;
        };
        let child_prec = child.precedence();
        let parent_prec = parent.precedence();
        if child_prec > parent_prec {
            return false;
        }
        if child_prec < parent_prec {
            return true;
        }
        if parent.is_unary() {
            // `--x` would read as a comment marker
            return matches!((parent, child), (Operator::Negate, Operator::Negate));
        }
        if !frame.on_right {
            // comparisons never chain; equal precedence on the left
            // still needs grouping
            parent.is_right_associative() || is_comparison(parent)
        } else {
            // a right operand at equal precedence only keeps its grouping
            // implicitly when it repeats an associative parent; under a
            // different operator (a * (b / c)) it would re-parse
            // left-grouped
            !(child == parent && (parent.is_associative() || parent.is_right_associative()))
        }
    }

    fn push_operator_frame(&mut self, operator: Operator) {
        let wrapped = self.child_needs_parens(operator);
        if wrapped {
            self.out.push('(');
        }
        self.frames.push(Frame {
            operator: Some(operator),
            on_right: false,
            wrapped,
        });
    }

    fn push_grouping_frame(&mut self, wrapped: bool) {
        if wrapped {
            self.out.push('(');
        }
        self.frames.push(Frame {
            operator: None,
            on_right: false,
            wrapped,
        });
    }

    fn pop_frame(&mut self) -> bool {
        self.frames.pop().map(|f| f.wrapped).unwrap_or(false)
    }

    fn render_literal(&mut self, value: &Literal, inline: bool) {
        match value {
            Literal::String(s) => {
                if inline {
                    self.out.push('\'');
                    self.out.push_str(&escape_string(s));
                    self.out.push('\'');
                } else {
                    let name = self.auto_parameter(Value::String(s.clone()));
                    self.out.push('$');
                    self.out.push_str(&name);
                }
            }
            Literal::Integer(i) => self.out.push_str(&i.to_string()),
            Literal::Float(f) => {
                if f.is_finite() {
                    self.out.push_str(&format_float(*f));
                } else {
                    // NaN and the infinities have no literal syntax
                    let name = self.auto_parameter(Value::Float(*f));
                    self.out.push('$');
                    self.out.push_str(&name);
                }
            }
            Literal::Boolean(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Literal::Null => self.out.push_str("NULL"),
        }
    }
}

impl Visitor for RenderVisitor {
    fn enter(&mut self, node: AstNode<'_>) {
        match node {
            AstNode::Statement(_) => {}
            AstNode::Clause(clause) => match clause {
                Clause::Match { optional, .. } => {
                    self.out
                        .push_str(if *optional { "OPTIONAL MATCH " } else { "MATCH " });
                }
                Clause::Where(_) => self.out.push_str("WHERE "),
                Clause::Return { distinct, .. } => {
                    self.out
                        .push_str(if *distinct { "RETURN DISTINCT " } else { "RETURN " });
                }
                Clause::Merge(_) => self.out.push_str("MERGE "),
                Clause::Create(_) => self.out.push_str("CREATE "),
                Clause::Delete { detach, .. } => {
                    self.out
                        .push_str(if *detach { "DETACH DELETE " } else { "DELETE " });
                }
                Clause::With { distinct, .. } => {
                    self.out
                        .push_str(if *distinct { "WITH DISTINCT " } else { "WITH " });
                }
                Clause::Unwind { .. } => self.out.push_str("UNWIND "),
                Clause::OrderBy(_) => self.out.push_str("ORDER BY "),
            },
            AstNode::PathPattern(_) => {}
            AstNode::Node(pattern) => {
                self.out.push('(');
                let name = match &pattern.variable {
                    Some(variable) => variable.clone(),
                    None => self.alias_for(pattern),
                };
                self.out.push_str(&escape_identifier(&name));
                for label in &pattern.labels {
                    self.out.push(':');
                    self.out.push_str(&escape_identifier(label));
                }
                if !pattern.properties.is_empty() {
                    self.out.push_str(" {");
                }
            }
            AstNode::Relationship(relationship) => {
                self.out.push_str(match relationship.direction {
                    Direction::Incoming => "<-[",
                    _ => "-[",
                });
                match &relationship.variable {
                    Some(variable) => self.out.push_str(&escape_identifier(variable)),
                    None if relationship.is_dynamic() => {
                        // A dynamic relationship carries no type syntax;
                        // its target resolves at execution time through
                        // the parameterized companion clause. It still
                        // needs a name to be referenced by.
                        let alias = self.next_generated_alias();
                        log::debug!("dynamic relationship rendered as {}", alias);
                        self.out.push_str(&alias);
                    }
                    None => {}
                }
                if !relationship.types.is_empty() {
                    self.out.push(':');
                    let joined = relationship
                        .types
                        .iter()
                        .map(|t| escape_identifier(t))
                        .collect::<Vec<_>>()
                        .join("|");
                    self.out.push_str(&joined);
                }
                if let Some(length) = &relationship.length {
                    self.out.push('*');
                    match (length.min, length.max) {
                        (None, None) => {}
                        (Some(min), None) => self.out.push_str(&format!("{}..", min)),
                        (None, Some(max)) => self.out.push_str(&format!("..{}", max)),
                        (Some(min), Some(max)) => {
                            self.out.push_str(&format!("{}..{}", min, max))
                        }
                    }
                }
                if !relationship.properties.is_empty() {
                    self.out.push_str(" {");
                }
            }
            AstNode::Property(property) => {
                self.out.push_str(&escape_identifier(&property.key));
                self.out.push_str(": ");
            }
            AstNode::Expression(expression) => match expression {
                Expression::Literal { value, inline } => self.render_literal(value, *inline),
                Expression::Parameter(name) => {
                    self.out.push('$');
                    self.out.push_str(name);
                }
                Expression::Symbolic(name) => {
                    self.out.push_str(&escape_identifier(name));
                }
                Expression::PropertyAccess { target, .. } => {
                    let wrapped = matches!(
                        target.as_ref(),
                        Expression::Operation { .. } | Expression::UnaryOperation { .. }
                    );
                    self.push_grouping_frame(wrapped);
                }
                Expression::Operation { operator, .. } => self.push_operator_frame(*operator),
                Expression::UnaryOperation { operator, .. } => {
                    self.push_operator_frame(*operator)
                }
                Expression::FunctionInvocation { name, .. } => {
                    self.out.push_str(&escape_identifier(name));
                    self.out.push('(');
                    self.push_grouping_frame(false);
                }
                Expression::List(_) => {
                    self.out.push('[');
                    self.push_grouping_frame(false);
                }
            },
            AstNode::Operator(operator) => {
                if operator.is_unary() {
                    match operator {
                        Operator::Not => self.out.push_str("NOT "),
                        _ => self.out.push('-'),
                    }
                } else {
                    self.out.push(' ');
                    self.out.push_str(operator.symbol());
                    self.out.push(' ');
                }
                if let Some(frame) = self.frames.last_mut() {
                    frame.on_right = true;
                }
            }
            AstNode::ReturnItem(_) | AstNode::OrderItem(_) => {}
        }
    }

    fn leave(&mut self, node: AstNode<'_>) {
        match node {
            AstNode::Statement(_) | AstNode::PathPattern(_) | AstNode::Property(_) => {}
            AstNode::Clause(clause) => {
                if let Clause::Unwind { variable, .. } = clause {
                    self.out.push_str(" AS ");
                    self.out.push_str(&escape_identifier(variable));
                }
            }
            AstNode::Node(pattern) => {
                if !pattern.properties.is_empty() {
                    self.out.push('}');
                }
                self.out.push(')');
            }
            AstNode::Relationship(relationship) => {
                if !relationship.properties.is_empty() {
                    self.out.push('}');
                }
                self.out.push_str(match relationship.direction {
                    Direction::Outgoing => "]->",
                    _ => "]-",
                });
            }
            AstNode::Expression(expression) => match expression {
                Expression::Operation { .. } | Expression::UnaryOperation { .. } => {
                    if self.pop_frame() {
                        self.out.push(')');
                    }
                }
                Expression::PropertyAccess { key, .. } => {
                    if self.pop_frame() {
                        self.out.push(')');
                    }
                    self.out.push('.');
                    self.out.push_str(&escape_identifier(key));
                }
                Expression::FunctionInvocation { .. } => {
                    self.pop_frame();
                    self.out.push(')');
                }
                Expression::List(_) => {
                    self.pop_frame();
                    self.out.push(']');
                }
                _ => {}
            },
            AstNode::Operator(_) => {}
            AstNode::ReturnItem(item) => {
                if let Some(alias) = &item.alias {
                    self.out.push_str(" AS ");
                    self.out.push_str(&escape_identifier(alias));
                }
            }
            AstNode::OrderItem(item) => {
                if item.direction == SortDirection::Descending {
                    self.out.push_str(" DESC");
                }
            }
        }
    }

    fn separate(&mut self, parent: AstNode<'_>) {
        match parent {
            AstNode::Statement(_) => self.out.push(' '),
            _ => self.out.push_str(", "),
        }
    }
}

fn is_comparison(operator: Operator) -> bool {
    matches!(
        operator,
        Operator::Equal
            | Operator::NotEqual
            | Operator::LessThan
            | Operator::LessEqual
            | Operator::GreaterThan
            | Operator::GreaterEqual
            | Operator::Regex
            | Operator::StartsWith
            | Operator::EndsWith
            | Operator::Contains
            | Operator::In
    )
}

/// Keywords that force backtick quoting even when lexically plain
static RESERVED: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "MATCH", "OPTIONAL", "WHERE", "RETURN", "CREATE", "MERGE", "DELETE", "DETACH", "WITH",
        "UNWIND", "ORDER", "BY", "ASC", "DESC", "DISTINCT", "AND", "OR", "XOR", "NOT", "IN",
        "STARTS", "ENDS", "CONTAINS", "IS", "NULL", "TRUE", "FALSE", "AS", "LIMIT", "SKIP",
        "SET", "REMOVE", "UNION", "ALL", "CASE", "WHEN", "THEN", "ELSE", "END", "EXISTS", "ON",
    ]
    .into_iter()
    .collect()
});

/// Emit an identifier, backtick-quoting it when it is not a plain name
/// or collides with a keyword. Embedded backticks are doubled.
pub fn escape_identifier(name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .next()
            .map(|c| c.is_alphabetic() || c == '_')
            .unwrap_or(false)
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
        && !RESERVED.contains(name.to_ascii_uppercase().as_str());
    if plain {
        name.to_string()
    } else {
        format!("`{}`", name.replace('`', "``"))
    }
}

fn escape_string(content: &str) -> String {
    content.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Finite floats always carry a decimal point so they read back as floats
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}
