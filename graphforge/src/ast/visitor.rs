// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Enter/leave visitor protocol over the statement tree
//!
//! Every node kind is walked between a paired `enter` and `leave` call so
//! that consumers can emit syntax both before and after descending into
//! children (brackets, keywords, closing delimiters). Children are walked
//! in a fixed order, documented on each walk function.
//!
//! A visitor value is good for one traversal at a time. Traversing
//! different trees from different visitor values concurrently is safe;
//! concurrent traversal of one tree instance is not supported.

use crate::ast::ast::{
    Clause, Expression, NodePattern, OrderItem, PathPattern, PatternElement, Property,
    RelationshipPattern, ReturnItem, Statement,
};
use crate::ast::Operator;
use std::rc::Rc;

/// Borrowed reference to any node kind in the statement tree.
///
/// Node patterns are passed as their shared [`Rc`] handle so visitors can
/// observe pattern identity (the renderer keys generated aliases on it).
#[derive(Clone, Copy)]
pub enum AstNode<'a> {
    Statement(&'a Statement),
    Clause(&'a Clause),
    PathPattern(&'a PathPattern),
    Node(&'a Rc<NodePattern>),
    Relationship(&'a RelationshipPattern),
    Property(&'a Property),
    Expression(&'a Expression),
    Operator(&'a Operator),
    ReturnItem(&'a ReturnItem),
    OrderItem(&'a OrderItem),
}

/// Double-dispatch contract for algorithms consuming the statement tree
pub trait Visitor {
    /// Called before a node's children are walked
    fn enter(&mut self, node: AstNode<'_>);

    /// Called after a node's children have been walked
    fn leave(&mut self, node: AstNode<'_>);

    /// Called between two consecutive children of a list-shaped node
    /// (clauses of a statement, patterns of a MATCH, function arguments,
    /// property entries). The parent node is passed for context.
    fn separate(&mut self, _parent: AstNode<'_>) {}
}

/// Walk a statement: clauses in declared order
pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    visitor.enter(AstNode::Statement(statement));
    for (i, clause) in statement.clauses().iter().enumerate() {
        if i > 0 {
            visitor.separate(AstNode::Statement(statement));
        }
        walk_clause(visitor, clause);
    }
    visitor.leave(AstNode::Statement(statement));
}

/// Walk a clause: owned patterns and expressions in declared order
pub fn walk_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &Clause) {
    visitor.enter(AstNode::Clause(clause));
    match clause {
        Clause::Match { patterns, .. } | Clause::Merge(patterns) | Clause::Create(patterns) => {
            for (i, pattern) in patterns.iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Clause(clause));
                }
                walk_path_pattern(visitor, pattern);
            }
        }
        Clause::Where(condition) => walk_expression(visitor, condition),
        Clause::Return { items, .. } | Clause::With { items, .. } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Clause(clause));
                }
                walk_return_item(visitor, item);
            }
        }
        Clause::Delete { expressions, .. } => {
            for (i, expression) in expressions.iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Clause(clause));
                }
                walk_expression(visitor, expression);
            }
        }
        Clause::Unwind { source, .. } => walk_expression(visitor, source),
        Clause::OrderBy(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Clause(clause));
                }
                walk_order_item(visitor, item);
            }
        }
    }
    visitor.leave(AstNode::Clause(clause));
}

/// Walk a path pattern: elements left to right, no separators
pub fn walk_path_pattern<V: Visitor + ?Sized>(visitor: &mut V, pattern: &PathPattern) {
    visitor.enter(AstNode::PathPattern(pattern));
    for element in &pattern.elements {
        match element {
            PatternElement::Node(node) => walk_node(visitor, node),
            PatternElement::Relationship(relationship) => {
                walk_relationship(visitor, relationship)
            }
        }
    }
    visitor.leave(AstNode::PathPattern(pattern));
}

/// Walk a node pattern: property entries in declared order
pub fn walk_node<V: Visitor + ?Sized>(visitor: &mut V, node: &Rc<NodePattern>) {
    visitor.enter(AstNode::Node(node));
    for (i, property) in node.properties.iter().enumerate() {
        if i > 0 {
            visitor.separate(AstNode::Node(node));
        }
        walk_property(visitor, property);
    }
    visitor.leave(AstNode::Node(node));
}

/// Walk a relationship pattern: property entries in declared order.
///
/// A dynamic target expression is deliberately not walked; its shape is
/// unknown until execution and it is never rendered inside the pattern.
pub fn walk_relationship<V: Visitor + ?Sized>(visitor: &mut V, relationship: &RelationshipPattern) {
    visitor.enter(AstNode::Relationship(relationship));
    for (i, property) in relationship.properties.iter().enumerate() {
        if i > 0 {
            visitor.separate(AstNode::Relationship(relationship));
        }
        walk_property(visitor, property);
    }
    visitor.leave(AstNode::Relationship(relationship));
}

/// Walk a property entry: its value expression
pub fn walk_property<V: Visitor + ?Sized>(visitor: &mut V, property: &Property) {
    visitor.enter(AstNode::Property(property));
    walk_expression(visitor, &property.value);
    visitor.leave(AstNode::Property(property));
}

/// Walk an expression. Child order: for a binary operation left operand,
/// operator, right operand; for a unary operation operator then operand;
/// function arguments and list items in declared order.
pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    visitor.enter(AstNode::Expression(expression));
    match expression {
        Expression::Literal { .. } | Expression::Parameter(_) | Expression::Symbolic(_) => {}
        Expression::PropertyAccess { target, .. } => walk_expression(visitor, target),
        Expression::Operation {
            left,
            operator,
            right,
        } => {
            walk_expression(visitor, left);
            visitor.enter(AstNode::Operator(operator));
            visitor.leave(AstNode::Operator(operator));
            walk_expression(visitor, right);
        }
        Expression::UnaryOperation { operator, operand } => {
            visitor.enter(AstNode::Operator(operator));
            visitor.leave(AstNode::Operator(operator));
            walk_expression(visitor, operand);
        }
        Expression::FunctionInvocation { arguments, .. } => {
            for (i, argument) in arguments.items().iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Expression(expression));
                }
                walk_expression(visitor, argument);
            }
        }
        Expression::List(items) => {
            for (i, item) in items.items().iter().enumerate() {
                if i > 0 {
                    visitor.separate(AstNode::Expression(expression));
                }
                walk_expression(visitor, item);
            }
        }
    }
    visitor.leave(AstNode::Expression(expression));
}

/// Walk a return/with item: its expression (the alias is leaf data)
pub fn walk_return_item<V: Visitor + ?Sized>(visitor: &mut V, item: &ReturnItem) {
    visitor.enter(AstNode::ReturnItem(item));
    walk_expression(visitor, &item.expression);
    visitor.leave(AstNode::ReturnItem(item));
}

/// Walk an order item: its expression (the direction is leaf data)
pub fn walk_order_item<V: Visitor + ?Sized>(visitor: &mut V, item: &OrderItem) {
    visitor.enter(AstNode::OrderItem(item));
    walk_expression(visitor, &item.expression);
    visitor.leave(AstNode::OrderItem(item));
}
