// Copyright (c) 2024-2025 GraphForge Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Abstract Syntax Tree (AST) structures for building Cypher statements
//!
//! Unlike a parser-produced tree, these nodes are constructed directly by
//! callers. Validation happens at construction time; the renderer trusts
//! that a constructed tree is semantically sound and only checks clause
//! ordering.

use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::{Error, Result};

/// Operators usable in statement expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    // Logical
    Or,
    Xor,
    And,
    Not,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Regex,

    // String / membership
    StartsWith,
    EndsWith,
    Contains,
    In,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    Negate,
}

impl Operator {
    /// Get the textual form emitted into query text
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::And => "AND",
            Operator::Not => "NOT",
            Operator::Equal => "=",
            Operator::NotEqual => "<>",
            Operator::LessThan => "<",
            Operator::LessEqual => "<=",
            Operator::GreaterThan => ">",
            Operator::GreaterEqual => ">=",
            Operator::Regex => "=~",
            Operator::StartsWith => "STARTS WITH",
            Operator::EndsWith => "ENDS WITH",
            Operator::Contains => "CONTAINS",
            Operator::In => "IN",
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Exponent => "^",
            Operator::Negate => "-",
        }
    }

    /// Binding strength. Higher binds tighter; the renderer parenthesizes
    /// an operand whose operator binds weaker than its parent.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::Xor => 2,
            Operator::And => 3,
            Operator::Not => 4,
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
            | Operator::In => 5,
            Operator::Add | Operator::Subtract => 6,
            Operator::Multiply | Operator::Divide | Operator::Modulo => 7,
            Operator::Exponent => 8,
            Operator::Negate => 9,
        }
    }

    /// Check if this operator takes a single operand
    pub fn is_unary(&self) -> bool {
        matches!(self, Operator::Not | Operator::Negate)
    }

    /// Fully associative operators never need parentheses around an
    /// equal-precedence right operand; `a - (b - c)` does.
    pub fn is_associative(&self) -> bool {
        matches!(
            self,
            Operator::Or | Operator::Xor | Operator::And | Operator::Add | Operator::Multiply
        )
    }

    /// Exponentiation groups to the right
    pub fn is_right_associative(&self) -> bool {
        matches!(self, Operator::Exponent)
    }
}

/// Literal values embedded in expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::String(v)
    }
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Integer(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Boolean(v)
    }
}

/// Ordered sequence of expressions. Order matters for equality; function
/// argument order is part of query semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionList {
    items: Vec<Expression>,
}

impl ExpressionList {
    pub fn new(items: Vec<Expression>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Expression] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Expression tree node. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value. Non-inlined string literals are lifted into the
    /// parameter map by the renderer; `inline` forces textual emission.
    Literal { value: Literal, inline: bool },
    /// A named parameter reference: `$name`
    Parameter(String),
    /// A bare variable reference, e.g. `b` in `RETURN b`
    Symbolic(String),
    /// Property access: target.key
    PropertyAccess {
        target: Box<Expression>,
        key: String,
    },
    /// Binary operation: left op right
    Operation {
        left: Box<Expression>,
        operator: Operator,
        right: Box<Expression>,
    },
    /// Unary operation: op operand
    UnaryOperation {
        operator: Operator,
        operand: Box<Expression>,
    },
    /// Function call: name(args...)
    FunctionInvocation {
        name: String,
        arguments: ExpressionList,
    },
    /// List expression: [item, item, ...]
    List(ExpressionList),
}

impl Expression {
    /// A literal expression. String literals built this way render as
    /// generated parameters, never as inline text.
    pub fn literal(value: impl Into<Literal>) -> Self {
        Expression::Literal {
            value: value.into(),
            inline: false,
        }
    }

    /// A literal expression that is always emitted verbatim into the
    /// query text, including strings.
    pub fn literal_inline(value: impl Into<Literal>) -> Self {
        Expression::Literal {
            value: value.into(),
            inline: true,
        }
    }

    /// A reference to the named parameter `$name`
    pub fn parameter(name: impl Into<String>) -> Self {
        Expression::Parameter(name.into())
    }

    /// A reference to a variable bound elsewhere in the statement
    pub fn symbolic(name: impl Into<String>) -> Self {
        Expression::Symbolic(name.into())
    }

    /// Property access on the result of another expression
    pub fn property(target: Expression, key: impl Into<String>) -> Self {
        Expression::PropertyAccess {
            target: Box::new(target),
            key: key.into(),
        }
    }

    /// A binary operation. Fails with [`Error::Arity`] when given a
    /// unary-only operator.
    pub fn binary(left: Expression, operator: Operator, right: Expression) -> Result<Self> {
        if operator.is_unary() {
            return Err(Error::Arity {
                operator: operator.symbol().to_string(),
                expected: 1,
                actual: 2,
            });
        }
        Ok(Expression::Operation {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    /// A unary operation. Fails with [`Error::Arity`] when given a
    /// binary-only operator.
    pub fn unary(operator: Operator, operand: Expression) -> Result<Self> {
        if !operator.is_unary() {
            return Err(Error::Arity {
                operator: operator.symbol().to_string(),
                expected: 2,
                actual: 1,
            });
        }
        Ok(Expression::UnaryOperation {
            operator,
            operand: Box::new(operand),
        })
    }

    /// A function invocation with arguments in call order
    pub fn function(name: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::FunctionInvocation {
            name: name.into(),
            arguments: ExpressionList::new(arguments),
        }
    }

    /// A list expression preserving item order
    pub fn list(items: Vec<Expression>) -> Self {
        Expression::List(ExpressionList::new(items))
    }
}

/// Property entry inside a node or relationship pattern: key: value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expression,
}

/// Node pattern: (variable? :Label* {properties}?)
///
/// Handed around as [`Node`] so one pattern object can appear in several
/// clauses of the same statement; the renderer keys its generated aliases
/// on that shared identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NodePattern {
    pub variable: Option<String>,
    pub labels: Vec<String>,
    pub properties: Vec<Property>,
}

/// Shared handle to a node pattern within one statement
pub type Node = Rc<NodePattern>;

impl NodePattern {
    /// A node pattern with the given labels and no variable
    pub fn labelled<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variable: None,
            labels: labels.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
        }
    }

    /// Give the pattern an explicit variable name
    pub fn named(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    /// Add a property constraint
    pub fn property(mut self, key: impl Into<String>, value: Expression) -> Self {
        self.properties.push(Property {
            key: key.into(),
            value,
        });
        self
    }

    /// Freeze the pattern into a shareable [`Node`]
    pub fn into_node(self) -> Node {
        Rc::new(self)
    }
}

/// Relationship direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,   // ->
    Incoming,   // <-
    Undirected, // -
}

/// Variable-length bounds: *min..max
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

/// Relationship pattern: -[variable? :TYPE* {properties}?]-
///
/// A relationship is either statically typed (`types`) or dynamic: its
/// target is a map-valued expression whose shape is only known at
/// execution time. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipPattern {
    pub variable: Option<String>,
    pub direction: Direction,
    pub types: Vec<String>,
    pub properties: Vec<Property>,
    pub length: Option<LengthRange>,
    pub dynamic: Option<Expression>,
}

impl RelationshipPattern {
    /// Construct a relationship pattern, rejecting the combination of
    /// fixed types and a dynamic target with [`Error::ConflictingPattern`].
    pub fn new(
        direction: Direction,
        types: Vec<String>,
        dynamic: Option<Expression>,
    ) -> Result<Self> {
        if !types.is_empty() && dynamic.is_some() {
            return Err(Error::ConflictingPattern);
        }
        Ok(Self {
            variable: None,
            direction,
            types,
            properties: Vec::new(),
            length: None,
            dynamic,
        })
    }

    /// A statically typed relationship
    pub fn typed<I, S>(direction: Direction, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            variable: None,
            direction,
            types: types.into_iter().map(Into::into).collect(),
            properties: Vec::new(),
            length: None,
            dynamic: None,
        }
    }

    /// A dynamic relationship whose target comes from a map-valued
    /// expression resolved at execution time
    pub fn dynamic(direction: Direction, source: Expression) -> Self {
        Self {
            variable: None,
            direction,
            types: Vec::new(),
            properties: Vec::new(),
            length: None,
            dynamic: Some(source),
        }
    }

    /// Give the relationship an explicit variable name
    pub fn named(mut self, variable: impl Into<String>) -> Self {
        self.variable = Some(variable.into());
        self
    }

    /// Add a property constraint
    pub fn property(mut self, key: impl Into<String>, value: Expression) -> Self {
        self.properties.push(Property {
            key: key.into(),
            value,
        });
        self
    }

    /// Constrain the traversal length
    pub fn length(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.length = Some(LengthRange { min, max });
        self
    }

    /// Check if this relationship has a dynamic target
    pub fn is_dynamic(&self) -> bool {
        self.dynamic.is_some()
    }
}

/// Pattern element (node or relationship)
#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Node(Node),
    Relationship(RelationshipPattern),
}

/// Path pattern: node (relationship node)*
#[derive(Debug, Clone, PartialEq)]
pub struct PathPattern {
    pub elements: Vec<PatternElement>,
}

impl PathPattern {
    pub fn new(elements: Vec<PatternElement>) -> Self {
        Self { elements }
    }

    /// A path consisting of a single node
    pub fn node(node: Node) -> Self {
        Self {
            elements: vec![PatternElement::Node(node)],
        }
    }
}

/// Registry enforcing at most one dynamic relationship per target label.
///
/// The relationship model itself cannot see its siblings; whatever
/// aggregates patterns into a schema registers each dynamic target here
/// and gets [`Error::MultipleDynamicAssociation`] on the second
/// registration for the same label.
#[derive(Debug, Clone, Default)]
pub struct DynamicAssociations {
    targets: BTreeSet<String>,
}

impl DynamicAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dynamic relationship for the given target label
    pub fn register(&mut self, target: impl Into<String>) -> Result<()> {
        let target = target.into();
        if !self.targets.insert(target.clone()) {
            return Err(Error::MultipleDynamicAssociation { target });
        }
        Ok(())
    }

    /// Check if a target label already has a dynamic relationship
    pub fn contains(&self, target: &str) -> bool {
        self.targets.contains(target)
    }
}

/// Return/with item: expression [AS alias]
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnItem {
    pub expression: Expression,
    pub alias: Option<String>,
}

impl ReturnItem {
    pub fn new(expression: Expression) -> Self {
        Self {
            expression,
            alias: None,
        }
    }

    pub fn aliased(expression: Expression, alias: impl Into<String>) -> Self {
        Self {
            expression,
            alias: Some(alias.into()),
        }
    }
}

/// Sort direction for ORDER BY items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Order item: expression [ASC|DESC]
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expression: Expression,
    pub direction: SortDirection,
}

/// Statement clauses. Each clause owns its expression and pattern nodes;
/// no clause is shared between two statements.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Match {
        optional: bool,
        patterns: Vec<PathPattern>,
    },
    Where(Expression),
    Return {
        distinct: bool,
        items: Vec<ReturnItem>,
    },
    Merge(Vec<PathPattern>),
    Create(Vec<PathPattern>),
    Delete {
        expressions: Vec<Expression>,
        detach: bool,
    },
    With {
        distinct: bool,
        items: Vec<ReturnItem>,
    },
    Unwind {
        source: Expression,
        variable: String,
    },
    OrderBy(Vec<OrderItem>),
}

/// One complete statement: an ordered sequence of clauses.
///
/// Immutable once built and free of execution state; the same statement
/// may be rendered and executed any number of times. Clause ordering is
/// validated by the renderer, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    clauses: Vec<Clause>,
}

impl Statement {
    pub fn new(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_rejects_unary_operator() {
        let err = Expression::binary(
            Expression::symbolic("a"),
            Operator::Not,
            Expression::symbolic("b"),
        )
        .unwrap_err();

        assert_eq!(
            err,
            Error::Arity {
                operator: "NOT".to_string(),
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_unary_rejects_binary_operator() {
        let err = Expression::unary(Operator::And, Expression::symbolic("a")).unwrap_err();

        assert_eq!(
            err,
            Error::Arity {
                operator: "AND".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_expression_list_equality_is_order_sensitive() {
        let ab = ExpressionList::new(vec![Expression::symbolic("a"), Expression::symbolic("b")]);
        let ba = ExpressionList::new(vec![Expression::symbolic("b"), Expression::symbolic("a")]);

        assert_ne!(ab, ba);
        assert_eq!(ab, ab.clone());
    }

    #[test]
    fn test_relationship_rejects_fixed_type_and_dynamic_target() {
        let err = RelationshipPattern::new(
            Direction::Outgoing,
            vec!["OWNS".to_string()],
            Some(Expression::parameter("relationships")),
        )
        .unwrap_err();

        assert_eq!(err, Error::ConflictingPattern);
    }

    #[test]
    fn test_relationship_allows_either_shape_alone() {
        let typed =
            RelationshipPattern::new(Direction::Outgoing, vec!["OWNS".to_string()], None).unwrap();
        assert!(!typed.is_dynamic());

        let dynamic = RelationshipPattern::new(
            Direction::Outgoing,
            Vec::new(),
            Some(Expression::parameter("relationships")),
        )
        .unwrap();
        assert!(dynamic.is_dynamic());
    }

    #[test]
    fn test_dynamic_associations_allow_one_per_target() {
        let mut associations = DynamicAssociations::new();

        associations.register("Bike").unwrap();
        associations.register("Trip").unwrap();

        let err = associations.register("Bike").unwrap_err();
        assert_eq!(
            err,
            Error::MultipleDynamicAssociation {
                target: "Bike".to_string(),
            }
        );
    }
}
