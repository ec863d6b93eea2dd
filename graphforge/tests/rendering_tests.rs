//! Statement rendering tests
//!
//! End-to-end checks that constructed statement trees render to the
//! expected query text and lifted parameters.

use graphforge::ast::{
    Clause, Direction, Expression, NodePattern, Operator, OrderItem, PathPattern, PatternElement,
    RelationshipPattern, ReturnItem, SortDirection, Statement,
};
use graphforge::{Error, Renderer, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn return_items(items: Vec<ReturnItem>) -> Clause {
    Clause::Return {
        distinct: false,
        items,
    }
}

#[test]
fn test_full_match_where_return_order_by() {
    init_logging();
    let user = NodePattern::labelled(["User"]).named("u").into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::node(user)],
        },
        Clause::Where(
            Expression::binary(
                Expression::property(Expression::symbolic("u"), "age"),
                Operator::GreaterEqual,
                Expression::literal(18i64),
            )
            .unwrap(),
        ),
        return_items(vec![ReturnItem::aliased(
            Expression::property(Expression::symbolic("u"), "name"),
            "name",
        )]),
        Clause::OrderBy(vec![OrderItem {
            expression: Expression::symbolic("name"),
            direction: SortDirection::Descending,
        }]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "MATCH (u:User) WHERE u.age >= 18 RETURN u.name AS name ORDER BY name DESC"
    );
    assert!(rendered.parameters.is_empty());
}

#[test]
fn test_rendering_is_deterministic_across_calls() {
    let bike = NodePattern::labelled(["Bike"]).into_node();
    let trip = NodePattern::labelled(["Trip"]).into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::node(bike.clone()), PathPattern::node(trip)],
        },
        Clause::With {
            distinct: false,
            items: vec![
                ReturnItem::new(Expression::symbolic("gf_0")),
                ReturnItem::new(Expression::symbolic("gf_1")),
            ],
        },
        return_items(vec![ReturnItem::new(Expression::symbolic("gf_0"))]),
    ]);

    let first = Renderer::render(&statement).unwrap();
    let second = Renderer::render(&statement).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.text,
        "MATCH (gf_0:Bike), (gf_1:Trip) WITH gf_0, gf_1 RETURN gf_0"
    );
}

#[test]
fn test_shared_node_keeps_one_alias_across_clauses() {
    let bike = NodePattern::labelled(["Bike"]).into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: true,
            patterns: vec![PathPattern::node(bike.clone())],
        },
        Clause::Merge(vec![PathPattern::node(bike)]),
        return_items(vec![ReturnItem::new(Expression::symbolic("gf_0"))]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "OPTIONAL MATCH (gf_0:Bike) MERGE (gf_0:Bike) RETURN gf_0"
    );
}

#[test]
fn test_create_delete_statement() {
    let user = NodePattern::labelled(["User"])
        .named("u")
        .property("name", Expression::parameter("name"))
        .into_node();
    let statement = Statement::new(vec![
        Clause::Create(vec![PathPattern::node(user)]),
        Clause::Delete {
            expressions: vec![Expression::symbolic("u")],
            detach: true,
        },
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "CREATE (u:User {name: $name}) DETACH DELETE u"
    );
}

#[test]
fn test_dynamic_relationship_with_unwind_companion() {
    let user = NodePattern::labelled(["User"]).named("u").into_node();
    let target = NodePattern::labelled(["Bike"]).named("b").into_node();
    let statement = Statement::new(vec![
        Clause::Unwind {
            source: Expression::parameter("relationships"),
            variable: "relationship".to_string(),
        },
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::new(vec![
                PatternElement::Node(user),
                PatternElement::Relationship(RelationshipPattern::dynamic(
                    Direction::Outgoing,
                    Expression::symbolic("relationship"),
                )),
                PatternElement::Node(target),
            ])],
        },
        return_items(vec![ReturnItem::new(Expression::symbolic("b"))]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "UNWIND $relationships AS relationship MATCH (u:User)-[gf_0]->(b:Bike) RETURN b"
    );
}

#[test]
fn test_incoming_and_undirected_relationships() {
    let a = NodePattern::labelled(["A"]).named("a").into_node();
    let b = NodePattern::labelled(["B"]).named("b").into_node();
    let c = NodePattern::labelled(["C"]).named("c").into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::new(vec![
                PatternElement::Node(a),
                PatternElement::Relationship(RelationshipPattern::typed(
                    Direction::Incoming,
                    ["KNOWS"],
                )),
                PatternElement::Node(b),
                PatternElement::Relationship(RelationshipPattern::typed(
                    Direction::Undirected,
                    ["LIKES", "FOLLOWS"],
                )),
                PatternElement::Node(c),
            ])],
        },
        return_items(vec![ReturnItem::new(Expression::symbolic("a"))]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "MATCH (a:A)<-[:KNOWS]-(b:B)-[:LIKES|FOLLOWS]-(c:C) RETURN a"
    );
}

#[test]
fn test_function_and_list_expressions() {
    let statement = Statement::new(vec![return_items(vec![
        ReturnItem::new(Expression::function(
            "coalesce",
            vec![
                Expression::property(Expression::symbolic("u"), "nickname"),
                Expression::literal_inline("unknown"),
            ],
        )),
        ReturnItem::new(Expression::list(vec![
            Expression::literal(1i64),
            Expression::literal(2i64),
            Expression::binary(
                Expression::symbolic("a"),
                Operator::Or,
                Expression::symbolic("b"),
            )
            .unwrap(),
        ])),
    ])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "RETURN coalesce(u.nickname, 'unknown'), [1, 2, a OR b]"
    );
}

#[test]
fn test_string_literals_become_distinct_parameters() {
    let statement = Statement::new(vec![return_items(vec![
        ReturnItem::new(Expression::literal("first")),
        ReturnItem::new(Expression::literal("second")),
    ])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(rendered.text, "RETURN $gfp_0, $gfp_1");
    assert_eq!(rendered.parameters.get("gfp_0"), Some(&Value::from("first")));
    assert_eq!(
        rendered.parameters.get("gfp_1"),
        Some(&Value::from("second"))
    );
}

#[test]
fn test_scalar_literals_render_inline() {
    let statement = Statement::new(vec![return_items(vec![
        ReturnItem::new(Expression::literal(42i64)),
        ReturnItem::new(Expression::literal(2.0f64)),
        ReturnItem::new(Expression::literal(true)),
        ReturnItem::new(Expression::Literal {
            value: graphforge::ast::Literal::Null,
            inline: false,
        }),
    ])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(rendered.text, "RETURN 42, 2.0, true, NULL");
    assert!(rendered.parameters.is_empty());
}

#[test]
fn test_property_access_on_operation_is_grouped() {
    let target = Expression::binary(
        Expression::symbolic("a"),
        Operator::Add,
        Expression::symbolic("b"),
    )
    .unwrap();
    let statement = Statement::new(vec![return_items(vec![ReturnItem::new(
        Expression::property(target, "size"),
    )])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(rendered.text, "RETURN (a + b).size");
}

#[test]
fn test_comparison_operands_never_chain() {
    let inner = Expression::binary(
        Expression::symbolic("a"),
        Operator::Equal,
        Expression::symbolic("b"),
    )
    .unwrap();
    let outer = Expression::binary(inner, Operator::Equal, Expression::symbolic("c")).unwrap();
    let statement = Statement::new(vec![return_items(vec![ReturnItem::new(outer)])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(rendered.text, "RETURN (a = b) = c");
}

#[test]
fn test_exponent_groups_to_the_right() {
    let left_deep = Expression::binary(
        Expression::binary(
            Expression::symbolic("a"),
            Operator::Exponent,
            Expression::symbolic("b"),
        )
        .unwrap(),
        Operator::Exponent,
        Expression::symbolic("c"),
    )
    .unwrap();
    let right_deep = Expression::binary(
        Expression::symbolic("a"),
        Operator::Exponent,
        Expression::binary(
            Expression::symbolic("b"),
            Operator::Exponent,
            Expression::symbolic("c"),
        )
        .unwrap(),
    )
    .unwrap();

    let statement = Statement::new(vec![return_items(vec![
        ReturnItem::new(left_deep),
        ReturnItem::new(right_deep),
    ])]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(rendered.text, "RETURN (a ^ b) ^ c, a ^ b ^ c");
}

#[test]
fn test_equal_precedence_right_operands_keep_grouping() {
    fn binary(left: Expression, operator: Operator, right: Expression) -> Expression {
        Expression::binary(left, operator, right).unwrap()
    }
    let a = || Expression::symbolic("a");
    let b = || Expression::symbolic("b");
    let c = || Expression::symbolic("c");

    // A different operator at equal precedence on the right would
    // re-parse left-grouped without parentheses
    let statement = Statement::new(vec![Clause::Return {
        distinct: false,
        items: vec![
            ReturnItem::new(binary(a(), Operator::Multiply, binary(b(), Operator::Divide, c()))),
            ReturnItem::new(binary(a(), Operator::Multiply, binary(b(), Operator::Modulo, c()))),
            ReturnItem::new(binary(a(), Operator::Add, binary(b(), Operator::Subtract, c()))),
            ReturnItem::new(binary(a(), Operator::Multiply, binary(b(), Operator::Multiply, c()))),
        ],
    }]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "RETURN a * (b / c), a * (b % c), a + (b - c), a * b * c"
    );
}

#[test]
fn test_backtick_escaping_flows_through_patterns() {
    let node = NodePattern::labelled(["Mountain Bike"])
        .named("das Rad")
        .property("first name", Expression::parameter("name"))
        .into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::node(node)],
        },
        return_items(vec![ReturnItem::new(Expression::symbolic("das Rad"))]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "MATCH (`das Rad`:`Mountain Bike` {`first name`: $name}) RETURN `das Rad`"
    );
}

#[test]
fn test_order_by_requires_return_or_with() {
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::node(
                NodePattern::labelled(["User"]).named("u").into_node(),
            )],
        },
        Clause::OrderBy(vec![OrderItem {
            expression: Expression::symbolic("u"),
            direction: SortDirection::Ascending,
        }]),
    ]);

    let err = Renderer::render(&statement).unwrap_err();
    assert!(matches!(err, Error::UnrenderableStatement(_)));
}

#[test]
fn test_where_after_with_is_accepted() {
    let user = NodePattern::labelled(["User"]).named("u").into_node();
    let statement = Statement::new(vec![
        Clause::Match {
            optional: false,
            patterns: vec![PathPattern::node(user)],
        },
        Clause::With {
            distinct: true,
            items: vec![ReturnItem::new(Expression::symbolic("u"))],
        },
        Clause::Where(
            Expression::binary(
                Expression::property(Expression::symbolic("u"), "active"),
                Operator::Equal,
                Expression::literal(true),
            )
            .unwrap(),
        ),
        return_items(vec![ReturnItem::new(Expression::symbolic("u"))]),
    ]);

    let rendered = Renderer::render(&statement).unwrap();
    assert_eq!(
        rendered.text,
        "MATCH (u:User) WITH DISTINCT u WHERE u.active = true RETURN u"
    );
}
