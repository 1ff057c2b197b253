use super::*;

fn node(id: &str, label: Option<&str>, node_type: NodeType) -> NodeDecl {
    NodeDecl { id: id.to_owned(), label: label.map(str::to_owned), node_type }
}

// =============================================================================
// NODE SEGMENTS
// =============================================================================

#[test]
fn parse_node_four_label_syntaxes() {
    assert_eq!(parse_node("A[Start]").unwrap(), node("A", Some("Start"), NodeType::Process));
    assert_eq!(parse_node("B(Work)").unwrap(), node("B", Some("Work"), NodeType::Subprocess));
    assert_eq!(parse_node("C{Ok?}").unwrap(), node("C", Some("Ok?"), NodeType::Decision));
    assert_eq!(parse_node("D>\"Flag\"]").unwrap(), node("D", Some("Flag"), NodeType::Default));
    assert_eq!(parse_node("E").unwrap(), node("E", None, NodeType::Default));
}

#[test]
fn parse_node_trims_label_and_segment() {
    let decl = parse_node("  A [  Spaced out  ]  ").unwrap();
    assert_eq!(decl, node("A", Some("Spaced out"), NodeType::Process));
}

#[test]
fn parse_node_quoted_label_keeps_delimiters() {
    let decl = parse_node(r#"A["Price (USD) ] total"]"#).unwrap();
    assert_eq!(decl.label.as_deref(), Some("Price (USD) ] total"));
    assert_eq!(decl.node_type, NodeType::Process);
}

#[test]
fn parse_node_strips_doubled_wrappers() {
    let circle = parse_node("A((circle))").unwrap();
    assert_eq!(circle, node("A", Some("circle"), NodeType::Subprocess));

    let stadium = parse_node("B([stadium])").unwrap();
    assert_eq!(stadium, node("B", Some("stadium"), NodeType::Subprocess));

    let hexagon = parse_node("C{{hex}}").unwrap();
    assert_eq!(hexagon, node("C", Some("hex"), NodeType::Decision));
}

#[test]
fn parse_node_keeps_unbalanced_inner_parens() {
    let decl = parse_node("A[(a) and (b)]").unwrap();
    assert_eq!(decl.label.as_deref(), Some("(a) and (b)"));
}

#[test]
fn parse_node_decodes_quote_entity() {
    let decl = parse_node(r#"A["say #quot;hi#quot;"]"#).unwrap();
    assert_eq!(decl.label.as_deref(), Some(r#"say "hi""#));
}

#[test]
fn parse_node_accepts_class_suffix() {
    let decl = parse_node("A[Start]:::highlight").unwrap();
    assert_eq!(decl, node("A", Some("Start"), NodeType::Process));
}

#[test]
fn parse_node_empty_label_falls_back_to_id() {
    let decl = parse_node("A[]").unwrap();
    assert_eq!(decl.text(), "A");
}

#[test]
fn parse_node_rejects_missing_identifier() {
    assert_eq!(
        parse_node("[Orphan]"),
        Err(LineError::MissingIdentifier { segment: "[Orphan]".to_owned() })
    );
    assert!(matches!(parse_node("   "), Err(LineError::MissingIdentifier { .. })));
}

#[test]
fn parse_node_rejects_unclosed_label() {
    assert_eq!(parse_node("A[Start"), Err(LineError::UnclosedLabel { open: '[' }));
    assert_eq!(parse_node("A{{x}"), Err(LineError::UnclosedLabel { open: '{' }));
    assert_eq!(parse_node(r#"A["never"#), Err(LineError::UnclosedLabel { open: '"' }));
}

#[test]
fn parse_node_rejects_trailing_input() {
    assert_eq!(
        parse_node("A[Start] extra"),
        Err(LineError::UnexpectedInput { found: "extra".to_owned() })
    );
    assert!(matches!(parse_node("A-B"), Err(LineError::UnexpectedInput { .. })));
}

#[test]
fn parse_node_rejects_unquoted_asymmetric_label() {
    assert!(matches!(parse_node("A>flag]"), Err(LineError::MalformedAsymmetricLabel { .. })));
}

#[test]
fn classify_by_brackets_prefers_square_then_round_then_curly() {
    assert_eq!(classify_by_brackets("x{y(z[w"), NodeType::Process);
    assert_eq!(classify_by_brackets("x{y(z"), NodeType::Subprocess);
    assert_eq!(classify_by_brackets("x{y"), NodeType::Decision);
    assert_eq!(classify_by_brackets("plain"), NodeType::Default);
}

// =============================================================================
// ARROWS AND EDGE LABELS
// =============================================================================

#[test]
fn split_arrows_handles_both_arrow_lengths() {
    assert_eq!(split_arrows("A-->B"), vec!["A", "B"]);
    assert_eq!(split_arrows("A->B"), vec!["A", "B"]);
    assert_eq!(split_arrows("A ---> B"), vec!["A ", " B"]);
}

#[test]
fn split_arrows_splits_chains() {
    assert_eq!(split_arrows("A-->B-->C"), vec!["A", "B", "C"]);
    assert_eq!(split_arrows("A -->|x| B -> C"), vec!["A ", "|x| B ", " C"]);
}

#[test]
fn split_arrows_ignores_arrows_inside_labels() {
    assert_eq!(split_arrows("A[a -> b] --> B"), vec!["A[a -> b] ", " B"]);
    assert_eq!(split_arrows("A -->|go -> now| B"), vec!["A ", "|go -> now| B"]);
    assert_eq!(split_arrows(r#"A>"x-->y"]"#), vec![r#"A>"x-->y"]"#]);
}

#[test]
fn take_edge_label_extracts_and_trims() {
    let (label, rest) = take_edge_label("| Yes | B(Process)").unwrap();
    assert_eq!(label.as_deref(), Some("Yes"));
    assert_eq!(rest.trim(), "B(Process)");
}

#[test]
fn take_edge_label_blank_is_none() {
    let (label, rest) = take_edge_label("|  |B").unwrap();
    assert_eq!(label, None);
    assert_eq!(rest, "B");
}

#[test]
fn take_edge_label_ignores_pipes_inside_node_labels() {
    let (label, rest) = take_edge_label("B[a | b]").unwrap();
    assert_eq!(label, None);
    assert_eq!(rest, "B[a | b]");
}

#[test]
fn take_edge_label_rejects_unclosed() {
    assert_eq!(take_edge_label("|Yes B"), Err(LineError::UnclosedEdgeLabel));
}

// =============================================================================
// STATEMENTS
// =============================================================================

#[test]
fn split_statements_on_top_level_semicolons() {
    assert_eq!(split_statements("graph TD;A-->B;B-->C;"), vec!["graph TD", "A-->B", "B-->C"]);
    assert_eq!(split_statements(r#"A["x;y"] --> B"#), vec![r#"A["x;y"] --> B"#]);
}

#[test]
fn classify_header_only_when_allowed() {
    assert_eq!(classify("graph TD", true).unwrap(), Statement::Header(Some(Direction::TopDown)));
    assert_eq!(classify("flowchart lr", true).unwrap(), Statement::Header(Some(Direction::LeftRight)));
    assert_eq!(classify("graph", true).unwrap(), Statement::Header(None));
    assert_eq!(classify("graph TD", false).unwrap(), Statement::Directive("graph".to_owned()));
}

#[test]
fn classify_directives() {
    assert_eq!(classify("subgraph One", false).unwrap(), Statement::Directive("subgraph".to_owned()));
    assert_eq!(classify("end", false).unwrap(), Statement::Directive("end".to_owned()));
    assert_eq!(
        classify("classDef hot fill:#f00", false).unwrap(),
        Statement::Directive("classDef".to_owned())
    );
    assert_eq!(classify("style A fill:#eee", false).unwrap(), Statement::Directive("style".to_owned()));
}

#[test]
fn classify_keywords_are_case_sensitive() {
    assert_eq!(classify("End", false).unwrap(), Statement::Node(node("End", None, NodeType::Default)));
    assert_eq!(classify("Graph", true).unwrap(), Statement::Node(node("Graph", None, NodeType::Default)));
    assert!(matches!(classify("classdef hot fill:#f00", false), Err(LineError::UnexpectedInput { .. })));
}

#[test]
fn classify_keyword_followed_by_arrow_is_a_chain() {
    assert_eq!(classify("end --> B", false).unwrap(), Statement::Chain {
        head: node("end", None, NodeType::Default),
        hops: vec![Hop { label: None, target: node("B", None, NodeType::Default) }],
    });
    assert!(matches!(classify("graph --> Render", true).unwrap(), Statement::Chain { .. }));
}

#[test]
fn classify_identifier_starting_with_keyword_is_a_node() {
    assert_eq!(classify("endpoint-->B", false).unwrap(), Statement::Chain {
        head: node("endpoint", None, NodeType::Default),
        hops: vec![Hop { label: None, target: node("B", None, NodeType::Default) }],
    });
}

#[test]
fn classify_labeled_edge() {
    let stmt = classify("A{Decision} -->|Yes| B(Process)", false).unwrap();
    assert_eq!(stmt, Statement::Chain {
        head: node("A", Some("Decision"), NodeType::Decision),
        hops: vec![Hop {
            label: Some("Yes".to_owned()),
            target: node("B", Some("Process"), NodeType::Subprocess),
        }],
    });
}

#[test]
fn classify_chain_with_per_hop_labels() {
    let Statement::Chain { head, hops } = classify("A -->|one| B -->|two| C[End]", false).unwrap() else {
        panic!("expected chain");
    };
    assert_eq!(head.id, "A");
    assert_eq!(hops.len(), 2);
    assert_eq!(hops[0].label.as_deref(), Some("one"));
    assert_eq!(hops[0].target.id, "B");
    assert_eq!(hops[1].label.as_deref(), Some("two"));
    assert_eq!(hops[1].target, node("C", Some("End"), NodeType::Process));
}

#[test]
fn classify_edge_missing_target_fails() {
    assert!(matches!(classify("A -->", false), Err(LineError::MissingIdentifier { .. })));
    assert!(matches!(classify("--> B", false), Err(LineError::MissingIdentifier { .. })));
}
