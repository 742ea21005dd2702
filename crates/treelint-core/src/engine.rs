//! Single-pass dispatch of many rules over one tree.
//!
//! Instead of each rule walking the tree separately, the engine walks once
//! and offers every node to every rule's visitor.
//!
//! Skip requests are scoped to the traversal, not to the rule: when any
//! visitor calls [`VisitCx::skip_children`], no rule in the pass sees that
//! subtree. Rules that need to see a whole subtree regardless of what other
//! rules do must walk it themselves with [`walk`](crate::walk).

use crate::context::Context;
use crate::rule::{RuleBox, VisitorBox};
use crate::tree::Node;
use crate::visitor::{dispatch_enter, VisitCx};
use crate::walker::{walk, Edge, Listener, WalkControl};

use tracing::trace;

/// Runs `rules` over `root` with a fresh context and returns it.
#[must_use]
pub fn run_rules<'ast>(root: &'ast Node, rules: &[RuleBox]) -> Context<'ast> {
    let mut context = Context::new();
    run_rules_with(root, rules, &mut context);
    context
}

/// Runs `rules` over `root`, appending reports to an existing context.
///
/// Reports are appended in the order callbacks fire: node-visit order, then
/// rule-list order within a node. Earlier reports in `context` are kept.
pub fn run_rules_with<'ast>(root: &'ast Node, rules: &[RuleBox], context: &mut Context<'ast>) {
    let visitors: Vec<VisitorBox<'ast>> = rules.iter().map(|rule| rule.create(&*context)).collect();

    trace!(
        "Dispatching {} rule(s) over {} tree",
        visitors.len(),
        root.kind()
    );

    let mut dispatcher = Dispatcher { visitors, context };
    walk(root, &mut dispatcher);
}

struct Dispatcher<'c, 'ast> {
    visitors: Vec<VisitorBox<'ast>>,
    context: &'c mut Context<'ast>,
}

impl<'ast> Listener<'ast> for Dispatcher<'_, 'ast> {
    fn enter(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) -> WalkControl {
        let mut cx = VisitCx::new(edge, &mut *self.context);
        for visitor in &mut self.visitors {
            dispatch_enter(&mut **visitor, node, &mut cx);
        }
        cx.control()
    }

    fn leave(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) {
        let mut cx = VisitCx::new(edge, &mut *self.context);
        for visitor in &mut self.visitors {
            visitor.leave(node, &mut cx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Report;
    use crate::rule::Rule;
    use crate::visitor::Visitor;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// `const x = new Array();` as produced by an ESTree parser.
    fn new_array_script() -> Node {
        Node::from_value(json!({
            "type": "Program",
            "sourceType": "script",
            "body": [{
                "type": "VariableDeclaration",
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": { "type": "Identifier", "name": "x" },
                    "init": {
                        "type": "NewExpression",
                        "callee": { "type": "Identifier", "name": "Array" },
                        "arguments": []
                    }
                }]
            }]
        }))
        .expect("tree should parse")
    }

    fn script_with_literal(text: &str) -> Node {
        Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "VariableDeclaration",
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "id": { "type": "Identifier", "name": "x" },
                    "init": { "type": "Literal", "value": text }
                }]
            }]
        }))
        .expect("tree should parse")
    }

    struct EmptyRule;

    struct EmptyVisitor;

    impl Visitor<'_> for EmptyVisitor {}

    impl Rule for EmptyRule {
        fn name(&self) -> &'static str {
            "empty"
        }

        fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
            Box::new(EmptyVisitor)
        }
    }

    struct NewExprRule;

    struct NewExprVisitor;

    impl<'ast> Visitor<'ast> for NewExprVisitor {
        fn new_expression(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            cx.report(Report::new(node, "new-expr"));
        }
    }

    impl Rule for NewExprRule {
        fn name(&self) -> &'static str {
            "new-expr"
        }

        fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
            Box::new(NewExprVisitor)
        }
    }

    struct ProgramRule;

    struct ProgramVisitor;

    impl<'ast> Visitor<'ast> for ProgramVisitor {
        fn program(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            cx.report(Report::new(node, "found-program"));
        }
    }

    impl Rule for ProgramRule {
        fn name(&self) -> &'static str {
            "found-program"
        }

        fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
            Box::new(ProgramVisitor)
        }
    }

    /// Logs every event under its own tag and optionally skips one kind.
    struct Tracing {
        tag: &'static str,
        skip: Option<&'static str>,
        log: Arc<Mutex<Vec<String>>>,
    }

    struct TracingVisitor {
        tag: &'static str,
        skip: Option<&'static str>,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl TracingVisitor {
        fn push(&self, event: String) {
            self.log.lock().expect("log lock").push(event);
        }

        fn on_enter(&mut self, node: &Node, cx: &mut VisitCx<'_, '_>) {
            self.push(format!("{} enter {}", self.tag, node.kind()));
            if self.skip == Some(node.kind().as_str()) {
                cx.skip_children();
            }
        }
    }

    impl<'ast> Visitor<'ast> for TracingVisitor {
        fn program(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            self.on_enter(node, cx);
        }

        fn variable_declaration(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            self.on_enter(node, cx);
        }

        fn variable_declarator(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            self.on_enter(node, cx);
        }

        fn new_expression(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
            self.on_enter(node, cx);
        }

        fn leave(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
            if node.is(&crate::NodeKind::Identifier) {
                return;
            }
            self.push(format!("{} leave {}", self.tag, node.kind()));
        }
    }

    impl Rule for Tracing {
        fn name(&self) -> &'static str {
            self.tag
        }

        fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
            Box::new(TracingVisitor {
                tag: self.tag,
                skip: self.skip,
                log: Arc::clone(&self.log),
            })
        }
    }

    fn logged(rules: &[RuleBox], log: &Arc<Mutex<Vec<String>>>, tree: &Node) -> Vec<String> {
        log.lock().expect("log lock").clear();
        let _ = run_rules(tree, rules);
        log.lock().expect("log lock").clone()
    }

    #[test]
    fn test_empty_visitor_reports_nothing() {
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![Box::new(EmptyRule)];
        assert!(run_rules(&tree, &rules).is_empty());
    }

    #[test]
    fn test_single_match_dispatch() {
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![Box::new(NewExprRule)];
        let ctx = run_rules(&tree, &rules);

        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.reports()[0].node.kind(), &crate::NodeKind::NewExpression);
        assert_eq!(ctx.reports()[0].check_id, "new-expr");
    }

    #[test]
    fn test_existing_context_accumulates() {
        let first = script_with_literal("low gravitas warning signal");
        let second = script_with_literal("very little gravitas indeed");
        let rules: Vec<RuleBox> = vec![Box::new(ProgramRule)];

        let mut ctx = Context::new();
        run_rules_with(&first, &rules, &mut ctx);
        assert_eq!(ctx.len(), 1);
        run_rules_with(&second, &rules, &mut ctx);
        assert_eq!(ctx.len(), 2);

        assert!(std::ptr::eq(ctx.reports()[0].node, &first));
        assert!(std::ptr::eq(ctx.reports()[1].node, &second));
    }

    #[test]
    fn test_fresh_contexts_are_isolated() {
        let first = script_with_literal("a");
        let second = script_with_literal("b");
        let rules: Vec<RuleBox> = vec![Box::new(ProgramRule)];

        let a = run_rules(&first, &rules);
        let b = run_rules(&second, &rules);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!(std::ptr::eq(b.reports()[0].node, &second));
    }

    #[test]
    fn test_reports_interleave_by_node_then_rule() {
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![Box::new(NewExprRule), Box::new(ProgramRule)];
        let ids: Vec<String> = run_rules(&tree, &rules)
            .reports()
            .iter()
            .map(|r| r.check_id.clone())
            .collect();
        // Program is entered before the NewExpression below it.
        assert_eq!(ids, vec!["found-program", "new-expr"]);
    }

    #[test]
    fn test_callbacks_fire_in_rule_order_within_a_node() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![
            Box::new(Tracing {
                tag: "a",
                skip: None,
                log: Arc::clone(&log),
            }),
            Box::new(Tracing {
                tag: "b",
                skip: None,
                log: Arc::clone(&log),
            }),
        ];

        let events = logged(&rules, &log, &tree);
        assert_eq!(
            events,
            vec![
                "a enter Program",
                "b enter Program",
                "a enter VariableDeclaration",
                "b enter VariableDeclaration",
                "a enter VariableDeclarator",
                "b enter VariableDeclarator",
                "a enter NewExpression",
                "b enter NewExpression",
                "a leave NewExpression",
                "b leave NewExpression",
                "a leave VariableDeclarator",
                "b leave VariableDeclarator",
                "a leave VariableDeclaration",
                "b leave VariableDeclaration",
                "a leave Program",
                "b leave Program",
            ]
        );
    }

    #[test]
    fn test_skip_from_one_rule_hides_subtree_from_all() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![
            Box::new(Tracing {
                tag: "a",
                skip: Some("VariableDeclarator"),
                log: Arc::clone(&log),
            }),
            Box::new(Tracing {
                tag: "b",
                skip: None,
                log: Arc::clone(&log),
            }),
        ];

        let events = logged(&rules, &log, &tree);
        // b still sees the skipped node itself, but nothing below it.
        assert!(events.contains(&"b enter VariableDeclarator".to_string()));
        assert!(events.contains(&"b leave VariableDeclarator".to_string()));
        assert!(!events.iter().any(|e| e.contains("NewExpression")));
    }

    #[test]
    fn test_skip_hides_subtree_from_reports() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![
            Box::new(Tracing {
                tag: "skipper",
                skip: Some("VariableDeclaration"),
                log,
            }),
            Box::new(NewExprRule),
        ];
        assert!(run_rules(&tree, &rules).is_empty());
    }

    #[test]
    fn test_unknown_kind_is_traversed() {
        let tree = Node::from_value(json!({
            "type": "Program",
            "body": [{
                "type": "JSXExpressionContainer",
                "expression": {
                    "type": "NewExpression",
                    "callee": { "type": "Identifier", "name": "Foo" },
                    "arguments": []
                }
            }]
        }))
        .expect("tree should parse");

        let rules: Vec<RuleBox> = vec![Box::new(NewExprRule)];
        assert_eq!(run_rules(&tree, &rules).len(), 1);
    }

    #[test]
    fn test_create_sees_the_run_context() {
        struct Observer {
            seen: Arc<Mutex<Vec<usize>>>,
        }

        impl Rule for Observer {
            fn name(&self) -> &'static str {
                "observer"
            }

            fn create<'ast>(&self, context: &Context<'ast>) -> VisitorBox<'ast> {
                self.seen.lock().expect("lock").push(context.len());
                Box::new(EmptyVisitor)
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let tree = new_array_script();
        let rules: Vec<RuleBox> = vec![
            Box::new(NewExprRule),
            Box::new(Observer {
                seen: Arc::clone(&seen),
            }),
        ];

        let mut ctx = Context::new();
        run_rules_with(&tree, &rules, &mut ctx);
        run_rules_with(&tree, &rules, &mut ctx);

        assert_eq!(*seen.lock().expect("lock"), vec![0, 1]);
        assert_eq!(ctx.len(), 2);
    }
}
