//! Rule to forbid `await` inside loop bodies.
//!
//! # Rationale
//!
//! Awaiting on every iteration serializes work that could usually run
//! concurrently with `Promise.all`.
//!
//! # Detected Patterns
//!
//! - `await` in the body, test or update of `for`, `while` and `do`/`while`
//! - `await` in the body of `for`/`in` and `for`/`of`
//! - `await` in the head of a loop that is itself inside another loop's body
//!
//! # Allowed Patterns
//!
//! - `await` in a `for` initializer or in the iterated expression of
//!   `for`/`in` and `for`/`of`
//! - `await` inside a function nested in a loop
//! - `for await (...)`, which is not treated as a loop of its own

use treelint_core::{Context, Node, Report, Rule, VisitCx, Visitor, VisitorBox};

/// Rule name for no-await-in-loop.
pub const NAME: &str = "no-await-in-loop";

/// Forbids `await` expressions that run once per loop iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAwaitInLoop;

impl NoAwaitInLoop {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoAwaitInLoop {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids await inside loop bodies"
    }

    fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
        Box::new(AwaitInLoopVisitor { scopes: Vec::new() })
    }
}

/// An enclosing loop or function.
enum Scope<'ast> {
    Loop {
        node: &'ast Node,
        /// Field whose subtree ends the loop head; `None` if the loop has no
        /// head and every child runs per iteration.
        head_end: Option<&'static str>,
        in_body: bool,
    },
    Function {
        node: &'ast Node,
    },
}

impl<'ast> Scope<'ast> {
    fn node(&self) -> &'ast Node {
        match self {
            Self::Loop { node, .. } | Self::Function { node } => *node,
        }
    }
}

struct AwaitInLoopVisitor<'ast> {
    scopes: Vec<Scope<'ast>>,
}

impl<'ast> AwaitInLoopVisitor<'ast> {
    fn enter_loop(&mut self, node: &'ast Node, head_end: Option<&'static str>) {
        let head_end = head_end.filter(|field| node.child(field).is_some());
        self.scopes.push(Scope::Loop {
            node,
            head_end,
            in_body: head_end.is_none(),
        });
    }

    fn enter_function(&mut self, node: &'ast Node) {
        self.scopes.push(Scope::Function { node });
    }

    /// Whether code at the current position runs once per iteration of some
    /// loop in the innermost function.
    fn runs_per_iteration(&self) -> bool {
        self.scopes
            .iter()
            .rev()
            .take_while(|s| matches!(s, Scope::Loop { .. }))
            .any(|s| matches!(s, Scope::Loop { in_body: true, .. }))
    }
}

impl<'ast> Visitor<'ast> for AwaitInLoopVisitor<'ast> {
    fn for_statement(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_loop(node, Some("init"));
    }

    fn for_in_statement(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_loop(node, Some("right"));
    }

    fn for_of_statement(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        if node.bool_attr("await") != Some(true) {
            self.enter_loop(node, Some("right"));
        }
    }

    fn while_statement(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_loop(node, None);
    }

    fn do_while_statement(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_loop(node, None);
    }

    fn function_declaration(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_function(node);
    }

    fn function_expression(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_function(node);
    }

    fn arrow_function_expression(&mut self, node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {
        self.enter_function(node);
    }

    fn await_expression(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
        if self.runs_per_iteration() {
            cx.report(Report::new(node, NAME));
        }
    }

    fn leave(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
        if self.scopes.last().is_some_and(|s| std::ptr::eq(s.node(), node)) {
            self.scopes.pop();
            return;
        }

        // Leaving the last head child means the per-iteration part begins.
        if let Some(Scope::Loop {
            node: loop_node,
            head_end: Some(head_end),
            in_body,
        }) = self.scopes.last_mut()
        {
            let from_loop = cx.parent().is_some_and(|p| std::ptr::eq(p, *loop_node));
            if from_loop && cx.field() == Some(*head_end) {
                *in_body = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use treelint_core::{run_rules, RuleBox};

    fn await_expr(name: &str) -> Value {
        json!({
            "type": "AwaitExpression",
            "argument": {
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": name },
                "arguments": []
            }
        })
    }

    fn stmt(expr: Value) -> Value {
        json!({ "type": "ExpressionStatement", "expression": expr })
    }

    fn block(body: Vec<Value>) -> Value {
        json!({ "type": "BlockStatement", "body": body })
    }

    /// Returns the callee names of the reported awaits.
    fn check(tree: Value) -> Vec<String> {
        let tree = Node::from_value(tree).expect("Failed to parse");
        let rules: Vec<RuleBox> = vec![Box::new(NoAwaitInLoop::new())];
        run_rules(&tree, &rules)
            .reports()
            .iter()
            .filter_map(|r| {
                r.node
                    .child("argument")
                    .and_then(|c| c.child("callee"))
                    .and_then(|c| c.str_attr("name"))
                    .map(String::from)
            })
            .collect()
    }

    #[test]
    fn test_detects_await_in_for_body() {
        let reports = check(json!({
            "type": "ForStatement",
            "init": await_expr("init"),
            "test": await_expr("test"),
            "update": await_expr("update"),
            "body": block(vec![stmt(await_expr("body"))])
        }));
        assert_eq!(reports, vec!["test", "update", "body"]);
    }

    #[test]
    fn test_for_of_iterated_expression_is_allowed() {
        let reports = check(json!({
            "type": "ForOfStatement",
            "await": false,
            "left": { "type": "Identifier", "name": "x" },
            "right": await_expr("items"),
            "body": block(vec![stmt(await_expr("each"))])
        }));
        assert_eq!(reports, vec!["each"]);
    }

    #[test]
    fn test_while_and_do_while() {
        let reports = check(json!({
            "type": "Program",
            "body": [
                { "type": "WhileStatement", "test": await_expr("w"), "body": block(vec![]) },
                {
                    "type": "DoWhileStatement",
                    "body": block(vec![stmt(await_expr("d"))]),
                    "test": { "type": "Literal", "value": false, "raw": "false" }
                },
                stmt(await_expr("outside"))
            ]
        }));
        assert_eq!(reports, vec!["w", "d"]);
    }

    #[test]
    fn test_nested_function_is_a_boundary() {
        let reports = check(json!({
            "type": "WhileStatement",
            "test": { "type": "Identifier", "name": "running" },
            "body": block(vec![stmt(json!({
                "type": "ArrowFunctionExpression",
                "params": [],
                "async": true,
                "expression": true,
                "body": await_expr("inner")
            })), stmt(await_expr("after"))])
        }));
        assert_eq!(reports, vec!["after"]);
    }

    #[test]
    fn test_for_await_is_not_a_loop() {
        let for_await = json!({
            "type": "ForOfStatement",
            "await": true,
            "left": { "type": "Identifier", "name": "chunk" },
            "right": { "type": "Identifier", "name": "stream" },
            "body": block(vec![stmt(await_expr("write"))])
        });
        assert!(check(for_await.clone()).is_empty());

        let nested = json!({
            "type": "WhileStatement",
            "test": { "type": "Identifier", "name": "again" },
            "body": block(vec![for_await])
        });
        assert_eq!(check(nested), vec!["write"]);
    }

    #[test]
    fn test_inner_loop_head_inside_outer_body() {
        let reports = check(json!({
            "type": "ForOfStatement",
            "await": false,
            "left": { "type": "Identifier", "name": "a" },
            "right": { "type": "Identifier", "name": "as" },
            "body": {
                "type": "ForStatement",
                "init": await_expr("inner-init"),
                "test": null,
                "update": null,
                "body": block(vec![])
            }
        }));
        assert_eq!(reports, vec!["inner-init"]);
    }
}
