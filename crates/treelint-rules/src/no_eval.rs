//! Rule to forbid calls to `eval` and similar functions.
//!
//! # Detected Patterns
//!
//! - `eval(code)`
//! - Calls to any identifier listed in `callees`
//!
//! # Allowed Patterns
//!
//! - Member calls such as `obj.eval(code)`
//!
//! # Configuration
//!
//! - `callees`: Function names to forbid (default: `["eval"]`)
//!
//! The reported name is attached as `{"callee": name}`.

use serde_json::json;
use treelint_core::{
    Context, Node, NodeKind, Report, Rule, RuleConfig, VisitCx, Visitor, VisitorBox,
};

/// Rule name for no-eval.
pub const NAME: &str = "no-eval";

/// Forbids direct calls to code-evaluating functions.
#[derive(Debug, Clone)]
pub struct NoEval {
    /// Function names to forbid.
    pub callees: Vec<String>,
}

impl Default for NoEval {
    fn default() -> Self {
        Self::new()
    }
}

impl NoEval {
    /// Creates a new rule forbidding `eval`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            callees: vec!["eval".to_string()],
        }
    }

    /// Replaces the forbidden function names.
    #[must_use]
    pub fn callees(mut self, names: &[&str]) -> Self {
        self.callees = names.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Creates the rule from its `[rules.no-eval]` table.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let callees = config.get_str_array("callees");
        if callees.is_empty() {
            Self::new()
        } else {
            Self { callees }
        }
    }
}

impl Rule for NoEval {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids calls to eval and other configured functions"
    }

    fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
        Box::new(EvalVisitor {
            callees: self.callees.clone(),
        })
    }
}

struct EvalVisitor {
    callees: Vec<String>,
}

impl<'ast> Visitor<'ast> for EvalVisitor {
    fn call_expression(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
        let Some(name) = node
            .child("callee")
            .filter(|c| c.is(&NodeKind::Identifier))
            .and_then(|c| c.str_attr("name"))
        else {
            return;
        };

        if self.callees.iter().any(|c| c == name) {
            cx.report(Report::new(node, NAME).with_extra(json!({ "callee": name })));
        }
    }
}
