//! Rule to forbid `debugger` statements.

use treelint_core::{Context, Node, Report, Rule, VisitCx, Visitor, VisitorBox};

/// Rule name for no-debugger.
pub const NAME: &str = "no-debugger";

/// Forbids `debugger;`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebugger;

impl NoDebugger {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoDebugger {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids debugger statements"
    }

    fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
        Box::new(DebuggerVisitor)
    }
}

struct DebuggerVisitor;

impl<'ast> Visitor<'ast> for DebuggerVisitor {
    fn debugger_statement(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
        cx.report(Report::new(node, NAME));
    }
}
