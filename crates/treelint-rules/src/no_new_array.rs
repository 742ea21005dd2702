//! Rule to forbid the `Array` constructor.
//!
//! # Rationale
//!
//! `new Array(n)` creates a sparse array of length `n`, while `new Array(a, b)`
//! creates `[a, b]`. Array literals avoid the ambiguity.
//!
//! # Detected Patterns
//!
//! - `new Array()`
//! - `new Array(3)`
//!
//! # Allowed Patterns
//!
//! - `[]`, `Array.from(...)`, `new Foo.Array()`

use treelint_core::{Context, Node, Report, Rule, VisitCx, Visitor, VisitorBox};

/// Rule name for no-new-array.
pub const NAME: &str = "no-new-array";

/// Forbids `new Array(...)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNewArray;

impl NoNewArray {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for NoNewArray {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Forbids the Array constructor; use array literals instead"
    }

    fn create<'ast>(&self, _context: &Context<'ast>) -> VisitorBox<'ast> {
        Box::new(NewArrayVisitor)
    }
}

struct NewArrayVisitor;

impl<'ast> Visitor<'ast> for NewArrayVisitor {
    fn new_expression(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
        if node.child("callee").is_some_and(|c| c.is_identifier("Array")) {
            cx.report(Report::new(node, NAME));
        }
    }
}
