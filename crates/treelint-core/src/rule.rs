//! The rule plugin contract.

use crate::context::Context;
use crate::visitor::Visitor;

/// A boxed visitor created for one run.
pub type VisitorBox<'ast> = Box<dyn Visitor<'ast> + 'ast>;

/// A rule: a factory producing a fresh [`Visitor`] for each run.
///
/// `create` is called exactly once per run, before the traversal starts.
/// Rules must not keep mutable state of their own; anything a run needs
/// belongs in the visitor returned by `create`, which makes a rule reusable
/// across any number of runs.
///
/// # Example
///
/// ```ignore
/// use treelint_core::{Context, Node, Report, Rule, VisitCx, Visitor, VisitorBox};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "no-debugger" }
///
///     fn create<'ast>(&self, _ctx: &Context<'ast>) -> VisitorBox<'ast> {
///         Box::new(DebuggerVisitor)
///     }
/// }
///
/// struct DebuggerVisitor;
///
/// impl<'ast> Visitor<'ast> for DebuggerVisitor {
///     fn debugger_statement(&mut self, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>) {
///         cx.report(Report::new(node, "no-debugger"));
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-debugger").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Creates the visitor for one run.
    ///
    /// The context is the one the run reports into; it may already hold
    /// findings from earlier runs or from rules created before this one.
    fn create<'ast>(&self, context: &Context<'ast>) -> VisitorBox<'ast>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
