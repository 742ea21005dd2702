//! Per-kind callbacks that rules hand to the dispatch engine.

use crate::context::{Context, Report};
use crate::tree::{Node, NodeKind};
use crate::walker::{Edge, WalkControl};

/// What a visitor callback can see and do at the current node.
///
/// One `VisitCx` is shared by all visitors for a single traversal event, so
/// a skip requested by one rule applies to every rule in the pass.
pub struct VisitCx<'v, 'ast> {
    edge: Option<Edge<'ast>>,
    context: &'v mut Context<'ast>,
    control: WalkControl,
}

impl<'v, 'ast> VisitCx<'v, 'ast> {
    pub(crate) fn new(edge: Option<Edge<'ast>>, context: &'v mut Context<'ast>) -> Self {
        Self {
            edge,
            context,
            control: WalkControl::Continue,
        }
    }

    /// How the current node was reached; `None` at the root.
    #[must_use]
    pub fn edge(&self) -> Option<Edge<'ast>> {
        self.edge
    }

    /// The parent of the current node; `None` at the root.
    #[must_use]
    pub fn parent(&self) -> Option<&'ast Node> {
        self.edge.map(|e| e.parent)
    }

    /// Name of the parent field holding the current node.
    #[must_use]
    pub fn field(&self) -> Option<&'ast str> {
        self.edge.map(|e| e.field)
    }

    /// Index within the parent field, when that field is an array.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.edge.and_then(|e| e.index)
    }

    /// Records a finding in the run's context.
    pub fn report(&mut self, report: Report<'ast>) {
        self.context.report(report);
    }

    /// Reports made so far in this run, including those of other rules.
    #[must_use]
    pub fn reports(&self) -> &[Report<'ast>] {
        self.context.reports()
    }

    /// Stops the traversal from descending below the current node.
    ///
    /// This affects every rule sharing the pass, not only the caller.
    /// Has no effect from [`Visitor::leave`].
    pub fn skip_children(&mut self) {
        self.control = WalkControl::SkipChildren;
    }

    /// The traversal decision accumulated for this event.
    #[must_use]
    pub fn control(&self) -> WalkControl {
        self.control
    }
}

macro_rules! define_visitor {
    ($($variant:ident => $method:ident [$($key:literal),*]),* $(,)?) => {
        /// Callbacks a rule registers for one run.
        ///
        /// Each method fires when the traversal enters a node of the matching
        /// kind; all default to no-ops. Visitors are created per run by
        /// [`Rule::create`](crate::Rule::create), so any state they keep is
        /// private to that run.
        pub trait Visitor<'ast> {
            $(
                #[doc = concat!("Called when entering a `", stringify!($variant), "` node.")]
                fn $method(&mut self, _node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {}
            )*

            /// Called when entering a node whose tag is not in the known set.
            fn other(&mut self, _node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {}

            /// Called after all of a node's children have been visited, for
            /// every node kind.
            fn leave(&mut self, _node: &'ast Node, _cx: &mut VisitCx<'_, 'ast>) {}
        }

        /// Routes an enter event to the visitor method for the node's kind.
        pub fn dispatch_enter<'ast, V>(visitor: &mut V, node: &'ast Node, cx: &mut VisitCx<'_, 'ast>)
        where
            V: Visitor<'ast> + ?Sized,
        {
            match node.kind() {
                $(NodeKind::$variant => visitor.$method(node, cx),)*
                NodeKind::Other(_) => visitor.other(node, cx),
            }
        }
    };
}

with_node_kinds!(define_visitor);
