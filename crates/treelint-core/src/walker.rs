//! Generic depth-first traversal with enter/leave hooks.
//!
//! The walker is public so that rules can start a sub-walk over a subtree
//! they are interested in (e.g. everything under an `async` function).

use crate::tree::Node;

/// How a node was reached from its parent.
///
/// For every edge, `parent`'s field `field` holds the node, at position
/// `index` when that field is an array. The root has no edge.
#[derive(Debug, Clone, Copy)]
pub struct Edge<'ast> {
    /// The parent node.
    pub parent: &'ast Node,
    /// Name of the parent's field holding the node.
    pub field: &'ast str,
    /// Index within the field, if the field is an array.
    pub index: Option<usize>,
}

/// What the walker should do after an `enter` event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WalkControl {
    /// Descend into the node's children.
    #[default]
    Continue,
    /// Do not visit the node's descendants. `leave` still fires for the
    /// node itself.
    SkipChildren,
}

/// Receives traversal events.
pub trait Listener<'ast> {
    /// Called before any of `node`'s children are visited.
    fn enter(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) -> WalkControl {
        let _ = (node, edge);
        WalkControl::Continue
    }

    /// Called after all of `node`'s children have been visited.
    fn leave(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) {
        let _ = (node, edge);
    }
}

enum Frame<'ast> {
    Enter(&'ast Node, Option<Edge<'ast>>),
    Leave(&'ast Node, Option<Edge<'ast>>),
}

/// Walks the tree rooted at `root` depth-first.
///
/// `enter` fires in pre-order and `leave` in post-order. Children are visited
/// field by field in the node's field order, array fields element by element.
/// The walk uses an explicit stack, so tree depth is bounded by memory rather
/// than by the call stack. The tree is owned top-down and therefore acyclic.
pub fn walk<'ast, L>(root: &'ast Node, listener: &mut L)
where
    L: Listener<'ast> + ?Sized,
{
    let mut stack = vec![Frame::Enter(root, None)];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(node, edge) => {
                let control = listener.enter(node, edge);
                stack.push(Frame::Leave(node, edge));
                if control == WalkControl::Continue {
                    let first_child = stack.len();
                    stack.extend(
                        node.children()
                            .map(|(edge, child)| Frame::Enter(child, Some(edge))),
                    );
                    stack[first_child..].reverse();
                }
            }
            Frame::Leave(node, edge) => listener.leave(node, edge),
        }
    }
}

struct FnListener<E, L> {
    enter: E,
    leave: L,
}

impl<'ast, E, L> Listener<'ast> for FnListener<E, L>
where
    E: FnMut(&'ast Node, Option<Edge<'ast>>) -> WalkControl,
    L: FnMut(&'ast Node, Option<Edge<'ast>>),
{
    fn enter(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) -> WalkControl {
        (self.enter)(node, edge)
    }

    fn leave(&mut self, node: &'ast Node, edge: Option<Edge<'ast>>) {
        (self.leave)(node, edge);
    }
}

/// Walks the tree with a pair of closures.
///
/// Pass `|_, _| WalkControl::Continue` or `|_, _| {}` for a hook you do not
/// need.
pub fn walk_with<'ast, E, L>(root: &'ast Node, enter: E, leave: L)
where
    E: FnMut(&'ast Node, Option<Edge<'ast>>) -> WalkControl,
    L: FnMut(&'ast Node, Option<Edge<'ast>>),
{
    walk(root, &mut FnListener { enter, leave });
}
