//! Finding accumulation for rule runs.

use crate::tree::Node;
use serde_json::Value;

/// A finding tied to the node that triggered it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'ast> {
    /// The node at which the rule triggered.
    pub node: &'ast Node,
    /// Identifier of what was found (e.g. `"no-eval"`).
    pub check_id: String,
    /// Opaque payload passed through to the external result unchanged.
    pub extra: Option<Value>,
}

impl<'ast> Report<'ast> {
    /// Creates a report with no extra payload.
    #[must_use]
    pub fn new(node: &'ast Node, check_id: impl Into<String>) -> Self {
        Self {
            node,
            check_id: check_id.into(),
            extra: None,
        }
    }

    /// Attaches an extra payload.
    #[must_use]
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }
}

/// Ordered, append-only collection of reports.
///
/// A context is usually created fresh for each run, but a caller may pass
/// the same one to several runs to accumulate findings across trees. Every
/// tree must then outlive the context.
#[derive(Debug, Default)]
pub struct Context<'ast> {
    reports: Vec<Report<'ast>>,
}

impl<'ast> Context<'ast> {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn report(&mut self, report: Report<'ast>) {
        self.reports.push(report);
    }

    /// Returns every report so far, in the order they were made.
    #[must_use]
    pub fn reports(&self) -> &[Report<'ast>] {
        &self.reports
    }

    /// Number of reports so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Consumes the context, returning its reports.
    #[must_use]
    pub fn into_reports(self) -> Vec<Report<'ast>> {
        self.reports
    }
}
