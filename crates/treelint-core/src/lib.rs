//! # treelint-core
//!
//! Rule execution engine for ESTree-shaped syntax trees.
//!
//! This crate provides the tree model and the machinery to run many rules
//! over it in a single traversal. It includes:
//!
//! - [`Node`] for the owned tree, deserialized from JSON
//! - [`walk`] for depth-first enter/leave traversal with subtree skipping
//! - [`Rule`] and [`Visitor`] for the rule plugin contract
//! - [`run_rules`] for dispatching one walk to many visitors
//! - [`BatchRunner`] and [`check_all_asts`] for checking directories of
//!   serialized trees
//!
//! ## Example
//!
//! ```ignore
//! use treelint_core::BatchRunner;
//!
//! let report = BatchRunner::builder()
//!     .root("./trees")
//!     .rule(NoDebugger)
//!     .build()?
//!     .run()?;
//!
//! for finding in &report.results {
//!     println!("{finding}");
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod kinds;

mod batch;
mod config;
mod context;
mod engine;
mod rule;
mod tree;
mod visitor;
mod walker;

pub use batch::{check_all_asts, BatchError, BatchReport, BatchRunner, BatchRunnerBuilder, Finding, Point};
pub use config::{Config, ConfigError, RuleConfig, RunnerConfig, DEFAULT_SUFFIX};
pub use context::{Context, Report};
pub use engine::{run_rules, run_rules_with};
pub use rule::{Rule, RuleBox, VisitorBox};
pub use tree::{Field, Node, NodeKind, Position, Slot, SourceLocation, TreeError};
pub use visitor::{dispatch_enter, VisitCx, Visitor};
pub use walker::{walk, walk_with, Edge, Listener, WalkControl};
