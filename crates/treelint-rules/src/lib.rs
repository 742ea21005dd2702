//! # treelint-rules
//!
//! Built-in rules for treelint.
//!
//! ## Available Rules
//!
//! | Name | Description |
//! |------|-------------|
//! | `no-new-array` | Forbids `new Array(...)` |
//! | `no-debugger` | Forbids `debugger` statements |
//! | `no-eval` | Forbids `eval(...)` and other configured callees |
//! | `no-await-in-loop` | Forbids `await` that runs once per loop iteration |
//!
//! ## Usage
//!
//! ```ignore
//! use treelint_core::BatchRunner;
//! use treelint_rules::{NoDebugger, NoEval};
//!
//! let report = BatchRunner::builder()
//!     .root("./trees")
//!     .rule(NoDebugger::new())
//!     .rule(NoEval::new().callees(&["eval", "execScript"]))
//!     .build()?
//!     .run()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_await_in_loop;
pub mod no_debugger;
pub mod no_eval;
pub mod no_new_array;
mod presets;

pub use no_await_in_loop::NoAwaitInLoop;
pub use no_debugger::NoDebugger;
pub use no_eval::NoEval;
pub use no_new_array::NoNewArray;
pub use presets::{all_rules, recommended_rules, rule_by_name, rules_from_config, Preset, RULE_NAMES};

/// Re-export core types for convenience.
pub use treelint_core::{Report, Rule, RuleBox};
