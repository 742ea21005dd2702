//! Rule presets for common configurations.

use crate::{no_await_in_loop, no_debugger, no_eval, no_new_array};
use crate::{NoAwaitInLoop, NoDebugger, NoEval, NoNewArray};
use std::str::FromStr;
use tracing::{debug, warn};
use treelint_core::{Config, RuleBox, RuleConfig};

/// Names of every built-in rule, in preset order.
pub const RULE_NAMES: &[&str] = &[
    no_new_array::NAME,
    no_debugger::NAME,
    no_eval::NAME,
    no_await_in_loop::NAME,
];

/// Preset configurations for treelint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    #[default]
    Recommended,
    /// Every built-in rule.
    All,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::All => all_rules(),
        }
    }

    fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &RULE_NAMES[..3],
            Self::All => RULE_NAMES,
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "all" => Ok(Self::All),
            other => Err(format!("unknown preset `{other}`")),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `no-new-array` - Forbids the `Array` constructor
/// - `no-debugger` - Forbids `debugger` statements
/// - `no-eval` - Forbids `eval(...)`
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoNewArray::new()),
        Box::new(NoDebugger::new()),
        Box::new(NoEval::new()),
    ]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(NoNewArray::new()),
        Box::new(NoDebugger::new()),
        Box::new(NoEval::new()),
        Box::new(NoAwaitInLoop::new()),
    ]
}

/// Creates a built-in rule by name, applying its options if given.
#[must_use]
pub fn rule_by_name(name: &str, options: Option<&RuleConfig>) -> Option<RuleBox> {
    let rule: RuleBox = match name {
        no_new_array::NAME => Box::new(NoNewArray::new()),
        no_debugger::NAME => Box::new(NoDebugger::new()),
        no_eval::NAME => Box::new(options.map_or_else(NoEval::new, NoEval::from_config)),
        no_await_in_loop::NAME => Box::new(NoAwaitInLoop::new()),
        _ => return None,
    };
    Some(rule)
}

/// Builds the rule set a configuration asks for.
///
/// Starts from the configured preset (default: recommended) and adds any
/// rule outside it whose table sets `enabled = true`. Rule options are
/// applied; rules disabled by the configuration are left for the batch
/// runner to drop.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::default(),
        Some(name) => name.parse().unwrap_or_else(|e| {
            warn!("{e}, falling back to recommended");
            Preset::default()
        }),
    };

    let mut names: Vec<&str> = preset.rule_names().to_vec();
    for name in RULE_NAMES {
        let explicitly_enabled = config.rule(name).and_then(|c| c.enabled) == Some(true);
        if explicitly_enabled && !names.contains(name) {
            debug!("Enabling rule outside preset: {}", name);
            names.push(name);
        }
    }

    for name in config.rules.keys() {
        if !RULE_NAMES.contains(&name.as_str()) {
            warn!("Unknown rule in config: {}", name);
        }
    }

    names
        .into_iter()
        .filter_map(|name| rule_by_name(name, config.rule(name)))
        .collect()
}
