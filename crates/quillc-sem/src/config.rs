//! `SemanticConfig`: the evaluator's own tunables.
//!
//! A plain struct with a `Default` impl and optional `serde` support, in the
//! style of a CLI's build config. This crate never loads a config file
//! itself (file/config loading is a driver concern); a host embedding the
//! evaluator constructs or deserializes one.

#[cfg_attr(feature = "config-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticConfig {
    /// Recursion guard for function calls: the language has no iterative
    /// trampoline, so an unbounded recursive program would overflow this
    /// process's call stack. `None` disables the guard.
    pub max_call_depth: Option<usize>,

    /// An optional fuse so a runaway `while true {}` in a test fixture
    /// doesn't hang a host embedding the evaluator. `None` disables it.
    pub max_loop_iterations: Option<usize>,

    /// When `true` (the default), logical `&&`/`||` demand Boolean operands
    /// (§9 Open Question (a), Boolean-strict interpretation). When `false`,
    /// non-Boolean operands are truthy-coerced, matching the source's
    /// inconsistent original behavior — useful only for source-compatibility
    /// testing against the original corpus.
    pub strict_logical_operands: bool,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            max_call_depth: Some(512),
            max_loop_iterations: Some(10_000_000),
            strict_logical_operands: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_reasonable() {
        let cfg = SemanticConfig::default();
        assert!(cfg.max_call_depth.unwrap() > 0);
        assert!(cfg.strict_logical_operands);
    }
}
