//! Tokenize a raw input line into a structured command
//!
//! The first whitespace-separated token (lowercased) is the action.
//! Tokens starting with `--` or `-` become boolean flags, everything
//! else is a positional argument kept in input order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A parsed command line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Lowercased verb, `None` for blank input
    pub action: Option<String>,
    /// Positional arguments in input order
    pub args: Vec<String>,
    /// Flags present on the line (`--deep` and `-deep` both give `deep`)
    pub flags: BTreeSet<String>,
}

impl Command {
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    /// Positional argument at `index`, if present
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_none()
    }
}

/// Parse an input line. Never fails; blank input gives an empty command.
pub fn parse(input: &str) -> Command {
    let mut tokens = input.split_whitespace();

    let Some(first) = tokens.next() else {
        return Command::default();
    };

    let mut command = Command {
        action: Some(first.to_lowercase()),
        ..Command::default()
    };

    for token in tokens {
        if let Some(name) = token.strip_prefix("--") {
            // A bare `--` names nothing
            if !name.is_empty() {
                command.flags.insert(name.to_string());
            }
        } else if let Some(name) = token.strip_prefix('-') {
            // A lone `-` is dropped rather than treated as an argument
            if !name.is_empty() {
                command.flags.insert(name.to_string());
            }
        } else {
            command.args.push(token.to_string());
        }
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Command::default());
        assert_eq!(parse("   \t  "), Command::default());
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_action_lowercased() {
        let cmd = parse("SCAN Alpha");
        assert_eq!(cmd.action.as_deref(), Some("scan"));
        assert_eq!(cmd.args, vec!["Alpha".to_string()]);
    }

    #[test]
    fn test_long_and_short_flags() {
        let cmd = parse("inject keylogger workstation --stealth -f");
        assert_eq!(cmd.action.as_deref(), Some("inject"));
        assert_eq!(cmd.args, vec!["keylogger", "workstation"]);
        assert!(cmd.has_flag("stealth"));
        assert!(cmd.has_flag("f"));
        assert!(!cmd.has_flag("force"));
    }

    #[test]
    fn test_flags_interleaved_with_args() {
        let cmd = parse("scan --deep alpha --vulns beta");
        assert_eq!(cmd.args, vec!["alpha", "beta"]);
        assert_eq!(cmd.flags.len(), 2);
        assert_eq!(cmd.arg(1), Some("beta"));
        assert_eq!(cmd.arg(2), None);
    }

    #[test]
    fn test_repeated_whitespace() {
        let cmd = parse("  hack    server   ");
        assert_eq!(cmd.action.as_deref(), Some("hack"));
        assert_eq!(cmd.args, vec!["server"]);
    }

    #[test]
    fn test_lone_dashes_dropped() {
        let cmd = parse("scan - -- alpha");
        assert_eq!(cmd.args, vec!["alpha"]);
        assert!(cmd.flags.is_empty());
    }

    proptest! {
        #[test]
        fn prop_parse_is_well_formed(input in "\\PC{0,64}") {
            let cmd = parse(&input);
            match &cmd.action {
                None => {
                    prop_assert!(input.trim().is_empty());
                    prop_assert!(cmd.args.is_empty());
                    prop_assert!(cmd.flags.is_empty());
                }
                Some(action) => {
                    prop_assert_eq!(action, &action.to_lowercase());
                    prop_assert!(!action.is_empty());
                }
            }
            prop_assert!(cmd.args.iter().all(|a| !a.starts_with('-')));
            prop_assert!(cmd.args.iter().all(|a| !a.is_empty()));
        }
    }
}
