//! Recipient name canonicalization
//!
//! Maps noisy disclosure names ("Liberal Party of Australia - Victorian
//! Division", "lib vic branch") onto a small set of canonical identifiers
//! ("LIB-VIC") by folding an ordered rule list over each name:
//! - every rule is a case-insensitive regex matched anywhere in the name
//! - a match replaces the whole name with the rule's canonical value
//! - the next rule sees the already rewritten name, so rules chain
//!
//! Patterns are live regular expressions. Names coming from the data are only
//! ever matched against, never compiled, so special characters in a
//! recipient name cannot make canonicalization fail.

mod rules;

pub use rules::{default_rules, Rule};

use crate::record::DonationRecord;
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;

/// Errors raised while compiling a rule list
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("rule {index} has an empty pattern (or one that matches the empty string): {pattern:?}")]
    EmptyPattern { index: usize, pattern: String },

    #[error("rule {index} has an invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type RuleResult<T> = Result<T, RuleError>;

#[derive(Debug, Clone)]
struct CompiledRule {
    regex: Regex,
    rule: Rule,
}

/// One rewrite step recorded by [`Canonicalizer::trace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// Position of the rule in the list
    pub index: usize,
    pub pattern: String,
    pub from: String,
    pub to: String,
}

/// Compiled, ordered rule list
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    rules: Vec<CompiledRule>,
}

impl Canonicalizer {
    /// Compile `rules` in order, rejecting empty and invalid patterns
    pub fn new(rules: &[Rule]) -> RuleResult<Self> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (index, rule) in rules.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                return Err(RuleError::EmptyPattern {
                    index,
                    pattern: rule.pattern.clone(),
                });
            }

            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RuleError::InvalidPattern {
                    index,
                    pattern: rule.pattern.clone(),
                    source,
                })?;

            // A pattern that matches "" would swallow every name.
            if regex.is_match("") {
                return Err(RuleError::EmptyPattern {
                    index,
                    pattern: rule.pattern.clone(),
                });
            }

            compiled.push(CompiledRule {
                regex,
                rule: rule.clone(),
            });
        }

        debug!("Compiled {} canonicalization rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    /// Canonicalizer over the shipped rule set
    pub fn with_default_rules() -> RuleResult<Self> {
        Self::new(&default_rules())
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in application order
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().map(|c| &c.rule)
    }

    /// Fold the rule list over `raw`; unmatched names pass through unchanged
    pub fn canonicalize(&self, raw: &str) -> String {
        self.rules.iter().fold(raw.to_string(), |name, compiled| {
            if compiled.regex.is_match(&name) {
                compiled.rule.canonical.clone()
            } else {
                name
            }
        })
    }

    /// Same fold as [`canonicalize`](Self::canonicalize), recording each rewrite
    pub fn trace(&self, raw: &str) -> Vec<Rewrite> {
        let mut rewrites = Vec::new();
        let mut name = raw.to_string();

        for (index, compiled) in self.rules.iter().enumerate() {
            if compiled.regex.is_match(&name) {
                let to = compiled.rule.canonical.clone();
                rewrites.push(Rewrite {
                    index,
                    pattern: compiled.rule.pattern.clone(),
                    from: std::mem::replace(&mut name, to.clone()),
                    to,
                });
            }
        }

        rewrites
    }

    /// Canonicalize a record's recipient, and its donor when `donors` is set
    pub fn apply(&self, record: DonationRecord, donors: bool) -> DonationRecord {
        let recipient = self.canonicalize(&record.recipient);
        let donor = if donors {
            self.canonicalize(&record.donor)
        } else {
            record.donor
        };

        DonationRecord {
            donor,
            recipient,
            ..record
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Amount;

    fn shipped() -> Canonicalizer {
        Canonicalizer::with_default_rules().unwrap()
    }

    #[test]
    fn test_shipped_rules_compile() {
        let canon = shipped();
        assert_eq!(canon.len(), 52);
        assert_eq!(canon.rules().next().unwrap().canonical, "Climate 200");
    }

    #[test]
    fn test_state_branches() {
        let canon = shipped();
        assert_eq!(canon.canonicalize("Liberal Party Victoria"), "LIB-VIC");
        assert_eq!(canon.canonicalize("lib vic branch"), "LIB-VIC");
        assert_eq!(
            canon.canonicalize("Australian Labor Party (N.S.W. Branch)"),
            "ALP-NSW"
        );
        assert_eq!(
            canon.canonicalize("Australian Labor Party - Western Australian Branch"),
            "ALP-WA"
        );
        assert_eq!(
            canon.canonicalize("Liberal Party of Australia (S.A. Division)"),
            "LIB-SA"
        );
        assert_eq!(canon.canonicalize("Queensland Greens"), "GREEN-QLD");
        assert_eq!(canon.canonicalize("Australian Greens"), "GREEN-FED");
        assert_eq!(canon.canonicalize("National Party of Australia"), "NAT-FED");
    }

    #[test]
    fn test_named_entities() {
        let canon = shipped();
        assert_eq!(canon.canonicalize("Climate 200 Pty Ltd"), "Climate 200");
        assert_eq!(canon.canonicalize("GetUp Limited"), "Getup Ltd");
        assert_eq!(canon.canonicalize("Pauline Hanson's One Nation"), "Pauline Hanson");
    }

    #[test]
    fn test_unmatched_names_pass_through() {
        let canon = shipped();
        assert_eq!(canon.canonicalize("The Nationals"), "The Nationals");
        assert_eq!(canon.canonicalize("Acme Pty"), "Acme Pty");
        assert_eq!(canon.canonicalize(""), "");
        // Regex metacharacters in data are inert
        assert_eq!(canon.canonicalize("Smith (Holdings) [*]+?"), "Smith (Holdings) [*]+?");
    }

    #[test]
    fn test_shipped_rules_are_idempotent() {
        let canon = shipped();
        let canonicals: Vec<String> = canon.rules().map(|r| r.canonical.clone()).collect();
        for name in canonicals {
            assert_eq!(canon.canonicalize(&name), name, "rewrote canonical name {name}");
        }
    }

    #[test]
    fn test_rules_chain_in_order() {
        let rules = vec![
            Rule::new("Labor.*western", "ALP-WA"),
            Rule::new("ALP.*WA", "ALP WA BRANCH"),
        ];
        let canon = Canonicalizer::new(&rules).unwrap();
        assert_eq!(canon.canonicalize("labor party western australia"), "ALP WA BRANCH");

        let trace = canon.trace("labor party western australia");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0].from, "labor party western australia");
        assert_eq!(trace[0].to, "ALP-WA");
        assert_eq!(trace[1].index, 1);
        assert_eq!(trace[1].from, "ALP-WA");
    }

    #[test]
    fn test_rejects_empty_patterns() {
        for pattern in ["", "   ", ".*", "(x)?"] {
            let err = Canonicalizer::new(&[Rule::new(pattern, "X")]).unwrap_err();
            assert!(matches!(err, RuleError::EmptyPattern { index: 0, .. }), "{pattern:?}");
        }
    }

    #[test]
    fn test_rejects_invalid_patterns() {
        let rules = vec![Rule::new("ok", "OK"), Rule::new("lib(", "LIB")];
        let err = Canonicalizer::new(&rules).unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { index: 1, .. }));
    }

    #[test]
    fn test_apply_to_record() {
        let canon = shipped();
        let record = DonationRecord::new(
            "Liberal Party Victoria",
            "Liberal Party Victoria",
            "2014-15",
            Amount::from_dollars(10),
        );

        let recipient_only = canon.apply(record.clone(), false);
        assert_eq!(recipient_only.donor, "Liberal Party Victoria");
        assert_eq!(recipient_only.recipient, "LIB-VIC");

        let both = canon.apply(record, true);
        assert_eq!(both.donor, "LIB-VIC");
        assert_eq!(both.amount, Amount::from_dollars(10));
    }
}
