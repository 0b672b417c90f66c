//! Shipped canonicalization rule set
//!
//! Order matters: broad party patterns run before the state-specific ones so
//! the later rules can refine an already rewritten name.

use serde::{Deserialize, Serialize};

/// One ordered rewrite: any name matching `pattern` becomes `canonical`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Case-insensitive regular expression, matched anywhere in the name
    pub pattern: String,
    /// Replacement for the whole name
    pub canonical: String,
}

impl Rule {
    pub fn new(pattern: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            canonical: canonical.into(),
        }
    }
}

const DEFAULT_RULES: &[(&str, &str)] = &[
    (r"Climate.*200", "Climate 200"),
    (r"not.*race", "Not A Race"),
    (r"advance.*australia", "Advance Australia"),
    (r"pauline.*hanson", "Pauline Hanson"),
    (r"one.*nation", "Pauline Hanson"),
    (r"David.*Pocock", "David Pocock"),
    (r"allegra", "Ms Allegra Spender MP"),
    (r"getup", "Getup Ltd"),
    // Labor
    (r"Labor.*western", "ALP-WA"),
    (r"ALP.*WA", "ALP-WA"),
    (r"Labor.*northern", "ALP-NT"),
    (r"Labor.*vic", "ALP-VIC"),
    (r"Labor.*queen", "ALP-QLD"),
    (r"Labor.*south", "ALP-SA"),
    (r"Labor.*N\.S\.W", "ALP-NSW"),
    (r"ALP.*NSW", "ALP-NSW"),
    (r"ALP.*VIC", "ALP-VIC"),
    (r"ALP.*Q", "ALP-QLD"),
    (r"ALP.*FED", "ALP-FED"),
    (r"Australian Labor Party", "ALP-FED"),
    (r"ALP.*NAT", "ALP-FED"),
    // Liberal
    (r"lib.*vic", "LIB-VIC"),
    (r"lib.*tas", "LIB-TAS"),
    (r"lib.*nsw", "LIB-NSW"),
    (r"lib.*act", "LIB-ACT"),
    (r"lib.*q", "LIB-QLD"),
    (r"lnp.*q", "LIB-QLD"),
    (r"lib.*S\.A", "LIB-SA"),
    (r"lib.*W\.?A", "LIB-WA"),
    (r"lib.*N\.S\.W", "LIB-NSW"),
    (r"lib.*party", "LIB-FED"),
    (r"lib.*fed", "LIB-FED"),
    // Nationals
    (r"NAT.*vic", "NAT-VIC"),
    (r"NAT.*tas", "NAT-TAS"),
    (r"NAT.*nsw", "NAT-NSW"),
    (r"NAT.*act", "NAT-ACT"),
    (r"NAT.*q", "NAT-QLD"),
    (r"NAT.*S\.A", "NAT-SA"),
    (r"NAT.*W\.?A", "NAT-WA"),
    (r"NAT.*N\.S\.W", "NAT-NSW"),
    (r"NAT.*AUS", "NAT-FED"),
    // Greens
    (r"GREEN.*vic", "GREEN-VIC"),
    (r"GREEN.*tas", "GREEN-TAS"),
    (r"GREEN.*nsw", "GREEN-NSW"),
    (r"GREEN.*act", "GREEN-ACT"),
    (r"GREEN.*q", "GREEN-QLD"),
    (r"q.*GREEN", "GREEN-QLD"),
    (r"GREEN.*S\.A", "GREEN-SA"),
    (r"GREEN.*W\.?A", "GREEN-WA"),
    (r"GREEN.*N\.S\.W", "GREEN-NSW"),
    (r"GREEN.*AUS", "GREEN-FED"),
    (r"AUS.*GREEN", "GREEN-FED"),
];

/// The ordered rule list used when no configuration overrides it
pub fn default_rules() -> Vec<Rule> {
    DEFAULT_RULES
        .iter()
        .map(|(pattern, canonical)| Rule::new(*pattern, *canonical))
        .collect()
}
