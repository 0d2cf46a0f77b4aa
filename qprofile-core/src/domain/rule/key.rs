// qprofile-core/src/domain/rule/key.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid rule key '{0}': expected format 'repository:rule'")]
pub struct InvalidRuleKey(pub String);

/// Identifies a rule across analyzers: the repository that ships it plus the
/// rule identifier inside that repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleKey {
    repository: String,
    rule: String,
}

impl RuleKey {
    pub fn of(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn rule(&self) -> &str {
        &self.rule
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

impl FromStr for RuleKey {
    type Err = InvalidRuleKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The rule part may itself contain ':' (e.g. "common-java:DuplicatedBlocks:1").
        match s.split_once(':') {
            Some((repository, rule)) if !repository.is_empty() && !rule.is_empty() => {
                Ok(Self::of(repository, rule))
            }
            _ => Err(InvalidRuleKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for RuleKey {
    type Error = InvalidRuleKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleKey> for String {
    fn from(key: RuleKey) -> Self {
        key.to_string()
    }
}
