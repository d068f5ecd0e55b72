//! Redirect rule entity and the ordered rule table.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// How a matched request is sent to its target.
///
/// Variant names follow the values stored in the `RedirectType` field of a
/// redirect map record (`Redirect301`, `Redirect302`, `ServerTransfer`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectKind {
    /// `301 Moved Permanently` with a `Location` header.
    Permanent301,
    /// `302 Found` with a `Location` header.
    Temporary302,
    /// Internal re-dispatch of the request, no client round-trip.
    ServerTransfer,
}

impl RedirectKind {
    /// Short label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent301 => "permanent_301",
            Self::Temporary302 => "temporary_302",
            Self::ServerTransfer => "server_transfer",
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored redirect type cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown redirect type: '{0}'")]
pub struct UnknownRedirectKind(pub String);

impl FromStr for RedirectKind {
    type Err = UnknownRedirectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Redirect301" => Ok(Self::Permanent301),
            "Redirect302" => Ok(Self::Temporary302),
            "ServerTransfer" => Ok(Self::ServerTransfer),
            other => Err(UnknownRedirectKind(other.to_string())),
        }
    }
}

/// A single `pattern -> target` mapping from a redirect map record.
///
/// Literal rules compare the normalized request path by plain string
/// equality; pattern rules carry a compiled regular expression that is
/// both the match test and the source of back-references for the target.
#[derive(Debug, Clone)]
pub struct RedirectRule {
    pub pattern: String,
    pub target: String,
    pub kind: RedirectKind,
    pub preserve_query_string: bool,
    regex: Option<Regex>,
}

impl RedirectRule {
    /// Creates a literal rule. `pattern` is expected to be normalized already.
    pub fn literal(
        pattern: impl Into<String>,
        target: impl Into<String>,
        kind: RedirectKind,
        preserve_query_string: bool,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            target: target.into(),
            kind,
            preserve_query_string,
            regex: None,
        }
    }

    /// Creates a pattern rule, compiling `pattern` as a regular expression.
    ///
    /// # Errors
    ///
    /// Returns the compilation error if `pattern` is not a valid expression.
    pub fn regex(
        pattern: impl Into<String>,
        target: impl Into<String>,
        kind: RedirectKind,
        preserve_query_string: bool,
    ) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = Regex::new(&pattern)?;

        Ok(Self {
            pattern,
            target: target.into(),
            kind,
            preserve_query_string,
            regex: Some(regex),
        })
    }

    /// Returns true if this rule is a regular-expression rule.
    pub fn is_pattern(&self) -> bool {
        self.regex.is_some()
    }

    /// Compiled expression of a pattern rule.
    pub fn compiled(&self) -> Option<&Regex> {
        self.regex.as_ref()
    }

    /// Tests the rule against an already normalized request path.
    pub fn matches(&self, normalized_path: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(normalized_path),
            None => self.pattern == normalized_path,
        }
    }
}

/// Ordered list of rules for one site. The first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Arc<RedirectRule>>,
}

impl RuleTable {
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self {
            rules: rules.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in match order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RedirectRule>> {
        self.rules.iter()
    }
}
