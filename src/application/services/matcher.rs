//! First-match lookup of a request path in a rule table.

use std::sync::Arc;

use crate::domain::entities::{RedirectRule, RuleTable};

/// Returns the first rule in table order that matches `normalized_path`.
///
/// Literal rules match by string equality, pattern rules by their compiled
/// expression. The scan is linear because table order is the precedence.
pub fn find_rule(table: &RuleTable, normalized_path: &str) -> Option<Arc<RedirectRule>> {
    table
        .iter()
        .find(|rule| rule.matches(normalized_path))
        .cloned()
}
