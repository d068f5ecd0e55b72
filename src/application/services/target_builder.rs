//! Computes the redirect target URL for a matched rule.

use std::borrow::Cow;

use crate::domain::entities::RedirectRule;

/// Builds the final target of `rule` for a request.
///
/// 1. Pattern rules rewrite `normalized_path` with the rule's expression,
///    using the target as replacement template (`$1`, `${name}`; unmatched
///    groups expand to nothing).
/// 2. With `preserve_query_string`, the request query is appended verbatim.
/// 3. A non-empty `virtual_folder` is prefixed, joined by a single `/`.
///
/// The result is not validated as a URL.
pub fn build_target(
    rule: &RedirectRule,
    normalized_path: &str,
    query: Option<&str>,
    virtual_folder: &str,
) -> String {
    let mut target = match rule.compiled() {
        Some(regex) => regex
            .replace_all(normalized_path, expand_group_refs(&rule.target).as_ref())
            .into_owned(),
        None => rule.target.clone(),
    };

    if rule.preserve_query_string
        && let Some(query) = query.filter(|q| !q.is_empty())
    {
        target.push('?');
        target.push_str(query);
    }

    if !virtual_folder.is_empty() {
        let mut rebased = virtual_folder.to_string();
        if !rebased.ends_with('/') {
            rebased.push('/');
        }
        rebased.push_str(target.trim_start_matches('/'));
        target = rebased;
    }

    target
}

/// Wraps numbered references in braces so `$1abc` means group 1 followed by
/// `abc` rather than a group named `1abc`.
fn expand_group_refs(template: &str) -> Cow<'_, str> {
    if !template.contains('$') {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len() + 4);
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        match chars.peek() {
            Some((_, '$')) => {
                out.push_str("$$");
                chars.next();
            }
            Some((_, d)) if d.is_ascii_digit() => {
                out.push_str("${");
                while let Some((_, d)) = chars.peek().copied().filter(|(_, d)| d.is_ascii_digit()) {
                    out.push(d);
                    chars.next();
                }
                out.push('}');
            }
            _ => out.push('$'),
        }
    }

    Cow::Owned(out)
}
