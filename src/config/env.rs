//! Environment variable substitution for raw config text.
//!
//! Supports `${NAME}` and bare `$NAME` references anywhere in the document.
//! Substitution runs before YAML decoding, so it applies equally to keys,
//! list items and scalar values.
//!
//! - `${NAME}` extends to the first closing brace.
//! - `$NAME` takes the longest run of ASCII alphanumerics and underscores.
//! - Undefined variables expand to the empty string.
//! - A `$` that starts neither form, or an unterminated `${`, is kept as is.

use std::borrow::Cow;

/// Expand references using the process environment.
pub fn expand_env(input: &str) -> Cow<'_, str> {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand references using an explicit variable lookup.
pub fn expand_with<F>(input: &str, lookup: F) -> Cow<'_, str>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains('$') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => {
                    out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                    rest = &braced[end + 1..];
                }
                None => {
                    out.push_str("${");
                    rest = braced;
                }
            }
            continue;
        }

        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len]).unwrap_or_default());
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    Cow::Owned(out)
}
