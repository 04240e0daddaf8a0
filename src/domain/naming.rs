//! Canonical class-path names for actions and controllers.
//!
//! Routing layers hand us identifiers in whatever shape the router produced
//! them: `publish`, `find_by_slug`, `find by slug`, `scoped/books`. Every
//! lookup in this crate works on the canonical form instead: PascalCase
//! words joined by the `::` scope separator (`Publish`, `FindBySlug`,
//! `Scoped::Books`). Canonicalization is idempotent, so already-canonical
//! names pass through untouched.

/// Separator between scopes of a canonical class path.
pub const SCOPE_SEPARATOR: &str = "::";

/// Convert an action or controller identifier into its canonical class path.
///
/// Slashes and `::` both introduce a new scope. Within a scope, underscores,
/// hyphens, stray colons and whitespace split words; each word gets an upper
/// case first letter while the rest of the word is kept verbatim so existing
/// camel humps survive. Empty scopes are dropped.
pub fn canonicalize(input: &str) -> String {
    let scopes: Vec<String> = input
        .split('/')
        .flat_map(|segment| segment.split(SCOPE_SEPARATOR))
        .map(camelize)
        .filter(|scope| !scope.is_empty())
        .collect();

    scopes.join(SCOPE_SEPARATOR)
}

/// Like [`canonicalize`], but also accepts `.` as a scope separator.
///
/// Component lookups by name (`forms.text_field`) use dotted paths.
pub fn canonicalize_dotted(input: &str) -> String {
    canonicalize(&input.replace('.', "/"))
}

/// Join scopes into a single class path, skipping blank parts.
pub fn join_scopes<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .map(|part| part.trim_matches(':'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SCOPE_SEPARATOR)
}

/// Strip a trailing type suffix (`Engine`, `Application`, ...) and any scope
/// separator left dangling in front of it.
///
/// Returns `None` when the name does not end with the suffix.
pub fn strip_type_suffix<'a>(name: &'a str, suffix: &str) -> Option<&'a str> {
    name.strip_suffix(suffix)
        .map(|rest| rest.trim_end_matches(SCOPE_SEPARATOR).trim_end_matches(':'))
}

fn camelize(segment: &str) -> String {
    let mut camel = String::with_capacity(segment.len());
    for word in segment.split(|ch: char| ch == '_' || ch == '-' || ch == ':' || ch.is_whitespace())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}
