//! Zone set resolution.
//!
//! Bulk workflows act on "every zone except these"; explicit workflows act on
//! a literal comma separated list. Both resolvers are pure and total: odd
//! input such as an empty string is passed through and left for the registry
//! to reject.

use std::collections::HashSet;

/// Separator used by every zone list accepted on the command line.
pub const ZONE_SEPARATOR: char = ',';

/// Split a raw comma separated list into zone identifiers.
///
/// Tokens are not trimmed or deduplicated and order is preserved, so `""`
/// yields a single empty identifier and `"a,,a"` yields `["a", "", "a"]`.
pub fn resolve_explicit(raw: &str) -> Vec<String> {
    raw.split(ZONE_SEPARATOR).map(str::to_string).collect()
}

/// Every zone in `universe` whose identifier is not in `exclusions`.
///
/// Matching is exact string comparison. Exclusions that name no zone in the
/// universe are ignored. The universe's order is preserved.
pub fn resolve_all_except<U, E>(universe: U, exclusions: &[E]) -> Vec<String>
where
    U: IntoIterator,
    U::Item: Into<String>,
    E: AsRef<str>,
{
    let excluded: HashSet<&str> = exclusions.iter().map(AsRef::as_ref).collect();
    universe
        .into_iter()
        .map(Into::into)
        .filter(|zone| !excluded.contains(zone.as_str()))
        .collect()
}

/// Render a zone list the way summary lines print it: `[a b c]`.
pub fn format_zone_list(zones: &[String]) -> String {
    format!("[{}]", zones.join(" "))
}
