//! Normalization of raw navigation targets into page keys.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::paths::strip_source_ext;
use crate::route_constants::RouteConstants;

static MEMBER_ACCESS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\w+)\.(\w+)$").ok());

/// Map a raw target reported by the extractor to a page key.
///
/// Strips one layer of quotes, looks the value up in the full route-constant
/// map, then (for `Symbol.Member` shapes) in the short map, and finally strips
/// the source extension. An empty result means the edge should be dropped.
///
/// ```
/// use ptg_graph::{RouteConstants, resolve_target};
///
/// let mut constants = RouteConstants::new();
/// constants.insert("RoutePath", "Detail", "pages/detail/DetailPage.ets");
/// assert_eq!(resolve_target("\"RoutePath.Detail\"", &constants), "pages/detail/DetailPage");
/// ```
pub fn resolve_target(raw: &str, constants: &RouteConstants) -> String {
    let unquoted = strip_quotes(raw.trim());

    let mapped = constants
        .full()
        .get(unquoted)
        .or_else(|| {
            let re = MEMBER_ACCESS.as_ref()?;
            let caps = re.captures(unquoted)?;
            constants.short().get(caps.get(2)?.as_str())
        })
        .map(String::as_str)
        .unwrap_or(unquoted);

    let resolved = strip_source_ext(mapped);
    if resolved != raw {
        debug!(raw, resolved = %resolved, "Target resolved");
    }
    resolved
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].trim();
        }
    }
    value
}
