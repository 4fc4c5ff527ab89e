//! Parser for `Key=Value;Key=Value` property lists carried in one argument.

use tracing::debug;

/// Split `text` on `;`, then every segment on its first `=`.
///
/// Keys and values are trimmed. Blank segments and segments without a key
/// are skipped; order is preserved and later duplicates are kept.
pub fn parse_build_properties(text: &str) -> Vec<(String, String)> {
    text.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| {
            let Some((key, value)) = segment.split_once('=') else {
                debug!(segment, "Skipping property without '='");
                return None;
            };
            let key = key.trim();
            if key.is_empty() {
                debug!(segment, "Skipping property without a name");
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}
