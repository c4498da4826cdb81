//! Player-name sanitization for record file names.

use crate::types::Identity;

/// Name used when the host reports an empty player name.
pub const UNKNOWN_IDENTITY: &str = "unknown";

const RESERVED: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replace filesystem-reserved characters with `_` and trim.
/// Idempotent: `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(raw: &str) -> Identity {
    let replaced: String = raw
        .chars()
        .map(|c| if RESERVED.contains(&c) { '_' } else { c })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        UNKNOWN_IDENTITY.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stricter variant used for membership files: only `[A-Za-z0-9 _.-]` survive.
pub fn sanitize_strict(raw: &str) -> Identity {
    let replaced: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        UNKNOWN_IDENTITY.to_string()
    } else {
        trimmed.to_string()
    }
}
