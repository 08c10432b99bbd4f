//! Centralized hex codec for Ethereum-shaped output.
//!
//! Every quantity the relay emits goes through these helpers so the output
//! invariants hold in one place: numeric hex is minimal-length lowercase
//! (`0` renders as `0x0`, never `0x` or `0x00`), hashes are truncated to
//! 66 characters and addresses to 42.

/// Formats an unsigned integer as minimal-length `0x`-prefixed lowercase hex.
///
/// Zero renders as `0x0`.
///
/// # Examples
/// ```
/// use bifrost_core::utils::to_hex;
///
/// assert_eq!(to_hex(0u64), "0x0");
/// assert_eq!(to_hex(255u64), "0xff");
/// ```
#[must_use]
pub fn to_hex(value: impl Into<u128>) -> String {
    format!("0x{:x}", value.into())
}

/// `None`-passthrough variant of [`to_hex`].
#[must_use]
pub fn to_hex_or_null(value: Option<impl Into<u128>>) -> Option<String> {
    value.map(to_hex)
}

/// Prefixes a string with `0x` unless it already carries one. Idempotent.
#[must_use]
pub fn prepend_0x(s: &str) -> String {
    if s.starts_with("0x") {
        s.to_string()
    } else {
        format!("0x{s}")
    }
}

/// Strips a leading `0x` if present. Idempotent.
#[must_use]
pub fn prune_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Truncates a `0x`-prefixed hex string to a canonical 32-byte hash
/// (66 characters). Assumes the input is already prefixed and carries at
/// least 64 nibbles; shorter inputs pass through unchanged.
#[must_use]
pub fn to_hash32(s: &str) -> String {
    s.get(..66).unwrap_or(s).to_string()
}

/// Truncates a `0x`-prefixed hex string to a canonical 20-byte address
/// (42 characters). Shorter inputs pass through unchanged.
#[must_use]
pub fn to_address(s: &str) -> String {
    s.get(..42).unwrap_or(s).to_string()
}

/// Maps the literal empty-hex sentinel `0x` to `None`, otherwise identity.
///
/// The mirror node uses `0x` for "field not set" (e.g. `max_fee_per_gas` on
/// legacy transactions); this is the single choke point that canonicalizes
/// the sentinel to an absent value.
#[must_use]
pub fn to_null_if_empty(s: Option<&str>) -> Option<String> {
    match s {
        None | Some("0x") | Some("") => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Parses a hex string to `u64`, with or without the `0x` prefix.
#[must_use]
pub fn parse_hex_u64(s: &str) -> Option<u64> {
    u64::from_str_radix(prune_0x(s), 16).ok()
}

/// Parses a hex string to `u128`, with or without the `0x` prefix.
///
/// Used for fee arithmetic where tinybar × 10¹⁰ exceeds `u64`.
#[must_use]
pub fn parse_hex_u128(s: &str) -> Option<u128> {
    u128::from_str_radix(prune_0x(s), 16).ok()
}
