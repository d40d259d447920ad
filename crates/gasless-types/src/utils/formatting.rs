//! String formatting utilities.
//!
//! Helpers for hex prefix handling and for shortening trade hashes and
//! addresses in log output.

/// Shortens a hex identifier for display.
///
/// Keeps the `0x` prefix (when present) plus the first 8 hex digits, followed
/// by "..". Identifiers that are already short are returned unchanged.
pub fn truncate_id(id: &str) -> String {
	let digits = without_0x_prefix(id);
	let prefix = &id[..id.len() - digits.len()];
	let mut chars = digits.chars();
	let head: String = chars.by_ref().take(8).collect();
	if chars.next().is_none() {
		id.to_string()
	} else {
		format!("{}{}..", prefix, head)
	}
}

/// Adds a "0x" prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes the "0x" or "0X" prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
