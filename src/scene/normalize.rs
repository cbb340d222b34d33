//! Identifier normalization and display formatting.

use std::sync::LazyLock;

use regex::Regex;

static PARENTHETICAL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("static pattern"));

/// Remove every balanced `( … )` group, innermost first.
///
/// Unbalanced parentheses are left in place.
pub fn strip_parentheticals(s: &str) -> String {
	let mut out = s.to_string();
	while PARENTHETICAL.is_match(&out) {
		out = PARENTHETICAL.replace_all(&out, " ").into_owned();
	}
	out
}

/// Canonical node identity: parentheticals stripped, whitespace collapsed,
/// lowercased.
///
/// Case is folded with [`str::to_lowercase`], which maps characters one to
/// one. Full Unicode folding is not applied, so `"STRASSE"` and `"Straße"`
/// stay distinct ids.
///
/// `normalize_id(normalize_id(x)) == normalize_id(x)` for every input.
pub fn normalize_id(raw: &str) -> String {
	strip_parentheticals(raw)
		.split_whitespace()
		.collect::<Vec<_>>()
		.join(" ")
		.to_lowercase()
}

/// Display label for a raw identifier: parentheticals stripped, each word
/// title-cased.
pub fn format_label(raw: &str) -> String {
	strip_parentheticals(raw)
		.split_whitespace()
		.map(title_case)
		.collect::<Vec<_>>()
		.join(" ")
}

fn title_case(word: &str) -> String {
	let mut chars = word.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
		None => String::new(),
	}
}

/// Sequence number of an event key: the digits embedded in it, read as one
/// number. `None` when the key carries no digits.
pub fn event_order_key(key: &str) -> Option<u64> {
	let digits: String = key.chars().filter(char::is_ascii_digit).collect();
	if digits.is_empty() {
		return None;
	}
	// saturate absurdly long digit runs instead of dropping the ordering
	Some(digits.parse().unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lowercases_without_full_folding() {
		assert_eq!(normalize_id("ÉLODIE  Brûlé"), "élodie brûlé");
		assert_eq!(normalize_id("Straße"), "straße");
		assert_ne!(normalize_id("STRASSE"), normalize_id("Straße"));
		// ideographic space counts as whitespace
		assert_eq!(normalize_id("Li\u{3000}Wei"), "li wei");
	}

	#[test]
	fn normalizes_case_space_and_annotations() {
		assert_eq!(normalize_id("  Lady   Macbeth (sleepwalking) "), "lady macbeth");
		assert_eq!(normalize_id("LADY MACBETH"), "lady macbeth");
		assert_eq!(normalize_id("(offstage)"), "");
	}

	#[test]
	fn strips_nested_groups() {
		assert_eq!(normalize_id("Banquo (ghost (act 3))"), "banquo");
		assert_eq!(strip_parentheticals("a (b) c (d"), "a   c (d");
	}

	#[test]
	fn normalize_is_idempotent_on_awkward_input() {
		for s in ["x ((y) z)", "a) (b", "((", "  ", "Ä (Ö) Ü"] {
			let once = normalize_id(s);
			assert_eq!(normalize_id(&once), once, "input {s:?}");
		}
	}

	#[test]
	fn labels_are_title_cased() {
		assert_eq!(format_label("lady MACBETH (queen)"), "Lady Macbeth");
		assert_eq!(format_label("the   three witches"), "The Three Witches");
		assert_eq!(format_label(""), "");
	}

	#[test]
	fn event_keys_order_numerically() {
		assert_eq!(event_order_key("action_10"), Some(10));
		assert_eq!(event_order_key("action_2"), Some(2));
		assert_eq!(event_order_key("a1b2"), Some(12));
		assert_eq!(event_order_key("prologue"), None);
		assert_eq!(event_order_key("99999999999999999999999"), Some(u64::MAX));
	}
}
