//! Device name cleanup.
//!
//! Backends report joystick names verbatim from drivers/firmware, and a few
//! controller families come through in ways that break name-based config
//! matching. [`normalize`] turns a raw name into the canonical form used as a
//! registry key, and [`deduplicate`] makes it unique among devices already
//! registered.
//!
//! # Rewrites
//! - Names are trimmed; an empty result becomes [`UNNAMED`].
//! - XInput pads numbered by the backend (`"XInput Controller #1"`, `#2`, ...)
//!   collapse to `"XInput Controller"`. Dedup then renumbers them in a
//!   consistent way.
//! - One joystick adapter reports the single Cyrillic letter `"Љ"` as its
//!   name; it is rewritten to `"Hexagons Joystick Adapter"`.
//!
//! # Example
//! ```
//! use stickreg::naming::{deduplicate, normalize};
//!
//! let a = normalize("  XInput Controller #3 ", true);
//! assert_eq!(a, "XINPUT CONTROLLER");
//!
//! let b = deduplicate(&a, [a.as_str()]);
//! assert_eq!(b, "XINPUT CONTROLLER #2");
//! ```

/// Fallback name for devices that report nothing usable.
pub const UNNAMED: &str = "Unnamed";

#[derive(Clone, Copy, Debug)]
enum Match {
    /// Case-insensitive exact match.
    Exact,
    /// Case-insensitive prefix match.
    Prefix,
}

/// Known-bad names and their replacements, applied in order.
const REWRITES: &[(Match, &str, &str)] = &[
    (Match::Prefix, "XInput Controller #", "XInput Controller"),
    (Match::Exact, "\u{0409}", "Hexagons Joystick Adapter"),
];

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.is_char_boundary(prefix.len())
        && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Clean up a raw backend name.
///
/// `uppercase` applies an ASCII-only uppercase pass, which is what legacy
/// configuration files match against. Never fails.
pub fn normalize(raw: &str, uppercase: bool) -> String {
    let trimmed = raw.trim();
    let mut name = if trimmed.is_empty() {
        UNNAMED
    } else {
        trimmed
    };

    for (kind, pattern, replacement) in REWRITES {
        let hit = match kind {
            Match::Exact => name.eq_ignore_ascii_case(pattern),
            Match::Prefix => starts_with_ignore_case(name, pattern),
        };
        if hit {
            name = replacement;
        }
    }

    if uppercase {
        name.to_ascii_uppercase()
    } else {
        name.to_owned()
    }
}

/// Make `name` distinct from every name in `taken`.
///
/// Returns `name` unchanged when it is free, otherwise the first free
/// `"<name> #n"` for `n = 2, 3, ...`. Comparison ignores ASCII case so the
/// result stays unique for case-insensitive config lookups too.
pub fn deduplicate<'a, I>(name: &str, taken: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let taken: Vec<&str> = taken.into_iter().collect();
    let is_taken = |candidate: &str| taken.iter().any(|t| t.eq_ignore_ascii_case(candidate));

    if !is_taken(name) {
        return name.to_owned();
    }
    // At most `taken.len()` suffixes can collide, so this always terminates.
    let mut n = 2usize;
    loop {
        let candidate = format!("{name} #{n}");
        if !is_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  Generic USB Joystick \t", false), "Generic USB Joystick");
    }

    #[test]
    fn test_empty_becomes_unnamed() {
        assert_eq!(normalize("", false), "Unnamed");
        assert_eq!(normalize("   \n", false), "Unnamed");
        assert_eq!(normalize("", true), "UNNAMED");
    }

    #[test]
    fn test_xinput_numbering_collapsed() {
        assert_eq!(normalize("XInput Controller #1", false), "XInput Controller");
        assert_eq!(normalize("xinput controller #4", false), "XInput Controller");
        // No number suffix: left alone.
        assert_eq!(normalize("XInput Controller", false), "XInput Controller");
    }

    #[test]
    fn test_single_cyrillic_letter_rewritten() {
        assert_eq!(normalize("\u{0409}", false), "Hexagons Joystick Adapter");
        assert_eq!(normalize(" \u{0409} ", true), "HEXAGONS JOYSTICK ADAPTER");
    }

    #[test]
    fn test_uppercase_is_ascii_only() {
        assert_eq!(normalize("Pad ä", true), "PAD ä");
    }

    #[test]
    fn test_prefix_match_on_non_ascii_boundary() {
        // Must not panic slicing inside a multi-byte char.
        assert_eq!(normalize("XInput Controller ä", false), "XInput Controller ä");
    }

    #[test]
    fn test_deduplicate_free_name() {
        assert_eq!(deduplicate("PAD", ["KEYBOARD", "MOUSE"]), "PAD");
    }

    #[test]
    fn test_deduplicate_counts_up() {
        assert_eq!(deduplicate("PAD", ["PAD"]), "PAD #2");
        assert_eq!(deduplicate("PAD", ["PAD", "PAD #2"]), "PAD #3");
        assert_eq!(deduplicate("PAD", ["PAD", "PAD #3"]), "PAD #2");
    }

    #[test]
    fn test_deduplicate_skips_long_runs() {
        let taken: Vec<String> = std::iter::once("PAD".to_owned())
            .chain((2..=40).map(|n| format!("PAD #{n}")))
            .collect();
        let name = deduplicate("PAD", taken.iter().map(String::as_str));
        assert_eq!(name, "PAD #41");
        assert!(!taken.iter().any(|t| t.eq_ignore_ascii_case(&name)));
    }

    #[test]
    fn test_deduplicate_ignores_case() {
        assert_eq!(deduplicate("Pad", ["PAD"]), "Pad #2");
    }
}
