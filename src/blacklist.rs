//! Hardware deny-list for joystick candidates.
//!
//! Candidates are matched by their backend GUID string (32 hex characters,
//! SDL layout) before they are opened, so a blacklisted device never consumes
//! a registry slot.

/// GUIDs rejected in every build.
///
/// - `efbeedfe000000000000504944564944`: "VIRTUAL HID DEVICE" pseudo-joystick
///   some drivers expose alongside the real pad.
pub const BUILTIN_BLACKLIST: &[&str] = &["efbeedfe000000000000504944564944"];

/// Case-insensitive exact-match GUID filter.
#[derive(Clone, Debug)]
pub struct Blacklist {
    guids: Vec<String>,
}

impl Default for Blacklist {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Blacklist {
    /// Only the compiled-in entries.
    pub fn builtin() -> Self {
        Self {
            guids: BUILTIN_BLACKLIST.iter().map(|g| g.to_ascii_lowercase()).collect(),
        }
    }

    /// A filter that rejects nothing.
    pub fn empty() -> Self {
        Self { guids: Vec::new() }
    }

    /// Add entries (e.g. from the `joystick_blacklist` config option).
    ///
    /// Whitespace is trimmed; blank entries are ignored.
    pub fn extend<I, S>(&mut self, guids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for guid in guids {
            let guid = guid.as_ref().trim();
            if guid.is_empty() {
                continue;
            }
            let guid = guid.to_ascii_lowercase();
            if !self.guids.contains(&guid) {
                self.guids.push(guid);
            }
        }
    }

    pub fn is_blacklisted(&self, guid: &str) -> bool {
        let guid = guid.trim();
        self.guids.iter().any(|g| g.eq_ignore_ascii_case(guid))
    }

    pub fn len(&self) -> usize {
        self.guids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entry_matches_any_case() {
        let bl = Blacklist::builtin();
        assert!(bl.is_blacklisted("efbeedfe000000000000504944564944"));
        assert!(bl.is_blacklisted("EFBEEDFE000000000000504944564944"));
    }

    #[test]
    fn test_exact_match_only() {
        let bl = Blacklist::builtin();
        assert!(!bl.is_blacklisted("efbeedfe00000000000050494456494"));
        assert!(!bl.is_blacklisted("efbeedfe000000000000504944564944ff"));
        assert!(!bl.is_blacklisted(""));
    }

    #[test]
    fn test_extend_from_config() {
        let mut bl = Blacklist::empty();
        assert!(bl.is_empty());
        bl.extend(["030000000B0400003365000000010000", "  ", "030000000b0400003365000000010000"]);
        assert_eq!(bl.len(), 1);
        assert!(bl.is_blacklisted("030000000b0400003365000000010000"));
    }
}
