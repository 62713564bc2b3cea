use std::fmt;

/// Separator between the two ids in a room key. User ids are rejected at
/// validation time if they contain it, so a key can never be ambiguous.
pub const ROOM_KEY_SEPARATOR: char = ':';

/// Canonical key for the room shared by an unordered pair of users.
///
/// The two ids are sorted before joining, so `for_pair(a, b)` and
/// `for_pair(b, a)` produce the same key. The same string doubles as the
/// `pair_key` column of the message log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn for_pair(a: &str, b: &str) -> Self {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self(format!("{lo}{ROOM_KEY_SEPARATOR}{hi}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_order_independent() {
        assert_eq!(RoomKey::for_pair("alice", "bob"), RoomKey::for_pair("bob", "alice"));
    }

    #[test]
    fn key_is_stable_across_recomputation() {
        let key = RoomKey::for_pair("alice", "bob");
        assert_eq!(key, RoomKey::for_pair("alice", "bob"));
        assert_eq!(key.as_str(), "alice:bob");
    }

    #[test]
    fn distinct_pairs_get_distinct_keys() {
        assert_ne!(
            RoomKey::for_pair("alice", "bob"),
            RoomKey::for_pair("alice", "carol")
        );
    }
}
