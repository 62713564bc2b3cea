use crate::models::room::ROOM_KEY_SEPARATOR;
use serde::Serialize;

/// Identity record plus the user's set of prior chat partners.
/// Field names on the wire match the registration API contract.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    #[serde(rename = "userId")]
    pub id: String,
    #[serde(rename = "username")]
    pub display_name: String,
    #[serde(rename = "chatPartners")]
    pub partners: Vec<String>,
}

/// A usable user id is non-empty and cannot contain the room-key
/// separator (which would make room keys ambiguous).
pub fn is_valid_user_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(ROOM_KEY_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_user_ids() {
        assert!(is_valid_user_id("alice"));
        assert!(is_valid_user_id("user_42"));
        assert!(!is_valid_user_id(""));
        assert!(!is_valid_user_id("al:ice"));
    }

    #[test]
    fn serializes_with_api_field_names() {
        let user = User {
            id: "alice".into(),
            display_name: "Alice".into(),
            partners: vec!["bob".into()],
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["userId"], "alice");
        assert_eq!(value["username"], "Alice");
        assert_eq!(value["chatPartners"][0], "bob");
    }
}
