//! Identifier newtypes
//!
//! Upstream systems hand us plain integer ids for users and statements and a
//! free-form key for discussions. Wrapping them keeps the two integer spaces
//! from being mixed up inside the matrix code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a participant who casts votes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a statement participants vote on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementId(pub u64);

/// Identifier of a discussion (one vote snapshot per discussion)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscussionId(String);

impl DiscussionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StatementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DiscussionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for StatementId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<&str> for DiscussionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DiscussionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&UserId(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&StatementId(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&DiscussionId::new("town-hall")).unwrap(),
            "\"town-hall\""
        );
    }

    #[test]
    fn test_user_id_as_map_key() {
        let mut map = BTreeMap::new();
        map.insert(UserId(12), 1usize);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"12":1}"#);

        let back: BTreeMap<UserId, usize> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&UserId(12)), Some(&1));
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId(5).to_string(), "5");
        assert_eq!(DiscussionId::from("abc").to_string(), "abc");
    }
}
