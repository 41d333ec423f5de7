// ── Record identity ──
//
// The server assigns every record an identifier. Most deployments use
// numeric database keys, some use opaque strings; consumers never care
// which, and the client never mints one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned identifier for any record.
///
/// Serialized untagged, so it round-trips as a JSON number or string
/// exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Key(String),
}

impl EntityId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Key(_) => None,
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(s) => Some(s),
            Self::Numeric(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Key(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Numeric(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) => Self::Numeric(n),
            Err(_) => Self::Key(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_numeric_string() {
        let id = EntityId::from("1042");
        assert_eq!(id.as_numeric(), Some(1042));
    }

    #[test]
    fn entity_id_from_opaque_string() {
        let id = EntityId::from("507f1f77bcf86cd799439011".to_owned());
        assert_eq!(id.as_key(), Some("507f1f77bcf86cd799439011"));
    }

    #[test]
    fn entity_id_display() {
        assert_eq!(EntityId::Numeric(5).to_string(), "5");
        assert_eq!(EntityId::Key("abc".into()).to_string(), "abc");
    }

    #[test]
    fn entity_id_from_str() {
        let id: EntityId = "-3".parse().unwrap();
        assert_eq!(id, EntityId::Numeric(-3));
    }

    #[test]
    fn entity_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&EntityId::Numeric(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&EntityId::Key("k".into())).unwrap(),
            "\"k\""
        );
        let back: EntityId = serde_json::from_str("12").unwrap();
        assert_eq!(back, EntityId::Numeric(12));
    }
}
