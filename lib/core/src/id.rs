use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to a caller-owned entity (staff member, activity, case)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityId::String(s) => write!(f, "{}", s),
            EntityId::Uuid(u) => write!(f, "{}", u),
            EntityId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId::String(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::String(s.to_string())
    }
}

impl From<u64> for EntityId {
    fn from(i: u64) -> Self {
        EntityId::Integer(i)
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        EntityId::Uuid(u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_serde() {
        let ids: Vec<EntityId> = serde_json::from_str(r#"[7, "staff-3"]"#).unwrap();
        assert_eq!(ids[0], EntityId::Integer(7));
        assert_eq!(ids[1], EntityId::String("staff-3".to_string()));

        let uuid = Uuid::new_v4();
        let parsed: EntityId = serde_json::from_str(&format!("\"{}\"", uuid)).unwrap();
        assert_eq!(parsed, EntityId::Uuid(uuid));
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId::from(42u64).to_string(), "42");
        assert_eq!(EntityId::from("A").to_string(), "A");
    }
}
