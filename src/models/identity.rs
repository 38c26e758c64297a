use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Identity of a canvas element as supplied by the client.
///
/// Clients mark new elements by omitting the id (or sending null or an empty
/// string); anything else must be a UUID naming an existing row. New elements
/// may also arrive with a client-assigned UUID, which is kept as given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    New,
    Existing(Uuid),
}

impl Identity {
    /// Returns the existing id, or generates a fresh one for new elements.
    pub fn resolve(&self) -> Uuid {
        match self {
            Identity::New => Uuid::new_v4(),
            Identity::Existing(id) => *id,
        }
    }

    /// Returns the id only if the client named an existing row.
    pub fn existing(&self) -> Option<Uuid> {
        match self {
            Identity::New => None,
            Identity::Existing(id) => Some(*id),
        }
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Identity::New => serializer.serialize_none(),
            Identity::Existing(id) => serializer.serialize_some(id),
        }
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(Identity::New),
            Some(s) => Uuid::parse_str(s)
                .map(Identity::Existing)
                .map_err(|_| D::Error::custom(format!("invalid element id: {}", s))),
        }
    }
}
