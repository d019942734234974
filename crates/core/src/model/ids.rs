use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an id from a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u64);

        impl $name {
            #[must_use]
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            #[must_use]
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map(Self).map_err(|_| ParseIdError {
                    kind: stringify!($name),
                })
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a level within a game's catalog
    LevelId
);

numeric_id!(
    /// Unique identifier for a content item supplied by a content pack
    ItemId
);

numeric_id!(
    /// Identifier of one answer option inside a challenge
    ///
    /// Options are built from content items, so an `AnswerId` is derived
    /// from the item it presents.
    AnswerId
);

numeric_id!(
    /// Identifier of a challenge within one round
    ChallengeId
);

impl From<ItemId> for AnswerId {
    fn from(item: ItemId) -> Self {
        Self(item.value())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_id_display_and_parse() {
        let id = LevelId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!("42".parse::<LevelId>().unwrap(), id);
    }

    #[test]
    fn item_id_from_str_invalid() {
        let result = "not-a-number".parse::<ItemId>();
        assert!(result.is_err());
    }

    #[test]
    fn answer_id_is_derived_from_item() {
        let item = ItemId::new(7);
        assert_eq!(AnswerId::from(item), AnswerId::new(7));
    }

    #[test]
    fn debug_names_the_id_kind() {
        assert_eq!(format!("{:?}", ChallengeId::new(3)), "ChallengeId(3)");
        let err = "x".parse::<LevelId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse LevelId from string");
    }

    #[test]
    fn answer_id_parse_tolerates_whitespace() {
        let id: AnswerId = " 13 ".parse().unwrap();
        assert_eq!(id, AnswerId::new(13));
    }
}
