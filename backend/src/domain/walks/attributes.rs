//! Descriptive walk attributes chosen by the host.
//!
//! Each attribute is a closed set serialised in lowercase, matching the
//! values stored in PostgreSQL and accepted over HTTP.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when parsing a walk attribute from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {attribute} value: {value}")]
pub struct ParseWalkAttributeError {
    /// Attribute being parsed, e.g. `pace`.
    pub attribute: &'static str,
    /// Offending input.
    pub value: String,
}

macro_rules! walk_attribute {
    (
        $(#[$meta:meta])*
        $name:ident as $label:literal {
            $( $(#[$variant_meta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$variant_meta])* $variant, )+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Lowercase wire and storage representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseWalkAttributeError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(ParseWalkAttributeError {
                        attribute: $label,
                        value: value.to_owned(),
                    }),
                }
            }
        }
    };
}

walk_attribute! {
    /// Walking pace.
    Pace as "pace" {
        Slow => "slow",
        Medium => "medium",
        Fast => "fast",
    }
}

walk_attribute! {
    /// Kind of ground the walk covers.
    Terrain as "terrain" {
        City => "city",
        Nature => "nature",
        Mixed => "mixed",
    }
}

walk_attribute! {
    /// How much talking the host expects.
    ConversationMode as "conversation mode" {
        Silent => "silent",
        Light => "light",
        Talk => "talk",
    }
}

walk_attribute! {
    /// Whether dogs are welcome.
    DogPolicy as "dog policy" {
        Yes => "yes",
        No => "no",
        Indifferent => "indifferent",
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn every_pace_round_trips_through_text() {
        for pace in Pace::ALL {
            assert_eq!(pace.as_str().parse::<Pace>(), Ok(*pace));
        }
    }

    #[rstest]
    #[case("jog")]
    #[case("Slow")]
    #[case("")]
    fn pace_rejects_unknown_text(#[case] raw: &str) {
        let err = raw.parse::<Pace>().expect_err("unknown pace");
        assert_eq!(err.attribute, "pace");
        assert_eq!(err.value, raw);
    }

    #[rstest]
    #[case(Terrain::Nature, "\"nature\"")]
    #[case(Terrain::City, "\"city\"")]
    fn terrain_serialises_lowercase(#[case] terrain: Terrain, #[case] expected: &str) {
        assert_eq!(serde_json::to_string(&terrain).expect("serialise"), expected);
    }

    #[rstest]
    fn dog_policy_error_names_attribute() {
        let err = "maybe".parse::<DogPolicy>().expect_err("unknown policy");
        assert_eq!(err.to_string(), "invalid dog policy value: maybe");
    }

    #[rstest]
    fn conversation_mode_parses_talk() {
        assert_eq!("talk".parse::<ConversationMode>(), Ok(ConversationMode::Talk));
    }
}
