//! String-backed identifiers for every entity the studio owns.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a movie project, e.g. "proj-3".
    ProjectId
);
string_id!(
    /// Identifier of a director or actor on the roster.
    TalentId
);
string_id!(
    /// Identifier of a script offered on the market.
    ScriptId
);
string_id!(
    /// Identifier of a pending crisis, e.g. "crisis-12".
    CrisisId
);
string_id!(
    /// Identifier of a queued decision, e.g. "decision-4".
    DecisionId
);
string_id!(
    /// Identifier of a resolution option within a crisis or decision.
    OptionId
);
string_id!(
    /// Identifier of an exhibitor, financier or distributor.
    PartnerId
);
string_id!(
    /// Identifier of a booked distribution deal (release window).
    DealId
);
