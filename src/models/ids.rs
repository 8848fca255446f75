//! Platform snowflake identifiers.
//!
//! Kept independent of the Discord client types so the routing core can be
//! exercised without a live gateway.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw numeric value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

snowflake!(
    /// Identifier of a guild (community).
    GuildId
);
snowflake!(
    /// Identifier of a user or guild member.
    UserId
);
snowflake!(
    /// Identifier of a text or voice channel.
    ChannelId
);

impl UserId {
    /// Chat mention markup for this user.
    #[must_use]
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }
}

impl ChannelId {
    /// Chat mention markup for this channel.
    #[must_use]
    pub fn mention(self) -> String {
        format!("<#{}>", self.0)
    }
}
