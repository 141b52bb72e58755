//! Type-safe identifier wrappers around [`Uuid`].
//!
//! World objects (customers, pickups, the player vehicle) are referenced by
//! id only; components never hold the object itself. All IDs use UUID v7 so
//! that ids created later sort later, which keeps registry iteration order
//! stable across a run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares an object or session id backed by a v7 [`Uuid`].
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh id. Ids minted later compare greater.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// The underlying UUID, for logs and persistence.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        // Logged as the bare hyphenated UUID.
        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id! {
    /// Unique identifier for a world object tracked by the game core
    /// (player vehicle, customer, pickup).
    ObjectId
}

define_id! {
    /// Unique identifier for one play session, attached to log output.
    SessionId
}
