//! Type-safe identifiers.
//!
//! Record identifiers ([`SnapshotId`], [`ChangeId`], [`EventId`]) are
//! newtype wrappers around [`uuid::Uuid`] (v4) so they cannot be confused
//! with one another. [`CompetitorId`] wraps the caller-chosen competitor
//! slug (e.g. `pizza-demo`).

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::WatchError;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

record_id! {
    /// Unique identifier of a page [`super::Snapshot`].
    SnapshotId
}

record_id! {
    /// Unique identifier of a [`super::DetectedChange`].
    ChangeId
}

record_id! {
    /// Unique identifier of an [`super::UpdateEvent`].
    EventId
}

/// Identifier of a monitored competitor.
///
/// Competitor ids are slugs chosen by the caller; they are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CompetitorId(pub(crate) String);

impl CompetitorId {
    /// Validates and wraps a competitor id.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::InvalidRequest`] if `raw` is empty or only
    /// whitespace.
    pub fn parse(raw: impl Into<String>) -> Result<Self, WatchError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WatchError::InvalidRequest(
                "competitorId must not be empty".to_string(),
            ));
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CompetitorId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
