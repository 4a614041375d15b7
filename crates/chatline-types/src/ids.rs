//! Typed identifiers for descriptors, peers, and conversations.
//!
//! All ID types wrap UUIDv7 (time-ordered, globally unique). They display as
//! standard UUID text for logging. The `short()` form (first 8 hex chars) is
//! for diagnostics only and never used as a lookup key.
//!
//! There is no "default descriptor" sentinel. An item without backing data
//! carries `Option::<DescriptorId>::None`; the nil UUID only shows up at the
//! record boundary, where it is read as "absent".

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a persistence-owned descriptor backing a content item.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorId(uuid::Uuid);

/// Identifier of a remote conversation participant.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(uuid::Uuid);

/// Identifier of a conversation (one timeline).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(uuid::Uuid);

// ── Shared behavior ─────────────────────────────────────────────────────────

macro_rules! impl_typed_id {
    ($T:ident, $name:literal) => {
        impl $T {
            /// Create a new time-ordered ID (UUIDv7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// First 8 hex characters, for human display only.
            pub fn short(&self) -> String {
                self.0.as_simple().to_string()[..8].to_string()
            }

            /// Full 32-character hex string (no hyphens).
            pub fn to_hex(&self) -> String {
                self.0.as_simple().to_string()
            }

            /// Check if a query string matches this ID by hex prefix.
            pub fn matches_hex_prefix(&self, prefix: &str) -> bool {
                self.to_hex().starts_with(&prefix.to_ascii_lowercase())
            }

            /// A nil / zero ID. Only meaningful at the record boundary.
            pub fn nil() -> Self {
                Self(uuid::Uuid::nil())
            }

            /// Check if this is the nil ID.
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }

            /// `None` for the nil ID, which records use to mean "absent".
            pub fn non_nil(self) -> Option<Self> {
                (!self.is_nil()).then_some(self)
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $name, self.short())
            }
        }
    };
}

impl_typed_id!(DescriptorId, "DescriptorId");
impl_typed_id!(PeerId, "PeerId");
impl_typed_id!(ConversationId, "ConversationId");

// ── Prefix resolution ───────────────────────────────────────────────────────

/// Error from prefix resolution.
#[derive(Debug, thiserror::Error)]
pub enum PrefixError {
    #[error("no match for prefix '{0}'")]
    NoMatch(String),
    #[error("ambiguous prefix '{prefix}': matches {candidates:?}")]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
}

/// Resolve a hex prefix against a set of descriptor IDs.
///
/// Matching is case-insensitive. The prefix must match exactly one
/// distinct descriptor.
pub fn resolve_descriptor_prefix(
    descriptors: impl Iterator<Item = DescriptorId>,
    query: &str,
) -> Result<DescriptorId, PrefixError> {
    let mut matches: Vec<DescriptorId> = descriptors
        .filter(|id| id.matches_hex_prefix(query))
        .collect();
    matches.sort();
    matches.dedup();

    match matches.len() {
        0 => Err(PrefixError::NoMatch(query.to_string())),
        1 => Ok(matches[0]),
        _ => Err(PrefixError::Ambiguous {
            prefix: query.to_string(),
            candidates: matches.iter().map(|id| id.short()).collect(),
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
