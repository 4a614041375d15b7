//! Error types for item construction and timeline updates.

use thiserror::Error;

use crate::item::ItemType;

/// Invalid construction of an [`Item`](crate::Item).
///
/// Construction is the only place an item can be rejected. Every query on a
/// constructed item is total.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// Numeric or string type tag outside the closed set.
    #[error("unknown item type: {0}")]
    UnknownType(String),

    /// A structural item was given a backing descriptor.
    #[error("{0} items carry no descriptor")]
    UnexpectedDescriptor(ItemType),

    /// A content item has no (or a nil) backing descriptor.
    #[error("{0} items require a descriptor")]
    MissingDescriptor(ItemType),

    /// A structural item was given a non-zero discriminator.
    #[error("{item_type} items must have discriminator 0, got {value}")]
    NonZeroDiscriminator { item_type: ItemType, value: u64 },

    /// A structural item was given a timestamp.
    #[error("{item_type} items must have timestamp 0, got {value}")]
    UnexpectedTimestamp { item_type: ItemType, value: u64 },

    /// A structural item was attributed to a peer.
    #[error("{0} items are never peer-originated")]
    UnexpectedPeer(ItemType),

    /// Flag bits outside the variant's defined set.
    #[error("unknown {item_type} flag bits: {bits:#x}")]
    UnknownFlags { item_type: ItemType, bits: u64 },

    /// Discriminator does not fit the variant's flag width.
    #[error("{item_type} discriminator {value:#x} exceeds 32 bits")]
    DiscriminatorOverflow { item_type: ItemType, value: u64 },

    /// A field the variant requires is absent.
    #[error("{item_type} item is missing field '{field}'")]
    MissingField {
        item_type: ItemType,
        field: &'static str,
    },

    /// A structural item was given a payload field.
    #[error("{item_type} items carry no '{field}'")]
    UnexpectedField {
        item_type: ItemType,
        field: &'static str,
    },

    /// A call that never connected reports a duration.
    #[error("{outcome} call cannot have a duration")]
    InconsistentCall { outcome: crate::item::CallOutcome },
}

/// Rejected timeline mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Structural items are placed by the timeline itself.
    #[error("structural items are placed by the timeline, not inserted")]
    StructuralInsert,
}

/// Result type for item construction.
pub type Result<T> = std::result::Result<T, ItemError>;
