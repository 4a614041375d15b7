//! Conversation timeline item model for chatline.
//!
//! Every entry a conversation view shows (messages, attachments, calls, and
//! structural separators) is one [`Item`]. Consumers sort, filter, and diff a
//! single homogeneous sequence and dispatch on [`ItemType`] only where
//! behavior is genuinely type-specific. This crate has no I/O and no internal
//! chatline dependencies.
//!
//! # Relationships
//!
//! ```text
//! Item (sum over ItemType)
//!     ├── Header ← structural, no descriptor, timestamp 0, never from a peer
//!     ├── Text   ─┐
//!     ├── Media   ├─ backed by DescriptorId (persistence-owned)
//!     └── Call   ─┘  authored by Author::Local or Author::Peer(PeerId)
//!
//! ItemRecord ──try_from──▶ Item   (the only place construction can fail)
//! Item ──timeline_key──▶ TimelineKey (timestamp, descriptor, discriminator)
//! Timeline ← ordered content items + policy-placed headers
//! ```
//!
//! # Key Types
//!
//! |-------------------|----------------------------------------------|
//! | Type              | Purpose                                      |
//! |-------------------|----------------------------------------------|
//! | [`Item`]          | One timeline entry                           |
//! | [`ItemType`]      | Closed variant tag                           |
//! | [`ItemRecord`]    | Flat serde form from the persistence layer   |
//! | [`ItemBuilder`]   | Chained construction with validation         |
//! | [`DebugFields`]   | `key: value` debug fragment                  |
//! | [`TimelineKey`]   | Total sort key                               |
//! | [`Timeline`]      | Ordered sequence with date headers           |
//! | [`DescriptorId`]  | Backing data reference                       |
//! |-------------------|----------------------------------------------|

pub mod describe;
pub mod error;
pub mod flags;
pub mod ids;
pub mod item;
pub mod order;
pub mod record;
pub mod timeline;

// Re-export primary types at crate root for convenience.
pub use describe::DebugFields;
pub use error::{ItemError, TimelineError};
pub use flags::{CallFlags, MediaFlags};
pub use ids::{ConversationId, DescriptorId, PeerId, PrefixError, resolve_descriptor_prefix};
pub use item::{
    Author, CallItem, CallOutcome, HeaderItem, Item, ItemType, MediaItem, MediaKind, TextItem,
};
pub use order::{TimelineKey, sort_items};
pub use record::{ItemBuilder, ItemRecord};
pub use timeline::{MILLIS_PER_DAY, Timeline, TimelinePolicy, day_index};
