//! Canonical ordering of timeline items.
//!
//! Items sort by timestamp. Equal timestamps fall back to the descriptor
//! (absent first, then UUIDv7 byte order, which is creation order) and then
//! to the discriminator, so the order is total and stable across runs.

use std::cmp::Ordering;

use crate::ids::DescriptorId;
use crate::item::Item;

/// Total sort key for an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineKey {
    pub timestamp: u64,
    pub descriptor: Option<DescriptorId>,
    pub discriminator: u64,
}

impl Item {
    /// The item's sort key.
    pub fn timeline_key(&self) -> TimelineKey {
        TimelineKey {
            timestamp: self.timestamp(),
            descriptor: self.descriptor_id(),
            discriminator: self.discriminator(),
        }
    }

    /// Compare two items by [`TimelineKey`].
    pub fn timeline_cmp(&self, other: &Item) -> Ordering {
        self.timeline_key().cmp(&other.timeline_key())
    }
}

/// Stable sort by [`TimelineKey`].
///
/// Structural items all share the zero key and end up first, in their
/// original relative order. Callers that care about header placement should
/// use [`Timeline`](crate::Timeline) instead.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(Item::timeline_cmp);
}
