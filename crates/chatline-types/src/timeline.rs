//! Ordered item sequence with context-placed headers.
//!
//! Content items are kept in [`TimelineKey`](crate::TimelineKey) order.
//! Headers are never stored on their own terms: they are derived from the
//! policy and re-placed after every mutation, one immediately before the
//! first item of each local calendar day.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TimelineError;
use crate::ids::DescriptorId;
use crate::item::Item;

/// Milliseconds in a calendar day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// How a timeline places structural items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelinePolicy {
    /// Insert a header before the first item of each day.
    pub date_headers: bool,
    /// Offset from UTC used to find day boundaries.
    pub utc_offset_minutes: i32,
}

impl Default for TimelinePolicy {
    fn default() -> Self {
        Self {
            date_headers: true,
            utc_offset_minutes: 0,
        }
    }
}

/// Local calendar day of a Unix-millis timestamp.
pub fn day_index(timestamp: u64, utc_offset_minutes: i32) -> i64 {
    let millis = i64::try_from(timestamp).unwrap_or(i64::MAX);
    let offset = i64::from(utc_offset_minutes) * 60_000;
    millis.saturating_add(offset).div_euclid(MILLIS_PER_DAY)
}

/// A conversation's items in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timeline {
    policy: TimelinePolicy,
    entries: Vec<Item>,
}

impl Timeline {
    /// An empty timeline.
    pub fn new(policy: TimelinePolicy) -> Self {
        Self {
            policy,
            entries: Vec::new(),
        }
    }

    /// Build from unordered items.
    ///
    /// Incoming headers are dropped (they are re-derived). When two items
    /// share a descriptor the later one in `items` wins, whatever its variant.
    pub fn from_items(items: impl IntoIterator<Item = Item>, policy: TimelinePolicy) -> Self {
        let mut slots: Vec<Item> = Vec::new();
        let mut by_descriptor: HashMap<DescriptorId, usize> = HashMap::new();
        let mut dropped = 0usize;

        for item in items {
            let Some(descriptor) = item.descriptor_id() else {
                dropped += 1;
                continue;
            };
            match by_descriptor.get(&descriptor) {
                Some(&slot) => {
                    tracing::debug!(
                        %descriptor,
                        replaced = %slots[slot].item_type(),
                        item_type = %item.item_type(),
                        "duplicate descriptor, keeping the later item"
                    );
                    slots[slot] = item;
                }
                None => {
                    by_descriptor.insert(descriptor, slots.len());
                    slots.push(item);
                }
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "ignoring supplied structural items");
        }

        slots.sort_by(Item::timeline_cmp);
        let mut timeline = Self::new(policy);
        timeline.place(slots);
        timeline
    }

    pub fn policy(&self) -> TimelinePolicy {
        self.policy
    }

    /// Change the policy and re-place headers.
    pub fn set_policy(&mut self, policy: TimelinePolicy) {
        self.policy = policy;
        let content = self.take_content();
        self.place(content);
    }

    /// Insert or replace a content item.
    ///
    /// Returns the item it replaced (same descriptor), if any.
    pub fn insert(&mut self, item: Item) -> Result<Option<Item>, TimelineError> {
        let Some(descriptor) = item.descriptor_id() else {
            return Err(TimelineError::StructuralInsert);
        };

        let mut content = self.take_content();
        let replaced = content
            .iter()
            .position(|existing| existing.descriptor_id() == Some(descriptor))
            .map(|at| content.remove(at));
        if replaced.is_some() {
            tracing::debug!(%descriptor, "replacing timeline item");
        }

        let key = item.timeline_key();
        let at = content.partition_point(|existing| existing.timeline_key() <= key);
        content.insert(at, item);
        self.place(content);
        Ok(replaced)
    }

    /// Remove the item backed by `descriptor`.
    pub fn remove(&mut self, descriptor: DescriptorId) -> Option<Item> {
        let at = self.position(descriptor)?;
        let removed = self.entries.remove(at);
        let content = self.take_content();
        self.place(content);
        Some(removed)
    }

    /// The item backed by `descriptor`.
    pub fn get(&self, descriptor: DescriptorId) -> Option<&Item> {
        self.position(descriptor).map(|at| &self.entries[at])
    }

    /// Display index of the item backed by `descriptor` (headers included).
    pub fn position(&self, descriptor: DescriptorId) -> Option<usize> {
        self.entries
            .iter()
            .position(|item| item.descriptor_id() == Some(descriptor))
    }

    /// All entries in display order, headers included.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.entries.iter()
    }

    /// Entries including headers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries excluding headers.
    pub fn content_len(&self) -> usize {
        self.entries.iter().filter(|i| !i.is_structural()).count()
    }

    /// Items from remote participants, in order.
    pub fn peer_items(&self) -> impl Iterator<Item = &Item> {
        self.entries.iter().filter(|i| i.is_peer_item())
    }

    /// Peer items newer than the read position.
    pub fn unread_count(&self, read_up_to: u64) -> usize {
        self.peer_items()
            .filter(|i| i.timestamp() > read_up_to)
            .count()
    }

    fn take_content(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.entries)
            .into_iter()
            .filter(|i| !i.is_structural())
            .collect()
    }

    /// Lay out ordered content, inserting headers at day boundaries.
    fn place(&mut self, content: Vec<Item>) {
        let mut entries = Vec::with_capacity(content.len() + 1);
        let mut last_day = None;
        for item in content {
            if self.policy.date_headers {
                let day = day_index(item.timestamp(), self.policy.utc_offset_minutes);
                if last_day != Some(day) {
                    entries.push(Item::header());
                    last_day = Some(day);
                }
            }
            entries.push(item);
        }
        self.entries = entries;
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
