//! Flag sets carried in the discriminator of media and call items.

use crate::error::{ItemError, Result};
use crate::item::ItemType;

bitflags::bitflags! {
    /// Media attachment state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MediaFlags: u32 {
        /// A thumbnail is available for preview.
        const THUMBNAIL = 1 << 0;
        /// Full content has been fetched locally.
        const DOWNLOADED = 1 << 1;
        /// View-once media; discarded after display.
        const EPHEMERAL = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Call properties.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CallFlags: u32 {
        /// Video was offered.
        const VIDEO = 1 << 0;
        /// More than two participants.
        const GROUP = 1 << 1;
    }
}

impl Default for MediaFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl Default for CallFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Narrow a record discriminator to a flag word, rejecting anything wider.
fn flag_word(item_type: ItemType, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| ItemError::DiscriminatorOverflow { item_type, value })
}

impl MediaFlags {
    /// Strict decode from a record discriminator.
    pub fn from_discriminator(value: u64) -> Result<Self> {
        let word = flag_word(ItemType::Media, value)?;
        Self::from_bits(word).ok_or(ItemError::UnknownFlags {
            item_type: ItemType::Media,
            bits: u64::from(word & !Self::all().bits()),
        })
    }

    /// Names of set flags joined with `|`, or `none`.
    pub fn describe(&self) -> String {
        join_names(self.iter_names().map(|(name, _)| name))
    }
}

impl CallFlags {
    /// Strict decode from a record discriminator.
    pub fn from_discriminator(value: u64) -> Result<Self> {
        let word = flag_word(ItemType::Call, value)?;
        Self::from_bits(word).ok_or(ItemError::UnknownFlags {
            item_type: ItemType::Call,
            bits: u64::from(word & !Self::all().bits()),
        })
    }

    /// Names of set flags joined with `|`, or `none`.
    pub fn describe(&self) -> String {
        join_names(self.iter_names().map(|(name, _)| name))
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join("|");
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined.to_ascii_lowercase()
    }
}
