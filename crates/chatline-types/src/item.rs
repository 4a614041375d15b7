//! Timeline items: the polymorphic entries of a conversation view.
//!
//! ## Design: one closed sum type
//!
//! [`Item`] has one case per [`ItemType`]. Each case owns a struct with the
//! fields that variant needs, and every capability (`timestamp`,
//! `is_peer_item`, `describe`, ...) is an exhaustive `match`. Adding a variant
//! is a compile error everywhere a capability forgets it.
//!
//! Two families:
//!
//! - **Structural** ([`HeaderItem`]): synthetic separators. No descriptor, no
//!   discriminator, timestamp 0, never from a peer. Their position comes from
//!   insertion context (see [`Timeline`](crate::Timeline)), not from a key.
//! - **Content** ([`TextItem`], [`MediaItem`], [`CallItem`]): always backed
//!   by a [`DescriptorId`], ordered by their own timestamp.
//!
//! The discriminator is variant-owned: a revision number for text, a flag
//! word for media and calls, always 0 for headers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::describe::DebugFields;
use crate::error::{ItemError, Result};
use crate::flags::{CallFlags, MediaFlags};
use crate::ids::{DescriptorId, PeerId};
use crate::record::ItemRecord;

/// Which kind of entry an item is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum ItemType {
    /// Structural separator (date boundary, unread marker).
    Header,
    /// Text message.
    Text,
    /// Image, video, audio or file attachment.
    Media,
    /// Voice or video call record.
    Call,
}

impl ItemType {
    /// Every variant, in tag order.
    pub const ALL: [ItemType; 4] = [
        ItemType::Header,
        ItemType::Text,
        ItemType::Media,
        ItemType::Call,
    ];

    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Stable numeric tag.
    pub fn tag(&self) -> u8 {
        match self {
            ItemType::Header => 0,
            ItemType::Text => 1,
            ItemType::Media => 2,
            ItemType::Call => 3,
        }
    }

    /// Inverse of [`tag`](Self::tag).
    pub fn from_tag(tag: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| ItemError::UnknownType(tag.to_string()))
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Header => "header",
            ItemType::Text => "text",
            ItemType::Media => "media",
            ItemType::Call => "call",
        }
    }

    /// Name used on the first line of an item's debug string.
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemType::Header => "HeaderItem",
            ItemType::Text => "TextItem",
            ItemType::Media => "MediaItem",
            ItemType::Call => "CallItem",
        }
    }

    /// Synthetic entry with no backing descriptor.
    pub fn is_structural(&self) -> bool {
        matches!(self, ItemType::Header)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who produced a content item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Author {
    /// This device / account.
    Local,
    /// A remote participant.
    Peer(PeerId),
}

impl Author {
    pub fn is_peer(&self) -> bool {
        matches!(self, Author::Peer(_))
    }

    pub fn peer_id(&self) -> Option<PeerId> {
        match self {
            Author::Local => None,
            Author::Peer(id) => Some(*id),
        }
    }

    pub(crate) fn from_peer(peer_id: Option<PeerId>) -> Self {
        match peer_id.and_then(PeerId::non_nil) {
            Some(id) => Author::Peer(id),
            None => Author::Local,
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Author::Local => write!(f, "local"),
            Author::Peer(id) => write!(f, "peer:{}", id.short()),
        }
    }
}

/// What a media item holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MediaKind {
    #[default]
    Image,
    Video,
    Audio,
    /// Any other attachment.
    #[strum(serialize = "file", serialize = "document")]
    File,
}

impl MediaKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::File => "file",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum CallOutcome {
    /// Connected; may carry a duration.
    #[strum(serialize = "answered", serialize = "completed")]
    Answered,
    /// Rang out unanswered.
    Missed,
    /// Rejected by the callee.
    #[strum(serialize = "declined", serialize = "rejected")]
    Declined,
    /// Never connected (network or device error).
    Failed,
}

impl CallOutcome {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Answered => "answered",
            CallOutcome::Missed => "missed",
            CallOutcome::Declined => "declined",
            CallOutcome::Failed => "failed",
        }
    }

    /// Whether the call ever connected.
    pub fn connected(&self) -> bool {
        matches!(self, CallOutcome::Answered)
    }
}

impl fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Variants
// ============================================================================

/// Structural separator. Carries nothing; every instance behaves the same.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeaderItem;

impl HeaderItem {
    pub fn new() -> Self {
        HeaderItem
    }

    /// Header-specific debug lines (none).
    pub fn fields(&self) -> DebugFields {
        DebugFields::new()
    }
}

/// A text message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextItem {
    descriptor: DescriptorId,
    revision: u64,
    sent_at: u64,
    author: Author,
    body: String,
}

impl TextItem {
    /// Create a text item at revision 0.
    pub fn new(
        descriptor: DescriptorId,
        author: Author,
        sent_at: u64,
        body: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            revision: 0,
            sent_at,
            author,
            body: body.into(),
        }
    }

    /// Set the edit/resend revision (the text discriminator).
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn descriptor(&self) -> DescriptorId {
        self.descriptor
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sent_at(&self) -> u64 {
        self.sent_at
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Text-specific debug lines. Bodies are summarized by length only.
    pub fn fields(&self) -> DebugFields {
        DebugFields::new()
            .field("author", self.author)
            .field("revision", self.revision)
            .field("body_len", self.body.chars().count())
    }
}

/// An attachment.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaItem {
    descriptor: DescriptorId,
    sent_at: u64,
    author: Author,
    media_kind: MediaKind,
    mime_type: String,
    size_bytes: u64,
    caption: Option<String>,
    flags: MediaFlags,
}

impl MediaItem {
    /// Create a media item with no size, caption or flags.
    pub fn new(
        descriptor: DescriptorId,
        author: Author,
        sent_at: u64,
        media_kind: MediaKind,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            descriptor,
            sent_at,
            author,
            media_kind,
            mime_type: mime_type.into(),
            size_bytes: 0,
            caption: None,
            flags: MediaFlags::empty(),
        }
    }

    pub fn with_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_flags(mut self, flags: MediaFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn descriptor(&self) -> DescriptorId {
        self.descriptor
    }

    pub fn sent_at(&self) -> u64 {
        self.sent_at
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media_kind
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn flags(&self) -> MediaFlags {
        self.flags
    }

    pub fn fields(&self) -> DebugFields {
        DebugFields::new()
            .field("author", self.author)
            .field("media_kind", self.media_kind)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", self.size_bytes)
            .field("has_caption", self.caption.is_some())
            .field("flags", self.flags.describe())
    }
}

/// A call record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallItem {
    descriptor: DescriptorId,
    started_at: u64,
    author: Author,
    outcome: CallOutcome,
    duration_ms: Option<u64>,
    flags: CallFlags,
}

impl CallItem {
    /// Create a call record.
    ///
    /// `author` is the caller. Only answered calls may carry a duration.
    pub fn new(
        descriptor: DescriptorId,
        author: Author,
        started_at: u64,
        outcome: CallOutcome,
        duration_ms: Option<u64>,
        flags: CallFlags,
    ) -> Result<Self> {
        if duration_ms.is_some() && !outcome.connected() {
            return Err(ItemError::InconsistentCall { outcome });
        }
        Ok(Self {
            descriptor,
            started_at,
            author,
            outcome,
            duration_ms,
            flags,
        })
    }

    pub fn descriptor(&self) -> DescriptorId {
        self.descriptor
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn outcome(&self) -> CallOutcome {
        self.outcome
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.duration_ms
    }

    pub fn flags(&self) -> CallFlags {
        self.flags
    }

    pub fn fields(&self) -> DebugFields {
        DebugFields::new()
            .field("author", self.author)
            .field("outcome", self.outcome)
            .opt_field("duration_ms", self.duration_ms)
            .field("flags", self.flags.describe())
    }
}

// ============================================================================
// Item
// ============================================================================

/// One entry of a conversation timeline.
///
/// Immutable once built: variants expose getters only. Serialization goes
/// through [`ItemRecord`], so deserializing runs the same validation as any
/// other construction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord", into = "ItemRecord")]
pub enum Item {
    Header(HeaderItem),
    Text(TextItem),
    Media(MediaItem),
    Call(CallItem),
}

impl Item {
    /// A structural separator.
    pub fn header() -> Self {
        Item::Header(HeaderItem::new())
    }

    /// The variant tag. Fixed for the item's lifetime.
    pub fn item_type(&self) -> ItemType {
        match self {
            Item::Header(_) => ItemType::Header,
            Item::Text(_) => ItemType::Text,
            Item::Media(_) => ItemType::Media,
            Item::Call(_) => ItemType::Call,
        }
    }

    /// Backing descriptor; `None` exactly for structural items.
    ///
    /// A descriptor is one persisted object, so it also identifies the item
    /// within a timeline regardless of variant.
    pub fn descriptor_id(&self) -> Option<DescriptorId> {
        match self {
            Item::Header(_) => None,
            Item::Text(t) => Some(t.descriptor),
            Item::Media(m) => Some(m.descriptor),
            Item::Call(c) => Some(c.descriptor),
        }
    }

    /// Variant-owned secondary key: text revision, media/call flag word, or 0.
    pub fn discriminator(&self) -> u64 {
        match self {
            Item::Header(_) => 0,
            Item::Text(t) => t.revision,
            Item::Media(m) => u64::from(m.flags.bits()),
            Item::Call(c) => u64::from(c.flags.bits()),
        }
    }

    /// Whether a remote participant produced this item.
    pub fn is_peer_item(&self) -> bool {
        self.author().is_some_and(|a| a.is_peer())
    }

    /// Ordering time in Unix millis. Structural items report 0.
    pub fn timestamp(&self) -> u64 {
        match self {
            Item::Header(_) => 0,
            Item::Text(t) => t.sent_at,
            Item::Media(m) => m.sent_at,
            Item::Call(c) => c.started_at,
        }
    }

    /// Synthetic entry with no backing data.
    pub fn is_structural(&self) -> bool {
        self.item_type().is_structural()
    }

    /// Author of a content item; `None` for structural items.
    pub fn author(&self) -> Option<Author> {
        match self {
            Item::Header(_) => None,
            Item::Text(t) => Some(t.author),
            Item::Media(m) => Some(m.author),
            Item::Call(c) => Some(c.author),
        }
    }

    /// Fields shared by every variant, in fixed order.
    pub fn base_fields(&self) -> DebugFields {
        DebugFields::new()
            .field("type", self.item_type())
            .opt_field("descriptor", self.descriptor_id())
            .field("discriminator", self.discriminator())
            .field("timestamp", self.timestamp())
            .field("peer", self.is_peer_item())
    }

    /// Full debug fragment: shared fields, then the variant's own.
    pub fn describe(&self) -> DebugFields {
        let own = match self {
            Item::Header(h) => h.fields(),
            Item::Text(t) => t.fields(),
            Item::Media(m) => m.fields(),
            Item::Call(c) => c.fields(),
        };
        self.base_fields().extend(own)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.item_type().type_name())?;
        write!(f, "{}", self.describe())
    }
}

impl From<HeaderItem> for Item {
    fn from(h: HeaderItem) -> Self {
        Item::Header(h)
    }
}

impl From<TextItem> for Item {
    fn from(t: TextItem) -> Self {
        Item::Text(t)
    }
}

impl From<MediaItem> for Item {
    fn from(m: MediaItem) -> Self {
        Item::Media(m)
    }
}

impl From<CallItem> for Item {
    fn from(c: CallItem) -> Self {
        Item::Call(c)
    }
}

// ============================================================================
// Tests
// ============================================================================
