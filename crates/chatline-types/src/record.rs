//! Flat record form of an item, and the validation that turns it into one.
//!
//! The persistence layer hands over [`ItemRecord`]s: every field any variant
//! might need, mostly optional. `Item::try_from(record)` is the single place
//! an inconsistent combination is rejected. Queries on the resulting [`Item`]
//! never fail.

use serde::{Deserialize, Serialize};

use crate::error::{ItemError, Result};
use crate::flags::{CallFlags, MediaFlags};
use crate::ids::{DescriptorId, PeerId};
use crate::item::{
    Author, CallItem, CallOutcome, HeaderItem, Item, ItemType, MediaItem, MediaKind, TextItem,
};

/// Serializable, unvalidated item.
///
/// Field groups:
///
/// - **Shared**: item_type, descriptor_id, discriminator, timestamp, peer_id
/// - **Text**: body
/// - **Media**: media_kind, mime_type, size_bytes, caption
/// - **Call**: call_outcome, duration_ms
///
/// A nil `descriptor_id` or `peer_id` reads as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    /// Variant name ("header", "text", "media", "call"), case-insensitive.
    pub item_type: String,
    pub descriptor_id: Option<DescriptorId>,
    /// Variant-owned: text revision, media/call flag word, 0 for headers.
    pub discriminator: u64,
    /// Unix millis. Must be 0 for headers.
    pub timestamp: u64,
    /// Remote author. Absent means local.
    pub peer_id: Option<PeerId>,

    // Text
    pub body: Option<String>,

    // Media
    pub media_kind: Option<MediaKind>,
    pub mime_type: Option<String>,
    pub size_bytes: Option<u64>,
    pub caption: Option<String>,

    // Call
    pub call_outcome: Option<CallOutcome>,
    pub duration_ms: Option<u64>,
}

impl ItemRecord {
    /// Parse the record's type name.
    pub fn parsed_type(&self) -> Result<ItemType> {
        ItemType::from_str(self.item_type.trim())
            .ok_or_else(|| ItemError::UnknownType(self.item_type.clone()))
    }

    fn descriptor(&self) -> Option<DescriptorId> {
        self.descriptor_id.and_then(DescriptorId::non_nil)
    }

    fn peer(&self) -> Option<PeerId> {
        self.peer_id.and_then(PeerId::non_nil)
    }

    fn require_descriptor(&self, item_type: ItemType) -> Result<DescriptorId> {
        self.descriptor()
            .ok_or(ItemError::MissingDescriptor(item_type))
    }

    fn header(&self) -> Result<Item> {
        let item_type = ItemType::Header;
        if self.descriptor().is_some() {
            return Err(ItemError::UnexpectedDescriptor(item_type));
        }
        if self.discriminator != 0 {
            return Err(ItemError::NonZeroDiscriminator {
                item_type,
                value: self.discriminator,
            });
        }
        if self.timestamp != 0 {
            return Err(ItemError::UnexpectedTimestamp {
                item_type,
                value: self.timestamp,
            });
        }
        if self.peer().is_some() {
            return Err(ItemError::UnexpectedPeer(item_type));
        }
        if let Some(field) = self.payload_field() {
            return Err(ItemError::UnexpectedField { item_type, field });
        }
        Ok(HeaderItem::new().into())
    }

    /// First variant payload field that is set, in declaration order.
    fn payload_field(&self) -> Option<&'static str> {
        [
            ("body", self.body.is_some()),
            ("media_kind", self.media_kind.is_some()),
            ("mime_type", self.mime_type.is_some()),
            ("size_bytes", self.size_bytes.is_some()),
            ("caption", self.caption.is_some()),
            ("call_outcome", self.call_outcome.is_some()),
            ("duration_ms", self.duration_ms.is_some()),
        ]
        .into_iter()
        .find_map(|(field, set)| set.then_some(field))
    }

    fn text(self) -> Result<Item> {
        let item_type = ItemType::Text;
        let descriptor = self.require_descriptor(item_type)?;
        let author = Author::from_peer(self.peer());
        let body = self.body.ok_or(ItemError::MissingField {
            item_type,
            field: "body",
        })?;
        Ok(TextItem::new(descriptor, author, self.timestamp, body)
            .with_revision(self.discriminator)
            .into())
    }

    fn media(self) -> Result<Item> {
        let item_type = ItemType::Media;
        let descriptor = self.require_descriptor(item_type)?;
        let flags = MediaFlags::from_discriminator(self.discriminator)?;
        let author = Author::from_peer(self.peer());
        let media_kind = self.media_kind.ok_or(ItemError::MissingField {
            item_type,
            field: "media_kind",
        })?;
        let mime_type = self
            .mime_type
            .filter(|m| !m.trim().is_empty())
            .ok_or(ItemError::MissingField {
                item_type,
                field: "mime_type",
            })?;

        let mut media = MediaItem::new(descriptor, author, self.timestamp, media_kind, mime_type)
            .with_size(self.size_bytes.unwrap_or(0))
            .with_flags(flags);
        if let Some(caption) = self.caption {
            media = media.with_caption(caption);
        }
        Ok(media.into())
    }

    fn call(self) -> Result<Item> {
        let item_type = ItemType::Call;
        let descriptor = self.require_descriptor(item_type)?;
        let flags = CallFlags::from_discriminator(self.discriminator)?;
        let outcome = self.call_outcome.ok_or(ItemError::MissingField {
            item_type,
            field: "call_outcome",
        })?;
        let author = Author::from_peer(self.peer());
        CallItem::new(
            descriptor,
            author,
            self.timestamp,
            outcome,
            self.duration_ms,
            flags,
        )
        .map(Item::from)
    }
}

impl TryFrom<ItemRecord> for Item {
    type Error = ItemError;

    fn try_from(record: ItemRecord) -> Result<Self> {
        match record.parsed_type()? {
            ItemType::Header => record.header(),
            ItemType::Text => record.text(),
            ItemType::Media => record.media(),
            ItemType::Call => record.call(),
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        ItemRecord::from(&item)
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        let mut record = ItemRecord {
            item_type: item.item_type().as_str().to_string(),
            descriptor_id: item.descriptor_id(),
            discriminator: item.discriminator(),
            timestamp: item.timestamp(),
            peer_id: item.author().and_then(|a| a.peer_id()),
            ..ItemRecord::default()
        };
        match item {
            Item::Header(_) => {}
            Item::Text(t) => {
                record.body = Some(t.body().to_string());
            }
            Item::Media(m) => {
                record.media_kind = Some(m.media_kind());
                record.mime_type = Some(m.mime_type().to_string());
                record.size_bytes = Some(m.size_bytes());
                record.caption = m.caption().map(str::to_string);
            }
            Item::Call(c) => {
                record.call_outcome = Some(c.outcome());
                record.duration_ms = c.duration_ms();
            }
        }
        record
    }
}

/// Builder for items from loose parts. Validation happens in `build()`.
///
/// ```
/// # use chatline_types::*;
/// let item = ItemBuilder::new(ItemType::Call)
///     .descriptor(DescriptorId::new())
///     .peer(PeerId::new())
///     .timestamp(1_700_000_000_000)
///     .outcome(CallOutcome::Missed)
///     .build()
///     .unwrap();
/// assert!(item.is_peer_item());
/// ```
pub struct ItemBuilder {
    record: ItemRecord,
}

impl ItemBuilder {
    /// Start building an item of the given type.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            record: ItemRecord {
                item_type: item_type.as_str().to_string(),
                ..ItemRecord::default()
            },
        }
    }

    pub fn descriptor(mut self, id: DescriptorId) -> Self {
        self.record.descriptor_id = Some(id);
        self
    }

    pub fn discriminator(mut self, value: u64) -> Self {
        self.record.discriminator = value;
        self
    }

    pub fn timestamp(mut self, millis: u64) -> Self {
        self.record.timestamp = millis;
        self
    }

    pub fn peer(mut self, id: PeerId) -> Self {
        self.record.peer_id = Some(id);
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.record.body = Some(body.into());
        self
    }

    pub fn media_kind(mut self, kind: MediaKind) -> Self {
        self.record.media_kind = Some(kind);
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.record.mime_type = Some(mime.into());
        self
    }

    pub fn size_bytes(mut self, size: u64) -> Self {
        self.record.size_bytes = Some(size);
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.record.caption = Some(caption.into());
        self
    }

    pub fn outcome(mut self, outcome: CallOutcome) -> Self {
        self.record.call_outcome = Some(outcome);
        self
    }

    pub fn duration_ms(mut self, millis: u64) -> Self {
        self.record.duration_ms = Some(millis);
        self
    }

    /// The record built so far, unvalidated.
    pub fn record(&self) -> &ItemRecord {
        &self.record
    }

    /// Validate and produce the item.
    pub fn build(self) -> Result<Item> {
        Item::try_from(self.record)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn text_record() -> ItemRecord {
        ItemRecord {
            item_type: "text".into(),
            descriptor_id: Some(DescriptorId::new()),
            discriminator: 2,
            timestamp: 1_700_000_000_000,
            peer_id: Some(PeerId::new()),
            body: Some("hi".into()),
            ..ItemRecord::default()
        }
    }

    // ── Headers ─────────────────────────────────────────────────────────

    #[test]
    fn test_default_header_record_is_valid() {
        let record = ItemRecord {
            item_type: "header".into(),
            ..ItemRecord::default()
        };
        assert_eq!(Item::try_from(record).unwrap(), Item::header());
    }

    #[test]
    fn test_header_with_nil_descriptor_is_valid() {
        let item = ItemBuilder::new(ItemType::Header)
            .descriptor(DescriptorId::nil())
            .build()
            .unwrap();
        assert_eq!(item.descriptor_id(), None);
    }

    #[test]
    fn test_header_rejections() {
        let cases = [
            (
                ItemBuilder::new(ItemType::Header).descriptor(DescriptorId::new()),
                ItemError::UnexpectedDescriptor(ItemType::Header),
            ),
            (
                ItemBuilder::new(ItemType::Header).discriminator(1),
                ItemError::NonZeroDiscriminator {
                    item_type: ItemType::Header,
                    value: 1,
                },
            ),
            (
                ItemBuilder::new(ItemType::Header).timestamp(5),
                ItemError::UnexpectedTimestamp {
                    item_type: ItemType::Header,
                    value: 5,
                },
            ),
            (
                ItemBuilder::new(ItemType::Header).peer(PeerId::new()),
                ItemError::UnexpectedPeer(ItemType::Header),
            ),
        ];
        for (builder, expected) in cases {
            assert_eq!(builder.build().unwrap_err(), expected);
        }
    }

    #[test]
    fn test_header_payload_fields_rejected() {
        let unexpected = |field| ItemError::UnexpectedField {
            item_type: ItemType::Header,
            field,
        };
        let header = || ItemBuilder::new(ItemType::Header);
        let cases = [
            (header().body("hello"), unexpected("body")),
            (header().media_kind(MediaKind::Video), unexpected("media_kind")),
            (header().mime_type("image/png"), unexpected("mime_type")),
            (header().size_bytes(0), unexpected("size_bytes")),
            (header().caption(""), unexpected("caption")),
            (header().outcome(CallOutcome::Missed), unexpected("call_outcome")),
            (header().duration_ms(5), unexpected("duration_ms")),
            // First set field in declaration order is reported.
            (header().duration_ms(5).body("hello"), unexpected("body")),
        ];
        for (builder, expected) in cases {
            assert_eq!(builder.build().unwrap_err(), expected);
        }
    }

    #[test]
    fn test_header_payload_error_message() {
        let record = ItemRecord {
            item_type: "header".into(),
            body: Some("hello".into()),
            duration_ms: Some(5),
            ..ItemRecord::default()
        };
        let err = Item::try_from(record).unwrap_err();
        assert_eq!(err.to_string(), "header items carry no 'body'");
    }

    // ── Content ─────────────────────────────────────────────────────────

    #[test]
    fn test_text_record_roundtrip() {
        let record = text_record();
        let item = Item::try_from(record.clone()).unwrap();
        assert_eq!(item.item_type(), ItemType::Text);
        assert_eq!(item.discriminator(), 2);
        assert!(item.is_peer_item());
        assert_eq!(ItemRecord::from(&item), record);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let record = ItemRecord {
            item_type: "sticker".into(),
            ..text_record()
        };
        assert_eq!(
            Item::try_from(record).unwrap_err(),
            ItemError::UnknownType("sticker".into())
        );
    }

    #[test]
    fn test_type_name_is_case_insensitive() {
        let record = ItemRecord {
            item_type: " TEXT ".into(),
            ..text_record()
        };
        assert!(Item::try_from(record).is_ok());
    }

    #[test]
    fn test_content_without_descriptor_rejected() {
        for ty in [ItemType::Text, ItemType::Media, ItemType::Call] {
            let err = ItemBuilder::new(ty).build().unwrap_err();
            assert_eq!(err, ItemError::MissingDescriptor(ty));

            let err = ItemBuilder::new(ty)
                .descriptor(DescriptorId::nil())
                .build()
                .unwrap_err();
            assert_eq!(err, ItemError::MissingDescriptor(ty));
        }
    }

    #[test]
    fn test_nil_peer_reads_as_local() {
        let record = ItemRecord {
            peer_id: Some(PeerId::nil()),
            ..text_record()
        };
        let item = Item::try_from(record).unwrap();
        assert!(!item.is_peer_item());
    }

    #[test]
    fn test_text_requires_body() {
        let err = ItemBuilder::new(ItemType::Text)
            .descriptor(DescriptorId::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ItemError::MissingField {
                item_type: ItemType::Text,
                field: "body",
            }
        );
    }

    #[test]
    fn test_media_validation() {
        let base = || {
            ItemBuilder::new(ItemType::Media)
                .descriptor(DescriptorId::new())
                .timestamp(10)
                .media_kind(MediaKind::Video)
        };

        let err = base().mime_type("  ").build().unwrap_err();
        assert_eq!(
            err,
            ItemError::MissingField {
                item_type: ItemType::Media,
                field: "mime_type",
            }
        );

        let err = base().mime_type("video/mp4").discriminator(0x80).build().unwrap_err();
        assert!(matches!(err, ItemError::UnknownFlags { bits: 0x80, .. }));

        let item = base()
            .mime_type("video/mp4")
            .discriminator(u64::from(MediaFlags::DOWNLOADED.bits()))
            .size_bytes(1 << 20)
            .caption("clip")
            .build()
            .unwrap();
        let Item::Media(m) = &item else {
            panic!("expected media, got {item:?}");
        };
        assert_eq!(m.flags(), MediaFlags::DOWNLOADED);
        assert_eq!(m.caption(), Some("clip"));
        assert_eq!(item.timestamp(), 10);
    }

    #[test]
    fn test_call_validation() {
        let base = || {
            ItemBuilder::new(ItemType::Call)
                .descriptor(DescriptorId::new())
                .timestamp(99)
        };

        let err = base().build().unwrap_err();
        assert_eq!(
            err,
            ItemError::MissingField {
                item_type: ItemType::Call,
                field: "call_outcome",
            }
        );

        let err = base()
            .outcome(CallOutcome::Declined)
            .duration_ms(1000)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ItemError::InconsistentCall {
                outcome: CallOutcome::Declined,
            }
        );

        let item = base()
            .outcome(CallOutcome::Answered)
            .duration_ms(1000)
            .discriminator(u64::from((CallFlags::VIDEO | CallFlags::GROUP).bits()))
            .build()
            .unwrap();
        assert_eq!(item.discriminator(), 0b11);
        assert!(!item.is_peer_item());
    }

    #[test]
    fn test_record_json_accepts_sparse_input() {
        let d = DescriptorId::new();
        let json = format!(
            r#"{{"item_type":"call","descriptor_id":"{d}","timestamp":7,"call_outcome":"missed"}}"#
        );
        let record: ItemRecord = serde_json::from_str(&json).unwrap();
        let item = Item::try_from(record).unwrap();
        assert_eq!(item.descriptor_id(), Some(d));
        assert_eq!(item.timestamp(), 7);
    }

    #[test]
    fn test_record_postcard_roundtrip() {
        let record = text_record();
        let bytes = postcard::to_stdvec(&record).unwrap();
        let parsed: ItemRecord = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(record, parsed);
    }
}
