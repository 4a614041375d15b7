//! Subcommand implementations. Each returns the text to print.

use std::fmt;

use anyhow::{Context, Result};

use chatline_types::{Item, Timeline, TimelinePolicy, resolve_descriptor_prefix};

use crate::load::{Rejection, TimelineFile, validate};

/// Order the file's valid items into a timeline and render every entry.
///
/// Rejected records are skipped (and logged); use [`check`] to list them.
pub fn dump(file: TimelineFile, policy: TimelinePolicy) -> String {
    let validated = validate(file.items);
    let timeline = Timeline::from_items(validated.items, policy);
    tracing::info!(
        conversation = ?file.conversation_id,
        entries = timeline.len(),
        content = timeline.content_len(),
        skipped = validated.rejected.len(),
        "built timeline"
    );
    render(timeline.iter())
}

/// Render items as debug strings separated by blank lines.
pub fn render<'a>(items: impl Iterator<Item = &'a Item>) -> String {
    items
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validation summary for `check`.
#[derive(Clone, Debug)]
pub struct CheckReport {
    pub valid: usize,
    pub rejected: Vec<Rejection>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ok() {
            return writeln!(f, "ok: {} items", self.valid);
        }
        for rejection in &self.rejected {
            writeln!(f, "record {}: {}", rejection.index, rejection.error)?;
        }
        writeln!(
            f,
            "{} rejected, {} valid",
            self.rejected.len(),
            self.valid
        )
    }
}

/// Validate every record without building a timeline.
pub fn check(file: TimelineFile) -> CheckReport {
    let validated = validate(file.items);
    CheckReport {
        valid: validated.items.len(),
        rejected: validated.rejected,
    }
}

/// Render the single item whose descriptor hex starts with `prefix`.
///
/// Records sharing a descriptor collapse the way [`dump`] collapses them,
/// so the later one is shown.
pub fn show(file: TimelineFile, prefix: &str) -> Result<String> {
    let policy = TimelinePolicy {
        date_headers: false,
        ..TimelinePolicy::default()
    };
    let timeline = Timeline::from_items(validate(file.items).items, policy);
    let descriptor =
        resolve_descriptor_prefix(timeline.iter().filter_map(Item::descriptor_id), prefix)
            .context("no single item matches")?;
    timeline
        .get(descriptor)
        .map(|item| item.to_string())
        .with_context(|| format!("descriptor {descriptor} vanished"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatline_types::{
        Author, DescriptorId, ItemError, ItemRecord, ItemType, MediaItem, MediaKind, TextItem,
    };

    // ── check ───────────────────────────────────────────────────────────

    #[test]
    fn test_check_report_ok() {
        let report = CheckReport {
            valid: 3,
            rejected: Vec::new(),
        };
        assert!(report.is_ok());
        assert_eq!(report.to_string(), "ok: 3 items\n");
    }

    #[test]
    fn test_check_report_lists_rejections() {
        let report = CheckReport {
            valid: 1,
            rejected: vec![Rejection {
                index: 4,
                error: ItemError::UnexpectedPeer(ItemType::Header),
            }],
        };
        assert_eq!(
            report.to_string(),
            "record 4: header items are never peer-originated\n1 rejected, 1 valid\n"
        );
    }

    // ── dump ────────────────────────────────────────────────────────────

    #[test]
    fn test_dump_empty_file() {
        assert_eq!(dump(TimelineFile::default(), TimelinePolicy::default()), "");
    }

    #[test]
    fn test_dump_drops_supplied_header_without_content() {
        let file = TimelineFile {
            conversation_id: None,
            items: vec![ItemRecord {
                item_type: "header".into(),
                ..ItemRecord::default()
            }],
        };
        assert_eq!(dump(file, TimelinePolicy::default()), "");
    }

    // ── show ────────────────────────────────────────────────────────────

    #[test]
    fn test_show_shared_descriptor_renders_later_item() {
        let d = DescriptorId::new();
        let text: Item = TextItem::new(d, Author::Local, 10, "m").into();
        let media: Item =
            MediaItem::new(d, Author::Local, 20, MediaKind::Image, "image/png").into();
        let file = TimelineFile {
            conversation_id: None,
            items: vec![ItemRecord::from(&text), ItemRecord::from(&media)],
        };

        let out = show(file.clone(), &d.short()).unwrap();
        assert_eq!(out, media.to_string());

        let dumped = dump(file, TimelinePolicy::default());
        assert!(!dumped.contains("TextItem"));
        assert_eq!(dumped.matches("MediaItem").count(), 1);
    }
}
