//! Reading item records from disk and validating them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use chatline_types::{ConversationId, Item, ItemError, ItemRecord};

/// A timeline export: records plus the conversation they belong to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineFile {
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    pub items: Vec<ItemRecord>,
}

/// Accepted on-disk shapes: the wrapped form or a bare array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum FileShape {
    Wrapped(TimelineFile),
    Bare(Vec<ItemRecord>),
}

impl From<FileShape> for TimelineFile {
    fn from(shape: FileShape) -> Self {
        match shape {
            FileShape::Wrapped(file) => file,
            FileShape::Bare(items) => TimelineFile {
                conversation_id: None,
                items,
            },
        }
    }
}

/// A record that failed construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Position in the input file.
    pub index: usize,
    pub error: ItemError,
}

/// Outcome of validating a batch of records.
#[derive(Clone, Debug, Default)]
pub struct Validated {
    pub items: Vec<Item>,
    pub rejected: Vec<Rejection>,
}

/// Parse a timeline file from JSON text.
pub fn parse_timeline(json: &str) -> Result<TimelineFile> {
    let shape: FileShape = serde_json::from_str(json).context("invalid timeline JSON")?;
    Ok(shape.into())
}

/// Read and parse a timeline file.
pub fn load_timeline(path: &Path) -> Result<TimelineFile> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file = parse_timeline(&json).with_context(|| format!("failed to parse {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        records = file.items.len(),
        conversation = ?file.conversation_id,
        "loaded timeline file"
    );
    Ok(file)
}

/// Construct every record, keeping failures alongside their input index.
pub fn validate(records: Vec<ItemRecord>) -> Validated {
    let mut out = Validated::default();
    for (index, record) in records.into_iter().enumerate() {
        match Item::try_from(record) {
            Ok(item) => out.items.push(item),
            Err(error) => {
                tracing::warn!(index, %error, "rejected item record");
                out.rejected.push(Rejection { index, error });
            }
        }
    }
    out
}
