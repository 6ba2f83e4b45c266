//! Read-only snapshot of a block storage volume as reported by the provider.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Deserialize;
use std::fmt;

/// Tag key that exempts a volume from cleanup when set to `True` or `true`.
pub const IGNORE_TAG: &str = "lambda-ebs-cleanup:ignore";

const IGNORE_VALUES: [&str; 2] = ["True", "true"];

#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub id: String,
    pub create_time: DateTime<FixedOffset>,
    pub attachments: Vec<Attachment>,
    /// `None` when the provider returned no tag collection at all.
    pub tags: Option<TagSet>,
}

impl Volume {
    pub fn new(id: impl Into<String>, create_time: DateTime<FixedOffset>) -> Self {
        Self {
            id: id.into(),
            create_time,
            attachments: Vec::new(),
            tags: None,
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn is_attached(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Age at `now`, measured in the creation timestamp's own offset.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.with_timezone(self.create_time.offset()) - self.create_time
    }

    pub fn is_opted_out(&self) -> bool {
        self.tags.as_ref().is_some_and(TagSet::opts_out)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub instance_id: Option<String>,
    pub device: Option<String>,
    pub state: Option<String>,
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} ({})",
            self.instance_id.as_deref().unwrap_or("<unknown instance>"),
            self.device.as_deref().unwrap_or("<unknown device>"),
            self.state.as_deref().unwrap_or("unknown"),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: Option<String>,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Tag records as they appear on the wire. Some sources spell the fields
/// `Key`/`Value`, others `key`/`value`, and a record may carry both.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawTag {
    #[serde(rename = "Key", default)]
    pub key_upper: Option<String>,
    #[serde(rename = "Value", default)]
    pub value_upper: Option<String>,
    #[serde(rename = "key", default)]
    pub key_lower: Option<String>,
    #[serde(rename = "value", default)]
    pub value_lower: Option<String>,
}

impl RawTag {
    /// One normalized tag per key spelling present on the record.
    fn normalize(self) -> impl Iterator<Item = Tag> {
        let upper = self.key_upper.map(|key| Tag::new(key, self.value_upper));
        let lower = self.key_lower.map(|key| Tag::new(key, self.value_lower));
        upper.into_iter().chain(lower)
    }
}

/// Case-normalized tag collection. Duplicate keys are kept in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest point for every tag source, typed or JSON. Records are
    /// normalized before any lookup so both key spellings are honoured.
    pub fn from_raw(records: impl IntoIterator<Item = RawTag>) -> Self {
        Self(records.into_iter().flat_map(RawTag::normalize).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn opts_out(&self) -> bool {
        self.0.iter().any(|tag| {
            tag.key == IGNORE_TAG
                && tag
                    .value
                    .as_deref()
                    .is_some_and(|value| IGNORE_VALUES.contains(&value))
        })
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| Tag::new(key, Some(value.into())))
                .collect(),
        )
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<String> = self
            .0
            .iter()
            .map(|tag| format!("{}={}", tag.key, tag.value.as_deref().unwrap_or("")))
            .collect();
        write!(f, "[{}]", tags.join(", "))
    }
}
