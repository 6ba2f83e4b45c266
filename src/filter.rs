//! Client-side policy deciding which listed volumes are safe to delete.

use crate::age::parse_age;
use crate::prelude::*;
use crate::volume::{Attachment, Volume, IGNORE_TAG};
use chrono::{DateTime, Utc};
use tracing::info;

/// Returns the volumes eligible for deletion, in their original order.
///
/// A volume is kept only if it has no attachments, is at least `min_age` old,
/// and is not tagged with [`IGNORE_TAG`]. The threshold is parsed for every
/// volume that reaches the age check, so a malformed threshold only fails once
/// an unattached volume is seen.
pub fn filter_volumes(volumes: Vec<Volume>, min_age: &str) -> Result<Vec<Volume>> {
    filter_volumes_at(volumes, min_age, Utc::now())
}

pub fn filter_volumes_at(
    volumes: Vec<Volume>,
    min_age: &str,
    now: DateTime<Utc>,
) -> Result<Vec<Volume>> {
    let mut eligible = Vec::with_capacity(volumes.len());

    for volume in volumes {
        // The listing is already filtered on status, so this should not happen
        if volume.is_attached() {
            info!(
                "Volume {} has attachments: {}",
                volume.id,
                describe_attachments(&volume.attachments)
            );
            continue;
        }

        // A fresh volume may be about to be attached
        let threshold = parse_age(min_age)?;
        if volume.age_at(now) < threshold {
            info!(
                "Skipping volume {} created at {}",
                volume.id, volume.create_time
            );
            continue;
        }

        match &volume.tags {
            Some(tags) => info!("Tags for {}: {}", volume.id, tags),
            None => info!("Tags for {}: none", volume.id),
        }
        if volume.is_opted_out() {
            info!("Skipping {} due to {} tag", volume.id, IGNORE_TAG);
            continue;
        }

        info!("Marking unattached volume {} for deletion", volume.id);
        eligible.push(volume);
    }

    Ok(eligible)
}

fn describe_attachments(attachments: &[Attachment]) -> String {
    attachments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
