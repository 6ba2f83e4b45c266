//! One cleanup invocation: scan every region, delete what is eligible, and
//! report the outcome as a status code plus a JSON message body.

use crate::prelude::*;
use crate::provider::VolumeApi;
use crate::scanner::scan_region;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub status_code: u16,
    /// JSON text of the form `{"message": "..."}`.
    pub body: String,
}

impl CleanupResponse {
    fn with_message(status_code: u16, message: &str) -> Result<Self> {
        Ok(Self {
            status_code,
            body: serde_json::to_string(&json!({ "message": message }))?,
        })
    }

    pub fn success(deleted: &[String]) -> Result<Self> {
        Self::with_message(
            200,
            &format!("Unattached/errored volumes deleted: {:?}", deleted),
        )
    }

    pub fn failure(message: &str) -> Result<Self> {
        Self::with_message(500, message)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }

    pub fn message(&self) -> Option<String> {
        let body: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        body.get("message")?.as_str().map(str::to_owned)
    }
}

/// Runs a full cleanup. The triggering event is accepted but not inspected.
///
/// Provider errors end the run immediately and become a 500 response carrying
/// the provider's message. A malformed `min_age` is returned as an error.
pub async fn handle<A: VolumeApi>(
    _event: &serde_json::Value,
    api: &A,
    min_age: &str,
) -> Result<CleanupResponse> {
    match delete_unattached(api, min_age).await {
        Ok(deleted) => CleanupResponse::success(&deleted),
        Err(Error::Provider(e)) => {
            error!(
                "Provider error {}: {}",
                e.code.as_deref().unwrap_or("<no code>"),
                e
            );
            CleanupResponse::failure(e.message())
        }
        Err(e) => Err(e),
    }
}

/// Scans every region reported by `api` and deletes each eligible volume,
/// returning the ids submitted for deletion.
///
/// Deletion is issued through `api` itself, not the regional client that found
/// the volume, so volumes outside the default region may fail to delete.
pub async fn delete_unattached<A: VolumeApi>(api: &A, min_age: &str) -> Result<Vec<String>> {
    let regions = api.list_regions().await?;

    let mut unattached = Vec::new();
    for region in &regions {
        let regional = api.for_region(region);
        unattached.extend(scan_region(&regional, min_age).await?);
    }

    info!("Found {} unattached/errored EBS volumes", unattached.len());

    let mut deleted = Vec::with_capacity(unattached.len());
    for volume in unattached {
        info!("Deleting unattached/errored volume {}", volume.id);
        api.delete_volume(&volume.id).await?;
        deleted.push(volume.id);
    }

    Ok(deleted)
}
