use crate::filter::filter_volumes;
use crate::prelude::*;
use crate::provider::{VolumeApi, CLEANUP_STATUSES};
use crate::volume::Volume;
use tracing::{info, warn};

/// Largest page requested from the volume listing.
pub const PAGE_SIZE: i32 = 100;

/// Lists every available or errored volume in the region bound to `api` and
/// returns the ones old enough and safe to delete.
pub async fn scan_region<A: VolumeApi>(api: &A, min_age: &str) -> Result<Vec<Volume>> {
    let volumes = list_candidate_volumes(api).await?;
    filter_volumes(volumes, min_age)
}

/// Follows continuation tokens until the listing is exhausted, returning all
/// pages in order. A later page without any token ends the listing.
pub async fn list_candidate_volumes<A: VolumeApi>(api: &A) -> Result<Vec<Volume>> {
    let first = api
        .list_volumes(&CLEANUP_STATUSES, PAGE_SIZE, None)
        .await?;
    let mut results = first.volumes;
    let mut token = continuation(first.next_token);

    while let Some(current) = token.take() {
        let page = api
            .list_volumes(&CLEANUP_STATUSES, PAGE_SIZE, Some(&current))
            .await?;
        results.extend(page.volumes);

        match page.next_token {
            Some(next) => token = continuation(Some(next)),
            None => warn!("No NextToken found"),
        }
    }

    Ok(results)
}

fn continuation(token: Option<String>) -> Option<String> {
    let token = token.filter(|t| !t.is_empty())?;
    info!("Found next token: {}", token);
    Some(token)
}
