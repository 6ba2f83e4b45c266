mod ec2;

pub use ec2::Ec2Api;

use crate::error::ProviderError;
use crate::volume::Volume;
use async_trait::async_trait;

/// Volume states the cleanup lists; anything else is in use or in transition.
pub const CLEANUP_STATUSES: [VolumeStatus; 2] = [VolumeStatus::Available, VolumeStatus::Error];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeStatus {
    Available,
    Error,
}

impl VolumeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeStatus::Available => "available",
            VolumeStatus::Error => "error",
        }
    }
}

/// One page of a volume listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumePage {
    pub volumes: Vec<Volume>,
    /// `None` when the response carried no token at all, `Some("")` when the
    /// provider signalled the end explicitly.
    pub next_token: Option<String>,
}

/// The slice of the cloud provider's API that the cleanup needs.
#[async_trait]
pub trait VolumeApi: Send + Sync {
    /// A client for the same account bound to `region`.
    fn for_region(&self, region: &str) -> Self
    where
        Self: Sized;

    async fn list_regions(&self) -> Result<Vec<String>, ProviderError>;

    async fn list_volumes(
        &self,
        statuses: &[VolumeStatus],
        page_size: i32,
        next_token: Option<&str>,
    ) -> Result<VolumePage, ProviderError>;

    async fn delete_volume(&self, volume_id: &str) -> Result<(), ProviderError>;
}
