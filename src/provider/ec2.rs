use super::{VolumeApi, VolumePage, VolumeStatus};
use crate::error::ProviderError;
use crate::volume::{Attachment, RawTag, TagSet, Volume};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ec2::types::{Filter, Volume as Ec2Volume, VolumeAttachment};
use aws_sdk_ec2::Client;
use chrono::DateTime;
use tracing::debug;

pub struct Ec2Api {
    sdk_config: SdkConfig,
    client: Client,
}

impl Ec2Api {
    /// Loads credentials and the default region from the environment.
    pub async fn from_env() -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::v2024_03_28())
            .load()
            .await;
        Self::new(sdk_config)
    }

    pub fn new(sdk_config: SdkConfig) -> Self {
        let client = Client::new(&sdk_config);
        Self { sdk_config, client }
    }

    pub fn region(&self) -> Option<&str> {
        self.sdk_config.region().map(|region| region.as_ref())
    }
}

#[async_trait]
impl VolumeApi for Ec2Api {
    fn for_region(&self, region: &str) -> Self {
        let sdk_config = self
            .sdk_config
            .to_builder()
            .region(Region::new(region.to_owned()))
            .build();
        Self::new(sdk_config)
    }

    async fn list_regions(&self) -> Result<Vec<String>, ProviderError> {
        let output = self.client.describe_regions().send().await?;

        Ok(output
            .regions()
            .iter()
            .filter_map(|region| region.region_name())
            .map(str::to_owned)
            .collect())
    }

    async fn list_volumes(
        &self,
        statuses: &[VolumeStatus],
        page_size: i32,
        next_token: Option<&str>,
    ) -> Result<VolumePage, ProviderError> {
        let filter = Filter::builder()
            .name("status")
            .set_values(Some(
                statuses.iter().map(|s| s.as_str().to_owned()).collect(),
            ))
            .build();

        let output = self
            .client
            .describe_volumes()
            .filters(filter)
            .max_results(page_size)
            .set_next_token(next_token.map(str::to_owned))
            .send()
            .await?;

        debug!(
            "DescribeVolumes in {} returned {} volumes",
            self.region().unwrap_or("<default>"),
            output.volumes().len()
        );

        let volumes = output
            .volumes()
            .iter()
            .map(convert_volume)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VolumePage {
            volumes,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    async fn delete_volume(&self, volume_id: &str) -> Result<(), ProviderError> {
        self.client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await?;
        Ok(())
    }
}

fn convert_volume(volume: &Ec2Volume) -> Result<Volume, ProviderError> {
    let id = volume
        .volume_id()
        .ok_or_else(|| malformed("volume without a VolumeId"))?;
    let created = volume
        .create_time()
        .ok_or_else(|| malformed(&format!("volume {id} without a CreateTime")))?;
    let create_time = DateTime::from_timestamp(created.secs(), created.subsec_nanos())
        .ok_or_else(|| malformed(&format!("volume {id} with an out of range CreateTime")))?
        .fixed_offset();

    // `None` and an empty list stay distinct
    let tags = volume.tags.as_ref().map(|tags| {
        TagSet::from_raw(tags.iter().map(|tag| RawTag {
            key_upper: tag.key().map(str::to_owned),
            value_upper: tag.value().map(str::to_owned),
            ..RawTag::default()
        }))
    });

    Ok(Volume {
        id: id.to_owned(),
        create_time,
        attachments: volume.attachments().iter().map(convert_attachment).collect(),
        tags,
    })
}

fn convert_attachment(attachment: &VolumeAttachment) -> Attachment {
    Attachment {
        instance_id: attachment.instance_id().map(str::to_owned),
        device: attachment.device().map(str::to_owned),
        state: attachment.state().map(|state| state.as_str().to_owned()),
    }
}

fn malformed(detail: &str) -> ProviderError {
    ProviderError::new(
        Some("MalformedResponse".to_owned()),
        format!("DescribeVolumes returned a {detail}"),
    )
}
