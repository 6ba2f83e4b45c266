use crate::error::ProviderError;
use crate::provider::{VolumeApi, VolumePage, VolumeStatus};
use crate::volume::Volume;
use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub fn volume(id: &str, create_time: DateTime<FixedOffset>) -> Volume {
    Volume::new(id, create_time)
}

pub fn now() -> DateTime<FixedOffset> {
    Utc::now().fixed_offset()
}

pub fn hours_ago(hours: i64) -> DateTime<FixedOffset> {
    (Utc::now() - Duration::hours(hours)).fixed_offset()
}

/// One day ago, expressed in a non-UTC offset.
pub fn yesterday() -> DateTime<FixedOffset> {
    let ist = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
    (Utc::now() - Duration::days(1)).with_timezone(&ist)
}

pub fn page(volumes: Vec<Volume>, next_token: Option<&str>) -> VolumePage {
    VolumePage {
        volumes,
        next_token: next_token.map(str::to_owned),
    }
}

pub fn provider_error(message: &str) -> ProviderError {
    ProviderError::new(Some("UnauthorizedOperation".to_owned()), message)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListRegions {
        region: String,
    },
    ListVolumes {
        region: String,
        statuses: Vec<VolumeStatus>,
        page_size: i32,
        next_token: Option<String>,
    },
    DeleteVolume {
        region: String,
        volume_id: String,
    },
}

#[derive(Default)]
struct FakeState {
    regions: Vec<String>,
    regions_error: Option<ProviderError>,
    pages: HashMap<String, VecDeque<Result<VolumePage, ProviderError>>>,
    delete_errors: HashMap<String, ProviderError>,
    calls: Vec<Call>,
}

/// In-memory provider that replays scripted pages and records every call.
#[derive(Clone)]
pub struct FakeApi {
    region: String,
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new(region: &str) -> Self {
        Self {
            region: region.to_owned(),
            state: Arc::default(),
        }
    }

    pub fn with_regions(self, regions: &[&str]) -> Self {
        self.state.lock().unwrap().regions = regions.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_regions_error(self, error: ProviderError) -> Self {
        self.state.lock().unwrap().regions_error = Some(error);
        self
    }

    pub fn with_page(self, region: &str, page: VolumePage) -> Self {
        self.push_page(region, Ok(page))
    }

    pub fn with_list_error(self, region: &str, error: ProviderError) -> Self {
        self.push_page(region, Err(error))
    }

    pub fn with_delete_error(self, volume_id: &str, error: ProviderError) -> Self {
        self.state
            .lock()
            .unwrap()
            .delete_errors
            .insert(volume_id.to_owned(), error);
        self
    }

    fn push_page(self, region: &str, page: Result<VolumePage, ProviderError>) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .entry(region.to_owned())
            .or_default()
            .push_back(page);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn list_volume_tokens(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ListVolumes { next_token, .. } => Some(next_token),
                _ => None,
            })
            .collect()
    }

    pub fn delete_attempts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteVolume { volume_id, .. } => Some(volume_id),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl VolumeApi for FakeApi {
    fn for_region(&self, region: &str) -> Self {
        Self {
            region: region.to_owned(),
            state: Arc::clone(&self.state),
        }
    }

    async fn list_regions(&self) -> Result<Vec<String>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListRegions {
            region: self.region.clone(),
        });
        match &state.regions_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.regions.clone()),
        }
    }

    async fn list_volumes(
        &self,
        statuses: &[VolumeStatus],
        page_size: i32,
        next_token: Option<&str>,
    ) -> Result<VolumePage, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::ListVolumes {
            region: self.region.clone(),
            statuses: statuses.to_vec(),
            page_size,
            next_token: next_token.map(str::to_owned),
        });
        state
            .pages
            .get_mut(&self.region)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(VolumePage::default()))
    }

    async fn delete_volume(&self, volume_id: &str) -> Result<(), ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteVolume {
            region: self.region.clone(),
            volume_id: volume_id.to_owned(),
        });
        match state.delete_errors.get(volume_id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}
