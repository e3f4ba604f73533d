#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::Mutex;

use adboard_console::{
    AdsBackend, ApiError, AssetBackend, CloudinaryImage, DeviceLogEntry, DeviceLogGroup, LogLevel,
    LogTimestamp, SubmissionPayload,
};
use tokio::time::Duration;

/// In-memory stand-in for the remote backend. Scripted failures are keyed by
/// image name (per-item flow) or armed globally (batch flow); every request
/// is recorded for assertions.
#[derive(Default)]
pub struct FakeBackend {
    pub created: Mutex<Vec<SubmissionPayload>>,
    pub batches: Mutex<Vec<Vec<SubmissionPayload>>>,
    pub rejected_names: Mutex<Vec<(String, String)>>,
    pub batch_error: Mutex<Option<String>>,
    pub log_groups: Mutex<Vec<DeviceLogGroup>>,
    pub fetch_count: AtomicUsize,
    pub fetch_delay: Mutex<Option<Duration>>,
    pub assets: Mutex<Vec<CloudinaryImage>>,
    pub deleted_assets: Mutex<Vec<String>>,
    pub bulk_deletes: Mutex<Vec<Vec<String>>>,
}

impl FakeBackend {
    pub fn reject_name(&self, name: &str, error: &str) {
        self.rejected_names
            .lock()
            .unwrap()
            .push((name.to_string(), error.to_string()));
    }

    pub fn set_batch_error(&self, error: &str) {
        *self.batch_error.lock().unwrap() = Some(error.to_string());
    }

    pub fn set_log_groups(&self, groups: Vec<DeviceLogGroup>) {
        *self.log_groups.lock().unwrap() = groups;
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_assets(&self, assets: Vec<CloudinaryImage>) {
        *self.assets.lock().unwrap() = assets;
    }
}

impl AdsBackend for FakeBackend {
    async fn create_image(&self, payload: &SubmissionPayload) -> Result<(), ApiError> {
        self.created.lock().unwrap().push(payload.clone());
        let rejected = self
            .rejected_names
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| *name == payload.image_name)
            .map(|(_, error)| error.clone());
        match rejected {
            Some(error) => Err(ApiError::Rejected(error)),
            None => Ok(()),
        }
    }

    async fn submit_ads(&self, ads: &[SubmissionPayload]) -> Result<(), ApiError> {
        self.batches.lock().unwrap().push(ads.to_vec());
        match self.batch_error.lock().unwrap().clone() {
            Some(error) => Err(ApiError::Rejected(error)),
            None => Ok(()),
        }
    }

    async fn fetch_logs(&self) -> Result<Vec<DeviceLogGroup>, ApiError> {
        self.fetch_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.log_groups.lock().unwrap().clone())
    }
}

impl AssetBackend for FakeBackend {
    async fn fetch_assets(&self) -> Result<Vec<CloudinaryImage>, ApiError> {
        Ok(self.assets.lock().unwrap().clone())
    }

    async fn delete_asset(&self, public_id: &str) -> Result<(), ApiError> {
        self.deleted_assets
            .lock()
            .unwrap()
            .push(public_id.to_string());
        Ok(())
    }

    async fn delete_assets(&self, public_ids: &[String]) -> Result<(), ApiError> {
        self.bulk_deletes.lock().unwrap().push(public_ids.to_vec());
        Ok(())
    }
}

pub fn entry(id: &str, message: &str) -> DeviceLogEntry {
    DeviceLogEntry {
        id: id.to_string(),
        created_at: LogTimestamp::Epoch {
            seconds: 1_732_528_800,
        },
        level: LogLevel::Info,
        message: message.to_string(),
    }
}

pub fn group(device_code: &str, logs: Vec<DeviceLogEntry>) -> DeviceLogGroup {
    DeviceLogGroup {
        device_code: device_code.to_string(),
        logs,
    }
}

pub fn asset(public_id: &str) -> CloudinaryImage {
    CloudinaryImage {
        public_id: public_id.to_string(),
        url: format!("https://res.example.com/{}.jpg", public_id),
    }
}
