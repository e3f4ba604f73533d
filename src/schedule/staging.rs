use serde::Serialize;

use crate::encoder::{self, EncodeError, RawImage};

/// An image waiting for submission. `custom_duration` is whatever the
/// operator typed for this image; equal-division mode computes its own value
/// without ever touching this field, so toggling modes loses nothing.
#[derive(Debug, Clone, Serialize)]
pub struct StagedImage {
    pub name: String,
    pub encoded: String,
    pub custom_duration: u32,
}

/// Ordered in-memory collection of images staged for the next submission.
#[derive(Debug, Default)]
pub struct StagingList {
    items: Vec<StagedImage>,
}

impl StagingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a batch of picked files and append them. Returns how many were
    /// added. Atomic: if any file fails to encode, the list is left untouched.
    pub async fn add_batch(&mut self, files: Vec<RawImage>) -> Result<usize, EncodeError> {
        let encoded = encoder::encode_batch(files).await?;
        let count = encoded.len();
        self.items.extend(encoded.into_iter().map(|img| StagedImage {
            name: img.name,
            encoded: img.data_uri,
            custom_duration: 0,
        }));
        log::info!("staged {} images ({} total)", count, self.items.len());
        Ok(count)
    }

    /// Append an already-encoded image.
    pub fn push(&mut self, item: StagedImage) {
        self.items.push(item);
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedImage> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn set_custom_duration(&mut self, index: usize, seconds: u32) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.custom_duration = seconds;
                true
            }
            None => false,
        }
    }

    pub fn items(&self) -> &[StagedImage] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// How per-image display durations are decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationMode {
    /// Each image plays for the duration the operator typed for it.
    Custom,
    /// One total budget, split evenly across every staged image.
    DivideEqually { total_minutes: u32 },
}

impl DurationMode {
    /// Seconds per image when a `total_minutes` budget is split across
    /// `count` images. Zero when there is nothing to split or no budget.
    pub fn divided_duration(total_minutes: u32, count: usize) -> u32 {
        if count == 0 || total_minutes == 0 {
            return 0;
        }
        (u64::from(total_minutes) * 60 / count as u64) as u32
    }

    /// The duration actually displayed and submitted for one image.
    pub fn effective_duration(&self, item: &StagedImage, count: usize) -> u32 {
        match self {
            DurationMode::Custom => item.custom_duration,
            DurationMode::DivideEqually { total_minutes } => {
                Self::divided_duration(*total_minutes, count)
            }
        }
    }
}

/// Date/time window shared by every image in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleWindow {
    pub start_date: String,
    pub end_date: String,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleWindow {
    pub fn is_complete(&self) -> bool {
        !self.start_date.is_empty()
            && !self.end_date.is_empty()
            && !self.start_time.is_empty()
            && !self.end_time.is_empty()
    }
}

/// Whether the current state is allowed to submit. Window fields must all be
/// filled; beyond that, custom mode additionally requires a non-zero duration
/// on every staged image.
pub fn can_submit(window: &ScheduleWindow, mode: &DurationMode, staging: &StagingList) -> bool {
    if !window.is_complete() {
        return false;
    }
    if matches!(mode, DurationMode::DivideEqually { .. }) || staging.is_empty() {
        return true;
    }
    staging.items().iter().all(|item| item.custom_duration > 0)
}
