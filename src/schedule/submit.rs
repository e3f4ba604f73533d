use crate::api::{AdsBackend, SubmissionPayload};
use crate::schedule::staging::{DurationMode, ScheduleWindow, StagingList};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Submitted { name: String },
    Failed { name: String, error: String },
}

impl ItemOutcome {
    pub fn name(&self) -> &str {
        match self {
            ItemOutcome::Submitted { name } | ItemOutcome::Failed { name, .. } => name,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ItemOutcome::Failed { .. })
    }
}

/// Per-item record of one submission run. Once a run completes the staging
/// list is gone, so this report is the only failure signal that survives.
#[derive(Debug, Default)]
pub struct SubmitReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl SubmitReport {
    pub fn submitted_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn all_submitted(&self) -> bool {
        self.failed_count() == 0
    }

    /// Operator-facing summary naming each failed image with the backend's
    /// error text.
    pub fn status_message(&self) -> String {
        if self.outcomes.is_empty() {
            return "No images to submit.".to_string();
        }
        if self.all_submitted() {
            return format!("Submitted {} image(s) successfully!", self.outcomes.len());
        }

        let failures: Vec<String> = self
            .outcomes
            .iter()
            .filter_map(|o| match o {
                ItemOutcome::Failed { name, error } => Some(format!("{} ({})", name, error)),
                ItemOutcome::Submitted { .. } => None,
            })
            .collect();

        format!(
            "Submitted {} of {} image(s); failed: {}",
            self.submitted_count(),
            self.outcomes.len(),
            failures.join(", ")
        )
    }
}

/// Drives one submission run against the backend. `submitting` mirrors the
/// disabled submit affordance: a run that is already underway makes any new
/// request a no-op.
#[derive(Debug, Default)]
pub struct SubmitWorker {
    submitting: bool,
}

impl SubmitWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn payloads(
        staging: &StagingList,
        window: &ScheduleWindow,
        mode: &DurationMode,
        owner_id: u64,
    ) -> Vec<SubmissionPayload> {
        let count = staging.len();
        staging
            .items()
            .iter()
            .map(|item| SubmissionPayload {
                image_name: item.name.clone(),
                image_url: item.encoded.clone(),
                start_date: window.start_date.clone(),
                end_date: window.end_date.clone(),
                start_time: window.start_time.clone(),
                end_time: window.end_time.clone(),
                duration: mode.effective_duration(item, count),
                user_id: owner_id,
            })
            .collect()
    }

    /// Submit every staged image one request at a time, strictly in list
    /// order. A failed item is recorded and the run moves on; nothing is
    /// retried or rolled back. The staging list is cleared once every item
    /// has been attempted, whatever the outcomes.
    pub async fn submit_each<B: AdsBackend>(
        &mut self,
        api: &B,
        staging: &mut StagingList,
        window: &ScheduleWindow,
        mode: &DurationMode,
        owner_id: u64,
    ) -> Option<SubmitReport> {
        if self.submitting {
            log::debug!("submit ignored: a run is already underway");
            return None;
        }
        self.submitting = true;

        let payloads = Self::payloads(staging, window, mode, owner_id);
        let mut report = SubmitReport::default();

        for payload in &payloads {
            match api.create_image(payload).await {
                Ok(()) => {
                    log::info!("submitted {}", payload.image_name);
                    report.outcomes.push(ItemOutcome::Submitted {
                        name: payload.image_name.clone(),
                    });
                }
                Err(e) => {
                    log::error!("submit failed for {}: {}", payload.image_name, e);
                    report.outcomes.push(ItemOutcome::Failed {
                        name: payload.image_name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        staging.clear();
        self.submitting = false;
        Some(report)
    }

    /// Submit every staged image in a single request. The batch is one
    /// atomic call: a failure fails every image in it. The staging list is
    /// cleared either way.
    pub async fn submit_batch<B: AdsBackend>(
        &mut self,
        api: &B,
        staging: &mut StagingList,
        window: &ScheduleWindow,
        mode: &DurationMode,
        owner_id: u64,
    ) -> Option<SubmitReport> {
        if self.submitting {
            log::debug!("submit ignored: a run is already underway");
            return None;
        }
        self.submitting = true;

        let payloads = Self::payloads(staging, window, mode, owner_id);
        let mut report = SubmitReport::default();

        if !payloads.is_empty() {
            match api.submit_ads(&payloads).await {
                Ok(()) => {
                    log::info!("submitted batch of {} image(s)", payloads.len());
                    for payload in &payloads {
                        report.outcomes.push(ItemOutcome::Submitted {
                            name: payload.image_name.clone(),
                        });
                    }
                }
                Err(e) => {
                    log::error!("batch submit failed: {}", e);
                    let error = e.to_string();
                    for payload in &payloads {
                        report.outcomes.push(ItemOutcome::Failed {
                            name: payload.image_name.clone(),
                            error: error.clone(),
                        });
                    }
                }
            }
        }

        staging.clear();
        self.submitting = false;
        Some(report)
    }
}
