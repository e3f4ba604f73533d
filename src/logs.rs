use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tokio::time::{interval, Duration};

use crate::api::{AdsBackend, ApiError};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    #[serde(other)]
    Unknown,
}

/// Device timestamps arrive either as a plain date/time string or as a
/// Firestore-style `{_seconds}` epoch object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogTimestamp {
    Epoch {
        #[serde(rename = "_seconds")]
        seconds: i64,
    },
    Text(String),
}

impl LogTimestamp {
    pub fn render(&self) -> String {
        match self {
            LogTimestamp::Epoch { seconds } => DateTime::from_timestamp(*seconds, 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| seconds.to_string()),
            LogTimestamp::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLogEntry {
    #[serde(default)]
    pub id: String,
    pub created_at: LogTimestamp,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLogGroup {
    pub device_code: String,
    #[serde(default)]
    pub logs: Vec<DeviceLogEntry>,
}

/// The backend answers `/api/logs` with either groups per device or, in the
/// single-stream variant, a flat entry array. Both resolve into the grouped
/// shape here, before anything downstream sees them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LogsSnapshot {
    Grouped(Vec<DeviceLogGroup>),
    Flat(Vec<DeviceLogEntry>),
}

impl LogsSnapshot {
    pub fn into_groups(self) -> Vec<DeviceLogGroup> {
        match self {
            LogsSnapshot::Grouped(groups) => groups,
            LogsSnapshot::Flat(logs) => vec![DeviceLogGroup {
                device_code: String::new(),
                logs,
            }],
        }
    }
}

/// Logs for one device out of a snapshot. A single anonymous group is the
/// single-stream response shape and belongs to whichever device is selected.
pub fn logs_for(groups: &[DeviceLogGroup], device_code: &str) -> Vec<DeviceLogEntry> {
    if let [only] = groups {
        if only.device_code.is_empty() {
            return only.logs.clone();
        }
    }
    groups
        .iter()
        .find(|g| g.device_code == device_code)
        .map(|g| g.logs.clone())
        .unwrap_or_default()
}

/// One armed polling run. Dropping it disarms the liveness flag, so every
/// exit path releases the timer and orphans any in-flight fetch.
struct PollSession {
    alive: Arc<AtomicBool>,
}

impl Drop for PollSession {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

/// Repeating log fetch for the currently selected device. At most one
/// session is ever armed; stopping, switching devices, or dropping the
/// poller disarms it before anything new starts.
pub struct LogPoller<B: AdsBackend> {
    api: Arc<B>,
    groups: Vec<DeviceLogGroup>,
    selected: Option<String>,
    view: Arc<Mutex<Vec<DeviceLogEntry>>>,
    session: Option<PollSession>,
}

impl<B: AdsBackend> LogPoller<B> {
    pub fn new(api: Arc<B>) -> Self {
        Self {
            api,
            groups: Vec::new(),
            selected: None,
            view: Arc::new(Mutex::new(Vec::new())),
            session: None,
        }
    }

    /// One-shot fetch of every device's logs, refreshing the device list and
    /// the selected device's view.
    pub async fn refresh_devices(&mut self) -> Result<(), ApiError> {
        let groups = self.api.fetch_logs().await?;
        if let Some(code) = &self.selected {
            *self.view.lock().expect("log view lock poisoned") = logs_for(&groups, code);
        }
        self.groups = groups;
        Ok(())
    }

    pub fn device_codes(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.device_code.clone()).collect()
    }

    pub fn selected_device(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Pick a device: stops any running poll and seeds the view from the
    /// last full snapshot.
    pub fn select_device(&mut self, device_code: &str) {
        self.stop();
        self.selected = Some(device_code.to_string());
        *self.view.lock().expect("log view lock poisoned") = logs_for(&self.groups, device_code);
    }

    /// Back to the device list: stops any running poll and empties the view.
    pub fn clear_selection(&mut self) {
        self.stop();
        self.selected = None;
        self.view.lock().expect("log view lock poisoned").clear();
    }

    /// Arm the repeating fetch. No-op while a session is armed or no device
    /// is selected. Fetches immediately, then every tick; each snapshot
    /// replaces the view wholesale. A result arriving after the session was
    /// disarmed is discarded.
    pub fn start(&mut self) {
        if self.session.is_some() {
            return;
        }
        let Some(device) = self.selected.clone() else {
            return;
        };

        let alive = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&alive);
        let api = Arc::clone(&self.api);
        let view = Arc::clone(&self.view);

        tokio::spawn(async move {
            let mut ticker = interval(POLL_INTERVAL);
            loop {
                ticker.tick().await;
                if !flag.load(Ordering::SeqCst) {
                    break;
                }
                match api.fetch_logs().await {
                    Ok(groups) => {
                        // Stopped while the fetch was in flight: discard.
                        if !flag.load(Ordering::SeqCst) {
                            break;
                        }
                        *view.lock().expect("log view lock poisoned") = logs_for(&groups, &device);
                    }
                    Err(e) => {
                        log::warn!("log fetch failed: {}", e);
                    }
                }
            }
        });

        self.session = Some(PollSession { alive });
    }

    /// Disarm the session. Idempotent; future ticks never fetch again, and
    /// an in-flight fetch's result is dropped on arrival.
    pub fn stop(&mut self) {
        self.session.take();
    }

    pub fn is_polling(&self) -> bool {
        self.session.is_some()
    }

    /// Current snapshot of the selected device's logs.
    pub fn logs(&self) -> Vec<DeviceLogEntry> {
        self.view.lock().expect("log view lock poisoned").clone()
    }
}
