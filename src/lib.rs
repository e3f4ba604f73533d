pub mod api;
pub mod assets;
pub mod encoder;
pub mod logs;
pub mod schedule;

pub use api::{
    AdDisplayApi, AdRecord, AdsBackend, ApiError, AssetBackend, CloudinaryImage, ImageRecord,
    SubmissionPayload,
};
pub use assets::AssetManager;
pub use encoder::{encode_batch, encode_image, EncodeError, EncodedImage, RawImage};
pub use logs::{
    logs_for, DeviceLogEntry, DeviceLogGroup, LogLevel, LogPoller, LogTimestamp, LogsSnapshot,
    POLL_INTERVAL,
};
pub use schedule::staging::{can_submit, DurationMode, ScheduleWindow, StagedImage, StagingList};
pub use schedule::submit::{ItemOutcome, SubmitReport, SubmitWorker};

pub fn init_logging() {
    // Log to file (console hidden when embedded in a UI shell)
    let log_path = dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".adboard-console")
        .join("console.log");
    let _ = std::fs::create_dir_all(log_path.parent().unwrap());

    if let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .filter_level(log::LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }
}
