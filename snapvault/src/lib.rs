// Wizard core for SnapVault

pub mod backup_pipeline;
pub mod cloud_store;
pub mod dashboard;
pub mod drives;
pub mod engine;
pub mod prereq;
pub mod report;
pub mod rescue;
pub mod restore_pipeline;
pub mod session;
pub mod wizard;

pub use backup_pipeline::{BackupOutcome, BackupPipeline};
pub use cloud_store::{CloudStorage, TransferProgress};
pub use dashboard::{Dashboard, HistoryEntry, UploadView};
pub use drives::DriveProvider;
pub use engine::{BackupEngine, BackupVersion, EngineRun, VersionQuery};
pub use prereq::{PrerequisiteItem, PrerequisiteProbe};
pub use report::{ChannelReporter, Notice, Reporter, Severity};
pub use rescue::{PosixRescueScripter, RescuePlan, RescuePlanner, RescueScripter};
pub use restore_pipeline::{RestoreOutcome, RestorePipeline};
pub use session::{BackupSetListing, HomeView, WizardSession};
pub use wizard::{Advance, BackupStep, RestoreStep, Screen, Track, WizardCommand, WizardFlow};
