//! Step sequencing for the two wizard tracks
//!
//! The flow owns nothing but the current screen. Whether a step may
//! advance is a pure function of the wizard state, re-evaluated on
//! every attempt; passing the last step hands a [`Track`] back to the
//! session, which runs the matching finish pipeline and decides the
//! terminal screen from its outcome.

use snapvault_common::{WizardState, validation};

/// Position in the backup track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStep {
    SelectSource,
    SelectDestination,
    StorageChoice,
    Schedule,
}

impl BackupStep {
    pub const COUNT: usize = 4;

    pub fn first() -> Self {
        Self::SelectSource
    }

    pub fn index(self) -> usize {
        match self {
            Self::SelectSource => 0,
            Self::SelectDestination => 1,
            Self::StorageChoice => 2,
            Self::Schedule => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::SelectSource => Some(Self::SelectDestination),
            Self::SelectDestination => Some(Self::StorageChoice),
            Self::StorageChoice => Some(Self::Schedule),
            Self::Schedule => None,
        }
    }

    pub fn back(self) -> Option<Self> {
        match self {
            Self::SelectSource => None,
            Self::SelectDestination => Some(Self::SelectSource),
            Self::StorageChoice => Some(Self::SelectDestination),
            Self::Schedule => Some(Self::StorageChoice),
        }
    }
}

/// Position in the restore track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStep {
    Cloud,
    SelectBackup,
    Target,
    Confirm,
}

impl RestoreStep {
    pub const COUNT: usize = 4;

    pub fn first() -> Self {
        Self::Cloud
    }

    pub fn index(self) -> usize {
        match self {
            Self::Cloud => 0,
            Self::SelectBackup => 1,
            Self::Target => 2,
            Self::Confirm => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Cloud => Some(Self::SelectBackup),
            Self::SelectBackup => Some(Self::Target),
            Self::Target => Some(Self::Confirm),
            Self::Confirm => None,
        }
    }

    pub fn back(self) -> Option<Self> {
        match self {
            Self::Cloud => None,
            Self::SelectBackup => Some(Self::Cloud),
            Self::Target => Some(Self::SelectBackup),
            Self::Confirm => Some(Self::Target),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    Backup,
    Restore,
}

/// Everything the window can currently show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Mode selection
    Home,
    Backup(BackupStep),
    Restore(RestoreStep),
    /// Schedule dashboard with history and upload log
    Dashboard,
    /// Rescue script preparation
    Rescue,
    /// Terminal screen after a restore finish
    Done,
}

impl Screen {
    pub fn is_step(self) -> bool {
        matches!(self, Screen::Backup(_) | Screen::Restore(_))
    }
}

/// Commands a frontend issues against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardCommand {
    StartBackup,
    StartRestore,
    Advance,
    Back,
    SwitchMode,
    ShowDashboard,
    ShowRescue,
    BackToHome,
}

/// Result of one advance attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Validation blocked the move, or the screen has no next step
    Stayed,
    /// Moved to the next step
    Moved(Screen),
    /// The last step validated; the track's finish pipeline runs next
    Finished(Track),
}

/// Whether the current step's inputs allow moving forward
///
/// Pure: reads the state, mutates nothing, touches no collaborator.
pub fn can_advance(state: &WizardState, screen: Screen) -> bool {
    match screen {
        Screen::Backup(BackupStep::SelectSource) => state.source_drive.is_some(),
        Screen::Backup(BackupStep::SelectDestination) => {
            state.destination_drive.as_ref().is_some_and(|d| {
                validation::destination_has_space(d, state.estimated_backup_size_bytes)
            })
        }
        Screen::Backup(BackupStep::StorageChoice) => {
            state.keep_on_source_disk
                || validation::cloud_config_complete(state.cloud_config.as_ref())
        }
        Screen::Backup(BackupStep::Schedule) => true,
        Screen::Restore(RestoreStep::Cloud) => {
            validation::cloud_config_complete(state.cloud_config.as_ref())
        }
        Screen::Restore(RestoreStep::SelectBackup) => state.restore_selected_backup_set.is_some(),
        Screen::Restore(RestoreStep::Target) => state.restore_download_target_drive.is_some(),
        Screen::Restore(RestoreStep::Confirm) => true,
        _ => false,
    }
}

/// Owns the current screen and applies the navigation rules
#[derive(Debug)]
pub struct WizardFlow {
    screen: Screen,
}

impl WizardFlow {
    pub fn new() -> Self {
        Self {
            screen: Screen::Home,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Enter the backup track; allowed from Home and Dashboard only
    pub fn start_backup(&mut self) -> bool {
        self.start_track(Screen::Backup(BackupStep::first()))
    }

    /// Enter the restore track; allowed from Home and Dashboard only
    pub fn start_restore(&mut self) -> bool {
        self.start_track(Screen::Restore(RestoreStep::first()))
    }

    fn start_track(&mut self, entry: Screen) -> bool {
        if matches!(self.screen, Screen::Home | Screen::Dashboard) {
            self.screen = entry;
            true
        } else {
            false
        }
    }

    pub fn show_dashboard(&mut self) -> bool {
        if self.screen == Screen::Home {
            self.screen = Screen::Dashboard;
            true
        } else {
            false
        }
    }

    pub fn show_rescue(&mut self) -> bool {
        if self.screen == Screen::Home {
            self.screen = Screen::Rescue;
            true
        } else {
            false
        }
    }

    pub fn back_to_home(&mut self) -> bool {
        if matches!(self.screen, Screen::Dashboard | Screen::Rescue | Screen::Done) {
            self.screen = Screen::Home;
            true
        } else {
            false
        }
    }

    /// Abandon the current step and return to Home. Step position is
    /// discarded; the wizard state is kept, so credentials entered on
    /// one track carry over to the other.
    pub fn switch_mode(&mut self) {
        if self.screen.is_step() {
            self.screen = Screen::Home;
        }
    }

    /// Try to move forward from the current step
    pub fn advance(&mut self, state: &WizardState) -> Advance {
        if !self.screen.is_step() {
            return Advance::Stayed;
        }
        if !can_advance(state, self.screen) {
            return Advance::Stayed;
        }

        match self.screen {
            Screen::Backup(step) => match step.next() {
                Some(next) => {
                    self.screen = Screen::Backup(next);
                    Advance::Moved(self.screen)
                }
                None => Advance::Finished(Track::Backup),
            },
            Screen::Restore(step) => match step.next() {
                Some(next) => {
                    self.screen = Screen::Restore(next);
                    Advance::Moved(self.screen)
                }
                None => Advance::Finished(Track::Restore),
            },
            _ => Advance::Stayed,
        }
    }

    /// Move to the previous step, or Home from the first step
    pub fn back(&mut self) -> Screen {
        self.screen = match self.screen {
            Screen::Backup(step) => step.back().map(Screen::Backup).unwrap_or(Screen::Home),
            Screen::Restore(step) => step.back().map(Screen::Restore).unwrap_or(Screen::Home),
            other => other,
        };
        self.screen
    }

    /// A backup finish completed; land on the dashboard
    pub(crate) fn complete_backup(&mut self) {
        self.screen = Screen::Dashboard;
    }

    /// A restore finish ran its recovery stage; the session is over
    pub(crate) fn complete_restore(&mut self) {
        self.screen = Screen::Done;
    }
}

impl Default for WizardFlow {
    fn default() -> Self {
        Self::new()
    }
}
