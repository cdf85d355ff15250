//! Selected model (user) tracking.

use fashionary_core::{UserDisplay, UserId};

/// Message prefix shown when the selected user's display record fails to load.
pub const USER_DISPLAY_ERROR: &str = "Failed to load the selected model";

/// The model picked for try-on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectedUser {
    /// No model selected.
    #[default]
    None,
    /// Display record requested for this id.
    Loading(UserId),
    /// Display record loaded.
    Loaded(UserDisplay),
    /// Display record failed; no stale record is kept.
    Failed { id: UserId, message: String },
}

impl SelectedUser {
    /// The selected id, whatever the load state.
    #[must_use]
    pub fn id(&self) -> Option<&UserId> {
        match self {
            Self::None => None,
            Self::Loading(id) | Self::Failed { id, .. } => Some(id),
            Self::Loaded(display) => Some(&display.user.id),
        }
    }

    /// The loaded display record, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&UserDisplay> {
        match self {
            Self::Loaded(display) => Some(display),
            _ => None,
        }
    }

    /// The failure message, if loading failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }
}
