//! Try-on request state machine.
//!
//! ```text
//! Idle ──generate──▶ Validating ──ok──▶ Requesting ──2xx──▶ Succeeded
//!                        │                   │
//!                        └──invalid──▶ Failed ◀──error──┘
//! ```
//!
//! `Succeeded` and `Failed` are terminal for one activation; the trigger is
//! enabled again in both. The previous image is dropped as soon as a new
//! activation starts.

use fashionary_core::{DataUrlError, ProductDisplay, TryOnRequest, TryOnResponse, UserDisplay};
use tracing::{error, info, warn};

use crate::backend::BackendError;

/// Shown when the trigger is activated without both selections.
pub const MISSING_SELECTION_MESSAGE: &str = "Please select both a model and a product first.";

/// State of the try-on panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TryOnState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Selections are being checked and their images decoded.
    Validating,
    /// The generate call is in flight.
    Requesting,
    /// Generation succeeded; `image_src` is rendered as-is.
    Succeeded { image_src: String },
    /// The activation failed.
    Failed(TryOnFailure),
}

impl TryOnState {
    /// Returns true while a generate call is in flight.
    #[must_use]
    pub const fn is_requesting(&self) -> bool {
        matches!(self, Self::Validating | Self::Requesting)
    }

    /// The generated image source, if the last activation succeeded.
    #[must_use]
    pub fn image_src(&self) -> Option<&str> {
        match self {
            Self::Succeeded { image_src } => Some(image_src),
            _ => None,
        }
    }

    /// The failure, if the last activation failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&TryOnFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Terminal state for a completed generate call.
    #[must_use]
    pub fn from_outcome(outcome: Result<TryOnResponse, BackendError>) -> Self {
        match outcome {
            Ok(response) => Self::Succeeded {
                image_src: response.image_src(),
            },
            Err(e) => Self::Failed(TryOnFailure::from_backend(&e)),
        }
    }
}

/// Why an activation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A selection was missing; no call was made.
    Validation,
    /// An image was not a base64 data URL; no call was made.
    Parse,
    /// The call was made and the backend rejected it.
    Rejected,
    /// The call never completed.
    Transport,
}

/// A failed activation with its user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl TryOnFailure {
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a backend error.
    #[must_use]
    pub fn from_backend(err: &BackendError) -> Self {
        match err {
            BackendError::Status {
                detail: Some(detail),
                ..
            } => Self::new(FailureKind::Rejected, detail.clone()),
            BackendError::Status {
                status,
                detail: None,
            } => Self::new(
                FailureKind::Rejected,
                format!("Try-on generation failed with status {status}"),
            ),
            BackendError::Decode(_) => Self::new(
                FailureKind::Rejected,
                "The try-on service returned an unreadable response",
            ),
            BackendError::Transport(_) | BackendError::InvalidUrl(_) => Self::new(
                FailureKind::Transport,
                format!("Could not reach the try-on service: {}", err.user_message()),
            ),
        }
    }

    /// Log the failure at a severity matching its kind.
    pub fn log(&self) {
        match self.kind {
            FailureKind::Validation => info!(message = %self.message, "Try-on not started"),
            FailureKind::Parse => warn!(message = %self.message, "Try-on image rejected"),
            FailureKind::Rejected => warn!(message = %self.message, "Try-on request rejected"),
            FailureKind::Transport => error!(message = %self.message, "Try-on request failed"),
        }
    }
}

/// Whether the generate trigger is enabled.
#[must_use]
pub const fn can_generate(user_loaded: bool, product_selected: bool, requesting: bool) -> bool {
    user_loaded && product_selected && !requesting
}

/// Run the validating step: check both selections and split their images.
///
/// # Errors
///
/// Returns a `Validation` failure if a selection is missing and a `Parse`
/// failure if either image is not a base64 data URL.
pub fn build_request(
    user: Option<&UserDisplay>,
    product: Option<&ProductDisplay>,
) -> Result<TryOnRequest, TryOnFailure> {
    let (Some(user), Some(product)) = (user, product) else {
        return Err(TryOnFailure::new(
            FailureKind::Validation,
            MISSING_SELECTION_MESSAGE,
        ));
    };

    let user_image = user
        .image_data_url()
        .map_err(|e| parse_failure("model", &e))?;
    let product_image = product
        .image_data_url()
        .map_err(|e| parse_failure("product", &e))?;

    Ok(TryOnRequest::new(user_image, product_image))
}

fn parse_failure(party: &str, err: &DataUrlError) -> TryOnFailure {
    TryOnFailure::new(
        FailureKind::Parse,
        format!("Could not read the {party} image: {err}"),
    )
}
