//! Shared capability vocabulary: kinds, authorization state and call errors.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Host capability consumed by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostCapability {
    Contacts,
    Calendar,
    Notification,
}

impl HostCapability {
    /// Stable string id used in logs and FFI envelopes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => HOST_CAPABILITY_CONTACTS,
            Self::Calendar => HOST_CAPABILITY_CALENDAR,
            Self::Notification => HOST_CAPABILITY_NOTIFICATION,
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Contacts => "Read contact names and birthdays from the address book.",
            Self::Calendar => "Read birthday events from the calendar.",
            Self::Notification => "Post yearly birthday reminder notifications.",
        }
    }
}

pub const HOST_CAPABILITY_CONTACTS: &str = "contacts";
pub const HOST_CAPABILITY_CALENDAR: &str = "calendar";
pub const HOST_CAPABILITY_NOTIFICATION: &str = "notification";

/// Authorization state reported by a host capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Authorized,
    NotDetermined,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::NotDetermined => "not_determined",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
        }
    }

    /// Parses the FFI string form; unknown values are treated as `Denied`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim() {
            "authorized" => Self::Authorized,
            "not_determined" => Self::NotDetermined,
            "restricted" => Self::Restricted,
            _ => Self::Denied,
        }
    }
}

/// Capabilities whose access can be requested from the user.
pub trait Authorizable {
    fn authorization_status(&self) -> AuthorizationStatus;
    /// Prompts the user when needed; returns whether access was granted.
    fn request_access(&self) -> Result<bool, CapabilityError>;
}

/// Ensures access to `capability`, prompting once when status is undetermined.
///
/// Returns `Ok(true)` when the caller may proceed.
pub fn ensure_access(
    capability: &impl Authorizable,
    kind: HostCapability,
) -> Result<bool, CapabilityError> {
    match capability.authorization_status() {
        AuthorizationStatus::Authorized => Ok(true),
        AuthorizationStatus::NotDetermined => {
            let granted = capability.request_access()?;
            info!(
                "event=access_request module=host status=ok capability={} granted={}",
                kind.as_str(),
                granted
            );
            Ok(granted)
        }
        AuthorizationStatus::Denied | AuthorizationStatus::Restricted => Ok(false),
    }
}

/// Failure reported by a host capability call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityError {
    pub capability: HostCapability,
    pub message: String,
}

impl CapabilityError {
    pub fn new(capability: HostCapability, message: impl Into<String>) -> Self {
        Self {
            capability,
            message: message.into(),
        }
    }
}

impl Display for CapabilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} capability failed: {}",
            self.capability.as_str(),
            self.message
        )
    }
}

impl Error for CapabilityError {}
