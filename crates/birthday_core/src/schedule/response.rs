//! Notification-response handoff to the UI layer.
//!
//! When the user opens a delivered reminder, the host passes its user-info
//! here. The decoded `(name, message)` travels over an injected channel to
//! whoever drives the text-composition flow; no process-wide state is kept.

use crate::host::notification::NotificationPayload;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::mpsc::{self, Receiver, Sender};

/// Request for the UI to pre-fill a text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeRequest {
    pub name: String,
    pub message: String,
}

impl From<NotificationPayload> for ComposeRequest {
    fn from(value: NotificationPayload) -> Self {
        Self {
            name: value.name,
            message: value.message,
        }
    }
}

#[derive(Debug)]
pub enum ResponseError {
    /// User-info did not decode into `{name, message}`.
    MalformedPayload(serde_json::Error),
    /// The UI side dropped its receiver.
    ReceiverClosed,
}

impl Display for ResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedPayload(err) => write!(f, "malformed reminder payload: {err}"),
            Self::ReceiverClosed => write!(f, "compose request receiver is closed"),
        }
    }
}

impl Error for ResponseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedPayload(err) => Some(err),
            Self::ReceiverClosed => None,
        }
    }
}

/// Forwards opened reminders to the UI as `ComposeRequest`s.
#[derive(Debug, Clone)]
pub struct ResponseHandler {
    sender: Sender<ComposeRequest>,
}

impl ResponseHandler {
    pub fn new(sender: Sender<ComposeRequest>) -> Self {
        Self { sender }
    }

    /// Creates a handler together with the receiver the UI should own.
    pub fn channel() -> (Self, Receiver<ComposeRequest>) {
        let (sender, receiver) = mpsc::channel();
        (Self::new(sender), receiver)
    }

    /// Decodes delivered user-info and forwards it.
    pub fn handle_user_info(&self, user_info: &str) -> Result<(), ResponseError> {
        let payload = NotificationPayload::from_user_info(user_info).map_err(|err| {
            warn!(
                "event=notification_response module=schedule status=error error_code=malformed_payload"
            );
            ResponseError::MalformedPayload(err)
        })?;
        self.handle_payload(payload)
    }

    pub fn handle_payload(&self, payload: NotificationPayload) -> Result<(), ResponseError> {
        self.sender.send(payload.into()).map_err(|_| {
            warn!(
                "event=notification_response module=schedule status=error error_code=receiver_closed"
            );
            ResponseError::ReceiverClosed
        })?;
        info!("event=notification_response module=schedule status=ok");
        Ok(())
    }
}
