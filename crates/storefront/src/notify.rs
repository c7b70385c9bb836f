//! Failure notifications for the shopper.
//!
//! Every failed cart operation emits one [`Notification`]. How it is shown
//! (toast, banner, stderr) belongs to the UI layer; this module only defines
//! the message classes and the [`Notifier`] seam.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

/// Failure class of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Adding a product failed for a reason other than stock.
    AddFailed,
    /// The product to remove is not in the cart.
    RemoveFailed,
    /// Requested quantity exceeds the available stock.
    OutOfStock,
    /// Requested quantity is zero or negative.
    InvalidQuantity,
    /// Changing a quantity failed for a reason other than stock.
    UpdateFailed,
    /// The cart could not be saved.
    StorageFailed,
}

impl NotificationKind {
    /// Stable identifier, also used as the HTTP error code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AddFailed => "add_failed",
            Self::RemoveFailed => "remove_failed",
            Self::OutOfStock => "out_of_stock",
            Self::InvalidQuantity => "invalid_quantity",
            Self::UpdateFailed => "update_failed",
            Self::StorageFailed => "storage_failed",
        }
    }

    /// Message shown to the shopper.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::AddFailed => "Error adding product",
            Self::RemoveFailed => "Error removing product",
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::InvalidQuantity | Self::UpdateFailed => "Error changing product quantity",
            Self::StorageFailed => "Could not save your cart",
        }
    }
}

/// A human-readable failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl From<NotificationKind> for Notification {
    fn from(kind: NotificationKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }
}

/// Sink for shopper-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Logs every notification at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::warn!(
            kind = notification.kind.as_str(),
            message = %notification.message,
            "Cart notification"
        );
    }
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Kinds received so far, oldest first.
    #[must_use]
    pub fn kinds(&self) -> Vec<NotificationKind> {
        self.received().into_iter().map(|n| n.kind).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}
