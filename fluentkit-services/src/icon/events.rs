// SPDX-License-Identifier: LGPL-3.0-only
//! Event system for icon registry and cache notifications.

use tokio::sync::broadcast;

/// Events emitted by the icon manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconEvent {
    /// An icon was registered (or re-registered).
    Registered {
        /// Icon name.
        name: String,
    },
    /// An icon was removed from the registry.
    Unregistered {
        /// Icon name.
        name: String,
    },
    /// Rendered images were dropped from the cache.
    CacheCleared {
        /// `Some(name)` when only that icon's entries were dropped.
        icon: Option<String>,
    },
}

/// Create a new broadcast channel for icon events.
pub fn create_icon_event_channel() -> broadcast::Sender<IconEvent> {
    broadcast::channel(64).0
}
