// SPDX-License-Identifier: LGPL-3.0-only
pub mod icon;
pub mod settings;

// Re-export commonly used types from the icon system
pub use icon::{Color, IconError, IconEvent, IconImage, IconManager, IconSize};
pub use settings::IconSettings;
