#![warn(missing_docs)]

//! Named, tintable vector icons for fluentkit widgets.

pub use fluentkit_services as services;

/// A "prelude" for users of the fluentkit icon system.
///
/// Importing this module brings into scope the types needed to register
/// icons and fetch rendered images.
///
/// ```rust
/// use fluentkit::prelude::*;
///
/// let icons = IconManager::bootstrap(IconSettings::default());
/// let house = icons.get_icon_or_empty("solid/house", IconSize::square(16), None);
/// assert!(!house.is_empty());
/// ```
pub mod prelude {
    pub use crate::services::icon::{
        Color, IconDescriptor, IconError, IconEvent, IconImage, IconManager, IconSize, Rasterizer,
    };
    pub use crate::services::settings::IconSettings;
}
