// SPDX-License-Identifier: LGPL-3.0-only
//! Icon System
//!
//! Named vector icons with a bounded cache of rendered, optionally tinted
//! images. [`IconManager`] is the public entry point: build one, share it
//! behind an [`Arc`], and ask it for images by `(name, size, tint)`.
//!
//! Theme changes are not tracked here. Callers that restyle icons on a theme
//! switch should call [`IconManager::clear_cache`] from their theme handler.

mod cache;
mod error;
mod events;
mod image;
mod loader;
mod registry;
mod resources;
mod tint;

pub use cache::{CacheKey, IconCache};
pub use error::{IconError, RasterError};
pub use events::{create_icon_event_channel, IconEvent};
pub use image::{Color, IconImage, IconSize};
pub use loader::{Rasterizer, SvgRasterizer};
pub use registry::{icon_name_from_path, IconDescriptor, IconRegistry, IconSource, DEFAULT_CATEGORY};
pub use resources::{ResourceBundle, BUILTIN_ICONS, RESOURCE_PREFIX};
pub use tint::apply_tint;

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use walkdir::WalkDir;

use crate::settings::IconSettings;

/// Icon manager - registry, render cache and notifications.
///
/// All methods take `&self`; the manager is meant to be shared across the
/// widgets that paint icons.
pub struct IconManager {
    /// Registered icons.
    registry: RwLock<IconRegistry>,
    /// Rendered images.
    cache: IconCache,
    /// Vector rasterization primitive.
    rasterizer: Arc<dyn Rasterizer>,
    /// Embedded sources for `:/icons/` locations.
    resources: ResourceBundle,
    /// Registry and cache notifications.
    events: broadcast::Sender<IconEvent>,
    settings: IconSettings,
}

impl IconManager {
    /// Create an empty manager using the `resvg` rasterizer and built-in resources.
    pub fn new(settings: IconSettings) -> Self {
        Self::with_rasterizer(settings, Arc::new(SvgRasterizer::new()))
    }

    /// Create an empty manager with a custom rasterizer.
    pub fn with_rasterizer(settings: IconSettings, rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            registry: RwLock::new(IconRegistry::new()),
            cache: IconCache::new(
                settings.cache_limit,
                settings.min_cache_limit,
                settings.eviction_slack,
            ),
            rasterizer,
            resources: ResourceBundle::builtin().clone(),
            events: create_icon_event_channel(),
            settings,
        }
    }

    /// Replace the resource bundle used for `:/icons/` locations.
    pub fn with_resources(mut self, resources: ResourceBundle) -> Self {
        self.resources = resources;
        self
    }

    /// Create a manager and populate it the way an application starts up:
    /// built-in resource icons first (if enabled), then every `.svg` below the
    /// configured icon directory, if that directory exists.
    pub fn bootstrap(settings: IconSettings) -> Self {
        let manager = Self::new(settings);

        if manager.settings.load_builtin {
            manager.load_builtin_icons();
        }

        if let Some(dir) = manager.settings.resolved_icon_directory() {
            if dir.is_dir() {
                if let Err(e) = manager.load_icons_from_directory(&dir) {
                    log::warn!("IconManager: Failed to load icons from {:?}: {}", dir, e);
                }
            }
        }

        manager
    }

    /// Settings this manager was built with.
    pub fn settings(&self) -> &IconSettings {
        &self.settings
    }

    /// Subscribe to registry and cache notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<IconEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: IconEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }

    /// Register an icon from a file path or a `:/icons/<id>` resource location.
    ///
    /// Fails without touching the registry if the name or location is empty
    /// or the source cannot be read. A source that is readable but does not
    /// parse is still registered, with the fallback native size.
    /// Re-registering a name replaces the old descriptor and drops its
    /// rendered images.
    pub fn register_icon(&self, name: &str, location: &str, category: &str) -> Result<(), IconError> {
        if name.is_empty() {
            return Err(IconError::EmptyName);
        }
        if location.is_empty() {
            return Err(IconError::InvalidSource {
                location: String::new(),
                reason: "empty source location".to_string(),
            });
        }

        let source = IconSource::parse(location);
        let data = source.read(&self.resources).map_err(|e| {
            log::warn!("IconManager: Icon source {} is not readable: {}", source, e);
            IconError::InvalidSource {
                location: location.to_string(),
                reason: e.to_string(),
            }
        })?;

        let native_size = match self.rasterizer.native_size(&data) {
            Ok(size) if !size.is_empty() => size,
            Ok(_) => self.settings.fallback_icon_size(),
            Err(e) => {
                log::warn!(
                    "IconManager: Invalid SVG {}, using default size: {}",
                    source,
                    e
                );
                self.settings.fallback_icon_size()
            },
        };

        let descriptor = IconDescriptor::new(name, source, category, native_size);
        {
            let mut registry = self.registry.write();
            if registry.insert(descriptor).is_some() {
                self.cache.clear_icon(name);
            }
        }

        log::debug!("IconManager: Registered icon '{}'", name);
        self.emit(IconEvent::Registered {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Register an icon from the resource bundle by id (e.g. `solid/house`).
    pub fn register_resource_icon(&self, name: &str, resource_id: &str, category: &str) -> Result<(), IconError> {
        if resource_id.is_empty() {
            return self.register_icon(name, "", category);
        }
        self.register_icon(name, &format!("{}{}", RESOURCE_PREFIX, resource_id), category)
    }

    /// Remove an icon and every rendered image of it.
    ///
    /// Returns `false` if the icon was not registered. Once this returns, no
    /// lookup can observe a cached image for `name`.
    pub fn unregister_icon(&self, name: &str) -> bool {
        let removed = {
            let mut registry = self.registry.write();
            let removed = registry.remove(name).is_some();
            if removed {
                self.cache.clear_icon(name);
            }
            removed
        };

        if removed {
            log::debug!("IconManager: Unregistered icon '{}'", name);
            self.emit(IconEvent::Unregistered {
                name: name.to_string(),
            });
        }
        removed
    }

    /// Register the icons of the built-in resource bundle, named by resource
    /// id and categorised by its first path segment. Returns how many loaded.
    pub fn load_builtin_icons(&self) -> usize {
        let mut loaded = 0;
        for id in BUILTIN_ICONS {
            let category = match id.split_once('/') {
                Some((category, _)) => category,
                None => DEFAULT_CATEGORY,
            };
            match self.register_resource_icon(id, id, category) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("IconManager: Failed to load builtin icon '{}': {}", id, e),
            }
        }
        log::info!("IconManager: Loaded {} builtin icons", loaded);
        loaded
    }

    /// Register every `.svg` file below `dir`, recursively.
    ///
    /// Icons are named by file stem; the category is the name of the
    /// containing subdirectory, or [`DEFAULT_CATEGORY`] for files directly in
    /// `dir`. Returns how many icons were registered.
    ///
    /// Fails with [`IconError::IoError`] if `dir` itself cannot be read and
    /// with [`IconError::InvalidDirectory`] if it is not a directory.
    /// Unreadable entries below it are skipped.
    pub fn load_icons_from_directory(&self, dir: &Path) -> Result<usize, IconError> {
        let metadata = fs::metadata(dir).map_err(|e| {
            log::warn!("IconManager: Cannot read icon directory {:?}: {}", dir, e);
            e
        })?;
        if !metadata.is_dir() {
            log::warn!("IconManager: Not an icon directory: {:?}", dir);
            return Err(IconError::InvalidDirectory(dir.to_path_buf()));
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    log::warn!("IconManager: Cannot scan icon directory {:?}: {}", dir, e);
                    return Err(match e.into_io_error() {
                        Some(io) => IconError::IoError(io),
                        None => IconError::InvalidDirectory(dir.to_path_buf()),
                    });
                },
                Err(e) => {
                    log::warn!("IconManager: Skipping unreadable entry in {:?}: {}", dir, e);
                    continue;
                },
            };
            let path = entry.path();
            if !entry.file_type().is_file() || !is_svg(path) {
                continue;
            }
            let Some(name) = icon_name_from_path(path) else {
                continue;
            };

            let category = path
                .parent()
                .filter(|parent| *parent != dir)
                .and_then(|parent| parent.file_name())
                .and_then(|name| name.to_str())
                .unwrap_or(DEFAULT_CATEGORY);

            match self.register_icon(&name, &path.to_string_lossy(), category) {
                Ok(()) => loaded += 1,
                Err(e) => log::warn!("IconManager: Skipping {:?}: {}", path, e),
            }
        }

        log::info!("IconManager: Loaded {} icons from {:?}", loaded, dir);
        Ok(loaded)
    }

    /// Whether `name` is registered.
    pub fn has_icon(&self, name: &str) -> bool {
        self.registry.read().contains(name)
    }

    /// Descriptor of a registered icon.
    pub fn icon_info(&self, name: &str) -> Option<IconDescriptor> {
        self.registry.read().get(name).cloned()
    }

    /// All icon names in registration order.
    pub fn icon_names(&self) -> Vec<String> {
        self.registry.read().names()
    }

    /// Names of icons in `category`, in registration order.
    pub fn icons_by_category(&self, category: &str) -> Vec<String> {
        self.registry.read().names_by_category(category)
    }

    /// Names of icons carrying `tag`, in registration order.
    pub fn icons_by_tag(&self, tag: &str) -> Vec<String> {
        self.registry.read().names_by_tag(tag)
    }

    /// Distinct categories, sorted alphabetically.
    pub fn categories(&self) -> Vec<String> {
        self.registry.read().categories()
    }

    /// Attach tags to a registered icon. Returns `false` if it is not registered.
    pub fn add_icon_tags<I, S>(&self, name: &str, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registry.write().add_tags(name, tags)
    }

    /// Raw vector source of a registered icon, for callers that draw it themselves.
    pub fn icon_source_data(&self, name: &str) -> Result<Vec<u8>, IconError> {
        let source = self
            .registry
            .read()
            .get(name)
            .map(|icon| icon.source.clone())
            .ok_or_else(|| IconError::NotFound(name.to_string()))?;
        source
            .read(&self.resources)
            .map(Cow::into_owned)
            .map_err(|e| IconError::InvalidSource {
                location: source.to_string(),
                reason: e.to_string(),
            })
    }

    /// Get an icon rendered at `size`, optionally tinted.
    ///
    /// An empty `size` falls back to the default icon size. Renders are
    /// cached per `(name, size, tint)`; failed renders are not.
    pub fn get_icon(&self, name: &str, size: IconSize, tint: Option<Color>) -> Result<IconImage, IconError> {
        // Held until the image is cached so unregistering cannot interleave.
        let registry = self.registry.read();
        let Some(icon) = registry.get(name) else {
            log::warn!("IconManager: Icon not found: {}", name);
            return Err(IconError::NotFound(name.to_string()));
        };

        let size = self.request_size(size);
        let key = CacheKey::new(name, size, tint);

        if let Some(image) = self.cache.get(&key) {
            return Ok(image);
        }

        let image = self.render(icon, size, tint).map_err(|e| {
            log::warn!("IconManager: {}", e);
            e
        })?;

        self.cache.insert(key, image.clone());
        Ok(image)
    }

    /// Like [`get_icon`](Self::get_icon), but degrades to an empty image.
    pub fn get_icon_or_empty(&self, name: &str, size: IconSize, tint: Option<Color>) -> IconImage {
        self.get_icon(name, size, tint).unwrap_or_default()
    }

    fn render(&self, icon: &IconDescriptor, size: IconSize, tint: Option<Color>) -> Result<IconImage, IconError> {
        let failure = |reason: String| IconError::RenderFailure {
            name: icon.name.clone(),
            reason,
        };

        let data = icon.source.read(&self.resources).map_err(|e| failure(e.to_string()))?;
        let image = self
            .rasterizer
            .render(&data, size)
            .map_err(|e| failure(e.to_string()))?;

        Ok(match tint {
            Some(color) => self.rasterizer.apply_tint(&image, color),
            None => image,
        })
    }

    /// Drop every rendered image.
    pub fn clear_cache(&self) {
        let removed = self.cache.clear();
        log::debug!("IconManager: Cleared {} cached icons", removed);
        self.emit(IconEvent::CacheCleared { icon: None });
    }

    /// Drop the rendered images of one icon.
    pub fn clear_icon_cache(&self, name: &str) {
        self.cache.clear_icon(name);
        self.emit(IconEvent::CacheCleared {
            icon: Some(name.to_string()),
        });
    }

    /// Set the cache limit, clamped to the configured floor. Shrinking below
    /// the current size evicts immediately. Returns the effective limit.
    pub fn set_cache_limit(&self, limit: usize) -> usize {
        self.cache.set_limit(limit)
    }

    /// Current cache limit.
    pub fn cache_limit(&self) -> usize {
        self.cache.limit()
    }

    /// Number of rendered images currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Whether a render for `(name, size, tint)` is cached.
    pub fn is_cached(&self, name: &str, size: IconSize, tint: Option<Color>) -> bool {
        self.cache
            .contains(&CacheKey::new(name, self.request_size(size), tint))
    }

    /// Size actually rendered for a request: empty sizes use the default.
    fn request_size(&self, size: IconSize) -> IconSize {
        if size.is_empty() {
            self.settings.default_icon_size()
        } else {
            size
        }
    }
}

impl Default for IconManager {
    fn default() -> Self {
        Self::new(IconSettings::default())
    }
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or(false)
}
