// SPDX-License-Identifier: LGPL-3.0-only
use anyhow::Result;
use serde::Deserialize;
use smol::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

use crate::icon::IconSize;

/// Name of the settings file looked up in the XDG directories.
pub const SETTINGS_FILE: &str = "icons.toml";

/// Directory, next to the executable, scanned for extra icons by default.
pub const DEFAULT_ICON_DIRECTORY: &str = "Icon";

/// On-disk layout of an `icons.toml` file. Every field is optional so that
/// files can be layered.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    /// The `[icons]` table.
    #[serde(default)]
    pub icons: IconSettingsPatch,
}

/// Partial icon settings as read from a single file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IconSettingsPatch {
    /// See [`IconSettings::cache_limit`].
    pub cache_limit: Option<usize>,
    /// See [`IconSettings::min_cache_limit`].
    pub min_cache_limit: Option<usize>,
    /// See [`IconSettings::eviction_slack`].
    pub eviction_slack: Option<usize>,
    /// See [`IconSettings::default_size`].
    pub default_size: Option<u32>,
    /// See [`IconSettings::fallback_size`].
    pub fallback_size: Option<u32>,
    /// See [`IconSettings::load_builtin`].
    pub load_builtin: Option<bool>,
    /// See [`IconSettings::icon_directory`].
    pub icon_directory: Option<PathBuf>,
}

/// Effective configuration of the icon manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSettings {
    /// Maximum number of rendered images kept in the cache.
    pub cache_limit: usize,
    /// Floor applied to every cache limit.
    pub min_cache_limit: usize,
    /// Extra entries reclaimed whenever the cache overflows.
    pub eviction_slack: usize,
    /// Side length used when an icon is requested at an empty size.
    pub default_size: u32,
    /// Side length assumed for sources that cannot be parsed at registration.
    pub fallback_size: u32,
    /// Register the built-in resource icons on bootstrap.
    pub load_builtin: bool,
    /// Directory scanned for `.svg` icons on bootstrap. `None` means
    /// `Icon/` next to the executable.
    pub icon_directory: Option<PathBuf>,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            cache_limit: 100,
            min_cache_limit: 10,
            eviction_slack: 10,
            default_size: 16,
            fallback_size: 24,
            load_builtin: true,
            icon_directory: None,
        }
    }
}

impl IconSettings {
    /// Load settings from standard locations, starting from the defaults.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/fluentkit/icons.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/fluentkit/icons.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/fluentkit/icons.toml (XDG_CONFIG_HOME)
    pub async fn load() -> Result<Self> {
        let xdg_dirs = BaseDirectories::with_prefix("fluentkit")?;
        let mut settings = Self::default();

        for path in xdg_dirs.find_data_files(SETTINGS_FILE).rev() {
            settings.load_file(&path).await;
        }

        for path in xdg_dirs.find_config_files(SETTINGS_FILE).rev() {
            settings.load_file(&path).await;
        }

        let user_config_path = xdg_dirs.get_config_home().join(SETTINGS_FILE);
        if user_config_path.exists() {
            settings.load_file(&user_config_path).await;
        }

        Ok(settings)
    }

    /// Load and merge settings from explicit paths, in order.
    pub async fn load_from_paths(&mut self, paths: Vec<PathBuf>) -> Vec<Result<()>> {
        let mut results = Vec::new();

        for path in paths {
            let result = async {
                let content = fs::read_to_string(&path)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to read settings file {:?}: {}", path, e))?;
                let file: SettingsFile = toml::from_str(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse settings file {:?}: {}", path, e))?;
                self.merge(file.icons);
                Ok(())
            }
            .await;

            results.push(result);
        }

        results
    }

    /// Parse settings from a TOML string on top of the defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: SettingsFile = toml::from_str(content)?;
        let mut settings = Self::default();
        settings.merge(file.icons);
        Ok(settings)
    }

    async fn load_file(&mut self, path: &Path) {
        log::info!("Loading icon settings from: {:?}", path);
        match fs::read_to_string(path).await {
            Ok(content) => match toml::from_str::<SettingsFile>(&content) {
                Ok(file) => self.merge(file.icons),
                Err(e) => {
                    log::error!("Failed to parse icon settings {:?}: {}", path, e);
                },
            },
            Err(e) => {
                log::warn!("Failed to read icon settings {:?}: {}", path, e);
            },
        }
    }

    /// Merge a loaded patch into the current settings, field by field.
    pub fn merge(&mut self, other: IconSettingsPatch) {
        if let Some(limit) = other.cache_limit {
            self.cache_limit = limit;
        }
        if let Some(min) = other.min_cache_limit {
            self.min_cache_limit = min;
        }
        if let Some(slack) = other.eviction_slack {
            self.eviction_slack = slack;
        }
        if let Some(size) = other.default_size {
            self.default_size = size;
        }
        if let Some(size) = other.fallback_size {
            self.fallback_size = size;
        }
        if let Some(load) = other.load_builtin {
            self.load_builtin = load;
        }
        if other.icon_directory.is_some() {
            self.icon_directory = other.icon_directory;
        }
    }

    /// Directory scanned on bootstrap.
    pub fn resolved_icon_directory(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.icon_directory {
            return Some(dir.clone());
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_ICON_DIRECTORY)))
    }

    /// Size used for requests with an empty size.
    pub fn default_icon_size(&self) -> IconSize {
        IconSize::square(self.default_size)
    }

    /// Native size assumed for sources that do not parse.
    pub fn fallback_icon_size(&self) -> IconSize {
        IconSize::square(self.fallback_size)
    }
}
