// SPDX-License-Identifier: LGPL-3.0-only
//! Name to icon descriptor mapping.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::icon::image::IconSize;
use crate::icon::resources::{ResourceBundle, RESOURCE_PREFIX};

/// Category given to icons registered without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Where an icon's vector source lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IconSource {
    /// A file on disk.
    File(PathBuf),
    /// An entry of the resource bundle, by id (e.g. `solid/house`).
    Resource(String),
}

impl IconSource {
    /// Parse a source location.
    ///
    /// Locations starting with `:/icons/` (or just `:/`) name embedded
    /// resources; anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        if let Some(id) = location.strip_prefix(RESOURCE_PREFIX) {
            Self::Resource(id.to_string())
        } else if let Some(id) = location.strip_prefix(":/") {
            Self::Resource(id.to_string())
        } else {
            Self::File(PathBuf::from(location))
        }
    }

    /// Read the raw source bytes.
    pub fn read(&self, bundle: &ResourceBundle) -> io::Result<Cow<'static, [u8]>> {
        match self {
            Self::File(path) => fs::read(path).map(Cow::Owned),
            Self::Resource(id) => bundle.get(id).map(Cow::Borrowed).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no embedded resource '{}'", id),
                )
            }),
        }
    }
}

impl fmt::Display for IconSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Resource(id) => write!(f, "{}{}", RESOURCE_PREFIX, id),
        }
    }
}

/// A registered icon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconDescriptor {
    /// Unique icon name.
    pub name: String,
    /// Where the vector source lives.
    pub source: IconSource,
    /// Grouping label, [`DEFAULT_CATEGORY`] if none was given.
    pub category: String,
    /// Secondary lookup labels.
    pub tags: BTreeSet<String>,
    /// Intrinsic size of the vector source, or the fallback size if it could
    /// not be parsed.
    pub native_size: IconSize,
}

impl IconDescriptor {
    /// Create a descriptor with no tags. An empty category becomes [`DEFAULT_CATEGORY`].
    pub fn new(
        name: impl Into<String>,
        source: IconSource,
        category: &str,
        native_size: IconSize,
    ) -> Self {
        let category = if category.is_empty() {
            DEFAULT_CATEGORY
        } else {
            category
        };
        Self {
            name: name.into(),
            source,
            category: category.to_string(),
            tags: BTreeSet::new(),
            native_size,
        }
    }
}

/// Registered icons, in registration order.
#[derive(Debug, Default)]
pub struct IconRegistry {
    icons: IndexMap<String, IconDescriptor>,
}

impl IconRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor, returning the one it replaced.
    ///
    /// A replaced icon keeps its original position in [`names`](Self::names).
    pub fn insert(&mut self, descriptor: IconDescriptor) -> Option<IconDescriptor> {
        self.icons.insert(descriptor.name.clone(), descriptor)
    }

    /// Remove an icon, returning its descriptor.
    pub fn remove(&mut self, name: &str) -> Option<IconDescriptor> {
        self.icons.shift_remove(name)
    }

    /// Descriptor of a registered icon.
    pub fn get(&self, name: &str) -> Option<&IconDescriptor> {
        self.icons.get(name)
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.icons.contains_key(name)
    }

    /// Number of registered icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether no icons are registered.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Attach tags to an icon. Returns `false` if it is not registered.
    pub fn add_tags<I, S>(&mut self, name: &str, tags: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.icons.get_mut(name) {
            Some(descriptor) => {
                descriptor.tags.extend(tags.into_iter().map(Into::into));
                true
            },
            None => false,
        }
    }

    /// All icon names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.icons.keys().cloned().collect()
    }

    /// Names of icons in `category`, in registration order.
    pub fn names_by_category(&self, category: &str) -> Vec<String> {
        self.icons
            .values()
            .filter(|icon| icon.category == category)
            .map(|icon| icon.name.clone())
            .collect()
    }

    /// Names of icons carrying `tag`, in registration order.
    pub fn names_by_tag(&self, tag: &str) -> Vec<String> {
        self.icons
            .values()
            .filter(|icon| icon.tags.contains(tag))
            .map(|icon| icon.name.clone())
            .collect()
    }

    /// Distinct categories, sorted alphabetically.
    pub fn categories(&self) -> Vec<String> {
        self.icons
            .values()
            .map(|icon| icon.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Icon name derived from a file path: its file stem.
pub fn icon_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(name: &str, category: &str) -> IconDescriptor {
        IconDescriptor::new(
            name,
            IconSource::File(PathBuf::from(format!("/icons/{}.svg", name))),
            category,
            IconSize::square(24),
        )
    }

    #[test]
    fn test_parse_source_location() {
        assert_eq!(
            IconSource::parse(":/icons/solid/house"),
            IconSource::Resource("solid/house".to_string())
        );
        assert_eq!(
            IconSource::parse(":/solid/heart"),
            IconSource::Resource("solid/heart".to_string())
        );
        assert_eq!(
            IconSource::parse("/usr/share/icons/home.svg"),
            IconSource::File(PathBuf::from("/usr/share/icons/home.svg"))
        );
        assert_eq!(
            IconSource::parse(":/icons/solid/house").to_string(),
            ":/icons/solid/house"
        );
    }

    #[test]
    fn test_read_missing_resource() {
        let err = IconSource::Resource("nope".into())
            .read(&ResourceBundle::new())
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_empty_category_defaults() {
        assert_eq!(descriptor("home", "").category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_queries_keep_insertion_order() {
        let mut registry = IconRegistry::new();
        registry.insert(descriptor("zoom", "view"));
        registry.insert(descriptor("add", "edit"));
        registry.insert(descriptor("cut", "edit"));
        registry.insert(descriptor("bell", ""));

        assert_eq!(registry.names(), vec!["zoom", "add", "cut", "bell"]);
        assert_eq!(registry.names_by_category("edit"), vec!["add", "cut"]);
        assert_eq!(registry.categories(), vec!["General", "edit", "view"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut registry = IconRegistry::new();
        registry.insert(descriptor("a", "x"));
        registry.insert(descriptor("b", "x"));
        let old = registry.insert(descriptor("a", "y"));

        assert_eq!(old.map(|d| d.category), Some("x".to_string()));
        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.get("a").map(|d| d.category.as_str()), Some("y"));
    }

    #[test]
    fn test_tags() {
        let mut registry = IconRegistry::new();
        registry.insert(descriptor("home", ""));
        registry.insert(descriptor("heart", ""));

        assert!(registry.add_tags("home", ["house", "start"]));
        assert!(registry.add_tags("heart", ["like"]));
        assert!(!registry.add_tags("missing", ["x"]));

        assert_eq!(registry.names_by_tag("start"), vec!["home"]);
        assert!(registry.names_by_tag("nothing").is_empty());
    }

    #[test]
    fn test_remove() {
        let mut registry = IconRegistry::new();
        registry.insert(descriptor("a", ""));
        registry.insert(descriptor("b", ""));
        registry.insert(descriptor("c", ""));
        assert!(registry.remove("b").is_some());
        assert!(registry.remove("b").is_none());
        assert_eq!(registry.names(), vec!["a", "c"]);
    }

    #[test]
    fn test_icon_name_from_path() {
        assert_eq!(
            icon_name_from_path(Path::new("/icons/solid/house.svg")),
            Some("house".to_string())
        );
        assert_eq!(icon_name_from_path(Path::new("/")), None);
    }
}
