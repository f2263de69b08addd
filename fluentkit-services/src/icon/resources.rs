// SPDX-License-Identifier: LGPL-3.0-only
//! Embedded icon resources.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Location prefix selecting an embedded resource instead of a file path.
pub const RESOURCE_PREFIX: &str = ":/icons/";

/// Icons compiled into the crate, registered by default on bootstrap.
pub const BUILTIN_ICONS: &[&str] = &["solid/house", "solid/heart", "solid/arrows-rotate"];

static BUILTIN: Lazy<ResourceBundle> = Lazy::new(|| {
    let mut bundle = ResourceBundle::new();
    bundle.insert(
        "solid/house",
        include_bytes!("../../resources/icons/solid/house.svg"),
    );
    bundle.insert(
        "solid/heart",
        include_bytes!("../../resources/icons/solid/heart.svg"),
    );
    bundle.insert(
        "solid/arrows-rotate",
        include_bytes!("../../resources/icons/solid/arrows-rotate.svg"),
    );
    bundle
});

/// A set of static icon sources addressed by resource id (e.g. `solid/house`).
#[derive(Debug, Clone, Default)]
pub struct ResourceBundle {
    entries: IndexMap<String, &'static [u8]>,
}

impl ResourceBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bundle of icons shipped with the crate.
    pub fn builtin() -> &'static ResourceBundle {
        &BUILTIN
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, id: impl Into<String>, data: &'static [u8]) {
        self.entries.insert(id.into(), data);
    }

    /// Source bytes of a resource.
    pub fn get(&self, id: &str) -> Option<&'static [u8]> {
        self.entries.get(id).copied()
    }

    /// Whether the bundle has a resource with this id.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Resource ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bundle has no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
