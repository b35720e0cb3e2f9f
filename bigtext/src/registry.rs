//! A named collection of loaded fonts
//!
//! Callers that render with more than one font keep them in a
//! [`FontRegistry`] and address them by name, with an optional default for
//! when no name is given.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::font::{Font, RenderError};
use crate::glyph::Glyph;
use crate::load::{self, LoadError};

/// A name-to-font map with an optional default font.
///
/// Fonts register under their full name and, when different, the name's stem,
/// so a font loaded from `chunky.flf` answers to both `chunky.flf` and
/// `chunky`. Registered fonts are shared, not copied.
#[derive(Debug, Default)]
pub struct FontRegistry {
    fonts: HashMap<String, Arc<Font>>,
    default_name: Option<String>,
}

impl FontRegistry {
    /// An empty registry with no default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with every font compiled into this crate, with
    /// `standard` as the default.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("standard", Font::standard());
        #[cfg(feature = "fonts")]
        for font in crate::font::FontFile::ALL {
            registry.insert(font.name(), Font::built_in(font));
        }
        registry.default_name = Some("standard".to_owned());
        registry
    }

    /// A registry of all loadable font files in a directory; see
    /// [`FontRegistry::add_dir`].
    ///
    /// # Errors
    /// [`LoadError::Io`] when the directory cannot be enumerated.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let mut registry = Self::new();
        registry.add_dir(path)?;
        Ok(registry)
    }

    /// Loads every loadable font file in a directory and reports how many
    /// were added. Files that fail to load are logged and skipped.
    ///
    /// # Errors
    /// [`LoadError::Io`] when the directory itself cannot be enumerated;
    /// individual files never fail the scan.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let path = path.as_ref();
        log::info!("loading fonts from {}", path.display());
        let mut added = 0;
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            match load::load_font(entry.path()) {
                Ok(font) => {
                    self.insert(entry.file_name().to_string_lossy(), font);
                    added += 1;
                }
                Err(error) => log::warn!("skipping {}: {error}", entry.path().display()),
            }
        }
        Ok(added)
    }

    /// Registers a font under `name` and, when different, the stem of
    /// `name`. Existing entries under either name are replaced.
    pub fn insert(&mut self, name: impl Into<String>, font: Font) {
        let name = name.into();
        let font = Arc::new(font);
        if let Some((stem, _)) = name.rsplit_once('.') {
            drop(self.fonts.insert(stem.to_owned(), Arc::clone(&font)));
        }
        drop(self.fonts.insert(name, font));
    }

    /// Looks up a font by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name).map(Arc::as_ref)
    }

    /// A shared handle to a font, outliving the registry if need be.
    #[must_use]
    pub fn get_shared(&self, name: &str) -> Option<Arc<Font>> {
        self.fonts.get(name).map(Arc::clone)
    }

    /// The registered names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// Sets the default font. Returns whether `name` is registered; if it is
    /// not, the previous default stays in place.
    pub fn set_default(&mut self, name: &str) -> bool {
        let known = self.fonts.contains_key(name);
        if known {
            self.default_name = Some(name.to_owned());
        }
        known
    }

    /// The default font, if one is set.
    #[must_use]
    pub fn default_font(&self) -> Option<&Font> {
        self.get(self.default_name.as_deref()?)
    }

    /// Renders `text` with the named font, or with the default font when
    /// `font` is `None`.
    ///
    /// # Errors
    /// [`RegistryError::UnknownFont`] or [`RegistryError::NoDefault`] when
    /// the font cannot be resolved, and any error from rendering itself.
    pub fn render(&self, text: &str, font: Option<&str>) -> Result<Glyph, RegistryError> {
        let font = match font {
            Some(name) => self
                .get(name)
                .ok_or_else(|| RegistryError::UnknownFont(name.to_owned()))?,
            None => self.default_font().ok_or(RegistryError::NoDefault)?,
        };
        Ok(font.render(text)?)
    }
}

/// An error resolving or using a registry font.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No font is registered under the requested name.
    #[error("no font registered under {0:?}")]
    UnknownFont(String),
    /// No font name was given and the registry has no default.
    #[error("the registry has no default font")]
    NoDefault,
    /// Rendering itself failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}
