//! Label registry and label-to-color allocation.
//!
//! Keys are short, permanent handles (`a`, `b`, ..., `z`, `aa`, `ab`, ...)
//! that the keyboard can select directly. Each key maps to a display string,
//! which may be renamed, and to a color drawn from a cyclic palette in the
//! order keys were allocated.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::LABEL_PALETTE;
use crate::error::{EditorError, Result};

/// Short stable label identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelKey(String);

impl LabelKey {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The n-th key of the generator sequence: a..z, aa..az, ba.., ...
    pub fn nth(mut index: usize) -> Self {
        let mut letters = Vec::new();
        loop {
            letters.push(b'a' + (index % 26) as u8);
            if index < 26 {
                break;
            }
            index = index / 26 - 1;
        }
        letters.reverse();
        Self(letters.into_iter().map(char::from).collect())
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LabelKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LabelKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<char> for LabelKey {
    fn from(value: char) -> Self {
        Self(value.to_string())
    }
}

/// Label display strings and colors keyed by [`LabelKey`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRegistry {
    labels: BTreeMap<LabelKey, String>,
    colors: BTreeMap<LabelKey, String>,
    palette: Vec<String>,
    /// Number of keys allocated since the last clear; drives the palette cursor.
    allocated: usize,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::with_palette(LABEL_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

impl LabelRegistry {
    /// Create an empty registry over the given palette.
    /// An empty palette falls back to the built-in one.
    pub fn with_palette(palette: Vec<String>) -> Self {
        let palette = if palette.is_empty() {
            LABEL_PALETTE.iter().map(|c| c.to_string()).collect()
        } else {
            palette
        };
        Self {
            labels: BTreeMap::new(),
            colors: BTreeMap::new(),
            palette,
            allocated: 0,
        }
    }

    pub fn labels(&self) -> &BTreeMap<LabelKey, String> {
        &self.labels
    }

    pub fn colors(&self) -> &BTreeMap<LabelKey, String> {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, key: &LabelKey) -> bool {
        self.labels.contains_key(key)
    }

    pub fn display(&self, key: &LabelKey) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn color(&self, key: &LabelKey) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Find the first key (in key order) whose display string is `text`.
    pub fn key_for_display(&self, text: &str) -> Option<&LabelKey> {
        self.labels
            .iter()
            .find(|(_, display)| display.as_str() == text)
            .map(|(key, _)| key)
    }

    /// Register `key` with `display`. Existing keys are left untouched.
    /// Returns whether the key was newly allocated.
    pub fn register(&mut self, key: LabelKey, display: impl Into<String>) -> bool {
        if self.labels.contains_key(&key) {
            return false;
        }
        let color = self.palette[self.allocated % self.palette.len()].clone();
        self.allocated += 1;
        tracing::debug!(key = %key, color = %color, "allocated label");
        self.colors.insert(key.clone(), color);
        self.labels.insert(key, display.into());
        true
    }

    /// Register `key` with itself as display text if it is missing.
    pub fn ensure(&mut self, key: &LabelKey) -> bool {
        if self.labels.contains_key(key) {
            return false;
        }
        self.register(key.clone(), key.as_str())
    }

    /// First key of the generator sequence not yet in use.
    pub fn next_free_key(&self) -> LabelKey {
        (0..)
            .map(LabelKey::nth)
            .find(|key| !self.labels.contains_key(key))
            .unwrap_or_else(|| LabelKey::nth(self.labels.len()))
    }

    /// Key for a display string, allocating a fresh key if the text is unknown.
    pub fn intern_display(&mut self, text: &str) -> LabelKey {
        if let Some(key) = self.key_for_display(text) {
            return key.clone();
        }
        let key = self.next_free_key();
        self.register(key.clone(), text);
        key
    }

    /// Rename the display string of an existing key. The key itself is permanent.
    pub fn rename(&mut self, key: &LabelKey, display: impl Into<String>) -> Result<()> {
        match self.labels.get_mut(key) {
            Some(current) => {
                *current = display.into();
                Ok(())
            }
            None => Err(EditorError::InvalidState(format!("unknown label '{}'", key))),
        }
    }

    /// Drop every label together with its color and restart the palette.
    pub fn clear(&mut self) {
        self.labels.clear();
        self.colors.clear();
        self.allocated = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sequence() {
        assert_eq!(LabelKey::nth(0).as_str(), "a");
        assert_eq!(LabelKey::nth(25).as_str(), "z");
        assert_eq!(LabelKey::nth(26).as_str(), "aa");
        assert_eq!(LabelKey::nth(27).as_str(), "ab");
        assert_eq!(LabelKey::nth(52).as_str(), "ba");
        assert_eq!(LabelKey::nth(26 + 26 * 26).as_str(), "aaa");
    }

    #[test]
    fn test_colors_follow_allocation_order() {
        let mut registry = LabelRegistry::default();
        for i in 0..LABEL_PALETTE.len() + 1 {
            registry.register(LabelKey::nth(i), format!("speaker {i}"));
        }
        assert_eq!(registry.color(&"a".into()), Some(LABEL_PALETTE[0]));
        assert_eq!(registry.color(&"b".into()), Some(LABEL_PALETTE[1]));
        // Palette wraps around once exhausted
        let wrapped = LabelKey::nth(LABEL_PALETTE.len());
        assert_eq!(registry.color(&wrapped), Some(LABEL_PALETTE[0]));
    }

    #[test]
    fn test_register_does_not_overwrite() {
        let mut registry = LabelRegistry::default();
        assert!(registry.register("a".into(), "Alice"));
        assert!(!registry.register("a".into(), "Bob"));
        assert!(!registry.ensure(&"a".into()));
        assert_eq!(registry.display(&"a".into()), Some("Alice"));
    }

    #[test]
    fn test_intern_skips_existing_keys() {
        let mut registry = LabelRegistry::default();
        registry.ensure(&"a".into());
        registry.ensure(&"c".into());
        assert_eq!(registry.intern_display("Alice").as_str(), "b");
        assert_eq!(registry.intern_display("Bob").as_str(), "d");
        assert_eq!(registry.intern_display("Alice").as_str(), "b");
    }

    #[test]
    fn test_rename_keeps_key_and_color() {
        let mut registry = LabelRegistry::default();
        registry.ensure(&"a".into());
        let color = registry.color(&"a".into()).map(str::to_string);
        registry.rename(&"a".into(), "Alice").unwrap();
        assert_eq!(registry.display(&"a".into()), Some("Alice"));
        assert_eq!(registry.color(&"a".into()).map(str::to_string), color);
        assert!(registry.rename(&"z".into(), "Zed").is_err());
    }

    #[test]
    fn test_clear_resets_colors_and_palette() {
        let mut registry = LabelRegistry::default();
        registry.ensure(&"a".into());
        registry.ensure(&"b".into());
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.colors().is_empty());
        registry.ensure(&"q".into());
        assert_eq!(registry.color(&"q".into()), Some(LABEL_PALETTE[0]));
    }
}
