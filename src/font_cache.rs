//! Per-document cache of registered fonts

use crate::Result;
use crate::font::FontMetrics;
use crate::style::{FontFamily, FontOptions, FontStyle, FontVariant, FontWeight};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// A font registered with a document writer.
///
/// Cloning is cheap; clones compare equal to the original.
#[derive(Clone)]
pub struct FontHandle {
    resource_name: Arc<str>,
    metrics: Arc<dyn FontMetrics>,
}

impl FontHandle {
    pub fn new(resource_name: impl Into<Arc<str>>, metrics: Arc<dyn FontMetrics>) -> Self {
        Self {
            resource_name: resource_name.into(),
            metrics,
        }
    }

    /// Name of the font in the page resources (e.g. `F1`)
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    pub fn metrics(&self) -> &dyn FontMetrics {
        self.metrics.as_ref()
    }
}

impl PartialEq for FontHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.resource_name, &other.resource_name)
    }
}

impl Eq for FontHandle {}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("resource_name", &self.resource_name)
            .finish()
    }
}

/// Something that can register a font family/variant and hand back a handle
pub trait FontRegistry {
    fn register_font(&mut self, family: &FontFamily, variant: FontVariant) -> Result<FontHandle>;
}

/// Cache key: normalized family, `-R` or `-I`, then `-B` when bold
pub fn font_key(family: &FontFamily, style: FontStyle, weight: FontWeight) -> String {
    let mut key = family.normalized();
    key.push_str(match style {
        FontStyle::Normal => "-R",
        FontStyle::Italic => "-I",
    });
    if weight == FontWeight::Bold {
        key.push_str("-B");
    }
    key
}

/// Maps font keys to handles so each distinct font is registered once per document
#[derive(Debug, Default)]
pub struct FontResourceCache {
    fonts: HashMap<String, FontHandle>,
}

impl FontResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the font described by `options`, registering it on first use
    pub fn resolve<R: FontRegistry + ?Sized>(
        &mut self,
        registry: &mut R,
        options: &FontOptions,
    ) -> Result<FontHandle> {
        let key = font_key(&options.family, options.style, options.weight);
        if let Some(handle) = self.fonts.get(&key) {
            trace!("Font cache hit for {}", key);
            return Ok(handle.clone());
        }

        let handle = registry.register_font(&options.family, options.variant())?;
        debug!(
            "Registered font {} as {}",
            key,
            handle.resource_name()
        );
        self.fonts.insert(key, handle.clone());
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Forget every handle; required when the underlying document changes
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;
    use crate::font::StandardFontMetrics;
    use crate::standard_fonts::StandardFamily;

    #[derive(Default)]
    struct CountingRegistry {
        calls: Vec<(String, FontVariant)>,
    }

    impl FontRegistry for CountingRegistry {
        fn register_font(
            &mut self,
            family: &FontFamily,
            variant: FontVariant,
        ) -> Result<FontHandle> {
            let standard = StandardFamily::from_normalized(&family.normalized()).ok_or_else(|| {
                BuilderError::FontUnavailable {
                    family: family.to_string(),
                    variant: variant.to_string(),
                }
            })?;
            self.calls.push((family.to_string(), variant));
            let metrics = StandardFontMetrics::new(standard.face(variant.bold, variant.italic));
            Ok(FontHandle::new(
                format!("F{}", self.calls.len()),
                Arc::new(metrics),
            ))
        }
    }

    #[test]
    fn test_font_keys() {
        let family = FontFamily::TIMES_NEW_ROMAN;
        assert_eq!(
            font_key(&family, FontStyle::Normal, FontWeight::Normal),
            "TIMESNEWROMAN-R"
        );
        assert_eq!(
            font_key(&family, FontStyle::Normal, FontWeight::Bold),
            "TIMESNEWROMAN-R-B"
        );
        assert_eq!(
            font_key(&FontFamily::ARIAL, FontStyle::Italic, FontWeight::Bold),
            "ARIAL-I-B"
        );
    }

    #[test]
    fn test_resolve_is_cached() {
        let mut registry = CountingRegistry::default();
        let mut cache = FontResourceCache::new();
        let font = FontOptions::new();

        let first = cache.resolve(&mut registry, &font).unwrap();
        let second = cache.resolve(&mut registry, &font.clone().with_size(30.0)).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.calls.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_keys_register_separately() {
        let mut registry = CountingRegistry::default();
        let mut cache = FontResourceCache::new();

        let regular = cache.resolve(&mut registry, &FontOptions::new()).unwrap();
        let bold = cache
            .resolve(&mut registry, &FontOptions::new().with_weight(FontWeight::Bold))
            .unwrap();
        // same key after normalization
        let spaced = cache
            .resolve(&mut registry, &FontOptions::new().with_family("times new roman"))
            .unwrap();

        assert_ne!(regular, bold);
        assert_eq!(regular, spaced);
        assert_eq!(registry.calls.len(), 2);
        assert_eq!(registry.calls[1].1, FontVariant { bold: true, italic: false });
    }

    #[test]
    fn test_unavailable_font_is_not_cached() {
        let mut registry = CountingRegistry::default();
        let mut cache = FontResourceCache::new();
        let font = FontOptions::new().with_family("Comic Sans");

        let err = cache.resolve(&mut registry, &font).unwrap_err();
        assert!(err.is_resource_error());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut registry = CountingRegistry::default();
        let mut cache = FontResourceCache::new();
        cache.resolve(&mut registry, &FontOptions::new()).unwrap();
        cache.clear();
        cache.resolve(&mut registry, &FontOptions::new()).unwrap();
        assert_eq!(registry.calls.len(), 2);
    }
}
