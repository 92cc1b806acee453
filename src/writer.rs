//! Low-level document writer backed by lopdf
//!
//! Owns the object graph of one document: the page tree, a resources
//! dictionary shared by every page, the content operations of the active
//! page, and the font and image objects registered so far. Coordinates
//! handed to it are already in points.

use crate::constants::PDF_VERSION;
use crate::error::{BuilderError, Result};
use crate::font::{FontMetrics, StandardFontMetrics};
use crate::font_cache::{FontHandle, FontRegistry};
use crate::image_layout::EncodedImage;
use crate::options::FontSource;
use crate::standard_fonts::StandardFamily;
use crate::style::{FontFamily, FontVariant};
use crate::units::UnitConverter;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::sync::Arc;
use tracing::{debug, trace};

pub struct PdfWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    /// Page size in points
    page_size: (f32, f32),
    fonts: Dictionary,
    xobjects: Dictionary,
    /// Operations of the active page not yet written to a content stream
    pending: Vec<Operation>,
    font_sources: Vec<FontSource>,
}

impl PdfWriter {
    /// Start a document whose pages are `width_mm` x `height_mm`
    pub fn new(width_mm: f32, height_mm: f32, font_sources: Vec<FontSource>) -> Self {
        let units = UnitConverter::new();
        let mut document = Document::with_version(PDF_VERSION);
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![],
                "Count" => 0,
            }),
        );
        document
            .objects
            .insert(resources_id, Object::Dictionary(Dictionary::new()));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            page_size: (units.to_native(width_mm), units.to_native(height_mm)),
            fonts: Dictionary::new(),
            xobjects: Dictionary::new(),
            pending: Vec::new(),
            font_sources,
        }
    }

    /// Append a page and make it the target of subsequent operations
    pub fn add_page(&mut self) -> Result<ObjectId> {
        self.flush()?;

        let (width, height) = self.page_size;
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        self.update_page_tree();

        debug!("Added page {} ({:?})", self.page_ids.len(), page_id);
        Ok(page_id)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn current_page(&self) -> Option<ObjectId> {
        self.page_ids.last().copied()
    }

    /// Queue operations on the active page
    pub fn push_operations(&mut self, operations: Vec<Operation>) -> Result<()> {
        if self.page_ids.is_empty() {
            return Err(BuilderError::NoActivePage);
        }
        trace!("Queued {} operations", operations.len());
        self.pending.extend(operations);
        Ok(())
    }

    /// Write queued operations to a content stream of the active page
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let Some(page_id) = self.current_page() else {
            return Err(BuilderError::NoActivePage);
        };

        let operations = std::mem::take(&mut self.pending);
        debug!(
            "Adding {} operations to page {:?}",
            operations.len(),
            page_id
        );
        let content = Content { operations };
        self.document.add_page_contents(page_id, content.encode()?)?;
        Ok(())
    }

    /// Add a JPEG image XObject, returning its resource name
    pub fn embed_image(&mut self, image: EncodedImage) -> Result<String> {
        let resource_name = format!("Im{}", self.xobjects.len() + 1);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width_px as i64,
                "Height" => image.height_px as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            image.data,
        )
        .with_compression(false);
        let image_id = self.document.add_object(stream);
        self.xobjects.set(resource_name.as_bytes(), image_id);

        debug!(
            "Embedded {}x{} image as {}",
            image.width_px, image.height_px, resource_name
        );
        Ok(resource_name)
    }

    /// Serialize the document.
    ///
    /// The writer stays usable; later content lands in a further content
    /// stream of the active page.
    pub fn finalize(&mut self) -> Result<Vec<u8>> {
        self.flush()?;
        self.update_page_tree();
        self.document.objects.insert(
            self.resources_id,
            Object::Dictionary(dictionary! {
                "Font" => self.fonts.clone(),
                "XObject" => self.xobjects.clone(),
            }),
        );

        let mut buffer = Vec::new();
        self.document.save_to(&mut buffer)?;
        debug!(
            "Serialized {} pages into {} bytes",
            self.page_ids.len(),
            buffer.len()
        );
        Ok(buffer)
    }

    fn update_page_tree(&mut self) {
        if let Some(Object::Dictionary(pages)) = self.document.objects.get_mut(&self.pages_id) {
            let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
            pages.set("Kids", kids);
            pages.set("Count", self.page_ids.len() as i64);
        }
    }

    fn font_source(&self, family: &FontFamily, variant: FontVariant) -> Option<FontSource> {
        let normalized = family.normalized();
        self.font_sources
            .iter()
            .find(|source| source.variant == variant && source.family.normalized() == normalized)
            .cloned()
    }

    fn add_standard_font(
        &mut self,
        family: StandardFamily,
        variant: FontVariant,
    ) -> (ObjectId, Arc<dyn FontMetrics>) {
        let metrics = StandardFontMetrics::new(family.face(variant.bold, variant.italic));
        let font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => metrics.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        let metrics: Arc<dyn FontMetrics> = Arc::new(metrics);
        (font_id, metrics)
    }

    /// Embed TrueType data as a Type0 font with an Identity-H CIDFontType2 descendant
    #[cfg(feature = "ttf-parser")]
    fn add_true_type_font(
        &mut self,
        source: &FontSource,
    ) -> Result<(ObjectId, Arc<dyn FontMetrics>)> {
        use crate::font::TtfFontMetrics;

        let metrics = TtfFontMetrics::new(source.data.clone())?;
        let face = metrics
            .face()
            .ok_or_else(|| {
                BuilderError::FontParse(format!("{} could not be parsed", source.family))
            })?;

        let scale = 1000.0 / metrics.units_per_em();
        let to_glyph_space = |value: i16| (value as f32 * scale).round() as i64;
        let ascent = to_glyph_space(face.ascender());
        let descent = to_glyph_space(face.descender());
        let cap_height = to_glyph_space(face.capital_height().unwrap_or(face.ascender()));
        let bbox = face.global_bounding_box();

        let base_font = match (source.variant.bold, source.variant.italic) {
            (false, false) => source.family.name().replace(' ', ""),
            (true, false) => format!("{},Bold", source.family.name().replace(' ', "")),
            (false, true) => format!("{},Italic", source.family.name().replace(' ', "")),
            (true, true) => format!("{},BoldItalic", source.family.name().replace(' ', "")),
        };

        let font_file_id = self.document.add_object(Stream::new(
            dictionary! {
                "Length1" => metrics.font_data().len() as i64,
            },
            metrics.font_data().to_vec(),
        ));

        let descriptor_id = self.document.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(base_font.as_bytes().to_vec()),
            "Flags" => 32,
            "ItalicAngle" => if source.variant.italic { -12 } else { 0 },
            "Ascent" => ascent,
            "Descent" => descent,
            "CapHeight" => cap_height,
            "StemV" => if source.variant.bold { 120 } else { 80 },
            "FontBBox" => vec![
                to_glyph_space(bbox.x_min).into(),
                to_glyph_space(bbox.y_min).into(),
                to_glyph_space(bbox.x_max).into(),
                to_glyph_space(bbox.y_max).into(),
            ],
            "FontFile2" => font_file_id,
        });

        let widths: Vec<Object> = metrics
            .glyph_widths()
            .into_iter()
            .map(Object::Integer)
            .collect();

        let cid_font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "CIDToGIDMap" => "Identity",
            "DW" => 1000,
            "W" => vec![Object::Integer(0), Object::Array(widths)],
        });

        let font_id = self.document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![cid_font_id.into()],
        });

        let metrics: Arc<dyn FontMetrics> = Arc::new(metrics);
        Ok((font_id, metrics))
    }

    #[cfg(not(feature = "ttf-parser"))]
    fn add_true_type_font(
        &mut self,
        source: &FontSource,
    ) -> Result<(ObjectId, Arc<dyn FontMetrics>)> {
        Err(BuilderError::FontParse(format!(
            "{} needs TrueType support (ttf-parser feature)",
            source.family
        )))
    }
}

impl FontRegistry for PdfWriter {
    fn register_font(&mut self, family: &FontFamily, variant: FontVariant) -> Result<FontHandle> {
        let (font_id, metrics) = if let Some(source) = self.font_source(family, variant) {
            self.add_true_type_font(&source)?
        } else if let Some(standard) = StandardFamily::from_normalized(&family.normalized()) {
            self.add_standard_font(standard, variant)
        } else {
            return Err(BuilderError::FontUnavailable {
                family: family.to_string(),
                variant: variant.to_string(),
            });
        };

        let resource_name = format!("F{}", self.fonts.len() + 1);
        self.fonts.set(resource_name.as_bytes(), font_id);
        trace!("Font {} {} -> {} {:?}", family, variant, resource_name, font_id);
        Ok(FontHandle::new(resource_name, metrics))
    }
}
