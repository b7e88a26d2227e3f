//! Visual Field Synthesizer: builds the signature widget annotation, its
//! optional appearance XObject, and the page `/Annots` update that makes the
//! widget visible.
//!
//! Generalizes [`crate::forms::widget::AppearanceBuilder`]'s content-stream
//! generation (already built for ordinary form fields) to signature fields,
//! and reuses [`crate::font::FontMetrics`] to size text without a font
//! embedded in the document.

use super::config::AppearanceConfig;
use crate::color::Color;
use crate::error::{ParserError, PdfResult, WriterError};
use crate::font::Font;
use crate::forms::widget::AppearanceBuilder;
use crate::incremental::IncrementalWriter;
use crate::object::{Object, PdfArray, PdfDictionary, PdfName, PdfStream, PdfString};
use crate::parser::PdfReader;
use crate::types::ObjectId;

/// Annotation flags: bit 3 (`Print`, value 4) + bit 8 (`Locked`, value 128).
/// A signature widget should print and should not be movable/resizable once
/// placed.
const WIDGET_FLAGS: i64 = 4 | 128;

/// The object IDs a synthesized field touches, for the caller to fold into
/// its catalog/AcroForm update.
pub struct SynthesizedField {
    pub widget_id: ObjectId,
    pub page_id: ObjectId,
}

/// Walks the page tree starting at the catalog's `/Pages` root, collecting
/// leaf page object IDs in document order.
fn collect_page_ids(reader: &PdfReader) -> PdfResult<Vec<ObjectId>> {
    let catalog = reader
        .catalog()
        .ok_or_else(|| WriterError::Structure("missing catalog".into()))?;
    let pages_ref = match catalog.get("Pages") {
        Some(Object::Reference(id)) => *id,
        _ => return Err(WriterError::Structure("catalog missing /Pages".into()).into()),
    };

    let mut out = Vec::new();
    walk_page_node(reader, pages_ref, &mut out)?;
    Ok(out)
}

fn walk_page_node(reader: &PdfReader, id: ObjectId, out: &mut Vec<ObjectId>) -> PdfResult<()> {
    let node = reader
        .resolve_reference(id)
        .ok_or_else(|| ParserError::ObjectNotFound(id.number, id.generation))?;
    let Object::Dictionary(dict) = node else {
        return Err(WriterError::Structure("page tree node is not a dictionary".into()).into());
    };

    match dict.get("Type") {
        Some(Object::Name(name)) if name.as_str() == "Pages" => {
            if let Some(Object::Array(kids)) = dict.get("Kids") {
                for kid in kids.iter() {
                    if let Object::Reference(kid_id) = kid {
                        walk_page_node(reader, *kid_id, out)?;
                    }
                }
            }
        }
        _ => out.push(id),
    }
    Ok(())
}

/// The resource dictionary key under which the Type 1 Times-Roman font is
/// registered for text rendered into a signature appearance.
const TEXT_FONT_RESOURCE_NAME: &str = "TiRo";

fn build_appearance_stream(config: &AppearanceConfig) -> Option<(PdfDictionary, Vec<u8>)> {
    let rect = config.rect.with_origin();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None; // invisible signature: no appearance at all
    }

    #[cfg(feature = "images")]
    if let Some(image_bytes) = &config.image {
        if let Ok(image) = crate::image::Image::from_bytes(image_bytes) {
            return Some(match config.text.as_deref() {
                Some(text) => build_image_and_text_appearance(config, &image, text),
                None => build_image_appearance(config, &image),
            });
        }
    }

    Some(build_text_appearance(config))
}

/// Centered-text-only appearance: a Type 1 Times-Roman resource drawn over
/// the widget rectangle's border.
fn build_text_appearance(config: &AppearanceConfig) -> (PdfDictionary, Vec<u8>) {
    let rect = config.rect.with_origin();
    let font = Font::times_roman();
    let builder = AppearanceBuilder::new(rect).border_color(Color::gray(0.0)).border_width(0.75);
    let content = builder.build_text_appearance(config.text.as_deref(), TEXT_FONT_RESOURCE_NAME, 10.0, Color::gray(0.0));

    let mut resources = PdfDictionary::new();
    let mut font_dict = PdfDictionary::new();
    font_dict.set(TEXT_FONT_RESOURCE_NAME, Object::Dictionary(font.to_dictionary()));
    resources.set("Font", Object::Dictionary(font_dict));

    let mut dict = PdfDictionary::new();
    dict.set("Type", Object::Name(PdfName::new_unchecked("XObject")));
    dict.set("Subtype", Object::Name(PdfName::new_unchecked("Form")));
    dict.set(
        "BBox",
        Object::Array(rect.to_array().iter().map(|v| Object::Real(*v)).collect()),
    );
    dict.set("Resources", Object::Dictionary(resources));

    (dict, content.into_bytes())
}

#[cfg(feature = "images")]
fn build_image_appearance(config: &AppearanceConfig, image: &crate::image::Image) -> (PdfDictionary, Vec<u8>) {
    let rect = config.rect.with_origin();
    let (resources, image_content) = image_resources_and_content(image, &rect);

    let mut dict = PdfDictionary::new();
    dict.set("Type", Object::Name(PdfName::new_unchecked("XObject")));
    dict.set("Subtype", Object::Name(PdfName::new_unchecked("Form")));
    dict.set(
        "BBox",
        Object::Array(rect.to_array().iter().map(|v| Object::Real(*v)).collect()),
    );
    dict.set("Resources", Object::Dictionary(resources));

    (dict, image_content.into_bytes())
}

/// Image-as-watermark appearance: the image drawn as a full-rect background,
/// with the signer's text drawn on top of it.
#[cfg(feature = "images")]
fn build_image_and_text_appearance(
    config: &AppearanceConfig,
    image: &crate::image::Image,
    text: &str,
) -> (PdfDictionary, Vec<u8>) {
    let rect = config.rect.with_origin();
    let (mut resources, mut content) = image_resources_and_content(image, &rect);

    let font = Font::times_roman();
    let mut font_dict = PdfDictionary::new();
    font_dict.set(TEXT_FONT_RESOURCE_NAME, Object::Dictionary(font.to_dictionary()));
    resources.set("Font", Object::Dictionary(font_dict));

    let builder = AppearanceBuilder::new(rect).border_color(Color::gray(0.0)).border_width(0.75);
    content.push_str(&builder.build_text_appearance(Some(text), TEXT_FONT_RESOURCE_NAME, 10.0, Color::gray(0.0)));

    let mut dict = PdfDictionary::new();
    dict.set("Type", Object::Name(PdfName::new_unchecked("XObject")));
    dict.set("Subtype", Object::Name(PdfName::new_unchecked("Form")));
    dict.set(
        "BBox",
        Object::Array(rect.to_array().iter().map(|v| Object::Real(*v)).collect()),
    );
    dict.set("Resources", Object::Dictionary(resources));

    (dict, content.into_bytes())
}

#[cfg(feature = "images")]
fn image_resources_and_content(image: &crate::image::Image, rect: &crate::types::Rectangle) -> (PdfDictionary, String) {
    use crate::image::ImageXObject;

    let xobject = ImageXObject::from_image(image);

    let mut resources = PdfDictionary::new();
    let mut xobject_dict = PdfDictionary::new();
    // The image stream itself is embedded as a nested direct stream value;
    // readers accept this for Form XObjects that reference a single image
    // and never share it with other content.
    xobject_dict.set("Img", Object::Stream(xobject.stream));
    resources.set("XObject", Object::Dictionary(xobject_dict));

    let content = format!(
        "q\n{w} 0 0 {h} 0 0 cm\n/Img Do\nQ\n",
        w = rect.width(),
        h = rect.height()
    );

    (resources, content)
}

/// Builds the widget annotation (and, if visible, its appearance XObject),
/// writes both as new indirect objects, and rewrites the target page object
/// (under its original object number) to list the widget in `/Annots`.
pub fn synthesize_widget(
    writer: &mut IncrementalWriter,
    reader: &PdfReader,
    config: &AppearanceConfig,
    field_name: &str,
    sig_dict_id: ObjectId,
) -> PdfResult<SynthesizedField> {
    let page_ids = collect_page_ids(reader)?;
    let page_id = *page_ids
        .get(config.page_index)
        .ok_or_else(|| WriterError::Structure(format!("page index {} out of range", config.page_index)))?;

    let appearance_id = if let Some((ap_dict, ap_content)) = build_appearance_stream(config) {
        let id = writer.allocate_id();
        let stream = PdfStream::with_dictionary(ap_dict, ap_content);
        writer.write_object(id, &Object::Stream(stream))?;
        Some(id)
    } else {
        None
    };

    let widget_id = writer.allocate_id();
    let mut widget = PdfDictionary::new();
    widget.set("Type", Object::Name(PdfName::new_unchecked("Annot")));
    widget.set("Subtype", Object::Name(PdfName::new_unchecked("Widget")));
    widget.set("FT", Object::Name(PdfName::new_unchecked("Sig")));
    widget.set("T", Object::String(PdfString::pdf_text(field_name)));
    widget.set(
        "Rect",
        Object::Array(config.rect.to_array().iter().map(|v| Object::Real(*v)).collect()),
    );
    widget.set("F", Object::Integer(WIDGET_FLAGS));
    widget.set("V", Object::Reference(sig_dict_id));
    widget.set("P", Object::Reference(page_id));
    if let Some(ap_id) = appearance_id {
        let mut ap = PdfDictionary::new();
        ap.set("N", Object::Reference(ap_id));
        widget.set("AP", Object::Dictionary(ap));
    }
    writer.write_object(widget_id, &Object::Dictionary(widget))?;

    let page_object = reader
        .resolve_reference(page_id)
        .ok_or_else(|| ParserError::ObjectNotFound(page_id.number, page_id.generation))?;
    let Object::Dictionary(mut page_dict) = page_object else {
        return Err(WriterError::Structure("page object is not a dictionary".into()).into());
    };

    let mut annots = match page_dict.get("Annots") {
        Some(Object::Array(existing)) => existing.clone(),
        _ => PdfArray::new(),
    };
    annots.push(Object::Reference(widget_id));
    page_dict.set("Annots", Object::Array(annots));

    writer.write_object(page_id, &Object::Dictionary(page_dict))?;

    Ok(SynthesizedField { widget_id, page_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rectangle;

    #[test]
    fn test_invisible_config_produces_no_appearance_stream() {
        let config = AppearanceConfig::invisible(0);
        assert!(build_appearance_stream(&config).is_none());
    }

    #[test]
    fn test_visible_config_produces_form_xobject() {
        let config = AppearanceConfig::visible(0, Rectangle::new(0.0, 0.0, 200.0, 60.0), "Signed by Jane");
        let (dict, content) = build_appearance_stream(&config).unwrap();
        assert_eq!(dict.get("Subtype"), Some(&Object::Name(PdfName::new_unchecked("Form"))));
        assert!(!content.is_empty());
    }

    #[test]
    fn test_text_only_appearance_uses_times_roman_resource() {
        let config = AppearanceConfig::visible(0, Rectangle::new(0.0, 0.0, 200.0, 60.0), "Signed by Jane");
        let (dict, content) = build_text_appearance(&config);
        let resources = dict.get("Resources").and_then(Object::as_dictionary).unwrap();
        let fonts = resources.get("Font").and_then(Object::as_dictionary).unwrap();
        assert!(fonts.get(TEXT_FONT_RESOURCE_NAME).is_some());
        assert!(content.windows(3).any(|w| w == TEXT_FONT_RESOURCE_NAME.as_bytes()));
    }

    #[cfg(feature = "images")]
    #[test]
    fn test_image_and_text_appearance_draws_both() {
        use crate::image::{ColorSpace, Image, ImageFilter};

        let rect = Rectangle::new(0.0, 0.0, 200.0, 60.0);
        let image = Image::new(10, 10, ColorSpace::DeviceRGB, 8, ImageFilter::FlateDecode, vec![0u8; 300]);
        let config = AppearanceConfig {
            page_index: 0,
            rect,
            text: Some("Signed by Jane".to_string()),
            image: Some(vec![]),
        };

        let (dict, content) = build_image_and_text_appearance(&config, &image, "Signed by Jane");
        let resources = dict.get("Resources").and_then(Object::as_dictionary).unwrap();
        assert!(resources.get("XObject").and_then(Object::as_dictionary).unwrap().get("Img").is_some());
        assert!(resources.get("Font").and_then(Object::as_dictionary).unwrap().get(TEXT_FONT_RESOURCE_NAME).is_some());

        let content_str = String::from_utf8_lossy(&content);
        assert!(content_str.contains("/Img Do"));
        assert!(content_str.contains("(Signed by Jane)"));
    }

    #[cfg(feature = "images")]
    #[test]
    fn test_build_appearance_stream_falls_back_to_text_when_image_undecodable() {
        let config = AppearanceConfig {
            page_index: 0,
            rect: Rectangle::new(0.0, 0.0, 200.0, 60.0),
            text: Some("Signed by Jane".to_string()),
            image: Some(vec![]),
        };
        let (dict, content) = build_appearance_stream(&config).unwrap();
        let resources = dict.get("Resources").and_then(Object::as_dictionary).unwrap();
        assert!(resources.get("XObject").is_none());
        assert!(content.windows(3).any(|w| w == TEXT_FONT_RESOURCE_NAME.as_bytes()));
    }
}
