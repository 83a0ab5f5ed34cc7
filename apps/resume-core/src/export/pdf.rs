// PDF painter: draws laid-out pages with the base-14 fonts, or with the bundled
// Unicode face embedded when the document needs it.
//
// `PdfDocument` is not Send, so everything here is synchronous and runs inside
// spawn_blocking; only the finished bytes cross back to the async side.

use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point,
};

use crate::export::ExportError;
use crate::layout::embedded_font::embedded_face;
use crate::layout::{FontFamily, FontWeight, LaidOutPage, PageConfig, Placed, Typeface};
use crate::render::templates::Rgb;

const LAYER_NAME: &str = "Resume";

fn mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        rgb.r as f32 / 255.0,
        rgb.g as f32 / 255.0,
        rgb.b as f32 / 255.0,
        None,
    ))
}

struct FontSet {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl FontSet {
    fn load(doc: &PdfDocumentReference, typeface: Typeface) -> Result<Self, ExportError> {
        match typeface {
            Typeface::Builtin(family) => Self::builtin(doc, family),
            Typeface::Unicode => Self::embedded(doc),
        }
    }

    fn builtin(doc: &PdfDocumentReference, family: FontFamily) -> Result<Self, ExportError> {
        let (regular, bold, italic) = match family {
            FontFamily::Helvetica => (
                BuiltinFont::Helvetica,
                BuiltinFont::HelveticaBold,
                BuiltinFont::HelveticaOblique,
            ),
            FontFamily::TimesRoman => (
                BuiltinFont::TimesRoman,
                BuiltinFont::TimesBold,
                BuiltinFont::TimesItalic,
            ),
            FontFamily::Courier => (
                BuiltinFont::Courier,
                BuiltinFont::CourierBold,
                BuiltinFont::CourierOblique,
            ),
        };
        let add = |font| {
            doc.add_builtin_font(font)
                .map_err(|e| ExportError::Pdf(format!("failed to load font: {e}")))
        };
        Ok(Self {
            regular: add(regular)?,
            bold: add(bold)?,
            italic: add(italic)?,
        })
    }

    fn embedded(doc: &PdfDocumentReference) -> Result<Self, ExportError> {
        let add = |weight: FontWeight| -> Result<IndirectFontRef, ExportError> {
            let face = embedded_face(weight)
                .ok_or_else(|| ExportError::Pdf("bundled Unicode font is unreadable".to_string()))?;
            doc.add_external_font(face.bytes())
                .map_err(|e| ExportError::Pdf(format!("failed to embed font: {e}")))
        };
        Ok(Self {
            regular: add(FontWeight::Regular)?,
            bold: add(FontWeight::Bold)?,
            italic: add(FontWeight::Italic)?,
        })
    }

    fn get(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
            FontWeight::Italic => &self.italic,
        }
    }
}

/// Paints `pages` into a PDF and returns its bytes. Blocking.
pub fn paint_pdf(
    pages: &[LaidOutPage],
    config: &PageConfig,
    typeface: Typeface,
    title: &str,
) -> Result<Vec<u8>, ExportError> {
    let (width, height) = (mm(config.width_pt), mm(config.height_pt));
    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let fonts = FontSet::load(&doc, typeface)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_idx).get_layer(layer_idx)
        };
        paint_page(&layer, page, &fonts);
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(format!("failed to serialize PDF: {e}")))
}

fn paint_page(layer: &PdfLayerReference, page: &LaidOutPage, fonts: &FontSet) {
    for item in &page.items {
        match item {
            Placed::Text {
                text,
                x_pt,
                baseline_pt,
                size_pt,
                weight,
                color: rgb,
            } => {
                layer.set_fill_color(color(*rgb));
                layer.use_text(text.as_str(), *size_pt, mm(*x_pt), mm(*baseline_pt), fonts.get(*weight));
            }
            Placed::Rule {
                x1_pt,
                x2_pt,
                y_pt,
                thickness_pt,
                color: rgb,
            } => {
                layer.set_outline_color(color(*rgb));
                layer.set_outline_thickness(*thickness_pt);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1_pt), mm(*y_pt)), false),
                        (Point::new(mm(*x2_pt), mm(*y_pt)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}
