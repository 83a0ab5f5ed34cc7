//! DejaVu Sans, bundled for text the base-14 fonts cannot encode
//! (Cyrillic, Greek, Latin Extended, typographic symbols).
//!
//! The same bytes are measured here and embedded by the PDF painter, so wrapped
//! lines in the export break exactly where layout put them.

use std::sync::OnceLock;

use tracing::error;
use ttf_parser::{Face, GlyphId};

use crate::layout::font_metrics::{FontWeight, TextMetrics};

static SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");
static SANS_OBLIQUE: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Oblique.ttf");

pub struct EmbeddedFace {
    bytes: &'static [u8],
    face: Face<'static>,
    /// Advance of `.notdef`, in 1/1000 em.
    fallback_width: u16,
}

impl EmbeddedFace {
    fn parse(bytes: &'static [u8]) -> Option<Self> {
        let face = match Face::parse(bytes, 0) {
            Ok(face) => face,
            Err(e) => {
                error!("Bundled font failed to parse: {e}");
                return None;
            }
        };
        let mut parsed = Self {
            bytes,
            face,
            fallback_width: 0,
        };
        parsed.fallback_width = parsed.advance(GlyphId(0)).unwrap_or(600);
        Some(parsed)
    }

    /// Raw TrueType data, as handed to the PDF writer.
    pub fn bytes(&self) -> &'static [u8] {
        self.bytes
    }

    /// Whether the face has a glyph for `c`. Whitespace always counts as drawable.
    pub fn covers(&self, c: char) -> bool {
        c.is_whitespace() || self.face.glyph_index(c).is_some()
    }

    fn advance(&self, glyph: GlyphId) -> Option<u16> {
        let units_per_em = u32::from(self.face.units_per_em().max(1));
        self.face
            .glyph_hor_advance(glyph)
            .map(|adv| (u32::from(adv) * 1000 / units_per_em) as u16)
    }
}

impl TextMetrics for EmbeddedFace {
    fn char_width(&self, c: char) -> u16 {
        self.face
            .glyph_index(c)
            .and_then(|glyph| self.advance(glyph))
            .unwrap_or(self.fallback_width)
    }
}

/// The bundled face for `weight`, parsed once per process. `None` only if the
/// bundled bytes are unreadable.
pub fn embedded_face(weight: FontWeight) -> Option<&'static EmbeddedFace> {
    static REGULAR: OnceLock<Option<EmbeddedFace>> = OnceLock::new();
    static BOLD: OnceLock<Option<EmbeddedFace>> = OnceLock::new();
    static OBLIQUE: OnceLock<Option<EmbeddedFace>> = OnceLock::new();

    let (cell, bytes) = match weight {
        FontWeight::Regular => (&REGULAR, SANS),
        FontWeight::Bold => (&BOLD, SANS_BOLD),
        FontWeight::Italic => (&OBLIQUE, SANS_OBLIQUE),
    };
    cell.get_or_init(|| EmbeddedFace::parse(bytes)).as_ref()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHTS: [FontWeight; 3] = [FontWeight::Regular, FontWeight::Bold, FontWeight::Italic];

    #[test]
    fn test_bundled_faces_load() {
        for weight in WEIGHTS {
            assert!(embedded_face(weight).is_some(), "{weight:?}");
        }
    }

    #[test]
    fn test_covers_cyrillic_greek_and_punctuation() {
        for weight in WEIGHTS {
            let face = embedded_face(weight).unwrap();
            for c in "Иван Петров Σωκράτης Łódź \u{2014}\u{201C}\u{2022}".chars() {
                assert!(face.covers(c), "{weight:?} lacks {c:?}");
            }
        }
    }

    #[test]
    fn test_does_not_cover_cjk() {
        let face = embedded_face(FontWeight::Regular).unwrap();
        assert!(!face.covers('\u{674E}'));
    }

    #[test]
    fn test_widths_come_from_the_face() {
        let face = embedded_face(FontWeight::Regular).unwrap();
        assert!(face.char_width('W') > face.char_width('i'));
        assert!(face.measure("Иван", 10.0) > 0.0);

        let bold = embedded_face(FontWeight::Bold).unwrap();
        assert!(bold.measure("Инженер", 10.0) > face.measure("Инженер", 10.0));
    }
}
