//! Which typeface a document is set in, and what it cannot draw.
//!
//! The base-14 fonts only encode WinAnsi. A document that stays inside that
//! repertoire keeps its template family; anything else is set in the embedded
//! Unicode face. Text is never rewritten to fit a font: characters neither face
//! can draw are reported so export can refuse instead of dropping them.

use std::borrow::Cow;

use crate::layout::embedded_font::embedded_face;
use crate::layout::flow::{LaidOutPage, Placed};
use crate::layout::font_metrics::Typeface;
use crate::render::document::RenderedDocument;

/// Printable WinAnsi (Windows-1252): ASCII, Latin-1 and the 0x80..=0x9F extras.
pub fn is_winansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}')
        || matches!(
            c,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘'
                | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ'
        )
}

/// Control characters other than newline become spaces; zero-width marks are dropped.
pub fn clean_text(text: &str) -> Cow<'_, str> {
    if !text.chars().any(needs_cleaning) {
        return Cow::Borrowed(text);
    }
    let cleaned = text
        .chars()
        .filter(|c| !is_zero_width(*c))
        .map(|c| if c != '\n' && c.is_control() { ' ' } else { c })
        .collect();
    Cow::Owned(cleaned)
}

fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

fn needs_cleaning(c: char) -> bool {
    is_zero_width(c) || (c != '\n' && c.is_control())
}

/// The template's own family when every character is WinAnsi, the embedded
/// Unicode face otherwise.
pub fn select_typeface(doc: &RenderedDocument) -> Typeface {
    let text = doc.plain_text();
    let builtin_safe = clean_text(&text)
        .chars()
        .all(|c| c.is_whitespace() || is_winansi(c));
    if builtin_safe {
        Typeface::Builtin(doc.style.font)
    } else {
        Typeface::Unicode
    }
}

/// Characters on `pages` that `typeface` has no glyph for, in order of first
/// appearance.
pub fn unsupported_chars(pages: &[LaidOutPage], typeface: Typeface) -> Vec<char> {
    let mut missing = Vec::new();
    for page in pages {
        for item in &page.items {
            let Placed::Text { text, weight, .. } = item else {
                continue;
            };
            let face = embedded_face(*weight);
            for c in text.chars() {
                let drawable = match typeface {
                    Typeface::Builtin(_) => c.is_whitespace() || is_winansi(c),
                    // An unloadable face is reported by the painter instead.
                    Typeface::Unicode => face.map_or(true, |f| f.covers(c)),
                };
                if !drawable && !missing.contains(&c) {
                    missing.push(c);
                }
            }
        }
    }
    missing
}
