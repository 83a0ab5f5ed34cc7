//! Greedy word wrap against a point width.

use crate::layout::font_metrics::TextMetrics;

/// Splits `text` into lines no wider than `max_width_pt`.
///
/// Explicit newlines always break; blank input lines are kept as empty lines so
/// paragraph spacing survives. A single word wider than the line is hard-split by
/// character so nothing is ever clipped.
pub fn wrap_text(
    text: &str,
    metrics: &dyn TextMetrics,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.trim().lines() {
        wrap_paragraph(paragraph, metrics, size_pt, max_width_pt, &mut lines);
    }
    lines
}

fn wrap_paragraph(
    paragraph: &str,
    metrics: &dyn TextMetrics,
    size_pt: f32,
    max_width_pt: f32,
    out: &mut Vec<String>,
) {
    let words: Vec<&str> = paragraph.split_whitespace().collect();
    if words.is_empty() {
        out.push(String::new());
        return;
    }

    let space_w = metrics.space_width(size_pt);
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in words {
        let word_w = metrics.measure(word, size_pt);

        if word_w > max_width_pt {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            let mut pieces = split_long_word(word, metrics, size_pt, max_width_pt);
            // Last piece stays open so following words can share its line.
            if let Some(last) = pieces.pop() {
                out.extend(pieces);
                current_width = metrics.measure(&last, size_pt);
                current = last;
            }
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width_pt {
            out.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }

    if !current.is_empty() {
        out.push(current);
    }
}

fn split_long_word(
    word: &str,
    metrics: &dyn TextMetrics,
    size_pt: f32,
    max_width_pt: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let w = metrics.char_width(c) as f32 * size_pt / 1000.0;
        if !piece.is_empty() && width + w > max_width_pt {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
