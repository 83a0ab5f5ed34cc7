//! Font metrics for the faces the exporter paints with.
//!
//! Base-14 widths are the Adobe AFM advance widths in 1/1000 em for ASCII
//! 0x20..=0x7E. Index = (char as usize) - 32. Oblique/italic faces are measured
//! with the regular table; the difference is under 2% of a line for resume text.
//! Documents the base-14 fonts cannot encode are set in the embedded Unicode
//! face instead, measured from its own `hmtx` table.

use serde::{Deserialize, Serialize};

use crate::layout::embedded_font::embedded_face;

// ────────────────────────────────────────────────────────────────────────────
// Font family / weight
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    /// Sans-serif (modern, creative, minimalist, startup).
    Helvetica,
    /// Serif (classic, executive, academic).
    TimesRoman,
    /// Monospace (tech).
    Courier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    Regular,
    Bold,
    Italic,
}

/// What a document is actually set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Typeface {
    /// The template's base-14 family. WinAnsi text only.
    Builtin(FontFamily),
    /// DejaVu Sans, embedded into the PDF.
    Unicode,
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

pub const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    Letter,
}

impl PageFormat {
    /// Portrait (width, height) in points.
    pub fn size_pt(&self) -> (f32, f32) {
        match self {
            PageFormat::Letter => (8.5 * POINTS_PER_INCH, 11.0 * POINTS_PER_INCH),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Physical page geometry in points, origin at the bottom-left as in PDF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub format: PageFormat,
    pub orientation: Orientation,
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageConfig {
    pub fn new(format: PageFormat, orientation: Orientation, margin_inches: f32) -> Self {
        let (w, h) = format.size_pt();
        let (width_pt, height_pt) = match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        };
        Self {
            format,
            orientation,
            width_pt,
            height_pt,
            margin_pt: margin_inches * POINTS_PER_INCH,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    pub fn content_height(&self) -> f32 {
        self.height_pt - 2.0 * self.margin_pt
    }

    /// Baseline ceiling for the first line on a page.
    pub fn top(&self) -> f32 {
        self.height_pt - self.margin_pt
    }
}

/// Letter, portrait, half-inch margins.
pub fn default_page_config() -> PageConfig {
    PageConfig::new(PageFormat::Letter, Orientation::Portrait, 0.5)
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Width used for characters outside the table.
    pub fallback_width: u16,
}

impl TextMetrics for FontMetricTable {
    fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.fallback_width
        }
    }
}

/// Advance widths of one face. Layout and wrapping only ever see this.
pub trait TextMetrics: Sync {
    /// Width of `c` in 1/1000 em.
    fn char_width(&self, c: char) -> u16;

    /// Rendered width of `s` in points at `size_pt`.
    fn measure(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s.chars().map(|c| self.char_width(c) as u32).sum();
        units as f32 * size_pt / 1000.0
    }

    fn space_width(&self, size_pt: f32) -> f32 {
        self.char_width(' ') as f32 * size_pt / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        // 0-9
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        // :    ;    <    =    >    ?    @
        278, 278, 584, 584, 584, 556, 1015,
        // A-M
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        // N-Z
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        // [    \    ]    ^    _    `
        278, 278, 278, 469, 556, 333,
        // a-m
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        // n-z
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        // {    |    }    ~
        334, 260, 334, 584,
    ],
    fallback_width: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    fallback_width: 611,
};

static TIMES_ROMAN: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        278, 278, 564, 564, 564, 444, 921,
        722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
        722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
        333, 278, 333, 469, 500, 333,
        444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
        500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
        480, 200, 480, 541,
    ],
    fallback_width: 500,
};

static TIMES_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
        500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
        333, 333, 570, 570, 570, 500, 930,
        722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
        722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
        333, 278, 333, 581, 500, 333,
        500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
        556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
        394, 220, 394, 520,
    ],
    fallback_width: 556,
};

static COURIER: FontMetricTable = FontMetricTable {
    widths: [600; 95],
    fallback_width: 600,
};

pub fn get_metrics(font: FontFamily, weight: FontWeight) -> &'static FontMetricTable {
    match (font, weight) {
        (FontFamily::Helvetica, FontWeight::Bold) => &HELVETICA_BOLD,
        (FontFamily::Helvetica, _) => &HELVETICA,
        (FontFamily::TimesRoman, FontWeight::Bold) => &TIMES_BOLD,
        (FontFamily::TimesRoman, _) => &TIMES_ROMAN,
        (FontFamily::Courier, _) => &COURIER,
    }
}

/// Metrics for `weight` in `typeface`. Should the embedded face ever fail to
/// load, layout falls back to Helvetica widths and export reports the failure.
pub fn metrics_for(typeface: Typeface, weight: FontWeight) -> &'static dyn TextMetrics {
    match typeface {
        Typeface::Builtin(family) => get_metrics(family, weight),
        Typeface::Unicode => match embedded_face(weight) {
            Some(face) => face,
            None => get_metrics(FontFamily::Helvetica, weight),
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
