//! Flows a `RenderedDocument` onto fixed-size pages.
//!
//! Produces absolute positions in points, PDF origin at the bottom-left. The PDF
//! painter draws these boxes verbatim and the page-fill estimate counts them, so
//! both see exactly the same geometry.

use serde::Serialize;

use crate::layout::font_metrics::{metrics_for, FontWeight, PageConfig, TextMetrics, Typeface};
use crate::layout::glyphs::{clean_text, select_typeface};
use crate::layout::wrap::wrap_text;
use crate::render::document::{EntryBlock, HeaderBlock, RenderedDocument, SectionItem};
use crate::render::templates::{HeaderLayout, Rgb, SkillsLayout, TemplateStyle};

/// Baseline-to-baseline distance as a multiple of font size.
const LINE_SPACING: f32 = 1.3;
const SECTION_GAP_PT: f32 = 10.0;
const ENTRY_GAP_PT: f32 = 6.0;
const RULE_THICKNESS_PT: f32 = 0.75;
/// Minimum horizontal gap between an entry title and its dates.
const DATES_GUTTER_PT: f32 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placed {
    Text {
        text: String,
        x_pt: f32,
        baseline_pt: f32,
        size_pt: f32,
        weight: FontWeight,
        color: Rgb,
    },
    Rule {
        x1_pt: f32,
        x2_pt: f32,
        y_pt: f32,
        thickness_pt: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaidOutPage {
    pub items: Vec<Placed>,
    /// Vertical space consumed, from the top margin down.
    pub used_height_pt: f32,
}

impl LaidOutPage {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Placed::Text { text, .. } => Some(text.as_str()),
            Placed::Rule { .. } => None,
        })
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

/// Lays out every line of `doc`. Always returns at least one page; content never
/// gets clipped, it continues on a fresh page instead.
pub fn layout_document(doc: &RenderedDocument, config: &PageConfig) -> Vec<LaidOutPage> {
    let mut flow = Flow::new(config, doc.style, select_typeface(doc));

    flow.header(&doc.header);

    for section in &doc.sections {
        flow.gap(SECTION_GAP_PT);
        flow.heading(&section.heading);
        for item in &section.items {
            match item {
                SectionItem::Paragraph { text } => flow.paragraph(text),
                SectionItem::Entry(entry) => flow.entry(entry),
                SectionItem::Skills { skills } => flow.skills(skills),
            }
        }
    }

    flow.finish()
}

struct Flow<'a> {
    config: &'a PageConfig,
    style: TemplateStyle,
    typeface: Typeface,
    pages: Vec<LaidOutPage>,
    current: LaidOutPage,
    /// Top of the next line box.
    cursor: f32,
}

impl<'a> Flow<'a> {
    fn new(config: &'a PageConfig, style: TemplateStyle, typeface: Typeface) -> Self {
        Self {
            config,
            style,
            typeface,
            pages: Vec::new(),
            current: LaidOutPage::default(),
            cursor: config.top(),
        }
    }

    fn finish(mut self) -> Vec<LaidOutPage> {
        self.seal_page();
        self.pages
    }

    fn seal_page(&mut self) {
        let mut page = std::mem::take(&mut self.current);
        page.used_height_pt = (self.config.top() - self.cursor).max(0.0);
        self.pages.push(page);
    }

    fn at_page_top(&self) -> bool {
        self.current.items.is_empty()
    }

    /// Starts a new page unless `height` still fits above the bottom margin.
    fn reserve(&mut self, height: f32) {
        if !self.at_page_top() && self.cursor - height < self.config.margin_pt {
            self.seal_page();
            self.cursor = self.config.top();
        }
    }

    fn gap(&mut self, pt: f32) {
        if !self.at_page_top() {
            self.cursor -= pt;
        }
    }

    fn metrics(&self, weight: FontWeight) -> &'static dyn TextMetrics {
        metrics_for(self.typeface, weight)
    }

    fn line_height(size_pt: f32) -> f32 {
        size_pt * LINE_SPACING
    }

    fn x_for(&self, width: f32, align: Align) -> f32 {
        let left = self.config.margin_pt;
        match align {
            Align::Left => left,
            Align::Center => left + (self.config.content_width() - width).max(0.0) / 2.0,
            Align::Right => left + (self.config.content_width() - width).max(0.0),
        }
    }

    fn push_text(
        &mut self,
        text: String,
        x_pt: f32,
        baseline_pt: f32,
        size_pt: f32,
        weight: FontWeight,
        color: Rgb,
    ) {
        self.current.items.push(Placed::Text {
            text,
            x_pt,
            baseline_pt,
            size_pt,
            weight,
            color,
        });
    }

    /// Places one already-wrapped line and advances the cursor.
    fn line(&mut self, text: String, size_pt: f32, weight: FontWeight, color: Rgb, align: Align) {
        let height = Self::line_height(size_pt);
        self.reserve(height);
        let width = self.metrics(weight).measure(&text, size_pt);
        let x = self.x_for(width, align);
        let baseline = self.cursor - size_pt;
        if !text.is_empty() {
            self.push_text(text, x, baseline, size_pt, weight, color);
        }
        self.cursor -= height;
    }

    fn block(&mut self, text: &str, size_pt: f32, weight: FontWeight, color: Rgb, align: Align) {
        self.block_within(text, size_pt, weight, color, align, self.config.content_width());
    }

    fn block_within(
        &mut self,
        text: &str,
        size_pt: f32,
        weight: FontWeight,
        color: Rgb,
        align: Align,
        max_width: f32,
    ) {
        let text = clean_text(text);
        let metrics = self.metrics(weight);
        for line in wrap_text(&text, metrics, size_pt, max_width) {
            self.line(line, size_pt, weight, color, align);
        }
    }

    fn rule(&mut self, color: Rgb) {
        let y = self.cursor + RULE_THICKNESS_PT;
        self.current.items.push(Placed::Rule {
            x1_pt: self.config.margin_pt,
            x2_pt: self.config.width_pt - self.config.margin_pt,
            y_pt: y,
            thickness_pt: RULE_THICKNESS_PT,
            color,
        });
        self.cursor -= 4.0;
    }

    // ── header ──────────────────────────────────────────────────────────────

    fn header(&mut self, header: &HeaderBlock) {
        let style = self.style;
        let contact_line = header.contact.join(style.separator);

        match style.header_layout {
            HeaderLayout::Centered => {
                self.block(&header.name, style.name_size_pt, FontWeight::Bold, style.accent, Align::Center);
                self.block(&contact_line, style.body_size_pt, FontWeight::Regular, style.text, Align::Center);
            }
            HeaderLayout::LeftAligned => {
                self.block(&header.name, style.name_size_pt, FontWeight::Bold, style.accent, Align::Left);
                self.block(&contact_line, style.body_size_pt, FontWeight::Regular, style.text, Align::Left);
            }
            HeaderLayout::Split => {
                // Name and stacked contacts share the same top edge.
                let top = self.cursor;
                let half = self.config.content_width() / 2.0;
                self.block_within(&header.name, style.name_size_pt, FontWeight::Bold, style.accent, Align::Left, half);
                let after_name = self.cursor;

                self.cursor = top;
                for contact in &header.contact {
                    self.block_within(contact, style.body_size_pt, FontWeight::Regular, style.text, Align::Right, half);
                }
                self.cursor = self.cursor.min(after_name);
            }
        }

        if style.heading_rule {
            self.rule(style.accent);
        }
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn heading(&mut self, heading: &str) {
        let style = self.style;
        // Keep the heading on the same page as its first body line.
        self.reserve(Self::line_height(style.heading_size_pt) + Self::line_height(style.body_size_pt));
        self.block(heading, style.heading_size_pt, FontWeight::Bold, style.accent, Align::Left);
        if style.heading_rule {
            self.rule(style.accent);
        } else {
            self.cursor -= 2.0;
        }
    }

    fn paragraph(&mut self, text: &str) {
        let style = self.style;
        self.block(text, style.body_size_pt, FontWeight::Regular, style.text, Align::Left);
    }

    fn entry(&mut self, entry: &EntryBlock) {
        let style = self.style;
        let size = style.body_size_pt;
        let bold = self.metrics(FontWeight::Bold);
        let italic = self.metrics(FontWeight::Italic);

        let dates = clean_text(&entry.dates).into_owned();
        let dates_width = italic.measure(&dates, size);
        let title_width = if dates.is_empty() {
            self.config.content_width()
        } else {
            (self.config.content_width() - dates_width - DATES_GUTTER_PT).max(self.config.content_width() / 2.0)
        };

        let primary = clean_text(&entry.primary);
        let mut title_lines = wrap_text(&primary, bold, size, title_width);
        if title_lines.is_empty() {
            // Dates still need a line of their own.
            title_lines.push(String::new());
        }

        self.reserve(Self::line_height(size) * 2.0);
        let mut dates = Some(dates).filter(|d| !d.is_empty());
        for line in title_lines {
            let baseline = self.cursor - size;
            self.line(line, size, FontWeight::Bold, style.text, Align::Left);
            // Dates ride on the first title line, on whichever page it landed.
            if let Some(dates) = dates.take() {
                let x = self.x_for(dates_width, Align::Right);
                self.push_text(dates, x, baseline, size, FontWeight::Italic, style.accent);
            }
        }

        if !entry.secondary.is_empty() {
            self.block(&entry.secondary, size, FontWeight::Italic, style.text, Align::Left);
        }
        if !entry.details.is_empty() {
            self.block(&entry.details.join(style.separator), size, FontWeight::Regular, style.text, Align::Left);
        }
        if !entry.body.is_empty() {
            self.block(&entry.body, size, FontWeight::Regular, style.text, Align::Left);
        }
        self.gap(ENTRY_GAP_PT);
    }

    fn skills(&mut self, skills: &[String]) {
        let style = self.style;
        let size = style.body_size_pt;
        match style.skills_layout {
            SkillsLayout::Inline => {
                self.block(&skills.join(style.separator), size, FontWeight::Regular, style.text, Align::Left);
            }
            SkillsLayout::Tags => {
                let tags: Vec<String> = skills.iter().map(|s| format!("[{s}]")).collect();
                self.block(&tags.join("  "), size, FontWeight::Regular, style.text, Align::Left);
            }
            SkillsLayout::Columns => {
                let metrics = self.metrics(FontWeight::Regular);
                let column_width = self.config.content_width() / 2.0;
                for row in skills.chunks(2) {
                    let cells: Vec<Vec<String>> = row
                        .iter()
                        .map(|s| wrap_text(&clean_text(s), metrics, size, column_width - DATES_GUTTER_PT))
                        .collect();
                    let rows = cells.iter().map(Vec::len).max().unwrap_or(0);
                    for i in 0..rows {
                        self.reserve(Self::line_height(size));
                        let baseline = self.cursor - size;
                        for (col, cell) in cells.iter().enumerate() {
                            if let Some(text) = cell.get(i) {
                                let x = self.config.margin_pt + col as f32 * column_width;
                                self.push_text(text.clone(), x, baseline, size, FontWeight::Regular, style.text);
                            }
                        }
                        self.cursor -= Self::line_height(size);
                    }
                }
            }
        }
    }
}
