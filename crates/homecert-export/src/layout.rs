// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use homecert_app::{HomeReport, LegendEntry, LineTone};

/// A4 in points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;
pub const PAGE_MARGIN_PT: f32 = 24.0;

const TITLE_SIZE_PT: f32 = 16.0;
const HEADING_SIZE_PT: f32 = 12.0;
const BODY_SIZE_PT: f32 = 9.5;
const LEADING: f32 = 1.4;
const SECTION_GAP_PT: f32 = 6.0;
const BULLET_INDENT_PT: f32 = 12.0;
const LEGEND_GAP_PT: f32 = 10.0;
const LEGEND_PREFIX: &str = "Legend:";

/// Advance widths in 1/1000 em for ASCII 32..=126, from the Adobe core
/// font metrics.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

const FIRST_MEASURED_CHAR: u32 = 32;
/// Anything outside the tables is measured as a full em.
const UNMEASURED_GLYPH_UNITS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width_pt: A4_WIDTH_PT,
            height_pt: A4_HEIGHT_PT,
            margin_pt: PAGE_MARGIN_PT,
        }
    }
}

impl PageGeometry {
    pub fn usable_width(&self) -> f32 {
        self.width_pt - self.margin_pt * 2.0
    }

    pub fn usable_height(&self) -> f32 {
        self.height_pt - self.margin_pt * 2.0
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width_pt.is_finite() && self.height_pt.is_finite() && self.margin_pt.is_finite())
        {
            bail!("page geometry must be finite");
        }
        if self.margin_pt < 0.0 {
            bail!("page margin must be non-negative, got {}", self.margin_pt);
        }
        if self.usable_width() <= 0.0 || self.usable_height() <= 0.0 {
            bail!(
                "page margin {}pt leaves no usable area on a {}x{}pt page",
                self.margin_pt,
                self.width_pt,
                self.height_pt
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Heading,
    Body,
}

impl LineStyle {
    pub const fn size_pt(self) -> f32 {
        match self {
            Self::Title => TITLE_SIZE_PT,
            Self::Heading => HEADING_SIZE_PT,
            Self::Body => BODY_SIZE_PT,
        }
    }

    pub const fn bold(self) -> bool {
        matches!(self, Self::Title | Self::Heading)
    }
}

/// A separately coloured piece of a line, offset from the line's indent.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub rgb: (u8, u8, u8),
    pub offset_pt: f32,
}

/// One positioned-by-flow line of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct LaidOutLine {
    pub text: String,
    pub style: LineStyle,
    pub rgb: (u8, u8, u8),
    pub indent_pt: f32,
    /// Vertical space consumed, including leading and any gap above.
    pub height_pt: f32,
    /// When non-empty, drawn instead of `text`.
    pub runs: Vec<TextRun>,
}

impl LaidOutLine {
    fn new(text: String, style: LineStyle, rgb: (u8, u8, u8), indent_pt: f32, gap_pt: f32) -> Self {
        Self {
            text,
            style,
            rgb,
            indent_pt,
            height_pt: style.size_pt() * LEADING + gap_pt,
            runs: Vec::new(),
        }
    }
}

/// Flows the report into lines wrapped to the usable page width.
pub fn layout_report(report: &HomeReport, geometry: &PageGeometry) -> Result<Vec<LaidOutLine>> {
    geometry.validate()?;
    let width = geometry.usable_width();
    let mut lines = Vec::new();

    for text in wrap_text(&pdf_safe_text(&report.title), width, LineStyle::Title) {
        lines.push(LaidOutLine::new(
            text,
            LineStyle::Title,
            LineTone::Plain.rgb(),
            0.0,
            0.0,
        ));
    }

    for section in report.sections() {
        let heading = pdf_safe_text(&section.heading);
        for (index, text) in wrap_text(&heading, width, LineStyle::Heading)
            .into_iter()
            .enumerate()
        {
            let gap = if index == 0 { SECTION_GAP_PT } else { 0.0 };
            lines.push(LaidOutLine::new(
                text,
                LineStyle::Heading,
                LineTone::Plain.rgb(),
                0.0,
                gap,
            ));
        }

        lines.extend(legend_lines(&section.legend, width - BULLET_INDENT_PT));

        for line in &section.lines {
            let body = format!("- {}", pdf_safe_text(&line.text));
            for text in wrap_text(&body, width - BULLET_INDENT_PT, LineStyle::Body) {
                lines.push(LaidOutLine::new(
                    text,
                    LineStyle::Body,
                    line.tone.rgb(),
                    BULLET_INDENT_PT,
                    0.0,
                ));
            }
        }
    }

    Ok(lines)
}

/// Packs legend entries left to right after a muted prefix, starting a
/// new line when the next entry would overflow.
fn legend_lines(legend: &[LegendEntry], max_width_pt: f32) -> Vec<LaidOutLine> {
    if legend.is_empty() {
        return Vec::new();
    }

    let prefix = (LEGEND_PREFIX.to_owned(), LineTone::Muted.rgb());
    let entries = legend
        .iter()
        .map(|entry| (pdf_safe_text(&entry.label), entry.tone.rgb()));

    let mut lines = Vec::new();
    let mut runs: Vec<TextRun> = Vec::new();
    let mut offset = 0.0;
    for (text, rgb) in std::iter::once(prefix).chain(entries) {
        let width = text_width_pt(&text, LineStyle::Body);
        if !runs.is_empty() && offset + width > max_width_pt {
            lines.push(legend_line(std::mem::take(&mut runs)));
            offset = 0.0;
        }
        runs.push(TextRun {
            text,
            rgb,
            offset_pt: offset,
        });
        offset += width + LEGEND_GAP_PT;
    }
    lines.push(legend_line(runs));
    lines
}

fn legend_line(runs: Vec<TextRun>) -> LaidOutLine {
    let text = runs
        .iter()
        .map(|run| run.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    LaidOutLine {
        runs,
        ..LaidOutLine::new(
            text,
            LineStyle::Body,
            LineTone::Muted.rgb(),
            BULLET_INDENT_PT,
            0.0,
        )
    }
}

fn glyph_units(ch: char, bold: bool) -> u32 {
    let table = if bold {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    u32::from(ch)
        .checked_sub(FIRST_MEASURED_CHAR)
        .and_then(|index| table.get(index as usize))
        .map_or(UNMEASURED_GLYPH_UNITS, |width| u32::from(*width))
}

fn text_units(text: &str, bold: bool) -> u32 {
    text.chars().map(|ch| glyph_units(ch, bold)).sum()
}

fn units_to_pt(units: u32, style: LineStyle) -> f32 {
    units as f32 * style.size_pt() / 1000.0
}

/// Rendered width of `text` in the builtin Helvetica face for `style`.
pub fn text_width_pt(text: &str, style: LineStyle) -> f32 {
    units_to_pt(text_units(text, style.bold()), style)
}

/// Greedy word wrap measured with Helvetica metrics. Words longer than a
/// full line are split.
pub fn wrap_text(text: &str, max_width_pt: f32, style: LineStyle) -> Vec<String> {
    let bold = style.bold();
    let fits = |units: u32| units_to_pt(units, style) <= max_width_pt;
    let space = glyph_units(' ', bold);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_units = 0;
    for word in text.split_whitespace() {
        let mut word = word.to_owned();
        let mut word_units = text_units(&word, bold);
        while !fits(word_units) && word.chars().nth(1).is_some() {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_units = 0;
            }
            let rest = word.split_off(fitting_prefix_len(&word, max_width_pt, style));
            lines.push(word);
            word = rest;
            word_units = text_units(&word, bold);
        }

        if !current.is_empty() && !fits(current_units + space + word_units) {
            lines.push(std::mem::take(&mut current));
            current_units = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_units += space;
        }
        current.push_str(&word);
        current_units += word_units;
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the longest prefix of `word` that fits, never less than
/// one character.
fn fitting_prefix_len(word: &str, max_width_pt: f32, style: LineStyle) -> usize {
    let mut units = 0;
    let mut end = 0;
    for (index, ch) in word.char_indices() {
        units += glyph_units(ch, style.bold());
        if end > 0 && units_to_pt(units, style) > max_width_pt {
            break;
        }
        end = index + ch.len_utf8();
    }
    end
}

/// Splits lines into page-sized bands, preserving order. A single line
/// taller than the page gets a page of its own.
pub fn paginate(lines: Vec<LaidOutLine>, usable_height_pt: f32) -> Vec<Vec<LaidOutLine>> {
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut used = 0.0;

    for line in lines {
        if !page.is_empty() && used + line.height_pt > usable_height_pt {
            pages.push(std::mem::take(&mut page));
            used = 0.0;
        }
        used += line.height_pt;
        page.push(line);
    }
    if !page.is_empty() {
        pages.push(page);
    }
    pages
}

/// Maps text onto the Latin subset the builtin PDF fonts can show.
pub fn pdf_safe_text(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '—' | '–' | '·' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            '™' => ' ',
            ch if ch.is_ascii() && !ch.is_ascii_control() => ch,
            _ => '?',
        })
        .collect::<String>()
        .trim_end()
        .to_owned()
}
