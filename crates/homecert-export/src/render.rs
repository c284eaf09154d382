// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rgb};

use crate::layout::{LaidOutLine, PageGeometry};

const PT_TO_MM: f32 = 25.4 / 72.0;
const PLACEHOLDER_TEXT: &str = "HomeCert report (demo).";
const PLACEHOLDER_X_PT: f32 = 48.0;
const PLACEHOLDER_Y_PT: f32 = 72.0;
const PLACEHOLDER_SIZE_PT: f32 = 16.0;

fn mm(points: f32) -> Mm {
    Mm(points * PT_TO_MM)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Encodes paginated lines as a PDF, one page per band.
pub fn render_pages(
    title: &str,
    pages: &[Vec<LaidOutLine>],
    geometry: &PageGeometry,
) -> Result<Vec<u8>> {
    geometry.validate()?;
    if pages.is_empty() {
        bail!("report has no content to render");
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        mm(geometry.width_pt),
        mm(geometry.height_pt),
        "page 1",
    );
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|error| anyhow!("load Helvetica: {error:?}"))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|error| anyhow!("load Helvetica-Bold: {error:?}"))?,
    };

    for (index, lines) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                mm(geometry.width_pt),
                mm(geometry.height_pt),
                format!("page {}", index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };
        draw_band(&layer, lines, geometry, &fonts);
    }

    doc.save_to_bytes()
        .map_err(|error| anyhow!("encode pdf: {error:?}"))
}

fn draw_band(
    layer: &PdfLayerReference,
    lines: &[LaidOutLine],
    geometry: &PageGeometry,
    fonts: &Fonts,
) {
    // PDF space grows upward from the bottom-left corner
    let mut top = geometry.height_pt - geometry.margin_pt;
    for line in lines {
        top -= line.height_pt;
        let baseline = top + (line.height_pt - line.style.size_pt()) / 2.0;
        let font = if line.style.bold() {
            &fonts.bold
        } else {
            &fonts.regular
        };
        let left = geometry.margin_pt + line.indent_pt;
        if line.runs.is_empty() {
            set_fill(layer, line.rgb);
            layer.use_text(
                line.text.clone(),
                line.style.size_pt(),
                mm(left),
                mm(baseline),
                font,
            );
            continue;
        }
        for run in &line.runs {
            set_fill(layer, run.rgb);
            layer.use_text(
                run.text.clone(),
                line.style.size_pt(),
                mm(left + run.offset_pt),
                mm(baseline),
                font,
            );
        }
    }
}

fn set_fill(layer: &PdfLayerReference, (r, g, b): (u8, u8, u8)) {
    layer.set_fill_color(Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    )));
}

/// Minimal single-page document used when the real report cannot be built.
pub fn placeholder_document(geometry: &PageGeometry) -> Result<Vec<u8>> {
    let geometry = if geometry.validate().is_ok() {
        *geometry
    } else {
        PageGeometry::default()
    };
    let (doc, page, layer) = PdfDocument::new(
        "HomeCert report",
        mm(geometry.width_pt),
        mm(geometry.height_pt),
        "page 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|error| anyhow!("load Helvetica: {error:?}"))?;
    doc.get_page(page).get_layer(layer).use_text(
        PLACEHOLDER_TEXT,
        PLACEHOLDER_SIZE_PT,
        mm(PLACEHOLDER_X_PT),
        mm(geometry.height_pt - PLACEHOLDER_Y_PT),
        &font,
    );
    doc.save_to_bytes()
        .map_err(|error| anyhow!("encode placeholder pdf: {error:?}"))
}
