use image::{DynamicImage, GenericImageView};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};
use serde::Serialize;
use tracing::{debug, info};

use super::chart::ChartArtifact;
use crate::config::{ExportConfig, PDF_MIME_TYPE};
use crate::error::CvpError;
use crate::report::{Section, StructuredReport, Table, Tone};
use crate::CvpResult;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PT_TO_MM: f32 = 0.3528;
const WRAP_COLUMNS: usize = 90;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 11.0;
const TABLE_SIZE: f32 = 9.0;

/// A finished document ready to be offered for download.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedDocument {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Build a PDF of `report`, embedding its chart as a raster image.
///
/// The chart goes through a temporary image file that is removed before this
/// function returns, on success and on error alike.
pub fn export_pdf(report: &StructuredReport, config: &ExportConfig) -> CvpResult<ExportedDocument> {
    config.validate()?;
    let artifact = match report.chart() {
        Some(chart) => Some(ChartArtifact::create(
            chart,
            &config.chart,
            config.artifact_dir.as_deref(),
        )?),
        None => None,
    };

    let bytes = write_document(report, artifact.as_ref())?;
    drop(artifact);

    info!(file = %config.file_name, bytes = bytes.len(), "exported report document");
    Ok(ExportedDocument {
        file_name: config.file_name.clone(),
        mime_type: PDF_MIME_TYPE.to_string(),
        bytes,
    })
}

/// Lay out every section in order, continuing on new pages as needed.
pub fn write_document(
    report: &StructuredReport,
    artifact: Option<&ChartArtifact>,
) -> CvpResult<Vec<u8>> {
    let chart_image = artifact.map(ChartArtifact::load).transpose()?;
    let blocks = layout(report, chart_image.is_some());

    let mut writer = PageWriter::new(&report.title)?;
    for block in &blocks {
        match block {
            Block::Text { text, size, font } => writer.text(text, *size, *font),
            Block::Gap(mm) => writer.gap(*mm),
            Block::Color(rgb) => writer.set_color(*rgb),
            Block::Chart => {
                if let Some(image) = &chart_image {
                    writer.image(image);
                }
            }
        }
    }

    debug!(pages = writer.pages, blocks = blocks.len(), "document laid out");
    writer.finish()
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One step of the page flow, before any page geometry is applied.
#[derive(Debug, Clone, PartialEq)]
enum Block {
    Text { text: String, size: f32, font: Font },
    Gap(f32),
    Color((f32, f32, f32)),
    /// The chart image, scaled to the content width
    Chart,
}

impl Block {
    fn text(text: impl Into<String>, size: f32, font: Font) -> Self {
        Block::Text {
            text: text.into(),
            size,
            font,
        }
    }
}

fn layout(report: &StructuredReport, with_image: bool) -> Vec<Block> {
    let mut blocks = vec![Block::text(&report.title, TITLE_SIZE, Font::Bold), Block::Gap(4.0)];
    for section in &report.sections {
        layout_section(&mut blocks, section, &report.currency_label, with_image);
    }
    blocks
}

fn layout_section(blocks: &mut Vec<Block>, section: &Section, currency_label: &str, with_image: bool) {
    blocks.push(Block::text(&section.heading, HEADING_SIZE, Font::Bold));
    blocks.push(Block::Gap(1.0));

    for field in &section.fields {
        let line = format!("{}: {}", field.label, field.value.display(currency_label));
        push_wrapped(blocks, &line, BODY_SIZE, Font::Regular);
    }

    if let Some(chart) = &section.chart {
        blocks.push(Block::Gap(2.0));
        blocks.push(Block::text(&chart.title, BODY_SIZE, Font::Bold));
        if with_image {
            blocks.push(Block::Chart);
        }
        blocks.push(Block::text(
            format!("x: {}    y: {}", chart.x_label, chart.y_label),
            TABLE_SIZE,
            Font::Regular,
        ));
        // Bar numbers in the image refer to these lines.
        for line in chart.legend() {
            blocks.push(Block::text(line, TABLE_SIZE, Font::Mono));
        }
    }

    if let Some(table) = &section.table {
        blocks.push(Block::Gap(2.0));
        layout_table(blocks, table);
    }

    for note in &section.notes {
        blocks.push(Block::Color(tone_color(note.tone)));
        push_wrapped(blocks, &note.text, BODY_SIZE, Font::Regular);
        blocks.push(Block::Color((0.0, 0.0, 0.0)));
    }
    blocks.push(Block::Gap(6.0));
}

fn push_wrapped(blocks: &mut Vec<Block>, text: &str, size: f32, font: Font) {
    blocks.extend(wrap(text, WRAP_COLUMNS).into_iter().map(|line| Block::text(line, size, font)));
}

fn layout_table(blocks: &mut Vec<Block>, table: &Table) {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<w$}", c, w = *w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    blocks.push(Block::text(format_row(table.headers.as_slice()), TABLE_SIZE, Font::MonoBold));
    for row in &table.rows {
        blocks.push(Block::text(format_row(row.as_slice()), TABLE_SIZE, Font::Mono));
    }
}

fn tone_color(tone: Tone) -> (f32, f32, f32) {
    match tone {
        Tone::Info => (0.1, 0.2, 0.5),
        Tone::Success => (0.0, 0.45, 0.1),
        Tone::Warning => (0.7, 0.4, 0.0),
        Tone::Error => (0.75, 0.1, 0.1),
    }
}

/// Greedy word wrap on a fixed column count.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

// ---------------------------------------------------------------------------
// Page cursor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
    Mono,
    MonoBold,
}

struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    mono: IndirectFontRef,
    mono_bold: IndirectFontRef,
    /// Baseline of the next line, in mm from the bottom edge
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> CvpResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = |f: BuiltinFont| {
            doc.add_builtin_font(f)
                .map_err(|e| CvpError::Export(format!("font unavailable: {:?}", e)))
        };
        let regular = font(BuiltinFont::Helvetica)?;
        let bold = font(BuiltinFont::HelveticaBold)?;
        let mono = font(BuiltinFont::Courier)?;
        let mono_bold = font(BuiltinFont::CourierBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PageWriter {
            doc,
            layer,
            regular,
            bold,
            mono,
            mono_bold,
            y: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn font(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
            Font::Mono => &self.mono,
            Font::MonoBold => &self.mono_bold,
        }
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
            self.pages += 1;
        }
    }

    fn text(&mut self, text: &str, size: f32, font: Font) {
        let line_height = size * PT_TO_MM * 1.4;
        self.ensure_space(line_height);
        self.y -= line_height;
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y), self.font(font));
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
    }

    fn set_color(&self, (r, g, b): (f32, f32, f32)) {
        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
    }

    /// Place an image scaled to the content width.
    fn image(&mut self, image: &DynamicImage) {
        let width_px = image.width().max(1) as f32;
        let height_px = image.height().max(1) as f32;
        let dpi = width_px * 25.4 / CONTENT_WIDTH;
        let height_mm = height_px * 25.4 / dpi;

        self.ensure_space(height_mm + 2.0);
        self.y -= height_mm + 2.0;
        Image::from_dynamic_image(image).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(self.y)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }

    fn finish(self) -> CvpResult<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| CvpError::Export(format!("PDF writer failed: {:?}", e)))
    }
}
