//! PDF report export
//!
//! `DocumentLayout` holds the report text in reading order; `render_pdf`
//! draws it on US-letter pages with `printpdf`: title, field record lines,
//! bordered sample table with a shaded header, result lines and a pie chart
//! whose slices are labeled and keyed by colour swatches.

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::error::{AppError, AppResult};
use crate::services::reporting::{InspectionReport, SAMPLE_HEADERS};
use shared::PieChartData;

const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const ROW_HEIGHT: f32 = 7.0;
const COLUMN_WIDTH: f32 = 45.0;
const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 10.0;
const PIE_RADIUS: f32 = 30.0;
const SWATCH_SIZE: f32 = 3.5;
/// Approximate Helvetica advance per character at 1pt, in mm
const CHAR_WIDTH_PER_PT: f32 = 0.18;
/// Longest body line before wrapping, in characters
const WRAP_WIDTH: usize = 90;

/// Report content in reading order
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub title: String,
    /// `Label: value` lines of the field record
    pub field_lines: Vec<String>,
    /// Header row followed by one row per stalk sample
    pub table: Vec<Vec<String>>,
    pub result_lines: Vec<String>,
    pub chart: PieChartData,
    /// One entry per slice, in slice order
    pub chart_legend: Vec<LegendEntry>,
}

/// Fill colour of each pie slice in slice order: healthy green, affected orange
pub const SLICE_RGB: [(f32, f32, f32); 2] = [(0.35, 0.8, 0.07), (1.0, 0.6, 0.0)];

/// Pie slice annotation such as `Sanos: 95.0%` with its slice colour
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub text: String,
    pub rgb: (f32, f32, f32),
}

impl DocumentLayout {
    pub fn from_report(report: &InspectionReport) -> Self {
        let field_lines = report
            .field_record
            .entries()
            .into_iter()
            .map(|(label, value)| format!("{}: {}", label, value))
            .collect();

        let mut table = vec![SAMPLE_HEADERS.iter().map(|h| h.to_string()).collect()];
        table.extend(report.samples.iter().map(|s| {
            vec![
                s.sequence.to_string(),
                s.total_internodes.to_string(),
                s.damaged_internodes.to_string(),
            ]
        }));

        let classification = &report.results.classification;
        let result_lines = vec![
            format!("Índice de Infestación (I.I): {}", report.index_label()),
            format!("Estado del Cultivo: {}", classification.tier_label),
            format!("Control sugerido: {}", classification.recommendation),
        ];

        let chart = report.results.chart.clone();
        let chart_legend = chart
            .slices
            .iter()
            .zip(SLICE_RGB)
            .map(|(s, rgb)| LegendEntry {
                text: format!("{}: {}", s.label, s.percent_label()),
                rgb,
            })
            .collect();

        Self {
            title: report.title.clone(),
            field_lines,
            table,
            result_lines,
            chart,
            chart_legend,
        }
    }

    /// Field record lines broken to fit the page width
    pub fn wrapped_field_lines(&self) -> Vec<String> {
        self.field_lines
            .iter()
            .flat_map(|line| wrap_text(line, WRAP_WIDTH))
            .collect()
    }
}

/// Split a line on whitespace so that no piece exceeds `width` characters.
/// Words longer than `width` are cut into `width`-sized chunks.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for chunk in chars.chunks(width) {
            let needed = current.chars().count() + chunk.len() + usize::from(!current.is_empty());
            if !current.is_empty() && needed > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(chunk);
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Write position on the current page
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl<'a> PageCursor<'a> {
    /// Start a new page when less than `height` mm remain
    fn reserve(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.reserve(LINE_HEIGHT);
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn table(&mut self, rows: &[Vec<String>]) {
        let black = rgb_color((0.0, 0.0, 0.0));
        let grey = rgb_color((0.5, 0.5, 0.5));

        for (idx, row) in rows.iter().enumerate() {
            self.reserve(ROW_HEIGHT);
            let top = self.y;
            let bottom = top - ROW_HEIGHT;

            for col in 0..row.len() {
                let left = MARGIN + col as f32 * COLUMN_WIDTH;
                let cell = rectangle(left, bottom, COLUMN_WIDTH, ROW_HEIGHT);

                if idx == 0 {
                    self.layer.set_fill_color(grey.clone());
                    self.layer.add_polygon(Polygon {
                        rings: vec![cell.clone()],
                        mode: PaintMode::Fill,
                        winding_order: WindingOrder::NonZero,
                    });
                }

                self.layer.set_outline_color(black.clone());
                self.layer.set_outline_thickness(1.0);
                self.layer.add_line(Line {
                    points: cell,
                    is_closed: true,
                });
            }

            self.layer.set_fill_color(black.clone());
            let font = if idx == 0 { &self.bold } else { &self.regular };
            for (col, value) in row.iter().enumerate() {
                let x = MARGIN + col as f32 * COLUMN_WIDTH + 2.0;
                self.layer.use_text(value.as_str(), BODY_SIZE, Mm(x), Mm(bottom + 2.0), font);
            }

            self.y = bottom;
        }
    }

    /// Pie with each slice labeled at its rim, followed by a swatch legend
    fn pie(&mut self, chart: &PieChartData, legend: &[LegendEntry]) {
        self.reserve(2.0 * PIE_RADIUS + LINE_HEIGHT * (legend.len() as f32 + 3.0));
        self.y -= LINE_HEIGHT;
        let cx = PAGE_WIDTH / 2.0;
        let cy = self.y - PIE_RADIUS;
        let black = rgb_color((0.0, 0.0, 0.0));

        let mut start = 90.0_f32;
        for (slice, entry) in chart.slices.iter().zip(legend) {
            let sweep = (slice.percent as f32) * 3.6;
            if sweep <= 0.0 {
                continue;
            }
            self.layer.set_fill_color(rgb_color(entry.rgb));
            self.layer.add_polygon(Polygon {
                rings: vec![wedge(cx, cy, PIE_RADIUS, start, start + sweep)],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            });

            self.layer.set_fill_color(black.clone());
            let (x, y) = slice_label_anchor(cx, cy, start + sweep / 2.0, &entry.text);
            self.layer
                .use_text(entry.text.as_str(), BODY_SIZE, Mm(x), Mm(y), &self.regular);
            start += sweep;
        }

        self.y = cy - PIE_RADIUS - 2.0 * LINE_HEIGHT;
        for entry in legend {
            self.swatch_line(entry);
        }
    }

    fn swatch_line(&mut self, entry: &LegendEntry) {
        self.reserve(LINE_HEIGHT);
        self.layer.set_fill_color(rgb_color(entry.rgb));
        self.layer.add_polygon(Polygon {
            rings: vec![rectangle(MARGIN, self.y - 0.5, SWATCH_SIZE, SWATCH_SIZE)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
        self.layer.set_fill_color(rgb_color((0.0, 0.0, 0.0)));
        let x = MARGIN + SWATCH_SIZE + 2.0;
        self.layer
            .use_text(entry.text.as_str(), BODY_SIZE, Mm(x), Mm(self.y), &self.regular);
        self.y -= LINE_HEIGHT;
    }
}

fn rgb_color((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Baseline origin of a slice label just outside the rim at `angle_deg`.
/// Labels on the left half end at the rim instead of starting there.
fn slice_label_anchor(cx: f32, cy: f32, angle_deg: f32, text: &str) -> (f32, f32) {
    let angle = angle_deg.to_radians();
    let reach = PIE_RADIUS + 3.0;
    let mut x = cx + reach * angle.cos();
    let y = cy + reach * angle.sin() - BODY_SIZE * 0.15;
    if angle.cos() < 0.0 {
        x -= text.chars().count() as f32 * BODY_SIZE * CHAR_WIDTH_PER_PT;
    }
    (x, y)
}

fn rectangle(left: f32, bottom: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(left), Mm(bottom)), false),
        (Point::new(Mm(left + width), Mm(bottom)), false),
        (Point::new(Mm(left + width), Mm(bottom + height)), false),
        (Point::new(Mm(left), Mm(bottom + height)), false),
    ]
}

/// Pie wedge as a polygon, angles in degrees counter-clockwise from +x
fn wedge(cx: f32, cy: f32, radius: f32, start_deg: f32, end_deg: f32) -> Vec<(Point, bool)> {
    let steps = ((end_deg - start_deg) / 2.0).ceil().max(1.0) as usize;
    let mut points = vec![(Point::new(Mm(cx), Mm(cy)), false)];
    for step in 0..=steps {
        let angle = (start_deg + (end_deg - start_deg) * step as f32 / steps as f32).to_radians();
        points.push((
            Point::new(Mm(cx + radius * angle.cos()), Mm(cy + radius * angle.sin())),
            false,
        ));
    }
    points
}

/// Render the layout to PDF bytes
pub fn render_pdf(layout: &DocumentLayout) -> AppResult<Vec<u8>> {
    let pdf_error = |e: printpdf::Error| AppError::ExportFailed(format!("PDF error: {}", e));

    let (doc, page, layer) =
        PdfDocument::new(layout.title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?;

    let mut cursor = PageCursor {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT - MARGIN,
        regular,
        bold,
    };

    cursor.text(&layout.title, TITLE_SIZE, true);
    cursor.gap();

    for line in layout.wrapped_field_lines() {
        cursor.text(&line, BODY_SIZE, false);
    }
    cursor.gap();

    cursor.table(&layout.table);
    cursor.gap();

    for line in &layout.result_lines {
        for piece in wrap_text(line, WRAP_WIDTH) {
            cursor.text(&piece, BODY_SIZE, true);
        }
    }
    cursor.gap();

    cursor.pie(&layout.chart, &layout.chart_legend);

    drop(cursor);
    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    tracing::debug!(bytes = bytes.len(), "PDF report generated");
    Ok(bytes)
}

/// Lay out and render the inspection report
pub fn export_pdf(report: &InspectionReport) -> AppResult<Vec<u8>> {
    render_pdf(&DocumentLayout::from_report(report))
}
