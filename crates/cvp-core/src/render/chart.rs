use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use rust_decimal::prelude::ToPrimitive;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::ChartStyle;
use crate::error::CvpError;
use crate::report::ChartDescriptor;
use crate::CvpResult;

const MARGIN_LEFT: u32 = 48;
const MARGIN_RIGHT: u32 = 16;
const MARGIN_TOP: u32 = 16;
const MARGIN_BOTTOM: u32 = 24;
const MIN_SIDE: u32 = 120;
const GRID_STEP: f64 = 25.0;
const MAX_GRID_LINES: f64 = 10.0;

const GLYPH_SCALE: u32 = 2;
const MARK_OFFSET: u32 = 6;

/// 3x5 bitmaps for the digits 0-9, one row per byte, high bit on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Draw one vertical bar per label. Values are percentages; the zero
/// baseline moves up when any value is negative. Each bar gets its 1-based
/// position as an index mark below the plot, matching
/// [`ChartDescriptor::legend`].
pub fn render_bar_chart(chart: &ChartDescriptor, style: &ChartStyle) -> CvpResult<RgbImage> {
    if style.width < MIN_SIDE || style.height < MIN_SIDE {
        return Err(CvpError::Chart(format!(
            "chart must be at least {}x{} pixels, got {}x{}",
            MIN_SIDE, MIN_SIDE, style.width, style.height
        )));
    }
    if chart.labels.is_empty() || chart.labels.len() != chart.values.len() {
        return Err(CvpError::Chart(format!(
            "expected one value per label, got {} labels and {} values",
            chart.labels.len(),
            chart.values.len()
        )));
    }

    let values: Vec<f64> = chart
        .values
        .iter()
        .map(|v| v.to_f64().unwrap_or(0.0))
        .collect();
    let scale = Scale::fit(&values, style.height);

    let mut img = RgbImage::from_pixel(style.width, style.height, BACKGROUND);
    let plot_left = MARGIN_LEFT;
    let plot_right = style.width - MARGIN_RIGHT;

    // Gridlines at multiples of the step, including the baseline position.
    let step = scale.grid_step();
    let mut tick = (scale.bottom / step).ceil() * step;
    while tick <= scale.top {
        let y = scale.y_of(tick);
        fill_rect(&mut img, plot_left, y, plot_right, y + 1, GRID);
        tick += step;
    }

    let bar_color = Rgb(style.bar_color);
    let slot = (plot_right - plot_left) as f64 / values.len() as f64;
    let bar_width = (slot * 0.6).max(1.0);
    let baseline = scale.y_of(0.0);

    for (i, value) in values.iter().enumerate() {
        let x0 = plot_left as f64 + i as f64 * slot + (slot - bar_width) / 2.0;
        let x1 = x0 + bar_width;
        let y_value = scale.y_of(*value);
        let (y0, y1) = if *value >= 0.0 {
            (y_value, baseline)
        } else {
            (baseline, y_value)
        };
        fill_rect(&mut img, x0 as u32, y0, x1 as u32, y1, bar_color);

        let centre = (x0 + bar_width / 2.0) as u32;
        draw_number(&mut img, i + 1, centre, style.height - MARGIN_BOTTOM + MARK_OFFSET, AXIS);
    }

    // Axes drawn last so bars never cover them.
    fill_rect(&mut img, plot_left, MARGIN_TOP, plot_left + 2, style.height - MARGIN_BOTTOM, AXIS);
    fill_rect(&mut img, plot_left, baseline, plot_right, baseline + 2, AXIS);

    Ok(img)
}

/// Encode a rendered chart as PNG bytes.
pub fn encode_png(img: &RgbImage) -> CvpResult<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| CvpError::Chart(e.to_string()))?;
    Ok(bytes)
}

/// Vertical mapping from percentage values to pixel rows.
struct Scale {
    top: f64,
    bottom: f64,
    plot_top: f64,
    plot_height: f64,
}

impl Scale {
    fn fit(values: &[f64], height: u32) -> Self {
        let max = values.iter().cloned().fold(0.0_f64, f64::max);
        let min = values.iter().cloned().fold(0.0_f64, f64::min);
        let (mut top, mut bottom) = if max == min { (100.0, 0.0) } else { (max, min) };

        // Headroom so the tallest bar does not touch the frame.
        let span = top - bottom;
        if top > 0.0 {
            top += span * 0.1;
        }
        if bottom < 0.0 {
            bottom -= span * 0.1;
        }

        Scale {
            top,
            bottom,
            plot_top: MARGIN_TOP as f64,
            plot_height: (height - MARGIN_TOP - MARGIN_BOTTOM) as f64,
        }
    }

    fn y_of(&self, value: f64) -> u32 {
        let frac = (self.top - value) / (self.top - self.bottom);
        (self.plot_top + frac.clamp(0.0, 1.0) * self.plot_height).round() as u32
    }

    fn grid_step(&self) -> f64 {
        let mut step = GRID_STEP;
        while (self.top - self.bottom) / step > MAX_GRID_LINES {
            step *= 2.0;
        }
        step
    }
}

/// Fill the half-open rectangle [x0, x1) x [y0, y1), clipped to the image.
fn fill_rect(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(img.width());
    let y1 = y1.min(img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

/// Draw `n` in the digit font, horizontally centred on `centre_x`.
fn draw_number(img: &mut RgbImage, n: usize, centre_x: u32, top: u32, color: Rgb<u8>) {
    let digits: Vec<usize> = n.to_string().bytes().map(|b| (b - b'0') as usize).collect();
    let advance = 4 * GLYPH_SCALE;
    let width = digits.len() as u32 * advance - GLYPH_SCALE;
    let left = centre_x.saturating_sub(width / 2);

    for (k, digit) in digits.iter().enumerate() {
        let glyph_x = left + k as u32 * advance;
        for (row, &bits) in DIGITS[*digit].iter().enumerate() {
            for col in 0..3u32 {
                if (bits >> (2 - col)) & 1 == 1 {
                    let x = glyph_x + col * GLYPH_SCALE;
                    let y = top + row as u32 * GLYPH_SCALE;
                    fill_rect(img, x, y, x + GLYPH_SCALE, y + GLYPH_SCALE, color);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scoped artifact
// ---------------------------------------------------------------------------

/// A chart written to a temporary PNG file for the duration of one export.
///
/// The file is removed when the artifact is dropped, whether the export that
/// owns it succeeded or not.
#[derive(Debug)]
pub struct ChartArtifact {
    file: NamedTempFile,
}

impl ChartArtifact {
    /// Render `chart` and write it to a new temp file in `dir`, or in the
    /// system temp directory when `dir` is `None`.
    pub fn create(
        chart: &ChartDescriptor,
        style: &ChartStyle,
        dir: Option<&Path>,
    ) -> CvpResult<Self> {
        let png = encode_png(&render_bar_chart(chart, style)?)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix("cvp-chart-").suffix(".png");
        let mut file = match dir {
            Some(d) => builder.tempfile_in(d)?,
            None => builder.tempfile()?,
        };
        file.write_all(&png)?;
        file.flush()?;

        debug!(path = %file.path().display(), bytes = png.len(), "chart artifact written");
        Ok(ChartArtifact { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read the chart back for embedding.
    pub fn load(&self) -> CvpResult<DynamicImage> {
        image::open(self.path()).map_err(|e| {
            CvpError::Export(format!(
                "chart artifact {} missing or unreadable: {}",
                self.path().display(),
                e
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;
    use rust_decimal_macros::dec;

    fn descriptor(values: Vec<rust_decimal::Decimal>) -> ChartDescriptor {
        ChartDescriptor {
            title: "Product PV Ratio Comparison".to_string(),
            x_label: "Product Name".to_string(),
            y_label: "PV Ratio per Unit (%)".to_string(),
            labels: (0..values.len()).map(|i| format!("P{}", i + 1)).collect(),
            values,
        }
    }

    fn count_color(img: &RgbImage, color: [u8; 3]) -> usize {
        img.pixels().filter(|p| p.0 == color).count()
    }

    #[test]
    fn test_render_uses_configured_size_and_colour() {
        let style = ChartStyle::default();
        let img = render_bar_chart(&descriptor(vec![dec!(60), dec!(20)]), &style).unwrap();
        assert_eq!(img.dimensions(), (style.width, style.height));
        assert!(count_color(&img, style.bar_color) > 0);
    }

    #[test]
    fn test_taller_value_paints_more_pixels() {
        let style = ChartStyle::default();
        let img = render_bar_chart(&descriptor(vec![dec!(10), dec!(90)]), &style).unwrap();
        let half = style.width / 2;
        let (mut left, mut right) = (0, 0);
        for (x, _, p) in img.enumerate_pixels() {
            if p.0 == style.bar_color {
                if x < half {
                    left += 1;
                } else {
                    right += 1;
                }
            }
        }
        assert!(left > 0);
        assert!(right > left * 5);
    }

    #[test]
    fn test_each_bar_has_an_index_mark_below_the_plot() {
        let style = ChartStyle::default();
        let img = render_bar_chart(&descriptor(vec![dec!(60), dec!(20), dec!(5)]), &style).unwrap();
        let mark_rows = style.height - MARGIN_BOTTOM + MARK_OFFSET..style.height;
        let slot = (style.width - MARGIN_LEFT - MARGIN_RIGHT) / 3;
        for bar in 0..3 {
            let columns = MARGIN_LEFT + bar * slot..MARGIN_LEFT + (bar + 1) * slot;
            let inked = columns
                .flat_map(|x| mark_rows.clone().map(move |y| (x, y)))
                .any(|(x, y)| img.get_pixel(x, y).0 == AXIS.0);
            assert!(inked, "no index mark under bar {}", bar + 1);
        }
    }

    #[test]
    fn test_multi_digit_marks_stay_inside_the_image() {
        let style = ChartStyle::default();
        let values = vec![dec!(10); 12];
        assert!(render_bar_chart(&descriptor(values), &style).is_ok());
    }

    #[test]
    fn test_negative_and_all_zero_values_render() {
        let style = ChartStyle::default();
        assert!(render_bar_chart(&descriptor(vec![dec!(-50), dec!(25)]), &style).is_ok());
        let flat = render_bar_chart(&descriptor(vec![dec!(0), dec!(0)]), &style).unwrap();
        assert_eq!(count_color(&flat, style.bar_color), 0);
    }

    #[test]
    fn test_rejects_tiny_canvas_and_mismatched_series() {
        let tiny = ChartStyle {
            width: 10,
            height: 10,
            ..ChartStyle::default()
        };
        assert!(matches!(
            render_bar_chart(&descriptor(vec![dec!(1)]), &tiny),
            Err(CvpError::Chart(_))
        ));

        let mut bad = descriptor(vec![dec!(1), dec!(2)]);
        bad.values.pop();
        assert!(matches!(
            render_bar_chart(&bad, &ChartStyle::default()),
            Err(CvpError::Chart(_))
        ));
    }

    #[test]
    fn test_png_signature() {
        let img = render_bar_chart(&descriptor(vec![dec!(40)]), &ChartStyle::default()).unwrap();
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_artifact_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ChartArtifact::create(
            &descriptor(vec![dec!(40)]),
            &ChartStyle::default(),
            Some(dir.path()),
        )
        .unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(artifact.load().unwrap().width(), ChartStyle::default().width);
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_removed_when_caller_fails() {
        fn failing_export(dir: &Path) -> CvpResult<()> {
            let artifact =
                ChartArtifact::create(&descriptor(vec![dec!(5)]), &ChartStyle::default(), Some(dir))?;
            Err(CvpError::Export(artifact.path().display().to_string()))
        }

        let dir = tempfile::tempdir().unwrap();
        let err = failing_export(dir.path()).unwrap_err();
        let CvpError::Export(path) = err else {
            panic!("Expected Export error");
        };
        assert!(!Path::new(&path).exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_artifact_is_an_export_error() {
        let artifact = ChartArtifact::create(
            &descriptor(vec![dec!(40)]),
            &ChartStyle::default(),
            None,
        )
        .unwrap();
        std::fs::remove_file(artifact.path()).unwrap();
        assert!(matches!(artifact.load(), Err(CvpError::Export(_))));
    }
}
