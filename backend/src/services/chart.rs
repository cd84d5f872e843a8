//! Pie chart rendering for on-screen results

use std::f64::consts::PI;
use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::error::{AppError, AppResult};
use shared::PieChartData;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const HEALTHY: Rgb<u8> = Rgb([90, 204, 18]);
const AFFECTED: Rgb<u8> = Rgb([255, 152, 0]);
const EMPTY: Rgb<u8> = Rgb([220, 220, 220]);

/// Rasterize the pie with the first slice starting at 12 o'clock and slices
/// running counter-clockwise. An empty chart is drawn as a grey disc.
pub fn render_pie(chart: &PieChartData, size: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);
    let center = f64::from(size) / 2.0;
    let radius = center * 0.9;
    let colors = [HEALTHY, AFFECTED];

    // Cumulative end angle of each slice, in turns
    let mut bounds = Vec::with_capacity(chart.slices.len());
    let mut acc = 0.0;
    for slice in &chart.slices {
        acc += slice.percent / 100.0;
        bounds.push(acc);
    }

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - center;
        let dy = center - (f64::from(y) + 0.5);
        if dx * dx + dy * dy > radius * radius {
            continue;
        }

        if chart.total() == 0 {
            *pixel = EMPTY;
            continue;
        }

        // Counter-clockwise from 12 o'clock, normalized to [0, 1)
        let turn = ((dy.atan2(dx) - PI / 2.0).rem_euclid(2.0 * PI)) / (2.0 * PI);
        let slice = bounds.iter().position(|end| turn < *end).unwrap_or(bounds.len() - 1);
        *pixel = colors[slice % colors.len()];
    }

    img
}

/// Encode the pie as PNG bytes
pub fn render_pie_png(chart: &PieChartData, size: u32) -> AppResult<Vec<u8>> {
    let img = render_pie(chart, size);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| AppError::ExportFailed(format!("PNG encoding error: {}", e)))?;
    Ok(buf.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{AggregateResult, SampleSet};

    fn chart_for(samples: &[(u32, u32)]) -> PieChartData {
        let mut set = SampleSet::new();
        for (total, damaged) in samples {
            set.append(*total, *damaged);
        }
        PieChartData::from_aggregate(&set.aggregate())
    }

    #[test]
    fn fully_healthy_pie_is_green() {
        let img = render_pie(&chart_for(&[(10, 0)]), 100);
        assert_eq!(*img.get_pixel(50, 20), HEALTHY);
        assert_eq!(*img.get_pixel(50, 80), HEALTHY);
    }

    #[test]
    fn half_affected_pie_splits_left_and_right() {
        // Healthy runs counter-clockwise from 12 o'clock, so it covers the left half
        let img = render_pie(&chart_for(&[(10, 5)]), 100);
        assert_eq!(*img.get_pixel(20, 50), HEALTHY);
        assert_eq!(*img.get_pixel(80, 50), AFFECTED);
    }

    #[test]
    fn empty_chart_is_grey() {
        let img = render_pie(&PieChartData::from_aggregate(&AggregateResult::empty()), 40);
        assert_eq!(*img.get_pixel(20, 20), EMPTY);
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
    }

    #[test]
    fn png_has_signature() {
        let png = render_pie_png(&chart_for(&[(10, 1)]), 64).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
