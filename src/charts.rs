//! Impact Visualizer
//!
//! Charts are drawn into an in-memory RGB buffer and encoded as PNG, so the
//! same bytes serve the page and the PDF report. No text is rendered into
//! the bitmap; labels live next to the chart in HTML and PDF, which keeps
//! drawing free of any system font dependency.

use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

use crate::dashboard::CategoryCount;
use crate::models::{ImpactMap, WasteCategory};

pub const PIE_SIZE: (u32, u32) = (480, 480);
pub const PIE_RADIUS: f64 = 180.0;
pub const BAR_SIZE: (u32, u32) = (720, 360);

/// Greenhouse, soil, water, energy
pub const SLICE_COLORS: [RGBColor; 4] = [
    RGBColor(234, 88, 12),
    RGBColor(161, 98, 7),
    RGBColor(14, 165, 233),
    RGBColor(34, 197, 94),
];

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Draw(String),

    #[error("failed to encode chart: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_error<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Draw(err.to_string())
}

pub fn pie_center() -> (f64, f64) {
    (PIE_SIZE.0 as f64 / 2.0, PIE_SIZE.1 as f64 / 2.0 - 20.0)
}

/// `(start, sweep)` in degrees per slice, clockwise from twelve o'clock
pub fn slice_angles(impact: &ImpactMap) -> [(f64, f64); 4] {
    let mut start = -90.0;
    impact.fractions().map(|fraction| {
        let sweep = fraction * 360.0;
        let slice = (start, sweep);
        start += sweep;
        slice
    })
}

pub fn arc_point(center: (f64, f64), radius: f64, degrees: f64) -> (i32, i32) {
    let rad = degrees.to_radians();
    (
        (center.0 + radius * rad.cos()).round() as i32,
        (center.1 + radius * rad.sin()).round() as i32,
    )
}

fn wedge(center: (f64, f64), radius: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = (sweep / 2.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push((center.0.round() as i32, center.1.round() as i32));
    for i in 0..=steps {
        let angle = start + sweep * i as f64 / steps as f64;
        points.push(arc_point(center, radius, angle));
    }
    points
}

/// Four-slice pie of the impact map. An all-zero map draws four equal slices.
pub fn render_pie(impact: &ImpactMap) -> Result<Vec<u8>, ChartError> {
    let (width, height) = PIE_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let center = pie_center();
        for (i, (start, sweep)) in slice_angles(impact).into_iter().enumerate() {
            if sweep <= 0.0 {
                continue;
            }
            root.draw(&Polygon::new(
                wedge(center, PIE_RADIUS, start, sweep),
                SLICE_COLORS[i].filled(),
            ))
            .map_err(draw_error)?;
        }

        // Legend swatches, same order as IMPACT_LABELS
        let swatch = 24;
        let gap = (width as i32 - 4 * swatch) / 5;
        let top = height as i32 - 44;
        for (i, color) in SLICE_COLORS.iter().enumerate() {
            let left = gap + i as i32 * (swatch + gap);
            root.draw(&Rectangle::new(
                [(left, top), (left + swatch, top + swatch)],
                color.filled(),
            ))
            .map_err(draw_error)?;
        }

        root.present().map_err(draw_error)?;
    }

    encode_png(buffer, width, height)
}

pub fn category_color(category: WasteCategory) -> RGBColor {
    match category {
        WasteCategory::Organic => RGBColor(101, 163, 13),
        WasteCategory::Plastic => RGBColor(14, 165, 233),
        WasteCategory::Paper => RGBColor(217, 119, 6),
        WasteCategory::Metal => RGBColor(100, 116, 139),
        WasteCategory::Glass => RGBColor(20, 184, 166),
        WasteCategory::EWaste => RGBColor(124, 58, 237),
        WasteCategory::Textile => RGBColor(219, 39, 119),
        WasteCategory::Hazardous => RGBColor(220, 38, 38),
        WasteCategory::Mixed => RGBColor(113, 113, 122),
    }
}

/// Top-left and bottom-right corners of each bar, in input order
pub fn bar_bounds(counts: &[CategoryCount]) -> Vec<[(i32, i32); 2]> {
    let (width, height) = (BAR_SIZE.0 as i32, BAR_SIZE.1 as i32);
    let margin = 30;
    let baseline = height - margin;
    let plot_height = (height - 2 * margin) as f64;
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    if counts.is_empty() || max == 0 {
        return Vec::new();
    }

    let slot = (width - 2 * margin) / counts.len() as i32;
    let bar_width = (slot * 3 / 5).max(1);
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let left = margin + i as i32 * slot + (slot - bar_width) / 2;
            let bar_height = (c.count as f64 / max as f64 * plot_height).round() as i32;
            [(left, baseline - bar_height), (left + bar_width, baseline)]
        })
        .collect()
}

/// "Analyses by Category" bar chart; an empty list draws only the axes
pub fn render_bar(counts: &[CategoryCount]) -> Result<Vec<u8>, ChartError> {
    let (width, height) = BAR_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        for (bounds, count) in bar_bounds(counts).into_iter().zip(counts) {
            root.draw(&Rectangle::new(bounds, category_color(count.category).filled()))
                .map_err(draw_error)?;
        }

        let margin = 30;
        let baseline = height as i32 - margin;
        root.draw(&PathElement::new(
            vec![(margin, margin), (margin, baseline), (width as i32 - margin, baseline)],
            BLACK.stroke_width(2),
        ))
        .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
    }

    encode_png(buffer, width, height)
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ChartError> {
    let image = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| ChartError::Draw("pixel buffer size mismatch".to_string()))?;

    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image).write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(png: &[u8]) -> RgbImage {
        image::load_from_memory(png).unwrap().to_rgb8()
    }

    fn color_at(image: &RgbImage, (x, y): (i32, i32)) -> [u8; 3] {
        image.get_pixel(x as u32, y as u32).0
    }

    fn rgb(color: &RGBColor) -> [u8; 3] {
        [color.0, color.1, color.2]
    }

    #[test]
    fn test_pie_draws_each_slice() {
        let impact = ImpactMap::new(4.0, 2.0, 1.0, 3.0);
        let png = render_pie(&impact).unwrap();
        assert!(!png.is_empty());

        let image = decode(&png);
        assert_eq!(image.dimensions(), PIE_SIZE);

        for (i, (start, sweep)) in slice_angles(&impact).into_iter().enumerate() {
            let point = arc_point(pie_center(), PIE_RADIUS / 2.0, start + sweep / 2.0);
            assert_eq!(color_at(&image, point), rgb(&SLICE_COLORS[i]), "slice {i}");
        }
    }

    #[test]
    fn test_all_zero_pie_renders_four_equal_slices() {
        let impact = ImpactMap::default();
        let png = render_pie(&impact).unwrap();
        assert!(!png.is_empty());

        let angles = slice_angles(&impact);
        assert!(angles.iter().all(|(_, sweep)| (*sweep - 90.0).abs() < 1e-9));

        let image = decode(&png);
        for (i, (start, sweep)) in angles.into_iter().enumerate() {
            let point = arc_point(pie_center(), PIE_RADIUS / 2.0, start + sweep / 2.0);
            assert_eq!(color_at(&image, point), rgb(&SLICE_COLORS[i]));
        }
    }

    #[test]
    fn test_single_key_fills_the_circle() {
        let impact = ImpactMap::new(0.0, 0.0, 7.5, 0.0);
        let image = decode(&render_pie(&impact).unwrap());
        for degrees in [45.0, 135.0, 225.0, 315.0] {
            let point = arc_point(pie_center(), PIE_RADIUS / 2.0, degrees);
            assert_eq!(color_at(&image, point), rgb(&SLICE_COLORS[2]));
        }
    }

    #[test]
    fn test_bar_chart_scales_to_largest_count() {
        let counts = vec![
            CategoryCount { category: WasteCategory::Plastic, count: 4 },
            CategoryCount { category: WasteCategory::Paper, count: 2 },
        ];
        let bounds = bar_bounds(&counts);
        let tall = bounds[0][1].1 - bounds[0][0].1;
        let short = bounds[1][1].1 - bounds[1][0].1;
        assert_eq!(tall, 2 * short);

        let image = decode(&render_bar(&counts).unwrap());
        let [(x0, y0), (x1, y1)] = bounds[0];
        assert_eq!(
            color_at(&image, ((x0 + x1) / 2, (y0 + y1) / 2)),
            rgb(&category_color(WasteCategory::Plastic))
        );
    }

    #[test]
    fn test_empty_bar_chart_still_renders() {
        let png = render_bar(&[]).unwrap();
        assert_eq!(decode(&png).dimensions(), BAR_SIZE);
    }
}
