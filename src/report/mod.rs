//! Report Composer
//!
//! Turns one analysis record, its source image and impact chart into a
//! single PDF. Text from the model is sanitised before layout and images
//! that fail to decode are replaced by a placeholder, so only a failure to
//! serialise the document itself is an error.

pub mod pdf;
pub mod text;
pub mod tips;

use chrono::{DateTime, Utc};
use image::RgbImage;
use thiserror::Error;

use crate::models::{AnalysisRecord, IMPACT_LABELS};
use pdf::{PdfWriter, Tone};

pub use tips::{tip_for, tip_of_the_day, ECO_TIPS};

pub const REPORT_TITLE: &str = "EcoVision Report";

/// Longer side of an image embedded in the PDF, in pixels
const EMBED_MAX_SIDE: u32 = 360;
const IMAGE_SLOT_WIDTH: i64 = 216;
const IMAGE_GUTTER: i64 = 17;

const HARM_TEXT: &str = "Improper disposal can contaminate soil and water, attract pests, \
    release greenhouse gases and toxins, and harm local ecosystems and health.";
const FOOTER_TEXT: &str = "EcoVision - Automated insight. Human responsibility.";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to encode PDF: {0}")]
    Encode(#[from] lopdf::Error),

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode an image for embedding; `None` (with a warning) when unusable
fn embeddable(label: &str, bytes: &[u8]) -> Option<RgbImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img.thumbnail(EMBED_MAX_SIDE, EMBED_MAX_SIDE).to_rgb8()),
        Err(e) => {
            tracing::warn!("Using placeholder for {}: {}", label, e);
            None
        }
    }
}

/// Download name for a record's report
pub fn report_file_name(record: &AnalysisRecord) -> String {
    format!("EcoVision_{}.pdf", record.timestamp.format("%Y-%m-%dT%H-%M-%S"))
}

pub fn compose_report(
    record: &AnalysisRecord,
    source_image: Option<&[u8]>,
    chart_png: &[u8],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, ReportError> {
    let photo = source_image.and_then(|bytes| embeddable("uploaded image", bytes));
    let chart = embeddable("impact chart", chart_png);

    let mut pdf = PdfWriter::new(REPORT_TITLE);

    // Header
    pdf.text_line(REPORT_TITLE, 20, Tone::Body);
    pdf.text_line(
        &format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        11,
        Tone::Muted,
    );
    pdf.gap(6);

    pdf.image_row(&[photo.as_ref(), chart.as_ref()], IMAGE_SLOT_WIDTH, IMAGE_GUTTER);

    // Analysis Summary
    pdf.text_line("Analysis Summary", 14, Tone::Body);
    pdf.text_line(
        &format!(
            "Category: {} - Confidence: {:.1}%",
            record.category.title(),
            record.confidence_percent()
        ),
        12,
        Tone::Body,
    );
    let notes = if record.notes.trim().is_empty() { "-" } else { record.notes.as_str() };
    pdf.text_line(&format!("Notes: {}", notes), 12, Tone::Body);

    pdf.heading("What This Image Shows:");
    pdf.text_line(
        &format!(
            "This appears to show {} waste. The materials visible require proper sorting \
             and handling to prevent contamination.",
            record.category
        ),
        12,
        Tone::Body,
    );

    pdf.heading("How to Recycle / Dispose It:");
    for (i, step) in record.disposal_steps.iter().enumerate() {
        pdf.text_line(&format!("{}. {}", i + 1, step), 12, Tone::Body);
    }

    pdf.heading("Why Improper Disposal Is Harmful:");
    pdf.text_line(HARM_TEXT, 12, Tone::Body);

    pdf.heading("Eco Tip of the Day:");
    pdf.text_line(tip_of_the_day(generated_at.date_naive()), 12, Tone::Body);

    pdf.heading("Impact Breakdown (%):");
    for (label, share) in IMPACT_LABELS.iter().zip(record.impact.shares()) {
        pdf.text_line(&format!("- {}: {:.1}%", label, share), 12, Tone::Body);
    }

    pdf.footer(FOOTER_TEXT);

    let pages = pdf.page_count();
    let bytes = pdf.finish()?;
    tracing::debug!("Composed report for {} ({} pages, {} bytes)", record.id, pages, bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::render_pie;
    use crate::models::{Classification, ImpactMap, WasteCategory};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
    }

    fn plastic_record(notes: &str) -> AnalysisRecord {
        AnalysisRecord::new(
            Uuid::new_v4(),
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap(),
            Classification {
                category: WasteCategory::Plastic,
                confidence: 0.92,
                notes: notes.to_string(),
                disposal_steps: vec!["rinse".to_string(), "crush".to_string(), "recycle".to_string()],
                impact: ImpactMap::new(4.0, 2.0, 1.0, 3.0),
            },
            None,
        )
    }

    fn photo_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(64, 48, image::Rgb([120, 200, 90]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_report_contains_summary_and_numbered_steps() {
        let record = plastic_record("PET bottle");
        let chart = render_pie(&record.impact).unwrap();
        let generated = Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap();

        let bytes = compose_report(&record, Some(photo_png().as_slice()), &chart, generated).unwrap();

        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, "plastic"));
        assert!(contains(&bytes, "Category: Plastic - Confidence: 92.0%"));
        assert!(contains(&bytes, "1. rinse"));
        assert!(contains(&bytes, "2. crush"));
        assert!(contains(&bytes, "3. recycle"));
        assert!(contains(&bytes, "- Greenhouse Emissions: 40.0%"));
        assert!(contains(&bytes, tip_of_the_day(generated.date_naive())));
        assert!(!contains(&bytes, "Image unavailable"));

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_missing_inputs_degrade_to_placeholders() {
        let record = plastic_record("");
        let bytes = compose_report(&record, None, b"not a png", Utc::now()).unwrap();

        assert!(contains(&bytes, "Image unavailable"));
        assert!(contains(&bytes, "Notes: -"));
    }

    #[test]
    fn test_unsupported_characters_never_abort() {
        let record = plastic_record("Bottle \u{2022} rinse \u{267b}\u{fe0f} \u{4e2d}\u{6587} (cap off)");
        let bytes = compose_report(&record, None, &[], Utc::now()).unwrap();
        assert!(contains(&bytes, "Bottle - rinse"));
    }

    #[test]
    fn test_long_notes_continue_on_next_page() {
        let record = plastic_record(&"very long observation ".repeat(400));
        let bytes = compose_report(&record, Some(photo_png().as_slice()), &[], Utc::now()).unwrap();

        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2);
    }

    #[test]
    fn test_report_file_name_has_no_colons() {
        let record = plastic_record("");
        assert_eq!(report_file_name(&record), "EcoVision_2026-03-01T09-30-00.pdf");
    }
}
