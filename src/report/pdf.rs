//! A4 page writer on top of lopdf
//!
//! Lays content top to bottom with a cursor measured from the top edge and
//! starts a new page when the next block would cross the bottom margin.
//! Content streams are left uncompressed.

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::text::{sanitize, wrap};
use super::ReportError;

/// A4 in points
pub const PAGE_WIDTH: i64 = 595;
pub const PAGE_HEIGHT: i64 = 842;
/// 15 mm
pub const MARGIN: i64 = 43;
pub const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;

const FONT_NAME: &str = "F1";

#[derive(Debug, Clone, Copy)]
pub enum Tone {
    Body,
    Muted,
    Faint,
}

impl Tone {
    fn gray(self) -> Object {
        match self {
            Tone::Body => Object::Real(0.0),
            Tone::Muted => Object::Real(0.4),
            Tone::Faint => Object::Real(0.47),
        }
    }
}

#[derive(Default)]
struct Page {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
}

pub struct PdfWriter {
    doc: Document,
    font_id: ObjectId,
    finished: Vec<Page>,
    current: Page,
    cursor: i64,
    image_count: usize,
}

fn int(value: i64) -> Object {
    Object::Integer(value)
}

impl PdfWriter {
    pub fn new(title: &str) -> Self {
        let mut doc = Document::with_version("1.5");
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(sanitize(title)),
            "Producer" => Object::string_literal("EcoVision"),
        });
        doc.trailer.set("Info", info_id);

        Self {
            doc,
            font_id,
            finished: Vec::new(),
            current: Page::default(),
            cursor: MARGIN,
            image_count: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn new_page(&mut self) {
        self.finished.push(std::mem::take(&mut self.current));
        self.cursor = MARGIN;
    }

    fn ensure_space(&mut self, height: i64) {
        let at_top = self.cursor == MARGIN;
        if !at_top && self.cursor + height > PAGE_HEIGHT - MARGIN {
            self.new_page();
        }
    }

    pub fn gap(&mut self, points: i64) {
        self.cursor += points;
    }

    fn draw_text(&mut self, text: &str, size: i64, tone: Tone, x: i64, baseline: i64) {
        self.current.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![FONT_NAME.into(), int(size)]),
            Operation::new("g", vec![tone.gray()]),
            Operation::new("Td", vec![int(x), int(baseline)]),
            Operation::new("Tj", vec![Object::string_literal(sanitize(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Text at the left margin, wrapped to the content width by glyph widths
    pub fn text_line(&mut self, text: &str, size: i64, tone: Tone) {
        let line_height = size * 7 / 5;
        for line in wrap(&sanitize(text), size, CONTENT_WIDTH) {
            self.ensure_space(line_height);
            let baseline = PAGE_HEIGHT - self.cursor - size;
            self.draw_text(&line, size, tone, MARGIN, baseline);
            self.cursor += line_height;
        }
    }

    pub fn heading(&mut self, text: &str) {
        self.gap(4);
        self.text_line(text, 13, Tone::Body);
    }

    fn add_image(&mut self, image: &RgbImage) -> String {
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => int(image.width() as i64),
                "Height" => int(image.height() as i64),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => int(8),
            },
            image.as_raw().clone(),
        );
        let id = self.doc.add_object(stream);
        self.current.images.push((name.clone(), id));
        name
    }

    /// Images side by side, each fitted into a `slot_width` column. Missing
    /// images get a grey placeholder box.
    pub fn image_row(&mut self, images: &[Option<&RgbImage>], slot_width: i64, gutter: i64) {
        let max_height = slot_width * 6 / 5;
        let placeholder_height = slot_width * 3 / 4;

        let sizes: Vec<(i64, i64)> = images
            .iter()
            .map(|image| match image {
                Some(img) if img.width() > 0 && img.height() > 0 => {
                    let (w, h) = (img.width() as i64, img.height() as i64);
                    let height = slot_width * h / w;
                    if height > max_height {
                        (max_height * w / h, max_height)
                    } else {
                        (slot_width, height.max(1))
                    }
                }
                _ => (slot_width, placeholder_height),
            })
            .collect();

        let row_height = sizes.iter().map(|(_, h)| *h).max().unwrap_or(0);
        self.ensure_space(row_height);

        let top = PAGE_HEIGHT - self.cursor;
        for (i, (image, (w, h))) in images.iter().zip(sizes).enumerate() {
            let x = MARGIN + i as i64 * (slot_width + gutter);
            let y = top - h;
            match image {
                Some(img) if img.width() > 0 && img.height() > 0 => {
                    let name = self.add_image(img);
                    self.current.operations.extend([
                        Operation::new("q", vec![]),
                        Operation::new("cm", vec![int(w), int(0), int(0), int(h), int(x), int(y)]),
                        Operation::new("Do", vec![Object::Name(name.into_bytes())]),
                        Operation::new("Q", vec![]),
                    ]);
                }
                _ => {
                    self.current.operations.extend([
                        Operation::new("q", vec![]),
                        Operation::new("g", vec![Object::Real(0.93)]),
                        Operation::new("re", vec![int(x), int(y), int(w), int(h)]),
                        Operation::new("f", vec![]),
                        Operation::new("Q", vec![]),
                    ]);
                    self.draw_text("Image unavailable", 11, Tone::Muted, x + 12, y + h / 2);
                }
            }
        }

        self.cursor += row_height + 14;
    }

    /// Small line pinned to the bottom margin of the current page
    pub fn footer(&mut self, text: &str) {
        self.draw_text(text, 10, Tone::Faint, MARGIN, MARGIN / 2);
    }

    pub fn finish(mut self) -> Result<Vec<u8>, ReportError> {
        self.finished.push(std::mem::take(&mut self.current));

        let pages_id = self.doc.new_object_id();
        let mut kids = Vec::with_capacity(self.finished.len());

        for page in std::mem::take(&mut self.finished) {
            let content = Content { operations: page.operations };
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));

            let mut xobjects = Dictionary::new();
            for (name, id) in page.images {
                xobjects.set(name, Object::Reference(id));
            }

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "Font" => dictionary! { FONT_NAME => self.font_id },
                    "XObject" => xobjects,
                },
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => int(count),
                "MediaBox" => vec![int(0), int(0), int(PAGE_WIDTH), int(PAGE_HEIGHT)],
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}
