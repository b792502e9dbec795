//! Minimal PDF 1.4 writer for image-only pages.
//!
//! Every page carries exactly one RGB image XObject compressed with
//! FlateDecode. The layout is fixed:
//!
//! ```text
//! 1 0 obj  Catalog
//! 2 0 obj  Pages
//! 3 0 obj  Info
//! 4+3k     Page k
//! 5+3k     Contents k
//! 6+3k     Image k
//! ```

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::export::geometry::{mm_to_pt, PageGeometry, PageSlice};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const INFO_ID: usize = 3;
const FIRST_PAGE_ID: usize = 4;
const OBJECTS_PER_PAGE: usize = 3;

/// Zlib level used for image streams.
const COMPRESSION_LEVEL: u8 = 6;

const PRODUCER: &str = "script-planner";

struct PendingPage {
    image_width: u32,
    image_height: u32,
    compressed: Vec<u8>,
    placement: PageSlice,
}

/// Accumulates image pages and serializes them into one PDF file.
pub(crate) struct PdfBuilder {
    geometry: PageGeometry,
    title: Option<String>,
    pages: Vec<PendingPage>,
}

impl PdfBuilder {
    pub(crate) fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            title: None,
            pages: Vec::new(),
        }
    }

    pub(crate) fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Append one page showing `rgb` rows at the slice's placement.
    ///
    /// `rgb` must hold `image_width * placement.src_height * 3` bytes.
    pub(crate) fn add_image_page(&mut self, rgb: &[u8], image_width: u32, placement: PageSlice) {
        let mut compressed = compress_to_vec_zlib(rgb, COMPRESSION_LEVEL);
        // the compressor reserves half the input up front
        compressed.shrink_to_fit();
        log::trace!(
            "pdf page {}: {}x{} px, {} -> {} bytes",
            placement.page_index,
            image_width,
            placement.src_height,
            rgb.len(),
            compressed.len()
        );
        self.pages.push(PendingPage {
            image_width,
            image_height: placement.src_height,
            compressed,
            placement,
        });
    }

    /// Serialize the document.
    pub(crate) fn finish(self) -> Vec<u8> {
        let object_count = FIRST_PAGE_ID + self.pages.len() * OBJECTS_PER_PAGE;
        let mut out = ObjectWriter::new(object_count);
        out.raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        out.object(
            CATALOG_ID,
            &format!("<< /Type /Catalog /Pages {} 0 R >>", PAGES_ID),
        );

        let kids: Vec<String> = (0..self.pages.len())
            .map(|index| format!("{} 0 R", page_object_id(index)))
            .collect();
        out.object(
            PAGES_ID,
            &format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                self.pages.len()
            ),
        );

        let mut info = format!("<< /Producer {}", pdf_text_string(PRODUCER));
        if let Some(title) = &self.title {
            info.push_str(&format!(" /Title {}", pdf_text_string(title)));
        }
        info.push_str(" >>");
        out.object(INFO_ID, &info);

        let page_width_pt = mm_to_pt(self.geometry.width_mm);
        let page_height_pt = mm_to_pt(self.geometry.height_mm);
        for (index, page) in self.pages.iter().enumerate() {
            let page_id = page_object_id(index);
            let contents_id = page_id + 1;
            let image_id = page_id + 2;

            out.object(
                page_id,
                &format!(
                    "<< /Type /Page /Parent {} 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /XObject << /Im0 {} 0 R >> >> /Contents {} 0 R >>",
                    PAGES_ID,
                    num(page_width_pt),
                    num(page_height_pt),
                    image_id,
                    contents_id
                ),
            );

            let slice = &page.placement;
            let draw_width = mm_to_pt(slice.dest_width_mm);
            let draw_height = mm_to_pt(slice.dest_height_mm);
            let x = mm_to_pt(slice.dest_x_mm);
            // PDF user space grows upward from the bottom edge.
            let y = page_height_pt - mm_to_pt(slice.dest_y_mm) - draw_height;
            let contents = format!(
                "q {} 0 0 {} {} {} cm /Im0 Do Q\n",
                num(draw_width),
                num(draw_height),
                num(x),
                num(y)
            );
            out.stream(contents_id, "", contents.as_bytes());

            out.stream(
                image_id,
                &format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode",
                    page.image_width, page.image_height
                ),
                &page.compressed,
            );
        }

        out.finish(CATALOG_ID, INFO_ID)
    }
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + index * OBJECTS_PER_PAGE
}

/// Fixed two-decimal number, trimmed of trailing zeros.
fn num(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Text string: literal for printable ASCII, UTF-16BE hex with BOM otherwise.
fn pdf_text_string(text: &str) -> String {
    if text.bytes().all(|b| (0x20..0x7F).contains(&b)) {
        let mut out = String::with_capacity(text.len() + 2);
        out.push('(');
        for ch in text.chars() {
            if matches!(ch, '(' | ')' | '\\') {
                out.push('\\');
            }
            out.push(ch);
        }
        out.push(')');
        return out;
    }
    let mut out = String::from("<FEFF");
    for unit in text.encode_utf16() {
        out.push_str(&format!("{:04X}", unit));
    }
    out.push('>');
    out
}

struct ObjectWriter {
    out: Vec<u8>,
    offsets: Vec<usize>,
}

impl ObjectWriter {
    fn new(object_count: usize) -> Self {
        Self {
            out: Vec::new(),
            offsets: vec![0; object_count],
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    fn mark(&mut self, id: usize) {
        if let Some(slot) = self.offsets.get_mut(id) {
            *slot = self.out.len();
        }
    }

    fn object(&mut self, id: usize, body: &str) {
        self.mark(id);
        self.raw(format!("{} 0 obj\n{}\nendobj\n", id, body).as_bytes());
    }

    fn stream(&mut self, id: usize, dict_entries: &str, data: &[u8]) {
        self.mark(id);
        let separator = if dict_entries.is_empty() { "" } else { " " };
        self.raw(
            format!(
                "{} 0 obj\n<< {}{}/Length {} >>\nstream\n",
                id,
                dict_entries,
                separator,
                data.len()
            )
            .as_bytes(),
        );
        self.raw(data);
        self.raw(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root_id: usize, info_id: usize) -> Vec<u8> {
        let xref_offset = self.out.len();
        let size = self.offsets.len();
        let mut table = format!("xref\n0 {}\n0000000000 65535 f \n", size);
        for offset in self.offsets.iter().skip(1) {
            table.push_str(&format!("{:010} 00000 n \n", offset));
        }
        table.push_str(&format!(
            "trailer\n<< /Size {} /Root {} 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
            size, root_id, info_id, xref_offset
        ));
        self.raw(table.as_bytes());
        self.out
    }
}
