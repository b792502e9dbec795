//! Page geometry and vertical slicing of the rasterized print view.

use crate::export::ExportError;

/// Millimetres per PostScript point denominator (`1 in = 25.4 mm = 72 pt`).
const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Output page size and margin, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    /// Uniform margin on all four sides.
    pub margin_mm: f64,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4_portrait(15.0)
    }
}

impl PageGeometry {
    /// A4 portrait (210 x 297 mm) with a uniform margin.
    pub fn a4_portrait(margin_mm: f64) -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            margin_mm,
        }
    }

    /// Printable width inside the margins.
    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - self.margin_mm * 2.0
    }

    /// Printable height inside the margins.
    pub fn content_height_mm(&self) -> f64 {
        self.height_mm - self.margin_mm * 2.0
    }

    fn validate(&self) -> Result<(), ExportError> {
        if !(self.content_width_mm() > 0.0 && self.content_height_mm() > 0.0) {
            return Err(ExportError::InvalidGeometry {
                width_mm: self.width_mm,
                height_mm: self.height_mm,
                margin_mm: self.margin_mm,
            });
        }
        Ok(())
    }
}

/// One page worth of image rows and where they land on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSlice {
    /// 0-based page index.
    pub page_index: usize,
    /// First image row of this slice.
    pub src_y: u32,
    /// Number of image rows in this slice.
    pub src_height: u32,
    /// Left edge on the page, mm from the left.
    pub dest_x_mm: f64,
    /// Top edge on the page, mm from the top.
    pub dest_y_mm: f64,
    pub dest_width_mm: f64,
    pub dest_height_mm: f64,
}

/// Complete slicing of one tall image into pages.
#[derive(Clone, Debug, PartialEq)]
pub struct SlicePlan {
    /// Millimetres per image pixel after fitting the image to the content width.
    pub mm_per_px: f64,
    /// Full image height once scaled to the content width.
    pub scaled_height_mm: f64,
    /// Image rows that fit into one page's content height.
    pub rows_per_page: u32,
    pub pages: Vec<PageSlice>,
}

impl SlicePlan {
    /// Fit an image to the page content width and slice it top to bottom.
    ///
    /// The vertical offset advances by one page height per page until the
    /// image rows are exhausted; the last slice may be shorter.
    pub fn plan(
        image_width: u32,
        image_height: u32,
        geometry: &PageGeometry,
    ) -> Result<Self, ExportError> {
        geometry.validate()?;
        if image_width == 0 || image_height == 0 {
            return Err(ExportError::EmptyRaster {
                width: image_width,
                height: image_height,
            });
        }

        let content_width_mm = geometry.content_width_mm();
        let content_height_mm = geometry.content_height_mm();
        let mm_per_px = content_width_mm / f64::from(image_width);
        let rows_per_page = ((content_height_mm / mm_per_px).floor() as u32).max(1);

        let page_count = image_height.div_ceil(rows_per_page) as usize;
        let mut pages = Vec::with_capacity(page_count);
        let mut offset = 0u32;
        while offset < image_height {
            let rows = rows_per_page.min(image_height - offset);
            pages.push(PageSlice {
                page_index: pages.len(),
                src_y: offset,
                src_height: rows,
                dest_x_mm: geometry.margin_mm,
                dest_y_mm: geometry.margin_mm,
                dest_width_mm: content_width_mm,
                dest_height_mm: f64::from(rows) * mm_per_px,
            });
            offset += rows;
        }

        Ok(Self {
            mm_per_px,
            scaled_height_mm: f64::from(image_height) * mm_per_px,
            rows_per_page,
            pages,
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
