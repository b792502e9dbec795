//! Outline-font backend over caller-supplied TrueType/OpenType faces.
//!
//! The mono faces only cover ASCII. Korean print views need a face with
//! Hangul coverage, which the caller loads from disk or memory. Sizes map
//! to the CSS em size, so `size_px` is the font size the print view asked
//! for rather than the line height.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ab_glyph::{point, Font, FontVec, GlyphId, PxScale, ScaleFont};
use embedded_graphics::{pixelcolor::Rgb888, prelude::*};
use script_planner_render::TextStyle;

use crate::{FontBackend, FontFallbackReason, FontId, FontMetrics, FontSelection};

/// Anti-aliased glyph pixels at or above this coverage are inked.
const INK_COVERAGE: f32 = 0.5;

const BOLD_BIT: FontId = 0x80;
const MAX_SIZE_PX: u32 = 0x7f;

/// Failure to load an outline face.
#[derive(Debug)]
pub enum FontError {
    Io(std::io::Error),
    /// The bytes are not a TrueType/OpenType face.
    InvalidFont,
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::Io(err) => write!(f, "font read failed: {}", err),
            FontError::InvalidFont => write!(f, "font data is not a TrueType/OpenType face"),
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FontError::Io(err) => Some(err),
            FontError::InvalidFont => None,
        }
    }
}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> Self {
        FontError::Io(err)
    }
}

/// [`FontBackend`] drawing anti-aliased outlines with `ab_glyph`.
///
/// Without a bold face, bold runs are emboldened by inking every pixel
/// twice, one pixel apart.
#[derive(Clone)]
pub struct OutlineFontBackend {
    regular: Arc<FontVec>,
    bold: Option<Arc<FontVec>>,
}

impl fmt::Debug for OutlineFontBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineFontBackend")
            .field("glyphs", &self.regular.glyph_count())
            .field("bold_face", &self.bold.is_some())
            .finish()
    }
}

impl OutlineFontBackend {
    /// Load the regular face from font file bytes.
    pub fn from_vec(data: Vec<u8>) -> Result<Self, FontError> {
        Ok(Self {
            regular: Arc::new(parse_face(data)?),
            bold: None,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FontError> {
        let path = path.as_ref();
        let backend = Self::from_vec(std::fs::read(path)?)?;
        log::debug!(
            "loaded outline face {} ({} glyphs)",
            path.display(),
            backend.regular.glyph_count()
        );
        Ok(backend)
    }

    /// Use a dedicated face for bold runs.
    pub fn with_bold_vec(mut self, data: Vec<u8>) -> Result<Self, FontError> {
        self.bold = Some(Arc::new(parse_face(data)?));
        Ok(self)
    }

    pub fn with_bold_file(self, path: impl AsRef<Path>) -> Result<Self, FontError> {
        self.with_bold_vec(std::fs::read(path)?)
    }

    fn encode_font_id(size_px: u32, bold: bool) -> FontId {
        let size = size_px.clamp(1, MAX_SIZE_PX) as FontId;
        if bold {
            size | BOLD_BIT
        } else {
            size
        }
    }

    fn decode_font_id(font_id: FontId) -> (u32, bool) {
        (u32::from(font_id & !BOLD_BIT).max(1), font_id & BOLD_BIT != 0)
    }

    /// Face for a run and whether bold has to be synthesized.
    fn face(&self, bold: bool) -> (&FontVec, bool) {
        match (&self.bold, bold) {
            (Some(face), true) => (face.as_ref(), false),
            (None, true) => (self.regular.as_ref(), true),
            _ => (self.regular.as_ref(), false),
        }
    }

    fn scale_for(font: &FontVec, size_px: u32) -> PxScale {
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size_px as f32 * font.height_unscaled() / units_per_em)
    }

    fn run_width(font: &FontVec, scale: PxScale, text: &str) -> f32 {
        let scaled = font.as_scaled(scale);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }
}

fn parse_face(data: Vec<u8>) -> Result<FontVec, FontError> {
    FontVec::try_from_vec(data).map_err(|_| FontError::InvalidFont)
}

impl FontBackend for OutlineFontBackend {
    fn resolve_font(&self, style: &TextStyle) -> FontSelection {
        FontSelection {
            font_id: Self::encode_font_id(style.size_px, style.bold),
            fallback_reason: (style.size_px > MAX_SIZE_PX)
                .then_some(FontFallbackReason::OversizedStyle),
        }
    }

    fn metrics(&self, font_id: FontId) -> FontMetrics {
        let (size_px, bold) = Self::decode_font_id(font_id);
        let (font, _) = self.face(bold);
        let scaled = font.as_scaled(Self::scale_for(font, size_px));
        FontMetrics {
            char_width: scaled.h_advance(scaled.glyph_id('가')).ceil() as u32,
            glyph_height: (scaled.ascent() - scaled.descent()).ceil() as u32,
        }
    }

    fn text_width(&self, font_id: FontId, text: &str) -> u32 {
        let (size_px, bold) = Self::decode_font_id(font_id);
        let (font, synthetic_bold) = self.face(bold);
        let width = Self::run_width(font, Self::scale_for(font, size_px), text).ceil() as u32;
        width + u32::from(synthetic_bold && !text.is_empty())
    }

    fn covers(&self, ch: char) -> bool {
        self.regular.glyph_id(ch).0 != 0
    }

    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_id: FontId,
        text: &str,
        origin: Point,
        color: Rgb888,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let (size_px, bold) = Self::decode_font_id(font_id);
        let (font, synthetic_bold) = self.face(bold);
        let scale = Self::scale_for(font, size_px);
        let scaled = font.as_scaled(scale);
        let baseline = origin.y as f32 + scaled.ascent();

        let mut caret = origin.x as f32;
        let mut prev: Option<GlyphId> = None;
        let mut ink = Vec::new();
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let left = bounds.min.x as i32;
            let top = bounds.min.y as i32;
            outlined.draw(|x, y, coverage| {
                if coverage < INK_COVERAGE {
                    return;
                }
                let at = Point::new(left + x as i32, top + y as i32);
                ink.push(Pixel(at, color));
                if synthetic_bold {
                    ink.push(Pixel(at + Point::new(1, 0), color));
                }
            });
        }
        display.draw_iter(ink)?;
        Ok((caret - origin.x as f32).ceil() as i32)
    }
}
