//! embedded-graphics raster backend for `script-planner` print views.
//!
//! [`EgRasterizer`] lays the print view out with [`PrintLayoutEngine`],
//! paints it into an [`RgbBitmap`] and hands the pixels to the export
//! pipeline. Layout is measured with the same [`FontBackend`] that paints,
//! so wrapping and pagination follow the glyphs actually drawn.
//!
//! Two backends ship: [`OutlineFontBackend`] draws a caller-supplied
//! TrueType/OpenType face and is the one to use for Korean scripts.
//! [`MonoFontBackend`] needs no font file but only covers ASCII; other
//! characters draw as the replacement glyph.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X10, FONT_6X13_BOLD, FONT_7X14, FONT_7X14_BOLD, FONT_9X15,
            FONT_9X15_BOLD, FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use script_planner::{DocumentSnapshot, ExportOptions, RasterError, RasterImage, Rasterizer};
use script_planner_render::{
    DrawCommand, LayoutConfig, PrintLayout, PrintLayoutEngine, PrintView, Rgb, TextCommand,
    TextMeasurer, TextStyle,
};
use std::borrow::Cow;
use std::convert::Infallible;

mod outline;

pub use outline::{FontError, OutlineFontBackend};

/// Backend-local font identifier used for metrics and rasterization dispatch.
pub type FontId = u8;

/// Why style-to-font mapping had to fall back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFallbackReason {
    /// Requested size is larger than the largest available face.
    OversizedStyle,
    UnknownFontId,
}

/// Resolved font selection for a text style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontSelection {
    pub font_id: FontId,
    pub fallback_reason: Option<FontFallbackReason>,
}

/// Backend-provided metrics for a specific font id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontMetrics {
    pub char_width: u32,
    pub glyph_height: u32,
}

/// Font abstraction used by the renderer's text paths.
pub trait FontBackend {
    fn resolve_font(&self, style: &TextStyle) -> FontSelection;
    fn metrics(&self, font_id: FontId) -> FontMetrics;
    /// Horizontal advance of `text` set in `font_id`.
    fn text_width(&self, font_id: FontId, text: &str) -> u32;
    /// Whether `ch` has a glyph of its own.
    fn covers(&self, _ch: char) -> bool {
        true
    }
    /// Draw one line with its top-left at `origin`; returns the advance.
    fn draw_text_run<D>(
        &self,
        display: &mut D,
        font_id: FontId,
        text: &str,
        origin: Point,
        color: Rgb888,
    ) -> Result<i32, D::Error>
    where
        D: DrawTarget<Color = Rgb888>;
}

/// Mono-font backend over the embedded-graphics ASCII faces.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoFontBackend;

impl MonoFontBackend {
    const SIZE_SMALL: FontId = 0;
    const SIZE_MEDIUM: FontId = 1;
    const SIZE_LARGE: FontId = 2;
    const SIZE_XL: FontId = 3;

    const VARIANT_REGULAR: FontId = 0;
    const VARIANT_BOLD: FontId = 1;

    /// Tallest glyph cell any face offers.
    const MAX_GLYPH_PX: u32 = 20;

    fn encode_font_id(size_bucket: FontId, variant: FontId) -> FontId {
        (size_bucket << 1) | (variant & 0x01)
    }

    fn decode_font_id(font_id: FontId) -> (FontId, FontId) {
        ((font_id >> 1) & 0x03, font_id & 0x01)
    }

    fn size_bucket_for(style: &TextStyle) -> FontId {
        if style.size_px >= 20 {
            Self::SIZE_XL
        } else if style.size_px >= 16 {
            Self::SIZE_LARGE
        } else if style.size_px >= 13 {
            Self::SIZE_MEDIUM
        } else {
            Self::SIZE_SMALL
        }
    }

    fn font_for(font_id: FontId) -> (&'static MonoFont<'static>, Option<FontFallbackReason>) {
        if font_id > Self::encode_font_id(Self::SIZE_XL, Self::VARIANT_BOLD) {
            return (&FONT_7X14, Some(FontFallbackReason::UnknownFontId));
        }
        match Self::decode_font_id(font_id) {
            (Self::SIZE_SMALL, Self::VARIANT_REGULAR) => (&FONT_6X10, None),
            (Self::SIZE_SMALL, _) => (&FONT_6X13_BOLD, None),
            (Self::SIZE_MEDIUM, Self::VARIANT_REGULAR) => (&FONT_7X14, None),
            (Self::SIZE_MEDIUM, _) => (&FONT_7X14_BOLD, None),
            (Self::SIZE_LARGE, Self::VARIANT_REGULAR) => (&FONT_9X15, None),
            (Self::SIZE_LARGE, _) => (&FONT_9X15_BOLD, None),
            (_, Self::VARIANT_REGULAR) => (&FONT_10X20, None),
            _ => (&FONT_9X18_BOLD, None),
        }
    }
}

impl FontBackend for MonoFontBackend {
    fn resolve_font(&self, style: &TextStyle) -> FontSelection {
        let variant = if style.bold {
            Self::VARIANT_BOLD
        } else {
            Self::VARIANT_REGULAR
        };
        FontSelection {
            font_id: Self::encode_font_id(Self::size_bucket_for(style), variant),
            fallback_reason: (style.size_px > Self::MAX_GLYPH_PX)
                .then_some(FontFallbackReason::OversizedStyle),
        }
    }

    fn metrics(&self, font_id: FontId) -> FontMetrics {
        let (font, _) = Self::font_for(font_id);
        FontMetrics {
            char_width: font.character_size.width + font.character_spacing,
            glyph_height: font.character_size.height,
        }
    }

    fn text_width(&self, font_id: FontId, text: &str) -> u32 {
        normalize_text_for_mono(text).chars().count() as u32 * self.metrics(font_id).char_width
    }

    fn covers(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        normalize_text_for_mono(ch.encode_utf8(&mut buf))
            .chars()
            .all(|ch| ch.is_ascii())
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
        let (font, _) = Self::font_for(font_id);
        let style = MonoTextStyle::new(font, color);
        let normalized = normalize_text_for_mono(text);
        Text::with_baseline(normalized.as_ref(), origin, style, Baseline::Top).draw(display)?;
        let advance = font.character_size.width + font.character_spacing;
        Ok((normalized.chars().count() as i32) * advance as i32)
    }
}

fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|ch| {
        matches!(
            ch,
            '\u{00A0}' // nbsp
                | '\u{00B7}' // middle dot
                | '\u{2013}' // en dash
                | '\u{2014}' // em dash
                | '\u{2018}' // left single quote
                | '\u{2019}' // right single quote
                | '\u{201C}' // left double quote
                | '\u{201D}' // right double quote
                | '\u{2026}' // ellipsis
                | '\u{3000}' // ideographic space
        )
    }) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00A0}' | '\u{3000}' => out.push(' '),
            '\u{00B7}' => out.push('.'),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push('.'),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn to_rgb888(color: Rgb) -> Rgb888 {
    Rgb888::new(color.r, color.g, color.b)
}

/// Packed RGB framebuffer usable as an embedded-graphics draw target.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbBitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl core::fmt::Debug for RgbBitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RgbBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl RgbBitmap {
    /// Allocate a `width x height` surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb888) -> Self {
        let pixels = width as usize * height as usize;
        let data = [background.r(), background.g(), background.b()].repeat(pixels);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.data.get(idx..idx + 3)?;
        Some(Rgb888::new(px[0], px[1], px[2]))
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raster_image(self) -> Result<RasterImage, RasterError> {
        RasterImage::from_rgb(self.width, self.height, self.data)
    }
}

impl OriginDimensions for RgbBitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for RgbBitmap {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = self.width as i32;
        let height = self.height as i32;
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= width || point.y >= height {
                continue;
            }
            let idx = (point.y as usize * self.width as usize + point.x as usize) * 3;
            if let Some(px) = self.data.get_mut(idx..idx + 3) {
                px.copy_from_slice(&[color.r(), color.g(), color.b()]);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if area.size.width == 0 || area.size.height == 0 {
            return Ok(());
        }
        let rgb = [color.r(), color.g(), color.b()];
        let x0 = area.top_left.x as usize;
        let y0 = area.top_left.y as usize;
        let stride = self.width as usize * 3;
        for y in y0..y0 + area.size.height as usize {
            let start = y * stride + x0 * 3;
            let end = start + area.size.width as usize * 3;
            if let Some(row) = self.data.get_mut(start..end) {
                for px in row.chunks_exact_mut(3) {
                    px.copy_from_slice(&rgb);
                }
            }
        }
        Ok(())
    }
}

/// [`TextMeasurer`] backed by a font backend's advances.
pub struct EgTextMeasurer<'a, B> {
    backend: &'a B,
}

impl<'a, B: FontBackend> EgTextMeasurer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B> TextMeasurer for EgTextMeasurer<'_, B>
where
    B: FontBackend + Sync,
{
    fn measure_text_px(&self, text: &str, style: &TextStyle) -> u32 {
        let selection = self.backend.resolve_font(style);
        self.backend.text_width(selection.font_id, text)
    }
}

/// Paints a [`PrintLayout`] onto any RGB draw target.
#[derive(Clone, Debug, Default)]
pub struct EgRenderer<B = MonoFontBackend> {
    backend: B,
}

impl<B: FontBackend> EgRenderer<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn render_layout<D>(&self, layout: &PrintLayout, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        if let Some(background) = layout.background {
            display.clear(to_rgb888(background))?;
        }
        let mut oversized = 0usize;
        for command in &layout.commands {
            match command {
                DrawCommand::Rect(rect) => display.fill_solid(
                    &Rectangle::new(
                        Point::new(rect.x, rect.y),
                        Size::new(rect.width, rect.height),
                    ),
                    to_rgb888(rect.color),
                )?,
                DrawCommand::Rule(rule) => display.fill_solid(
                    &Rectangle::new(
                        Point::new(rule.x, rule.y),
                        Size::new(rule.length, rule.thickness),
                    ),
                    to_rgb888(rule.color),
                )?,
                DrawCommand::Text(text) => {
                    if self.draw_text(display, text)? {
                        oversized += 1;
                    }
                }
            }
        }
        if oversized > 0 {
            log::debug!(
                "{} text run(s) drawn with a smaller face than requested",
                oversized
            );
        }
        Ok(())
    }

    /// Draw one text command; returns whether the face had to fall back.
    fn draw_text<D>(&self, display: &mut D, cmd: &TextCommand) -> Result<bool, D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let selection = self.backend.resolve_font(&cmd.style);
        let metrics = self.backend.metrics(selection.font_id);
        let offset = cmd.style.line_height_px.saturating_sub(metrics.glyph_height) / 2;
        self.backend.draw_text_run(
            display,
            selection.font_id,
            &cmd.text,
            Point::new(cmd.x, cmd.y + offset as i32),
            to_rgb888(cmd.style.color),
        )?;
        Ok(selection.fallback_reason.is_some())
    }
}

/// Export rasterizer painting the print view with embedded-graphics.
#[derive(Clone, Debug, Default)]
pub struct EgRasterizer<B = MonoFontBackend> {
    renderer: EgRenderer<B>,
}

impl EgRasterizer<MonoFontBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EgRasterizer<OutlineFontBackend> {
    /// Rasterizer drawing with the TrueType/OpenType face at `path`.
    pub fn from_font_file(path: impl AsRef<std::path::Path>) -> Result<Self, FontError> {
        Ok(Self::with_backend(OutlineFontBackend::from_file(path)?))
    }
}

impl<B: FontBackend + Sync> EgRasterizer<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            renderer: EgRenderer::with_backend(backend),
        }
    }

    pub fn backend(&self) -> &B {
        self.renderer.backend()
    }

    /// Characters in `layout` the backend has no glyph for.
    pub fn missing_glyphs(&self, layout: &PrintLayout) -> usize {
        layout
            .commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .flat_map(str::chars)
            .filter(|ch| !ch.is_whitespace() && !self.backend().covers(*ch))
            .count()
    }

    /// Lay the print view of `snapshot` out for `options`.
    pub fn layout(&self, snapshot: &DocumentSnapshot, options: &ExportOptions) -> PrintLayout {
        let view = PrintView::from_snapshot(snapshot);
        let config = LayoutConfig::for_surface(options.layout_width_px, options.scale);
        let measurer = EgTextMeasurer::new(self.renderer.backend());
        PrintLayoutEngine::new(config, &measurer).layout(&view)
    }

    /// Paint a layout into a fresh bitmap, refusing surfaces over `max_pixels`.
    pub fn paint(&self, layout: &PrintLayout, max_pixels: u64) -> Result<RgbBitmap, RasterError> {
        let pixels = u64::from(layout.width) * u64::from(layout.height);
        if pixels > max_pixels {
            return Err(RasterError::LimitExceeded {
                kind: "raster_pixels",
                actual: pixels,
                limit: max_pixels,
            });
        }
        let background = to_rgb888(layout.background.unwrap_or(Rgb::new(0xff, 0xff, 0xff)));
        let mut bitmap = RgbBitmap::new(layout.width, layout.height, background);
        if let Err(never) = self.renderer.render_layout(layout, &mut bitmap) {
            match never {}
        }
        Ok(bitmap)
    }
}

impl<B: FontBackend + Sync> Rasterizer for EgRasterizer<B> {
    fn rasterize(
        &mut self,
        snapshot: &DocumentSnapshot,
        options: &ExportOptions,
    ) -> Result<RasterImage, RasterError> {
        let layout = self.layout(snapshot, options);
        log::debug!(
            "rasterizing print view {}x{} ({} commands)",
            layout.width,
            layout.height,
            layout.commands.len()
        );
        let missing = self.missing_glyphs(&layout);
        if missing > 0 {
            log::warn!(
                "{} character(s) have no glyph in the active font and draw as replacements",
                missing
            );
        }
        self.paint(&layout, options.limits.max_raster_pixels)?
            .into_raster_image()
    }
}

/// Encode an RGB image as PNG.
pub fn encode_png(image: &RasterImage) -> Result<Vec<u8>, RasterError> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            image.as_rgb(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| RasterError::new(format!("png encoding failed: {}", err)))?;
    Ok(out)
}
