use crate::render_ir::{
    palette, DrawCommand, PrintLayout, RectCommand, Rgb, RuleCommand, TextCommand, TextStyle,
};
use crate::view::{PrintSection, PrintView};

/// Optional text measurement hook for glyph-accurate line fitting.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text width for the provided style.
    fn measure_text_px(&self, text: &str, style: &TextStyle) -> u32;
}

/// Width estimate without font data: wide (Hangul, CJK, fullwidth)
/// characters take one em, everything else a little over half an em.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeuristicMeasurer;

impl HeuristicMeasurer {
    fn char_px(ch: char, size_px: u32) -> u32 {
        if is_wide(ch) {
            size_px
        } else {
            (size_px * 55 / 100).max(1)
        }
    }
}

impl TextMeasurer for HeuristicMeasurer {
    fn measure_text_px(&self, text: &str, style: &TextStyle) -> u32 {
        text.chars()
            .map(|ch| Self::char_px(ch, style.size_px))
            .sum()
    }
}

/// East Asian wide characters that take a full em.
pub fn is_wide(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1100..=0x115F
            | 0x2E80..=0x303E
            | 0x3041..=0x33FF
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xA960..=0xA97F
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
    )
}

/// Print layout metrics, in device pixels.
///
/// [`LayoutConfig::default`] describes the view at 1x on an 800 px wide
/// surface; [`LayoutConfig::scaled`] multiplies every metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Surface width.
    pub width_px: u32,
    /// Padding on all four sides.
    pub padding_px: u32,
    /// Gap between title and summary.
    pub summary_gap_px: u32,
    /// Gap between summary and header rule.
    pub header_gap_px: u32,
    /// Header rule thickness.
    pub header_rule_px: u32,
    /// Gap below the header rule.
    pub header_margin_px: u32,
    /// Gap between consecutive sections.
    pub section_gap_px: u32,
    /// Gap between the last block of a section and its bottom rule.
    pub section_padding_px: u32,
    /// Section rule thickness.
    pub section_rule_px: u32,
    /// Gap below the heading line.
    pub heading_gap_px: u32,
    /// Gap below the time line.
    pub time_gap_px: u32,
    /// Gap between a field label and its value.
    pub label_gap_px: u32,
    /// Gap between two fields.
    pub field_gap_px: u32,
    /// Gap below the field block.
    pub block_gap_px: u32,
    /// Inner padding of the script box.
    pub box_padding_px: u32,
    /// Horizontal gap between heading and note.
    pub inline_gap_px: u32,
    /// Gap above the footer.
    pub footer_gap_px: u32,
    pub title_size_px: u32,
    pub summary_size_px: u32,
    pub heading_size_px: u32,
    pub body_size_px: u32,
    pub caption_size_px: u32,
    /// Line height for single-line text, percent of font size.
    pub line_height_percent: u32,
    /// Line height for running text, percent of font size.
    pub relaxed_line_height_percent: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_px: 800,
            padding_px: 48,
            summary_gap_px: 8,
            header_gap_px: 24,
            header_rule_px: 2,
            header_margin_px: 40,
            section_gap_px: 32,
            section_padding_px: 24,
            section_rule_px: 1,
            heading_gap_px: 12,
            time_gap_px: 16,
            label_gap_px: 4,
            field_gap_px: 12,
            block_gap_px: 16,
            box_padding_px: 16,
            inline_gap_px: 8,
            footer_gap_px: 40,
            title_size_px: 24,
            summary_size_px: 16,
            heading_size_px: 18,
            body_size_px: 14,
            caption_size_px: 12,
            line_height_percent: 143,
            relaxed_line_height_percent: 163,
        }
    }
}

impl LayoutConfig {
    /// Base config at `width_px` multiplied by `scale`.
    pub fn for_surface(width_px: u32, scale: u32) -> Self {
        Self {
            width_px,
            ..Self::default()
        }
        .scaled(scale)
    }

    /// Multiply every pixel metric by `factor` (at least 1).
    pub fn scaled(self, factor: u32) -> Self {
        let f = factor.max(1);
        Self {
            width_px: self.width_px * f,
            padding_px: self.padding_px * f,
            summary_gap_px: self.summary_gap_px * f,
            header_gap_px: self.header_gap_px * f,
            header_rule_px: self.header_rule_px * f,
            header_margin_px: self.header_margin_px * f,
            section_gap_px: self.section_gap_px * f,
            section_padding_px: self.section_padding_px * f,
            section_rule_px: self.section_rule_px * f,
            heading_gap_px: self.heading_gap_px * f,
            time_gap_px: self.time_gap_px * f,
            label_gap_px: self.label_gap_px * f,
            field_gap_px: self.field_gap_px * f,
            block_gap_px: self.block_gap_px * f,
            box_padding_px: self.box_padding_px * f,
            inline_gap_px: self.inline_gap_px * f,
            footer_gap_px: self.footer_gap_px * f,
            title_size_px: self.title_size_px * f,
            summary_size_px: self.summary_size_px * f,
            heading_size_px: self.heading_size_px * f,
            body_size_px: self.body_size_px * f,
            caption_size_px: self.caption_size_px * f,
            line_height_percent: self.line_height_percent,
            relaxed_line_height_percent: self.relaxed_line_height_percent,
        }
    }

    /// Width available to content inside the padding.
    pub fn content_width_px(&self) -> u32 {
        self.width_px.saturating_sub(self.padding_px * 2)
    }

    fn style(&self, size_px: u32, bold: bool, color: Rgb, relaxed: bool) -> TextStyle {
        let percent = if relaxed {
            self.relaxed_line_height_percent
        } else {
            self.line_height_percent
        };
        TextStyle {
            size_px,
            line_height_px: (size_px * percent).div_ceil(100).max(size_px),
            bold,
            color,
        }
    }
}

/// Break `text` into lines no wider than `max_width_px`.
///
/// Newlines are kept (pre-wrap). Lines break at the last whitespace that
/// fits; a run without whitespace longer than the line breaks between
/// characters. Whitespace at a break is dropped.
pub fn wrap_text(
    measurer: &dyn TextMeasurer,
    text: &str,
    max_width_px: u32,
    style: &TextStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut buf = [0u8; 4];
    for paragraph in text.split('\n') {
        let paragraph = paragraph.strip_suffix('\r').unwrap_or(paragraph);
        let mut line = String::new();
        let mut width = 0u32;
        // Byte offset just after the last whitespace and the width up to it.
        let mut break_at: Option<(usize, u32)> = None;

        for ch in paragraph.chars() {
            let advance = measurer.measure_text_px(ch.encode_utf8(&mut buf), style);
            if width + advance > max_width_px && !line.is_empty() {
                if ch.is_whitespace() {
                    lines.push(line.trim_end().to_string());
                    line.clear();
                    width = 0;
                    break_at = None;
                    continue;
                }
                match break_at {
                    Some((offset, consumed)) if offset < line.len() => {
                        let rest = line.split_off(offset);
                        lines.push(line.trim_end().to_string());
                        line = rest;
                        width -= consumed;
                    }
                    _ => {
                        lines.push(line.trim_end().to_string());
                        line.clear();
                        width = 0;
                    }
                }
                break_at = None;
            }
            line.push(ch);
            width += advance;
            if ch.is_whitespace() {
                break_at = Some((line.len(), width));
            }
        }
        lines.push(line);
    }
    lines
}

/// Lays a [`PrintView`] out as one tall surface.
pub struct PrintLayoutEngine<'a> {
    config: LayoutConfig,
    measurer: &'a dyn TextMeasurer,
}

struct Cursor {
    y: i32,
    commands: Vec<DrawCommand>,
}

impl Cursor {
    fn advance(&mut self, px: u32) {
        self.y += px as i32;
    }
}

impl<'a> PrintLayoutEngine<'a> {
    pub fn new(config: LayoutConfig, measurer: &'a dyn TextMeasurer) -> Self {
        Self { config, measurer }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, view: &PrintView) -> PrintLayout {
        let c = &self.config;
        let x = c.padding_px as i32;
        let width = c.content_width_px();
        let mut cursor = Cursor {
            y: c.padding_px as i32,
            commands: Vec::new(),
        };

        let title = c.style(c.title_size_px, true, palette::NEUTRAL_900, false);
        self.push_text(&mut cursor, &view.title, x, width, title);
        cursor.advance(c.summary_gap_px);
        let summary = c.style(c.summary_size_px, false, palette::NEUTRAL_600, false);
        self.push_text(&mut cursor, &view.summary, x, width, summary);
        cursor.advance(c.header_gap_px);
        push_rule(&mut cursor, x, width, c.header_rule_px);
        cursor.advance(c.header_margin_px);

        for (index, section) in view.sections.iter().enumerate() {
            if index > 0 {
                cursor.advance(c.section_gap_px);
            }
            self.layout_section(&mut cursor, section, x, width);
        }

        cursor.advance(c.footer_gap_px);
        let footer = c.style(c.caption_size_px, false, palette::NEUTRAL_400, false);
        self.push_text(&mut cursor, &view.footer, x, width, footer);
        cursor.advance(c.padding_px);

        let height = u32::try_from(cursor.y).unwrap_or(0);
        log::debug!(
            "print layout: {}x{} px, {} commands",
            c.width_px,
            height,
            cursor.commands.len()
        );
        PrintLayout {
            width: c.width_px,
            height,
            background: Some(palette::WHITE),
            commands: cursor.commands,
        }
    }

    fn layout_section(&self, cursor: &mut Cursor, section: &PrintSection, x: i32, width: u32) {
        let c = &self.config;
        let heading = c.style(c.heading_size_px, true, palette::NEUTRAL_900, false);
        let note = c.style(c.body_size_px, false, palette::NEUTRAL_500, false);
        let lines = wrap_text(self.measurer, &section.heading, width, &heading);
        let last_width = lines
            .last()
            .map_or(0, |line| self.measurer.measure_text_px(line, &heading));
        let heading_top =
            cursor.y + ((lines.len().max(1) - 1) as u32 * heading.line_height_px) as i32;
        self.push_lines(cursor, lines, x, heading);

        if let Some(text) = &section.note {
            let note_width = self.measurer.measure_text_px(text, &note);
            let inline_x = last_width + c.inline_gap_px;
            if inline_x + note_width <= width {
                let offset = heading.line_height_px.saturating_sub(note.line_height_px) / 2;
                cursor.commands.push(DrawCommand::Text(TextCommand {
                    x: x + inline_x as i32,
                    y: heading_top + offset as i32,
                    text: text.clone(),
                    style: note,
                }));
            } else {
                self.push_text(cursor, text, x, width, note);
            }
        }

        cursor.advance(c.heading_gap_px);
        let time = c.style(c.body_size_px, false, palette::NEUTRAL_500, false);
        self.push_text(cursor, &section.time_label, x, width, time);
        cursor.advance(c.time_gap_px);

        if !section.fields.is_empty() {
            let label = c.style(c.body_size_px, true, palette::NEUTRAL_700, false);
            let value = c.style(c.body_size_px, false, palette::NEUTRAL_600, true);
            for (index, field) in section.fields.iter().enumerate() {
                if index > 0 {
                    cursor.advance(c.field_gap_px);
                }
                self.push_text(cursor, &field.label, x, width, label);
                cursor.advance(c.label_gap_px);
                self.push_text(cursor, &field.value, x, width, value);
            }
            cursor.advance(c.block_gap_px);
        }

        if let Some(script) = &section.script {
            let body = c.style(c.body_size_px, false, palette::NEUTRAL_800, true);
            let inner = width.saturating_sub(c.box_padding_px * 2);
            let lines = wrap_text(self.measurer, script, inner, &body);
            let box_height = lines.len() as u32 * body.line_height_px + c.box_padding_px * 2;
            cursor.commands.push(DrawCommand::Rect(RectCommand {
                x,
                y: cursor.y,
                width,
                height: box_height,
                color: palette::NEUTRAL_50,
            }));
            let end = cursor.y + box_height as i32;
            cursor.advance(c.box_padding_px);
            self.push_lines(cursor, lines, x + c.box_padding_px as i32, body);
            cursor.y = end;
        }

        cursor.advance(c.section_padding_px);
        push_rule(cursor, x, width, c.section_rule_px);
    }

    fn push_text(&self, cursor: &mut Cursor, text: &str, x: i32, width: u32, style: TextStyle) {
        let lines = wrap_text(self.measurer, text, width, &style);
        self.push_lines(cursor, lines, x, style);
    }

    fn push_lines(&self, cursor: &mut Cursor, lines: Vec<String>, x: i32, style: TextStyle) {
        for line in lines {
            if !line.is_empty() {
                cursor.commands.push(DrawCommand::Text(TextCommand {
                    x,
                    y: cursor.y,
                    text: line,
                    style,
                }));
            }
            cursor.advance(style.line_height_px);
        }
    }
}

fn push_rule(cursor: &mut Cursor, x: i32, length: u32, thickness: u32) {
    cursor.commands.push(DrawCommand::Rule(RuleCommand {
        x,
        y: cursor.y,
        length,
        thickness,
        color: palette::NEUTRAL_200,
    }));
    cursor.advance(thickness);
}
