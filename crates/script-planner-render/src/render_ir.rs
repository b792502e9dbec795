use serde::{Deserialize, Serialize};

use script_planner::Tier;

/// 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed palette of the print and editor views.
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const NEUTRAL_50: Rgb = Rgb::new(0xfa, 0xfa, 0xfa);
    pub const NEUTRAL_100: Rgb = Rgb::new(0xf5, 0xf5, 0xf5);
    pub const NEUTRAL_200: Rgb = Rgb::new(0xe5, 0xe5, 0xe5);
    pub const NEUTRAL_300: Rgb = Rgb::new(0xd4, 0xd4, 0xd4);
    pub const NEUTRAL_400: Rgb = Rgb::new(0xa3, 0xa3, 0xa3);
    pub const NEUTRAL_500: Rgb = Rgb::new(0x73, 0x73, 0x73);
    pub const NEUTRAL_600: Rgb = Rgb::new(0x52, 0x52, 0x52);
    pub const NEUTRAL_700: Rgb = Rgb::new(0x40, 0x40, 0x40);
    pub const NEUTRAL_800: Rgb = Rgb::new(0x26, 0x26, 0x26);
    pub const NEUTRAL_900: Rgb = Rgb::new(0x17, 0x17, 0x17);
    pub const RED_500: Rgb = Rgb::new(0xef, 0x44, 0x44);
    pub const GREEN_500: Rgb = Rgb::new(0x22, 0xc5, 0x5e);
}

/// Accent color of a tier. `under` is the neutral fallback passed in.
pub fn tier_color(tier: Tier, under: Rgb) -> Rgb {
    match tier {
        Tier::Over => palette::RED_500,
        Tier::OnTarget => palette::GREEN_500,
        Tier::Under => under,
    }
}

/// Resolved text style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in device pixels.
    pub size_px: u32,
    /// Line box height in device pixels.
    pub line_height_px: u32,
    pub bold: bool,
    pub color: Rgb,
}

/// Text draw command. One command per laid-out line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCommand {
    /// Left x.
    pub x: i32,
    /// Top of the line box.
    pub y: i32,
    pub text: String,
    pub style: TextStyle,
}

/// Horizontal rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCommand {
    pub x: i32,
    pub y: i32,
    pub length: u32,
    pub thickness: u32,
    pub color: Rgb,
}

/// Filled rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectCommand {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub color: Rgb,
}

/// Backend-agnostic draw command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Text(TextCommand),
    Rule(RuleCommand),
    Rect(RectCommand),
}

impl DrawCommand {
    /// Bottom edge of the command's box.
    pub fn bottom(&self) -> i32 {
        match self {
            Self::Text(text) => text.y + text.style.line_height_px as i32,
            Self::Rule(rule) => rule.y + rule.thickness as i32,
            Self::Rect(rect) => rect.y + rect.height as i32,
        }
    }
}

/// One tall print view, laid out at device resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintLayout {
    pub width: u32,
    pub height: u32,
    /// Background color; commands are painted over it in order.
    pub background: Option<Rgb>,
    pub commands: Vec<DrawCommand>,
}

impl PrintLayout {
    /// Text of every text command, in paint order.
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
    }
}
