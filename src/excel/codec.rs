//! Color and attribute codec: style tokens → rust_xlsxwriter primitives

use crate::types::{BorderLineStyle, HorizontalAlign, PatternType, VerticalAlign};
use rust_xlsxwriter::{Color, FormatAlign, FormatBorder, FormatPattern};
use tracing::warn;

/// Bare hex color token (`RRGGBB`) as the encoder expects it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the token into an RGB color.
    ///
    /// The token is not validated on the way in, so malformed input surfaces
    /// here: it is logged and the color dropped.
    pub fn to_xlsx(&self) -> Option<Color> {
        let well_formed = self.0.len() == 6 && self.0.bytes().all(|b| b.is_ascii_hexdigit());
        match u32::from_str_radix(&self.0, 16) {
            Ok(rgb) if well_formed => Some(Color::RGB(rgb)),
            _ => {
                warn!(color = %self.0, "Ignoring malformed hex color");
                None
            }
        }
    }
}

/// Strip a leading `#` from a hex color. No other validation happens.
pub fn hex_to_color(hex: &str) -> ColorToken {
    ColorToken(hex.strip_prefix('#').unwrap_or(hex).to_string())
}

/// Resolve a hex color straight to an encoder color
pub fn hex_to_xlsx(hex: &str) -> Option<Color> {
    hex_to_color(hex).to_xlsx()
}

/// Border style of a present edge; `thin` when the edge omits it
pub fn border_style(style: Option<BorderLineStyle>) -> FormatBorder {
    match style.unwrap_or_default() {
        BorderLineStyle::Thin => FormatBorder::Thin,
        BorderLineStyle::Medium => FormatBorder::Medium,
        BorderLineStyle::Thick => FormatBorder::Thick,
        BorderLineStyle::Dotted => FormatBorder::Dotted,
        BorderLineStyle::Dashed => FormatBorder::Dashed,
    }
}

pub fn horizontal_align(align: HorizontalAlign) -> FormatAlign {
    match align {
        HorizontalAlign::Left => FormatAlign::Left,
        HorizontalAlign::Center => FormatAlign::Center,
        HorizontalAlign::Right => FormatAlign::Right,
    }
}

pub fn vertical_align(align: VerticalAlign) -> FormatAlign {
    match align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Middle => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
    }
}

/// Fill pattern; `solid` when a background color comes without one
pub fn pattern(pattern_type: Option<PatternType>) -> FormatPattern {
    match pattern_type.unwrap_or_default() {
        PatternType::Solid => FormatPattern::Solid,
        PatternType::None => FormatPattern::None,
    }
}
