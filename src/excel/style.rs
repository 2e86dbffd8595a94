//! Style translation: [`CellStyle`] → [`rust_xlsxwriter::Format`]
//!
//! One mapping function per facet. A facet that is absent from the input
//! never contributes anything, so an empty style yields `Format::new()`.

use super::codec;
use crate::types::{AlignmentStyle, BorderStyle, CellStyle, FillStyle, FontStyle};
use rust_xlsxwriter::{Format, FormatUnderline};

/// Translate a semantic cell style into the encoder's per-cell format
pub fn translate(style: &CellStyle) -> Format {
    let mut format = Format::new();

    if let Some(font) = &style.font {
        format = apply_font(format, font);
    }
    if let Some(fill) = &style.fill {
        format = apply_fill(format, fill);
    }
    if let Some(border) = &style.border {
        format = apply_border(format, border);
    }
    if let Some(alignment) = &style.alignment {
        format = apply_alignment(format, alignment);
    }
    if let Some(number_format) = &style.number_format {
        format = format.set_num_format(number_format);
    }

    format
}

fn apply_font(mut format: Format, font: &FontStyle) -> Format {
    if let Some(name) = &font.name {
        format = format.set_font_name(name);
    }
    if let Some(size) = font.size {
        format = format.set_font_size(size);
    }
    if let Some(color) = font.color.as_deref().and_then(codec::hex_to_xlsx) {
        format = format.set_font_color(color);
    }
    if font.bold == Some(true) {
        format = format.set_bold();
    }
    if font.italic == Some(true) {
        format = format.set_italic();
    }
    if font.underline == Some(true) {
        format = format.set_underline(FormatUnderline::Single);
    }
    format
}

/// Fill is only emitted when a background color is present
fn apply_fill(mut format: Format, fill: &FillStyle) -> Format {
    let Some(background) = &fill.background_color else {
        return format;
    };

    format = format.set_pattern(codec::pattern(fill.pattern_type));
    if let Some(color) = codec::hex_to_xlsx(background) {
        format = format.set_background_color(color);
    }
    format
}

fn apply_border(mut format: Format, border: &BorderStyle) -> Format {
    if let Some(edge) = &border.top {
        format = format.set_border_top(codec::border_style(edge.style));
        if let Some(color) = edge.color.as_deref().and_then(codec::hex_to_xlsx) {
            format = format.set_border_top_color(color);
        }
    }
    if let Some(edge) = &border.bottom {
        format = format.set_border_bottom(codec::border_style(edge.style));
        if let Some(color) = edge.color.as_deref().and_then(codec::hex_to_xlsx) {
            format = format.set_border_bottom_color(color);
        }
    }
    if let Some(edge) = &border.left {
        format = format.set_border_left(codec::border_style(edge.style));
        if let Some(color) = edge.color.as_deref().and_then(codec::hex_to_xlsx) {
            format = format.set_border_left_color(color);
        }
    }
    if let Some(edge) = &border.right {
        format = format.set_border_right(codec::border_style(edge.style));
        if let Some(color) = edge.color.as_deref().and_then(codec::hex_to_xlsx) {
            format = format.set_border_right_color(color);
        }
    }
    format
}

fn apply_alignment(mut format: Format, alignment: &AlignmentStyle) -> Format {
    if let Some(horizontal) = alignment.horizontal {
        format = format.set_align(codec::horizontal_align(horizontal));
    }
    if let Some(vertical) = alignment.vertical {
        format = format.set_align(codec::vertical_align(vertical));
    }
    if alignment.wrap_text == Some(true) {
        format = format.set_text_wrap();
    }
    format
}
