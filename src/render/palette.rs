//! Mapping from cell kinds to colours and glyphs
//!
//! Kept free of terminal types so any frontend can reuse it.

use crate::game::{CellKind, FoodKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAppearance {
    pub color: Rgb,
    pub glyph: &'static str,
    pub bold: bool,
}

const SNAKE_DARK: Rgb = Rgb(0x7d, 0xd6, 0x49);
const SNAKE_LIGHT: Rgb = Rgb(0x8a, 0xee, 0x50);
const FOOD: Rgb = Rgb(0xe9, 0x2d, 0x2d);
const EMPTY: Rgb = Rgb(0x44, 0x44, 0x44);

pub fn appearance(cell: CellKind) -> CellAppearance {
    match cell {
        CellKind::Empty => CellAppearance {
            color: EMPTY,
            glyph: ". ",
            bold: false,
        },
        CellKind::Snake { index, hue } => {
            let color = match hue {
                Some(hue) => hsl_to_rgb(hue, 0.9, 0.5),
                // segments alternate shades
                None if (index + 1) % 2 == 0 => SNAKE_DARK,
                None => SNAKE_LIGHT,
            };
            CellAppearance {
                color,
                glyph: if index == 0 { "■ " } else { "□ " },
                bold: index == 0,
            }
        }
        CellKind::Food {
            kind: FoodKind::Normal,
            ..
        } => CellAppearance {
            color: FOOD,
            glyph: "O ",
            bold: true,
        },
        CellKind::Food {
            kind: FoodKind::Bonus,
            hue,
        } => CellAppearance {
            color: hsl_to_rgb(hue, 0.9, 0.5),
            glyph: "◆ ",
            bold: true,
        },
    }
}

/// `hue` in degrees, saturation and lightness in [0, 1]
pub fn hsl_to_rgb(hue: u16, saturation: f32, lightness: f32) -> Rgb {
    let h = (hue % 360) as f32 / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;

    let (r, g, b) = match h as u8 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |value: f32| ((value + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb(channel(r), channel(g), channel(b))
}
