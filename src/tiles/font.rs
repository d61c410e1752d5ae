//! 字体导入
//!
//! 字体图为 128 个连续的 8x8 字形，按光栅顺序每 64 个像素组成一个字形。
//! 字形编号到瓦片编号的映射：
//! - 0..63   -> 0x20..0x5F (可打印 ASCII)
//! - 64..95  -> 0x00..0x1F (控制码副本)
//! - 96..127 -> 0x60..0x7F

use crate::error::{Result, RomError};
use crate::image::RgbSource;
use crate::tiles::{TILE_PIXELS, Tile, TileSheet};

/// 字体图包含的字形数
pub const FONT_GLYPHS: usize = 128;

/// 字形编号对应的瓦片编号
pub fn glyph_slot(glyph: usize) -> Option<u8> {
    match glyph {
        0..=63 => Some((glyph + 0x20) as u8),
        64..=95 => Some((glyph - 64) as u8),
        96..=127 => Some(glyph as u8),
        _ => None,
    }
}

/// 导入字体图，非纯黑像素记为 1，纯黑记为 0
///
/// 返回导入的字形数。
pub fn import_font<S: RgbSource + ?Sized>(sheet: &mut TileSheet, font: &S) -> Result<usize> {
    let width = font.width() as usize;
    let pixel_count = width * font.height() as usize;

    if pixel_count % TILE_PIXELS != 0 {
        return Err(RomError::UnexpectedImageGeometry(format!(
            "字体图像素数 {} 不是 {} 的倍数",
            pixel_count, TILE_PIXELS
        )));
    }

    let glyphs = pixel_count / TILE_PIXELS;
    if glyphs > FONT_GLYPHS {
        return Err(RomError::UnexpectedImageGeometry(format!(
            "字体图包含 {} 个字形，最多 {}",
            glyphs, FONT_GLYPHS
        )));
    }

    for glyph in 0..glyphs {
        let start = glyph * TILE_PIXELS;
        let pixels: [u8; TILE_PIXELS] = std::array::from_fn(|i| {
            let p = start + i;
            let color = font.color((p % width) as u32, (p / width) as u32);
            u8::from(!color.is_black())
        });

        // glyphs <= FONT_GLYPHS，映射总是存在
        if let Some(slot) = glyph_slot(glyph) {
            sheet.insert(slot, Tile::new(pixels));
        }
    }

    tracing::debug!("导入 {} 个字形", glyphs);
    Ok(glyphs)
}
