//! 精灵图导入
//!
//! 索引图按 8x8 切块 (先左右后上下)，第一个块写入 128 号瓦片，之后依次递增。
//! 像素保留原始调色板索引。

use crate::error::{Result, RomError};
use crate::image::{Color, IndexedSource, Rgb555};
use crate::tiles::{SHEET_SLOTS, SPRITE_BASE, TILE_PIXELS, TILE_SIZE, Tile, TileSheet};
use tracing::{debug, warn};

/// 精灵图导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteImport {
    /// 写入瓦片表的块数
    pub tiles: usize,
    /// 超出 255 号槽位而被丢弃的块数
    pub dropped: usize,
    /// 超出 4 位范围的像素数 (打包时会被截断)
    pub wide_pixels: usize,
    /// 调色板的 RGB555 摘要
    pub palette: Vec<Rgb555>,
}

/// 把调色板量化为 RGB555
pub fn palette_summary(palette: &[Color]) -> Vec<Rgb555> {
    palette.iter().map(|c| c.to_rgb555()).collect()
}

/// 导入精灵图，宽高必须都是 8 的倍数
pub fn import_sprites<S: IndexedSource + ?Sized>(
    sheet: &mut TileSheet,
    sprites: &S,
) -> Result<SpriteImport> {
    let (width, height) = (sprites.width() as usize, sprites.height() as usize);
    if width % TILE_SIZE != 0 || height % TILE_SIZE != 0 {
        return Err(RomError::UnexpectedImageGeometry(format!(
            "精灵图尺寸 {}x{} 不是 {} 的倍数",
            width, height, TILE_SIZE
        )));
    }

    let mut import = SpriteImport {
        palette: palette_summary(sprites.palette()),
        ..Default::default()
    };

    let mut slot = SPRITE_BASE;
    for yy in (0..height).step_by(TILE_SIZE) {
        for xx in (0..width).step_by(TILE_SIZE) {
            if slot >= SHEET_SLOTS {
                import.dropped += 1;
                continue;
            }

            let pixels: [u8; TILE_PIXELS] = std::array::from_fn(|i| {
                let x = xx + i % TILE_SIZE;
                let y = yy + i / TILE_SIZE;
                sprites.index(x as u32, y as u32)
            });
            import.wide_pixels += pixels.iter().filter(|&&p| p > 0x0F).count();

            sheet.insert(slot as u8, Tile::new(pixels));
            import.tiles += 1;
            slot += 1;
        }
    }

    if import.dropped > 0 {
        warn!("精灵图超出瓦片表容量，丢弃 {} 个块", import.dropped);
    }
    if import.wide_pixels > 0 {
        warn!("{} 个像素的索引超出 0..15，打包时将只保留低 4 位", import.wide_pixels);
    }
    debug!(
        "导入 {} 个精灵瓦片, 调色板 {} 色",
        import.tiles,
        import.palette.len()
    );

    Ok(import)
}
