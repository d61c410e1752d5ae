//! 瓦片表 (8x8 字符/图形 ROM)
//!
//! 0..127 号瓦片存放重映射后的字体字形，128..255 号存放精灵图瓦片。

pub mod font;
pub mod rows;
pub mod sprite;

pub use font::import_font;
pub use rows::{flatten, pack_row, write_sheet};
pub use sprite::{SpriteImport, import_sprites};

use crate::error::Result;
use crate::image::{IndexedSource, RgbSource};

/// 瓦片边长 (像素)
pub const TILE_SIZE: usize = 8;
/// 每个瓦片的像素数
pub const TILE_PIXELS: usize = TILE_SIZE * TILE_SIZE;
/// 瓦片表槽位数
pub const SHEET_SLOTS: usize = 256;
/// 精灵瓦片的起始槽位
pub const SPRITE_BASE: usize = 128;

/// 8x8 瓦片，按行优先存放像素值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile([u8; TILE_PIXELS]);

impl Tile {
    /// 全零的空白瓦片
    pub const BLANK: Tile = Tile([0; TILE_PIXELS]);

    pub fn new(pixels: [u8; TILE_PIXELS]) -> Self {
        Self(pixels)
    }

    /// 从切片创建，长度必须为 64
    pub fn from_slice(pixels: &[u8]) -> Option<Self> {
        pixels.try_into().ok().map(Self)
    }

    /// 像素数据
    pub fn pixels(&self) -> &[u8; TILE_PIXELS] {
        &self.0
    }

    /// 按行迭代，每行 8 个像素
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.0.chunks_exact(TILE_SIZE)
    }

    /// 获取 (x, y) 处的像素
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.0[y * TILE_SIZE + x]
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::BLANK
    }
}

/// 稀疏瓦片表：256 个槽位，每个槽位可为空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileSheet {
    slots: [Option<Tile>; SHEET_SLOTS],
}

impl TileSheet {
    /// 创建空瓦片表
    pub fn new() -> Self {
        Self {
            slots: [None; SHEET_SLOTS],
        }
    }

    /// 写入瓦片，返回被覆盖的旧瓦片
    pub fn insert(&mut self, index: u8, tile: Tile) -> Option<Tile> {
        self.slots[index as usize].replace(tile)
    }

    /// 获取已填充的瓦片
    pub fn get(&self, index: u8) -> Option<&Tile> {
        self.slots[index as usize].as_ref()
    }

    /// 槽位是否已填充
    pub fn contains(&self, index: u8) -> bool {
        self.slots[index as usize].is_some()
    }

    /// 获取瓦片，未填充时返回空白瓦片
    pub fn tile_or_blank(&self, index: u8) -> &Tile {
        self.get(index).unwrap_or(&Tile::BLANK)
    }

    /// 已填充的槽位数
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 按槽位顺序迭代全部 256 个瓦片 (空槽为空白瓦片)
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.slots.iter().map(|s| s.as_ref().unwrap_or(&Tile::BLANK))
    }
}

impl Default for TileSheet {
    fn default() -> Self {
        Self::new()
    }
}

/// 依次导入字体与精灵图，构建完整瓦片表
pub fn build_sheet<F, S>(font: &F, sprites: &S) -> Result<(TileSheet, SpriteImport)>
where
    F: RgbSource + ?Sized,
    S: IndexedSource + ?Sized,
{
    let mut sheet = TileSheet::new();
    let glyphs = import_font(&mut sheet, font)?;
    let import = import_sprites(&mut sheet, sprites)?;

    tracing::info!(
        "瓦片表构建完成: {} 个字形, {} 个精灵瓦片",
        glyphs,
        import.tiles
    );

    Ok((sheet, import))
}
