//! 按行打包瓦片：每行 8 个像素、每像素 4 位，组成一个 32 位字
//!
//! 第 0 个像素位于 bit 31-28，第 7 个像素位于 bit 3-0。
//! 输出顺序为瓦片 0..255、每个瓦片内第 0..7 行，共 2048 个字。

use crate::error::Result;
use crate::mif::{EncodeSummary, MifLayout, Word};
use crate::tiles::{TILE_SIZE, TileSheet};
use std::io::Write;

/// 行字宽 (位)
pub const ROW_WIDTH: u32 = 32;
/// 瓦片 ROM 深度 (字数)
pub const SHEET_DEPTH: u64 = 2048;

/// 把一行像素打包为 32 位字，每个像素只保留低 4 位
pub fn pack_row(row: &[u8]) -> u32 {
    row.iter()
        .take(TILE_SIZE)
        .fold(0, |word, &pixel| (word << 4) | (pixel & 0x0F) as u32)
}

/// 按槽位和行顺序展开瓦片表，空槽位输出空白瓦片
pub fn flatten(sheet: &TileSheet) -> impl Iterator<Item = u32> + '_ {
    sheet.iter().flat_map(|tile| tile.rows().map(pack_row))
}

/// 以 32 x 2048 布局把瓦片表写成 MIF
pub fn write_sheet<W: Write + ?Sized>(
    sheet: &TileSheet,
    strict: bool,
    out: &mut W,
) -> Result<EncodeSummary> {
    let layout = MifLayout::new(ROW_WIDTH, SHEET_DEPTH)?.strict(strict);
    layout.encode(flatten(sheet).map(Word::from), out)
}
