//! 字打包：把原始字节流按字宽切分为存储字

use crate::error::{Result, RomError};
use crate::mif::{MAX_WIDTH, Word};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::fmt;
use std::slice::Chunks;
use std::str::FromStr;

/// 字节序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endian {
    /// 小端 (默认)
    #[default]
    Little,
    /// 大端
    Big,
}

impl Endian {
    /// 按字节序解释一个字节块，块长度不足时只使用已有字节
    fn read(self, chunk: &[u8]) -> Word {
        match self {
            Endian::Little => LittleEndian::read_uint128(chunk, chunk.len()),
            Endian::Big => BigEndian::read_uint128(chunk, chunk.len()),
        }
    }

    /// 获取名称
    pub fn name(&self) -> &'static str {
        match self {
            Endian::Little => "little",
            Endian::Big => "big",
        }
    }
}

impl FromStr for Endian {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "little" => Ok(Endian::Little),
            "big" => Ok(Endian::Big),
            other => Err(format!("未知的字节序: {other} (可选 little / big)")),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 每个字占用的字节数
pub fn chunk_size(width: u32) -> usize {
    width.div_ceil(8) as usize
}

/// 惰性字序列，按地址顺序逐个产生
#[derive(Debug, Clone)]
pub struct Words<'a> {
    chunks: Chunks<'a, u8>,
    endian: Endian,
}

impl Iterator for Words<'_> {
    type Item = Word;

    fn next(&mut self) -> Option<Word> {
        self.chunks.next().map(|chunk| self.endian.read(chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Words<'_> {}

/// 将字节流打包为 `width` 位的字
///
/// 每 `ceil(width / 8)` 个字节组成一个字，最后不足的块按已有字节解释。
/// 空输入产生空序列。
pub fn pack(bytes: &[u8], width: u32, endian: Endian) -> Result<Words<'_>> {
    if width == 0 || width > MAX_WIDTH {
        return Err(RomError::InvalidWidth(width));
    }

    Ok(Words {
        chunks: bytes.chunks(chunk_size(width)),
        endian,
    })
}
