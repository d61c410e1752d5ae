//! MIF (Memory Initialization File) 生成模块

pub mod encoder;
pub mod packer;

pub use encoder::{EncodeSummary, MifLayout, encode};
pub use packer::{Endian, Words, chunk_size, pack};

/// 存储字，最宽 128 位
pub type Word = u128;

/// 支持的最大字宽 (位)
pub const MAX_WIDTH: u32 = Word::BITS;
