//! MIF 文本编码
//!
//! 输出格式：
//! ```text
//! DEPTH = 4;
//! WIDTH = 8;
//! DATA_RADIX = BIN;
//! ADDRESS_RADIX = HEX;
//! CONTENT
//! BEGIN
//! 0 : 10101011;
//! ...
//! END;
//! ```

use crate::error::{Result, RomError};
use crate::mif::{MAX_WIDTH, Word};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

/// 存储器布局：字宽 + 深度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MifLayout {
    width: u32,
    depth: u64,
    strict: bool,
}

/// 一次编码的统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EncodeSummary {
    /// 字宽 (位)
    pub width: u32,
    /// 深度 (字数)
    pub depth: u64,
    /// 地址字段的十六进制位数
    pub address_digits: usize,
    /// 写入的数据字数 (不含填充)
    pub words_written: u64,
    /// 补零的字数
    pub padding_words: u64,
    /// 被截断到字宽的字数
    pub overflowed_words: u64,
    /// 超出深度被丢弃的字数
    pub dropped_words: u64,
}

impl MifLayout {
    /// 创建布局，字宽必须在 1..=128，深度必须 >= 1
    pub fn new(width: u32, depth: u64) -> Result<Self> {
        if width == 0 || width > MAX_WIDTH {
            return Err(RomError::InvalidWidth(width));
        }
        if depth == 0 {
            return Err(RomError::InvalidDepth(depth));
        }

        Ok(Self {
            width,
            depth,
            strict: false,
        })
    }

    /// 严格模式：数据溢出或超出深度时直接报错
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 字宽
    pub fn width(&self) -> u32 {
        self.width
    }

    /// 深度
    pub fn depth(&self) -> u64 {
        self.depth
    }

    /// 地址字段位数：满足 16^n >= depth 的最小 n
    pub fn address_digits(&self) -> usize {
        let mut digits = 0;
        let mut span: u128 = 1;
        while span < self.depth as u128 {
            span *= 16;
            digits += 1;
        }
        digits
    }

    /// 字宽对应的掩码
    pub fn mask(&self) -> Word {
        if self.width >= Word::BITS {
            Word::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// 写出完整的 MIF 文本
    ///
    /// 不足 `depth` 的部分补零；超出字宽的数据按掩码截断并计数，
    /// 超出深度的字被丢弃并计数。严格模式下两者都会返回错误。
    pub fn encode<I, W>(&self, words: I, out: &mut W) -> Result<EncodeSummary>
    where
        I: IntoIterator<Item = Word>,
        W: Write + ?Sized,
    {
        let digits = self.address_digits();
        let width = self.width as usize;
        let mask = self.mask();

        let mut summary = EncodeSummary {
            width: self.width,
            depth: self.depth,
            address_digits: digits,
            ..Default::default()
        };

        self.write_header(out)?;

        let mut words = words.into_iter();
        let mut address: u64 = 0;

        while address < self.depth {
            let Some(word) = words.next() else { break };

            let data = word & mask;
            if data != word {
                if self.strict {
                    return Err(RomError::DataOverflow {
                        address,
                        width: self.width,
                    });
                }
                summary.overflowed_words += 1;
                debug!("地址 {address:X} 的数据 {word:#x} 超出 {} 位，已截断", self.width);
            }

            writeln!(out, "{address:0digits$X} : {data:0width$b};")?;
            summary.words_written += 1;
            address += 1;
        }

        summary.dropped_words = words.count() as u64;
        if summary.dropped_words > 0 {
            if self.strict {
                return Err(RomError::InvalidDepth(self.depth));
            }
            warn!(
                "输入超出深度 {}，丢弃 {} 个字",
                self.depth, summary.dropped_words
            );
        }
        if summary.overflowed_words > 0 {
            warn!(
                "{} 个字超出 {} 位，已按字宽截断",
                summary.overflowed_words, self.width
            );
        }

        while address < self.depth {
            writeln!(out, "{address:0digits$X} : {:0width$b};", 0)?;
            summary.padding_words += 1;
            address += 1;
        }

        writeln!(out, "END;")?;

        debug!(
            "MIF 编码完成: {} 个数据字, {} 个填充字",
            summary.words_written, summary.padding_words
        );

        Ok(summary)
    }

    fn write_header<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "DEPTH = {};", self.depth)?;
        writeln!(out, "WIDTH = {};", self.width)?;
        writeln!(out, "DATA_RADIX = BIN;")?;
        writeln!(out, "ADDRESS_RADIX = HEX;")?;
        writeln!(out, "CONTENT")?;
        writeln!(out, "BEGIN")?;
        Ok(())
    }
}

/// 以 `width` x `depth` 布局编码字序列
pub fn encode<I, W>(words: I, width: u32, depth: u64, out: &mut W) -> Result<EncodeSummary>
where
    I: IntoIterator<Item = Word>,
    W: Write + ?Sized,
{
    MifLayout::new(width, depth)?.encode(words, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mif::{Endian, pack};

    fn render(words: &[Word], width: u32, depth: u64) -> String {
        let mut out = Vec::new();
        encode(words.iter().copied(), width, depth, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_two_bytes() {
        let data = [0xABu8, 0xCD];
        let mut out = Vec::new();
        let summary = encode(pack(&data, 8, Endian::Little).unwrap(), 8, 4, &mut out).unwrap();

        let expected = "DEPTH = 4;\n\
                        WIDTH = 8;\n\
                        DATA_RADIX = BIN;\n\
                        ADDRESS_RADIX = HEX;\n\
                        CONTENT\n\
                        BEGIN\n\
                        0 : 10101011;\n\
                        1 : 11001101;\n\
                        2 : 00000000;\n\
                        3 : 00000000;\n\
                        END;\n";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(summary.words_written, 2);
        assert_eq!(summary.padding_words, 2);
        assert_eq!(summary.address_digits, 1);
    }

    #[test]
    fn test_address_digits() {
        let digits = |depth| MifLayout::new(8, depth).unwrap().address_digits();
        assert_eq!(digits(1), 0);
        assert_eq!(digits(2), 1);
        assert_eq!(digits(16), 1);
        assert_eq!(digits(17), 2);
        assert_eq!(digits(256), 2);
        assert_eq!(digits(257), 3);
        assert_eq!(digits(2048), 3);
        assert_eq!(digits(4096), 3);
        assert_eq!(digits(4097), 4);
        assert_eq!(digits(65536), 4);
    }

    #[test]
    fn test_depth_one_still_prints_address() {
        let text = render(&[1], 4, 1);
        assert!(text.contains("\n0 : 0001;\n"));
    }

    #[test]
    fn test_line_count_and_addresses() {
        let words: Vec<Word> = (0..20).collect();
        for depth in [20u64, 21, 256, 300] {
            let text = render(&words, 16, depth);
            let lines: Vec<&str> = text.lines().collect();
            assert_eq!(lines.len() as u64, depth + 7, "depth {depth}");
            assert_eq!(lines.last(), Some(&"END;"));

            let digits = MifLayout::new(16, depth).unwrap().address_digits();
            for (i, line) in lines[6..lines.len() - 1].iter().enumerate() {
                let (addr, data) = line.split_once(" : ").unwrap();
                assert_eq!(addr.len(), digits);
                assert_eq!(u64::from_str_radix(addr, 16).unwrap(), i as u64);
                assert_eq!(addr, addr.to_uppercase());
                assert_eq!(data.len(), 16 + 1);
                assert!(data.ends_with(';'));
            }
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let words: Vec<Word> = vec![0xDEAD, 0xBEEF, 0x1234];
        assert_eq!(render(&words, 16, 64), render(&words, 16, 64));
    }

    #[test]
    fn test_overflow_is_masked() {
        let mut out = Vec::new();
        let summary = encode([0x1FFu128, 0x0F], 8, 2, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0 : 11111111;"));
        assert!(text.contains("1 : 00001111;"));
        assert_eq!(summary.overflowed_words, 1);
    }

    #[test]
    fn test_overflow_strict() {
        let layout = MifLayout::new(8, 2).unwrap().strict(true);
        let err = layout.encode([0x0F, 0x100], &mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, RomError::DataOverflow { address: 1, width: 8 }));
    }

    #[test]
    fn test_words_beyond_depth_are_dropped() {
        let mut out = Vec::new();
        let summary = encode([1u128, 2, 3, 4, 5], 4, 3, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 3 + 7);
        assert!(text.contains("2 : 0011;"));
        assert!(!text.contains("0100;"));
        assert_eq!(summary.dropped_words, 2);

        let strict = MifLayout::new(4, 3).unwrap().strict(true);
        assert!(matches!(
            strict.encode([1u128, 2, 3, 4], &mut Vec::<u8>::new()),
            Err(RomError::InvalidDepth(3))
        ));
    }

    #[test]
    fn test_full_width_word() {
        let text = render(&[u128::MAX], 128, 1);
        assert!(text.contains(&format!("0 : {};", "1".repeat(128))));
    }

    #[test]
    fn test_invalid_layout() {
        assert!(matches!(MifLayout::new(8, 0), Err(RomError::InvalidDepth(0))));
        assert!(matches!(MifLayout::new(0, 8), Err(RomError::InvalidWidth(0))));
        assert!(matches!(MifLayout::new(200, 8), Err(RomError::InvalidWidth(200))));
    }
}
