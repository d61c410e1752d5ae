//! 图像资源模块
//!
//! 瓦片表只依赖两个抽象：按坐标取 RGB 的 [`RgbSource`] 和
//! 带调色板、按坐标取索引的 [`IndexedSource`]。文件加载在这里完成。

pub mod palette;

pub use palette::{Color, Rgb555};

use crate::error::{Result, RomError};
use image::RgbImage;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// 可按坐标读取 RGB 颜色的图像
pub trait RgbSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn color(&self, x: u32, y: u32) -> Color;
}

/// 带调色板的索引图像
pub trait IndexedSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// 像素的原始调色板索引
    fn index(&self, x: u32, y: u32) -> u8;
    fn palette(&self) -> &[Color];
}

impl RgbSource for RgbImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn color(&self, x: u32, y: u32) -> Color {
        Color::from_rgb(self.get_pixel(x, y).0)
    }
}

/// 打开任意格式的图片并转换为 RGB8
pub fn open_rgb(path: &Path) -> Result<RgbImage> {
    tracing::debug!("加载 RGB 图片: {:?}", path);

    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| RomError::missing_asset(path, e.into()))
}

/// 调色板索引图像，每像素一个字节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Vec<Color>,
}

impl IndexedImage {
    /// 从索引数据创建图像
    pub fn new(width: u32, height: u32, indices: Vec<u8>, palette: Vec<Color>) -> Result<Self> {
        if indices.len() != (width as usize) * (height as usize) {
            return Err(RomError::UnexpectedImageGeometry(format!(
                "{}x{} 的图像需要 {} 个像素，实际 {}",
                width,
                height,
                width as usize * height as usize,
                indices.len()
            )));
        }

        Ok(Self {
            width,
            height,
            indices,
            palette,
        })
    }

    /// 从文件加载调色板 PNG
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!("加载索引图片: {:?}", path);

        let file = File::open(path).map_err(|e| RomError::missing_asset(path, e.into()))?;
        Self::decode_png(BufReader::new(file)).map_err(|e| match e {
            RomError::UnexpectedImageGeometry(_) => e,
            other => RomError::missing_asset(path, other),
        })
    }

    /// 解码调色板 PNG，保留原始索引而不展开调色板
    pub fn decode_png<R: BufRead + Seek>(reader: R) -> Result<Self> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::IDENTITY);
        let mut reader = decoder.read_info()?;

        let info = reader.info();
        if info.color_type != png::ColorType::Indexed {
            return Err(RomError::UnexpectedImageGeometry(format!(
                "精灵图必须是调色板索引格式，实际为 {:?}",
                info.color_type
            )));
        }

        let width = info.width;
        let height = info.height;
        let bits = info.bit_depth as u8 as usize;
        let palette: Vec<Color> = info
            .palette
            .as_ref()
            .map(|p| {
                p.chunks_exact(3)
                    .map(|c| Color::new(c[0], c[1], c[2]))
                    .collect()
            })
            .unwrap_or_default();

        let line_size = (width as usize * bits).div_ceil(8);
        let mut buf = vec![0u8; line_size * height as usize];
        let frame = reader.next_frame(&mut buf)?;
        let line_size = frame.line_size;

        let indices = unpack_indices(&buf, width as usize, height as usize, line_size, bits);
        tracing::debug!(
            "索引图片 {}x{}, {} 位, 调色板 {} 色",
            width,
            height,
            bits,
            palette.len()
        );

        Self::new(width, height, indices, palette)
    }
}

/// 把按行打包的 1/2/4/8 位索引展开为每像素一个字节 (高位在前)
fn unpack_indices(data: &[u8], width: usize, height: usize, line_size: usize, bits: usize) -> Vec<u8> {
    if bits == 8 {
        return data
            .chunks(line_size)
            .take(height)
            .flat_map(|row| row[..width].iter().copied())
            .collect();
    }

    let mask = (1u8 << bits) - 1;
    let mut indices = Vec::with_capacity(width * height);
    for row in data.chunks(line_size).take(height) {
        for x in 0..width {
            let bit = x * bits;
            let shift = 8 - bits - bit % 8;
            indices.push((row[bit / 8] >> shift) & mask);
        }
    }
    indices
}

impl IndexedSource for IndexedImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> u8 {
        self.indices[(y as usize) * (self.width as usize) + x as usize]
    }

    fn palette(&self) -> &[Color] {
        &self.palette
    }
}
