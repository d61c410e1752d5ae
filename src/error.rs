//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// ROM 生成器错误类型
#[derive(Error, Debug)]
pub enum RomError {
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("图片解码错误: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("PNG 解码错误: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("JSON 错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("无效的字宽: {0} (有效范围 1..=128)")]
    InvalidWidth(u32),

    #[error("无效的深度: {0}")]
    InvalidDepth(u64),

    #[error("无法加载资源 {path:?}: {source}")]
    MissingAsset {
        path: PathBuf,
        #[source]
        source: Box<RomError>,
    },

    #[error("图片尺寸不符合要求: {0}")]
    UnexpectedImageGeometry(String),

    #[error("地址 {address:X} 的数据超出 {width} 位")]
    DataOverflow { address: u64, width: u32 },
}

impl RomError {
    /// 将加载错误包装为 `MissingAsset`
    pub fn missing_asset(path: impl Into<PathBuf>, source: RomError) -> Self {
        RomError::MissingAsset {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, RomError>;
