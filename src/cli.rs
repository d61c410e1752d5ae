//! 命令行参数与命令执行

use crate::error::{Result, RomError};
use crate::image::{IndexedImage, Rgb555, open_rgb};
use crate::mif::{EncodeSummary, Endian, MifLayout, pack};
use crate::output::write_atomically;
use crate::tiles::{build_sheet, write_sheet};
use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// MIF ROM 镜像生成工具
#[derive(Parser, Debug)]
#[command(name = "romgen", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// 数据超出字宽或超出深度时报错，而不是截断
    #[arg(long, global = true)]
    pub strict: bool,

    /// 把编码统计写入 JSON 文件
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    /// 日志级别 (RUST_LOG 优先)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// 日志输出文件 (默认输出到 stderr)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 把任意二进制文件转换为 MIF
    Bin {
        /// 输入文件
        input: PathBuf,
        /// 输出 MIF 文件
        output: PathBuf,
        /// 字宽 (位)
        width: u32,
        /// 深度 (字数)
        depth: u64,
        /// 字节序: little / big
        #[arg(default_value = "little")]
        endian: Endian,
    },
    /// 由字体图和精灵图生成 32 x 2048 的瓦片 ROM
    Gfx {
        /// 1 位字体图 (128 个 8x8 字形)
        #[arg(long, default_value = "atarifont.png")]
        font: PathBuf,
        /// 16 色调色板精灵图
        #[arg(long, default_value = "misterkun.png")]
        sprites: PathBuf,
        /// 输出 MIF 文件
        #[arg(short, long, default_value = "gfx.mif")]
        output: PathBuf,
        /// 调色板 RGB555 摘要输出文件 (默认输出到 stdout)
        #[arg(long)]
        palette_out: Option<PathBuf>,
    },
}

impl Cli {
    /// 执行命令
    pub fn run(&self) -> Result<EncodeSummary> {
        let summary = match &self.command {
            Command::Bin {
                input,
                output,
                width,
                depth,
                endian,
            } => convert_binary(input, output, *width, *depth, *endian, self.strict)?,
            Command::Gfx {
                font,
                sprites,
                output,
                palette_out,
            } => convert_tiles(font, sprites, output, palette_out.as_deref(), self.strict)?,
        };

        if let Some(report) = &self.report {
            write_atomically(report, |w| {
                serde_json::to_writer_pretty(&mut *w, &summary)?;
                writeln!(w)?;
                Ok(())
            })?;
            info!("统计信息已写入 {:?}", report);
        }

        Ok(summary)
    }
}

/// 二进制文件 -> MIF
pub fn convert_binary(
    input: &Path,
    output: &Path,
    width: u32,
    depth: u64,
    endian: Endian,
    strict: bool,
) -> Result<EncodeSummary> {
    let layout = MifLayout::new(width, depth)?.strict(strict);
    let data = fs::read(input).map_err(|e| RomError::missing_asset(input, e.into()))?;
    info!(
        "读取 {:?}: {} 字节, 字宽 {}, 深度 {}, 字节序 {}",
        input,
        data.len(),
        width,
        depth,
        endian
    );

    let words = pack(&data, width, endian)?;
    let summary = write_atomically(output, |w| layout.encode(words, w))?;
    info!("已生成 {:?}", output);
    Ok(summary)
}

/// 字体图 + 精灵图 -> 瓦片 ROM MIF
pub fn convert_tiles(
    font: &Path,
    sprites: &Path,
    output: &Path,
    palette_out: Option<&Path>,
    strict: bool,
) -> Result<EncodeSummary> {
    let font_image = open_rgb(font)?;
    let sprite_image = IndexedImage::open(sprites)?;

    let (sheet, import) = build_sheet(&font_image, &sprite_image)?;

    match palette_out {
        Some(path) => {
            write_atomically(path, |w| write_palette(&import.palette, w))?;
            info!("调色板已写入 {:?}", path);
        }
        None => write_palette(&import.palette, &mut std::io::stdout().lock())?,
    }

    let summary = write_atomically(output, |w| write_sheet(&sheet, strict, w))?;
    info!("已生成 {:?}", output);
    Ok(summary)
}

/// 每行一个小写十六进制 RGB555 值
pub fn write_palette<W: Write + ?Sized>(palette: &[Rgb555], out: &mut W) -> Result<()> {
    for color in palette {
        writeln!(out, "{color:x}")?;
    }
    Ok(())
}
