//! romgen - FPGA ROM 镜像生成器
//!
//! 把原始二进制数据和字体/精灵图转换为 MIF (Memory Initialization File)。
//! 支持的命令：
//! - `bin`：任意二进制文件按字宽/深度/字节序打包为 MIF
//! - `gfx`：字体图 + 调色板精灵图打包为 32 x 2048 的瓦片 ROM

#![warn(missing_docs)]
#![allow(dead_code)]

mod cli;
mod error;
mod image;
mod mif;
mod output;
mod tiles;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 日志写入文件时需要持有 guard 直到退出
    let _guard = init_logging(&cli.log_level, cli.log_file.as_deref())?;

    info!("{} v{} 启动", APP_NAME, APP_VERSION);

    let step = match &cli.command {
        Command::Bin { input, .. } => format!("转换二进制文件 {}", input.display()),
        Command::Gfx { output, .. } => format!("生成瓦片 ROM {}", output.display()),
    };
    let summary = cli.run().with_context(|| format!("{step} 失败"))?;

    info!(
        "完成: {} 个数据字, {} 个填充字, {} 个截断, {} 个丢弃",
        summary.words_written, summary.padding_words, summary.overflowed_words, summary.dropped_words
    );

    Ok(())
}

/// 初始化日志，RUST_LOG 优先于 `--log-level`
fn init_logging(level: &str, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("无效的日志级别: {level}"))?;

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path.file_name().context("日志文件名无效")?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// 应用程序名称
pub const APP_NAME: &str = "romgen";

/// 应用程序版本（从 Cargo.toml 读取）
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_info() {
        assert_eq!(APP_NAME, "romgen");
        assert!(!APP_VERSION.is_empty());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
