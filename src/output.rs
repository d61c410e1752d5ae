//! 输出文件写入
//!
//! 先写入同目录下的 `<文件名>.tmp`，成功后再重命名为目标文件，
//! 失败时删除临时文件，目标文件保持原状。

use crate::error::Result;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 临时文件路径
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// 通过临时文件写出 `path`，`write` 返回错误时不会留下目标文件
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let tmp = temp_path(path);
    tracing::debug!("写入临时文件: {:?}", tmp);

    match write_file(&tmp, write) {
        Ok(value) => {
            fs::rename(&tmp, path)?;
            tracing::debug!("已写入: {:?}", path);
            Ok(value)
        }
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}

fn write_file<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    let value = write(&mut writer)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RomError;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("romgen-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_temp_path() {
        assert_eq!(temp_path(Path::new("out/gfx.mif")), PathBuf::from("out/gfx.mif.tmp"));
    }

    #[test]
    fn test_write_success() {
        let dir = scratch_dir("ok");
        let path = dir.join("rom.mif");

        let n = write_atomically(&path, |w| {
            w.write_all(b"END;\n")?;
            Ok(5)
        })
        .unwrap();

        assert_eq!(n, 5);
        assert_eq!(fs::read_to_string(&path).unwrap(), "END;\n");
        assert!(!temp_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_write_keeps_old_file() {
        let dir = scratch_dir("fail");
        let path = dir.join("rom.mif");
        fs::write(&path, "old").unwrap();

        let result: Result<()> = write_atomically(&path, |w| {
            w.write_all(b"partial")?;
            Err(RomError::InvalidDepth(0))
        });

        assert!(matches!(result, Err(RomError::InvalidDepth(0))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        assert!(!temp_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
