//! 内容导入：将外部 markdown 原样追加到文章末尾

use anyhow::{Context, Result};
use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};
use tracing::debug;

/// 将 `source` 的全部字节追加到已存在的 `dest` 末尾，返回写入的字节数。
/// `dest` 不存在时报错（不会新建）。
pub(crate) fn append_file(dest: &Path, source: &Path) -> Result<u64> {
    let mut input = File::open(source).with_context(|| format!("打开导入文件失败: {}", source.display()))?;
    let mut output = OpenOptions::new()
        .append(true)
        .open(dest)
        .with_context(|| format!("打开文章文件失败: {}", dest.display()))?;
    let n = io::copy(&mut input, &mut output)
        .with_context(|| format!("追加内容失败: {} -> {}", source.display(), dest.display()))?;
    output.sync_all().with_context(|| format!("写入文章文件失败: {}", dest.display()))?;
    debug!(bytes = n, dest = %dest.display(), "appended source file");
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn appends_rather_than_overwrites() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("post.md");
        let src = tmp.path().join("draft.md");
        fs::write(&dest, "A").unwrap();
        fs::write(&src, "B").unwrap();
        assert_eq!(append_file(&dest, &src).unwrap(), 1);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "AB");
        assert_eq!(fs::read_to_string(&src).unwrap(), "B");
    }

    #[test]
    fn copies_bytes_verbatim() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("post.md");
        let src = tmp.path().join("draft.md");
        fs::write(&dest, "---\ntitle: x\n---\n").unwrap();
        fs::write(&src, "中文\r\n![image.png](http://x/1.png)\r\n").unwrap();
        append_file(&dest, &src).unwrap();
        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "---\ntitle: x\n---\n中文\r\n![image.png](http://x/1.png)\r\n"
        );
    }

    #[test]
    fn missing_source_fails_and_leaves_dest_alone() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("post.md");
        fs::write(&dest, "A").unwrap();
        let err = append_file(&dest, &tmp.path().join("missing.md")).unwrap_err();
        assert!(err.to_string().contains("打开导入文件失败"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "A");
    }

    #[test]
    fn missing_dest_is_not_created() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("post.md");
        let src = tmp.path().join("draft.md");
        fs::write(&src, "B").unwrap();
        assert!(append_file(&dest, &src).is_err());
        assert!(!dest.exists());
    }
}
