//! 初始化：`hexopub init` 写出示例配置

use anyhow::{Context, Result};
use std::{fs, path::Path};

// 内置示例（用于 init）
const SAMPLE_CONFIG: &str = include_str!("samples/hexopub.yaml");

/// 写出示例配置，返回是否实际写入
pub(crate) fn init_scaffold(dir: &Path, force: bool) -> Result<bool> {
    if !dir.exists() {
        fs::create_dir_all(dir).with_context(|| format!("创建目录失败: {}", dir.display()))?;
    }

    let cfg_path = dir.join("hexopub.yaml");
    if cfg_path.exists() && !force {
        eprintln!("跳过: {} 已存在，使用 --force 可覆盖", cfg_path.display());
        return Ok(false);
    }
    fs::write(&cfg_path, SAMPLE_CONFIG.as_bytes())
        .with_context(|| format!("写入示例配置失败: {}", cfg_path.display()))?;
    println!("写入: {}", cfg_path.display());
    println!("✅ 初始化完成，修改 site_root 后运行: hexopub publish");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, ConfigSource, DEFAULT_POSTS_DIR, DEFAULT_PREVIEW_URL};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn sample_config_parses_with_defaults() {
        let tmp = TempDir::new().unwrap();
        assert!(init_scaffold(tmp.path(), false).unwrap());
        let loaded = load_config(None, tmp.path()).unwrap();
        assert!(matches!(loaded.source, ConfigSource::LocalAuto(_)));
        let cfg = loaded.config;
        assert_eq!(cfg.posts_dir, Some(PathBuf::from(DEFAULT_POSTS_DIR)));
        assert_eq!(cfg.preview_url.as_deref(), Some(DEFAULT_PREVIEW_URL));
        assert_eq!(cfg.http.timeout_secs, Some(30));
    }

    #[test]
    fn existing_file_kept_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("hexopub.yaml");
        fs::write(&path, "site_root: /mine\n").unwrap();
        assert!(!init_scaffold(tmp.path(), false).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "site_root: /mine\n");
        assert!(init_scaffold(tmp.path(), true).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE_CONFIG);
    }

    #[test]
    fn creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested/site");
        assert!(init_scaffold(&dir, false).unwrap());
        assert!(dir.join("hexopub.yaml").exists());
    }
}
