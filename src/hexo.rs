//! Hexo 站点操作：
//! - 文章与图片资源目录的路径约定
//! - `hexo new <name>` 新建文章
//! - `hexo d -g` 生成并部署

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::{config::Settings, process::{run_in, ProcessOutput}};

/// 文章名称只要求去除空白后非空
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("文章名称不能为空");
    }
    Ok(())
}

/// 绑定到某个站点根目录的 hexo 命令
#[derive(Debug, Clone)]
pub(crate) struct Hexo {
    bin: PathBuf,
    site_root: PathBuf,
    posts_dir: PathBuf,
}

impl Hexo {
    pub(crate) fn new(bin: impl Into<PathBuf>, site_root: impl Into<PathBuf>, posts_dir: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into(), site_root: site_root.into(), posts_dir: posts_dir.into() }
    }

    pub(crate) fn from_settings(s: &Settings) -> Self {
        Self::new(&s.hexo_bin, &s.site_root, &s.posts_dir)
    }

    pub(crate) fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// `<site_root>/<posts_dir>/<name>.md`
    pub(crate) fn post_path(&self, name: &str) -> PathBuf {
        self.site_root.join(&self.posts_dir).join(format!("{}.md", name))
    }

    /// `<site_root>/<posts_dir>/<name>/`，存放下载的图片
    pub(crate) fn asset_dir(&self, name: &str) -> PathBuf {
        self.site_root.join(&self.posts_dir).join(name)
    }

    /// 新建文章。进程无法启动或退出码非 0 均视为失败。
    pub(crate) fn new_post(&self, name: &str) -> Result<ProcessOutput> {
        check_name(name)?;
        let out = run_in(&self.site_root, &self.bin, ["new", name])?;
        if !out.success {
            bail!("hexo new 执行失败:\n{}", out);
        }
        Ok(out)
    }

    /// 生成并部署。只报告结果，不按退出码判定失败。
    pub(crate) fn deploy(&self) -> Result<ProcessOutput> {
        run_in(&self.site_root, &self.bin, ["d", "-g"])
    }
}
