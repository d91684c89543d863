//! 配置与加载模块：
//! - 定义 `Config`/`HttpSettings` 等数据结构
//! - 提供 `load_config` 支持显式路径与当前目录自动发现
//! - 合并 CLI / 环境变量 / 配置文件，得到最终生效的 `Settings`

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    cli::SiteArgs,
    utils::{env_opt_path, env_opt_string},
};

pub(crate) const DEFAULT_HEXO_BIN: &str = "hexo";
pub(crate) const DEFAULT_POSTS_DIR: &str = "source/_posts";
pub(crate) const DEFAULT_PREVIEW_URL: &str = "localhost:4000/:year/:month/:day/:title";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_CANDIDATES: [&str; 2] = ["hexopub.yaml", "hexopub.yml"];

#[derive(Debug, Deserialize, Default)]
pub(crate) struct Config {
    /// Hexo 站点根目录
    #[serde(default)]
    pub(crate) site_root: Option<PathBuf>,
    /// hexo 可执行文件（可为绝对路径，或在 PATH 中查找）
    #[serde(default)]
    pub(crate) hexo_bin: Option<PathBuf>,
    /// 文章目录（相对站点根），默认 source/_posts
    #[serde(default)]
    pub(crate) posts_dir: Option<PathBuf>,
    /// 预览地址模板，支持 :year :month :day :title
    #[serde(default)]
    pub(crate) preview_url: Option<String>,
    #[serde(default)]
    pub(crate) http: HttpSettings,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub(crate) struct HttpSettings {
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// 单次请求超时秒数
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

/// 配置来源（用于打印和调试）
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConfigSource {
    LocalExplicit(String),
    LocalAuto(String),
    Defaults,
}

/// 加载后的配置及其来源
#[derive(Debug)]
pub(crate) struct LoadedConfig {
    pub(crate) config: Config,
    pub(crate) source: ConfigSource,
}

/// 人类可读的来源描述
pub(crate) fn describe_source(src: &ConfigSource) -> String {
    match src {
        ConfigSource::LocalExplicit(p) => format!("本地文件: {}", p),
        ConfigSource::LocalAuto(p) => format!("本地文件(自动发现): {}", p),
        ConfigSource::Defaults => "内置默认值".to_string(),
    }
}

// 自动发现：在给定目录中查找 hexopub.yaml / hexopub.yml
fn resolve_local_config_path(dir: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES.iter().map(|c| dir.join(c)).find(|p| p.exists())
}

/// 加载配置：显式路径必须存在；否则在 `search_dir` 中自动发现；都没有则使用默认值
pub(crate) fn load_config(explicit: Option<&Path>, search_dir: &Path) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            bail!("配置文件不存在: {}", path.display());
        }
        let config = read_config_file(path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::LocalExplicit(path.display().to_string()) });
    }
    if let Some(path) = resolve_local_config_path(search_dir) {
        let config = read_config_file(&path)?;
        return Ok(LoadedConfig { config, source: ConfigSource::LocalAuto(path.display().to_string()) });
    }
    Ok(LoadedConfig { config: Config::default(), source: ConfigSource::Defaults })
}

fn read_config_file(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path).with_context(|| format!("读取配置失败: {}", path.display()))?;
    // 空文件按默认值处理
    if raw.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(&raw).with_context(|| format!("解析 YAML 失败: {}", path.display()))
}

/// 最终生效的运行参数
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) site_root: PathBuf,
    pub(crate) hexo_bin: PathBuf,
    pub(crate) posts_dir: PathBuf,
    pub(crate) preview_url: String,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
}

/// 环境变量覆盖项（若 CLI 未指定）
#[derive(Debug, Default)]
pub(crate) struct EnvOverrides {
    pub(crate) config: Option<PathBuf>,
    pub(crate) root: Option<PathBuf>,
    pub(crate) hexo: Option<PathBuf>,
    pub(crate) preview_url: Option<String>,
}

impl EnvOverrides {
    pub(crate) fn from_env() -> Self {
        Self {
            config: env_opt_path("HEXOPUB_CONFIG"),
            root: env_opt_path("HEXOPUB_ROOT"),
            hexo: env_opt_path("HEXOPUB_HEXO"),
            preview_url: env_opt_string("HEXOPUB_PREVIEW_URL"),
        }
    }
}

/// 合并优先级：CLI > 环境变量 > 配置文件 > 默认值
pub(crate) fn resolve_settings(site: &SiteArgs, env: EnvOverrides, config: Config) -> Result<Settings> {
    let site_root = site
        .root
        .clone()
        .or(env.root)
        .or(config.site_root)
        .ok_or_else(|| {
            anyhow::anyhow!("未指定站点根目录：请提供 --root，或设置 HEXOPUB_ROOT，或在配置文件中填写 site_root")
        })?;
    let hexo_bin = site
        .hexo
        .clone()
        .or(env.hexo)
        .or(config.hexo_bin)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HEXO_BIN));
    let posts_dir = config.posts_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_DIR));
    let preview_url = env
        .preview_url
        .or(config.preview_url)
        .unwrap_or_else(|| DEFAULT_PREVIEW_URL.to_string());
    let user_agent = config
        .http
        .user_agent
        .unwrap_or_else(|| format!("hexopub/{}", env!("CARGO_PKG_VERSION")));
    let timeout = Duration::from_secs(config.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1));
    Ok(Settings { site_root, hexo_bin, posts_dir, preview_url, user_agent, timeout })
}

/// 加载配置并解析出最终参数，同时打印配置来源
pub(crate) fn settings_for(site: &SiteArgs) -> Result<Settings> {
    let env = EnvOverrides::from_env();
    let explicit = site.config.clone().or_else(|| env.config.clone());
    let loaded = load_config(explicit.as_deref(), Path::new("."))?;
    println!("ℹ️ 本次使用的配置来源: {}", describe_source(&loaded.source));
    resolve_settings(site, env, loaded.config)
}
