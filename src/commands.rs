//! 命令调度模块：
//! - 接收解析好的 CLI 参数，计算“有效参数”
//! - 调用新建、导入、图片替换、部署、初始化等模块

use anyhow::Result;
use chrono::Local;
use std::{io, path::PathBuf};

use crate::{
    cli::{Cli, Command},
    config::{settings_for, Settings},
    fetch::HttpFetcher,
    hexo::Hexo,
    init::init_scaffold,
    pipeline::{self, DeployState, PublishOptions},
    utils::env_bool_truthy,
};

fn fetcher_for(settings: &Settings) -> HttpFetcher {
    HttpFetcher::new(settings.user_agent.clone(), settings.timeout)
}

/// 运行指定的子命令
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Publish { site, name, source, no_deploy, open } => {
            let settings = settings_for(&site)?;
            let hexo = Hexo::from_settings(&settings);
            let fetcher = fetcher_for(&settings);
            let opts = PublishOptions {
                name,
                source,
                deploy: !no_deploy,
                open: open || env_bool_truthy("HEXOPUB_OPEN").unwrap_or(false),
                preview_template: settings.preview_url.clone(),
                today: Local::now().date_naive(),
            };
            let stdin = io::stdin();
            let summary = pipeline::publish(&hexo, &fetcher, opts, &mut stdin.lock())?;
            if let DeployState::SpawnFailed(reason) = &summary.deploy {
                eprintln!("⚠️ 部署命令无法启动: {}", reason);
            }
            println!(
                "🎉 发布完成: {} · 图片 {}/{} · {} · {}",
                summary.post.display(),
                summary.report.downloaded(),
                summary.report.images.len(),
                summary.deploy.label(),
                summary.preview_url
            );
            Ok(())
        }
        Command::New { site, name } => {
            let settings = settings_for(&site)?;
            pipeline::scaffold(&Hexo::from_settings(&settings), &name)
        }
        Command::Import { site, name, source } => {
            let settings = settings_for(&site)?;
            pipeline::import(&Hexo::from_settings(&settings), &name, &source)
        }
        Command::Images { site, name } => {
            let settings = settings_for(&site)?;
            pipeline::images(&Hexo::from_settings(&settings), &name, &fetcher_for(&settings))?;
            Ok(())
        }
        Command::Deploy { site, open } => {
            let settings = settings_for(&site)?;
            pipeline::deploy(&Hexo::from_settings(&settings))?;
            if open || env_bool_truthy("HEXOPUB_OPEN").unwrap_or(false) {
                pipeline::open_in_browser(&site_home(&settings.preview_url));
            }
            Ok(())
        }
        Command::Init { force, dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            init_scaffold(&dir, force).map(|_| ())
        }
    }
}

/// 从预览地址中截取站点首页（协议 + 主机）
fn site_home(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((s, r)) => (Some(s), r),
        None => (None, url),
    };
    let host = rest.split('/').next().unwrap_or(rest);
    match scheme {
        Some(s) => format!("{}://{}/", s, host),
        None => format!("{}/", host),
    }
}
