//! hexopub：把一篇外部 markdown 发布为 Hexo 博客文章
//! 新建文章 -> 追加内容 -> 下载粘贴图片并替换为 asset_img -> 生成部署

mod assets;
mod cli;
mod commands;
mod config;
mod fetch;
mod hexo;
mod import;
mod init;
mod permalink;
mod pipeline;
mod process;
mod utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> Result<()> {
    // 诊断日志写到 stderr，级别由 HEXOPUB_LOG 控制（默认 warn）
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("HEXOPUB_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    commands::run(cli)
}
