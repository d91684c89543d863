//! CLI 定义模块：仅负责命令行参数结构体与解析
//! 将 clap 的声明与业务逻辑解耦，便于在其它模块中复用参数。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 顶层 CLI 入口
#[derive(Parser, Debug)]
#[command(name = "hexopub", about = "Hexo 博客文章发布工具", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// 各子命令共享的站点参数
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SiteArgs {
    /// 配置文件路径，默认：hexopub.yaml / hexopub.yml
    #[arg(short, long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// Hexo 站点根目录（覆盖配置中的 site_root）
    #[arg(long, value_name = "DIR")]
    pub(crate) root: Option<PathBuf>,
    /// Hexo 可执行文件（覆盖配置中的 hexo_bin）
    #[arg(long, value_name = "BIN")]
    pub(crate) hexo: Option<PathBuf>,
}

/// 子命令定义
#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// 完整流程：新建文章 -> 导入内容 -> 替换图片 -> 生成并部署
    Publish {
        #[command(flatten)]
        site: SiteArgs,
        /// 文章名称（缺省时从标准输入读取）
        #[arg(short, long, value_name = "NAME")]
        name: Option<String>,
        /// 待导入的 markdown 文件（缺省时从标准输入读取）
        #[arg(short, long, value_name = "FILE")]
        source: Option<PathBuf>,
        /// 跳过最后的生成与部署
        #[arg(long)]
        no_deploy: bool,
        /// 部署后在浏览器打开预览地址
        #[arg(long)]
        open: bool,
    },
    /// 仅新建文章（hexo new <NAME>）
    New {
        #[command(flatten)]
        site: SiteArgs,
        /// 文章名称
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// 仅将外部 markdown 追加到已有文章末尾
    Import {
        #[command(flatten)]
        site: SiteArgs,
        /// 文章名称
        #[arg(value_name = "NAME")]
        name: String,
        /// 待导入的 markdown 文件
        #[arg(value_name = "FILE")]
        source: PathBuf,
    },
    /// 仅下载文章中的粘贴图片并替换为 asset_img 引用
    Images {
        #[command(flatten)]
        site: SiteArgs,
        /// 文章名称
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// 仅生成并部署站点（hexo d -g）
    Deploy {
        #[command(flatten)]
        site: SiteArgs,
        /// 部署后在浏览器打开站点预览地址
        #[arg(long)]
        open: bool,
    },
    /// 写出示例配置文件
    Init {
        /// 强制覆盖已存在文件
        #[arg(long)]
        force: bool,
        /// 目标目录（默认当前目录）
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn publish_accepts_shared_site_args() {
        let cli = Cli::parse_from([
            "hexopub", "publish", "--root", "/blog", "--hexo", "/bin/hexo", "-n", "hello", "--no-deploy",
        ]);
        match cli.command {
            Command::Publish { site, name, source, no_deploy, open } => {
                assert_eq!(site.root, Some(PathBuf::from("/blog")));
                assert_eq!(site.hexo, Some(PathBuf::from("/bin/hexo")));
                assert_eq!(name.as_deref(), Some("hello"));
                assert!(source.is_none());
                assert!(no_deploy);
                assert!(!open);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
