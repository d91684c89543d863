//! 发布流程：新建 -> 导入 -> 替换图片 -> 生成部署
//! 四个阶段依次执行；前两个阶段失败即中止，图片逐张容错，部署只报告结果。

use anyhow::Result;
use chrono::NaiveDate;
use std::{
    io::{self, BufRead},
    path::PathBuf,
};
use tracing::debug;

use crate::{
    assets::{rewrite_post, RewriteReport},
    fetch::Fetch,
    hexo::{check_name, Hexo},
    import::append_file,
    permalink::{browsable, preview_url},
    process::ProcessOutput,
    utils::prompt_line,
};

/// 阶段一：新建文章
pub(crate) fn scaffold(hexo: &Hexo, name: &str) -> Result<()> {
    println!("步骤一 ============== 创建新博客文章: {}", name);
    let out = hexo.new_post(name)?;
    println!("{}", out);
    Ok(())
}

/// 阶段二：导入外部 markdown
pub(crate) fn import(hexo: &Hexo, name: &str, source: &std::path::Path) -> Result<()> {
    check_name(name)?;
    println!("步骤二 ============== 导入博客内容: {}", source.display());
    let post = hexo.post_path(name);
    let n = append_file(&post, source)?;
    println!("✅ 已追加 {} 字节到 {}", n, post.display());
    Ok(())
}

/// 阶段三：下载并替换图片
pub(crate) fn images(hexo: &Hexo, name: &str, fetcher: &dyn Fetch) -> Result<RewriteReport> {
    check_name(name)?;
    println!("步骤三 ============== 替换图片");
    let report = rewrite_post(&hexo.post_path(name), &hexo.asset_dir(name), fetcher)?;
    println!("{}", report);
    Ok(report)
}

/// 阶段四：生成并部署
pub(crate) fn deploy(hexo: &Hexo) -> Result<ProcessOutput> {
    println!("步骤四 ============== 生成静态 html 并部署");
    let out = hexo.deploy()?;
    println!("{}", out);
    if !out.success {
        eprintln!("⚠️ 部署命令返回失败，请检查上方输出");
    }
    Ok(out)
}

/// 在浏览器中打开预览地址，失败仅提示
pub(crate) fn open_in_browser(url: &str) {
    let target = browsable(url);
    if let Err(e) = webbrowser::open(&target) {
        eprintln!("⚠️ 无法打开浏览器: {} -> {}", target, e);
    }
}

/// `publish` 的输入；缺省的名称与路径从标准输入读取
#[derive(Debug, Clone)]
pub(crate) struct PublishOptions {
    pub(crate) name: Option<String>,
    pub(crate) source: Option<PathBuf>,
    pub(crate) deploy: bool,
    pub(crate) open: bool,
    pub(crate) preview_template: String,
    pub(crate) today: NaiveDate,
}

/// 部署阶段的结局
#[derive(Debug)]
pub(crate) enum DeployState {
    /// `--no-deploy`
    Skipped,
    /// 命令已运行（退出码见 `success`）
    Finished(ProcessOutput),
    /// 命令无法启动
    SpawnFailed(String),
}

impl DeployState {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            DeployState::Skipped => "未部署",
            DeployState::Finished(out) if out.success => "已部署",
            DeployState::Finished(_) => "部署失败",
            DeployState::SpawnFailed(_) => "部署命令无法启动",
        }
    }
}

/// 执行部署并折叠为 `DeployState`；主要工作已完成，失败由调用方报告
fn run_deploy(hexo: &Hexo) -> DeployState {
    match deploy(hexo) {
        Ok(out) => DeployState::Finished(out),
        Err(e) => DeployState::SpawnFailed(format!("{:#}", e)),
    }
}

/// 一次完整发布的结果
#[derive(Debug)]
pub(crate) struct PublishSummary {
    pub(crate) post: PathBuf,
    pub(crate) report: RewriteReport,
    pub(crate) preview_url: String,
    pub(crate) deploy: DeployState,
}

/// 依次执行四个阶段
pub(crate) fn publish<R: BufRead>(
    hexo: &Hexo,
    fetcher: &dyn Fetch,
    opts: PublishOptions,
    input: &mut R,
) -> Result<PublishSummary> {
    let mut stdout = io::stdout();
    let name = match opts.name {
        Some(n) => n,
        None => prompt_line(input, &mut stdout, "请输入博客名称：")?,
    };
    debug!(site_root = %hexo.site_root().display(), %name, "publishing post");

    scaffold(hexo, &name)?;

    let source = match opts.source {
        Some(p) => p,
        None => PathBuf::from(prompt_line(input, &mut stdout, "请输入导入的文件路径：")?),
    };
    import(hexo, &name, &source)?;

    // 图片阶段失败不中止流程：文章已导入，继续给出预览地址并部署
    let report = match images(hexo, &name, fetcher) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("⚠️ 替换图片失败，文章保持原样: {:#}", e);
            RewriteReport::default()
        }
    };

    let url = preview_url(&opts.preview_template, opts.today, &name);
    println!("🔗 预览地址: {}", url);

    let deployed = if opts.deploy {
        run_deploy(hexo)
    } else {
        println!("⏭️ 已跳过生成与部署");
        DeployState::Skipped
    };
    if opts.open {
        open_in_browser(&url);
    }

    Ok(PublishSummary { post: hexo.post_path(&name), report, preview_url: url, deploy: deployed })
}
