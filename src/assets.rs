//! 图片引用替换：
//! - 扫描文章中的粘贴图片占位行 `![image.png](<url>)`
//! - 依次下载到 `<文章名>/<序号>.png`
//! - 将占位行替换为 `{% asset_img <序号>.png %}`
//!
//! 已存在的 `{% asset_img ... %}` 行会占用序号，新图片从其数量 + 1 开始编号，避免覆盖。

use anyhow::{Context, Result};
use std::{fmt, fs, path::Path};
use tracing::{debug, warn};

use crate::fetch::Fetch;

const PASTED_IMAGE_PREFIX: &str = "![image.png](";
const PASTED_IMAGE_SUFFIX: &str = ")";
const ASSET_IMG_PREFIX: &str = "{% asset_img ";
const ASSET_IMG_SUFFIX: &str = "%}";
const IMAGE_EXT: &str = "png";

/// 若该行（去除首尾空白后）是粘贴图片占位，返回其中的 URL
pub(crate) fn placeholder_url(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(PASTED_IMAGE_PREFIX)?
        .strip_suffix(PASTED_IMAGE_SUFFIX)
}

/// 该行（去除首尾空白后）是否为本地资源引用
pub(crate) fn is_asset_reference(line: &str) -> bool {
    let t = line.trim();
    t.starts_with(ASSET_IMG_PREFIX) && t.ends_with(ASSET_IMG_SUFFIX)
}

/// 生成本地资源引用行
pub(crate) fn asset_reference(file_name: &str) -> String {
    format!("{}{} {}", ASSET_IMG_PREFIX, file_name, ASSET_IMG_SUFFIX)
}

/// 一张待下载的图片及其分配到的序号
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlannedImage {
    pub(crate) index: u32,
    pub(crate) url: String,
}

impl PlannedImage {
    pub(crate) fn file_name(&self) -> String {
        format!("{}.{}", self.index, IMAGE_EXT)
    }
}

/// 按 `\n` 切分原始字节并去掉行尾 `\r`；不要求内容是合法 UTF-8
fn split_lines(content: &[u8]) -> Vec<&[u8]> {
    if content.is_empty() {
        return Vec::new();
    }
    let body = content.strip_suffix(b"\n").unwrap_or(content);
    body.split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .collect()
}

// 只在匹配时做有损解码，原始字节不受影响
fn line_placeholder_url(line: &[u8]) -> Option<String> {
    placeholder_url(&String::from_utf8_lossy(line)).map(str::to_string)
}

fn line_is_asset_reference(line: &[u8]) -> bool {
    is_asset_reference(&String::from_utf8_lossy(line))
}

/// 第一遍扫描：按出现顺序收集占位 URL，并统计已有资源引用以确定起始序号
pub(crate) fn plan_images(content: &[u8]) -> Vec<PlannedImage> {
    let mut next_index: u32 = 1;
    let mut urls: Vec<String> = Vec::new();
    for line in split_lines(content) {
        if let Some(url) = line_placeholder_url(line) {
            urls.push(url);
        } else if line_is_asset_reference(line) {
            next_index += 1;
        }
    }
    urls.into_iter()
        .zip(next_index..)
        .map(|(url, index)| PlannedImage { index, url })
        .collect()
}

/// 第二遍：按顺序把占位行替换为资源引用，其它行按原字节保留。
/// 行尾统一为 `\n`。
pub(crate) fn rewrite_content(content: &[u8], images: &[PlannedImage]) -> Vec<u8> {
    let mut planned = images.iter();
    let mut out = Vec::with_capacity(content.len());
    for line in split_lines(content) {
        match line_placeholder_url(line).and_then(|_| planned.next()) {
            Some(img) => out.extend_from_slice(asset_reference(&img.file_name()).as_bytes()),
            None => out.extend_from_slice(line),
        }
        out.push(b'\n');
    }
    out
}

/// 单张图片的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ImageOutcome {
    Downloaded { bytes: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ImageResult {
    pub(crate) image: PlannedImage,
    pub(crate) outcome: ImageOutcome,
}

/// 一次替换的汇总报告
#[derive(Debug, Clone, Default)]
pub(crate) struct RewriteReport {
    pub(crate) images: Vec<ImageResult>,
}

impl RewriteReport {
    pub(crate) fn downloaded(&self) -> usize {
        self.images
            .iter()
            .filter(|r| matches!(r.outcome, ImageOutcome::Downloaded { .. }))
            .count()
    }

    pub(crate) fn total_bytes(&self) -> usize {
        self.images
            .iter()
            .map(|r| match r.outcome {
                ImageOutcome::Downloaded { bytes } => bytes,
                ImageOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub(crate) fn failed(&self) -> impl Iterator<Item = &ImageResult> {
        self.images.iter().filter(|r| matches!(r.outcome, ImageOutcome::Failed { .. }))
    }
}

impl fmt::Display for RewriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.images.is_empty() {
            return write!(f, "未发现需要替换的图片");
        }
        write!(
            f,
            "共 {} 张图片，成功 {} 张（{} 字节）",
            self.images.len(),
            self.downloaded(),
            self.total_bytes()
        )?;
        for r in self.failed() {
            if let ImageOutcome::Failed { reason } = &r.outcome {
                write!(f, "\n⚠️ {} 下载失败（引用已替换但文件缺失）: {} -> {}", r.image.file_name(), r.image.url, reason)?;
            }
        }
        Ok(())
    }
}

/// 依次下载，单张失败不影响后续
pub(crate) fn download_images(images: &[PlannedImage], store_dir: &Path, fetcher: &dyn Fetch) -> Vec<ImageResult> {
    images
        .iter()
        .map(|image| {
            let outcome = match download_one(image, store_dir, fetcher) {
                Ok(bytes) => {
                    println!("✅ 图片已下载: {} -> {}", image.url, image.file_name());
                    ImageOutcome::Downloaded { bytes }
                }
                Err(e) => {
                    let reason = format!("{e:#}");
                    warn!(url = %image.url, index = image.index, error = %reason, "image download failed");
                    ImageOutcome::Failed { reason }
                }
            };
            ImageResult { image: image.clone(), outcome }
        })
        .collect()
}

fn download_one(image: &PlannedImage, store_dir: &Path, fetcher: &dyn Fetch) -> Result<usize> {
    let bytes = fetcher.fetch(&image.url)?;
    fs::create_dir_all(store_dir).with_context(|| format!("创建图片目录失败: {}", store_dir.display()))?;
    let path = store_dir.join(image.file_name());
    fs::write(&path, &bytes).with_context(|| format!("写入失败: {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "image stored");
    Ok(bytes.len())
}

/// 对文章执行完整的扫描 -> 下载 -> 替换 -> 回写
pub(crate) fn rewrite_post(post: &Path, store_dir: &Path, fetcher: &dyn Fetch) -> Result<RewriteReport> {
    let content = fs::read(post).with_context(|| format!("读取文章失败: {}", post.display()))?;
    let planned = plan_images(&content);
    debug!(count = planned.len(), "pasted images found");
    let images = download_images(&planned, store_dir, fetcher);
    let rebuilt = rewrite_content(&content, &planned);
    fs::write(post, rebuilt).with_context(|| format!("回写文章失败: {}", post.display()))?;
    Ok(RewriteReport { images })
}
