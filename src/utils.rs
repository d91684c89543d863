//! 通用辅助函数：
//! - 环境变量读取与解析
//! - 标准输入提示

use anyhow::{bail, Context, Result};
use std::{
    env,
    io::{BufRead, Write},
    path::PathBuf,
};

/// 可选读取 PATH 环境变量为 PathBuf。
pub(crate) fn env_opt_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).filter(|v| !v.is_empty()).map(PathBuf::from)
}

/// 可选读取 String 环境变量。
pub(crate) fn env_opt_string(key: &str) -> Option<String> {
    env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// 读取布尔环境变量的真值（1/true/on/yes/y）。
pub(crate) fn env_bool_truthy(key: &str) -> Option<bool> {
    env::var(key).ok().map(|v| parse_truthy(&v))
}

fn parse_truthy(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on" | "yes" | "y")
}

/// 打印提示并读取一行输入（去除首尾空白）。空行或 EOF 视为错误。
pub(crate) fn prompt_line<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<String> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context("读取标准输入失败")?;
    if n == 0 {
        bail!("输入已结束，未读取到: {}", label.trim_end_matches(['：', ':', ' ']));
    }
    let value = line.trim().to_string();
    if value.is_empty() {
        bail!("输入不能为空: {}", label.trim_end_matches(['：', ':', ' ']));
    }
    Ok(value)
}
