//! 外部进程执行：在指定工作目录运行命令，阻塞等待结束并捕获输出

use anyhow::{Context, Result};
use std::{ffi::OsStr, fmt, path::Path, process::Command};
use tracing::debug;

/// 一次外部命令执行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProcessOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    /// 退出码为 0
    pub(crate) success: bool,
    /// 被信号终止时为 None
    pub(crate) code: Option<i32>,
}

impl fmt::Display for ProcessOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stdout = self.stdout.trim_end();
        let stderr = self.stderr.trim_end();
        if !stdout.is_empty() {
            writeln!(f, "{}", stdout)?;
        }
        if !stderr.is_empty() {
            writeln!(f, "[stderr] {}", stderr)?;
        }
        match self.code {
            Some(c) => write!(f, "[exit] {}", c),
            None => write!(f, "[exit] 被信号终止"),
        }
    }
}

/// 运行 `program args...`，工作目录为 `dir`。
///
/// 无法启动进程（可执行文件不存在、无权限等）时返回 `Err`；
/// 进程正常结束（无论退出码）时返回捕获的输出。
pub(crate) fn run_in<I, S>(dir: &Path, program: &Path, args: I) -> Result<ProcessOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    debug!(?cmd, "spawning external command");
    let output = cmd
        .output()
        .with_context(|| format!("无法启动命令: {} (工作目录: {})", program.display(), dir.display()))?;
    let result = ProcessOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
        code: output.status.code(),
    };
    debug!(success = result.success, code = ?result.code, "external command finished");
    Ok(result)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_stdout_stderr_and_status() {
        let tmp = TempDir::new().unwrap();
        let out = run_in(tmp.path(), Path::new("sh"), ["-c", "echo hello; echo oops >&2; exit 3"]).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.stderr.trim(), "oops");
        assert!(!out.success);
        assert_eq!(out.code, Some(3));
    }

    #[test]
    fn runs_in_given_directory() {
        let tmp = TempDir::new().unwrap();
        let out = run_in(tmp.path(), Path::new("sh"), ["-c", "touch marker"]).unwrap();
        assert!(out.success);
        assert!(tmp.path().join("marker").exists());
    }

    #[test]
    fn missing_executable_is_spawn_error() {
        let tmp = TempDir::new().unwrap();
        let err = run_in(tmp.path(), &tmp.path().join("no-such-hexo"), ["new", "x"]).unwrap_err();
        assert!(err.to_string().contains("无法启动命令"));
    }

    #[test]
    fn display_includes_streams_and_exit() {
        let out = ProcessOutput { stdout: "INFO done\n".into(), stderr: String::new(), success: true, code: Some(0) };
        assert_eq!(out.to_string(), "INFO done\n[exit] 0");
    }
}
