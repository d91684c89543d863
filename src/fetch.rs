//! 图片下载：按 URL 获取原始字节

use anyhow::{bail, Context, Result};
use std::{io::Read, time::Duration};
use url::Url;

/// 获取某个 URL 的全部内容
pub(crate) trait Fetch {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// 基于 ureq 的 HTTP GET 实现
pub(crate) struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub(crate) fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, user_agent: user_agent.into() }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let parsed = parse_http_url(url)?;
        let resp = ensure_success(self.agent.request_url("GET", &parsed).set("User-Agent", &self.user_agent).call(), url)?;
        let mut buf: Vec<u8> = Vec::new();
        resp.into_reader()
            .read_to_end(&mut buf)
            .with_context(|| format!("读取响应失败: {}", url))?;
        Ok(buf)
    }
}

/// 仅接受 http/https 绝对地址
pub(crate) fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).with_context(|| format!("图片地址格式错误: {}", url))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => bail!("不支持的协议 {}: {}", other, url),
    }
}

fn ensure_success(resp: Result<ureq::Response, ureq::Error>, url: &str) -> Result<ureq::Response> {
    match resp {
        Ok(r) => Ok(r),
        Err(e) => bail!("HTTP 请求失败 {}: {}", url, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::Write,
        net::TcpListener,
        thread::{self, JoinHandle},
    };

    /// 在 127.0.0.1 上应答一次请求；线程返回收到的请求头
    fn serve_once(head: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/img.png", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut req = Vec::new();
            let mut buf = [0u8; 1024];
            while !req.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                req.extend_from_slice(&buf[..n]);
            }
            let resp = format!("{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", head, body.len());
            stream.write_all(resp.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
            String::from_utf8_lossy(&req).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn fetch_returns_exact_body_and_sends_user_agent() {
        let body: &'static [u8] = &[0x89, b'P', b'N', b'G', 0x00, 0xFF, 0x10];
        let (url, server) = serve_once("HTTP/1.1 200 OK", body);
        let f = HttpFetcher::new("hexopub-test/1.0", Duration::from_secs(5));

        let got = f.fetch(&url).unwrap();

        assert_eq!(got, body);
        let request = server.join().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /img.png "), "{request}");
        assert!(request.contains("user-agent: hexopub-test/1.0"), "{request}");
    }

    #[test]
    fn non_2xx_status_is_an_error() {
        let (url, server) = serve_once("HTTP/1.1 404 Not Found", b"");
        let f = HttpFetcher::new("hexopub-test/1.0", Duration::from_secs(5));

        let err = f.fetch(&url).unwrap_err();

        assert!(err.to_string().contains("HTTP 请求失败"), "{err}");
        server.join().unwrap();
    }

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_http_url("https://cdn.example.com/a.png").is_ok());
        assert!(parse_http_url(" http://example.com/b.png?x=1 ").is_ok());
    }

    #[test]
    fn rejects_malformed_and_other_schemes() {
        assert!(parse_http_url("not a url").is_err());
        assert!(parse_http_url("/relative/path.png").is_err());
        let err = parse_http_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("不支持的协议"));
    }

    #[test]
    fn fetcher_surfaces_malformed_url_without_network() {
        let f = HttpFetcher::new("hexopub-test", Duration::from_secs(1));
        assert!(f.fetch("::nope::").is_err());
    }
}
