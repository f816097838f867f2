use std::time::Duration;

use reqwest::{
    Client, ClientBuilder, Response, Url,
    header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT},
};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{error::ApiError, models::ProxyRequest};
use crate::config::ApiConfig;
use crate::parser::Platform;

/// fsmvid 代理接口客户端，由调用方创建并显式传递
#[derive(Debug, Clone)]
pub struct FsmvidClient {
    inner: Client,
    base_url: Url,
    proxy_url: Url,
}

impl FsmvidClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let headers = Self::default_headers(config)?;

        let inner = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner,
            base_url: config.base()?,
            proxy_url: config.proxy_url()?,
        })
    }

    pub fn default_headers(config: &ApiConfig) -> Result<HeaderMap, ApiError> {
        let value = |v: &str| {
            HeaderValue::from_str(v).map_err(|e| ApiError::InvalidConfig(format!("请求头 {}: {}", v, e)))
        };

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, value(&config.user_agent)?);
        headers.insert(ORIGIN, value(&config.origin()?)?);
        headers.insert(REFERER, value(config.base()?.as_str())?);
        Ok(headers)
    }

    pub fn proxy_url(&self) -> &Url {
        &self.proxy_url
    }

    // 先访问首页，失败也不影响后续请求
    async fn warm_up(&self) {
        match self.inner.get(self.base_url.clone()).send().await {
            Ok(resp) => debug!("首页预热状态: {}", resp.status()),
            Err(e) => warn!("首页预热失败，忽略: {}", e),
        }
    }

    /// 调用代理接口，返回原始 JSON
    pub async fn fetch_raw(&self, platform: &Platform, url: &str) -> Result<Value, ApiError> {
        self.warm_up().await;

        info!("请求代理接口: platform={}, url={}", platform, url);
        let body = ProxyRequest {
            platform: platform.as_str(),
            url,
        };
        let resp = self
            .inner
            .post(self.proxy_url.clone())
            .json(&body)
            .send()
            .await?;

        Self::handle_response(resp).await
    }

    async fn handle_response(resp: Response) -> Result<Value, ApiError> {
        let status = resp.status();
        if status.is_server_error() {
            return Err(ApiError::RetryLater);
        }

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16(), text));
        }

        serde_json::from_str::<Value>(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("解析响应失败: {}. 原始响应: {}", e, text))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::source::FetchOutcome;
    use crate::parser::StreamSelector;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    // 读取完整请求（请求头 + Content-Length 指定的请求体）
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    async fn write_response(socket: &mut TcpStream, status: &str, body: &str) {
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    // 本地假代理：首页预热可以直接断开，/api/proxy 返回固定响应
    async fn spawn_proxy(warm_up_ok: bool, status: &'static str, body: &'static str) -> ApiConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    if request.starts_with("GET") {
                        if warm_up_ok {
                            write_response(&mut socket, "200 OK", "{}").await;
                        }
                        return;
                    }
                    assert!(request.starts_with("POST /api/proxy"), "{}", request);
                    write_response(&mut socket, status, body).await;
                });
            }
        });

        ApiConfig {
            base_url: format!("http://{}/", addr),
            timeout_secs: 5,
            connect_timeout_secs: 5,
            ..ApiConfig::default()
        }
    }

    async fn fetch(config: &ApiConfig) -> Result<Value, ApiError> {
        let client = FsmvidClient::new(config).unwrap();
        client.fetch_raw(&Platform::Youtube, "https://youtu.be/x").await
    }

    #[test]
    fn test_default_headers() {
        let headers = FsmvidClient::default_headers(&ApiConfig::default()).unwrap();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[USER_AGENT], "fsmvid-client/1.0");
        assert_eq!(headers[ORIGIN], "https://fsmvid.com");
        assert_eq!(headers[REFERER], "https://fsmvid.com/");
    }

    #[test]
    fn test_invalid_user_agent() {
        let config = ApiConfig {
            user_agent: "bad\nagent".to_string(),
            ..ApiConfig::default()
        };
        assert!(matches!(
            FsmvidClient::default_headers(&config),
            Err(ApiError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_new_client() {
        let client = FsmvidClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(client.proxy_url().as_str(), "https://fsmvid.com/api/proxy");
    }

    #[tokio::test]
    async fn test_server_error_maps_to_retry_later() {
        let config = spawn_proxy(true, "503 Service Unavailable", "busy").await;
        assert!(matches!(fetch(&config).await, Err(ApiError::RetryLater)));
    }

    #[tokio::test]
    async fn test_client_error_maps_to_status() {
        let config = spawn_proxy(true, "404 Not Found", "missing").await;
        match fetch(&config).await {
            Err(ApiError::Status(code, body)) => {
                assert_eq!(code, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("期望 Status 错误: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_maps_to_invalid_response() {
        let config = spawn_proxy(true, "200 OK", "<html>oops</html>").await;
        assert!(matches!(fetch(&config).await, Err(ApiError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_failed_warm_up_is_ignored() {
        let config = spawn_proxy(
            false,
            "200 OK",
            r#"{"status":"success","title":"T","medias":[{"type":"video","height":720,"ext":"webm"},{"type":"video","height":1080,"ext":"mp4"},{"type":"audio","ext":"m4a","bitrate":128000}]}"#,
        )
        .await;

        let data = fetch(&config).await.unwrap();
        let outcome = FetchOutcome::from_payload(data, &Platform::Youtube, &StreamSelector::default());
        match outcome {
            FetchOutcome::Selected(result) => {
                assert_eq!(result.count, 2);
                assert_eq!(result.video().unwrap()["height"], 1080);
                assert_eq!(result.title, "T");
            }
            FetchOutcome::Raw(raw) => panic!("期望选出流: {}", raw),
        }
    }
}
