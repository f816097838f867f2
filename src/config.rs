use std::path::Path;

use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::parser::policy::PolicyRegistry;

pub const FSMVID_BASE_URL: &str = "https://fsmvid.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置文件格式错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("无效的配置: {0}")]
    Invalid(String),
}

// 代理接口配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: FSMVID_BASE_URL.to_string(),
            timeout_secs: 15,
            connect_timeout_secs: 10,
            user_agent: "fsmvid-client/1.0".to_string(),
        }
    }
}

impl ApiConfig {
    pub fn base(&self) -> Result<Url, ConfigError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(ConfigError::Invalid(format!("base_url 不支持的协议: {}", scheme))),
        }
    }

    pub fn proxy_url(&self) -> Result<Url, ConfigError> {
        self.base()?
            .join("api/proxy")
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))
    }

    // Origin 头不带结尾的斜杠
    pub fn origin(&self) -> Result<String, ConfigError> {
        Ok(self.base()?.as_str().trim_end_matches('/').to_string())
    }
}

// yt-dlp 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YtDlpConfig {
    pub binary: String,
    pub timeout_secs: u64,
}

impl Default for YtDlpConfig {
    fn default() -> Self {
        Self {
            binary: "yt-dlp".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub fallback_to_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ytdlp: YtDlpConfig,
    pub selector: SelectorConfig,
    pub concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            ytdlp: YtDlpConfig::default(),
            selector: SelectorConfig::default(),
            concurrency: 3,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置，缺失的字段使用默认值
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.base()?;
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency 必须大于 0".to_string()));
        }
        if self.api.timeout_secs == 0 || self.ytdlp.timeout_secs == 0 {
            return Err(ConfigError::Invalid("超时时间必须大于 0".to_string()));
        }
        if self.ytdlp.binary.trim().is_empty() {
            return Err(ConfigError::Invalid("ytdlp.binary 不能为空".to_string()));
        }
        Ok(())
    }

    pub fn registry(&self) -> PolicyRegistry {
        PolicyRegistry::default().with_fallback(self.selector.fallback_to_default)
    }
}
