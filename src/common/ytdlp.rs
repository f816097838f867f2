use std::time::Duration;

use serde_json::{Map, Value, json};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::YtDlpConfig;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("无法启动 yt-dlp: {0}")]
    Io(#[from] std::io::Error),
    #[error("yt-dlp 执行超时 ({0} 秒)")]
    Timeout(u64),
    #[error("yt-dlp 执行失败: {0}")]
    Failed(String),
    #[error("yt-dlp 输出无法解析: {0}")]
    InvalidOutput(String),
}

/// 通过 yt-dlp 命令行提取媒体信息
#[derive(Debug, Clone)]
pub struct YtDlpExtractor {
    binary: String,
    timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(config: &YtDlpConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    pub async fn dump_json(&self, url: &str) -> Result<Value, ExtractError> {
        info!("使用 yt-dlp 提取信息: {}", url);

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(&self.binary)
                .arg("--dump-json")
                .arg("--no-download")
                .arg("--no-warnings")
                .arg(url)
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ExtractError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Failed(error.trim().to_string()));
        }

        serde_json::from_slice(&output.stdout).map_err(|e| ExtractError::InvalidOutput(e.to_string()))
    }

    /// 把 yt-dlp 的输出转换成代理接口的 payload 结构
    pub fn normalize(info: &Value, url: &str) -> Value {
        let medias: Vec<Value> = info
            .get("formats")
            .and_then(Value::as_array)
            .map(|formats| formats.iter().filter_map(normalize_format).collect())
            .unwrap_or_default();
        debug!("yt-dlp 可用格式数量: {}", medias.len());

        let page_url = info
            .get("webpage_url")
            .or_else(|| info.get("original_url"))
            .cloned()
            .unwrap_or_else(|| Value::String(url.to_string()));
        let field = |key: &str| info.get(key).cloned().unwrap_or(Value::Null);

        json!({
            "status": "success",
            "title": field("title"),
            "url": page_url,
            "thumbnail": field("thumbnail"),
            "duration": field("duration"),
            "medias": medias,
        })
    }
}

// 编码字段为 "none" 表示没有该轨道
fn has_track(format: &Value, key: &str) -> Option<bool> {
    format
        .get(key)
        .and_then(Value::as_str)
        .map(|codec| codec != "none")
}

// 单位 kbit/s -> bit/s
fn kbps_to_bps(value: Option<&Value>) -> Option<i64> {
    value
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| (v * 1000.0).round() as i64)
}

fn normalize_format(format: &Value) -> Option<Value> {
    let has_video = has_track(format, "vcodec");
    let has_audio = has_track(format, "acodec");

    let kind = match (has_video, has_audio) {
        (Some(true), _) => "video",
        (None, _) if format.get("height").is_some_and(|h| !h.is_null()) => "video",
        (_, Some(true)) => "audio",
        _ => return None,
    };

    let bitrate = if kind == "audio" {
        kbps_to_bps(format.get("abr")).or_else(|| kbps_to_bps(format.get("tbr")))
    } else {
        kbps_to_bps(format.get("tbr")).or_else(|| kbps_to_bps(format.get("vbr")))
    };
    let label = format
        .get("format_note")
        .and_then(Value::as_str)
        .or_else(|| format.get("format").and_then(Value::as_str));

    let mut media = Map::new();
    media.insert("type".to_string(), json!(kind));
    for key in ["format_id", "url", "ext", "height", "fps"] {
        if let Some(value) = format.get(key).filter(|v| !v.is_null()) {
            media.insert(key.to_string(), value.clone());
        }
    }
    if let Some(label) = label {
        media.insert("label".to_string(), json!(label));
    }
    if let Some(bitrate) = bitrate {
        media.insert("bitrate".to_string(), json!(bitrate));
    }

    Some(Value::Object(media))
}
