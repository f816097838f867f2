use serde::Serialize;
use serde_derive::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::stream_selector;

// 来源平台
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    Youtube,
    Tiktok,
    Douyin,
    Facebook,
    Other(String), // 其他平台，例如 pinterest
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Douyin => "douyin",
            Self::Facebook => "facebook",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        let name = value.trim().to_lowercase();
        match name.as_str() {
            "youtube" => Self::Youtube,
            "tiktok" => Self::Tiktok,
            "douyin" => Self::Douyin,
            "facebook" => Self::Facebook,
            _ => Self::Other(name),
        }
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// 流类型，只关心 video 和 audio，其它值忽略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Other,
}

impl MediaKind {
    pub fn of(media: &Value) -> Self {
        match media.get("type").and_then(Value::as_str) {
            Some("video") => Self::Video,
            Some("audio") => Self::Audio,
            _ => Self::Other,
        }
    }
}

// 策略执行状态，用于区分“没有候选流”和“平台没有实现策略”
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    #[default]
    Applied, // 使用了平台自己的策略
    Fallback,  // 平台未定义策略，退回默认策略
    Undefined, // 平台未定义策略，未做选择
}

/// 选择结果。
///
/// 序列化后的键与远端接口保持一致：`title`、`url`、`thumbnail`、`duration`、
/// `cnt`、`medias`。`policy` 只在进程内使用，不参与序列化。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResult {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub url: Value,
    #[serde(default)]
    pub thumbnail: Value,
    #[serde(default)]
    pub duration: Value,
    #[serde(rename = "cnt")]
    pub count: usize,
    #[serde(rename = "medias", default)]
    pub media: Vec<Value>,
    #[serde(skip)]
    pub policy: PolicyStatus,
}

impl MediaResult {
    /// 按 payload 的元数据构造结果，`picked` 中的 `None` 会被丢弃
    pub fn assemble(payload: &Value, picked: [Option<&Value>; 2], policy: PolicyStatus) -> Self {
        let media: Vec<Value> = picked.into_iter().flatten().cloned().collect();
        let field = |key: &str| payload.get(key).cloned().unwrap_or(Value::Null);

        Self {
            title: field("title"),
            url: field("url"),
            thumbnail: field("thumbnail"),
            duration: field("duration"),
            count: media.len(),
            media,
            policy,
        }
    }

    pub fn video(&self) -> Option<&Value> {
        self.media
            .iter()
            .find(|m| MediaKind::of(m) == MediaKind::Video)
    }

    pub fn audio(&self) -> Option<&Value> {
        self.media
            .iter()
            .find(|m| MediaKind::of(m) == MediaKind::Audio)
    }

    pub fn summary(&self) -> PickSummary {
        let video = self.video();
        let audio = self.audio();
        PickSummary {
            video_height: video.and_then(stream_selector::parse_height),
            video_bitrate: video.map(stream_selector::bitrate),
            video_fps: video.map(stream_selector::fps),
            audio_bitrate: audio.map(stream_selector::bitrate),
        }
    }
}

// 选中流的关键指标，方便日志和命令行输出
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PickSummary {
    pub video_height: Option<i64>,
    pub video_bitrate: Option<i64>,
    pub video_fps: Option<f64>,
    pub audio_bitrate: Option<i64>,
}
