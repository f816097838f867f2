use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::models::{MediaKind, MediaResult, Platform, PolicyStatus};
use super::policy::{PolicyRegistry, SelectionPolicy};

lazy_static! {
    // 从 label 中解析分辨率，例如 "mp4 (1080p)" -> 1080
    static ref LABEL_HEIGHT: Regex = Regex::new(r"(\d{3,4})p\b").unwrap();
}

// 高度未知时使用的哨兵值，低于任何真实高度
const UNKNOWN_HEIGHT: i64 = -1;

// 一次扫描选出的最佳视频流和音频流
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Picks<'a> {
    pub video: Option<&'a Value>,
    pub audio: Option<&'a Value>,
}

/// 解析视频高度：优先使用整数 `height` 字段，否则从 `label` 中解析
pub fn parse_height(media: &Value) -> Option<i64> {
    if let Some(Value::Number(n)) = media.get("height") {
        if let Some(h) = n.as_i64() {
            return Some(h);
        }
        if n.is_u64() {
            return Some(i64::MAX);
        }
    }

    let label = media.get("label").and_then(Value::as_str).unwrap_or("");
    LABEL_HEIGHT
        .captures(label)
        .and_then(|caps| caps[1].parse::<i64>().ok())
}

/// 码率 (bit/s)，缺失或无法转换时返回 0
pub fn bitrate(media: &Value) -> i64 {
    match media.get("bitrate") {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().unwrap_or(0),
        Some(Value::Bool(b)) => i64::from(*b),
        _ => 0,
    }
}

/// 帧率，缺失或非数字时返回 0
pub fn fps(media: &Value) -> f64 {
    media.get("fps").and_then(Value::as_f64).unwrap_or(0.0)
}

fn ext(media: &Value) -> String {
    media
        .get("ext")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_lowercase()
}

/// 视频容器优先级：mp4 优先
pub fn ext_rank(media: &Value) -> u8 {
    if ext(media) == "mp4" { 0 } else { 1 }
}

/// 音频容器优先级：m4a > mp4 > webm > 其它
pub fn audio_ext_rank(media: &Value) -> u8 {
    match ext(media).as_str() {
        "m4a" => 0,
        "mp4" => 1,
        "webm" => 2,
        _ => 99,
    }
}

// 高度 -> 容器 -> 码率 -> 帧率，Greater 表示 candidate 更好
fn compare_video(candidate: &Value, best: &Value) -> Ordering {
    let height = |m: &Value| parse_height(m).unwrap_or(UNKNOWN_HEIGHT);

    height(candidate)
        .cmp(&height(best))
        .then_with(|| ext_rank(best).cmp(&ext_rank(candidate)))
        .then_with(|| bitrate(candidate).cmp(&bitrate(best)))
        .then_with(|| fps(candidate).partial_cmp(&fps(best)).unwrap_or(Ordering::Equal))
}

// 码率 -> 容器
fn compare_audio(candidate: &Value, best: &Value) -> Ordering {
    bitrate(candidate)
        .cmp(&bitrate(best))
        .then_with(|| audio_ext_rank(best).cmp(&audio_ext_rank(candidate)))
}

// 只有严格更好时才替换，完全相同保留先出现的
fn keep_better<'a>(
    best: Option<&'a Value>,
    candidate: &'a Value,
    compare: fn(&Value, &Value) -> Ordering,
) -> Option<&'a Value> {
    match best {
        Some(current) if compare(candidate, current) != Ordering::Greater => Some(current),
        _ => Some(candidate),
    }
}

/// 默认的排序策略：完整扫描一遍候选流，选出最佳视频和最佳音频
pub fn rank_streams(medias: &[Value]) -> Picks<'_> {
    let mut picks = Picks::default();

    for media in medias {
        match MediaKind::of(media) {
            MediaKind::Video => picks.video = keep_better(picks.video, media, compare_video),
            MediaKind::Audio => picks.audio = keep_better(picks.audio, media, compare_audio),
            MediaKind::Other => {}
        }
    }

    picks
}

fn medias_of(payload: &Value) -> &[Value] {
    payload
        .get("medias")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

pub struct StreamSelector {
    registry: PolicyRegistry,
}

impl Default for StreamSelector {
    fn default() -> Self {
        Self::new(PolicyRegistry::default())
    }
}

impl StreamSelector {
    pub fn new(registry: PolicyRegistry) -> Self {
        Self { registry }
    }

    /// 根据平台策略从 payload 中选出最佳流
    pub fn select(&self, payload: &Value, platform: &Platform) -> MediaResult {
        let medias = medias_of(payload);
        debug!("平台 {} 候选流数量: {}", platform, medias.len());

        let (picks, status) = match self.registry.resolve(platform) {
            (SelectionPolicy::Ranked(rank), status) => (rank(medias), status),
            (SelectionPolicy::Undefined, status) => (Picks::default(), status),
        };

        let result = MediaResult::assemble(payload, [picks.video, picks.audio], status);
        if status == PolicyStatus::Undefined {
            debug!("平台 {} 未定义选择策略", platform);
        } else {
            debug!("选择结果: {:?}", result.summary());
        }
        result
    }
}

/// 使用默认策略表选择最佳视频流和音频流
pub fn select_best_streams(payload: &Value, platform: &str) -> MediaResult {
    StreamSelector::default().select(payload, &Platform::from(platform))
}
