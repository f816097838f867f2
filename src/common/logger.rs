use colored::*;
use serde_json::Value;

use crate::parser::{MediaResult, PolicyStatus, stream_selector, utils::FormatTool};

/// 漂亮的日志输出工具
pub struct PrettyLogger;

impl PrettyLogger {
    /// 显示成功消息
    pub fn success(message: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), message.as_ref());
    }

    /// 显示信息消息
    pub fn info(message: impl AsRef<str>) {
        println!("{} {}", "ℹ".blue().bold(), message.as_ref());
    }

    /// 显示警告消息
    pub fn warning(message: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow().bold(), message.as_ref());
    }

    /// 显示错误消息
    pub fn error(message: impl AsRef<str>) {
        println!("{} {}", "✗".red().bold(), message.as_ref());
    }

    /// 显示分割线
    pub fn separator() {
        println!("{}", "─".repeat(50).bright_black());
    }

    /// 显示标题
    pub fn title(text: impl AsRef<str>) {
        let text = text.as_ref();
        let width = text.chars().count();
        let padding = 48usize.saturating_sub(width) / 2;
        let rest = 48usize.saturating_sub(width + padding);
        println!(
            "{} {} {}",
            "─".repeat(padding).bright_black(),
            text.bold(),
            "─".repeat(rest).bright_black()
        );
    }

    /// 显示选中的视频流
    pub fn video_stream(media: &Value) {
        let height = stream_selector::parse_height(media)
            .map(|h| format!("{}p", h))
            .unwrap_or_else(|| "未知分辨率".to_string());
        println!(
            "{} {} {} {} {:.0}fps",
            "🎬".magenta().bold(),
            height.bold(),
            describe_ext(media).cyan(),
            FormatTool::format_bitrate(stream_selector::bitrate(media)),
            stream_selector::fps(media)
        );
    }

    /// 显示选中的音频流
    pub fn audio_stream(media: &Value) {
        println!(
            "{} {} {}",
            "🎵".magenta().bold(),
            describe_ext(media).cyan(),
            FormatTool::format_bitrate(stream_selector::bitrate(media))
        );
    }

    /// 显示一次选择的完整结果
    pub fn media_result(result: &MediaResult) {
        let title = result.title.as_str().unwrap_or("(无标题)");
        Self::title(title);
        if let Some(url) = result.url.as_str() {
            Self::info(format!("链接: {}", url));
        }
        Self::info(format!("时长: {}", FormatTool::format_duration(&result.duration)));

        match result.policy {
            PolicyStatus::Undefined => Self::warning("该平台尚未定义选流策略"),
            PolicyStatus::Fallback => Self::warning("该平台未定义选流策略，已使用默认策略"),
            PolicyStatus::Applied => {}
        }

        if let Some(video) = result.video() {
            Self::video_stream(video);
        }
        if let Some(audio) = result.audio() {
            Self::audio_stream(audio);
        }
        if result.count == 0 && result.policy != PolicyStatus::Undefined {
            Self::warning("没有找到可用的音视频流");
        }
        Self::separator();
    }
}

fn describe_ext(media: &Value) -> String {
    media
        .get("ext")
        .and_then(Value::as_str)
        .unwrap_or("?")
        .to_lowercase()
}

/// 便捷宏用于漂亮的日志输出
#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::success(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::info(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warning {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::warning(format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::common::logger::PrettyLogger::error(format!($($arg)*))
    };
}
