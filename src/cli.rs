use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// fsmvid 代理接口
    Proxy,
    /// 本地 yt-dlp
    Ytdlp,
}

/// 社交媒体视频解析器
#[derive(Parser, Debug)]
#[command(name = "fsmdl")]
#[command(version = "0.1")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "解析社交媒体视频并选出最佳的视频流和音频流", long_about = None)]
pub struct Cli {
    /// 视频链接，可以同时传入多个
    #[arg(value_name = "URL", required = true)]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub urls: Vec<String>,

    /// 指定平台 (youtube/tiktok/douyin/facebook/...)，默认根据链接自动识别
    #[arg(long, value_name = "PLATFORM")]
    pub platform: Option<String>,

    /// 媒体信息来源
    #[arg(long, value_enum, default_value_t = SourceKind::Proxy)]
    pub source: SourceKind,

    /// 配置文件 (JSON)
    #[arg(long, value_name = "FILE")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// 代理接口地址
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// 请求超时时间（秒）
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// 并发数
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// 平台未定义策略时使用默认策略
    #[arg(long)]
    pub fallback_policy: bool,

    /// 以 JSON 格式输出结果
    #[arg(long)]
    pub json: bool,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}
