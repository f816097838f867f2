use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::Parser;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use fsmvid_dl::common::{
    api::client::FsmvidClient,
    logger::PrettyLogger,
    source::{FetchOutcome, MediaSource, resolve},
    ytdlp::YtDlpExtractor,
};
use fsmvid_dl::config::AppConfig;
use fsmvid_dl::parser::{Platform, StreamSelector, detector};
use fsmvid_dl::{log_error, log_info, log_success};

mod cli;

/// 读取配置文件并用命令行参数覆盖
fn build_config(args: &cli::Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("加载配置文件失败: {}", path.display()))?,
        None => AppConfig::default(),
    };

    if let Some(base_url) = &args.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.api.timeout_secs = timeout;
        config.ytdlp.timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if args.fallback_policy {
        config.selector.fallback_to_default = true;
    }

    config.validate()?;
    debug!("配置: {:?}", config);
    Ok(config)
}

async fn create_source(args: &cli::Cli, config: &AppConfig) -> anyhow::Result<Arc<dyn MediaSource>> {
    match args.source {
        cli::SourceKind::Proxy => Ok(Arc::new(FsmvidClient::new(&config.api)?)),
        cli::SourceKind::Ytdlp => {
            let extractor = YtDlpExtractor::new(&config.ytdlp);
            if !extractor.is_available().await {
                warn!("未检测到可用的 yt-dlp: {}", config.ytdlp.binary);
            }
            Ok(Arc::new(extractor))
        }
    }
}

/// 处理单个链接
async fn process_url(
    source: &dyn MediaSource,
    selector: &StreamSelector,
    platform: Option<&str>,
    url: &str,
) -> anyhow::Result<FetchOutcome> {
    detector::parse_input_url(url)?;
    let platform = match platform {
        Some(name) => Platform::from(name),
        None => detector::detect_platform(url)?,
    };
    debug!("平台: {}", platform);

    Ok(resolve(source, selector, &platform, url).await?)
}

/// 所有链接的结果汇总成一个 JSON 数组，失败的链接带 error 字段
fn json_report(outcomes: &[(String, anyhow::Result<FetchOutcome>)]) -> serde_json::Result<Value> {
    let mut entries = Vec::with_capacity(outcomes.len());
    for (url, outcome) in outcomes {
        let entry = match outcome {
            Ok(FetchOutcome::Selected(result)) => json!({"url": url, "result": serde_json::to_value(result)?}),
            Ok(FetchOutcome::Raw(raw)) => json!({"url": url, "result": raw}),
            Err(e) => json!({"url": url, "error": format!("{:#}", e)}),
        };
        entries.push(entry);
    }
    Ok(Value::Array(entries))
}

fn print_outcome(outcome: &FetchOutcome) -> anyhow::Result<()> {
    match outcome {
        FetchOutcome::Selected(result) => {
            debug!("选择摘要: {:?}", result.summary());
            PrettyLogger::media_result(result);
        }
        FetchOutcome::Raw(raw) => {
            PrettyLogger::warning("接口返回了未识别的响应，原样输出");
            println!("{}", serde_json::to_string_pretty(raw)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // 初始化日志
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = build_config(&args)?;
    let selector = Arc::new(StreamSelector::new(config.registry()));
    let source = create_source(&args, &config).await?;
    info!("使用来源 {} 解析 {} 个链接", source.name(), args.urls.len());

    let outcomes = stream::iter(args.urls.iter().cloned())
        .map(|url| {
            let source = Arc::clone(&source);
            let selector = Arc::clone(&selector);
            let platform = args.platform.clone();
            async move {
                let outcome = process_url(source.as_ref(), &selector, platform.as_deref(), &url).await;
                (url, outcome)
            }
        })
        .buffered(config.concurrency)
        .collect::<Vec<_>>()
        .await;

    let total = outcomes.len();
    let mut failed = 0;
    for (url, outcome) in &outcomes {
        match outcome {
            Ok(outcome) if !args.json => print_outcome(outcome)?,
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                error!("解析失败 {}: {:#}", url, e);
                if !args.json {
                    log_error!("{}: {:#}", url, e);
                }
            }
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&json_report(&outcomes)?)?);
    }

    if failed == total {
        return Err(anyhow!("全部 {} 个链接解析失败", total));
    }
    if !args.json {
        if failed > 0 {
            log_info!("{} 个成功，{} 个失败", total - failed, failed);
        } else {
            log_success!("{}", "解析完成！".green());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fsmvid_dl::select_best_streams;

    #[test]
    fn test_json_report_is_single_array() {
        let payload = json!({"title": "T", "medias": [{"type": "audio", "ext": "m4a", "bitrate": 1}]});
        let outcomes = vec![
            (
                "https://youtu.be/a".to_string(),
                Ok(FetchOutcome::Selected(select_best_streams(&payload, "youtube"))),
            ),
            (
                "https://youtu.be/b".to_string(),
                Ok(FetchOutcome::Raw(json!({"status": "error"}))),
            ),
            ("ftp://bad".to_string(), Err(anyhow!("无效的URL"))),
        ];

        let report = json_report(&outcomes).unwrap();
        let text = serde_json::to_string_pretty(&report).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();

        let entries = parsed.as_array().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["result"]["cnt"], 1);
        assert_eq!(entries[1]["result"]["status"], "error");
        assert_eq!(entries[2]["url"], "ftp://bad");
        assert_eq!(entries[2]["error"], "无效的URL");
    }
}
