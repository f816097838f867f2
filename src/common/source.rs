use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::api::{client::FsmvidClient, error::ApiError, models::is_success_payload};
use super::ytdlp::{ExtractError, YtDlpExtractor};
use crate::parser::{MediaResult, Platform, StreamSelector};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

// 一次获取的结果：选出的流，或者无法识别的原始响应
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Selected(MediaResult),
    Raw(Value),
}

impl FetchOutcome {
    pub fn from_payload(data: Value, platform: &Platform, selector: &StreamSelector) -> Self {
        if is_success_payload(&data) {
            Self::Selected(selector.select(&data, platform))
        } else {
            debug!("响应不是预期的格式，原样返回");
            Self::Raw(data)
        }
    }
}

/// 媒体信息来源：返回与代理接口同结构的 payload
#[async_trait]
pub trait MediaSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, platform: &Platform, url: &str) -> Result<Value, SourceError>;
}

#[async_trait]
impl MediaSource for FsmvidClient {
    fn name(&self) -> &'static str {
        "fsmvid"
    }

    async fn fetch(&self, platform: &Platform, url: &str) -> Result<Value, SourceError> {
        Ok(self.fetch_raw(platform, url).await?)
    }
}

#[async_trait]
impl MediaSource for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, _platform: &Platform, url: &str) -> Result<Value, SourceError> {
        let info = self.dump_json(url).await?;
        Ok(YtDlpExtractor::normalize(&info, url))
    }
}

/// 从来源获取 payload 并按平台策略选流
pub async fn resolve(
    source: &dyn MediaSource,
    selector: &StreamSelector,
    platform: &Platform,
    url: &str,
) -> Result<FetchOutcome, SourceError> {
    debug!("使用来源 {} 获取: {}", source.name(), url);
    let data = source.fetch(platform, url).await?;
    Ok(FetchOutcome::from_payload(data, platform, selector))
}
