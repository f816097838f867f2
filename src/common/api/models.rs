use serde::Serialize;
use serde_json::Value;

// 代理接口请求体
#[derive(Debug, Serialize)]
pub struct ProxyRequest<'a> {
    pub platform: &'a str,
    pub url: &'a str,
}

// 只有 status == "success" 且带有 medias 的响应才做流选择
pub fn is_success_payload(data: &Value) -> bool {
    data.get("status").and_then(Value::as_str) == Some("success") && data.get("medias").is_some()
}
