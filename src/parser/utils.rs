use serde_json::Value;

pub struct FormatTool;

impl FormatTool {
    // 格式化时长（秒），缺失时返回 --:--
    pub fn format_duration(duration: &Value) -> String {
        let duration = match duration {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(duration) = duration.filter(|d| d.is_finite() && *d >= 0.0) else {
            return "--:--".to_string();
        };

        let total = duration.round() as u64;
        let hours = total / 3600;
        let mins = (total % 3600) / 60;
        let secs = total % 60;

        if hours != 0 {
            format!("{:02}:{:02}:{:02}", hours, mins, secs)
        } else {
            format!("{:02}:{:02}", mins, secs)
        }
    }

    // 格式化码率（bit/s）
    pub fn format_bitrate(bitrate: i64) -> String {
        let bitrate = bitrate.max(0) as f64;
        if bitrate >= 1_000_000.0 {
            format!("{:.1} mbps", bitrate / 1_000_000.0)
        } else {
            format!("{:.1} kbps", bitrate / 1_000.0)
        }
    }
}
