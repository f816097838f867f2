use super::{errors::ParseError, models::Platform};
use url::Url;

// 只接受 http/https 链接
pub fn parse_input_url(input: &str) -> Result<Url, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::InvalidUrl("空链接".to_string()));
    }

    let url = Url::parse(input)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ParseError::InvalidUrl(format!("不支持的协议: {}", scheme))),
    }
}

pub fn detect_platform(input: &str) -> Result<Platform, ParseError> {
    let url = parse_input_url(input)?;
    let host = url
        .host_str()
        .ok_or_else(|| ParseError::InvalidUrl(input.to_string()))?
        .to_lowercase();

    let matches = |domain: &str| host == domain || host.ends_with(&format!(".{}", domain));

    if matches("youtube.com") || matches("youtu.be") {
        Ok(Platform::Youtube)
    } else if matches("tiktok.com") {
        Ok(Platform::Tiktok)
    } else if matches("douyin.com") || matches("iesdouyin.com") {
        Ok(Platform::Douyin)
    } else if matches("facebook.com") || matches("fb.watch") {
        Ok(Platform::Facebook)
    } else if host.split('.').any(|label| label == "pinterest") || matches("pin.it") {
        Ok(Platform::Other("pinterest".to_string()))
    } else {
        Err(ParseError::UnsupportedPlatform(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_platform() {
        let cases = [
            ("https://www.youtube.com/watch?v=hNhQoVwXJCc&index=6", Platform::Youtube),
            ("https://youtu.be/hNhQoVwXJCc", Platform::Youtube),
            ("https://m.youtube.com/shorts/abc", Platform::Youtube),
            ("https://www.tiktok.com/@user/video/1", Platform::Tiktok),
            ("https://v.douyin.com/fY3CVGSTxz0/", Platform::Douyin),
            ("https://www.facebook.com/watch?v=1", Platform::Facebook),
            ("https://fb.watch/abc/", Platform::Facebook),
            (
                "https://www.pinterest.com/pin/14636767535799685/",
                Platform::Other("pinterest".to_string()),
            ),
        ];

        for (url, expected) in cases {
            assert_eq!(detect_platform(url).unwrap(), expected, "{}", url);
        }
    }

    #[test]
    fn test_rejects_lookalike_hosts() {
        assert!(matches!(
            detect_platform("https://notyoutube.com/watch?v=1"),
            Err(ParseError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            detect_platform("https://example.com/video"),
            Err(ParseError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(parse_input_url(""), Err(ParseError::InvalidUrl(_))));
        assert!(matches!(parse_input_url("not a url"), Err(ParseError::InvalidUrl(_))));
        assert!(matches!(
            parse_input_url("ftp://youtube.com/file"),
            Err(ParseError::InvalidUrl(_))
        ));
        assert!(parse_input_url("  https://youtu.be/x  ").is_ok());
    }
}
