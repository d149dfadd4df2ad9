use sentiment_core::{CoreError, YoutubeError};
use std::fmt;
use url::Url;

const VIDEO_ID_LEN: usize = 11;

/// A validated 11-character YouTube video ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts a bare ID or any of the common watch/share/shorts/embed URL forms.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput {
                message: "video URL is empty".to_string(),
            });
        }

        if is_valid_id(trimmed) {
            return Ok(Self(trimmed.to_string()));
        }

        let with_scheme = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        Url::parse(&with_scheme)
            .ok()
            .and_then(|url| id_from_url(&url))
            .map(Self)
            .ok_or_else(|| {
                YoutubeError::InvalidVideoUrl {
                    input: trimmed.to_string(),
                }
                .into()
            })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_valid_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next() {
                Some("watch") => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("shorts") | Some("embed") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => None,
    }?;

    is_valid_id(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_url_forms() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://music.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?feature=shared",
            "  https://youtu.be/dQw4w9WgXcQ  ",
        ];

        for input in inputs {
            let id = VideoId::parse(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(id.as_str(), "dQw4w9WgXcQ", "input: {input}");
        }
    }

    #[test]
    fn test_rejects_foreign_and_malformed() {
        for input in [
            "https://vimeo.com/123456789",
            "https://www.youtube.com/channel/UC123",
            "https://www.youtube.com/watch?v=short",
            "not a url at all",
        ] {
            let err = VideoId::parse(input).unwrap_err();
            assert!(
                matches!(err, CoreError::Youtube(YoutubeError::InvalidVideoUrl { .. })),
                "input: {input}"
            );
        }
    }

    #[test]
    fn test_empty_input() {
        let err = VideoId::parse("   ").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }
}
