//! Parsing of the watch page and of InnerTube continuation responses.
//!
//! Everything here is pure JSON/HTML inspection so the paging logic in
//! [`crate::api`] can be tested without a network.

use once_cell::sync::Lazy;
use regex::Regex;
use sentiment_core::{CoreError, YoutubeError};
use serde_json::Value;

static YT_CFG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"ytcfg\.set\s*\(\s*(\{.+?\})\s*\)\s*;").expect("ytcfg pattern is valid")
});

static YT_INITIAL_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:window\s*\[\s*["']ytInitialData["']\s*\]|ytInitialData)\s*=\s*(\{.+?\})\s*;\s*(?:var\s+meta|</script|\n)"#,
    )
    .expect("ytInitialData pattern is valid")
});

/// Continuation targets that page through top-level comments.
const COMMENT_SECTION_TARGETS: [&str; 3] = [
    "comments-section",
    "engagement-panel-comments-section",
    "shorts-engagement-panel-comments-section",
];

const REPLIES_TARGET_PREFIX: &str = "comment-replies-item";

/// The merged `ytcfg.set({...})` blob that carries the InnerTube key and client context.
pub fn extract_ytcfg(html: &str) -> Result<Value, CoreError> {
    let mut merged = serde_json::Map::new();

    for captures in YT_CFG_RE.captures_iter(html) {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&captures[1]) {
            merged.extend(map);
        }
    }

    if !merged.contains_key("INNERTUBE_API_KEY") || !merged.contains_key("INNERTUBE_CONTEXT") {
        return Err(YoutubeError::PageParseFailed {
            details: "ytcfg with INNERTUBE_API_KEY/INNERTUBE_CONTEXT not found".to_string(),
        }
        .into());
    }

    Ok(Value::Object(merged))
}

pub fn extract_initial_data(html: &str) -> Result<Value, CoreError> {
    let captures = YT_INITIAL_DATA_RE
        .captures(html)
        .ok_or_else(|| YoutubeError::PageParseFailed {
            details: "ytInitialData not found".to_string(),
        })?;

    serde_json::from_str(&captures[1]).map_err(|e| {
        YoutubeError::PageParseFailed {
            details: format!("ytInitialData is not valid JSON: {}", e),
        }
        .into()
    })
}

/// Every value stored under `key` anywhere in `root`, in document order.
///
/// Matched values are not searched further.
pub fn search_dict<'a>(root: &'a Value, key: &str) -> Vec<&'a Value> {
    let mut found = Vec::new();
    let mut stack = vec![root];

    while let Some(current) = stack.pop() {
        match current {
            Value::Object(map) => {
                let mut children = Vec::with_capacity(map.len());
                for (k, v) in map {
                    if k == key {
                        found.push(v);
                    } else {
                        children.push(v);
                    }
                }
                stack.extend(children.into_iter().rev());
            }
            Value::Array(items) => stack.extend(items.iter().rev()),
            _ => {}
        }
    }

    found
}

/// The sort menu entries offered by the comment header, if any.
pub fn sort_menu(data: &Value) -> Vec<Value> {
    search_dict(data, "sortFilterSubMenuRenderer")
        .first()
        .and_then(|renderer| renderer.get("subMenuItems"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Whether the watch page has a loadable comment section.
///
/// The first `itemSectionRenderer` is the comment section. When comments are
/// turned off it only holds a message, with no continuation to load.
pub fn has_comment_section(data: &Value) -> bool {
    search_dict(data, "itemSectionRenderer")
        .first()
        .is_some_and(|section| !search_dict(section, "continuationItemRenderer").is_empty())
}

/// First continuation endpoint inside the first `sectionListRenderer`.
///
/// Used when the watch page does not embed the sort menu directly.
pub fn section_list_continuation(data: &Value) -> Option<Value> {
    let section_list = search_dict(data, "sectionListRenderer").into_iter().next()?;
    search_dict(section_list, "continuationEndpoint")
        .into_iter()
        .next()
        .cloned()
}

/// Returns `Err` when the response carries a platform-side error message.
pub fn check_platform_error(response: &Value) -> Result<(), CoreError> {
    match search_dict(response, "externalErrorMessage").first() {
        Some(message) => Err(YoutubeError::Platform {
            message: message
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| message.to_string()),
        }
        .into()),
        None => Ok(()),
    }
}

/// Continuations discovered in a response, split by where they go on the paging stack.
#[derive(Debug, Default)]
pub struct DiscoveredContinuations {
    /// Top-level comment section endpoints: reply-thread openers and the next
    /// page. Ordered so popping from the end visits them in document order.
    pub pages: Vec<Value>,
    /// Reply threads; processed next.
    pub replies: Vec<Value>,
}

pub fn discover_continuations(response: &Value) -> DiscoveredContinuations {
    let mut discovered = DiscoveredContinuations::default();

    let actions = search_dict(response, "reloadContinuationItemsCommand")
        .into_iter()
        .chain(search_dict(response, "appendContinuationItemsAction"));

    for action in actions {
        let target = action
            .get("targetId")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let items = action
            .get("continuationItems")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for item in items {
            if COMMENT_SECTION_TARGETS.contains(&target) {
                let endpoints: Vec<Value> = search_dict(item, "continuationEndpoint")
                    .into_iter()
                    .cloned()
                    .collect();
                discovered.pages.splice(0..0, endpoints);
            }

            if target.starts_with(REPLIES_TARGET_PREFIX)
                && item.get("continuationItemRenderer").is_some()
            {
                if let Some(command) = search_dict(item, "buttonRenderer")
                    .first()
                    .and_then(|button| button.get("command"))
                {
                    discovered.replies.push(command.clone());
                }
            }
        }
    }

    discovered
}

/// Comment texts in a continuation response, in document order.
///
/// Entity payloads are the current format; `commentRenderer` is read only
/// when a response has none.
pub fn extract_comment_texts(response: &Value) -> Vec<String> {
    let entity_texts: Vec<String> = search_dict(response, "commentEntityPayload")
        .into_iter()
        .filter_map(|payload| {
            payload
                .pointer("/properties/content/content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .collect();

    if !entity_texts.is_empty() {
        return entity_texts;
    }

    search_dict(response, "commentRenderer")
        .into_iter()
        .filter_map(|renderer| {
            let runs = renderer.pointer("/contentText/runs")?.as_array()?;
            let text: String = runs
                .iter()
                .filter_map(|run| run.get("text").and_then(Value::as_str))
                .collect();
            Some(text)
        })
        .collect()
}

/// The continuation token and API path of an endpoint.
pub fn endpoint_request_parts(endpoint: &Value) -> Option<(String, Option<String>)> {
    let token = endpoint
        .pointer("/continuationCommand/token")
        .and_then(Value::as_str)?
        .to_string();
    let api_url = endpoint
        .pointer("/commandMetadata/webCommandMetadata/apiUrl")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some((token, api_url))
}
