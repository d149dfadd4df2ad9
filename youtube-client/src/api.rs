use crate::extract::{self, DiscoveredContinuations};
use crate::video_id::VideoId;
use crate::{CommentSource, FetchRequest};
use futures::future::BoxFuture;
use reqwest::{Client, Response, StatusCode};
use sentiment_core::{Comment, CoreError, SortOrder, YoutubeError};
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const YOUTUBE_BASE: &str = "https://www.youtube.com";
const DEFAULT_CONTINUATION_PATH: &str = "/youtubei/v1/next";
const CONSENT_COOKIE: &str = "CONSENT=YES+cb";

/// Scrapes public comments through the same InnerTube endpoints the web client uses.
#[derive(Debug)]
pub struct YoutubeCommentClient {
    http_client: Client,
    user_agent: String,
}

impl YoutubeCommentClient {
    pub fn new(user_agent: String, timeout: Duration) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Collects up to `limit` comments. A video without a comment section yields none.
    pub async fn collect_comments(
        &self,
        video_id: &VideoId,
        limit: usize,
        sort: SortOrder,
    ) -> Result<Vec<Comment>, CoreError> {
        let html = self.fetch_watch_page(video_id).await?;
        let ytcfg = extract::extract_ytcfg(&html)?;
        let data = extract::extract_initial_data(&html)?;

        let ytcfg = &ytcfg;
        let comments = page_comments(&data, sort, limit, move |endpoint| async move {
            self.post_continuation(&endpoint, ytcfg).await
        })
        .await?;

        info!("Collected {} comments for {}", comments.len(), video_id);
        Ok(comments)
    }

    async fn fetch_watch_page(&self, video_id: &VideoId) -> Result<String, CoreError> {
        let url = video_id.watch_url();
        info!("Fetching watch page {}", url);

        let response = self
            .http_client
            .get(&url)
            .header("Cookie", CONSENT_COOKIE)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = check_status(response, video_id.as_str())?;
        response.text().await.map_err(|e| {
            error!("Failed to read watch page body: {}", e);
            YoutubeError::InvalidResponse {
                details: "watch page body could not be read".to_string(),
            }
            .into()
        })
    }

    async fn post_continuation(&self, endpoint: &Value, ytcfg: &Value) -> Result<Value, CoreError> {
        let (token, api_url) =
            extract::endpoint_request_parts(endpoint).ok_or_else(|| YoutubeError::InvalidResponse {
                details: "continuation endpoint without token".to_string(),
            })?;
        let path = api_url.as_deref().unwrap_or(DEFAULT_CONTINUATION_PATH);
        let url = format!("{}{}", YOUTUBE_BASE, path);

        let api_key = ytcfg
            .get("INNERTUBE_API_KEY")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let body = json!({
            "context": ytcfg.get("INNERTUBE_CONTEXT").cloned().unwrap_or(Value::Null),
            "continuation": token,
        });

        let mut request = self
            .http_client
            .post(&url)
            .query(&[("key", api_key), ("prettyPrint", "false")])
            .header("Cookie", CONSENT_COOKIE)
            .header("Origin", YOUTUBE_BASE)
            .json(&body);

        if let Some(client_name) = ytcfg.get("INNERTUBE_CONTEXT_CLIENT_NAME") {
            request = request.header("X-YouTube-Client-Name", client_name.to_string());
        }
        if let Some(version) = ytcfg
            .get("INNERTUBE_CONTEXT_CLIENT_VERSION")
            .and_then(Value::as_str)
        {
            request = request.header("X-YouTube-Client-Version", version);
        }

        debug!("POST {}", path);
        let response = request.send().await.map_err(map_transport_error)?;
        let response = check_status(response, path)?;

        response.json::<Value>().await.map_err(|e| {
            error!("Failed to parse continuation response: {}", e);
            YoutubeError::InvalidResponse {
                details: "continuation response is not JSON".to_string(),
            }
            .into()
        })
    }
}

/// Walks the comment continuations of a watch page until `limit` comments are
/// collected or the stack runs dry.
///
/// `post` resolves one continuation endpoint into its JSON response.
pub(crate) async fn page_comments<F, Fut>(
    data: &Value,
    sort: SortOrder,
    limit: usize,
    mut post: F,
) -> Result<Vec<Comment>, CoreError>
where
    F: FnMut(Value) -> Fut,
    Fut: Future<Output = Result<Value, CoreError>>,
{
    if !extract::has_comment_section(data) {
        info!("Watch page has no comment section");
        return Ok(Vec::new());
    }

    let mut menu = extract::sort_menu(data);
    if menu.is_empty() {
        debug!("Sort menu not on watch page, requesting comment header");
        if let Some(endpoint) = extract::section_list_continuation(data) {
            let header = post(endpoint).await?;
            menu = extract::sort_menu(&header);
        }
    }

    let first = menu
        .get(sort.menu_index())
        .and_then(|item| item.get("serviceEndpoint"))
        .cloned()
        .ok_or_else(|| YoutubeError::SortUnavailable {
            requested: sort.to_string(),
        })?;

    let mut continuations = vec![first];
    let mut comments = Vec::with_capacity(limit);
    let mut pages = 0usize;

    while let Some(endpoint) = continuations.pop() {
        let response = post(endpoint).await?;
        extract::check_platform_error(&response)?;
        pages += 1;

        let DiscoveredContinuations {
            pages: next_pages,
            replies,
        } = extract::discover_continuations(&response);
        continuations.splice(0..0, next_pages);
        continuations.extend(replies);

        for text in extract::extract_comment_texts(&response) {
            comments.push(Comment::new(text));
            if comments.len() >= limit {
                debug!("Comment limit reached after {} responses", pages);
                return Ok(comments);
            }
        }
    }

    debug!("Comment stream ended after {} responses", pages);
    Ok(comments)
}

impl CommentSource for YoutubeCommentClient {
    fn fetch_comments<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<Vec<Comment>, CoreError>> {
        Box::pin(self.collect_comments(&request.video_id, request.limit as usize, request.sort))
    }
}

fn check_status(response: Response, resource: &str) -> Result<Response, CoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    error!("Request failed with status: {} for {}", status, resource);
    let err = match status {
        StatusCode::TOO_MANY_REQUESTS => {
            warn!("Rate limited by YouTube");
            YoutubeError::RateLimited
        }
        StatusCode::NOT_FOUND => YoutubeError::VideoNotFound {
            video_id: resource.to_string(),
        },
        s if s.is_server_error() => YoutubeError::ServerError {
            status_code: s.as_u16(),
        },
        s => YoutubeError::InvalidResponse {
            details: format!("unexpected status {}", s),
        },
    };
    Err(err.into())
}

fn map_transport_error(e: reqwest::Error) -> CoreError {
    error!("Network error talking to YouTube: {}", e);
    if e.is_timeout() {
        YoutubeError::RequestTimeout.into()
    } else {
        CoreError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::{self, Ready};
    use std::collections::HashMap;

    #[test]
    fn test_client_creation() {
        let client =
            YoutubeCommentClient::new("test-agent/1.0".to_string(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.user_agent(), "test-agent/1.0");
    }

    fn endpoint(token: &str) -> Value {
        json!({"continuationCommand": {"token": token}})
    }

    fn watch_page() -> Value {
        json!({"contents": [
            {"itemSectionRenderer": {"contents": [
                {"continuationItemRenderer": {"continuationEndpoint": endpoint("header")}}
            ]}},
            {"sortFilterSubMenuRenderer": {"subMenuItems": [
                {"title": "Top comments", "serviceEndpoint": endpoint("top")},
                {"title": "Newest first", "serviceEndpoint": endpoint("newest")}
            ]}}
        ]})
    }

    fn entity(text: &str) -> Value {
        json!({"payload": {"commentEntityPayload": {"properties": {"content": {"content": text}}}}})
    }

    fn thread(reply_token: &str) -> Value {
        json!({"commentThreadRenderer": {"replies": {"commentRepliesRenderer": {"contents": [
            {"continuationItemRenderer": {"continuationEndpoint": endpoint(reply_token)}}
        ]}}}})
    }

    fn next_page(token: &str) -> Value {
        json!({"continuationItemRenderer": {"continuationEndpoint": endpoint(token)}})
    }

    fn page(items: Vec<Value>, comments: &[&str]) -> Value {
        json!({
            "onResponseReceivedEndpoints": [
                {"appendContinuationItemsAction": {"targetId": "comments-section", "continuationItems": items}}
            ],
            "frameworkUpdates": {"entityBatchUpdate": {
                "mutations": comments.iter().map(|c| entity(c)).collect::<Vec<_>>()
            }}
        })
    }

    /// Serves canned responses by continuation token and records the request order.
    struct CannedResponses {
        responses: HashMap<&'static str, Value>,
        requested: Vec<String>,
    }

    impl CannedResponses {
        fn new(responses: Vec<(&'static str, Value)>) -> Self {
            Self {
                responses: responses.into_iter().collect(),
                requested: Vec::new(),
            }
        }

        fn post(&mut self, endpoint: Value) -> Ready<Result<Value, CoreError>> {
            let token = endpoint["continuationCommand"]["token"]
                .as_str()
                .unwrap_or_default()
                .to_string();
            let response = self.responses.get(token.as_str()).cloned();
            self.requested.push(token.clone());
            future::ready(response.ok_or_else(|| {
                YoutubeError::InvalidResponse {
                    details: format!("no response for {token}"),
                }
                .into()
            }))
        }
    }

    fn texts(comments: &[Comment]) -> Vec<&str> {
        comments.iter().map(|c| c.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_replies_are_read_before_next_page() {
        let mut server = CannedResponses::new(vec![
            (
                "top",
                page(
                    vec![thread("replies-1"), thread("replies-2"), next_page("page-2")],
                    &["one", "two"],
                ),
            ),
            ("replies-1", page(vec![], &["reply to one"])),
            ("replies-2", page(vec![], &["reply to two"])),
            ("page-2", page(vec![], &["three"])),
        ]);

        let comments = page_comments(&watch_page(), SortOrder::Top, 50, |e| server.post(e))
            .await
            .unwrap();

        assert_eq!(
            texts(&comments),
            vec!["one", "two", "reply to one", "reply to two", "three"]
        );
        assert_eq!(server.requested, vec!["top", "replies-1", "replies-2", "page-2"]);
    }

    #[tokio::test]
    async fn test_limit_stops_mid_page() {
        let mut server = CannedResponses::new(vec![
            (
                "newest",
                page(
                    vec![next_page("page-2")],
                    &["a", "b", "c"],
                ),
            ),
            ("page-2", page(vec![], &["d", "e", "f"])),
        ]);

        let comments = page_comments(&watch_page(), SortOrder::Newest, 4, |e| server.post(e))
            .await
            .unwrap();

        assert_eq!(texts(&comments), vec!["a", "b", "c", "d"]);
        assert_eq!(server.requested, vec!["newest", "page-2"]);
    }

    #[tokio::test]
    async fn test_disabled_comments_make_no_requests() {
        let data = json!({"contents": [
            {"itemSectionRenderer": {"contents": [{"messageRenderer": {}}]}},
            {"itemSectionRenderer": {"contents": [
                {"continuationItemRenderer": {"continuationEndpoint": endpoint("sidebar")}}
            ]}}
        ]});
        let mut server = CannedResponses::new(vec![]);

        let comments = page_comments(&data, SortOrder::Top, 50, |e| server.post(e))
            .await
            .unwrap();

        assert!(comments.is_empty());
        assert!(server.requested.is_empty());
    }

    #[tokio::test]
    async fn test_sort_menu_from_section_list() {
        let data = json!({"contents": {"sectionListRenderer": {"contents": [
            {"itemSectionRenderer": {"contents": [
                {"continuationItemRenderer": {"continuationEndpoint": endpoint("header")}}
            ]}}
        ]}}});
        let mut server = CannedResponses::new(vec![
            (
                "header",
                json!({"sortFilterSubMenuRenderer": {"subMenuItems": [
                    {"serviceEndpoint": endpoint("top")},
                    {"serviceEndpoint": endpoint("newest")}
                ]}}),
            ),
            ("newest", page(vec![], &["fresh"])),
        ]);

        let comments = page_comments(&data, SortOrder::Newest, 50, |e| server.post(e))
            .await
            .unwrap();

        assert_eq!(texts(&comments), vec!["fresh"]);
        assert_eq!(server.requested, vec!["header", "newest"]);
    }

    #[tokio::test]
    async fn test_missing_sort_option_is_an_error() {
        let data = json!({"contents": [
            {"itemSectionRenderer": {"contents": [
                {"continuationItemRenderer": {"continuationEndpoint": endpoint("header")}}
            ]}},
            {"sortFilterSubMenuRenderer": {"subMenuItems": [{"serviceEndpoint": endpoint("top")}]}}
        ]});
        let mut server = CannedResponses::new(vec![]);

        let err = page_comments(&data, SortOrder::Newest, 50, |e| server.post(e))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CoreError::Youtube(YoutubeError::SortUnavailable { .. })
        ));
        assert!(server.requested.is_empty());
    }

    #[tokio::test]
    async fn test_platform_error_aborts_paging() {
        let mut server = CannedResponses::new(vec![(
            "top",
            json!({"error": {"externalErrorMessage": "Comments are unavailable"}}),
        )]);

        let err = page_comments(&watch_page(), SortOrder::Top, 50, |e| server.post(e))
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Youtube(YoutubeError::Platform { .. })));
    }
}
