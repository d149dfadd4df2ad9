use crate::{CommentSource, FetchRequest, VideoId};
use futures::future::BoxFuture;
use sentiment_core::{Comment, CoreError, SortOrder};

struct FixedSource {
    comments: Vec<&'static str>,
}

impl CommentSource for FixedSource {
    fn fetch_comments<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<Vec<Comment>, CoreError>> {
        Box::pin(async move {
            Ok(self
                .comments
                .iter()
                .take(request.limit as usize)
                .map(|text| Comment::new(*text))
                .collect())
        })
    }
}

fn video() -> VideoId {
    VideoId::parse("dQw4w9WgXcQ").unwrap()
}

#[test]
fn test_fetch_request_clamps_limit() {
    assert_eq!(FetchRequest::new(video(), 10, SortOrder::Top).limit, 50);
    assert_eq!(FetchRequest::new(video(), 150, SortOrder::Top).limit, 150);
    assert_eq!(FetchRequest::new(video(), 5_000, SortOrder::Newest).limit, 500);
}

#[tokio::test]
async fn test_source_is_object_safe_and_bounded() {
    let source: Box<dyn CommentSource> = Box::new(FixedSource {
        comments: vec!["a"; 80],
    });
    let request = FetchRequest::new(video(), 50, SortOrder::Top);

    let comments = source.fetch_comments(&request).await.unwrap();
    assert_eq!(comments.len(), 50);
    assert_eq!(comments[0].text, "a");
}
