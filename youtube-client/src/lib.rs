pub mod api;
pub mod extract;
pub mod video_id;

pub use api::YoutubeCommentClient;
pub use video_id::VideoId;

use futures::future::BoxFuture;
use sentiment_core::{clamp_comment_count, Comment, CoreError, SortOrder};

/// What to fetch for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub video_id: VideoId,
    /// Upper bound on returned comments, already clamped to the allowed range.
    pub limit: u32,
    pub sort: SortOrder,
}

impl FetchRequest {
    pub fn new(video_id: VideoId, requested: u32, sort: SortOrder) -> Self {
        Self {
            video_id,
            limit: clamp_comment_count(requested),
            sort,
        }
    }
}

/// Capability to fetch a video's comments.
///
/// Implementations return at most `request.limit` comments in platform order
/// and make a single bounded attempt. Zero comments is a valid result.
pub trait CommentSource: Send + Sync {
    fn fetch_comments<'a>(
        &'a self,
        request: &'a FetchRequest,
    ) -> BoxFuture<'a, Result<Vec<Comment>, CoreError>>;
}

#[cfg(test)]
mod tests;
