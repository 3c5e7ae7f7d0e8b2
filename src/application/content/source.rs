use async_trait::async_trait;

use crate::domain::posts::Post;

use super::error::FetchError;

/// Where the content client gets the full upstream post collection from.
///
/// Implementations return every post the source knows about, in source
/// order; filtering and ordering happen in the client.
#[async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Post>, FetchError>;
}
