use time::OffsetDateTime;
use tracing::info;

use super::repo::PostRepo;
use super::repo_types::{Post, PostWithAuthor};
use crate::error::RepoError;

/// Posts published as of this call. "Now" is re-read every time, so two
/// calls straddling a publication date can differ.
pub async fn published_posts(repo: &dyn PostRepo) -> Result<Vec<PostWithAuthor>, RepoError> {
    repo.published_before(OffsetDateTime::now_utc()).await
}

/// Publish this post now and return the stored result.
pub async fn publish(repo: &dyn PostRepo, post: &Post) -> Result<Post, RepoError> {
    let published = repo.publish(post.id, OffsetDateTime::now_utc()).await?;
    info!(post_id = published.id, "post published");
    Ok(published)
}
