use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use super::types::{PostStatus, Timestamp};

/// A post as published by the upstream content source.
///
/// `slug`, `status` and `publishDate` are required on the wire; every other
/// field falls back to an empty value when absent or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, deserialize_with = "id_as_text")]
    pub id: String,
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub seo_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub status: PostStatus,
    pub publish_date: Timestamp,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub featured_image_url: Option<String>,
}

impl Post {
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Some content sources number their posts; the id is only ever shown as text.
fn id_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<WireId>::deserialize(deserializer)? {
        Some(WireId::Text(text)) => text,
        Some(WireId::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|url| !url.trim().is_empty()))
}

/// The reader-visible view of one upstream snapshot.
///
/// Holds only published posts, one per slug (first upstream occurrence wins),
/// ordered newest first with ties kept in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedCatalog {
    posts: Vec<Post>,
}

impl PublishedCatalog {
    pub fn from_upstream(upstream: Vec<Post>) -> Self {
        let total = upstream.len();
        let mut seen = HashSet::with_capacity(total);
        let mut posts = Vec::with_capacity(total);

        for post in upstream {
            if !post.is_published() {
                debug!(
                    target = "quillpost::domain::posts",
                    slug = %post.slug,
                    status = post.status.as_str(),
                    "skipping unpublished post"
                );
                continue;
            }
            if !seen.insert(post.slug.clone()) {
                debug!(
                    target = "quillpost::domain::posts",
                    slug = %post.slug,
                    "dropping duplicate published slug"
                );
                continue;
            }
            posts.push(post);
        }

        // `sort_by` is stable, so equal dates keep upstream order.
        posts.sort_by(|a, b| a.publish_date.cmp_newest_first(&b.publish_date));

        debug!(
            target = "quillpost::domain::posts",
            total,
            published = posts.len(),
            "built published catalog"
        );

        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    pub fn slugs(&self) -> Vec<String> {
        self.posts.iter().map(|post| post.slug.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
