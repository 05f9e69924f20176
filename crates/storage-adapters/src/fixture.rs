//! # JSON Fixtures
//!
//! Seeds an [`InMemoryForumStore`] from a JSON document:
//!
//! ```json
//! { "threads": [ { "id": "thread-123", "title": "...", "body": "...",
//!                  "date": "2021-08-08T07:19:09.775Z", "username": "dicoding",
//!                  "comments": [ { "id": "comment-1", "...": "...",
//!                                  "replies": [ { "id": "reply-1" } ] } ] } ] }
//! ```
//!
//! Comments and replies are taken as raw records, so a fixture may hold
//! malformed rows on purpose.

use std::path::{Path, PathBuf};

use domains::{RawRecord, ThreadRecord};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::memory::InMemoryForumStore;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("comment at position {position} of thread {thread_id} has no string id")]
    CommentWithoutId { thread_id: String, position: usize },
}

#[derive(Debug, Default, Deserialize)]
pub struct ForumFixture {
    #[serde(default)]
    pub threads: Vec<ThreadFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ThreadFixture {
    #[serde(flatten)]
    pub thread: ThreadRecord,
    #[serde(default)]
    pub comments: Vec<CommentFixture>,
}

#[derive(Debug, Deserialize)]
pub struct CommentFixture {
    #[serde(default)]
    pub replies: Vec<RawRecord>,
    #[serde(flatten)]
    pub record: RawRecord,
}

/// Row counts written by [`ForumFixture::seed`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub threads: usize,
    pub comments: usize,
    pub replies: usize,
}

impl ForumFixture {
    pub fn parse(json: &str) -> Result<Self, FixtureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FixtureError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&json)
    }

    /// Writes every row into `store`, preserving document order.
    ///
    /// Replies are keyed by their comment's id, so a comment with replies
    /// must carry a string id. Other comment fields are stored unchecked.
    pub fn seed(self, store: &InMemoryForumStore) -> Result<SeedSummary, FixtureError> {
        let mut summary = SeedSummary::default();

        for ThreadFixture { thread, comments } in self.threads {
            let thread_id = thread.id.clone();
            store.insert_thread(thread);
            summary.threads += 1;

            for (position, CommentFixture { replies, record }) in comments.into_iter().enumerate() {
                if !replies.is_empty() {
                    let comment_id = record
                        .id()
                        .ok_or_else(|| FixtureError::CommentWithoutId {
                            thread_id: thread_id.clone(),
                            position,
                        })?
                        .to_string();
                    summary.replies += replies.len();
                    for reply in replies {
                        store.insert_reply(&comment_id, reply);
                    }
                }

                store.insert_comment(&thread_id, record);
                summary.comments += 1;
            }
        }

        info!(
            threads = summary.threads,
            comments = summary.comments,
            replies = summary.replies,
            "seeded store from fixture"
        );
        Ok(summary)
    }
}
