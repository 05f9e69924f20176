//! # Repository Ports
//!
//! Any record store must implement these traits to feed the read path.
//! Every call is a suspension point; nothing else on the read path waits.

use async_trait::async_trait;

use crate::errors::StoreError;
use crate::records::{RawRecord, ThreadRecord};

/// Thread lookup.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    /// Returns `Ok(None)` when no thread has this id.
    async fn get_thread_detail_by_id(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadRecord>, StoreError>;
}

/// Comment listing, in display order.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Empty when the thread has no comments. Does not check that the
    /// thread exists.
    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError>;
}

/// Reply listing, in display order.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyRepository: Send + Sync {
    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError>;
}
