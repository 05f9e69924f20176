//! # Timeout Decorator
//!
//! Wraps any store and bounds every call, so a hung backend surfaces as
//! [`StoreError::Timeout`] instead of stalling the read path.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use domains::{
    CommentRepository, RawRecord, ReplyRepository, StoreError, ThreadRecord, ThreadRepository,
};
use tracing::warn;

pub struct TimeoutStore<S> {
    inner: S,
    limit: Duration,
}

impl<S> TimeoutStore<S> {
    pub fn new(inner: S, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(operation, limit = ?self.limit, "store call timed out");
                Err(StoreError::Timeout {
                    operation,
                    after: self.limit,
                })
            }
        }
    }
}

#[async_trait]
impl<S: ThreadRepository> ThreadRepository for TimeoutStore<S> {
    async fn get_thread_detail_by_id(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadRecord>, StoreError> {
        self.bounded(
            "get_thread_detail_by_id",
            self.inner.get_thread_detail_by_id(thread_id),
        )
        .await
    }
}

#[async_trait]
impl<S: CommentRepository> CommentRepository for TimeoutStore<S> {
    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        self.bounded(
            "get_comments_by_thread_id",
            self.inner.get_comments_by_thread_id(thread_id),
        )
        .await
    }
}

#[async_trait]
impl<S: ReplyRepository> ReplyRepository for TimeoutStore<S> {
    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        self.bounded(
            "get_replies_by_comment_id",
            self.inner.get_replies_by_comment_id(comment_id),
        )
        .await
    }
}
