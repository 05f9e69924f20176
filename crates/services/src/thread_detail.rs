//! # Thread Detail
//!
//! Assembles a thread, its comments and each comment's replies into one
//! ordered [`ThreadView`].
//!
//! The thread and its comment list are fetched one after the other. The
//! reply lists are then fetched concurrently, one future per comment, and
//! every result lands in the slot of the comment it belongs to, so the tree
//! keeps the stores' order no matter which fetch finishes first. The first
//! failure aborts the whole call and drops any fetch still in flight.

use std::num::NonZeroUsize;
use std::sync::Arc;

use domains::{
    CommentRepository, CommentView, DomainError, RawRecord, ReplyRepository, ReplyView, Result,
    ThreadRepository, ThreadView,
};
use futures_util::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

/// Tuning knobs for [`ThreadDetailService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThreadDetailOptions {
    /// Caps how many reply fetches may be in flight at once.
    /// `None` issues every fetch immediately.
    pub reply_fetch_concurrency: Option<NonZeroUsize>,
}

/// Read-side use case behind `GET /threads/{threadId}`.
pub struct ThreadDetailService {
    threads: Arc<dyn ThreadRepository>,
    comments: Arc<dyn CommentRepository>,
    replies: Arc<dyn ReplyRepository>,
    options: ThreadDetailOptions,
}

impl ThreadDetailService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        comments: Arc<dyn CommentRepository>,
        replies: Arc<dyn ReplyRepository>,
    ) -> Self {
        Self {
            threads,
            comments,
            replies,
            options: ThreadDetailOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ThreadDetailOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches and assembles the full comment tree of one thread.
    ///
    /// # Errors
    /// - [`DomainError::ThreadNotFound`] when the thread does not exist; no
    ///   comment or reply is fetched in that case.
    /// - [`DomainError::Validation`] when any comment or reply record is
    ///   malformed.
    /// - [`DomainError::Store`] when any store call fails, unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn get_thread_detail(&self, thread_id: &str) -> Result<ThreadView> {
        let Some(thread) = self.threads.get_thread_detail_by_id(thread_id).await? else {
            info!("thread not found");
            return Err(DomainError::ThreadNotFound {
                thread_id: thread_id.to_string(),
            });
        };

        let records = self.comments.get_comments_by_thread_id(thread_id).await?;
        debug!(comments = records.len(), "fetched comments");

        let comments = self.assemble_comments(&records).await.inspect_err(|err| {
            if err.is_data_integrity() {
                warn!(error = %err, "store returned a malformed record");
            }
        })?;

        Ok(ThreadView::new(thread, comments))
    }

    async fn assemble_comments(&self, records: &[RawRecord]) -> Result<Vec<CommentView>> {
        let limit = self
            .options
            .reply_fetch_concurrency
            .map_or(records.len(), NonZeroUsize::get)
            .max(1);

        let mut slots: Vec<Option<CommentView>> = records.iter().map(|_| None).collect();
        let mut queued = records.iter().enumerate();
        let mut pending = FuturesUnordered::new();
        for (index, record) in queued.by_ref().take(limit) {
            pending.push(self.assemble_slot(index, record));
        }

        // Returning early drops `pending`, which cancels the remaining fetches.
        while let Some((index, comment)) = pending.next().await {
            slots[index] = Some(comment?);
            if let Some((index, record)) = queued.next() {
                pending.push(self.assemble_slot(index, record));
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    async fn assemble_slot(
        &self,
        index: usize,
        record: &RawRecord,
    ) -> (usize, Result<CommentView>) {
        (index, self.assemble_comment(record).await)
    }

    async fn assemble_comment(&self, record: &RawRecord) -> Result<CommentView> {
        let comment = CommentView::from_record(record)?;

        let replies = self
            .replies
            .get_replies_by_comment_id(&comment.id)
            .await?
            .iter()
            .map(ReplyView::from_record)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(comment_id = %comment.id, replies = replies.len(), "assembled comment");
        Ok(comment.with_replies(replies))
    }
}
