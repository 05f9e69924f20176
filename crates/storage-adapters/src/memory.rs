//! # In-Memory Record Store
//!
//! Implements all three read ports over concurrent hash maps. Comment and
//! reply lists come back in insertion order, which stands in for the
//! `ORDER BY date ASC` of a relational store.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    fields, CommentRepository, FieldValue, RawRecord, ReplyRepository, StoreError,
    ThreadRecord, ThreadRepository,
};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryForumStore {
    threads: DashMap<String, ThreadRecord>,
    /// Comment rows keyed by owning thread id.
    comments: DashMap<String, Vec<RawRecord>>,
    /// Reply rows keyed by owning comment id.
    replies: DashMap<String, Vec<RawRecord>>,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a thread.
    pub fn insert_thread(&self, thread: ThreadRecord) {
        self.threads.insert(thread.id.clone(), thread);
    }

    /// Appends a comment row to a thread's list. The row is stored verbatim.
    pub fn insert_comment(&self, thread_id: &str, record: RawRecord) {
        self.comments
            .entry(thread_id.to_string())
            .or_default()
            .push(record);
    }

    /// Appends a reply row to a comment's list. The row is stored verbatim.
    pub fn insert_reply(&self, comment_id: &str, record: RawRecord) {
        self.replies
            .entry(comment_id.to_string())
            .or_default()
            .push(record);
    }

    /// Flags a comment as deleted. Returns `false` if no comment has this id.
    pub fn soft_delete_comment(&self, comment_id: &str) -> bool {
        soft_delete(&self.comments, comment_id)
    }

    /// Flags a reply as deleted. Returns `false` if no reply has this id.
    pub fn soft_delete_reply(&self, reply_id: &str) -> bool {
        soft_delete(&self.replies, reply_id)
    }
}

fn soft_delete(lists: &DashMap<String, Vec<RawRecord>>, id: &str) -> bool {
    for mut list in lists.iter_mut() {
        if let Some(record) = list.iter_mut().find(|record| record.id() == Some(id)) {
            record.insert(fields::IS_DELETE, FieldValue::Bool(true));
            return true;
        }
    }
    false
}

#[async_trait]
impl ThreadRepository for InMemoryForumStore {
    async fn get_thread_detail_by_id(
        &self,
        thread_id: &str,
    ) -> Result<Option<ThreadRecord>, StoreError> {
        Ok(self.threads.get(thread_id).map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl CommentRepository for InMemoryForumStore {
    async fn get_comments_by_thread_id(
        &self,
        thread_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        let comments = self
            .comments
            .get(thread_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        debug!(thread_id, count = comments.len(), "listed comments");
        Ok(comments)
    }
}

#[async_trait]
impl ReplyRepository for InMemoryForumStore {
    async fn get_replies_by_comment_id(
        &self,
        comment_id: &str,
    ) -> Result<Vec<RawRecord>, StoreError> {
        let replies = self
            .replies
            .get(comment_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default();
        debug!(comment_id, count = replies.len(), "listed replies");
        Ok(replies)
    }
}
