//! Shared setup for the cross-crate tests in `tests/`.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use domains::{
    fields, CommentRepository, RawRecord, ReplyRepository, ThreadRecord, ThreadRepository,
};
use services::ThreadDetailService;
use storage_adapters::InMemoryForumStore;

pub fn thread_record(id: &str) -> ThreadRecord {
    ThreadRecord {
        id: id.to_string(),
        title: "sebuah thread".into(),
        body: "sebuah body thread".into(),
        date: Utc.with_ymd_and_hms(2021, 8, 8, 7, 19, 9).unwrap(),
        username: "dicoding".into(),
    }
}

/// A well-formed comment or reply row.
pub fn node(id: &str, content: &str) -> RawRecord {
    RawRecord::new()
        .with(fields::ID, id)
        .with(fields::USERNAME, "dicoding")
        .with(fields::DATE, "2021-08-08T07:22:33.555Z")
        .with(fields::CONTENT, content)
        .with(fields::IS_DELETE, false)
}

/// Wires one store behind all three ports.
pub fn service_over<S>(store: Arc<S>) -> ThreadDetailService
where
    S: ThreadRepository + CommentRepository + ReplyRepository + 'static,
{
    ThreadDetailService::new(store.clone(), store.clone(), store)
}

/// `thread-123` with `comment-1` ("hello", replies `reply-1` deleted and
/// `reply-2` "yo") followed by the deleted `comment-2`.
pub fn scenario_store() -> InMemoryForumStore {
    let store = InMemoryForumStore::new();
    store.insert_thread(thread_record("thread-123"));

    store.insert_comment("thread-123", node("comment-1", "hello"));
    store.insert_reply("comment-1", node("reply-1", "secret"));
    store.insert_reply("comment-1", node("reply-2", "yo"));
    store.insert_comment("thread-123", node("comment-2", "bye"));

    store.soft_delete_reply("reply-1");
    store.soft_delete_comment("comment-2");
    store
}
