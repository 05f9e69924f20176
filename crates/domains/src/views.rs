//! # Views
//!
//! Read-only projections of stored records, shaped for presentation.
//! Comment and reply views are produced by validating constructors that
//! check the raw record's schema and apply the soft-delete redaction
//! policy. A thread view wraps its record as-is.
//!
//! Views never fetch anything. The replies of a comment and the comments of
//! a thread are supplied, already ordered, by whoever assembles the tree.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{EntityKind, ValidationError};
use crate::records::{fields, FieldValue, RawRecord, ThreadRecord};

/// Shown instead of the content of a soft-deleted comment.
pub const DELETED_COMMENT_CONTENT: &str = "**komentar telah dihapus**";

/// Shown instead of the content of a soft-deleted reply.
pub const DELETED_REPLY_CONTENT: &str = "**balasan telah dihapus**";

/// Required fields, in the order their presence is checked.
const REQUIRED: [&str; 4] = [fields::ID, fields::USERNAME, fields::DATE, fields::CONTENT];

/// Offset-less layouts a `timestamp without time zone` column renders as.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Canonical timestamp rendering: UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an ISO-8601 string. Strings without an offset are read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
        .map(|naive| naive.and_utc())
}

/// A validated, redacted reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyView {
    pub id: String,
    pub username: String,
    pub date: String,
    pub content: String,
}

impl ReplyView {
    pub fn from_record(record: &RawRecord) -> Result<Self, ValidationError> {
        let node = Node::parse(record, EntityKind::Reply, DELETED_REPLY_CONTENT)?;
        Ok(Self {
            id: node.id,
            username: node.username,
            date: node.date,
            content: node.content,
        })
    }
}

/// A validated, redacted comment together with its ordered replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub username: String,
    pub date: String,
    pub content: String,
    pub replies: Vec<ReplyView>,
}

impl CommentView {
    /// Builds a comment view with no replies.
    pub fn from_record(record: &RawRecord) -> Result<Self, ValidationError> {
        let node = Node::parse(record, EntityKind::Comment, DELETED_COMMENT_CONTENT)?;
        Ok(Self {
            id: node.id,
            username: node.username,
            date: node.date,
            content: node.content,
            replies: Vec::new(),
        })
    }

    /// Attaches the comment's replies, replacing any it already had.
    pub fn with_replies(mut self, replies: Vec<ReplyView>) -> Self {
        self.replies = replies;
        self
    }
}

/// A thread and its fully assembled comment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadView {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: String,
    pub username: String,
    pub comments: Vec<CommentView>,
}

impl ThreadView {
    pub fn new(record: ThreadRecord, comments: Vec<CommentView>) -> Self {
        Self {
            date: format_timestamp(&record.date),
            id: record.id,
            title: record.title,
            body: record.body,
            username: record.username,
            comments,
        }
    }
}

/// Fields shared by comment and reply views after validation and redaction.
struct Node {
    id: String,
    username: String,
    date: String,
    content: String,
}

impl Node {
    fn parse(
        record: &RawRecord,
        entity: EntityKind,
        placeholder: &str,
    ) -> Result<Self, ValidationError> {
        // Presence of every field is checked before any type is.
        for field in REQUIRED {
            if record.get(field).map_or(true, FieldValue::is_blank) {
                return Err(ValidationError::MissingProperty { entity, field });
            }
        }

        let id = text(record, entity, fields::ID)?;
        let username = text(record, entity, fields::USERNAME)?;
        let date = timestamp(record, entity)?;
        let content = text(record, entity, fields::CONTENT)?;

        let content = if deleted(record, entity)? {
            placeholder.to_string()
        } else {
            content
        };

        Ok(Self {
            id,
            username,
            date,
            content,
        })
    }
}

fn text(
    record: &RawRecord,
    entity: EntityKind,
    field: &'static str,
) -> Result<String, ValidationError> {
    match record.get(field) {
        Some(FieldValue::Text(value)) => Ok(value.clone()),
        Some(other) => Err(ValidationError::InvalidType {
            entity,
            field,
            expected: "a string",
            found: other.type_name(),
        }),
        None => Err(ValidationError::MissingProperty { entity, field }),
    }
}

fn timestamp(record: &RawRecord, entity: EntityKind) -> Result<String, ValidationError> {
    let invalid = |found| ValidationError::InvalidType {
        entity,
        field: fields::DATE,
        expected: "an ISO-8601 string or a timestamp",
        found,
    };

    match record.get(fields::DATE) {
        Some(FieldValue::Timestamp(at)) => Ok(format_timestamp(at)),
        Some(FieldValue::Text(raw)) => parse_timestamp(raw)
            .map(|at| format_timestamp(&at))
            .ok_or_else(|| invalid("a malformed string")),
        Some(other) => Err(invalid(other.type_name())),
        None => Err(ValidationError::MissingProperty {
            entity,
            field: fields::DATE,
        }),
    }
}

/// Absent or null means the node was never deleted.
fn deleted(record: &RawRecord, entity: EntityKind) -> Result<bool, ValidationError> {
    match record.get(fields::IS_DELETE) {
        None | Some(FieldValue::Null) => Ok(false),
        Some(FieldValue::Bool(flag)) => Ok(*flag),
        Some(other) => Err(ValidationError::InvalidType {
            entity,
            field: fields::IS_DELETE,
            expected: "a boolean",
            found: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reply_record() -> RawRecord {
        RawRecord::new()
            .with(fields::ID, "reply-123")
            .with(fields::USERNAME, "dicoding")
            .with(fields::DATE, "2021-08-08T07:19:09.775Z")
            .with(fields::CONTENT, "sebuah balasan")
    }

    fn comment_record() -> RawRecord {
        RawRecord::new()
            .with(fields::ID, "comment-123")
            .with(fields::USERNAME, "dicoding")
            .with(fields::DATE, "2021-08-08T07:22:33.555Z")
            .with(fields::CONTENT, "sebuah komentar")
    }

    #[test]
    fn reply_missing_content_is_missing_property() {
        let mut record = reply_record();
        record.remove(fields::CONTENT);

        assert_eq!(
            ReplyView::from_record(&record),
            Err(ValidationError::MissingProperty {
                entity: EntityKind::Reply,
                field: fields::CONTENT,
            })
        );
    }

    #[test]
    fn comment_missing_date_and_content_reports_first_missing() {
        let record = RawRecord::new()
            .with(fields::ID, "comment-123")
            .with(fields::USERNAME, "dicoding");

        let err = CommentView::from_record(&record).unwrap_err();
        assert_eq!(err.field(), fields::DATE);
        assert_eq!(err.entity(), EntityKind::Comment);
    }

    #[test]
    fn null_and_empty_fields_are_missing() {
        let record = comment_record().with(fields::USERNAME, FieldValue::Null);
        assert!(matches!(
            CommentView::from_record(&record),
            Err(ValidationError::MissingProperty { field: "username", .. })
        ));

        let record = comment_record().with(fields::CONTENT, "");
        assert!(matches!(
            CommentView::from_record(&record),
            Err(ValidationError::MissingProperty { field: "content", .. })
        ));
    }

    #[test]
    fn presence_is_checked_before_types() {
        // Numeric id and missing username: the missing field wins.
        let record = reply_record()
            .with(fields::ID, 123_i64)
            .with(fields::USERNAME, "");

        assert!(matches!(
            ReplyView::from_record(&record),
            Err(ValidationError::MissingProperty { field: "username", .. })
        ));
    }

    #[test]
    fn numeric_id_is_invalid_type() {
        let record = comment_record().with(fields::ID, 123_i64);

        assert_eq!(
            CommentView::from_record(&record),
            Err(ValidationError::InvalidType {
                entity: EntityKind::Comment,
                field: fields::ID,
                expected: "a string",
                found: "integer",
            })
        );
    }

    #[test]
    fn zero_and_false_are_present_but_invalid() {
        let record = reply_record().with(fields::ID, 0_i64);
        assert!(matches!(
            ReplyView::from_record(&record),
            Err(ValidationError::InvalidType { field: "id", .. })
        ));

        let record = reply_record().with(fields::CONTENT, false);
        assert!(matches!(
            ReplyView::from_record(&record),
            Err(ValidationError::InvalidType { field: "content", .. })
        ));
    }

    #[test]
    fn bad_dates_are_invalid_type() {
        let record = reply_record().with(fields::DATE, true);
        assert!(matches!(
            ReplyView::from_record(&record),
            Err(ValidationError::InvalidType { field: "date", found: "boolean", .. })
        ));

        let record = reply_record().with(fields::DATE, "yesterday");
        assert!(matches!(
            ReplyView::from_record(&record),
            Err(ValidationError::InvalidType { field: "date", .. })
        ));
    }

    #[test]
    fn dates_without_offset_are_read_as_utc() {
        let view =
            ReplyView::from_record(&reply_record().with(fields::DATE, "2021-08-08T07:22:33.555"))
                .unwrap();
        assert_eq!(view.date, "2021-08-08T07:22:33.555Z");

        let view =
            CommentView::from_record(&comment_record().with(fields::DATE, "2021-08-08 07:22:33"))
                .unwrap();
        assert_eq!(view.date, "2021-08-08T07:22:33.000Z");
    }

    #[test]
    fn non_boolean_delete_flag_is_invalid_type() {
        let record = comment_record().with(fields::IS_DELETE, "yes");
        assert!(matches!(
            CommentView::from_record(&record),
            Err(ValidationError::InvalidType { field: "is_delete", .. })
        ));
    }

    #[test]
    fn reply_view_passes_content_through() {
        let view = ReplyView::from_record(&reply_record().with(fields::IS_DELETE, false)).unwrap();

        assert_eq!(view.id, "reply-123");
        assert_eq!(view.username, "dicoding");
        assert_eq!(view.date, "2021-08-08T07:19:09.775Z");
        assert_eq!(view.content, "sebuah balasan");
    }

    #[test]
    fn deleted_nodes_keep_identity_and_redact_content() {
        let reply = ReplyView::from_record(&reply_record().with(fields::IS_DELETE, true)).unwrap();
        assert_eq!(reply.content, DELETED_REPLY_CONTENT);
        assert_eq!(reply.id, "reply-123");
        assert_eq!(reply.username, "dicoding");
        assert_eq!(reply.date, "2021-08-08T07:19:09.775Z");

        let comment =
            CommentView::from_record(&comment_record().with(fields::IS_DELETE, true)).unwrap();
        assert_eq!(comment.content, DELETED_COMMENT_CONTENT);
        assert_ne!(DELETED_COMMENT_CONTENT, DELETED_REPLY_CONTENT);
    }

    #[test]
    fn timestamp_value_and_its_string_form_agree() {
        let at = Utc.with_ymd_and_hms(2021, 8, 8, 7, 22, 33).unwrap()
            + chrono::Duration::milliseconds(555);

        let from_value = CommentView::from_record(&comment_record().with(fields::DATE, at)).unwrap();
        let from_string =
            CommentView::from_record(&comment_record().with(fields::DATE, format_timestamp(&at)))
                .unwrap();

        assert_eq!(from_value.date, "2021-08-08T07:22:33.555Z");
        assert_eq!(from_value.date, from_string.date);
    }

    #[test]
    fn offset_timestamps_are_normalised_to_utc() {
        let record = reply_record().with(fields::DATE, "2021-08-08T14:19:09.775+07:00");
        let view = ReplyView::from_record(&record).unwrap();
        assert_eq!(view.date, "2021-08-08T07:19:09.775Z");
    }

    #[test]
    fn comment_replies_default_to_empty_and_keep_order() {
        let comment = CommentView::from_record(&comment_record()).unwrap();
        assert!(comment.replies.is_empty());

        let first = ReplyView::from_record(&reply_record().with(fields::ID, "reply-1")).unwrap();
        let second = ReplyView::from_record(&reply_record().with(fields::ID, "reply-2")).unwrap();
        let comment = comment.with_replies(vec![first, second]);

        let ids: Vec<_> = comment.replies.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["reply-1", "reply-2"]);
    }

    #[test]
    fn thread_view_serialises_to_response_shape() {
        let record = ThreadRecord {
            id: "thread-123".into(),
            title: "sebuah thread".into(),
            body: "sebuah body thread".into(),
            date: Utc.with_ymd_and_hms(2021, 8, 8, 7, 19, 9).unwrap(),
            username: "dicoding".into(),
        };
        let comment = CommentView::from_record(&comment_record())
            .unwrap()
            .with_replies(vec![ReplyView::from_record(&reply_record()).unwrap()]);

        let json = serde_json::to_value(ThreadView::new(record, vec![comment])).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "thread-123",
                "title": "sebuah thread",
                "body": "sebuah body thread",
                "date": "2021-08-08T07:19:09.000Z",
                "username": "dicoding",
                "comments": [{
                    "id": "comment-123",
                    "username": "dicoding",
                    "date": "2021-08-08T07:22:33.555Z",
                    "content": "sebuah komentar",
                    "replies": [{
                        "id": "reply-123",
                        "username": "dicoding",
                        "date": "2021-08-08T07:19:09.775Z",
                        "content": "sebuah balasan",
                    }],
                }],
            })
        );
    }
}
