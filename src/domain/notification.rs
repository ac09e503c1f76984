use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One user-facing activity event. Both delivery paths (live push and
/// paginated history) carry the same record shape, and `id` is stable
/// across them: it is the dedup key for the whole feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub actor: ActorRef,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub kind: NotificationKind,
}

/// The kind discriminant plus the one related-entity cluster that goes
/// with it. Payloads are optional so a partially-populated event still
/// deserializes and flows through the feed with a degraded detail
/// instead of being dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    PostLike {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        post: Option<PostRef>,
    },
    PostComment {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        post: Option<PostRef>,
    },
    CommentLike {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<CommentRef>,
    },
    CommentReply {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comment: Option<CommentRef>,
    },
    RealmJoin {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        realm: Option<RealmRef>,
    },
    /// A kind this client does not know. The event still enters the
    /// feed with a generic message and an empty detail.
    #[serde(other)]
    Unknown,
}

impl NotificationKind {
    /// Short tag for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::PostLike { .. } => "post_like",
            Self::PostComment { .. } => "post_comment",
            Self::CommentLike { .. } => "comment_like",
            Self::CommentReply { .. } => "comment_reply",
            Self::RealmJoin { .. } => "realm_join",
            Self::Unknown => "unknown",
        }
    }
}

/// The user who triggered the event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// A comment plus the post it belongs to; the parent post is what the
/// event links to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<PostRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}
