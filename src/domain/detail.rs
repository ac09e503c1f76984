use serde::Serialize;

use super::notification::{Notification, NotificationKind, PostRef};

/// Derived, render-time view data for one event. Never persisted; the
/// feed stores canonical events and resolves details lazily at
/// consumption time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayDetail {
    /// The actor's profile page, populated for every kind.
    pub actor_link: String,
    /// Navigation target when the event is clicked.
    pub link: Option<String>,
    /// Secondary thumbnail, e.g. the liked post's first image.
    pub image: Option<String>,
    /// Short text excerpt (post title or comment body) shown in quotes.
    pub source: Option<String>,
}

/// Resolves an event to its display detail. Total: a partially
/// populated payload degrades to absent fields, never an error.
pub fn resolve(event: &Notification) -> DisplayDetail {
    let actor_link = format!("/profile/{}", event.actor.id);

    match &event.kind {
        NotificationKind::Follow => DisplayDetail {
            link: Some(actor_link.clone()),
            image: event.actor.image.clone(),
            source: None,
            actor_link,
        },
        NotificationKind::PostLike { post } | NotificationKind::PostComment { post } => {
            let (link, image) = post_target(post.as_ref());
            DisplayDetail {
                actor_link,
                link,
                image,
                source: post.as_ref().and_then(|post| post.title.clone()),
            }
        }
        NotificationKind::CommentLike { comment } | NotificationKind::CommentReply { comment } => {
            // The event links to the comment's parent post.
            let parent = comment.as_ref().and_then(|comment| comment.post.as_ref());
            let (link, image) = post_target(parent);
            DisplayDetail {
                actor_link,
                link,
                image,
                source: comment.as_ref().and_then(|comment| comment.body.clone()),
            }
        }
        NotificationKind::RealmJoin { realm } => DisplayDetail {
            actor_link,
            link: realm.as_ref().map(|realm| format!("/realms/{}", realm.id)),
            image: realm.as_ref().and_then(|realm| realm.picture.clone()),
            source: realm.as_ref().and_then(|realm| realm.name.clone()),
        },
        NotificationKind::Unknown => DisplayDetail {
            actor_link,
            link: None,
            image: None,
            source: None,
        },
    }
}

fn post_target(post: Option<&PostRef>) -> (Option<String>, Option<String>) {
    match post {
        Some(post) => (
            Some(format!("/posts/{}", post.id)),
            post.images.first().map(|image| image.url.clone()),
        ),
        None => (None, None),
    }
}
