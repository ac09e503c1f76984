use super::notification::NotificationKind;

/// Human-readable action phrase for an event kind. Pure lookup; an
/// unrecognized kind gets the generic fallback.
pub fn phrase(kind: &NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Follow => "started following you",
        NotificationKind::PostLike { .. } => "liked your post",
        NotificationKind::PostComment { .. } => "commented on your post",
        NotificationKind::CommentLike { .. } => "liked your comment",
        NotificationKind::CommentReply { .. } => "replied to your comment",
        NotificationKind::RealmJoin { .. } => "joined your realm",
        NotificationKind::Unknown => "You have a new notification",
    }
}
