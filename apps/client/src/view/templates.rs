//! Item templates. Each function maps one server entity to markup; none of them
//! touch the surface or the network.

use campus_proto::models::{
    Activity, ChatMessage, ChatPeer, Comment, Conversation, CurrentUser, DetailedProfile, Friend,
    FriendRequest, FriendshipStatus, Post, SimilarPost, UserId, UserProfile, UserSearchResult,
};

use crate::view::markup::{avatar_src, escape_html, or_placeholder};
use crate::view::time::format_time;

pub fn welcome(user: &CurrentUser) -> String {
    format!("Welcome, {}", escape_html(&user.username))
}

pub fn state_block(class: &str, icon: &str, text: &str) -> String {
    format!(
        r#"<div class="{class}"><i class="fas {icon}"></i><p>{}</p></div>"#,
        escape_html(text)
    )
}

// -- Activities --

pub fn activity_card(activity: &Activity) -> String {
    let join_button = if activity.is_joined {
        format!(
            r#"<button class="btn btn-outline-secondary w-100" data-action="leave" data-id="{id}">Leave</button>"#,
            id = activity.id
        )
    } else {
        format!(
            r#"<button class="btn btn-primary w-100" data-action="join" data-id="{id}">Join</button>"#,
            id = activity.id
        )
    };
    let favorite_class = if activity.is_favorited { "favorited" } else { "" };

    format!(
        r#"<div class="col-md-4 activity-card" data-id="{id}"><div class="card h-100"><div class="card-body"><h5 class="card-title">{title}</h5><p class="card-text"><span class="badge bg-secondary">{kind}</span></p><p class="card-text small">Time: {time}<br>Location: {location}</p>{join_button}<button class="btn btn-link favorite {favorite_class}" data-action="favorite" data-id="{id}">Favorite</button></div><div class="card-footer text-muted">Participants: {count}</div></div></div>"#,
        id = activity.id,
        title = escape_html(&activity.title),
        kind = escape_html(&activity.kind),
        time = escape_html(&activity.time),
        location = escape_html(&activity.location),
        count = activity.participant_total(),
    )
}

/// Compact row used by the joined and favorite lists on the profile page.
pub fn activity_row(activity: &Activity) -> String {
    format!(
        r#"<li class="list-group-item activity-row" data-id="{id}"><strong>{title}</strong> <span class="badge bg-secondary">{kind}</span> <small class="text-muted">{time} · {location}</small></li>"#,
        id = activity.id,
        title = escape_html(&activity.title),
        kind = escape_html(&activity.kind),
        time = escape_html(&activity.time),
        location = escape_html(&activity.location),
    )
}

// -- Friends --

pub fn friend_card(friend: &Friend) -> String {
    format!(
        r#"<div class="friend-card" data-user-id="{id}"><img src="{avatar}" alt="{name}" class="friend-avatar"><div class="flex-grow-1"><h5>{name}</h5><p class="text-muted small">{bio}</p></div><div><button class="btn btn-sm btn-primary" data-action="message" data-user-id="{id}">Message</button><button class="btn btn-sm btn-danger" data-action="remove" data-user-id="{id}">Remove</button></div></div>"#,
        id = escape_html(friend.user_id.as_str()),
        avatar = avatar_src(friend.avatar.as_deref()),
        name = escape_html(&friend.username),
        bio = or_placeholder(friend.bio.as_deref(), "No bio yet"),
    )
}

pub fn friend_request_card(request: &FriendRequest) -> String {
    format!(
        r#"<div class="friend-card" data-friendship-id="{id}"><img src="{avatar}" alt="{name}" class="friend-avatar"><div class="flex-grow-1"><h5>{name}</h5><p class="text-muted small">Requested: {at}</p></div><div><button class="btn btn-sm btn-success" data-action="accept" data-friendship-id="{id}">Accept</button><button class="btn btn-sm btn-danger" data-action="reject" data-friendship-id="{id}">Reject</button></div></div>"#,
        id = request.friendship_id,
        avatar = avatar_src(request.requester_avatar.as_deref()),
        name = escape_html(&request.requester_username),
        at = or_placeholder(request.created_at.as_deref(), "unknown"),
    )
}

pub fn request_badge(count: u64) -> String {
    if count == 0 {
        String::new()
    } else {
        format!(r#"<span class="badge bg-danger" id="requestBadge">{count}</span>"#)
    }
}

/// What a search hit offers, driven by the existing friendship state.
pub fn friendship_action(user_id: &UserId, status: Option<FriendshipStatus>) -> String {
    let id = escape_html(user_id.as_str());
    match status {
        None => format!(
            r#"<button class="btn btn-sm btn-primary" data-action="add-friend" data-user-id="{id}">Add friend</button>"#
        ),
        Some(FriendshipStatus::Pending) => {
            r#"<span class="badge badge-pending">Pending</span>"#.to_string()
        }
        Some(FriendshipStatus::Accepted) => {
            r#"<span class="badge badge-accepted">Friends</span>"#.to_string()
        }
        Some(FriendshipStatus::Rejected) => format!(
            r#"<button class="btn btn-sm btn-primary" data-action="add-friend" data-user-id="{id}">Add again</button>"#
        ),
    }
}

pub fn search_result_card(user: &UserSearchResult) -> String {
    format!(
        r#"<div class="friend-card" data-user-id="{id}"><img src="{avatar}" alt="{name}" class="friend-avatar"><div class="flex-grow-1"><h5>{name}</h5><p class="text-muted small">{bio}</p></div><div>{action}</div></div>"#,
        id = escape_html(user.user_id.as_str()),
        avatar = avatar_src(user.avatar.as_deref()),
        name = escape_html(&user.username),
        bio = or_placeholder(user.bio.as_deref(), "No bio yet"),
        action = friendship_action(&user.user_id, user.friendship_status),
    )
}

// -- Messages --

pub fn conversation_item(conversation: &Conversation, active_peer: Option<&UserId>) -> String {
    let active = if active_peer == Some(&conversation.user_id) {
        " active"
    } else {
        ""
    };
    let own_prefix = if conversation.is_own_last_message {
        "Me: "
    } else {
        ""
    };
    let unread = if conversation.unread_count > 0 {
        format!(
            r#"<span class="unread-badge">{}</span>"#,
            conversation.unread_count
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="conversation-item{active}" data-user-id="{id}"><img src="{avatar}" alt="{name}" class="conversation-avatar"><div class="conversation-info"><span class="conversation-name">{name}</span><span class="conversation-time">{time}</span><span class="conversation-preview">{own_prefix}{preview}</span>{unread}</div></div>"#,
        id = escape_html(conversation.user_id.as_str()),
        avatar = avatar_src(conversation.avatar.as_deref()),
        name = escape_html(&conversation.username),
        time = format_time(conversation.last_message_time.as_deref()),
        preview = escape_html(&conversation.last_message),
    )
}

pub fn message_bubble(message: &ChatMessage) -> String {
    let side = if message.is_own { "own" } else { "other" };
    format!(
        r#"<div class="message-item {side}"><div class="message-bubble"><div>{content}</div><div class="message-time">{time}</div></div></div>"#,
        content = escape_html(&message.content),
        time = format_time(message.created_at.as_deref()),
    )
}

pub fn chat_header(peer: &ChatPeer) -> String {
    format!(
        r#"<div class="chat-header"><img src="{avatar}" alt="{name}" class="conversation-avatar"><h5>{name}</h5></div>"#,
        avatar = avatar_src(peer.avatar.as_deref()),
        name = escape_html(&peer.username),
    )
}

// -- Posts --

pub fn post_card(post: &Post) -> String {
    let tags: String = post
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">#{}</span>"#, escape_html(tag)))
        .collect();
    let reacted = if post.reactions.reacted { " reacted" } else { "" };

    format!(
        r#"<div class="post-card" data-post-id="{id}"><h5 class="post-title">{title}</h5><span class="badge bg-info">{category}</span><div class="post-tags">{tags}</div><div class="post-meta"><span class="author">{author}</span><span class="post-time">{time}</span></div><div class="post-stats"><span class="media-count">{media} attachments</span><span class="reaction-count{reacted}">{likes} likes</span><span class="comment-count">{comments} comments</span></div></div>"#,
        id = post.id,
        title = escape_html(&post.title),
        category = escape_html(&post.category),
        author = or_placeholder(post.author_name.as_deref(), "Anonymous"),
        time = format_time(post.created_at.as_deref()),
        media = post.media.len(),
        likes = post.reactions.count,
        comments = post.comment_count,
    )
}

pub fn post_detail(post: &Post, comments: &[Comment]) -> String {
    let media: String = post
        .media
        .iter()
        .map(|item| {
            format!(
                r#"<a class="media-item" href="{url}">{name}</a>"#,
                url = escape_html(&item.url),
                name = or_placeholder(item.name.as_deref(), &item.url),
            )
        })
        .collect();
    let thread = if comments.is_empty() {
        state_block("empty-comments", "fa-comment-slash", "No comments yet")
    } else {
        comment_tree(comments)
    };

    format!(
        r#"<div class="post-detail" data-post-id="{id}"><h4>{title}</h4><span class="badge bg-info">{category}</span><div class="post-content">{content}</div><div class="post-media">{media}</div><button class="btn btn-outline-primary react" data-action="react" data-post-id="{id}">Like ({likes})</button><div class="comments">{thread}</div></div>"#,
        id = post.id,
        title = escape_html(&post.title),
        category = escape_html(&post.category),
        content = escape_html(post.content.as_deref().unwrap_or_default()),
        likes = post.reactions.count,
    )
}

/// Nested list of an already assembled comment tree.
pub fn comment_tree(comments: &[Comment]) -> String {
    let items: String = comments
        .iter()
        .map(|comment| {
            let replies = if comment.replies.is_empty() {
                String::new()
            } else {
                comment_tree(&comment.replies)
            };
            format!(
                r#"<li class="comment" data-comment-id="{id}"><span class="comment-author">{author}</span><span class="comment-body">{content}</span><span class="comment-time">{time}</span>{replies}</li>"#,
                id = comment.id,
                author = or_placeholder(comment.author_name.as_deref(), "Anonymous"),
                content = escape_html(&comment.content),
                time = format_time(comment.created_at.as_deref()),
            )
        })
        .collect();
    format!(r#"<ul class="comment-list">{items}</ul>"#)
}

pub fn similar_posts_advisory(candidates: &[SimilarPost]) -> String {
    if candidates.is_empty() {
        return String::new();
    }
    let items: String = candidates
        .iter()
        .map(|candidate| {
            format!(
                r#"<li data-post-id="{id}">{title} <small>({score:.0}% similar)</small></li>"#,
                id = candidate.id,
                title = escape_html(&candidate.title),
                score = candidate.score * 100.0,
            )
        })
        .collect();
    format!(
        r#"<div class="alert alert-info similar-posts"><p>Posts that look similar to yours:</p><ul>{items}</ul></div>"#
    )
}

// -- Profile --

pub fn profile_summary(profile: &UserProfile) -> String {
    format!(
        r#"<div class="profile-summary" data-user-id="{id}"><img src="{avatar}" alt="{name}" class="profile-avatar"><h4>{name}</h4><p>{email}</p><p>{major}</p><p>{bio}</p></div>"#,
        id = escape_html(profile.user_id.as_str()),
        avatar = avatar_src(profile.avatar.as_deref()),
        name = escape_html(&profile.username),
        email = or_placeholder(profile.email.as_deref(), "No email"),
        major = or_placeholder(profile.major.as_deref(), "No major"),
        bio = or_placeholder(profile.bio.as_deref(), "No bio yet"),
    )
}

pub fn detailed_profile(profile: &DetailedProfile) -> String {
    let rows = [
        ("Name", profile.real_name.as_deref()),
        ("Gender", profile.gender.as_deref()),
        ("Birthday", profile.birthday.as_deref()),
        ("Major", profile.major.as_deref()),
        ("Grade", profile.grade.as_deref()),
        ("Phone", profile.phone.as_deref()),
        ("Email", profile.email.as_deref()),
    ];
    let items: String = rows
        .iter()
        .map(|(label, value)| {
            format!(
                "<dt>{label}</dt><dd>{}</dd>",
                or_placeholder(*value, "Not set")
            )
        })
        .collect();
    let interests = if profile.interests.is_empty() {
        "Not set".to_string()
    } else {
        escape_html(&profile.interests.join(", "))
    };
    format!(r#"<dl class="profile-details">{items}<dt>Interests</dt><dd>{interests}</dd></dl>"#)
}

pub fn completion_meter(score: u8) -> String {
    format!(
        r#"<div class="progress"><div class="progress-bar" role="progressbar" style="width: {score}%" aria-valuenow="{score}">{score}% complete</div></div>"#
    )
}
