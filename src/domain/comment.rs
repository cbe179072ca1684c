use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A comment on an animal's wall.
///
/// A comment with no parent is a root comment and anchors a thread; one
/// with a parent is a reply, and the parent must sit on the same animal.
/// The animal, author, and parent references are lookups, not ownership:
/// the animal exclusively owns its comments and deletes them when it
/// goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub(crate) id: Uuid,
    pub(crate) content: String,
    pub(crate) posted: DateTime<Utc>,
    /// Identifier of the animal the comment sits on.
    pub(crate) animal: Uuid,
    /// Identifier of the authoring user.
    pub(crate) author: Uuid,
    /// Identifier of the parent comment; `None` marks a root comment.
    pub(crate) parent: Option<Uuid>,
}

impl Comment {
    pub(crate) fn new(content: String, animal: Uuid, author: Uuid, parent: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            posted: Utc::now(),
            animal,
            author,
            parent,
        }
    }

    /// The comment's opaque identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The comment body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the comment was posted.
    #[must_use]
    pub const fn posted(&self) -> DateTime<Utc> {
        self.posted
    }

    /// Identifier of the animal this comment sits on.
    #[must_use]
    pub const fn animal(&self) -> Uuid {
        self.animal
    }

    /// Identifier of the parent comment, if this is a reply.
    #[must_use]
    pub const fn parent(&self) -> Option<Uuid> {
        self.parent
    }

    /// Whether this comment anchors a thread rather than replying to one.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
