//! Threaded commentary walls on animals.
//!
//! Each animal carries a wall of root comments; replies nest under them
//! to unbounded depth. The whole wall is rebuilt by one pass that groups
//! comments by parent id followed by a depth-first descent from the
//! roots, so no per-node lookups are needed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{Comment, Identity},
    error::{EmptyResult, Entity, Error, Mismatch},
    store::Zoo,
};

/// One comment on a wall, carrying its ordered reply subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadNode {
    /// Comment identifier.
    pub id: Uuid,
    /// Comment body.
    pub content: String,
    /// When the comment was posted.
    pub posted: DateTime<Utc>,
    /// Display name of the author.
    pub author: String,
    /// Direct replies, ascending by post time.
    pub replies: Vec<ThreadNode>,
}

impl Zoo {
    /// Posts a comment, or a reply when `parent` is given, on an
    /// animal's wall.
    ///
    /// The author comes from the explicitly passed, already-resolved
    /// caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank content,
    /// [`Error::NotFound`] when the animal, the author's user record, or
    /// the parent comment cannot be resolved, and [`Error::Mismatch`]
    /// when the parent comment sits on a different animal.
    pub fn add_comment(
        &mut self,
        content: &str,
        animal_name: &str,
        author: &Identity,
        parent: Option<Uuid>,
    ) -> Result<Uuid, Error> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::InvalidInput(
                "comment content must not be blank".to_string(),
            ));
        }

        let animal_id = self
            .animal_by_name(animal_name)
            .ok_or(Error::NotFound(Entity::Animal))?
            .id;
        let author_id = self
            .user_by_email(&author.email)
            .ok_or(Error::NotFound(Entity::User))?
            .id;

        if let Some(parent_id) = parent {
            let parent_comment = self
                .comments
                .get(parent_id)
                .ok_or(Error::NotFound(Entity::ParentComment))?;
            if parent_comment.animal != animal_id {
                return Err(Error::Mismatch(Mismatch::ReplyAnimal));
            }
        }

        let comment = Comment::new(content.to_string(), animal_id, author_id, parent);
        let id = comment.id;
        tracing::info!("comment posted by {}", author.email);
        self.comments.insert(id, comment);
        Ok(id)
    }

    /// The animal's wall: root comments ascending by post time, each
    /// carrying its recursively ordered reply subtree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no animal matches the name and
    /// [`Error::EmptyResult`] when the animal exists but has no comments
    /// at all.
    pub fn wall(&self, animal_name: &str) -> Result<Vec<ThreadNode>, Error> {
        let animal_id = self
            .animal_by_name(animal_name)
            .ok_or(Error::NotFound(Entity::Animal))?
            .id;

        let mut by_parent: HashMap<Option<Uuid>, Vec<&Comment>> = HashMap::new();
        for comment in self.comments_of_animal(animal_id) {
            by_parent.entry(comment.parent).or_default().push(comment);
        }
        if by_parent.is_empty() {
            return Err(Error::EmptyResult(EmptyResult::Comments));
        }
        for bucket in by_parent.values_mut() {
            bucket.sort_by_key(|comment| comment.posted);
        }

        let roots = by_parent.get(&None).cloned().unwrap_or_default();
        Ok(roots
            .into_iter()
            .map(|root| self.thread(root, &by_parent))
            .collect())
    }

    fn thread(
        &self,
        comment: &Comment,
        by_parent: &HashMap<Option<Uuid>, Vec<&Comment>>,
    ) -> ThreadNode {
        let replies = by_parent
            .get(&Some(comment.id))
            .map(|replies| {
                replies
                    .iter()
                    .map(|reply| self.thread(reply, by_parent))
                    .collect()
            })
            .unwrap_or_default();

        ThreadNode {
            id: comment.id,
            content: comment.content.clone(),
            posted: comment.posted,
            author: self.author_of(comment).name().to_string(),
            replies,
        }
    }

    /// Percentage of root comments, across all animals, that have at
    /// least one direct reply.
    ///
    /// A root with ten replies counts the same as a root with one.
    /// Formatted with one decimal place and a decimal dot, e.g.
    /// `"50.0%"`; zero roots yield `"0.0%"` rather than a
    /// division-by-zero fault.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn reply_ratio(&self) -> String {
        let roots: Vec<Uuid> = self
            .comments
            .iter()
            .filter(|comment| comment.is_root())
            .map(|comment| comment.id)
            .collect();
        if roots.is_empty() {
            return "0.0%".to_string();
        }

        let with_replies = roots
            .iter()
            .filter(|&&root| {
                self.comments
                    .iter()
                    .any(|comment| comment.parent == Some(root))
            })
            .count();

        let percentage = (with_replies as f64 / roots.len() as f64) * 100.0;
        format!("{percentage:.1}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn zoo_with_leo() -> (Zoo, Identity) {
        let mut zoo = Zoo::new();
        zoo.create_zone("Savanna").unwrap();
        zoo.create_species("Lion", "Savanna").unwrap();
        zoo.create_animal("Leo", "Lion", None).unwrap();
        zoo.register_staff("Ana", "ana@zoo.org", "secret").unwrap();
        let ana = Identity::resolved("ana@zoo.org", Role::Staff).unwrap();
        (zoo, ana)
    }

    #[test]
    fn commenting_requires_an_existing_animal_and_author() {
        let (mut zoo, ana) = zoo_with_leo();
        assert_eq!(
            zoo.add_comment("Hello", "Simba", &ana, None).unwrap_err(),
            Error::NotFound(Entity::Animal)
        );

        let ghost = Identity::resolved("ghost@zoo.org", Role::Staff).unwrap();
        assert_eq!(
            zoo.add_comment("Hello", "Leo", &ghost, None).unwrap_err(),
            Error::NotFound(Entity::User)
        );
    }

    #[test]
    fn blank_content_is_invalid_input() {
        let (mut zoo, ana) = zoo_with_leo();
        assert!(matches!(
            zoo.add_comment("   ", "Leo", &ana, None),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn replying_to_a_missing_parent_fails() {
        let (mut zoo, ana) = zoo_with_leo();
        assert_eq!(
            zoo.add_comment("Hello", "Leo", &ana, Some(Uuid::new_v4()))
                .unwrap_err(),
            Error::NotFound(Entity::ParentComment)
        );
    }

    #[test]
    fn replies_cannot_cross_animals() {
        let (mut zoo, ana) = zoo_with_leo();
        zoo.create_animal("Nala", "Lion", None).unwrap();
        let root = zoo.add_comment("On Leo", "Leo", &ana, None).unwrap();

        // Parent and animal both exist; the combination is what is wrong.
        assert_eq!(
            zoo.add_comment("On Nala", "Nala", &ana, Some(root))
                .unwrap_err(),
            Error::Mismatch(Mismatch::ReplyAnimal)
        );
    }

    #[test]
    fn wall_of_a_commentless_animal_is_an_empty_result() {
        let (zoo, _ana) = zoo_with_leo();
        assert_eq!(
            zoo.wall("Leo").unwrap_err(),
            Error::EmptyResult(EmptyResult::Comments)
        );
        assert_eq!(
            zoo.wall("Simba").unwrap_err(),
            Error::NotFound(Entity::Animal)
        );
    }

    #[test]
    fn wall_orders_roots_and_replies_by_post_time() {
        let (mut zoo, ana) = zoo_with_leo();
        let first = zoo.add_comment("First", "leo", &ana, None).unwrap();
        let second = zoo.add_comment("Second", "Leo", &ana, None).unwrap();
        let reply_a = zoo.add_comment("Reply A", "Leo", &ana, Some(first)).unwrap();
        let nested = zoo
            .add_comment("Nested", "Leo", &ana, Some(reply_a))
            .unwrap();
        zoo.add_comment("Reply B", "Leo", &ana, Some(first)).unwrap();

        let wall = zoo.wall("LEO").unwrap();
        assert_eq!(wall.len(), 2);
        assert_eq!(wall[0].id, first);
        assert_eq!(wall[1].id, second);
        assert_eq!(wall[0].author, "Ana");

        let replies: Vec<&str> = wall[0]
            .replies
            .iter()
            .map(|reply| reply.content.as_str())
            .collect();
        assert_eq!(replies, vec!["Reply A", "Reply B"]);
        assert_eq!(wall[0].replies[0].replies[0].id, nested);
        assert!(wall[1].replies.is_empty());
    }

    #[test]
    fn reply_ratio_on_an_empty_wall_is_zero() {
        let (zoo, _ana) = zoo_with_leo();
        assert_eq!(zoo.reply_ratio(), "0.0%");
    }

    #[test]
    fn reply_ratio_counts_roots_with_replies_once() {
        let (mut zoo, ana) = zoo_with_leo();
        let answered = zoo.add_comment("Answered", "Leo", &ana, None).unwrap();
        zoo.add_comment("Ignored", "Leo", &ana, None).unwrap();
        // Several replies to the same root still count it once.
        zoo.add_comment("Reply 1", "Leo", &ana, Some(answered)).unwrap();
        zoo.add_comment("Reply 2", "Leo", &ana, Some(answered)).unwrap();

        assert_eq!(zoo.reply_ratio(), "50.0%");
    }

    #[test]
    fn comment_scenario_end_to_end() {
        let (mut zoo, ana) = zoo_with_leo();
        zoo.create_animal("Nala", "Lion", None).unwrap();

        let c1 = zoo.add_comment("Leo looks great", "Leo", &ana, None).unwrap();
        zoo.add_comment("He really does", "Leo", &ana, Some(c1)).unwrap();
        assert_eq!(
            zoo.add_comment("Wrong wall", "Nala", &ana, Some(c1))
                .unwrap_err(),
            Error::Mismatch(Mismatch::ReplyAnimal)
        );

        // One root, and it has a reply.
        assert_eq!(zoo.reply_ratio(), "100.0%");
    }
}
