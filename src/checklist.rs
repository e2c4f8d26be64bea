use crate::models::{Category, TaskDefinition};

/// A named checklist configuration with its fixed task set. Supplied to the
/// tracker at startup and immutable for the life of the process.
#[derive(Debug, Clone)]
pub struct ChecklistVariant {
    pub name: &'static str,
    pub tasks: Vec<TaskDefinition>,
}

impl ChecklistVariant {
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "express" => Some(Self::express()),
            "full" => Some(Self::full()),
            _ => None,
        }
    }

    /// The short daily routine: 6 tasks, 3 social / 2 conversation / 1 content.
    pub fn express() -> Self {
        Self {
            name: "express",
            tasks: vec![
                task("add-friends", Category::Social, 10, "Add 5 new friends or followers"),
                task("engage-posts", Category::Social, 10, "Comment on 10 posts in your niche"),
                task("share-story", Category::Social, 15, "Post a story or status update"),
                task("new-conversations", Category::Conversation, 20, "Start 5 new conversations"),
                task("follow-ups", Category::Conversation, 20, "Follow up with 3 prospects"),
                task("publish-content", Category::Content, 25, "Publish one piece of value content"),
            ],
        }
    }

    /// The extended routine: 10 tasks, 5 social / 3 conversation / 2 content.
    pub fn full() -> Self {
        Self {
            name: "full",
            tasks: vec![
                task("add-friends", Category::Social, 10, "Add 10 new friends or followers"),
                task("engage-posts", Category::Social, 10, "Comment on 20 posts in your niche"),
                task("share-story", Category::Social, 15, "Post a story or status update"),
                task("group-engagement", Category::Social, 10, "Engage in 2 community groups"),
                task("celebrate-wins", Category::Social, 15, "Recognize a teammate's win publicly"),
                task("new-conversations", Category::Conversation, 20, "Start 10 new conversations"),
                task("follow-ups", Category::Conversation, 20, "Follow up with 5 prospects"),
                task("invite-presentation", Category::Conversation, 20, "Invite 2 prospects to a presentation"),
                task("publish-content", Category::Content, 25, "Publish one piece of value content"),
                task("record-video", Category::Content, 25, "Record a short value video"),
            ],
        }
    }

    pub fn total_tasks(&self) -> u32 {
        self.tasks.len() as u32
    }

    pub fn total_xp(&self) -> u32 {
        self.tasks.iter().map(|def| def.xp_value).sum()
    }
}

fn task(id: &str, category: Category, xp_value: u32, label: &str) -> TaskDefinition {
    TaskDefinition {
        id: id.to_string(),
        category,
        xp_value,
        label: label.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn express_variant_shape() {
        let variant = ChecklistVariant::express();
        assert_eq!(variant.total_tasks(), 6);
        let social = variant.tasks.iter().filter(|t| t.category == Category::Social).count();
        let conversation = variant
            .tasks
            .iter()
            .filter(|t| t.category == Category::Conversation)
            .count();
        let content = variant.tasks.iter().filter(|t| t.category == Category::Content).count();
        assert_eq!((social, conversation, content), (3, 2, 1));
        assert_eq!(variant.total_xp(), 100);
    }

    #[test]
    fn variant_lookup() {
        assert!(ChecklistVariant::by_name("express").is_some());
        assert!(ChecklistVariant::by_name("full").is_some());
        assert!(ChecklistVariant::by_name("marathon").is_none());
    }

    #[test]
    fn task_ids_are_unique_per_variant() {
        for variant in [ChecklistVariant::express(), ChecklistVariant::full()] {
            let mut ids: Vec<_> = variant.tasks.iter().map(|t| t.id.clone()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), variant.tasks.len(), "duplicate id in {}", variant.name);
        }
    }
}
