use crate::models::{Category, ProgressSnapshot, TaskDefinition, TaskState};
use std::collections::BTreeMap;

/// Derives a fresh snapshot from the current task states in a single pass.
/// Pure function of its inputs; callers re-run it after every toggle, load,
/// and reset instead of patching counters in place.
pub fn build_snapshot(definitions: &[TaskDefinition], states: &[TaskState]) -> ProgressSnapshot {
    let mut per_category: BTreeMap<Category, u32> = BTreeMap::new();
    per_category.insert(Category::Social, 0);
    per_category.insert(Category::Conversation, 0);
    per_category.insert(Category::Content, 0);

    let mut total_xp_earned = 0u32;
    let mut total_completed = 0u32;

    for (definition, state) in definitions.iter().zip(states) {
        if state.checked {
            *per_category.entry(definition.category).or_default() += 1;
            total_xp_earned += definition.xp_value;
            total_completed += 1;
        }
    }

    ProgressSnapshot {
        per_category,
        total_xp_earned,
        total_completed,
        completion_percentage: percentage(total_completed, definitions.len() as u32),
    }
}

// Round half up: 12.5% -> 13.
fn percentage(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((200 * completed + total) / (2 * total)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistVariant;

    fn states_with_checked(variant: &ChecklistVariant, checked: &[&str]) -> Vec<TaskState> {
        variant
            .tasks
            .iter()
            .map(|def| TaskState {
                task_id: def.id.clone(),
                checked: checked.contains(&def.id.as_str()),
            })
            .collect()
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let variant = ChecklistVariant::express();
        let states = states_with_checked(&variant, &[]);
        let snapshot = build_snapshot(&variant.tasks, &states);
        assert_eq!(snapshot.total_completed, 0);
        assert_eq!(snapshot.total_xp_earned, 0);
        assert_eq!(snapshot.completion_percentage, 0);
        assert!(snapshot.per_category.values().all(|count| *count == 0));
    }

    #[test]
    fn xp_and_counts_match_checked_subset() {
        let variant = ChecklistVariant::express();
        let states = states_with_checked(&variant, &["add-friends", "follow-ups", "publish-content"]);
        let snapshot = build_snapshot(&variant.tasks, &states);
        assert_eq!(snapshot.total_completed, 3);
        assert_eq!(snapshot.total_xp_earned, 10 + 20 + 25);
        assert_eq!(snapshot.per_category[&Category::Social], 1);
        assert_eq!(snapshot.per_category[&Category::Conversation], 1);
        assert_eq!(snapshot.per_category[&Category::Content], 1);
        assert_eq!(snapshot.completion_percentage, 50);
    }

    #[test]
    fn per_category_counts_sum_to_total() {
        let variant = ChecklistVariant::full();
        let checked: Vec<&str> = variant.tasks.iter().take(7).map(|t| t.id.as_str()).collect();
        let states = states_with_checked(&variant, &checked);
        let snapshot = build_snapshot(&variant.tasks, &states);
        let category_sum: u32 = snapshot.per_category.values().sum();
        assert_eq!(category_sum, snapshot.total_completed);
        assert_eq!(snapshot.total_completed, 7);
    }

    #[test]
    fn full_completion_is_one_hundred_percent() {
        let variant = ChecklistVariant::express();
        let checked: Vec<&str> = variant.tasks.iter().map(|t| t.id.as_str()).collect();
        let states = states_with_checked(&variant, &checked);
        let snapshot = build_snapshot(&variant.tasks, &states);
        assert_eq!(snapshot.completion_percentage, 100);
        assert_eq!(snapshot.total_xp_earned, variant.total_xp());
    }

    #[test]
    fn aggregation_is_idempotent() {
        let variant = ChecklistVariant::express();
        let states = states_with_checked(&variant, &["share-story", "new-conversations"]);
        let first = build_snapshot(&variant.tasks, &states);
        let second = build_snapshot(&variant.tasks, &states);
        assert_eq!(first, second);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13); // 12.5
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 6), 50);
        assert_eq!(percentage(0, 0), 0);
    }
}
