use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Social,
    Conversation,
    Content,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Social => "social",
            Category::Conversation => "conversation",
            Category::Content => "content",
        }
    }
}

/// Static task description, fixed per checklist variant.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDefinition {
    pub id: String,
    pub category: Category,
    pub xp_value: u32,
    pub label: String,
}

/// Runtime checked flag, one per task definition.
#[derive(Debug, Clone)]
pub struct TaskState {
    pub task_id: String,
    pub checked: bool,
}

/// Derived progress view. Always recomputed from the task states, never
/// incrementally patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub per_category: BTreeMap<Category, u32>,
    pub total_xp_earned: u32,
    pub total_completed: u32,
    pub completion_percentage: u8,
}

/// Persisted record for one calendar day of one checklist variant.
/// Superseded, never merged, when the stored date or variant no longer
/// matches the running session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProgressRecord {
    pub date: String,
    pub variant: String,
    pub checked_task_ids: BTreeSet<String>,
    pub snapshot: ProgressSnapshot,
    pub submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
}

/// Persisted cross-day stats. `last_completed_date` is an ISO calendar day
/// (YYYY-MM-DD).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalStatsRecord {
    pub current_streak_days: u32,
    pub last_completed_date: Option<String>,
    pub total_xp_all_time: u64,
    pub today_completed_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionState {
    Incomplete,
    Ready,
    Submitted,
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub xp_value: u32,
    pub checked: bool,
}

#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub date: String,
    pub variant: String,
    pub tasks: Vec<TaskView>,
    pub snapshot: ProgressSnapshot,
    pub submission_state: SubmissionState,
    pub streak_days: u32,
    pub total_xp_all_time: u64,
    pub seconds_until_next_day: i64,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub task_id: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub state: StateResponse,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub state: StateResponse,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub scope: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub state: StateResponse,
}
