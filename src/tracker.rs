use crate::aggregate::build_snapshot;
use crate::checklist::ChecklistVariant;
use crate::models::{
    DailyProgressRecord, GlobalStatsRecord, ProgressSnapshot, SubmissionState, TaskState, TaskView,
};
use crate::store::{self, RecordStore};
use crate::streak::advance_streak;
use chrono::{DateTime, Local, NaiveDate};
use tracing::{info, warn};

/// The daily checklist state machine. Owns the per-task checked flags and the
/// derived snapshot for one calendar day, plus the cross-day stats record.
/// Every mutation runs aggregate-then-persist in that order; the snapshot is
/// always rebuilt from the checked set, never adjusted in place.
pub struct DailyChecklistTracker {
    variant: ChecklistVariant,
    tasks: Vec<TaskState>,
    date: NaiveDate,
    submitted: bool,
    submitted_at: Option<String>,
    snapshot: ProgressSnapshot,
    stats: GlobalStatsRecord,
}

#[derive(Debug, Default)]
pub struct ToggleOutcome {
    pub changed: bool,
    pub warning: Option<String>,
}

#[derive(Debug)]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub reason: Option<String>,
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Daily,
    All,
}

impl ResetScope {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "daily" => Some(ResetScope::Daily),
            "all" => Some(ResetScope::All),
            _ => None,
        }
    }
}

impl DailyChecklistTracker {
    pub fn restore(variant: ChecklistVariant, store: &dyn RecordStore) -> Self {
        Self::restore_at(variant, store, Local::now().date_naive())
    }

    /// Rebuilds the tracker from whatever the store holds. A daily record is
    /// applied only when its date is `today` and its variant matches; anything
    /// else is discarded, not merged.
    pub fn restore_at(variant: ChecklistVariant, store: &dyn RecordStore, today: NaiveDate) -> Self {
        let mut tasks: Vec<TaskState> = variant
            .tasks
            .iter()
            .map(|def| TaskState {
                task_id: def.id.clone(),
                checked: false,
            })
            .collect();
        let mut submitted = false;
        let mut submitted_at = None;

        if let Some(record) = store::load_daily(store) {
            if record.date == today.to_string() && record.variant == variant.name {
                for task in &mut tasks {
                    task.checked = record.checked_task_ids.contains(&task.task_id);
                }
                submitted = record.submitted;
                submitted_at = record.submitted_at;
            } else {
                info!(
                    "discarding stale daily record (stored {} / {}, today {} / {})",
                    record.date, record.variant, today, variant.name
                );
            }
        }

        let stats = store::load_stats(store).unwrap_or_default();
        let snapshot = build_snapshot(&variant.tasks, &tasks);

        Self {
            variant,
            tasks,
            date: today,
            submitted,
            submitted_at,
            snapshot,
            stats,
        }
    }

    /// Starts a fresh day if the calendar moved past the day this tracker was
    /// built for. Yesterday's record is superseded on the next write.
    pub fn roll_over_if_needed(&mut self, today: NaiveDate) {
        if self.date == today {
            return;
        }
        info!("day rollover: {} -> {}", self.date, today);
        for task in &mut self.tasks {
            task.checked = false;
        }
        self.submitted = false;
        self.submitted_at = None;
        self.date = today;
        self.snapshot = build_snapshot(&self.variant.tasks, &self.tasks);
    }

    pub fn toggle(&mut self, task_id: &str, store: &mut dyn RecordStore) -> Option<ToggleOutcome> {
        self.toggle_at(task_id, store, Local::now().date_naive())
    }

    /// Flips one checkbox. Returns `None` for an unknown task id. After
    /// submission the controls are locked for the day and the toggle is
    /// reported back as unchanged.
    pub fn toggle_at(
        &mut self,
        task_id: &str,
        store: &mut dyn RecordStore,
        today: NaiveDate,
    ) -> Option<ToggleOutcome> {
        self.roll_over_if_needed(today);
        let position = self.tasks.iter().position(|task| task.task_id == task_id)?;

        if self.submitted {
            return Some(ToggleOutcome {
                changed: false,
                warning: None,
            });
        }

        self.tasks[position].checked = !self.tasks[position].checked;
        self.snapshot = build_snapshot(&self.variant.tasks, &self.tasks);

        let mut warning = None;
        if self.snapshot.total_completed == self.variant.total_tasks() {
            // First entry into Ready for the day; re-entry after an uncheck
            // is a no-op inside advance_streak.
            if advance_streak(&mut self.stats, today) {
                self.stats.total_xp_all_time += u64::from(self.snapshot.total_xp_earned);
                self.stats.today_completed_count = self.snapshot.total_completed;
                if let Err(err) = store::save_stats(store, &self.stats) {
                    warn!("failed to persist global stats: {err}");
                    push_warning(&mut warning, "streak update could not be saved");
                }
            }
        }

        if let Err(err) = store::save_daily(store, &self.daily_record()) {
            warn!("failed to persist daily record: {err}");
            push_warning(&mut warning, "progress could not be saved");
        }

        Some(ToggleOutcome {
            changed: true,
            warning,
        })
    }

    pub fn submit(&mut self, store: &mut dyn RecordStore) -> SubmitOutcome {
        self.submit_at(store, Local::now())
    }

    /// Runs the submission gate. Acceptance happens exactly once per day and
    /// is committed in memory even if a persistence step fails; the failure
    /// is surfaced as a warning instead of rolling the submission back.
    pub fn submit_at(&mut self, store: &mut dyn RecordStore, now: DateTime<Local>) -> SubmitOutcome {
        self.roll_over_if_needed(now.date_naive());

        match self.submission_state() {
            SubmissionState::Incomplete => {
                let missing = self.variant.total_tasks() - self.snapshot.total_completed;
                let plural = if missing == 1 { "task" } else { "tasks" };
                SubmitOutcome {
                    accepted: false,
                    reason: Some(format!("{missing} more {plural} required")),
                    warning: None,
                }
            }
            SubmissionState::Submitted => SubmitOutcome {
                accepted: false,
                reason: Some("already submitted today".to_string()),
                warning: None,
            },
            SubmissionState::Ready => {
                self.submitted = true;
                self.submitted_at = Some(now.to_rfc3339());

                let mut warning = None;
                if let Err(err) = store::save_daily(store, &self.daily_record()) {
                    warn!("failed to persist submitted record: {err}");
                    push_warning(&mut warning, "submission could not be saved");
                }
                // The streak already advanced on entry into Ready; this only
                // re-writes the unchanged stats record.
                if let Err(err) = store::save_stats(store, &self.stats) {
                    warn!("failed to persist global stats at submission: {err}");
                    push_warning(&mut warning, "streak update could not be saved");
                }

                SubmitOutcome {
                    accepted: true,
                    reason: None,
                    warning,
                }
            }
        }
    }

    /// Clears today's progress. `All` additionally wipes the cross-day stats;
    /// nothing ever clears them implicitly.
    pub fn reset(&mut self, scope: ResetScope, store: &mut dyn RecordStore) {
        for task in &mut self.tasks {
            task.checked = false;
        }
        self.submitted = false;
        self.submitted_at = None;
        self.snapshot = build_snapshot(&self.variant.tasks, &self.tasks);
        store.remove(store::DAILY_RECORD_KEY);

        if scope == ResetScope::All {
            self.stats = GlobalStatsRecord::default();
            store.remove(store::GLOBAL_STATS_KEY);
        }
    }

    pub fn submission_state(&self) -> SubmissionState {
        if self.submitted {
            SubmissionState::Submitted
        } else if self.snapshot.total_completed == self.variant.total_tasks() {
            SubmissionState::Ready
        } else {
            SubmissionState::Incomplete
        }
    }

    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    pub fn stats(&self) -> &GlobalStatsRecord {
        &self.stats
    }

    pub fn streak_days(&self) -> u32 {
        self.stats.current_streak_days
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn variant_name(&self) -> &'static str {
        self.variant.name
    }

    pub fn variant(&self) -> &ChecklistVariant {
        &self.variant
    }

    pub fn submitted_at(&self) -> Option<&str> {
        self.submitted_at.as_deref()
    }

    pub fn task_views(&self) -> Vec<TaskView> {
        self.variant
            .tasks
            .iter()
            .zip(&self.tasks)
            .map(|(def, state)| TaskView {
                id: def.id.clone(),
                label: def.label.clone(),
                category: def.category,
                xp_value: def.xp_value,
                checked: state.checked,
            })
            .collect()
    }

    fn daily_record(&self) -> DailyProgressRecord {
        DailyProgressRecord {
            date: self.date.to_string(),
            variant: self.variant.name.to_string(),
            checked_task_ids: self
                .tasks
                .iter()
                .filter(|task| task.checked)
                .map(|task| task.task_id.clone())
                .collect(),
            snapshot: self.snapshot.clone(),
            submitted: self.submitted,
            submitted_at: self.submitted_at.clone(),
        }
    }
}

fn push_warning(slot: &mut Option<String>, message: &str) {
    match slot {
        Some(existing) => {
            existing.push_str("; ");
            existing.push_str(message);
        }
        None => *slot = Some(message.to_string()),
    }
}
