use crate::errors::AppError;
use crate::models::{
    ResetRequest, ResetResponse, StateResponse, SubmitResponse, ToggleRequest, ToggleResponse,
};
use crate::state::{App, AppState};
use crate::storage::persist_store;
use crate::streak::seconds_until_next_day;
use crate::tracker::{DailyChecklistTracker, ResetScope};
use crate::ui::render_index;
use axum::{extract::State, response::Html, Json};
use chrono::{DateTime, Local};
use tracing::warn;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let now = Local::now();
    let mut app = state.app.lock().await;
    app.tracker.roll_over_if_needed(now.date_naive());
    Html(render_index(&app.tracker, now))
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let now = Local::now();
    let mut app = state.app.lock().await;
    app.tracker.roll_over_if_needed(now.date_naive());
    Json(state_response(&app.tracker, now))
}

pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, AppError> {
    let now = Local::now();
    let mut app = state.app.lock().await;
    let App { tracker, store } = &mut *app;

    let Some(outcome) = tracker.toggle_at(&payload.task_id, store, now.date_naive()) else {
        return Err(AppError::bad_request(format!(
            "unknown task id '{}'",
            payload.task_id
        )));
    };

    let mut warning = outcome.warning;
    persist_or_warn(&state, &app, "toggle", &mut warning).await;

    Ok(Json(ToggleResponse {
        changed: outcome.changed,
        warning,
        state: state_response(&app.tracker, now),
    }))
}

pub async fn submit(State(state): State<AppState>) -> Json<SubmitResponse> {
    let now = Local::now();
    let mut app = state.app.lock().await;
    let App { tracker, store } = &mut *app;

    let outcome = tracker.submit_at(store, now);

    let mut warning = outcome.warning;
    if outcome.accepted {
        persist_or_warn(&state, &app, "submit", &mut warning).await;
    }

    Json(SubmitResponse {
        accepted: outcome.accepted,
        reason: outcome.reason,
        warning,
        state: state_response(&app.tracker, now),
    })
}

pub async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<ResetResponse>, AppError> {
    let Some(scope) = ResetScope::parse(payload.scope.trim()) else {
        return Err(AppError::bad_request("scope must be 'daily' or 'all'"));
    };

    let now = Local::now();
    let mut app = state.app.lock().await;
    let App { tracker, store } = &mut *app;

    tracker.roll_over_if_needed(now.date_naive());
    tracker.reset(scope, store);

    let mut warning = None;
    persist_or_warn(&state, &app, "reset", &mut warning).await;

    Ok(Json(ResetResponse {
        warning,
        state: state_response(&app.tracker, now),
    }))
}

// In-memory state stays authoritative when the disk write fails; the caller
// just gets told about it.
async fn persist_or_warn(state: &AppState, app: &App, action: &str, warning: &mut Option<String>) {
    if let Err(err) = persist_store(&state.data_path, &app.store).await {
        warn!("failed to persist store after {action}: {}", err.message);
        let message = "changes could not be saved to disk";
        match warning {
            Some(existing) => {
                existing.push_str("; ");
                existing.push_str(message);
            }
            None => *warning = Some(message.to_string()),
        }
    }
}

fn state_response(tracker: &DailyChecklistTracker, now: DateTime<Local>) -> StateResponse {
    StateResponse {
        date: tracker.date().to_string(),
        variant: tracker.variant_name().to_string(),
        tasks: tracker.task_views(),
        snapshot: tracker.snapshot().clone(),
        submission_state: tracker.submission_state(),
        streak_days: tracker.streak_days(),
        total_xp_all_time: tracker.stats().total_xp_all_time,
        seconds_until_next_day: seconds_until_next_day(now),
    }
}
