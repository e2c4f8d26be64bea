use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TaskView {
    id: String,
    category: String,
    xp_value: u32,
    checked: bool,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    total_xp_earned: u32,
    total_completed: u32,
    completion_percentage: u8,
}

#[derive(Debug, Deserialize)]
struct StateResponse {
    date: String,
    variant: String,
    tasks: Vec<TaskView>,
    snapshot: Snapshot,
    submission_state: String,
    streak_days: u32,
    total_xp_all_time: u64,
    seconds_until_next_day: i64,
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    changed: bool,
    state: StateResponse,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    accepted: bool,
    reason: Option<String>,
    state: StateResponse,
}

#[derive(Debug, Deserialize)]
struct ResetResponse {
    state: StateResponse,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("dmo_tracker_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/state")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_dmo_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("DMO_VARIANT", "express")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn get_state(client: &Client, base_url: &str) -> StateResponse {
    client
        .get(format!("{base_url}/api/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn toggle(client: &Client, base_url: &str, task_id: &str) -> ToggleResponse {
    client
        .post(format!("{base_url}/api/toggle"))
        .json(&serde_json::json!({ "task_id": task_id }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn submit(client: &Client, base_url: &str) -> SubmitResponse {
    client
        .post(format!("{base_url}/api/submit"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn reset(client: &Client, base_url: &str, scope: &str) -> ResetResponse {
    client
        .post(format!("{base_url}/api/reset"))
        .json(&serde_json::json!({ "scope": scope }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_state_lists_the_express_checklist() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let state = get_state(&client, &server.base_url).await;
    assert_eq!(state.variant, "express");
    assert_eq!(state.tasks.len(), 6);
    assert!(!state.date.is_empty());
    assert!(state.seconds_until_next_day > 0);
    assert!(state.seconds_until_next_day <= 86_400);

    let social = state.tasks.iter().filter(|t| t.category == "social").count();
    let conversation = state.tasks.iter().filter(|t| t.category == "conversation").count();
    let content = state.tasks.iter().filter(|t| t.category == "content").count();
    assert_eq!((social, conversation, content), (3, 2, 1));
}

#[tokio::test]
async fn http_toggle_flips_a_task_and_updates_the_snapshot() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    reset(&client, &server.base_url, "daily").await;

    let first = toggle(&client, &server.base_url, "add-friends").await;
    assert!(first.changed);
    assert_eq!(first.state.snapshot.total_completed, 1);
    assert_eq!(first.state.snapshot.total_xp_earned, 10);
    assert_eq!(first.state.snapshot.completion_percentage, 17);
    assert!(first
        .state
        .tasks
        .iter()
        .any(|t| t.id == "add-friends" && t.checked && t.xp_value == 10));

    let second = toggle(&client, &server.base_url, "add-friends").await;
    assert!(second.changed);
    assert_eq!(second.state.snapshot.total_completed, 0);
    assert_eq!(second.state.snapshot.total_xp_earned, 0);
}

#[tokio::test]
async fn http_unknown_task_is_a_bad_request() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let res = client
        .post(format!("{}/api/toggle", server.base_url))
        .json(&serde_json::json!({ "task_id": "meditate" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_invalid_reset_scope_is_a_bad_request() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let res = client
        .post(format!("{}/api/reset", server.base_url))
        .json(&serde_json::json!({ "scope": "weekly" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_submission_gate_and_reset_scopes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Start from a clean slate, stats included.
    reset(&client, &server.base_url, "all").await;

    let early = submit(&client, &server.base_url).await;
    assert!(!early.accepted);
    assert!(early.reason.unwrap().contains("more tasks required"));

    let state = get_state(&client, &server.base_url).await;
    for task in &state.tasks {
        toggle(&client, &server.base_url, &task.id).await;
    }

    let ready = get_state(&client, &server.base_url).await;
    assert_eq!(ready.submission_state, "ready");
    assert_eq!(ready.snapshot.completion_percentage, 100);
    assert_eq!(ready.streak_days, 1);
    assert_eq!(ready.total_xp_all_time, 100);

    let accepted = submit(&client, &server.base_url).await;
    assert!(accepted.accepted);
    assert_eq!(accepted.state.submission_state, "submitted");

    let again = submit(&client, &server.base_url).await;
    assert!(!again.accepted);
    assert!(again.reason.unwrap().contains("already submitted"));

    // The day is locked; toggles no longer change anything.
    let locked = toggle(&client, &server.base_url, "add-friends").await;
    assert!(!locked.changed);
    assert_eq!(locked.state.snapshot.total_completed, 6);

    // Daily reset clears the checklist but leaves the streak alone.
    let daily = reset(&client, &server.base_url, "daily").await;
    assert_eq!(daily.state.snapshot.total_completed, 0);
    assert_eq!(daily.state.submission_state, "incomplete");
    assert_eq!(daily.state.streak_days, 1);

    // Full reset also zeroes the cross-day stats.
    let all = reset(&client, &server.base_url, "all").await;
    assert_eq!(all.state.streak_days, 0);
    assert_eq!(all.state.total_xp_all_time, 0);
}
