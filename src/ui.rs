use crate::streak::seconds_until_next_day;
use crate::tracker::DailyChecklistTracker;
use chrono::{DateTime, Local};

pub fn render_index(tracker: &DailyChecklistTracker, now: DateTime<Local>) -> String {
    let snapshot = tracker.snapshot();
    let total = tracker.variant().total_tasks();
    INDEX_HTML
        .replace("{{DATE}}", &tracker.date().to_string())
        .replace("{{VARIANT}}", tracker.variant_name())
        .replace("{{TASK_ROWS}}", &render_task_rows(tracker))
        .replace("{{COMPLETED}}", &snapshot.total_completed.to_string())
        .replace("{{TOTAL}}", &total.to_string())
        .replace("{{PERCENT}}", &snapshot.completion_percentage.to_string())
        .replace("{{XP}}", &snapshot.total_xp_earned.to_string())
        .replace("{{XP_MAX}}", &tracker.variant().total_xp().to_string())
        .replace("{{STREAK}}", &tracker.streak_days().to_string())
        .replace("{{ALLTIME_XP}}", &tracker.stats().total_xp_all_time.to_string())
        .replace("{{COUNTDOWN}}", &format_countdown(seconds_until_next_day(now)))
}

fn render_task_rows(tracker: &DailyChecklistTracker) -> String {
    let locked = tracker.submitted_at().is_some();
    tracker
        .task_views()
        .iter()
        .map(|task| {
            format!(
                r#"<label class="task" data-task-id="{id}">
  <input type="checkbox" data-task-id="{id}"{checked}{disabled} />
  <span class="task-label">{label}</span>
  <span class="badge badge-{category}">{category}</span>
  <span class="xp">+{xp} XP</span>
</label>"#,
                id = task.id,
                label = task.label,
                category = task.category.as_str(),
                xp = task.xp_value,
                checked = if task.checked { " checked" } else { "" },
                disabled = if locked { " disabled" } else { "" },
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_countdown(seconds: i64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Daily Method Operations</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #eef3fb;
      --bg-2: #c9dcf5;
      --ink: #22283a;
      --accent: #4a6bff;
      --accent-2: #2f4858;
      --gold: #e8a23d;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #e4edfb 60%, #f2f6fc 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
      animation: rise 600ms ease;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: baseline;
      justify-content: space-between;
      gap: 6px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 0;
      color: #5b6275;
      font-size: 1rem;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 16px;
    }

    .stat {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 8px;
    }

    .stat .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b90a0;
    }

    .stat .value {
      display: block;
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .stat .value.streak {
      color: var(--gold);
    }

    .progress-card {
      background: white;
      border-radius: 20px;
      padding: 20px;
      border: 1px solid rgba(47, 72, 88, 0.08);
      display: grid;
      gap: 12px;
    }

    .progress-track {
      height: 14px;
      border-radius: 999px;
      background: rgba(47, 72, 88, 0.1);
      overflow: hidden;
    }

    .progress-fill {
      height: 100%;
      width: 0;
      border-radius: 999px;
      background: linear-gradient(90deg, var(--accent), #7a93ff);
      transition: width 250ms ease;
    }

    .category-row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      font-size: 0.9rem;
      color: #5b6275;
    }

    .category-row span {
      background: rgba(74, 107, 255, 0.08);
      border-radius: 999px;
      padding: 4px 12px;
    }

    .tasks {
      display: grid;
      gap: 10px;
    }

    .task {
      display: flex;
      align-items: center;
      gap: 12px;
      background: white;
      border: 1px solid rgba(47, 72, 88, 0.08);
      border-radius: 16px;
      padding: 14px 16px;
      cursor: pointer;
      transition: border-color 150ms ease, transform 150ms ease;
    }

    .task:hover {
      border-color: rgba(74, 107, 255, 0.4);
    }

    .task:has(input:checked) .task-label {
      text-decoration: line-through;
      color: #8b90a0;
    }

    .task:has(input:disabled) {
      cursor: default;
      opacity: 0.75;
    }

    .task input {
      width: 20px;
      height: 20px;
      accent-color: var(--accent);
    }

    .task-label {
      flex: 1;
      font-size: 1rem;
    }

    .badge {
      font-size: 0.75rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      border-radius: 999px;
      padding: 3px 10px;
    }

    .badge-social {
      background: rgba(74, 107, 255, 0.12);
      color: var(--accent);
    }

    .badge-conversation {
      background: rgba(47, 72, 88, 0.12);
      color: var(--accent-2);
    }

    .badge-content {
      background: rgba(232, 162, 61, 0.16);
      color: #b0701a;
    }

    .xp {
      font-weight: 600;
      color: var(--accent-2);
      font-size: 0.9rem;
      min-width: 56px;
      text-align: right;
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 14px 22px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      transition: transform 150ms ease, box-shadow 150ms ease;
    }

    button:active {
      transform: scale(0.98);
    }

    button:disabled {
      cursor: default;
      opacity: 0.55;
      box-shadow: none;
    }

    .btn-submit {
      background: var(--accent);
      color: white;
      box-shadow: 0 10px 24px rgba(74, 107, 255, 0.3);
    }

    .btn-reset {
      background: transparent;
      color: var(--accent-2);
      border: 1px solid rgba(47, 72, 88, 0.25);
    }

    .btn-reset.danger {
      color: #c63b2b;
      border-color: rgba(198, 59, 43, 0.35);
    }

    .countdown {
      margin-left: auto;
      font-variant-numeric: tabular-nums;
      color: #5b6275;
      font-size: 0.95rem;
    }

    .status {
      font-size: 0.95rem;
      color: #6b7084;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    .status[data-type="warn"] {
      color: #b0701a;
    }

    .hint {
      margin: 0;
      color: #6f7488;
      font-size: 0.9rem;
    }

    @keyframes rise {
      from {
        opacity: 0;
        transform: translateY(18px);
      }
      to {
        opacity: 1;
        transform: translateY(0);
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 22px;
      }
      .btn-submit {
        width: 100%;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Daily Method Operations</h1>
        <p class="subtitle">Checklist "<span id="variant">{{VARIANT}}</span>" for <span id="date">{{DATE}}</span></p>
      </div>
      <p class="subtitle countdown">Day resets in <span id="countdown">{{COUNTDOWN}}</span></p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">Completed</span>
        <span class="value"><span id="completed">{{COMPLETED}}</span>/<span id="total">{{TOTAL}}</span></span>
      </div>
      <div class="stat">
        <span class="label">XP today</span>
        <span class="value"><span id="xp">{{XP}}</span>/<span id="xp-max">{{XP_MAX}}</span></span>
      </div>
      <div class="stat">
        <span class="label">Streak</span>
        <span class="value streak"><span id="streak">{{STREAK}}</span> days</span>
      </div>
      <div class="stat">
        <span class="label">All-time XP</span>
        <span class="value" id="alltime-xp">{{ALLTIME_XP}}</span>
      </div>
    </section>

    <section class="progress-card">
      <div class="progress-track">
        <div class="progress-fill" id="progress-fill" style="width: {{PERCENT}}%"></div>
      </div>
      <div class="category-row" id="category-row"></div>
    </section>

    <section class="tasks" id="tasks">
{{TASK_ROWS}}
    </section>

    <section class="actions">
      <button class="btn-submit" id="submit-btn" type="button">Submit today's DMO</button>
      <button class="btn-reset" id="reset-daily-btn" type="button">Reset today</button>
      <button class="btn-reset danger" id="reset-all-btn" type="button">Reset everything</button>
    </section>

    <div class="status" id="status"></div>
    <p class="hint">Progress is kept per calendar day. Complete every task to keep your streak alive; submitting locks the day.</p>
  </main>

  <script>
    const tasksEl = document.getElementById('tasks');
    const completedEl = document.getElementById('completed');
    const totalEl = document.getElementById('total');
    const xpEl = document.getElementById('xp');
    const streakEl = document.getElementById('streak');
    const alltimeXpEl = document.getElementById('alltime-xp');
    const dateEl = document.getElementById('date');
    const progressFillEl = document.getElementById('progress-fill');
    const categoryRowEl = document.getElementById('category-row');
    const countdownEl = document.getElementById('countdown');
    const submitBtn = document.getElementById('submit-btn');
    const resetDailyBtn = document.getElementById('reset-daily-btn');
    const resetAllBtn = document.getElementById('reset-all-btn');
    const statusEl = document.getElementById('status');

    let countdownSeconds = 0;
    let countdownTimer = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const formatCountdown = (seconds) => {
      const h = String(Math.floor(seconds / 3600)).padStart(2, '0');
      const m = String(Math.floor((seconds % 3600) / 60)).padStart(2, '0');
      const s = String(seconds % 60).padStart(2, '0');
      return `${h}:${m}:${s}`;
    };

    const renderCategories = (state) => {
      const totals = {};
      const done = {};
      state.tasks.forEach((task) => {
        totals[task.category] = (totals[task.category] || 0) + 1;
        if (task.checked) {
          done[task.category] = (done[task.category] || 0) + 1;
        }
      });
      categoryRowEl.innerHTML = Object.keys(totals)
        .map((name) => `<span>${name}: ${done[name] || 0}/${totals[name]}</span>`)
        .join('');
    };

    const render = (state) => {
      const locked = state.submission_state === 'submitted';

      state.tasks.forEach((task) => {
        const box = tasksEl.querySelector(`input[data-task-id="${task.id}"]`);
        if (box) {
          box.checked = task.checked;
          box.disabled = locked;
        }
      });

      dateEl.textContent = state.date;
      completedEl.textContent = state.snapshot.total_completed;
      totalEl.textContent = state.tasks.length;
      xpEl.textContent = state.snapshot.total_xp_earned;
      streakEl.textContent = state.streak_days;
      alltimeXpEl.textContent = state.total_xp_all_time;
      progressFillEl.style.width = `${state.snapshot.completion_percentage}%`;
      renderCategories(state);

      if (locked) {
        submitBtn.disabled = true;
        submitBtn.textContent = 'Submitted for today';
      } else {
        submitBtn.disabled = state.submission_state !== 'ready';
        submitBtn.textContent = "Submit today's DMO";
      }

      countdownSeconds = state.seconds_until_next_day;
      countdownEl.textContent = formatCountdown(countdownSeconds);
    };

    const handle = (payload) => {
      render(payload.state);
      if (payload.warning) {
        setStatus(payload.warning, 'warn');
      }
    };

    const loadState = async () => {
      const res = await fetch('/api/state');
      if (!res.ok) {
        throw new Error('Unable to load checklist state');
      }
      render(await res.json());
    };

    const sendToggle = async (taskId) => {
      const res = await fetch('/api/toggle', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ task_id: taskId })
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Toggle failed');
      }
      const payload = await res.json();
      handle(payload);
      if (!payload.changed) {
        setStatus('Today is already submitted; the checklist is locked.', 'warn');
      }
    };

    const sendSubmit = async () => {
      const res = await fetch('/api/submit', { method: 'POST' });
      if (!res.ok) {
        throw new Error(await res.text() || 'Submit failed');
      }
      const payload = await res.json();
      handle(payload);
      if (payload.accepted) {
        setStatus('Submitted. See you tomorrow!', 'ok');
      } else {
        setStatus(payload.reason || 'Submission rejected', 'error');
      }
    };

    const sendReset = async (scope) => {
      const res = await fetch('/api/reset', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ scope })
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Reset failed');
      }
      handle(await res.json());
      setStatus(scope === 'all' ? 'All progress and stats cleared.' : "Today's progress cleared.", 'ok');
    };

    tasksEl.addEventListener('change', (event) => {
      const taskId = event.target.dataset.taskId;
      if (taskId) {
        sendToggle(taskId).catch((err) => setStatus(err.message, 'error'));
      }
    });

    submitBtn.addEventListener('click', () => {
      sendSubmit().catch((err) => setStatus(err.message, 'error'));
    });

    resetDailyBtn.addEventListener('click', () => {
      sendReset('daily').catch((err) => setStatus(err.message, 'error'));
    });

    resetAllBtn.addEventListener('click', () => {
      if (window.confirm('Clear today AND the streak/XP history?')) {
        sendReset('all').catch((err) => setStatus(err.message, 'error'));
      }
    });

    const tick = () => {
      if (countdownSeconds > 0) {
        countdownSeconds -= 1;
        countdownEl.textContent = formatCountdown(countdownSeconds);
      } else {
        // New calendar day: pull the fresh (empty) checklist.
        loadState().catch((err) => setStatus(err.message, 'error'));
      }
    };

    countdownTimer = window.setInterval(tick, 1000);
    window.addEventListener('pagehide', () => {
      if (countdownTimer !== null) {
        window.clearInterval(countdownTimer);
        countdownTimer = null;
      }
    });

    loadState().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;
