use dmo_tracker::{
    load_store, resolve_data_path, router, AppState, ChecklistVariant, DailyChecklistTracker,
};
use std::{env, net::SocketAddr};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let data_path = resolve_data_path()?;
    if let Some(parent) = data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let variant_name = env::var("DMO_VARIANT").unwrap_or_else(|_| "express".to_string());
    let variant = ChecklistVariant::by_name(&variant_name)
        .ok_or_else(|| format!("unknown checklist variant '{variant_name}'"))?;
    info!("tracking variant '{}' ({} tasks)", variant.name, variant.tasks.len());

    let store = load_store(&data_path).await;
    let tracker = DailyChecklistTracker::restore(variant, &store);
    let state = AppState::new(data_path, tracker, store);

    let app = router(state);

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
