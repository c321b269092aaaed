//! Agent binary.
//!
//! Composition root that assembles the runtime against an offline in-memory
//! host, feeds it interactions read from stdin (one JSON object per line), and
//! echoes idle and skill events to stdout as JSON lines.
//!
//! # Examples
//!
//! ```bash
//! echo '{"actor":"goblin","amount":12}' | AGENT_NAME=warden cargo run -p agent-client
//! ```

mod host;
mod input;
mod logging;

use std::sync::Arc;

use agent_runtime::{AgentRuntime, Event, RuntimeConfig, Topic};
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    let session_id = logging::session_id(config.session_id.as_deref());
    logging::setup_logging(&session_id)?;

    tracing::info!(
        character = %config.profile.name,
        status = %config.profile.status,
        idle_tracking = config.profile.idle_tracking,
        "Starting agent"
    );

    let host = Arc::new(host::offline_host(&config));
    let runtime = AgentRuntime::builder()
        .config(config)
        .host(host)
        .build()
        .await?;
    let handle = runtime.handle();

    let echo = spawn_echo(
        handle.subscribe(Topic::Idle),
        handle.subscribe(Topic::Skill),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    break;
                };
                match input::parse_line(&line) {
                    Ok(Some(event)) => {
                        let outcomes = handle.dispatch(event).await?;
                        tracing::debug!(?outcomes, "interaction handled");
                    }
                    Ok(None) => {}
                    Err(error) => tracing::warn!("{error:#}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    let snapshot = handle.metrics();
    runtime.shutdown().await?;
    echo.abort();

    tracing::info!(
        ticks = snapshot.ticks,
        skills_fired = snapshot.skills_fired,
        idle_reports = snapshot.idle_reports,
        status_success_rate = snapshot.status_success_rate(),
        "Agent shutdown complete"
    );
    Ok(())
}

/// Forward idle and skill events to stdout until either topic closes.
fn spawn_echo(
    mut idle_rx: broadcast::Receiver<Event>,
    mut skill_rx: broadcast::Receiver<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                event = idle_rx.recv() => event,
                event = skill_rx.recv() => event,
            };
            match received {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => println!("{json}"),
                    Err(error) => tracing::warn!(%error, "failed to encode event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event echo lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
