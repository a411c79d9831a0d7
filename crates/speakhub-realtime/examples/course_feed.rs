//! Demo: a therapist session following one course over the in-memory
//! channel, with toasts printed to stdout.
//!
//! ```sh
//! cargo run -p speakhub-realtime --example course_feed
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use speakhub_core::config::ClientConfig;
use speakhub_core::result::AppResult;
use speakhub_core::types::{CourseId, UserId, UserRole};
use speakhub_realtime::channel::ChannelAuth;
use speakhub_realtime::notification::persistence::JsonFileRepository;
use speakhub_realtime::{MemoryChannel, SessionEngine, Toast, ToastSurface};

struct StdoutSurface;

impl ToastSurface for StdoutSurface {
    fn show(&self, toast: &Toast) -> AppResult<()> {
        println!(
            "[{}] {} — {}",
            toast.severity.as_str(),
            toast.summary,
            toast.detail.as_deref().unwrap_or("")
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::load("development")?;
    init_logging(&config);

    let repo = Arc::new(JsonFileRepository::new("data/notifications"));
    let engine = SessionEngine::new(&config.realtime, repo);
    engine.login(UserId::new(1), UserRole::Therapist).await?;
    engine.toasts().attach_surface(Arc::new(StdoutSurface));
    engine.toasts().mark_ready();

    let channel = MemoryChannel::new(config.realtime.channel_buffer_size);
    let course = CourseId::new(3);
    engine
        .follow_course(&channel, &ChannelAuth::new(course, "demo-token"))
        .await?;

    // Simulate the backend pushing a burst: duplicates collapse.
    let frame = r#"{"type":"submission_created","data":{"course_id":3,"course_exercise_id":5,"submission_id":17,"student_name":"Ana","exercise_name":"Vowel warmup","has_audio":true}}"#;
    channel.publish_frame(course, frame).await;
    channel.publish_frame(course, frame).await;
    channel.publish_frame(course, "{ not json").await;

    tokio::time::sleep(Duration::from_millis(500)).await;
    println!("stored records: {}", engine.store().unread_count());

    engine.logout().await?;
    Ok(())
}

fn init_logging(config: &ClientConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}
