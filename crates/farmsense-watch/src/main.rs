use anyhow::Result;
use farmsense_watch::client::WatchClient;
use farmsense_watch::config::WatchConfig;
use farmsense_watch::notify::NotificationBoard;
use farmsense_watch::render;
use farmsense_watch::screen::Screen;
use farmsense_watch::tracker::CriticalTracker;
use std::time::Instant;
use tokio::signal;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  farmsense-watch [config.toml]                          Poll the server and show the herd");
    eprintln!("  farmsense-watch details <config.toml> <animal-id>      Show the full record of one animal");
}

#[allow(clippy::print_stdout)]
fn show(text: &str) {
    println!("{text}");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("farmsense=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("details") => {
            let config_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("details requires <config.toml> and <animal-id> arguments")
            })?;
            let id = args.get(3).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("details requires <animal-id> argument")
            })?;
            let config = WatchConfig::load(config_path)?;
            let client = build_client(&config)?;
            let animal = client.fetch_animal(id).await?;
            show(&render::details(&animal));
            Ok(())
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config = match args.get(1) {
                Some(path) => WatchConfig::load(path)?,
                None => match WatchConfig::load("config/watch.toml") {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!(error = %e, "No config/watch.toml, using defaults");
                        WatchConfig::default()
                    }
                },
            };
            run_watch(config).await
        }
    }
}

fn build_client(config: &WatchConfig) -> Result<WatchClient> {
    let client = WatchClient::new(
        config.base_url(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    Ok(client)
}

async fn run_watch(config: WatchConfig) -> Result<()> {
    let client = build_client(&config)?;
    let mut tracker = CriticalTracker::new();
    let mut board =
        NotificationBoard::new(Duration::from_secs(config.notification_dismiss_secs));
    let mut screen = Screen::new();

    tracing::info!(
        server = %client.base_url(),
        poll_ms = config.poll_interval_ms,
        dismiss_secs = config.notification_dismiss_secs,
        "farmsense-watch starting"
    );

    let mut tick = interval(Duration::from_millis(config.poll_interval_ms.max(1)));
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = tick.tick() => {
                let now = Instant::now();
                if board.expire(now).is_some() {
                    show("(critical alert dismissed)");
                }

                let animals = match client.fetch_animals().await {
                    Ok(animals) => animals,
                    Err(e) => {
                        if let Some(line) = screen.on_error(&e) {
                            show(&line);
                        }
                        tracing::debug!(error = %e, "Poll failed");
                        continue;
                    }
                };

                for animal in tracker.observe(&animals) {
                    let text = render::critical_popup(animal);
                    board.show(animal.record.id.clone(), text.clone(), now);
                    tracing::info!(animal_id = %animal.record.id, display_id = %animal.record.display_id, "Animal became critical");
                    show(&text);
                }

                if let Some(dashboard) = screen.on_poll(&animals) {
                    show(&dashboard);
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
        }
    }

    Ok(())
}
