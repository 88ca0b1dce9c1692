use anyhow::Context;
use cardash_frontend::config::DashboardConfig;
use cardash_frontend::console;
use cardash_frontend::dashboard::LogRenderer;
use cardash_frontend::dispatch::HttpDispatcher;
use cardash_frontend::push::PushListener;
use cardash_frontend::runtime::Runtime;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional first argument overrides CARDASH_BASE_URL.
    let mut config = DashboardConfig::from_env();
    if let Some(base) = std::env::args().nth(1) {
        config = config.with_base_url(base);
    }
    log::info!("[CFG] player server {}", config.base_http);

    let dispatcher = HttpDispatcher::new(&config).context("building HTTP client")?;
    let runtime = Runtime::new(&config, dispatcher, LogRenderer);

    let push = PushListener::new(&config).spawn(runtime.sender());
    let console = tokio::spawn(console::read_stdin(runtime.sender()));

    runtime.run().await;

    push.abort();
    console.abort();
    log::info!("[UI] bye");
    Ok(())
}
