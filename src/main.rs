use std::sync::Arc;

mod classifier;
mod config;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional first argument: config file path (extension optional)
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("Using {workers} worker threads"));
    } else {
        logger::log_info("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let classifier = classifier::Classifier::with_default_rules()?;
    if classifier.is_empty() {
        logger::log_warning("No classification rules loaded, every message gets the fallback reply");
    }
    let listener = server::create_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg, classifier));
    logger::log_server_start(&addr, &state.config, state.classifier.len());

    server::start_signal_handler(Arc::clone(&state))?;
    server::start_server_loop(listener, state).await;

    logger::log_info("Server stopped");
    Ok(())
}
