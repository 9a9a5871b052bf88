use std::sync::Arc;

mod api;
mod config;
mod handler;
mod http;
mod logger;
mod model;
mod server;
mod store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    // Current-thread runtime: requests are handled cooperatively and only
    // interleave at await points
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    // The store handle is created once here and passed into shared state
    let store = store::StudentStore::open(&cfg.store.path);
    let state = Arc::new(config::AppState::new(cfg, store));

    logger::log_server_start(&addr, &state.config);

    // LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local.run_until(server::run(listener, state)).await;
    Ok(())
}
