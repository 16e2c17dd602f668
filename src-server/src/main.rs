use todo_server_lib::config::{load_backend_config, BackendKind, ServerConfig};
use todo_server_lib::error::ServerError;
use todo_server_lib::logging::init_logger;

#[tokio::main]
async fn main() {
    init_logger();
    if let Err(e) = start().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;
    tracing::info!(
        "auth mode {}, backend {:?}, outputs {}",
        config.auth_mode,
        config.backend,
        config.outputs_path.display()
    );

    let outputs = match load_backend_config(&config.outputs_path) {
        Ok(outputs) => Some(outputs),
        // The in-memory backend runs without a deployed platform
        Err(e) if config.backend == BackendKind::Memory => {
            tracing::warn!("{e}");
            None
        }
        Err(e) => return Err(e),
    };

    let state = todo_server_lib::build_state(&config, outputs)?;
    todo_server_lib::run(config, state).await
}
