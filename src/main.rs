use std::process::ExitCode;

use chess_app_client::config::ClientConfig;
use chess_app_client::http::HttpTransport;
use chess_app_client::session::GameSession;
use chess_app_client::terminal::{TerminalRenderer, run_interactive_terminal};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Chess client - backend at {}", config.api_url);

    let session = match GameSession::start(HttpTransport::new(config)) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to connect to backend: {e}");
            return ExitCode::FAILURE;
        }
    };

    run_interactive_terminal(session, TerminalRenderer::new());
    ExitCode::SUCCESS
}
