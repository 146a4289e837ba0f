use std::process::ExitCode;
use tokio::net::TcpListener;

use sketchroom::config::Config;
use sketchroom::startup::create_web_server;

#[tokio::main]
async fn main() -> ExitCode {
    std_logger::Config::logfmt().init();

    let config = match Config::get() {
        Ok(config) => config,
        Err(error) => {
            log::error!("Unable to read the configuration. Error: '{error}'.");
            return ExitCode::FAILURE;
        }
    };

    let address = format!("{}:{}", config.application.host, config.application.port);
    let listener = match TcpListener::bind(address.as_str()).await {
        Ok(listener) => listener,
        Err(error) => {
            log::error!("Failed to bind the address '{address}'. Error: '{error}'.");
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = create_web_server(config, listener).await {
        log::error!("The server stopped unexpectedly. Error: '{error}'.");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
