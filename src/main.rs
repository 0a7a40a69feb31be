//! VoiceRelay CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_relay::cli::{
    app::{cli_config, console_options, init_logging, load_merged_config},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    run_console, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use voice_relay::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    init_logging();
    let flags = cli_config(&cli);

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let config = load_merged_config(flags).await;

    let options = match console_options(&config) {
        Ok(options) => options,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    run_console(options).await
}
