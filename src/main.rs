use clap::Parser;

mod about;
mod cli;
mod commands;
mod domain;
mod services;

pub use about::*;
pub use cli::*;
pub use commands::*;
pub use domain::constants::*;
pub use domain::models::*;
pub use services::archive::*;
pub use services::attrib::*;
pub use services::error_log::*;
pub use services::gen::*;
pub use services::inventory::*;
pub use services::license_api::*;
pub use services::license_files::*;
pub use services::output::*;
pub use services::redist::*;
pub use services::settings::*;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ABOUT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = RunConfig {
        quiet: cli.quiet,
        verbosity: cli.verbose,
    };
    let settings = load_settings()?;

    if handle_inventory_commands(&cli, &config)? {
        return Ok(());
    }
    if handle_gen_commands(&cli, &config, &settings)? {
        return Ok(());
    }
    if handle_attrib_commands(&cli, &config, &settings)? {
        return Ok(());
    }
    if handle_redist_commands(&cli, &config)? {
        return Ok(());
    }
    handle_stub_commands(&cli, &config)?;
    Ok(())
}
