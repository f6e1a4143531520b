use anyhow::Result;
use clap::Parser;
use epub2pdf::{batch, cli, CommandRenderer};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();
    init_tracing(cli.log_filter());

    let renderer =
        CommandRenderer::new(cli.renderer.as_str()).with_args(cli.renderer_args.iter().cloned());
    let summary = batch::run(&cli, &renderer)?;

    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
