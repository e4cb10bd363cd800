use self::args::{ToolArgs, ToolSubcommand};
use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use std::env;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    layer::SubscriberExt,
    Layer, Registry,
};

mod args;
mod config;
mod digest;
mod parse_input;
mod request;
mod util;

fn initialise_logging() -> miette::Result<()> {
    let env_filter = env::var("RUST_LOG")
        .ok()
        .and_then(|targets| targets.parse().ok())
        .unwrap_or_else(|| Targets::default().with_default(LevelFilter::INFO));

    let subscriber = Registry::default().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(env_filter),
    );

    tracing::subscriber::set_global_default(subscriber)
        .into_diagnostic()
        .wrap_err("Couldn't install the global tracing subscriber")
}

fn main() -> miette::Result<()> {
    initialise_logging()?;

    let args = ToolArgs::parse();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async move {
        match args.subcommand {
            ToolSubcommand::Digest(args) => digest::do_it(args).await,
            ToolSubcommand::Sign(args) => request::sign(args).await,
            ToolSubcommand::Verify(args) => request::verify(args).await,
            ToolSubcommand::ParseInput(args) => parse_input::do_it(args.header),
        }
    })
}
