use std::{io, process::ExitCode, sync::OnceLock};

use application::{cli, Args, Config, Context};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(true)
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL
                                .get()
                                .copied()
                                .unwrap_or(log::Level::WARN)
                                >= *meta.level()
                })),
        )
        .init();

    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

async fn start() -> Result<(), ExitCode> {
    let Args { config, command } = Args::parse().unwrap_or_else(|e| e.exit());

    let conf = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
        ExitCode::from(78)
    })?;

    LOG_LEVEL
        .set(conf.log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let ctx = Context::new(&conf).map_err(|e| {
        log::error!("failed to initialize `Context`: {e}");
        e.exit_code()
    })?;

    cli::run(&ctx, command).await.map_err(|e| {
        log::error!("{e}");
        log::debug!("{}", e.trace());
        e.exit_code()
    })
}
