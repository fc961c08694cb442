use tracing_subscriber::EnvFilter;

use zh_chess::xboard::xboard_top::run_stdio_loop;

fn main() -> std::io::Result<()> {
    // stdout carries the protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    run_stdio_loop()
}
