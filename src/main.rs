use tracing_appender::non_blocking::WorkerGuard;
use twinmaze::app::{self, LaunchOptions};

/// Log to a file, since the terminal is taken by the visualizer.
/// Set `DEBUG=1` for debug level logs.
fn init_tracing() -> WorkerGuard {
    let level = match std::env::var("DEBUG") {
        Ok(val) if val == "1" => tracing::Level::DEBUG,
        _ => tracing::Level::INFO,
    };
    let file_appender = tracing_appender::rolling::never(".", "twinmaze.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    guard
}

fn main() -> std::io::Result<()> {
    // Keep the guard alive so buffered logs are flushed on exit
    let _guard = init_tracing();

    let options = LaunchOptions::from_args(std::env::args().skip(1));
    tracing::info!("Starting with {:?}", options);

    let mut stdout = std::io::stdout();
    app::setup_terminal(&mut stdout)?;
    let result = app::run(&mut stdout, options);
    app::restore_terminal(&mut stdout)?;
    result
}
