//! `tracing` output routed to the browser console.

use std::io;

use tracing_subscriber::EnvFilter;

/// Forwards each formatted event to the console method matching its level.
struct ConsoleWriter;

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let line = String::from_utf8_lossy(buf);
        let line = line.trim_end();
        if line.contains("ERROR") {
            gloo_console::error!(line);
        } else if line.contains(" WARN") {
            gloo_console::warn!(line);
        } else {
            gloo_console::log!(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(|| ConsoleWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .try_init();
}
