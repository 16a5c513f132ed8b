//! Subscriber setup for the CLI and the browser.
//!
//! Library code only emits `tracing` events; whoever embeds it picks the
//! subscriber. The CLI writes to stderr filtered by `RUST_LOG`. The browser
//! shell formats without timestamps (there is no wall clock to read on
//! `wasm32-unknown-unknown`) and hands each finished line to `console.log`.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "sanat_motion=debug" } else { "sanat_motion=info" }
}

/// Install the CLI subscriber. A second call is a no-op.
pub fn init_cli(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Install the browser subscriber. A second call is a no-op.
#[cfg(target_arch = "wasm32")]
pub fn init_browser(level: Level) {
    let _ = tracing_subscriber::fmt()
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .with_writer(|| LineWriter::new(console_sink))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn console_sink(line: &str) {
    web_sys::console::log_1(&line.into());
}

/// Level used by the browser shell for a `?motion-debug` style toggle.
pub fn browser_level(debug: bool) -> Level {
    if debug { Level::DEBUG } else { Level::INFO }
}

/// Buffers one formatted event and hands it to `sink` when dropped.
///
/// The fmt layer asks its `MakeWriter` for a fresh writer per event, so
/// flushing on drop emits exactly one line per event.
pub struct LineWriter {
    buf: Vec<u8>,
    sink: fn(&str),
}

impl LineWriter {
    pub fn new(sink: fn(&str)) -> Self {
        Self {
            buf: Vec::new(),
            sink,
        }
    }
}

impl io::Write for LineWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        (self.sink)(line.trim_end());
    }
}
