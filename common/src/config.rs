use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WATCH_DEBOUNCE: Duration = Duration::from_millis(250);

pub struct Config {
    /// Directory the `.cib` files are written to.
    pub output_dir: PathBuf,
    /// Quiet period used to coalesce a burst of link events into one rebuild.
    pub watch_debounce: Duration,
    /// Suppresses the per-record summary output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            watch_debounce: DEFAULT_WATCH_DEBOUNCE,
            quiet: false,
        }
    }
}
