use anyhow::{anyhow, Result};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

/// Starts file logging under the user config directory.
///
/// The TUI owns the terminal, so failure details from the chat exchange
/// land here instead of stderr. The returned handle must stay alive for
/// the lifetime of the program.
pub fn init() -> Result<LoggerHandle> {
    let log_dir = dirs::config_dir()
        .ok_or_else(|| anyhow!("Could not determine config directory"))?
        .join("parley")
        .join("logs");

    let handle = Logger::try_with_env_or_str("info")?
        .log_to_file(FileSpec::default().directory(log_dir))
        .start()?;

    Ok(handle)
}
