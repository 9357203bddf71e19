use std::io::Write;

use colored::{ColoredString, Colorize};
use log::{Level, Metadata, Record};

const WORKSPACE_TARGETS: [&str; 2] = ["pitchfork", "rustpitchfork"];

/// Prints log records with a coloured level tag. Warnings and errors go to
/// stderr, everything else to stdout.
///
/// Debug and trace records from dependencies are dropped. Those from the
/// workspace crates are prefixed with their module path.
pub struct MinimalLogger;

impl MinimalLogger {
    fn tag(level: Level) -> ColoredString {
        let tag = level.to_string();

        match level {
            Level::Error => tag.red().bold(),
            Level::Warn => tag.yellow(),
            Level::Info => tag.cyan(),
            Level::Debug => tag.purple(),
            Level::Trace => tag.normal(),
        }
    }

    fn is_workspace_target(target: &str) -> bool {
        WORKSPACE_TARGETS
            .iter()
            .any(|prefix| target.starts_with(prefix))
    }
}

impl log::Log for MinimalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info || Self::is_workspace_target(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let tag = Self::tag(record.level());

        match record.level() {
            Level::Error | Level::Warn => eprintln!("{:<5} {}", tag, record.args()),
            Level::Info => println!("{:<5} {}", tag, record.args()),
            Level::Debug | Level::Trace => println!(
                "{:<5} {} {}",
                tag,
                format!("[{}]", record.target()).dimmed(),
                record.args()
            ),
        }
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
        let _ = std::io::stderr().flush();
    }
}
