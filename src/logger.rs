//! Logger that prints messages like `[WARN] Lorem ipsum` to stderr.
//!
//! Error and warn records are always shown. Records below that are shown
//! only up to the configured level and only when they come from this crate,
//! so debug output from dependencies doesn't drown ours. Debug records get
//! their module path as a prefix.

use atty;
use log::{self, Level, Log, Metadata, Record};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

struct Logger {
    level: Level,
    color_choice: ColorChoice,
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() <= Level::Warn {
            return true;
        }
        metadata.level() <= self.level && is_ours(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stderr = StandardStream::stderr(self.color_choice);
        let _ = stderr.set_color(ColorSpec::new().set_fg(Some(level_color(record.level()))));
        let _ = write!(&mut stderr, "[{}] ", record.level());
        if record.level() >= Level::Debug {
            let _ = write!(&mut stderr, "{}: ", record.target());
        }
        let _ = writeln!(&mut stderr, "{}", record.args());
        let _ = stderr.reset();
    }

    fn flush(&self) { }
}

fn is_ours(target: &str) -> bool {
    target == "lepconv" || target.starts_with("lepconv::")
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::Red,
        Level::Warn => Color::Yellow,
        _ => Color::Green,
    }
}

pub fn init(level: Level) {
    let color_choice = match atty::is(atty::Stream::Stderr) {
        true => ColorChoice::Auto,
        false => ColorChoice::Never,
    };
    let logger = Logger { level, color_choice };
    let _ = log::set_boxed_logger(Box::new(logger));
    log::set_max_level(Level::Debug.to_level_filter());
}
