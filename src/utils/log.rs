use std::sync::atomic::{AtomicU8, Ordering};

use colored::{ColoredString, Colorize};

static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// 0 = warnings and errors only, 1 = info, 2+ = debug.
pub fn set_verbosity(level: u8) {
    VERBOSITY.store(level, Ordering::Relaxed);
}

pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

fn tagged(tag: ColoredString, msg: &str) -> String {
    format!(
        "{}{}{} {}",
        "[".bold().white(),
        tag,
        "]".bold().white(),
        msg
    )
}

pub fn error(msg: &str) {
    eprintln!("{}", tagged("ERR".bold().red(), msg));
}

pub fn warn(msg: &str) {
    eprintln!("{}", tagged("WRN".bold().yellow(), msg));
}

pub fn info(msg: &str) {
    if verbosity() >= 1 {
        eprintln!("{}", tagged("INF".bold().blue(), msg));
    }
}

pub fn debug(msg: &str) {
    if verbosity() >= 2 {
        eprintln!("{}", tagged("DBG".bold().magenta(), msg));
    }
}
