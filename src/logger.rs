use crate::constants::{ERROR_SYMBOL, INFO_SYMBOL, SUCCESS_SYMBOL, WARNING_SYMBOL};
use owo_colors::OwoColorize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);
static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_quiet_mode(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

pub fn set_verbose_mode(verbose: bool) {
    VERBOSE_MODE.store(verbose, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE_MODE.load(Ordering::Relaxed)
}

pub fn print_success(args: fmt::Arguments<'_>) {
    if !is_quiet() {
        println!("{} {}", SUCCESS_SYMBOL.green(), args);
    }
}

pub fn print_info(args: fmt::Arguments<'_>) {
    if !is_quiet() {
        println!("{} {}", INFO_SYMBOL.blue(), args);
    }
}

pub fn print_warning(args: fmt::Arguments<'_>) {
    if !is_quiet() {
        eprintln!("{} {}", WARNING_SYMBOL.yellow(), args);
    }
}

/// Errors are printed even in quiet mode.
pub fn print_error(args: fmt::Arguments<'_>) {
    eprintln!("{} {}", ERROR_SYMBOL.red(), args);
}

pub fn print_verbose(args: fmt::Arguments<'_>) {
    if is_verbose() && !is_quiet() {
        eprintln!("{} {}", "·".dimmed(), args.dimmed());
    }
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::logger::print_success(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::logger::print_info(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::logger::print_warning(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logger::print_error(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        $crate::logger::print_verbose(format_args!($($arg)*))
    };
}
