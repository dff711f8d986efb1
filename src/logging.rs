//! File logging. The terminal belongs to the TUI, so nothing goes to stderr.

use std::fs::{self, File};
use std::path::PathBuf;

use simplelog::{Config, LevelFilter, WriteLogger};

use crate::error::Error;

pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("mcgym").join("mcgym.log"))
}

pub fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Start the global logger and return the file it writes to.
pub fn init(path: Option<PathBuf>, verbose: bool) -> Result<PathBuf, Error> {
    let path = match path {
        Some(path) => path,
        None => default_log_path().ok_or(Error::MissingDir("cache"))?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(&path)?;
    WriteLogger::init(level(verbose), Config::default(), file)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(level(true), LevelFilter::Debug);
        assert_eq!(level(false), LevelFilter::Info);
    }
}
