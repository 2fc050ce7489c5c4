//! Digital pin access
//!
//! The relay contact and the status LED are plain GPIO lines. On Linux
//! boards they are exposed as sysfs `value` files (for example
//! `/sys/class/gpio/gpio17/value`) holding `0` or `1`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::debounce::Level;

/// Errors raised while reading or driving a pin
#[derive(Debug, Error)]
pub enum PinError {
    /// The value file could not be read or written
    #[error("failed to access pin at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The value file held something other than `0` or `1`
    #[error("unexpected value {value:?} read from {}", .path.display())]
    InvalidValue { path: PathBuf, value: String },
}

/// A pin that can be sampled
pub trait InputPin {
    fn read(&mut self) -> Result<Level, PinError>;
}

/// A pin that can be driven
pub trait OutputPin {
    fn write(&mut self, level: Level) -> Result<(), PinError>;
}

/// GPIO line exposed through a sysfs-style `value` file
#[derive(Debug, Clone)]
pub struct SysfsPin {
    path: PathBuf,
}

impl SysfsPin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PinError {
        PinError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl InputPin for SysfsPin {
    fn read(&mut self) -> Result<Level, PinError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Level::from_sysfs(&raw).ok_or_else(|| PinError::InvalidValue {
            path: self.path.clone(),
            value: raw.trim().to_string(),
        })
    }
}

impl OutputPin for SysfsPin {
    fn write(&mut self, level: Level) -> Result<(), PinError> {
        fs::write(&self.path, level.as_sysfs()).map_err(|e| self.io_error(e))
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryPin;

#[cfg(any(test, feature = "test-support"))]
mod memory {
    use std::sync::{Arc, Mutex};

    use super::{InputPin, Level, OutputPin, PinError};

    /// In-memory pin shared between a test and the code under test
    ///
    /// Clones observe the same level, so a test can keep one handle to
    /// drive (or inspect) the pin while the monitor owns another.
    #[derive(Debug, Clone)]
    pub struct MemoryPin {
        level: Arc<Mutex<Level>>,
    }

    impl MemoryPin {
        pub fn new(level: Level) -> Self {
            Self {
                level: Arc::new(Mutex::new(level)),
            }
        }

        pub fn set(&self, level: Level) {
            if let Ok(mut guard) = self.level.lock() {
                *guard = level;
            }
        }

        pub fn get(&self) -> Level {
            self.level.lock().map(|guard| *guard).unwrap_or(Level::High)
        }
    }

    impl InputPin for MemoryPin {
        fn read(&mut self) -> Result<Level, PinError> {
            Ok(self.get())
        }
    }

    impl OutputPin for MemoryPin {
        fn write(&mut self, level: Level) -> Result<(), PinError> {
            self.set(level);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("relay-monitor-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn test_sysfs_round_trip() {
        let path = scratch_file("round-trip");
        let mut pin = SysfsPin::new(&path);
        assert_eq!(pin.path(), path.as_path());

        pin.write(Level::Low).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0");
        assert_eq!(pin.read().unwrap(), Level::Low);

        fs::write(&path, "1\n").unwrap();
        assert_eq!(pin.read().unwrap(), Level::High);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_sysfs_invalid_value() {
        let path = scratch_file("invalid");
        fs::write(&path, "on\n").unwrap();
        let mut pin = SysfsPin::new(&path);

        match pin.read() {
            Err(PinError::InvalidValue { value, .. }) => assert_eq!(value, "on"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_sysfs_missing_file() {
        let mut pin = SysfsPin::new(scratch_file("missing"));
        let err = pin.read().unwrap_err();
        assert!(matches!(err, PinError::Io { .. }));
        assert!(err.to_string().contains("failed to access pin"));
    }

    #[test]
    fn test_memory_pin_clones_share_level() {
        let pin = MemoryPin::new(Level::High);
        let mut reader = pin.clone();
        pin.set(Level::Low);
        assert_eq!(reader.read().unwrap(), Level::Low);
    }
}
