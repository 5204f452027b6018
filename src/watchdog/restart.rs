//! Restart cooldown.
//!
//! Limits how often the socket is power-cycled. The time of the last restart
//! can be kept in a file (Unix seconds) so the limit survives process
//! restarts. File problems are logged and never stop the watchdog.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

/// Errors reading or writing the last-restart file.
#[derive(Debug, Error)]
pub enum StateFileError {
    #[error("IO error on {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("invalid timestamp '{0}'")]
    Parse(String),
}

/// Read the last restart time. A missing or empty file means "never".
pub fn read_last_restart(path: &Path) -> Result<Option<SystemTime>, StateFileError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateFileError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    let line = content.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let secs: f64 = line
        .parse()
        .map_err(|_| StateFileError::Parse(line.to_string()))?;
    let offset =
        Duration::try_from_secs_f64(secs).map_err(|_| StateFileError::Parse(line.to_string()))?;
    UNIX_EPOCH
        .checked_add(offset)
        .map(Some)
        .ok_or_else(|| StateFileError::Parse(line.to_string()))
}

/// Write the restart time as fractional Unix seconds.
pub fn write_last_restart(path: &Path, at: SystemTime) -> Result<(), StateFileError> {
    let secs = at
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs_f64();
    fs::write(path, format!("{secs:.3}\n")).map_err(|source| StateFileError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Why a restart is not allowed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub remaining: Duration,
}

/// Enforces the minimum interval between restarts.
#[derive(Debug, Clone)]
pub struct RestartGuard {
    min_interval: Duration,
    last_restart: Option<SystemTime>,
    state_file: Option<PathBuf>,
}

impl RestartGuard {
    /// In-memory guard with no previous restart.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_restart: None,
            state_file: None,
        }
    }

    /// Guard backed by a state file, seeded from its current contents.
    pub fn with_state_file(min_interval: Duration, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_restart = match read_last_restart(&path) {
            Ok(last) => last,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read last restart time");
                None
            }
        };
        if let Some(at) = last_restart {
            let last_restart_unix = at.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs());
            tracing::info!(
                path = %path.display(),
                last_restart_unix = ?last_restart_unix,
                "Loaded last restart time"
            );
        }

        Self {
            min_interval,
            last_restart,
            state_file: Some(path),
        }
    }

    pub fn last_restart(&self) -> Option<SystemTime> {
        self.last_restart
    }

    /// Check whether a restart may happen at `now`.
    ///
    /// A last restart recorded in the future (clock moved backwards, e.g. a
    /// board without RTC before NTP sync) does not block restarts.
    pub fn check(&self, now: SystemTime) -> Result<(), Cooldown> {
        let Some(last) = self.last_restart else {
            return Ok(());
        };

        match now.duration_since(last) {
            Ok(elapsed) if elapsed < self.min_interval => Err(Cooldown {
                remaining: self.min_interval - elapsed,
            }),
            Ok(_) => Ok(()),
            Err(_) => {
                tracing::warn!("Last restart time lies in the future, ignoring it");
                Ok(())
            }
        }
    }

    /// Record a restart at `at`, persisting it if a state file is configured.
    pub fn record(&mut self, at: SystemTime) {
        self.last_restart = Some(at);
        if let Some(path) = &self.state_file {
            if let Err(e) = write_last_restart(path, at) {
                tracing::error!(error = %e, "Failed to save last restart time");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HALF_HOUR: Duration = Duration::from_secs(1800);

    #[test]
    fn test_first_restart_is_allowed() {
        let guard = RestartGuard::new(HALF_HOUR);
        assert_eq!(guard.check(SystemTime::now()), Ok(()));
    }

    #[test]
    fn test_cooldown_window() {
        let start = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut guard = RestartGuard::new(HALF_HOUR);
        guard.record(start);

        assert_eq!(
            guard.check(start + Duration::from_secs(600)),
            Err(Cooldown {
                remaining: Duration::from_secs(1200)
            })
        );
        assert_eq!(guard.check(start + HALF_HOUR), Ok(()));
        assert_eq!(guard.check(start - Duration::from_secs(60)), Ok(()));
    }

    #[test]
    fn test_state_file_roundtrip_survives_new_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_restart.txt");
        let now = SystemTime::now();

        let mut guard = RestartGuard::with_state_file(HALF_HOUR, &path);
        assert!(guard.last_restart().is_none());
        guard.record(now);

        let reloaded = RestartGuard::with_state_file(HALF_HOUR, &path);
        assert!(reloaded.check(now + Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_reads_fractional_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_restart.txt");
        fs::write(&path, "1700000000.5").unwrap();

        let at = read_last_restart(&path).unwrap().unwrap();
        assert_eq!(
            at.duration_since(UNIX_EPOCH).unwrap(),
            Duration::from_millis(1_700_000_000_500)
        );
    }

    #[test]
    fn test_bad_state_file_means_no_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_restart.txt");

        assert!(read_last_restart(&path).unwrap().is_none());

        fs::write(&path, "\n").unwrap();
        assert!(read_last_restart(&path).unwrap().is_none());

        fs::write(&path, "yesterday").unwrap();
        assert!(matches!(read_last_restart(&path), Err(StateFileError::Parse(_))));

        fs::write(&path, "-5").unwrap();
        assert!(matches!(read_last_restart(&path), Err(StateFileError::Parse(_))));

        let guard = RestartGuard::with_state_file(HALF_HOUR, &path);
        assert!(guard.last_restart().is_none());
    }
}
