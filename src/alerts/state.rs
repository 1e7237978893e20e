use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::errors::{Result, WatchError};

/// Persistence for the last-alert marker.
#[async_trait]
pub trait AlertStateStore: Send + Sync {
    /// `Ok(None)` means no alert has ever been recorded.
    async fn load(&self) -> Result<Option<DateTime<Utc>>>;

    /// Overwrites any previous marker.
    async fn save(&self, ts: DateTime<Utc>) -> Result<()>;
}

/// Single-line text file holding an RFC 3339 timestamp.
#[derive(Debug, Clone)]
pub struct FileAlertStateStore {
    path: PathBuf,
}

impl FileAlertStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl AlertStateStore for FileAlertStateStore {
    async fn load(&self) -> Result<Option<DateTime<Utc>>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        parse_timestamp(trimmed)
            .map(Some)
            .ok_or_else(|| WatchError::StateCorrupt(trimmed.to_string()))
    }

    async fn save(&self, ts: DateTime<Utc>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, format_timestamp(ts)).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("💾 Recorded last alert {} in {}", ts, self.path.display());
        Ok(())
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Accepts RFC 3339 as well as naive ISO-8601 (no offset, read as UTC),
/// which is what older state files contain.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
