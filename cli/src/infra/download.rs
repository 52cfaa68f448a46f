//! HTTP image downloader with streaming SHA-256 verification.
//!
//! `ureq` is blocking, so the transfer runs on the blocking pool and progress
//! crosses back to the async caller over an unbounded channel.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::application::ports::ImageDownloader;
use crate::domain::{DistroError, ImageCatalogEntry, hex_encode};

const CHUNK: usize = 64 * 1024;

/// Minimum spacing between progress reports.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    #[must_use]
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(30))
            .user_agent(concat!("wslhub/", env!("CARGO_PKG_VERSION")))
            .build();
        Self { agent }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageDownloader for HttpDownloader {
    async fn download(
        &self,
        entry: &ImageCatalogEntry,
        dest: &Path,
        on_progress: &mut (dyn FnMut(u8) + Send),
    ) -> Result<(), DistroError> {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<u8>();
        let agent = self.agent.clone();
        let entry = entry.clone();
        let dest = dest.to_path_buf();
        let task = tokio::task::spawn_blocking(move || {
            fetch_verified(&agent, &entry, &dest, |pct| {
                let _ = tx.send(pct);
            })
        });
        while let Some(pct) = rx.recv().await {
            on_progress(pct);
        }
        task.await
            .map_err(|e| DistroError::Network(format!("download task failed: {e}")))?
    }
}

/// Blocking download of `entry` into `dest`.
///
/// # Errors
///
/// `Network` for non-200 responses and read failures, `Filesystem` for
/// local I/O failures, `Integrity` on digest mismatch. `dest` is removed in
/// every failure case after it was created.
pub fn fetch_verified(
    agent: &ureq::Agent,
    entry: &ImageCatalogEntry,
    dest: &Path,
    mut report: impl FnMut(u8),
) -> Result<(), DistroError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DistroError::Filesystem {
            context: "cannot create",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    tracing::info!(url = %entry.url, dest = %dest.display(), "downloading image");
    let response = match agent.get(&entry.url).call() {
        Ok(r) if r.status() == 200 => r,
        Ok(r) => {
            return Err(DistroError::Network(format!(
                "HTTP {} from {}",
                r.status(),
                entry.url
            )));
        }
        Err(ureq::Error::Status(code, _)) => {
            return Err(DistroError::Network(format!("HTTP {code} from {}", entry.url)));
        }
        Err(e) => return Err(DistroError::Network(e.to_string())),
    };
    let total = response
        .header("Content-Length")
        .and_then(|v| v.parse::<u64>().ok());

    let file = File::create(dest).map_err(|source| DistroError::Filesystem {
        context: "cannot create",
        path: dest.to_path_buf(),
        source,
    })?;

    let result = stream_and_hash(response.into_reader(), file, dest, total, &mut report)
        .and_then(|actual| {
            if actual == entry.sha256 {
                Ok(())
            } else {
                Err(DistroError::Integrity {
                    name: entry.name.clone(),
                    expected: entry.sha256.clone(),
                    actual,
                })
            }
        });

    if let Err(err) = &result {
        tracing::warn!(dest = %dest.display(), error = %err, "removing failed download");
        let _ = std::fs::remove_file(dest);
    }
    result
}

fn stream_and_hash(
    mut reader: impl Read,
    mut file: File,
    dest: &Path,
    total: Option<u64>,
    report: &mut impl FnMut(u8),
) -> Result<String, DistroError> {
    let mut hasher = Sha256::new();
    let mut throttle = ProgressThrottle::new(total, PROGRESS_INTERVAL);
    let mut buf = vec![0u8; CHUNK];
    let mut done: u64 = 0;
    loop {
        let n = reader
            .read(&mut buf)
            .map_err(|e| DistroError::Network(format!("download interrupted: {e}")))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        file.write_all(&buf[..n])
            .map_err(|source| DistroError::Filesystem {
                context: "cannot write",
                path: dest.to_path_buf(),
                source,
            })?;
        done += n as u64;
        if let Some(pct) = throttle.update(done, Instant::now()) {
            report(pct);
        }
    }
    file.flush().map_err(|source| DistroError::Filesystem {
        context: "cannot write",
        path: dest.to_path_buf(),
        source,
    })?;
    if let Some(pct) = throttle.finish() {
        report(pct);
    }
    Ok(hex_encode(&hasher.finalize()))
}

/// Rate limiter for percentage reports.
///
/// Reports are at least `interval` apart and never decrease. `100` is held
/// back for [`ProgressThrottle::finish`]. Nothing is reported when the total
/// is unknown or zero.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    total: Option<u64>,
    interval: Duration,
    last_at: Option<Instant>,
    last_pct: u8,
}

impl ProgressThrottle {
    #[must_use]
    pub fn new(total: Option<u64>, interval: Duration) -> Self {
        Self {
            total: total.filter(|t| *t > 0),
            interval,
            last_at: None,
            last_pct: 0,
        }
    }

    /// Percentage to report for `done` bytes at `now`, if one is due.
    pub fn update(&mut self, done: u64, now: Instant) -> Option<u8> {
        let total = self.total?;
        let pct = percent(done, total);
        if pct >= 100 || pct < self.last_pct {
            return None;
        }
        if self
            .last_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.interval)
        {
            return None;
        }
        self.last_at = Some(now);
        self.last_pct = pct;
        Some(pct)
    }

    /// The final `100`, when the total was known.
    pub fn finish(&mut self) -> Option<u8> {
        self.total?;
        self.last_pct = 100;
        Some(100)
    }
}

fn percent(done: u64, total: u64) -> u8 {
    let pct = u128::from(done) * 100 / u128::from(total);
    u8::try_from(pct.min(100)).unwrap_or(100)
}
