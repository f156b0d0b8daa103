//! Log of ids abandoned after their retry was spent

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Append-only `<id>\t<stage>\t<reason>` lines
pub struct DeadLetterLog {
    path: PathBuf,
    file: Mutex<BufWriter<File>>,
    count: AtomicUsize,
}

impl DeadLetterLog {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(BufWriter::new(file)),
            count: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries recorded through this handle
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }

    pub fn record(&self, id: &str, stage: &str, reason: &str) -> io::Result<()> {
        // one entry per line
        let reason = reason.replace(['\n', '\r', '\t'], " ");
        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}\t{}\t{}", id, stage, reason)?;
        file.flush()?;
        self.count.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(id, stage, %reason, "abandoned after retry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_appended_one_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/dead_letters.tsv");
        let log = DeadLetterLog::open(&path).unwrap();
        log.record("123", "fetch", "HTTP status 500\nfrom server").unwrap();
        log.record("456", "citations", "timeout").unwrap();
        drop(log);

        let reopened = DeadLetterLog::open(&path).unwrap();
        reopened.record("789", "fetch", "gone").unwrap();
        assert_eq!(reopened.count(), 1);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "123\tfetch\tHTTP status 500 from server");
        assert_eq!(lines[2], "789\tfetch\tgone");
    }
}
