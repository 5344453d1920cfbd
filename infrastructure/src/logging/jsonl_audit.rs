//! JSONL audit log for consensus results.
//!
//! One JSON object per consensus request, appended to a file: which tier
//! fired, how similar the answers were, what each model scored, and the
//! timings. Answer texts are not recorded — the audit trail is about the
//! decision, not the content.
//!
//! The engine never persists anything itself; attaching this logger is the
//! caller's choice.

use counsel_domain::{ConsensusResult, ModelResponse};
use serde_json::json;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Appends one JSON line per [`ConsensusResult`].
///
/// Thread-safe via `Mutex<BufWriter<File>>`; each record is flushed so a
/// one-shot CLI run leaves a complete file behind.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Open (or create) the audit file in append mode.
    ///
    /// Creates parent directories if needed. Returns `None` if the file
    /// cannot be opened; audit logging is best-effort and must never take
    /// the engine down.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the audit file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Failures are logged and swallowed.
    pub fn record(&self, result: &ConsensusResult) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = json!({
            "timestamp": timestamp,
            "method": result.consensus_method,
            "similarity_score": result.similarity_score,
            "consensus_confidence": result.consensus_confidence,
            "final_content_chars": result.final_content.chars().count(),
            "total_time": result.total_time,
            "primary": Self::response_summary(&result.primary_response),
            "secondary": Self::response_summary(&result.secondary_response),
        });

        let Ok(mut writer) = self.writer.lock() else {
            warn!("Audit log writer poisoned; dropping record");
            return;
        };
        if let Err(e) = writeln!(writer, "{}", record) {
            warn!("Could not write audit record: {}", e);
            return;
        }
        if let Err(e) = writer.flush() {
            warn!("Could not flush audit log: {}", e);
        }
    }

    fn response_summary(response: &ModelResponse) -> serde_json::Value {
        json!({
            "model": response.model_name,
            "confidence": response.confidence,
            "response_time": response.response_time,
            "tokens_used": response.tokens_used,
            "fallback": response.is_fallback(),
        })
    }
}
