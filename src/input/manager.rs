//! Extraction chain: ordered backends with per-call timeouts and fallback

use crate::config::ExtractionConfig;
use crate::error::{BackendFailure, Result, ResumeMatcherError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    pdf_backend, ExtractionBackend, MarkdownBackend, PlainTextBackend, KNOWN_PDF_BACKENDS,
};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Normalized text together with the backend that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub text: String,
    pub backend: String,
}

#[derive(Clone)]
pub struct ExtractionChain {
    pdf_backends: Vec<Arc<dyn ExtractionBackend>>,
    timeout: Duration,
    max_file_size: u64,
    processor: TextProcessor,
}

impl Default for ExtractionChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionChain {
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self {
            pdf_backends: KNOWN_PDF_BACKENDS.iter().filter_map(|name| pdf_backend(name)).collect(),
            timeout: Duration::from_secs(defaults.backend_timeout_secs),
            max_file_size: defaults.max_file_size,
            processor: TextProcessor::new(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        let pdf_backends = config
            .backends
            .iter()
            .map(|name| {
                pdf_backend(name).ok_or_else(|| {
                    ResumeMatcherError::Configuration(format!("Unknown extraction backend '{}'", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            pdf_backends,
            timeout: Duration::from_secs(config.backend_timeout_secs),
            max_file_size: config.max_file_size,
            processor: TextProcessor::new(),
        })
    }

    /// Replace the PDF backends, keeping their order
    pub fn with_backends(mut self, backends: Vec<Arc<dyn ExtractionBackend>>) -> Self {
        self.pdf_backends = backends;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.pdf_backends.iter().map(|b| b.name()).collect()
    }

    /// Extract normalized text from PDF bytes
    pub fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        self.extract_detailed(None, bytes).map(|e| e.text)
    }

    /// Extract from a file on disk; the extension is consulted for non-PDF input
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        if !path.exists() {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)?;
        self.extract_detailed(Some(path), &bytes)
    }

    /// Async variant of [`extract_file`](Self::extract_file) for callers on a tokio runtime
    pub async fn extract_path(&self, path: &Path) -> Result<Extraction> {
        if !path.exists() {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        let chain = self.clone();
        let path: PathBuf = path.to_path_buf();

        tokio::task::spawn_blocking(move || chain.extract_detailed(Some(&path), &bytes))
            .await
            .map_err(|e| ResumeMatcherError::Processing(format!("Extraction task failed: {}", e)))?
    }

    pub fn extract_detailed(&self, path: Option<&Path>, bytes: &[u8]) -> Result<Extraction> {
        if bytes.is_empty() {
            return Err(ResumeMatcherError::InvalidInput("File is empty".to_string()));
        }
        if bytes.len() as u64 > self.max_file_size {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "File too large: {} bytes (limit {})",
                bytes.len(),
                self.max_file_size
            )));
        }

        let backends: Vec<Arc<dyn ExtractionBackend>> = match FileType::detect(path, bytes) {
            FileType::Pdf => self.pdf_backends.clone(),
            FileType::Text => vec![Arc::new(PlainTextBackend)],
            FileType::Markdown => vec![Arc::new(MarkdownBackend)],
            FileType::Unknown => {
                let name = path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "input bytes".to_string());
                return Err(ResumeMatcherError::UnsupportedFormat(format!(
                    "Not a PDF or text document: {}",
                    name
                )));
            }
        };

        let data: Arc<[u8]> = Arc::from(bytes);
        let mut attempts = Vec::new();

        for backend in backends {
            info!("Attempting extraction with {}", backend.name());
            match self.run_backend(&backend, Arc::clone(&data)) {
                Ok(raw) => {
                    let text = self.processor.normalize(&raw);
                    if text.is_empty() {
                        warn!("Backend {} returned no text", backend.name());
                        attempts.push(BackendFailure {
                            backend: backend.name().to_string(),
                            reason: "no text extracted".to_string(),
                        });
                        continue;
                    }
                    debug!("Backend {} extracted {} characters", backend.name(), text.len());
                    return Ok(Extraction {
                        text,
                        backend: backend.name().to_string(),
                    });
                }
                Err(reason) => {
                    warn!("Backend {} failed: {}", backend.name(), reason);
                    attempts.push(BackendFailure {
                        backend: backend.name().to_string(),
                        reason,
                    });
                }
            }
        }

        Err(ResumeMatcherError::ExtractionFailed { attempts })
    }

    /// Run one backend on a worker thread. A backend that outlives the timeout
    /// is abandoned; its thread finishes (or hangs) on its own.
    fn run_backend(
        &self,
        backend: &Arc<dyn ExtractionBackend>,
        data: Arc<[u8]>,
    ) -> std::result::Result<String, String> {
        let (tx, rx) = mpsc::channel();
        let worker = Arc::clone(backend);

        thread::Builder::new()
            .name(format!("extract-{}", backend.name()))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| worker.extract(&data)));
                // Receiver is gone if we already timed out
                let _ = tx.send(outcome);
            })
            .map_err(|e| format!("could not start worker: {}", e))?;

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(Ok(text))) => Ok(text),
            Ok(Ok(Err(e))) => Err(e.to_string()),
            Ok(Err(_)) => Err("backend panicked on malformed document".to_string()),
            Err(RecvTimeoutError::Timeout) => Err(format!("timed out after {:?}", self.timeout)),
            Err(RecvTimeoutError::Disconnected) => Err("worker exited without a result".to_string()),
        }
    }
}
