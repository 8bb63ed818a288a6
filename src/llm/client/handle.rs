//! Lazily constructed, shared backend handle.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use super::{build_backend, GenerateOptions, GenerativeBackend, LlmConfig, LlmError};

/// Owns the process-wide backend.
///
/// The backend is built on first use. Concurrent first callers wait on the
/// same lock, so construction happens once. `shutdown` drops the instance;
/// the next call builds a fresh one.
pub struct BackendHandle {
    config: LlmConfig,
    slot: Mutex<Option<Arc<dyn GenerativeBackend>>>,
}

impl BackendHandle {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            slot: Mutex::new(None),
        }
    }

    /// Wrap an already-built backend.
    pub fn with_backend(config: LlmConfig, backend: Arc<dyn GenerativeBackend>) -> Self {
        Self {
            config,
            slot: Mutex::new(Some(backend)),
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Get the backend, building it if needed.
    pub async fn get(&self) -> Result<Arc<dyn GenerativeBackend>, LlmError> {
        let mut slot = self.slot.lock().await;
        if let Some(ref backend) = *slot {
            return Ok(Arc::clone(backend));
        }

        let backend = build_backend(&self.config)?;
        info!(
            "Initialized {} backend (model: {})",
            backend.name(),
            self.config.model
        );
        *slot = Some(Arc::clone(&backend));
        Ok(backend)
    }

    /// Whether a backend instance currently exists.
    pub async fn is_initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Drop the backend instance.
    pub async fn shutdown(&self) {
        if let Some(backend) = self.slot.lock().await.take() {
            info!("Released {} backend", backend.name());
        }
    }
}

#[async_trait]
impl GenerativeBackend for BackendHandle {
    fn name(&self) -> &str {
        "handle"
    }

    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, LlmError> {
        let backend = self.get().await?;
        backend.generate(prompt, options).await
    }

    async fn is_available(&self) -> bool {
        match self.get().await {
            Ok(backend) => backend.is_available().await,
            Err(_) => false,
        }
    }
}
