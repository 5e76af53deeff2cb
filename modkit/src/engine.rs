//! The engine installation seam.
//!
//! `Engine` is object safe: implementations return hand-boxed futures so
//! the registration pipeline can hold a `dyn Engine` without knowing the
//! transport behind it.

use crate::error::EngineError;
use crate::module::{ModuleDef, ModuleId};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Boxed future type used across the engine boundary.
pub type EngineFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, EngineError>> + Send + 'a>>;

/// Anything that can install a module definition.
pub trait Engine: Send + Sync {
    /// Install a module and return the identifier the engine assigned.
    fn install<'a>(&'a self, module: &'a ModuleDef) -> EngineFuture<'a, ModuleId>;
}

/// An engine that records every installed module in memory.
///
/// Used by tests and by the CLI's dry-run mode to observe exactly what
/// would be sent over the wire.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    installed: Mutex<Vec<(ModuleId, ModuleDef)>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every module installed so far, in installation order.
    pub fn installed(&self) -> Vec<ModuleDef> {
        self.installed
            .lock()
            .map(|guard| guard.iter().map(|(_, m)| m.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of installed modules.
    pub fn len(&self) -> usize {
        self.installed.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Engine for RecordingEngine {
    fn install<'a>(&'a self, module: &'a ModuleDef) -> EngineFuture<'a, ModuleId> {
        Box::pin(async move {
            let id = ModuleId::generate();
            let mut guard = self
                .installed
                .lock()
                .map_err(|_| EngineError::internal("recording engine lock poisoned"))?;
            guard.push((id.clone(), module.clone()));
            Ok(id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typedef::ObjectDef;

    #[tokio::test]
    async fn test_recording_engine_captures_modules() {
        let engine = RecordingEngine::new();
        let module = ModuleDef::new("backup", "Backup").with_object(ObjectDef::new("Backup"));
        let id = engine.install(&module).await.unwrap();
        assert_eq!(engine.len(), 1);
        assert_eq!(engine.installed()[0].name, "backup");
        assert_eq!(id.to_string().len(), 36);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let engine = RecordingEngine::new();
        let module = ModuleDef::new("a", "A");
        let first = engine.install(&module).await.unwrap();
        let second = engine.install(&module).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_engine_is_object_safe() {
        let engine: Box<dyn Engine> = Box::new(RecordingEngine::new());
        let module = ModuleDef::new("a", "A");
        engine.install(&module).await.unwrap();
    }
}
