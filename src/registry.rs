//! Class and operator registries.
//!
//! [`ClassRegistry`] maps fully-qualified stage class names to readers and
//! backs the legacy class-based decode path. [`OpRegistry`] is the
//! process-wide registry of portable-runtime operator codecs; registration
//! is idempotent so repeated decodes and concurrent codec instances are
//! safe.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::stage::StageReader;

/// Registry mapping stage class names to their readers. This is the crate's
/// stand-in for the reflective `resolve(name) -> type -> reader` chain of
/// the original framework: callers register a reader per loadable class.
#[derive(Default)]
pub struct ClassRegistry {
    readers: RwLock<HashMap<String, Arc<dyn StageReader>>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, class_name: impl Into<String>, reader: Arc<dyn StageReader>) {
        self.readers.write().insert(class_name.into(), reader);
    }

    /// Resolve a class name to its reader.
    pub fn resolve(&self, class_name: &str) -> Result<Arc<dyn StageReader>> {
        self.readers.read().get(class_name).cloned().ok_or_else(|| {
            CodecError::ClassResolutionFailure(format!(
                "no reader registered for class '{}'",
                class_name
            ))
        })
    }
}

/// A codec plugin for one operator kind in the portable runtime.
pub trait OpPlugin: Send + Sync {
    /// Stable operator name; registration deduplicates on it.
    fn op_name(&self) -> &str;
}

/// Gradient-boosted tree operator codec.
pub struct GradientBoostingOp;

impl OpPlugin for GradientBoostingOp {
    fn op_name(&self) -> &str {
        "ml.op.gradient_boosting"
    }
}

/// Generalized linear model operator codec.
pub struct GeneralizedLinearOp;

impl OpPlugin for GeneralizedLinearOp {
    fn op_name(&self) -> &str {
        "ml.op.generalized_linear"
    }
}

/// Process-wide registry of portable-runtime operator plugins.
pub struct OpRegistry {
    ops: RwLock<HashMap<String, Arc<dyn OpPlugin>>>,
}

impl OpRegistry {
    fn new() -> Self {
        Self {
            ops: RwLock::new(HashMap::new()),
        }
    }

    /// Shared registry for the whole process.
    pub fn global() -> &'static OpRegistry {
        static REGISTRY: OnceLock<OpRegistry> = OnceLock::new();
        REGISTRY.get_or_init(OpRegistry::new)
    }

    /// Register a plugin. Registering the same operator name again is a
    /// no-op.
    pub fn register(&self, plugin: Arc<dyn OpPlugin>) {
        let mut ops = self.ops.write();
        if !ops.contains_key(plugin.op_name()) {
            debug!(op = plugin.op_name(), "registering portable op plugin");
            ops.insert(plugin.op_name().to_string(), plugin);
        }
    }

    pub fn contains(&self, op_name: &str) -> bool {
        self.ops.read().contains_key(op_name)
    }

    pub fn len(&self) -> usize {
        self.ops.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.read().is_empty()
    }
}

/// Register the numeric-model operator codecs required by portable-only
/// archives. Safe to call repeatedly and from concurrent codec instances.
pub fn register_numeric_ops() {
    let registry = OpRegistry::global();
    registry.register(Arc::new(GradientBoostingOp));
    registry.register(Arc::new(GeneralizedLinearOp));
}
