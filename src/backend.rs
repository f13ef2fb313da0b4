//! Serialization backend seams.
//!
//! Two backends compete for a stage's payload: the framework's native
//! writer/reader, and a portable-bundle writer/reader whose archives can be
//! reloaded without the full native runtime. The codec selects between them
//! by the presence of a [`SerializationContext`], never by inspecting the
//! payload.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archive::ScopedArchive;
use crate::error::BackendError;
use crate::stage::{NativeStage, PortableTransformer};

/// On-disk flavor of a portable bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BundleFormat {
    /// Binary body (efficient).
    Binary,
    /// JSON body (portable, human-readable).
    Json,
}

impl Default for BundleFormat {
    fn default() -> Self {
        BundleFormat::Binary
    }
}

/// Handle to one portable-bundle writing session. Its presence on the codec
/// selects the portable writer over the native one.
#[derive(Debug, Clone)]
pub struct SerializationContext {
    name: String,
    format: BundleFormat,
}

impl SerializationContext {
    pub fn new(name: impl Into<String>, format: BundleFormat) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }

    /// Session name, used to identify the context in write failures.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> BundleFormat {
        self.format
    }
}

/// The framework's own serialization format; requires the full runtime to
/// reload.
pub trait NativeBackend: Send + Sync {
    fn write(&self, stage: &dyn NativeStage, path: &Path) -> std::result::Result<(), BackendError>;

    fn load(&self, path: &Path) -> std::result::Result<Box<dyn NativeStage>, BackendError>;
}

/// Writer/reader pair for portable bundle archives.
pub trait PortableBundleBackend: Send + Sync {
    /// Write a stage into the archive under the given session.
    fn write(
        &self,
        stage: &dyn NativeStage,
        archive: &ScopedArchive,
        context: &SerializationContext,
    ) -> std::result::Result<(), BackendError>;

    /// Load the archive as a native bundle and unwrap to the native stage
    /// type.
    fn load_native(
        &self,
        archive: &ScopedArchive,
    ) -> std::result::Result<Box<dyn NativeStage>, BackendError>;

    /// Load the archive as a portable bundle and unwrap to the transformer
    /// interface.
    fn load_portable(
        &self,
        archive: &ScopedArchive,
    ) -> std::result::Result<Box<dyn PortableTransformer>, BackendError>;
}
