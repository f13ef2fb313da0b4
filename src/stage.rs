//! Stage and transformer interfaces consumed by the codec.
//!
//! The enclosing pipeline framework owns the concrete stage types; the codec
//! only needs enough surface to record a stage in a descriptor and to hand
//! reconstructed stages back.

use std::any::Any;
use std::path::Path;

use crate::error::BackendError;

/// A pipeline stage reloadable through the native framework.
pub trait NativeStage: Send {
    /// Stage identifier, unique within a pipeline.
    fn uid(&self) -> &str;

    /// Fully-qualified class name recorded in descriptors.
    fn class_name(&self) -> &str;

    /// Downcast hook for callers that know the concrete stage type.
    fn as_any(&self) -> &dyn Any;
}

impl std::fmt::Debug for dyn NativeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeStage")
            .field("uid", &self.uid())
            .field("class_name", &self.class_name())
            .finish()
    }
}

/// A transformer reconstructed from a portable bundle, usable without the
/// full native runtime.
pub trait PortableTransformer: Send {
    fn uid(&self) -> &str;
}

/// Loader for one registered stage class, used by the legacy class-based
/// decode path.
pub trait StageReader: Send + Sync {
    fn load(&self, path: &Path) -> std::result::Result<Box<dyn NativeStage>, BackendError>;
}

impl std::fmt::Debug for dyn StageReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageReader").finish_non_exhaustive()
    }
}

/// Outcome of a portable-path decode.
pub enum DecodedStage {
    /// Reconstructed as a native stage of the expected type.
    Native(Box<dyn NativeStage>),
    /// Only reconstructable as a portable transformer; the codec parks it
    /// on the side channel.
    Portable(Box<dyn PortableTransformer>),
}
