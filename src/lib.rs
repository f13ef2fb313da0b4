//! Stagebridge - parameter-level serialization bridge for pipeline stages
//!
//! A pipeline's parameters are normally small values inlined into a JSON
//! configuration document. Some parameters are entire sub-models that must
//! travel through their own archive format instead. This crate makes such a
//! stage look like an ordinary encodable/decodable parameter value while
//! delegating the real payload to a pluggable serialization backend, and
//! keeps every historical descriptor format decodable.

pub mod archive;
pub mod backend;
pub mod codec;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod stage;

pub use error::{CodecError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::archive::{ArchiveHandle, Filesystem, LocalFs, ScopedArchive};
    pub use crate::backend::{
        BundleFormat, NativeBackend, PortableBundleBackend, SerializationContext,
    };
    pub use crate::codec::StageCodec;
    pub use crate::descriptor::{StageRef, KNOWN_BAD_CLASS};
    pub use crate::error::{BackendError, CodecError, Result};
    pub use crate::metadata::augment_stage_entry;
    pub use crate::registry::{register_numeric_ops, ClassRegistry, OpPlugin, OpRegistry};
    pub use crate::stage::{DecodedStage, NativeStage, PortableTransformer, StageReader};
}
