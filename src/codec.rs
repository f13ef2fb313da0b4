//! The stage parameter codec.
//!
//! Owns the encode/decode contract for one optional-stage parameter slot:
//! the three-tier format dispatch (portable bundle / native / legacy
//! inline), the backward-compatibility decision tree, and the transient
//! session state the enclosing framework reads back after a decode.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::archive::Filesystem;
use crate::backend::{NativeBackend, PortableBundleBackend, SerializationContext};
use crate::descriptor::{StageRef, KNOWN_BAD_CLASS};
use crate::error::{CodecError, Result};
use crate::registry::{register_numeric_ops, ClassRegistry};
use crate::stage::{DecodedStage, NativeStage, PortableTransformer};

/// Parameter-level codec for one optional-stage slot.
///
/// Session state (`save_path`, the serialization context, the last
/// portable-only decode result) is owned exclusively by one instance and is
/// never persisted with the parameter value. A framework that clones a
/// pipeline stage must give each clone a fresh codec.
pub struct StageCodec {
    native: Arc<dyn NativeBackend>,
    portable: Arc<dyn PortableBundleBackend>,
    fs: Arc<dyn Filesystem>,
    classes: Arc<ClassRegistry>,
    save_path: Option<PathBuf>,
    context: Option<SerializationContext>,
    last_portable: Option<Box<dyn PortableTransformer>>,
}

impl StageCodec {
    pub fn new(
        native: Arc<dyn NativeBackend>,
        portable: Arc<dyn PortableBundleBackend>,
        fs: Arc<dyn Filesystem>,
        classes: Arc<ClassRegistry>,
    ) -> Self {
        Self {
            native,
            portable,
            fs,
            classes,
            save_path: None,
            context: None,
            last_portable: None,
        }
    }

    /// Save root under which this parameter's archives are written, keyed
    /// by stage uid. Must be set before a present stage can be encoded.
    pub fn set_save_path(&mut self, path: impl Into<PathBuf>) {
        self.save_path = Some(path.into());
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    /// Portable-bundle writing session. When set, encode routes the payload
    /// through the portable writer instead of the native one.
    pub fn set_serialization_context(&mut self, context: SerializationContext) {
        self.context = Some(context);
    }

    pub fn clear_serialization_context(&mut self) {
        self.context = None;
    }

    /// Most recent portable-only decode result. A decode that returned
    /// absent may still have produced a transformer here; callers poll this
    /// to distinguish "truly absent" from "present but portable-only".
    pub fn last_portable_result(&self) -> Option<&dyn PortableTransformer> {
        self.last_portable.as_deref()
    }

    /// Take ownership of the last portable-only decode result.
    pub fn take_portable_result(&mut self) -> Option<Box<dyn PortableTransformer>> {
        self.last_portable.take()
    }

    /// Encode the optional stage into its JSON descriptor, writing the
    /// payload out-of-band under the save root.
    pub fn encode(&mut self, stage: Option<&dyn NativeStage>) -> Result<String> {
        let Some(stage) = stage else {
            // Canonical empty descriptor, regardless of session state.
            return StageRef::empty().to_json();
        };

        let Some(root) = self.save_path.as_deref() else {
            return Err(CodecError::PreconditionFailure(stage.uid().to_string()));
        };

        let archive_path = root.join(stage.uid());
        match &self.context {
            Some(context) => {
                debug!(
                    uid = stage.uid(),
                    path = %archive_path.display(),
                    "encoding stage as portable bundle"
                );
                let archive = self.fs.open_archive(&archive_path)?;
                self.portable
                    .write(stage, &archive, context)
                    .map_err(|source| CodecError::WriteFailure {
                        uid: stage.uid().to_string(),
                        context: context.name().to_string(),
                        source,
                    })?;
            }
            None => {
                debug!(
                    uid = stage.uid(),
                    path = %archive_path.display(),
                    "encoding stage through native writer"
                );
                self.native
                    .write(stage, &archive_path)
                    .map_err(|source| CodecError::WriteFailure {
                        uid: stage.uid().to_string(),
                        context: "native".to_string(),
                        source,
                    })?;
            }
        }

        StageRef::new(stage.class_name(), stage.uid()).to_json()
    }

    /// Decode a descriptor into a stage, preferring the portable-bundle
    /// path and falling back through the legacy formats in fixed priority
    /// order. A portable-only result is parked on the side channel and the
    /// call returns absent.
    pub fn decode(&mut self, json: &str) -> Result<Option<Box<dyn NativeStage>>> {
        match self.decode_portable(json)? {
            Some(DecodedStage::Native(stage)) => return Ok(Some(stage)),
            Some(DecodedStage::Portable(transformer)) => {
                debug!(
                    uid = transformer.uid(),
                    "portable-only transformer parked on side channel"
                );
                self.last_portable = Some(transformer);
                return Ok(None);
            }
            None => {}
        }

        // The portable path declined the descriptor; run the legacy chain.
        let Some(descriptor) = StageRef::parse(json) else {
            return Ok(None);
        };
        self.decode_legacy(&descriptor)
    }

    /// Legacy-format chain: an ordered list of total matchers over the
    /// parsed descriptor, first match wins. New formats are prepended, so
    /// old archives stay decodable.
    fn decode_legacy(&mut self, descriptor: &StageRef) -> Result<Option<Box<dyn NativeStage>>> {
        if descriptor.is_empty() {
            return Ok(None);
        }

        if descriptor.class_name == KNOWN_BAD_CLASS {
            // Cross-version load defect; intentionally never reconstructed.
            debug!(uid = descriptor.uid.as_str(), "descriptor names the known-bad legacy class");
            return Ok(None);
        }

        if let Some(root) = descriptor.path.as_deref() {
            if descriptor.as_spark_or_default() {
                let archive_path = Path::new(root).join(&descriptor.uid);
                debug!(
                    uid = descriptor.uid.as_str(),
                    class = descriptor.class_name.as_str(),
                    "reconstructing stage through the class-based loader"
                );
                self.save_path = Some(PathBuf::from(root));
                let reader = self.classes.resolve(&descriptor.class_name)?;
                let stage =
                    reader
                        .load(&archive_path)
                        .map_err(|source| CodecError::LoadFailure {
                            path: archive_path.display().to_string(),
                            source,
                        })?;
                return Ok(Some(stage));
            }
        }

        Ok(None)
    }

    /// Portable-path decode. Returns `Ok(None)` when the descriptor is not
    /// a portable-bundle reference at all (missing path or uid, or the
    /// empty-sentinel uid); callers then try the legacy formats.
    pub fn decode_portable(&mut self, json: &str) -> Result<Option<DecodedStage>> {
        let Some(descriptor) = StageRef::parse(json) else {
            self.save_path = None;
            return Ok(None);
        };

        let root = match descriptor.path.as_deref() {
            Some(root) if !descriptor.uid.is_empty() => root,
            _ => {
                self.save_path = None;
                return Ok(None);
            }
        };

        self.save_path = Some(PathBuf::from(root));
        let archive_path = self.fs.qualify(Path::new(root)).join(&descriptor.uid);
        let archive = self.fs.open_archive(&archive_path)?;

        let native_bundle =
            descriptor.as_spark_or_default() && descriptor.class_name != KNOWN_BAD_CLASS;

        if native_bundle {
            debug!(uid = descriptor.uid.as_str(), path = %archive.uri().display(), "loading native bundle");
            let stage = self
                .portable
                .load_native(&archive)
                .map_err(|source| CodecError::LoadFailure {
                    path: archive.uri().display().to_string(),
                    source,
                })?;
            Ok(Some(DecodedStage::Native(stage)))
        } else {
            register_numeric_ops();
            debug!(uid = descriptor.uid.as_str(), path = %archive.uri().display(), "loading portable bundle");
            let transformer = self
                .portable
                .load_portable(&archive)
                .map_err(|source| CodecError::LoadFailure {
                    path: archive.uri().display().to_string(),
                    source,
                })?;
            Ok(Some(DecodedStage::Portable(transformer)))
        }
    }
}
