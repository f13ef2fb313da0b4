//! The persisted JSON descriptor stored in place of a full stage.
//!
//! Every historical descriptor shape must stay decodable:
//! 1. Current: `{"className": "<fqcn>", "uid": "<uid>"}` with the archive
//!    out-of-band at `savePath/uid`.
//! 2. Legacy-with-path: adds `{"path": "<root>", "asSpark": <bool>}`.
//! 3. Empty sentinel: `{"className": "", "uid": ""}`.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Class name of a legacy vocabulary-encoder model whose archives have a
/// cross-version load defect. Descriptors naming it decode to absent.
pub const KNOWN_BAD_CLASS: &str = "ml.feature.VocabEncoderModel";

/// Stage reference descriptor: the small JSON value stored inside a
/// pipeline's configuration document. Field names are wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRef {
    /// Fully-qualified class name of the stage; "" in the empty sentinel.
    #[serde(default)]
    pub class_name: String,
    /// Stage uid; "" in the empty sentinel.
    #[serde(default)]
    pub uid: String,
    /// Legacy: save root the archive was written under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Legacy: true when the archive is a native bundle. Absent means true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_spark: Option<bool>,
}

impl StageRef {
    pub fn new(class_name: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            uid: uid.into(),
            path: None,
            as_spark: None,
        }
    }

    /// Canonical descriptor for "no stage present".
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// True when the uid carries the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.uid.is_empty()
    }

    /// `asSpark` with its historical default: an absent flag means the
    /// archive is a native bundle.
    pub fn as_spark_or_default(&self) -> bool {
        self.as_spark.unwrap_or(true)
    }

    /// Lenient parse. Anything that does not look like a stage descriptor
    /// yields `None`, so decode can degrade to absent instead of raising.
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
