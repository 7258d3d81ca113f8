//! Settings for building jobs and exporting them

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_REPEAT: u32 = 1;
pub const DEFAULT_EXPIRE_AFTER: u32 = 60;

/// Defaults applied to jobs built from templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// How many times the job runs
    pub repeat: u32,

    /// Seconds until the job expires
    pub expire_after: u32,

    /// Password sent with `auth_password` before every job, base64 in json
    #[serde(with = "base64_option", skip_serializing_if = "Option::is_none")]
    pub auth: Option<Vec<u8>>,

    pub export_mode: ExportMode,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            repeat: DEFAULT_REPEAT,
            expire_after: DEFAULT_EXPIRE_AFTER,
            auth: None,
            export_mode: ExportMode::default(),
        }
    }
}

impl JobConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_auth(mut self, password: impl Into<Vec<u8>>) -> Self {
        self.auth = Some(password.into());
        self
    }
}

/// How an export file lays out its jobs
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Pretty printed json, one job object after another
    #[default]
    Interactive,

    /// One compact json job per line
    Batch,
}

mod base64_option {
    use serde::{Deserialize as _, Deserializer, Serializer, de::Error as _};
    use tagcodec_util::encoding::{base64_decode, base64_encode};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_str(&base64_encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let Some(encoded) = Option::<String>::deserialize(deserializer)? else { return Ok(None) };
        if encoded.is_empty() {
            return Ok(None);
        }

        base64_decode(&encoded).map(Some).map_err(D::Error::custom)
    }
}
