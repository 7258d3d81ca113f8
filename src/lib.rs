//! Codec between tag payloads, their NDEF wire records and the JSON resources of the tag server
//!
//! - [`ndef::encode`] and [`ndef::decode`] map payloads to and from wire records
//! - [`JsonResource`] maps payloads, job steps, jobs, runs and tags to and from JSON
//! - [`parse_event_payload`] reads whatever the server pushes over the event channel

pub mod command;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod event;
pub mod export;
pub mod job;
pub mod locale;
pub mod logging;
pub mod ndef;
pub mod run;
pub mod tag;

pub(crate) mod fields;

use serde_json::Value;

pub use error::{DecodeError, Result};
pub use event::reconstruct::parse_event_payload;
pub use ndef::{NdefPayload, decode, encode};

use crate::{
    command::JobStep,
    job::NewJob,
    run::JobRun,
    tag::Tag,
};

/// A value with a JSON resource form
///
/// Decoding is strict: malformed or missing required fields are errors, see [`DecodeError`].
pub trait JsonResource: Sized {
    fn to_resource(&self) -> Value;

    fn from_resource(value: &Value) -> Result<Self>;
}

impl JsonResource for NdefPayload {
    fn to_resource(&self) -> Value {
        ndef::resource::to_value(self)
    }

    fn from_resource(value: &Value) -> Result<Self> {
        ndef::resource::from_value(value)
    }
}

impl JsonResource for JobStep {
    fn to_resource(&self) -> Value {
        command::resource::step_to_value(self)
    }

    fn from_resource(value: &Value) -> Result<Self> {
        command::resource::step_from_value(value)
    }
}

impl JsonResource for NewJob {
    fn to_resource(&self) -> Value {
        job::job_to_value(self)
    }

    fn from_resource(value: &Value) -> Result<Self> {
        job::job_from_value(value)
    }
}

impl JsonResource for JobRun {
    fn to_resource(&self) -> Value {
        run::run_to_value(self)
    }

    fn from_resource(value: &Value) -> Result<Self> {
        run::run_from_value(value)
    }
}

impl JsonResource for Tag {
    fn to_resource(&self) -> Value {
        tag::tag_to_value(self)
    }

    fn from_resource(value: &Value) -> Result<Self> {
        tag::tag_from_value(value)
    }
}

pub fn encode_resource<T: JsonResource>(value: &T) -> Value {
    value.to_resource()
}

pub fn decode_resource<T: JsonResource>(value: &Value) -> Result<T> {
    T::from_resource(value)
}

/// Same as [`decode_resource`] for JSON text
pub fn decode_resource_str<T: JsonResource>(json: &str) -> Result<T> {
    let value: Value = serde_json::from_str(json)?;
    T::from_resource(&value)
}
