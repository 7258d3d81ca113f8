//! Best effort reading of event payloads
//!
//! Every field is looked up by key and checked for its json type. Anything absent or of the
//! wrong type is left at its zero value and reported as a [`Diagnostic`], these functions
//! never fail.

use serde_json::Value;
use tracing::debug;

use super::Event;
use crate::{
    diagnostic::Diagnostic,
    fields::{FieldReader as _, Tolerant, infallible},
    run::{JobRun, read_run, read_timestamp},
    tag::{Tag, read_tag},
};

/// The job run in the data of a `run_*` event
pub fn parse_event_payload(data: &Value) -> JobRun {
    reconstruct_job_run(data).0
}

pub fn reconstruct_job_run(data: &Value) -> (JobRun, Vec<Diagnostic>) {
    let mut reader = Tolerant::new();

    let run = match infallible(reader.element(data, "data")) {
        Some(object) => infallible(read_run(&mut reader, object)),
        None => JobRun::default(),
    };

    let diagnostics = reader.into_diagnostics();
    debug!("reconstructed run `{}` with {} diagnostics", run.run_id, diagnostics.len());

    (run, diagnostics)
}

pub fn reconstruct_tag(data: &Value) -> (Tag, Vec<Diagnostic>) {
    let mut reader = Tolerant::new();

    let tag = match infallible(reader.element(data, "data")) {
        Some(object) => infallible(read_tag(&mut reader, object)),
        None => Tag::default(),
    };

    (tag, reader.into_diagnostics())
}

/// The event envelope, `data` is kept as is
pub fn reconstruct_event(value: &Value) -> (Event, Vec<Diagnostic>) {
    let mut reader = Tolerant::new();
    let Some(object) = infallible(reader.element(value, "event")) else {
        return (Event::default(), reader.into_diagnostics());
    };

    let event_id = infallible(reader.string(object, "event_id"));
    let raw_name = infallible(reader.string(object, "name"));
    let name = infallible(reader.variant("name", "event name", &raw_name));

    let event = Event {
        event_id,
        name,
        adapter_id: infallible(reader.string(object, "adapter_id")),
        adapter_name: infallible(reader.string(object, "adapter_name")),
        data: object.get("data").cloned().unwrap_or_default(),
        created_at: infallible(read_timestamp(&mut reader, object, "created_at")),
    };

    (event, reader.into_diagnostics())
}

pub fn parse_event(value: &Value) -> Event {
    reconstruct_event(value).0
}
