//! Events pushed by the server over the websocket channel
//!
//! Nothing on this channel is guaranteed to follow a schema, so events are only ever read
//! tolerantly, see [`reconstruct`].

pub mod reconstruct;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value;

use crate::{
    run::{JobRun, format_timestamp},
    tag::Tag,
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    TagDiscovery,
    TagRelease,
    AdapterDiscovery,
    AdapterRelease,
    /// Spelled the way the server sends it
    JobSubmited,
    JobActivated,
    JobPended,
    JobDeleted,
    JobFinished,
    RunStarted,
    RunSuccess,
    RunError,
    ServerStarted,
    ServerStopped,
}

impl EventName {
    /// Events whose data is a job run
    pub fn is_run(self) -> bool {
        matches!(self, Self::RunStarted | Self::RunSuccess | Self::RunError)
    }

    /// Events whose data is a tag
    pub fn is_tag(self) -> bool {
        matches!(self, Self::TagDiscovery | Self::TagRelease)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub event_id: String,
    /// `None` for names this client does not know
    pub name: Option<EventName>,
    pub adapter_id: String,
    pub adapter_name: String,
    pub data: Value,
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResource {
    pub event_id: String,
    pub name: String,
    pub adapter_id: String,
    pub adapter_name: String,
    pub data: Value,
    pub created_at: String,
}

impl Event {
    /// The job run carried by a `run_*` event
    pub fn run(&self) -> Option<JobRun> {
        if !self.name.is_some_and(EventName::is_run) {
            return None;
        }

        Some(reconstruct::parse_event_payload(&self.data))
    }

    /// The tag carried by a `tag_*` event
    pub fn tag(&self) -> Option<Tag> {
        if !self.name.is_some_and(EventName::is_tag) {
            return None;
        }

        Some(reconstruct::reconstruct_tag(&self.data).0)
    }
}

impl From<&Event> for EventResource {
    fn from(event: &Event) -> Self {
        Self {
            event_id: event.event_id.clone(),
            name: event.name.map(|name| name.to_string()).unwrap_or_default(),
            adapter_id: event.adapter_id.clone(),
            adapter_name: event.adapter_name.clone(),
            data: event.data.clone(),
            created_at: event.created_at.map(format_timestamp).unwrap_or_default(),
        }
    }
}

pub fn event_to_value(event: &Event) -> Value {
    serde_json::to_value(EventResource::from(event)).unwrap_or_default()
}
