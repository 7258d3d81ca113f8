//! Job runs and the result of every step in them

use jiff::{RoundMode, Timestamp, TimestampRound, Unit};
use serde::Serialize;
use serde_json::Value;

use crate::{
    command::{
        Command, CommandOutput, CommandParams,
        resource::{
            CommandOutputResource, CommandParamsResource, read_command, read_output, read_params,
        },
    },
    error::{DecodeError, Result},
    fields::{FieldReader, Object, Strict},
    tag::{Tag, TagResource, read_tag},
};

pub const JOB_RUN_KIND: &str = "JobRun";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

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
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobRunStatus {
    #[default]
    Unknown,
    Started,
    Success,
    Error,
}

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
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    #[default]
    Unknown,
    Success,
    Error,
}

/// Outcome of one step, params and output are absent until the adapter reports them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepResult {
    pub command: Option<Command>,
    pub params: Option<CommandParams>,
    pub output: Option<CommandOutput>,
    pub status: CommandStatus,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobRun {
    pub run_id: String,
    pub job_id: String,
    pub job_name: String,
    pub status: JobRunStatus,
    pub adapter_id: String,
    pub adapter_name: String,
    pub created_at: Option<Timestamp>,
    pub tag: Tag,
    pub results: Vec<StepResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResultResource {
    pub command: String,
    pub params: Option<CommandParamsResource>,
    pub output: Option<CommandOutputResource>,
    pub status: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRunResource {
    pub run_id: String,
    pub kind: String,
    pub href: String,
    pub job_id: String,
    pub job_name: String,
    pub status: String,
    pub adapter_id: String,
    pub adapter_name: String,
    pub tag: TagResource,
    pub results: Vec<StepResultResource>,
    pub created_at: String,
}

impl JobRun {
    pub fn href(&self) -> String {
        format!("/adapters/{}/runs/{}", self.adapter_id, self.run_id)
    }

    /// The first step that failed, if any
    pub fn failed_step(&self) -> Option<&StepResult> {
        self.results.iter().find(|result| result.status == CommandStatus::Error)
    }
}

impl StepResult {
    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }
}

// MARK: encode

impl From<&StepResult> for StepResultResource {
    fn from(result: &StepResult) -> Self {
        Self {
            command: result.command.map(|command| command.to_string()).unwrap_or_default(),
            params: result.params.as_ref().map(Into::into),
            output: result.output.as_ref().map(Into::into),
            status: result.status.to_string(),
            message: result.message.clone(),
        }
    }
}

impl From<&JobRun> for JobRunResource {
    fn from(run: &JobRun) -> Self {
        Self {
            run_id: run.run_id.clone(),
            kind: JOB_RUN_KIND.to_string(),
            href: run.href(),
            job_id: run.job_id.clone(),
            job_name: run.job_name.clone(),
            status: run.status.to_string(),
            adapter_id: run.adapter_id.clone(),
            adapter_name: run.adapter_name.clone(),
            tag: (&run.tag).into(),
            results: run.results.iter().map(Into::into).collect(),
            created_at: run.created_at.map(format_timestamp).unwrap_or_default(),
        }
    }
}

/// Always three fractional digits, anything below a millisecond is truncated
pub fn format_timestamp(timestamp: Timestamp) -> String {
    timestamp.strftime(TIMESTAMP_FORMAT).to_string()
}

pub fn run_to_value(run: &JobRun) -> Value {
    serde_json::to_value(JobRunResource::from(run)).unwrap_or_default()
}

/// Strictly decode a job run resource
pub fn run_from_value(value: &Value) -> Result<JobRun> {
    let object = Strict.element(value, "run")?.ok_or_else(|| DecodeError::missing("run"))?;
    read_run(&mut Strict, object)
}

// MARK: read

pub(crate) fn read_run<R: FieldReader>(reader: &mut R, object: &Object) -> Result<JobRun, R::Error> {
    let run_id = reader.string(object, "run_id")?;
    let job_id = reader.string(object, "job_id")?;
    let job_name = reader.string(object, "job_name")?;
    let status = read_status(reader, object, "run status")?;
    let adapter_id = reader.string(object, "adapter_id")?;
    let adapter_name = reader.string(object, "adapter_name")?;
    let created_at = read_timestamp(reader, object, "created_at")?;

    let tag = match reader.object(object, "tag")? {
        Some(tag) => reader.scoped("tag", |reader| read_tag(reader, tag))?,
        None => Tag::default(),
    };

    let values = reader.array(object, "results")?;
    let mut results = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let result = reader.scoped(format!("results[{index}]"), |reader| {
            match reader.element(value, "results")? {
                Some(object) => read_result(reader, object).map(Some),
                None => Ok(None),
            }
        })?;

        results.extend(result);
    }

    Ok(JobRun {
        run_id,
        job_id,
        job_name,
        status,
        adapter_id,
        adapter_name,
        created_at,
        tag,
        results,
    })
}

pub(crate) fn read_result<R: FieldReader>(
    reader: &mut R,
    object: &Object,
) -> Result<StepResult, R::Error> {
    let command = read_command(reader, object)?;

    let params = match (command, reader.object(object, "params")?) {
        (Some(command), Some(params)) => {
            Some(reader.scoped("params", |reader| read_params(reader, command, params))?)
        }
        _ => None,
    };

    let output = match (command, reader.object(object, "output")?) {
        (Some(command), Some(output)) => {
            Some(reader.scoped("output", |reader| read_output(reader, command, output))?)
        }
        _ => None,
    };

    Ok(StepResult {
        command,
        params,
        output,
        status: read_status(reader, object, "command status")?,
        message: reader.string(object, "message")?,
    })
}

/// An empty status reads as `unknown`
fn read_status<R, T>(reader: &mut R, object: &Object, kind: &'static str) -> Result<T, R::Error>
where
    R: FieldReader,
    T: std::str::FromStr + Default,
{
    let raw = reader.string(object, "status")?;
    if raw.is_empty() {
        return Ok(T::default());
    }

    Ok(reader.variant("status", kind, &raw)?.unwrap_or_default())
}

/// RFC 3339, an empty string is no timestamp
pub(crate) fn read_timestamp<R: FieldReader>(
    reader: &mut R,
    object: &Object,
    key: &'static str,
) -> Result<Option<Timestamp>, R::Error> {
    let raw = reader.string(object, key)?;
    if raw.is_empty() {
        return Ok(None);
    }

    reader.validate(|| match raw.parse::<Timestamp>() {
        Ok(_) => Ok(()),
        Err(error) => Err(DecodeError::Validation { field: key, reason: error.to_string() }),
    })?;

    let timestamp: Option<Timestamp> = reader.variant(key, "timestamp", &raw)?;
    Ok(timestamp.map(to_millisecond))
}

/// Resources carry milliseconds, finer precision is dropped on read
fn to_millisecond(timestamp: Timestamp) -> Timestamp {
    let options = TimestampRound::new().smallest(Unit::Millisecond).mode(RoundMode::Trunc);
    timestamp.round(options).unwrap_or(timestamp)
}
