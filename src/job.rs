//! Jobs submitted to an adapter, and the templates the cli builds them from

use serde::Serialize;
use serde_json::Value;

use crate::{
    command::{
        CommandParams, JobStep, PasswordParams, TransmitParams, WriteNdefParams,
        resource::{JobStepResource, read_step},
    },
    config::JobConfig,
    error::{DecodeError, Result, non_empty},
    fields::{FieldReader, Object, Strict},
    ndef::NdefPayload,
};

/// A job as submitted, before the server assigns it an id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewJob {
    pub job_name: String,
    pub repeat: u32,
    pub expire_after: u32,
    pub steps: Vec<JobStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJobResource {
    pub job_name: String,
    pub repeat: u32,
    pub expire_after: u32,
    pub steps: Vec<JobStepResource>,
}

impl NewJob {
    pub fn new(job_name: impl Into<String>, config: &JobConfig) -> Self {
        Self {
            job_name: job_name.into(),
            repeat: config.repeat,
            expire_after: config.expire_after,
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, params: impl Into<CommandParams>) -> Self {
        self.steps.push(JobStep::new(params.into()));
        self
    }
}

impl From<&NewJob> for NewJobResource {
    fn from(job: &NewJob) -> Self {
        Self {
            job_name: job.job_name.clone(),
            repeat: job.repeat,
            expire_after: job.expire_after,
            steps: job.steps.iter().map(Into::into).collect(),
        }
    }
}

pub fn job_to_value(job: &NewJob) -> Value {
    serde_json::to_value(NewJobResource::from(job)).unwrap_or_default()
}

/// Strictly decode a job, it needs a name and at least one step
pub fn job_from_value(value: &Value) -> Result<NewJob> {
    let object = Strict.element(value, "job")?.ok_or_else(|| DecodeError::missing("job"))?;
    read_job(&mut Strict, object)
}

pub(crate) fn read_job<R: FieldReader>(reader: &mut R, object: &Object) -> Result<NewJob, R::Error> {
    let job_name = reader.string(object, "job_name")?;
    reader.validate(|| non_empty("job_name", &job_name))?;

    let repeat = read_count(reader, object, "repeat")?;
    let expire_after = read_count(reader, object, "expire_after")?;

    let values = reader.array(object, "steps")?;
    reader.validate(|| {
        if values.is_empty() {
            return Err(DecodeError::empty("steps"));
        }

        Ok(())
    })?;

    let mut steps = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let step = reader.scoped(format!("steps[{index}]"), |reader| {
            match reader.element(value, "steps")? {
                Some(step) => read_step(reader, step),
                None => Ok(None),
            }
        })?;

        steps.extend(step);
    }

    Ok(NewJob { job_name, repeat, expire_after, steps })
}

fn read_count<R: FieldReader>(reader: &mut R, object: &Object, key: &'static str) -> Result<u32, R::Error> {
    let raw = reader.int(object, key)?;
    if let Ok(count) = u32::try_from(raw) {
        return Ok(count);
    }

    reader.validate(|| {
        Err(DecodeError::Validation { field: key, reason: format!("{raw} is out of range") })
    })?;

    reader.invalid(key, "count", &raw.to_string())?;
    Ok(0)
}

// MARK: templates

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum TransmitTarget {
    Adapter,
    Tag,
}

/// The jobs the cli knows how to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTemplate {
    Read,
    Dump,
    Lock,
    Format,
    RemovePassword,
    SetPassword(Vec<u8>),
    Transmit { target: TransmitTarget, tx_bytes: Vec<u8> },
    Write { record: NdefPayload, protect: bool },
}

impl JobTemplate {
    pub fn job_name(&self) -> &'static str {
        match self {
            Self::Read => "Read tag",
            Self::Dump => "Dump tag",
            Self::Lock => "Lock tag",
            Self::Format => "Format tag",
            Self::RemovePassword => "Remove tag password",
            Self::SetPassword(_) => "Set tag password",
            Self::Transmit { target: TransmitTarget::Adapter, .. } => "Transmit adapter",
            Self::Transmit { target: TransmitTarget::Tag, .. } => "Transmit tag",
            Self::Write { .. } => "Write tag",
        }
    }

    fn steps(&self) -> Vec<CommandParams> {
        match self {
            Self::Read => vec![CommandParams::GetTags, CommandParams::ReadNdef],
            Self::Dump => vec![CommandParams::GetDump],
            Self::Lock => vec![CommandParams::LockPermanent],
            Self::Format => vec![CommandParams::FormatDefault],
            Self::RemovePassword => vec![CommandParams::RemovePassword],
            Self::SetPassword(password) => {
                vec![CommandParams::SetPassword(PasswordParams::new(password.clone()))]
            }
            Self::Transmit { target, tx_bytes } => {
                let params = TransmitParams::new(tx_bytes.clone());
                match target {
                    TransmitTarget::Adapter => vec![CommandParams::TransmitAdapter(params)],
                    TransmitTarget::Tag => vec![CommandParams::TransmitTag(params)],
                }
            }
            Self::Write { record, protect } => {
                let write = CommandParams::WriteNdef(WriteNdefParams::from(vec![record.clone()]));
                if *protect {
                    return vec![write, CommandParams::LockPermanent];
                }

                vec![write]
            }
        }
    }

    /// The job for this template, authenticated first when the config has a password
    pub fn build(&self, config: &JobConfig) -> NewJob {
        let auth = config
            .auth
            .as_ref()
            .map(|password| CommandParams::AuthPassword(PasswordParams::new(password.clone())));

        auth.into_iter()
            .chain(self.steps())
            .fold(NewJob::new(self.job_name(), config), NewJob::with_step)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{command::Command, ndef::UrlPayload};

    fn commands(job: &NewJob) -> Vec<Command> {
        job.steps.iter().map(JobStep::command).collect()
    }

    #[test]
    fn templates() {
        let config = JobConfig::default();

        let job = JobTemplate::Read.build(&config);
        assert_eq!(job.job_name, "Read tag");
        assert_eq!((job.repeat, job.expire_after), (1, 60));
        assert_eq!(commands(&job), vec![Command::GetTags, Command::ReadNdef]);

        let job = JobTemplate::Transmit { target: TransmitTarget::Adapter, tx_bytes: vec![0xFF] }
            .build(&config);
        assert_eq!(job.job_name, "Transmit adapter");
        assert_eq!(
            job.steps,
            vec![JobStep::new(CommandParams::TransmitAdapter(TransmitParams::new(vec![0xFF])))]
        );

        let record = NdefPayload::from(UrlPayload::new("https://taglme.com"));
        let job = JobTemplate::Write { record, protect: true }.build(&config);
        assert_eq!(job.job_name, "Write tag");
        assert_eq!(commands(&job), vec![Command::WriteNdef, Command::LockPermanent]);
    }

    #[test]
    fn auth_goes_first() {
        let config = JobConfig { repeat: 2, expire_after: 30, ..Default::default() }
            .with_auth(vec![0xA6, 0x12, 0x66, 0xBA]);

        let job = JobTemplate::Dump.build(&config);
        assert_eq!(commands(&job), vec![Command::AuthPassword, Command::GetDump]);
        assert_eq!(job.steps[0].params.to_string(), "a6 12 66 ba ");

        let value = job_to_value(&job);
        assert_eq!(value["repeat"], 2);
        assert_eq!(value["steps"][0], json!({"command": "auth_password", "params": {"password": "phJmug=="}}));
        assert_eq!(value["steps"][1], json!({"command": "get_dump", "params": {}}));
    }

    #[test]
    fn round_trip() {
        let config = JobConfig::default().with_auth(vec![0x01, 0x02]);
        let templates = [
            JobTemplate::Lock,
            JobTemplate::Format,
            JobTemplate::RemovePassword,
            JobTemplate::SetPassword(vec![0x10, 0x20]),
            JobTemplate::Transmit { target: TransmitTarget::Tag, tx_bytes: vec![0x30, 0x04] },
        ];

        for template in templates {
            let job = template.build(&config);
            assert_eq!(job_from_value(&job_to_value(&job)).unwrap(), job);
        }
    }

    #[test]
    fn strict_errors() {
        let steps = json!([{"command": "get_dump"}]);

        let error = job_from_value(&json!({"job_name": "", "steps": steps})).unwrap_err();
        assert_eq!(error.field(), Some("job_name"));

        let error = job_from_value(&json!({"job_name": "Dump", "steps": []})).unwrap_err();
        assert_eq!(error.field(), Some("steps"));

        let error = job_from_value(&json!({"job_name": "Dump", "repeat": -1, "steps": steps})).unwrap_err();
        assert_eq!(error.field(), Some("repeat"));

        let error = job_from_value(&json!({"job_name": "Dump", "steps": [{"command": "fly"}]})).unwrap_err();
        assert!(matches!(error, DecodeError::UnsupportedVariant { kind: "command", .. }));
    }
}
