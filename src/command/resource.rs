//! JSON resources for job steps, command params and command outputs
//!
//! Params and outputs carry no tag of their own, they are read by dispatching on the
//! `command` of the step or result that holds them.

use serde::Serialize;
use serde_json::Value;
use tagcodec_util::encoding::base64_encode;
use tracing::debug;

use super::{
    AuthPasswordOutput, Command, CommandOutput, CommandParams, GetDumpOutput, GetTagsOutput,
    JobStep, PageDump, PasswordParams, ReadNdefOutput, SetLocaleParams, TransmitOutput,
    TransmitParams, WriteNdefParams,
};
use crate::{
    error::{DecodeError, Result, non_empty},
    fields::{FieldReader, Object, Strict},
    locale::Locale,
    ndef::resource::{NdefRecordResource, NdefResource, read_message, read_ndef},
    tag::{TagResource, read_tag},
};

/// `{command, params}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStepResource {
    pub command: Command,
    pub params: CommandParamsResource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandParamsResource {
    Empty(EmptyResource),
    Transmit(TxBytesResource),
    WriteNdef(WriteNdefParamsResource),
    Password(PasswordResource),
    SetLocale(SetLocaleParamsResource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandOutputResource {
    Empty(EmptyResource),
    GetTags(GetTagsOutputResource),
    Transmit(RxBytesResource),
    ReadNdef(ReadNdefOutputResource),
    AuthPassword(AckResource),
    GetDump(GetDumpOutputResource),
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmptyResource {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TxBytesResource {
    pub tx_bytes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteNdefParamsResource {
    pub message: Vec<NdefRecordResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PasswordResource {
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SetLocaleParamsResource {
    pub locale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetTagsOutputResource {
    pub tags: Vec<TagResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RxBytesResource {
    pub rx_bytes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadNdefOutputResource {
    pub ndef: NdefResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AckResource {
    pub ack: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetDumpOutputResource {
    pub memory_dump: Vec<PageDumpResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageDumpResource {
    pub page: String,
    pub data: String,
    pub info: String,
}

// MARK: encode

impl From<&JobStep> for JobStepResource {
    fn from(step: &JobStep) -> Self {
        Self { command: step.command(), params: (&step.params).into() }
    }
}

impl From<&CommandParams> for CommandParamsResource {
    fn from(params: &CommandParams) -> Self {
        match params {
            CommandParams::TransmitAdapter(params) | CommandParams::TransmitTag(params) => {
                Self::Transmit(TxBytesResource { tx_bytes: base64_encode(&params.tx_bytes) })
            }
            CommandParams::WriteNdef(params) => Self::WriteNdef(WriteNdefParamsResource {
                message: params.message.iter().map(Into::into).collect(),
            }),
            CommandParams::SetPassword(params) | CommandParams::AuthPassword(params) => {
                Self::Password(PasswordResource { password: base64_encode(&params.password) })
            }
            CommandParams::SetLocale(params) => {
                Self::SetLocale(SetLocaleParamsResource { locale: params.locale.to_string() })
            }
            CommandParams::GetTags
            | CommandParams::ReadNdef
            | CommandParams::FormatDefault
            | CommandParams::LockPermanent
            | CommandParams::RemovePassword
            | CommandParams::GetDump => Self::Empty(EmptyResource {}),
        }
    }
}

impl From<&CommandOutput> for CommandOutputResource {
    fn from(output: &CommandOutput) -> Self {
        match output {
            CommandOutput::GetTags(output) => Self::GetTags(GetTagsOutputResource {
                tags: output.tags.iter().map(Into::into).collect(),
            }),
            CommandOutput::TransmitAdapter(output) | CommandOutput::TransmitTag(output) => {
                Self::Transmit(RxBytesResource { rx_bytes: base64_encode(&output.rx_bytes) })
            }
            CommandOutput::ReadNdef(output) => {
                Self::ReadNdef(ReadNdefOutputResource { ndef: (&output.ndef).into() })
            }
            CommandOutput::AuthPassword(output) => {
                Self::AuthPassword(AckResource { ack: base64_encode(&output.ack) })
            }
            CommandOutput::GetDump(output) => Self::GetDump(GetDumpOutputResource {
                memory_dump: output.memory_dump.iter().map(Into::into).collect(),
            }),
            CommandOutput::WriteNdef
            | CommandOutput::FormatDefault
            | CommandOutput::LockPermanent
            | CommandOutput::SetPassword
            | CommandOutput::RemovePassword
            | CommandOutput::SetLocale => Self::Empty(EmptyResource {}),
        }
    }
}

impl From<&PageDump> for PageDumpResource {
    fn from(page: &PageDump) -> Self {
        Self { page: page.page.clone(), data: base64_encode(&page.data), info: page.info.clone() }
    }
}

pub fn step_to_value(step: &JobStep) -> Value {
    serde_json::to_value(JobStepResource::from(step)).unwrap_or_default()
}

pub fn params_to_value(params: &CommandParams) -> Value {
    serde_json::to_value(CommandParamsResource::from(params)).unwrap_or_default()
}

pub fn output_to_value(output: &CommandOutput) -> Value {
    serde_json::to_value(CommandOutputResource::from(output)).unwrap_or_default()
}

// MARK: strict decode

/// `{"command": ..., "params": {...}}`, absent params read as `{}`
pub fn step_from_value(value: &Value) -> Result<JobStep> {
    let object = Strict.element(value, "step")?.ok_or_else(|| DecodeError::missing("step"))?;
    read_step(&mut Strict, object)?.ok_or_else(|| DecodeError::missing("command"))
}

pub fn params_from_value(command: Command, value: &Value) -> Result<CommandParams> {
    let object = Strict.element(value, "params")?.ok_or_else(|| DecodeError::missing("params"))?;
    read_params(&mut Strict, command, object)
}

pub fn output_from_value(command: Command, value: &Value) -> Result<CommandOutput> {
    let object = Strict.element(value, "output")?.ok_or_else(|| DecodeError::missing("output"))?;
    read_output(&mut Strict, command, object)
}

// MARK: read

/// The `command` key, `None` when the tolerant reader could not make one out
pub(crate) fn read_command<R: FieldReader>(
    reader: &mut R,
    object: &Object,
) -> Result<Option<Command>, R::Error> {
    let raw = reader.string(object, "command")?;
    if raw.is_empty() {
        reader.missing("command")?;
        return Ok(None);
    }

    reader.variant("command", "command", &raw)
}

pub(crate) fn read_step<R: FieldReader>(
    reader: &mut R,
    object: &Object,
) -> Result<Option<JobStep>, R::Error> {
    let Some(command) = read_command(reader, object)? else { return Ok(None) };

    let empty = Object::new();
    let params = reader.object(object, "params")?.unwrap_or(&empty);
    let params = reader.scoped("params", |reader| read_params(reader, command, params))?;

    Ok(Some(JobStep::new(params)))
}

pub(crate) fn read_params<R: FieldReader>(
    reader: &mut R,
    command: Command,
    object: &Object,
) -> Result<CommandParams, R::Error> {
    debug!("reading {command} params");

    let params = match command {
        Command::GetTags => CommandParams::GetTags,
        Command::TransmitAdapter => {
            CommandParams::TransmitAdapter(TransmitParams::new(required_bytes(reader, object, "tx_bytes")?))
        }
        Command::TransmitTag => {
            CommandParams::TransmitTag(TransmitParams::new(required_bytes(reader, object, "tx_bytes")?))
        }
        Command::WriteNdef => {
            CommandParams::WriteNdef(WriteNdefParams::from(read_message(reader, object, "message")?))
        }
        Command::ReadNdef => CommandParams::ReadNdef,
        Command::FormatDefault => CommandParams::FormatDefault,
        Command::LockPermanent => CommandParams::LockPermanent,
        Command::SetPassword => {
            CommandParams::SetPassword(PasswordParams::new(required_bytes(reader, object, "password")?))
        }
        Command::RemovePassword => CommandParams::RemovePassword,
        Command::AuthPassword => {
            CommandParams::AuthPassword(PasswordParams::new(required_bytes(reader, object, "password")?))
        }
        Command::GetDump => CommandParams::GetDump,
        Command::SetLocale => CommandParams::SetLocale(read_locale(reader, object)?),
    };

    Ok(params)
}

pub(crate) fn read_output<R: FieldReader>(
    reader: &mut R,
    command: Command,
    object: &Object,
) -> Result<CommandOutput, R::Error> {
    debug!("reading {command} output");

    let output = match command {
        Command::GetTags => {
            let values = reader.array(object, "tags")?;

            let mut tags = Vec::with_capacity(values.len());
            for (index, value) in values.iter().enumerate() {
                let tag = reader.scoped(format!("tags[{index}]"), |reader| {
                    match reader.element(value, "tags")? {
                        Some(object) => read_tag(reader, object).map(Some),
                        None => Ok(None),
                    }
                })?;

                tags.extend(tag);
            }

            CommandOutput::GetTags(GetTagsOutput { tags })
        }
        Command::TransmitAdapter => CommandOutput::TransmitAdapter(TransmitOutput::new(
            reader.string_base64(object, "rx_bytes")?,
        )),
        Command::TransmitTag => {
            CommandOutput::TransmitTag(TransmitOutput::new(reader.string_base64(object, "rx_bytes")?))
        }
        Command::ReadNdef => {
            let ndef = match reader.object(object, "ndef")? {
                Some(ndef) => reader.scoped("ndef", |reader| read_ndef(reader, ndef))?,
                None => Default::default(),
            };

            CommandOutput::ReadNdef(ReadNdefOutput { ndef })
        }
        Command::AuthPassword => {
            CommandOutput::AuthPassword(AuthPasswordOutput { ack: reader.string_base64(object, "ack")? })
        }
        Command::GetDump => {
            let values = reader.array(object, "memory_dump")?;

            let mut memory_dump = Vec::with_capacity(values.len());
            for (index, value) in values.iter().enumerate() {
                let page = reader.scoped(format!("memory_dump[{index}]"), |reader| {
                    match reader.element(value, "memory_dump")? {
                        Some(object) => read_page(reader, object).map(Some),
                        None => Ok(None),
                    }
                })?;

                memory_dump.extend(page);
            }

            CommandOutput::GetDump(GetDumpOutput { memory_dump })
        }
        Command::WriteNdef => CommandOutput::WriteNdef,
        Command::FormatDefault => CommandOutput::FormatDefault,
        Command::LockPermanent => CommandOutput::LockPermanent,
        Command::SetPassword => CommandOutput::SetPassword,
        Command::RemovePassword => CommandOutput::RemovePassword,
        Command::SetLocale => CommandOutput::SetLocale,
    };

    Ok(output)
}

fn required_bytes<R: FieldReader>(
    reader: &mut R,
    object: &Object,
    key: &'static str,
) -> Result<Vec<u8>, R::Error> {
    let encoded = reader.string(object, key)?;
    reader.validate(|| non_empty(key, &encoded))?;
    reader.base64(key, &encoded)
}

fn read_locale<R: FieldReader>(reader: &mut R, object: &Object) -> Result<SetLocaleParams, R::Error> {
    let code = reader.string(object, "locale")?;
    reader.validate(|| {
        non_empty("locale", &code)?;
        match code.parse::<Locale>() {
            Ok(_) => Ok(()),
            Err(_) => Err(DecodeError::Validation {
                field: "locale",
                reason: format!("must be `en` or `ru`, got `{code}`"),
            }),
        }
    })?;

    let locale = if code.is_empty() {
        Locale::default()
    } else {
        reader.variant::<Locale>("locale", "locale", &code)?.unwrap_or_default()
    };

    Ok(SetLocaleParams { locale })
}

fn read_page<R: FieldReader>(reader: &mut R, object: &Object) -> Result<PageDump, R::Error> {
    Ok(PageDump {
        page: reader.string(object, "page")?,
        data: reader.string_base64(object, "data")?,
        info: reader.string(object, "info")?,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator as _;

    use super::*;
    use crate::{
        fields::{Tolerant, infallible},
        ndef::{Ndef, TextPayload, UrlPayload},
        tag::{Tag, TagType},
    };

    fn every_params() -> Vec<CommandParams> {
        vec![
            CommandParams::GetTags,
            CommandParams::TransmitAdapter(TransmitParams::new(vec![0xFF, 0xCA, 0x00, 0x00, 0x00])),
            CommandParams::TransmitTag(TransmitParams::new(vec![0x30, 0x04])),
            CommandParams::WriteNdef(WriteNdefParams {
                message: vec![
                    UrlPayload::new("https://taglme.com").into(),
                    TextPayload::new("Hi", "English").into(),
                ],
            }),
            CommandParams::ReadNdef,
            CommandParams::FormatDefault,
            CommandParams::LockPermanent,
            CommandParams::SetPassword(PasswordParams::new(vec![0x01, 0x02, 0x03, 0x04])),
            CommandParams::RemovePassword,
            CommandParams::AuthPassword(PasswordParams::new(vec![0xA6, 0x12, 0x66, 0xBA])),
            CommandParams::GetDump,
            CommandParams::SetLocale(SetLocaleParams { locale: Locale::Ru }),
        ]
    }

    fn every_output() -> Vec<CommandOutput> {
        vec![
            CommandOutput::GetTags(GetTagsOutput {
                tags: vec![Tag {
                    tag_id: "t1".into(),
                    type_: TagType::Nfc,
                    adapter_id: "a1".into(),
                    uid: vec![0x04, 0x11],
                    ..Default::default()
                }],
            }),
            CommandOutput::TransmitAdapter(TransmitOutput::new(vec![0x90, 0x00])),
            CommandOutput::TransmitTag(TransmitOutput::new(vec![0x0A])),
            CommandOutput::WriteNdef,
            CommandOutput::ReadNdef(ReadNdefOutput {
                ndef: Ndef { read_only: true, message: vec![UrlPayload::new("http://a.b").into()] },
            }),
            CommandOutput::FormatDefault,
            CommandOutput::LockPermanent,
            CommandOutput::SetPassword,
            CommandOutput::RemovePassword,
            CommandOutput::AuthPassword(AuthPasswordOutput { ack: vec![0x00, 0x00] }),
            CommandOutput::GetDump(GetDumpOutput {
                memory_dump: vec![PageDump::new("00", vec![0x04, 0x11, 0x22, 0x33], "UID0-UID2/BCC0")],
            }),
            CommandOutput::SetLocale,
        ]
    }

    #[test]
    fn auth_password_step() {
        let value = json!({"command": "auth_password", "params": {"password": "phJmug=="}});
        let step = step_from_value(&value).unwrap();

        assert_eq!(
            step.params,
            CommandParams::AuthPassword(PasswordParams::new(vec![0xA6, 0x12, 0x66, 0xBA]))
        );
        assert_eq!(step_to_value(&step), value);
    }

    #[test]
    fn every_step_round_trips() {
        let params = every_params();
        assert_eq!(params.len(), Command::iter().count());

        for params in params {
            let step = JobStep::new(params);
            let value = step_to_value(&step);
            assert_eq!(value["command"], step.command().to_string());
            assert_eq!(step_from_value(&value).unwrap(), step, "{value}");
        }
    }

    #[test]
    fn every_output_round_trips() {
        for output in every_output() {
            let value = output_to_value(&output);
            assert_eq!(output_from_value(output.command(), &value).unwrap(), output, "{value}");
        }
    }

    #[test]
    fn empty_params_are_an_empty_object() {
        assert_eq!(params_to_value(&CommandParams::LockPermanent), json!({}));
        assert_eq!(output_to_value(&CommandOutput::SetLocale), json!({}));

        let step = step_from_value(&json!({"command": "get_dump"})).unwrap();
        assert_eq!(step.params, CommandParams::GetDump);
    }

    #[test]
    fn unknown_command() {
        let error = step_from_value(&json!({"command": "self_destruct", "params": {}})).unwrap_err();
        assert!(matches!(error, DecodeError::UnsupportedVariant { kind: "command", .. }));

        let error = step_from_value(&json!({"params": {}})).unwrap_err();
        assert_eq!(error.field(), Some("command"));
    }

    #[test]
    fn required_params() {
        let cases = [
            (json!({"command": "transmit_adapter", "params": {}}), "tx_bytes"),
            (json!({"command": "transmit_tag", "params": {"tx_bytes": ""}}), "tx_bytes"),
            (json!({"command": "set_password", "params": {}}), "password"),
            (json!({"command": "auth_password", "params": {"password": ""}}), "password"),
            (json!({"command": "set_locale", "params": {}}), "locale"),
            (json!({"command": "set_locale", "params": {"locale": "de"}}), "locale"),
            (json!({"command": "write_ndef", "params": {"message": [{"type": "url", "data": {}}]}}), "url"),
        ];

        for (value, field) in cases {
            let error = step_from_value(&value).unwrap_err();
            assert!(matches!(error, DecodeError::Validation { .. }), "{value}: {error}");
            assert_eq!(error.field(), Some(field), "{value}");
        }
    }

    #[test]
    fn bad_base64_params() {
        let value = json!({"command": "transmit_tag", "params": {"tx_bytes": "&&&"}});
        let error = step_from_value(&value).unwrap_err();
        assert!(matches!(error, DecodeError::Encoding { field: "tx_bytes", .. }));

        let value = json!({"memory_dump": [{"page": "00", "data": "&&&", "info": ""}]});
        let error = output_from_value(Command::GetDump, &value).unwrap_err();
        assert!(matches!(error, DecodeError::Encoding { field: "data", .. }));
    }

    #[test]
    fn tolerant_params_keep_going() {
        let Value::Object(params) = json!({"tx_bytes": "&&&"}) else { unreachable!() };

        let mut reader = Tolerant::new();
        let decoded = reader.scoped("params", |reader| {
            infallible(read_params(reader, Command::TransmitAdapter, &params))
        });

        assert_eq!(decoded, CommandParams::TransmitAdapter(TransmitParams::default()));

        let paths = reader.into_diagnostics().into_iter().map(|d| d.path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["params.tx_bytes"]);
    }

    #[test]
    fn tolerant_unknown_locale() {
        let Value::Object(params) = json!({"locale": "fr"}) else { unreachable!() };

        let mut reader = Tolerant::new();
        let decoded = infallible(read_params(&mut reader, Command::SetLocale, &params));

        assert_eq!(decoded, CommandParams::SetLocale(SetLocaleParams { locale: Locale::En }));
        assert_eq!(reader.into_diagnostics().len(), 1);
    }
}
