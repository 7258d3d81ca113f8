use std::fmt;

use itertools::Itertools as _;
use tagcodec_util::format::spaced_hex;

use super::Command;
use crate::{ndef::Ndef, tag::Tag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    GetTags(GetTagsOutput),
    TransmitAdapter(TransmitOutput),
    TransmitTag(TransmitOutput),
    WriteNdef,
    ReadNdef(ReadNdefOutput),
    FormatDefault,
    LockPermanent,
    SetPassword,
    RemovePassword,
    AuthPassword(AuthPasswordOutput),
    GetDump(GetDumpOutput),
    SetLocale,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetTagsOutput {
    pub tags: Vec<Tag>,
}

/// Bytes answered by the adapter or the tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmitOutput {
    pub rx_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadNdefOutput {
    pub ndef: Ndef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthPasswordOutput {
    pub ack: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetDumpOutput {
    pub memory_dump: Vec<PageDump>,
}

/// One memory page of a tag dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDump {
    pub page: String,
    pub data: Vec<u8>,
    pub info: String,
}

impl CommandOutput {
    pub fn command(&self) -> Command {
        match self {
            Self::GetTags(_) => Command::GetTags,
            Self::TransmitAdapter(_) => Command::TransmitAdapter,
            Self::TransmitTag(_) => Command::TransmitTag,
            Self::WriteNdef => Command::WriteNdef,
            Self::ReadNdef(_) => Command::ReadNdef,
            Self::FormatDefault => Command::FormatDefault,
            Self::LockPermanent => Command::LockPermanent,
            Self::SetPassword => Command::SetPassword,
            Self::RemovePassword => Command::RemovePassword,
            Self::AuthPassword(_) => Command::AuthPassword,
            Self::GetDump(_) => Command::GetDump,
            Self::SetLocale => Command::SetLocale,
        }
    }
}

impl TransmitOutput {
    pub fn new(rx_bytes: impl Into<Vec<u8>>) -> Self {
        Self { rx_bytes: rx_bytes.into() }
    }
}

impl PageDump {
    pub fn new(page: impl Into<String>, data: impl Into<Vec<u8>>, info: impl Into<String>) -> Self {
        Self { page: page.into(), data: data.into(), info: info.into() }
    }
}

// MARK: display

impl fmt::Display for CommandOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetTags(output) => fmt::Display::fmt(output, f),
            Self::TransmitAdapter(output) | Self::TransmitTag(output) => fmt::Display::fmt(output, f),
            Self::ReadNdef(output) => fmt::Display::fmt(output, f),
            Self::AuthPassword(output) => fmt::Display::fmt(output, f),
            Self::GetDump(output) => fmt::Display::fmt(output, f),
            Self::WriteNdef
            | Self::FormatDefault
            | Self::LockPermanent
            | Self::SetPassword
            | Self::RemovePassword
            | Self::SetLocale => Ok(()),
        }
    }
}

impl fmt::Display for GetTagsOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tags.iter().join("\n"))
    }
}

impl fmt::Display for TransmitOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", spaced_hex(&self.rx_bytes))
    }
}

impl fmt::Display for AuthPasswordOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", spaced_hex(&self.ack))
    }
}

impl fmt::Display for ReadNdefOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.ndef.message {
            writeln!(f, "{record}({})", record.record_type())?;
        }

        let access = if self.ndef.read_only { "read only" } else { "read and write" };
        write!(f, "Access: {access}")
    }
}

impl fmt::Display for GetDumpOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.memory_dump.iter().join("\n"))
    }
}

impl fmt::Display for PageDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} | {}", self.page, spaced_hex(&self.data), self.info)
    }
}
