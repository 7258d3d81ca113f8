use std::fmt;

use tagcodec_util::format::spaced_hex;

use super::Command;
use crate::{locale::Locale, ndef::NdefPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParams {
    GetTags,
    TransmitAdapter(TransmitParams),
    TransmitTag(TransmitParams),
    WriteNdef(WriteNdefParams),
    ReadNdef,
    FormatDefault,
    LockPermanent,
    SetPassword(PasswordParams),
    RemovePassword,
    AuthPassword(PasswordParams),
    GetDump,
    SetLocale(SetLocaleParams),
}

/// Raw bytes sent to the adapter or the tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmitParams {
    pub tx_bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteNdefParams {
    pub message: Vec<NdefPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordParams {
    pub password: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetLocaleParams {
    pub locale: Locale,
}

impl CommandParams {
    pub fn command(&self) -> Command {
        match self {
            Self::GetTags => Command::GetTags,
            Self::TransmitAdapter(_) => Command::TransmitAdapter,
            Self::TransmitTag(_) => Command::TransmitTag,
            Self::WriteNdef(_) => Command::WriteNdef,
            Self::ReadNdef => Command::ReadNdef,
            Self::FormatDefault => Command::FormatDefault,
            Self::LockPermanent => Command::LockPermanent,
            Self::SetPassword(_) => Command::SetPassword,
            Self::RemovePassword => Command::RemovePassword,
            Self::AuthPassword(_) => Command::AuthPassword,
            Self::GetDump => Command::GetDump,
            Self::SetLocale(_) => Command::SetLocale,
        }
    }
}

impl TransmitParams {
    pub fn new(tx_bytes: impl Into<Vec<u8>>) -> Self {
        Self { tx_bytes: tx_bytes.into() }
    }
}

impl PasswordParams {
    pub fn new(password: impl Into<Vec<u8>>) -> Self {
        Self { password: password.into() }
    }
}

impl From<Vec<NdefPayload>> for WriteNdefParams {
    fn from(message: Vec<NdefPayload>) -> Self {
        Self { message }
    }
}

// MARK: display

impl fmt::Display for CommandParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransmitAdapter(params) | Self::TransmitTag(params) => fmt::Display::fmt(params, f),
            Self::WriteNdef(params) => fmt::Display::fmt(params, f),
            Self::SetPassword(params) | Self::AuthPassword(params) => fmt::Display::fmt(params, f),
            Self::SetLocale(params) => fmt::Display::fmt(params, f),
            Self::GetTags
            | Self::ReadNdef
            | Self::FormatDefault
            | Self::LockPermanent
            | Self::RemovePassword
            | Self::GetDump => Ok(()),
        }
    }
}

impl fmt::Display for TransmitParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", spaced_hex(&self.tx_bytes))
    }
}

impl fmt::Display for PasswordParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", spaced_hex(&self.password))
    }
}

/// One `record(type)` line per record
impl fmt::Display for WriteNdefParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.message {
            writeln!(f, "{record}({})", record.record_type())?;
        }

        Ok(())
    }
}

impl fmt::Display for SetLocaleParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.locale.as_ref())
    }
}
