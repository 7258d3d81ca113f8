//! Commands a job runs against a tag, with their parameters and outputs
//!
//! [`CommandParams`] and [`CommandOutput`] carry one variant per [`Command`]. The json side is
//! in [`resource`], keyed by the `command` string of the enclosing step.

pub mod output;
pub mod params;
pub mod resource;

use std::fmt;

pub use output::{
    AuthPasswordOutput, CommandOutput, GetDumpOutput, GetTagsOutput, PageDump, ReadNdefOutput,
    TransmitOutput,
};
pub use params::{CommandParams, PasswordParams, SetLocaleParams, TransmitParams, WriteNdefParams};

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
pub enum Command {
    GetTags,
    TransmitAdapter,
    TransmitTag,
    WriteNdef,
    ReadNdef,
    FormatDefault,
    LockPermanent,
    SetPassword,
    RemovePassword,
    AuthPassword,
    GetDump,
    SetLocale,
}

/// One step of a job, the command is implied by the params variant
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub struct JobStep {
    pub params: CommandParams,
}

impl JobStep {
    pub fn new(params: CommandParams) -> Self {
        Self { params }
    }

    pub fn command(&self) -> Command {
        self.params.command()
    }
}

impl fmt::Display for JobStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.params.to_string();
        if params.is_empty() {
            return write!(f, "{}", self.command());
        }

        write!(f, "{} {}", self.command(), params.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn command_names() {
        let names = Command::iter().map(|command| command.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "get_tags",
                "transmit_adapter",
                "transmit_tag",
                "write_ndef",
                "read_ndef",
                "format_default",
                "lock_permanent",
                "set_password",
                "remove_password",
                "auth_password",
                "get_dump",
                "set_locale",
            ]
        );

        for command in Command::iter() {
            assert_eq!(command.as_ref().parse::<Command>().unwrap(), command);
        }
    }

    #[test]
    fn step_display() {
        let step = JobStep::new(CommandParams::GetTags);
        assert_eq!(step.to_string(), "get_tags");

        let step = JobStep::new(CommandParams::TransmitTag(TransmitParams::new(vec![0x30, 0x00])));
        assert_eq!(step.command(), Command::TransmitTag);
        assert_eq!(step.to_string(), "transmit_tag 30 00");
    }
}
