//! NDEF wire format: record headers, well-known record helpers and message framing

pub mod header;
pub mod parser;
pub mod payload;
pub mod record;
pub mod tnf;

use tagcodec_util::result_ext::ResultExt as _;
use winnow::error::{ContextError, ErrMode};

use header::RecordHeader;
use parser::stream::{self, Stream};

pub use payload::{TextPayload, TextPayloadFormat};
pub use record::WireRecord;
pub use tnf::Tnf;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NdefError {
    #[error("error parsing the NDEF message: {0}")]
    ParsingError(String),

    #[error("not enough data to parse the NDEF message")]
    NotEnoughData,
}

pub type Error = NdefError;
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<ErrMode<ContextError>> for NdefError {
    fn from(error: ErrMode<ContextError>) -> Self {
        match error {
            ErrMode::Incomplete(_) => Self::NotEnoughData,
            ErrMode::Backtrack(error) | ErrMode::Cut(error) => Self::ParsingError(error.to_string()),
        }
    }
}

/// Parse a complete NDEF message
pub fn parse_message(bytes: &[u8]) -> Result<Vec<WireRecord>> {
    let mut input: Stream<'_> = stream::new(bytes);
    parser::parse_records(&mut input).map_err(NdefError::from)
}

/// Frame records into a message, setting the begin, end, short record and id flags
pub fn encode_message(records: &[WireRecord]) -> Vec<u8> {
    let mut out = Vec::new();
    let last = records.len().saturating_sub(1);

    for (index, record) in records.iter().enumerate() {
        let type_ = &record.type_[..record.type_.len().min(u8::MAX as usize)];
        let id = &record.id[..record.id.len().min(u8::MAX as usize)];

        let header = RecordHeader {
            message_begin: index == 0,
            message_end: index == last,
            chunked: false,
            short_record: record.payload.len() <= u8::MAX as usize,
            has_id_length: !id.is_empty(),
            tnf: record.tnf,
            type_length: type_.len() as u8,
            payload_length: record.payload.len() as u32,
            id_length: (!id.is_empty()).then_some(id.len() as u8),
        };

        header.write(&mut out);
        out.extend_from_slice(type_);
        out.extend_from_slice(id);
        out.extend_from_slice(&record.payload);
    }

    out
}

/// Parse a message given as hex, used by tooling that logs raw tag dumps
pub fn parse_hex_message(hex: &str) -> Result<Vec<WireRecord>> {
    let bytes = hex::decode(hex).map_err_str(NdefError::ParsingError)?;
    parse_message(&bytes)
}
