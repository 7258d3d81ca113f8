use tracing::debug;

use crate::{
    Result,
    parser::parse_text_payload,
    payload::{TextPayload, abbreviate_uri, expand_uri},
    tnf::Tnf,
};

/// Well-known record types used by this crate
pub mod rtd {
    pub const URI: &[u8] = b"U";
    pub const TEXT: &[u8] = b"T";
    pub const SMART_POSTER: &[u8] = b"Sp";
}

/// A single NDEF record as it travels on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireRecord {
    pub tnf: Tnf,
    pub type_: Vec<u8>,
    pub id: Vec<u8>,
    pub payload: Vec<u8>,
}

impl WireRecord {
    pub fn new(
        tnf: Tnf,
        type_: impl Into<Vec<u8>>,
        id: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self { tnf, type_: type_.into(), id: id.into(), payload: payload.into() }
    }

    /// Well-known URI record, the longest known prefix is abbreviated
    pub fn uri(uri: &str) -> Self {
        let (code, rest) = abbreviate_uri(uri);

        let mut payload = Vec::with_capacity(rest.len() + 1);
        payload.push(code);
        payload.extend_from_slice(rest.as_bytes());

        Self::new(Tnf::WellKnown, rtd::URI, b"", payload)
    }

    /// Well-known UTF-8 text record
    pub fn text(text: &str, language: &str) -> Self {
        // status byte only has 6 bits for the language length
        let language = &language.as_bytes()[..language.len().min(0x3F)];

        let mut payload = Vec::with_capacity(1 + language.len() + text.len());
        payload.push(language.len() as u8);
        payload.extend_from_slice(language);
        payload.extend_from_slice(text.as_bytes());

        Self::new(Tnf::WellKnown, rtd::TEXT, b"", payload)
    }

    pub fn media(media_type: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Tnf::Mime, media_type, b"", payload)
    }

    pub fn external(type_: &str, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Tnf::External, type_, b"", payload)
    }

    /// Smart poster wrapping a nested message
    pub fn smart_poster(records: &[WireRecord]) -> Self {
        Self::new(Tnf::WellKnown, rtd::SMART_POSTER, b"", crate::encode_message(records))
    }

    pub fn record_type(&self) -> String {
        String::from_utf8_lossy(&self.type_).into_owned()
    }

    pub fn is_well_known(&self, type_: &[u8]) -> bool {
        self.tnf == Tnf::WellKnown && self.type_ == type_
    }

    /// Human readable payload: expanded URI for `U`, the text for `T`, lossy UTF-8 otherwise
    pub fn payload_text(&self) -> String {
        if self.is_well_known(rtd::URI) {
            return match self.payload.split_first() {
                Some((code, rest)) => expand_uri(*code, rest),
                None => String::new(),
            };
        }

        if self.is_well_known(rtd::TEXT) {
            return self.text_payload().map(|text| text.text).unwrap_or_default();
        }

        String::from_utf8_lossy(&self.payload).into_owned()
    }

    /// Decoded text payload, only for well-known `T` records
    pub fn text_payload(&self) -> Option<TextPayload> {
        if !self.is_well_known(rtd::TEXT) {
            return None;
        }

        match parse_text_payload(&self.payload) {
            Ok(text) => Some(text),
            Err(error) => {
                debug!("unable to parse text payload: {error}");
                None
            }
        }
    }

    /// Records nested inside a smart poster payload
    pub fn nested_message(&self) -> Result<Vec<WireRecord>> {
        crate::parse_message(&self.payload)
    }
}
