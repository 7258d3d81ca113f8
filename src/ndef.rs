//! NDEF record variants as the service understands them
//!
//! [`NdefPayload`] is the closed set of record kinds a job can write or a read can return.
//! [`wire`] maps them onto raw NDEF records, [`resource`] onto the json wire format.

pub mod lang;
pub mod resource;
pub mod vcard;
pub mod wire;

use std::fmt;

use itertools::Itertools as _;
use tagcodec_ndef::Tnf;
use tagcodec_util::format::spaced_hex;

pub use wire::{decode, encode};

/// The `type` tag of a record resource
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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NdefRecordType {
    Raw,
    Url,
    Text,
    Uri,
    Vcard,
    Mime,
    Phone,
    Geo,
    Aar,
    Poster,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::From)]
pub enum NdefPayload {
    Raw(RawPayload),
    Url(UrlPayload),
    Text(TextPayload),
    Uri(UriPayload),
    Vcard(VcardPayload),
    Mime(MimePayload),
    Phone(PhonePayload),
    Geo(GeoPayload),
    Aar(AarPayload),
    Poster(PosterPayload),
}

/// Any record not recognised as one of the richer kinds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPayload {
    pub tnf: u8,
    pub type_: String,
    pub id: String,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlPayload {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextPayload {
    pub text: String,
    /// Language name, `English`, not the code
    pub lang: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriPayload {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VcardPayload {
    pub address_city: String,
    pub address_country: String,
    pub address_postal_code: String,
    pub address_region: String,
    pub address_street: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub phone_cell: String,
    pub phone_home: String,
    pub phone_work: String,
    pub title: String,
    pub site: String,
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
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MimeFormat {
    /// Content is text
    #[default]
    Ascii,
    /// Content is the payload bytes themselves
    Hex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimePayload {
    pub type_: String,
    pub format: MimeFormat,
    /// Only meaningful when the format is ascii
    pub content_ascii: String,
    /// Only meaningful when the format is hex
    pub content_hex: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhonePayload {
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoPayload {
    pub latitude: String,
    pub longitude: String,
}

/// Android application record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AarPayload {
    pub package_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PosterPayload {
    pub title: String,
    pub uri: String,
}

/// A message read from a tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ndef {
    pub read_only: bool,
    pub message: Vec<NdefPayload>,
}

impl NdefPayload {
    pub fn record_type(&self) -> NdefRecordType {
        match self {
            Self::Raw(_) => NdefRecordType::Raw,
            Self::Url(_) => NdefRecordType::Url,
            Self::Text(_) => NdefRecordType::Text,
            Self::Uri(_) => NdefRecordType::Uri,
            Self::Vcard(_) => NdefRecordType::Vcard,
            Self::Mime(_) => NdefRecordType::Mime,
            Self::Phone(_) => NdefRecordType::Phone,
            Self::Geo(_) => NdefRecordType::Geo,
            Self::Aar(_) => NdefRecordType::Aar,
            Self::Poster(_) => NdefRecordType::Poster,
        }
    }
}

impl UrlPayload {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl TextPayload {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self { text: text.into(), lang: lang.into() }
    }
}

impl UriPayload {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl PhonePayload {
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self { phone_number: phone_number.into() }
    }
}

impl GeoPayload {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into() }
    }
}

impl AarPayload {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self { package_name: package_name.into() }
    }
}

impl PosterPayload {
    pub fn new(title: impl Into<String>, uri: impl Into<String>) -> Self {
        Self { title: title.into(), uri: uri.into() }
    }
}

impl MimePayload {
    pub fn ascii(type_: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            format: MimeFormat::Ascii,
            content_ascii: content.into(),
            ..Self::default()
        }
    }

    pub fn hex(type_: impl Into<String>, content_hex: impl Into<Vec<u8>>) -> Self {
        Self {
            type_: type_.into(),
            format: MimeFormat::Hex,
            content_hex: content_hex.into(),
            ..Self::default()
        }
    }
}

// MARK: display

impl fmt::Display for Ndef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let records = self.message.iter().map(ToString::to_string).join("\n");
        f.write_str(&records)
    }
}

impl fmt::Display for NdefPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(payload) => fmt::Display::fmt(payload, f),
            Self::Url(payload) => fmt::Display::fmt(payload, f),
            Self::Text(payload) => fmt::Display::fmt(payload, f),
            Self::Uri(payload) => fmt::Display::fmt(payload, f),
            Self::Vcard(payload) => fmt::Display::fmt(payload, f),
            Self::Mime(payload) => fmt::Display::fmt(payload, f),
            Self::Phone(payload) => fmt::Display::fmt(payload, f),
            Self::Geo(payload) => fmt::Display::fmt(payload, f),
            Self::Aar(payload) => fmt::Display::fmt(payload, f),
            Self::Poster(payload) => fmt::Display::fmt(payload, f),
        }
    }
}

impl fmt::Display for RawPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", Tnf::from_bits(self.tnf), self.type_, spaced_hex(&self.payload))
    }
}

impl fmt::Display for UrlPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl fmt::Display for TextPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Display for UriPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl fmt::Display for VcardPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = if self.first_name.is_empty() || self.last_name.is_empty() { "" } else { " " };
        write!(f, "{}{separator}{}", self.first_name, self.last_name)
    }
}

impl fmt::Display for MimePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            MimeFormat::Ascii => f.write_str(&self.content_ascii),
            MimeFormat::Hex => f.write_str(&spaced_hex(&self.content_hex)),
        }
    }
}

impl fmt::Display for PhonePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.phone_number)
    }
}

impl fmt::Display for GeoPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl fmt::Display for AarPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.package_name)
    }
}

impl fmt::Display for PosterPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.title, self.uri)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn record_type_names() {
        let names = NdefRecordType::iter().map(|t| t.to_string()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["raw", "url", "text", "uri", "vcard", "mime", "phone", "geo", "aar", "poster"]
        );

        assert_eq!("vcard".parse::<NdefRecordType>().unwrap(), NdefRecordType::Vcard);
        assert!("nfc".parse::<NdefRecordType>().is_err());
    }

    #[test]
    fn record_type_of_payload() {
        let payload: NdefPayload = GeoPayload::new("1", "2").into();
        assert_eq!(payload.record_type(), NdefRecordType::Geo);
    }

    #[test]
    fn display_renderings() {
        let raw = RawPayload { tnf: 6, type_: "type".into(), id: String::new(), payload: vec![0xA6] };
        assert_eq!(raw.to_string(), "Unchanged, type, a6");

        assert_eq!(TextPayload::new("Hello", "English").to_string(), "Hello");
        assert_eq!(GeoPayload::new("55.75", "37.61").to_string(), "55.75, 37.61");
        assert_eq!(MimePayload::hex("application/octet-stream", vec![0x01, 0xFF]).to_string(), "01 ff");
        assert_eq!(MimePayload::ascii("text/plain", "hi").to_string(), "hi");
        assert_eq!(
            PosterPayload::new("Site", "https://example.com").to_string(),
            "Site, https://example.com"
        );

        let vcard =
            VcardPayload { first_name: "John".into(), last_name: "Doe".into(), ..Default::default() };
        assert_eq!(NdefPayload::from(vcard).to_string(), "John Doe");

        let vcard = VcardPayload { last_name: "Doe".into(), ..Default::default() };
        assert_eq!(vcard.to_string(), "Doe");
    }

    #[test]
    fn message_display_joins_lines() {
        let ndef = Ndef {
            read_only: false,
            message: vec![UrlPayload::new("https://a.b").into(), PhonePayload::new("+100").into()],
        };
        assert_eq!(ndef.to_string(), "https://a.b\n+100");
    }
}
