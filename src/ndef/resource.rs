//! JSON resources for NDEF records, `{"type": ..., "data": {...}}`
//!
//! Reading is split in two passes: the resource structs are filled from the document with
//! no checks beyond json types, then [`NdefRecordResource::validate`] applies the field
//! rules. Binary fields stay base64 text until the resource is turned into a payload.

use serde::Serialize;
use serde_json::Value;
use tagcodec_util::encoding::base64_encode;
use tracing::debug;

use super::{
    AarPayload, GeoPayload, MimeFormat, MimePayload, Ndef, NdefPayload, NdefRecordType,
    PhonePayload, PosterPayload, RawPayload, TextPayload, UriPayload, UrlPayload, VcardPayload,
};
use crate::{
    error::{DecodeError, Result, non_empty},
    fields::{FieldReader, Object, Strict},
};

const MAX_RAW_TNF: i64 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::From)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum NdefRecordResource {
    Raw(RawResource),
    Url(UrlResource),
    Text(TextResource),
    Uri(UriResource),
    Vcard(VcardResource),
    Mime(MimeResource),
    Phone(PhoneResource),
    Geo(GeoResource),
    Aar(AarResource),
    Poster(PosterResource),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawResource {
    pub tnf: i64,
    #[serde(rename = "type")]
    pub type_: String,
    pub id: String,
    /// base64
    pub payload: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UrlResource {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextResource {
    pub text: String,
    pub lang: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UriResource {
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VcardResource {
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

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MimeResource {
    #[serde(rename = "type")]
    pub type_: String,
    pub format: String,
    /// Plain text for `ascii`, base64 for `hex`
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhoneResource {
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoResource {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AarResource {
    pub package_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PosterResource {
    pub title: String,
    pub uri: String,
}

/// Output of `read_ndef`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NdefResource {
    pub read_only: bool,
    pub message: Vec<NdefRecordResource>,
}

// MARK: encode

impl From<&NdefPayload> for NdefRecordResource {
    fn from(payload: &NdefPayload) -> Self {
        match payload {
            NdefPayload::Raw(raw) => RawResource {
                tnf: raw.tnf.into(),
                type_: raw.type_.clone(),
                id: raw.id.clone(),
                payload: base64_encode(&raw.payload),
            }
            .into(),
            NdefPayload::Url(url) => UrlResource { url: url.url.clone() }.into(),
            NdefPayload::Text(text) => {
                TextResource { text: text.text.clone(), lang: text.lang.clone() }.into()
            }
            NdefPayload::Uri(uri) => UriResource { uri: uri.uri.clone() }.into(),
            NdefPayload::Vcard(card) => VcardResource::from(card).into(),
            NdefPayload::Mime(mime) => {
                let content = match mime.format {
                    MimeFormat::Ascii => mime.content_ascii.clone(),
                    MimeFormat::Hex => base64_encode(&mime.content_hex),
                };

                MimeResource { type_: mime.type_.clone(), format: mime.format.to_string(), content }
                    .into()
            }
            NdefPayload::Phone(phone) => {
                PhoneResource { phone_number: phone.phone_number.clone() }.into()
            }
            NdefPayload::Geo(geo) => GeoResource {
                latitude: geo.latitude.clone(),
                longitude: geo.longitude.clone(),
            }
            .into(),
            NdefPayload::Aar(aar) => AarResource { package_name: aar.package_name.clone() }.into(),
            NdefPayload::Poster(poster) => {
                PosterResource { title: poster.title.clone(), uri: poster.uri.clone() }.into()
            }
        }
    }
}

impl From<&VcardPayload> for VcardResource {
    fn from(card: &VcardPayload) -> Self {
        let VcardPayload {
            address_city,
            address_country,
            address_postal_code,
            address_region,
            address_street,
            email,
            first_name,
            last_name,
            organization,
            phone_cell,
            phone_home,
            phone_work,
            title,
            site,
        } = card.clone();

        Self {
            address_city,
            address_country,
            address_postal_code,
            address_region,
            address_street,
            email,
            first_name,
            last_name,
            organization,
            phone_cell,
            phone_home,
            phone_work,
            title,
            site,
        }
    }
}

impl From<&Ndef> for NdefResource {
    fn from(ndef: &Ndef) -> Self {
        Self { read_only: ndef.read_only, message: ndef.message.iter().map(Into::into).collect() }
    }
}

/// `{"type": ..., "data": {...}}` for a payload
pub fn to_value(payload: &NdefPayload) -> Value {
    serde_json::to_value(NdefRecordResource::from(payload)).unwrap_or_default()
}

// MARK: decode

/// Strictly decode one record envelope
pub fn from_value(value: &Value) -> Result<NdefPayload> {
    match read_record(&mut Strict, value, "record")? {
        Some(payload) => Ok(payload),
        None => Err(DecodeError::missing("type")),
    }
}

/// One record envelope, `None` when the tolerant reader had to skip it
pub(crate) fn read_record<R: FieldReader>(
    reader: &mut R,
    value: &Value,
    key: &'static str,
) -> Result<Option<NdefPayload>, R::Error> {
    let Some(envelope) = reader.element(value, key)? else { return Ok(None) };
    let Some(resource) = NdefRecordResource::read(reader, envelope)? else { return Ok(None) };

    reader.validate(|| resource.validate())?;
    reader.scoped("data", |reader| resource.into_payload(reader)).map(Some)
}

/// A `message` array of record envelopes
pub(crate) fn read_message<R: FieldReader>(
    reader: &mut R,
    object: &Object,
    key: &'static str,
) -> Result<Vec<NdefPayload>, R::Error> {
    let values = reader.array(object, key)?;

    let mut message = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        let record = reader.scoped(format!("{key}[{index}]"), |reader| read_record(reader, value, key))?;
        message.extend(record);
    }

    Ok(message)
}

pub(crate) fn read_ndef<R: FieldReader>(reader: &mut R, object: &Object) -> Result<Ndef, R::Error> {
    let read_only = reader.bool(object, "read_only")?;
    let message = read_message(reader, object, "message")?;

    Ok(Ndef { read_only, message })
}

impl NdefRecordResource {
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

    /// Fill the resource from an envelope, only json types are checked here
    pub(crate) fn read<R: FieldReader>(reader: &mut R, envelope: &Object) -> Result<Option<Self>, R::Error> {
        let type_ = reader.string(envelope, "type")?;
        if type_.is_empty() {
            reader.missing("type")?;
            return Ok(None);
        }

        let Some(kind) = reader.variant::<NdefRecordType>("type", "record type", &type_)? else {
            return Ok(None);
        };

        let Some(data) = reader.object(envelope, "data")? else {
            reader.missing("data")?;
            return Ok(None);
        };

        debug!("reading {kind} record");
        reader.scoped("data", |reader| Self::read_data(reader, kind, data)).map(Some)
    }

    fn read_data<R: FieldReader>(
        reader: &mut R,
        kind: NdefRecordType,
        data: &Object,
    ) -> Result<Self, R::Error> {
        let resource = match kind {
            NdefRecordType::Raw => RawResource {
                tnf: reader.int(data, "tnf")?,
                type_: reader.string(data, "type")?,
                id: reader.string(data, "id")?,
                payload: reader.string(data, "payload")?,
            }
            .into(),
            NdefRecordType::Url => UrlResource { url: reader.string(data, "url")? }.into(),
            NdefRecordType::Text => TextResource {
                text: reader.string(data, "text")?,
                lang: reader.string(data, "lang")?,
            }
            .into(),
            NdefRecordType::Uri => UriResource { uri: reader.string(data, "uri")? }.into(),
            NdefRecordType::Vcard => VcardResource {
                address_city: reader.string(data, "address_city")?,
                address_country: reader.string(data, "address_country")?,
                address_postal_code: reader.string(data, "address_postal_code")?,
                address_region: reader.string(data, "address_region")?,
                address_street: reader.string(data, "address_street")?,
                email: reader.string(data, "email")?,
                first_name: reader.string(data, "first_name")?,
                last_name: reader.string(data, "last_name")?,
                organization: reader.string(data, "organization")?,
                phone_cell: reader.string(data, "phone_cell")?,
                phone_home: reader.string(data, "phone_home")?,
                phone_work: reader.string(data, "phone_work")?,
                title: reader.string(data, "title")?,
                site: reader.string(data, "site")?,
            }
            .into(),
            NdefRecordType::Mime => MimeResource {
                type_: reader.string(data, "type")?,
                format: reader.string(data, "format")?,
                content: reader.string(data, "content")?,
            }
            .into(),
            NdefRecordType::Phone => {
                PhoneResource { phone_number: reader.string(data, "phone_number")? }.into()
            }
            NdefRecordType::Geo => GeoResource {
                latitude: reader.string(data, "latitude")?,
                longitude: reader.string(data, "longitude")?,
            }
            .into(),
            NdefRecordType::Aar => {
                AarResource { package_name: reader.string(data, "package_name")? }.into()
            }
            NdefRecordType::Poster => PosterResource {
                title: reader.string(data, "title")?,
                uri: reader.string(data, "uri")?,
            }
            .into(),
        };

        Ok(resource)
    }

    /// Field rules for each record type
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Raw(raw) => {
                if !(0..=MAX_RAW_TNF).contains(&raw.tnf) {
                    return Err(DecodeError::Validation {
                        field: "tnf",
                        reason: format!("must be between 0 and {MAX_RAW_TNF}, got {}", raw.tnf),
                    });
                }

                if raw.tnf > 0 {
                    non_empty("payload", &raw.payload)?;
                }
            }
            Self::Url(url) => non_empty("url", &url.url)?,
            Self::Text(text) => non_empty("text", &text.text)?,
            Self::Uri(uri) => non_empty("uri", &uri.uri)?,
            Self::Vcard(card) => non_empty("first_name", &card.first_name)?,
            Self::Mime(mime) => {
                non_empty("type", &mime.type_)?;
                if mime.format.parse::<MimeFormat>().is_err() {
                    return Err(DecodeError::Validation {
                        field: "format",
                        reason: format!("must be `ascii` or `hex`, got `{}`", mime.format),
                    });
                }
            }
            Self::Phone(phone) => non_empty("phone_number", &phone.phone_number)?,
            Self::Geo(geo) => {
                non_empty("latitude", &geo.latitude)?;
                non_empty("longitude", &geo.longitude)?;
            }
            Self::Aar(aar) => non_empty("package_name", &aar.package_name)?,
            Self::Poster(poster) => {
                non_empty("title", &poster.title)?;
                non_empty("uri", &poster.uri)?;
            }
        }

        Ok(())
    }

    /// Decode binary fields and build the payload
    pub(crate) fn into_payload<R: FieldReader>(self, reader: &mut R) -> Result<NdefPayload, R::Error> {
        let payload = match self {
            Self::Raw(raw) => {
                let tnf = match u8::try_from(raw.tnf) {
                    Ok(tnf) if i64::from(tnf) <= MAX_RAW_TNF => tnf,
                    _ => {
                        reader.invalid("tnf", "tnf", &raw.tnf.to_string())?;
                        0
                    }
                };

                RawPayload {
                    tnf,
                    type_: raw.type_,
                    id: raw.id,
                    payload: reader.base64("payload", &raw.payload)?,
                }
                .into()
            }
            Self::Url(url) => UrlPayload::new(url.url).into(),
            Self::Text(text) => TextPayload::new(text.text, text.lang).into(),
            Self::Uri(uri) => UriPayload::new(uri.uri).into(),
            Self::Vcard(card) => VcardPayload::from(card).into(),
            Self::Mime(mime) => {
                let format = if mime.format.is_empty() {
                    MimeFormat::default()
                } else {
                    reader.variant::<MimeFormat>("format", "mime format", &mime.format)?.unwrap_or_default()
                };

                match format {
                    MimeFormat::Ascii => MimePayload::ascii(mime.type_, mime.content).into(),
                    MimeFormat::Hex => {
                        MimePayload::hex(mime.type_, reader.base64("content", &mime.content)?).into()
                    }
                }
            }
            Self::Phone(phone) => PhonePayload::new(phone.phone_number).into(),
            Self::Geo(geo) => GeoPayload::new(geo.latitude, geo.longitude).into(),
            Self::Aar(aar) => AarPayload::new(aar.package_name).into(),
            Self::Poster(poster) => PosterPayload::new(poster.title, poster.uri).into(),
        };

        Ok(payload)
    }
}

impl From<VcardResource> for VcardPayload {
    fn from(card: VcardResource) -> Self {
        let VcardResource {
            address_city,
            address_country,
            address_postal_code,
            address_region,
            address_street,
            email,
            first_name,
            last_name,
            organization,
            phone_cell,
            phone_home,
            phone_work,
            title,
            site,
        } = card;

        Self {
            address_city,
            address_country,
            address_postal_code,
            address_region,
            address_street,
            email,
            first_name,
            last_name,
            organization,
            phone_cell,
            phone_home,
            phone_work,
            title,
            site,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        diagnostic::{Diagnostic, DiagnosticKind},
        fields::{Tolerant, infallible},
    };

    fn every_variant() -> Vec<NdefPayload> {
        vec![
            RawPayload { tnf: 5, type_: "t".into(), id: "i".into(), payload: vec![0xA6, 0x12] }.into(),
            RawPayload::default().into(),
            UrlPayload::new("http://url.com").into(),
            TextPayload::new("Hello\nworld", "Russian").into(),
            UriPayload::new("mailto:info@taglme.com").into(),
            VcardPayload {
                first_name: "Ivan".into(),
                last_name: "Petrov".into(),
                address_city: "Moscow".into(),
                phone_work: "+7495".into(),
                ..Default::default()
            }
            .into(),
            MimePayload::ascii("text/plain", "hello").into(),
            MimePayload::hex("application/octet-stream", vec![0x00, 0xFF]).into(),
            PhonePayload::new("88005553535").into(),
            GeoPayload::new("25.3", "35.3").into(),
            AarPayload::new("com.taglme.app").into(),
            PosterPayload::new("Taglme", "https://taglme.com").into(),
        ]
    }

    #[test]
    fn url_resource_shape() {
        let payload: NdefPayload = UrlPayload::new("http://url.com").into();
        let value = to_value(&payload);

        assert_eq!(value, json!({"type": "url", "data": {"url": "http://url.com"}}));
        assert_eq!(from_value(&value).unwrap(), payload);
    }

    #[test]
    fn every_variant_round_trips() {
        for payload in every_variant() {
            let value = to_value(&payload);
            assert_eq!(from_value(&value).unwrap(), payload, "{value}");
        }
    }

    #[test]
    fn binary_fields_are_base64() {
        let raw: NdefPayload =
            RawPayload { tnf: 1, type_: "U".into(), id: String::new(), payload: vec![0xA6, 0x12, 0x66, 0xBA] }
                .into();
        assert_eq!(to_value(&raw)["data"]["payload"], "phJmug==");

        let mime: NdefPayload = MimePayload::hex("application/x", vec![0xA6, 0x12, 0x66, 0xBA]).into();
        assert_eq!(
            to_value(&mime),
            json!({"type": "mime", "data": {"type": "application/x", "format": "hex", "content": "phJmug=="}})
        );
    }

    #[test]
    fn required_fields() {
        let cases = [
            (json!({"type": "url", "data": {"url": ""}}), "url"),
            (json!({"type": "text", "data": {"lang": "English"}}), "text"),
            (json!({"type": "uri", "data": {}}), "uri"),
            (json!({"type": "vcard", "data": {"last_name": "Doe"}}), "first_name"),
            (json!({"type": "mime", "data": {"format": "hex", "content": ""}}), "type"),
            (json!({"type": "mime", "data": {"type": "a/b", "format": "base32"}}), "format"),
            (json!({"type": "phone", "data": {}}), "phone_number"),
            (json!({"type": "geo", "data": {"latitude": "1"}}), "longitude"),
            (json!({"type": "aar", "data": {}}), "package_name"),
            (json!({"type": "poster", "data": {"uri": "https://a.b"}}), "title"),
            (json!({"type": "raw", "data": {"tnf": 7, "payload": "AA=="}}), "tnf"),
            (json!({"type": "raw", "data": {"tnf": -1}}), "tnf"),
            (json!({"type": "raw", "data": {"tnf": 1}}), "payload"),
        ];

        for (value, field) in cases {
            let error = from_value(&value).unwrap_err();
            assert!(matches!(error, DecodeError::Validation { .. }), "{value}: {error}");
            assert_eq!(error.field(), Some(field), "{value}");
        }
    }

    #[test]
    fn empty_raw_record_needs_no_payload() {
        let value = json!({"type": "raw", "data": {"tnf": 0}});
        assert_eq!(from_value(&value).unwrap(), NdefPayload::from(RawPayload::default()));
    }

    #[test]
    fn bad_base64_is_encoding_error() {
        let value = json!({"type": "raw", "data": {"tnf": 5, "payload": "not base64!"}});
        let error = from_value(&value).unwrap_err();
        assert!(matches!(error, DecodeError::Encoding { field: "payload", .. }));

        let value = json!({"type": "mime", "data": {"type": "a/b", "format": "hex", "content": "%%"}});
        let error = from_value(&value).unwrap_err();
        assert!(matches!(error, DecodeError::Encoding { field: "content", .. }));
    }

    #[test]
    fn envelope_errors() {
        let error = from_value(&json!({"type": "nfc", "data": {}})).unwrap_err();
        assert!(matches!(error, DecodeError::UnsupportedVariant { kind: "record type", .. }));

        let error = from_value(&json!({"data": {"url": "x"}})).unwrap_err();
        assert_eq!(error.field(), Some("type"));

        let error = from_value(&json!({"type": "url"})).unwrap_err();
        assert_eq!(error.field(), Some("data"));

        let error = from_value(&json!({"type": "url", "data": "x"})).unwrap_err();
        assert_eq!(error.field(), Some("data"));

        let error = from_value(&json!(["url"])).unwrap_err();
        assert!(matches!(error, DecodeError::Validation { field: "record", .. }));
    }

    #[test]
    fn ascii_mime_content_is_plain_text() {
        let value = json!({"type": "mime", "data": {"type": "text/plain", "format": "ascii", "content": "a\nb"}});
        assert_eq!(from_value(&value).unwrap(), NdefPayload::from(MimePayload::ascii("text/plain", "a\nb")));
    }

    #[test]
    fn tolerant_message_skips_unknown_records() {
        let data = json!({
            "read_only": true,
            "message": [
                {"type": "url", "data": {"url": "https://a.b"}},
                {"type": "nfc", "data": {}},
                {"type": "raw", "data": {"tnf": 9, "payload": "??"}},
            ]
        });
        let Value::Object(object) = data else { unreachable!() };

        let mut reader = Tolerant::new();
        let ndef = infallible(read_ndef(&mut reader, &object));

        assert!(ndef.read_only);
        assert_eq!(
            ndef.message,
            vec![
                NdefPayload::from(UrlPayload::new("https://a.b")),
                NdefPayload::from(RawPayload::default()),
            ]
        );

        let diagnostics = reader.into_diagnostics();
        assert!(diagnostics.contains(&Diagnostic::new(
            "message[1].type",
            DiagnosticKind::InvalidValue("nfc".into())
        )));
        assert!(diagnostics.iter().any(|d| d.path == "message[2].data.payload"));
        assert!(diagnostics.iter().any(|d| d.path == "message[2].data.tnf"));
    }

    #[test]
    fn ndef_resource_shape() {
        let ndef = Ndef { read_only: false, message: vec![PhonePayload::new("+1").into()] };
        let value = serde_json::to_value(NdefResource::from(&ndef)).unwrap();

        assert_eq!(
            value,
            json!({"read_only": false, "message": [{"type": "phone", "data": {"phone_number": "+1"}}]})
        );
    }
}
