//! Mapping between [`NdefPayload`] and raw NDEF records
//!
//! Decoding is a heuristic classification and never fails, anything it does not recognise
//! comes back as [`RawPayload`].

use tagcodec_ndef::{Tnf, WireRecord, record::rtd};
use tagcodec_util::split_once_byte;
use tracing::{debug, warn};

use super::{
    AarPayload, GeoPayload, MimeFormat, MimePayload, NdefPayload, PhonePayload, PosterPayload,
    RawPayload, TextPayload, UriPayload, UrlPayload, VcardPayload,
    lang::{code_to_lang, lang_to_code},
    vcard,
};

pub const AAR_TYPE: &str = "android.com:pkg";
const POSTER_TITLE_LANGUAGE: &str = "en";

/// Build the wire record for a payload
pub fn encode(payload: &NdefPayload) -> WireRecord {
    match payload {
        NdefPayload::Raw(raw) => WireRecord::new(
            Tnf::from_bits(raw.tnf),
            raw.type_.as_bytes(),
            raw.id.as_bytes(),
            raw.payload.as_slice(),
        ),
        NdefPayload::Url(url) => WireRecord::uri(&url.url),
        NdefPayload::Uri(uri) => WireRecord::uri(&uri.uri),
        NdefPayload::Phone(phone) => WireRecord::uri(&format!("tel:{}", phone.phone_number)),
        NdefPayload::Geo(geo) => {
            WireRecord::uri(&format!("geo:{},{}", geo.latitude, geo.longitude))
        }
        NdefPayload::Text(text) => WireRecord::text(&to_crlf(&text.text), lang_to_code(&text.lang)),
        NdefPayload::Mime(mime) => match mime.format {
            MimeFormat::Ascii => WireRecord::media(&mime.type_, to_crlf(&mime.content_ascii)),
            MimeFormat::Hex => WireRecord::media(&mime.type_, mime.content_hex.as_slice()),
        },
        NdefPayload::Vcard(card) => {
            WireRecord::media(vcard::MEDIA_TYPE, vcard::to_vcard_string(card))
        }
        NdefPayload::Aar(aar) => WireRecord::external(AAR_TYPE, aar.package_name.as_str()),
        NdefPayload::Poster(poster) => WireRecord::smart_poster(&[
            WireRecord::text(&poster.title, POSTER_TITLE_LANGUAGE),
            WireRecord::uri(&poster.uri),
        ]),
    }
}

/// Classify a wire record, total over every possible record
pub fn decode(record: &WireRecord) -> NdefPayload {
    let type_ = record.type_.as_slice();

    match record.tnf {
        Tnf::WellKnown if type_ == rtd::URI => classify_uri(record.payload_text()),
        Tnf::WellKnown if type_ == rtd::TEXT => decode_text(record),
        Tnf::WellKnown if type_ == rtd::SMART_POSTER => decode_poster(record),
        Tnf::Mime if type_.eq_ignore_ascii_case(vcard::MEDIA_TYPE.as_bytes()) => decode_vcard(record),
        Tnf::Mime => MimePayload::hex(record.record_type(), record.payload.as_slice()).into(),
        Tnf::External if type_ == AAR_TYPE.as_bytes() => {
            AarPayload::new(String::from_utf8_lossy(&record.payload)).into()
        }
        _ => decode_raw(record),
    }
}

/// Prefix order matters, `http(s)://` then `tel:` then `geo:`, everything else is a plain uri
fn classify_uri(text: String) -> NdefPayload {
    if text.starts_with("http://") || text.starts_with("https://") {
        return UrlPayload::new(text).into();
    }

    if let Some(number) = text.strip_prefix("tel:") {
        return PhonePayload::new(number).into();
    }

    if let Some(coordinates) = text.strip_prefix("geo:") {
        let (latitude, longitude) = split_once_byte(coordinates, b',');
        return GeoPayload::new(latitude, longitude.unwrap_or_default()).into();
    }

    UriPayload::new(text).into()
}

fn decode_text(record: &WireRecord) -> NdefPayload {
    let Some(text) = record.text_payload() else {
        warn!("unreadable text record payload, keeping it raw");
        return decode_raw(record);
    };

    TextPayload::new(from_crlf(&text.text), code_to_lang(&text.language)).into()
}

fn decode_poster(record: &WireRecord) -> NdefPayload {
    let nested = record.nested_message().unwrap_or_else(|error| {
        warn!("unable to parse smart poster message: {error}");
        Vec::new()
    });

    let mut poster = PosterPayload::default();
    for inner in nested.iter().filter(|inner| inner.tnf == Tnf::WellKnown) {
        if inner.type_ == rtd::URI && poster.uri.is_empty() {
            poster.uri = inner.payload_text();
        } else if inner.type_ == rtd::TEXT && poster.title.is_empty() {
            poster.title = inner.payload_text();
        }
    }

    poster.into()
}

fn decode_vcard(record: &WireRecord) -> NdefPayload {
    let text = String::from_utf8_lossy(&record.payload);
    let card = vcard::parse_vcard(&text).unwrap_or_else(|error| {
        warn!("unable to parse vcard record: {error}");
        VcardPayload::default()
    });

    card.into()
}

fn decode_raw(record: &WireRecord) -> NdefPayload {
    debug!("unrecognised record {} / {}", record.tnf, record.record_type());

    RawPayload {
        tnf: record.tnf.bits(),
        type_: record.record_type(),
        id: String::from_utf8_lossy(&record.id).into_owned(),
        payload: record.payload.clone(),
    }
    .into()
}

fn to_crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}

fn from_crlf(text: &str) -> String {
    text.replace("\r\n", "\n")
}
