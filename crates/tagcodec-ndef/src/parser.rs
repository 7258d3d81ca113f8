pub mod stream;

use stream::Stream;
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness,
        self as binary,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    error::{ContextError, ErrMode},
    token::take,
};

use crate::{
    NdefError, Result,
    header::RecordHeader,
    payload::{TextPayload, TextPayloadFormat},
    record::WireRecord,
    tnf::Tnf,
};

/// Parse records until one carries the message end flag or the input runs out
pub fn parse_records(input: &mut Stream<'_>) -> ModalResult<Vec<WireRecord>> {
    let mut records = Vec::new();

    while stream::remaining(input) > 0 {
        let (header, record) = parse_record.parse_next(input)?;
        records.push(record);

        if header.message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_record(input: &mut Stream<'_>) -> ModalResult<(RecordHeader, WireRecord)> {
    let header = parse_header.parse_next(input)?;

    let type_ = take_vec(input, header.type_length as usize)?;
    let id = match header.id_length {
        Some(length) => take_vec(input, length as usize)?,
        None => Vec::new(),
    };
    let payload = take_vec(input, header.payload_length as usize)?;

    let record = WireRecord { tnf: header.tnf, type_, id, payload };
    Ok((header, record))
}

/// Decode the payload of a well-known `T` record
pub fn parse_text_payload(payload: &[u8]) -> Result<TextPayload> {
    let input = &mut stream::new(payload);
    text_payload.parse_next(input).map_err(NdefError::from)
}

fn text_payload(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    // bit 7 encoding, bit 6 reserved, bits 5..0 language code length
    let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
            .parse_next(input)?;

    let language_code: &[u8] = take(language_code_length as usize).parse_next(input)?;
    let remaining = stream::remaining(input);
    let text: &[u8] = take(remaining).parse_next(input)?;

    let (format, text) = if is_utf16 {
        (TextPayloadFormat::Utf16, decode_utf16(text))
    } else {
        (TextPayloadFormat::Utf8, String::from_utf8_lossy(text).into_owned())
    };

    Ok(TextPayload {
        format,
        language: String::from_utf8_lossy(language_code).into_owned(),
        text,
    })
}

// private
fn decode_utf16(bytes: &[u8]) -> String {
    let (little_endian, bytes) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = bytes
        .chunks_exact(2)
        .map(|chunk| {
            let pair = [chunk[0], chunk[1]];
            if little_endian { u16::from_le_bytes(pair) } else { u16::from_be_bytes(pair) }
        })
        .collect::<Vec<u16>>();

    String::from_utf16_lossy(&units)
}

/// MB, ME, CF, SR and IL flags followed by the 3 bit TNF
type Flags = (bool, bool, bool, bool, bool, u8);

fn parse_flags(input: &mut Stream<'_>) -> ModalResult<Flags> {
    let flags = (take_bool, take_bool, take_bool, take_bool, take_bool, take_bits(3_u8));
    bits::<_, _, ErrMode<ContextError>, _, _>(flags).parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<RecordHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, tnf_bits) =
        parse_flags(input)?;

    let type_length = binary::u8.parse_next(input)?;
    let payload_length = if short_record {
        binary::u8.map(u32::from).parse_next(input)?
    } else {
        binary::u32(Endianness::Big).parse_next(input)?
    };
    let id_length = if has_id_length { Some(binary::u8.parse_next(input)?) } else { None };

    Ok(RecordHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        tnf: Tnf::from_bits(tnf_bits),
        type_length,
        payload_length,
        id_length,
    })
}

fn take_vec(input: &mut Stream<'_>, length: usize) -> ModalResult<Vec<u8>> {
    take(length).map(<[u8]>::to_vec).parse_next(input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use winnow::error::{ErrMode, Needed};

    use super::*;

    #[test]
    fn known_header_parse() {
        let mut header_bytes = stream::new(&[0xD1, 0x01, 0x0D, 0x55, 0x02]);
        let header: RecordHeader = parse_header(&mut header_bytes).unwrap();

        assert!(header.message_begin);
        assert!(header.message_end);
        assert!(!header.chunked);
        assert!(header.short_record);
        assert!(!header.has_id_length);
        assert_eq!(header.tnf, Tnf::WellKnown);
        assert_eq!(header.type_length, 1);
        assert_eq!(header.payload_length, 13);
        assert_eq!(stream::remaining(&header_bytes), 2);
    }

    #[test]
    fn parse_uri_record() {
        let mut bytes = vec![0xD1, 0x01, 0x0C, b'U', 0x04];
        bytes.extend_from_slice(b"example.com");

        let (header, record) = parse_record(&mut stream::new(&bytes)).unwrap();
        assert!(header.message_end);
        assert_eq!(record.record_type(), "U");
        assert_eq!(record.id, Vec::<u8>::new());
        assert_eq!(record.payload_text(), "https://example.com");
    }

    #[test]
    fn parse_record_with_id() {
        let bytes = [0xDA, 0x03, 0x02, 0x01, b'a', b'/', b'b', b'7', 0xAB, 0xCD];

        let (header, record) = parse_record(&mut stream::new(&bytes)).unwrap();
        assert!(header.has_id_length);
        assert_eq!(header.tnf, Tnf::Mime);
        assert_eq!(record.record_type(), "a/b");
        assert_eq!(record.id, b"7");
        assert_eq!(record.payload, vec![0xAB, 0xCD]);
    }

    #[test]
    fn parse_long_record() {
        let mut bytes = vec![0xC2, 0x01, 0x00, 0x00, 0x01, 0x00, b'x'];
        bytes.extend(std::iter::repeat_n(0x11, 256));

        let (header, record) = parse_record(&mut stream::new(&bytes)).unwrap();
        assert!(!header.short_record);
        assert_eq!(header.payload_length, 256);
        assert_eq!(record.payload.len(), 256);
    }

    #[test]
    fn incomplete_payload_needs_more_data() {
        let bytes = [0xD1, 0x01, 0x0D, 0x55, 0x02];
        let result = parse_record(&mut stream::new(&bytes));

        assert!(matches!(result, Err(ErrMode::Incomplete(Needed::Size(_)))));
    }

    #[test]
    fn stops_at_message_end() {
        let mut bytes = crate::encode_message(&[WireRecord::uri("tel:+100")]);
        bytes.extend_from_slice(&[0xFE, 0xFE]);

        let records = parse_records(&mut stream::new(&bytes)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].payload_text(), "tel:+100");
    }

    #[test]
    fn text_payload_utf8() {
        let text = parse_text_payload(b"\x02enHello").unwrap();
        assert_eq!(text.format, TextPayloadFormat::Utf8);
        assert_eq!(text.language, "en");
        assert_eq!(text.text, "Hello");
    }

    #[test]
    fn text_payload_utf16() {
        let text = parse_text_payload(&[0x82, b'e', b'n', 0x00, b'H', 0x00, b'i']).unwrap();
        assert_eq!(text.format, TextPayloadFormat::Utf16);
        assert_eq!(text.language, "en");
        assert_eq!(text.text, "Hi");

        let text = parse_text_payload(&[0x82, b'e', b'n', 0xFF, 0xFE, b'H', 0x00]).unwrap();
        assert_eq!(text.text, "H");
    }

    #[test]
    fn text_payload_too_short() {
        assert!(matches!(parse_text_payload(b"\x05en"), Err(NdefError::NotEnoughData)));
        assert!(matches!(parse_text_payload(b""), Err(NdefError::NotEnoughData)));
    }

    #[test]
    fn text_record_from_message() {
        let bytes = [0xD1, 0x01, 0x08, b'T', 0x02, b'r', b'u', b'P', b'r', b'i', b'v', b'!'];

        let records = crate::parse_message(&bytes).unwrap();
        let text = parse_text_payload(&records[0].payload).unwrap();
        assert_eq!(text.language, "ru");
        assert_eq!(text.text, "Priv!");
    }
}
