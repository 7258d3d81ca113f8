use crate::tnf::Tnf;

const MESSAGE_BEGIN: u8 = 0b1000_0000;
const MESSAGE_END: u8 = 0b0100_0000;
const CHUNKED: u8 = 0b0010_0000;
const SHORT_RECORD: u8 = 0b0001_0000;
const HAS_ID_LENGTH: u8 = 0b0000_1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub message_begin: bool,
    pub message_end: bool,
    pub chunked: bool,
    pub short_record: bool,
    pub has_id_length: bool,
    pub tnf: Tnf,
    pub type_length: u8,
    pub payload_length: u32,
    pub id_length: Option<u8>,
}

impl RecordHeader {
    /// The flags and TNF packed into the first header byte
    pub fn flags_byte(&self) -> u8 {
        let mut byte = self.tnf.bits();

        if self.message_begin {
            byte |= MESSAGE_BEGIN;
        }
        if self.message_end {
            byte |= MESSAGE_END;
        }
        if self.chunked {
            byte |= CHUNKED;
        }
        if self.short_record {
            byte |= SHORT_RECORD;
        }
        if self.has_id_length {
            byte |= HAS_ID_LENGTH;
        }

        byte
    }

    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.flags_byte());
        out.push(self.type_length);

        if self.short_record {
            out.push(self.payload_length as u8);
        } else {
            out.extend_from_slice(&self.payload_length.to_be_bytes());
        }

        if let Some(id_length) = self.id_length {
            out.push(id_length);
        }
    }
}
