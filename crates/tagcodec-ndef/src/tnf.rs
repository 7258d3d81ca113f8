/// Type Name Format, the 3 low bits of a record header
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, Hash, derive_more::Display, strum::EnumIter,
)]
pub enum Tnf {
    #[default]
    #[display("Empty")]
    Empty,
    #[display("Well-Known")]
    WellKnown,
    #[display("MIME media-type")]
    Mime,
    #[display("Absolute URI")]
    AbsoluteUri,
    #[display("External")]
    External,
    #[display("Unknown")]
    Unknown,
    #[display("Unchanged")]
    Unchanged,
    #[display("Reserved")]
    Reserved,
}

impl Tnf {
    /// Only the low 3 bits are looked at
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Empty,
            1 => Self::WellKnown,
            2 => Self::Mime,
            3 => Self::AbsoluteUri,
            4 => Self::External,
            5 => Self::Unknown,
            6 => Self::Unchanged,
            _ => Self::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn bits_round_trip() {
        for tnf in Tnf::iter() {
            assert_eq!(Tnf::from_bits(tnf.bits()), tnf);
        }
    }

    #[test]
    fn names() {
        assert_eq!(Tnf::from_bits(1).to_string(), "Well-Known");
        assert_eq!(Tnf::from_bits(2).to_string(), "MIME media-type");
        assert_eq!(Tnf::from_bits(6).to_string(), "Unchanged");
        assert_eq!(Tnf::from_bits(0b1111).to_string(), "Reserved");
    }
}
