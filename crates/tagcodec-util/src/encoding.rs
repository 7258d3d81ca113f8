//! Base64 helpers, always the standard alphabet with padding

use base64::{Engine as _, engine::general_purpose::STANDARD};

pub use base64::DecodeError;

pub fn base64_encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub fn base64_decode(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>, DecodeError> {
    STANDARD.decode(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_with_padding() {
        assert_eq!(base64_encode([0xA6, 0x12, 0x66, 0xBA]), "phJmug==");
        assert_eq!(base64_encode([]), "");
    }

    #[test]
    fn decodes_standard_alphabet() {
        assert_eq!(base64_decode("phJmug==").unwrap(), vec![0xA6, 0x12, 0x66, 0xBA]);
        assert_eq!(base64_decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_url_safe_alphabet() {
        assert!(base64_decode("-_8=").is_err());
        assert!(base64_decode("not base64!").is_err());
    }
}
