/// Lowercase hex with a single space between bytes, `a6 12 66 ba`
pub fn spaced_hex(bytes: impl AsRef<[u8]>) -> String {
    let bytes = bytes.as_ref();
    if bytes.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(bytes.len() * 3 - 1);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 {
            out.push(' ');
        }

        out.push_str(&hex::encode([*byte]));
    }

    out
}
