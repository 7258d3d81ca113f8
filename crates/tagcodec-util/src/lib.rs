pub mod encoding;
pub mod format;
pub mod result_ext;

/// Split `input` at the first occurrence of `separator`
///
/// Returns the part before the separator and, if the separator was found, the part after it
pub fn split_once_byte(input: &str, separator: u8) -> (&str, Option<&str>) {
    debug_assert!(separator.is_ascii(), "separator must be a single byte character");

    let index = match memchr::memchr(separator, input.as_bytes()) {
        Some(index) => index,
        None => return (input, None),
    };

    (&input[..index], Some(&input[index + 1..]))
}

/// Case-insensitive ASCII prefix check, returns the remainder after the prefix
pub fn strip_prefix_ignore_case<'a>(input: &'a str, prefix: &str) -> Option<&'a str> {
    let head = input.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &input[prefix.len()..])
}
