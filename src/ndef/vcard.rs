//! vCard 3.0 text for contact records
//!
//! Generation only emits the properties a [`VcardPayload`] can carry. Parsing accepts any
//! vCard 2.1 to 4.0 text, unfolds continuation lines and ignores unknown properties.

use tagcodec_util::strip_prefix_ignore_case;
use winnow::{
    ModalResult, Parser,
    combinator::{preceded, repeat},
    token::{rest, take_till},
};

use super::VcardPayload;

pub const MEDIA_TYPE: &str = "text/vcard";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VcardError {
    #[error("missing BEGIN:VCARD")]
    MissingBegin,

    #[error("missing END:VCARD")]
    MissingEnd,

    #[error("malformed content line: {0}")]
    MalformedLine(String),
}

type Result<T, E = VcardError> = std::result::Result<T, E>;

// MARK: generate

pub fn to_vcard_string(vcard: &VcardPayload) -> String {
    let mut lines = vec!["BEGIN:VCARD".to_string(), "VERSION:3.0".to_string()];

    let first = escape(&vcard.first_name);
    let last = escape(&vcard.last_name);
    match (first.is_empty(), last.is_empty()) {
        (false, false) => {
            lines.push(format!("N:{last};{first}"));
            lines.push(format!("FN:{first} {last}"));
        }
        (false, true) => {
            lines.push(format!("N:;{first}"));
            lines.push(format!("FN:{first}"));
        }
        (true, false) => {
            lines.push(format!("N:{last}"));
            lines.push(format!("FN:{last}"));
        }
        (true, true) => {}
    }

    push_property(&mut lines, "TITLE", &vcard.title);
    push_property(&mut lines, "ORG", &vcard.organization);

    let address = [
        &vcard.address_street,
        &vcard.address_city,
        &vcard.address_region,
        &vcard.address_postal_code,
        &vcard.address_country,
    ];

    if address.iter().any(|part| !part.is_empty()) {
        let parts = address.iter().map(|part| escape(part)).collect::<Vec<_>>();
        lines.push(format!("ADR:;;{}", parts.join(";")));
    }

    push_property(&mut lines, "TEL;TYPE=HOME,VOICE", &vcard.phone_home);
    push_property(&mut lines, "TEL;TYPE=WORK,VOICE", &vcard.phone_work);
    push_property(&mut lines, "TEL;TYPE=CELL", &vcard.phone_cell);
    push_property(&mut lines, "EMAIL", &vcard.email);
    push_property(&mut lines, "URL", &vcard.site);

    lines.push("END:VCARD".to_string());
    lines.join("\n")
}

fn push_property(lines: &mut Vec<String>, name: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{name}:{}", escape(value)));
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for char in value.chars() {
        match char {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            other => out.push(other),
        }
    }

    out
}

// MARK: parse

#[derive(Debug, Clone, PartialEq, Eq)]
struct ContentLine<'a> {
    name: &'a str,
    params: Vec<&'a str>,
    value: &'a str,
}

impl ContentLine<'_> {
    /// Lowercased `TYPE` values, bare 2.1 style parameters count as types too
    fn types(&self) -> Vec<String> {
        let mut types = Vec::new();
        for param in &self.params {
            match param.split_once('=') {
                Some((key, values)) if key.eq_ignore_ascii_case("type") => {
                    let values = values.split(',').map(|value| value.trim_matches('"').to_ascii_lowercase());
                    types.extend(values);
                }
                Some(_) => {}
                None => types.push(param.to_ascii_lowercase()),
            }
        }

        types
    }

    fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

fn content_line<'a>(input: &mut &'a str) -> ModalResult<ContentLine<'a>> {
    let name: &str = take_till(1.., (';', ':')).parse_next(input)?;
    let params: Vec<&str> =
        repeat(0.., preceded(';', take_till(0.., (';', ':')))).parse_next(input)?;
    ':'.parse_next(input)?;
    let value: &str = rest.parse_next(input)?;

    // drop the group prefix, `item1.TEL`
    let name = name.rsplit_once('.').map_or(name, |(_, name)| name);

    Ok(ContentLine { name: name.trim(), params, value })
}

/// Join folded lines back together, a line starting with a space or tab continues the previous one
fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let (Some(continuation), Some(previous)) =
            (line.strip_prefix([' ', '\t']), lines.last_mut())
        {
            previous.push_str(continuation);
            continue;
        }

        if !line.trim().is_empty() {
            lines.push(line.to_string());
        }
    }

    lines
}

pub fn parse_vcard(text: &str) -> Result<VcardPayload> {
    let lines = unfold(text);
    let mut lines = lines.iter().map(String::as_str);

    let begin = lines.next().ok_or(VcardError::MissingBegin)?;
    let kind = strip_prefix_ignore_case(begin.trim(), "BEGIN:");
    if kind.is_none_or(|kind| !kind.eq_ignore_ascii_case("VCARD")) {
        return Err(VcardError::MissingBegin);
    }

    let mut vcard = VcardPayload::default();
    let mut formatted_name = None;
    let mut has_name = false;
    let mut has_address = false;
    let mut ended = false;

    for line in lines {
        let property = content_line
            .parse(line)
            .map_err(|_| VcardError::MalformedLine(line.to_string()))?;

        if property.is("END") {
            ended = true;
            break;
        }

        let value = property.value;
        match property.name.to_ascii_uppercase().as_str() {
            "N" if !has_name => {
                let parts = split_structured(value);
                vcard.last_name = parts.first().cloned().unwrap_or_default();
                vcard.first_name = parts.get(1).cloned().unwrap_or_default();
                has_name = true;
            }
            "FN" => formatted_name = Some(unescape(value)),
            "TITLE" => vcard.title = unescape(value),
            "ORG" => vcard.organization = split_structured(value).join(" "),
            "EMAIL" if vcard.email.is_empty() => vcard.email = unescape(value),
            "URL" if vcard.site.is_empty() => vcard.site = unescape(value),
            "ADR" if !has_address => {
                let mut parts = split_structured(value).into_iter().skip(2);
                vcard.address_street = parts.next().unwrap_or_default();
                vcard.address_city = parts.next().unwrap_or_default();
                vcard.address_region = parts.next().unwrap_or_default();
                vcard.address_postal_code = parts.next().unwrap_or_default();
                vcard.address_country = parts.next().unwrap_or_default();
                has_address = true;
            }
            "TEL" => {
                let types = property.types();
                let has = |kind: &str| types.iter().any(|t| t == kind);
                let number = unescape(strip_prefix_ignore_case(value, "tel:").unwrap_or(value));

                let slot = if has("cell") {
                    &mut vcard.phone_cell
                } else if has("home") && has("voice") {
                    &mut vcard.phone_home
                } else if has("work") && has("voice") {
                    &mut vcard.phone_work
                } else {
                    continue;
                };

                if slot.is_empty() {
                    *slot = number;
                }
            }
            _ => {}
        }
    }

    if !ended {
        return Err(VcardError::MissingEnd);
    }

    // fall back to the formatted name when there is no structured one
    if let (false, Some(formatted_name)) = (has_name, formatted_name) {
        let (first, last) = formatted_name.split_once(' ').unwrap_or((&formatted_name, ""));
        vcard.first_name = first.trim().to_string();
        vcard.last_name = last.trim().to_string();
    }

    Ok(vcard)
}

/// Split on unescaped `;` and unescape each component
fn split_structured(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(char) = chars.next() {
        match char {
            '\\' => {
                current.push('\\');
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => parts.push(unescape(&std::mem::take(&mut current))),
            other => current.push(other),
        }
    }

    parts.push(unescape(&current));
    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(char) = chars.next() {
        if char != '\\' {
            out.push(char);
            continue;
        }

        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn full() -> VcardPayload {
        VcardPayload {
            address_city: "Moscow".into(),
            address_country: "Russia".into(),
            address_postal_code: "101000".into(),
            address_region: "Moscow Oblast".into(),
            address_street: "Tverskaya 1".into(),
            email: "john@example.com".into(),
            first_name: "John".into(),
            last_name: "Doe".into(),
            organization: "Taglme".into(),
            phone_cell: "+79001112233".into(),
            phone_home: "+74950001122".into(),
            phone_work: "+74951112233".into(),
            title: "Engineer".into(),
            site: "https://example.com".into(),
        }
    }

    #[test]
    fn generates_all_lines_in_order() {
        let expected = "BEGIN:VCARD\n\
            VERSION:3.0\n\
            N:Doe;John\n\
            FN:John Doe\n\
            TITLE:Engineer\n\
            ORG:Taglme\n\
            ADR:;;Tverskaya 1;Moscow;Moscow Oblast;101000;Russia\n\
            TEL;TYPE=HOME,VOICE:+74950001122\n\
            TEL;TYPE=WORK,VOICE:+74951112233\n\
            TEL;TYPE=CELL:+79001112233\n\
            EMAIL:john@example.com\n\
            URL:https://example.com\n\
            END:VCARD";

        assert_eq!(to_vcard_string(&full()), expected);
    }

    #[test]
    fn omits_empty_fields() {
        let vcard = VcardPayload { first_name: "John".into(), ..Default::default() };
        assert_eq!(to_vcard_string(&vcard), "BEGIN:VCARD\nVERSION:3.0\nN:;John\nFN:John\nEND:VCARD");

        let vcard = VcardPayload {
            last_name: "Doe".into(),
            address_city: "Moscow".into(),
            ..Default::default()
        };
        assert_eq!(
            to_vcard_string(&vcard),
            "BEGIN:VCARD\nVERSION:3.0\nN:Doe\nFN:Doe\nADR:;;;Moscow;;;\nEND:VCARD"
        );
    }

    #[test]
    fn generated_text_parses_back() {
        let vcard = full();
        assert_eq!(parse_vcard(&to_vcard_string(&vcard)).unwrap(), vcard);

        let vcard = VcardPayload {
            first_name: "Jean; Luc".into(),
            organization: "A, B".into(),
            address_postal_code: "75001".into(),
            ..Default::default()
        };
        assert_eq!(parse_vcard(&to_vcard_string(&vcard)).unwrap(), vcard);
    }

    #[test]
    fn parses_foreign_vcard() {
        let text = "begin:vcard\r\n\
            VERSION:2.1\r\n\
            item1.TEL;CELL:+100\r\n\
            TEL;TYPE=work;TYPE=voice:+200\r\n\
            TEL;TYPE=fax:+300\r\n\
            FN:Ada Lovelace\r\n\
            NOTE:first line\r\n  continued\r\n\
            EMAIL;TYPE=INTERNET:ada@example.com\r\n\
            END:VCARD\r\n";

        let vcard = parse_vcard(text).unwrap();
        assert_eq!(vcard.first_name, "Ada");
        assert_eq!(vcard.last_name, "Lovelace");
        assert_eq!(vcard.phone_cell, "+100");
        assert_eq!(vcard.phone_work, "+200");
        assert_eq!(vcard.phone_home, "");
        assert_eq!(vcard.email, "ada@example.com");
    }

    #[test]
    fn rejects_broken_text() {
        assert_eq!(parse_vcard("").unwrap_err(), VcardError::MissingBegin);
        assert_eq!(parse_vcard("hello").unwrap_err(), VcardError::MissingBegin);
        assert_eq!(parse_vcard("BEGIN:VCARD\nFN:A").unwrap_err(), VcardError::MissingEnd);
        assert!(matches!(
            parse_vcard("BEGIN:VCARD\nno colon here\nEND:VCARD"),
            Err(VcardError::MalformedLine(_))
        ));
    }

    #[test]
    fn content_line_parts() {
        let line = content_line.parse("TEL;TYPE=HOME,VOICE:+1 555").unwrap();
        assert_eq!(line.name, "TEL");
        assert_eq!(line.params, vec!["TYPE=HOME,VOICE"]);
        assert_eq!(line.value, "+1 555");
        assert_eq!(line.types(), vec!["home", "voice"]);

        let line = content_line.parse("URL:https://example.com").unwrap();
        assert_eq!(line.value, "https://example.com");
    }
}
