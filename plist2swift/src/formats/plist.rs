//! Support for XML property lists (`.plist`).
//!
//! Supports `dict`, `array`, `string`, `integer`, `true` and `false`. The scalar kinds
//! `real`, `date` and `data` are kept as [`Value::Unsupported`] with their raw text.
//! Binary property lists are rejected.

use std::{
    fmt::Display,
    io::{BufRead, Write},
    path::Path,
};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    traits::{Parser, RecordDocument, decode_text},
    types::{Record, Value},
};

const BINARY_MAGIC: &[u8] = b"bplist";
const DOCTYPE: &str = r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// An XML property list whose root value is a dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    pub record: Record,
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        if reader.fill_buf()?.starts_with(BINARY_MAGIC) {
            return Err(binary_plist_error());
        }

        let mut events = Events::new(reader);
        match events.read_document()? {
            Value::Record(record) => Ok(Format { record }),
            other => Err(Error::InvalidDocument(format!(
                "top-level value is a {}, expected a dictionary",
                other.kind_name()
            ))),
        }
    }

    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        if bytes.starts_with(BINARY_MAGIC) {
            return Err(binary_plist_error());
        }
        Self::from_str(&decode_text(bytes.as_slice())?)
    }

    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(writer, b'\t', 1);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml_writer.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;

        let mut plist = BytesStart::new("plist");
        plist.push_attribute(("version", "1.0"));
        xml_writer.write_event(Event::Start(plist))?;
        write_record(&mut xml_writer, &self.record)?;
        xml_writer.write_event(Event::End(BytesEnd::new("plist")))?;
        xml_writer.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

impl RecordDocument for Format {
    fn from_record(record: Record) -> Self {
        Format { record }
    }

    fn into_record(self) -> Record {
        self.record
    }
}

fn binary_plist_error() -> Error {
    Error::UnsupportedFormat(
        "binary property lists are not supported, convert with `plutil -convert xml1`".to_string(),
    )
}

/// The parts of the XML event stream the plist grammar cares about.
#[derive(Debug)]
enum Token {
    Start(String),
    Empty(String),
    End(String),
    Text(String),
    Eof,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Start(name) => write!(f, "<{}>", name),
            Token::Empty(name) => write!(f, "<{}/>", name),
            Token::End(name) => write!(f, "</{}>", name),
            Token::Text(text) => write!(f, "text `{}`", text.trim()),
            Token::Eof => write!(f, "end of document"),
        }
    }
}

struct Events<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> Events<R> {
    fn new(reader: R) -> Self {
        Events {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Result<Token, Error> {
        loop {
            self.buf.clear();
            let token = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(e) => Token::Start(element_name(e.name().as_ref())),
                Event::Empty(e) => Token::Empty(element_name(e.name().as_ref())),
                Event::End(e) => Token::End(element_name(e.name().as_ref())),
                Event::Text(e) => Token::Text(e.unescape()?.into_owned()),
                Event::CData(e) => Token::Text(String::from_utf8_lossy(&e.into_inner()).into_owned()),
                Event::Eof => Token::Eof,
                // Declarations, doctype, comments and processing instructions.
                _ => continue,
            };
            return Ok(token);
        }
    }

    /// Like [`Self::next_token`], but skips the whitespace between elements.
    fn next_significant(&mut self) -> Result<Token, Error> {
        loop {
            match self.next_token()? {
                Token::Text(text) if text.trim().is_empty() => continue,
                token => return Ok(token),
            }
        }
    }

    fn read_document(&mut self) -> Result<Value, Error> {
        match self.next_significant()? {
            Token::Start(name) if name == "plist" => {
                let token = self.next_significant()?;
                let value = self.read_value(token)?;
                match self.next_significant()? {
                    Token::End(name) if name == "plist" => Ok(value),
                    other => Err(Error::InvalidDocument(format!(
                        "expected </plist>, found {}",
                        other
                    ))),
                }
            }
            Token::Eof => Err(Error::InvalidDocument("document is empty".to_string())),
            token => self.read_value(token),
        }
    }

    fn read_value(&mut self, token: Token) -> Result<Value, Error> {
        match token {
            Token::Empty(name) => empty_value(name),
            Token::Start(name) => match name.as_str() {
                "dict" => self.read_dict().map(Value::Record),
                "array" => self.read_array().map(Value::List),
                "string" => self.read_text("string").map(Value::Text),
                "integer" => parse_integer(&self.read_text("integer")?).map(Value::Integer),
                "true" | "false" => {
                    self.read_text(&name)?;
                    Ok(Value::Bool(name == "true"))
                }
                "real" | "date" | "data" => {
                    let text = self.read_text(&name)?;
                    Ok(Value::Unsupported {
                        kind: name,
                        text: text.trim().to_string(),
                    })
                }
                other => Err(Error::InvalidDocument(format!(
                    "unsupported element <{}>",
                    other
                ))),
            },
            other => Err(Error::InvalidDocument(format!(
                "expected a value, found {}",
                other
            ))),
        }
    }

    fn read_dict(&mut self) -> Result<Record, Error> {
        let mut record = Record::new();
        loop {
            let key = match self.next_significant()? {
                Token::End(name) if name == "dict" => return Ok(record),
                Token::Start(name) if name == "key" => self.read_text("key")?,
                Token::Empty(name) if name == "key" => String::new(),
                other => {
                    return Err(Error::InvalidDocument(format!(
                        "expected <key> inside <dict>, found {}",
                        other
                    )));
                }
            };

            if record.contains_key(&key) {
                return Err(Error::InvalidDocument(format!("duplicate key `{}`", key)));
            }

            let token = self.next_significant()?;
            let value = self.read_value(token).map_err(|e| match e {
                Error::InvalidDocument(message) => {
                    Error::InvalidDocument(format!("value of key `{}`: {}", key, message))
                }
                e => e,
            })?;
            record.insert(key, value);
        }
    }

    fn read_array(&mut self) -> Result<Vec<Value>, Error> {
        let mut values = Vec::new();
        loop {
            match self.next_significant()? {
                Token::End(name) if name == "array" => return Ok(values),
                token => values.push(self.read_value(token)?),
            }
        }
    }

    /// Collects the text up to the closing tag of `element`.
    fn read_text(&mut self, element: &str) -> Result<String, Error> {
        let mut text = String::new();
        loop {
            match self.next_token()? {
                Token::Text(chunk) => text.push_str(&chunk),
                Token::End(name) if name == element => return Ok(text),
                other => {
                    return Err(Error::InvalidDocument(format!(
                        "unexpected {} inside <{}>",
                        other, element
                    )));
                }
            }
        }
    }
}

fn element_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

fn empty_value(name: String) -> Result<Value, Error> {
    match name.as_str() {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "string" => Ok(Value::Text(String::new())),
        "dict" => Ok(Value::Record(Record::new())),
        "array" => Ok(Value::List(Vec::new())),
        "real" | "date" | "data" => Ok(Value::Unsupported {
            kind: name,
            text: String::new(),
        }),
        "integer" => Err(Error::DataMismatch("empty <integer/> element".to_string())),
        other => Err(Error::InvalidDocument(format!(
            "unsupported element <{}/>",
            other
        ))),
    }
}

fn parse_integer(text: &str) -> Result<i64, Error> {
    let trimmed = text.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => trimmed.parse::<i64>(),
    };
    parsed.map_err(|_| Error::DataMismatch(format!("`{}` is not a valid integer", trimmed)))
}

fn write_record<W: Write>(writer: &mut Writer<W>, record: &Record) -> Result<(), Error> {
    if record.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("dict")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("dict")))?;
    for (key, value) in record {
        write_scalar(writer, "key", key)?;
        write_value(writer, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new("dict")))?;
    Ok(())
}

fn write_value<W: Write>(writer: &mut Writer<W>, value: &Value) -> Result<(), Error> {
    match value {
        Value::Text(text) => write_scalar(writer, "string", text)?,
        Value::Bool(flag) => {
            let name = if *flag { "true" } else { "false" };
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Value::Integer(number) => write_scalar(writer, "integer", &number.to_string())?,
        Value::List(values) if values.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new("array")))?;
        }
        Value::List(values) => {
            writer.write_event(Event::Start(BytesStart::new("array")))?;
            for value in values {
                write_value(writer, value)?;
            }
            writer.write_event(Event::End(BytesEnd::new("array")))?;
        }
        Value::Record(record) => write_record(writer, record)?,
        Value::Unsupported { kind, text } => write_scalar(writer, kind, text)?,
    }
    Ok(())
}

fn write_scalar<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    // Empty elements are written self-closed: the indenting writer would otherwise
    // put a line break between the tags, which reads back as content.
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const PRODUCTION: &str = indoc! {r#"
        <?xml version="1.0" encoding="UTF-8"?>
        <!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
        <plist version="1.0">
        <dict>
            <key>configurationName</key>
            <string>Production</string>
            <key>host</key>
            <string>api.example.com</string>
            <key>port</key>
            <integer>443</integer>
            <key>loggingEnabled</key>
            <false/>
            <key>regions</key>
            <array>
                <string>eu</string>
                <string>us</string>
            </array>
            <key>analytics</key>
            <dict>
                <key>enabled</key>
                <true/>
            </dict>
        </dict>
        </plist>
    "#};

    #[test]
    fn test_parse_basic_plist() {
        let format = Format::from_str(PRODUCTION).unwrap();
        let record = &format.record;

        assert_eq!(record.len(), 6);
        assert_eq!(record.get("configurationName"), Some(&Value::from("Production")));
        assert_eq!(record.get("port"), Some(&Value::Integer(443)));
        assert_eq!(record.get("loggingEnabled"), Some(&Value::Bool(false)));
        assert_eq!(record.get("regions"), Some(&Value::from(vec!["eu", "us"])));

        let analytics = record.get("analytics").and_then(Value::as_record).unwrap();
        assert_eq!(analytics.get("enabled"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_unsupported_scalars_keep_their_text() {
        let xml = indoc! {r#"
            <plist version="1.0">
            <dict>
                <key>released</key>
                <date>2018-09-12T10:00:00Z</date>
                <key>ratio</key>
                <real>1.5</real>
            </dict>
            </plist>
        "#};
        let format = Format::from_str(xml).unwrap();
        assert_eq!(
            format.record.get("released"),
            Some(&Value::Unsupported {
                kind: "date".to_string(),
                text: "2018-09-12T10:00:00Z".to_string()
            })
        );
        assert_eq!(format.record.get("ratio").unwrap().kind_name(), "real");
    }

    #[test]
    fn test_string_whitespace_and_entities_preserved() {
        let xml = r#"<plist><dict><key>greeting</key><string>  Tom &amp; Jerry  </string><key>empty</key><string/></dict></plist>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.record.get("greeting"), Some(&Value::from("  Tom & Jerry  ")));
        assert_eq!(format.record.get("empty"), Some(&Value::from("")));
    }

    #[test]
    fn test_hex_integer() {
        let xml = r#"<plist><dict><key>mask</key><integer>0xFF</integer></dict></plist>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.record.get("mask"), Some(&Value::Integer(255)));
    }

    #[test]
    fn test_invalid_integer() {
        let xml = r#"<plist><dict><key>port</key><integer>eighty</integer></dict></plist>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("`eighty` is not a valid integer"));
    }

    #[test]
    fn test_top_level_must_be_dict() {
        let xml = r#"<plist><array><string>a</string></array></plist>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("expected a dictionary"));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let xml = r#"<plist><dict><key>a</key><true/><key>a</key><false/></dict></plist>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("duplicate key `a`"));
    }

    #[test]
    fn test_key_without_value() {
        let xml = r#"<plist><dict><key>a</key></dict></plist>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(err.to_string().contains("value of key `a`"));
    }

    #[test]
    fn test_empty_document() {
        let err = Format::from_str("").unwrap_err();
        assert!(err.to_string().contains("document is empty"));
    }

    #[test]
    fn test_binary_plist_rejected() {
        let err = Format::from_bytes(b"bplist00\xd1\x01\x02").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_write_then_read_back() {
        let record = Record::new()
            .with("configurationName", "Staging")
            .with("note", "")
            .with("retries", 3)
            .with("tags", Vec::<Value>::new())
            .with("nested", Record::new().with("flag", true).with("names", vec!["a <b>"]));
        let format = Format::from_record(record.clone());

        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let written = String::from_utf8(out).unwrap();
        assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(written.contains("<!DOCTYPE plist PUBLIC"));
        assert!(written.contains("a &lt;b&gt;"));

        let reparsed = Format::from_str(&written).unwrap();
        assert_eq!(reparsed.into_record(), record);
    }
}
