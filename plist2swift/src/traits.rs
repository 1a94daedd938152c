//! Traits shared by every structured document format.

use std::{
    fs::File,
    io::{BufRead, Cursor, Read, Write},
    path::Path,
};

use crate::{error::Error, types::Record};

/// Parsing and writing of one document from/to one file.
///
/// # Example
///
/// ```rust,no_run
/// use plist2swift::traits::Parser;
/// let format = plist2swift::formats::plist::Format::read_from("Production.plist")?;
/// let mut copy = Vec::new();
/// format.to_writer(&mut copy)?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser: Sized {
    /// Parse from any reader holding UTF-8 text.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>;

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Parse from file path.
    ///
    /// The file is decoded BOM-aware first, so UTF-16 documents saved by Xcode
    /// read the same as UTF-8 ones.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::Io)?;
        Self::from_str(&decode_text(file)?)
    }

    fn from_str(s: &str) -> Result<Self, Error> {
        Self::from_reader(Cursor::new(s))
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// A document format whose top level is a single key-value [`Record`].
pub trait RecordDocument: Parser {
    fn from_record(record: Record) -> Self;

    fn into_record(self) -> Record;
}

/// Reads `source` to the end, honouring a UTF-8/UTF-16 byte order mark when present.
pub(crate) fn decode_text<R: Read>(source: R) -> Result<String, Error> {
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(source);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(decoded)
}
