use std::{
    fs::File,
    io::{Read, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;

use crate::{
    config::CsvConfig, decoder, download::CsvDownload, encoder, error::CsvError, record::Record,
};

/// Something a converter can load: an in-memory record sequence, or the
/// path of a CSV file to decode.
pub enum Source {
    Records(Vec<Record>),
    Path(PathBuf),
}

impl From<Vec<Record>> for Source {
    fn from(records: Vec<Record>) -> Source {
        Source::Records(records)
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Source {
        Source::Path(path)
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Source {
        Source::Path(path.to_path_buf())
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Source {
        Source::Path(PathBuf::from(path))
    }
}

/// Converts between record sequences and CSV text, in both directions.
///
/// One converter holds one working set at a time: every load operation
/// fully replaces the records, the captured header and the ignored rows of
/// the previous load. Configuration lives for the converter's lifetime and
/// can be changed between operations.
///
/// # Examples
///
/// Encoding nested records into dotted columns:
///
/// ```
/// # use std::error::Error;
/// use record_csv::CsvConverter;
/// use serde_json::json;
///
/// # fn main() { example().unwrap(); }
/// fn example() -> Result<(), Box<dyn Error>> {
///     let mut csv = CsvConverter::new();
///     csv.from_value(json!([
///         {"name": "Alice", "address": {"city": "Boston", "zip": "02118"}},
///         {"name": "Bob", "address": {"city": "Concord", "zip": "03301"}},
///     ]))?;
///
///     assert_eq!(
///         csv.to_csv_string()?,
///         "\
/// name,address.city,address.zip
/// Alice,Boston,02118
/// Bob,Concord,03301
/// "
///     );
///     Ok(())
/// }
/// ```
///
/// Decoding is best-effort: rows whose field count does not match the
/// header are diverted, not fatal:
///
/// ```
/// # use std::error::Error;
/// use record_csv::CsvConverter;
///
/// # fn main() { example().unwrap(); }
/// fn example() -> Result<(), Box<dyn Error>> {
///     let mut csv = CsvConverter::new();
///     csv.from_reader("name,age\nAlice,30\nBob".as_bytes())?;
///
///     assert_eq!(csv.to_records().len(), 1);
///     assert_eq!(csv.ignored_rows(), [vec!["Bob".to_string()]]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct CsvConverter {
    config: CsvConfig,
    source: Vec<Record>,
    header: Option<Vec<String>>,
    ignored: Vec<Vec<String>>,
}

impl CsvConverter {
    /// Creates a converter with the default [`CsvConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a converter with a prepared configuration.
    pub fn with_config(config: CsvConfig) -> Self {
        CsvConverter {
            config,
            ..Self::default()
        }
    }

    /// Sets the field delimiter for subsequent operations.
    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.config = self.config.delimiter(delimiter);
        self
    }

    /// Sets the enclosure byte for subsequent operations.
    pub fn set_enclosure(&mut self, enclosure: u8) -> &mut Self {
        self.config = self.config.enclosure(enclosure);
        self
    }

    /// Sets whether a header row is expected on decode and emitted on
    /// encode.
    pub fn set_header_row_exists(&mut self, yes: bool) -> &mut Self {
        self.config = self.config.header_row_exists(yes);
        self
    }

    /// Requests the `sep=<delimiter>` declaration line on downloads.
    pub fn set_declare_separator(&mut self) -> &mut Self {
        self.config = self.config.declare_separator();
        self
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Loads the working set from records or from a CSV file path.
    pub fn load(&mut self, source: impl Into<Source>) -> Result<&mut Self, CsvError> {
        match source.into() {
            Source::Records(records) => Ok(self.from_records(records)),
            Source::Path(path) => self.from_path(path),
        }
    }

    /// Replaces the working set with an in-memory record sequence. No
    /// decoding happens; the records are stored verbatim.
    pub fn from_records(&mut self, records: Vec<Record>) -> &mut Self {
        self.reset();
        self.source = records;
        self
    }

    /// Loads the working set from a JSON value, which must be an array of
    /// objects or arrays. Anything else leaves the converter untouched and
    /// returns [`CsvError::InvalidSource`].
    pub fn from_value(&mut self, value: Value) -> Result<&mut Self, CsvError> {
        let Value::Array(items) = value else {
            return Err(CsvError::InvalidSource(
                "expected an array of records".to_string(),
            ));
        };
        let records = items
            .into_iter()
            .map(Record::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.from_records(records))
    }

    /// Loads the working set from any serializable slice, going through the
    /// same validation as [`from_value`](Self::from_value).
    pub fn from_serializable<T: Serialize>(&mut self, items: &[T]) -> Result<&mut Self, CsvError> {
        let value = serde_json::to_value(items)
            .map_err(|error| CsvError::InvalidSource(error.to_string()))?;
        self.from_value(value)
    }

    /// Opens and decodes a CSV file. The file handle is closed before this
    /// returns, on success and on failure.
    pub fn from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Self, CsvError> {
        self.reset();
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|error| CsvError::Stream(format!("{}: {error}", path.display())))?;
        self.from_reader(file)
    }

    /// Decodes CSV rows from any byte stream until it is exhausted.
    pub fn from_reader<R: Read>(&mut self, source: R) -> Result<&mut Self, CsvError> {
        self.reset();
        let decoded = decoder::decode(&self.config, source)?;
        self.header = decoded.header;
        self.source = decoded.records;
        self.ignored = decoded.ignored;
        Ok(self)
    }

    fn reset(&mut self) {
        self.source = Vec::new();
        self.header = None;
        self.ignored = Vec::new();
    }

    /// The current working set.
    pub fn to_records(&self) -> &[Record] {
        &self.source
    }

    /// Consumes the converter and returns the working set.
    pub fn into_records(self) -> Vec<Record> {
        self.source
    }

    /// Raw rows the most recent decode skipped because their field count
    /// did not match the header. Decoding never reports these as errors;
    /// this accessor is the only way to detect them.
    pub fn ignored_rows(&self) -> &[Vec<String>] {
        &self.ignored
    }

    /// The header captured by the most recent decode, if there was one.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Renders the working set as CSV text. Does not mutate the working
    /// set; encoding the same converter twice gives the same text.
    pub fn to_csv_string(&self) -> Result<String, CsvError> {
        encoder::encode(&self.config, &self.source)
    }

    /// Renders the working set and writes it to a sink, flushing before
    /// return. The sink is dropped (closed) when the caller drops it; for
    /// files prefer [`write_to_path`](Self::write_to_path).
    pub fn write_to<W: Write>(&self, mut sink: W) -> Result<(), CsvError> {
        let text = self.to_csv_string()?;
        sink.write_all(text.as_bytes())
            .map_err(|error| CsvError::Stream(error.to_string()))?;
        sink.flush()
            .map_err(|error| CsvError::Stream(error.to_string()))
    }

    /// Renders the working set into a file, creating or truncating it. The
    /// file is closed before this returns, on every path.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), CsvError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|error| CsvError::Stream(format!("{}: {error}", path.display())))?;
        self.write_to(file)
    }

    /// Renders the working set as a downloadable response body. When the
    /// configuration declares the separator, the body starts with a
    /// `sep=<delimiter>` line. Delivery is the caller's job; after handing
    /// the download to the response layer no further conversion work should
    /// run for that request.
    pub fn to_download(&self, filename: &str) -> Result<CsvDownload, CsvError> {
        let mut body = self.to_csv_string()?;
        if self.config.declare_separator {
            body = format!("sep={}\n{body}", self.config.delimiter as char);
        }
        Ok(CsvDownload::new(filename, body))
    }
}
