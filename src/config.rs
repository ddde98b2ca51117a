/// Wire-format options shared by the decoder and the encoder.
///
/// Delimiter and enclosure are single bytes, matching the underlying row
/// parser; multi-character separators are unrepresentable by construction.
///
/// # Examples
///
/// ```
/// use record_csv::CsvConfig;
///
/// let config = CsvConfig::new()
///     .delimiter(b';')
///     .enclosure(b'\'')
///     .header_row_exists(false);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CsvConfig {
    pub(crate) delimiter: u8,
    pub(crate) enclosure: u8,
    pub(crate) header_row_exists: bool,
    pub(crate) declare_separator: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: b',',
            enclosure: b'"',
            header_row_exists: true,
            declare_separator: false,
        }
    }
}

impl CsvConfig {
    /// Creates a configuration with the defaults: comma delimiter, double
    /// quote enclosure, header row expected, no separator declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field delimiter.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the enclosure byte used to quote fields containing the
    /// delimiter, line breaks or the enclosure itself.
    pub fn enclosure(mut self, enclosure: u8) -> Self {
        self.enclosure = enclosure;
        self
    }

    /// Sets whether the first decoded row is a header, and whether encoded
    /// output starts with one.
    pub fn header_row_exists(mut self, yes: bool) -> Self {
        self.header_row_exists = yes;
        self
    }

    /// Requests a `sep=<delimiter>` declaration line at the top of download
    /// bodies, which some spreadsheet applications use to pick the
    /// delimiter.
    pub fn declare_separator(mut self) -> Self {
        self.declare_separator = true;
        self
    }
}
