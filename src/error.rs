use thiserror::Error;

#[derive(Error, Debug)]
/// Conversion error
pub enum CsvError {
    /// The input handed to a load operation cannot describe a record
    /// sequence. Returned before any converter state is touched.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    /// Underlying open/read/write failure on a file or sink.
    #[error("stream error: {0}")]
    Stream(String),
}
