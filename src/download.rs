/// `Content-Type` value for CSV downloads.
pub const CONTENT_TYPE: &str = "text/csv";
/// `Cache-Control` value for CSV downloads.
pub const CACHE_CONTROL: &str = "private";
/// `pragma` value for CSV downloads.
pub const PRAGMA: &str = "cache";

/// Rendered CSV text plus the response metadata a web layer needs to serve
/// it as a file download.
///
/// This type does not talk to any HTTP stack. The embedding service copies
/// [`headers`](CsvDownload::headers) onto its response, writes
/// [`body`](CsvDownload::body), and stops handling the request afterwards.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// use record_csv::CsvConverter;
/// use serde_json::json;
///
/// # fn main() { example().unwrap(); }
/// fn example() -> Result<(), Box<dyn Error>> {
///     let mut csv = CsvConverter::new();
///     csv.from_value(json!([{"a": 1}]))?;
///
///     let download = csv.to_download("report.csv")?;
///     assert_eq!(
///         download.content_disposition(),
///         "attachment; filename=\"report.csv\""
///     );
///     assert_eq!(download.body(), "a\n1\n");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDownload {
    filename: String,
    body: String,
}

impl CsvDownload {
    pub(crate) fn new(filename: &str, body: String) -> Self {
        CsvDownload {
            filename: filename.to_string(),
            body,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Header name/value pairs, ready to copy onto a response.
    pub fn headers(&self) -> [(&'static str, String); 4] {
        [
            ("Content-Type", CONTENT_TYPE.to_string()),
            ("Content-Disposition", self.content_disposition()),
            ("Cache-Control", CACHE_CONTROL.to_string()),
            ("pragma", PRAGMA.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::CsvDownload;

    #[test]
    fn headers_carry_the_download_disposition() {
        let download = CsvDownload::new("export.csv", "a\n1\n".to_string());

        let headers = download.headers();
        assert_eq!(headers[0], ("Content-Type", "text/csv".to_string()));
        assert_eq!(
            headers[1],
            (
                "Content-Disposition",
                "attachment; filename=\"export.csv\"".to_string()
            )
        );
        assert_eq!(headers[2], ("Cache-Control", "private".to_string()));
        assert_eq!(headers[3], ("pragma", "cache".to_string()));
    }

    #[test]
    fn into_body_returns_the_rendered_text() {
        let download = CsvDownload::new("export.csv", "a\n1\n".to_string());

        assert_eq!(download.into_body(), "a\n1\n");
    }
}
