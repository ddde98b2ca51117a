use std::io::Read;

use csv::ReaderBuilder;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::{config::CsvConfig, error::CsvError, record::Record};

/// Everything one decode pass produces.
pub(crate) struct Decoded {
    pub header: Option<Vec<String>>,
    pub records: Vec<Record>,
    pub ignored: Vec<Vec<String>>,
}

enum RowOutcome {
    Mapped(Record),
    Skipped(Vec<String>),
}

/// Reads CSV rows from `source` until exhaustion.
///
/// When the configuration expects a header row, the first row becomes the
/// header and every later row must parse to the same number of fields; rows
/// that do not are collected as ignored instead of failing the decode.
/// Without a header, rows are kept as positional field lists.
pub(crate) fn decode<R: Read>(config: &CsvConfig, source: R) -> Result<Decoded, CsvError> {
    let reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .quote(config.enclosure)
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut header: Option<Vec<String>> = None;
    let mut records = Vec::new();
    let mut ignored = Vec::new();

    for (index, row) in reader.into_records().enumerate() {
        let row = row.map_err(|error| CsvError::Decode(error.to_string()))?;
        let fields: Vec<String> = row.iter().map(str::to_string).collect();

        if index == 0 && config.header_row_exists {
            header = Some(fields);
            continue;
        }

        match map_row(header.as_deref(), fields) {
            RowOutcome::Mapped(record) => records.push(record),
            RowOutcome::Skipped(fields) => {
                warn!(
                    "row {} has {} fields where the header has {}, ignoring it",
                    index + 1,
                    fields.len(),
                    header.as_deref().map_or(0, <[String]>::len),
                );
                ignored.push(fields);
            }
        }
    }

    debug!("decoded {} records, {} ignored", records.len(), ignored.len());

    Ok(Decoded {
        header,
        records,
        ignored,
    })
}

fn map_row(header: Option<&[String]>, fields: Vec<String>) -> RowOutcome {
    match header {
        Some(columns) if columns.len() != fields.len() => RowOutcome::Skipped(fields),
        Some(columns) => {
            let mut record = Map::new();
            for (column, field) in columns.iter().zip(fields) {
                record.insert(column.clone(), Value::String(field));
            }
            RowOutcome::Mapped(Record::Object(record))
        }
        None => RowOutcome::Mapped(Record::Fields(fields)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::decode;
    use crate::{config::CsvConfig, record::Record};

    fn fields(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn header_rows_zip_into_named_records() {
        let data = "name,age\nAlice,30\nBob,25";

        let decoded = decode(&CsvConfig::new(), data.as_bytes()).unwrap();

        assert_eq!(decoded.header, Some(fields(&["name", "age"])));
        assert_eq!(
            decoded.records,
            [
                Record::Object(json!({"name": "Alice", "age": "30"}).as_object().unwrap().clone()),
                Record::Object(json!({"name": "Bob", "age": "25"}).as_object().unwrap().clone()),
            ]
        );
        assert!(decoded.ignored.is_empty());
    }

    #[test]
    fn short_rows_are_ignored_not_fatal() {
        let data = "name,age\nAlice,30\nBob";

        let decoded = decode(&CsvConfig::new(), data.as_bytes()).unwrap();

        assert_eq!(
            decoded.records,
            [Record::Object(
                json!({"name": "Alice", "age": "30"}).as_object().unwrap().clone()
            )]
        );
        assert_eq!(decoded.ignored, [fields(&["Bob"])]);
    }

    #[test]
    fn every_data_row_lands_in_records_or_ignored() {
        let data = "a,b\n1,2\n3\n4,5,6\n7,8";

        let decoded = decode(&CsvConfig::new(), data.as_bytes()).unwrap();

        assert_eq!(decoded.records.len() + decoded.ignored.len(), 4);
        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.ignored, [fields(&["3"]), fields(&["4", "5", "6"])]);
    }

    #[test]
    fn no_header_keeps_positional_rows() {
        let data = "1,2\n3,4,5";

        let config = CsvConfig::new().header_row_exists(false);
        let decoded = decode(&config, data.as_bytes()).unwrap();

        assert_eq!(decoded.header, None);
        assert_eq!(
            decoded.records,
            [
                Record::Fields(fields(&["1", "2"])),
                Record::Fields(fields(&["3", "4", "5"])),
            ]
        );
        assert!(decoded.ignored.is_empty());
    }

    #[test]
    fn custom_delimiter_and_enclosure_are_honored() {
        let data = "name;city\nAlice;'Boston; MA'";

        let config = CsvConfig::new().delimiter(b';').enclosure(b'\'');
        let decoded = decode(&config, data.as_bytes()).unwrap();

        assert_eq!(
            decoded.records,
            [Record::Object(
                json!({"name": "Alice", "city": "Boston; MA"})
                    .as_object()
                    .unwrap()
                    .clone()
            )]
        );
    }

    #[test]
    fn doubled_enclosure_means_one_literal_enclosure() {
        let data = "quote\n\"say \"\"hi\"\"\"";

        let decoded = decode(&CsvConfig::new(), data.as_bytes()).unwrap();

        assert_eq!(
            decoded.records,
            [Record::Object(
                json!({"quote": "say \"hi\""}).as_object().unwrap().clone()
            )]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        let decoded = decode(&CsvConfig::new(), "".as_bytes()).unwrap();

        assert_eq!(decoded.header, None);
        assert!(decoded.records.is_empty());
        assert!(decoded.ignored.is_empty());
    }
}
