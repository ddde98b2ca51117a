use std::io::Write;

use csv::{Writer, WriterBuilder};
use log::debug;
use serde_json::{Map, Value};

use crate::{
    config::CsvConfig,
    error::CsvError,
    record::{scalar_text, Record},
};

/// Renders the record sequence as CSV text.
///
/// Every record is flattened first. With a header row enabled the columns
/// are the key order of the widest flattened record, and every data row is
/// emitted in that column order, with empty cells where a record lacks a
/// column. Without a header each row is emitted in its own key order.
pub(crate) fn encode(config: &CsvConfig, source: &[Record]) -> Result<String, CsvError> {
    let flattened: Vec<Map<String, Value>> = source.iter().map(Record::flattened).collect();

    let mut writer = WriterBuilder::new()
        .delimiter(config.delimiter)
        .quote(config.enclosure)
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());

    if config.header_row_exists {
        let columns = widest_columns(&flattened);
        write_row(&mut writer, &columns)?;
        for record in &flattened {
            let row: Vec<String> = columns
                .iter()
                .map(|column| record.get(column).map(scalar_text).unwrap_or_default())
                .collect();
            write_row(&mut writer, &row)?;
        }
    } else {
        for record in &flattened {
            let row: Vec<String> = record.values().map(scalar_text).collect();
            write_row(&mut writer, &row)?;
        }
    }

    let buffer = writer
        .into_inner()
        .map_err(|error| CsvError::Encode(error.to_string()))?;
    let text = String::from_utf8(buffer).map_err(|error| CsvError::Encode(error.to_string()))?;

    debug!("encoded {} records into {} bytes", source.len(), text.len());

    Ok(text)
}

/// Column set of the flattened record with the most keys; the first record
/// to reach the maximum wins ties. No records means no columns.
fn widest_columns(flattened: &[Map<String, Value>]) -> Vec<String> {
    let mut widest: Option<&Map<String, Value>> = None;
    for record in flattened {
        if widest.is_none_or(|current| record.len() > current.len()) {
            widest = Some(record);
        }
    }
    widest
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

// A record with zero fields is written as one empty field, which serializes
// to a bare line terminator. This is how an empty source with headers
// enabled still produces its (empty) header row.
fn write_row<W: Write>(writer: &mut Writer<W>, fields: &[String]) -> Result<(), CsvError> {
    let outcome = if fields.is_empty() {
        writer.write_record([""])
    } else {
        writer.write_record(fields)
    };
    outcome.map_err(|error| CsvError::Encode(error.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::encode;
    use crate::{config::CsvConfig, record::Record};

    fn records(value: Value) -> Vec<Record> {
        value
            .as_array()
            .expect("array literal")
            .iter()
            .map(|item| Record::from_value(item.clone()).unwrap())
            .collect()
    }

    #[test]
    fn header_comes_from_the_widest_record() {
        let source = records(json!([{"a": 1, "b": 2}, {"a": 3}]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "a,b\n1,2\n3,\n");
    }

    #[test]
    fn rows_follow_header_order_not_record_order() {
        let source = records(json!([{"b": "x", "a": "y"}, {"a": "p", "b": "q"}]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "b,a\nx,y\nq,p\n");
    }

    #[test]
    fn nested_records_become_dotted_columns() {
        let source = records(json!([
            {"name": "Alice", "address": {"city": "Boston", "zip": "02118"}}
        ]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "name,address.city,address.zip\nAlice,Boston,02118\n");
    }

    #[test]
    fn fields_containing_the_delimiter_are_enclosed() {
        let source = records(json!([{"name": "Alice", "city": "New York, NY"}]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "name,city\nAlice,\"New York, NY\"\n");
    }

    #[test]
    fn enclosure_characters_inside_fields_are_doubled() {
        let source = records(json!([{"quote": "say \"hi\""}]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "quote\n\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn custom_delimiter_is_used_for_rows_and_quoting() {
        let source = records(json!([{"a": "1;2", "b": "3"}]));

        let config = CsvConfig::new().delimiter(b';');
        let text = encode(&config, &source).unwrap();

        assert_eq!(text, "a;b\n\"1;2\";3\n");
    }

    #[test]
    fn empty_source_with_header_yields_one_blank_line() {
        let text = encode(&CsvConfig::new(), &[]).unwrap();

        assert_eq!(text, "\n");
    }

    #[test]
    fn empty_source_without_header_yields_nothing() {
        let config = CsvConfig::new().header_row_exists(false);
        let text = encode(&config, &[]).unwrap();

        assert_eq!(text, "");
    }

    #[test]
    fn no_header_mode_writes_rows_in_their_own_order() {
        let source = records(json!([["1", "2"], ["3", "4", "5"]]));

        let config = CsvConfig::new().header_row_exists(false);
        let text = encode(&config, &source).unwrap();

        assert_eq!(text, "1,2\n3,4,5\n");
    }

    #[test]
    fn positional_rows_under_a_header_get_index_columns() {
        let source = records(json!([["x", "y"]]));

        let text = encode(&CsvConfig::new(), &source).unwrap();

        assert_eq!(text, "0,1\nx,y\n");
    }
}
