#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # record-csv

 Converts between tabular in-memory data (a sequence of associative records)
 and CSV text, in both directions, with configurable delimiter and enclosure
 bytes, an optional header row, and flattening of nested structures into
 dotted column names.

 ## Core Concepts

 - **[`CsvConverter`]:** the conversion session. Holds the configuration and
   one working set at a time; every load fully replaces the previous one.
 - **[`Record`]:** one row — either named (possibly nested) fields or a
   plain positional field list.
 - **[`flatten`]:** turns nested maps into single-level maps keyed by
   dot-joined paths (`address.city`). The encoder applies it to every
   record.
 - **Ignored rows:** decoding is best-effort. A row whose field count does
   not match the header is diverted to a side list instead of failing the
   decode; check [`CsvConverter::ignored_rows`] after loading to see what
   was skipped.
 - **[`CsvDownload`]:** the rendered text plus the HTTP headers a web layer
   needs to serve it as a file download.

 ## Getting Started

```rust
# use std::error::Error;
use record_csv::CsvConverter;
use serde_json::json;

# fn main() { example().unwrap(); }
fn example() -> Result<(), Box<dyn Error>> {
    let mut csv = CsvConverter::new();

    // Records in, CSV out. Nested values become dotted columns and the
    // header comes from the widest record.
    csv.from_value(json!([
        {"city": "Boston", "geo": {"lat": "42.36", "lon": "-71.06"}},
        {"city": "Concord"},
    ]))?;

    assert_eq!(
        csv.to_csv_string()?,
        "\
city,geo.lat,geo.lon
Boston,42.36,-71.06
Concord,,
"
    );

    // CSV in, records out. Malformed rows are diverted, not fatal.
    csv.from_reader("city,pop\nBoston,4628910\nConcord".as_bytes())?;

    assert_eq!(csv.to_records().len(), 1);
    assert_eq!(csv.ignored_rows(), [vec!["Concord".to_string()]]);
    Ok(())
}
```

 Custom dialects are chained on the converter or prepared as a
 [`CsvConfig`]:

```rust
# use std::error::Error;
use record_csv::CsvConverter;
use serde_json::json;

# fn main() { example().unwrap(); }
fn example() -> Result<(), Box<dyn Error>> {
    let mut csv = CsvConverter::new();
    csv.set_delimiter(b';').set_declare_separator();
    csv.from_value(json!([{"a": "1;2"}]))?;

    let download = csv.to_download("export.csv")?;
    assert_eq!(download.body(), "sep=;\na\n\"1;2\"\n");
    Ok(())
}
```

 ## License

 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
*/

/// Wire-format configuration
pub mod config;

/// The conversion session facade
pub mod converter;

/// HTTP download collaborator contract
pub mod download;

/// Error types for conversions
pub mod error;

/// Record model and the flatten helper
pub mod record;

mod decoder;
mod encoder;

#[doc(inline)]
pub use error::*;

pub use config::CsvConfig;
pub use converter::{CsvConverter, Source};
pub use download::CsvDownload;
pub use record::{flatten, Record};
