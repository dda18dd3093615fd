//! Line-numbered CSV record reader
//!
//! Streams raw records from one data file, one at a time. Conversion into
//! domain types is left to the caller via the `csv_format` module.
//!
//! # Error Handling
//!
//! - Fatal errors (unreadable file or header) are returned from `open()`
//! - Individual malformed rows are yielded as `ParseError` in the iterator
//! - Every `ParseError` carries the line it came from

use crate::types::BookingError;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::Path;

/// Streaming reader over the rows of one CSV data file
///
/// Yields `(line, record)` pairs, where `line` is the 1-based line number in
/// the file (counting the header, if any).
#[derive(Debug)]
pub struct RecordReader {
    reader: csv::Reader<File>,
    headers: Option<StringRecord>,
    line_num: u64,
}

impl RecordReader {
    /// Open a CSV file for reading
    ///
    /// The reader trims whitespace from every field and accepts rows of
    /// varying width.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the CSV file
    /// * `has_headers` - Whether the first row names the columns
    ///
    /// # Errors
    ///
    /// - `IoError` if the file cannot be opened
    /// - `ParseError` if its header row cannot be read
    pub fn open(path: &Path, has_headers: bool) -> Result<Self, BookingError> {
        let file = File::open(path).map_err(|e| BookingError::IoError {
            message: format!("Failed to open file '{}': {}", path.display(), e),
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .has_headers(has_headers)
            .from_reader(file);

        let headers = if has_headers {
            Some(reader.headers()?.clone())
        } else {
            None
        };

        Ok(RecordReader {
            reader,
            line_num: u64::from(has_headers),
            headers,
        })
    }

    /// Column names, for files that have a header row
    pub fn headers(&self) -> Option<&StringRecord> {
        self.headers.as_ref()
    }

    /// Deserialize a row read by this reader, matching columns by header
    pub fn decode<T: DeserializeOwned>(
        &self,
        line: u64,
        record: &StringRecord,
    ) -> Result<T, BookingError> {
        record
            .deserialize(self.headers.as_ref())
            .map_err(|e| parse_error(line, e))
    }
}

impl Iterator for RecordReader {
    type Item = Result<(u64, StringRecord), BookingError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => {
                self.line_num += 1;
                Some(Ok((self.line_num, record)))
            }
            Ok(false) => None,
            Err(e) => {
                self.line_num += 1;
                Some(Err(parse_error(self.line_num, e)))
            }
        }
    }
}

fn parse_error(line: u64, error: csv::Error) -> BookingError {
    BookingError::ParseError {
        line: Some(line),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::BalanceCsvRecord;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_open_fails_on_missing_file() {
        let result = RecordReader::open(Path::new("nonexistent.csv"), true);
        assert!(matches!(
            result,
            Err(BookingError::IoError { message }) if message.contains("Failed to open file")
        ));
    }

    #[test]
    fn test_headerless_rows_keep_their_width() {
        let file = create_temp_csv("FACILITY_MANAGER,boss,pw\nCITIZEN,alice,pw,RESIDENT\n");

        let reader = RecordReader::open(file.path(), false).unwrap();
        assert!(reader.headers().is_none());
        let rows: Vec<_> = reader.map(Result::unwrap).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[0].1.len(), 3);
        assert_eq!(rows[1].0, 2);
        assert_eq!(&rows[1].1[3], "RESIDENT");
    }

    #[test]
    fn test_decode_by_header_with_line_numbers() {
        let file = create_temp_csv("USERNAME,BALANCE\n  alice , 12.50 \nbob\n");

        let mut reader = RecordReader::open(file.path(), true).unwrap();
        let (line, record) = reader.next().unwrap().unwrap();
        let balance: BalanceCsvRecord = reader.decode(line, &record).unwrap();
        assert_eq!(line, 2);
        assert_eq!(balance.username, "alice");
        assert_eq!(balance.balance, "12.50");

        let (line, record) = reader.next().unwrap().unwrap();
        let error = reader.decode::<BalanceCsvRecord>(line, &record).unwrap_err();
        assert!(matches!(
            error,
            BookingError::ParseError { line: Some(3), .. }
        ));
        assert!(error.to_string().starts_with("CSV parse error at line 3"));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = create_temp_csv("USERNAME,BALANCE\n");
        let reader = RecordReader::open(file.path(), true).unwrap();
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_malformed_header_is_a_parse_error() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"USERNAME,BAL\xffANCE\nalice,1\n")
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");

        let result = RecordReader::open(file.path(), true);
        assert!(matches!(result, Err(BookingError::ParseError { .. })));
    }
}
