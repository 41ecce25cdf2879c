// src/storage/csv.rs

//! CSV encoding of records and ledger columns.

use crate::error::{AppError, Result};
use crate::models::Record;

/// Encode records as CSV, optionally preceded by the header row.
pub fn encode_records<R: Record>(records: &[R], with_header: bool) -> Result<Vec<u8>> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());

    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

/// Read every value of `column` from CSV bytes with a header row.
pub fn read_column(bytes: &[u8], column: &str) -> Result<Vec<String>> {
    let mut reader = ::csv::Reader::from_reader(bytes);
    let index = reader
        .headers()?
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| AppError::validation(format!("CSV has no '{column}' column")))?;

    let mut values = Vec::new();
    for row in reader.records() {
        if let Some(value) = row?.get(index) {
            values.push(value.to_string());
        }
    }
    Ok(values)
}

/// Concatenate CSV files that share a header into one file.
pub fn concat(files: &[Vec<u8>]) -> Result<Vec<u8>> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    let mut header: Option<::csv::StringRecord> = None;

    for bytes in files {
        let mut reader = ::csv::Reader::from_reader(bytes.as_slice());
        let file_header = reader.headers()?.clone();
        match &header {
            None => {
                writer.write_record(&file_header)?;
                header = Some(file_header);
            }
            Some(expected) if !expected.iter().eq(file_header.iter()) => {
                return Err(AppError::validation("CSV units have different headers"));
            }
            Some(_) => {}
        }
        for row in reader.records() {
            writer.write_record(&row?)?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Amount, Movie};

    fn movie(id: &str, budget: Amount) -> Movie {
        Movie {
            imdb_id: id.to_string(),
            title: format!("Title {id}"),
            year: 2000,
            age_restriction: "PG".into(),
            runtime_min: 100,
            imdb_rating: 8.0,
            n_reviews_mil: 1.5,
            director: "Someone".into(),
            genre: "Drama".into(),
            country: "France".into(),
            budget,
            gross: Amount::Reported(0),
            awards_won: 1,
            awards_nominated: 2,
        }
    }

    #[test]
    fn test_header_follows_field_order() {
        let bytes = encode_records(&[movie("tt1", Amount::Missing)], true).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("imdb_id,title,year,age_restriction,runtime_min"));
        assert!(header.ends_with("awards_won,awards_nominated"));
    }

    #[test]
    fn test_missing_amount_is_empty_cell() {
        let bytes = encode_records(&[movie("tt1", Amount::Missing)], false).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        // budget missing, gross reported as zero
        assert!(text.contains(",France,,0,1,2"));

        let with_header = encode_records(&[movie("tt1", Amount::Missing)], true).unwrap();
        let mut reader = ::csv::Reader::from_reader(with_header.as_slice());
        let parsed: Movie = reader.deserialize().next().unwrap().unwrap();
        assert_eq!(parsed.budget, Amount::Missing);
        assert_eq!(parsed.gross, Amount::Reported(0));
    }

    #[test]
    fn test_read_column() {
        let bytes =
            encode_records(&[movie("tt1", Amount::Missing), movie("tt2", Amount::Missing)], true)
                .unwrap();
        assert_eq!(read_column(&bytes, "imdb_id").unwrap(), vec!["tt1", "tt2"]);
        assert!(read_column(&bytes, "npis").is_err());
    }

    #[test]
    fn test_concat_keeps_one_header() {
        let a = encode_records(&[movie("tt1", Amount::Missing)], true).unwrap();
        let b = encode_records(&[movie("tt2", Amount::Reported(5))], true).unwrap();
        let combined = concat(&[a, b]).unwrap();
        let text = String::from_utf8(combined.clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert_eq!(read_column(&combined, "imdb_id").unwrap(), vec!["tt1", "tt2"]);
    }

    #[test]
    fn test_concat_rejects_mismatched_headers() {
        let a = b"a,b\n1,2\n".to_vec();
        let b = b"a,c\n3,4\n".to_vec();
        assert!(concat(&[a, b]).is_err());
    }
}
