use crate::domain::merchant::MerchantRecord;
use crate::error::{EmvError, Result};
use std::io::Read;

/// Reads merchant records from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<MerchantRecord>`.
/// Whitespace is trimmed and the trailing optional columns may be omitted.
/// Coded fields (category, currency, country, tip) are validated while deserializing.
pub struct MerchantReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> MerchantReader<R> {
    /// Creates a new `MerchantReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records(self) -> impl Iterator<Item = Result<MerchantRecord>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(EmvError::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "merchant_guid,merchant_name,merchant_city,merchant_category_code,transaction_currency,country_code,tip_amount,bill_reference,terminal_id,additional_info";

    #[test]
    fn test_reader_valid_stream() {
        let data = format!(
            "{HEADER}\nNCHL-1, Hari Sankar Pandey, KATHMANDU, 4829, 524, NP, 0, 001011160000072, 1, Demo Transaction\n\
             NCHL-2, Corner Shop, POKHARA, 5411, 524, NP, 10.5, , , "
        );
        let reader = MerchantReader::new(data.as_bytes());
        let results: Vec<Result<MerchantRecord>> = reader.records().collect();

        assert_eq!(results.len(), 2);
        let first = results[0].as_ref().unwrap();
        assert_eq!(first.merchant_name, "Hari Sankar Pandey");
        assert_eq!(first.additional_info, "Demo Transaction");
        let second = results[1].as_ref().unwrap();
        assert_eq!(second.tip_amount.as_str(), "10.5");
        assert_eq!(second.terminal_id, "");
    }

    #[test]
    fn test_reader_optional_columns_omitted() {
        let data = "merchant_guid,merchant_name,merchant_city,merchant_category_code,transaction_currency,country_code,tip_amount\n\
                    G, Shop, CITY, 4829, 524, NP, 0";
        let reader = MerchantReader::new(data.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(record.bill_reference, "");
    }

    #[test]
    fn test_reader_invalid_code() {
        let data = format!("{HEADER}\nG, Shop, CITY, 48290, 524, NP, 0, , , ");
        let reader = MerchantReader::new(data.as_bytes());
        let results: Vec<Result<MerchantRecord>> = reader.records().collect();

        assert!(matches!(results[0], Err(EmvError::CsvError(_))));
    }
}
