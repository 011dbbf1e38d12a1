use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 10] = [
    "merchant_guid",
    "merchant_name",
    "merchant_city",
    "merchant_category_code",
    "transaction_currency",
    "country_code",
    "tip_amount",
    "bill_reference",
    "terminal_id",
    "additional_info",
];

pub const SAMPLE_PAYLOAD: &str = "00020101021129340030NCHL000000024501COP-1195-APP-1520448295303524540105802NP5918Hari Sankar Pandey6009KATHMANDU62540102010202020302030402040502050602060702070802080902096304CEC9";

/// Writes `rows` to a merchants CSV at `path`, prefixed with the standard header.
pub fn write_merchants(path: &Path, rows: &[[&str; 10]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;
    for row in rows {
        wtr.write_record(row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Generates `rows` distinct merchants in KATHMANDU.
pub fn generate_merchants(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        wtr.write_record([
            format!("NCHL{i:012}"),
            format!("Merchant {i}"),
            "KATHMANDU".to_string(),
            "4829".to_string(),
            "524".to_string(),
            "NP".to_string(),
            (i % 100).to_string(),
            format!("{i:015}"),
            (i % 10).to_string(),
            String::new(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
