use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One output row: the merchant and its finished payload.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PayloadRow<'a> {
    pub merchant_name: &'a str,
    pub payload: &'a str,
}

/// Writes payload rows as CSV with a `merchant_name,payload` header.
pub struct PayloadWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PayloadWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write(&mut self, row: &PayloadRow<'_>) -> Result<()> {
        self.writer.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_quotes_only_when_needed() {
        let mut buf = Vec::new();
        {
            let mut writer = PayloadWriter::new(&mut buf);
            writer
                .write(&PayloadRow {
                    merchant_name: "Hari Sankar Pandey",
                    payload: "000201",
                })
                .unwrap();
            writer
                .write(&PayloadRow {
                    merchant_name: "Shop, Inc",
                    payload: "000201",
                })
                .unwrap();
            writer.flush().unwrap();
        }

        let out = String::from_utf8(buf).unwrap();
        assert_eq!(
            out,
            "merchant_name,payload\nHari Sankar Pandey,000201\n\"Shop, Inc\",000201\n"
        );
    }
}
