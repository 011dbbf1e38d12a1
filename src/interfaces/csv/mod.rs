//! CSV adapters: merchant records in, payload rows out.

pub mod merchant_reader;
pub mod payload_writer;
