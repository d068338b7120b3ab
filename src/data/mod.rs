//! Data module - CSV loading and record cleaning

mod loader;
mod processor;
mod table;

pub use loader::DataLoader;
pub use processor::DataProcessor;
pub use table::FundingTable;

/// Column names of the cleaned record and investor frames.
pub mod columns {
    pub const RECORD_ID: &str = "record_id";
    pub const DATE: &str = "date";
    pub const YEAR: &str = "year";
    pub const MONTH: &str = "month";
    pub const STARTUP: &str = "startup";
    pub const INDUSTRY: &str = "industry";
    pub const SUBVERTICAL: &str = "subvertical";
    pub const CITY: &str = "city";
    /// Raw, unsplit investor string.
    pub const INVESTORS: &str = "investors";
    pub const ROUND: &str = "round";
    pub const AMOUNT: &str = "amount";
    /// Single investor name in the investor frame.
    pub const INVESTOR: &str = "investor";
}
