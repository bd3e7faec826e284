use std::path::PathBuf;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::calendar::PriceHistory;
use crate::engine::{PriceBar, PriceSeries};
use crate::errors::{Error, Result};

// {
//   "Instrument": "IVV",
//   "Date": "2023-01-30T00:00:00Z",
//   "Open Price": 405.12,
//   "High Price": 407.25,
//   "Low Price": 402.03,
//   "Close Price": 402.36
// }

/// One record of a JSON price file.
#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    #[serde(default, alias = "Instrument", alias = "asset")]
    instrument: Option<String>,
    #[serde(alias = "Date", deserialize_with = "date_prefix")]
    date: NaiveDate,
    #[serde(alias = "Open Price")]
    open: Decimal,
    #[serde(alias = "High Price")]
    high: Decimal,
    #[serde(alias = "Low Price")]
    low: Decimal,
    #[serde(alias = "Close Price")]
    close: Decimal,
}

impl Data {
    /// Returns the instrument the record belongs to, if it names one.
    pub fn instrument(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    /// Returns the trading day.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl From<&Data> for PriceBar {
    fn from(value: &Data) -> Self {
        PriceBar::from((value.date, value.open, value.high, value.low, value.close))
    }
}

/// Accepts `YYYY-MM-DD` with or without a time suffix.
fn date_prefix<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let prefix = raw.get(..10).unwrap_or(raw.as_str());
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(serde::de::Error::custom)
}

/// Reads data from `filepath` and returns an array of `Data`.
pub fn get_data_from_file(filepath: PathBuf) -> Result<Vec<Data>> {
    use std::{fs::File, io::BufReader};

    let file = File::open(filepath)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(Error::from)
}

/// Price history stored as a JSON array of daily records.
///
/// Records carrying an instrument are filtered on the requested asset; records
/// without one are assumed to belong to it.
#[derive(Debug, Clone)]
pub struct JsonPriceFile {
    path: PathBuf,
}

impl JsonPriceFile {
    /// Creates a provider reading the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PriceHistory for JsonPriceFile {
    fn price_history(&self, asset: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let items = get_data_from_file(self.path.clone())?;
        let bars = items
            .iter()
            .filter(|d| d.instrument().is_none_or(|i| i == asset))
            .filter(|d| d.date() >= start && d.date() <= end)
            .map(PriceBar::from)
            .collect();
        PriceSeries::new(bars)
    }
}
