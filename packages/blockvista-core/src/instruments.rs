//! Instrument metadata: token lookup and option-chain selection.

use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// Exchange used when none is given.
pub const DEFAULT_EXCHANGE: &str = "NSE";

/// A tradable instrument from the broker's instrument dump.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instrument {
    /// Broker-internal identifier used for quote and history requests
    pub instrument_token: u64,
    pub tradingsymbol: String,
    pub exchange: String,
    #[serde(default)]
    pub segment: String,
    /// EQ, FUT, CE or PE
    #[serde(default)]
    pub instrument_type: String,
    #[serde(default)]
    pub strike: f64,
    #[serde(default)]
    pub expiry: Option<NaiveDate>,
    #[serde(default)]
    pub lot_size: u32,
}

impl Instrument {
    pub fn is_call(&self) -> bool {
        self.instrument_type == "CE"
    }

    pub fn is_put(&self) -> bool {
        self.instrument_type == "PE"
    }
}

/// Instruments indexed by `(symbol, exchange)`.
///
/// The mapping is near-static within a session, so there is no invalidation:
/// build a new index to refresh it.
#[derive(Debug, Clone, Default)]
pub struct InstrumentIndex {
    instruments: Vec<Instrument>,
    by_key: HashMap<(String, String), usize>,
}

impl InstrumentIndex {
    /// Index an instrument dump. The first entry for a key wins.
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let mut by_key = HashMap::with_capacity(instruments.len());
        for (idx, instrument) in instruments.iter().enumerate() {
            let key = (
                instrument.tradingsymbol.to_uppercase(),
                instrument.exchange.to_uppercase(),
            );
            by_key.entry(key).or_insert(idx);
        }

        tracing::debug!("Indexed {} instruments", instruments.len());
        Self {
            instruments,
            by_key,
        }
    }

    /// Read the broker's CSV instrument dump.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let instruments = rdr
            .deserialize::<Instrument>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(instruments))
    }

    /// Find the instrument for a symbol on an exchange.
    pub fn get(&self, symbol: &str, exchange: &str) -> Option<&Instrument> {
        self.by_key
            .get(&(symbol.to_uppercase(), exchange.to_uppercase()))
            .map(|&idx| &self.instruments[idx])
    }

    /// Resolve a symbol to its instrument token.
    pub fn token(&self, symbol: &str, exchange: &str) -> Option<u64> {
        self.get(symbol, exchange).map(|i| i.instrument_token)
    }

    /// Cash-market instruments listed on `exchange` (the screener universe).
    pub fn equities<'a>(
        &'a self,
        exchange: &'a str,
    ) -> impl Iterator<Item = &'a Instrument> + 'a {
        self.instruments
            .iter()
            .filter(move |i| {
                i.exchange.eq_ignore_ascii_case(exchange)
                    && i.segment.eq_ignore_ascii_case(exchange)
            })
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

/// Calls and puts for one underlying and expiry, each sorted by strike.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptionChain {
    pub calls: Vec<Instrument>,
    pub puts: Vec<Instrument>,
}

impl OptionChain {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// Select the option chain for an underlying and expiry date.
///
/// Matches instruments whose trading symbol starts with `underlying`.
pub fn option_chain(
    instruments: &[Instrument],
    underlying: &str,
    expiry: NaiveDate,
) -> OptionChain {
    let underlying = underlying.to_uppercase();
    let mut chain = OptionChain::default();

    for instrument in instruments {
        if !instrument.tradingsymbol.starts_with(&underlying) {
            continue;
        }
        if instrument.expiry != Some(expiry) {
            continue;
        }
        if instrument.is_call() {
            chain.calls.push(instrument.clone());
        } else if instrument.is_put() {
            chain.puts.push(instrument.clone());
        }
    }

    chain.calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    chain.puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    chain
}
