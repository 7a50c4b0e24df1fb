//! Holdings valuation.
//!
//! Values an uploaded holdings file against current prices: per-position
//! P&L, portfolio totals and allocation weights.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// A held position as listed in the holdings file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Holding {
    /// Stock symbol (uppercase)
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Quantity held
    #[serde(rename = "Qty")]
    pub qty: f64,
    /// Average purchase price
    #[serde(rename = "AvgPrice")]
    pub avg_price: f64,
}

impl Holding {
    /// Create a new holding.
    pub fn new(symbol: &str, qty: f64, avg_price: f64) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            qty,
            avg_price,
        }
    }

    /// Calculate the total cost of this holding.
    pub fn total_cost(&self) -> f64 {
        self.qty * self.avg_price
    }

    /// Value the holding at a current market price.
    pub fn with_price(&self, current_price: f64) -> HoldingValuation {
        let value = self.qty * current_price;
        let total_cost = self.total_cost();
        let pnl = (current_price - self.avg_price) * self.qty;
        let pnl_percent = if total_cost > 0.0 {
            (pnl / total_cost) * 100.0
        } else {
            0.0
        };

        HoldingValuation {
            holding: self.clone(),
            current_price,
            value,
            pnl,
            pnl_percent,
        }
    }
}

/// Read a `Symbol,Qty,AvgPrice` CSV.
pub fn holdings_from_csv_reader<R: Read>(reader: R) -> Result<Vec<Holding>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut holdings = Vec::new();
    for row in rdr.deserialize::<Holding>() {
        let holding = row?;
        holdings.push(Holding::new(&holding.symbol, holding.qty, holding.avg_price));
    }
    Ok(holdings)
}

/// Read a `Symbol,Qty,AvgPrice` CSV file.
pub fn holdings_from_csv_path(path: impl AsRef<Path>) -> Result<Vec<Holding>> {
    let file = std::fs::File::open(path)?;
    holdings_from_csv_reader(file)
}

/// A holding valued at a current price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HoldingValuation {
    #[serde(flatten)]
    pub holding: Holding,
    /// Current market price
    pub current_price: f64,
    /// Market value (qty * current_price)
    pub value: f64,
    /// Unrealized gain/loss
    pub pnl: f64,
    /// Unrealized gain/loss as a percentage of cost
    pub pnl_percent: f64,
}

/// Valuation of a full set of holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioValuation {
    /// Holdings with a known price, in input order
    pub positions: Vec<HoldingValuation>,
    /// Symbols with no current price
    pub unpriced: Vec<String>,
    pub total_cost: f64,
    pub total_value: f64,
    pub total_pnl: f64,
}

impl PortfolioValuation {
    /// Share of total market value per symbol.
    ///
    /// Empty when the portfolio has no positive market value.
    pub fn allocation(&self) -> Vec<(String, f64)> {
        if self.total_value <= 0.0 {
            return Vec::new();
        }
        self.positions
            .iter()
            .map(|p| (p.holding.symbol.clone(), p.value / self.total_value))
            .collect()
    }
}

/// Value holdings against a symbol -> price table.
///
/// Holdings without a price are listed as unpriced rather than failing the
/// whole valuation. Totals cover priced holdings only. Symbols match price
/// keys case-insensitively.
pub fn value_holdings(holdings: &[Holding], prices: &HashMap<String, f64>) -> PortfolioValuation {
    let prices: HashMap<String, f64> = prices
        .iter()
        .map(|(symbol, price)| (symbol.to_uppercase(), *price))
        .collect();
    let mut valuation = PortfolioValuation::default();

    for holding in holdings {
        let price = prices
            .get(&holding.symbol.to_uppercase())
            .copied()
            .filter(|p| p.is_finite());

        match price {
            Some(price) => {
                let position = holding.with_price(price);
                valuation.total_cost += holding.total_cost();
                valuation.total_value += position.value;
                valuation.total_pnl += position.pnl;
                valuation.positions.push(position);
            }
            None => {
                tracing::warn!("No price for holding {}", holding.symbol);
                valuation.unpriced.push(holding.symbol.clone());
            }
        }
    }

    valuation
}
