//! The four fixed trading strategies and the caller's percentage split across them

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four strategy slots a caller allocates capital to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Conservative strategy across GBPUSD variants
    Falcon,
    /// Balanced buy/sell strategy
    BsBuySell,
    /// Max distance entries filtered by RSI
    MaxDistanceRsi,
    /// UBS entries sized by ATR
    UbsWithAtr,
}

impl Strategy {
    /// All strategies in result order
    pub const ALL: [Strategy; 4] = [
        Strategy::Falcon,
        Strategy::BsBuySell,
        Strategy::MaxDistanceRsi,
        Strategy::UbsWithAtr,
    ];

    /// Key used by the historical reference table and the result breakdown
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Falcon => "Falcon",
            Strategy::BsBuySell => "BS Buy Sell",
            Strategy::MaxDistanceRsi => "Max Distance + RSI",
            Strategy::UbsWithAtr => "UBS WITH ATR",
        }
    }

    /// JSON request field carrying this strategy's allocation percentage
    pub fn request_field(&self) -> &'static str {
        match self {
            Strategy::Falcon => "falconAllocation",
            Strategy::BsBuySell => "bsBuyAllocation",
            Strategy::MaxDistanceRsi => "maxDistanceAllocation",
            Strategy::UbsWithAtr => "ubsAllocation",
        }
    }

    /// Strategies whose combined allocation drives the risk label
    pub fn is_high_volatility(&self) -> bool {
        matches!(self, Strategy::BsBuySell | Strategy::MaxDistanceRsi)
    }

    /// Series colour for chart datasets
    pub fn chart_color(&self) -> &'static str {
        match self {
            Strategy::Falcon => "#E82561",
            Strategy::BsBuySell => "#C6E7FF",
            Strategy::MaxDistanceRsi => "#9B7EBD",
            Strategy::UbsWithAtr => "#1679AB",
        }
    }

    /// Look up a strategy by its reference table name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Percentage of total capital per strategy (0-100 scale)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Allocations {
    pub falcon: f64,
    pub bs_buy_sell: f64,
    pub max_distance: f64,
    pub ubs: f64,
}

impl Allocations {
    pub fn new(falcon: f64, bs_buy_sell: f64, max_distance: f64, ubs: f64) -> Self {
        Self { falcon, bs_buy_sell, max_distance, ubs }
    }

    /// Allocation percentage for a strategy
    pub fn get(&self, strategy: Strategy) -> f64 {
        match strategy {
            Strategy::Falcon => self.falcon,
            Strategy::BsBuySell => self.bs_buy_sell,
            Strategy::MaxDistanceRsi => self.max_distance,
            Strategy::UbsWithAtr => self.ubs,
        }
    }

    /// Sum of the four percentages, added in `Strategy::ALL` order
    pub fn sum(&self) -> f64 {
        self.falcon + self.bs_buy_sell + self.max_distance + self.ubs
    }

    /// Combined percentage in the high-volatility strategies
    pub fn high_volatility(&self) -> f64 {
        Strategy::ALL
            .iter()
            .filter(|s| s.is_high_volatility())
            .map(|&s| self.get(s))
            .sum()
    }

    /// (strategy, percentage) pairs in result order
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, f64)> + '_ {
        Strategy::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}
