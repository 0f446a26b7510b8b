// Input data of the blending problem
// Plain immutable data; validate() runs before any model is built

use std::collections::BTreeMap;
use std::fmt;

use super::error::{PlanningError, Result};

/// Identifies a raw commodity; ids are dense, starting at 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommodityId(pub usize);

impl fmt::Display for CommodityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Identifies a period of the planning horizon; period 0 is the first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodId(pub usize);

impl PeriodId {
    /// The period before this one, `None` for the first period
    pub fn previous(self) -> Option<PeriodId> {
        self.0.checked_sub(1).map(PeriodId)
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Refining line a commodity goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Vegetable,
    NonVegetable,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Vegetable, Category::NonVegetable];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Vegetable => write!(f, "vegetable"),
            Category::NonVegetable => write!(f, "non_vegetable"),
        }
    }
}

/// A raw oil with its fixed attributes and inventory targets
#[derive(Debug, Clone, PartialEq)]
pub struct Commodity {
    pub id: CommodityId,
    pub name: String,
    pub category: Category,
    pub hardness: f64,
    /// Tons in storage before the first period
    pub initial_stock: f64,
    /// Tons required in storage at the end of the last period
    pub final_stock: f64,
}

impl Commodity {
    pub fn new(id: usize, name: impl Into<String>, category: Category, hardness: f64) -> Self {
        Self {
            id: CommodityId(id),
            name: name.into(),
            category,
            hardness,
            initial_stock: 0.0,
            final_stock: 0.0,
        }
    }

    pub fn with_stock(mut self, initial: f64, target: f64) -> Self {
        self.initial_stock = initial;
        self.final_stock = target;
        self
    }
}

/// Maximum tons refined per period, per category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefiningCaps {
    pub vegetable: f64,
    pub non_vegetable: f64,
}

impl RefiningCaps {
    pub fn cap(&self, category: Category) -> f64 {
        match category {
            Category::Vegetable => self.vegetable,
            Category::NonVegetable => self.non_vegetable,
        }
    }

    pub fn largest(&self) -> f64 {
        self.vegetable.max(self.non_vegetable)
    }

    pub fn total(&self) -> f64 {
        self.vegetable + self.non_vegetable
    }
}

/// Purchase price per ton, indexed by (commodity, period)
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<(CommodityId, PeriodId), f64>,
}

impl PriceTable {
    /// Build from one price series per commodity; `series[c][p]` is the price
    /// of commodity `c` in period `p`
    pub fn from_series(series: &[Vec<f64>]) -> Self {
        let prices = series
            .iter()
            .enumerate()
            .flat_map(|(c, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(p, &price)| ((CommodityId(c), PeriodId(p)), price))
            })
            .collect();
        Self { prices }
    }

    pub fn price(&self, commodity: CommodityId, period: PeriodId) -> Option<f64> {
        self.prices.get(&(commodity, period)).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Complete description of one planning scenario
#[derive(Debug, Clone, PartialEq)]
pub struct BlendingParameters {
    pub commodities: Vec<Commodity>,
    /// One label per period, in horizon order
    pub periods: Vec<String>,
    pub prices: PriceTable,
    /// Revenue per ton of blended product
    pub sale_price: f64,
    /// Holding cost per ton and period, charged on end-of-period stock
    pub storage_cost: f64,
    /// Storage limit per commodity, in tons
    pub storage_capacity: f64,
    pub hardness_lower: f64,
    pub hardness_upper: f64,
    pub refining_caps: RefiningCaps,
}

const MONTHS: [&str; 6] = ["January", "February", "March", "April", "May", "June"];

impl BlendingParameters {
    /// The six-month, five-oil food manufacture scenario
    pub fn reference() -> Self {
        let commodities = vec![
            Commodity::new(0, "VEG 1", Category::Vegetable, 8.8),
            Commodity::new(1, "VEG 2", Category::Vegetable, 6.1),
            Commodity::new(2, "OIL 1", Category::NonVegetable, 2.0),
            Commodity::new(3, "OIL 2", Category::NonVegetable, 4.2),
            Commodity::new(4, "OIL 3", Category::NonVegetable, 5.0),
        ]
        .into_iter()
        .map(|c| c.with_stock(500.0, 500.0))
        .collect();

        let prices = PriceTable::from_series(&[
            vec![110.0, 130.0, 110.0, 120.0, 100.0, 90.0],
            vec![120.0, 130.0, 140.0, 110.0, 120.0, 100.0],
            vec![130.0, 110.0, 130.0, 120.0, 150.0, 140.0],
            vec![110.0, 90.0, 100.0, 120.0, 110.0, 80.0],
            vec![115.0, 115.0, 95.0, 125.0, 105.0, 135.0],
        ]);

        Self {
            commodities,
            periods: MONTHS.iter().map(|m| m.to_string()).collect(),
            prices,
            sale_price: 150.0,
            storage_cost: 5.0,
            storage_capacity: 1000.0,
            hardness_lower: 3.0,
            hardness_upper: 6.0,
            refining_caps: RefiningCaps {
                vegetable: 200.0,
                non_vegetable: 250.0,
            },
        }
    }

    pub fn with_refining_caps(mut self, vegetable: f64, non_vegetable: f64) -> Self {
        self.refining_caps = RefiningCaps {
            vegetable,
            non_vegetable,
        };
        self
    }

    pub fn with_storage_capacity(mut self, capacity: f64) -> Self {
        self.storage_capacity = capacity;
        self
    }

    pub fn with_hardness_band(mut self, lower: f64, upper: f64) -> Self {
        self.hardness_lower = lower;
        self.hardness_upper = upper;
        self
    }

    /// Set the same initial stock for every commodity
    pub fn with_initial_stock(mut self, tons: f64) -> Self {
        for commodity in &mut self.commodities {
            commodity.initial_stock = tons;
        }
        self
    }

    /// Set the same terminal stock target for every commodity
    pub fn with_final_stock(mut self, tons: f64) -> Self {
        for commodity in &mut self.commodities {
            commodity.final_stock = tons;
        }
        self
    }

    pub fn period_ids(&self) -> impl Iterator<Item = PeriodId> {
        (0..self.periods.len()).map(PeriodId)
    }

    pub fn last_period(&self) -> Option<PeriodId> {
        self.periods.len().checked_sub(1).map(PeriodId)
    }

    pub fn commodity(&self, id: CommodityId) -> Option<&Commodity> {
        self.commodities.get(id.0).filter(|c| c.id == id)
    }

    pub fn members(&self, category: Category) -> impl Iterator<Item = &Commodity> {
        self.commodities
            .iter()
            .filter(move |c| c.category == category)
    }

    /// Check the parameters describe a well-formed model, collecting every problem
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.commodities.is_empty() {
            errors.push("at least one commodity is required".to_string());
        }
        if self.periods.is_empty() {
            errors.push("at least one period is required".to_string());
        }

        let scalars = [
            ("sale price", self.sale_price),
            ("storage cost", self.storage_cost),
            ("storage capacity", self.storage_capacity),
            ("hardness lower bound", self.hardness_lower),
            ("hardness upper bound", self.hardness_upper),
            ("vegetable refining cap", self.refining_caps.vegetable),
            ("non-vegetable refining cap", self.refining_caps.non_vegetable),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                errors.push(format!("{} must be a non-negative number, got {}", name, value));
            }
        }
        if self.hardness_lower > self.hardness_upper {
            errors.push(format!(
                "hardness band is empty: lower {} > upper {}",
                self.hardness_lower, self.hardness_upper
            ));
        }

        for (position, commodity) in self.commodities.iter().enumerate() {
            if commodity.id != CommodityId(position) {
                errors.push(format!(
                    "commodity '{}' has id {} but sits at position {}",
                    commodity.name, commodity.id.0, position
                ));
            }
            let attributes = [
                ("hardness", commodity.hardness),
                ("initial stock", commodity.initial_stock),
                ("final stock", commodity.final_stock),
            ];
            for (name, value) in attributes {
                if !value.is_finite() || value < 0.0 {
                    errors.push(format!(
                        "{} of '{}' must be a non-negative number, got {}",
                        name, commodity.name, value
                    ));
                }
            }
        }

        let expected = self.commodities.len() * self.periods.len();
        if self.prices.len() != expected {
            errors.push(format!(
                "price table has {} entries, expected {} commodities x {} periods",
                self.prices.len(),
                self.commodities.len(),
                self.periods.len()
            ));
        }
        for commodity in &self.commodities {
            for period in self.period_ids() {
                match self.prices.price(commodity.id, period) {
                    None => errors.push(format!(
                        "missing price for '{}' in period {}",
                        commodity.name, period.0
                    )),
                    Some(price) if !price.is_finite() || price < 0.0 => errors.push(format!(
                        "price of '{}' in period {} must be a non-negative number, got {}",
                        commodity.name, period.0, price
                    )),
                    Some(_) => {}
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanningError::InvalidParameters(errors))
        }
    }
}
