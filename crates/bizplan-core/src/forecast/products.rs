use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{types::*, BizplanError, BizplanResult};

/// How often a sales volume or an expense amount recurs.
///
/// Only `monthly` is recognised explicitly; every other label is read as
/// quarterly, which is how catalogues entered by business owners have always
/// been interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum VolumeUnit {
    #[default]
    Monthly,
    Quarterly,
}

impl VolumeUnit {
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("monthly") {
            VolumeUnit::Monthly
        } else {
            VolumeUnit::Quarterly
        }
    }

    /// Number of occurrences in a year.
    pub fn periods_per_year(self) -> Decimal {
        match self {
            VolumeUnit::Monthly => dec!(12),
            VolumeUnit::Quarterly => dec!(4),
        }
    }
}

impl From<String> for VolumeUnit {
    fn from(label: String) -> Self {
        VolumeUnit::from_label(&label)
    }
}

/// A product line in the catalogue.
///
/// Price and volume are assumed sanitised (non-negative) by the caller;
/// `Product::new` enforces that for values built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub description: String,
    #[serde(alias = "price")]
    pub unit_price: Money,
    pub sales_volume: u32,
    #[serde(default, alias = "sales_volume_unit")]
    pub volume_unit: VolumeUnit,
}

impl Product {
    pub fn new(
        description: impl Into<String>,
        unit_price: Money,
        sales_volume: u32,
        volume_unit: VolumeUnit,
    ) -> BizplanResult<Self> {
        let product = Self {
            description: description.into(),
            unit_price,
            sales_volume,
            volume_unit,
        };
        product.validate()?;
        Ok(product)
    }

    /// Re-check a product that was built without [`Product::new`], e.g. one
    /// deserialised from JSON.
    pub fn validate(&self) -> BizplanResult<()> {
        if self.unit_price < Decimal::ZERO {
            return Err(BizplanError::InvalidInput {
                field: "unit_price".into(),
                reason: format!("Unit price of '{}' cannot be negative", self.description),
            });
        }
        Ok(())
    }

    pub fn annual_volume(&self) -> Decimal {
        Decimal::from(self.sales_volume) * self.volume_unit.periods_per_year()
    }

    /// Revenue before any seasonality adjustment.
    pub fn annual_revenue(&self) -> Money {
        self.unit_price * self.annual_volume()
    }
}

/// A recurring operating expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub item: String,
    pub amount: Money,
    #[serde(default)]
    pub frequency: VolumeUnit,
}

impl Expense {
    pub fn new(
        item: impl Into<String>,
        amount: Money,
        frequency: VolumeUnit,
    ) -> BizplanResult<Self> {
        let expense = Self {
            item: item.into(),
            amount,
            frequency,
        };
        expense.validate()?;
        Ok(expense)
    }

    pub fn validate(&self) -> BizplanResult<()> {
        if self.amount < Decimal::ZERO {
            return Err(BizplanError::InvalidInput {
                field: "amount".into(),
                reason: format!("Expense '{}' cannot be negative", self.item),
            });
        }
        Ok(())
    }

    pub fn annual_amount(&self) -> Money {
        self.amount * self.frequency.periods_per_year()
    }
}

/// Reject a catalogue holding any product with a negative price.
pub fn validate_catalogue(products: &[Product]) -> BizplanResult<()> {
    products.iter().try_for_each(Product::validate)
}

/// Reject an expense list holding any negative amount.
pub fn validate_expenses(expenses: &[Expense]) -> BizplanResult<()> {
    expenses.iter().try_for_each(Expense::validate)
}

/// Sum of every product's unadjusted annual revenue.
pub fn base_annual_revenue(products: &[Product]) -> Money {
    products.iter().map(Product::annual_revenue).sum()
}

/// Annual operating expenses implied by an expense list.
pub fn annual_operating_expenses(expenses: &[Expense]) -> Money {
    expenses.iter().map(Expense::annual_amount).sum()
}
