//! Form input validation.
//!
//! A [`ProductForm`] carries field values exactly as a form hands them over
//! (untrimmed text). [`ProductForm::validate`] turns them into typed
//! [`ProductFields`] plus a quantity, or reports the first field that is wrong.
//! Nothing reaches the ledger without passing through here.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config;
use crate::models::{ProductFields, ProductRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("price '{0}' is not a number")]
    InvalidPrice(String),

    #[error("price '{0}' must not be negative")]
    NegativePrice(String),

    #[error("price '{price}' is above the maximum of {max}")]
    PriceOutOfRange { price: String, max: i64 },

    #[error("quantity '{0}' is not a whole number")]
    InvalidQuantity(String),

    #[error("quantity {quantity} is outside 1..={max}")]
    QuantityOutOfRange { quantity: i64, max: u32 },

    #[error("order date '{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),
}

/// Raw submission as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub category: String,
    pub buyer: String,
    pub quantity: String,
    pub order_date: String,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub fields: ProductFields,
    pub quantity: u32,
}

impl ProductForm {
    /// Pre-populate a form from an existing record, as the edit flow does.
    ///
    /// Quantity is reset to `1`.
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            price: format!("{:.2}", record.price),
            category: record.category.clone(),
            buyer: record.buyer.clone(),
            quantity: "1".to_string(),
            order_date: record.order_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Validate every field, returning the first failure.
    ///
    /// `category` may be blank; `name` and `buyer` may not. `price` must lie in
    /// `0..=MAX_PRICE_UNITS`. `quantity` must fall in `1..=max_quantity`.
    pub fn validate(&self, max_quantity: u32) -> Result<ValidatedSubmission, ValidationError> {
        let fields = self.validate_fields()?;
        let quantity = parse_quantity(&self.quantity, max_quantity)?;
        Ok(ValidatedSubmission { fields, quantity })
    }

    /// Validate everything except quantity (used by in-place updates).
    pub fn validate_fields(&self) -> Result<ProductFields, ValidationError> {
        let name = required(&self.name, "name")?;
        let price = parse_price(&self.price)?;
        let buyer = required(&self.buyer, "buyer")?;
        let order_date = parse_date(&self.order_date)?;

        Ok(ProductFields::new(
            name,
            price,
            self.category.trim(),
            buyer,
            order_date,
        ))
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn parse_price(text: &str) -> Result<Decimal, ValidationError> {
    let trimmed = required(text, "price")?;
    let price = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::InvalidPrice(trimmed.to_string()))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice(trimmed.to_string()));
    }
    if price > Decimal::from(config::MAX_PRICE_UNITS) {
        return Err(ValidationError::PriceOutOfRange {
            price: trimmed.to_string(),
            max: config::MAX_PRICE_UNITS,
        });
    }
    Ok(price)
}

fn parse_quantity(text: &str, max: u32) -> Result<u32, ValidationError> {
    let trimmed = required(text, "quantity")?;
    let quantity: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::InvalidQuantity(trimmed.to_string()))?;
    if quantity < 1 || quantity > i64::from(max) {
        return Err(ValidationError::QuantityOutOfRange { quantity, max });
    }
    u32::try_from(quantity).map_err(|_| ValidationError::QuantityOutOfRange { quantity, max })
}

fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = required(text, "order date")?;
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}
