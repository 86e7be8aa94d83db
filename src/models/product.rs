use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ProductFields — the values shared by every record of one submission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    pub buyer: String,
    pub order_date: NaiveDate,
}

impl ProductFields {
    /// Build a field set, rounding `price` to two decimal places.
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        category: impl Into<String>,
        buyer: impl Into<String>,
        order_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            price: normalize_price(price),
            category: category.into(),
            buyer: buyer.into(),
            order_date,
        }
    }
}

// ---------------------------------------------------------------------------
// ProductRecord — one sale entry as held by the ledger and persisted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: i64,
    pub name: String,
    #[serde(default, with = "price_format")]
    pub price: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub buyer: String,
    pub order_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl ProductRecord {
    pub fn new(id: i64, fields: ProductFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            price: normalize_price(fields.price),
            category: fields.category,
            buyer: fields.buyer,
            order_date: fields.order_date,
            created_at,
        }
    }

    /// Copy out the user-editable fields.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
            category: self.category.clone(),
            buyer: self.buyer.clone(),
            order_date: self.order_date,
        }
    }

    /// Overwrite the user-editable fields, leaving `id` and `created_at` alone.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = normalize_price(fields.price);
        self.category = fields.category;
        self.buyer = fields.buyer;
        self.order_date = fields.order_date;
    }
}

/// Round a price to the two places it is stored and displayed with.
pub fn normalize_price(price: Decimal) -> Decimal {
    price.round_dp(2)
}

/// Serde adapter for `price`.
///
/// Writes a JSON number. Reads a number, a numeric string, or `null`; text that
/// does not parse and `null` (what a browser writes for `NaN`) read as zero.
mod price_format {
    use std::str::FromStr;

    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        match price.to_f64() {
            Some(value) => serializer.serialize_f64(value),
            None => Err(serde::ser::Error::custom(format!(
                "price {} is not representable as a number",
                price
            ))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let raw = Option::<RawPrice>::deserialize(deserializer)?;
        let price = match raw {
            Some(RawPrice::Number(n)) => parse_decimal(&n.to_string()),
            Some(RawPrice::Text(text)) => parse_decimal(&text),
            None => None,
        };
        match price {
            Some(p) => Ok(super::normalize_price(p)),
            None => {
                tracing::warn!("stored price is not numeric; reading it as 0");
                Ok(Decimal::ZERO)
            }
        }
    }

    fn parse_decimal(text: &str) -> Option<Decimal> {
        let text = text.trim();
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .ok()
    }
}
