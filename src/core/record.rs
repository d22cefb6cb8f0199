//! Wire format for operation batches: one JSON array per line in, one out.

use super::operation::{Operation, OperationError, OperationKind};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Raw operation record as it appears on an input line.
///
/// Field names are matched case-insensitively on input and written
/// exactly as `operation`, `unit-cost` and `quantity` on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct OperationRecord {
    /// "buy" or "sell" (case-insensitive)
    pub operation: String,
    /// Price per share
    #[serde(rename = "unit-cost")]
    #[schemars(with = "f64")]
    pub unit_cost: Decimal,
    /// Number of shares; must be positive
    pub quantity: i64,
}

impl OperationRecord {
    /// Validate and convert into a typed operation
    pub fn to_operation(&self) -> Result<Operation, OperationError> {
        let kind = OperationKind::parse(&self.operation)?;
        Operation::new(kind, self.unit_cost, self.quantity)
    }
}

impl<'de> Deserialize<'de> for OperationRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = OperationRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an operation record with fields operation, unit-cost and quantity")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut operation: Option<String> = None;
        let mut unit_cost: Option<Decimal> = None;
        let mut quantity: Option<i64> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key.eq_ignore_ascii_case("operation") {
                if operation.is_some() {
                    return Err(de::Error::duplicate_field("operation"));
                }
                operation = Some(map.next_value()?);
            } else if key.eq_ignore_ascii_case("unit-cost") {
                if unit_cost.is_some() {
                    return Err(de::Error::duplicate_field("unit-cost"));
                }
                let number: serde_json::Number = map.next_value()?;
                unit_cost = Some(decimal_from_number(&number)?);
            } else if key.eq_ignore_ascii_case("quantity") {
                if quantity.is_some() {
                    return Err(de::Error::duplicate_field("quantity"));
                }
                quantity = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(OperationRecord {
            operation: operation.ok_or_else(|| de::Error::missing_field("operation"))?,
            unit_cost: unit_cost.ok_or_else(|| de::Error::missing_field("unit-cost"))?,
            quantity: quantity.ok_or_else(|| de::Error::missing_field("quantity"))?,
        })
    }
}

/// Convert a JSON number from its literal digits.
///
/// Keeps base-10 exactness: the digits are never routed through binary
/// floating point arithmetic.
fn decimal_from_number<E: de::Error>(number: &serde_json::Number) -> Result<Decimal, E> {
    let literal = number.to_string();
    Decimal::from_str_exact(&literal)
        .or_else(|_| Decimal::from_scientific(&literal))
        .map_err(|err| E::custom(format!("number {literal} is not a valid decimal: {err}")))
}

/// Result record for one operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TaxRecord {
    /// Tax due for the operation, always >= 0
    #[serde(serialize_with = "serialize_plain")]
    #[schemars(with = "f64")]
    pub tax: Decimal,
}

/// Write a decimal as a bare JSON number without insignificant zeros, so
/// whole amounts serialize as integers ({"tax":10000}, not {"tax":"10000.00"}).
fn serialize_plain<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let normalized = value.normalize();
    if normalized.scale() == 0 {
        if let Some(whole) = normalized.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }
    match normalized.to_f64() {
        Some(fractional) => serializer.serialize_f64(fractional),
        None => Err(serde::ser::Error::custom(format!(
            "decimal {normalized} cannot be represented as a JSON number"
        ))),
    }
}

/// Parse one input line into raw operation records
pub fn read_batch(line: &str) -> serde_json::Result<Vec<OperationRecord>> {
    serde_json::from_str(line)
}

/// Map a whole batch into typed operations, failing on the first bad record
pub fn records_to_operations(records: &[OperationRecord]) -> Result<Vec<Operation>, OperationError> {
    records.iter().map(OperationRecord::to_operation).collect()
}

/// Serialize a batch's taxes as a JSON array of result records
pub fn write_batch(taxes: &[Decimal]) -> serde_json::Result<String> {
    let results: Vec<TaxRecord> = taxes.iter().map(|&tax| TaxRecord { tax }).collect();
    serde_json::to_string(&results)
}
