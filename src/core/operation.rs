use rust_decimal::Decimal;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OperationError {
    #[error("invalid operation kind '{0}': expected 'buy' or 'sell'")]
    InvalidKind(String),
    #[error("invalid quantity {0}: must be a positive integer")]
    InvalidQuantity(i64),
    #[error("invalid unit price {0}: cannot be negative")]
    InvalidUnitPrice(Decimal),
}

/// Kind of trade operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Buy,
    Sell,
}

impl OperationKind {
    /// Parse a raw kind string, case-insensitively
    pub fn parse(value: &str) -> Result<Self, OperationError> {
        if value.eq_ignore_ascii_case("buy") {
            Ok(OperationKind::Buy)
        } else if value.eq_ignore_ascii_case("sell") {
            Ok(OperationKind::Sell)
        } else {
            Err(OperationError::InvalidKind(value.to_string()))
        }
    }
}

/// A validated trade operation.
///
/// Fields are private so an `Operation` can only exist with a positive
/// quantity and a non-negative unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    kind: OperationKind,
    unit_cost: Decimal,
    quantity: u64,
}

impl Operation {
    pub fn new(
        kind: OperationKind,
        unit_cost: Decimal,
        quantity: i64,
    ) -> Result<Self, OperationError> {
        if quantity <= 0 {
            return Err(OperationError::InvalidQuantity(quantity));
        }
        if unit_cost < Decimal::ZERO {
            return Err(OperationError::InvalidUnitPrice(unit_cost));
        }
        Ok(Operation {
            kind,
            unit_cost,
            quantity: quantity as u64,
        })
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Price per share
    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    /// Number of shares, always positive
    pub fn quantity(&self) -> u64 {
        self.quantity
    }
}
