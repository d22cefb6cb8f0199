use rust_decimal::Decimal;

/// Running portfolio position, threaded through one batch of operations.
///
/// Never mutated in place: the engine builds a replacement state per
/// operation. All fields stay non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortfolioState {
    /// Shares currently held
    pub total_quantity: u64,
    /// Weighted-average purchase price per share
    pub average_cost: Decimal,
    /// Unrecovered losses carried forward to offset future gains
    pub accumulated_loss: Decimal,
}

impl PortfolioState {
    /// Zero-initialized state each batch starts from
    pub const EMPTY: PortfolioState = PortfolioState {
        total_quantity: 0,
        average_cost: Decimal::ZERO,
        accumulated_loss: Decimal::ZERO,
    };
}
