use super::operation::{Operation, OperationKind};
use super::portfolio::PortfolioState;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Flat rate applied to the taxable part of a gain.
pub const TAX_RATE: Decimal = dec!(0.20);

/// Sells whose total value is at or below this are exempt from tax.
pub const EXEMPTION_THRESHOLD: Decimal = dec!(20000.00);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("cannot sell {requested} shares: only {held} held")]
    InsufficientShares { requested: u64, held: u64 },
    #[error("share count overflow: {held} held + {bought} bought")]
    QuantityOverflow { held: u64, bought: u64 },
}

/// Round to 2 fraction digits, half away from zero.
///
/// The tax rules are defined in terms of this rounding, applied after
/// every computed decimal; banker's rounding would diverge.
fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute the tax due for each operation, in input order.
///
/// A fresh portfolio (zero holdings, zero carried loss) is folded through
/// the sequence. Buys update the weighted-average cost and never produce
/// tax; sells settle against it. The first failed operation aborts the
/// whole batch.
pub fn calculate_taxes(operations: &[Operation]) -> Result<Vec<Decimal>, EngineError> {
    let mut taxes = Vec::with_capacity(operations.len());
    let mut state = PortfolioState::EMPTY;

    for op in operations {
        let (next, tax) = match op.kind() {
            OperationKind::Buy => apply_buy(state, op)?,
            OperationKind::Sell => apply_sell(state, op)?,
        };
        state = next;
        taxes.push(tax);
    }

    Ok(taxes)
}

fn apply_buy(
    state: PortfolioState,
    op: &Operation,
) -> Result<(PortfolioState, Decimal), EngineError> {
    let new_quantity = state
        .total_quantity
        .checked_add(op.quantity())
        .ok_or(EngineError::QuantityOverflow {
            held: state.total_quantity,
            bought: op.quantity(),
        })?;

    // Defensive reset; unreachable while quantities are validated positive
    if new_quantity == 0 {
        let next = PortfolioState {
            total_quantity: 0,
            average_cost: Decimal::ZERO,
            accumulated_loss: state.accumulated_loss,
        };
        return Ok((next, Decimal::ZERO));
    }

    let held_cost = state.average_cost * Decimal::from(state.total_quantity);
    let bought_cost = op.unit_cost() * Decimal::from(op.quantity());
    let average_cost = round2((held_cost + bought_cost) / Decimal::from(new_quantity));

    log::debug!(
        "buy {} @ {}: qty {} -> {}, avg {} -> {}",
        op.quantity(),
        op.unit_cost(),
        state.total_quantity,
        new_quantity,
        state.average_cost,
        average_cost
    );

    let next = PortfolioState {
        total_quantity: new_quantity,
        average_cost,
        accumulated_loss: round2(state.accumulated_loss),
    };
    Ok((next, Decimal::ZERO))
}

fn apply_sell(
    state: PortfolioState,
    op: &Operation,
) -> Result<(PortfolioState, Decimal), EngineError> {
    if op.quantity() > state.total_quantity {
        return Err(EngineError::InsufficientShares {
            requested: op.quantity(),
            held: state.total_quantity,
        });
    }

    let quantity = Decimal::from(op.quantity());
    // Unrounded, so rounding cannot flap the threshold comparison
    let total_value = op.unit_cost() * quantity;
    let gross_profit = round2((op.unit_cost() - state.average_cost) * quantity);

    let mut accumulated_loss = state.accumulated_loss;
    let mut tax = Decimal::ZERO;

    if gross_profit < Decimal::ZERO {
        // Losses accumulate regardless of the sale value
        accumulated_loss = round2(accumulated_loss + gross_profit.abs());
    } else if gross_profit > Decimal::ZERO && total_value > EXEMPTION_THRESHOLD {
        let offset = accumulated_loss.min(gross_profit);
        let taxable_profit = round2(gross_profit - offset);
        accumulated_loss = round2(accumulated_loss - offset);
        if taxable_profit > Decimal::ZERO {
            tax = round2(taxable_profit * TAX_RATE);
        }
    }
    // Exempt gains are untaxed and leave the carried loss untouched

    log::debug!(
        "sell {} @ {}: value {}, profit {}, tax {}, loss {} -> {}",
        op.quantity(),
        op.unit_cost(),
        total_value,
        gross_profit,
        tax,
        state.accumulated_loss,
        accumulated_loss
    );

    let next = PortfolioState {
        total_quantity: state.total_quantity - op.quantity(),
        // Average cost basis only changes on buys
        average_cost: state.average_cost,
        accumulated_loss,
    };
    Ok((next, tax))
}
