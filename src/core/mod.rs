pub mod engine;
pub mod operation;
pub mod portfolio;
pub mod record;

// Flat public surface for domain types and functions.
pub use engine::{calculate_taxes, EngineError, EXEMPTION_THRESHOLD, TAX_RATE};
pub use operation::{Operation, OperationError, OperationKind};
pub use portfolio::PortfolioState;
pub use record::{read_batch, records_to_operations, write_batch, OperationRecord, TaxRecord};
