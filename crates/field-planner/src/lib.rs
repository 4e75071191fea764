//! field-planner: field geometry intake and row-by-row traversal plans
//!
//! A control client submits the field's size, row count, orientation and row
//! spacing. The rover firmware later polls for a compact instruction string
//! describing a serpentine path over the rows.

mod error;
pub use error::{PlanError, Result};

mod types;
pub use types::{Dimension, FieldPlan, FieldPlanRequest, Orientation, MAX_ROWS, VERTICAL};

mod planner;
pub use planner::{plan, InstructionString, MoveCode};

mod store;
pub use store::PlanStore;

/// Initialize the field planner
pub fn init() {
    tracing::info!("Initializing field planner");
}
