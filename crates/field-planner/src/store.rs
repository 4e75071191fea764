use crate::{plan, FieldPlan, FieldPlanRequest, InstructionString, PlanError, Result};
use parking_lot::RwLock;
use std::sync::Arc;

/// Holds the single current field plan.
///
/// A plan is replaced as one `Arc`, so a poll never pairs the row count of
/// one submission with the orientation of another.
#[derive(Debug, Default)]
pub struct PlanStore {
    current: RwLock<Option<Arc<FieldPlan>>>,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored plan with an already validated one
    pub fn submit_plan(&self, plan: FieldPlan) -> Arc<FieldPlan> {
        let plan = Arc::new(plan);
        *self.current.write() = Some(Arc::clone(&plan));
        tracing::info!(
            "Field plan stored: {} rows, vertical={}, {}x{} ft, spacing {} ft",
            plan.num_rows,
            plan.orientation.is_vertical(),
            plan.height_feet,
            plan.width_feet,
            plan.row_spacing_feet
        );
        plan
    }

    /// Validate a raw request and store it. A rejected request leaves the
    /// previous plan in place.
    pub fn submit_request(&self, req: FieldPlanRequest) -> Result<Arc<FieldPlan>> {
        let plan = FieldPlan::try_from(req).map_err(|e| {
            tracing::warn!("Rejected field plan: {}", e);
            e
        })?;
        Ok(self.submit_plan(plan))
    }

    pub fn current(&self) -> Result<Arc<FieldPlan>> {
        self.current
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(PlanError::PlanNotAvailable)
    }

    pub fn has_plan(&self) -> bool {
        self.current.read().is_some()
    }

    /// Plan the traversal for whatever plan is currently stored
    pub fn instruction(&self) -> Result<InstructionString> {
        let field = self.current()?;
        Ok(plan(&field))
    }
}
