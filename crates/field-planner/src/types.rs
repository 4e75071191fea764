//! Field geometry submitted by the planning client

use crate::{PlanError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Upper bound on rows accepted for one field.
pub const MAX_ROWS: u64 = 100_000;

/// Exact token that selects the vertical traversal branch.
pub const VERTICAL: &str = "vertical";

/// A strictly positive length in feet.
///
/// The number is kept exactly as the client sent it so that the instruction
/// string echoes it in the same textual form (`100` stays `100`, `2.5` stays
/// `2.5`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dimension(Number);

impl Dimension {
    pub fn new(value: Number) -> Result<Self> {
        Self::validate("dimension", value)
    }

    fn validate(field: &'static str, value: Number) -> Result<Self> {
        match value.as_f64() {
            Some(v) if v.is_finite() && v > 0.0 => Ok(Self(value)),
            _ => Err(PlanError::invalid(field, "must be a positive number")),
        }
    }

    fn from_value(field: &'static str, value: Option<&Value>) -> Result<Self> {
        match value {
            None | Some(Value::Null) => Err(PlanError::invalid(field, "is required")),
            Some(Value::Number(n)) => Self::validate(field, n.clone()),
            Some(other) => Err(PlanError::invalid(
                field,
                format!("expected a number, got {other}"),
            )),
        }
    }

    /// Whole number of feet
    pub fn from_feet(feet: u64) -> Result<Self> {
        Self::new(Number::from(feet))
    }

    pub fn as_f64(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }

    pub fn as_number(&self) -> &Number {
        &self.0
    }
}

impl TryFrom<f64> for Dimension {
    type Error = PlanError;

    fn try_from(value: f64) -> Result<Self> {
        let number = Number::from_f64(value)
            .ok_or_else(|| PlanError::invalid("dimension", "must be a finite number"))?;
        Self::new(number)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row direction for the traversal.
///
/// Only the exact, case-sensitive token `"vertical"` selects
/// [`Orientation::Vertical`]. Anything else, including a missing or
/// differently cased value, is carried as [`Orientation::Other`] and
/// planned like a horizontal field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Other(String),
}

impl Orientation {
    pub fn from_token(token: &str) -> Self {
        if token == VERTICAL {
            Orientation::Vertical
        } else {
            Orientation::Other(token.to_string())
        }
    }

    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::from_token(s),
            None | Some(Value::Null) => Orientation::Other(String::new()),
            Some(other) => Orientation::Other(other.to_string()),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// Raw plan body as posted by the control client.
///
/// Fields are left untyped so that validation can name the offending field
/// instead of failing the whole body at deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldPlanRequest {
    #[serde(default)]
    pub height: Option<Value>,
    #[serde(default)]
    pub width: Option<Value>,
    #[serde(default)]
    pub num_rows: Option<Value>,
    #[serde(default)]
    pub orientation: Option<Value>,
    /// Spacing between rows in feet
    #[serde(default)]
    pub distance: Option<Value>,
}

impl FieldPlanRequest {
    /// Read a request from an arbitrary JSON body.
    pub fn from_json(body: &Value) -> Result<Self> {
        if !body.is_object() {
            return Err(PlanError::invalid("body", "expected a JSON object"));
        }
        serde_json::from_value(body.clone())
            .map_err(|e| PlanError::invalid("body", e.to_string()))
    }
}

/// Validated field geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldPlan {
    pub height_feet: Dimension,
    pub width_feet: Dimension,
    pub num_rows: u32,
    pub orientation: Orientation,
    pub row_spacing_feet: Dimension,
}

impl FieldPlan {
    pub fn new(
        height_feet: Dimension,
        width_feet: Dimension,
        num_rows: u32,
        orientation: Orientation,
        row_spacing_feet: Dimension,
    ) -> Self {
        Self {
            height_feet,
            width_feet,
            num_rows,
            orientation,
            row_spacing_feet,
        }
    }

    /// Total field area in square feet; an integer when both sides are integers.
    pub fn area(&self) -> Number {
        let (h, w) = (self.height_feet.as_number(), self.width_feet.as_number());
        if let (Some(h), Some(w)) = (h.as_u64(), w.as_u64()) {
            if let Some(area) = h.checked_mul(w) {
                return Number::from(area);
            }
        }
        let area = self.height_feet.as_f64() * self.width_feet.as_f64();
        Number::from_f64(area).unwrap_or_else(|| Number::from(u64::MAX))
    }
}

impl TryFrom<FieldPlanRequest> for FieldPlan {
    type Error = PlanError;

    fn try_from(req: FieldPlanRequest) -> Result<Self> {
        let height_feet = Dimension::from_value("height", req.height.as_ref())?;
        let width_feet = Dimension::from_value("width", req.width.as_ref())?;
        let row_spacing_feet = Dimension::from_value("distance", req.distance.as_ref())?;
        let num_rows = parse_rows(req.num_rows.as_ref())?;
        let orientation = Orientation::from_value(req.orientation.as_ref());

        Ok(Self {
            height_feet,
            width_feet,
            num_rows,
            orientation,
            row_spacing_feet,
        })
    }
}

fn parse_rows(value: Option<&Value>) -> Result<u32> {
    const FIELD: &str = "num_rows";
    let n = match value {
        None | Some(Value::Null) => return Err(PlanError::invalid(FIELD, "is required")),
        Some(Value::Number(n)) => n,
        Some(other) => {
            return Err(PlanError::invalid(
                FIELD,
                format!("expected an integer, got {other}"),
            ))
        }
    };
    if let Some(rows) = n.as_u64() {
        if rows > MAX_ROWS {
            return Err(PlanError::invalid(
                FIELD,
                format!("must be at most {MAX_ROWS}"),
            ));
        }
        return u32::try_from(rows).map_err(|_| PlanError::invalid(FIELD, "out of range"));
    }
    if n.as_i64().is_some() {
        Err(PlanError::invalid(FIELD, "must be a non-negative integer"))
    } else {
        Err(PlanError::invalid(FIELD, "must be an integer"))
    }
}
