//! Serpentine traversal planning
//!
//! The firmware consumes a compact instruction string of the form
//! `<leading>-<spacing>_<moves>`, where `<leading>` is the row length in feet,
//! `<spacing>` the distance between rows and `<moves>` a sequence of move codes.

use crate::{FieldPlan, PlanError, Result};
use std::fmt;
use std::str::FromStr;

/// One step of the traversal path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCode {
    /// Drive a full row length (`F`)
    Full,
    /// Drive the short connector between rows (`f`)
    Short,
    /// Turn left (`L`)
    Left,
    /// Turn right (`R`)
    Right,
}

impl MoveCode {
    pub fn as_char(self) -> char {
        match self {
            MoveCode::Full => 'F',
            MoveCode::Short => 'f',
            MoveCode::Left => 'L',
            MoveCode::Right => 'R',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(MoveCode::Full),
            'f' => Some(MoveCode::Short),
            'L' => Some(MoveCode::Left),
            'R' => Some(MoveCode::Right),
            _ => None,
        }
    }

    pub fn is_turn(self) -> bool {
        matches!(self, MoveCode::Left | MoveCode::Right)
    }
}

/// Row end turning left into the next row: `FLfL`
const LEFT_U_TURN: [MoveCode; 4] = [
    MoveCode::Full,
    MoveCode::Left,
    MoveCode::Short,
    MoveCode::Left,
];
/// Row end turning right into the next row: `FRfR`
const RIGHT_U_TURN: [MoveCode; 4] = [
    MoveCode::Full,
    MoveCode::Right,
    MoveCode::Short,
    MoveCode::Right,
];

/// Wire-format path plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionString {
    leading: String,
    spacing: String,
    moves: Vec<MoveCode>,
}

impl InstructionString {
    /// Row length as rendered on the wire
    pub fn leading(&self) -> &str {
        &self.leading
    }

    pub fn spacing(&self) -> &str {
        &self.spacing
    }

    pub fn moves(&self) -> &[MoveCode] {
        &self.moves
    }

    pub fn turns(&self) -> usize {
        self.moves.iter().filter(|m| m.is_turn()).count()
    }
}

impl fmt::Display for InstructionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}_", self.leading, self.spacing)?;
        for m in &self.moves {
            write!(f, "{}", m.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for InstructionString {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        let (head, codes) = s
            .split_once('_')
            .ok_or_else(|| PlanError::InvalidInstruction(format!("missing '_' in {s:?}")))?;

        // an exponent such as 1e-7 may itself contain '-'
        let sep = head
            .char_indices()
            .find(|&(i, c)| c == '-' && i > 0 && !head[..i].ends_with(['e', 'E']))
            .map(|(i, _)| i)
            .ok_or_else(|| PlanError::InvalidInstruction(format!("missing '-' in {s:?}")))?;
        let (leading, spacing) = (&head[..sep], &head[sep + 1..]);
        for part in [leading, spacing] {
            if part.parse::<f64>().is_err() {
                return Err(PlanError::InvalidInstruction(format!(
                    "not a number: {part:?}"
                )));
            }
        }

        let moves = codes
            .chars()
            .map(|c| {
                MoveCode::from_char(c)
                    .ok_or_else(|| PlanError::InvalidInstruction(format!("unknown move {c:?}")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            leading: leading.to_string(),
            spacing: spacing.to_string(),
            moves,
        })
    }
}

/// Build the serpentine coverage path for a field.
///
/// Every row boundary `i` in `1..num_rows` adds one U-turn, alternating
/// direction with the parity of `i`. Vertical fields run along the height and
/// start turning right; any other orientation runs along the width, opens
/// with a right turn and then starts turning left. Fields of zero or one row
/// produce only the fixed opening and closing moves.
pub fn plan(field: &FieldPlan) -> InstructionString {
    let vertical = field.orientation.is_vertical();
    let boundaries = field.num_rows.saturating_sub(1) as usize;
    let mut moves = Vec::with_capacity(boundaries * 4 + 2);

    if !vertical {
        moves.push(MoveCode::Right);
    }
    for i in 1..field.num_rows {
        let even = i % 2 == 0;
        let turn = match (vertical, even) {
            (true, true) | (false, false) => &LEFT_U_TURN,
            (true, false) | (false, true) => &RIGHT_U_TURN,
        };
        moves.extend_from_slice(turn);
    }
    moves.push(MoveCode::Full);

    let leading = if vertical {
        &field.height_feet
    } else {
        &field.width_feet
    };

    InstructionString {
        leading: leading.to_string(),
        spacing: field.row_spacing_feet.to_string(),
        moves,
    }
}
