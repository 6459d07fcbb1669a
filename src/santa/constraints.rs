use std::collections::HashMap;

use crate::records::{Employee, PreviousAssignment};
use super::types::ForbiddenIndex;

/// Turns last round's pairings into this round's forbidden recipients.
///
/// Pairings whose giver or child is no longer on the roster are dropped
/// without complaint; people join and leave between rounds.
pub fn build_forbidden_index(
    employees: &[Employee],
    previous: Option<&[PreviousAssignment]>,
) -> ForbiddenIndex {
    let mut forbidden = ForbiddenIndex::unconstrained(employees.len());
    let Some(previous) = previous else {
        return forbidden;
    };

    let index_by_email: HashMap<&str, usize> = employees
        .iter()
        .enumerate()
        .map(|(index, e)| (e.email.as_str(), index))
        .collect();

    let mut stale = 0usize;
    for pairing in previous {
        let giver = index_by_email.get(pairing.giver_email.as_str());
        let child = index_by_email.get(pairing.child_email.as_str());
        match (giver, child) {
            (Some(&giver), Some(&child)) => forbidden.forbid(giver, child),
            _ => stale += 1,
        }
    }

    log::debug!(
        "previous round: {} pairing(s) applied, {} ignored as stale",
        forbidden.constrained_count(),
        stale
    );
    forbidden
}
