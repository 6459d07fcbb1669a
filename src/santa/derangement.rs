use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{SantaError, SantaResult};
use super::types::{Assignment, ForbiddenIndex};

/// Upper bound on shuffles tried before giving up.
pub const MAX_ATTEMPTS: u32 = 10_000;

/// Draws a random assignment that respects `forbidden`.
///
/// Each attempt is a full Fisher-Yates shuffle of the participant indexes,
/// kept only if nobody draws themselves or their forbidden recipient. After
/// [`MAX_ATTEMPTS`] rejected shuffles the constraints are treated as
/// unsatisfiable. Pass a seeded RNG to get a reproducible draw.
pub fn build_derangement<R: Rng + ?Sized>(
    forbidden: &ForbiddenIndex,
    rng: &mut R,
) -> SantaResult<Assignment> {
    let size = forbidden.len();
    if size < 2 {
        return Err(SantaError::TooFewParticipants { found: size });
    }

    let mut candidate: Vec<usize> = (0..size).collect();
    for attempt in 1..=MAX_ATTEMPTS {
        candidate.shuffle(rng);
        if forbidden.permits(&candidate) {
            log::debug!("derangement of {} found after {} attempt(s)", size, attempt);
            return Ok(Assignment::from_checked(candidate));
        }
    }

    log::warn!(
        "no valid derangement of {} participants within {} attempts",
        size,
        MAX_ATTEMPTS
    );
    Err(SantaError::DerangementUnsatisfiable {
        attempts: MAX_ATTEMPTS,
    })
}
