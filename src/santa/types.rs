/// Per-giver recipient that is off limits this round, indexed by position in
/// the current participant list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForbiddenIndex {
    entries: Vec<Option<usize>>,
}

impl ForbiddenIndex {
    /// No constraints for any of `len` participants.
    pub fn unconstrained(len: usize) -> Self {
        Self {
            entries: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, giver: usize) -> Option<usize> {
        self.entries.get(giver).copied().flatten()
    }

    /// Overwrites whatever was recorded for `giver` before.
    pub(crate) fn forbid(&mut self, giver: usize, recipient: usize) {
        if let Some(slot) = self.entries.get_mut(giver) {
            *slot = Some(recipient);
        }
    }

    /// Number of givers that carry a constraint.
    pub fn constrained_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    /// Whether `giver` may be paired with `recipient`.
    pub fn allows(&self, giver: usize, recipient: usize) -> bool {
        giver != recipient && self.get(giver) != Some(recipient)
    }

    /// Whether a full candidate permutation respects every constraint.
    pub fn permits(&self, recipients: &[usize]) -> bool {
        recipients.len() == self.len()
            && recipients
                .iter()
                .enumerate()
                .all(|(giver, &recipient)| self.allows(giver, recipient))
    }
}

/// Giver index → recipient index, guaranteed to be a permutation without
/// fixed points that respects the [`ForbiddenIndex`] it was drawn against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    recipients: Vec<usize>,
}

impl Assignment {
    /// Accepts `recipients` only if it is a permutation allowed by `forbidden`.
    pub fn new(recipients: Vec<usize>, forbidden: &ForbiddenIndex) -> Option<Self> {
        let mut seen = vec![false; recipients.len()];
        for &recipient in &recipients {
            match seen.get_mut(recipient) {
                Some(slot) if !*slot => *slot = true,
                _ => return None,
            }
        }

        forbidden
            .permits(&recipients)
            .then_some(Self { recipients })
    }

    /// For callers that already checked `recipients` with
    /// [`ForbiddenIndex::permits`] and know it is a permutation.
    pub(crate) fn from_checked(recipients: Vec<usize>) -> Self {
        Self { recipients }
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn recipient_of(&self, giver: usize) -> usize {
        self.recipients[giver]
    }

    /// `(giver, recipient)` pairs in giver order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.recipients.iter().copied().enumerate()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.recipients
    }
}
