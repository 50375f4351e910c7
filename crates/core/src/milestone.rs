//! Signature milestones and the rules for when a tracked petition is due a
//! notification.

/// Signatures needed before the government must respond.
pub const RESPONSE_THRESHOLD: i64 = 10_000;

/// Signatures needed before Parliament considers a debate.
pub const DEBATE_THRESHOLD: i64 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Milestone {
    TenThousand,
    HundredThousand,
}

impl Milestone {
    /// Every milestone, lowest threshold first.
    pub const ALL: [Milestone; 2] = [Milestone::TenThousand, Milestone::HundredThousand];

    pub fn threshold(self) -> i64 {
        match self {
            Milestone::TenThousand => RESPONSE_THRESHOLD,
            Milestone::HundredThousand => DEBATE_THRESHOLD,
        }
    }

    /// Short label used in log events.
    pub fn label(self) -> &'static str {
        match self {
            Milestone::TenThousand => "10k",
            Milestone::HundredThousand => "100k",
        }
    }

    pub fn is_reached(self, signature_count: i64) -> bool {
        signature_count >= self.threshold()
    }
}

/// The four per-record flags that drive notification delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneFlags {
    pub notify_at_10k: bool,
    pub notify_at_100k: bool,
    pub notified_10k: bool,
    pub notified_100k: bool,
}

impl Default for MilestoneFlags {
    fn default() -> Self {
        Self {
            notify_at_10k: true,
            notify_at_100k: true,
            notified_10k: false,
            notified_100k: false,
        }
    }
}

impl MilestoneFlags {
    pub fn is_requested(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::TenThousand => self.notify_at_10k,
            Milestone::HundredThousand => self.notify_at_100k,
        }
    }

    pub fn is_notified(&self, milestone: Milestone) -> bool {
        match milestone {
            Milestone::TenThousand => self.notified_10k,
            Milestone::HundredThousand => self.notified_100k,
        }
    }

    /// Whether any requested milestone is still waiting to be delivered.
    pub fn has_pending(&self) -> bool {
        Milestone::ALL
            .iter()
            .any(|m| self.is_requested(*m) && !self.is_notified(*m))
    }

    /// Milestones that were requested, not yet delivered, and are reached by
    /// `signature_count`. Lowest threshold first.
    pub fn due(&self, signature_count: i64) -> Vec<Milestone> {
        Milestone::ALL
            .into_iter()
            .filter(|m| self.is_requested(*m) && !self.is_notified(*m))
            .filter(|m| m.is_reached(signature_count))
            .collect()
    }
}
