use serde::{Deserialize, Serialize};

/// Optional roster sections of the program, each gated by its own switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterToggle {
    ReleasesAndSustainments,
    NewMembers,
    AaronicOrderings,
    ChildBlessings,
    Confirmations,
    StakeBusiness,
}

impl RosterToggle {
    pub const ALL: [RosterToggle; 6] = [
        RosterToggle::ReleasesAndSustainments,
        RosterToggle::NewMembers,
        RosterToggle::AaronicOrderings,
        RosterToggle::ChildBlessings,
        RosterToggle::Confirmations,
        RosterToggle::StakeBusiness,
    ];
}

/// Enabling the trigger (left) also enables the target (right).
/// Disabling never propagates.
pub const TOGGLE_COUPLINGS: &[(RosterToggle, RosterToggle)] = &[
    (RosterToggle::Confirmations, RosterToggle::NewMembers),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToggleSet {
    pub releases_and_sustainments: bool,
    pub new_members: bool,
    pub aaronic_orderings: bool,
    pub child_blessings: bool,
    pub confirmations: bool,
    pub stake_business: bool,
}

impl ToggleSet {
    pub fn is_enabled(&self, toggle: RosterToggle) -> bool {
        match toggle {
            RosterToggle::ReleasesAndSustainments => self.releases_and_sustainments,
            RosterToggle::NewMembers => self.new_members,
            RosterToggle::AaronicOrderings => self.aaronic_orderings,
            RosterToggle::ChildBlessings => self.child_blessings,
            RosterToggle::Confirmations => self.confirmations,
            RosterToggle::StakeBusiness => self.stake_business,
        }
    }

    fn slot(&mut self, toggle: RosterToggle) -> &mut bool {
        match toggle {
            RosterToggle::ReleasesAndSustainments => &mut self.releases_and_sustainments,
            RosterToggle::NewMembers => &mut self.new_members,
            RosterToggle::AaronicOrderings => &mut self.aaronic_orderings,
            RosterToggle::ChildBlessings => &mut self.child_blessings,
            RosterToggle::Confirmations => &mut self.confirmations,
            RosterToggle::StakeBusiness => &mut self.stake_business,
        }
    }

    /// Flip one switch, following the coupling table on enable.
    pub fn set(&mut self, toggle: RosterToggle, enabled: bool) {
        *self.slot(toggle) = enabled;
        if !enabled {
            return;
        }
        for &(trigger, target) in TOGGLE_COUPLINGS {
            // Recursion stops at targets already on, so cyclic rules terminate.
            if trigger == toggle && !self.is_enabled(target) {
                self.set(target, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmations_enable_new_members() {
        let mut t = ToggleSet::default();
        t.set(RosterToggle::Confirmations, true);
        assert!(t.confirmations);
        assert!(t.new_members);
    }

    #[test]
    fn coupling_is_one_directional() {
        let mut t = ToggleSet::default();
        t.set(RosterToggle::Confirmations, true);
        t.set(RosterToggle::NewMembers, false);
        assert!(t.confirmations);
        assert!(!t.new_members);

        let mut t = ToggleSet::default();
        t.set(RosterToggle::NewMembers, true);
        assert!(!t.confirmations);
    }

    #[test]
    fn disabling_trigger_leaves_target_on() {
        let mut t = ToggleSet::default();
        t.set(RosterToggle::Confirmations, true);
        t.set(RosterToggle::Confirmations, false);
        assert!(t.new_members);
    }
}
