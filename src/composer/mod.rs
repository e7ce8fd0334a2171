//! Sacrament meeting program composer.
//!
//! Turns form selections (leader dropdowns, hymn inputs, roster toggles) into
//! the persisted `MeetingProgram`, and turns a stored program back into form
//! state for editing. Everything here is synchronous and total; reference
//! data is handed in through `ReferenceData` and never fetched.

pub mod callings;
pub mod events;
pub mod form;
pub mod hymns;
pub mod leaders;
pub mod person;
pub mod text;
pub mod toggles;

use crate::models::hymn::Hymn;
use crate::models::member::MemberRef;
use crate::models::organization::Organization;
use crate::models::sacrament_meeting::{MeetingProgram, StoredProgram};
use crate::models::user::UserRef;

pub use callings::{CallingVocabulary, OrganizationDirectory, OrganizationKind};
pub use events::FormEvent;
pub use form::{ComposerForm, FieldError};
pub use hymns::{HymnField, HymnTable};
pub use leaders::{BishopricRoster, LeaderChoice, LeaderField, LeaderSlot};
pub use person::{compose_person, parse_person, PersonValue};
pub use toggles::{RosterToggle, ToggleSet};

/// Maximum number of member-name suggestions returned.
pub const MAX_MEMBER_SUGGESTIONS: usize = 10;

/// Read-only lookup tables the composer works against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Users holding at least one bishopric role.
    pub users: Vec<UserRef>,
    pub organizations: Vec<Organization>,
    pub hymns: Vec<Hymn>,
    pub members: Vec<MemberRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerMode {
    Creating,
    Editing(i64),
}

impl ComposerMode {
    pub fn from_editing_id(id: Option<i64>) -> Self {
        id.map_or(ComposerMode::Creating, ComposerMode::Editing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComposerMode::Creating => "creating",
            ComposerMode::Editing(_) => "editing",
        }
    }

    pub fn editing_id(self) -> Option<i64> {
        match self {
            ComposerMode::Creating => None,
            ComposerMode::Editing(id) => Some(id),
        }
    }
}

pub struct Composer {
    roster: BishopricRoster,
    hymns: HymnTable,
    organizations: OrganizationDirectory,
    members: Vec<MemberRef>,
    mode: ComposerMode,
    open: bool,
    form: ComposerForm,
}

impl Composer {
    pub fn new(reference: ReferenceData) -> Self {
        Composer {
            roster: BishopricRoster::from_users(&reference.users),
            hymns: HymnTable::new(&reference.hymns),
            organizations: OrganizationDirectory::new(reference.organizations),
            members: reference.members,
            mode: ComposerMode::Creating,
            open: false,
            form: ComposerForm::default(),
        }
    }

    pub fn mode(&self) -> ComposerMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn form(&self) -> &ComposerForm {
        &self.form
    }

    pub fn roster(&self) -> &BishopricRoster {
        &self.roster
    }

    pub fn organizations(&self) -> &OrganizationDirectory {
        &self.organizations
    }

    // --- lifecycle ---

    /// Open a blank form: every toggle off, every list empty.
    pub fn open_create(&mut self) {
        self.mode = ComposerMode::Creating;
        self.form = ComposerForm::default();
        self.open = true;
    }

    /// Open the form on an existing program, reverse-deriving selections.
    pub fn open_edit(&mut self, record: &StoredProgram) {
        let p = &record.program;

        let mut toggles = ToggleSet::default();
        toggles.set(
            RosterToggle::ReleasesAndSustainments,
            !p.releases.is_empty() || !p.sustainments.is_empty(),
        );
        toggles.set(RosterToggle::NewMembers, !p.new_members.is_empty());
        toggles.set(RosterToggle::AaronicOrderings, !p.aaronic_orderings.is_empty());
        toggles.set(RosterToggle::ChildBlessings, !p.child_blessings.is_empty());
        // After new members, so the coupling is not undone.
        toggles.set(RosterToggle::Confirmations, !p.confirmations.is_empty());
        toggles.set(RosterToggle::StakeBusiness, !p.stake_business.trim().is_empty());

        self.form = ComposerForm {
            date: p.date.format("%Y-%m-%d").to_string(),
            presider: LeaderField::classify(LeaderSlot::Presider, &p.presider, &self.roster),
            director: LeaderField::classify(LeaderSlot::Director, &p.director, &self.roster),
            music_director: p.music_director.clone(),
            pianist: p.pianist.clone(),
            visiting_authority: p.visiting_authority.clone(),
            opening_hymn: p.opening_hymn.clone(),
            intermediate_hymn: p.intermediate_hymn.clone(),
            intermediate_hymn_type: p.intermediate_hymn_type,
            sacrament_hymn: p.sacrament_hymn.clone(),
            closing_hymn: p.closing_hymn.clone(),
            is_testimony_meeting: p.is_testimony_meeting,
            discourses: p.discourses.clone(),
            releases: p.releases.clone(),
            sustainments: p.sustainments.clone(),
            new_members: p.new_members.clone(),
            aaronic_orderings: p.aaronic_orderings.clone(),
            child_blessings: p.child_blessings.clone(),
            confirmations: p.confirmations.clone(),
            stake_business: p.stake_business.clone(),
            announcements: p.announcements.clone(),
            opening_prayer: p.opening_prayer.clone(),
            closing_prayer: p.closing_prayer.clone(),
            toggles,
        };
        self.mode = ComposerMode::Editing(record.id);
        self.open = true;
        self.recompute_visiting_authority();
    }

    /// Resume a form state held by the client.
    ///
    /// Leader selections are re-resolved against the current roster. The
    /// visiting-authority text is left exactly as the client sent it.
    pub fn resume(&mut self, mode: ComposerMode, form: ComposerForm) {
        self.mode = mode;
        self.form = form;
        self.open = true;
        for slot in [LeaderSlot::Presider, LeaderSlot::Director] {
            let field = self.leader(slot).reclassify(slot, &self.roster);
            *self.leader_mut(slot) = field;
        }
    }

    /// Close the form, discarding local edits.
    pub fn close(&mut self) {
        self.open = false;
        self.form = ComposerForm::default();
    }

    // --- reference data ---

    /// Replace the bishopric roster (e.g. when the user list arrives late).
    ///
    /// Current leader values are re-classified against the new roster.
    pub fn set_bishopric(&mut self, users: &[UserRef]) {
        let previous = std::mem::replace(&mut self.roster, BishopricRoster::from_users(users));
        for slot in [LeaderSlot::Presider, LeaderSlot::Director] {
            let field = self.leader(slot);
            // A departed member keeps the calling the old roster gave them.
            let field = match field.choice {
                LeaderChoice::Bishopric(_) => {
                    LeaderField::classify(slot, &field.value(&previous), &self.roster)
                }
                _ => field.reclassify(slot, &self.roster),
            };
            *self.leader_mut(slot) = field;
        }
        self.recompute_visiting_authority();
    }

    pub fn normalize_hymn(&self, raw: &str) -> String {
        self.hymns.normalize(raw)
    }

    pub fn hymn_suggestions(&self, query: &str) -> Vec<Hymn> {
        self.hymns.suggestions(query)
    }

    /// Members whose name contains `query` (case and accent insensitive).
    pub fn member_suggestions(&self, query: &str) -> Vec<&MemberRef> {
        let needle = text::search_key(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.members
            .iter()
            .filter(|m| text::search_key(&m.name).contains(&needle))
            .take(MAX_MEMBER_SUGGESTIONS)
            .collect()
    }

    pub fn callings_for(&self, organization_id: i64) -> CallingVocabulary {
        self.organizations.vocabulary_for(organization_id)
    }

    pub fn leader_value(&self, slot: LeaderSlot) -> String {
        self.leader(slot).value(&self.roster)
    }

    fn leader(&self, slot: LeaderSlot) -> &LeaderField {
        match slot {
            LeaderSlot::Presider => &self.form.presider,
            LeaderSlot::Director => &self.form.director,
        }
    }

    fn leader_mut(&mut self, slot: LeaderSlot) -> &mut LeaderField {
        match slot {
            LeaderSlot::Presider => &mut self.form.presider,
            LeaderSlot::Director => &mut self.form.director,
        }
    }

    // --- events ---

    /// Apply one form interaction. Ignored while the form is closed.
    pub fn apply(&mut self, event: FormEvent) {
        if !self.open {
            log::debug!("Ignoring form event on closed composer: {event:?}");
            return;
        }
        match event {
            FormEvent::SetToggle { toggle, enabled } => self.form.toggles.set(toggle, enabled),
            FormEvent::HymnBlur { field } => {
                let normalized = self.hymns.normalize(self.form.hymn(field));
                *self.form.hymn_mut(field) = normalized;
            }
            FormEvent::SelectHymn { field, number } => {
                *self.form.hymn_mut(field) = self.hymns.normalize(&number.to_string());
            }
            FormEvent::SetLeaderValue { slot, value } => {
                *self.leader_mut(slot) = LeaderField::classify(slot, &value, &self.roster);
                self.leader_changed(slot);
            }
            FormEvent::SelectLeader { slot, choice } => {
                self.leader_mut(slot).select(choice);
                self.leader_changed(slot);
            }
            FormEvent::SetLeaderText { slot, name, calling } => {
                self.leader_mut(slot).set_text(slot, &name, &calling);
                self.leader_changed(slot);
            }
            // Kept as typed, trailing separators included; roster names are
            // stripped on director changes and at submission.
            FormEvent::SetVisitingAuthority { value } => self.form.visiting_authority = value,
            FormEvent::SetTestimonyMeeting { enabled } => self.form.is_testimony_meeting = enabled,
        }
    }

    fn leader_changed(&mut self, slot: LeaderSlot) {
        if slot == LeaderSlot::Director {
            self.recompute_visiting_authority();
        }
    }

    fn director_is_bishopric(&self) -> bool {
        let director = parse_person(&self.leader_value(LeaderSlot::Director));
        self.roster.contains(&director.name)
    }

    fn recompute_visiting_authority(&mut self) {
        if self.director_is_bishopric() {
            self.form.visiting_authority =
                leaders::strip_roster_names(&self.form.visiting_authority, &self.roster);
        }
    }

    // --- submission ---

    /// Build the payload for create/update.
    ///
    /// Fails only when the date is missing or malformed.
    pub fn assemble(&self) -> Result<MeetingProgram, Vec<FieldError>> {
        let f = &self.form;
        let date = form::validate_date(&f.date).map_err(|e| vec![e])?;
        let t = &f.toggles;

        let visiting_authority = if self.director_is_bishopric() {
            leaders::strip_roster_names(&f.visiting_authority, &self.roster)
        } else {
            f.visiting_authority.trim().to_string()
        };

        let discourses = if f.is_testimony_meeting {
            Vec::new()
        } else {
            form::clean_discourses(&f.discourses)
        };

        let calling_changes = t.is_enabled(RosterToggle::ReleasesAndSustainments);
        let stake_business = if t.is_enabled(RosterToggle::StakeBusiness) {
            f.stake_business.trim().to_string()
        } else {
            String::new()
        };

        Ok(MeetingProgram {
            date,
            presider: self.leader_value(LeaderSlot::Presider),
            director: self.leader_value(LeaderSlot::Director),
            music_director: f.music_director.trim().to_string(),
            pianist: f.pianist.trim().to_string(),
            visiting_authority,
            opening_hymn: self.hymns.normalize(f.opening_hymn.trim()),
            intermediate_hymn: self.hymns.normalize(f.intermediate_hymn.trim()),
            intermediate_hymn_type: f.intermediate_hymn_type,
            sacrament_hymn: self.hymns.normalize(f.sacrament_hymn.trim()),
            closing_hymn: self.hymns.normalize(f.closing_hymn.trim()),
            is_testimony_meeting: f.is_testimony_meeting,
            discourses,
            releases: form::gated(calling_changes, form::clean_calling_changes(&f.releases)),
            sustainments: form::gated(calling_changes, form::clean_calling_changes(&f.sustainments)),
            new_members: form::gated(
                t.is_enabled(RosterToggle::NewMembers),
                form::clean_names(&f.new_members),
            ),
            aaronic_orderings: form::gated(
                t.is_enabled(RosterToggle::AaronicOrderings),
                form::clean_names(&f.aaronic_orderings),
            ),
            child_blessings: form::gated(
                t.is_enabled(RosterToggle::ChildBlessings),
                form::clean_names(&f.child_blessings),
            ),
            confirmations: form::gated(
                t.is_enabled(RosterToggle::Confirmations),
                form::clean_names(&f.confirmations),
            ),
            stake_business,
            announcements: f.announcements.trim().to_string(),
            opening_prayer: f.opening_prayer.trim().to_string(),
            closing_prayer: f.closing_prayer.trim().to_string(),
        })
    }
}
