//! Program composer tests: hymn normalization, person fields, leader
//! resolution, roster toggles and submission assembly.
//!
//! No database needed; reference data is built in memory.

use chrono::NaiveDate;

use ward_admin::composer::{
    compose_person, parse_person, Composer, ComposerMode, FormEvent, HymnField, LeaderChoice,
    LeaderSlot, PersonValue, ReferenceData, RosterToggle,
};
use ward_admin::models::hymn::Hymn;
use ward_admin::models::member::MemberRef;
use ward_admin::models::organization::Organization;
use ward_admin::models::sacrament_meeting::{
    CallingChange, Discourse, MeetingProgram, StoredProgram,
};
use ward_admin::models::user::UserRef;

const BISHOP: &str = "Juan Pérez";
const COUNSELOR: &str = "Pedro Ruiz";

fn reference() -> ReferenceData {
    ReferenceData {
        users: vec![
            UserRef { id: 1, display_name: BISHOP.into(), roles: vec!["obispo".into()] },
            UserRef { id: 2, display_name: COUNSELOR.into(), roles: vec!["consejero_obispo".into()] },
        ],
        organizations: vec![
            Organization { id: 10, name: "barrio".into(), label: "Barrio".into(), organization_type: "barrio".into() },
            Organization { id: 11, name: "obispado".into(), label: "Obispado".into(), organization_type: "obispado".into() },
            Organization {
                id: 12,
                name: "sociedad-socorro".into(),
                label: "Sociedad de Socorro".into(),
                organization_type: "sociedad_socorro".into(),
            },
        ],
        hymns: vec![
            Hymn { number: 2, title: "The Spirit of God".into() },
            Hymn { number: 169, title: "As Now We Take the Sacrament".into() },
            Hymn { number: 193, title: "I Stand All Amazed".into() },
        ],
        members: vec![MemberRef { id: 100, name: "Eva Soto".into() }],
    }
}

fn sunday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// A composer open on a new form with the date already filled in.
fn open_with_date() -> Composer {
    let mut composer = Composer::new(reference());
    composer.open_create();
    let mut form = composer.form().clone();
    form.date = "2026-10-18".into();
    composer.resume(ComposerMode::Creating, form);
    composer
}

// ============================================================================
// Hymns
// ============================================================================

#[test]
fn known_hymn_numbers_normalize_to_canonical_form() {
    let composer = Composer::new(reference());
    for input in ["169", "169 ", "169 - as now", "169xyz", "  169"] {
        assert_eq!(composer.normalize_hymn(input), "169 - As Now We Take the Sacrament", "{input:?}");
    }
}

#[test]
fn hymn_normalization_is_idempotent() {
    let composer = Composer::new(reference());
    for input in ["2", "193 - whatever", "500", "Amazing Grace", ""] {
        let once = composer.normalize_hymn(input);
        assert_eq!(composer.normalize_hymn(&once), once, "{input:?}");
    }
}

#[test]
fn unknown_hymns_are_left_unchanged() {
    let composer = Composer::new(reference());
    for input in ["500", "500 - Not In Table", "Amazing Grace", "", "-3"] {
        assert_eq!(composer.normalize_hymn(input), input);
    }
}

#[test]
fn hymn_blur_normalizes_the_field() {
    let mut composer = open_with_date();
    let mut form = composer.form().clone();
    form.opening_hymn = "2".into();
    composer.resume(ComposerMode::Creating, form);
    composer.apply(FormEvent::HymnBlur { field: HymnField::Opening });
    assert_eq!(composer.form().opening_hymn, "2 - The Spirit of God");
}

#[test]
fn hymn_suggestions_match_number_prefix_or_title() {
    let composer = Composer::new(reference());
    let numbers: Vec<i64> = composer.hymn_suggestions("1").iter().map(|h| h.number).collect();
    assert_eq!(numbers, vec![169, 193]);

    let titles: Vec<String> = composer.hymn_suggestions("sacrament").into_iter().map(|h| h.title).collect();
    assert_eq!(titles, vec!["As Now We Take the Sacrament"]);
}

// ============================================================================
// Person fields
// ============================================================================

#[test]
fn compose_then_parse_round_trips() {
    for (name, calling) in [("Juan Pérez", "Obispo"), ("Ana", ""), ("Luis Soto", "Sumo Consejero")] {
        let parsed = parse_person(&compose_person(name, calling));
        assert_eq!(parsed, PersonValue { name: name.into(), calling: calling.into() });
    }
    assert_eq!(compose_person("", "Obispo"), "");
    assert_eq!(compose_person("   ", "Obispo"), "");
}

#[test]
fn parse_accepts_all_three_encodings() {
    let expected = PersonValue { name: "Juan Pérez".into(), calling: "Obispo".into() };
    assert_eq!(parse_person("Juan Pérez | Obispo"), expected);
    assert_eq!(parse_person("Juan Pérez, Obispo"), expected);
    assert_eq!(
        parse_person("Juan Pérez"),
        PersonValue { name: "Juan Pérez".into(), calling: "".into() }
    );
}

// ============================================================================
// Leaders
// ============================================================================

#[test]
fn editing_non_roster_presider_uses_visiting_authority() {
    let mut program = MeetingProgram::empty(sunday());
    program.presider = "Ana Gómez | Obispo".into();

    let mut composer = Composer::new(reference());
    composer.open_edit(&StoredProgram { id: 7, program });

    let presider = &composer.form().presider;
    assert_eq!(presider.choice, LeaderChoice::Other);
    assert_eq!(presider.name, "Ana Gómez");
    assert_eq!(presider.calling, "Obispo");
    assert_eq!(presider.authority_type.as_deref(), Some("Obispo"));
    assert_eq!(composer.mode(), ComposerMode::Editing(7));
    assert_eq!(LeaderSlot::Presider.descriptor().other_value, "visiting_authority");
}

#[test]
fn editing_unmatched_calling_leaves_authority_type_empty() {
    let mut program = MeetingProgram::empty(sunday());
    program.presider = "Ana Gómez | Misionera de Servicio".into();

    let mut composer = Composer::new(reference());
    composer.open_edit(&StoredProgram { id: 7, program });
    assert_eq!(composer.form().presider.choice, LeaderChoice::Other);
    assert_eq!(composer.form().presider.authority_type, None);
}

#[test]
fn editing_roster_leader_selects_the_member() {
    let mut program = MeetingProgram::empty(sunday());
    program.director = format!("{COUNSELOR}, Consejero");

    let mut composer = Composer::new(reference());
    composer.open_edit(&StoredProgram { id: 3, program });
    assert_eq!(composer.form().director.choice, LeaderChoice::Bishopric(COUNSELOR.into()));
    assert!(composer.form().director.name.is_empty());
    // Re-saved in the pipe format with the roster calling.
    assert_eq!(
        composer.leader_value(LeaderSlot::Director),
        "Pedro Ruiz | Consejero del Obispado"
    );
}

#[test]
fn selecting_a_bishopric_director_strips_roster_names_from_visitors() {
    let mut composer = open_with_date();
    composer.apply(FormEvent::SetVisitingAuthority {
        value: format!("Hno. Castro, {BISHOP}, Sra. Vidal,  {COUNSELOR} "),
    });
    // No bishopric director yet: the list is left as typed.
    assert!(composer.form().visiting_authority.contains(BISHOP));

    composer.apply(FormEvent::SelectLeader {
        slot: LeaderSlot::Director,
        choice: LeaderChoice::Bishopric(BISHOP.into()),
    });
    assert_eq!(composer.form().visiting_authority, "Hno. Castro, Sra. Vidal");
}

#[test]
fn visitors_kept_when_director_is_assigned_leader() {
    let mut composer = open_with_date();
    composer.apply(FormEvent::SetLeaderText {
        slot: LeaderSlot::Director,
        name: "Marta Díaz".into(),
        calling: "Líder asignada".into(),
    });
    composer.apply(FormEvent::SetVisitingAuthority { value: format!("{BISHOP}, Hno. Castro") });
    let program = composer.assemble().unwrap();
    assert_eq!(program.visiting_authority, format!("{BISHOP}, Hno. Castro"));
    assert_eq!(program.director, "Marta Díaz | Líder asignada");
}

#[test]
fn visitor_typing_keeps_separators_until_submission() {
    let mut composer = open_with_date();
    composer.apply(FormEvent::SelectLeader {
        slot: LeaderSlot::Director,
        choice: LeaderChoice::Bishopric(BISHOP.into()),
    });
    composer.apply(FormEvent::SetVisitingAuthority { value: format!("Hno. Castro, {COUNSELOR}, ") });
    let form = composer.form().clone();
    composer.resume(ComposerMode::Creating, form);
    assert_eq!(composer.form().visiting_authority, format!("Hno. Castro, {COUNSELOR}, "));

    let program = composer.assemble().unwrap();
    assert_eq!(program.visiting_authority, "Hno. Castro");
}

#[test]
fn escape_hatch_with_calling_only_survives_round_trips() {
    let mut composer = open_with_date();
    composer.apply(FormEvent::SetLeaderText {
        slot: LeaderSlot::Presider,
        name: String::new(),
        calling: "Setenta de Área".into(),
    });
    for _ in 0..2 {
        let form = composer.form().clone();
        composer.resume(ComposerMode::Creating, form);
    }
    assert_eq!(composer.form().presider.choice, LeaderChoice::Other);
    assert_eq!(composer.form().presider.calling, "Setenta de Área");
}

// ============================================================================
// Toggles and assembly
// ============================================================================

#[test]
fn enabling_confirmations_enables_new_members_only_one_way() {
    let mut composer = open_with_date();
    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::Confirmations, enabled: true });
    assert!(composer.form().toggles.new_members);

    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::NewMembers, enabled: false });
    assert!(!composer.form().toggles.new_members);
    assert!(composer.form().toggles.confirmations);
}

#[test]
fn testimony_meeting_submits_no_discourses() {
    let mut composer = open_with_date();
    let mut form = composer.form().clone();
    form.discourses = vec![Discourse { speaker: "Eva Soto".into(), topic: "Fe".into() }];
    composer.resume(ComposerMode::Creating, form);
    composer.apply(FormEvent::SetTestimonyMeeting { enabled: true });

    let program = composer.assemble().unwrap();
    assert!(program.is_testimony_meeting);
    assert!(program.discourses.is_empty());
}

#[test]
fn disabled_calling_changes_submit_empty_lists() {
    let mut composer = open_with_date();
    let mut form = composer.form().clone();
    form.releases = vec![CallingChange { name: "Eva Soto".into(), calling: "Maestra".into(), organization_id: Some(12) }];
    form.sustainments = vec![CallingChange { name: "Luis".into(), calling: "Secretario".into(), organization_id: None }];
    composer.resume(ComposerMode::Creating, form);

    let program = composer.assemble().unwrap();
    assert!(program.releases.is_empty());
    assert!(program.sustainments.is_empty());

    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::ReleasesAndSustainments, enabled: true });
    let program = composer.assemble().unwrap();
    assert_eq!(program.releases.len(), 1);
    assert_eq!(program.sustainments.len(), 1);
}

#[test]
fn disabling_new_members_wins_over_confirmations_at_submit() {
    let mut composer = open_with_date();
    let mut form = composer.form().clone();
    form.new_members = vec!["Familia Rojas".into()];
    form.confirmations = vec!["Tomás Rojas".into()];
    composer.resume(ComposerMode::Creating, form);
    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::Confirmations, enabled: true });
    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::NewMembers, enabled: false });

    let program = composer.assemble().unwrap();
    assert_eq!(program.confirmations, vec!["Tomás Rojas"]);
    assert!(program.new_members.is_empty());
}

#[test]
fn blank_rows_and_disabled_stake_business_are_dropped() {
    let mut composer = open_with_date();
    let mut form = composer.form().clone();
    form.child_blessings = vec!["  ".into(), " Sofía ".into(), "".into()];
    form.stake_business = "Relevo del sumo consejo".into();
    composer.resume(ComposerMode::Creating, form);
    composer.apply(FormEvent::SetToggle { toggle: RosterToggle::ChildBlessings, enabled: true });

    let program = composer.assemble().unwrap();
    assert_eq!(program.child_blessings, vec!["Sofía"]);
    assert_eq!(program.stake_business, "");
}

#[test]
fn missing_date_blocks_submission() {
    let mut composer = Composer::new(reference());
    composer.open_create();
    let errors = composer.assemble().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "date");
}

#[test]
fn edit_then_assemble_reproduces_the_record() {
    let mut program = MeetingProgram::empty(sunday());
    program.presider = "Juan Pérez | Obispo".into();
    program.director = "Pedro Ruiz | Consejero del Obispado".into();
    program.sacrament_hymn = "169 - As Now We Take the Sacrament".into();
    program.new_members = vec!["Familia Rojas".into()];
    program.confirmations = vec!["Tomás Rojas".into()];
    program.releases = vec![CallingChange { name: "Eva Soto".into(), calling: "Secretaria".into(), organization_id: Some(12) }];
    program.stake_business = "Relevo del sumo consejo".into();
    program.discourses = vec![Discourse { speaker: "Eva Soto".into(), topic: "Fe".into() }];

    let mut composer = Composer::new(reference());
    composer.open_edit(&StoredProgram { id: 1, program: program.clone() });
    assert_eq!(composer.assemble().unwrap(), program);
}

#[test]
fn open_create_resets_previous_edit() {
    let mut program = MeetingProgram::empty(sunday());
    program.confirmations = vec!["Tomás Rojas".into()];

    let mut composer = Composer::new(reference());
    composer.open_edit(&StoredProgram { id: 1, program });
    assert!(composer.form().toggles.confirmations);

    composer.open_create();
    assert_eq!(composer.mode(), ComposerMode::Creating);
    assert!(!composer.form().toggles.confirmations);
    assert!(composer.form().confirmations.is_empty());
}

// ============================================================================
// Calling vocabularies
// ============================================================================

#[test]
fn calling_vocabularies_by_organization_type() {
    let composer = Composer::new(reference());
    assert_eq!(
        composer.callings_for(12).callings(),
        &["Presidenta", "Primera Consejera", "Segunda Consejera", "Secretaria"]
    );
    assert!(composer.callings_for(10).is_free_text());
    assert!(composer.callings_for(999).is_free_text());

    let offered: Vec<i64> = composer.organizations().for_calling_changes().iter().map(|o| o.id).collect();
    assert_eq!(offered, vec![10, 12]);
}
