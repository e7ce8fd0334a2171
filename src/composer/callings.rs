use std::collections::HashMap;

use serde::Serialize;

use crate::models::organization::Organization;

/// Interpretation of an organization's stored type code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganizationKind {
    Barrio,
    Obispado,
    CuorumElderes,
    SociedadSocorro,
    MujeresJovenes,
    HombresJovenes,
    Primaria,
    EscuelaDominical,
    Other(String),
}

/// What a calling input should offer for a given organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "callings", rename_all = "camelCase")]
pub enum CallingVocabulary {
    Fixed(&'static [&'static str]),
    FreeText,
}

impl CallingVocabulary {
    pub fn callings(&self) -> &'static [&'static str] {
        match self {
            CallingVocabulary::Fixed(list) => list,
            CallingVocabulary::FreeText => &[],
        }
    }

    pub fn is_free_text(&self) -> bool {
        matches!(self, CallingVocabulary::FreeText)
    }
}

const OBISPADO: &[&str] = &[
    "Obispo",
    "Primer Consejero",
    "Segundo Consejero",
    "Secretario Ejecutivo",
    "Secretario",
];
const CUORUM_ELDERES: &[&str] = &[
    "Presidente",
    "Primer Consejero",
    "Segundo Consejero",
    "Secretario",
    "Maestro",
];
const SOCIEDAD_SOCORRO: &[&str] = &[
    "Presidenta",
    "Primera Consejera",
    "Segunda Consejera",
    "Secretaria",
];
const MUJERES_JOVENES: &[&str] = &[
    "Presidenta",
    "Primera Consejera",
    "Segunda Consejera",
    "Secretaria",
    "Asesora de Clase",
];
const HOMBRES_JOVENES: &[&str] = &[
    "Presidente del Quórum de Diáconos",
    "Presidente del Quórum de Maestros",
    "Primer Ayudante del Quórum de Presbíteros",
    "Asesor",
    "Especialista",
];
const PRIMARIA: &[&str] = &[
    "Presidenta",
    "Primera Consejera",
    "Segunda Consejera",
    "Secretaria",
    "Maestra",
    "Líder de Música",
    "Pianista",
];
const ESCUELA_DOMINICAL: &[&str] = &[
    "Presidente",
    "Primer Consejero",
    "Segundo Consejero",
    "Secretario",
    "Maestro",
];

impl OrganizationKind {
    pub fn from_type(code: &str) -> Self {
        match code.trim() {
            "barrio" => OrganizationKind::Barrio,
            "obispado" => OrganizationKind::Obispado,
            "cuorum_elderes" => OrganizationKind::CuorumElderes,
            "sociedad_socorro" => OrganizationKind::SociedadSocorro,
            "mujeres_jovenes" => OrganizationKind::MujeresJovenes,
            "hombres_jovenes" => OrganizationKind::HombresJovenes,
            "primaria" => OrganizationKind::Primaria,
            "escuela_dominical" => OrganizationKind::EscuelaDominical,
            other => OrganizationKind::Other(other.to_string()),
        }
    }

    pub fn vocabulary(&self) -> CallingVocabulary {
        match self {
            OrganizationKind::Obispado => CallingVocabulary::Fixed(OBISPADO),
            OrganizationKind::CuorumElderes => CallingVocabulary::Fixed(CUORUM_ELDERES),
            OrganizationKind::SociedadSocorro => CallingVocabulary::Fixed(SOCIEDAD_SOCORRO),
            OrganizationKind::MujeresJovenes => CallingVocabulary::Fixed(MUJERES_JOVENES),
            OrganizationKind::HombresJovenes => CallingVocabulary::Fixed(HOMBRES_JOVENES),
            OrganizationKind::Primaria => CallingVocabulary::Fixed(PRIMARIA),
            OrganizationKind::EscuelaDominical => CallingVocabulary::Fixed(ESCUELA_DOMINICAL),
            OrganizationKind::Barrio | OrganizationKind::Other(_) => CallingVocabulary::FreeText,
        }
    }

    /// Whether releases and sustainments may name this organization.
    /// Bishopric changes are announced by the stake, not from this form.
    pub fn offered_for_calling_changes(&self) -> bool {
        !matches!(self, OrganizationKind::Obispado)
    }
}

/// Organizations indexed by id.
#[derive(Debug, Clone, Default)]
pub struct OrganizationDirectory {
    ordered: Vec<Organization>,
    index: HashMap<i64, usize>,
}

impl OrganizationDirectory {
    pub fn new(organizations: Vec<Organization>) -> Self {
        let index = organizations
            .iter()
            .enumerate()
            .map(|(i, org)| (org.id, i))
            .collect();
        OrganizationDirectory { ordered: organizations, index }
    }

    pub fn get(&self, id: i64) -> Option<&Organization> {
        self.index.get(&id).map(|&i| &self.ordered[i])
    }

    pub fn kind(&self, id: i64) -> Option<OrganizationKind> {
        self.get(id).map(|org| OrganizationKind::from_type(&org.organization_type))
    }

    /// Unknown ids fall back to free text.
    pub fn vocabulary_for(&self, id: i64) -> CallingVocabulary {
        self.kind(id)
            .map(|kind| kind.vocabulary())
            .unwrap_or(CallingVocabulary::FreeText)
    }

    /// Organizations offered in the release/sustainment pickers, in order.
    pub fn for_calling_changes(&self) -> Vec<&Organization> {
        self.ordered
            .iter()
            .filter(|org| OrganizationKind::from_type(&org.organization_type).offered_for_calling_changes())
            .collect()
    }
}
