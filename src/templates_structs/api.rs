use serde::{Deserialize, Serialize};

use crate::composer::leaders::{BishopricMember, SlotDescriptor};
use crate::composer::{CallingVocabulary, ComposerForm, FormEvent};

/// Generic paginated response wrapper for API endpoints.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

/// API error response.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// `?page=&per_page=` for list endpoints.
#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PageQuery {
    pub const DEFAULT_PER_PAGE: i64 = 25;
    pub const MAX_PER_PAGE: i64 = 100;

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }
}

/// `?q=` for autocomplete endpoints.
#[derive(Deserialize, Debug, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Slot options offered by the presider/director dropdowns.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LeaderOptions {
    pub bishopric: Vec<BishopricMember>,
    pub presider: SlotDescriptor,
    pub director: SlotDescriptor,
}

/// Composer state handed to the client.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ComposerStateResponse {
    /// `creating` or `editing`.
    pub mode: &'static str,
    /// Present when editing a stored program.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editing_id: Option<i64>,
    pub form: ComposerForm,
    pub leaders: LeaderOptions,
}

/// Client-held form state plus one interaction to apply.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormEventRequest {
    #[serde(default)]
    pub editing_id: Option<i64>,
    #[serde(default)]
    pub form: ComposerForm,
    pub event: FormEvent,
}

/// Form state to assemble, for preview or to save.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    #[serde(default)]
    pub form: ComposerForm,
}

/// An organization offered in the release/sustainment pickers.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationOption {
    pub id: i64,
    pub label: String,
    pub organization_type: String,
    pub callings: CallingVocabulary,
}

#[derive(Serialize, Debug)]
pub struct CreatedResponse {
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_bounds() {
        let q = PageQuery { page: Some(0), per_page: Some(1000) };
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(), PageQuery::MAX_PER_PAGE);
        assert_eq!(PageQuery::default().per_page(), PageQuery::DEFAULT_PER_PAGE);
    }
}
