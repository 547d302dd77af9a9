use crate::models::{ContentType, SortKey, SortOrder};

pub const DEFAULT_LIMIT: u32 = 5;

/// Canonical filter/sort/pagination parameters driving a catalog fetch.
/// Every field here is fetch-triggering; transient UI state such as the
/// search draft lives in [`QueryState`] instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub search: Option<String>,
    pub content_type: Option<ContentType>,
    pub provider: Option<String>,
    pub published_from: Option<String>,
    pub published_to: Option<String>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
    pub limit: u32,
    pub offset: u32,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: None,
            content_type: None,
            provider: None,
            published_from: None,
            published_to: None,
            sort_by: SortKey::Score,
            sort_order: SortOrder::Desc,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Snapshot of the fetch-triggering fields. Two equal keys mean the last
/// response is still valid and no request needs to go out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchKey(
    Option<String>,
    Option<ContentType>,
    Option<String>,
    Option<String>,
    Option<String>,
    SortKey,
    SortOrder,
    u32,
    u32,
);

impl Query {
    /// The explicit dependency list for re-fetching: search, type, provider,
    /// published range, sort key, sort order, limit and offset. A mutation
    /// that leaves this key unchanged must not cause a request.
    pub fn fetch_key(&self) -> FetchKey {
        FetchKey(
            self.search.clone(),
            self.content_type,
            self.provider.clone(),
            self.published_from.clone(),
            self.published_to.clone(),
            self.sort_by,
            self.sort_order,
            self.limit,
            self.offset,
        )
    }

    /// Serializes the query for the wire. Unset and empty-string fields are
    /// omitted entirely; everything else becomes a string-valued parameter.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        push_opt(&mut params, "search", self.search.as_deref());
        if let Some(t) = self.content_type {
            params.push(("type", t.as_str().to_string()));
        }
        push_opt(&mut params, "provider", self.provider.as_deref());
        push_opt(&mut params, "published_from", self.published_from.as_deref());
        push_opt(&mut params, "published_to", self.published_to.as_deref());
        params.push(("sort_by", self.sort_by.as_str().to_string()));
        params.push(("sort_order", self.sort_order.as_str().to_string()));
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset.to_string()));
        params
    }
}

fn push_opt(params: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value {
        if !v.is_empty() {
            params.push((key, v.to_string()));
        }
    }
}

/// Owner of the committed query plus the uncommitted search draft. The
/// draft only reaches the query through [`QueryState::commit_search`].
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub query: Query,
    pub draft: String,
}

impl QueryState {
    pub fn with_query(query: Query) -> Self {
        Self {
            query,
            draft: String::new(),
        }
    }

    /// Commits the search draft: trims and lowercases it, stores it on the
    /// query and returns to page 1 so the user is never stranded on an
    /// out-of-range page.
    pub fn commit_search(&mut self) {
        let term = self.draft.trim().to_lowercase();
        self.query.search = if term.is_empty() { None } else { Some(term) };
        self.query.offset = 0;
    }

    /// Restores the exact default query and empties the draft. The caller
    /// is responsible for dropping any held result snapshot.
    pub fn clear(&mut self) {
        self.query = Query::default();
        self.draft.clear();
    }

    /// Page navigation expressed as an offset mutation. No upper clamp:
    /// out-of-range pages are delegated to the server, which returns zero
    /// items, and the UI shows the empty state.
    pub fn set_page(&mut self, page: u32) {
        self.query.offset = (page.max(1) - 1) * self.query.limit;
    }

    /// True iff anything differs from the default query, or a draft is
    /// pending. Limit and offset do not participate.
    pub fn has_active_filters(&self) -> bool {
        !self.draft.is_empty()
            || self.query.search.is_some()
            || self.query.content_type.is_some()
            || self.query.provider.is_some()
            || self.query.published_from.is_some()
            || self.query.published_to.is_some()
            || self.query.sort_by != SortKey::Score
            || self.query.sort_order != SortOrder::Desc
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod query_tests;
