use super::*;
use pretty_assertions::assert_eq;

#[test]
fn default_query_matches_catalog_defaults() {
    let query = Query::default();
    assert_eq!(query.limit, 5);
    assert_eq!(query.offset, 0);
    assert_eq!(query.sort_by, SortKey::Score);
    assert_eq!(query.sort_order, SortOrder::Desc);
    assert!(query.search.is_none());
    assert!(query.content_type.is_none());
    assert!(query.provider.is_none());
    assert!(query.published_from.is_none());
    assert!(query.published_to.is_none());
}

#[test]
fn commit_search_normalizes_and_resets_offset() {
    let mut state = QueryState::default();
    state.query.offset = 20;
    state.draft = "  Rust Tutorials ".to_string();

    state.commit_search();

    assert_eq!(state.query.search.as_deref(), Some("rust tutorials"));
    assert_eq!(state.query.offset, 0);
}

#[test]
fn commit_search_with_blank_draft_clears_the_term() {
    let mut state = QueryState::default();
    state.query.search = Some("old term".to_string());
    state.query.offset = 15;
    state.draft = "   ".to_string();

    state.commit_search();

    assert!(state.query.search.is_none());
    assert_eq!(state.query.offset, 0);
}

#[test]
fn field_updates_preserve_offset() {
    let mut state = QueryState::default();
    state.set_page(4);
    assert_eq!(state.query.offset, 15);

    state.query.content_type = Some(ContentType::Video);
    state.query.sort_by = SortKey::Title;
    state.query.sort_order = SortOrder::Asc;
    state.query.provider = Some("youtube".to_string());

    assert_eq!(state.query.offset, 15);
}

#[test]
fn clear_restores_the_exact_default_query() {
    let mut state = QueryState::default();
    state.draft = "pending".to_string();
    state.query.search = Some("rust".to_string());
    state.query.content_type = Some(ContentType::Article);
    state.query.sort_by = SortKey::PublishedAt;
    state.query.sort_order = SortOrder::Asc;
    state.query.limit = 10;
    state.query.offset = 30;

    state.clear();

    assert_eq!(state.query, Query::default());
    assert!(state.draft.is_empty());
}

#[test]
fn set_page_keeps_offset_a_multiple_of_limit() {
    let mut state = QueryState::default();
    for page in 1..=9 {
        state.set_page(page);
        assert_eq!(state.query.offset % state.query.limit, 0);
        assert_eq!(state.query.offset, (page - 1) * state.query.limit);
    }

    state.query.limit = 20;
    state.set_page(3);
    assert_eq!(state.query.offset, 40);

    // page 0 is treated as page 1 rather than underflowing
    state.set_page(0);
    assert_eq!(state.query.offset, 0);
}

#[test]
fn serialization_omits_unset_and_empty_fields() {
    let mut query = Query::default();
    query.content_type = Some(ContentType::Video);
    query.provider = Some(String::new());

    let params = query.to_params();

    assert_eq!(
        params,
        vec![
            ("type", "video".to_string()),
            ("sort_by", "score".to_string()),
            ("sort_order", "desc".to_string()),
            ("limit", "5".to_string()),
            ("offset", "0".to_string()),
        ]
    );
    assert!(params.iter().all(|(_, v)| !v.is_empty()));
}

#[test]
fn serialization_includes_every_defined_field_in_order() {
    let query = Query {
        search: Some("ownership".to_string()),
        content_type: Some(ContentType::Article),
        provider: Some("medium".to_string()),
        published_from: Some("2024-01-01".to_string()),
        published_to: Some("2024-06-30".to_string()),
        sort_by: SortKey::PublishedAt,
        sort_order: SortOrder::Asc,
        limit: 10,
        offset: 20,
    };

    let keys: Vec<&str> = query.to_params().iter().map(|(k, _)| *k).collect();
    assert_eq!(
        keys,
        vec![
            "search",
            "type",
            "provider",
            "published_from",
            "published_to",
            "sort_by",
            "sort_order",
            "limit",
            "offset",
        ]
    );
}

#[test]
fn fetch_key_tracks_only_query_fields() {
    let mut state = QueryState::default();
    let before = state.query.fetch_key();

    // editing the draft alone must not change the key
    state.draft = "typed but not committed".to_string();
    assert_eq!(state.query.fetch_key(), before);

    state.commit_search();
    assert_ne!(state.query.fetch_key(), before);
}

#[test]
fn fetch_key_changes_on_every_whitelisted_field() {
    let base = Query::default();

    let mutations: Vec<Box<dyn Fn(&mut Query)>> = vec![
        Box::new(|q| q.search = Some("x".into())),
        Box::new(|q| q.content_type = Some(ContentType::Video)),
        Box::new(|q| q.provider = Some("vimeo".into())),
        Box::new(|q| q.published_from = Some("2024-01-01".into())),
        Box::new(|q| q.published_to = Some("2024-12-31".into())),
        Box::new(|q| q.sort_by = SortKey::Title),
        Box::new(|q| q.sort_order = SortOrder::Asc),
        Box::new(|q| q.limit = 10),
        Box::new(|q| q.offset = 5),
    ];

    for mutate in mutations {
        let mut query = base.clone();
        mutate(&mut query);
        assert_ne!(query.fetch_key(), base.fetch_key());
    }
}

#[test]
fn active_filters_predicate() {
    let mut state = QueryState::default();
    assert!(!state.has_active_filters());

    state.draft = "typing".to_string();
    assert!(state.has_active_filters());
    state.draft.clear();

    state.query.sort_order = SortOrder::Asc;
    assert!(state.has_active_filters());
    state.query.sort_order = SortOrder::Desc;

    state.query.sort_by = SortKey::Title;
    assert!(state.has_active_filters());
    state.query.sort_by = SortKey::Score;

    // limit and offset do not count as active filters
    state.query.limit = 50;
    state.query.offset = 100;
    assert!(!state.has_active_filters());
}
