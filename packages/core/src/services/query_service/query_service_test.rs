//! Tests for QueryService predicate precedence
//!
//! A recording store wraps `MemoryItemStore` and logs which store method
//! served the primary candidate set, so precedence is checked directly
//! rather than inferred from result sets.

#[cfg(test)]
mod tests {
    use crate::db::{DatabaseError, ItemStore, MemoryItemStore};
    use crate::models::{Item, ItemType};
    use crate::services::query_service::{
        ItemQuery, ItemSort, PrimaryPredicate, QueryPlan, QueryService, SecondaryFilter,
    };
    use crate::services::LibraryError;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::{Arc, Mutex};

    /// Store wrapper that records every read call
    struct RecordingStore {
        inner: MemoryItemStore,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: MemoryItemStore::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn take_calls(&self) -> Vec<String> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait]
    impl ItemStore for RecordingStore {
        async fn create_item(&self, item: Item) -> Result<i64, LibraryError> {
            self.inner.create_item(item).await
        }

        async fn update_item(&self, item: Item) -> Result<(), LibraryError> {
            self.inner.update_item(item).await
        }

        async fn delete_item(&self, id: i64) -> Result<(), LibraryError> {
            self.inner.delete_item(id).await
        }

        async fn get_item(&self, id: i64) -> Result<Item, LibraryError> {
            self.record(format!("get_item({})", id));
            self.inner.get_item(id).await
        }

        async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
            self.record("get_all_items".to_string());
            self.inner.get_all_items().await
        }

        async fn get_items_by_type(&self, item_type: &str) -> Result<Vec<Item>, LibraryError> {
            self.record(format!("get_items_by_type({})", item_type));
            self.inner.get_items_by_type(item_type).await
        }

        async fn get_items_by_language(&self, language: &str) -> Result<Vec<Item>, LibraryError> {
            self.record(format!("get_items_by_language({})", language));
            self.inner.get_items_by_language(language).await
        }

        async fn search_items(
            &self,
            query: &str,
            item_type: &str,
        ) -> Result<Vec<Item>, LibraryError> {
            self.record(format!("search_items({}, {})", query, item_type));
            self.inner.search_items(query, item_type).await
        }

        async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
            self.record("get_unique_languages".to_string());
            self.inner.get_unique_languages().await
        }
    }

    /// Store whose every call fails with a storage error
    struct UnavailableStore;

    fn unavailable() -> LibraryError {
        let source = libsql::Error::Misuse("device offline".to_string());
        DatabaseError::sql_execution("disk unavailable", source).into()
    }

    #[async_trait]
    impl ItemStore for UnavailableStore {
        async fn create_item(&self, _item: Item) -> Result<i64, LibraryError> {
            Err(unavailable())
        }

        async fn update_item(&self, _item: Item) -> Result<(), LibraryError> {
            Err(unavailable())
        }

        async fn delete_item(&self, _id: i64) -> Result<(), LibraryError> {
            Err(unavailable())
        }

        async fn get_item(&self, _id: i64) -> Result<Item, LibraryError> {
            Err(unavailable())
        }

        async fn get_all_items(&self) -> Result<Vec<Item>, LibraryError> {
            Err(unavailable())
        }

        async fn get_items_by_type(&self, _item_type: &str) -> Result<Vec<Item>, LibraryError> {
            Err(unavailable())
        }

        async fn get_items_by_language(&self, _language: &str) -> Result<Vec<Item>, LibraryError> {
            Err(unavailable())
        }

        async fn search_items(
            &self,
            _query: &str,
            _item_type: &str,
        ) -> Result<Vec<Item>, LibraryError> {
            Err(unavailable())
        }

        async fn get_unique_languages(&self) -> Result<BTreeSet<String>, LibraryError> {
            Err(unavailable())
        }
    }

    /// Seed the fetch-hook scenario plus a few unrelated items
    ///
    /// Ids: 1 = A (JavaScript snippet), 2 = B (Python function),
    /// 3 = Python snippet without "fetch", 4 = untyped-language template
    async fn create_test_service() -> (QueryService, Arc<RecordingStore>) {
        let store = Arc::new(RecordingStore::new());

        let items = vec![
            Item::builder("Fetch Hook", ItemType::Snippet, "const useFetch = () => {}")
                .with_language("JavaScript")
                .with_tags("react, hooks")
                .build(),
            Item::builder("Fetch Hook", ItemType::Function, "def fetch(url): ...")
                .with_language("Python")
                .build(),
            Item::builder("List Comprehension", ItemType::Snippet, "[x for x in xs]")
                .with_language("Python")
                .with_tags("basics")
                .build(),
            Item::builder("README", ItemType::Template, "# Project").build(),
        ];
        for item in items {
            store.create_item(item).await.unwrap();
        }

        let query_service = QueryService::new(store.clone());
        (query_service, store)
    }

    fn ids(items: &[Item]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    // =========================================================================
    // Plan selection
    // =========================================================================

    #[test]
    fn test_plan_search_takes_priority_and_demotes_language() {
        let plan = QueryService::plan(
            &ItemQuery::new()
                .with_search("fetch")
                .with_type("snippet")
                .with_language("Python"),
        );

        assert_eq!(
            plan,
            QueryPlan {
                primary: PrimaryPredicate::Search {
                    query: "fetch".to_string(),
                    item_type: "snippet".to_string(),
                },
                secondary: Some(SecondaryFilter::Language("Python".to_string())),
            }
        );
    }

    #[test]
    fn test_plan_language_before_type_without_search() {
        let plan = QueryService::plan(&ItemQuery::new().with_type("function").with_language("Go"));

        assert_eq!(plan.primary, PrimaryPredicate::Language("Go".to_string()));
        assert_eq!(
            plan.secondary,
            Some(SecondaryFilter::Type("function".to_string()))
        );
    }

    #[test]
    fn test_plan_type_only() {
        let plan = QueryService::plan(&ItemQuery::new().with_type("template"));

        assert_eq!(plan.primary, PrimaryPredicate::Type("template".to_string()));
        assert_eq!(plan.secondary, None);
    }

    #[test]
    fn test_plan_blank_search_falls_through() {
        let plan = QueryService::plan(&ItemQuery::new().with_search("   ").with_language("Go"));
        assert_eq!(plan.primary, PrimaryPredicate::Language("Go".to_string()));

        let plan = QueryService::plan(&ItemQuery::new().with_search(""));
        assert_eq!(plan.primary, PrimaryPredicate::All);
        assert_eq!(plan.secondary, None);
    }

    // =========================================================================
    // Execution
    // =========================================================================

    #[tokio::test]
    async fn test_search_then_language_post_filter() {
        let (query_service, store) = create_test_service().await;

        let both = query_service.search_items("fetch", "").await.unwrap();
        assert_eq!(ids(&both), vec![1, 2]);

        let python = query_service
            .execute(&ItemQuery::new().with_search("fetch").with_language("Python"))
            .await
            .unwrap();
        assert_eq!(ids(&python), vec![2]);

        let calls = store.take_calls();
        assert_eq!(
            calls,
            vec!["search_items(fetch, )", "search_items(fetch, )"]
        );
    }

    #[tokio::test]
    async fn test_search_with_type_narrows_in_same_pass() {
        let (query_service, store) = create_test_service().await;

        let results = query_service.search_items("FETCH", "function").await.unwrap();

        assert_eq!(ids(&results), vec![2]);
        assert_eq!(store.take_calls(), vec!["search_items(FETCH, function)"]);
    }

    #[tokio::test]
    async fn test_search_matches_tags_and_content() {
        let (query_service, _store) = create_test_service().await;

        let by_tag = query_service.search_items("HOOKS", "").await.unwrap();
        assert_eq!(ids(&by_tag), vec![1]);

        let by_content = query_service.search_items("for x in", "").await.unwrap();
        assert_eq!(ids(&by_content), vec![3]);
    }

    #[tokio::test]
    async fn test_language_primary_with_type_secondary() {
        let (query_service, store) = create_test_service().await;

        let results = query_service
            .execute(&ItemQuery::new().with_language("Python").with_type("snippet"))
            .await
            .unwrap();

        assert_eq!(ids(&results), vec![3]);
        assert_eq!(store.take_calls(), vec!["get_items_by_language(Python)"]);
    }

    #[tokio::test]
    async fn test_empty_search_is_equivalent_to_no_search() {
        let (query_service, store) = create_test_service().await;

        let with_blank = query_service.search_items("", "snippet").await.unwrap();
        let without = query_service.get_items_by_type("snippet").await.unwrap();

        assert_eq!(with_blank, without);
        assert_eq!(ids(&with_blank), vec![1, 3]);
        assert_eq!(
            store.take_calls(),
            vec!["get_items_by_type(snippet)", "get_items_by_type(snippet)"]
        );
    }

    #[tokio::test]
    async fn test_empty_type_matches_get_all() {
        let (query_service, _store) = create_test_service().await;

        let by_type = query_service.get_items_by_type("").await.unwrap();
        let all = query_service.get_all_items().await.unwrap();

        assert_eq!(by_type, all);
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_type_yields_empty_not_error() {
        let (query_service, _store) = create_test_service().await;

        assert!(query_service.get_items_by_type("widget").await.unwrap().is_empty());
        assert!(query_service.get_items_by_type("Snippet").await.unwrap().is_empty());
        assert!(query_service.search_items("fetch", "widget").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_language_yields_empty_list() {
        let (query_service, _store) = create_test_service().await;

        let results = query_service.get_items_by_language("Go").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_language_filter_is_case_sensitive() {
        let (query_service, _store) = create_test_service().await;

        let results = query_service.get_items_by_language("python").await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unique_languages_skips_unset() {
        let (query_service, _store) = create_test_service().await;

        let languages = query_service.get_unique_languages().await.unwrap();
        let expected: BTreeSet<String> = ["JavaScript", "Python"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(languages, expected);
    }

    #[tokio::test]
    async fn test_newest_first_sort_does_not_change_membership() {
        let (query_service, _store) = create_test_service().await;

        let insertion = query_service
            .execute(&ItemQuery::new().with_language("Python"))
            .await
            .unwrap();
        let newest = query_service
            .execute(&ItemQuery::new().with_language("Python").sorted(ItemSort::NewestFirst))
            .await
            .unwrap();

        assert_eq!(ids(&insertion), vec![2, 3]);
        assert_eq!(ids(&newest), vec![3, 2]);
    }

    #[tokio::test]
    async fn test_queries_do_not_mutate_store() {
        let (query_service, store) = create_test_service().await;

        let before = store.inner.get_all_items().await.unwrap();
        query_service.search_items("fetch", "snippet").await.unwrap();
        query_service.get_items_by_language("Python").await.unwrap();
        query_service.get_unique_languages().await.unwrap();
        let after = store.inner.get_all_items().await.unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_storage_errors_pass_through() {
        let query_service = QueryService::new(Arc::new(UnavailableStore));

        let err = query_service.get_all_items().await.unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("disk unavailable"));

        let err = query_service.search_items("x", "").await.unwrap_err();
        assert!(err.is_storage());

        let err = query_service.get_unique_languages().await.unwrap_err();
        assert!(err.is_storage());
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn test_item_query_deserialization_defaults() {
        let query: ItemQuery = serde_json::from_value(serde_json::json!({
            "search": "fetch",
            "type": "snippet"
        }))
        .unwrap();

        assert_eq!(query.search, "fetch");
        assert_eq!(query.item_type, "snippet");
        assert_eq!(query.language, "");
        assert_eq!(query.sort, ItemSort::Insertion);
    }

    #[test]
    fn test_item_sort_serialization() {
        assert_eq!(
            serde_json::to_value(ItemSort::NewestFirst).unwrap(),
            serde_json::json!("newest_first")
        );
    }
}
