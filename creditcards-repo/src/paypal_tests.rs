//! PayPal persistence tests against an in-process vault.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use creditcards_types::{
        Address, Credential, CreditCard, CreditCardFilter, CreditCardState, CreditCardType,
        CreditCardsPersistence, Openable, PagingParams, RepoError,
    };

    use crate::StaticCredentialResolver;
    use crate::paypal::{
        CreditCardVault, PAGE_SIZE, PayPalConfig, PayPalPersistence, VaultConnector,
        VaultCreditCard, VaultError, VaultListOptions, VaultMode, VaultPage,
    };

    /// Vault double that pages over a list the way PayPal does.
    pub struct FakeVault {
        cards: Mutex<Vec<VaultCreditCard>>,
        next_id: AtomicUsize,
        calls: Mutex<Vec<String>>,
        fail_delete: AtomicBool,
        fail_get: AtomicBool,
    }

    impl FakeVault {
        pub fn new() -> Self {
            Self {
                cards: Mutex::new(Vec::new()),
                next_id: AtomicUsize::new(1),
                calls: Mutex::new(Vec::new()),
                fail_delete: AtomicBool::new(false),
                fail_get: AtomicBool::new(false),
            }
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn reset_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        pub fn len(&self) -> usize {
            self.cards.lock().unwrap().len()
        }

        pub fn stored(&self, id: &str) -> Option<VaultCreditCard> {
            self.cards
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id.as_deref() == Some(id))
                .cloned()
        }
    }

    fn api_error() -> VaultError {
        VaultError::Api {
            status: 500,
            message: "INTERNAL_SERVICE_ERROR".into(),
        }
    }

    #[async_trait]
    impl CreditCardVault for FakeVault {
        async fn list(&self, options: VaultListOptions) -> Result<VaultPage, VaultError> {
            self.record(format!("list:{}", options.page));

            let cards = self.cards.lock().unwrap();
            let matching: Vec<VaultCreditCard> = cards
                .iter()
                .filter(|c| match &options.external_customer_id {
                    Some(customer) => c.external_customer_id.as_ref() == Some(customer),
                    None => true,
                })
                .cloned()
                .collect();

            let size = options.page_size as usize;
            let start = (options.page as usize - 1) * size;
            let items = matching.iter().skip(start).take(size).cloned().collect();

            Ok(VaultPage {
                items,
                total_items: Some(matching.len() as u64),
                total_pages: Some(matching.len().div_ceil(size) as u64),
            })
        }

        async fn get(&self, id: &str) -> Result<VaultCreditCard, VaultError> {
            self.record(format!("get:{}", id));
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(api_error());
            }
            self.stored(id).ok_or(VaultError::NotFound)
        }

        async fn create(&self, mut card: VaultCreditCard) -> Result<VaultCreditCard, VaultError> {
            self.record("create".to_string());

            let n = self.next_id.fetch_add(1, Ordering::SeqCst);
            card.id = Some(format!("CARD-{}", n));
            card.state = Some(CreditCardState::Ok);
            card.create_time = Some("2017-06-01T00:00:00Z".into());
            card.valid_until = Some("2020-06-01T00:00:00Z".into());
            if let Some(number) = card.number.as_mut() {
                let tail = number[number.len().saturating_sub(4)..].to_string();
                *number = format!("xxxxxxxxxxxx{}", tail);
            }

            self.cards.lock().unwrap().push(card.clone());
            Ok(card)
        }

        async fn delete(&self, id: &str) -> Result<(), VaultError> {
            self.record(format!("delete:{}", id));
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(api_error());
            }

            let mut cards = self.cards.lock().unwrap();
            let index = cards
                .iter()
                .position(|c| c.id.as_deref() == Some(id))
                .ok_or(VaultError::NotFound)?;
            cards.remove(index);
            Ok(())
        }
    }

    struct FakeConnector {
        vault: Arc<FakeVault>,
        connections: Mutex<Vec<(VaultMode, Credential)>>,
    }

    impl VaultConnector for FakeConnector {
        fn connect(
            &self,
            mode: VaultMode,
            credential: &Credential,
        ) -> Result<Arc<dyn CreditCardVault>, VaultError> {
            self.connections
                .lock()
                .unwrap()
                .push((mode, credential.clone()));
            Ok(self.vault.clone())
        }
    }

    fn connector(vault: Arc<FakeVault>) -> Arc<FakeConnector> {
        Arc::new(FakeConnector {
            vault,
            connections: Mutex::new(Vec::new()),
        })
    }

    fn resolver() -> Arc<StaticCredentialResolver> {
        Arc::new(StaticCredentialResolver::new(Credential::new(
            "client-id",
            "client-secret",
        )))
    }

    async fn setup() -> (PayPalPersistence, Arc<FakeVault>) {
        let vault = Arc::new(FakeVault::new());
        let mut persistence = PayPalPersistence::with_connector(connector(vault.clone()));
        persistence.set_references(resolver());
        persistence.open(Some("test")).await.unwrap();
        (persistence, vault)
    }

    fn test_card() -> CreditCard {
        CreditCard {
            id: None,
            customer_id: Some("1".into()),
            card_type: Some(CreditCardType::Visa),
            number: "1111111111111111".into(),
            expire_month: Some(1),
            expire_year: Some(2021),
            first_name: Some("Bill".into()),
            last_name: Some("Gates".into()),
            billing_address: Some(Address {
                line1: Some("2345 Swan Rd".into()),
                city: Some("Tucson".into()),
                postal_code: Some("85710".into()),
                country_code: Some("US".into()),
                ..Default::default()
            }),
            name: "Test Card 1".into(),
            ccv: "213".into(),
            saved: true,
            default: true,
            state: None,
        }
    }

    fn numbered_card(customer_id: &str, n: usize, saved: bool) -> CreditCard {
        CreditCard {
            customer_id: Some(customer_id.into()),
            card_type: Some(CreditCardType::Mastercard),
            number: format!("{:016}", n),
            name: format!("Card {}", n),
            saved,
            ..Default::default()
        }
    }

    async fn seed(persistence: &PayPalPersistence, customer_id: &str, count: usize) -> Vec<String> {
        let mut ids = Vec::new();
        for n in 0..count {
            let card = persistence
                .create(None, numbered_card(customer_id, n, true))
                .await
                .unwrap();
            ids.push(card.id.unwrap());
        }
        ids
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_open_without_resolver_fails() {
        let persistence = PayPalPersistence::with_connector(connector(Arc::new(FakeVault::new())));

        let result = persistence.open(None).await;

        assert!(matches!(result, Err(RepoError::Credentials(_))));
        assert!(!persistence.is_opened());
    }

    #[tokio::test]
    async fn test_open_with_missing_credentials_stays_closed() {
        let mut persistence =
            PayPalPersistence::with_connector(connector(Arc::new(FakeVault::new())));
        persistence.set_references(Arc::new(StaticCredentialResolver::default()));

        let result = persistence.open(None).await;

        assert!(matches!(result, Err(RepoError::Credentials(_))));
        assert!(!persistence.is_opened());
    }

    #[tokio::test]
    async fn test_open_and_close_are_idempotent() {
        let vault = Arc::new(FakeVault::new());
        let connector = connector(vault);
        let mut persistence = PayPalPersistence::with_connector(connector.clone());
        persistence.configure(&PayPalConfig { sandbox: true });
        persistence.set_references(resolver());

        persistence.open(None).await.unwrap();
        persistence.open(None).await.unwrap();
        assert!(persistence.is_opened());

        {
            let connections = connector.connections.lock().unwrap();
            assert_eq!(connections.len(), 1);
            assert_eq!(connections[0].0, VaultMode::Sandbox);
            assert_eq!(connections[0].1.access_id, "client-id");
        }

        persistence.close(None).await.unwrap();
        persistence.close(None).await.unwrap();
        assert!(!persistence.is_opened());
    }

    #[tokio::test]
    async fn test_live_mode_is_default() {
        let connector = connector(Arc::new(FakeVault::new()));
        let mut persistence = PayPalPersistence::with_connector(connector.clone());
        persistence.set_references(resolver());

        persistence.open(None).await.unwrap();

        assert_eq!(connector.connections.lock().unwrap()[0].0, VaultMode::Live);
    }

    #[tokio::test]
    async fn test_operations_require_open() {
        let persistence = PayPalPersistence::with_connector(connector(Arc::new(FakeVault::new())));

        let result = persistence.get_one_by_id(None, "CARD-1").await;

        assert!(matches!(result, Err(RepoError::NotOpened)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // CRUD
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let (persistence, vault) = setup().await;

        let created = persistence.create(None, test_card()).await.unwrap();
        let id = created.id.clone().unwrap();

        let stored = vault.stored(&id).unwrap();
        assert_eq!(
            stored.external_card_id.as_deref(),
            Some("1111111111111111;Test Card 1;213;saved;default")
        );
        assert_eq!(stored.external_customer_id.as_deref(), Some("1"));

        let fetched = persistence.get_one_by_id(None, &id).await.unwrap().unwrap();
        assert_eq!(fetched.id.as_deref(), Some(id.as_str()));
        assert_eq!(fetched.state, Some(CreditCardState::Ok));
        assert_eq!(fetched.number, "1111111111111111");
        assert_eq!(fetched.name, "Test Card 1");
        assert_eq!(fetched.ccv, "213");
        assert!(fetched.saved);
        assert!(fetched.default);
        assert_eq!(fetched.customer_id.as_deref(), Some("1"));
        assert_eq!(fetched.expire_year, Some(2021));
        assert_eq!(fetched.billing_address, test_card().billing_address);
    }

    #[tokio::test]
    async fn test_create_discards_caller_id() {
        let (persistence, _vault) = setup().await;

        let mut card = test_card();
        card.id = Some("mine".into());
        let created = persistence.create(None, card).await.unwrap();

        assert_ne!(created.id.as_deref(), Some("mine"));
        assert!(created.id.unwrap().starts_with("CARD-"));
    }

    #[tokio::test]
    async fn test_get_missing_card_is_none() {
        let (persistence, _vault) = setup().await;

        let result = persistence.get_one_by_id(None, "CARD-404").await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_backend_error_is_propagated() {
        let (persistence, vault) = setup().await;
        vault.fail_get.store(true, Ordering::SeqCst);

        let err = persistence.get_one_by_id(None, "CARD-1").await.unwrap_err();

        match err {
            RepoError::Backend(source) => {
                let vault_err = source.downcast_ref::<VaultError>().unwrap();
                assert!(matches!(vault_err, VaultError::Api { status: 500, .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_returns_previous_record() {
        let (persistence, vault) = setup().await;
        let created = persistence.create(None, test_card()).await.unwrap();
        let id = created.id.clone().unwrap();

        let deleted = persistence.delete_by_id(None, &id).await.unwrap().unwrap();

        assert_eq!(deleted, created);
        assert_eq!(vault.len(), 0);
        assert!(persistence.get_one_by_id(None, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_card_is_none_without_delete_call() {
        let (persistence, vault) = setup().await;

        let result = persistence.delete_by_id(None, "CARD-404").await.unwrap();

        assert!(result.is_none());
        assert_eq!(vault.calls(), vec!["get:CARD-404".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_skips_delete_when_get_fails() {
        let (persistence, vault) = setup().await;
        vault.fail_get.store(true, Ordering::SeqCst);

        let result = persistence.delete_by_id(None, "CARD-1").await;

        assert!(matches!(result, Err(RepoError::Backend(_))));
        assert!(!vault.calls().iter().any(|c| c.starts_with("delete")));
    }

    #[tokio::test]
    async fn test_update_deletes_then_recreates() {
        let (persistence, vault) = setup().await;
        let mut card = persistence.create(None, test_card()).await.unwrap();
        let old_id = card.id.clone().unwrap();
        vault.reset_calls();

        card.name = "Updated Card 1".into();
        card.saved = false;
        let updated = persistence.update(None, card).await.unwrap();

        assert_eq!(
            vault.calls(),
            vec![format!("delete:{}", old_id), "create".to_string()]
        );
        assert_eq!(updated.name, "Updated Card 1");
        assert!(!updated.saved);
        assert!(updated.default);
        assert_ne!(updated.id.as_deref(), Some(old_id.as_str()));
        assert!(vault.stored(&old_id).is_none());
        assert_eq!(vault.len(), 1);
    }

    #[tokio::test]
    async fn test_update_stops_when_delete_fails() {
        let (persistence, vault) = setup().await;
        let card = persistence.create(None, test_card()).await.unwrap();
        vault.reset_calls();
        vault.fail_delete.store(true, Ordering::SeqCst);

        let err = persistence.update(None, card).await.unwrap_err();

        match err {
            RepoError::Backend(source) => {
                assert!(matches!(
                    source.downcast_ref::<VaultError>(),
                    Some(VaultError::Api { status: 500, .. })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!vault.calls().contains(&"create".to_string()));
        assert_eq!(vault.len(), 1);
    }

    #[tokio::test]
    async fn test_update_without_id_is_rejected() {
        let (persistence, vault) = setup().await;

        let result = persistence.update(None, test_card()).await;

        assert!(matches!(result, Err(RepoError::Domain(_))));
        assert!(vault.calls().is_empty());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listing
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_filter_by_customer_and_saved_with_take() {
        let (persistence, _vault) = setup().await;
        persistence
            .create(None, numbered_card("1", 1, false))
            .await
            .unwrap();
        persistence
            .create(None, numbered_card("2", 2, true))
            .await
            .unwrap();
        let first = persistence
            .create(None, numbered_card("1", 3, true))
            .await
            .unwrap();
        persistence
            .create(None, numbered_card("1", 4, true))
            .await
            .unwrap();

        let page = persistence
            .get_page_by_filter(
                None,
                CreditCardFilter::default()
                    .with_customer_id("1")
                    .with_saved(true),
                PagingParams::new(0, 1),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, first.id);
        assert_eq!(page.data[0].customer_id.as_deref(), Some("1"));
        assert!(page.data[0].saved);
        assert_eq!(page.total, None);
    }

    #[tokio::test]
    async fn test_skip_and_take_span_backend_pages() {
        let (persistence, vault) = setup().await;
        let ids = seed(&persistence, "1", 45).await;
        vault.reset_calls();

        let page = persistence
            .get_page_by_filter(None, CreditCardFilter::default(), PagingParams::new(18, 7))
            .await
            .unwrap();

        let got: Vec<String> = page.data.into_iter().filter_map(|c| c.id).collect();
        assert_eq!(got, ids[18..25].to_vec());
        assert_eq!(
            vault.calls(),
            vec!["list:1".to_string(), "list:2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_take_reached_on_first_page_stops_paging() {
        let (persistence, vault) = setup().await;
        let ids = seed(&persistence, "1", 45).await;
        vault.reset_calls();

        let page = persistence
            .get_page_by_filter(None, CreditCardFilter::default(), PagingParams::new(0, 5))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.data[4].id.as_deref(), Some(ids[4].as_str()));
        assert_eq!(vault.calls(), vec!["list:1".to_string()]);
    }

    #[tokio::test]
    async fn test_default_paging_reads_until_partial_page() {
        let (persistence, vault) = setup().await;
        seed(&persistence, "1", 2 * PAGE_SIZE + 3).await;
        vault.reset_calls();

        let page = persistence
            .get_page_by_filter(None, CreditCardFilter::default(), PagingParams::default())
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2 * PAGE_SIZE + 3);
        assert_eq!(vault.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_exactly_full_page_fetches_empty_next_page() {
        let (persistence, vault) = setup().await;
        seed(&persistence, "1", PAGE_SIZE).await;
        vault.reset_calls();

        let page = persistence
            .get_page_by_filter(None, CreditCardFilter::default(), PagingParams::default())
            .await
            .unwrap();

        assert_eq!(page.data.len(), PAGE_SIZE);
        assert_eq!(
            vault.calls(),
            vec!["list:1".to_string(), "list:2".to_string()]
        );
    }

    #[tokio::test]
    async fn test_filter_by_ids_and_state() {
        let (persistence, _vault) = setup().await;
        let ids = seed(&persistence, "1", 5).await;

        let page = persistence
            .get_page_by_filter(
                None,
                CreditCardFilter::default()
                    .with_ids([ids[1].clone(), ids[3].clone(), "CARD-999".to_string()])
                    .with_state(CreditCardState::Ok),
                PagingParams::default(),
            )
            .await
            .unwrap();

        let got: Vec<String> = page.data.into_iter().filter_map(|c| c.id).collect();
        assert_eq!(got, vec![ids[1].clone(), ids[3].clone()]);

        let expired = persistence
            .get_page_by_filter(
                None,
                CreditCardFilter::default().with_state(CreditCardState::Expired),
                PagingParams::default(),
            )
            .await
            .unwrap();
        assert!(expired.data.is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_id() {
        let (persistence, _vault) = setup().await;
        let ids = seed(&persistence, "1", 3).await;

        let page = persistence
            .get_page_by_filter(
                None,
                CreditCardFilter::default().with_id(ids[2].clone()),
                PagingParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id.as_deref(), Some(ids[2].as_str()));
    }

    #[tokio::test]
    async fn test_customer_filter_is_forwarded() {
        let (persistence, _vault) = setup().await;
        seed(&persistence, "1", 3).await;
        seed(&persistence, "2", 2).await;

        let page = persistence
            .get_page_by_filter(
                None,
                CreditCardFilter::default().with_customer_id("2"),
                PagingParams::default(),
            )
            .await
            .unwrap();

        assert_eq!(page.data.len(), 2);
        assert!(
            page.data
                .iter()
                .all(|c| c.customer_id.as_deref() == Some("2"))
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clear
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_clear_single_partial_page() {
        let (persistence, vault) = setup().await;
        seed(&persistence, "1", 5).await;
        vault.reset_calls();

        persistence.clear(None).await.unwrap();

        assert_eq!(vault.len(), 0);
        let calls = vault.calls();
        assert_eq!(calls.iter().filter(|c| c.starts_with("list")).count(), 1);
        assert_eq!(calls.iter().filter(|c| c.starts_with("delete")).count(), 5);
    }

    #[tokio::test]
    async fn test_clear_many_pages() {
        let (persistence, vault) = setup().await;
        seed(&persistence, "1", 2 * PAGE_SIZE + 5).await;
        seed(&persistence, "2", 3).await;
        vault.reset_calls();

        persistence.clear(None).await.unwrap();

        assert_eq!(vault.len(), 0);
        let lists: Vec<String> = vault
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("list"))
            .collect();
        assert_eq!(lists, vec!["list:1", "list:1", "list:1"]);
    }

    #[tokio::test]
    async fn test_clear_aborts_on_delete_error() {
        let (persistence, vault) = setup().await;
        seed(&persistence, "1", 3).await;
        vault.fail_delete.store(true, Ordering::SeqCst);

        let result = persistence.clear(None).await;

        assert!(matches!(result, Err(RepoError::Backend(_))));
        assert_eq!(vault.len(), 3);
    }
}
