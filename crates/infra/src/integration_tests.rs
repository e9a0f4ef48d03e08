//! Ledger tests over the in-memory store.
//!
//! Tests: Ledger → AssetStore → counters / edges
//!
//! Verifies:
//! - `0 <= in_use <= quantity` under sequential and concurrent use
//! - attach/detach are all-or-nothing and round-trip the child's counter
//! - search, suggestion and pagination semantics
//! - timeouts and closed stores surface as `Unavailable`

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use stocktag_core::AssetId;
    use stocktag_inventory::{Asset, AssetDraft, Attributes, QuantityInput};

    use crate::labels::{InMemoryLabelPrinter, LabelError, LabelPrinter};
    use crate::ledger::{InventoryLedger, LedgerError, PrintError, SEARCH_LIMIT};
    use crate::reconcile::AuditFinding;
    use crate::store::{InMemoryAssetStore, StoreError};

    type Ledger = InventoryLedger<Arc<InMemoryAssetStore>>;

    fn setup() -> Ledger {
        InventoryLedger::new(Arc::new(InMemoryAssetStore::new()), Duration::from_secs(5))
    }

    fn draft(name: &str, quantity: i64) -> AssetDraft {
        AssetDraft {
            name: name.to_string(),
            asset_type: "equipment".to_string(),
            quantity: QuantityInput::Integer(quantity),
            attributes: Attributes::new(),
        }
    }

    async fn create(ledger: &Ledger, name: &str, quantity: i64) -> Asset {
        ledger.create_asset(draft(name, quantity)).await.unwrap()
    }

    async fn in_use(ledger: &Ledger, id: AssetId) -> i64 {
        ledger.find_by_id(id).await.unwrap().in_use
    }

    #[tokio::test]
    async fn created_assets_start_unused() {
        let ledger = setup();
        let asset = create(&ledger, "Projector", 2).await;
        assert_eq!(asset.in_use, 0);
        assert_eq!(ledger.find_by_id(asset.id).await.unwrap(), asset);
    }

    #[tokio::test]
    async fn negative_quantity_is_rejected_and_nothing_is_stored() {
        let ledger = setup();
        let err = ledger.create_asset(draft("Broken", -1)).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(ledger.list_all(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn text_quantity_without_digits_coerces_to_zero() {
        let ledger = setup();
        let mut d = draft("Mystery box", 0);
        d.quantity = QuantityInput::Text("lots".to_string());
        let asset = ledger.create_asset(d).await.unwrap();
        assert_eq!(asset.quantity, 0);
    }

    #[tokio::test]
    async fn second_checkout_of_single_unit_fails_with_capacity() {
        let ledger = setup();
        let asset = create(&ledger, "Camera", 1).await;

        let change = ledger.check_out(asset.id).await.unwrap();
        assert_eq!(change.after, 1);

        let err = ledger.check_out(asset.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Capacity(_)));
        assert_eq!(in_use(&ledger, asset.id).await, 1);
    }

    #[tokio::test]
    async fn missing_asset_operations_are_not_found() {
        let ledger = setup();
        let ghost = AssetId::new();
        assert!(matches!(ledger.find_by_id(ghost).await, Err(LedgerError::NotFound(_))));
        assert!(matches!(ledger.check_out(ghost).await, Err(LedgerError::NotFound(_))));
        assert!(matches!(ledger.check_in(ghost).await, Err(LedgerError::NotFound(_))));
        assert!(matches!(
            ledger.update_attributes(ghost, Attributes::new()).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(ledger.list_children(ghost).await, Err(LedgerError::NotFound(_))));
    }

    #[tokio::test]
    async fn check_in_floors_at_zero() {
        let ledger = setup();
        let asset = create(&ledger, "Ladder", 1).await;
        let change = ledger.check_in(asset.id).await.unwrap();
        assert!(change.floored());
        assert_eq!(in_use(&ledger, asset.id).await, 0);
    }

    #[tokio::test]
    async fn check_in_cannot_return_a_nested_unit() {
        let ledger = setup();
        let cart = create(&ledger, "Cart", 5).await;
        let laptop = create(&ledger, "Laptop", 1).await;
        ledger.attach_child(cart.id, laptop.id).await.unwrap();

        let err = ledger.check_in(laptop.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(in_use(&ledger, laptop.id).await, 1);

        // The nested unit is still committed, so it cannot be checked out again.
        assert!(matches!(ledger.check_out(laptop.id).await, Err(LedgerError::Capacity(_))));
        assert_eq!(ledger.list_children(cart.id).await.unwrap().len(), 1);
        assert!(ledger.audit().await.unwrap().is_clean());
    }

    #[tokio::test]
    async fn check_in_returns_units_checked_out_beside_nested_ones() {
        let ledger = setup();
        let cart = create(&ledger, "Cart", 5).await;
        let cable = create(&ledger, "Cable", 3).await;
        ledger.attach_child(cart.id, cable.id).await.unwrap();
        ledger.check_out(cable.id).await.unwrap();

        let change = ledger.check_in(cable.id).await.unwrap();
        assert_eq!(change.after, 1);
        assert!(matches!(ledger.check_in(cable.id).await, Err(LedgerError::Conflict(_))));

        ledger.detach_child(cart.id, cable.id).await.unwrap();
        assert_eq!(in_use(&ledger, cable.id).await, 0);
    }

    #[tokio::test]
    async fn attach_then_detach_restores_child_counter() {
        let ledger = setup();
        let parent = create(&ledger, "Kit", 1).await;
        let child = create(&ledger, "Cable", 3).await;
        ledger.check_out(child.id).await.unwrap();
        let before = in_use(&ledger, child.id).await;

        ledger.attach_child(parent.id, child.id).await.unwrap();
        assert_eq!(in_use(&ledger, child.id).await, before + 1);

        ledger.detach_child(parent.id, child.id).await.unwrap();
        assert_eq!(in_use(&ledger, child.id).await, before);
        assert!(ledger.list_children(parent.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn attaching_exhausted_child_blocks_checkout() {
        let ledger = setup();
        let a = create(&ledger, "Cart", 5).await;
        let b = create(&ledger, "Laptop", 1).await;

        ledger.attach_child(a.id, b.id).await.unwrap();
        assert_eq!(in_use(&ledger, b.id).await, 1);

        let err = ledger.check_out(b.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Capacity(_)));
    }

    #[tokio::test]
    async fn failed_attach_changes_nothing() {
        let ledger = setup();
        let parent = create(&ledger, "Bag", 1).await;
        let child = create(&ledger, "Charger", 1).await;
        ledger.check_out(child.id).await.unwrap();

        let err = ledger.attach_child(parent.id, child.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Capacity(_)));
        assert!(ledger.list_children(parent.id).await.unwrap().is_empty());
        assert_eq!(in_use(&ledger, child.id).await, 1);
    }

    #[tokio::test]
    async fn invalid_nesting_is_rejected() {
        let ledger = setup();
        let a = create(&ledger, "Room", 1).await;
        let b = create(&ledger, "Shelf", 2).await;
        let c = create(&ledger, "Box", 2).await;

        let err = ledger.attach_child(a.id, a.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        ledger.attach_child(a.id, b.id).await.unwrap();
        let err = ledger.attach_child(a.id, b.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));

        ledger.attach_child(b.id, c.id).await.unwrap();
        let err = ledger.attach_child(c.id, a.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(in_use(&ledger, a.id).await, 0);

        let err = ledger.attach_child(a.id, AssetId::new()).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[tokio::test]
    async fn detaching_missing_edge_is_not_found() {
        let ledger = setup();
        let a = create(&ledger, "Room", 1).await;
        let b = create(&ledger, "Desk", 1).await;
        let err = ledger.detach_child(a.id, b.id).await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
        assert_eq!(in_use(&ledger, b.id).await, 0);
    }

    #[tokio::test]
    async fn children_are_listed_with_both_endpoints() {
        let ledger = setup();
        let parent = create(&ledger, "Toolbox", 1).await;
        let hammer = create(&ledger, "Hammer", 1).await;
        let saw = create(&ledger, "Saw", 1).await;
        ledger.attach_child(parent.id, hammer.id).await.unwrap();
        ledger.attach_child(parent.id, saw.id).await.unwrap();

        let links = ledger.list_children(parent.id).await.unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.parent.id == parent.id));
        // Most recently updated edge first.
        assert_eq!(links[0].child.id, saw.id);
        assert_eq!(links[0].child.in_use, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_checkouts_commit_exactly_quantity_units() {
        const N: i64 = 16;
        let ledger = Arc::new(setup());
        let asset = create(&ledger, "Headset", N).await;
        let id = asset.id;

        let handles: Vec<_> = (0..=N)
            .map(|_| {
                let ledger = ledger.clone();
                tokio::spawn(async move { ledger.check_out(id).await })
            })
            .collect();

        let mut ok = 0;
        let mut capacity = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(LedgerError::Capacity(_)) => capacity += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(ok, N);
        assert_eq!(capacity, 1);
        assert_eq!(in_use(&ledger, asset.id).await, N);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_attaches_of_one_child_respect_its_quantity() {
        let ledger = Arc::new(setup());
        let child = create(&ledger, "Battery", 3).await;
        let child_id = child.id;
        let mut parents = Vec::new();
        for i in 0..8 {
            parents.push(create(&ledger, &format!("Drone {i}"), 1).await);
        }

        let handles: Vec<_> = parents
            .iter()
            .map(|p| {
                let (ledger, parent) = (ledger.clone(), p.id);
                tokio::spawn(async move { ledger.attach_child(parent, child_id).await })
            })
            .collect();

        let mut ok = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                ok += 1;
            }
        }
        assert_eq!(ok, 3);
        assert_eq!(in_use(&ledger, child.id).await, 3);
        assert!(ledger.audit().await.unwrap().is_clean());
    }

    #[tokio::test]
    async fn keyword_search_matches_whole_words_only() {
        let ledger = setup();
        let widget = create(&ledger, "Blue Widget", 1).await;
        create(&ledger, "Gadget", 1).await;

        assert!(ledger.search_by_keyword("").await.unwrap().is_empty());
        assert!(ledger.search_by_keyword("   ").await.unwrap().is_empty());

        let hits = ledger.search_by_keyword("widget").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, widget.id);
    }

    #[tokio::test]
    async fn keyword_search_returns_the_most_recent_hundred() {
        let ledger = setup();
        let mut created = Vec::new();
        for i in 0..=SEARCH_LIMIT {
            created.push(create(&ledger, &format!("Tent {i}"), 1).await);
        }

        let hits = ledger.search_by_keyword("tent").await.unwrap();
        assert_eq!(hits.len() as u64, SEARCH_LIMIT);
        assert_eq!(hits[0].id, created.last().unwrap().id);
        assert!(hits.iter().all(|a| a.id != created[0].id));
    }

    #[tokio::test]
    async fn listing_pages_through_all_assets() {
        let ledger = setup();
        for i in 0..23 {
            create(&ledger, &format!("Chair {i}"), 1).await;
        }

        let first = ledger.list_all(1, 10).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 23);
        assert_eq!(first.total_pages, 3);

        let last = ledger.list_all(3, 10).await.unwrap();
        assert_eq!(last.items.len(), 3);
        assert!(!last.has_more());

        // Pages are disjoint and stable.
        let second = ledger.list_all(2, 10).await.unwrap();
        assert!(second.items.iter().all(|a| !first.items.contains(a)));

        assert!(matches!(ledger.list_all(0, 10).await, Err(LedgerError::Validation(_))));
        assert!(matches!(ledger.list_all(1, 101).await, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn suggestions_exclude_self_children_and_ancestors() {
        let ledger = setup();
        let room = create(&ledger, "Storage room", 1).await;
        let shelf = create(&ledger, "Storage shelf", 1).await;
        let bin = create(&ledger, "Storage bin", 1).await;
        let crate_ = create(&ledger, "Storage crate", 1).await;
        ledger.attach_child(room.id, shelf.id).await.unwrap();
        ledger.attach_child(shelf.id, bin.id).await.unwrap();

        let ids: Vec<_> = ledger
            .suggest_attachable(shelf.id, "storage")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![crate_.id]);
    }

    #[tokio::test]
    async fn blank_suggestion_query_returns_most_recent_ten() {
        let ledger = setup();
        let parent = create(&ledger, "Van", 1).await;
        let mut others = Vec::new();
        for i in 0..12 {
            others.push(create(&ledger, &format!("Crate {i}"), 1).await);
        }
        let touched = ledger
            .update_attributes(others[0].id, Attributes::from([("bay".to_string(), "3".to_string())]))
            .await
            .unwrap();

        let suggestions = ledger.suggest_attachable(parent.id, "").await.unwrap();
        assert_eq!(suggestions.len(), 10);
        assert_eq!(suggestions[0].id, touched.id);
        assert!(suggestions.iter().all(|a| a.id != parent.id));
    }

    #[tokio::test]
    async fn quantity_cannot_drop_below_in_use() {
        let ledger = setup();
        let asset = create(&ledger, "Radio", 3).await;
        ledger.check_out(asset.id).await.unwrap();
        ledger.check_out(asset.id).await.unwrap();

        let err = ledger
            .update_quantity(asset.id, QuantityInput::Integer(1))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));

        let resized = ledger
            .update_quantity(asset.id, QuantityInput::Integer(2))
            .await
            .unwrap();
        assert_eq!(resized.quantity, 2);
        assert!(matches!(ledger.check_out(asset.id).await, Err(LedgerError::Capacity(_))));
    }

    #[tokio::test]
    async fn audit_reports_counters_that_lost_a_unit() {
        let ledger = setup();
        let parent = create(&ledger, "Case", 1).await;
        let child = create(&ledger, "Lens", 2).await;
        ledger.attach_child(parent.id, child.id).await.unwrap();
        assert!(ledger.audit().await.unwrap().is_clean());

        // Simulate a lost write by releasing the unit behind the ledger's back.
        ledger.store().force_in_use(child.id, 0).unwrap();

        let report = ledger.audit().await.unwrap();
        assert_eq!(report.findings.len(), 1);
        assert!(matches!(
            &report.findings[0],
            AuditFinding::CounterBelowParents { asset_id, parents: 1, .. } if *asset_id == child.id
        ));
    }

    #[tokio::test]
    async fn labels_require_a_printer_and_an_existing_asset() {
        let store = Arc::new(InMemoryAssetStore::new());
        let plain = InventoryLedger::new(store.clone(), Duration::from_secs(5));
        let asset = plain.create_asset(draft("Tablet", 1)).await.unwrap();
        assert!(matches!(plain.print_label(asset.id).await, Err(PrintError::NotConfigured)));

        let printer = Arc::new(InMemoryLabelPrinter::new());
        let ledger = InventoryLedger::new(store, Duration::from_secs(5)).with_printer(printer.clone());
        ledger.print_label(asset.id).await.unwrap();
        assert_eq!(printer.printed(), vec![asset.id]);

        assert!(matches!(
            ledger.print_label(AssetId::new()).await,
            Err(PrintError::Ledger(LedgerError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn printer_failure_leaves_asset_untouched() {
        let store = Arc::new(InMemoryAssetStore::new());
        let ledger = InventoryLedger::new(store, Duration::from_secs(5))
            .with_printer(Arc::new(InMemoryLabelPrinter::failing("out of paper")));
        let asset = ledger.create_asset(draft("Tablet", 1)).await.unwrap();

        assert!(matches!(ledger.print_label(asset.id).await, Err(PrintError::Failed(_))));
        assert_eq!(ledger.find_by_id(asset.id).await.unwrap(), asset);
    }

    /// Never finishes; flags when the pending job is dropped.
    struct StuckPrinter {
        abandoned: Arc<AtomicBool>,
    }

    struct SetOnDrop(Arc<AtomicBool>);

    impl Drop for SetOnDrop {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl LabelPrinter for StuckPrinter {
        async fn print(&self, _id: AssetId) -> Result<(), LabelError> {
            let _guard = SetOnDrop(self.abandoned.clone());
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn hung_label_job_is_dropped_on_timeout() {
        let abandoned = Arc::new(AtomicBool::new(false));
        let ledger = InventoryLedger::new(Arc::new(InMemoryAssetStore::new()), Duration::from_millis(50))
            .with_printer(Arc::new(StuckPrinter { abandoned: abandoned.clone() }));
        let asset = ledger.create_asset(draft("Scanner", 1)).await.unwrap();

        let err = ledger.print_label(asset.id).await.unwrap_err();
        assert!(matches!(err, PrintError::Failed(msg) if msg.contains("timed out")));
        assert!(abandoned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn slow_store_calls_time_out_as_unavailable() {
        let ledger = InventoryLedger::new(Arc::new(InMemoryAssetStore::new()), Duration::from_millis(20));
        let slow = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok::<_, StoreError>(())
        };
        let err = ledger.guard("probe", slow).await.unwrap_err();
        assert!(matches!(err, LedgerError::Unavailable(_)));
    }

    #[tokio::test]
    async fn closed_ledger_is_unavailable() {
        let ledger = setup();
        let asset = create(&ledger, "Mic", 1).await;
        ledger.close().await;
        assert!(matches!(ledger.check_out(asset.id).await, Err(LedgerError::Unavailable(_))));
        assert!(matches!(ledger.search_by_keyword("mic").await, Err(LedgerError::Unavailable(_))));
    }
}
