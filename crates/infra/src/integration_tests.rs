//! Engine-level tests over an in-memory store.
//!
//! Verifies:
//! - Derived figures (hamper details, order totals, VAT) flow through the engine
//! - Stock moves only for stock-affecting statuses and is restored on cancel
//! - Failed operations leave every collection untouched
//! - Quote conversion, invoicing and numbering are terminal/unique
//! - Deletes are blocked while an entity is referenced

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};

    use hamperdesk_activity::{ACTIVITY_LOG_CAP, ActivityKind};
    use hamperdesk_core::{DomainError, FixedClock, Money, VatRate};
    use hamperdesk_invoicing::{InvoiceUpdate, PaymentStatus};
    use hamperdesk_parties::{Customer, CustomerDraft, SupplierDraft};
    use hamperdesk_products::{Hamper, HamperComponent, HamperDraft, Product, ProductDraft};
    use hamperdesk_sales::{LineItemInput, OrderDraft, OrderStatus, QuoteDraft, QuoteStatus};

    use crate::engine::Engine;
    use crate::store::{BlobStore, InMemoryBlobStore};

    fn clock() -> Box<FixedClock> {
        Box::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 11, 20, 10, 0, 0).unwrap(),
        ))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn product_draft(name: &str, cost_cents: i64, stock: i64, rate: VatRate) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            cost_price: Money::from_cents(cost_cents),
            stock,
            unit: "ud".to_string(),
            weight_grams: 1_000,
            volume_milliliters: None,
            vat_rate: rate,
            supplier_id: None,
            family: None,
            description: None,
        }
    }

    struct Shop {
        engine: Engine,
        ham: Product,
        wine: Product,
        hamper: Hamper,
        customer: Customer,
    }

    /// "Cesta Ibérica": one ham (100.00 at 10%) and one wine (10.00 at 21%),
    /// sold at 150.00.
    fn shop(ham_stock: i64) -> Shop {
        let mut engine = Engine::in_memory(clock()).unwrap();
        let ham = engine
            .add_product(product_draft("Jamón ibérico", 10_000, ham_stock, VatRate::Reduced))
            .unwrap();
        let wine = engine
            .add_product(product_draft("Rioja crianza", 1_000, 100, VatRate::General))
            .unwrap();
        let hamper = engine
            .add_hamper(HamperDraft {
                name: "Cesta Ibérica".to_string(),
                description: None,
                selling_price: Money::from_units(150),
                components: vec![
                    HamperComponent {
                        product_id: ham.id,
                        quantity: 1,
                    },
                    HamperComponent {
                        product_id: wine.id,
                        quantity: 1,
                    },
                ],
            })
            .unwrap();
        let customer = engine
            .add_customer(CustomerDraft {
                name: "Bodegas Ruiz".to_string(),
                tax_id: Some("B12345678".to_string()),
                address: Some("Calle Mayor 1".to_string()),
                ..CustomerDraft::default()
            })
            .unwrap();
        Shop {
            engine,
            ham,
            wine,
            hamper,
            customer,
        }
    }

    impl Shop {
        fn order_draft(&self, qty: i64, status: OrderStatus) -> OrderDraft {
            OrderDraft::new(
                self.customer.id,
                vec![LineItemInput::new(self.hamper.id, qty)],
                status,
            )
        }

        fn stock(&self, product: &Product) -> i64 {
            self.engine.product(&product.id).unwrap().stock
        }
    }

    #[test]
    fn hamper_details_and_order_totals_follow_the_worked_example() {
        let mut s = shop(10);
        let details = s.hamper.details.clone().unwrap();
        assert_eq!(details.total_cost, Money::from_cents(11_000));
        assert_eq!(details.total_input_vat, Money::from_cents(1_210));
        assert_eq!(details.profit, Some(Money::from_cents(4_000)));
        let pct = details.profit_percentage.unwrap();
        assert!((pct - 36.3636).abs() < 0.001);

        let order = s.engine.add_order(s.order_draft(1, OrderStatus::Draft)).unwrap();
        assert_eq!(order.total_amount, Money::from_cents(15_000));
        assert_eq!(order.total_vat_amount, Money::from_cents(1_650));
        assert_eq!(order.shipping_address.as_deref(), Some("Calle Mayor 1"));

        let summary = s.engine.vat_summary_for_order(order.id).unwrap();
        assert_eq!(summary.at_rate(VatRate::Reduced).unwrap().base, Money::from_cents(13_636));
        assert_eq!(summary.at_rate(VatRate::General).unwrap().vat, Money::from_cents(286));
        assert_eq!(summary.grand_total, Money::from_cents(16_650));
    }

    #[test]
    fn product_edit_refreshes_hamper_details() {
        let mut s = shop(10);
        let mut draft = product_draft("Jamón ibérico", 12_000, 10, VatRate::Reduced);
        draft.weight_grams = 7_000;
        s.engine.update_product(s.ham.id, draft).unwrap();

        let details = s.engine.hamper(&s.hamper.id).unwrap().details.clone().unwrap();
        assert_eq!(details.total_cost, Money::from_cents(13_000));
        assert_eq!(details.total_weight_grams, 8_000);
        assert_eq!(details.profit, Some(Money::from_cents(2_000)));
    }

    #[test]
    fn processing_order_consumes_and_cancel_restores_stock() {
        let mut s = shop(10);
        let order = s.engine.add_order(s.order_draft(3, OrderStatus::Draft)).unwrap();
        assert_eq!(s.stock(&s.ham), 10);

        s.engine
            .update_order_status(order.id, OrderStatus::Processing)
            .unwrap();
        assert_eq!(s.stock(&s.ham), 7);
        assert_eq!(s.stock(&s.wine), 97);

        s.engine
            .update_order_status(order.id, OrderStatus::Shipped)
            .unwrap();
        assert_eq!(s.stock(&s.ham), 7);

        s.engine
            .update_order_status(order.id, OrderStatus::Cancelled)
            .unwrap();
        assert_eq!(s.stock(&s.ham), 10);
        assert_eq!(s.stock(&s.wine), 100);
    }

    #[test]
    fn insufficient_stock_rejects_the_whole_operation() {
        let mut s = shop(2);
        let next_before = s.engine.next_order_number();
        let log_before = s.engine.activity_log().len();

        let err = s
            .engine
            .add_order(s.order_draft(3, OrderStatus::Processing))
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { required: 3, available: 2, .. }));

        assert!(s.engine.orders().is_empty());
        assert_eq!(s.stock(&s.ham), 2);
        assert_eq!(s.stock(&s.wine), 100);
        assert_eq!(s.engine.next_order_number(), next_before);
        assert_eq!(s.engine.activity_log().len(), log_before);
    }

    #[test]
    fn oversized_quantities_are_rejected_without_side_effects() {
        let mut s = shop(10);
        let next_before = s.engine.next_order_number();
        let log_before = s.engine.activity_log().len();
        let hampers_before = s.engine.hampers().to_vec();

        for status in [OrderStatus::Draft, OrderStatus::Processing] {
            let err = s
                .engine
                .add_order(s.order_draft(i64::MAX / 1_000, status))
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{status:?}: {err:?}");
        }
        let err = s
            .engine
            .add_quote(QuoteDraft::new(
                s.customer.id,
                vec![LineItemInput::new(s.hamper.id, i64::MAX)],
            ))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let order = s.engine.add_order(s.order_draft(1, OrderStatus::Processing)).unwrap();
        let err = s
            .engine
            .update_order(order.id, s.order_draft(i64::MAX / 1_000, OrderStatus::Processing))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(s.engine.order(&order.id).unwrap().items[0].quantity, 1);
        assert_eq!(s.stock(&s.ham), 9);

        let err = s
            .engine
            .add_hamper(HamperDraft {
                name: "Cesta gigante".to_string(),
                description: None,
                selling_price: Money::from_units(150),
                components: vec![HamperComponent {
                    product_id: s.ham.id,
                    quantity: i64::MAX / 1_000,
                }],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert_eq!(s.engine.orders().len(), 1);
        assert!(s.engine.quotes().is_empty());
        assert_eq!(s.engine.hampers(), hampers_before.as_slice());
        assert_eq!(s.stock(&s.wine), 99);
        assert_ne!(s.engine.next_order_number(), next_before);
        assert_eq!(s.engine.activity_log().len(), log_before + 1);
    }

    #[test]
    fn in_flight_edits_skip_the_availability_check() {
        let mut s = shop(5);
        let order = s
            .engine
            .add_order(s.order_draft(4, OrderStatus::Processing))
            .unwrap();
        assert_eq!(s.stock(&s.ham), 1);

        s.engine
            .update_order(order.id, s.order_draft(8, OrderStatus::Packaging))
            .unwrap();
        assert_eq!(s.stock(&s.ham), -3);
    }

    #[test]
    fn quote_conversion_is_one_shot() {
        let mut s = shop(10);
        let quote = s
            .engine
            .add_quote(QuoteDraft::new(
                s.customer.id,
                vec![LineItemInput::priced(s.hamper.id, 2, Money::from_units(140))],
            ))
            .unwrap();
        assert_eq!(quote.quote_number, "PRE-2026-0001");
        assert_eq!(quote.expiry_date, date(2026, 12, 20));

        let order = s.engine.convert_quote_to_order(quote.id).unwrap();
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert_eq!(order.items[0].unit_price, Money::from_units(140));
        assert_eq!(order.total_amount, Money::from_units(280));
        assert!(order.notes.as_deref().unwrap().contains("PRE-2026-0001"));
        assert_eq!(s.stock(&s.ham), 10);

        let stored = s.engine.quote(&quote.id).unwrap();
        assert_eq!(stored.status, QuoteStatus::ConvertedToOrder);
        assert_eq!(stored.related_order_id, Some(order.id));

        let err = s.engine.convert_quote_to_order(quote.id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(s.engine.orders().len(), 1);

        let err = s
            .engine
            .update_quote(
                quote.id,
                QuoteDraft::new(s.customer.id, vec![LineItemInput::new(s.hamper.id, 1)]),
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn invoices_are_issued_once_per_order() {
        let mut s = shop(10);
        let order = s
            .engine
            .add_order(s.order_draft(1, OrderStatus::Delivered))
            .unwrap();

        let invoice = s.engine.generate_invoice_for_order(order.id).unwrap();
        assert_eq!(invoice.invoice_number, "FAC-2026-0001");
        assert_eq!(invoice.issue_date, date(2026, 11, 20));
        assert_eq!(invoice.due_date, date(2026, 12, 20));
        assert_eq!(invoice.grand_total, Money::from_cents(16_650));
        assert_eq!(invoice.customer_name, "Bodegas Ruiz");
        assert_eq!(invoice.customer_tax_id.as_deref(), Some("B12345678"));

        let err = s.engine.generate_invoice_for_order(order.id).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(s.engine.invoices().len(), 1);
        assert_eq!(s.engine.next_invoice_number(), "FAC-2026-0002");
    }

    #[test]
    fn cancelled_invoice_rejects_edits() {
        let mut s = shop(10);
        let order = s.engine.add_order(s.order_draft(1, OrderStatus::Delivered)).unwrap();
        let invoice = s.engine.generate_invoice_for_order(order.id).unwrap();

        s.engine
            .update_invoice(
                invoice.id,
                InvoiceUpdate {
                    payment_status: Some(PaymentStatus::Cancelled),
                    ..InvoiceUpdate::default()
                },
            )
            .unwrap();
        let err = s
            .engine
            .update_invoice(
                invoice.id,
                InvoiceUpdate {
                    notes: Some("paid late".to_string()),
                    ..InvoiceUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn housekeeping_expires_quotes_and_flags_overdue_invoices() {
        let mut s = shop(10);
        let quote = s
            .engine
            .add_quote(QuoteDraft::new(
                s.customer.id,
                vec![LineItemInput::new(s.hamper.id, 1)],
            ))
            .unwrap();
        let order = s.engine.add_order(s.order_draft(1, OrderStatus::Delivered)).unwrap();
        let invoice = s.engine.generate_invoice_for_order(order.id).unwrap();

        assert!(s.engine.expire_quotes(date(2026, 12, 20)).is_empty());
        assert_eq!(s.engine.expire_quotes(date(2026, 12, 21)), vec![quote.id]);
        assert_eq!(s.engine.quote(&quote.id).unwrap().status, QuoteStatus::Expired);

        assert_eq!(s.engine.mark_overdue_invoices(date(2026, 12, 21)), vec![invoice.id]);
        assert_eq!(
            s.engine.invoice(&invoice.id).unwrap().payment_status,
            PaymentStatus::Overdue
        );
        assert!(s.engine.mark_overdue_invoices(date(2026, 12, 22)).is_empty());
        assert_eq!(s.engine.activity_log()[0].kind, ActivityKind::InvoiceOverdue);
    }

    #[test]
    fn order_numbers_are_sequential_within_the_year() {
        let mut s = shop(100);
        let mut numbers = Vec::new();
        for _ in 0..3 {
            let draft = s.order_draft(1, OrderStatus::Draft);
            numbers.push(s.engine.add_order(draft).unwrap().order_number);
        }
        assert_eq!(numbers, vec!["20260001", "20260002", "20260003"]);
        assert_eq!(s.engine.next_order_number(), "20260004");
    }

    #[test]
    fn referenced_entities_cannot_be_deleted() {
        let mut s = shop(10);
        let supplier = s
            .engine
            .add_supplier(SupplierDraft {
                name: "Conservas Ortiz".to_string(),
                ..SupplierDraft::default()
            })
            .unwrap();
        let mut draft = product_draft("Bonito del norte", 600, 20, VatRate::Reduced);
        draft.supplier_id = Some(supplier.id);
        s.engine.add_product(draft).unwrap();
        s.engine.add_order(s.order_draft(1, OrderStatus::Draft)).unwrap();

        let referenced = |r: Result<_, DomainError>| {
            matches!(r, Err(DomainError::ReferentialIntegrity { .. }))
        };
        assert!(referenced(s.engine.delete_product(s.ham.id).map(|_| ())));
        assert!(referenced(s.engine.delete_hamper(s.hamper.id).map(|_| ())));
        assert!(referenced(s.engine.delete_customer(s.customer.id).map(|_| ())));
        assert!(referenced(s.engine.delete_supplier(supplier.id).map(|_| ())));

        assert_eq!(s.engine.products().len(), 3);
        assert_eq!(s.engine.suppliers().len(), 1);
    }

    #[test]
    fn unreferenced_entities_can_be_deleted() {
        let mut s = shop(10);
        let spare = s
            .engine
            .add_product(product_draft("Aceite", 800, 4, VatRate::SuperReduced))
            .unwrap();
        s.engine.delete_product(spare.id).unwrap();
        assert!(s.engine.product(&spare.id).is_none());
        assert_eq!(s.engine.activity_log()[0].kind, ActivityKind::ProductDeleted);

        let err = s.engine.delete_product(spare.id).unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[test]
    fn hamper_needs_known_products() {
        let mut s = shop(10);
        let err = s
            .engine
            .add_hamper(HamperDraft {
                name: "Vacía".to_string(),
                description: None,
                selling_price: Money::from_units(10),
                components: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let ghost = hamperdesk_core::ProductId::new();
        let err = s
            .engine
            .add_hamper(HamperDraft {
                name: "Fantasma".to_string(),
                description: None,
                selling_price: Money::from_units(10),
                components: vec![HamperComponent {
                    product_id: ghost,
                    quantity: 1,
                }],
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(s.engine.hampers().len(), 1);
    }

    #[test]
    fn low_stock_listing_is_sorted() {
        let s = shop(3);
        let low = s.engine.low_stock_products(5);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, s.ham.id);
    }

    #[test]
    fn activity_log_is_capped_newest_first() {
        let mut s = shop(10);
        for i in 0..(ACTIVITY_LOG_CAP + 10) {
            s.engine
                .add_customer(CustomerDraft {
                    name: format!("Cliente {i}"),
                    ..CustomerDraft::default()
                })
                .unwrap();
        }
        let log = s.engine.activity_log();
        assert_eq!(log.len(), ACTIVITY_LOG_CAP);
        assert_eq!(log[0].message, format!("Customer Cliente {} created", ACTIVITY_LOG_CAP + 9));
    }

    #[test]
    fn state_survives_reopening_the_store() {
        let store: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
        let order_id = {
            let mut engine = Engine::open(store.clone(), clock()).unwrap();
            let p = engine
                .add_product(product_draft("Turrón", 450, 10, VatRate::Reduced))
                .unwrap();
            let h = engine
                .add_hamper(HamperDraft {
                    name: "Lote Dulce".to_string(),
                    description: None,
                    selling_price: Money::from_units(20),
                    components: vec![HamperComponent {
                        product_id: p.id,
                        quantity: 2,
                    }],
                })
                .unwrap();
            let c = engine
                .add_customer(CustomerDraft {
                    name: "Ana".to_string(),
                    ..CustomerDraft::default()
                })
                .unwrap();
            engine
                .add_order(OrderDraft::new(
                    c.id,
                    vec![LineItemInput::new(h.id, 2)],
                    OrderStatus::Processing,
                ))
                .unwrap()
                .id
        };

        let mut reopened = Engine::open(store, clock()).unwrap();
        assert_eq!(reopened.products()[0].stock, 6);
        assert_eq!(reopened.order(&order_id).unwrap().order_number, "20260001");
        assert_eq!(reopened.activity_log().len(), 4);

        let c = reopened.customers()[0].id;
        let h = reopened.hampers()[0].id;
        let second = reopened
            .add_order(OrderDraft::new(
                c,
                vec![LineItemInput::new(h, 1)],
                OrderStatus::Draft,
            ))
            .unwrap();
        assert_eq!(second.order_number, "20260002");
    }
}
