//! Section units against the in-memory API.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeMap;
use std::rc::Rc;

use common::{seeded_api, FakeApi};
use distribution_portal::api::{Query, Resource};
use distribution_portal::sections::entity_editor::{CREATE, SWITCH_TO_ADD, SWITCH_TO_LIST};
use distribution_portal::sections::{
    Column, EditorSpec, EntityEditor, FieldSpec, PaymentCollection, PaymentVerification,
    ResourceTable, SectionContext, SectionUnit, TableSpec, ViewMode,
};
use distribution_portal::view::{Block, Command, FieldKind, Tone};
use distribution_portal::wire::VerificationStatus;

fn ctx(api: &Rc<FakeApi>) -> SectionContext {
    SectionContext::new(api.clone(), Query::new())
}

fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn product_spec() -> EditorSpec {
    EditorSpec {
        resource: Resource::Products,
        title: "Inventory",
        subtitle: "Products on hand",
        noun: "Product",
        columns: vec![Column::text("name", "Product"), Column::text("quantity", "Qty")],
        fields: vec![
            FieldSpec::new("name", "Product Name", FieldKind::Text).required(),
            FieldSpec::new("sku", "SKU", FieldKind::Text).required(),
            FieldSpec::new("price", "Price", FieldKind::Number).required(),
            FieldSpec::new("quantity", "Quantity", FieldKind::Number).required(),
            FieldSpec::new("category", "Category", FieldKind::Text),
        ],
        allow_delete: true,
    }
}

async fn loaded_editor(api: &Rc<FakeApi>) -> EntityEditor {
    let mut editor = EntityEditor::new(product_spec(), ctx(api));
    editor.load().await;
    editor
}

const NEW_PRODUCT: [(&str, &str); 4] = [
    ("name", "Sugar 1kg"),
    ("sku", "SUG-1"),
    ("price", "3.75"),
    ("quantity", "12"),
];

// =============================================================================
// Entity editor
// =============================================================================

#[tokio::test]
async fn test_add_then_create_returns_to_list_with_new_record() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;
    assert_eq!(editor.records().len(), 2);

    assert!(editor.switch_to_add());
    assert_eq!(editor.view_mode(), ViewMode::Add);
    assert!(editor.create(&values(&NEW_PRODUCT)).await);

    assert_eq!(editor.view_mode(), ViewMode::List);
    assert_eq!(editor.records().len(), 3);
    assert!(editor.records().iter().any(|r| r["name"] == "Sugar 1kg"));
    assert_eq!(editor.notice().map(|n| n.text.as_str()), Some("Product created successfully!"));
    assert!(editor.draft().is_empty());

    let stored = api
        .rows(Resource::Products)
        .into_iter()
        .find(|r| r["sku"] == "SUG-1")
        .expect("stored product");
    assert_eq!(stored["price"], json!(3.75));
    assert_eq!(stored["quantity"], json!(12));
    assert!(stored.get("category").is_none());
}

#[tokio::test]
async fn test_missing_fields_keep_mode_and_input() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;
    editor.switch_to_add();

    let partial = values(&[("name", "Sugar 1kg"), ("sku", ""), ("price", "3.75")]);
    assert!(!editor.create(&partial).await);

    assert_eq!(editor.view_mode(), ViewMode::Add);
    assert_eq!(editor.draft().get("name").map(String::as_str), Some("Sugar 1kg"));
    let notice = editor.notice().expect("validation notice");
    assert_eq!(notice.tone, Tone::Error);
    assert_eq!(notice.text, "Please fill in all fields");
    assert!(api.writes().is_empty());

    // the re-rendered form still shows what was typed
    let form = editor.render().forms().next().cloned().expect("form");
    let name = form.fields.iter().find(|f| f.name == "name").expect("name field");
    assert_eq!(name.value, "Sugar 1kg");
}

#[tokio::test]
async fn test_non_numeric_price_is_rejected_locally() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;
    editor.switch_to_add();

    let mut input = values(&NEW_PRODUCT);
    input.insert("price".into(), "cheap".into());
    assert!(!editor.create(&input).await);

    assert_eq!(editor.notice().map(|n| n.text.as_str()), Some("Price must be a number"));
    assert_eq!(editor.view_mode(), ViewMode::Add);
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_server_failure_keeps_form_for_retry() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;
    editor.switch_to_add();
    api.fail(Resource::Products);

    assert!(!editor.create(&values(&NEW_PRODUCT)).await);

    assert_eq!(editor.view_mode(), ViewMode::Add);
    assert_eq!(editor.notice().map(|n| n.text.as_str()), Some("Internal server error"));
    assert_eq!(editor.draft().get("sku").map(String::as_str), Some("SUG-1"));
    assert_eq!(editor.records().len(), 2);
}

#[tokio::test]
async fn test_edit_prefills_and_update_returns_to_list() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;

    assert!(editor.switch_to_edit("2"));
    assert_eq!(editor.view_mode(), ViewMode::Edit);
    assert_eq!(editor.draft().get("name").map(String::as_str), Some("Cooking Oil"));
    assert_eq!(editor.draft().get("price").map(String::as_str), Some("4.25"));

    let mut input = editor.draft().clone();
    input.insert("quantity".into(), "30".into());
    assert!(editor.update(&input).await);

    assert_eq!(editor.view_mode(), ViewMode::List);
    assert_eq!(api.writes(), vec!["PUT /api/products/2"]);
    let updated = editor
        .records()
        .iter()
        .find(|r| r["id"] == 2)
        .expect("product 2");
    assert_eq!(updated["quantity"], json!(30));
}

#[tokio::test]
async fn test_no_direct_add_to_edit_transition() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;
    editor.switch_to_add();

    assert!(!editor.switch_to_edit("1"));
    assert!(!editor.switch_to_add());
    assert_eq!(editor.view_mode(), ViewMode::Add);

    editor.switch_to_list();
    assert!(editor.switch_to_edit("1"));
}

#[tokio::test]
async fn test_edit_of_unknown_record_stays_in_list() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;

    assert!(!editor.switch_to_edit("99"));
    assert_eq!(editor.view_mode(), ViewMode::List);
    assert_eq!(editor.notice().map(|n| n.tone), Some(Tone::Error));
}

#[tokio::test]
async fn test_delete_reloads_list() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;

    assert!(editor.delete("1").await);

    assert_eq!(editor.records().len(), 1);
    assert_eq!(api.writes(), vec!["DELETE /api/products/1"]);
}

#[tokio::test]
async fn test_commands_drive_the_editor() {
    let api = seeded_api();
    let mut editor = loaded_editor(&api).await;

    editor.handle(&Command::new(SWITCH_TO_ADD)).await;
    assert_eq!(editor.render().heading, "Add Product");

    editor.handle(&Command::new(SWITCH_TO_LIST)).await;
    assert_eq!(editor.view_mode(), ViewMode::List);

    editor.handle(&Command::new(SWITCH_TO_ADD)).await;
    editor
        .handle(&Command::new(CREATE).with_values(&values(&NEW_PRODUCT)))
        .await;
    assert_eq!(editor.view_mode(), ViewMode::List);
    assert_eq!(editor.records().len(), 3);
}

#[tokio::test]
async fn test_failed_load_shows_empty_list() {
    let api = FakeApi::new();
    api.fail(Resource::Products);
    let editor = loaded_editor(&api).await;

    assert!(editor.records().is_empty());
    let rendered = editor.render();
    assert!(rendered.blocks.iter().any(|b| matches!(b, Block::Empty(_))));
    assert_eq!(rendered.tables().count(), 0);
}

// =============================================================================
// Payment collection
// =============================================================================

async fn loaded_collection(api: &Rc<FakeApi>) -> PaymentCollection {
    let mut collection = PaymentCollection::new(ctx(api));
    collection.load().await;
    collection
}

#[tokio::test]
async fn test_only_unpaid_orders_are_offered() {
    let api = seeded_api();
    let collection = loaded_collection(&api).await;

    let ids: Vec<i64> = collection.orders().iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![11]);
    assert_eq!(collection.payments().len(), 2);
}

#[tokio::test]
async fn test_partial_payment_is_rejected_before_any_write() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;
    let orders_before = collection.orders().to_vec();
    let payments_before = collection.payments().to_vec();

    let input = values(&[("order_id", "11"), ("amount", "100.00"), ("method", "cash")]);
    assert!(!collection.record_payment(&input).await);

    assert!(api.writes().is_empty());
    assert_eq!(collection.orders(), orders_before.as_slice());
    assert_eq!(collection.payments(), payments_before.as_slice());
    assert_eq!(
        collection.notice().map(|n| n.text.as_str()),
        Some("Payment must be for the full order amount. Partial payments are not allowed.")
    );
}

#[tokio::test]
async fn test_overpayment_is_rejected_too() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;

    let input = values(&[("order_id", "11"), ("amount", "150.01"), ("method", "cash")]);
    assert!(!collection.record_payment(&input).await);
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_non_numeric_amounts_never_match_a_free_order() {
    let api = seeded_api();
    api.seed(
        Resource::SalesOrders,
        vec![json!({"id": 50, "orderNumber": "SO-050", "subtotal": "0.00", "paymentStatus": "unpaid"})],
    );
    let mut collection = loaded_collection(&api).await;

    for amount in ["NaN", "inf", "-inf", "-0.5"] {
        let input = values(&[("order_id", "50"), ("amount", amount), ("method", "cash")]);
        assert!(!collection.record_payment(&input).await, "{amount} accepted");
        assert_eq!(
            collection.notice().map(|n| n.text.as_str()),
            Some("Amount must be a number"),
            "{amount}"
        );
    }
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_sub_cent_amount_is_rejected() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;

    let input = values(&[("order_id", "11"), ("amount", "150.004"), ("method", "cash")]);
    assert!(!collection.record_payment(&input).await);

    assert!(api.writes().is_empty());
    assert_eq!(
        collection.notice().map(|n| n.text.as_str()),
        Some("Payment must be for the full order amount. Partial payments are not allowed.")
    );
}

#[tokio::test]
async fn test_recorded_amount_is_the_order_subtotal() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;

    let input = values(&[("order_id", "11"), ("amount", "150.000"), ("method", "check")]);
    assert!(collection.record_payment(&input).await);

    let payment = api
        .rows(Resource::Payments)
        .into_iter()
        .find(|p| p["salesOrderId"] == 11)
        .expect("new payment");
    assert_eq!(payment["amount"], json!(150.0));
}

#[tokio::test]
async fn test_paid_order_cannot_be_collected_again() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;

    let input = values(&[("order_id", "12"), ("amount", "80.00"), ("method", "cash")]);
    assert!(!collection.record_payment(&input).await);

    assert_eq!(
        collection.notice().map(|n| n.text.as_str()),
        Some("Order 12 is not awaiting payment")
    );
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_full_payment_is_recorded_and_order_marked_paid() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;
    assert!(collection.select_order("11"));

    // the selected order prefills the exact outstanding amount
    let form = collection.render().forms().next().cloned().expect("payment form");
    let amount = form.fields.iter().find(|f| f.name == "amount").expect("amount");
    assert_eq!(amount.value, "150.00");

    let input = values(&[("order_id", "11"), ("amount", "150"), ("method", "bank_transfer")]);
    assert!(collection.record_payment(&input).await);

    assert_eq!(api.writes(), vec!["POST /api/payments", "PUT /api/sales-orders/11"]);
    assert!(collection.orders().is_empty());
    assert_eq!(collection.payments().len(), 3);
    assert_eq!(collection.notice().map(|n| n.tone), Some(Tone::Success));

    let payment = api
        .rows(Resource::Payments)
        .into_iter()
        .find(|p| p["salesOrderId"] == 11)
        .expect("new payment");
    assert_eq!(payment["amount"], json!(150.0));
    assert_eq!(payment["paymentMethod"], "bank_transfer");
}

#[tokio::test]
async fn test_missing_method_is_reported() {
    let api = seeded_api();
    let mut collection = loaded_collection(&api).await;

    let input = values(&[("order_id", "11"), ("amount", "150.00")]);
    assert!(!collection.record_payment(&input).await);
    assert_eq!(collection.notice().map(|n| n.text.as_str()), Some("Please fill in all fields"));
}

// =============================================================================
// Payment verification
// =============================================================================

#[tokio::test]
async fn test_pending_payment_is_verified() {
    let api = seeded_api();
    let mut review = PaymentVerification::new(ctx(&api));
    review.load().await;

    assert!(review.review("21", VerificationStatus::Verified).await);

    assert_eq!(api.writes(), vec!["PUT /api/payments/21"]);
    let payment = review.payments().iter().find(|p| p.id == 21).expect("payment 21");
    assert_eq!(payment.status, VerificationStatus::Verified);
}

#[tokio::test]
async fn test_reviewed_payment_is_left_alone() {
    let api = seeded_api();
    let mut review = PaymentVerification::new(ctx(&api));
    review.load().await;

    assert!(!review.review("22", VerificationStatus::Rejected).await);
    assert!(api.writes().is_empty());
}

// =============================================================================
// Resource table
// =============================================================================

#[tokio::test]
async fn test_scoped_table_lists_only_matching_rows() {
    let api = seeded_api();
    let mut scope = Query::new();
    scope.insert("id".into(), "7".into());
    let spec = TableSpec::new(Resource::Deliveries, "Deliveries", "Today")
        .columns(vec![Column::text("deliveryNumber", "Delivery"), Column::badge("status", "Status")])
        .scoped("id", "driverId");
    let mut table = ResourceTable::new(spec, SectionContext::new(api.clone(), scope));

    table.load().await;

    assert_eq!(api.calls(), vec!["GET /api/deliveries?driverId=7"]);
    let numbers: Vec<&str> = table
        .rows()
        .iter()
        .filter_map(|r| r["deliveryNumber"].as_str())
        .collect();
    assert_eq!(numbers, vec!["DL-31", "DL-33"]);
}

#[tokio::test]
async fn test_scoped_table_without_scope_lists_everything() {
    let api = seeded_api();
    let spec = TableSpec::new(Resource::Deliveries, "Deliveries", "All").scoped("id", "driverId");
    let mut table = ResourceTable::new(spec, ctx(&api));

    table.load().await;

    assert_eq!(table.rows().len(), 3);
}
