//! Driver payment collection: record full payments against unpaid sales
//! orders.
//!
//! A payment must cover the order's outstanding amount exactly. Partial or
//! excess amounts are rejected locally, before any request is sent.

use async_trait::async_trait;
use portal_wire::{to_cents, Payment, PaymentStatus, SalesOrder};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{info, warn};

use super::{format_money, Handled, SectionContext, SectionUnit};
use crate::api::{Query, Resource};
use crate::error::ValidationError;
use crate::view::{
    Block, Cell, Command, FieldKind, Form, FormField, Notice, Renderable, Row, Stat, Table, Trigger,
};

pub const RECORD_PAYMENT: &str = "record-payment";
pub const SELECT_ORDER: &str = "select-order";

pub const FORM_ELEMENT: &str = "payment-form";

const METHODS: [(&str, &str); 4] = [
    ("cash", "Cash"),
    ("check", "Check"),
    ("credit_card", "Credit Card"),
    ("bank_transfer", "Bank Transfer"),
];

pub struct PaymentCollection {
    ctx: SectionContext,
    orders: Vec<SalesOrder>,
    payments: Vec<Payment>,
    draft: BTreeMap<String, String>,
    notice: Option<Notice>,
}

impl PaymentCollection {
    pub fn new(ctx: SectionContext) -> Self {
        Self {
            ctx,
            orders: Vec::new(),
            payments: Vec::new(),
            draft: BTreeMap::new(),
            notice: None,
        }
    }

    /// Orders still awaiting payment.
    pub fn orders(&self) -> &[SalesOrder] {
        &self.orders
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Prefill the form with an order and its outstanding amount.
    pub fn select_order(&mut self, order_id: &str) -> bool {
        let Some(order) = self.orders.iter().find(|o| o.id.to_string() == order_id) else {
            return false;
        };
        let amount = format!("{:.2}", order.outstanding());
        self.draft.insert("order_id".into(), order_id.to_string());
        self.draft.insert("amount".into(), amount);
        self.notice = None;
        true
    }

    fn validate(&self) -> Result<(&SalesOrder, String), ValidationError> {
        let value_of = |key: &str| self.draft.get(key).map(|v| v.trim()).unwrap_or("");
        let (order_id, amount, method) = (value_of("order_id"), value_of("amount"), value_of("method"));

        let missing: Vec<String> = [("order_id", order_id), ("amount", amount), ("method", method)]
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let amount = parse_amount(amount)?;
        let order = self
            .orders
            .iter()
            .find(|o| o.id.to_string() == order_id && o.payment_status == PaymentStatus::Unpaid)
            .ok_or_else(|| ValidationError::UnknownOrder(order_id.to_string()))?;

        let expected_cents = to_cents(order.outstanding());
        let given_cents = to_cents(amount);
        if expected_cents != given_cents || !is_whole_cents(amount) {
            return Err(ValidationError::PartialPayment {
                expected_cents,
                given_cents,
            });
        }
        Ok((order, method.to_string()))
    }

    /// Record a full payment. Returns `true` when the payment was written.
    pub async fn record_payment(&mut self, values: &BTreeMap<String, String>) -> bool {
        for key in ["order_id", "amount", "method"] {
            if let Some(v) = values.get(key) {
                self.draft.insert(key.to_string(), v.clone());
            }
        }

        let (order_id, amount, method) = match self.validate() {
            // the order's own figure is written, never the typed text
            Ok((order, method)) => (order.id, order.outstanding(), method),
            Err(e) => {
                self.notice = Some(Notice::error(e.to_string()));
                return false;
            }
        };

        let body = json!({
            "salesOrderId": order_id,
            "amount": amount,
            "paymentMethod": method,
            "paymentDate": chrono::Utc::now().to_rfc3339(),
        });
        if let Err(e) = self.ctx.data.create(Resource::Payments, &body).await {
            warn!(order_id, error = %e, "Payment create failed");
            self.notice = Some(Notice::error(e.user_message()));
            return false;
        }

        let mark_paid = json!({ "paymentStatus": "paid" });
        let status_update = self
            .ctx
            .data
            .update(Resource::SalesOrders, &order_id.to_string(), &mark_paid)
            .await;

        self.load().await;
        self.draft.clear();
        match status_update {
            Ok(_) => {
                info!(order_id, amount, "Payment recorded");
                self.notice = Some(Notice::success("Payment recorded successfully!"));
            }
            Err(e) => {
                warn!(order_id, error = %e, "Payment recorded but order status not updated");
                self.notice = Some(Notice::error(format!(
                    "Payment recorded, but the order could not be marked paid: {}",
                    e.user_message()
                )));
            }
        }
        true
    }

    fn order_options(&self) -> Vec<(String, String)> {
        self.orders
            .iter()
            .map(|o| {
                (
                    o.id.to_string(),
                    format!("{} ({})", o.label(), format_money(o.outstanding())),
                )
            })
            .collect()
    }
}

/// Parse a typed amount. Only finite, non-negative numbers are amounts.
fn parse_amount(text: &str) -> Result<f64, ValidationError> {
    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(ValidationError::NotANumber {
            field: "Amount".to_string(),
        }),
    }
}

/// Whether `amount` has no fraction of a cent (float noise aside).
fn is_whole_cents(amount: f64) -> bool {
    let cents = amount * 100.0;
    (cents - cents.round()).abs() < 1e-6
}

#[async_trait(?Send)]
impl SectionUnit for PaymentCollection {
    async fn load(&mut self) {
        let orders: Vec<SalesOrder> = self.ctx.list_typed(Resource::SalesOrders, &Query::new()).await;
        self.orders = orders
            .into_iter()
            .filter(|o| o.payment_status == PaymentStatus::Unpaid)
            .collect();
        self.payments = self.ctx.list_typed(Resource::Payments, &Query::new()).await;
    }

    fn render(&self) -> Renderable {
        let draft = |key: &str| self.draft.get(key).cloned().unwrap_or_default();
        let collected: f64 = self.payments.iter().map(|p| p.amount).sum();

        let out = Renderable::new("Payment Collection")
            .subheading("Collect full payment for delivered orders")
            .maybe(self.notice.clone().map(Block::Notice))
            .block(Block::Stats(vec![
                Stat {
                    label: "Unpaid orders".into(),
                    value: self.orders.len().to_string(),
                },
                Stat {
                    label: "Collected".into(),
                    value: format_money(collected),
                },
            ]))
            .block(Block::Form(Form {
                element: FORM_ELEMENT.to_string(),
                fields: vec![
                    FormField::new("order_id", "Sales Order", FieldKind::Select)
                        .required()
                        .value(draft("order_id"))
                        .options(self.order_options()),
                    FormField::new("amount", "Amount", FieldKind::Number)
                        .required()
                        .value(draft("amount")),
                    FormField::new("method", "Payment Method", FieldKind::Select)
                        .required()
                        .value(draft("method"))
                        .options(
                            METHODS
                                .iter()
                                .map(|(v, l)| (v.to_string(), l.to_string()))
                                .collect(),
                        ),
                ],
                submit_label: "Record Payment".to_string(),
                command: Command::new(RECORD_PAYMENT),
                cancel: None,
            }));

        let out = if self.orders.is_empty() {
            out.block(Block::Empty("No unpaid orders.".to_string()))
        } else {
            out.block(Block::Table(Table {
                columns: vec!["Order".into(), "Amount Due".into(), "Status".into(), "".into()],
                rows: self
                    .orders
                    .iter()
                    .map(|o| Row {
                        cells: vec![
                            Cell::Text(o.label()),
                            Cell::Text(format_money(o.outstanding())),
                            Cell::Badge("unpaid".into()),
                            Cell::Actions(vec![Trigger::new(
                                format!("select-order-{}", o.id),
                                "Collect",
                                Command::new(SELECT_ORDER).with("id", o.id),
                            )]),
                        ],
                    })
                    .collect(),
            }))
        };

        if self.payments.is_empty() {
            return out;
        }
        out.block(Block::Table(Table {
            columns: vec!["Payment".into(), "Order".into(), "Amount".into(), "Method".into(), "Status".into()],
            rows: self
                .payments
                .iter()
                .map(|p| Row {
                    cells: vec![
                        Cell::Text(format!("#{}", p.id)),
                        Cell::Text(
                            p.sales_order
                                .as_ref()
                                .map(SalesOrder::label)
                                .unwrap_or_else(|| format!("Order #{}", p.sales_order_id)),
                        ),
                        Cell::Text(format_money(p.amount)),
                        Cell::Text(p.payment_method.clone().unwrap_or_else(|| "-".into())),
                        Cell::Badge(p.status.as_str().to_string()),
                    ],
                })
                .collect(),
        }))
    }

    async fn handle(&mut self, command: &Command) -> Handled {
        match command.name.as_str() {
            RECORD_PAYMENT => {
                let values: BTreeMap<String, String> = ["order_id", "amount", "method"]
                    .iter()
                    .filter_map(|k| command.str(k).map(|v| (k.to_string(), v)))
                    .collect();
                self.record_payment(&values).await;
                Handled::Done
            }
            SELECT_ORDER => {
                if let Some(id) = command.id() {
                    self.select_order(&id);
                }
                Handled::Done
            }
            _ => Handled::Ignored,
        }
    }
}
