//! Assistant-manager review of collected payments.

use async_trait::async_trait;
use portal_wire::{Payment, SalesOrder, VerificationStatus};
use serde_json::json;
use tracing::{info, warn};

use super::{format_money, Handled, SectionContext, SectionUnit};
use crate::api::{Query, Resource};
use crate::view::{Block, Cell, Command, Notice, Renderable, Row, Stat, Table, Trigger};

pub const VERIFY_PAYMENT: &str = "verify-payment";
pub const REJECT_PAYMENT: &str = "reject-payment";

pub struct PaymentVerification {
    ctx: SectionContext,
    payments: Vec<Payment>,
    notice: Option<Notice>,
}

impl PaymentVerification {
    pub fn new(ctx: SectionContext) -> Self {
        Self {
            ctx,
            payments: Vec::new(),
            notice: None,
        }
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Move a pending payment to `status`. Already-reviewed payments are
    /// left alone.
    pub async fn review(&mut self, payment_id: &str, status: VerificationStatus) -> bool {
        let pending = self
            .payments
            .iter()
            .any(|p| p.id.to_string() == payment_id && p.status == VerificationStatus::Pending);
        if !pending {
            self.notice = Some(Notice::error(format!("Payment {payment_id} is not pending review")));
            return false;
        }

        let body = json!({ "status": status.as_str() });
        match self.ctx.data.update(Resource::Payments, payment_id, &body).await {
            Ok(_) => {
                info!(payment_id, status = status.as_str(), "Payment reviewed");
                self.load().await;
                self.notice = Some(Notice::success(format!("Payment {}.", status.as_str())));
                true
            }
            Err(e) => {
                warn!(payment_id, error = %e, "Payment review failed");
                self.notice = Some(Notice::error(e.user_message()));
                false
            }
        }
    }
}

#[async_trait(?Send)]
impl SectionUnit for PaymentVerification {
    async fn load(&mut self) {
        self.payments = self.ctx.list_typed(Resource::Payments, &Query::new()).await;
    }

    fn render(&self) -> Renderable {
        let pending = self
            .payments
            .iter()
            .filter(|p| p.status == VerificationStatus::Pending)
            .count();
        let verified: f64 = self
            .payments
            .iter()
            .filter(|p| p.status == VerificationStatus::Verified)
            .map(|p| p.amount)
            .sum();

        let out = Renderable::new("Payment Verification")
            .subheading("Verify cash and check payments collected by the sales team")
            .maybe(self.notice.clone().map(Block::Notice))
            .block(Block::Stats(vec![
                Stat {
                    label: "Pending".into(),
                    value: pending.to_string(),
                },
                Stat {
                    label: "Verified".into(),
                    value: format_money(verified),
                },
            ]));

        if self.payments.is_empty() {
            return out.block(Block::Empty("No payments recorded yet.".into()));
        }

        let rows = self
            .payments
            .iter()
            .map(|p| {
                let actions = if p.status == VerificationStatus::Pending {
                    vec![
                        Trigger::new(
                            format!("verify-{}", p.id),
                            "Verify",
                            Command::new(VERIFY_PAYMENT).with("id", p.id),
                        ),
                        Trigger::new(
                            format!("reject-{}", p.id),
                            "Reject",
                            Command::new(REJECT_PAYMENT).with("id", p.id),
                        ),
                    ]
                } else {
                    Vec::new()
                };
                Row {
                    cells: vec![
                        Cell::Text(p.payment_method.clone().unwrap_or_else(|| "-".into())),
                        Cell::Text(format_money(p.amount)),
                        Cell::Text(
                            p.sales_order
                                .as_ref()
                                .map(SalesOrder::label)
                                .unwrap_or_else(|| format!("Order #{}", p.sales_order_id)),
                        ),
                        Cell::Text(p.payment_date.clone().unwrap_or_else(|| "-".into())),
                        Cell::Badge(p.status.as_str().to_string()),
                        Cell::Actions(actions),
                    ],
                }
            })
            .collect();

        out.block(Block::Table(Table {
            columns: vec![
                "Method".into(),
                "Amount".into(),
                "Source".into(),
                "Date".into(),
                "Status".into(),
                "Action".into(),
            ],
            rows,
        }))
    }

    async fn handle(&mut self, command: &Command) -> Handled {
        let status = match command.name.as_str() {
            VERIFY_PAYMENT => VerificationStatus::Verified,
            REJECT_PAYMENT => VerificationStatus::Rejected,
            _ => return Handled::Ignored,
        };
        if let Some(id) = command.id() {
            self.review(&id, status).await;
        }
        Handled::Done
    }
}
