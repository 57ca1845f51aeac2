//! The nine role dashboards.
//!
//! Section ids and defaults match the sidebars users know; each id maps to
//! one of the generic units in `crate::sections`.

use portal_wire::Role;
use serde_json::Value;

use super::{DashboardSpec, SectionSpec};
use crate::api::Resource;
use crate::sections::{
    Column, DriverRoster, EditorSpec, EntityEditor, FieldSpec, PaymentCollection,
    PaymentVerification, ResourceTable, SectionContext, TableSpec,
};
use crate::view::FieldKind;

fn table(id: &'static str, label: &'static str, icon: &'static str, spec: TableSpec) -> SectionSpec {
    SectionSpec::new(id, label, icon, move |ctx: SectionContext| {
        ResourceTable::new(spec.clone(), ctx)
    })
}

fn editor(id: &'static str, label: &'static str, icon: &'static str, spec: EditorSpec) -> SectionSpec {
    SectionSpec::new(id, label, icon, move |ctx: SectionContext| {
        EntityEditor::new(spec.clone(), ctx)
    })
}

fn number(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_low_stock(record: &Value) -> bool {
    match (number(record, "quantity"), number(record, "minStock")) {
        (Some(quantity), Some(min)) => quantity <= min,
        _ => false,
    }
}

fn is_pending(record: &Value) -> bool {
    matches!(
        record.get("status").and_then(Value::as_str),
        Some("pending" | "scheduled" | "in_transit" | "in-transit")
    )
}

// =============================================================================
// Shared section descriptions
// =============================================================================

const PRODUCT_STATUS: &[(&str, &str)] = &[("active", "Active"), ("inactive", "Inactive")];
const TASK_PRIORITY: &[(&str, &str)] = &[("low", "Low"), ("medium", "Medium"), ("high", "High")];
const TASK_STATUS: &[(&str, &str)] = &[
    ("pending", "Pending"),
    ("in_progress", "In progress"),
    ("completed", "Completed"),
];

fn product_editor(title: &'static str, subtitle: &'static str) -> EditorSpec {
    EditorSpec {
        resource: Resource::Products,
        title,
        subtitle,
        noun: "Product",
        columns: vec![
            Column::text("name", "Product"),
            Column::text("sku", "SKU"),
            Column::text("category", "Category"),
            Column::text("price", "Price"),
            Column::text("quantity", "Quantity"),
            Column::text("location", "Location"),
            Column::badge("status", "Status"),
        ],
        fields: vec![
            FieldSpec::new("name", "Product Name", FieldKind::Text).required(),
            FieldSpec::new("sku", "SKU", FieldKind::Text).required(),
            FieldSpec::new("category", "Category", FieldKind::Text),
            FieldSpec::new("price", "Price", FieldKind::Number).required(),
            FieldSpec::new("quantity", "Quantity", FieldKind::Number).required(),
            FieldSpec::new("minStock", "Minimum Stock", FieldKind::Number),
            FieldSpec::new("location", "Location", FieldKind::Text),
            FieldSpec::new("status", "Status", FieldKind::Select).options(PRODUCT_STATUS),
        ],
        allow_delete: true,
    }
}

fn stock_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Products, title, subtitle).columns(vec![
        Column::text("name", "Product"),
        Column::text("sku", "SKU"),
        Column::text("quantity", "In Stock"),
        Column::text("minStock", "Minimum"),
        Column::text("location", "Location"),
        Column::badge("status", "Status"),
    ])
}

fn low_stock_table() -> TableSpec {
    stock_table("Low Stock Alerts", "Products at or below their minimum level")
        .filter(is_low_stock)
        .empty("All products are above their minimum stock level.")
}

fn sales_orders_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::SalesOrders, title, subtitle).columns(vec![
        Column::text("orderNumber", "Order"),
        Column::text("customerName", "Customer"),
        Column::text("orderDate", "Date"),
        Column::text("totalAmount", "Total"),
        Column::badge("status", "Status"),
        Column::badge("paymentStatus", "Payment"),
    ])
}

fn deliveries_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Deliveries, title, subtitle)
        .columns(vec![
            Column::text("deliveryNumber", "Delivery"),
            Column::text("deliveryAddress", "Address"),
            Column::text("scheduledDate", "Scheduled"),
            Column::text("driver.name", "Driver"),
            Column::badge("status", "Status"),
        ])
        .empty("No deliveries found.")
}

fn driver_deliveries(title: &'static str, subtitle: &'static str) -> TableSpec {
    deliveries_table(title, subtitle)
        .scoped("id", "driverId")
        .empty("No deliveries found for this driver.")
}

fn shipments_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Shipments, title, subtitle).columns(vec![
        Column::text("shipmentNumber", "Shipment"),
        Column::text("carrier", "Carrier"),
        Column::text("trackingNumber", "Tracking"),
        Column::text("expectedDate", "Expected"),
        Column::badge("status", "Status"),
    ])
}

fn purchase_orders_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::PurchaseOrders, title, subtitle).columns(vec![
        Column::text("poNumber", "PO"),
        Column::text("orderDate", "Ordered"),
        Column::text("expectedDate", "Expected"),
        Column::text("totalAmount", "Total"),
        Column::badge("status", "Status"),
    ])
}

fn customers_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Customers, title, subtitle).columns(vec![
        Column::text("name", "Customer"),
        Column::text("email", "Email"),
        Column::text("phone", "Phone"),
        Column::text("totalPurchases", "Orders"),
        Column::text("totalSpent", "Spent"),
        Column::badge("status", "Status"),
    ])
}

fn feedback_table() -> TableSpec {
    TableSpec::new(Resource::CustomerFeedbacks, "Customer Feedback", "Review and respond to customer feedback")
        .columns(vec![
            Column::text("customerId", "Customer"),
            Column::text("orderId", "Order"),
            Column::text("rating", "Rating"),
            Column::text("comment", "Comment"),
            Column::text("category", "Category"),
            Column::badge("status", "Status"),
        ])
        .empty("No feedback yet.")
}

fn employees_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Users, title, subtitle).columns(vec![
        Column::text("name", "Name"),
        Column::text("email", "Email"),
        Column::badge("role", "Role"),
        Column::text("attendance", "Attendance"),
        Column::text("performanceRating", "Rating"),
        Column::badge("status", "Status"),
    ])
}

fn payments_table(title: &'static str, subtitle: &'static str) -> TableSpec {
    TableSpec::new(Resource::Payments, title, subtitle).columns(vec![
        Column::text("id", "Payment"),
        Column::text("salesOrder.orderNumber", "Order"),
        Column::text("amount", "Amount"),
        Column::text("paymentMethod", "Method"),
        Column::badge("status", "Status"),
    ])
}

fn task_editor() -> EditorSpec {
    EditorSpec {
        resource: Resource::Tasks,
        title: "Task Assignment",
        subtitle: "Assign and follow up team tasks",
        noun: "Task",
        columns: vec![
            Column::text("title", "Task"),
            Column::text("dueDate", "Due"),
            Column::badge("priority", "Priority"),
            Column::badge("status", "Status"),
        ],
        fields: vec![
            FieldSpec::new("title", "Title", FieldKind::Text).required(),
            FieldSpec::new("description", "Description", FieldKind::Text),
            FieldSpec::new("assigneeId", "Assignee Id", FieldKind::Number).required(),
            FieldSpec::new("dueDate", "Due Date", FieldKind::Date).required(),
            FieldSpec::new("priority", "Priority", FieldKind::Select)
                .required()
                .options(TASK_PRIORITY),
            FieldSpec::new("status", "Status", FieldKind::Select).options(TASK_STATUS),
        ],
        allow_delete: true,
    }
}

// =============================================================================
// Dashboards
// =============================================================================

/// Build the dashboard registry for a role.
pub fn dashboard_for(role: Role) -> DashboardSpec {
    match role {
        Role::Owner => owner(),
        Role::Manager => manager(),
        Role::AssistantManager => assistant_manager(),
        Role::StockKeeper => stock_keeper(),
        Role::Cashier => cashier(),
        Role::Supplier => supplier(),
        Role::Distributor => distributor(),
        Role::Salesman => salesman(),
        Role::Driver => driver(),
    }
}

fn owner() -> DashboardSpec {
    DashboardSpec {
        role: Role::Owner,
        title: "Owner Dashboard",
        subtitle: "Business overview and control",
        default_section: "overview",
        sections: vec![
            table(
                "overview",
                "Financial Overview",
                "chart-bar",
                sales_orders_table("Financial Overview", "Revenue from recent sales orders"),
            ),
            table(
                "employees",
                "Employee Management",
                "users",
                employees_table("Employee Management", "Manage staff, salaries, and performance"),
            ),
            editor(
                "inventory",
                "Inventory Control",
                "package",
                product_editor("Inventory Control", "Manage stock levels and product details"),
            ),
            table(
                "operations",
                "Operations Monitor",
                "activity",
                deliveries_table("Operations Monitor", "Deliveries across all drivers"),
            ),
            table(
                "reports",
                "Reports & Analytics",
                "file-text",
                TableSpec::new(Resource::SalesInvoices, "Reports & Analytics", "Issued sales invoices")
                    .columns(vec![
                        Column::text("invoiceNumber", "Invoice"),
                        Column::text("invoiceDate", "Date"),
                        Column::text("totalAmount", "Total"),
                        Column::text("balance", "Balance"),
                        Column::badge("status", "Status"),
                    ]),
            ),
        ],
    }
}

fn manager() -> DashboardSpec {
    DashboardSpec {
        role: Role::Manager,
        title: "Manager Dashboard",
        subtitle: "Manage operations and team performance",
        default_section: "overview",
        sections: vec![
            table(
                "overview",
                "Employee Oversight",
                "users",
                employees_table("Employee Oversight", "Attendance and performance of the team"),
            ),
            editor("tasks", "Task Assignment", "check-square", task_editor()),
            table(
                "reports",
                "Reports & Analytics",
                "bar-chart",
                sales_orders_table("Operational Reports", "Sales orders by status"),
            ),
            table(
                "stock",
                "Stock Management",
                "package",
                stock_table("Stock Management", "Current stock levels"),
            ),
            table(
                "feedback",
                "Customer Feedback",
                "message-square",
                feedback_table(),
            ),
            table(
                "delivery",
                "Delivery Tracking",
                "truck",
                deliveries_table("Delivery Tracking", "Track every scheduled delivery"),
            ),
        ],
    }
}

fn assistant_manager() -> DashboardSpec {
    DashboardSpec {
        role: Role::AssistantManager,
        title: "Assistant Manager Dashboard",
        subtitle: "Data verification and operational support",
        default_section: "overview",
        sections: vec![
            table(
                "overview",
                "Data Verification",
                "check-circle",
                sales_orders_table("Data Verification", "Check recorded sales orders"),
            ),
            SectionSpec::new("payments", "Payment Verification", "dollar", PaymentVerification::new),
            editor("schedules", "Schedule Management", "calendar", task_editor()),
            table(
                "delivery-stock",
                "Delivery & Stock",
                "package",
                low_stock_table(),
            ),
            SectionSpec::new("drivers", "Driver Management", "truck", |ctx| {
                DriverRoster::new(ctx, "Driver Management")
            }),
            table(
                "distribution",
                "Distribution Records",
                "bar-chart",
                deliveries_table("Distribution Records", "Completed and scheduled deliveries"),
            ),
            table(
                "emergency",
                "Emergency Data",
                "alert-circle",
                deliveries_table("Emergency Data", "Deliveries still in progress")
                    .filter(is_pending)
                    .empty("No deliveries in progress."),
            ),
        ],
    }
}

fn stock_keeper() -> DashboardSpec {
    DashboardSpec {
        role: Role::StockKeeper,
        title: "Stock Management",
        subtitle: "Manage inventory, track stock levels, and generate reports",
        default_section: "inventory",
        sections: vec![
            editor(
                "inventory",
                "Inventory Management",
                "package",
                product_editor("Inventory Management", "Add, edit and remove products"),
            ),
            table(
                "receiving",
                "Receiving & Shipment",
                "inbox",
                shipments_table("Receiving & Shipment", "Incoming supplier shipments"),
            ),
            table("alerts", "Low Stock Alerts", "alert-circle", low_stock_table()),
            table(
                "reports",
                "Stock Reports",
                "bar-chart",
                TableSpec::new(Resource::Supplies, "Stock Reports", "Consumable supplies on hand")
                    .columns(vec![
                        Column::text("name", "Supply"),
                        Column::text("sku", "SKU"),
                        Column::text("stock", "Stock"),
                        Column::badge("status", "Status"),
                    ]),
            ),
            table(
                "barcode",
                "Barcode Scanning",
                "barcode",
                stock_table("Barcode Scanning", "Look up products by SKU"),
            ),
            table(
                "auditing",
                "Stock Auditing",
                "check-square",
                stock_table("Stock Auditing", "Compare recorded stock against counts"),
            ),
        ],
    }
}

fn cashier() -> DashboardSpec {
    DashboardSpec {
        role: Role::Cashier,
        title: "Cashier Dashboard",
        subtitle: "Sales transactions and daily takings",
        default_section: "sales",
        sections: vec![
            table(
                "sales",
                "Sales Transaction",
                "dollar",
                TableSpec::new(Resource::RetailOrders, "Sales Transaction", "Retail orders at the counter")
                    .columns(vec![
                        Column::text("id", "Order"),
                        Column::text("order.totalAmount", "Total"),
                        Column::text("createdAt", "Date"),
                        Column::badge("status", "Status"),
                    ]),
            ),
            table(
                "reports",
                "Financial Reports",
                "bar-chart",
                payments_table("Financial Reports", "Payments received"),
            ),
        ],
    }
}

fn supplier() -> DashboardSpec {
    DashboardSpec {
        role: Role::Supplier,
        title: "Supplier Dashboard",
        subtitle: "Manage orders, inventory, and shipments",
        default_section: "orders",
        sections: vec![
            table(
                "orders",
                "Purchase Orders",
                "shopping-bag",
                purchase_orders_table("Purchase Orders", "Orders placed with you").scoped("id", "supplierId"),
            ),
            table(
                "products",
                "Product Catalog",
                "package",
                stock_table("Product Catalog", "Products you supply").scoped("id", "supplierId"),
            ),
            table(
                "inventory",
                "Inventory Status",
                "archive",
                TableSpec::new(Resource::Supplies, "Inventory Status", "Supplies available")
                    .columns(vec![
                        Column::text("name", "Supply"),
                        Column::text("stock", "Stock"),
                        Column::text("price", "Price"),
                        Column::badge("status", "Status"),
                    ]),
            ),
            table(
                "shipments",
                "Shipment Tracking",
                "truck",
                shipments_table("Shipment Tracking", "Shipments on their way").scoped("id", "supplierId"),
            ),
            table(
                "invoices",
                "Invoices & Payments",
                "file-text",
                TableSpec::new(Resource::PurchaseInvoices, "Invoices & Payments", "Invoices and their balances")
                    .columns(vec![
                        Column::text("invoiceNumber", "Invoice"),
                        Column::text("dueDate", "Due"),
                        Column::text("totalAmount", "Total"),
                        Column::text("balance", "Balance"),
                        Column::badge("status", "Status"),
                    ])
                    .scoped("id", "supplierId"),
            ),
            table(
                "contracts",
                "Contracts & Terms",
                "clipboard",
                purchase_orders_table("Contracts & Terms", "Agreed order terms").scoped("id", "supplierId"),
            ),
            table(
                "analytics",
                "Sales Analytics",
                "trending-up",
                TableSpec::new(Resource::Orders, "Sales Analytics", "Orders and their totals").columns(vec![
                    Column::text("id", "Order"),
                    Column::text("orderDate", "Date"),
                    Column::text("totalAmount", "Total"),
                    Column::badge("status", "Status"),
                ]),
            ),
        ],
    }
}

fn distributor() -> DashboardSpec {
    DashboardSpec {
        role: Role::Distributor,
        title: "Distribution Management System",
        subtitle: "Manage orders, drivers, and deliveries",
        default_section: "orders",
        sections: vec![
            table(
                "orders",
                "Order Management",
                "package",
                sales_orders_table("Order Management", "Orders waiting for distribution"),
            ),
            SectionSpec::new("drivers", "Driver Management", "users", |ctx| {
                DriverRoster::new(ctx, "Driver Management")
            }),
            table(
                "stock",
                "Stock Tracking",
                "map-pin",
                stock_table("Stock Tracking", "Stock available for dispatch"),
            ),
            table(
                "routes",
                "Delivery Routes",
                "truck",
                deliveries_table("Delivery Routes", "Planned delivery routes"),
            ),
            table(
                "delivery",
                "Proof of Delivery",
                "check-circle",
                TableSpec::new(Resource::Deliveries, "Proof of Delivery", "Signed deliveries")
                    .columns(vec![
                        Column::text("deliveryNumber", "Delivery"),
                        Column::text("deliveredDate", "Delivered"),
                        Column::text("signature", "Signed by"),
                        Column::text("proofOfDelivery", "Proof"),
                        Column::badge("status", "Status"),
                    ]),
            ),
            table(
                "authorization",
                "Order Authorization",
                "lock",
                sales_orders_table("Order Authorization", "Orders pending authorization")
                    .filter(is_pending)
                    .empty("No orders awaiting authorization."),
            ),
        ],
    }
}

fn salesman() -> DashboardSpec {
    DashboardSpec {
        role: Role::Salesman,
        title: "Sales Management Dashboard",
        subtitle: "Manage orders, customers, and sales activities",
        default_section: "orders",
        sections: vec![
            table(
                "orders",
                "Sales Orders",
                "shopping-cart",
                sales_orders_table("Sales Orders", "Your recent sales orders"),
            ),
            table(
                "stock",
                "Stock Availability",
                "package",
                stock_table("Stock Availability", "What can be sold right now"),
            ),
            table(
                "customers",
                "Customer Accounts",
                "users",
                customers_table("Customer Accounts", "Customers and their history"),
            ),
            table(
                "reports",
                "Sales Reports",
                "bar-chart",
                TableSpec::new(Resource::SalesInvoices, "Sales Reports", "Invoiced sales").columns(vec![
                    Column::text("invoiceNumber", "Invoice"),
                    Column::text("invoiceDate", "Date"),
                    Column::text("totalAmount", "Total"),
                    Column::badge("status", "Status"),
                ]),
            ),
            table(
                "returns",
                "Returns & Cancellations",
                "rotate-ccw",
                sales_orders_table("Returns & Cancellations", "Cancelled or returned orders")
                    .filter(|r| {
                        matches!(
                            r.get("status").and_then(Value::as_str),
                            Some("cancelled" | "returned")
                        )
                    })
                    .empty("No returns or cancellations."),
            ),
            table(
                "promotions",
                "Promotions & Pricing",
                "tag",
                TableSpec::new(Resource::Products, "Promotions & Pricing", "Current list prices").columns(vec![
                    Column::text("name", "Product"),
                    Column::text("category", "Category"),
                    Column::text("price", "Price"),
                ]),
            ),
        ],
    }
}

fn driver() -> DashboardSpec {
    DashboardSpec {
        role: Role::Driver,
        title: "Driver Dashboard",
        subtitle: "Manage deliveries and routes efficiently",
        default_section: "deliveries",
        sections: vec![
            table(
                "deliveries",
                "Delivery Details",
                "package",
                driver_deliveries("Today's Deliveries", "View and manage all delivery details for today"),
            ),
            table(
                "route",
                "Delivery Route",
                "map-pin",
                driver_deliveries("Delivery Route", "Stops on your route")
                    .filter(is_pending)
                    .empty("No stops left on your route."),
            ),
            table(
                "proof",
                "Proof of Delivery",
                "file-check",
                driver_deliveries("Proof of Delivery", "Signatures and delivery proofs"),
            ),
            SectionSpec::new("payment", "Payment Collection", "credit-card", PaymentCollection::new),
            table(
                "vehicle",
                "Vehicle Tracking",
                "truck",
                TableSpec::new(Resource::Drivers, "Vehicle Tracking", "Your vehicle and location")
                    .columns(vec![
                        Column::text("vehicleId", "Vehicle"),
                        Column::text("vehicleType", "Type"),
                        Column::text("licenseNumber", "License"),
                        Column::text("currentLocation", "Location"),
                        Column::badge("status", "Status"),
                    ])
                    .scoped("id", "id"),
            ),
            table(
                "status",
                "Delivery Status",
                "check-circle",
                driver_deliveries("Delivery Status", "Status of each delivery"),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_every_dashboard_has_its_default_and_unique_ids() {
        for role in Role::ALL {
            let spec = dashboard_for(role);
            assert_eq!(spec.role, role);
            assert!(
                spec.section(spec.default_section).is_some(),
                "{role}: default section missing"
            );
            let ids: HashSet<_> = spec.section_ids().into_iter().collect();
            assert_eq!(ids.len(), spec.sections.len(), "{role}: duplicate section id");
        }
    }

    #[test]
    fn test_driver_sidebar() {
        let spec = dashboard_for(Role::Driver);
        assert_eq!(spec.default_section, "deliveries");
        assert_eq!(
            spec.section_ids(),
            vec!["deliveries", "route", "proof", "payment", "vehicle", "status"]
        );
    }

    #[tokio::test]
    async fn test_manager_feedback_lists_customer_feedbacks() {
        use crate::api::{DataService, Query};
        use crate::error::ApiError;
        use crate::sections::SectionUnit;
        use async_trait::async_trait;
        use std::cell::RefCell;
        use std::rc::Rc;

        #[derive(Default)]
        struct Recorder(RefCell<Vec<Resource>>);

        #[async_trait(?Send)]
        impl DataService for Recorder {
            async fn list(&self, resource: Resource, _: &Query) -> Result<Vec<Value>, ApiError> {
                self.0.borrow_mut().push(resource);
                Ok(vec![json!({"id": 1, "customerId": 4, "rating": 5, "comment": "On time", "status": "pending"})])
            }
            async fn get(&self, _: Resource, _: &str) -> Result<Value, ApiError> {
                Err(ApiError::Unauthorized)
            }
            async fn create(&self, _: Resource, _: &Value) -> Result<Value, ApiError> {
                Err(ApiError::Unauthorized)
            }
            async fn update(&self, _: Resource, _: &str, _: &Value) -> Result<Value, ApiError> {
                Err(ApiError::Unauthorized)
            }
            async fn delete(&self, _: Resource, _: &str) -> Result<(), ApiError> {
                Err(ApiError::Unauthorized)
            }
        }

        let data = Rc::new(Recorder::default());
        let spec = dashboard_for(Role::Manager);
        let section = spec.section("feedback").expect("feedback section");
        let mut unit = (section.factory)(SectionContext::new(data.clone(), Query::new()));
        unit.load().await;

        assert_eq!(*data.0.borrow(), vec![Resource::CustomerFeedbacks]);
        let content = unit.render();
        assert_eq!(content.heading, "Customer Feedback");
        assert_eq!(content.tables().next().map(|t| t.rows.len()), Some(1));
    }

    #[test]
    fn test_low_stock_filter() {
        assert!(is_low_stock(&json!({"quantity": 5, "minStock": 10})));
        assert!(is_low_stock(&json!({"quantity": "10", "minStock": 10})));
        assert!(!is_low_stock(&json!({"quantity": 50, "minStock": 10})));
        assert!(!is_low_stock(&json!({"quantity": 50})));
    }
}
