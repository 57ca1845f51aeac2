//! Driver roster: driver profiles joined to their user accounts.

use async_trait::async_trait;
use portal_wire::{join_profiles, AccountRecord, DriverProfile, StaffMember};

use super::{SectionContext, SectionUnit};
use crate::api::{Query, Resource};
use crate::view::{Block, Cell, Renderable, Row, Stat, Table};

pub struct DriverRoster {
    ctx: SectionContext,
    title: &'static str,
    members: Vec<StaffMember<DriverProfile>>,
}

impl DriverRoster {
    pub fn new(ctx: SectionContext, title: &'static str) -> Self {
        Self {
            ctx,
            title,
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[StaffMember<DriverProfile>] {
        &self.members
    }
}

fn or_dash(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

#[async_trait(?Send)]
impl SectionUnit for DriverRoster {
    async fn load(&mut self) {
        let query = Query::new();
        let drivers: Vec<DriverProfile> = self.ctx.list_typed(Resource::Drivers, &query).await;
        // accounts only enrich the listing; a failed load still shows drivers
        let accounts: Vec<AccountRecord> = self.ctx.list_typed(Resource::Users, &query).await;
        self.members = join_profiles(accounts, drivers);
    }

    fn render(&self) -> Renderable {
        let out = Renderable::new(self.title).subheading("Drivers, vehicles and their accounts");
        if self.members.is_empty() {
            return out.block(Block::Empty("No drivers registered.".into()));
        }

        let active = self
            .members
            .iter()
            .filter(|m| m.profile.status.as_deref() == Some("active"))
            .count();

        let rows = self
            .members
            .iter()
            .map(|m| Row {
                cells: vec![
                    Cell::Text(m.profile.name.clone()),
                    Cell::Text(m.email().unwrap_or("-").to_string()),
                    Cell::Text(format!(
                        "{} {}",
                        or_dash(&m.profile.vehicle_id),
                        m.profile
                            .vehicle_type
                            .as_deref()
                            .map(|t| format!("({t})"))
                            .unwrap_or_default()
                    )
                    .trim()
                    .to_string()),
                    Cell::Text(or_dash(&m.profile.license_number)),
                    Cell::Text(or_dash(&m.profile.current_location)),
                    Cell::Badge(or_dash(&m.profile.status)),
                    Cell::Text(if m.account.is_some() { "Linked" } else { "No account" }.to_string()),
                ],
            })
            .collect();

        out.block(Block::Stats(vec![
            Stat {
                label: "Drivers".into(),
                value: self.members.len().to_string(),
            },
            Stat {
                label: "Active".into(),
                value: active.to_string(),
            },
        ]))
        .block(Block::Table(Table {
            columns: vec![
                "Name".into(),
                "Email".into(),
                "Vehicle".into(),
                "License".into(),
                "Location".into(),
                "Status".into(),
                "Account".into(),
            ],
            rows,
        }))
    }
}
