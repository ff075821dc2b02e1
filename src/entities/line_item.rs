//! Line item entity - One billed entry belonging to an invoice.
//!
//! Each line item has an `invoice_id`, optional description, quantity and amount.
//! A line item never outlives its invoice (`ON DELETE CASCADE`).
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "line_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// ID of the invoice this line belongs to
    pub invoice_id: i32,
    /// Optional description of the billed entry
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Number of units billed
    pub quantity: i32,
    /// Line amount with two fraction digits
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,
}

/// Defines relationships between LineItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one invoice
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::Id",
        on_delete = "Cascade"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
