//! Invoice entity - A billing record for one customer on one date.
//!
//! The invoice owns its line items; deleting an invoice cascades to them.
//! `total_amount` is supplied by the caller and stored as given (rounded to cents).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invoice database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Store-generated identifier, never reassigned
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Free-form customer name/address block, trimmed before storage
    #[sea_orm(column_type = "Text")]
    pub customer_details: String,
    /// Invoice date with timezone
    pub date: DateTimeWithTimeZone,
    /// Invoice total with two fraction digits
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_amount: Decimal,
}

/// Defines relationships between Invoice and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One invoice has many line items
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItems,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
