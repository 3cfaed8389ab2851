use sea_orm::entity::prelude::*;

/// Inventory listing. Dealer data is denormalized per row as JSON.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vin: String,
    pub heading: Option<String>,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub miles: Option<i64>,
    pub price: Option<f64>,
    pub msrp: Option<f64>,
    pub vdp_url: Option<String>,
    pub media: Json,
    pub specs: Json,
    pub dealer: Option<Json>,
    pub source: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
