use sea_orm::entity::prelude::*;

/// Message sent by a manager or admin to one account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    pub sent_by: String,
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub sms_sent: bool,
    pub sms_error: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
