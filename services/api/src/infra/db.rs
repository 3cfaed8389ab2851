use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use autovault_api_schema::{alerts, users, vehicles};
use autovault_core::sea_ext::OrderByRandom;
use autovault_domain::pagination::PageRequest;
use autovault_domain::role::Role;

use crate::domain::repository::{AlertRepository, UserRepository, VehicleRepository};
use crate::domain::types::{Alert, User, Vehicle};
use crate::error::ApiError;

/// Rows per multi-row insert.
const INSERT_CHUNK: usize = 400;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id.to_owned())
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn upsert(&self, user: &User) -> Result<User, ApiError> {
        users::Entity::insert(users::ActiveModel {
            id: Set(user.id.clone()),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            phone: Set(user.phone.clone()),
            role: Set(user.role.as_str().to_owned()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        })
        .on_conflict(
            OnConflict::column(users::Column::Id)
                .update_columns([
                    users::Column::Email,
                    users::Column::Name,
                    users::Column::Phone,
                    users::Column::Role,
                    users::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("upsert user")?;

        let saved = users::Entity::find_by_id(user.id.clone())
            .one(&self.db)
            .await
            .context("reload upserted user")?
            .context("upserted user vanished")?;
        Ok(user_from_model(saved))
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<User>, ApiError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().cloned()))
            .all(&self.db)
            .await
            .context("find users by ids")?;
        Ok(models.into_iter().map(user_from_model).collect())
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        name: model.name,
        phone: model.phone,
        role: Role::from_stored(&model.role),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Alert repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAlertRepository {
    pub db: DatabaseConnection,
}

impl AlertRepository for DbAlertRepository {
    async fn create(&self, alert: &Alert) -> Result<(), ApiError> {
        alerts::ActiveModel {
            id: Set(alert.id),
            user_id: Set(alert.user_id.clone()),
            message: Set(alert.message.clone()),
            sent_by: Set(alert.sent_by.clone()),
            sent_at: Set(alert.sent_at),
            read: Set(alert.read),
            read_at: Set(alert.read_at),
            sms_sent: Set(alert.sms_sent),
            sms_error: Set(alert.sms_error.clone()),
        }
        .insert(&self.db)
        .await
        .context("create alert")?;
        Ok(())
    }

    async fn record_sms_outcome(
        &self,
        id: Uuid,
        sms_sent: bool,
        sms_error: Option<&str>,
    ) -> Result<(), ApiError> {
        alerts::Entity::update_many()
            .col_expr(alerts::Column::SmsSent, Expr::value(sms_sent))
            .col_expr(
                alerts::Column::SmsError,
                Expr::value(sms_error.map(str::to_owned)),
            )
            .filter(alerts::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("record alert SMS outcome")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Alert>, ApiError> {
        let model = alerts::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find alert by id")?;
        Ok(model.map(alert_from_model))
    }

    async fn mark_read(&self, id: Uuid, read_at: DateTime<Utc>) -> Result<(), ApiError> {
        alerts::Entity::update_many()
            .col_expr(alerts::Column::Read, Expr::value(true))
            .col_expr(alerts::Column::ReadAt, Expr::value(Some(read_at)))
            .filter(alerts::Column::Id.eq(id))
            .filter(alerts::Column::Read.eq(false))
            .exec(&self.db)
            .await
            .context("mark alert read")?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str, limit: u64) -> Result<Vec<Alert>, ApiError> {
        let models = newest_alerts()
            .filter(alerts::Column::UserId.eq(user_id))
            .limit(limit)
            .all(&self.db)
            .await
            .context("list alerts for user")?;
        Ok(models.into_iter().map(alert_from_model).collect())
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Alert>, ApiError> {
        let page = page.clamped();
        let models = newest_alerts()
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list alerts page")?;
        Ok(models.into_iter().map(alert_from_model).collect())
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let total = alerts::Entity::find()
            .count(&self.db)
            .await
            .context("count alerts")?;
        Ok(total)
    }
}

/// Newest first; ids break ties between equal timestamps.
fn newest_alerts() -> Select<alerts::Entity> {
    alerts::Entity::find()
        .order_by_desc(alerts::Column::SentAt)
        .order_by_desc(alerts::Column::Id)
}

fn alert_from_model(model: alerts::Model) -> Alert {
    Alert {
        id: model.id,
        user_id: model.user_id,
        message: model.message,
        sent_by: model.sent_by,
        sent_at: model.sent_at,
        read: model.read,
        read_at: model.read_at,
        sms_sent: model.sms_sent,
        sms_error: model.sms_error,
    }
}

// ── Vehicle repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVehicleRepository {
    pub db: DatabaseConnection,
}

impl VehicleRepository for DbVehicleRepository {
    async fn sample_random(&self, count: u64) -> Result<Vec<Vehicle>, ApiError> {
        let models = vehicles::Entity::find()
            .order_by_random()
            .limit(count)
            .all(&self.db)
            .await
            .context("sample random vehicles")?;
        models.into_iter().map(vehicle_from_model).collect()
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let total = vehicles::Entity::find()
            .count(&self.db)
            .await
            .context("count vehicles")?;
        Ok(total)
    }

    async fn list_page(&self, page: PageRequest) -> Result<Vec<Vehicle>, ApiError> {
        let page = page.clamped();
        let models = vehicles::Entity::find()
            .order_by_desc(vehicles::Column::CreatedAt)
            .order_by_desc(vehicles::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list vehicles page")?;
        models.into_iter().map(vehicle_from_model).collect()
    }

    async fn find_by_vin(&self, vin: &str) -> Result<Option<Vehicle>, ApiError> {
        let model = vehicles::Entity::find()
            .filter(vehicles::Column::Vin.eq(vin))
            .order_by_asc(vehicles::Column::CreatedAt)
            .order_by_asc(vehicles::Column::Id)
            .one(&self.db)
            .await
            .context("find vehicle by vin")?;
        model.map(vehicle_from_model).transpose()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, ApiError> {
        let model = vehicles::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find vehicle by id")?;
        model.map(vehicle_from_model).transpose()
    }

    async fn list_by_make(&self, make: &str) -> Result<Vec<Vehicle>, ApiError> {
        let models = vehicles::Entity::find()
            .filter(vehicles::Column::Make.eq(make))
            .order_by_asc(vehicles::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list vehicles by make")?;
        models.into_iter().map(vehicle_from_model).collect()
    }

    async fn create(&self, vehicle: &Vehicle) -> Result<(), ApiError> {
        vehicle_to_active_model(vehicle)?
            .insert(&self.db)
            .await
            .context("create vehicle")?;
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<(), ApiError> {
        vehicle_to_active_model(vehicle)?
            .update(&self.db)
            .await
            .context("update vehicle")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let res = vehicles::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete vehicle")?;
        Ok(res.rows_affected > 0)
    }

    async fn insert_many(&self, batch: &[Vehicle]) -> Result<(), ApiError> {
        for chunk in batch.chunks(INSERT_CHUNK) {
            let models = chunk
                .iter()
                .map(vehicle_to_active_model)
                .collect::<Result<Vec<_>, _>>()?;
            vehicles::Entity::insert_many(models)
                .exec_without_returning(&self.db)
                .await
                .context("insert vehicle batch")?;
            tracing::debug!(rows = chunk.len(), "inserted vehicle batch");
        }
        Ok(())
    }
}

fn vehicle_from_model(model: vehicles::Model) -> Result<Vehicle, ApiError> {
    let media = serde_json::from_value(model.media).context("decode vehicle media")?;
    let specs = serde_json::from_value(model.specs).context("decode vehicle specs")?;
    let dealer = model
        .dealer
        .map(serde_json::from_value)
        .transpose()
        .context("decode vehicle dealer")?;
    Ok(Vehicle {
        id: model.id,
        vin: model.vin,
        heading: model.heading,
        year: model.year,
        make: model.make,
        model: model.model,
        trim: model.trim,
        miles: model.miles,
        price: model.price,
        msrp: model.msrp,
        vdp_url: model.vdp_url,
        media,
        specs,
        dealer,
        source: model.source,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn vehicle_to_active_model(vehicle: &Vehicle) -> Result<vehicles::ActiveModel, ApiError> {
    let media = serde_json::to_value(&vehicle.media).context("encode vehicle media")?;
    let specs = serde_json::to_value(&vehicle.specs).context("encode vehicle specs")?;
    let dealer = vehicle
        .dealer
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .context("encode vehicle dealer")?;
    Ok(vehicles::ActiveModel {
        id: Set(vehicle.id),
        vin: Set(vehicle.vin.clone()),
        heading: Set(vehicle.heading.clone()),
        year: Set(vehicle.year),
        make: Set(vehicle.make.clone()),
        model: Set(vehicle.model.clone()),
        trim: Set(vehicle.trim.clone()),
        miles: Set(vehicle.miles),
        price: Set(vehicle.price),
        msrp: Set(vehicle.msrp),
        vdp_url: Set(vehicle.vdp_url.clone()),
        media: Set(media),
        specs: Set(specs),
        dealer: Set(dealer),
        source: Set(vehicle.source.clone()),
        created_at: Set(vehicle.created_at),
        updated_at: Set(vehicle.updated_at),
    })
}
