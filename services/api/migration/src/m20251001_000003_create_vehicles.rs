use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vehicles::Id).uuid().not_null().primary_key())
                    // Not unique: imports may repeat a VIN.
                    .col(ColumnDef::new(Vehicles::Vin).string().not_null())
                    .col(ColumnDef::new(Vehicles::Heading).string().null())
                    .col(ColumnDef::new(Vehicles::Year).integer().null())
                    .col(ColumnDef::new(Vehicles::Make).string().null())
                    .col(ColumnDef::new(Vehicles::Model).string().null())
                    .col(ColumnDef::new(Vehicles::Trim).string().null())
                    .col(ColumnDef::new(Vehicles::Miles).big_integer().null())
                    .col(ColumnDef::new(Vehicles::Price).double().null())
                    .col(ColumnDef::new(Vehicles::Msrp).double().null())
                    .col(ColumnDef::new(Vehicles::VdpUrl).text().null())
                    .col(
                        ColumnDef::new(Vehicles::Media)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Vehicles::Specs)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(ColumnDef::new(Vehicles::Dealer).json_binary().null())
                    .col(ColumnDef::new(Vehicles::Source).string().null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Vehicles::Table)
                    .col(Vehicles::Vin)
                    .name("idx_vehicles_vin")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Vehicles::Table)
                    .col(Vehicles::Make)
                    .name("idx_vehicles_make")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Vehicles::Table)
                    .col((Vehicles::CreatedAt, IndexOrder::Desc))
                    .name("idx_vehicles_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    Vin,
    Heading,
    Year,
    Make,
    Model,
    Trim,
    Miles,
    Price,
    Msrp,
    VdpUrl,
    Media,
    Specs,
    Dealer,
    Source,
    CreatedAt,
    UpdatedAt,
}
