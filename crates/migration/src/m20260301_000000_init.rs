//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Reislog:
//!
//! - `users`: authentication and the admin role
//! - `trips`: logged trips with their derived month and payout
//! - `stores`: the store directory

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    IsAdmin,
}

#[derive(Iden)]
enum Trips {
    Table,
    Id,
    UserId,
    Date,
    Vehicle,
    Stops,
    Km,
    LoadedPallets,
    EmptyCrates,
    ReturnedPallets,
    Weekend,
    Month,
    Payout,
}

#[derive(Iden)]
enum Stores {
    Table,
    Id,
    Name,
    Address,
    Region,
    WeekdayHours,
    SaturdayHours,
    SundayHours,
    MapLink,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-username-unique")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-users-email-unique")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Trips
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Trips::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Trips::UserId).string().not_null())
                    .col(ColumnDef::new(Trips::Date).date().not_null())
                    .col(ColumnDef::new(Trips::Vehicle).string().not_null())
                    .col(ColumnDef::new(Trips::Stops).double().not_null())
                    .col(ColumnDef::new(Trips::Km).double().not_null())
                    .col(ColumnDef::new(Trips::LoadedPallets).double().not_null())
                    .col(ColumnDef::new(Trips::EmptyCrates).double().not_null())
                    .col(ColumnDef::new(Trips::ReturnedPallets).double().not_null())
                    .col(
                        ColumnDef::new(Trips::Weekend)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Trips::Month).string().not_null())
                    .col(ColumnDef::new(Trips::Payout).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-trips-user_id")
                            .from(Trips::Table, Trips::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-trips-user_id-month")
                    .table(Trips::Table)
                    .col(Trips::UserId)
                    .col(Trips::Month)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Stores
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stores::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Stores::Name).string().not_null())
                    .col(ColumnDef::new(Stores::Address).string().not_null())
                    .col(ColumnDef::new(Stores::Region).string().not_null())
                    .col(ColumnDef::new(Stores::WeekdayHours).string())
                    .col(ColumnDef::new(Stores::SaturdayHours).string())
                    .col(ColumnDef::new(Stores::SundayHours).string())
                    .col(ColumnDef::new(Stores::MapLink).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stores-region")
                    .table(Stores::Table)
                    .col(Stores::Region)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Trips::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
