//! Initial database migration.
//!
//! Tables are declared with the schema builder so the same migration runs on
//! Postgres and on the SQLite database used by the integration tests. The
//! partial unique indexes are plain SQL understood by both.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: DIRECTORY
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Airports::Table)
                    .col(ColumnDef::new(Airports::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Airports::Code).string_len(3).not_null().unique_key())
                    .col(ColumnDef::new(Airports::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Airports::City).string_len(100).not_null())
                    .col(timestamp(Airports::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(Users::Role).string_len(16).not_null())
                    .col(ColumnDef::new(Users::AirportId).uuid().null())
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_airport")
                            .from(Users::Table, Users::AirportId)
                            .to(Airports::Table, Airports::Id),
                    )
                    .check(Expr::cust("role <> 'cashier' OR airport_id IS NOT NULL"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CashDesks::Table)
                    .col(ColumnDef::new(CashDesks::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CashDesks::AirportId).uuid().not_null())
                    .col(ColumnDef::new(CashDesks::Name).string_len(100).not_null().unique_key())
                    .col(ColumnDef::new(CashDesks::IsActive).boolean().not_null().default(true))
                    .col(timestamp(CashDesks::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_desks_airport")
                            .from(CashDesks::Table, CashDesks::AirportId)
                            .to(Airports::Table, Airports::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: LEDGER
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(CashDeskAccounts::Table)
                    .col(ColumnDef::new(CashDeskAccounts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(CashDeskAccounts::CashDeskId).uuid().not_null())
                    .col(ColumnDef::new(CashDeskAccounts::Currency).string_len(3).not_null())
                    .col(money(CashDeskAccounts::Balance))
                    .col(timestamp(CashDeskAccounts::LastUpdated))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_accounts_cash_desk")
                            .from(CashDeskAccounts::Table, CashDeskAccounts::CashDeskId)
                            .to(CashDesks::Table, CashDesks::Id),
                    )
                    .check(Expr::col(CashDeskAccounts::Balance).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_accounts_desk_currency")
                    .table(CashDeskAccounts::Table)
                    .col(CashDeskAccounts::CashDeskId)
                    .col(CashDeskAccounts::Currency)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .col(ColumnDef::new(Shifts::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shifts::CashDeskId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::CashierId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::Status).string_len(16).not_null())
                    .col(timestamp(Shifts::OpenedAt))
                    .col(ColumnDef::new(Shifts::ClosedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Shifts::ReopenedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Shifts::ReopenedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_cash_desk")
                            .from(Shifts::Table, Shifts::CashDeskId)
                            .to(CashDesks::Table, CashDesks::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_cashier")
                            .from(Shifts::Table, Shifts::CashierId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_reopened_by")
                            .from(Shifts::Table, Shifts::ReopenedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .check(Expr::cust(
                        "(status = 'open' AND closed_at IS NULL) \
                         OR (status = 'closed' AND closed_at IS NOT NULL)",
                    ))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: CATALOG
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Flights::Table)
                    .col(ColumnDef::new(Flights::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Flights::FlightNumber).string_len(10).not_null().unique_key())
                    .col(ColumnDef::new(Flights::Origin).string_len(3).not_null())
                    .col(ColumnDef::new(Flights::Destination).string_len(3).not_null())
                    .col(timestamp(Flights::DepartureTime))
                    .col(timestamp(Flights::ArrivalTime))
                    .col(ColumnDef::new(Flights::SeatCapacity).integer().not_null())
                    .col(timestamp(Flights::CreatedAt))
                    .check(Expr::col(Flights::SeatCapacity).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FlightFares::Table)
                    .col(ColumnDef::new(FlightFares::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(FlightFares::FlightId).uuid().not_null())
                    .col(ColumnDef::new(FlightFares::Name).string_len(50).not_null())
                    .col(money(FlightFares::BasePrice))
                    .col(ColumnDef::new(FlightFares::BaseCurrency).string_len(3).not_null())
                    .col(ColumnDef::new(FlightFares::SeatLimit).integer().not_null())
                    .col(ColumnDef::new(FlightFares::SeatsSold).integer().not_null().default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_fares_flight")
                            .from(FlightFares::Table, FlightFares::FlightId)
                            .to(Flights::Table, Flights::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(FlightFares::BasePrice).gt(0))
                    .check(Expr::col(FlightFares::SeatLimit).gt(0))
                    .check(Expr::cust("seats_sold >= 0 AND seats_sold <= seat_limit"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_fares_flight_name")
                    .table(FlightFares::Table)
                    .col(FlightFares::FlightId)
                    .col(FlightFares::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: SALES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Tickets::Table)
                    .col(ColumnDef::new(Tickets::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tickets::FlightId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::FareId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::ShiftId).uuid().not_null())
                    .col(ColumnDef::new(Tickets::PassengerName).string_len(100).not_null())
                    .col(ColumnDef::new(Tickets::SeatNumber).string_len(8).not_null())
                    .col(money(Tickets::Price))
                    .col(ColumnDef::new(Tickets::Currency).string_len(3).not_null())
                    .col(money(Tickets::PriceInBase))
                    .col(rate(Tickets::ExchangeRate))
                    .col(ColumnDef::new(Tickets::Status).string_len(16).not_null())
                    .col(timestamp(Tickets::SoldAt))
                    .col(ColumnDef::new(Tickets::RefundedAt).timestamp_with_time_zone().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_flight")
                            .from(Tickets::Table, Tickets::FlightId)
                            .to(Flights::Table, Flights::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_fare")
                            .from(Tickets::Table, Tickets::FareId)
                            .to(FlightFares::Table, FlightFares::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tickets_shift")
                            .from(Tickets::Table, Tickets::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .check(Expr::col(Tickets::Price).gt(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .col(ColumnDef::new(Transactions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Transactions::ShiftId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::AccountId).uuid().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string_len(16).not_null())
                    .col(money(Transactions::Amount))
                    .col(ColumnDef::new(Transactions::Currency).string_len(3).not_null())
                    .col(money(Transactions::BalanceAfter))
                    .col(ColumnDef::new(Transactions::ReferenceType).string_len(16).null())
                    .col(ColumnDef::new(Transactions::ReferenceId).uuid().null())
                    .col(ColumnDef::new(Transactions::Description).text().null())
                    .col(timestamp(Transactions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_shift")
                            .from(Transactions::Table, Transactions::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transactions_account")
                            .from(Transactions::Table, Transactions::AccountId)
                            .to(CashDeskAccounts::Table, CashDeskAccounts::Id),
                    )
                    .check(Expr::col(Transactions::Amount).ne(0))
                    .check(Expr::col(Transactions::BalanceAfter).gte(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_account_created")
                    .table(Transactions::Table)
                    .col(Transactions::AccountId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 5: EXCHANGE RATES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(ExchangeRates::Table)
                    .col(ColumnDef::new(ExchangeRates::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ExchangeRates::BaseCurrency).string_len(3).not_null())
                    .col(ColumnDef::new(ExchangeRates::TargetCurrency).string_len(3).not_null())
                    .col(rate(ExchangeRates::Rate))
                    .col(timestamp(ExchangeRates::ValidAt))
                    .col(ColumnDef::new(ExchangeRates::CreatedBy).uuid().null())
                    .col(timestamp(ExchangeRates::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exchange_rates_created_by")
                            .from(ExchangeRates::Table, ExchangeRates::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .check(Expr::col(ExchangeRates::Rate).gt(0))
                    .check(Expr::cust("base_currency <> target_currency"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exchange_rates_pair_valid_at")
                    .table(ExchangeRates::Table)
                    .col(ExchangeRates::BaseCurrency)
                    .col(ExchangeRates::TargetCurrency)
                    .col(ExchangeRates::ValidAt)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 6: PARTIAL UNIQUE INDEXES
        // ============================================================
        let db = manager.get_connection();
        db.execute_unprepared(PARTIAL_INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Transactions::Table.into_iden(),
            Tickets::Table.into_iden(),
            FlightFares::Table.into_iden(),
            Flights::Table.into_iden(),
            Shifts::Table.into_iden(),
            CashDeskAccounts::Table.into_iden(),
            ExchangeRates::Table.into_iden(),
            CashDesks::Table.into_iden(),
            Users::Table.into_iden(),
            Airports::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

const PARTIAL_INDEXES_SQL: &str = r"
-- At most one open shift per cashier and per cash desk
CREATE UNIQUE INDEX uq_shifts_open_cashier ON shifts (cashier_id) WHERE status = 'open';
CREATE UNIQUE INDEX uq_shifts_open_cash_desk ON shifts (cash_desk_id) WHERE status = 'open';

-- A seat is held by at most one sold ticket
CREATE UNIQUE INDEX uq_tickets_sold_seat ON tickets (flight_id, seat_number) WHERE status = 'sold';

CREATE INDEX idx_shifts_cashier ON shifts (cashier_id, opened_at);
CREATE INDEX idx_tickets_shift ON tickets (shift_id);
";

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn money<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).decimal_len(12, 2).not_null().to_owned()
}

fn rate<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).decimal_len(12, 4).not_null().to_owned()
}

#[derive(DeriveIden)]
enum Airports {
    Table,
    Id,
    Code,
    Name,
    City,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    AirportId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CashDesks {
    Table,
    Id,
    AirportId,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CashDeskAccounts {
    Table,
    Id,
    CashDeskId,
    Currency,
    Balance,
    LastUpdated,
}

#[derive(DeriveIden)]
enum Shifts {
    Table,
    Id,
    CashDeskId,
    CashierId,
    Status,
    OpenedAt,
    ClosedAt,
    ReopenedAt,
    ReopenedBy,
}

#[derive(DeriveIden)]
enum Flights {
    Table,
    Id,
    FlightNumber,
    Origin,
    Destination,
    DepartureTime,
    ArrivalTime,
    SeatCapacity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum FlightFares {
    Table,
    Id,
    FlightId,
    Name,
    BasePrice,
    BaseCurrency,
    SeatLimit,
    SeatsSold,
}

#[derive(DeriveIden)]
enum Tickets {
    Table,
    Id,
    FlightId,
    FareId,
    ShiftId,
    PassengerName,
    SeatNumber,
    Price,
    Currency,
    PriceInBase,
    ExchangeRate,
    Status,
    SoldAt,
    RefundedAt,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    ShiftId,
    AccountId,
    Kind,
    Amount,
    Currency,
    BalanceAfter,
    ReferenceType,
    ReferenceId,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ExchangeRates {
    Table,
    Id,
    BaseCurrency,
    TargetCurrency,
    Rate,
    ValidAt,
    CreatedBy,
    CreatedAt,
}
