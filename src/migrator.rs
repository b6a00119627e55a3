#![allow(elided_lifetimes_in_paths)]

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_reference_tables::Migration),
            Box::new(m20240101_000002_create_client_overlays::Migration),
            Box::new(m20240101_000003_create_contract_tables::Migration),
            Box::new(m20240101_000004_create_meal_entries_table::Migration),
            Box::new(m20240101_000005_create_users_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_reference_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_reference_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Clients::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Departments::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Diets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Diets::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Diets::Name).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MealTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MealTypes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MealTypes::Name).string().not_null())
                        .col(ColumnDef::new(MealTypes::CutoffTime).time().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Kitchens::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Kitchens::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Kitchens::Name).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Kitchens::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MealTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Diets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Departments {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum Diets {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub(super) enum MealTypes {
        Table,
        Id,
        Name,
        CutoffTime,
    }

    #[derive(DeriveIden)]
    pub(super) enum Kitchens {
        Table,
        Id,
        Name,
    }
}

mod m20240101_000002_create_client_overlays {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_client_overlays"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ClientDepartments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClientDepartments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ClientDepartments::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ClientDepartments::DepartmentId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(ClientDepartments::CustomName).string().null())
                        .col(
                            ColumnDef::new(ClientDepartments::CustomShortName)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_client_departments_client")
                        .table(ClientDepartments::Table)
                        .col(ClientDepartments::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ClientDiets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClientDiets::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ClientDiets::ClientId).big_integer().not_null())
                        .col(ColumnDef::new(ClientDiets::DietId).big_integer().null())
                        .col(ColumnDef::new(ClientDiets::CustomName).string().null())
                        .col(ColumnDef::new(ClientDiets::CustomShortName).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_client_diets_client")
                        .table(ClientDiets::Table)
                        .col(ClientDiets::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ClientMealTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ClientMealTypes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ClientMealTypes::ClientId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ClientMealTypes::MealTypeId)
                                .big_integer()
                                .null(),
                        )
                        .col(ColumnDef::new(ClientMealTypes::CustomName).string().null())
                        .col(
                            ColumnDef::new(ClientMealTypes::CustomShortName)
                                .string()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_client_meal_types_client")
                        .table(ClientMealTypes::Table)
                        .col(ClientMealTypes::ClientId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ClientMealTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ClientDiets::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ClientDepartments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ClientDepartments {
        Table,
        Id,
        ClientId,
        DepartmentId,
        CustomName,
        CustomShortName,
    }

    #[derive(DeriveIden)]
    pub(super) enum ClientDiets {
        Table,
        Id,
        ClientId,
        DietId,
        CustomName,
        CustomShortName,
    }

    #[derive(DeriveIden)]
    pub(super) enum ClientMealTypes {
        Table,
        Id,
        ClientId,
        MealTypeId,
        CustomName,
        CustomShortName,
    }
}

mod m20240101_000003_create_contract_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_contract_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Contracts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Contracts::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Contracts::ClientId).big_integer().not_null())
                        .col(ColumnDef::new(Contracts::StartDate).date().not_null())
                        .col(ColumnDef::new(Contracts::EndDate).date().null())
                        .col(ColumnDef::new(Contracts::Status).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_contracts_client_status")
                        .table(Contracts::Table)
                        .col(Contracts::ClientId)
                        .col(Contracts::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(KitchenPeriods::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(KitchenPeriods::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(KitchenPeriods::ContractId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(KitchenPeriods::KitchenId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(KitchenPeriods::StartDate).date().not_null())
                        .col(ColumnDef::new(KitchenPeriods::EndDate).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_kitchen_periods_contract")
                        .table(KitchenPeriods::Table)
                        .col(KitchenPeriods::ContractId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(KitchenPeriods::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Contracts::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Contracts {
        Table,
        Id,
        ClientId,
        StartDate,
        EndDate,
        Status,
    }

    #[derive(DeriveIden)]
    pub(super) enum KitchenPeriods {
        Table,
        Id,
        ContractId,
        KitchenId,
        StartDate,
        EndDate,
    }
}

mod m20240101_000004_create_meal_entries_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_meal_entries_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MealEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MealEntries::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MealEntries::MealDate).date().not_null())
                        .col(ColumnDef::new(MealEntries::ClientId).big_integer().not_null())
                        .col(
                            ColumnDef::new(MealEntries::DepartmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MealEntries::DietId).big_integer().not_null())
                        .col(
                            ColumnDef::new(MealEntries::MealTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MealEntries::Quantity)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MealEntries::IsAfterCutoff)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(MealEntries::Status).string().null())
                        .col(ColumnDef::new(MealEntries::CutoffAt).timestamp().not_null())
                        .col(ColumnDef::new(MealEntries::UpdatedAt).timestamp().not_null())
                        .col(
                            ColumnDef::new(MealEntries::CutoffDecisionBy)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MealEntries::CutoffDecisionAt)
                                .timestamp()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // The resolver's two access paths: after-cutoff rows by status,
            // and committed rows by key tuple.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_meal_entries_cutoff_status")
                        .table(MealEntries::Table)
                        .col(MealEntries::IsAfterCutoff)
                        .col(MealEntries::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_meal_entries_key")
                        .table(MealEntries::Table)
                        .col(MealEntries::MealDate)
                        .col(MealEntries::ClientId)
                        .col(MealEntries::DepartmentId)
                        .col(MealEntries::DietId)
                        .col(MealEntries::MealTypeId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MealEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum MealEntries {
        Table,
        Id,
        MealDate,
        ClientId,
        DepartmentId,
        DietId,
        MealTypeId,
        Quantity,
        IsAfterCutoff,
        Status,
        CutoffAt,
        UpdatedAt,
        CutoffDecisionBy,
        CutoffDecisionAt,
    }
}

mod m20240101_000005_create_users_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::DisplayName).string().not_null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Users {
        Table,
        Id,
        Username,
        DisplayName,
    }
}
