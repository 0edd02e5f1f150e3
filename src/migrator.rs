use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_materials_table::Migration),
            Box::new(m20240101_000002_create_configuration_categories_table::Migration),
            Box::new(m20240101_000003_create_configurations_table::Migration),
            Box::new(m20240101_000004_create_configuration_materials_table::Migration),
            Box::new(m20240101_000005_create_orders_table::Migration),
            Box::new(m20240101_000006_create_order_items_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_materials_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_materials_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create materials table aligned with entities::material Model
            manager
                .create_table(
                    Table::create()
                        .table(Materials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Materials::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Materials::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Materials::Name).string().not_null())
                        .col(
                            ColumnDef::new(Materials::Category)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Materials::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Materials::Quantity)
                                .decimal()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(Materials::PriceWithoutVat)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Materials::Supplier)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Materials::Comment)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Materials::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Materials::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_materials_category")
                        .table(Materials::Table)
                        .col(Materials::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Materials::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Materials {
        Table,
        Id,
        Code,
        Name,
        Category,
        Unit,
        Quantity,
        PriceWithoutVat,
        Supplier,
        Comment,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_configuration_categories_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_configuration_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ConfigurationCategories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ConfigurationCategories::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConfigurationCategories::Name)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConfigurationCategories::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ConfigurationCategories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ConfigurationCategories {
        Table,
        Id,
        Name,
        SortOrder,
    }
}

mod m20240101_000003_create_configurations_table {

    use super::m20240101_000002_create_configuration_categories_table::ConfigurationCategories;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_configurations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Configurations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Configurations::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Configurations::Name).string().not_null())
                        .col(
                            ColumnDef::new(Configurations::ProductType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Configurations::CategoryId)
                                .integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Configurations::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Configurations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Configurations::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_configurations_category_id")
                                .from(Configurations::Table, Configurations::CategoryId)
                                .to(ConfigurationCategories::Table, ConfigurationCategories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_configurations_category_id")
                        .table(Configurations::Table)
                        .col(Configurations::CategoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Configurations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Configurations {
        Table,
        Id,
        Name,
        ProductType,
        CategoryId,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_configuration_materials_table {

    use super::m20240101_000001_create_materials_table::Materials;
    use super::m20240101_000003_create_configurations_table::Configurations;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_configuration_materials_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Join rows are dropped together with their owning configuration.
            manager
                .create_table(
                    Table::create()
                        .table(ConfigurationMaterials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ConfigurationMaterials::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConfigurationMaterials::ConfigurationId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConfigurationMaterials::MaterialId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ConfigurationMaterials::Quantity)
                                .decimal()
                                .not_null()
                                .default(1.0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_configuration_materials_configuration_id")
                                .from(
                                    ConfigurationMaterials::Table,
                                    ConfigurationMaterials::ConfigurationId,
                                )
                                .to(Configurations::Table, Configurations::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_configuration_materials_material_id")
                                .from(
                                    ConfigurationMaterials::Table,
                                    ConfigurationMaterials::MaterialId,
                                )
                                .to(Materials::Table, Materials::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_configuration_materials_configuration_id")
                        .table(ConfigurationMaterials::Table)
                        .col(ConfigurationMaterials::ConfigurationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ConfigurationMaterials::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ConfigurationMaterials {
        Table,
        Id,
        ConfigurationId,
        MaterialId,
        Quantity,
    }
}

mod m20240101_000005_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create orders table aligned with entities::order Model
            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Orders::ClientOrderNumber)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Orders::OrderDate).date().not_null())
                        .col(
                            ColumnDef::new(Orders::Country)
                                .string()
                                .not_null()
                                .default("LT"),
                        )
                        .col(
                            ColumnDef::new(Orders::CustomerName)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Orders::CustomerAddress)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Orders::ProductType).string().not_null())
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string()
                                .not_null()
                                .default("draft"),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalMaterials)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalLabor)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalLaborHours)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Orders::TotalPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_status")
                        .table(Orders::Table)
                        .col(Orders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_order_date")
                        .table(Orders::Table)
                        .col(Orders::OrderDate)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Orders {
        Table,
        Id,
        OrderNumber,
        ClientOrderNumber,
        OrderDate,
        Country,
        CustomerName,
        CustomerAddress,
        ProductType,
        Status,
        TotalMaterials,
        TotalLabor,
        TotalLaborHours,
        TotalCost,
        TotalPrice,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_order_items_table {

    use super::m20240101_000003_create_configurations_table::Configurations;
    use super::m20240101_000005_create_orders_table::Orders;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_order_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Items are dropped together with their owning order.
            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::ItemType).string().not_null())
                        .col(
                            ColumnDef::new(OrderItems::ConfigurationId)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(OrderItems::Name).string().not_null())
                        .col(
                            ColumnDef::new(OrderItems::NameProduction)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(OrderItems::Quantity)
                                .decimal()
                                .not_null()
                                .default(1.0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::MaterialCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::LaborCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::LaborHours)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::TotalCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::TotalPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::SortOrder)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OrderItems::Comment)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_configuration_id")
                                .from(OrderItems::Table, OrderItems::ConfigurationId)
                                .to(Configurations::Table, Configurations::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_items_order_id")
                        .table(OrderItems::Table)
                        .col(OrderItems::OrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderItems {
        Table,
        Id,
        OrderId,
        ItemType,
        ConfigurationId,
        Name,
        NameProduction,
        Quantity,
        MaterialCost,
        LaborCost,
        LaborHours,
        TotalCost,
        UnitPrice,
        TotalPrice,
        SortOrder,
        Comment,
    }
}
