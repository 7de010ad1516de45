use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_customers_table::Migration),
            Box::new(m20250601_000002_create_orders_table::Migration),
            Box::new(m20250601_000003_create_order_logs_table::Migration),
            Box::new(m20250601_000004_create_order_files_table::Migration),
            Box::new(m20250601_000005_create_messages_table::Migration),
            Box::new(m20250601_000006_create_contact_tickets_table::Migration),
            Box::new(m20250601_000007_create_news_items_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250601_000001_create_customers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000001_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create customers table aligned with entities::customer Model
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(
                            ColumnDef::new(Customers::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Customers::Phone).string().null())
                        .col(
                            ColumnDef::new(Customers::IsAdmin)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Customers::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_created_at")
                        .table(Customers::Table)
                        .col(Customers::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_is_admin")
                        .table(Customers::Table)
                        .col(Customers::IsAdmin)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        Id,
        Name,
        Email,
        Phone,
        IsAdmin,
        IsActive,
        CreatedAt,
    }
}

mod m20250601_000002_create_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000002_create_orders_table"
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
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Orders::OrderNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(Orders::Status).string().not_null())
                        .col(ColumnDef::new(Orders::Description).string().null())
                        .col(ColumnDef::new(Orders::GoldColor).string().null())
                        .col(
                            ColumnDef::new(Orders::GoldWeight)
                                .decimal_len(10, 2)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Orders::DiamondSize)
                                .decimal_len(10, 2)
                                .null(),
                        )
                        .col(ColumnDef::new(Orders::SpecialRequirements).string().null())
                        .col(
                            ColumnDef::new(Orders::EstimatedValue)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .col(ColumnDef::new(Orders::DeliveryDate).date().null())
                        .col(ColumnDef::new(Orders::DeclinedReason).string().null())
                        .col(ColumnDef::new(Orders::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Orders::UpdatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_customer_id")
                                .from(Orders::Table, Orders::CustomerId)
                                .to(Customers::Table, Customers::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_customer_id")
                        .table(Orders::Table)
                        .col(Orders::CustomerId)
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
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_delivery_date")
                        .table(Orders::Table)
                        .col(Orders::DeliveryDate)
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
        CustomerId,
        Status,
        Description,
        GoldColor,
        GoldWeight,
        DiamondSize,
        SpecialRequirements,
        EstimatedValue,
        DeliveryDate,
        DeclinedReason,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Customers {
        Table,
        Id,
    }
}

mod m20250601_000003_create_order_logs_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000003_create_order_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create order_logs table aligned with entities::order_log Model
            manager
                .create_table(
                    Table::create()
                        .table(OrderLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderLogs::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderLogs::AdminId).uuid().null())
                        .col(ColumnDef::new(OrderLogs::Action).string().not_null())
                        .col(ColumnDef::new(OrderLogs::FromStatus).string().null())
                        .col(ColumnDef::new(OrderLogs::ToStatus).string().null())
                        .col(ColumnDef::new(OrderLogs::Note).string().null())
                        .col(ColumnDef::new(OrderLogs::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_logs_order_id")
                                .from(OrderLogs::Table, OrderLogs::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_logs_order_id")
                        .table(OrderLogs::Table)
                        .col(OrderLogs::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_logs_action")
                        .table(OrderLogs::Table)
                        .col(OrderLogs::Action)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_logs_created_at")
                        .table(OrderLogs::Table)
                        .col(OrderLogs::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderLogs {
        Table,
        Id,
        OrderId,
        AdminId,
        Action,
        FromStatus,
        ToStatus,
        Note,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}

mod m20250601_000004_create_order_files_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000004_create_order_files_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create order_files table aligned with entities::order_file Model
            manager
                .create_table(
                    Table::create()
                        .table(OrderFiles::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderFiles::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(OrderFiles::OrderId).uuid().not_null())
                        .col(ColumnDef::new(OrderFiles::Stage).string().not_null())
                        .col(ColumnDef::new(OrderFiles::FileName).string().not_null())
                        .col(ColumnDef::new(OrderFiles::UploadedBy).uuid().null())
                        .col(
                            ColumnDef::new(OrderFiles::UploadedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_files_order_id")
                                .from(OrderFiles::Table, OrderFiles::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_files_order_id")
                        .table(OrderFiles::Table)
                        .col(OrderFiles::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_order_files_uploaded_at")
                        .table(OrderFiles::Table)
                        .col(OrderFiles::UploadedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderFiles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum OrderFiles {
        Table,
        Id,
        OrderId,
        Stage,
        FileName,
        UploadedBy,
        UploadedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}

mod m20250601_000005_create_messages_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000005_create_messages_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create messages table aligned with entities::message Model
            manager
                .create_table(
                    Table::create()
                        .table(Messages::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Messages::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Messages::OrderId).uuid().not_null())
                        .col(ColumnDef::new(Messages::SenderId).uuid().null())
                        .col(ColumnDef::new(Messages::SenderType).string().not_null())
                        .col(ColumnDef::new(Messages::Content).string().not_null())
                        .col(
                            ColumnDef::new(Messages::IsRead)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Messages::CreatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_messages_order_id")
                                .from(Messages::Table, Messages::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_messages_order_id")
                        .table(Messages::Table)
                        .col(Messages::OrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_messages_created_at")
                        .table(Messages::Table)
                        .col(Messages::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Messages::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Messages {
        Table,
        Id,
        OrderId,
        SenderId,
        SenderType,
        Content,
        IsRead,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
    }
}

mod m20250601_000006_create_contact_tickets_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000006_create_contact_tickets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create contact_tickets table aligned with entities::contact_ticket Model
            manager
                .create_table(
                    Table::create()
                        .table(ContactTickets::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ContactTickets::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactTickets::CustomerId).uuid().null())
                        .col(ColumnDef::new(ContactTickets::Name).string().not_null())
                        .col(ColumnDef::new(ContactTickets::Email).string().not_null())
                        .col(ColumnDef::new(ContactTickets::Phone).string().null())
                        .col(
                            ColumnDef::new(ContactTickets::ContactMethod)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ContactTickets::Subject).string().not_null())
                        .col(ColumnDef::new(ContactTickets::Message).string().not_null())
                        .col(ColumnDef::new(ContactTickets::OrderNumber).string().null())
                        .col(ColumnDef::new(ContactTickets::Status).string().not_null())
                        .col(
                            ColumnDef::new(ContactTickets::AdminResponse)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(ContactTickets::RespondedBy).uuid().null())
                        .col(
                            ColumnDef::new(ContactTickets::RespondedAt)
                                .timestamp()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ContactTickets::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_contact_tickets_status")
                        .table(ContactTickets::Table)
                        .col(ContactTickets::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_contact_tickets_created_at")
                        .table(ContactTickets::Table)
                        .col(ContactTickets::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ContactTickets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ContactTickets {
        Table,
        Id,
        CustomerId,
        Name,
        Email,
        Phone,
        ContactMethod,
        Subject,
        Message,
        OrderNumber,
        Status,
        AdminResponse,
        RespondedBy,
        RespondedAt,
        CreatedAt,
    }
}

mod m20250601_000007_create_news_items_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250601_000007_create_news_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create news_items table aligned with entities::news_item Model
            manager
                .create_table(
                    Table::create()
                        .table(NewsItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(NewsItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(NewsItems::Title).string().not_null())
                        .col(ColumnDef::new(NewsItems::Body).string().not_null())
                        .col(ColumnDef::new(NewsItems::Category).string().not_null())
                        .col(ColumnDef::new(NewsItems::Priority).string().not_null())
                        .col(
                            ColumnDef::new(NewsItems::IsPublic)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(NewsItems::IsAutoGenerated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(NewsItems::ReadCount)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(NewsItems::ClickCount)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(NewsItems::CreatedBy).uuid().null())
                        .col(
                            ColumnDef::new(NewsItems::PublishedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(NewsItems::ExpiresAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_news_items_published_at")
                        .table(NewsItems::Table)
                        .col(NewsItems::PublishedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_news_items_category")
                        .table(NewsItems::Table)
                        .col(NewsItems::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(NewsItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum NewsItems {
        Table,
        Id,
        Title,
        Body,
        Category,
        Priority,
        IsPublic,
        IsAutoGenerated,
        ReadCount,
        ClickCount,
        CreatedBy,
        PublishedAt,
        ExpiresAt,
    }
}
