use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010001_create_users"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("users"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("student_id")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("email")).string().not_null().unique_key())
                    .col(ColumnDef::new(Alias::new("username")).string().not_null())
                    .col(ColumnDef::new(Alias::new("password_hash")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("role"))
                            .string()
                            .not_null()
                            .default("student"),
                    )
                    .col(ColumnDef::new(Alias::new("first_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("last_name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("middle_name")).string().null())
                    .col(ColumnDef::new(Alias::new("course")).string().null())
                    .col(ColumnDef::new(Alias::new("year_level")).string().null())
                    .col(ColumnDef::new(Alias::new("section")).string().null())
                    .col(ColumnDef::new(Alias::new("department")).string().null())
                    .col(ColumnDef::new(Alias::new("college")).string().null())
                    .col(ColumnDef::new(Alias::new("contact_number")).string().null())
                    .col(ColumnDef::new(Alias::new("address")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("is_verified"))
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Alias::new("verified_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("verification_code")).string_len(6).null())
                    .col(ColumnDef::new(Alias::new("verification_expires_at")).timestamp().null())
                    // QR identity and the rotation shadow pair
                    .col(ColumnDef::new(Alias::new("qr_code_data")).text().null())
                    .col(
                        ColumnDef::new(Alias::new("qr_type"))
                            .string()
                            .not_null()
                            .default("student_id"),
                    )
                    .col(ColumnDef::new(Alias::new("qr_generated_at")).timestamp().null())
                    .col(ColumnDef::new(Alias::new("active_event_id")).big_integer().null())
                    .col(ColumnDef::new(Alias::new("original_qr_code_data")).text().null())
                    .col(ColumnDef::new(Alias::new("original_qr_type")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_course")
                    .table(Alias::new("users"))
                    .col(Alias::new("course"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_active_event")
                    .table(Alias::new("users"))
                    .col(Alias::new("active_event_id"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("users")).to_owned())
            .await
    }
}
