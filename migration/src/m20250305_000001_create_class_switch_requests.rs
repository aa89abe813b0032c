use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::{Classes, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 调课申请表 ====================
        manager
            .create_table(
                Table::create()
                    .table(ClassSwitchRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSwitchRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::RequesterTeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::RequesterClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::TargetTeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::TargetClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::SwitchDate)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSwitchRequests::Reason).text().null())
                    .col(
                        ColumnDef::new(ClassSwitchRequests::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::TargetTeacherAccepted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::AdminNotified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // 仅在 pending / accepted 时非空，唯一索引保证同一组合只有一个活跃申请
                    .col(
                        ColumnDef::new(ClassSwitchRequests::ActiveSlot)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSwitchRequests::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    // 申请作为审计记录永久保留，被引用的用户和班级不可删除
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassSwitchRequests::Table,
                                ClassSwitchRequests::RequesterTeacherId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassSwitchRequests::Table,
                                ClassSwitchRequests::TargetTeacherId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassSwitchRequests::Table,
                                ClassSwitchRequests::RequesterClassId,
                            )
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ClassSwitchRequests::Table,
                                ClassSwitchRequests::TargetClassId,
                            )
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 通知表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::SenderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Notifications::RecipientRole).string().null())
                    .col(
                        ColumnDef::new(Notifications::RecipientUserId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Notifications::ReferenceType).string().null())
                    .col(
                        ColumnDef::new(Notifications::ReferenceId)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_class_switch_requests_active_slot")
                    .table(ClassSwitchRequests::Table)
                    .col(ClassSwitchRequests::ActiveSlot)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_switch_requests_requester")
                    .table(ClassSwitchRequests::Table)
                    .col(ClassSwitchRequests::RequesterTeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_switch_requests_target")
                    .table(ClassSwitchRequests::Table)
                    .col(ClassSwitchRequests::TargetTeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_recipient_user_id")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_recipient_role")
                    .table(Notifications::Table)
                    .col(Notifications::RecipientRole)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSwitchRequests::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ClassSwitchRequests {
    #[sea_orm(iden = "class_switch_requests")]
    Table,
    Id,
    RequesterTeacherId,
    RequesterClassId,
    TargetTeacherId,
    TargetClassId,
    SwitchDate,
    Reason,
    Status,
    TargetTeacherAccepted,
    AdminNotified,
    ActiveSlot,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    Title,
    Message,
    SenderId,
    RecipientRole,
    RecipientUserId,
    ReferenceType,
    ReferenceId,
    CreatedAt,
}
