//! 调课申请创建前的校验
//!
//! 规则按顺序执行，第一条失败即返回：
//! 必填字段 → 教师角色 → 发起班级归属 → 目标班级归属 → 日期格式与不早于今天 → 无活跃重复申请。
//! 校验本身不写存储，最终的唯一性由存储层的唯一索引保证。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::errors::{AttendSysError, Result};
use crate::models::{
    auth::UserContext,
    class_switch::requests::{CreateSwitchRequest, NewClassSwitchRequest},
    users::entities::UserRole,
};
use crate::storage::Storage;

/// 必填字段齐全后的输入
struct RequiredFields<'a> {
    requester_class_id: i64,
    target_teacher_id: i64,
    target_class_id: i64,
    switch_date: &'a str,
}

fn required_fields(input: &CreateSwitchRequest) -> Result<RequiredFields<'_>> {
    let missing = |field: &str| AttendSysError::missing_field(format!("{field} is required"));

    Ok(RequiredFields {
        requester_class_id: input
            .requester_class_id
            .ok_or_else(|| missing("requester_class_id"))?,
        target_teacher_id: input
            .target_teacher_id
            .ok_or_else(|| missing("target_teacher_id"))?,
        target_class_id: input
            .target_class_id
            .ok_or_else(|| missing("target_class_id"))?,
        switch_date: input
            .switch_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing("switch_date"))?,
    })
}

fn parse_switch_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AttendSysError::validation(format!("switch_date '{raw}' must be a YYYY-MM-DD date"))
    })
}

pub async fn validate_create(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    input: &CreateSwitchRequest,
    today: NaiveDate,
) -> Result<NewClassSwitchRequest> {
    let fields = required_fields(input)?;

    ctx.require_role(&UserRole::Teacher)?;

    let requester_class = storage.get_class_by_id(fields.requester_class_id).await?;
    if !requester_class.is_some_and(|c| c.is_owned_by(ctx.user_id)) {
        return Err(AttendSysError::authorization(
            "you can only request switches for classes assigned to you",
        ));
    }

    if fields.target_teacher_id == ctx.user_id {
        return Err(AttendSysError::invalid_target(
            "the target teacher must be someone other than yourself",
        ));
    }

    let target_class = storage.get_class_by_id(fields.target_class_id).await?;
    if !target_class.is_some_and(|c| c.is_owned_by(fields.target_teacher_id)) {
        return Err(AttendSysError::invalid_target(format!(
            "class {} is not assigned to teacher {}",
            fields.target_class_id, fields.target_teacher_id
        )));
    }

    let switch_date = parse_switch_date(fields.switch_date)?;
    if switch_date < today {
        return Err(AttendSysError::past_date(format!(
            "switch_date {switch_date} is before today ({today})"
        )));
    }

    if let Some(existing) = storage
        .find_active_switch_request(fields.requester_class_id, fields.target_class_id, switch_date)
        .await?
    {
        return Err(AttendSysError::duplicate_request(format!(
            "request {} is already {} for these classes on {switch_date}",
            existing.id, existing.status
        )));
    }

    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(NewClassSwitchRequest {
        requester_teacher_id: ctx.user_id,
        requester_class_id: fields.requester_class_id,
        target_teacher_id: fields.target_teacher_id,
        target_class_id: fields.target_class_id,
        switch_date,
        reason,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::class_switch::create::create_request;
    use crate::services::class_switch::fixture::*;

    #[tokio::test]
    async fn test_missing_fields_are_reported_first() {
        let f = fixture();

        let cases = [
            CreateSwitchRequest {
                requester_class_id: None,
                ..input(C1, B, C2, tomorrow())
            },
            CreateSwitchRequest {
                target_teacher_id: None,
                ..input(C1, B, C2, tomorrow())
            },
            CreateSwitchRequest {
                target_class_id: None,
                ..input(C1, B, C2, tomorrow())
            },
            CreateSwitchRequest {
                switch_date: Some("  ".to_string()),
                ..input(C1, B, C2, tomorrow())
            },
        ];

        // 学生调用也先报缺字段
        for case in cases {
            let err = validate_create(&f.storage, &student(), &case, today())
                .await
                .unwrap_err();
            assert_eq!(err.code(), "E014");
        }
    }

    #[tokio::test]
    async fn test_malformed_date_is_a_validation_error() {
        let f = fixture();
        let mut bad = input(C1, B, C2, tomorrow());
        bad.switch_date = Some("16/10/2026".to_string());

        let err = validate_create(&f.storage, &teacher(A), &bad, today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_role_and_ownership_are_checked_before_date_format() {
        let f = fixture();
        let mut bad = input(C1, B, C2, tomorrow());
        bad.switch_date = Some("next tuesday".to_string());

        let err = validate_create(&f.storage, &student(), &bad, today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        bad.requester_class_id = Some(C2);
        let err = validate_create(&f.storage, &teacher(A), &bad, today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        let mut bad = input(C1, B, C4, tomorrow());
        bad.switch_date = Some("next tuesday".to_string());
        let err = validate_create(&f.storage, &teacher(A), &bad, today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[tokio::test]
    async fn test_only_teachers_may_create() {
        let f = fixture();
        for ctx in [admin(), student()] {
            let err = validate_create(&f.storage, &ctx, &input(C1, B, C2, tomorrow()), today())
                .await
                .unwrap_err();
            assert_eq!(err.code(), "E013");
        }
    }

    #[tokio::test]
    async fn test_requester_must_own_requester_class() {
        let f = fixture();

        // C2 属于 B，不属于 A
        let err = validate_create(&f.storage, &teacher(A), &input(C2, D, C4, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");

        let err = validate_create(&f.storage, &teacher(A), &input(999, B, C2, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[tokio::test]
    async fn test_target_class_must_belong_to_target_teacher() {
        let f = fixture();

        let err = validate_create(&f.storage, &teacher(A), &input(C1, B, C4, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E017");

        let err = validate_create(&f.storage, &teacher(A), &input(C1, B, 999, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[tokio::test]
    async fn test_self_switch_is_an_invalid_target() {
        let f = fixture();
        let err = validate_create(&f.storage, &teacher(A), &input(C1, A, C1, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E017");
    }

    #[tokio::test]
    async fn test_past_date_is_rejected_and_nothing_is_stored() {
        let f = fixture();

        let err = create_request(&f.storage, &teacher(A), input(C1, B, C2, yesterday()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
        assert!(f.memory.requests().is_empty());
    }

    #[tokio::test]
    async fn test_past_date_wins_over_duplicate() {
        let f = fixture();
        create_request(&f.storage, &teacher(A), input(C1, B, C2, yesterday()), yesterday())
            .await
            .unwrap();

        let err = validate_create(&f.storage, &teacher(A), &input(C1, B, C2, yesterday()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E015");
    }

    #[tokio::test]
    async fn test_blank_reason_is_dropped() {
        let f = fixture();
        let mut with_blank = input(C1, B, C2, tomorrow());
        with_blank.reason = Some("   ".to_string());

        let validated = validate_create(&f.storage, &teacher(A), &with_blank, today())
            .await
            .unwrap();
        assert_eq!(validated.reason, None);
        assert_eq!(validated.requester_teacher_id, A);
        assert_eq!(validated.switch_date, tomorrow());
    }
}
