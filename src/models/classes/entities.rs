use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    // 班级ID
    pub id: i64,
    // 任课教师ID（同一时间只归属一位教师）
    pub teacher_id: i64,
    // 课程
    pub course: String,
    // 学期
    pub semester: String,
    // 科目
    pub subject: String,
    // 教室
    pub room_number: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Class {
    /// 是否归属指定教师
    pub fn is_owned_by(&self, teacher_id: i64) -> bool {
        self.teacher_id == teacher_id
    }

    /// 用于通知文案的简短描述
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.course, self.subject, self.semester)
    }
}
