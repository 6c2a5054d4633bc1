// ==========================================
// 学籍成绩管理系统 - 操作日志领域模型
// ==========================================
// 用途: 审计追踪（选课、退课、登记/修改成绩、建档）
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,              // 日志ID (uuid)
    pub action_type: String,            // 操作类型 (ActionType 的存储串)
    pub action_ts: NaiveDateTime,       // 操作时间戳
    pub student_id: Option<i64>,        // 关联学生
    pub course_id: Option<i64>,         // 关联课程
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,         // 详细描述
}

impl ActionLog {
    /// 以当前本地时间创建日志
    pub fn new(
        action_type: ActionType,
        student_id: Option<i64>,
        course_id: Option<i64>,
        payload_json: Option<JsonValue>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.to_string(),
            action_ts: chrono::Local::now().naive_local(),
            student_id,
            course_id,
            payload_json,
            detail: Some(detail.into()),
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    CreateStudent, // 新建学生
    CreateCourse,  // 新建课程
    Enroll,        // 选课
    Disenroll,     // 退课
    AssignGrade,   // 登记成绩
    AdjustGrade,   // 修改成绩
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::CreateStudent => "CREATE_STUDENT",
            ActionType::CreateCourse => "CREATE_COURSE",
            ActionType::Enroll => "ENROLL",
            ActionType::Disenroll => "DISENROLL",
            ActionType::AssignGrade => "ASSIGN_GRADE",
            ActionType::AdjustGrade => "ADJUST_GRADE",
        };
        write!(f, "{}", s)
    }
}
