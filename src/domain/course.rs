// ==========================================
// 学籍成绩管理系统 - 课程领域模型
// ==========================================
// 对齐: course 表
// 默认排序: 创建顺序 (course_id)
// ==========================================

use serde::{Deserialize, Serialize};

/// 单门课程默认选课上限
pub const DEFAULT_COURSE_CAPACITY: usize = 20;

/// 课程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: i64, // 主键 (数据库自增)
    pub name: String,   // 显示名称
}

impl Course {
    /// 课程名最大长度（字符）
    pub const MAX_NAME_LEN: usize = 50;
}
