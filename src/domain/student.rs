// ==========================================
// 学籍成绩管理系统 - 学生领域模型
// ==========================================
// 对齐: student 表
// 默认排序: 姓名升序（同名按 student_id）
// ==========================================

use serde::{Deserialize, Serialize};

/// 学生
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: i64, // 主键 (数据库自增)
    pub name: String,    // 显示名称
}

impl Student {
    /// 姓名最大长度（字符）
    pub const MAX_NAME_LEN: usize = 100;
}
