// ==========================================
// 学籍成绩管理系统 - 成绩领域模型
// ==========================================
// 对齐: grade 表
// 约束: 每个 (student, course) 至多一条成绩，取值 [0, 100]
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 成绩下限
pub const MIN_GRADE: i32 = 0;
/// 成绩上限
pub const MAX_GRADE: i32 = 100;

/// 成绩
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub grade_id: i64,   // 主键
    pub student_id: i64, // 学生
    pub course_id: i64,  // 课程
    pub value: i32,      // 百分制成绩
}

/// 成绩规则错误（纯计算，不涉及存储）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GradeRuleError {
    #[error("成绩超出范围: value={0}, 允许范围 [0, 100]")]
    OutOfRange(i32),

    #[error("成绩无对应等级: value={0}")]
    Unmapped(i32),

    #[error("没有可计算的成绩")]
    Empty,
}

/// 判断成绩是否在合法范围内
pub fn is_valid_grade(value: i32) -> bool {
    (MIN_GRADE..=MAX_GRADE).contains(&value)
}

/// 计算平均成绩（四舍六入五成双）
///
/// 以整数运算求 sum / count 的最近整数，恰好为 .5 时取偶数，
/// 例如 93.5 → 94，92.5 → 92。
pub fn average_rounded(values: &[i32]) -> Result<i32, GradeRuleError> {
    if values.is_empty() {
        return Err(GradeRuleError::Empty);
    }

    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    let count = values.len() as i64;

    let quotient = sum.div_euclid(count);
    let remainder = sum.rem_euclid(count);

    let rounded = match (2 * remainder).cmp(&count) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal => quotient + quotient.rem_euclid(2),
    };

    Ok(rounded as i32)
}
