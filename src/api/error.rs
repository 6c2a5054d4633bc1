// ==========================================
// 学籍成绩管理系统 - API层错误类型
// ==========================================
// 职责: 定义业务错误类型，转换Repository错误为可区分的业务错误
// 约束: 每类失败对应独立变体，调用方据此区分原因
// ==========================================

use crate::config::ConfigError;
use crate::domain::grade::GradeRuleError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 选课规则错误
    // ==========================================
    #[error("课程已满: course_id={course_id}, 上限={capacity}")]
    CapacityExceeded { course_id: i64, capacity: usize },

    #[error("学生已选该课程: student_id={student_id}, course_id={course_id}")]
    AlreadyEnrolled { student_id: i64, course_id: i64 },

    #[error("学生未选该课程: student_id={student_id}, course_id={course_id}")]
    NotEnrolled { student_id: i64, course_id: i64 },

    // ==========================================
    // 成绩规则错误
    // ==========================================
    #[error("无效成绩: value={0}, 允许范围 [0, 100]")]
    InvalidGrade(i32),

    #[error("成绩无对应等级: value={0}")]
    UnmappedLetterGrade(i32),

    #[error("成绩已存在: student_id={student_id}, course_id={course_id}")]
    DuplicateGrade { student_id: i64, course_id: i64 },

    #[error("成绩不存在: student_id={student_id}, course_id={course_id}")]
    GradeNotFound { student_id: i64, course_id: i64 },

    #[error("参数错误: {0}")]
    InvalidArguments(String),

    #[error("没有选课记录: {0}")]
    NoEnrollments(String),

    #[error("没有成绩记录: {0}")]
    NoGrades(String),

    // ==========================================
    // 通用业务错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<GradeRuleError> for ApiError {
    fn from(err: GradeRuleError) -> Self {
        match err {
            GradeRuleError::OutOfRange(v) => ApiError::InvalidGrade(v),
            GradeRuleError::Unmapped(v) => ApiError::UnmappedLetterGrade(v),
            GradeRuleError::Empty => ApiError::NoGrades("没有可计算的成绩".to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "Student".to_string(),
            id: "7".to_string(),
        };
        match ApiError::from(repo_err) {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("Student"));
                assert!(msg.contains("7"));
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }

        let repo_err = RepositoryError::LockError("poisoned".to_string());
        assert!(matches!(
            ApiError::from(repo_err),
            ApiError::DatabaseConnectionError(_)
        ));
    }

    #[test]
    fn test_grade_rule_error_conversion() {
        assert!(matches!(
            ApiError::from(GradeRuleError::OutOfRange(101)),
            ApiError::InvalidGrade(101)
        ));
        assert!(matches!(
            ApiError::from(GradeRuleError::Unmapped(59)),
            ApiError::UnmappedLetterGrade(59)
        ));
        assert!(matches!(
            ApiError::from(GradeRuleError::Empty),
            ApiError::NoGrades(_)
        ));
    }

    #[test]
    fn test_error_messages_carry_ids() {
        let err = ApiError::CapacityExceeded {
            course_id: 3,
            capacity: 20,
        };
        let msg = err.to_string();
        assert!(msg.contains("course_id=3"));
        assert!(msg.contains("20"));
    }
}
