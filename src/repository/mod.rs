// ==========================================
// 学籍成绩管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod error;
pub mod grade_repo;
pub mod student_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use course_repo::CourseRepository;
pub use enrollment_repo::{EnrollOutcome, EnrollmentRepository};
pub use error::{RepositoryError, RepositoryResult};
pub use grade_repo::GradeRepository;
pub use student_repo::StudentRepository;
