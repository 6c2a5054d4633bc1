// ==========================================
// 学籍成绩管理系统 - API 层
// ==========================================
// 职责: 提供档案、选课、成绩业务接口
// ==========================================

mod audit;
pub mod enrollment_api;
pub mod error;
pub mod grade_api;
pub mod roster_api;

// 重导出核心类型
pub use enrollment_api::EnrollmentApi;
pub use error::{ApiError, ApiResult};
pub use grade_api::GradeApi;
pub use roster_api::RosterApi;
