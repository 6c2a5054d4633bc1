// ==========================================
// 学籍成绩管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、成绩规则
// 红线: 不含数据访问逻辑
// ==========================================

pub mod action_log;
pub mod course;
pub mod grade;
pub mod student;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use course::{Course, DEFAULT_COURSE_CAPACITY};
pub use grade::{average_rounded, is_valid_grade, Grade, GradeRuleError, MAX_GRADE, MIN_GRADE};
pub use student::Student;
pub use types::{AverageGrade, LetterGrade};
