// ==========================================
// 学籍成绩管理系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 范围: 学生/课程档案、选课关系、成绩登记与平均成绩
// ==========================================

// 领域层 - 实体与成绩规则
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    ActionLog, ActionType, AverageGrade, Course, Grade, LetterGrade, Student,
    DEFAULT_COURSE_CAPACITY,
};

pub use api::{ApiError, ApiResult, EnrollmentApi, GradeApi, RosterApi};

pub use app::AppState;

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学籍成绩管理系统";
