// ==========================================
// 学籍成绩管理系统 - 配置层
// ==========================================
// 职责: 系统配置读取与覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager};
