// ==========================================
// 学籍成绩管理系统 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 红线: 所有业务写入都应留痕
// ==========================================

mod core;
mod queries;


pub use self::core::ActionLogRepository;

/// 时间戳存储格式（毫秒精度，保证同秒内仍可排序）
pub(crate) const ACTION_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";
