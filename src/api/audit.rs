// ==========================================
// 学籍成绩管理系统 - 操作留痕
// ==========================================
// 约束: 留痕失败只记 warn，不回滚已完成的业务写入
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::repository::ActionLogRepository;

/// 写入操作日志（best-effort）
pub(crate) fn record_action(repo: &ActionLogRepository, log: ActionLog) {
    if let Err(e) = repo.insert(&log) {
        tracing::warn!(
            action_type = %log.action_type,
            error = %e,
            "操作日志写入失败"
        );
    }
}
