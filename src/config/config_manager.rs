// ==========================================
// 学籍成绩管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::domain::course::DEFAULT_COURSE_CAPACITY;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("锁获取失败: {0}")]
    Lock(String),

    #[error("配置读写失败: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("配置序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("无效配置值 (key={key}): {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> ConfigResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入配置值（UPSERT）
    pub fn update_config(&self, key: &str, value: &str) -> ConfigResult<()> {
        if key == config_keys::COURSE_CAPACITY && parse_capacity(value).is_none() {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key",
        )?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    /// 单门课程选课上限
    ///
    /// 未配置或配置非法（非正整数，或超过 20）时返回默认值 20
    pub fn get_course_capacity(&self) -> ConfigResult<usize> {
        let raw = match self.get_config_value(config_keys::COURSE_CAPACITY)? {
            Some(v) => v,
            None => return Ok(DEFAULT_COURSE_CAPACITY),
        };

        Ok(parse_capacity(&raw).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::COURSE_CAPACITY,
                raw_value = %raw,
                "选课上限配置非法，使用默认值"
            );
            DEFAULT_COURSE_CAPACITY
        }))
    }
}

/// 选课上限只能收紧，不能超过 DEFAULT_COURSE_CAPACITY
fn parse_capacity(raw: &str) -> Option<usize> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|&n| n > 0 && n <= DEFAULT_COURSE_CAPACITY)
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 选课
    pub const COURSE_CAPACITY: &str = "course_capacity";
}
