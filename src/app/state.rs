// ==========================================
// 学籍成绩管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、仓储和API实例
// ==========================================

use std::sync::{Arc, Mutex};
use rusqlite::Connection;

use crate::api::{EnrollmentApi, GradeApi, RosterApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{
    ActionLogRepository, CourseRepository, EnrollmentRepository, GradeRepository,
    StudentRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    /// 档案API
    pub roster_api: Arc<RosterApi>,

    /// 选课API
    pub enrollment_api: Arc<EnrollmentApi>,

    /// 成绩API
    pub grade_api: Arc<GradeApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储（用于审计追踪）
    pub action_log_repo: Arc<ActionLogRepository>,

    /// 共享连接
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并应用统一 PRAGMA
    /// 2. 确保业务表存在
    /// 3. 读取配置并创建所有API实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;

        Self::from_connection(conn, db_path)
    }

    /// 使用内存库创建AppState（测试/演示用）
    pub fn in_memory() -> Result<Self, String> {
        let conn = crate::db::open_in_memory()
            .map_err(|e| format!("无法打开内存数据库: {}", e))?;
        Self::from_connection(conn, ":memory:".to_string())
    }

    fn from_connection(conn: Connection, db_path: String) -> Result<Self, String> {
        ensure_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo = Arc::new(StudentRepository::new(conn.clone()));
        let course_repo = Arc::new(CourseRepository::new(conn.clone()));
        let enrollment_repo = Arc::new(EnrollmentRepository::new(conn.clone()));
        let grade_repo = Arc::new(GradeRepository::new(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));

        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::new(conn.clone()));
        let capacity = config_manager
            .get_course_capacity()
            .map_err(|e| format!("读取选课上限失败: {}", e))?;
        tracing::info!(capacity, "选课上限");

        // ==========================================
        // 初始化API层
        // ==========================================
        let roster_api = Arc::new(RosterApi::new(
            student_repo.clone(),
            course_repo.clone(),
            action_log_repo.clone(),
        ));

        let enrollment_api = Arc::new(
            EnrollmentApi::new(
                student_repo,
                course_repo,
                enrollment_repo,
                action_log_repo.clone(),
            )
            .with_capacity(capacity),
        );

        let grade_api = Arc::new(GradeApi::new(
            enrollment_api.clone(),
            grade_repo,
            action_log_repo.clone(),
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            roster_api,
            enrollment_api,
            grade_api,
            config_manager,
            action_log_repo,
            conn,
        })
    }

    /// 读取当前库的 schema_version（复用共享连接）
    pub fn schema_version(&self) -> Result<Option<i64>, String> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| format!("数据库锁获取失败: {}", e))?;
        read_schema_version(&conn).map_err(|e| format!("读取schema_version失败: {}", e))
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 ACADEMIC_RECORDS_DB_PATH（非空时优先）
/// - 用户数据目录/academic-records/academic_records.db
/// - 兜底: ./academic_records.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("ACADEMIC_RECORDS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./academic_records.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("academic-records");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("academic_records.db");
        }
    }

    path.to_string_lossy().to_string()
}
