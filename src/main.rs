// ==========================================
// 学籍成绩管理系统 - 数据库初始化入口
// ==========================================
// 职责: 打开（或创建）数据库、确保表结构、输出概况
// ==========================================

use academic_records::app::{get_default_db_path, AppState};

fn main() -> anyhow::Result<()> {
    academic_records::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", academic_records::APP_NAME, academic_records::VERSION);
    tracing::info!("==================================================");

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let state = AppState::new(db_path).map_err(anyhow::Error::msg)?;

    let schema_version = state.schema_version().map_err(anyhow::Error::msg)?;

    let students = state.roster_api.list_students()?;
    let courses = state.roster_api.list_courses()?;

    tracing::info!(
        schema_version = ?schema_version,
        students = students.len(),
        courses = courses.len(),
        course_capacity = state.enrollment_api.capacity(),
        "数据库就绪"
    );

    Ok(())
}
