// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 基于临时数据库文件构建完整的 AppState
// ==========================================

#![allow(dead_code)]

use std::sync::Arc;
use tempfile::NamedTempFile;

use academic_records::api::{EnrollmentApi, GradeApi, RosterApi};
use academic_records::app::AppState;
use academic_records::domain::{Course, Student};
use academic_records::repository::ActionLogRepository;

/// API测试环境
pub struct ApiTestEnv {
    pub db_path: String,
    pub roster_api: Arc<RosterApi>,
    pub enrollment_api: Arc<EnrollmentApi>,
    pub grade_api: Arc<GradeApi>,
    pub action_log_repo: Arc<ActionLogRepository>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建新的API测试环境（临时数据库文件，自动建表）
    pub fn new() -> Result<Self, String> {
        academic_records::logging::init_test();

        let temp_file = NamedTempFile::new().map_err(|e| format!("创建临时文件失败: {}", e))?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| "临时文件路径非法".to_string())?
            .to_string();

        let state = AppState::new(db_path.clone())?;

        Ok(Self {
            db_path,
            roster_api: state.roster_api,
            enrollment_api: state.enrollment_api,
            grade_api: state.grade_api,
            action_log_repo: state.action_log_repo,
            _temp_file: temp_file,
        })
    }

    /// 新建学生
    pub fn student(&self, name: &str) -> Student {
        self.roster_api.create_student(name).expect("创建学生失败")
    }

    /// 新建课程
    pub fn course(&self, name: &str) -> Course {
        self.roster_api.create_course(name).expect("创建课程失败")
    }

    /// 选课
    pub fn enroll(&self, student: &Student, course: &Course) {
        self.enrollment_api
            .enroll(student.student_id, course.course_id)
            .expect("选课失败");
    }

    /// 学生所选课程名
    pub fn course_names_of(&self, student: &Student) -> Vec<String> {
        self.enrollment_api
            .courses_of(student.student_id)
            .expect("查询失败")
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    /// 课程的学生名
    pub fn student_names_of(&self, course: &Course) -> Vec<String> {
        self.enrollment_api
            .students_of(course.course_id)
            .expect("查询失败")
            .into_iter()
            .map(|s| s.name)
            .collect()
    }
}
