// ==========================================
// 学籍成绩管理系统 - 学生/课程档案 API
// ==========================================
// 职责: 学生与课程的建档、查询
// 约束: 建档仅校验名称非空且不超长
// ==========================================

use std::sync::Arc;

use crate::api::audit::record_action;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::course::Course;
use crate::domain::student::Student;
use crate::repository::{ActionLogRepository, CourseRepository, StudentRepository};

/// 档案管理API
pub struct RosterApi {
    student_repo: Arc<StudentRepository>,
    course_repo: Arc<CourseRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl RosterApi {
    /// 创建新的RosterApi实例
    pub fn new(
        student_repo: Arc<StudentRepository>,
        course_repo: Arc<CourseRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            student_repo,
            course_repo,
            action_log_repo,
        }
    }

    /// 新建学生
    ///
    /// # 返回
    /// - Ok(Student): 新学生（含 student_id）
    /// - Err(ApiError::InvalidInput): 姓名为空或超长
    pub fn create_student(&self, name: &str) -> ApiResult<Student> {
        let name = validate_name(name, "学生姓名", Student::MAX_NAME_LEN)?;
        let student = self.student_repo.insert(name)?;

        tracing::info!(student_id = student.student_id, name, "新建学生");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateStudent,
                Some(student.student_id),
                None,
                Some(serde_json::json!({ "name": name })),
                format!("新建学生: {}", name),
            ),
        );
        Ok(student)
    }

    /// 新建课程
    pub fn create_course(&self, name: &str) -> ApiResult<Course> {
        let name = validate_name(name, "课程名称", Course::MAX_NAME_LEN)?;
        let course = self.course_repo.insert(name)?;

        tracing::info!(course_id = course.course_id, name, "新建课程");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::CreateCourse,
                None,
                Some(course.course_id),
                Some(serde_json::json!({ "name": name })),
                format!("新建课程: {}", name),
            ),
        );
        Ok(course)
    }

    /// 查询学生
    pub fn get_student(&self, student_id: i64) -> ApiResult<Student> {
        Ok(self.student_repo.get(student_id)?)
    }

    /// 查询课程
    pub fn get_course(&self, course_id: i64) -> ApiResult<Course> {
        Ok(self.course_repo.get(course_id)?)
    }

    /// 全部学生（姓名升序）
    pub fn list_students(&self) -> ApiResult<Vec<Student>> {
        Ok(self.student_repo.list_all()?)
    }

    /// 全部课程（创建顺序）
    pub fn list_courses(&self) -> ApiResult<Vec<Course>> {
        Ok(self.course_repo.list_all()?)
    }
}

fn validate_name<'a>(name: &'a str, field: &str, max_len: usize) -> ApiResult<&'a str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(ApiError::InvalidInput(format!(
            "{}过长: 最多{}个字符",
            field, max_len
        )));
    }
    Ok(trimmed)
}
