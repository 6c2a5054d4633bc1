// ==========================================
// 学籍成绩管理系统 - 成绩管理 API
// ==========================================
// 职责: 登记/修改/查询成绩，计算平均成绩（百分制或等级制）
// 规则:
// - 成绩取值 [0, 100]，且 (student, course) 当前必须已选课
// - 每个组合至多一条成绩；退课不删除成绩
// - 平均成绩: 课程与学生二选一；四舍六入五成双
// ==========================================

use std::sync::Arc;

use crate::api::audit::record_action;
use crate::api::enrollment_api::EnrollmentApi;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::grade::{average_rounded, is_valid_grade, Grade, MAX_GRADE};
use crate::domain::types::{AverageGrade, LetterGrade};
use crate::repository::{ActionLogRepository, GradeRepository, RepositoryError};

/// 平均成绩的统计对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AverageTarget {
    Course(i64),
    Student(i64),
}

// ==========================================
// GradeApi - 成绩管理 API
// ==========================================

/// 成绩管理API
///
/// 选课状态通过 EnrollmentApi 每次从存储重新判定，不做缓存。
pub struct GradeApi {
    enrollment_api: Arc<EnrollmentApi>,
    grade_repo: Arc<GradeRepository>,
    action_log_repo: Arc<ActionLogRepository>,
}

impl GradeApi {
    /// 创建新的GradeApi实例
    pub fn new(
        enrollment_api: Arc<EnrollmentApi>,
        grade_repo: Arc<GradeRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            enrollment_api,
            grade_repo,
            action_log_repo,
        }
    }

    /// 登记成绩
    ///
    /// # 返回
    /// - Ok(Grade): 新成绩
    /// - Err(ApiError::InvalidGrade): 超出 [0, 100]
    /// - Err(ApiError::NotEnrolled): 未选课
    /// - Err(ApiError::DuplicateGrade): 已有成绩
    pub fn assign_grade(&self, course_id: i64, student_id: i64, value: i32) -> ApiResult<Grade> {
        self.validate_assignment(course_id, student_id, value)?;

        if self.grade_repo.find_by_pair(student_id, course_id)?.is_some() {
            return Err(ApiError::DuplicateGrade {
                student_id,
                course_id,
            });
        }

        let grade = match self.grade_repo.insert(student_id, course_id, value) {
            Ok(grade) => grade,
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ApiError::DuplicateGrade {
                    student_id,
                    course_id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(student_id, course_id, value, "登记成绩");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::AssignGrade,
                Some(student_id),
                Some(course_id),
                Some(serde_json::json!({ "value": value })),
                format!("登记成绩: {}", value),
            ),
        );
        Ok(grade)
    }

    /// 修改成绩
    ///
    /// # 返回
    /// - Ok(Grade): 修改后的成绩
    /// - Err(ApiError::GradeNotFound): 尚未登记
    pub fn adjust_grade(&self, course_id: i64, student_id: i64, value: i32) -> ApiResult<Grade> {
        self.validate_assignment(course_id, student_id, value)?;

        let mut grade = self
            .grade_repo
            .find_by_pair(student_id, course_id)?
            .ok_or(ApiError::GradeNotFound {
                student_id,
                course_id,
            })?;

        let previous = grade.value;
        self.grade_repo.update_value(grade.grade_id, value)?;
        grade.value = value;

        tracing::info!(student_id, course_id, previous, value, "修改成绩");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::AdjustGrade,
                Some(student_id),
                Some(course_id),
                Some(serde_json::json!({ "previous": previous, "value": value })),
                format!("修改成绩: {} -> {}", previous, value),
            ),
        );
        Ok(grade)
    }

    /// 查询成绩
    ///
    /// 只校验选课状态（取值按上限 100 参与校验，恒合法）。
    pub fn get_grade(&self, course_id: i64, student_id: i64) -> ApiResult<i32> {
        self.validate_assignment(course_id, student_id, MAX_GRADE)?;

        self.grade_repo
            .find_by_pair(student_id, course_id)?
            .map(|g| g.value)
            .ok_or(ApiError::GradeNotFound {
                student_id,
                course_id,
            })
    }

    /// 平均成绩
    ///
    /// # 参数
    /// - course_id / student_id: 二者必须且只能提供一个
    /// - as_letter: true 返回等级制，false 返回百分制
    ///
    /// # 返回
    /// - Err(ApiError::InvalidArguments): 两者都给或都不给
    /// - Err(ApiError::NoEnrollments): 统计对象没有选课记录
    /// - Err(ApiError::NoGrades): 有选课但没有成绩
    /// - Err(ApiError::UnmappedLetterGrade): 等级制下平均值为 59
    pub fn get_average(
        &self,
        course_id: Option<i64>,
        student_id: Option<i64>,
        as_letter: bool,
    ) -> ApiResult<AverageGrade> {
        let target = self.validate_average(course_id, student_id)?;

        let grades = match target {
            AverageTarget::Course(id) => self.grade_repo.find_by_course(id)?,
            AverageTarget::Student(id) => self.grade_repo.find_by_student(id)?,
        };
        if grades.is_empty() {
            return Err(ApiError::NoGrades(describe(target)));
        }

        let values: Vec<i32> = grades.iter().map(|g| g.value).collect();
        let average = average_rounded(&values)?;
        tracing::debug!(?target, count = values.len(), average, "计算平均成绩");

        if as_letter {
            Ok(AverageGrade::Letter(LetterGrade::from_value(average)?))
        } else {
            Ok(AverageGrade::Numeric(average))
        }
    }

    // ==========================================
    // 内部校验
    // ==========================================

    /// 成绩写入前置条件：先校验取值，再校验选课状态
    fn validate_assignment(&self, course_id: i64, student_id: i64, value: i32) -> ApiResult<()> {
        if !is_valid_grade(value) {
            return Err(ApiError::InvalidGrade(value));
        }
        if !self.enrollment_api.is_enrolled(student_id, course_id)? {
            return Err(ApiError::NotEnrolled {
                student_id,
                course_id,
            });
        }
        Ok(())
    }

    /// 平均成绩前置条件：二选一，且统计对象至少有一条选课记录
    ///
    /// 只看选课数，不看成绩数；有选课无成绩在计算阶段报 NoGrades。
    fn validate_average(
        &self,
        course_id: Option<i64>,
        student_id: Option<i64>,
    ) -> ApiResult<AverageTarget> {
        let target = match (course_id, student_id) {
            (None, None) => {
                return Err(ApiError::InvalidArguments(
                    "课程与学生必须指定其一".to_string(),
                ))
            }
            (Some(_), Some(_)) => {
                return Err(ApiError::InvalidArguments(
                    "课程与学生只能指定其一".to_string(),
                ))
            }
            (Some(course_id), None) => AverageTarget::Course(course_id),
            (None, Some(student_id)) => AverageTarget::Student(student_id),
        };

        let enrollments = match target {
            AverageTarget::Course(id) => self.enrollment_api.count_students(id)?,
            AverageTarget::Student(id) => self.enrollment_api.count_courses(id)?,
        };
        if enrollments == 0 {
            return Err(ApiError::NoEnrollments(describe(target)));
        }

        Ok(target)
    }
}

fn describe(target: AverageTarget) -> String {
    match target {
        AverageTarget::Course(id) => format!("course_id={}", id),
        AverageTarget::Student(id) => format!("student_id={}", id),
    }
}
