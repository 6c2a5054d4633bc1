// ==========================================
// 学籍成绩管理系统 - 选课管理 API
// ==========================================
// 职责: 选课/退课，及双向选课关系查询
// 规则:
// - 课程满员（默认 20 人）时拒绝选课，先于重复选课判断
// - 重复选课 → AlreadyEnrolled
// - 退课对未选课的组合为空操作
// 状态: 每个 (student, course) 仅 {已选, 未选} 两态
// ==========================================

use std::sync::Arc;

use crate::api::audit::record_action;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::course::{Course, DEFAULT_COURSE_CAPACITY};
use crate::domain::student::Student;
use crate::repository::{
    ActionLogRepository, CourseRepository, EnrollOutcome, EnrollmentRepository,
    RepositoryError, StudentRepository,
};

// ==========================================
// EnrollmentApi - 选课管理 API
// ==========================================

/// 选课管理API
///
/// 选课关系只存一行（enrollment 表），两侧查询都从同一行派生，
/// 因此不存在单侧写入的撕裂状态。
pub struct EnrollmentApi {
    student_repo: Arc<StudentRepository>,
    course_repo: Arc<CourseRepository>,
    enrollment_repo: Arc<EnrollmentRepository>,
    action_log_repo: Arc<ActionLogRepository>,
    capacity: usize,
}

impl EnrollmentApi {
    /// 创建新的EnrollmentApi实例（默认选课上限）
    pub fn new(
        student_repo: Arc<StudentRepository>,
        course_repo: Arc<CourseRepository>,
        enrollment_repo: Arc<EnrollmentRepository>,
        action_log_repo: Arc<ActionLogRepository>,
    ) -> Self {
        Self {
            student_repo,
            course_repo,
            enrollment_repo,
            action_log_repo,
            capacity: DEFAULT_COURSE_CAPACITY,
        }
    }

    /// 覆盖选课上限（来自配置）
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// 当前选课上限
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 学生所选课程
    ///
    /// # 返回
    /// - Ok(Vec<Course>): 按课程创建顺序
    /// - Err(ApiError::NotFound): 学生不存在
    pub fn courses_of(&self, student_id: i64) -> ApiResult<Vec<Course>> {
        self.student_repo.get(student_id)?;
        Ok(self.enrollment_repo.find_courses_by_student(student_id)?)
    }

    /// 课程的选课学生
    ///
    /// # 返回
    /// - Ok(Vec<Student>): 按学生姓名升序
    /// - Err(ApiError::NotFound): 课程不存在
    pub fn students_of(&self, course_id: i64) -> ApiResult<Vec<Student>> {
        self.course_repo.get(course_id)?;
        Ok(self.enrollment_repo.find_students_by_course(course_id)?)
    }

    /// 判断学生当前是否选了该课程（每次从存储重新读取）
    pub fn is_enrolled(&self, student_id: i64, course_id: i64) -> ApiResult<bool> {
        self.ensure_pair_exists(student_id, course_id)?;
        Ok(self.enrollment_repo.exists(student_id, course_id)?)
    }

    /// 课程已选人数
    pub fn count_students(&self, course_id: i64) -> ApiResult<usize> {
        self.course_repo.get(course_id)?;
        Ok(self.enrollment_repo.count_students(course_id)?)
    }

    /// 学生已选课程数
    pub fn count_courses(&self, student_id: i64) -> ApiResult<usize> {
        self.student_repo.get(student_id)?;
        Ok(self.enrollment_repo.count_courses(student_id)?)
    }

    // ==========================================
    // 写入
    // ==========================================

    /// 选课
    ///
    /// # 返回
    /// - Ok(()): 成功
    /// - Err(ApiError::CapacityExceeded): 课程已满
    /// - Err(ApiError::AlreadyEnrolled): 已选
    /// - Err(ApiError::NotFound): 学生或课程不存在
    pub fn enroll(&self, student_id: i64, course_id: i64) -> ApiResult<()> {
        self.ensure_pair_exists(student_id, course_id)?;

        // 计数与写入同一事务；主键冲突归为 AlreadyEnrolled
        let enrolled = match self
            .enrollment_repo
            .insert_within_capacity(student_id, course_id, self.capacity)
        {
            Ok(EnrollOutcome::Inserted { enrolled_before }) => enrolled_before,
            Ok(EnrollOutcome::CapacityFull { enrolled }) => {
                tracing::debug!(student_id, course_id, enrolled, "选课被拒: 课程已满");
                return Err(ApiError::CapacityExceeded {
                    course_id,
                    capacity: self.capacity,
                });
            }
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                return Err(ApiError::AlreadyEnrolled {
                    student_id,
                    course_id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(student_id, course_id, "选课成功");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::Enroll,
                Some(student_id),
                Some(course_id),
                Some(serde_json::json!({ "enrolled_before": enrolled })),
                format!("选课: student={} course={}", student_id, course_id),
            ),
        );
        Ok(())
    }

    /// 退课
    ///
    /// 未选课时为空操作，不报错；已登记的成绩保留。
    pub fn disenroll(&self, student_id: i64, course_id: i64) -> ApiResult<()> {
        self.ensure_pair_exists(student_id, course_id)?;

        let removed = self.enrollment_repo.delete(student_id, course_id)?;
        if removed == 0 {
            tracing::debug!(student_id, course_id, "退课: 未选课，忽略");
            return Ok(());
        }

        tracing::info!(student_id, course_id, "退课成功");
        record_action(
            &self.action_log_repo,
            ActionLog::new(
                ActionType::Disenroll,
                Some(student_id),
                Some(course_id),
                None,
                format!("退课: student={} course={}", student_id, course_id),
            ),
        );
        Ok(())
    }

    fn ensure_pair_exists(&self, student_id: i64, course_id: i64) -> ApiResult<()> {
        self.student_repo.get(student_id)?;
        self.course_repo.get(course_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use std::sync::Mutex;

    struct Fixture {
        students: Arc<StudentRepository>,
        courses: Arc<CourseRepository>,
        api: EnrollmentApi,
    }

    fn setup(capacity: usize) -> Fixture {
        let conn = Arc::new(Mutex::new(open_in_memory().unwrap()));
        let students = Arc::new(StudentRepository::new(conn.clone()));
        let courses = Arc::new(CourseRepository::new(conn.clone()));
        let api = EnrollmentApi::new(
            students.clone(),
            courses.clone(),
            Arc::new(EnrollmentRepository::new(conn.clone())),
            Arc::new(ActionLogRepository::new(conn)),
        )
        .with_capacity(capacity);
        Fixture {
            students,
            courses,
            api,
        }
    }

    #[test]
    fn test_capacity_checked_before_duplicate() {
        let f = setup(1);
        let alex = f.students.insert("Alex").unwrap();
        let math = f.courses.insert("Math").unwrap();

        f.api.enroll(alex.student_id, math.course_id).unwrap();

        // 已满且重复：报满员
        let err = f.api.enroll(alex.student_id, math.course_id).unwrap_err();
        assert!(matches!(err, ApiError::CapacityExceeded { capacity: 1, .. }));
    }

    #[test]
    fn test_unknown_entities() {
        let f = setup(20);
        let math = f.courses.insert("Math").unwrap();
        assert!(matches!(
            f.api.enroll(404, math.course_id),
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(f.api.students_of(404), Err(ApiError::NotFound(_))));
        assert!(matches!(f.api.courses_of(404), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_is_enrolled_follows_state() {
        let f = setup(20);
        let alex = f.students.insert("Alex").unwrap();
        let math = f.courses.insert("Math").unwrap();

        assert!(!f.api.is_enrolled(alex.student_id, math.course_id).unwrap());
        f.api.enroll(alex.student_id, math.course_id).unwrap();
        assert!(f.api.is_enrolled(alex.student_id, math.course_id).unwrap());
        assert_eq!(f.api.count_students(math.course_id).unwrap(), 1);
        assert_eq!(f.api.count_courses(alex.student_id).unwrap(), 1);

        f.api.disenroll(alex.student_id, math.course_id).unwrap();
        assert!(!f.api.is_enrolled(alex.student_id, math.course_id).unwrap());
        // 再次退课为空操作
        f.api.disenroll(alex.student_id, math.course_id).unwrap();
    }
}
