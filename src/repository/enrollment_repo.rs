// ==========================================
// 学籍成绩管理系统 - 选课关系仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 结构: 单表 enrollment (student_id, course_id) 主键，两侧均有索引
//       一行即代表双向关系，不存在“只加了一侧”的中间状态
// ==========================================

use crate::domain::course::Course;
use crate::domain::student::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, TransactionBehavior};
use std::sync::{Arc, Mutex};

/// 限额选课的写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// 已写入，enrolled_before 为写入前的人数
    Inserted { enrolled_before: usize },
    /// 课程已满，未写入
    CapacityFull { enrolled: usize },
}

/// 选课关系仓储
pub struct EnrollmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EnrollmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 建立选课关系
    ///
    /// # 返回
    /// - Err(UniqueConstraintViolation): 关系已存在
    /// - Err(ForeignKeyViolation): 学生或课程不存在
    pub fn insert(&self, student_id: i64, course_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO enrollment (student_id, course_id) VALUES (?1, ?2)",
            params![student_id, course_id],
        )?;
        Ok(())
    }

    /// 在人数上限内建立选课关系
    ///
    /// 计数与写入在同一事务内完成，并发调用不会突破上限。
    /// 先判满员，再写入；已选时写入失败报 UniqueConstraintViolation。
    pub fn insert_within_capacity(
        &self,
        student_id: i64,
        course_id: i64,
        capacity: usize,
    ) -> RepositoryResult<EnrollOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let count: i64 = tx.query_row(
            "SELECT COUNT(*) FROM enrollment WHERE course_id = ?1",
            params![course_id],
            |row| row.get(0),
        )?;
        let enrolled = count as usize;
        if enrolled >= capacity {
            return Ok(EnrollOutcome::CapacityFull { enrolled });
        }

        tx.execute(
            "INSERT INTO enrollment (student_id, course_id) VALUES (?1, ?2)",
            params![student_id, course_id],
        )?;
        tx.commit()?;

        Ok(EnrollOutcome::Inserted {
            enrolled_before: enrolled,
        })
    }

    /// 删除选课关系
    ///
    /// # 返回
    /// - Ok(rows): 被删除的行数（关系不存在时为 0）
    pub fn delete(&self, student_id: i64, course_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM enrollment WHERE student_id = ?1 AND course_id = ?2",
            params![student_id, course_id],
        )?;
        Ok(rows)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 判断关系是否存在
    pub fn exists(&self, student_id: i64, course_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM enrollment WHERE student_id = ?1 AND course_id = ?2",
            params![student_id, course_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// 课程已选人数
    pub fn count_students(&self, course_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM enrollment WHERE course_id = ?1",
            params![course_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 学生已选课程数
    pub fn count_courses(&self, student_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM enrollment WHERE student_id = ?1",
            params![student_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 学生所选课程（课程默认排序）
    pub fn find_courses_by_student(&self, student_id: i64) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT c.course_id, c.name
            FROM enrollment e
            JOIN course c ON c.course_id = e.course_id
            WHERE e.student_id = ?1
            ORDER BY c.course_id ASC
            "#,
        )?;
        let courses = stmt
            .query_map(params![student_id], |row| {
                Ok(Course {
                    course_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(courses)
    }

    /// 课程的选课学生（学生默认排序）
    pub fn find_students_by_course(&self, course_id: i64) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT s.student_id, s.name
            FROM enrollment e
            JOIN student s ON s.student_id = e.student_id
            WHERE e.course_id = ?1
            ORDER BY s.name ASC, s.student_id ASC
            "#,
        )?;
        let students = stmt
            .query_map(params![course_id], |row| {
                Ok(Student {
                    student_id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }
}
