// ==========================================
// 学籍成绩管理系统 - 成绩数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（范围/选课校验在 API 层）
// 约束: UNIQUE(student_id, course_id)
// ==========================================

use crate::domain::grade::Grade;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 成绩仓储
pub struct GradeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GradeRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建成绩记录
    ///
    /// # 返回
    /// - Ok(Grade): 新记录
    /// - Err(UniqueConstraintViolation): 该 (student, course) 已有成绩
    pub fn insert(&self, student_id: i64, course_id: i64, value: i32) -> RepositoryResult<Grade> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO grade (student_id, course_id, value) VALUES (?1, ?2, ?3)",
            params![student_id, course_id, value],
        )?;
        Ok(Grade {
            grade_id: conn.last_insert_rowid(),
            student_id,
            course_id,
            value,
        })
    }

    /// 按 (student, course) 查询
    pub fn find_by_pair(&self, student_id: i64, course_id: i64) -> RepositoryResult<Option<Grade>> {
        let conn = self.get_conn()?;
        let grade = conn
            .query_row(
                r#"
                SELECT grade_id, student_id, course_id, value
                FROM grade
                WHERE student_id = ?1 AND course_id = ?2
                "#,
                params![student_id, course_id],
                map_grade,
            )
            .optional()?;
        Ok(grade)
    }

    /// 覆写成绩值
    ///
    /// # 返回
    /// - Ok(rows): 被更新的行数（记录不存在时为 0）
    pub fn update_value(&self, grade_id: i64, value: i32) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE grade SET value = ?2 WHERE grade_id = ?1",
            params![grade_id, value],
        )?;
        Ok(rows)
    }

    /// 课程下的全部成绩（所有学生）
    pub fn find_by_course(&self, course_id: i64) -> RepositoryResult<Vec<Grade>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT grade_id, student_id, course_id, value
            FROM grade
            WHERE course_id = ?1
            ORDER BY grade_id ASC
            "#,
        )?;
        let grades = stmt
            .query_map(params![course_id], map_grade)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(grades)
    }

    /// 学生的全部成绩（所有课程）
    pub fn find_by_student(&self, student_id: i64) -> RepositoryResult<Vec<Grade>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT grade_id, student_id, course_id, value
            FROM grade
            WHERE student_id = ?1
            ORDER BY grade_id ASC
            "#,
        )?;
        let grades = stmt
            .query_map(params![student_id], map_grade)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(grades)
    }
}

fn map_grade(row: &Row<'_>) -> SqliteResult<Grade> {
    Ok(Grade {
        grade_id: row.get(0)?,
        student_id: row.get(1)?,
        course_id: row.get(2)?,
        value: row.get(3)?,
    })
}
