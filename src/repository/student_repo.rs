// ==========================================
// 学籍成绩管理系统 - 学生数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 排序: 姓名升序，同名按 student_id
// ==========================================

use crate::domain::student::Student;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// StudentRepository - 学生仓储
// ==========================================
/// 学生仓储
/// 职责: 管理 student 表的创建与查询
pub struct StudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StudentRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建学生
    ///
    /// # 返回
    /// - Ok(Student): 含数据库分配的 student_id
    pub fn insert(&self, name: &str) -> RepositoryResult<Student> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO student (name) VALUES (?1)", params![name])?;
        Ok(Student {
            student_id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Student)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, student_id: i64) -> RepositoryResult<Option<Student>> {
        let conn = self.get_conn()?;
        let student = conn
            .query_row(
                "SELECT student_id, name FROM student WHERE student_id = ?1",
                params![student_id],
                map_student,
            )
            .optional()?;
        Ok(student)
    }

    /// 按主键查询，不存在时返回 NotFound
    pub fn get(&self, student_id: i64) -> RepositoryResult<Student> {
        self.find_by_id(student_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Student".to_string(),
                id: student_id.to_string(),
            })
    }

    /// 查询全部学生（默认排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_id, name FROM student ORDER BY name ASC, student_id ASC",
        )?;
        let students = stmt
            .query_map([], map_student)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(students)
    }
}

fn map_student(row: &Row<'_>) -> SqliteResult<Student> {
    Ok(Student {
        student_id: row.get(0)?,
        name: row.get(1)?,
    })
}
