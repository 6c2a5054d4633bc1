// ==========================================
// 学籍成绩管理系统 - 课程数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 排序: 创建顺序 (course_id)
// ==========================================

use crate::domain::course::Course;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

/// 课程仓储
/// 职责: 管理 course 表的创建与查询
pub struct CourseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CourseRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新建课程
    pub fn insert(&self, name: &str) -> RepositoryResult<Course> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO course (name) VALUES (?1)", params![name])?;
        Ok(Course {
            course_id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// 按主键查询
    pub fn find_by_id(&self, course_id: i64) -> RepositoryResult<Option<Course>> {
        let conn = self.get_conn()?;
        let course = conn
            .query_row(
                "SELECT course_id, name FROM course WHERE course_id = ?1",
                params![course_id],
                map_course,
            )
            .optional()?;
        Ok(course)
    }

    /// 按主键查询，不存在时返回 NotFound
    pub fn get(&self, course_id: i64) -> RepositoryResult<Course> {
        self.find_by_id(course_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Course".to_string(),
                id: course_id.to_string(),
            })
    }

    /// 查询全部课程（创建顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Course>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT course_id, name FROM course ORDER BY course_id ASC")?;
        let courses = stmt
            .query_map([], map_course)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(courses)
    }
}

fn map_course(row: &Row<'_>) -> SqliteResult<Course> {
    Ok(Course {
        course_id: row.get(0)?,
        name: row.get(1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_list_keeps_creation_order() {
        let repo = CourseRepository::new(Arc::new(Mutex::new(open_in_memory().unwrap())));
        let math = repo.insert("Math").unwrap();
        let biology = repo.insert("Biology").unwrap();

        assert_eq!(repo.list_all().unwrap(), vec![math.clone(), biology]);
        assert_eq!(repo.get(math.course_id).unwrap().name, "Math");
        assert!(repo.find_by_id(math.course_id + 100).unwrap().is_none());
    }
}
