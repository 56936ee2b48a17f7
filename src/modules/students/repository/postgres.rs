use async_trait::async_trait;
use rollbook_core::pagination::PageMeta;
use sqlx::PgPool;
use tracing::Instrument;

use super::{RepositoryError, RepositoryResult, StudentRepository};
use crate::db_operation_span;
use crate::metrics::track_db_query;
use crate::modules::students::model::{Student, StudentDraft, StudentPage, StudentQuery};

const STUDENT_COLUMNS: &str = "id, name, age, course, email, phone, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStudentRepository {
    db: PgPool,
}

impl PgStudentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn insert(&self, draft: &StudentDraft) -> Result<Student, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (name, age, course, email, phone)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&draft.name)
        .bind(draft.age)
        .bind(&draft.course)
        .bind(&draft.email)
        .bind(&draft.phone)
        .fetch_one(&self.db)
        .instrument(db_operation_span!("INSERT", "students"))
        .await
    }

    async fn update(&self, id: i64, draft: &StudentDraft) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students
               SET name = $1, age = $2, course = $3, email = $4, phone = $5, updated_at = NOW()
               WHERE id = $6
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&draft.name)
        .bind(draft.age)
        .bind(&draft.course)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(id)
        .fetch_optional(&self.db)
        .instrument(db_operation_span!("UPDATE", "students", db.student_id = id))
        .await
    }
}

/// Turns a unique-index violation into a duplicate email error.
fn map_write_error(err: sqlx::Error, email: Option<&str>) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return RepositoryError::DuplicateEmail {
            email: email.unwrap_or_default().to_string(),
        };
    }
    RepositoryError::Storage(err)
}

#[async_trait]
impl StudentRepository for PgStudentRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .instrument(db_operation_span!("SELECT", "students", db.student_id = id))
        .await;

        track_db_query("find_by_id", student.is_ok());
        Ok(student?)
    }

    async fn save(&self, draft: StudentDraft) -> RepositoryResult<Student> {
        let result = match draft.id {
            None => self.insert(&draft).await.map(Some),
            Some(id) => self.update(id, &draft).await,
        };

        track_db_query("save", result.is_ok());
        match result {
            Ok(Some(student)) => Ok(student),
            Ok(None) => Err(RepositoryError::NotFound {
                id: draft.id.unwrap_or_default(),
            }),
            Err(e) => Err(map_write_error(e, draft.email.as_deref())),
        }
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .instrument(db_operation_span!("DELETE", "students", db.student_id = id))
            .await;

        track_db_query("delete_by_id", result.is_ok());
        if result?.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { id });
        }

        Ok(())
    }

    async fn list_distinct_courses(&self) -> RepositoryResult<Vec<String>> {
        let courses =
            sqlx::query_scalar::<_, String>("SELECT DISTINCT course FROM students ORDER BY course")
                .fetch_all(&self.db)
                .instrument(db_operation_span!("SELECT", "students"))
                .await;

        track_db_query("list_distinct_courses", courses.is_ok());
        Ok(courses?)
    }

    async fn query(&self, query: &StudentQuery) -> RepositoryResult<StudentPage> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(name) = &query.name {
            params.push(name.clone());
            conditions.push(format!("STRPOS(LOWER(name), LOWER(${})) > 0", params.len()));
        }

        if let Some(course) = &query.course {
            params.push(course.clone());
            conditions.push(format!("course = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let count_query = format!("SELECT COUNT(*) FROM students{where_clause}");
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in &params {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql
            .fetch_one(&self.db)
            .instrument(db_operation_span!("SELECT", "students"))
            .await;
        track_db_query("query_count", total.is_ok());
        let total = total?;

        // The column comes from a closed enum, never from user input.
        let data_query = format!(
            "SELECT {STUDENT_COLUMNS} FROM students{where_clause} \
             ORDER BY {} ASC NULLS LAST, id ASC LIMIT ${} OFFSET ${}",
            query.sort.column(),
            params.len() + 1,
            params.len() + 2,
        );
        let mut data_sql = sqlx::query_as::<_, Student>(&data_query);
        for param in params {
            data_sql = data_sql.bind(param);
        }
        let students = data_sql
            .bind(query.size)
            .bind(query.offset())
            .fetch_all(&self.db)
            .instrument(db_operation_span!("SELECT", "students"))
            .await;
        track_db_query("query_page", students.is_ok());

        Ok(StudentPage {
            data: students?,
            meta: PageMeta::new(query.page, query.size, total),
        })
    }
}
