use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rollbook_core::pagination::PageMeta;
use tokio::sync::RwLock;

use super::{RepositoryError, RepositoryResult, StudentRepository};
use crate::modules::students::model::{Student, StudentDraft, StudentPage, StudentQuery};

#[derive(Debug)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Student>,
}

/// Process-local student store with the same contract as the Postgres one.
///
/// Ids are assigned from 1 upward and never reused. [`set_unavailable`]
/// makes every call fail with a storage error, which is how tests exercise
/// the failure paths of the service layer.
///
/// [`set_unavailable`]: InMemoryStudentRepository::set_unavailable
#[derive(Debug)]
pub struct InMemoryStudentRepository {
    table: RwLock<Table>,
    unavailable: AtomicBool,
}

impl Default for InMemoryStudentRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
            unavailable: AtomicBool::new(false),
        }
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> RepositoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Storage(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn email_taken(table: &Table, email: Option<&str>, except: Option<i64>) -> bool {
    let Some(email) = email else {
        return false;
    };
    table
        .rows
        .values()
        .any(|s| Some(s.id) != except && s.email.as_deref() == Some(email))
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Student>> {
        self.check_available()?;
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn save(&self, draft: StudentDraft) -> RepositoryResult<Student> {
        self.check_available()?;
        let mut table = self.table.write().await;

        if email_taken(&table, draft.email.as_deref(), draft.id) {
            return Err(RepositoryError::DuplicateEmail {
                email: draft.email.unwrap_or_default(),
            });
        }

        let now = Utc::now();
        let student = match draft.id {
            None => {
                let id = table.next_id;
                table.next_id += 1;
                Student {
                    id,
                    name: draft.name,
                    age: draft.age,
                    course: draft.course,
                    email: draft.email,
                    phone: draft.phone,
                    created_at: now,
                    updated_at: now,
                }
            }
            Some(id) => {
                let existing = table
                    .rows
                    .get(&id)
                    .ok_or(RepositoryError::NotFound { id })?;
                Student {
                    id,
                    name: draft.name,
                    age: draft.age,
                    course: draft.course,
                    email: draft.email,
                    phone: draft.phone,
                    created_at: existing.created_at,
                    updated_at: now,
                }
            }
        };

        table.rows.insert(student.id, student.clone());
        Ok(student)
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.check_available()?;
        match self.table.write().await.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound { id }),
        }
    }

    async fn list_distinct_courses(&self) -> RepositoryResult<Vec<String>> {
        self.check_available()?;
        let table = self.table.read().await;
        let mut courses: Vec<String> = table.rows.values().map(|s| s.course.clone()).collect();
        courses.sort();
        courses.dedup();
        Ok(courses)
    }

    async fn query(&self, query: &StudentQuery) -> RepositoryResult<StudentPage> {
        self.check_available()?;
        let table = self.table.read().await;

        let mut matching: Vec<&Student> =
            table.rows.values().filter(|s| query.matches(s)).collect();
        matching.sort_by(|a, b| query.sort.compare(a, b));

        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(query.offset().max(0) as usize)
            .take(query.size.max(0) as usize)
            .cloned()
            .collect();

        Ok(StudentPage {
            data,
            meta: PageMeta::new(query.page, query.size, total),
        })
    }
}
