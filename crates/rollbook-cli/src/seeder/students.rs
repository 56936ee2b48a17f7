//! Student seeding functionality.
//!
//! Provides functions for generating fake students that pass the same
//! rules as the API and inserting them into the database in batches.

use fake::faker::name::en::*;
use fake::{Fake, Faker};
use rayon::prelude::*;
use rollbook_models::students::{StudentDraft, StudentForm};
use sqlx::{PgPool, Postgres, Transaction};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::models::SeedConfig;

const BATCH_SIZE: usize = 500;

fn fake_phone() -> String {
    (0..10)
        .map(|_| char::from(b'0' + (0..10u8).fake::<u8>()))
        .collect()
}

fn ascii_lower(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// Builds one student; `tag` keeps emails unique across seeding runs.
fn generate_student(idx: usize, tag: u64, courses: &[String]) -> StudentForm {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let age: i32 = (16..=100).fake();
    let course = courses[(0..courses.len()).fake::<usize>()].clone();

    let mut form = StudentForm::new(format!("{} {}", first_name, last_name), age, course);

    if Faker.fake::<bool>() {
        form = form.with_email(format!(
            "{}.{}+{}{}@example.com",
            ascii_lower(&first_name),
            ascii_lower(&last_name),
            tag,
            idx
        ));
    }
    if Faker.fake::<bool>() {
        form = form.with_phone(fake_phone());
    }

    form
}

/// Generates valid student drafts in parallel using Rayon.
///
/// Generated forms that break a rule are dropped, so the result may be
/// shorter than `config.count`.
pub fn generate_students(config: &SeedConfig) -> Vec<StudentDraft> {
    if config.courses.is_empty() {
        return Vec::new();
    }

    let tag = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    (0..config.count)
        .into_par_iter()
        .filter_map(|idx| generate_student(idx, tag, &config.courses).into_draft().ok())
        .collect()
}

/// Seeds students into the database
pub async fn seed_students(
    db: &PgPool,
    config: &SeedConfig,
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("Seeding {} students...", config.count);

    let students = generate_students(config);
    let ids = insert_students_batch(db, &students).await?;

    println!(
        "   Inserted {} students in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts students in batches using multi-value INSERT statements.
///
/// Rows whose email is already taken are skipped.
pub async fn insert_students_batch(
    db: &PgPool,
    students: &[StudentDraft],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;
    let mut all_ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let ids = insert_students_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentDraft],
) -> Result<Vec<i64>, Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from("INSERT INTO students (name, age, course, email, phone) VALUES ");

    for i in 0..students.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 5;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, i64>(&query);
    for student in students {
        q = q
            .bind(&student.name)
            .bind(student.age)
            .bind(&student.course)
            .bind(&student.email)
            .bind(&student.phone);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Clears all students from the database
pub async fn clear_students(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("Clearing students...");

    let result = sqlx::query("DELETE FROM students")
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   Deleted {} students in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_students_are_valid() {
        let config = SeedConfig::new(200);
        let students = generate_students(&config);

        assert!(!students.is_empty());
        for student in &students {
            assert!((16..=100).contains(&student.age));
            assert!(config.courses.contains(&student.course));
            assert_eq!(student.id, None);
            if let Some(phone) = &student.phone {
                assert_eq!(phone.len(), 10);
                assert!(phone.bytes().all(|b| b.is_ascii_digit()));
            }
        }
    }

    #[test]
    fn test_generated_emails_are_unique() {
        let students = generate_students(&SeedConfig::new(300));
        let mut emails: Vec<&str> = students.iter().filter_map(|s| s.email.as_deref()).collect();
        let total = emails.len();
        emails.sort_unstable();
        emails.dedup();
        assert_eq!(emails.len(), total);
    }

    #[test]
    fn test_custom_courses_are_used() {
        let config = SeedConfig::new(50).with_courses(vec!["Art".to_string(), " ".to_string()]);
        assert_eq!(config.courses, vec!["Art"]);
        assert!(generate_students(&config).iter().all(|s| s.course == "Art"));
    }

    #[test]
    fn test_blank_course_list_keeps_defaults() {
        let config = SeedConfig::new(1).with_courses(vec![String::new()]);
        assert_eq!(config.courses.len(), super::super::DEFAULT_COURSES.len());
    }

    #[test]
    fn test_fake_phone_shape() {
        let phone = fake_phone();
        assert_eq!(phone.len(), 10);
        assert!(phone.bytes().all(|b| b.is_ascii_digit()));
    }
}
