//! Configuration for student seeding.

/// Courses assigned when none are given on the command line.
pub const DEFAULT_COURSES: [&str; 8] = [
    "Biology",
    "Chemistry",
    "Computer Science",
    "Economics",
    "History",
    "Literature",
    "Mathematics",
    "Physics",
];

/// How many students to create and which courses to spread them over.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub count: usize,
    pub courses: Vec<String>,
}

impl SeedConfig {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            courses: DEFAULT_COURSES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Replaces the course list; blank entries are dropped and an empty list
    /// keeps the defaults.
    pub fn with_courses(mut self, courses: Vec<String>) -> Self {
        let courses: Vec<String> = courses
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if !courses.is_empty() {
            self.courses = courses;
        }
        self
    }
}
