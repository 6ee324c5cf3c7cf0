//! In-memory directory, used by tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId};

use super::{Course, Directory, Enrollment, Student};
use crate::ledger::LedgerError;

#[derive(Debug, Clone)]
struct AcademicYear {
    student_id: StudentId,
    course_id: CourseId,
    session: String,
}

/// Directory backed by plain maps.
///
/// Populated up front with the builder-style `with_*` methods and read-only
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    students: HashMap<StudentId, Student>,
    courses: HashMap<CourseId, Course>,
    academic_years: HashMap<AcademicYearId, AcademicYear>,
}

impl MemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a course and returns its ID.
    pub fn add_course(&mut self, name: &str) -> CourseId {
        let id = CourseId::new();
        self.courses.insert(
            id,
            Course {
                id,
                name: name.to_string(),
            },
        );
        id
    }

    /// Adds a student and returns its ID.
    pub fn add_student(&mut self, full_name: &str, roll_number: &str) -> StudentId {
        let id = StudentId::new();
        self.students.insert(
            id,
            Student {
                id,
                full_name: full_name.to_string(),
                roll_number: roll_number.to_string(),
            },
        );
        id
    }

    /// Enrolls a student in a course for a session and returns the
    /// academic-year ID.
    pub fn enroll(
        &mut self,
        student_id: StudentId,
        course_id: CourseId,
        session: &str,
    ) -> AcademicYearId {
        let id = AcademicYearId::new();
        self.academic_years.insert(
            id,
            AcademicYear {
                student_id,
                course_id,
                session: session.to_string(),
            },
        );
        id
    }
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_student(&self, id: StudentId) -> Result<Option<Student>, LedgerError> {
        Ok(self.students.get(&id).cloned())
    }

    async fn search_students(&self, query: &str, limit: u64) -> Result<Vec<Student>, LedgerError> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<Student> = self
            .students
            .values()
            .filter(|s| {
                needle.is_empty()
                    || s.full_name.to_lowercase().contains(&needle)
                    || s.roll_number.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
        found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(found)
    }

    async fn find_enrollment(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
    ) -> Result<Option<Enrollment>, LedgerError> {
        let Some(year) = self.academic_years.get(&academic_year_id) else {
            return Ok(None);
        };
        if year.student_id != student_id {
            return Ok(None);
        }
        let Some(course) = self.courses.get(&year.course_id) else {
            return Err(LedgerError::Storage(format!(
                "academic year {academic_year_id} references missing course {}",
                year.course_id
            )));
        };
        Ok(Some(Enrollment {
            academic_year_id,
            student_id,
            course: course.clone(),
            session: year.session.clone(),
        }))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, LedgerError> {
        let mut courses: Vec<Course> = self.courses.values().cloned().collect();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }
}
