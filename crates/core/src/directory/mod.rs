//! Read-only student and course directory.
//!
//! Students, courses and academic-year enrollments are owned by other parts
//! of the college system. The ledger only looks them up: to validate an
//! outflow's references and to label course reports.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId};

use crate::ledger::LedgerError;

pub use memory::MemoryDirectory;

/// A student that can receive trust money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// The student ID.
    pub id: StudentId,
    /// Full display name.
    pub full_name: String,
    /// College roll number.
    pub roll_number: String,
}

/// A course offered by the college.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// The course ID.
    pub id: CourseId,
    /// Display name.
    pub name: String,
}

/// A student's enrollment in a course for one academic session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// The academic-year record ID.
    pub academic_year_id: AcademicYearId,
    /// The enrolled student.
    pub student_id: StudentId,
    /// The course of this academic year.
    pub course: Course,
    /// Session label (e.g. "2025-26").
    pub session: String,
}

/// Lookup interface over the student/course directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Finds a student by ID.
    async fn find_student(&self, id: StudentId) -> Result<Option<Student>, LedgerError>;

    /// Case-insensitive search on name or roll number, ordered by name.
    ///
    /// A blank query returns the first `limit` students.
    async fn search_students(&self, query: &str, limit: u64)
    -> Result<Vec<Student>, LedgerError>;

    /// Finds an academic-year enrollment, only if it belongs to `student_id`.
    async fn find_enrollment(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
    ) -> Result<Option<Enrollment>, LedgerError>;

    /// Lists all courses.
    async fn list_courses(&self) -> Result<Vec<Course>, LedgerError>;
}
