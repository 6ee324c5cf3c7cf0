//! Postgres directory over the students, courses and academic_years tables.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use trustfund_core::directory::{Course, Directory, Enrollment, Student};
use trustfund_core::ledger::LedgerError;
use trustfund_shared::types::{AcademicYearId, CourseId, StudentId};

use super::storage_error;
use crate::entities::{academic_years, courses, students};

/// Read-only directory backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgDirectory {
    db: DatabaseConnection,
}

impl PgDirectory {
    /// Creates a new directory.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escapes `LIKE` wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn student_from_model(model: students::Model) -> Student {
    Student {
        id: StudentId::from_uuid(model.id),
        full_name: model.full_name,
        roll_number: model.roll_number,
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: CourseId::from_uuid(model.id),
        name: model.name,
    }
}

#[async_trait]
impl Directory for PgDirectory {
    async fn find_student(&self, id: StudentId) -> Result<Option<Student>, LedgerError> {
        let model = students::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(model.map(student_from_model))
    }

    async fn search_students(&self, query: &str, limit: u64) -> Result<Vec<Student>, LedgerError> {
        let mut select = students::Entity::find();
        let needle = query.trim();
        if !needle.is_empty() {
            let pattern = like_pattern(needle);
            select = select.filter(
                Condition::any()
                    .add(Expr::col(students::Column::FullName).ilike(pattern.clone()))
                    .add(Expr::col(students::Column::RollNumber).ilike(pattern)),
            );
        }

        let models = select
            .order_by_asc(students::Column::FullName)
            .order_by_asc(students::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(student_from_model).collect())
    }

    async fn find_enrollment(
        &self,
        student_id: StudentId,
        academic_year_id: AcademicYearId,
    ) -> Result<Option<Enrollment>, LedgerError> {
        let found = academic_years::Entity::find_by_id(academic_year_id.into_inner())
            .filter(academic_years::Column::StudentId.eq(student_id.into_inner()))
            .find_also_related(courses::Entity)
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        let Some((year, course)) = found else {
            return Ok(None);
        };
        let course = course.ok_or_else(|| {
            LedgerError::Storage(format!(
                "academic year {} references missing course {}",
                year.id, year.course_id
            ))
        })?;

        Ok(Some(Enrollment {
            academic_year_id,
            student_id,
            course: course_from_model(course),
            session: year.session,
        }))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, LedgerError> {
        let models = courses::Entity::find()
            .order_by_asc(courses::Column::Name)
            .order_by_asc(courses::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;
        Ok(models.into_iter().map(course_from_model).collect())
    }
}
