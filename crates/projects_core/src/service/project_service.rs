//! Project use-case service.
//!
//! # Responsibility
//! - Provide the entry points callers use to manage projects.
//! - Validate writes and translate store `None`/`false` into `NotFound`.
//!
//! # Invariants
//! - Store errors are propagated unchanged inside `ServiceError::Store`.
//! - `NotFound` is produced here and nowhere else.

use crate::model::category::{normalize_category_name, Category};
use crate::model::material::Material;
use crate::model::project::{Project, ProjectId};
use crate::model::step::Step;
use crate::model::validation::ValidationError;
use crate::repo::error::RepoError;
use crate::repo::project_repo::ProjectRepository;
use log::info;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Outcome of a failed project use-case.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested project does not exist.
    #[error("project with id {0} does not exist")]
    NotFound(ProjectId),
    /// Input was rejected before reaching the store.
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationError),
    /// The store failed; its transaction has already been rolled back.
    #[error(transparent)]
    Store(#[from] RepoError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Use-case facade over a project store.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves a new project and returns it with its assigned id.
    pub fn add_project(&self, project: Project) -> ServiceResult<Project> {
        project.validate()?;
        let project = self.repo.insert_project(project)?;
        info!(
            "event=project_added module=service status=ok project_id={}",
            project.project_id.unwrap_or_default()
        );
        Ok(project)
    }

    /// Lists every project by name, without materials, steps or categories.
    pub fn list_projects(&self) -> ServiceResult<Vec<Project>> {
        Ok(self.repo.fetch_all_projects()?)
    }

    /// Loads one fully hydrated project.
    ///
    /// # Errors
    /// - `ServiceError::NotFound` when no project has `project_id`.
    pub fn get_project(&self, project_id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .fetch_project_by_id(project_id)?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Overwrites the scalar fields of a saved project.
    ///
    /// Child collections on `project` are ignored.
    pub fn update_project(&self, project: &Project) -> ServiceResult<()> {
        project.validate()?;
        let project_id = project
            .project_id
            .ok_or(RepoError::IdUnassigned { entity: "project" })?;

        if !self.repo.modify_project_details(project)? {
            return Err(ServiceError::NotFound(project_id));
        }
        info!("event=project_updated module=service status=ok project_id={project_id}");
        Ok(())
    }

    /// Deletes a project together with its materials, steps and category links.
    pub fn delete_project(&self, project_id: ProjectId) -> ServiceResult<()> {
        if !self.repo.delete_project(project_id)? {
            return Err(ServiceError::NotFound(project_id));
        }
        info!("event=project_deleted module=service status=ok project_id={project_id}");
        Ok(())
    }

    /// Adds a material to an existing project.
    pub fn add_material(&self, material: Material) -> ServiceResult<Material> {
        material.validate()?;
        let project_id = material.project_id;
        self.repo
            .insert_material(material)?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Adds a step to an existing project, appended when no order is given.
    pub fn add_step(&self, step: Step) -> ServiceResult<Step> {
        step.validate()?;
        let project_id = step.project_id;
        self.repo
            .insert_step(step)?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Links a category to a project, creating the category on first use.
    pub fn add_category_to_project(
        &self,
        project_id: ProjectId,
        category_name: &str,
    ) -> ServiceResult<Category> {
        let name = normalize_category_name(category_name).ok_or(ValidationError::Blank {
            field: "category_name",
        })?;
        self.repo
            .assign_category(project_id, &name)?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Lists every known category by name.
    pub fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.repo.fetch_all_categories()?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectService, ServiceError};
    use crate::model::category::Category;
    use crate::model::material::Material;
    use crate::model::project::{Project, ProjectId};
    use crate::model::step::Step;
    use crate::model::validation::ValidationError;
    use crate::repo::error::{RepoError, RepoResult, StoreFault};
    use crate::repo::project_repo::ProjectRepository;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    /// Store double whose lookups always miss, or always fail.
    #[derive(Default)]
    struct MissingStore {
        fail: bool,
        writes: Cell<u32>,
    }

    impl MissingStore {
        fn outcome<T>(&self, miss: T) -> RepoResult<T> {
            if self.fail {
                return Err(RepoError::Operation {
                    operation: "stub",
                    source: StoreFault::Sqlite(rusqlite::Error::InvalidQuery),
                });
            }
            Ok(miss)
        }

        fn write<T>(&self, miss: T) -> RepoResult<T> {
            self.writes.set(self.writes.get() + 1);
            self.outcome(miss)
        }
    }

    impl ProjectRepository for MissingStore {
        fn insert_project(&self, mut project: Project) -> RepoResult<Project> {
            project.project_id = Some(1);
            self.write(project)
        }
        fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
            self.outcome(Vec::new())
        }
        fn fetch_project_by_id(&self, _project_id: ProjectId) -> RepoResult<Option<Project>> {
            self.outcome(None)
        }
        fn modify_project_details(&self, _project: &Project) -> RepoResult<bool> {
            self.write(false)
        }
        fn delete_project(&self, _project_id: ProjectId) -> RepoResult<bool> {
            self.write(false)
        }
        fn insert_material(&self, _material: Material) -> RepoResult<Option<Material>> {
            self.write(None)
        }
        fn insert_step(&self, _step: Step) -> RepoResult<Option<Step>> {
            self.write(None)
        }
        fn fetch_all_categories(&self) -> RepoResult<Vec<Category>> {
            self.outcome(Vec::new())
        }
        fn assign_category(
            &self,
            _project_id: ProjectId,
            _category_name: &str,
        ) -> RepoResult<Option<Category>> {
            self.write(None)
        }
    }

    fn saved_project(id: ProjectId) -> Project {
        let mut project = Project::new("Bookshelf", Decimal::from(6), 2);
        project.project_id = Some(id);
        project
    }

    #[test]
    fn misses_become_not_found_with_requested_id() {
        let service = ProjectService::new(MissingStore::default());

        assert!(matches!(service.get_project(9), Err(ServiceError::NotFound(9))));
        assert!(matches!(
            service.update_project(&saved_project(4)),
            Err(ServiceError::NotFound(4))
        ));
        assert!(matches!(service.delete_project(5), Err(ServiceError::NotFound(5))));
        assert!(matches!(
            service.add_material(Material::new(6, "Screws")),
            Err(ServiceError::NotFound(6))
        ));
        assert!(matches!(
            service.add_step(Step::new(7, "Sand")),
            Err(ServiceError::NotFound(7))
        ));
        assert!(matches!(
            service.add_category_to_project(8, "Furniture"),
            Err(ServiceError::NotFound(8))
        ));
    }

    #[test]
    fn store_failures_pass_through_unchanged() {
        let service = ProjectService::new(MissingStore {
            fail: true,
            ..MissingStore::default()
        });

        let err = service.get_project(1).unwrap_err();
        match err {
            ServiceError::Store(RepoError::Operation { operation, .. }) => {
                assert_eq!(operation, "stub")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!service.delete_project(1).unwrap_err().is_not_found());
    }

    #[test]
    fn invalid_input_never_reaches_the_store() {
        let store = MissingStore::default();
        let service = ProjectService::new(store);

        let err = service
            .add_project(Project::new(" ", Decimal::ONE, 3))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Invalid(ValidationError::Blank { .. })));

        let err = service.add_category_to_project(1, "   ").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Invalid(ValidationError::Blank {
                field: "category_name"
            })
        ));

        assert_eq!(service.repo.writes.get(), 0);
    }

    #[test]
    fn update_requires_saved_project() {
        let service = ProjectService::new(MissingStore::default());
        let err = service
            .update_project(&Project::new("Unsaved", Decimal::ONE, 1))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(RepoError::IdUnassigned { entity: "project" })
        ));
    }
}
