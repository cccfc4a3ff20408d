//! Project store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/detail/update/delete over the `project` table.
//! - Assemble the project aggregate from `material`, `step` and the
//!   `category`/`project_category` join inside a single transaction.
//!
//! # Invariants
//! - Listing never hydrates child collections.
//! - Detailed fetch returns a fully hydrated project or nothing.
//! - Update/delete report whether exactly one row matched; a miss is not an error.

use super::error::{RepoError, RepoResult, StoreFault};
use super::row::{decimal_to_sql, query_all, query_one, query_optional};
use super::unit_of_work::{run_in_transaction, TxMode};
use crate::config::StoreConfig;
use crate::db::{ConnectionProvider, SqliteConnectionProvider};
use crate::model::category::Category;
use crate::model::material::Material;
use crate::model::project::{Project, ProjectId};
use crate::model::step::Step;
use rusqlite::{params, Connection};

const PROJECT_SELECT_SQL: &str = "SELECT
    project_id,
    project_name,
    estimated_hours,
    actual_hours,
    difficulty,
    notes
FROM project";

const MATERIAL_SELECT_SQL: &str = "SELECT
    material_id,
    project_id,
    material_name,
    num_required,
    cost
FROM material";

const STEP_SELECT_SQL: &str = "SELECT
    step_id,
    project_id,
    step_text,
    step_order
FROM step";

/// Store interface for the project aggregate.
///
/// Every method runs in its own transaction.
pub trait ProjectRepository {
    /// Inserts one unsaved project and returns it with the generated id.
    fn insert_project(&self, project: Project) -> RepoResult<Project>;
    /// Lists all projects by name, without child collections.
    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>>;
    /// Loads one project with materials, steps and categories attached.
    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>>;
    /// Overwrites scalar fields of a saved project. `false` when no row matched.
    fn modify_project_details(&self, project: &Project) -> RepoResult<bool>;
    /// Deletes a project and, by cascade, its children. `false` when no row matched.
    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool>;
    /// Adds a material to an existing project. `None` when the project is missing.
    fn insert_material(&self, material: Material) -> RepoResult<Option<Material>>;
    /// Adds a step to an existing project. `None` when the project is missing.
    fn insert_step(&self, step: Step) -> RepoResult<Option<Step>>;
    /// Lists all known categories by name.
    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>>;
    /// Links a category, created on first use, to an existing project.
    /// `None` when the project is missing.
    fn assign_category(
        &self,
        project_id: ProjectId,
        category_name: &str,
    ) -> RepoResult<Option<Category>>;
}

/// SQLite-backed project store acquiring one connection per operation.
pub struct SqliteProjectRepository<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> SqliteProjectRepository<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl SqliteProjectRepository<SqliteConnectionProvider> {
    /// Builds a store over the database file named by `config`.
    pub fn from_config(config: StoreConfig) -> Self {
        Self::new(SqliteConnectionProvider::new(config))
    }
}

impl<P: ConnectionProvider> ProjectRepository for SqliteProjectRepository<P> {
    fn insert_project(&self, mut project: Project) -> RepoResult<Project> {
        if let Some(id) = project.project_id {
            return Err(RepoError::IdAlreadyAssigned {
                entity: "project",
                id,
            });
        }

        let project_id =
            run_in_transaction(&self.provider, "insert_project", TxMode::Write, |tx| {
                tx.execute(
                    "INSERT INTO project (
                        project_name,
                        estimated_hours,
                        actual_hours,
                        difficulty,
                        notes
                    ) VALUES (?1, ?2, ?3, ?4, ?5);",
                    params![
                        project.project_name.as_str(),
                        decimal_to_sql(project.estimated_hours),
                        decimal_to_sql(project.actual_hours),
                        project.difficulty,
                        project.notes.as_deref(),
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            })?;

        project.project_id = Some(project_id);
        Ok(project)
    }

    fn fetch_all_projects(&self) -> RepoResult<Vec<Project>> {
        run_in_transaction(&self.provider, "fetch_all_projects", TxMode::Read, |tx| {
            query_all(
                tx,
                &format!("{PROJECT_SELECT_SQL} ORDER BY project_name ASC, project_id ASC;"),
                [],
            )
        })
    }

    fn fetch_project_by_id(&self, project_id: ProjectId) -> RepoResult<Option<Project>> {
        run_in_transaction(&self.provider, "fetch_project_by_id", TxMode::Read, |tx| {
            let found: Option<Project> = query_optional(
                tx,
                &format!("{PROJECT_SELECT_SQL} WHERE project_id = ?1;"),
                [project_id],
            )?;
            let Some(mut project) = found else {
                return Ok(None);
            };

            project.materials = fetch_materials_for_project(tx, project_id)?;
            project.steps = fetch_steps_for_project(tx, project_id)?;
            project.categories = fetch_categories_for_project(tx, project_id)?;
            Ok(Some(project))
        })
    }

    fn modify_project_details(&self, project: &Project) -> RepoResult<bool> {
        let project_id = project
            .project_id
            .ok_or(RepoError::IdUnassigned { entity: "project" })?;

        run_in_transaction(
            &self.provider,
            "modify_project_details",
            TxMode::Write,
            |tx| {
                let changed = tx.execute(
                    "UPDATE project
                     SET
                        project_name = ?1,
                        estimated_hours = ?2,
                        actual_hours = ?3,
                        difficulty = ?4,
                        notes = ?5
                     WHERE project_id = ?6;",
                    params![
                        project.project_name.as_str(),
                        decimal_to_sql(project.estimated_hours),
                        decimal_to_sql(project.actual_hours),
                        project.difficulty,
                        project.notes.as_deref(),
                        project_id,
                    ],
                )?;
                Ok(changed == 1)
            },
        )
    }

    fn delete_project(&self, project_id: ProjectId) -> RepoResult<bool> {
        run_in_transaction(&self.provider, "delete_project", TxMode::Write, |tx| {
            let changed = tx.execute("DELETE FROM project WHERE project_id = ?1;", [project_id])?;
            Ok(changed == 1)
        })
    }

    fn insert_material(&self, mut material: Material) -> RepoResult<Option<Material>> {
        if let Some(id) = material.material_id {
            return Err(RepoError::IdAlreadyAssigned {
                entity: "material",
                id,
            });
        }

        let material_id =
            run_in_transaction(&self.provider, "insert_material", TxMode::Write, |tx| {
                if !project_exists(tx, material.project_id)? {
                    return Ok(None);
                }

                tx.execute(
                    "INSERT INTO material (
                        project_id,
                        material_name,
                        num_required,
                        cost
                    ) VALUES (?1, ?2, ?3, ?4);",
                    params![
                        material.project_id,
                        material.material_name.as_str(),
                        material.num_required,
                        material.cost.map(decimal_to_sql),
                    ],
                )?;
                Ok(Some(tx.last_insert_rowid()))
            })?;

        Ok(material_id.map(|id| {
            material.material_id = Some(id);
            material
        }))
    }

    fn insert_step(&self, mut step: Step) -> RepoResult<Option<Step>> {
        if let Some(id) = step.step_id {
            return Err(RepoError::IdAlreadyAssigned { entity: "step", id });
        }

        let inserted = run_in_transaction(&self.provider, "insert_step", TxMode::Write, |tx| {
            if !project_exists(tx, step.project_id)? {
                return Ok(None);
            }

            let step_order = match step.step_order {
                Some(order) => order,
                None => next_step_order(tx, step.project_id)?,
            };
            tx.execute(
                "INSERT INTO step (
                    project_id,
                    step_text,
                    step_order
                ) VALUES (?1, ?2, ?3);",
                params![step.project_id, step.step_text.as_str(), step_order],
            )?;
            Ok(Some((tx.last_insert_rowid(), step_order)))
        })?;

        Ok(inserted.map(|(id, step_order)| {
            step.step_id = Some(id);
            step.step_order = Some(step_order);
            step
        }))
    }

    fn fetch_all_categories(&self) -> RepoResult<Vec<Category>> {
        run_in_transaction(&self.provider, "fetch_all_categories", TxMode::Read, |tx| {
            query_all(
                tx,
                "SELECT category_id, category_name
                 FROM category
                 ORDER BY category_name COLLATE NOCASE ASC;",
                [],
            )
        })
    }

    fn assign_category(
        &self,
        project_id: ProjectId,
        category_name: &str,
    ) -> RepoResult<Option<Category>> {
        run_in_transaction(&self.provider, "assign_category", TxMode::Write, |tx| {
            if !project_exists(tx, project_id)? {
                return Ok(None);
            }

            tx.execute(
                "INSERT OR IGNORE INTO category (category_name) VALUES (?1);",
                [category_name],
            )?;
            let category: Category = query_one(
                tx,
                "SELECT category_id, category_name
                 FROM category
                 WHERE category_name = ?1 COLLATE NOCASE;",
                [category_name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO project_category (project_id, category_id)
                 VALUES (?1, ?2);",
                params![project_id, category.category_id],
            )?;
            Ok(Some(category))
        })
    }
}

/// Materials of one project, read on the caller's transaction.
fn fetch_materials_for_project(
    conn: &Connection,
    project_id: ProjectId,
) -> Result<Vec<Material>, StoreFault> {
    query_all(
        conn,
        &format!("{MATERIAL_SELECT_SQL} WHERE project_id = ?1 ORDER BY material_id ASC;"),
        [project_id],
    )
}

/// Steps of one project, read on the caller's transaction.
fn fetch_steps_for_project(
    conn: &Connection,
    project_id: ProjectId,
) -> Result<Vec<Step>, StoreFault> {
    query_all(
        conn,
        &format!("{STEP_SELECT_SQL} WHERE project_id = ?1 ORDER BY step_order ASC, step_id ASC;"),
        [project_id],
    )
}

/// Categories linked to one project through `project_category`.
fn fetch_categories_for_project(
    conn: &Connection,
    project_id: ProjectId,
) -> Result<Vec<Category>, StoreFault> {
    query_all(
        conn,
        "SELECT
            c.category_id AS category_id,
            c.category_name AS category_name
         FROM category c
         INNER JOIN project_category pc ON pc.category_id = c.category_id
         WHERE pc.project_id = ?1
         ORDER BY c.category_name COLLATE NOCASE ASC;",
        [project_id],
    )
}

fn project_exists(conn: &Connection, project_id: ProjectId) -> Result<bool, StoreFault> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM project WHERE project_id = ?1);",
        [project_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn next_step_order(conn: &Connection, project_id: ProjectId) -> Result<i32, StoreFault> {
    let next = conn.query_row(
        "SELECT COALESCE(MAX(step_order), 0) + 1 FROM step WHERE project_id = ?1;",
        [project_id],
        |row| row.get(0),
    )?;
    Ok(next)
}
