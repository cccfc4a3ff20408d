//! `projects` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto `ProjectService` calls.
//! - Render results as plain text or JSON.
//!
//! A missing project prints a short message and exits with status 2; any
//! other failure exits with status 1.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use log::debug;
use projects_core::{
    default_log_level, init_logging, Category, Material, Project, ProjectService, ServiceError,
    SqliteConnectionProvider, SqliteProjectRepository, Step, StoreConfig,
};
use serde::Serialize;
use std::process::ExitCode;

type Service = ProjectService<SqliteProjectRepository<SqliteConnectionProvider>>;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ServiceError>() {
            Some(ServiceError::NotFound(id)) => {
                eprintln!("No project with ID={id} exists.");
                ExitCode::from(2)
            }
            _ => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    let mut config = StoreConfig::from_env().context("invalid store configuration")?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    debug!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );

    let service = ProjectService::new(SqliteProjectRepository::from_config(config));
    execute(&service, cli.command, cli.json)
}

fn execute(service: &Service, command: Commands, json: bool) -> Result<()> {
    match command {
        Commands::Add {
            name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
        } => {
            let mut project = Project::new(name, estimated_hours, difficulty);
            project.actual_hours = actual_hours;
            project.notes = notes;
            let project = service.add_project(project)?;
            emit(json, &project, |p| {
                format!("You added project: {}", summary_line(p))
            })
        }
        Commands::List => {
            let projects = service.list_projects()?;
            emit(json, &projects, |projects| {
                if projects.is_empty() {
                    return "There are no projects.".to_string();
                }
                projects
                    .iter()
                    .map(|p| format!("   {}: {}", p.project_id.unwrap_or_default(), p.project_name))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Commands::Show { id } => {
            let project = service.get_project(id)?;
            emit(json, &project, render_project)
        }
        Commands::Update {
            id,
            name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
            clear_notes,
        } => {
            let mut project = service.get_project(id)?;
            if let Some(name) = name {
                project.project_name = name;
            }
            if let Some(hours) = estimated_hours {
                project.estimated_hours = hours;
            }
            if let Some(hours) = actual_hours {
                project.actual_hours = hours;
            }
            if let Some(difficulty) = difficulty {
                project.difficulty = difficulty;
            }
            if clear_notes {
                project.notes = None;
            } else if notes.is_some() {
                project.notes = notes;
            }
            service.update_project(&project)?;
            let project = project.summary();
            emit(json, &project, |p| {
                format!("Updated project: {}", summary_line(p))
            })
        }
        Commands::Delete { id } => {
            service.delete_project(id)?;
            emit(json, &serde_json::json!({ "deleted": id }), |_| {
                format!("Project {id} was deleted successfully.")
            })
        }
        Commands::AddMaterial {
            id,
            name,
            quantity,
            cost,
        } => {
            let mut material = Material::new(id, name);
            material.num_required = quantity;
            material.cost = cost;
            let material = service.add_material(material)?;
            emit(json, &material, |m| {
                format!("Added material to project {id}: {}", render_material(m))
            })
        }
        Commands::AddStep { id, text, order } => {
            let mut step = Step::new(id, text);
            step.step_order = order;
            let step = service.add_step(step)?;
            emit(json, &step, |s| {
                format!("Added step to project {id}: {}", render_step(s))
            })
        }
        Commands::AddCategory { id, name } => {
            let category = service.add_category_to_project(id, &name)?;
            emit(json, &category, |c| {
                format!("Project {id} is now in category {}", c.category_name)
            })
        }
        Commands::Categories => {
            let categories = service.list_categories()?;
            emit(json, &categories, |categories| {
                if categories.is_empty() {
                    return "There are no categories.".to_string();
                }
                categories
                    .iter()
                    .map(render_category)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("failed to encode JSON output")?
        );
    } else {
        println!("{}", text(value));
    }
    Ok(())
}

fn summary_line(project: &Project) -> String {
    format!(
        "{} (id={}, estimated={}h, actual={}h, difficulty={})",
        project.project_name,
        project.project_id.unwrap_or_default(),
        project.estimated_hours,
        project.actual_hours,
        project.difficulty
    )
}

fn render_project(project: &Project) -> String {
    let mut lines = vec![
        format!("   ID={}", project.project_id.unwrap_or_default()),
        format!("   name={}", project.project_name),
        format!("   estimatedHours={}", project.estimated_hours),
        format!("   actualHours={}", project.actual_hours),
        format!("   difficulty={}", project.difficulty),
        format!("   notes={}", project.notes.as_deref().unwrap_or("")),
    ];

    lines.push("   Materials:".to_string());
    lines.extend(
        project
            .materials
            .iter()
            .map(|m| format!("      {}", render_material(m))),
    );
    lines.push("   Steps:".to_string());
    lines.extend(
        project
            .steps
            .iter()
            .map(|s| format!("      {}", render_step(s))),
    );
    lines.push("   Categories:".to_string());
    lines.extend(
        project
            .categories
            .iter()
            .map(|c| format!("      {}", render_category(c))),
    );
    lines.join("\n")
}

fn render_material(material: &Material) -> String {
    let mut line = material.material_name.clone();
    if let Some(count) = material.num_required {
        line.push_str(&format!(" x{count}"));
    }
    if let Some(cost) = material.cost {
        line.push_str(&format!(" @ {cost}"));
    }
    line
}

fn render_step(step: &Step) -> String {
    format!(
        "{}. {}",
        step.step_order.unwrap_or_default(),
        step.step_text
    )
}

fn render_category(category: &Category) -> String {
    format!("{}: {}", category.category_id, category.category_name)
}
