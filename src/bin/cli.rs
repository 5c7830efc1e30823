use chrono::NaiveDate;
use clap::Parser;
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use workforce_planner::statistics::{employees_frame, ledger_frame, projects_frame, tasks_frame};
use workforce_planner::{
    AppConfig, Company, CompanyProfile, CompanyStore, Employee, EmployeeKind, Position, Project,
    ProjectPhase, ProjectUpdate, Task, TaskType, export_ledger_to_csv, import_ledger_from_csv,
    load_company_from_json, save_company_to_json,
};

#[derive(Parser, Debug)]
#[command(name = "cli", about = "Interactive workforce planner")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON snapshot to open on start
    #[arg(long)]
    load: Option<PathBuf>,
}

fn format_cell(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::Boolean(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| format_cell(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names, &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row(out: &mut String, values: &[String], widths: &[usize]) {
    out.push('|');
    for (value, width) in values.iter().zip(widths) {
        out.push(' ');
        out.push_str(value);
        out.push_str(&" ".repeat(width.saturating_sub(value.len())));
        out.push_str(" |");
    }
    out.push('\n');
}

fn print_help() {
    println!(
        "Commands:
  help                                           Show this help
  show employees|projects|ledger|stats|company   Print a table or summary
  show tasks <project_id>                        Print the tasks of a project
  hire <position> <salary> <rate> <name> [dept]  Add an employee (Manager|Developer|Designer|QA)
  project add <name> <phase> <budget> <est_hours> <YYYY-MM-DD> <YYYY-MM-DD>
                                                 Add a project
  task add <project_id> <type> <est_hours> <priority> <name...>
                                                 Add a task (Management|Development|Design|QA)
  assign <employee_id> <project_id> <task_id> <hours>
                                                 Assign hours to a task
  auto <project_id>                              Auto-assign the active workforce
  rate <employee_id> <rate>                      Change employment rate
  fire <employee_id>                             Deactivate an employee
  rehire <employee_id>                           Reactivate an employee
  remove <employee_id>                           Delete an employee
  drop <project_id>                              Delete a project
  phase <project_id> <phase>                     Move a project to a later phase
  budget <project_id> <amount>                   Set a project budget
  reconcile                                      Rebuild hours and costs from the ledger
  save json [path] | save csv <path> | save sqlite [path]
  load json [path] | load csv <path> | load sqlite [path]
  quit|exit                                      Exit"
    );
}

fn arg<T: FromStr>(value: Option<&str>, what: &str) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("Missing {what}"))?;
    raw.parse::<T>()
        .map_err(|_| format!("Invalid {what} '{raw}'"))
}

fn date_arg(value: Option<&str>, what: &str) -> Result<NaiveDate, String> {
    let raw = value.ok_or_else(|| format!("Missing {what}"))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("Invalid {what} '{raw}' (YYYY-MM-DD)"))
}

fn show(company: &Company, what: Option<&str>, rest: Option<&str>) -> Result<String, String> {
    let df = match what {
        Some("employees") => employees_frame(company),
        Some("projects") => projects_frame(company),
        Some("ledger") => ledger_frame(company),
        Some("tasks") => {
            let project_id: i32 = arg(rest, "project id")?;
            if company.project(project_id).is_none() {
                return Err(format!("project {project_id} not found"));
            }
            tasks_frame(company, project_id)
        }
        Some("stats") => {
            let stats = company.statistics();
            return Ok(format!(
                "Employees: {} ({} active)\nProjects: {}\nTasks: {}\nTotal salaries: {:.2}\nTotal budget: {:.2}\nEmployee costs: {:.2}\nAllocated hours: {} of {}\nAverage utilization: {:.1}%",
                stats.employee_count,
                stats.active_employee_count,
                stats.project_count,
                stats.task_count,
                stats.total_salaries,
                stats.total_budget,
                stats.total_employee_costs,
                stats.total_allocated_hours,
                stats.total_estimated_hours,
                stats.average_utilization * 100.0
            ));
        }
        Some("company") => return Ok(company.info()),
        _ => return Err("Usage: show employees|projects|ledger|stats|company|tasks <id>".into()),
    };
    df.map(|df| render_df_as_text_table(&df))
        .map_err(|e| e.to_string())
}

fn hire<'a>(company: &mut Company, mut parts: impl Iterator<Item = &'a str>) -> Result<String, String> {
    let position_raw = parts.next();
    let position = position_raw
        .and_then(|raw| raw.parse::<Position>().ok())
        .ok_or_else(|| format!("Invalid position '{}'", position_raw.unwrap_or_default()))?;
    let salary: f64 = arg(parts.next(), "salary")?;
    let rate: f64 = arg(parts.next(), "employment rate")?;
    let name = parts.next().ok_or("Missing name")?;
    let department = parts.next().unwrap_or("General");
    let id = company.next_employee_id();
    let employee = Employee::new(
        id,
        name,
        salary,
        department,
        EmployeeKind::default_for(position),
        rate,
    )
    .map_err(|e| e.to_string())?;
    let capacity = employee.weekly_hours_capacity();
    company.add_employee(employee).map_err(|e| e.to_string())?;
    Ok(format!("Hired {name} as {position} with id {id} ({capacity}h/week)."))
}

fn add_project<'a>(
    company: &mut Company,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<String, String> {
    let name = parts.next().ok_or("Missing project name")?;
    let phase_raw = parts.next();
    let phase = phase_raw
        .and_then(|raw| raw.parse::<ProjectPhase>().ok())
        .ok_or_else(|| format!("Invalid phase '{}'", phase_raw.unwrap_or_default()))?;
    let budget: f64 = arg(parts.next(), "budget")?;
    let estimated: i32 = arg(parts.next(), "estimated hours")?;
    let start = date_arg(parts.next(), "start date")?;
    let end = date_arg(parts.next(), "end date")?;
    let id = company.next_project_id();
    let project = Project::new(id, name, phase, start, end, budget, estimated)
        .map_err(|e| e.to_string())?;
    company.add_project(project).map_err(|e| e.to_string())?;
    Ok(format!("Added project {id} ({name})."))
}

fn add_task<'a>(company: &mut Company, mut parts: impl Iterator<Item = &'a str>) -> Result<String, String> {
    let project_id: i32 = arg(parts.next(), "project id")?;
    let type_raw = parts.next();
    let task_type = type_raw
        .and_then(|raw| raw.parse::<TaskType>().ok())
        .ok_or_else(|| format!("Invalid task type '{}'", type_raw.unwrap_or_default()))?;
    let estimated: i32 = arg(parts.next(), "estimated hours")?;
    let priority: i32 = arg(parts.next(), "priority")?;
    let name = parts.collect::<Vec<_>>().join(" ");
    let task_id = company
        .project(project_id)
        .map(Project::next_task_id)
        .ok_or_else(|| format!("project {project_id} not found"))?;
    let task = Task::new(task_id, name, task_type, estimated, priority).map_err(|e| e.to_string())?;
    company
        .add_task_to_project(project_id, task)
        .map_err(|e| e.to_string())?;
    Ok(format!("Added task {task_id} to project {project_id}."))
}

fn save<'a>(
    company: &Company,
    config: &AppConfig,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<String, String> {
    match parts.next() {
        Some("json") => {
            let path = parts.next().map(PathBuf::from).unwrap_or_else(|| config.data_file.clone());
            save_company_to_json(company, &path).map_err(|e| e.to_string())?;
            Ok(format!("Company saved to {}", path.display()))
        }
        Some("csv") => {
            let path = parts.next().ok_or("Usage: save csv <path>")?;
            export_ledger_to_csv(company, path).map_err(|e| e.to_string())?;
            Ok(format!("Ledger exported to {path}"))
        }
        Some("sqlite") => {
            let path = sqlite_path(config, parts.next())?;
            open_sqlite(&path)?
                .save_company(company)
                .map_err(|e| e.to_string())?;
            Ok(format!("Company saved to {}", path.display()))
        }
        _ => Err("Usage: save json [path] | save csv <path> | save sqlite [path]".into()),
    }
}

fn load<'a>(
    company: &mut Company,
    config: &AppConfig,
    mut parts: impl Iterator<Item = &'a str>,
) -> Result<(String, bool), String> {
    match parts.next() {
        Some("json") => {
            let path = parts.next().map(PathBuf::from).unwrap_or_else(|| config.data_file.clone());
            *company = load_company_from_json(&path).map_err(|e| e.to_string())?;
            Ok((format!("Company loaded from {}", path.display()), false))
        }
        Some("csv") => {
            let path = parts.next().ok_or("Usage: load csv <path>")?;
            let rows = import_ledger_from_csv(company, path).map_err(|e| e.to_string())?;
            // Merges into the open company.
            Ok((format!("Imported {rows} ledger rows from {path}"), true))
        }
        Some("sqlite") => {
            let path = sqlite_path(config, parts.next())?;
            let loaded = open_sqlite(&path)?
                .load_company()
                .map_err(|e| e.to_string())?
                .ok_or_else(|| format!("No company stored in {}", path.display()))?;
            *company = loaded;
            Ok((format!("Company loaded from {}", path.display()), false))
        }
        _ => Err("Usage: load json [path] | load csv <path> | load sqlite [path]".into()),
    }
}

fn sqlite_path(config: &AppConfig, explicit: Option<&str>) -> Result<PathBuf, String> {
    explicit
        .map(PathBuf::from)
        .or_else(|| config.sqlite_path.clone())
        .ok_or_else(|| "No sqlite path given and none configured".to_string())
}

#[cfg(feature = "sqlite")]
fn open_sqlite(path: &Path) -> Result<impl CompanyStore, String> {
    workforce_planner::SqliteCompanyStore::new(path).map_err(|e| e.to_string())
}

#[cfg(not(feature = "sqlite"))]
fn open_sqlite(_path: &Path) -> Result<workforce_planner::persistence::JsonCompanyStore, String> {
    Err("This build has no sqlite support".into())
}

fn execute(company: &mut Company, config: &AppConfig, input: &str) -> Result<(String, bool), String> {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let message = match cmd {
        "show" => return show(company, parts.next(), parts.next()).map(|out| (out, false)),
        "hire" => hire(company, parts)?,
        "project" => match parts.next() {
            Some("add") => add_project(company, parts)?,
            _ => return Err("Usage: project add <name> <phase> <budget> <est_hours> <start> <end>".into()),
        },
        "task" => match parts.next() {
            Some("add") => add_task(company, parts)?,
            _ => return Err("Usage: task add <project_id> <type> <est_hours> <priority> <name...>".into()),
        },
        "assign" => {
            let employee_id: i32 = arg(parts.next(), "employee id")?;
            let project_id: i32 = arg(parts.next(), "project id")?;
            let task_id: i32 = arg(parts.next(), "task id")?;
            let hours: i32 = arg(parts.next(), "hours")?;
            let assigned = company
                .assign_employee_to_task(employee_id, project_id, task_id, hours)
                .map_err(|e| e.to_string())?;
            format!("Assigned {assigned}h of employee {employee_id} to task {task_id} of project {project_id}.")
        }
        "auto" => {
            let project_id: i32 = arg(parts.next(), "project id")?;
            let summary = company
                .auto_assign_employees_to_project(project_id)
                .map_err(|e| e.to_string())?;
            format!(
                "Auto-assigned {}h in {} assignments (cost {:.2}).",
                summary.hours_assigned, summary.assignments, summary.cost_added
            )
        }
        "rate" => {
            let employee_id: i32 = arg(parts.next(), "employee id")?;
            let rate: f64 = arg(parts.next(), "employment rate")?;
            company
                .change_employment_rate(employee_id, rate)
                .map_err(|e| e.to_string())?;
            format!("Employment rate of employee {employee_id} set to {rate}.")
        }
        "fire" => {
            let employee_id: i32 = arg(parts.next(), "employee id")?;
            company.fire_employee(employee_id).map_err(|e| e.to_string())?;
            format!("Employee {employee_id} fired.")
        }
        "rehire" => {
            let employee_id: i32 = arg(parts.next(), "employee id")?;
            company
                .reactivate_employee(employee_id)
                .map_err(|e| e.to_string())?;
            format!("Employee {employee_id} reactivated.")
        }
        "remove" => {
            let employee_id: i32 = arg(parts.next(), "employee id")?;
            let removed = company.remove_employee(employee_id).map_err(|e| e.to_string())?;
            format!("Removed employee {} ({}).", removed.id(), removed.name())
        }
        "drop" => {
            let project_id: i32 = arg(parts.next(), "project id")?;
            let removed = company.remove_project(project_id).map_err(|e| e.to_string())?;
            format!("Removed project {} ({}).", removed.id(), removed.name())
        }
        "phase" => {
            let project_id: i32 = arg(parts.next(), "project id")?;
            let raw = parts.next();
            let phase = raw
                .and_then(|raw| raw.parse::<ProjectPhase>().ok())
                .ok_or_else(|| format!("Invalid phase '{}'", raw.unwrap_or_default()))?;
            let update = ProjectUpdate {
                phase: Some(phase),
                ..ProjectUpdate::default()
            };
            company
                .update_project(project_id, update)
                .map_err(|e| e.to_string())?;
            format!("Project {project_id} moved to {phase}.")
        }
        "budget" => {
            let project_id: i32 = arg(parts.next(), "project id")?;
            let budget: f64 = arg(parts.next(), "budget")?;
            let update = ProjectUpdate {
                budget: Some(budget),
                ..ProjectUpdate::default()
            };
            company
                .update_project(project_id, update)
                .map_err(|e| e.to_string())?;
            format!("Budget of project {project_id} set to {budget:.2}.")
        }
        "reconcile" => {
            company.reconcile();
            "Hours and costs rebuilt from the ledger.".to_string()
        }
        "save" => return save(company, config, parts).map(|out| (out, false)),
        "load" => return load(company, config, parts),
        _ => return Err("Unknown command. Type 'help'.".into()),
    };
    Ok((message, true))
}

fn main() {
    let args = Args::parse();
    let config = match AppConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(2);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut company = match &args.load {
        Some(path) => match load_company_from_json(path) {
            Ok(company) => company,
            Err(e) => {
                eprintln!("Could not load {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Company::new(CompanyProfile::default()),
    };

    println!("Workforce Planner (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "help" => print_help(),
            "quit" | "exit" => break,
            _ => match execute(&mut company, &config, input) {
                Ok((message, mutated)) => {
                    println!("{message}");
                    if mutated && config.autosave {
                        if let Err(e) = save_company_to_json(&company, &config.data_file) {
                            println!("Autosave failed: {e}");
                        }
                    }
                }
                Err(e) => println!("Error: {e}"),
            },
        }
    }
}
