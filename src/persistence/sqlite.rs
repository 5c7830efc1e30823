use super::{CompanySnapshot, CompanyStore, PersistenceResult};
use crate::ledger::AssignmentRecord;
use crate::{Company, CompanyProfile, Employee, Project};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteCompanyStore {
    connection: Mutex<Connection>,
}

impl SqliteCompanyStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS company_profile (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                profile_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY,
                employee_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS projects (
                id INTEGER PRIMARY KEY,
                project_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS assignments (
                employee_id INTEGER NOT NULL,
                project_id INTEGER NOT NULL,
                task_id INTEGER NOT NULL,
                hours INTEGER NOT NULL CHECK (hours > 0),
                PRIMARY KEY (employee_id, project_id, task_id)
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_profile(
        &self,
        tx: &rusqlite::Transaction,
        profile: &CompanyProfile,
    ) -> PersistenceResult<()> {
        let json = serde_json::to_string(profile)?;
        tx.execute("DELETE FROM company_profile", [])?;
        tx.execute(
            "INSERT INTO company_profile (id, profile_json) VALUES (1, ?1)",
            params![json],
        )?;
        Ok(())
    }

    fn save_records(
        &self,
        tx: &rusqlite::Transaction,
        snapshot: &CompanySnapshot,
    ) -> PersistenceResult<()> {
        tx.execute("DELETE FROM employees", [])?;
        tx.execute("DELETE FROM projects", [])?;
        tx.execute("DELETE FROM assignments", [])?;

        let mut stmt = tx.prepare("INSERT INTO employees (id, employee_json) VALUES (?1, ?2)")?;
        for employee in &snapshot.employees {
            stmt.execute(params![employee.id(), serde_json::to_string(employee)?])?;
        }

        let mut stmt = tx.prepare("INSERT INTO projects (id, project_json) VALUES (?1, ?2)")?;
        for project in &snapshot.projects {
            stmt.execute(params![project.id(), serde_json::to_string(project)?])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO assignments (employee_id, project_id, task_id, hours) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for record in &snapshot.assignments {
            stmt.execute(params![
                record.employee_id,
                record.project_id,
                record.task_id,
                record.hours
            ])?;
        }
        Ok(())
    }
}

impl CompanyStore for SqliteCompanyStore {
    fn save_company(&self, company: &Company) -> PersistenceResult<()> {
        let snapshot = CompanySnapshot::from_company(company)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_profile(&tx, &snapshot.profile)?;
        self.save_records(&tx, &snapshot)?;
        tx.commit()?;
        Ok(())
    }

    fn load_company(&self) -> PersistenceResult<Option<Company>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt = conn.prepare("SELECT profile_json FROM company_profile WHERE id = 1")?;
        let profile_json: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
        let Some(profile_json) = profile_json else {
            return Ok(None);
        };
        let profile: CompanyProfile = serde_json::from_str(&profile_json)?;

        let mut stmt = conn.prepare("SELECT employee_json FROM employees ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut employees = Vec::new();
        for json in rows {
            let employee: Employee = serde_json::from_str(&json?)?;
            employees.push(employee);
        }

        let mut stmt = conn.prepare("SELECT project_json FROM projects ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut projects = Vec::new();
        for json in rows {
            let project: Project = serde_json::from_str(&json?)?;
            projects.push(project);
        }

        let mut stmt = conn.prepare(
            "SELECT employee_id, project_id, task_id, hours FROM assignments
             ORDER BY employee_id, project_id, task_id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(AssignmentRecord {
                employee_id: row.get(0)?,
                project_id: row.get(1)?,
                task_id: row.get(2)?,
                hours: row.get(3)?,
            })
        })?;
        let mut assignments = Vec::new();
        for record in rows {
            assignments.push(record?);
        }

        let snapshot = CompanySnapshot {
            profile,
            employees,
            projects,
            assignments,
        };
        snapshot.into_company().map(Some)
    }
}
