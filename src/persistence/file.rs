use super::{CompanyStore, PersistenceResult};
use crate::ledger::AssignmentRecord;
use crate::validation;
use crate::{Company, CompanyProfile, Employee, Project, cost};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything needed to rebuild a company. Cached hours and costs are written
/// for readability but recomputed from `assignments` on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySnapshot {
    pub profile: CompanyProfile,
    pub employees: Vec<Employee>,
    pub projects: Vec<Project>,
    pub assignments: Vec<AssignmentRecord>,
}

impl CompanySnapshot {
    pub fn from_company(company: &Company) -> PersistenceResult<Self> {
        validation::validate_company(company)?;
        Ok(Self {
            profile: company.profile().clone(),
            employees: company.employees().to_vec(),
            projects: company.projects().to_vec(),
            assignments: company.task_assignments(),
        })
    }

    /// Rebuilds the company: records start with empty caches, the ledger is
    /// replayed without business checks, then a reconciliation pass runs.
    pub fn into_company(self) -> PersistenceResult<Company> {
        validation::validate_records(&self.employees, &self.projects, &self.assignments)?;

        let mut employees = self.employees;
        for employee in &mut employees {
            employee.clear_derived_state();
        }
        let mut projects = self.projects;
        for project in &mut projects {
            project.clear_derived_state();
        }

        let mut company = Company::from_parts(self.profile, employees, projects);
        for record in &self.assignments {
            company.restore_task_assignment(
                record.employee_id,
                record.project_id,
                record.task_id,
                record.hours,
            )?;
        }
        company.reconcile();
        Ok(company)
    }
}

pub fn save_company_to_json<P: AsRef<Path>>(company: &Company, path: P) -> PersistenceResult<()> {
    let snapshot = CompanySnapshot::from_company(company)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), "company saved");
    Ok(())
}

pub fn load_company_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Company> {
    let file = File::open(path.as_ref())?;
    let snapshot: CompanySnapshot = serde_json::from_reader(file)?;
    let company = snapshot.into_company()?;
    info!(path = %path.as_ref().display(), "company loaded");
    Ok(company)
}

/// JSON snapshot file used as a [`CompanyStore`]. A missing file loads as `None`.
pub struct JsonCompanyStore {
    path: PathBuf,
}

impl JsonCompanyStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CompanyStore for JsonCompanyStore {
    fn save_company(&self, company: &Company) -> PersistenceResult<()> {
        save_company_to_json(company, &self.path)
    }

    fn load_company(&self) -> PersistenceResult<Option<Company>> {
        if !self.path.exists() {
            return Ok(None);
        }
        load_company_from_json(&self.path).map(Some)
    }
}

#[derive(Serialize, Deserialize)]
struct AssignmentCsvRecord {
    employee_id: i32,
    project_id: i32,
    task_id: i32,
    hours: i32,
    #[serde(default)]
    weekly_cost: String,
}

impl AssignmentCsvRecord {
    fn from_record(record: &AssignmentRecord, company: &Company) -> Self {
        let weekly_cost = company
            .employee(record.employee_id)
            .map(|e| format!("{:.2}", cost::employee_cost(e.salary(), record.hours)))
            .unwrap_or_default();
        Self {
            employee_id: record.employee_id,
            project_id: record.project_id,
            task_id: record.task_id,
            hours: record.hours,
            weekly_cost,
        }
    }

    fn into_record(self) -> AssignmentRecord {
        AssignmentRecord {
            employee_id: self.employee_id,
            project_id: self.project_id,
            task_id: self.task_id,
            hours: self.hours,
        }
    }
}

pub fn export_ledger_to_csv<P: AsRef<Path>>(company: &Company, path: P) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in company.task_assignments() {
        writer.serialize(AssignmentCsvRecord::from_record(&record, company))?;
    }
    writer.flush()?;
    Ok(())
}

/// Replays ledger rows from a CSV file onto `company` and reconciles.
/// Rows overwrite existing entries with the same key. Returns the row count.
pub fn import_ledger_from_csv<P: AsRef<Path>>(
    company: &mut Company,
    path: P,
) -> PersistenceResult<usize> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for row in reader.deserialize::<AssignmentCsvRecord>() {
        records.push(row?.into_record());
    }

    validation::validate_assignments(&records, company.employees(), company.projects())?;

    for record in &records {
        company.restore_task_assignment(
            record.employee_id,
            record.project_id,
            record.task_id,
            record.hours,
        )?;
    }
    company.reconcile();
    Ok(records.len())
}
