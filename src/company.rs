use crate::employee::Employee;
use crate::error::{AssignmentError, AssignmentResult};
use crate::ledger::{AssignmentKey, AssignmentLedger, AssignmentRecord};
use crate::metadata::CompanyProfile;
use crate::project::Project;
use crate::task::Task;
use tracing::debug;

/// Sole owner of every employee, project and the assignment ledger.
///
/// Records reference each other only through ids. The ledger is the durable
/// record of who works on what; the hour and cost totals cached on employees,
/// tasks and projects are rebuilt from it by [`Company::reconcile`].
#[derive(Debug, Clone, Default)]
pub struct Company {
    profile: CompanyProfile,
    pub(crate) employees: Vec<Employee>,
    pub(crate) projects: Vec<Project>,
    pub(crate) ledger: AssignmentLedger,
}

impl Company {
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            employees: Vec::new(),
            projects: Vec::new(),
            ledger: AssignmentLedger::new(),
        }
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: CompanyProfile) {
        self.profile = profile;
    }

    pub fn info(&self) -> String {
        format!(
            "Company: {}\nIndustry: {}\nLocation: {}\nFounded: {}\nEmployees: {}\nProjects: {}",
            self.profile.name,
            self.profile.industry,
            self.profile.location,
            self.profile.founded_year,
            self.employees.len(),
            self.projects.len()
        )
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, employee_id: i32) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id() == employee_id)
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: i32) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == project_id)
    }

    pub fn project_tasks(&self, project_id: i32) -> AssignmentResult<&[Task]> {
        self.project(project_id)
            .map(Project::tasks)
            .ok_or(AssignmentError::ProjectNotFound(project_id))
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    pub fn task_assignments(&self) -> Vec<AssignmentRecord> {
        self.ledger.records()
    }

    pub fn next_employee_id(&self) -> i32 {
        self.employees.iter().map(Employee::id).max().unwrap_or(0) + 1
    }

    pub fn next_project_id(&self) -> i32 {
        self.projects.iter().map(Project::id).max().unwrap_or(0) + 1
    }

    pub fn add_employee(&mut self, employee: Employee) -> AssignmentResult<()> {
        if self.employee(employee.id()).is_some() {
            return Err(AssignmentError::DuplicateEmployee(employee.id()));
        }
        debug!(employee_id = employee.id(), name = employee.name(), "employee added");
        self.employees.push(employee);
        Ok(())
    }

    pub fn add_project(&mut self, project: Project) -> AssignmentResult<()> {
        if self.project(project.id()).is_some() {
            return Err(AssignmentError::DuplicateProject(project.id()));
        }
        debug!(project_id = project.id(), name = project.name(), "project added");
        self.projects.push(project);
        Ok(())
    }

    pub fn add_task_to_project(&mut self, project_id: i32, task: Task) -> AssignmentResult<()> {
        let pi = self.project_index(project_id)?;
        self.projects[pi].add_task(task)?;
        Ok(())
    }

    pub fn employee_task_hours(&self, employee_id: i32, project_id: i32, task_id: i32) -> i32 {
        self.ledger
            .get(&AssignmentKey::new(employee_id, project_id, task_id))
    }

    /// Ledger hours of an employee on one project, never reported above capacity.
    pub fn employee_project_hours(&self, employee_id: i32, project_id: i32) -> i32 {
        let total = self.ledger.employee_project_total(employee_id, project_id);
        match self.employee(employee_id) {
            Some(employee) => total.min(employee.weekly_hours_capacity()),
            None => total,
        }
    }

    pub fn employee_total_hours(&self, employee_id: i32) -> i32 {
        self.ledger.employee_total(employee_id)
    }

    pub(crate) fn employee_index(&self, employee_id: i32) -> AssignmentResult<usize> {
        self.employees
            .iter()
            .position(|e| e.id() == employee_id)
            .ok_or(AssignmentError::EmployeeNotFound(employee_id))
    }

    pub(crate) fn project_index(&self, project_id: i32) -> AssignmentResult<usize> {
        self.projects
            .iter()
            .position(|p| p.id() == project_id)
            .ok_or(AssignmentError::ProjectNotFound(project_id))
    }

    /// Builds a company from stored records without touching any cache.
    pub(crate) fn from_parts(
        profile: CompanyProfile,
        employees: Vec<Employee>,
        projects: Vec<Project>,
    ) -> Self {
        Self {
            profile,
            employees,
            projects,
            ledger: AssignmentLedger::new(),
        }
    }
}
