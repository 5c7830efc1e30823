use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssignmentKey {
    pub employee_id: i32,
    pub project_id: i32,
    pub task_id: i32,
}

impl AssignmentKey {
    pub fn new(employee_id: i32, project_id: i32, task_id: i32) -> Self {
        Self {
            employee_id,
            project_id,
            task_id,
        }
    }
}

/// Flat form of one ledger entry, used by persistence and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub employee_id: i32,
    pub project_id: i32,
    pub task_id: i32,
    pub hours: i32,
}

impl AssignmentRecord {
    pub fn key(&self) -> AssignmentKey {
        AssignmentKey::new(self.employee_id, self.project_id, self.task_id)
    }
}

/// Hours per week keyed by (employee, project, task).
///
/// Only positive values are stored: writing zero or less removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentLedger {
    entries: BTreeMap<AssignmentKey, i32>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &AssignmentKey) -> i32 {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Overwrites the entry and returns the previous value.
    pub fn set(&mut self, key: AssignmentKey, hours: i32) -> i32 {
        let previous = if hours > 0 {
            self.entries.insert(key, hours)
        } else {
            self.entries.remove(&key)
        };
        previous.unwrap_or(0)
    }

    /// Adds to the entry and returns the new value.
    pub fn add(&mut self, key: AssignmentKey, hours: i32) -> i32 {
        let updated = self.get(&key).saturating_add(hours);
        self.set(key, updated);
        updated.max(0)
    }

    pub fn remove(&mut self, key: &AssignmentKey) -> i32 {
        self.entries.remove(key).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AssignmentKey, i32)> {
        self.entries.iter().map(|(key, hours)| (key, *hours))
    }

    pub fn entries_for_employee(&self, employee_id: i32) -> Vec<(AssignmentKey, i32)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.employee_id == employee_id)
            .map(|(key, hours)| (*key, *hours))
            .collect()
    }

    pub fn entries_for_project(&self, project_id: i32) -> Vec<(AssignmentKey, i32)> {
        self.entries
            .iter()
            .filter(|(key, _)| key.project_id == project_id)
            .map(|(key, hours)| (*key, *hours))
            .collect()
    }

    pub fn employee_total(&self, employee_id: i32) -> i32 {
        self.entries
            .iter()
            .filter(|(key, _)| key.employee_id == employee_id)
            .map(|(_, hours)| *hours)
            .fold(0, i32::saturating_add)
    }

    pub fn employee_project_total(&self, employee_id: i32, project_id: i32) -> i32 {
        self.entries
            .iter()
            .filter(|(key, _)| key.employee_id == employee_id && key.project_id == project_id)
            .map(|(_, hours)| *hours)
            .fold(0, i32::saturating_add)
    }

    pub fn task_total(&self, project_id: i32, task_id: i32) -> i32 {
        self.entries
            .iter()
            .filter(|(key, _)| key.project_id == project_id && key.task_id == task_id)
            .map(|(_, hours)| *hours)
            .fold(0, i32::saturating_add)
    }

    /// Totals per employee, in ascending id order. Sums saturate at `i32::MAX`.
    pub fn totals_by_employee(&self) -> BTreeMap<i32, i32> {
        let mut totals = BTreeMap::new();
        for (key, hours) in &self.entries {
            let total = totals.entry(key.employee_id).or_insert(0i32);
            *total = total.saturating_add(*hours);
        }
        totals
    }

    pub fn remove_employee(&mut self, employee_id: i32) -> Vec<(AssignmentKey, i32)> {
        let removed = self.entries_for_employee(employee_id);
        self.entries.retain(|key, _| key.employee_id != employee_id);
        removed
    }

    pub fn remove_project(&mut self, project_id: i32) -> Vec<(AssignmentKey, i32)> {
        let removed = self.entries_for_project(project_id);
        self.entries.retain(|key, _| key.project_id != project_id);
        removed
    }

    pub fn records(&self) -> Vec<AssignmentRecord> {
        self.entries
            .iter()
            .map(|(key, hours)| AssignmentRecord {
                employee_id: key.employee_id,
                project_id: key.project_id,
                task_id: key.task_id,
                hours: *hours,
            })
            .collect()
    }
}

impl Serialize for AssignmentLedger {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AssignmentLedger {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<AssignmentRecord>::deserialize(deserializer)?;
        let mut ledger = AssignmentLedger::new();
        for record in records {
            ledger.set(record.key(), record.hours);
        }
        Ok(ledger)
    }
}
