use crate::employee::Position;
use crate::project::ProjectPhase;
use crate::task::TaskType;

/// Position staffed during a project phase. `None` means any position is accepted.
pub fn required_position(phase: ProjectPhase) -> Option<Position> {
    match phase {
        ProjectPhase::Analysis | ProjectPhase::Planning | ProjectPhase::Deployment => {
            Some(Position::Manager)
        }
        ProjectPhase::Design => Some(Position::Designer),
        ProjectPhase::Development => Some(Position::Developer),
        ProjectPhase::Testing => Some(Position::Qa),
        ProjectPhase::Maintenance => None,
        // Nobody is assignable to a completed project; the engine rejects it earlier.
        ProjectPhase::Completed => None,
    }
}

pub fn role_matches_phase(position: Position, phase: ProjectPhase) -> bool {
    match required_position(phase) {
        Some(required) => required == position,
        None => true,
    }
}

pub fn task_type_matches_position(task_type: TaskType, position: Position) -> bool {
    task_type.required_position() == position
}
