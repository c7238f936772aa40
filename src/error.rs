use thiserror::Error;

use crate::model::project::{CandidateIndex, ProjectId, ProjectState, VoterId};

pub type Result<T> = std::result::Result<T, Error>;

/// Ways a registry operation can fail.
///
/// Every failure is local to the operation that raised it: nothing is
/// mutated before the error is returned, and the registry stays usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The project ID does not exist.
    #[error("No project with ID {0}")]
    NotFound(ProjectId),
    /// The operation is illegal in the project's current lifecycle state.
    #[error("Project {id} is {actual}, but this operation requires {expected}")]
    InvalidState {
        id: ProjectId,
        expected: ProjectState,
        actual: ProjectState,
    },
    /// Voting cannot start on a project with no vote items.
    #[error("Project {0} has no vote items, so voting cannot start")]
    EmptyBallot(ProjectId),
    /// The voter is not in the project's eligible set.
    #[error("Voter {voter:?} is not eligible to vote in project {id}")]
    Unauthorized { id: ProjectId, voter: VoterId },
    /// The voter has already cast their one ballot in this project.
    #[error("Voter {voter:?} has already voted in project {id}")]
    DuplicateVote { id: ProjectId, voter: VoterId },
    /// The candidate index is outside the frozen item list.
    #[error("Project {id} has no candidate {candidate}; valid indices are 0..{candidates}")]
    InvalidCandidate {
        id: ProjectId,
        candidate: CandidateIndex,
        candidates: usize,
    },
}
