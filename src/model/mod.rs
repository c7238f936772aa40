pub mod project;

pub use project::{
    CandidateIndex, CandidateTally, ProjectCore, ProjectId, ProjectMetadata, ProjectState, VoterId,
};
