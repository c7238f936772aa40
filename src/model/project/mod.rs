mod project_core;
mod state;

pub use project_core::{CandidateTally, ProjectCore, ProjectMetadata};
pub use state::ProjectState;

/// Our project IDs are integers, assigned sequentially from zero.
pub type ProjectId = u32;
/// Our voter identities are opaque strings, supplied verbatim by an
/// external identity provider.
pub type VoterId = String;
/// Our candidate IDs are positions in the project's item list.
pub type CandidateIndex = usize;
