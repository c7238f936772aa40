use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::project::{
    CandidateIndex, CandidateTally, ProjectCore, ProjectId, ProjectMetadata, ProjectState,
};

/// Shared handle to a single project.
type ProjectRef = Arc<RwLock<ProjectCore>>;

/// The registry of all voting projects: the crate's entire operation
/// surface.
///
/// Each project is an independently lockable unit, so operations on
/// different projects never block one another. Within one project, every
/// mutating operation runs under the project's write lock, making the
/// whole check-then-act sequence of [`vote`](Self::vote) atomic. The
/// outer lock only serialises project creation and ID lookup.
///
/// The registry performs no authentication: voter identities are trusted
/// verbatim, as handed over by the caller's identity provider.
#[derive(Debug, Default)]
pub struct BallotRegistry {
    /// All projects, in creation order. Projects are never removed, so a
    /// project's position in this list is its ID.
    projects: RwLock<Vec<ProjectRef>>,
}

impl BallotRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new project in the `Created` state with empty item and
    /// voter lists, and return its ID.
    ///
    /// IDs are assigned sequentially from zero and never reused. The name
    /// is taken verbatim; rejecting unusable names (e.g. empty ones) is
    /// the caller's policy decision.
    pub fn create_project(&self, name: impl Into<String>) -> ProjectId {
        let name = name.into();
        let mut projects = self.write_projects();
        let id = projects.len() as ProjectId;
        projects.push(Arc::new(RwLock::new(ProjectCore::new(id, name.clone()))));
        info!("Created project {id} ({name:?})");
        id
    }

    /// Append vote items to the project, preserving order. An item's
    /// position at the time the list is frozen becomes its candidate
    /// index.
    pub fn add_items(
        &self,
        id: ProjectId,
        items: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let project = self.project(id)?;
        let mut project = write_project(&project);
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let count = items.len();
        project.add_items(items)?;
        info!("Added {count} vote items to project {id}");
        Ok(())
    }

    /// Merge voter identities into the project's eligible set. Re-adding
    /// an existing voter has no effect.
    pub fn add_voters(
        &self,
        id: ProjectId,
        voters: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<()> {
        let project = self.project(id)?;
        let mut project = write_project(&project);
        let voters: Vec<String> = voters.into_iter().map(Into::into).collect();
        let count = voters.len();
        project.add_voters(voters)?;
        info!("Added {count} voters to project {id}");
        Ok(())
    }

    /// Transition the project from `Created` to `Open`, freezing its item
    /// and voter lists. Irreversible.
    pub fn start_voting(&self, id: ProjectId) -> Result<()> {
        let project = self.project(id)?;
        let mut project = write_project(&project);
        project.open()?;
        info!(
            "Opened voting on project {id}: {} candidates, {} eligible voters",
            project.items.len(),
            project.voters.len()
        );
        Ok(())
    }

    /// Transition the project from `Open` to `Closed`, freezing its
    /// counters permanently. Irreversible.
    pub fn close_voting(&self, id: ProjectId) -> Result<()> {
        let project = self.project(id)?;
        let mut project = write_project(&project);
        project.close()?;
        info!(
            "Closed voting on project {id} after {} ballots",
            project.ballots_cast()
        );
        Ok(())
    }

    /// Cast a ballot for the given candidate on behalf of the given voter.
    ///
    /// The ballot is accepted only if the project is `Open`, the voter is
    /// eligible, the voter has not already voted, and the candidate index
    /// is within the frozen item list. The checks and the counter
    /// increment run under the project's write lock, so two concurrent
    /// calls from the same identity can never both succeed.
    pub fn vote(&self, id: ProjectId, voter: &str, candidate: CandidateIndex) -> Result<()> {
        let project = self.project(id)?;
        let mut project = write_project(&project);
        match project.cast_ballot(voter, candidate) {
            Ok(()) => {
                debug!("Recorded ballot for candidate {candidate} in project {id}");
                Ok(())
            }
            Err(err) => {
                warn!("Rejected ballot in project {id}: {err}");
                Err(err)
            }
        }
    }

    /// The current tally, in frozen item order. Callable in any lifecycle
    /// state; the counters are all zero until voting opens.
    pub fn get_vote_count(&self, id: ProjectId) -> Result<Vec<CandidateTally>> {
        let project = self.project(id)?;
        let project = read_project(&project);
        Ok(project.vote_count())
    }

    /// The project's current lifecycle state.
    pub fn get_project_state(&self, id: ProjectId) -> Result<ProjectState> {
        let project = self.project(id)?;
        let project = read_project(&project);
        Ok(project.metadata.state)
    }

    /// The project's top-level metadata: name, state, and transition
    /// timestamps.
    pub fn get_metadata(&self, id: ProjectId) -> Result<ProjectMetadata> {
        let project = self.project(id)?;
        let project = read_project(&project);
        Ok(project.metadata.clone())
    }

    /// Number of projects ever created. Valid IDs are exactly
    /// `0..project_count()`.
    pub fn project_count(&self) -> u32 {
        self.read_projects().len() as u32
    }

    /// Whether the given identity has successfully cast a ballot in the
    /// project. An identity the project has never seen yields `false`.
    pub fn has_voted(&self, id: ProjectId, voter: &str) -> Result<bool> {
        let project = self.project(id)?;
        let project = read_project(&project);
        Ok(project.has_voted(voter))
    }

    /// Whether the given identity is in the project's eligible set.
    pub fn is_eligible(&self, id: ProjectId, voter: &str) -> Result<bool> {
        let project = self.project(id)?;
        let project = read_project(&project);
        Ok(project.is_eligible(voter))
    }

    /// Take a deep, serialisable copy of every project, for caller-owned
    /// persistence.
    ///
    /// Each project is copied under its own read lock, so every project in
    /// the snapshot is individually consistent (never a partial
    /// increment). No new projects can appear mid-copy.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let projects = self.read_projects();
        let projects = projects
            .iter()
            .map(|project| read_project(project).clone())
            .collect();
        RegistrySnapshot { projects }
    }

    /// Rebuild a registry from a previously taken snapshot, preserving
    /// project IDs. The snapshot is the caller's own captured state and is
    /// trusted as such.
    pub fn restore(snapshot: RegistrySnapshot) -> Self {
        let projects = snapshot
            .projects
            .into_iter()
            .map(|project| Arc::new(RwLock::new(project)))
            .collect();
        Self {
            projects: RwLock::new(projects),
        }
    }

    /// Look up a project handle by ID.
    fn project(&self, id: ProjectId) -> Result<ProjectRef> {
        self.read_projects()
            .get(id as usize)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    fn read_projects(&self) -> RwLockReadGuard<'_, Vec<ProjectRef>> {
        self.projects.read().expect("registry lock poisoned")
    }

    fn write_projects(&self) -> RwLockWriteGuard<'_, Vec<ProjectRef>> {
        self.projects.write().expect("registry lock poisoned")
    }
}

fn read_project(project: &ProjectRef) -> RwLockReadGuard<'_, ProjectCore> {
    project.read().expect("project lock poisoned")
}

fn write_project(project: &ProjectRef) -> RwLockWriteGuard<'_, ProjectCore> {
    project.write().expect("project lock poisoned")
}

/// A serialisable copy of the full registry state.
///
/// The registry itself defines only in-memory semantics; if durability is
/// required, the caller snapshots, stores, and restores this value in a
/// format of their choosing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Projects in ID order.
    pub projects: Vec<ProjectCore>,
}
