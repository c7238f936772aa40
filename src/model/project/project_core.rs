use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::state::ProjectState;
use super::{CandidateIndex, ProjectId, VoterId};

/// Core project data: one independent ballot with its items, voters,
/// and tally.
///
/// All lifecycle and ballot-acceptance rules live here; the registry
/// wraps this type in a lock and adds nothing but serialisation of
/// concurrent access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCore {
    /// Project unique ID, assigned by the registry.
    pub id: ProjectId,
    /// Top-level metadata.
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
    /// Vote items (candidates), in insertion order. An item's position in
    /// this list is its identity.
    pub items: Vec<String>,
    /// Identities eligible to cast a ballot.
    pub voters: HashSet<VoterId>,
    /// Identities that have successfully cast a ballot.
    pub voted: HashSet<VoterId>,
    /// Per-item vote counters, parallel to `items`.
    pub tally: Vec<u64>,
}

impl ProjectCore {
    /// Create a new project in the `Created` state with empty item and
    /// voter lists.
    pub fn new(id: ProjectId, name: String) -> Self {
        Self {
            id,
            metadata: ProjectMetadata {
                name,
                state: ProjectState::Created,
                created_at: Utc::now(),
                opened_at: None,
                closed_at: None,
            },
            items: Vec::new(),
            voters: HashSet::new(),
            voted: HashSet::new(),
            tally: Vec::new(),
        }
    }

    /// Append vote items, preserving order. Only legal while `Created`.
    pub fn add_items(&mut self, items: impl IntoIterator<Item = String>) -> Result<()> {
        self.require_state(ProjectState::Created)?;
        for item in items {
            self.items.push(item);
            self.tally.push(0);
        }
        Ok(())
    }

    /// Merge voter identities into the eligible set; re-adding an existing
    /// voter has no effect. Only legal while `Created`.
    pub fn add_voters(&mut self, voters: impl IntoIterator<Item = VoterId>) -> Result<()> {
        self.require_state(ProjectState::Created)?;
        self.voters.extend(voters);
        Ok(())
    }

    /// Open voting, freezing the item and voter lists as of this instant.
    ///
    /// A project with no items cannot be opened.
    pub fn open(&mut self) -> Result<()> {
        self.require_state(ProjectState::Created)?;
        if self.items.is_empty() {
            return Err(Error::EmptyBallot(self.id));
        }
        self.metadata.state = ProjectState::Open;
        self.metadata.opened_at = Some(Utc::now());
        Ok(())
    }

    /// Close voting, freezing the counters permanently.
    pub fn close(&mut self) -> Result<()> {
        self.require_state(ProjectState::Open)?;
        self.metadata.state = ProjectState::Closed;
        self.metadata.closed_at = Some(Utc::now());
        Ok(())
    }

    /// Cast a ballot for the given candidate on behalf of the given voter.
    ///
    /// All checks run before any mutation, so a failed call leaves the
    /// project untouched.
    pub fn cast_ballot(&mut self, voter: &str, candidate: CandidateIndex) -> Result<()> {
        self.require_state(ProjectState::Open)?;
        if !self.voters.contains(voter) {
            return Err(Error::Unauthorized {
                id: self.id,
                voter: voter.to_string(),
            });
        }
        if self.voted.contains(voter) {
            return Err(Error::DuplicateVote {
                id: self.id,
                voter: voter.to_string(),
            });
        }
        if candidate >= self.items.len() {
            return Err(Error::InvalidCandidate {
                id: self.id,
                candidate,
                candidates: self.items.len(),
            });
        }

        // Mark the voter and count the ballot.
        self.voted.insert(voter.to_string());
        self.tally[candidate] += 1;
        Ok(())
    }

    /// The current tally, in item order.
    pub fn vote_count(&self) -> Vec<CandidateTally> {
        self.items
            .iter()
            .zip(&self.tally)
            .map(|(item, &votes)| CandidateTally {
                candidate: item.clone(),
                votes,
            })
            .collect()
    }

    /// Whether the given identity has successfully cast a ballot.
    pub fn has_voted(&self, voter: &str) -> bool {
        self.voted.contains(voter)
    }

    /// Whether the given identity is in the eligible set.
    pub fn is_eligible(&self, voter: &str) -> bool {
        self.voters.contains(voter)
    }

    /// Total number of ballots cast so far.
    pub fn ballots_cast(&self) -> u64 {
        self.voted.len() as u64
    }

    /// Check the lifecycle state, returning `InvalidState` on mismatch.
    fn require_state(&self, expected: ProjectState) -> Result<()> {
        if self.metadata.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidState {
                id: self.id,
                expected,
                actual: self.metadata.state,
            })
        }
    }
}

/// A view on just the project's top-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Project name.
    pub name: String,
    /// Project lifecycle state.
    pub state: ProjectState,
    /// When the project was created.
    pub created_at: DateTime<Utc>,
    /// When voting started, if it has.
    pub opened_at: Option<DateTime<Utc>>,
    /// When voting closed, if it has.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Caller-friendly representation of a single candidate's totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTally {
    /// Candidate label, as supplied before the item list was frozen.
    pub candidate: String,
    /// Vote tally.
    pub votes: u64,
}
