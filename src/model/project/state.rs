use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// States in the project lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectState {
    /// Under construction: vote items and voters may still be added.
    Created,
    /// Accepting ballots. The item and voter lists are frozen.
    Open,
    /// Voting has ended. The counters are frozen permanently.
    Closed,
}

impl Display for ProjectState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Created => "Created",
            Self::Open => "Open",
            Self::Closed => "Closed",
        })
    }
}
