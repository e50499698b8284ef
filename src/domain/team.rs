use serde::{Deserialize, Serialize};

use super::{MemberId, TeamId, TeamName};

/// The inverse side of the member-team association. `member_ids` is
/// derived from the owning references held by members and is maintained
/// by `Member::assign_team`; it is never the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: TeamName,
    pub member_ids: Vec<MemberId>,
}

impl Team {
    pub fn new(name: TeamName) -> Self {
        Self {
            id: TeamId::default(),
            name,
            member_ids: Vec::new(),
        }
    }
}
