use serde::{Deserialize, Serialize};

use super::{MemberId, MemberName, Team, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: Option<MemberName>,
    pub age: i32,
    pub team_id: Option<TeamId>,
}

impl Member {
    pub fn new(username: Option<MemberName>, age: i32) -> Self {
        Self {
            id: MemberId::default(),
            username,
            age,
            team_id: None,
        }
    }

    pub fn with_team(
        username: Option<MemberName>,
        age: i32,
        team: Option<&Team>,
    ) -> Self {
        Self {
            id: MemberId::default(),
            username,
            age,
            team_id: team.map(|team| team.id.clone()),
        }
    }

    /// Points this member at `team` and appends it to the team's roster,
    /// keeping the owning reference and the inverse list consistent.
    ///
    /// Known gap: a member already on another team stays on that team's
    /// roster; reassignment does not prune the old entry. Callers must
    /// also serialize access to a `Team` shared between threads.
    pub fn assign_team(&mut self, team: &mut Team) {
        self.team_id = Some(team.id.clone());
        team.member_ids.push(self.id.clone());
    }
}
