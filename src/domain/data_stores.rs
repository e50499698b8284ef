use super::{Member, MemberName, Team, TeamName};
use color_eyre::eyre::Report;
use thiserror::Error;

/// Equality filters combined with implicit AND semantics. An unset field
/// places no constraint on the result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberFilter {
    pub username: Option<MemberName>,
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberOrder {
    AgeAsc,
    AgeDesc,
    UsernameAscNullsLast,
}

/// Offset + limit window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

/// One projected row of grouping-free aggregates. The optional fields are
/// `None` when the member set is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeSummary {
    pub member_count: i64,
    pub age_sum: i64,
    pub age_avg: Option<f64>,
    pub age_max: Option<i32>,
    pub age_min: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamAverage {
    pub team_name: TeamName,
    pub average_age: f64,
}

#[async_trait::async_trait]
pub trait RosterStore {
    async fn add_team(&mut self, team: &Team) -> Result<(), RosterStoreError>;
    async fn add_member(
        &mut self,
        member: &Member,
    ) -> Result<(), RosterStoreError>;

    /// Unique fetch: zero matches is `MemberNotFound`, more than one is
    /// `MemberNotUnique`.
    async fn get_member(
        &self,
        filter: &MemberFilter,
    ) -> Result<Member, RosterStoreError>;

    /// First member in insertion order, or `None` when the store is empty.
    async fn first_member(&self) -> Result<Option<Member>, RosterStoreError>;

    /// Filtered, ordered, optionally windowed listing. Ties between order
    /// keys fall back to insertion order.
    async fn list_members(
        &self,
        filter: &MemberFilter,
        order: &[MemberOrder],
        page: Option<Page>,
    ) -> Result<Vec<Member>, RosterStoreError>;

    async fn age_summary(&self) -> Result<AgeSummary, RosterStoreError>;

    /// Average age per team name, one row per distinct name, rows in name
    /// order. Members without a team are excluded (inner-join semantics).
    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAverage>, RosterStoreError>;

    /// Members whose associated team carries the given name, joined on the
    /// declared association, in insertion order.
    async fn members_in_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<Member>, RosterStoreError>;

    /// Theta join: the member-team cross product filtered to rows where the
    /// member's username equals the team's name. No association required.
    async fn members_named_after_teams(
        &self,
    ) -> Result<Vec<Member>, RosterStoreError>;
}

#[derive(Debug, Error)]
pub enum RosterStoreError {
    #[error("Member ID exists")]
    MemberIdExists,
    #[error("Member not found")]
    MemberNotFound,
    #[error("Member is not unique")]
    MemberNotUnique,
    #[error("Team ID exists")]
    TeamIdExists,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for RosterStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MemberIdExists, Self::MemberIdExists)
                | (Self::MemberNotFound, Self::MemberNotFound)
                | (Self::MemberNotUnique, Self::MemberNotUnique)
                | (Self::TeamIdExists, Self::TeamIdExists)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
