use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{
    AgeSummary, Member, MemberFilter, MemberOrder, Page, RosterStore,
    RosterStoreError, Team, TeamAverage, TeamName,
};

/// Insertion-ordered in-memory store. Drop-in replacement for the Postgres
/// store when running without external services.
#[derive(Default)]
pub struct VecRosterStore {
    teams: Vec<Team>,
    members: Vec<Member>,
}

fn matches_filter(member: &Member, filter: &MemberFilter) -> bool {
    if let Some(username) = &filter.username {
        if member.username.as_ref() != Some(username) {
            return false;
        }
    }
    if let Some(age) = filter.age {
        if member.age != age {
            return false;
        }
    }
    true
}

fn compare_usernames_nulls_last(a: &Member, b: &Member) -> Ordering {
    match (&a.username, &b.username) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.as_ref().cmp(b.as_ref()),
    }
}

fn compare_members(a: &Member, b: &Member, order: &[MemberOrder]) -> Ordering {
    for key in order {
        let ordering = match key {
            MemberOrder::AgeAsc => a.age.cmp(&b.age),
            MemberOrder::AgeDesc => b.age.cmp(&a.age),
            MemberOrder::UsernameAscNullsLast => {
                compare_usernames_nulls_last(a, b)
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[async_trait::async_trait]
impl RosterStore for VecRosterStore {
    async fn add_team(&mut self, team: &Team) -> Result<(), RosterStoreError> {
        if self.teams.iter().any(|existing| existing.id == team.id) {
            return Err(RosterStoreError::TeamIdExists);
        }
        self.teams.push(team.clone());
        Ok(())
    }

    async fn add_member(
        &mut self,
        member: &Member,
    ) -> Result<(), RosterStoreError> {
        if self.members.iter().any(|existing| existing.id == member.id) {
            return Err(RosterStoreError::MemberIdExists);
        }
        self.members.push(member.clone());
        Ok(())
    }

    async fn get_member(
        &self,
        filter: &MemberFilter,
    ) -> Result<Member, RosterStoreError> {
        let mut matches = self
            .members
            .iter()
            .filter(|member| matches_filter(member, filter));

        match (matches.next(), matches.next()) {
            (None, _) => Err(RosterStoreError::MemberNotFound),
            (Some(member), None) => Ok(member.clone()),
            (Some(_), Some(_)) => Err(RosterStoreError::MemberNotUnique),
        }
    }

    async fn first_member(&self) -> Result<Option<Member>, RosterStoreError> {
        Ok(self.members.first().cloned())
    }

    async fn list_members(
        &self,
        filter: &MemberFilter,
        order: &[MemberOrder],
        page: Option<Page>,
    ) -> Result<Vec<Member>, RosterStoreError> {
        let mut result: Vec<Member> = self
            .members
            .iter()
            .filter(|member| matches_filter(member, filter))
            .cloned()
            .collect();

        // Stable sort keeps insertion order for ties between keys.
        result.sort_by(|a, b| compare_members(a, b, order));

        if let Some(page) = page {
            result = result
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect();
        }

        Ok(result)
    }

    async fn age_summary(&self) -> Result<AgeSummary, RosterStoreError> {
        let member_count = self.members.len() as i64;
        let age_sum: i64 = self
            .members
            .iter()
            .map(|member| i64::from(member.age))
            .sum();
        let age_avg = if self.members.is_empty() {
            None
        } else {
            Some(age_sum as f64 / member_count as f64)
        };

        Ok(AgeSummary {
            member_count,
            age_sum,
            age_avg,
            age_max: self.members.iter().map(|member| member.age).max(),
            age_min: self.members.iter().map(|member| member.age).min(),
        })
    }

    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAverage>, RosterStoreError> {
        let mut groups: BTreeMap<TeamName, (i64, i64)> = BTreeMap::new();

        for member in &self.members {
            let team = member.team_id.as_ref().and_then(|team_id| {
                self.teams.iter().find(|team| &team.id == team_id)
            });
            if let Some(team) = team {
                let entry = groups.entry(team.name.clone()).or_insert((0, 0));
                entry.0 += i64::from(member.age);
                entry.1 += 1;
            }
        }

        Ok(groups
            .into_iter()
            .map(|(team_name, (sum, count))| TeamAverage {
                team_name,
                average_age: sum as f64 / count as f64,
            })
            .collect())
    }

    async fn members_in_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<Member>, RosterStoreError> {
        Ok(self
            .members
            .iter()
            .filter(|member| {
                member.team_id.as_ref().map_or(false, |team_id| {
                    self.teams.iter().any(|team| {
                        &team.id == team_id && &team.name == team_name
                    })
                })
            })
            .cloned()
            .collect())
    }

    async fn members_named_after_teams(
        &self,
    ) -> Result<Vec<Member>, RosterStoreError> {
        Ok(self
            .members
            .iter()
            .filter(|member| {
                member.username.as_ref().map_or(false, |username| {
                    self.teams
                        .iter()
                        .any(|team| team.name.as_ref() == username.as_ref())
                })
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberName;

    fn member_name(name: &str) -> MemberName {
        MemberName::parse(name.to_string()).expect("Failed to parse name")
    }

    fn team_name(name: &str) -> TeamName {
        TeamName::parse(name.to_string()).expect("Failed to parse name")
    }

    fn username_filter(name: &str) -> MemberFilter {
        MemberFilter {
            username: Some(member_name(name)),
            age: None,
        }
    }

    // Team A, Team B; member1(10, A), member2(20, A), member3(30, B),
    // member4(40, B).
    async fn seeded_store() -> VecRosterStore {
        let mut store = VecRosterStore::default();

        let team_a = Team::new(team_name("teamA"));
        let team_b = Team::new(team_name("teamB"));
        store.add_team(&team_a).await.expect("Failed to add teamA");
        store.add_team(&team_b).await.expect("Failed to add teamB");

        let members = [
            Member::with_team(Some(member_name("member1")), 10, Some(&team_a)),
            Member::with_team(Some(member_name("member2")), 20, Some(&team_a)),
            Member::with_team(Some(member_name("member3")), 30, Some(&team_b)),
            Member::with_team(Some(member_name("member4")), 40, Some(&team_b)),
        ];
        for member in members.iter() {
            store
                .add_member(member)
                .await
                .expect("Failed to add member");
        }

        store
    }

    fn usernames(members: &[Member]) -> Vec<Option<String>> {
        members
            .iter()
            .map(|member| {
                member.username.as_ref().map(|name| name.as_ref().clone())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_get_member_by_username() {
        let store = seeded_store().await;

        let member = store
            .get_member(&username_filter("member1"))
            .await
            .expect("Failed to fetch member1");

        assert_eq!(member.username, Some(member_name("member1")));
        assert_eq!(member.age, 10);
    }

    #[tokio::test]
    async fn test_get_member_combines_filters_with_and() {
        let store = seeded_store().await;

        let filter = MemberFilter {
            username: Some(member_name("member1")),
            age: Some(10),
        };
        let member = store
            .get_member(&filter)
            .await
            .expect("Failed to fetch member1");
        assert_eq!(member.age, 10);

        // Same username, wrong age: both conditions must hold.
        let filter = MemberFilter {
            username: Some(member_name("member1")),
            age: Some(20),
        };
        assert_eq!(
            store.get_member(&filter).await,
            Err(RosterStoreError::MemberNotFound)
        );
    }

    #[tokio::test]
    async fn test_get_member_requires_a_unique_match() {
        let mut store = seeded_store().await;

        assert_eq!(
            store.get_member(&username_filter("member9")).await,
            Err(RosterStoreError::MemberNotFound)
        );

        store
            .add_member(&Member::new(Some(member_name("member1")), 99))
            .await
            .expect("Failed to add duplicate username");
        assert_eq!(
            store.get_member(&username_filter("member1")).await,
            Err(RosterStoreError::MemberNotUnique)
        );
    }

    #[tokio::test]
    async fn test_first_member_follows_insertion_order() {
        let store = seeded_store().await;
        let first = store
            .first_member()
            .await
            .expect("Failed to fetch first member");
        assert_eq!(
            first.and_then(|member| member.username),
            Some(member_name("member1"))
        );

        let empty = VecRosterStore::default();
        assert_eq!(empty.first_member().await, Ok(None));
    }

    #[tokio::test]
    async fn test_sort_age_desc_then_username_asc_nulls_last() {
        let mut store = seeded_store().await;
        for member in [
            Member::new(Some(member_name("member5")), 100),
            Member::new(Some(member_name("member6")), 100),
            Member::new(None, 100),
        ] {
            store
                .add_member(&member)
                .await
                .expect("Failed to add member");
        }

        let filter = MemberFilter {
            username: None,
            age: Some(100),
        };
        let members = store
            .list_members(
                &filter,
                &[MemberOrder::AgeDesc, MemberOrder::UsernameAscNullsLast],
                None,
            )
            .await
            .expect("Failed to list members");

        assert_eq!(
            usernames(&members),
            vec![
                Some("member5".to_string()),
                Some("member6".to_string()),
                None
            ]
        );
    }

    #[tokio::test]
    async fn test_list_members_age_asc() {
        let store = seeded_store().await;

        let members = store
            .list_members(
                &MemberFilter::default(),
                &[MemberOrder::AgeAsc],
                None,
            )
            .await
            .expect("Failed to list members");

        let ages: Vec<i32> =
            members.iter().map(|member| member.age).collect();
        assert_eq!(ages, vec![10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn test_paging_windows_an_ordered_result_set() {
        let store = seeded_store().await;

        let members = store
            .list_members(
                &MemberFilter::default(),
                &[MemberOrder::AgeDesc],
                Some(Page {
                    offset: 1,
                    limit: 2,
                }),
            )
            .await
            .expect("Failed to list members");

        let ages: Vec<i32> =
            members.iter().map(|member| member.age).collect();
        assert_eq!(ages, vec![30, 20]);
    }

    #[tokio::test]
    async fn test_age_summary() {
        let store = seeded_store().await;

        let summary = store
            .age_summary()
            .await
            .expect("Failed to compute summary");

        assert_eq!(summary.member_count, 4);
        assert_eq!(summary.age_sum, 100);
        assert_eq!(summary.age_avg, Some(25.0));
        assert_eq!(summary.age_max, Some(40));
        assert_eq!(summary.age_min, Some(10));
    }

    #[tokio::test]
    async fn test_age_summary_on_empty_store() {
        let store = VecRosterStore::default();

        let summary = store
            .age_summary()
            .await
            .expect("Failed to compute summary");

        assert_eq!(summary.member_count, 0);
        assert_eq!(summary.age_sum, 0);
        assert_eq!(summary.age_avg, None);
        assert_eq!(summary.age_max, None);
        assert_eq!(summary.age_min, None);
    }

    #[tokio::test]
    async fn test_average_age_grouped_by_team_name() {
        let store = seeded_store().await;

        let averages = store
            .average_age_by_team()
            .await
            .expect("Failed to compute team averages");

        assert_eq!(
            averages,
            vec![
                TeamAverage {
                    team_name: team_name("teamA"),
                    average_age: 15.0,
                },
                TeamAverage {
                    team_name: team_name("teamB"),
                    average_age: 35.0,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_members_in_team_joins_on_the_association() {
        let store = seeded_store().await;

        let members = store
            .members_in_team(&team_name("teamA"))
            .await
            .expect("Failed to fetch teamA members");

        assert_eq!(
            usernames(&members),
            vec![
                Some("member1".to_string()),
                Some("member2".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_theta_join_matches_usernames_to_team_names() {
        let mut store = seeded_store().await;
        for name in ["teamA", "teamB", "teamC"] {
            store
                .add_member(&Member::new(Some(member_name(name)), 0))
                .await
                .expect("Failed to add member");
        }

        let members = store
            .members_named_after_teams()
            .await
            .expect("Failed to run theta join");

        // No teamC row: there is no such team.
        assert_eq!(
            usernames(&members),
            vec![Some("teamA".to_string()), Some("teamB".to_string())]
        );
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_rejected() {
        let mut store = VecRosterStore::default();

        let team = Team::new(team_name("teamA"));
        assert_eq!(store.add_team(&team).await, Ok(()));
        assert_eq!(
            store.add_team(&team).await,
            Err(RosterStoreError::TeamIdExists)
        );

        let member = Member::new(Some(member_name("member1")), 10);
        assert_eq!(store.add_member(&member).await, Ok(()));
        assert_eq!(
            store.add_member(&member).await,
            Err(RosterStoreError::MemberIdExists)
        );
    }
}
