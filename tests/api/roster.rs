use crate::helpers::TestApp;
use team_roster::domain::{
    Member, MemberFilter, MemberName, RosterStore as _, Team, TeamName,
};
use test_context::test_context;

fn member_name(name: &str) -> MemberName {
    MemberName::parse(name.to_string()).expect("Failed to parse name")
}

fn team_name(name: &str) -> TeamName {
    TeamName::parse(name.to_string()).expect("Failed to parse name")
}

// The store handle held by the running app answers the same roster
// queries as a directly-owned store.
#[test_context(TestApp)]
#[tokio::test]
async fn store_behind_app_state_serves_roster_queries(app: &mut TestApp) {
    let team_a = Team::new(team_name("teamA"));
    let team_b = Team::new(team_name("teamB"));

    {
        let mut store = app.roster_store.write().await;
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
    }

    let store = app.roster_store.read().await;

    let filter = MemberFilter {
        username: Some(member_name("member1")),
        age: None,
    };
    let member = store
        .get_member(&filter)
        .await
        .expect("Failed to fetch member1");
    assert_eq!(member.age, 10);

    let averages = store
        .average_age_by_team()
        .await
        .expect("Failed to compute team averages");
    assert_eq!(averages.len(), 2);
    assert_eq!(averages[0].team_name, team_name("teamA"));
    assert_eq!(averages[0].average_age, 15.0);
    assert_eq!(averages[1].team_name, team_name("teamB"));
    assert_eq!(averages[1].average_age, 35.0);
}
