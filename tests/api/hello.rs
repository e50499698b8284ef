use crate::helpers::TestApp;
use team_roster::domain::RosterStore as _;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn hello_returns_200_with_literal_body(app: &mut TestApp) {
    let response = app.get_hello().await;

    assert_eq!(
        response.status().as_u16(),
        200,
        "Unexpected status: {:?}",
        response
    );
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "hello"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn hello_has_no_observable_side_effects(app: &mut TestApp) {
    app.get_hello().await;
    app.get_hello().await;

    let summary = app
        .roster_store
        .read()
        .await
        .age_summary()
        .await
        .expect("Failed to read summary");
    assert_eq!(summary.member_count, 0);
}
