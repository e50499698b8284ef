use color_eyre::eyre::eyre;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::domain::{
    AgeSummary, Member, MemberFilter, MemberId, MemberName, MemberOrder, Page,
    RosterStore, RosterStoreError, Team, TeamAverage, TeamId, TeamName,
};

pub struct PostgresRosterStore {
    pool: PgPool,
}

impl PostgresRosterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_MEMBERS: &str =
    "SELECT member_id, username, age, team_id FROM members";

fn member_from_row(row: &PgRow) -> Result<Member, RosterStoreError> {
    let username = row
        .try_get::<Option<String>, _>("username")
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?
        .map(MemberName::parse)
        .transpose()
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

    Ok(Member {
        id: MemberId::new(
            row.try_get("member_id")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
        ),
        username,
        age: row
            .try_get("age")
            .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
        team_id: row
            .try_get::<Option<Uuid>, _>("team_id")
            .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?
            .map(TeamId::new),
    })
}

fn push_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &MemberFilter) {
    let mut prefix = " WHERE ";
    if let Some(username) = &filter.username {
        query
            .push(prefix)
            .push("username = ")
            .push_bind(username.as_ref().clone());
        prefix = " AND ";
    }
    if let Some(age) = filter.age {
        query.push(prefix).push("age = ").push_bind(age);
    }
}

#[async_trait::async_trait]
impl RosterStore for PostgresRosterStore {
    #[tracing::instrument(name = "Adding team to PostgreSQL", skip_all)]
    async fn add_team(&mut self, team: &Team) -> Result<(), RosterStoreError> {
        sqlx::query(
            r#"
            INSERT INTO teams (team_id, team_name) VALUES ($1, $2)
            "#,
        )
        .bind(team.id.as_ref())
        .bind(team.name.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RosterStoreError::TeamIdExists
            }
            e => RosterStoreError::UnexpectedError(eyre!(e)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Adding member to PostgreSQL", skip_all)]
    async fn add_member(
        &mut self,
        member: &Member,
    ) -> Result<(), RosterStoreError> {
        sqlx::query(
            r#"
            INSERT INTO members (member_id, username, age, team_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.id.as_ref())
        .bind(member.username.as_ref().map(|name| name.as_ref().clone()))
        .bind(member.age)
        .bind(member.team_id.as_ref().map(|id| *id.as_ref()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RosterStoreError::MemberIdExists
            }
            e => RosterStoreError::UnexpectedError(eyre!(e)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Fetching unique member from PostgreSQL", skip_all)]
    async fn get_member(
        &self,
        filter: &MemberFilter,
    ) -> Result<Member, RosterStoreError> {
        let mut query = QueryBuilder::new(SELECT_MEMBERS);
        push_filters(&mut query, filter);
        // Two rows are enough to detect a non-unique match.
        query.push(" ORDER BY seq LIMIT 2");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        match rows.as_slice() {
            [] => Err(RosterStoreError::MemberNotFound),
            [row] => member_from_row(row),
            _ => Err(RosterStoreError::MemberNotUnique),
        }
    }

    #[tracing::instrument(name = "Fetching first member from PostgreSQL", skip_all)]
    async fn first_member(&self) -> Result<Option<Member>, RosterStoreError> {
        let row =
            sqlx::query(&format!("{SELECT_MEMBERS} ORDER BY seq LIMIT 1"))
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        row.as_ref().map(member_from_row).transpose()
    }

    #[tracing::instrument(name = "Listing members from PostgreSQL", skip_all)]
    async fn list_members(
        &self,
        filter: &MemberFilter,
        order: &[MemberOrder],
        page: Option<Page>,
    ) -> Result<Vec<Member>, RosterStoreError> {
        let mut query = QueryBuilder::new(SELECT_MEMBERS);
        push_filters(&mut query, filter);

        query.push(" ORDER BY ");
        let mut clauses = query.separated(", ");
        for key in order {
            clauses.push(match key {
                MemberOrder::AgeAsc => "age ASC",
                MemberOrder::AgeDesc => "age DESC",
                MemberOrder::UsernameAscNullsLast => {
                    "username ASC NULLS LAST"
                }
            });
        }
        // Insertion order as the final tiebreak.
        clauses.push("seq");

        if let Some(page) = page {
            query
                .push(" OFFSET ")
                .push_bind(page.offset)
                .push(" LIMIT ")
                .push_bind(page.limit);
        }

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(member_from_row).collect()
    }

    #[tracing::instrument(name = "Aggregating member ages in PostgreSQL", skip_all)]
    async fn age_summary(&self) -> Result<AgeSummary, RosterStoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS member_count,
                   COALESCE(SUM(age), 0)::int8 AS age_sum,
                   AVG(age)::float8 AS age_avg,
                   MAX(age) AS age_max,
                   MIN(age) AS age_min
            FROM members
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        Ok(AgeSummary {
            member_count: row
                .try_get("member_count")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
            age_sum: row
                .try_get("age_sum")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
            age_avg: row
                .try_get("age_avg")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
            age_max: row
                .try_get("age_max")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
            age_min: row
                .try_get("age_min")
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?,
        })
    }

    #[tracing::instrument(name = "Grouping member ages by team in PostgreSQL", skip_all)]
    async fn average_age_by_team(
        &self,
    ) -> Result<Vec<TeamAverage>, RosterStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT teams.team_name, AVG(members.age)::float8 AS average_age
            FROM members
            INNER JOIN teams ON members.team_id = teams.team_id
            GROUP BY teams.team_name
            ORDER BY teams.team_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        rows.into_iter()
            .map(|row| {
                let team_name = TeamName::parse(
                    row.try_get("team_name").map_err(|e| {
                        RosterStoreError::UnexpectedError(eyre!(e))
                    })?,
                )
                .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;
                Ok(TeamAverage {
                    team_name,
                    average_age: row.try_get("average_age").map_err(|e| {
                        RosterStoreError::UnexpectedError(eyre!(e))
                    })?,
                })
            })
            .collect()
    }

    #[tracing::instrument(name = "Joining members to teams in PostgreSQL", skip_all)]
    async fn members_in_team(
        &self,
        team_name: &TeamName,
    ) -> Result<Vec<Member>, RosterStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT members.member_id, members.username, members.age,
                   members.team_id
            FROM members
            INNER JOIN teams ON members.team_id = teams.team_id
            WHERE teams.team_name = $1
            ORDER BY members.seq
            "#,
        )
        .bind(team_name.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(member_from_row).collect()
    }

    #[tracing::instrument(name = "Cross joining members and teams in PostgreSQL", skip_all)]
    async fn members_named_after_teams(
        &self,
    ) -> Result<Vec<Member>, RosterStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT members.member_id, members.username, members.age,
                   members.team_id
            FROM members, teams
            WHERE members.username = teams.team_name
            ORDER BY members.seq
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RosterStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(member_from_row).collect()
    }
}
