use super::ValidationError;
use serde::{Deserialize, Serialize};

// Ord so grouped query results can be keyed and returned in name order.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TeamName(String);

impl TeamName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        match name.chars().count() {
            x if x < 1 => Err(ValidationError::new(
                "Team name cannot be empty".to_string(),
            )),
            x if x > 255 => Err(ValidationError::new(
                "Max name length is 255 characters".to_string(),
            )),
            _ => Ok(Self(name.to_owned())),
        }
    }
}

impl AsRef<String> for TeamName {
    fn as_ref(&self) -> &String {
        &self.0
    }
}

#[test]
fn test_valid_team_names() {
    let valid_names = ["teamA".to_string(), "a".repeat(255)];
    for valid_name in valid_names.iter() {
        let parsed = TeamName::parse(valid_name.to_owned())
            .expect("Failed to parse valid Team name");

        assert_eq!(parsed.as_ref(), valid_name);
    }
}

#[test]
fn test_short_team_names() {
    let short_name = "".to_string();
    let result = TeamName::parse(short_name);
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().as_ref(), "Team name cannot be empty");
}

#[test]
fn test_long_team_names() {
    let long_name = "a".repeat(256);
    let result = TeamName::parse(long_name);
    assert!(result.is_err());
    assert_eq!(
        result.unwrap_err().as_ref(),
        "Max name length is 255 characters"
    );
}
