mod data_stores;
mod error;
mod member;
mod member_id;
mod member_name;
mod team;
mod team_id;
mod team_name;

pub use data_stores::*;
pub use error::*;
pub use member::*;
pub use member_id::*;
pub use member_name::*;
pub use team::*;
pub use team_id::*;
pub use team_name::*;
