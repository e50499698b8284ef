mod postgres_roster_store;
mod vec_roster_store;

pub use postgres_roster_store::*;
pub use vec_roster_store::*;
