pub mod repo;

pub use repo::{NewUser, PgUserStore, Role, User, UserStore};
