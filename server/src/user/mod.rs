mod user;

pub use user::UserKey;
pub(crate) use user::User;
