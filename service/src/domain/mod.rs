//! Domain definitions.

pub mod attendance;
pub mod holiday;
pub mod leave;
pub mod profile;
pub mod roster;
pub mod session;
pub mod user;

pub use self::{
    attendance::Record, holiday::Holiday, profile::Profile, session::Session,
    user::User,
};
