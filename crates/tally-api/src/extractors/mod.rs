//! Request extractors

mod admin;
mod authorized;
mod validated;

pub use admin::AdminToken;
pub use authorized::AuthorizedServer;
pub use validated::ValidatedJson;
