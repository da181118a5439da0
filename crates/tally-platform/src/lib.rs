//! # tally-platform
//!
//! Outbound HTTP clients for the opaque external collaborators: the chat
//! platform's membership REST API (role grant/revoke, member sweeps, profile
//! fetches) and the GIF-search provider. Both implement the gateway traits
//! defined in `tally-core`.

pub mod error;
pub mod gif;
pub mod membership;

pub use gif::GifClient;
pub use membership::RestMembershipGateway;
