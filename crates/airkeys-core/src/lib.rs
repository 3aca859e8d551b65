// Re-export wire types so they are reachable via airkeys_core::*
pub use airkeys_protocol::geometry;
pub use airkeys_protocol::wire;

pub mod capture;
pub mod clock;
pub mod consts;
pub mod detection;
pub mod error;
pub mod layout;
pub mod mapper;
pub mod press;
pub mod render;
