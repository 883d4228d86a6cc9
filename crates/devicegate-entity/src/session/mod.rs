//! Session domain entities.

pub mod model;
pub mod notice;
pub mod view;

pub use model::Session;
pub use notice::{EvictionNotice, EvictionReason};
pub use view::DeviceView;
