//! Configuration for the course search service.
//!
//! [`Settings`] reads the environment once at startup; [`Dependencies`] turns
//! the settings into connected components.

mod dependencies;
mod settings;

pub use dependencies::{BrokerConnection, Dependencies};
pub use settings::Settings;
