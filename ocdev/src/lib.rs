//! Label-driven development workflow for OpenShift.
//!
//! Applications and components have no record of their own. They exist as
//! labels stamped on the image streams, build configurations, deployment
//! configurations, services and routes that make them up, and every query
//! reads those labels back from the cluster. The only local state is the
//! context file remembering which application and component are active.

pub mod cli;
pub mod config;
pub mod context;
pub mod directory;
pub mod error;
pub mod label;
pub mod platform;
pub mod service;
mod ui;
mod shadow {
    #![allow(clippy::needless_raw_string_hashes)]
    use shadow_rs::shadow;
    shadow!(build);

    pub use self::build::*;
}
