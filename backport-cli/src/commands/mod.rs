//! CLI command implementations

pub mod import;
pub mod projects;
pub mod pulls;

pub use import::ImportArgs;
pub use projects::ProjectsArgs;
pub use pulls::PullsArgs;
