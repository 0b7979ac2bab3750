//! Github API object models.

pub mod commits;
pub mod repos;

pub use commits::{Commit, CommitStats};
pub use repos::Repository;
