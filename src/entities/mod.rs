//! Entity type definitions
//!
//! Obra tracks five record kinds:
//!
//! - [`Company`] - Client companies that own projects
//! - [`Person`] - People referenced as responsible parties
//! - [`Project`] - A contracted scope of work, keyed by a unique code
//! - [`Activity`] - A line of work inside a project with a completion percentage
//! - [`NonConformity`] - A quality finding raised against a project
//!
//! Plus one derived record: [`ControlSummary`], the per-project progress
//! rollup maintained by [`crate::core::progress`].

pub mod activity;
pub mod company;
pub mod nonconformity;
pub mod person;
pub mod project;
pub mod summary;

pub use activity::{Activity, ActivityStatus, NewActivity};
pub use company::Company;
pub use nonconformity::{NewNonConformity, NocStatus, NonConformity};
pub use person::Person;
pub use project::{NewProject, Project, ProjectStatus};
pub use summary::ControlSummary;
