//! Core domain, ports and services for the Agora plant bounty backend.
//!
//! This crate has no knowledge of SQL, HTTP or third-party APIs. Adapters
//! (`agora-db`, `agora-clients`, `agora-axum`) implement its ports and drive
//! its services through [`AppCore`].

pub mod domain;
pub mod paths;
pub mod ports;
pub mod services;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use domain::{
    Bounty, BountyFilter, BountyStatus, Card, CollectionLocation, Event, GeoPoint, Organ,
    PaymentMethod, Picture, PlantIdentification, PollKind, PollOption, Project, ProjectMessage,
    ProjectStatus, ProjectUpdate, Ride, Session, Submission, SubmissionStatus, SubmissionType,
    User, Withdrawal, WithdrawalStatus, cents_to_dollars, dollars_to_cents,
};
pub use paths::{PathError, ResolvedPaths, data_root, database_path};
pub use ports::{CoreError, ProviderError, Providers, Repos, RepositoryError};
pub use services::{AppCore, CoreOptions};
