//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, HTTP, third-party providers).
//!
//! # Structure
//!
//! - `user` - Accounts and sessions
//! - `bounty` - Bounties and their photo submissions
//! - `project` - Collection projects, pictures, locations, messages
//! - `event` - Field events, poll options and ride sharing
//! - `payout` - Withdrawals and issued cards
//! - `geo` - Coordinates and great-circle distance
//! - `poll` - Best-option vote counting
//! - `identification` - Plant identification results
//! - `money` - Dollar/cent conversion

pub mod bounty;
pub mod event;
pub mod geo;
pub mod identification;
pub mod money;
pub mod payout;
pub mod poll;
pub mod project;
pub mod user;

pub use bounty::{
    ApprovedRecord, Bounty, BountyFilter, BountyStatus, NewBounty, NewSubmission, Submission,
    SubmissionStatus, SubmissionType,
};
pub use event::{Event, NewEvent, NewRide, PollKind, PollOption, Ride};
pub use geo::{GeoPoint, haversine_km};
pub use identification::{Organ, PlantIdentification};
pub use money::{cents_to_dollars, dollars_to_cents};
pub use payout::{Card, NewCard, NewWithdrawal, PaymentMethod, Withdrawal, WithdrawalStatus};
pub use poll::{BestOption, best_option};
pub use project::{
    ActionType, CollectionLocation, NewCollectionLocation, NewPicture, NewProject,
    NewProjectMessage, Picture, Project, ProjectMessage, ProjectStatus, ProjectUpdate,
};
pub use user::{NewUser, Session, User};
