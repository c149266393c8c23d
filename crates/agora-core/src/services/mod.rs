//! Core services that orchestrate domain operations.
//!
//! Services hold only the ports they need and contain the business rules.
//! Adapters reach them through [`AppCore`].

mod accounts;
mod app_core;
mod assistant;
mod bounties;
mod datasets;
mod events;
mod identification;
mod leaderboard;
mod payouts;
mod projects;

pub use accounts::{
    AccountService, AuthSession, DEFAULT_SESSION_TTL_DAYS, PasswordCost, Registration,
};
pub use app_core::{AppCore, CoreOptions};
pub use assistant::{AssistantService, DEFAULT_SYSTEM_MESSAGE};
pub use bounties::{BountyDetails, BountyService, CreateBounty, SubmitBounty, UserBounties};
pub use datasets::{
    ConfidencePoint, CsvExport, DatasetDescriptor, DatasetKind, DatasetService, DatasetSummary,
    MapPoint, Progress, ProjectData, TimePoint, Visualization, VisualizationKind, visualize,
};
pub use events::{CreateEvent, EventService, OfferRide, RideView};
pub use leaderboard::{DEFAULT_LEADERBOARD_LIMIT, LeaderboardEntry, LeaderboardService, rank};
pub use payouts::{CashoutIntent, PayoutService};
pub use projects::{
    AddLocation, CreateProject, DEFAULT_NEARBY_LIMIT, DEFAULT_NEARBY_RADIUS_KM, NearbyProject,
    NearbyQuery, PictureUpload, ProjectService, UploadPicture, nearest,
};
