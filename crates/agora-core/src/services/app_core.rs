//! `AppCore` - the primary application facade.
//!
//! This is the composition root for core services. Adapters (CLI, Web)
//! receive an `AppCore` instance and use it to access all functionality.

use chrono::Duration;

use super::{
    AccountService, AssistantService, BountyService, DEFAULT_SESSION_TTL_DAYS, DatasetService,
    EventService, LeaderboardService, PasswordCost, PayoutService, ProjectService,
};
use crate::ports::{CoreError, Providers, Repos};

/// Tunables for the core services.
#[derive(Debug, Clone, Copy)]
pub struct CoreOptions {
    pub session_ttl: Duration,
    pub password_cost: PasswordCost,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            session_ttl: Duration::days(DEFAULT_SESSION_TTL_DAYS),
            password_cost: PasswordCost::default(),
        }
    }
}

/// The core application facade.
///
/// # Example
///
/// ```ignore
/// let repos = CoreFactory::build_repos(pool);
/// let providers = agora_clients::build_providers(&ProviderSettings::from_env())?;
/// let core = AppCore::new(repos, providers)?;
///
/// let board = core.leaderboard().top(None).await?;
/// ```
pub struct AppCore {
    accounts: AccountService,
    bounties: BountyService,
    leaderboard: LeaderboardService,
    projects: ProjectService,
    datasets: DatasetService,
    events: EventService,
    payouts: PayoutService,
    assistant: AssistantService,
}

impl AppCore {
    /// Create a new `AppCore` with default options.
    pub fn new(repos: Repos, providers: Providers) -> Result<Self, CoreError> {
        Self::with_options(repos, providers, CoreOptions::default())
    }

    pub fn with_options(
        repos: Repos,
        providers: Providers,
        options: CoreOptions,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            accounts: AccountService::new(
                repos.users.clone(),
                repos.sessions,
                options.session_ttl,
                options.password_cost,
            )?,
            bounties: BountyService::new(
                repos.bounties,
                repos.submissions.clone(),
                repos.users.clone(),
                providers.identifier.clone(),
            ),
            leaderboard: LeaderboardService::new(repos.submissions),
            projects: ProjectService::new(
                repos.projects.clone(),
                repos.pictures.clone(),
                providers.identifier,
            ),
            datasets: DatasetService::new(
                repos.projects.clone(),
                repos.pictures,
                repos.users.clone(),
            ),
            events: EventService::new(repos.events, repos.rides, repos.projects),
            payouts: PayoutService::new(
                repos.users,
                repos.payouts,
                providers.payments,
                providers.cards,
            ),
            assistant: AssistantService::new(providers.assistant),
        })
    }

    pub const fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub const fn bounties(&self) -> &BountyService {
        &self.bounties
    }

    pub const fn leaderboard(&self) -> &LeaderboardService {
        &self.leaderboard
    }

    pub const fn projects(&self) -> &ProjectService {
        &self.projects
    }

    pub const fn datasets(&self) -> &DatasetService {
        &self.datasets
    }

    pub const fn events(&self) -> &EventService {
        &self.events
    }

    pub const fn payouts(&self) -> &PayoutService {
        &self.payouts
    }

    pub const fn assistant(&self) -> &AssistantService {
        &self.assistant
    }
}
