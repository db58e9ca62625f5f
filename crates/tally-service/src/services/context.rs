//! Service context - dependency container for services
//!
//! Holds the repositories, the messaging gateway and the grading settings.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use tally_common::{ConfigError, GradingConfig};
use tally_core::traits::{
    GradeRepository, GuardianRepository, LeaderboardStateRepository, LessonRepository,
    MemberRepository, MemberStatsRepository, MessagingGateway, NotificationRepository,
    RosterRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Grading behaviour resolved from configuration
#[derive(Debug, Clone)]
pub struct GradingSettings {
    /// Length of freshly allocated member codes
    pub code_length: usize,
    /// Local calendar for lesson dates and leaderboard timestamps
    pub timezone: FixedOffset,
    /// Title used for rosters whose chat has none
    pub default_roster_title: String,
}

impl GradingSettings {
    /// Resolve settings from configuration
    ///
    /// # Errors
    /// Returns an error if the configured UTC offset is out of range
    pub fn from_config(config: &GradingConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            code_length: config.code_length,
            timezone: config.timezone()?,
            default_roster_title: config.default_roster_title.clone(),
        })
    }

    /// Current local time
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.timezone)
    }

    /// Current local calendar date
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Default for GradingSettings {
    fn default() -> Self {
        let config = GradingConfig::default();
        Self {
            code_length: config.code_length,
            timezone: config.timezone().unwrap_or_else(|_| Utc.fix()),
            default_roster_title: config.default_roster_title,
        }
    }
}

/// Service context containing all dependencies
///
/// This is the dependency container passed to every service. It provides:
/// - Repositories for every persisted entity
/// - The messaging gateway
/// - Grading settings
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    roster_repo: Arc<dyn RosterRepository>,
    member_repo: Arc<dyn MemberRepository>,
    stats_repo: Arc<dyn MemberStatsRepository>,
    lesson_repo: Arc<dyn LessonRepository>,
    grade_repo: Arc<dyn GradeRepository>,
    guardian_repo: Arc<dyn GuardianRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
    leaderboard_repo: Arc<dyn LeaderboardStateRepository>,

    // Messaging
    gateway: Arc<dyn MessagingGateway>,

    settings: GradingSettings,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the roster repository
    pub fn roster_repo(&self) -> &dyn RosterRepository {
        self.roster_repo.as_ref()
    }

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the member stats repository
    pub fn stats_repo(&self) -> &dyn MemberStatsRepository {
        self.stats_repo.as_ref()
    }

    /// Get the lesson repository
    pub fn lesson_repo(&self) -> &dyn LessonRepository {
        self.lesson_repo.as_ref()
    }

    /// Get the grade repository
    pub fn grade_repo(&self) -> &dyn GradeRepository {
        self.grade_repo.as_ref()
    }

    /// Get the guardian repository
    pub fn guardian_repo(&self) -> &dyn GuardianRepository {
        self.guardian_repo.as_ref()
    }

    /// Get the notification repository
    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    /// Get the leaderboard state repository
    pub fn leaderboard_repo(&self) -> &dyn LeaderboardStateRepository {
        self.leaderboard_repo.as_ref()
    }

    // === Messaging ===

    /// Get the messaging gateway
    pub fn gateway(&self) -> &dyn MessagingGateway {
        self.gateway.as_ref()
    }

    // === Settings ===

    pub fn settings(&self) -> &GradingSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("gateway", &"dyn MessagingGateway")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    roster_repo: Option<Arc<dyn RosterRepository>>,
    member_repo: Option<Arc<dyn MemberRepository>>,
    stats_repo: Option<Arc<dyn MemberStatsRepository>>,
    lesson_repo: Option<Arc<dyn LessonRepository>>,
    grade_repo: Option<Arc<dyn GradeRepository>>,
    guardian_repo: Option<Arc<dyn GuardianRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    leaderboard_repo: Option<Arc<dyn LeaderboardStateRepository>>,
    gateway: Option<Arc<dyn MessagingGateway>>,
    settings: Option<GradingSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roster_repo(mut self, repo: Arc<dyn RosterRepository>) -> Self {
        self.roster_repo = Some(repo);
        self
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn stats_repo(mut self, repo: Arc<dyn MemberStatsRepository>) -> Self {
        self.stats_repo = Some(repo);
        self
    }

    pub fn lesson_repo(mut self, repo: Arc<dyn LessonRepository>) -> Self {
        self.lesson_repo = Some(repo);
        self
    }

    pub fn grade_repo(mut self, repo: Arc<dyn GradeRepository>) -> Self {
        self.grade_repo = Some(repo);
        self
    }

    pub fn guardian_repo(mut self, repo: Arc<dyn GuardianRepository>) -> Self {
        self.guardian_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn leaderboard_repo(mut self, repo: Arc<dyn LeaderboardStateRepository>) -> Self {
        self.leaderboard_repo = Some(repo);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn MessagingGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Override the grading settings (defaults apply otherwise)
    pub fn settings(mut self, settings: GradingSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            roster_repo: required(self.roster_repo, "roster_repo")?,
            member_repo: required(self.member_repo, "member_repo")?,
            stats_repo: required(self.stats_repo, "stats_repo")?,
            lesson_repo: required(self.lesson_repo, "lesson_repo")?,
            grade_repo: required(self.grade_repo, "grade_repo")?,
            guardian_repo: required(self.guardian_repo, "guardian_repo")?,
            notification_repo: required(self.notification_repo, "notification_repo")?,
            leaderboard_repo: required(self.leaderboard_repo, "leaderboard_repo")?,
            gateway: required(self.gateway, "gateway")?,
            settings: self.settings.unwrap_or_default(),
        })
    }
}
