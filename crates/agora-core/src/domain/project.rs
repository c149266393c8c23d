//! Collection projects and the data gathered for them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;
use super::identification::PlantIdentification;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    #[default]
    Research,
    Removal,
}

impl ActionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Removal => "removal",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "research" => Some(Self::Research),
            "removal" => Some(Self::Removal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A citizen science collection effort for one plant type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub plant_type: String,
    pub action_type: ActionType,
    pub data_needed: Option<String>,
    pub purpose: Option<String>,
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub submissions_needed: i64,
    pub submissions_completed: i64,
    /// Contributor user ids in join order. Never contains the creator.
    pub contributors: Vec<i64>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Whether `user_id` may upload, post messages and read project data.
    #[must_use]
    pub fn is_member(&self, user_id: i64) -> bool {
        self.created_by == user_id || self.contributors.contains(&user_id)
    }

    /// Completion percentage, 0 when nothing is needed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.submissions_needed <= 0 {
            return 0.0;
        }
        self.submissions_completed as f64 / self.submissions_needed as f64 * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub plant_type: String,
    pub action_type: ActionType,
    pub data_needed: Option<String>,
    pub purpose: Option<String>,
    pub location_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub submissions_needed: i64,
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub plant_type: Option<String>,
    pub data_needed: Option<String>,
    pub purpose: Option<String>,
    pub location_name: Option<String>,
}

impl ProjectUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.plant_type.is_none()
            && self.data_needed.is_none()
            && self.purpose.is_none()
            && self.location_name.is_none()
    }
}

/// A photo uploaded to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub image_base64: String,
    pub location: Option<GeoPoint>,
    pub identification: Option<PlantIdentification>,
    pub is_match: bool,
    pub notes: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPicture {
    pub project_id: i64,
    pub user_id: i64,
    pub image_base64: String,
    pub location: Option<GeoPoint>,
    pub identification: Option<PlantIdentification>,
    pub is_match: bool,
    pub notes: Option<String>,
}

/// A named collection site attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionLocation {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub added_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCollectionLocation {
    pub project_id: i64,
    pub name: String,
    pub point: GeoPoint,
    pub description: Option<String>,
    pub added_by: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMessage {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProjectMessage {
    pub project_id: i64,
    pub user_id: i64,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(needed: i64, completed: i64) -> Project {
        Project {
            id: 1,
            created_by: 7,
            title: "Milkweed survey".to_string(),
            description: None,
            plant_type: "milkweed".to_string(),
            action_type: ActionType::Research,
            data_needed: None,
            purpose: None,
            location_name: None,
            location: None,
            submissions_needed: needed,
            submissions_completed: completed,
            contributors: vec![8, 9],
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_membership() {
        let p = project(10, 0);
        assert!(p.is_member(7));
        assert!(p.is_member(9));
        assert!(!p.is_member(10));
    }

    #[test]
    fn test_progress_percent() {
        assert!((project(4, 1).progress_percent() - 25.0).abs() < f64::EPSILON);
        assert!(project(0, 3).progress_percent().abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_update() {
        assert!(ProjectUpdate::default().is_empty());
        let update = ProjectUpdate {
            purpose: Some("mapping".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
