//! Dataset service - project summaries, CSV exports and visualization data.
//!
//! CSV layouts are fixed; downstream spreadsheets depend on the exact
//! headers. Booleans render as `True`/`False`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::projects::{NOT_A_MEMBER, PROJECT_NOT_FOUND};
use crate::domain::{CollectionLocation, Picture, Project, User};
use crate::ports::{CoreError, PictureRepository, ProjectRepository, UserRepository};

const PICTURE_HEADERS: [&str; 10] = [
    "ID",
    "User ID",
    "User Name",
    "Latitude",
    "Longitude",
    "Plant Species",
    "Confidence",
    "Is Match",
    "Notes",
    "Uploaded At",
];
const MATCHING_PICTURE_HEADERS: [&str; 9] = [
    "ID",
    "User ID",
    "User Name",
    "Latitude",
    "Longitude",
    "Plant Species",
    "Confidence",
    "Notes",
    "Uploaded At",
];
const LOCATION_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Latitude",
    "Longitude",
    "Description",
    "Added By",
    "Created At",
];
const CONTRIBUTOR_HEADERS: [&str; 6] = [
    "ID",
    "Name",
    "Email",
    "Expertise",
    "Is Creator",
    "Contributions",
];

/// The exportable datasets of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Pictures,
    MatchingPictures,
    Locations,
    Contributors,
    All,
}

impl DatasetKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pictures" => Some(Self::Pictures),
            "matching_pictures" => Some(Self::MatchingPictures),
            "locations" => Some(Self::Locations),
            "contributors" => Some(Self::Contributors),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Pictures => "pictures",
            Self::MatchingPictures => "matching_pictures",
            Self::Locations => "locations",
            Self::Contributors => "contributors",
            Self::All => "all",
        }
    }

    const ALL: [Self; 5] = [
        Self::Pictures,
        Self::MatchingPictures,
        Self::Locations,
        Self::Contributors,
        Self::All,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::Pictures => "Plant Pictures",
            Self::MatchingPictures => "Matching Plant Pictures",
            Self::Locations => "Collection Locations",
            Self::Contributors => "Contributors",
            Self::All => "Complete Project Data",
        }
    }

    fn description(self, plant_type: &str) -> String {
        match self {
            Self::Pictures => "All plant pictures with identification data".to_string(),
            Self::MatchingPictures => {
                format!("Pictures that match the target plant type ({plant_type})")
            }
            Self::Locations => "Data collection site locations".to_string(),
            Self::Contributors => "Project contributor information".to_string(),
            Self::All => "All data associated with this project".to_string(),
        }
    }

    fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Pictures => &[
                "id",
                "user_id",
                "location",
                "plant_identification",
                "is_match",
                "uploaded_at",
                "notes",
            ],
            Self::MatchingPictures => &[
                "id",
                "user_id",
                "location",
                "plant_identification",
                "uploaded_at",
                "notes",
            ],
            Self::Locations => &[
                "id",
                "name",
                "latitude",
                "longitude",
                "description",
                "added_by",
                "created_at",
            ],
            Self::Contributors => &["id", "name", "email", "expertise"],
            Self::All => &["various fields from all datasets"],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: String,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct Progress {
    pub submissions_completed: i64,
    pub submissions_needed: i64,
    pub completion_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub project_id: i64,
    pub project_title: String,
    pub plant_type: String,
    pub action_type: crate::domain::ActionType,
    pub progress: Progress,
    pub datasets: Vec<DatasetSummary>,
}

/// A rendered CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizationKind {
    Map,
    TimeSeries,
    Confidence,
}

impl VisualizationKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "map" => Some(Self::Map),
            "time_series" => Some(Self::TimeSeries),
            "confidence" => Some(Self::Confidence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub species: String,
    pub confidence: f64,
    pub is_match: bool,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePoint {
    pub date: String,
    pub cumulative_matches: i64,
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidencePoint {
    pub id: i64,
    pub species: String,
    pub confidence: f64,
    pub is_match: bool,
}

/// Visualization payload; serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Visualization {
    Map(Vec<MapPoint>),
    TimeSeries(Vec<TimePoint>),
    Confidence(Vec<ConfidencePoint>),
}

pub struct DatasetService {
    projects: Arc<dyn ProjectRepository>,
    pictures: Arc<dyn PictureRepository>,
    users: Arc<dyn UserRepository>,
}

impl DatasetService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        pictures: Arc<dyn PictureRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            projects,
            pictures,
            users,
        }
    }

    /// Progress and dataset counts. Creator or contributors.
    pub async fn project_data(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<ProjectData, CoreError> {
        let project = self.project(project_id).await?;
        if !project.is_member(user.id) {
            return Err(CoreError::Forbidden(NOT_A_MEMBER.to_string()));
        }

        let pictures = self.pictures.list_by_project(project_id).await?;
        let locations = self.projects.list_locations(project_id).await?;
        let picture_count = pictures.len();
        let matching_count = pictures.iter().filter(|p| p.is_match).count();
        let contributor_count = project.contributors.len() + 1;

        let datasets = DatasetKind::ALL
            .into_iter()
            .map(|kind| DatasetSummary {
                id: kind.id(),
                name: kind.name(),
                description: kind.description(&project.plant_type),
                count: match kind {
                    DatasetKind::Pictures => picture_count,
                    DatasetKind::MatchingPictures => matching_count,
                    DatasetKind::Locations => locations.len(),
                    DatasetKind::Contributors => contributor_count,
                    DatasetKind::All => picture_count + locations.len() + contributor_count,
                },
            })
            .collect();

        Ok(ProjectData {
            project_id: project.id,
            progress: Progress {
                submissions_completed: project.submissions_completed,
                submissions_needed: project.submissions_needed,
                completion_percentage: project.progress_percent(),
            },
            project_title: project.title,
            plant_type: project.plant_type,
            action_type: project.action_type,
            datasets,
        })
    }

    /// Dataset descriptors with their field lists. Creator only.
    pub async fn datasets(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<Vec<DatasetDescriptor>, CoreError> {
        let project = self
            .creator_project(
                user,
                project_id,
                "Unauthorized! Only project creators can access datasets.",
            )
            .await?;

        Ok(DatasetKind::ALL
            .into_iter()
            .map(|kind| DatasetDescriptor {
                id: kind.id(),
                name: kind.name(),
                description: kind.description(&project.plant_type),
                fields: kind.fields(),
            })
            .collect())
    }

    /// Full picture export (`project_{id}_data.csv`). Creator only.
    pub async fn download_data(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<CsvExport, CoreError> {
        let project = self
            .creator_project(
                user,
                project_id,
                "Unauthorized! Only project creators can download data.",
            )
            .await?;
        self.pictures_export(&project, format!("project_{project_id}_data.csv"))
            .await
    }

    /// Same export as [`Self::download_data`], under its own permission message.
    pub async fn download_all_data(
        &self,
        user: &User,
        project_id: i64,
    ) -> Result<CsvExport, CoreError> {
        let project = self
            .creator_project(
                user,
                project_id,
                "Unauthorized! Only project creators can download all data.",
            )
            .await?;
        self.pictures_export(&project, format!("project_{project_id}_data.csv"))
            .await
    }

    /// One dataset as CSV. Creator only. Unknown ids fail with `Invalid dataset ID!`.
    pub async fn download_dataset(
        &self,
        user: &User,
        project_id: i64,
        dataset_id: &str,
    ) -> Result<CsvExport, CoreError> {
        let project = self
            .creator_project(
                user,
                project_id,
                "Unauthorized! Only project creators can download datasets.",
            )
            .await?;
        let kind = DatasetKind::parse(dataset_id)
            .ok_or_else(|| CoreError::Validation("Invalid dataset ID!".to_string()))?;
        let filename = format!("project_{project_id}_{}.csv", kind.id());

        match kind {
            DatasetKind::Pictures => self.pictures_export(&project, filename).await,
            DatasetKind::All => {
                self.pictures_export(&project, format!("project_{project_id}_data.csv"))
                    .await
            }
            DatasetKind::MatchingPictures => {
                let pictures: Vec<Picture> = self
                    .pictures
                    .list_by_project(project_id)
                    .await?
                    .into_iter()
                    .filter(|p| p.is_match)
                    .collect();
                let names = self.user_names(pictures.iter().map(|p| p.user_id)).await?;
                Ok(CsvExport {
                    filename,
                    content: render_pictures(&pictures, &names, false)?,
                })
            }
            DatasetKind::Locations => {
                let locations = self.projects.list_locations(project_id).await?;
                let names = self.user_names(locations.iter().map(|l| l.added_by)).await?;
                Ok(CsvExport {
                    filename,
                    content: render_locations(&locations, &names)?,
                })
            }
            DatasetKind::Contributors => {
                let mut ids = project.contributors.clone();
                ids.push(project.created_by);
                let mut users = self.users.list_by_ids(&ids).await?;
                users.sort_by_key(|u| u.id);

                let mut contributions: HashMap<i64, usize> = HashMap::new();
                for picture in self.pictures.list_by_project(project_id).await? {
                    *contributions.entry(picture.user_id).or_default() += 1;
                }
                Ok(CsvExport {
                    filename,
                    content: render_contributors(&users, project.created_by, &contributions)?,
                })
            }
        }
    }

    /// Chart data for the project. Creator or contributors.
    pub async fn visualization(
        &self,
        user: &User,
        project_id: i64,
        kind: &str,
    ) -> Result<Visualization, CoreError> {
        let project = self.project(project_id).await?;
        if !project.is_member(user.id) {
            return Err(CoreError::Forbidden(NOT_A_MEMBER.to_string()));
        }
        let kind = VisualizationKind::parse(kind)
            .ok_or_else(|| CoreError::Validation("Invalid visualization type!".to_string()))?;

        let pictures = self.pictures.list_by_project(project_id).await?;
        Ok(visualize(&pictures, kind))
    }

    async fn project(&self, project_id: i64) -> Result<Project, CoreError> {
        self.projects
            .get_by_id(project_id)
            .await
            .map_err(CoreError::not_found_as(PROJECT_NOT_FOUND))
    }

    async fn creator_project(
        &self,
        user: &User,
        project_id: i64,
        denied: &str,
    ) -> Result<Project, CoreError> {
        let project = self.project(project_id).await?;
        if project.created_by != user.id {
            return Err(CoreError::Forbidden(denied.to_string()));
        }
        Ok(project)
    }

    async fn pictures_export(
        &self,
        project: &Project,
        filename: String,
    ) -> Result<CsvExport, CoreError> {
        let pictures = self.pictures.list_by_project(project.id).await?;
        let names = self.user_names(pictures.iter().map(|p| p.user_id)).await?;
        Ok(CsvExport {
            filename,
            content: render_pictures(&pictures, &names, true)?,
        })
    }

    async fn user_names(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> Result<HashMap<i64, String>, CoreError> {
        let mut ids: Vec<i64> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .users
            .list_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name().to_string()))
            .collect())
    }
}

fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

fn name_or_unknown(names: &HashMap<i64, String>, user_id: i64) -> String {
    names
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

fn csv_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::Internal(format!("CSV rendering failed: {e}"))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, CoreError> {
    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn render_pictures(
    pictures: &[Picture],
    names: &HashMap<i64, String>,
    with_match_column: bool,
) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if with_match_column {
        writer.write_record(PICTURE_HEADERS).map_err(csv_error)?;
    } else {
        writer
            .write_record(MATCHING_PICTURE_HEADERS)
            .map_err(csv_error)?;
    }

    for picture in pictures {
        let (species, confidence) = picture.identification.as_ref().map_or_else(
            || ("unknown".to_string(), "0".to_string()),
            |id| (id.species.clone(), id.confidence.to_string()),
        );
        let mut row = vec![
            picture.id.to_string(),
            picture.user_id.to_string(),
            name_or_unknown(names, picture.user_id),
            picture
                .location
                .map(|p| p.latitude.to_string())
                .unwrap_or_default(),
            picture
                .location
                .map(|p| p.longitude.to_string())
                .unwrap_or_default(),
            species,
            confidence,
        ];
        if with_match_column {
            row.push(py_bool(picture.is_match).to_string());
        }
        row.push(picture.notes.clone().unwrap_or_default());
        row.push(picture.uploaded_at.to_rfc3339());
        writer.write_record(&row).map_err(csv_error)?;
    }
    finish(writer)
}

fn render_locations(
    locations: &[CollectionLocation],
    names: &HashMap<i64, String>,
) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(LOCATION_HEADERS).map_err(csv_error)?;
    for location in locations {
        writer
            .write_record([
                location.id.to_string(),
                location.name.clone(),
                location.latitude.to_string(),
                location.longitude.to_string(),
                location.description.clone().unwrap_or_default(),
                name_or_unknown(names, location.added_by),
                location.created_at.to_rfc3339(),
            ])
            .map_err(csv_error)?;
    }
    finish(writer)
}

fn render_contributors(
    users: &[User],
    creator_id: i64,
    contributions: &HashMap<i64, usize>,
) -> Result<String, CoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CONTRIBUTOR_HEADERS).map_err(csv_error)?;
    for user in users {
        writer
            .write_record([
                user.id.to_string(),
                user.display_name().to_string(),
                user.email.clone().unwrap_or_default(),
                user.expertise.join(", "),
                py_bool(user.id == creator_id).to_string(),
                contributions.get(&user.id).copied().unwrap_or(0).to_string(),
            ])
            .map_err(csv_error)?;
    }
    finish(writer)
}

/// Build chart data from a project's pictures (oldest first).
pub fn visualize(pictures: &[Picture], kind: VisualizationKind) -> Visualization {
    match kind {
        VisualizationKind::Map => Visualization::Map(
            pictures
                .iter()
                .filter_map(|p| {
                    let location = p.location?;
                    let (species, confidence) = species_and_confidence(p);
                    Some(MapPoint {
                        id: p.id,
                        latitude: location.latitude,
                        longitude: location.longitude,
                        species,
                        confidence,
                        is_match: p.is_match,
                        uploaded_at: p.uploaded_at.to_rfc3339(),
                    })
                })
                .collect(),
        ),
        VisualizationKind::TimeSeries => {
            let mut sorted: Vec<&Picture> = pictures.iter().collect();
            sorted.sort_by_key(|p| (p.uploaded_at, p.id));
            let mut cumulative_matches = 0;
            Visualization::TimeSeries(
                sorted
                    .into_iter()
                    .map(|p| {
                        if p.is_match {
                            cumulative_matches += 1;
                        }
                        TimePoint {
                            date: p.uploaded_at.to_rfc3339(),
                            cumulative_matches,
                            is_match: p.is_match,
                        }
                    })
                    .collect(),
            )
        }
        VisualizationKind::Confidence => Visualization::Confidence(
            pictures
                .iter()
                .filter(|p| p.identification.is_some())
                .map(|p| {
                    let (species, confidence) = species_and_confidence(p);
                    ConfidencePoint {
                        id: p.id,
                        species,
                        confidence,
                        is_match: p.is_match,
                    }
                })
                .collect(),
        ),
    }
}

fn species_and_confidence(picture: &Picture) -> (String, f64) {
    picture.identification.as_ref().map_or_else(
        || ("unknown".to_string(), 0.0),
        |id| (id.species.clone(), id.confidence),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GeoPoint, PlantIdentification};
    use chrono::{TimeZone, Utc};

    fn picture(id: i64, user_id: i64, is_match: bool, with_id: bool) -> Picture {
        Picture {
            id,
            project_id: 1,
            user_id,
            image_base64: "aGVsbG8=".to_string(),
            location: GeoPoint::new(45.5, -122.25),
            identification: with_id.then(|| PlantIdentification {
                species: "Oregon white oak".to_string(),
                scientific_name: Some("Quercus garryana".to_string()),
                confidence: 0.82,
                common_names: vec![],
            }),
            is_match,
            notes: Some("near creek".to_string()),
            uploaded_at: Utc.with_ymd_and_hms(2024, 5, id as u32, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_picture_csv_layout() {
        let names = HashMap::from([(7, "Rowan".to_string())]);
        let pictures = [picture(1, 7, true, true), picture(2, 8, false, false)];
        let csv = render_pictures(&pictures, &names, true).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "ID,User ID,User Name,Latitude,Longitude,Plant Species,Confidence,Is Match,Notes,Uploaded At"
        );
        assert_eq!(
            lines[1],
            "1,7,Rowan,45.5,-122.25,Oregon white oak,0.82,True,near creek,2024-05-01T12:00:00+00:00"
        );
        assert_eq!(
            lines[2],
            "2,8,Unknown,45.5,-122.25,unknown,0,False,near creek,2024-05-02T12:00:00+00:00"
        );
    }

    #[test]
    fn test_matching_csv_drops_match_column() {
        let csv = render_pictures(&[picture(1, 7, true, true)], &HashMap::new(), false).unwrap();
        assert_eq!(
            csv.lines().next().unwrap(),
            "ID,User ID,User Name,Latitude,Longitude,Plant Species,Confidence,Notes,Uploaded At"
        );
        assert!(!csv.contains("True"));
    }

    #[test]
    fn test_contributor_csv_quotes_expertise() {
        let user = User {
            id: 3,
            username: "hazel".to_string(),
            name: Some("Hazel".to_string()),
            email: Some("hazel@example.org".to_string()),
            expertise: vec!["botany".to_string(), "ecology".to_string()],
            earnings_cents: 0,
            total_approved_submissions: 0,
            is_verified_org: false,
            organization_name: None,
            created_at: Utc::now(),
        };
        let contributions = HashMap::from([(3, 4)]);
        let csv = render_contributors(&[user], 3, &contributions).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Name,Email,Expertise,Is Creator,Contributions");
        assert_eq!(lines[1], "3,Hazel,hazel@example.org,\"botany, ecology\",True,4");
    }

    #[test]
    fn test_time_series_accumulates_matches() {
        let pictures = [
            picture(3, 1, true, true),
            picture(1, 1, true, true),
            picture(2, 1, false, true),
        ];
        let Visualization::TimeSeries(points) = visualize(&pictures, VisualizationKind::TimeSeries)
        else {
            panic!("expected time series");
        };
        let cumulative: Vec<_> = points.iter().map(|p| p.cumulative_matches).collect();
        assert_eq!(cumulative, [1, 1, 2]);
    }

    #[test]
    fn test_confidence_skips_unidentified() {
        let pictures = [picture(1, 1, true, true), picture(2, 1, false, false)];
        let Visualization::Confidence(points) = visualize(&pictures, VisualizationKind::Confidence)
        else {
            panic!("expected confidence data");
        };
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, 1);
    }

    #[test]
    fn test_dataset_kind_parse() {
        assert_eq!(DatasetKind::parse("locations"), Some(DatasetKind::Locations));
        assert_eq!(DatasetKind::parse("bogus"), None);
        assert_eq!(VisualizationKind::parse("heatmap"), None);
    }
}
