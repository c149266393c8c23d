//! PlantNet identification client.
//!
//! `POST {base}/v2/identify/{project}?api-key=..` with a multipart body of
//! one `images` file and its `organs` hint. The best-scored result becomes
//! the [`PlantIdentification`]; a 404 ("Species not found") is an
//! unknown plant, not an error.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use agora_core::domain::{Organ, PlantIdentification};
use agora_core::ports::{PlantIdentifierPort, ProviderError};

use crate::config::PlantNetConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, Retry, join_url};

#[derive(Debug, Deserialize)]
pub(crate) struct IdentifyResponse {
    #[serde(default)]
    results: Vec<IdentifyResult>,
}

#[derive(Debug, Deserialize)]
struct IdentifyResult {
    score: f64,
    species: SpeciesInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeciesInfo {
    scientific_name_without_author: String,
    #[serde(default)]
    common_names: Vec<String>,
}

/// Turn a PlantNet response into an identification.
///
/// The first common name is used as the display species, falling back to the
/// scientific name.
pub(crate) fn to_identification(response: IdentifyResponse) -> PlantIdentification {
    let best = response
        .results
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score));

    let Some(best) = best else {
        return PlantIdentification::unknown();
    };

    let scientific = best.species.scientific_name_without_author.trim().to_string();
    let common_names: Vec<String> = best
        .species
        .common_names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    let species = common_names
        .first()
        .cloned()
        .unwrap_or_else(|| scientific.clone());

    PlantIdentification {
        species,
        scientific_name: (!scientific.is_empty()).then_some(scientific),
        confidence: best.score.clamp(0.0, 1.0),
        common_names,
    }
}

pub struct PlantNetClient {
    http: HttpClient,
    endpoint: Url,
}

impl PlantNetClient {
    pub fn new(http: HttpClient, config: &PlantNetConfig) -> ClientResult<Self> {
        let base = join_url(&config.base_url, &format!("v2/identify/{}", config.project));
        let endpoint = Url::parse_with_params(&base, &[("api-key", config.api_key.as_str())])?;
        Ok(Self { http, endpoint })
    }

    async fn identify_inner(
        &self,
        image: &[u8],
        organ: Organ,
    ) -> ClientResult<PlantIdentification> {
        let result = self
            .http
            .send_json::<IdentifyResponse, _>(Retry::Transient, |client| {
                let part = Part::bytes(image.to_vec())
                    .file_name("image.jpg")
                    .mime_str("image/jpeg")?;
                let form = Form::new()
                    .part("images", part)
                    .text("organs", organ.as_str());
                Ok(client.post(self.endpoint.clone()).multipart(form))
            })
            .await;

        match result {
            Ok(response) => Ok(to_identification(response)),
            Err(err) if err.status() == Some(404) => {
                tracing::debug!("PlantNet found no matching species");
                Ok(PlantIdentification::unknown())
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl PlantIdentifierPort for PlantNetClient {
    async fn identify(
        &self,
        image: &[u8],
        organ: Organ,
    ) -> Result<PlantIdentification, ProviderError> {
        if image.is_empty() {
            return Err(ClientError::invalid("empty image").into());
        }
        Ok(self.identify_inner(image, organ).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpSettings;

    fn parse(json: &str) -> PlantIdentification {
        to_identification(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_best_score_wins() {
        let id = parse(
            r#"{
                "query": {"project": "all", "organs": ["flower"]},
                "bestMatch": "Taraxacum officinale F.H.Wigg.",
                "results": [
                    {"score": 0.12, "species": {"scientificNameWithoutAuthor": "Crepis capillaris", "commonNames": []}},
                    {"score": 0.84, "species": {
                        "scientificNameWithoutAuthor": "Taraxacum officinale",
                        "scientificNameAuthorship": "F.H.Wigg.",
                        "commonNames": ["Common dandelion", "Dandelion"]
                    }}
                ],
                "remainingIdentificationRequests": 498
            }"#,
        );

        assert_eq!(id.species, "Common dandelion");
        assert_eq!(id.scientific_name.as_deref(), Some("Taraxacum officinale"));
        assert!((id.confidence - 0.84).abs() < f64::EPSILON);
        assert_eq!(id.common_names.len(), 2);
        assert!(id.matches("taraxacum"));
    }

    #[test]
    fn test_without_common_names_uses_scientific() {
        let id = parse(
            r#"{"results": [{"score": 0.5, "species": {"scientificNameWithoutAuthor": "Crepis capillaris"}}]}"#,
        );
        assert_eq!(id.species, "Crepis capillaris");
        assert!(id.common_names.is_empty());
    }

    #[test]
    fn test_no_results_is_unknown() {
        assert!(parse(r#"{"results": []}"#).is_unknown());
        assert!(parse("{}").is_unknown());
    }

    #[test]
    fn test_endpoint_carries_project_and_key() {
        let http = HttpClient::new(&HttpSettings::default()).unwrap();
        let client =
            PlantNetClient::new(http, &PlantNetConfig::new("k&y").with_project("weurope")).unwrap();
        assert_eq!(
            client.endpoint.as_str(),
            "https://my-api.plantnet.org/v2/identify/weurope?api-key=k%26y"
        );
    }

    #[tokio::test]
    async fn test_empty_image_rejected_without_network() {
        let http = HttpClient::new(&HttpSettings::default()).unwrap();
        let client = PlantNetClient::new(http, &PlantNetConfig::new("key")).unwrap();
        let err = client.identify(&[], Organ::Auto).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}
