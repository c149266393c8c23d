//! Plant identification port.

use async_trait::async_trait;

use super::ProviderError;
use crate::domain::{Organ, PlantIdentification};

/// Port for identifying a plant from a photo.
///
/// The implementation lives in `agora-clients` (PlantNet).
///
/// # Design
///
/// - Takes decoded image bytes, never base64
/// - A photo the provider cannot identify is
///   `Ok(PlantIdentification::unknown())`, not an error
#[async_trait]
pub trait PlantIdentifierPort: Send + Sync {
    async fn identify(
        &self,
        image: &[u8],
        organ: Organ,
    ) -> Result<PlantIdentification, ProviderError>;
}
