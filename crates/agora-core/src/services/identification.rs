//! Shared plant identification step for submissions and picture uploads.

use crate::domain::{Organ, PlantIdentification};
use crate::ports::PlantIdentifierPort;

/// Identify a photo, degrading to `unknown` when the provider fails.
///
/// Uploads never fail because the identifier is down or unconfigured.
pub(crate) async fn identify_or_unknown(
    identifier: &dyn PlantIdentifierPort,
    image: &[u8],
) -> PlantIdentification {
    match identifier.identify(image, Organ::Auto).await {
        Ok(identification) => identification,
        Err(e) => {
            tracing::warn!(error = %e, "Plant identification failed; storing as unknown");
            PlantIdentification::unknown()
        }
    }
}
