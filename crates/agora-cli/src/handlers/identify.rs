//! Identify command handler.
//!
//! One-shot PlantNet identification of a local photo, printed as JSON.

use std::path::Path;

use agora_core::PlantIdentification;
use agora_core::domain::Organ;
use agora_core::ports::PlantIdentifierPort;

use crate::error::CliError;

pub async fn execute(
    identifier: &dyn PlantIdentifierPort,
    image: &Path,
    organ: Organ,
) -> Result<(), CliError> {
    let identification = identify_file(identifier, image, organ).await?;
    let json = serde_json::to_string_pretty(&identification)
        .map_err(|e| CliError::Core(format!("failed to render result: {e}")))?;
    println!("{json}");
    Ok(())
}

async fn identify_file(
    identifier: &dyn PlantIdentifierPort,
    image: &Path,
    organ: Organ,
) -> Result<PlantIdentification, CliError> {
    let bytes = tokio::fs::read(image)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", image.display())))?;
    if bytes.is_empty() {
        return Err(CliError::Arguments(format!("{} is empty", image.display())));
    }

    tracing::debug!(
        image = %image.display(),
        organ = organ.as_str(),
        bytes = bytes.len(),
        "Identifying photo"
    );
    Ok(identifier.identify(&bytes, organ).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::Providers;
    use agora_core::testing::FakeIdentifier;

    fn oak() -> PlantIdentification {
        PlantIdentification {
            species: "Oregon white oak".to_string(),
            scientific_name: Some("Quercus garryana".to_string()),
            confidence: 0.8,
            common_names: vec!["Oregon white oak".to_string()],
        }
    }

    #[tokio::test]
    async fn test_identifies_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("leaf.jpg");
        std::fs::write(&image, b"jpeg bytes").unwrap();

        let identifier = FakeIdentifier::answering(oak());
        let result = identify_file(&identifier, &image, Organ::Leaf).await.unwrap();

        assert_eq!(result, oak());
        assert_eq!(identifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let identifier = FakeIdentifier::answering(oak());
        let err = identify_file(&identifier, Path::new("/nonexistent/leaf.jpg"), Organ::Auto)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(identifier.calls(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_identifier_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("leaf.jpg");
        std::fs::write(&image, b"jpeg bytes").unwrap();

        let providers = Providers::unconfigured();
        let err = identify_file(providers.identifier.as_ref(), &image, Organ::Auto)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
