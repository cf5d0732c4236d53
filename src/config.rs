use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::material_provider::MaterialSource;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    pub enable_diagnostics: bool,
    pub material_source: MaterialSource,
}

impl LoaderConfig {
    pub fn from_str(value: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

pub struct ConfigFileLoader {
    pub path: PathBuf,
    config: Option<LoaderConfig>,
}

impl ConfigFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: None,
        }
    }

    /// Reads the file, or writes the defaults to it if there is none yet.
    pub fn load_config(&mut self) -> anyhow::Result<&LoaderConfig> {
        let config = match std::fs::read_to_string(&self.path) {
            Ok(content) => LoaderConfig::from_str(&content)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::info!("No config at {}, writing the defaults", self.path.display());
                let config = LoaderConfig::default();
                self.config = Some(config.clone());
                self.save_config()?;
                config
            }
            Err(error) => return Err(error.into()),
        };
        Ok(self.config.insert(config))
    }

    pub fn get_or_load_config(&mut self) -> anyhow::Result<&LoaderConfig> {
        if self.config.is_none() {
            self.load_config()?;
        }
        match &self.config {
            Some(config) => Ok(config),
            None => anyhow::bail!("config at {} was not loaded", self.path.display()),
        }
    }

    pub fn save_config(&self) -> anyhow::Result<()> {
        if let Some(config) = &self.config {
            let content = serde_json::to_string_pretty(config)?;
            std::fs::write(&self.path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = LoaderConfig::from_str(r#"{ "enable_diagnostics": true }"#).unwrap();
        assert!(config.enable_diagnostics);
        assert_eq!(config.material_source, MaterialSource::Generate);

        let config = LoaderConfig::from_str(r#"{ "material_source": "LoadUbershaders" }"#).unwrap();
        assert_eq!(config.material_source, MaterialSource::LoadUbershaders);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(LoaderConfig::from_str("{ enable_diagnostics: ").is_err());
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let path = std::env::temp_dir().join(format!(
            "scene_import_config_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut loader = ConfigFileLoader::new(&path);
        assert_eq!(loader.load_config().unwrap(), &LoaderConfig::default());
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(LoaderConfig::from_str(&written).unwrap(), LoaderConfig::default());

        std::fs::remove_file(&path).unwrap();
    }
}
