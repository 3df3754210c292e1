use std::{fmt, fs, path::Path};

use anyhow::Context;
use pythia::{PythiaConfig, PythiaContext, ServerSecrets};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Contents of a `pythia.yaml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub pythia: PythiaConfig,
    /// Server secret material; absent on client-only installations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<SecretsConfig>,
}

impl ConfigFile {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let config_string = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&config_string)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate().context("Validate pythia.yaml")?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        PythiaContext::new(&self.pythia).context("invalid pythia parameters")?;
        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }
        Ok(())
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SecretsConfig {
    pub transformation_key_id: String,
    pub pythia_secret: String,
    pub pythia_scope_secret: String,
}

impl SecretsConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.transformation_key_id.is_empty() {
            anyhow::bail!("transformation_key_id must not be empty");
        }
        if self.pythia_secret.is_empty() {
            anyhow::bail!("pythia_secret must not be empty");
        }
        if self.pythia_scope_secret.is_empty() {
            anyhow::bail!("pythia_scope_secret must not be empty");
        }
        Ok(())
    }

    pub fn server_secrets(&self) -> ServerSecrets {
        ServerSecrets::new(
            self.transformation_key_id.as_bytes(),
            self.pythia_secret.as_bytes(),
            self.pythia_scope_secret.as_bytes(),
        )
    }
}

impl fmt::Debug for SecretsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretsConfig")
            .field("transformation_key_id", &self.transformation_key_id)
            .finish_non_exhaustive()
    }
}

impl Drop for SecretsConfig {
    fn drop(&mut self) {
        self.pythia_secret.zeroize();
        self.pythia_scope_secret.zeroize();
    }
}
