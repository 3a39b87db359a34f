use color_eyre::eyre::{bail, Context, Result};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlDataDir {
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlUpload {
    endpoint: String,
    preset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    pub address: Option<String>,
    pub port: Option<u16>,
    #[serde(rename = "DataDir")]
    pub data_dir: TomlDataDir,
    #[serde(rename = "Upload")]
    pub upload: TomlUpload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataDir {
    pub path: PathBuf,
}

/// Where uploaded image files are sent. `endpoint` is the full URL of a
/// Cloudinary-style unsigned upload endpoint, `preset` the upload preset
/// name passed along with every file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadConfig {
    pub endpoint: String,
    pub preset: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub data_dir: DataDir,
    pub upload: UploadConfig,
}

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path.display()))?;
    let toml_config: TomlConfig = toml::from_str(&toml_str).context("Error parsing config file")?;
    let data_dir = DataDir {
        path: PathBuf::from_str(&toml_config.data_dir.path)?,
    };
    if toml_config.upload.endpoint.is_empty() {
        bail!("Error parsing config: upload endpoint must not be empty");
    }
    if toml_config.upload.preset.is_empty() {
        bail!("Error parsing config: upload preset must not be empty");
    }
    Ok(Config {
        address: toml_config.address,
        port: toml_config.port,
        data_dir,
        upload: UploadConfig {
            endpoint: toml_config.upload.endpoint,
            preset: toml_config.upload.preset,
        },
    })
}
