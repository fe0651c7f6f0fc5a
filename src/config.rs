use serde::{Deserialize, Serialize};
use std::{env, fs, io, path::PathBuf};
use validator::{Validate, ValidationError};

use crate::naming::{self, NamingScheme};
use crate::topology::TopologyKind;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Validation errors: {0}")]
    ValidationError(String),

    #[error("Environment variable {0} is not set")]
    MissingVariable(String),

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_naming"))]
pub struct Config {
    /// Prepended to every stack name.
    #[validate(custom = "validate_prefix")]
    pub prefix: String,

    #[serde(default = "default_topology")]
    pub topology: TopologyKind,

    #[serde(default = "default_naming")]
    pub naming: NamingScheme,

    pub region: Option<String>,
}

fn default_topology() -> TopologyKind {
    return TopologyKind::Single;
}

fn default_naming() -> NamingScheme {
    return NamingScheme::Name;
}

pub fn parse(path: &PathBuf) -> Result<Config, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(raw_contents) => Ok(raw_contents),
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
            _ => Err(Error::Unknown(error.to_string())),
        },
    }?;

    let config: Config = match serde_yaml::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(error) => Err(Error::ParsingError(error.to_string())),
    }?;

    return validate(config);
}

/// Reads `PREFIX`, `TOPOLOGY`, `NAMING` and `AWS_REGION`.
pub fn from_env() -> Result<Config, Error> {
    return from_lookup(|key| env::var(key).ok());
}

fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, Error> {
    let prefix = match lookup("PREFIX") {
        Some(prefix) => prefix,
        None => return Err(Error::MissingVariable(String::from("PREFIX"))),
    };

    let topology = match lookup("TOPOLOGY") {
        Some(raw) => parse_variable::<TopologyKind>("TOPOLOGY", &raw)?,
        None => default_topology(),
    };

    let naming = match lookup("NAMING") {
        Some(raw) => parse_variable::<NamingScheme>("NAMING", &raw)?,
        None => default_naming(),
    };

    let config = Config {
        prefix,
        topology,
        naming,
        region: lookup("AWS_REGION"),
    };

    return validate(config);
}

fn parse_variable<T: serde::de::DeserializeOwned>(key: &str, raw: &str) -> Result<T, Error> {
    return match serde_yaml::from_str(raw) {
        Ok(value) => Ok(value),
        Err(error) => Err(Error::ParsingError(format!("{}: {}", key, error))),
    };
}

fn validate(config: Config) -> Result<Config, Error> {
    match config.validate() {
        Ok(_) => (),
        Err(error) => return Err(Error::ValidationError(error.to_string())),
    }

    return Ok(config);
}

fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if !naming::is_valid_name(prefix) {
        return Err(ValidationError::new(
            "The prefix may only contain lowercase letters, digits and hyphens",
        ));
    }

    return Ok(());
}

fn validate_naming(config: &Config) -> Result<(), ValidationError> {
    if config.naming == NamingScheme::Hostname && config.topology != TopologyKind::Single {
        return Err(ValidationError::new(
            "Hostname naming is only available for the single topology",
        ));
    }

    return Ok(());
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs::File;
    use std::io::Write;

    use super::from_lookup;
    use super::parse;
    use super::Config;
    use super::Error;
    use crate::naming::NamingScheme;
    use crate::topology::TopologyKind;
    use tempfile::tempdir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn file_does_not_exist() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::FileNotFound(_) => {}
            _ => panic!("Expected `FileNotFound` error"),
        }
    }

    #[test]
    fn file_wrong_format() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "Not yaml").unwrap();

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::ParsingError(_) => {}
            _ => panic!("Expected `ParsingError` error"),
        }
    }

    #[test]
    fn file_invalid_prefix() {
        let config = Config {
            prefix: String::from("Not_Valid"),
            topology: TopologyKind::Single,
            naming: NamingScheme::Name,
            region: None,
        };
        let config_contents = serde_yaml::to_string(&config).unwrap();

        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "{}", config_contents).unwrap();

        let result = parse(&file_path);
        assert_eq!(true, result.is_err());
        match result.err().unwrap() {
            Error::ValidationError(_) => {}
            _ => panic!("Expected `ValidationError` error"),
        }
    }

    #[test]
    fn parses_the_config() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.yaml");

        let mut file = File::create(&file_path).unwrap();
        writeln!(file, "prefix: wp\ntopology: production-staging\nregion: eu-west-1").unwrap();

        let config = parse(&file_path).unwrap();
        assert_eq!("wp", config.prefix);
        assert_eq!(TopologyKind::ProductionStaging, config.topology);
        assert_eq!(NamingScheme::Name, config.naming);
        assert_eq!(Some(String::from("eu-west-1")), config.region);
    }

    #[test]
    fn env_requires_a_prefix() {
        let result = from_lookup(lookup(&[("TOPOLOGY", "single")]));
        assert_eq!(
            Error::MissingVariable(String::from("PREFIX")),
            result.err().unwrap()
        );
    }

    #[test]
    fn env_defaults_to_single_topology_with_name_scheme() {
        let config = from_lookup(lookup(&[("PREFIX", "wp")])).unwrap();
        assert_eq!(TopologyKind::Single, config.topology);
        assert_eq!(NamingScheme::Name, config.naming);
        assert_eq!(None, config.region);
    }

    #[test]
    fn env_rejects_unknown_topology() {
        let result = from_lookup(lookup(&[("PREFIX", "wp"), ("TOPOLOGY", "triple")]));
        match result.err().unwrap() {
            Error::ParsingError(message) => assert_eq!(true, message.starts_with("TOPOLOGY")),
            _ => panic!("Expected `ParsingError` error"),
        }
    }

    #[test]
    fn hostname_naming_needs_single_topology() {
        let result = from_lookup(lookup(&[
            ("PREFIX", "cdn"),
            ("TOPOLOGY", "production-staging"),
            ("NAMING", "hostname"),
        ]));
        match result.err().unwrap() {
            Error::ValidationError(_) => {}
            _ => panic!("Expected `ValidationError` error"),
        }
    }
}
