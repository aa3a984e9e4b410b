use serde::Deserialize;

pub const DEFAULT_ADDR: &str = "127.0.0.1:6666";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("connection error: `{addr}`: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: `{0}`")]
    Config(#[from] serde_json::Error),
    #[error("io error: `{0}`")]
    Io(#[from] std::io::Error),
}

/// Where and how `connect` dials the server under test.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub addr: String,
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            nodelay: true,
        }
    }
}

impl ClientConfig {
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            ..Default::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(raw)?)
    }
}
