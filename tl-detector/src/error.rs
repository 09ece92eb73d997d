// Copyright 2025 Accenture.
//
// SPDX-License-Identifier: Apache-2.0

//! Detector error implementation

/// Detector error type
#[non_exhaustive]
#[derive(Debug)]
pub enum Error {
    /// A channel between feeds, runner and consumers is broken
    Channel(&'static str),
    Io((std::io::Error, &'static str)),
    /// Invalid or incomplete configuration
    Config(String),
    /// The light list does not line up with the configured stop lines
    LightCountMismatch { expected: usize, actual: usize },
    /// The waypoint index was queried before the first path arrived
    IndexNotBuilt,
    Classifier(String),
    ClassifierTimeout,
    Json(serde_json::Error),
    Postcard(postcard::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io((e, _)) => Some(e),
            Error::Json(e) => Some(e),
            Error::Postcard(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Channel(description) => write!(f, "Channel error, {}", description),
            Error::Io((e, description)) => write!(f, "Io error: {}, {}", description, e),
            Error::Config(description) => write!(f, "Configuration error: {}", description),
            Error::LightCountMismatch { expected, actual } => write!(
                f,
                "Light count mismatch: {actual} lights for {expected} stop lines"
            ),
            Error::IndexNotBuilt => write!(f, "Waypoint index queried before any path was received"),
            Error::Classifier(description) => write!(f, "Classifier error: {}", description),
            Error::ClassifierTimeout => write!(f, "Classifier timed out"),
            Error::Json(e) => write!(f, "Json error: {}", e),
            Error::Postcard(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

impl From<postcard::Error> for Error {
    fn from(e: postcard::Error) -> Self {
        Error::Postcard(e)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
