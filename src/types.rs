use clap::ValueEnum;
use serde::Deserialize;

/// What to do when the named service does not exist or has no active
/// deployment.
///
/// - `Fail`: abort the invocation with a `NotFound` error (default).
/// - `Skip`: log a warning and finish successfully without launching
///   anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingServicePolicy {
    #[default]
    Fail,
    Skip,
}

/// Whether the mirrored service must carry a network configuration.
///
/// - `Optional`: a service without one launches without one (default).
/// - `Required`: a service without one is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NetworkPolicy {
    #[default]
    Optional,
    Required,
}
