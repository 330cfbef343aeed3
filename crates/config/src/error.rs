//! Errors raised while loading the configuration.

use std::fmt::Write;

/// The layered sources could not be turned into a [`Config`](crate::Config).
///
/// Every distinct problem is kept once, naming the setting and the source it came from, e.g.
/// ``invalid type: found sequence, expected a path for `artifact` in /work/tipjar.toml``.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid tipjar config: {}", .problems.join("; "))]
pub struct ExtractConfigError {
    problems: Vec<String>,
}

impl ExtractConfigError {
    /// One message per distinct problem, in the order figment reported them.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }
}

impl From<figment::Error> for ExtractConfigError {
    fn from(error: figment::Error) -> Self {
        let mut problems = Vec::with_capacity(error.count());
        for err in error {
            let problem = describe(&err);
            if !problems.contains(&problem) {
                problems.push(problem);
            }
        }
        Self { problems }
    }
}

fn describe(err: &figment::Error) -> String {
    let mut out = err.kind.to_string();
    if !err.path.is_empty() {
        let _ = write!(out, " for `{}`", err.path.join("."));
    }
    if let Some(meta) = &err.metadata {
        let _ = match &meta.source {
            Some(source) => write!(out, " in {source}"),
            None => write!(out, " in {}", meta.name),
        };
    }
    out
}

/// Errors raised while turning a loaded `Config` into a usable RPC endpoint.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EndpointError {
    #[error("no RPC endpoint configured: set `ALCHEMY_API_KEY` or `rpc_url`")]
    MissingApiKey,
    #[error("invalid RPC URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
