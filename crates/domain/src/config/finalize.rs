use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

const DIRECTIVE_NAME: &str = "finalize";

/// CNAME finalization settings, fixed at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FinalizeConfig {
    /// Maximum number of alias hops; 0 means unbounded.
    #[serde(default)]
    pub max_depth: usize,

    /// Ignore A/AAAA records already present next to the CNAME and always
    /// resolve the chain upstream.
    #[serde(default)]
    pub force_resolve: bool,
}

impl FinalizeConfig {
    pub fn new(max_depth: usize, force_resolve: bool) -> Self {
        Self {
            max_depth,
            force_resolve,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_depth == 0
    }

    /// Parses a single directive line such as `finalize max_depth 3 force_resolve`.
    ///
    /// The leading `finalize` keyword is optional.
    pub fn from_directive(line: &str) -> Result<Self, ConfigError> {
        let mut args: Vec<&str> = line.split_whitespace().collect();
        if args
            .first()
            .is_some_and(|first| first.eq_ignore_ascii_case(DIRECTIVE_NAME))
        {
            args.remove(0);
        }
        Self::from_args(&args)
    }

    /// Parses directive arguments. Keywords are case-insensitive and may
    /// appear in any order.
    pub fn from_args(args: &[&str]) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let mut i = 0;

        while i < args.len() {
            match args[i].to_ascii_lowercase().as_str() {
                "force_resolve" => {
                    config.force_resolve = true;
                    i += 1;
                }
                "max_depth" => {
                    let raw = args
                        .get(i + 1)
                        .ok_or_else(|| ConfigError::ArgCount(args[i].to_string()))?;
                    config.max_depth = parse_depth(raw)?;
                    i += 2;
                }
                other => return Err(ConfigError::UnsupportedParameter(other.to_string())),
            }
        }

        Ok(config)
    }
}

fn parse_depth(raw: &str) -> Result<usize, ConfigError> {
    let n: i64 = raw
        .parse()
        .map_err(|e: std::num::ParseIntError| ConfigError::InvalidDepth(raw.to_string(), e.to_string()))?;
    if n <= 0 {
        return Err(ConfigError::NonPositiveDepth);
    }
    usize::try_from(n).map_err(|e| ConfigError::InvalidDepth(raw.to_string(), e.to_string()))
}
