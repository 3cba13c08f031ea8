/*!
Path template handling.
*/

use crate::error::{ApiDocError, ApiDocResult};
use regex::Regex;

/// Normalizes and joins path templates
#[derive(Debug, Clone)]
pub struct PathNormalizer {
    /// `{name: regex}` template segments
    constraint_regex: Regex,
    /// `{name}` template segments
    param_regex: Regex,
    slashes_regex: Regex,
}

impl PathNormalizer {
    /// Create new path normalizer
    pub fn new() -> ApiDocResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                ApiDocError::config_error(format!("Failed to compile path regex: {}", e))
            })
        };
        Ok(Self {
            constraint_regex: compile(r"\{\s*([^{}:\s]+)\s*:(?:[^{}]|\{[^{}]*\})*\}")?,
            param_regex: compile(r"\{([^{}]+)\}")?,
            slashes_regex: compile(r"/{2,}")?,
        })
    }

    /// Leading `/`, no duplicate or trailing `/`, regex constraints stripped
    pub fn normalize(&self, path: &str) -> String {
        let stripped = self.constraint_regex.replace_all(path.trim(), "{$1}");
        let collapsed = self.slashes_regex.replace_all(&stripped, "/");
        let trimmed = collapsed.trim_end_matches('/');
        if trimmed.is_empty() {
            return "/".to_string();
        }
        if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        }
    }

    /// Join a parent path and a child segment
    pub fn join(&self, parent: &str, child: &str) -> String {
        self.normalize(&format!("{}/{}", parent, child))
    }

    /// Names of the template parameters in a path
    pub fn parameters(&self, path: &str) -> Vec<String> {
        let normalized = self.normalize(path);
        self.param_regex
            .captures_iter(&normalized)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .collect()
    }
}
