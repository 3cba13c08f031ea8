use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{
    error::{ApiDocError, ApiDocResult},
    metadata::Primitive,
    schema::SchemaConfig,
    specification::{ExternalDocumentation, Parameter, Tag},
};

/// Configuration for reading API descriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Base path of a newly created description
    pub base_path: Option<String>,

    /// Parent path of every root resource
    pub parent_path: String,

    /// Default request media types
    pub consumes: Vec<String>,

    /// Default response media types
    pub produces: Vec<String>,

    /// Read hidden root types anyway
    pub include_hidden: bool,

    /// Whether to include example values in models
    pub include_examples: bool,

    /// Tag metadata applied to tags of the same name
    pub tags: Vec<TagConfig>,

    /// Parameters prepended to every operation
    pub parameters: Vec<Parameter>,

    /// Named types documented as primitives
    pub type_mappings: HashMap<String, Primitive>,
}

/// Tag metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagConfig {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
}

/// External documentation reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,
    pub description: Option<String>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            base_path: None,
            parent_path: String::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            include_hidden: false,
            include_examples: true,
            tags: Vec::new(),
            parameters: Vec::new(),
            type_mappings: HashMap::new(),
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base path
    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.base_path = Some(base_path.to_string());
        self
    }

    /// Set the parent path of root resources
    pub fn with_parent_path(mut self, parent_path: &str) -> Self {
        self.parent_path = parent_path.to_string();
        self
    }

    /// Set default media types
    pub fn with_media_types(mut self, consumes: &[&str], produces: &[&str]) -> Self {
        self.consumes = consumes.iter().map(|s| s.to_string()).collect();
        self.produces = produces.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Read hidden root types
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Add tag metadata
    pub fn add_tag(mut self, name: &str, description: Option<&str>) -> Self {
        self.tags.push(TagConfig {
            name: name.to_string(),
            description: description.map(|s| s.to_string()),
            external_docs: None,
        });
        self
    }

    /// Add a global parameter
    pub fn add_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Document a named type as a primitive
    pub fn with_type_mapping(mut self, type_name: &str, primitive: Primitive) -> Self {
        self.type_mappings.insert(type_name.to_string(), primitive);
        self
    }

    pub fn from_toml_str(content: &str) -> ApiDocResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> ApiDocResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> ApiDocResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load configuration, choosing the format by file extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> ApiDocResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        tracing::debug!("Loading reader configuration from {}", path.display());
        match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(ApiDocError::config_error(format!(
                "Unsupported configuration format: {}",
                path.display()
            ))),
        }
    }

    /// Tag metadata keyed by tag name
    pub fn tag_map(&self) -> HashMap<String, Tag> {
        self.tags
            .iter()
            .map(|tag| (tag.name.clone(), Tag::from(tag)))
            .collect()
    }

    pub fn schema_config(&self) -> SchemaConfig {
        SchemaConfig {
            include_examples: self.include_examples,
            type_mappings: self.type_mappings.clone(),
        }
    }
}

impl From<&TagConfig> for Tag {
    fn from(config: &TagConfig) -> Self {
        Tag {
            name: config.name.clone(),
            description: config.description.clone(),
            external_docs: config.external_docs.as_ref().map(|docs| ExternalDocumentation {
                url: docs.url.clone(),
                description: docs.description.clone(),
            }),
        }
    }
}
