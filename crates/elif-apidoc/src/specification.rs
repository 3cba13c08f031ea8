use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::metadata::Primitive;

/// Prefix of model references
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Resolved API description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    /// Description format version
    pub swagger: String,

    /// Base path all paths are relative to
    #[serde(rename = "basePath", skip_serializing_if = "Option::is_none", default)]
    pub base_path: Option<String>,

    /// Default request media types
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumes: Vec<String>,

    /// Default response media types
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub produces: Vec<String>,

    /// Tags for grouping operations
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,

    /// Paths and their operations
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub paths: IndexMap<String, PathItem>,

    /// Global model definition table
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub definitions: IndexMap<String, ModelDefinition>,
}

/// Operations available on one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
}

/// A documented HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Operation {
    /// Tags for grouping
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<String>,

    /// Short summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Long description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unique operation ID
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Request media types, when they differ from the description defaults
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub consumes: Vec<String>,

    /// Response media types, when they differ from the description defaults
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub produces: Vec<String>,

    /// Parameters
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parameters: Vec<Parameter>,

    /// Responses by status code
    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    /// Deprecated flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    /// Declared by a hidden type that was read with the hidden override
    #[serde(skip)]
    pub hidden: bool,
}

/// Where a parameter is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    #[serde(rename = "formData")]
    Form,
    Cookie,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Form => "formData",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Body => "body",
        }
    }
}

/// Operation parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,

    /// Parameter location
    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Value schema
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Property>,

    /// Serialization of array values (`multi`, `csv`, ...)
    #[serde(rename = "collectionFormat", skip_serializing_if = "Option::is_none")]
    pub collection_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl Parameter {
    pub fn new(name: &str, location: ParameterLocation) -> Self {
        Self {
            name: name.to_string(),
            location,
            description: None,
            required: location == ParameterLocation::Path,
            schema: None,
            collection_format: None,
            default: None,
        }
    }

    pub fn with_schema(mut self, schema: Property) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required || self.location == ParameterLocation::Path;
        self
    }
}

/// Response for one status code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,

    /// Payload schema (a model reference or a primitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Property>,
}

impl Response {
    pub fn new(description: &str) -> Self {
        Self {
            description: description.to_string(),
            schema: None,
        }
    }

    pub fn with_schema(mut self, schema: Option<Property>) -> Self {
        self.schema = schema;
        self
    }
}

/// Default description for a status code
pub fn status_description(code: &str) -> &'static str {
    match code {
        "200" => "successful operation",
        "201" => "Created",
        "202" => "Accepted",
        "204" => "No Content",
        "400" => "Bad Request",
        "401" => "Unauthorized",
        "403" => "Forbidden",
        "404" => "Not Found",
        "409" => "Conflict",
        "422" => "Unprocessable Entity",
        "500" => "Internal Server Error",
        _ => "Response",
    }
}

/// Property schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Property {
    /// Data type
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format specifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reference to a model definition
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    /// Items schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    /// Value schema for maps
    #[serde(rename = "additionalProperties", skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<Property>>,

    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty", default)]
    pub enum_values: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl Property {
    pub fn primitive(primitive: Primitive) -> Self {
        let (schema_type, format) = primitive.schema_type();
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn string() -> Self {
        Self::primitive(Primitive::String)
    }

    pub fn object() -> Self {
        Self::primitive(Primitive::Object)
    }

    /// Reference to a named model definition
    pub fn reference(model: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, model)),
            ..Default::default()
        }
    }

    pub fn array(items: Property) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn map(values: Property) -> Self {
        Self {
            schema_type: Some("object".to_string()),
            additional_properties: Some(Box::new(values)),
            ..Default::default()
        }
    }

    pub fn string_enum(values: &[String]) -> Self {
        Self {
            enum_values: values.to_vec(),
            ..Self::string()
        }
    }

    /// Name of the referenced model, if this is a reference
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .and_then(|r| r.strip_prefix(DEFINITIONS_PREFIX))
    }

    pub fn is_array(&self) -> bool {
        self.schema_type.as_deref() == Some("array")
    }
}

/// Model with every property in one map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FlatModel {
    /// Data type, always `object`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Property name => schema
    #[serde(skip_serializing_if = "IndexMap::is_empty", default)]
    pub properties: IndexMap<String, Property>,

    /// Required property names
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub required: Vec<String>,

    /// Discriminator property identifying the concrete subtype
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

impl FlatModel {
    pub fn new() -> Self {
        Self {
            schema_type: Some("object".to_string()),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: &str, property: Property) -> Self {
        self.properties.insert(name.to_string(), property);
        self
    }

    pub fn require(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_string());
        }
    }
}

/// Parent reference plus the subtype's own properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedModel {
    /// Parent model reference
    pub parent: Property,

    /// Further composed bases (annotated interfaces)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub interfaces: Vec<Property>,

    /// Properties declared on the subtype only
    pub child: FlatModel,
}

/// Resolved description of one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelDefinition {
    Flat(FlatModel),
    Composed(ComposedModel),
}

impl ModelDefinition {
    /// Properties of a flat model, or the child properties of a composed one
    pub fn properties(&self) -> &IndexMap<String, Property> {
        match self {
            ModelDefinition::Flat(model) => &model.properties,
            ModelDefinition::Composed(model) => &model.child.properties,
        }
    }

    pub fn is_composed(&self) -> bool {
        matches!(self, ModelDefinition::Composed(_))
    }

    /// Name of the parent model of a composed definition
    pub fn parent(&self) -> Option<&str> {
        match self {
            ModelDefinition::Composed(model) => model.parent.ref_name(),
            ModelDefinition::Flat(_) => None,
        }
    }

    pub fn discriminator(&self) -> Option<&str> {
        match self {
            ModelDefinition::Flat(model) => model.discriminator.as_deref(),
            ModelDefinition::Composed(model) => model.child.discriminator.as_deref(),
        }
    }
}

/// Tag for grouping operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            external_docs: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// External documentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PathItem {
    /// Operation bound to a verb
    pub fn operation(&self, verb: &str) -> Option<&Operation> {
        match verb.to_uppercase().as_str() {
            "GET" => self.get.as_ref(),
            "PUT" => self.put.as_ref(),
            "POST" => self.post.as_ref(),
            "DELETE" => self.delete.as_ref(),
            "OPTIONS" => self.options.as_ref(),
            "HEAD" => self.head.as_ref(),
            "PATCH" => self.patch.as_ref(),
            _ => None,
        }
    }

    fn slot(&mut self, verb: &str) -> Option<&mut Option<Operation>> {
        match verb.to_uppercase().as_str() {
            "GET" => Some(&mut self.get),
            "PUT" => Some(&mut self.put),
            "POST" => Some(&mut self.post),
            "DELETE" => Some(&mut self.delete),
            "OPTIONS" => Some(&mut self.options),
            "HEAD" => Some(&mut self.head),
            "PATCH" => Some(&mut self.patch),
            _ => None,
        }
    }

    /// Bind an operation to a free verb slot; returns false if the slot is taken
    pub fn set_operation(&mut self, verb: &str, operation: Operation) -> bool {
        match self.slot(verb) {
            Some(slot) if slot.is_none() => {
                *slot = Some(operation);
                true
            }
            _ => false,
        }
    }

    /// Every bound operation with its verb
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("GET", &self.get),
            ("PUT", &self.put),
            ("POST", &self.post),
            ("DELETE", &self.delete),
            ("OPTIONS", &self.options),
            ("HEAD", &self.head),
            ("PATCH", &self.patch),
        ]
        .into_iter()
        .filter_map(|(verb, op)| op.as_ref().map(|op| (verb, op)))
        .collect()
    }
}

impl Default for ApiDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self {
            swagger: "2.0".to_string(),
            base_path: None,
            consumes: Vec::new(),
            produces: Vec::new(),
            tags: Vec::new(),
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }

    /// No tags and no paths
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.paths.is_empty()
    }

    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Add a tag unless one with the same name exists; existing metadata is kept
    pub fn add_tag(&mut self, tag: Tag) -> bool {
        if self.tag(&tag.name).is_some() {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn path(&self, path: &str) -> Option<&PathItem> {
        self.paths.get(path)
    }

    pub fn definition(&self, name: &str) -> Option<&ModelDefinition> {
        self.definitions.get(name)
    }

    /// Every operation with its path and verb
    pub fn operations(&self) -> Vec<(&str, &'static str, &Operation)> {
        self.paths
            .iter()
            .flat_map(|(path, item)| {
                item.operations()
                    .into_iter()
                    .map(move |(verb, op)| (path.as_str(), verb, op))
            })
            .collect()
    }
}
