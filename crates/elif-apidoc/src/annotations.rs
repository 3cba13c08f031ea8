/*!
Well-known annotation names and attribute keys.

Annotations are matched by simple name, so `routing.GET` and `GET` are the
same annotation as far as the reader is concerned.
*/

use crate::metadata::Annotation;

/// Marks a type as an API root
pub const API: &str = "Api";
/// Operation documentation
pub const API_OPERATION: &str = "ApiOperation";
/// Parameter documentation
pub const API_PARAM: &str = "ApiParam";
/// Explicit response list
pub const API_RESPONSES: &str = "ApiResponses";
/// Single explicit response
pub const API_RESPONSE: &str = "ApiResponse";
/// Model property documentation
pub const API_MODEL_PROPERTY: &str = "ApiModelProperty";
/// Model documentation
pub const API_MODEL: &str = "ApiModel";
/// Standalone visibility marker
pub const HIDDEN: &str = "Hidden";

/// Path template
pub const PATH: &str = "Path";
/// Request media types
pub const CONSUMES: &str = "Consumes";
/// Response media types
pub const PRODUCES: &str = "Produces";
/// Deprecation marker
pub const DEPRECATED: &str = "Deprecated";

pub const PATH_PARAM: &str = "PathParam";
pub const QUERY_PARAM: &str = "QueryParam";
pub const HEADER_PARAM: &str = "HeaderParam";
pub const FORM_PARAM: &str = "FormParam";
pub const COOKIE_PARAM: &str = "CookieParam";
pub const BEAN_PARAM: &str = "BeanParam";
pub const DEFAULT_VALUE: &str = "DefaultValue";
/// Framework-injected parameter, never documented
pub const CONTEXT: &str = "Context";

/// Polymorphic base marker carrying the discriminator property name
pub const JSON_TYPE_INFO: &str = "JsonTypeInfo";
/// Subtype registry of a polymorphic base
pub const JSON_SUB_TYPES: &str = "JsonSubTypes";
/// Property rename
pub const JSON_PROPERTY: &str = "JsonProperty";
/// Property exclusion
pub const JSON_IGNORE: &str = "JsonIgnore";

/// HTTP verb annotations understood by the operation resolver
pub const HTTP_VERBS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Annotations whose `hidden` attribute controls visibility
const VISIBILITY: [&str; 5] = [API, API_OPERATION, API_PARAM, API_MODEL_PROPERTY, API_MODEL];

/// Common attribute keys
pub mod keys {
    pub const VALUE: &str = "value";
    pub const HIDDEN: &str = "hidden";
    pub const TAGS: &str = "tags";
    pub const NAME: &str = "name";
    pub const NOTES: &str = "notes";
    pub const NICKNAME: &str = "nickname";
    pub const CODE: &str = "code";
    pub const MESSAGE: &str = "message";
    pub const RESPONSE: &str = "response";
    pub const RESPONSE_CONTAINER: &str = "responseContainer";
    pub const REQUIRED: &str = "required";
    pub const EXAMPLE: &str = "example";
    pub const READ_ONLY: &str = "readOnly";
    pub const ALLOWABLE_VALUES: &str = "allowableValues";
    pub const PROPERTY: &str = "property";
    pub const DESCRIPTION: &str = "description";
}

/// Compare an annotation name against a well-known simple name
pub fn name_matches(actual: &str, expected: &str) -> bool {
    actual == expected || actual.rsplit('.').next() == Some(expected)
}

/// Find an annotation by simple name
pub fn find<'a>(annotations: &'a [Annotation], name: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|a| name_matches(&a.name, name))
}

/// True when an explicit visibility annotation hides the annotated element
pub fn is_hidden(annotations: &[Annotation]) -> bool {
    annotations.iter().any(|a| {
        if name_matches(&a.name, HIDDEN) {
            return a.bool(keys::VALUE).unwrap_or(true);
        }
        VISIBILITY.iter().any(|v| name_matches(&a.name, v)) && a.bool(keys::HIDDEN) == Some(true)
    })
}

/// HTTP verb carried by a set of annotations, if any
pub fn http_verb(annotations: &[Annotation]) -> Option<&'static str> {
    HTTP_VERBS
        .iter()
        .copied()
        .find(|verb| find(annotations, verb).is_some())
}
