/*!
Operation resolution.

Turns one routed method of a resource into an [`Operation`]: path, verb,
documentation, parameters and responses. Parameter resolution goes through the
[`ExtensionChain`] first and falls back to the default binding rules; response
and body schemas go through the [`ModelResolver`].
*/

use crate::{
    annotations::{self, keys},
    error::{ApiDocError, ApiDocResult},
    extensions::{ExtensionChain, ParameterContext},
    metadata::{Annotated, Annotation, MethodDescriptor, ParamDescriptor, Primitive, TypeDescriptor, TypeKind, TypeRef, TypeRegistry},
    paths::PathNormalizer,
    schema::{inline_property, split_allowable, ModelResolver},
    specification::{status_description, Operation, Parameter, ParameterLocation, Property, Response},
};

/// Parameter binding annotations and their locations
const BINDINGS: [(&str, ParameterLocation); 5] = [
    (annotations::PATH_PARAM, ParameterLocation::Path),
    (annotations::QUERY_PARAM, ParameterLocation::Query),
    (annotations::HEADER_PARAM, ParameterLocation::Header),
    (annotations::FORM_PARAM, ParameterLocation::Form),
    (annotations::COOKIE_PARAM, ParameterLocation::Cookie),
];

/// Settings every operation of one resource inherits
#[derive(Debug, Clone)]
pub struct ResourceScope<'s> {
    /// Resource being read
    pub resource: &'s TypeDescriptor,
    /// Resource path joined with the parent path
    pub path: String,
    /// Tags applied when an operation declares none
    pub tags: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    /// Global parameters prepended to every operation
    pub parameters: &'s [Parameter],
    /// Resource is hidden and was read through the override
    pub hidden: bool,
}

impl<'s> ResourceScope<'s> {
    /// Create new resource scope
    pub fn new(resource: &'s TypeDescriptor, path: &str) -> Self {
        Self {
            resource,
            path: path.to_string(),
            tags: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            parameters: &[],
            hidden: false,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_media_types(mut self, consumes: Vec<String>, produces: Vec<String>) -> Self {
        self.consumes = consumes;
        self.produces = produces;
        self
    }

    pub fn with_parameters(mut self, parameters: &'s [Parameter]) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Operation bound to its path and verb
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOperation {
    pub path: String,
    pub verb: &'static str,
    pub operation: Operation,
}

/// Resolves routed methods into operations
pub struct OperationResolver<'a> {
    registry: &'a TypeRegistry,
    extensions: ExtensionChain,
    paths: PathNormalizer,
}

impl<'a> OperationResolver<'a> {
    /// Create new operation resolver
    pub fn new(registry: &'a TypeRegistry, extensions: ExtensionChain, paths: PathNormalizer) -> Self {
        Self {
            registry,
            extensions,
            paths,
        }
    }

    pub fn paths(&self) -> &PathNormalizer {
        &self.paths
    }

    /// Full path of a method within its resource
    pub fn operation_path(&self, resource_path: &str, method: &MethodDescriptor) -> String {
        match method.annotation(annotations::PATH).and_then(|a| a.str(keys::VALUE)) {
            Some(path) => self.paths.join(resource_path, path),
            None => self.paths.normalize(resource_path),
        }
    }

    /// Registered resource a sub-resource locator hands off to
    pub fn locator_target(&self, method: &MethodDescriptor) -> Option<&'a TypeDescriptor> {
        if method.http_verb().is_some() || !method.has_annotation(annotations::PATH) {
            return None;
        }
        match &method.return_type {
            TypeRef::Named { name, .. } => self
                .registry
                .get(name)
                .filter(|t| matches!(t.kind, TypeKind::Class | TypeKind::Interface | TypeKind::AbstractClass)),
            _ => None,
        }
    }

    /// Success payload type, honoring `ApiOperation(response, responseContainer)`
    pub fn response_type(&self, method: &MethodDescriptor) -> TypeRef {
        let doc = method.annotation(annotations::API_OPERATION);
        let payload = doc
            .and_then(|d| d.str(keys::RESPONSE))
            .map(|name| self.type_from_name(name))
            .unwrap_or_else(|| method.return_type.clone());
        match doc.and_then(|d| d.str(keys::RESPONSE_CONTAINER)) {
            Some(container) => wrap_container(container, payload),
            None => payload,
        }
    }

    /// Types an operation references itself: success payload, explicit
    /// responses and the request body
    pub fn referenced_types(&self, method: &MethodDescriptor) -> Vec<TypeRef> {
        let mut types = vec![self.response_type(method)];
        for response in explicit_responses(method) {
            if let Some(name) = response.str(keys::RESPONSE) {
                types.push(self.type_from_name(name));
            }
        }
        if let Some(body) = method.params.iter().find(|p| is_body(p)) {
            if !body.is_hidden() {
                types.push(body.type_ref.clone());
            }
        }
        types
    }

    /// Resolve a routed method into an operation
    pub fn resolve(
        &self,
        scope: &ResourceScope<'_>,
        method: &MethodDescriptor,
        models: &mut ModelResolver<'_>,
    ) -> ApiDocResult<ResolvedOperation> {
        let Some(verb) = method.http_verb() else {
            return Err(ApiDocError::malformed(
                format!("{}.{}", scope.resource.name, method.name),
                "method carries no HTTP verb",
            ));
        };
        let path = self.operation_path(&scope.path, method);
        tracing::debug!("Resolving operation {} {} ({}.{})", verb, path, scope.resource.name, method.name);

        let doc = method.annotation(annotations::API_OPERATION);
        let mut operation = Operation {
            summary: doc.and_then(|d| d.str(keys::VALUE)).map(str::to_string),
            description: doc.and_then(|d| d.str(keys::NOTES)).map(str::to_string),
            operation_id: Some(
                doc.and_then(|d| d.str(keys::NICKNAME))
                    .unwrap_or(method.name.as_str())
                    .to_string(),
            ),
            hidden: scope.hidden,
            ..Default::default()
        };

        let tags = doc.map(|d| d.strings(keys::TAGS)).unwrap_or_default();
        operation.tags = if tags.is_empty() { scope.tags.clone() } else { tags };

        operation.consumes = media_types(method, annotations::CONSUMES).unwrap_or_else(|| scope.consumes.clone());
        operation.produces = media_types(method, annotations::PRODUCES).unwrap_or_else(|| scope.produces.clone());

        if method.has_annotation(annotations::DEPRECATED) {
            operation.deprecated = Some(true);
        }

        operation.parameters = scope.parameters.to_vec();
        let ctx = ParameterContext {
            registry: self.registry,
            resource: scope.resource,
            method,
            path: &path,
        };
        let mut body_seen = false;
        for param in &method.params {
            if param.has_annotation(annotations::CONTEXT) {
                continue;
            }
            if let Some(parameters) = self.extensions.resolve_parameters(param, &ctx)? {
                operation.parameters.extend(parameters);
                continue;
            }
            if let Some(parameter) = self.default_parameter(param, &mut body_seen, models)? {
                operation.parameters.push(parameter);
            }
        }

        self.add_responses(&mut operation, method, models)?;

        Ok(ResolvedOperation {
            path,
            verb,
            operation,
        })
    }

    fn default_parameter(
        &self,
        param: &ParamDescriptor,
        body_seen: &mut bool,
        models: &mut ModelResolver<'_>,
    ) -> ApiDocResult<Option<Parameter>> {
        let doc = param.annotation(annotations::API_PARAM);
        if param.is_hidden() {
            // a hidden body still occupies the body slot
            if is_body(param) {
                *body_seen = true;
            }
            return Ok(None);
        }

        let binding = BINDINGS
            .iter()
            .find_map(|(name, location)| param.annotation(name).map(|a| (a, *location)));

        let mut parameter = match binding {
            Some((annotation, location)) => {
                let name = annotation.str(keys::VALUE).unwrap_or(param.name.as_str());
                let mut parameter = Parameter::new(name, location)
                    .with_schema(inline_property(self.registry, &param.type_ref));
                if location == ParameterLocation::Query && self.is_collection(&param.type_ref) {
                    parameter.collection_format = Some("multi".to_string());
                }
                parameter
            }
            None if is_body(param) => {
                if *body_seen {
                    tracing::debug!("Ignoring additional unannotated parameter {}", param.name);
                    return Ok(None);
                }
                *body_seen = true;
                let schema = models.resolve(&param.type_ref)?.unwrap_or_else(Property::object);
                let name = doc.and_then(|d| d.str(keys::NAME)).unwrap_or("body");
                Parameter::new(name, ParameterLocation::Body).with_schema(schema)
            }
            None => return Ok(None),
        };

        if let Some(doc) = doc {
            parameter.description = doc.str(keys::VALUE).map(str::to_string);
            parameter = parameter.required(doc.bool(keys::REQUIRED).unwrap_or(false));
            if let (Some(allowed), Some(schema)) = (doc.str(keys::ALLOWABLE_VALUES), parameter.schema.as_mut()) {
                let values = split_allowable(allowed);
                match schema.items.as_mut() {
                    Some(items) => items.enum_values = values,
                    None => schema.enum_values = values,
                }
            }
        }
        if let Some(default) = param.annotation(annotations::DEFAULT_VALUE) {
            parameter.default = default.str(keys::VALUE).map(|v| v.into());
        }
        Ok(Some(parameter))
    }

    fn add_responses(
        &self,
        operation: &mut Operation,
        method: &MethodDescriptor,
        models: &mut ModelResolver<'_>,
    ) -> ApiDocResult<()> {
        let success_code = method
            .annotation(annotations::API_OPERATION)
            .and_then(|d| d.int(keys::CODE))
            .unwrap_or(200)
            .to_string();
        let success_schema = models.resolve(&self.response_type(method))?;

        let explicit = explicit_responses(method);
        let explicit_success = explicit
            .iter()
            .any(|r| r.int(keys::CODE).map(|c| c.to_string()).as_deref() == Some(success_code.as_str()));
        if !explicit_success {
            operation.responses.insert(
                success_code.clone(),
                Response::new(status_description(&success_code)).with_schema(success_schema.clone()),
            );
        }

        for response in explicit {
            let Some(code) = response.int(keys::CODE).map(|c| c.to_string()) else {
                tracing::warn!("Ignoring response without status code on {}", method.name);
                continue;
            };
            let schema = match response.str(keys::RESPONSE) {
                Some(name) => models.resolve(&self.type_from_name(name))?,
                None if code == success_code => success_schema.clone(),
                None => None,
            };
            let description = response
                .str(keys::MESSAGE)
                .unwrap_or_else(|| status_description(&code));
            operation
                .responses
                .insert(code, Response::new(description).with_schema(schema));
        }
        Ok(())
    }

    fn is_collection(&self, type_ref: &TypeRef) -> bool {
        match type_ref {
            TypeRef::Collection(_) | TypeRef::Array(_) => true,
            TypeRef::Named { name, .. } => matches!(
                self.registry.get(name).map(|t| &t.kind),
                Some(TypeKind::Collection(_)) | Some(TypeKind::Array(_))
            ),
            _ => false,
        }
    }

    /// Type named by an annotation attribute
    fn type_from_name(&self, name: &str) -> TypeRef {
        if self.registry.contains(name) {
            return TypeRef::named(name);
        }
        let simple = name.rsplit('.').next().unwrap_or(name);
        match simple.to_lowercase().as_str() {
            "void" => TypeRef::Void,
            "string" => TypeRef::string(),
            "int" | "integer" => TypeRef::Primitive(Primitive::Int32),
            "long" => TypeRef::Primitive(Primitive::Int64),
            "boolean" | "bool" => TypeRef::Primitive(Primitive::Boolean),
            "float" => TypeRef::Primitive(Primitive::Float),
            "double" => TypeRef::Primitive(Primitive::Double),
            "response" => TypeRef::opaque(simple),
            _ => TypeRef::named(simple),
        }
    }
}

/// Unannotated, non-injected parameter
fn is_body(param: &ParamDescriptor) -> bool {
    !param.has_annotation(annotations::CONTEXT)
        && !param.has_annotation(annotations::BEAN_PARAM)
        && BINDINGS.iter().all(|(name, _)| !param.has_annotation(name))
}

/// `ApiResponses` entries followed by standalone `ApiResponse` annotations
fn explicit_responses(method: &MethodDescriptor) -> Vec<&Annotation> {
    let mut responses: Vec<&Annotation> = method
        .annotation(annotations::API_RESPONSES)
        .map(|list| list.annotations(keys::VALUE))
        .unwrap_or_default();
    responses.extend(
        method
            .annotations
            .iter()
            .filter(|a| annotations::name_matches(&a.name, annotations::API_RESPONSE)),
    );
    responses
}

fn media_types(method: &MethodDescriptor, annotation: &str) -> Option<Vec<String>> {
    method
        .annotation(annotation)
        .map(|a| a.strings(keys::VALUE))
        .filter(|types| !types.is_empty())
}

fn wrap_container(container: &str, payload: TypeRef) -> TypeRef {
    match container.to_lowercase().as_str() {
        "list" | "set" | "array" => TypeRef::list(payload),
        "map" => TypeRef::map(payload),
        _ => payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Member;
    use crate::schema::SchemaConfig;

    fn pet_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::class("Pet")
                    .with_property("id", TypeRef::Primitive(Primitive::Int64))
                    .with_property("name", TypeRef::string()),
            )
            .with(TypeDescriptor::class("ApiError").with_property("message", TypeRef::string()))
            .with(
                TypeDescriptor::class("PetFilter")
                    .with_member(
                        Member::new("owner", TypeRef::string())
                            .with_annotation(Annotation::new(annotations::HEADER_PARAM).with_value("X-Owner")),
                    ),
            )
            .with(TypeDescriptor::class("PetResource").with_annotation(Annotation::new(annotations::API)))
    }

    fn resolver(registry: &TypeRegistry) -> OperationResolver<'_> {
        OperationResolver::new(registry, ExtensionChain::default(), PathNormalizer::new().unwrap())
    }

    fn models(registry: &TypeRegistry) -> ModelResolver<'_> {
        ModelResolver::new(registry, ExtensionChain::default(), SchemaConfig::default())
    }

    fn find_pet() -> MethodDescriptor {
        MethodDescriptor::new("findPet", TypeRef::named("Pet"))
            .with_annotation(Annotation::new("GET"))
            .with_annotation(Annotation::new(annotations::PATH).with_value("/{id: [0-9]+}"))
            .with_annotation(
                Annotation::new(annotations::API_OPERATION)
                    .with_value("Find a pet")
                    .with(keys::NOTES, "Returns a single pet"),
            )
            .with_annotation(Annotation::new(annotations::API_RESPONSES).with_value(vec![
                Annotation::new(annotations::API_RESPONSE)
                    .with(keys::CODE, 404)
                    .with(keys::MESSAGE, "Pet not found")
                    .with(keys::RESPONSE, "ApiError"),
            ]))
            .with_param(
                ParamDescriptor::new("id", TypeRef::Primitive(Primitive::Int64))
                    .with_annotation(Annotation::new(annotations::PATH_PARAM).with_value("id")),
            )
            .with_param(
                ParamDescriptor::new("fields", TypeRef::list(TypeRef::string()))
                    .with_annotation(Annotation::new(annotations::QUERY_PARAM).with_value("fields"))
                    .with_annotation(
                        Annotation::new(annotations::API_PARAM)
                            .with_value("Fields to return")
                            .with(keys::ALLOWABLE_VALUES, "id, name"),
                    ),
            )
            .with_param(
                ParamDescriptor::new("request", TypeRef::opaque("HttpServletRequest"))
                    .with_annotation(Annotation::new(annotations::CONTEXT)),
            )
    }

    #[test]
    fn test_resolve_operation() {
        let registry = pet_registry();
        let operations = resolver(&registry);
        let mut models = models(&registry);
        let resource = registry.get("PetResource").unwrap();
        let scope = ResourceScope::new(resource, "/pets").with_tags(vec!["pets".to_string()]);

        let resolved = operations.resolve(&scope, &find_pet(), &mut models).unwrap();
        assert_eq!(resolved.path, "/pets/{id}");
        assert_eq!(resolved.verb, "GET");

        let operation = resolved.operation;
        assert_eq!(operation.summary.as_deref(), Some("Find a pet"));
        assert_eq!(operation.description.as_deref(), Some("Returns a single pet"));
        assert_eq!(operation.operation_id.as_deref(), Some("findPet"));
        assert_eq!(operation.tags, vec!["pets"]);

        assert_eq!(operation.parameters.len(), 2);
        let id = &operation.parameters[0];
        assert_eq!(id.location, ParameterLocation::Path);
        assert!(id.required);
        let fields = &operation.parameters[1];
        assert_eq!(fields.collection_format.as_deref(), Some("multi"));
        assert_eq!(fields.description.as_deref(), Some("Fields to return"));
        assert_eq!(fields.schema.as_ref().unwrap().items.as_ref().unwrap().enum_values, vec!["id", "name"]);

        let codes: Vec<&str> = operation.responses.keys().map(String::as_str).collect();
        assert_eq!(codes, vec!["200", "404"]);
        assert_eq!(operation.responses["200"].schema.as_ref().unwrap().ref_name(), Some("Pet"));
        assert_eq!(operation.responses["404"].description, "Pet not found");

        let staged = models.commit();
        assert!(staged.contains_key("Pet"));
        assert!(staged.contains_key("ApiError"));
    }

    #[test]
    fn test_body_bean_and_seeded_parameters() {
        let registry = pet_registry();
        let operations = resolver(&registry);
        let mut models = models(&registry);
        let resource = registry.get("PetResource").unwrap();
        let seeded = vec![Parameter::new("X-Api-Key", ParameterLocation::Header)];
        let scope = ResourceScope::new(resource, "/pets").with_parameters(&seeded);

        let method = MethodDescriptor::new("addPet", TypeRef::Void)
            .with_annotation(Annotation::new("POST"))
            .with_annotation(Annotation::new(annotations::DEPRECATED))
            .with_annotation(Annotation::new(annotations::CONSUMES).with_value(vec!["application/json"]))
            .with_param(ParamDescriptor::new("pet", TypeRef::named("Pet")))
            .with_param(ParamDescriptor::new("extra", TypeRef::string()))
            .with_param(
                ParamDescriptor::new("filter", TypeRef::named("PetFilter"))
                    .with_annotation(Annotation::new(annotations::BEAN_PARAM)),
            );

        let operation = operations.resolve(&scope, &method, &mut models).unwrap().operation;
        let names: Vec<&str> = operation.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["X-Api-Key", "body", "X-Owner"]);
        assert_eq!(operation.parameters[1].schema.as_ref().unwrap().ref_name(), Some("Pet"));
        assert_eq!(operation.deprecated, Some(true));
        assert_eq!(operation.consumes, vec!["application/json"]);
        assert!(operation.responses["200"].schema.is_none());
    }

    #[test]
    fn test_response_override_and_container() {
        let registry = pet_registry();
        let operations = resolver(&registry);
        let method = MethodDescriptor::new("list", TypeRef::opaque("Response"))
            .with_annotation(Annotation::new("GET"))
            .with_annotation(
                Annotation::new(annotations::API_OPERATION)
                    .with(keys::RESPONSE, "Pet")
                    .with(keys::RESPONSE_CONTAINER, "List")
                    .with(keys::CODE, 202),
            );

        assert_eq!(operations.response_type(&method), TypeRef::list(TypeRef::named("Pet")));
        let mut models = models(&registry);
        let resource = registry.get("PetResource").unwrap();
        let operation = operations
            .resolve(&ResourceScope::new(resource, "/pets"), &method, &mut models)
            .unwrap()
            .operation;
        let accepted = &operation.responses["202"];
        assert!(accepted.schema.as_ref().unwrap().is_array());
    }

    #[test]
    fn test_locator_and_referenced_types() {
        let registry = pet_registry();
        let operations = resolver(&registry);

        let locator = MethodDescriptor::new("pets", TypeRef::named("PetResource"))
            .with_annotation(Annotation::new(annotations::PATH).with_value("/pets"));
        assert_eq!(operations.locator_target(&locator).map(|t| t.name.as_str()), Some("PetResource"));
        assert!(operations.locator_target(&find_pet()).is_none());

        let referenced = operations.referenced_types(&find_pet());
        assert!(referenced.contains(&TypeRef::named("Pet")));
        assert!(referenced.contains(&TypeRef::named("ApiError")));
    }

    #[test]
    fn test_hidden_body_is_neither_documented_nor_referenced() {
        let registry = pet_registry();
        let operations = resolver(&registry);
        let mut models = models(&registry);
        let resource = registry.get("PetResource").unwrap();

        let method = MethodDescriptor::new("replacePet", TypeRef::Void)
            .with_annotation(Annotation::new("PUT"))
            .with_param(
                ParamDescriptor::new("pet", TypeRef::named("Pet"))
                    .with_annotation(Annotation::new(annotations::API_PARAM).with(keys::HIDDEN, true)),
            )
            .with_param(ParamDescriptor::new("note", TypeRef::string()));

        let referenced = operations.referenced_types(&method);
        assert_eq!(referenced, vec![TypeRef::Void]);

        let operation = operations
            .resolve(&ResourceScope::new(resource, "/pets"), &method, &mut models)
            .unwrap()
            .operation;
        assert!(operation.parameters.is_empty());
        assert!(!models.commit().contains_key("Pet"));
    }
}
