/*!
Ordered chain of pluggable resolvers.

The chain is handed to each [`ApiReader`](crate::reader::ApiReader) explicitly
and stays fixed for the duration of a run. Handlers are consulted in
registration order; the first one that contributes ends the chain for that
resolution point, and any handler error fails the operation being resolved.
*/

use crate::{
    annotations::{self, keys},
    error::{ApiDocError, ApiDocResult},
    metadata::{Annotated, Member, MethodDescriptor, ParamDescriptor, TypeDescriptor, TypeRef, TypeRegistry},
    schema::inline_property,
    specification::{Parameter, ParameterLocation, Property},
};
use std::sync::Arc;

/// Result of one extension step
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionOutcome<T> {
    /// Continue with the next extension, then the default behavior
    NoOpinion,
    /// Terminal contribution for this resolution point
    Contribute(T),
}

/// Where a parameter is being resolved
#[derive(Debug, Clone, Copy)]
pub struct ParameterContext<'a> {
    pub registry: &'a TypeRegistry,
    /// Resource type being read
    pub resource: &'a TypeDescriptor,
    pub method: &'a MethodDescriptor,
    /// Resolved operation path
    pub path: &'a str,
}

/// Pluggable resolver consulted by the operation and model resolvers
pub trait ReaderExtension: Send + Sync {
    /// Name used in logs and failures
    fn name(&self) -> &'static str;

    /// Resolve one method parameter into zero or more documented parameters
    fn resolve_parameters(
        &self,
        _param: &ParamDescriptor,
        _ctx: &ParameterContext<'_>,
    ) -> ApiDocResult<ExtensionOutcome<Vec<Parameter>>> {
        Ok(ExtensionOutcome::NoOpinion)
    }

    /// Resolve the schema of one model member
    fn resolve_property(
        &self,
        _member: &Member,
        _owner: &TypeDescriptor,
    ) -> ApiDocResult<ExtensionOutcome<Property>> {
        Ok(ExtensionOutcome::NoOpinion)
    }
}

/// Ordered extension list
#[derive(Clone)]
pub struct ExtensionChain {
    extensions: Vec<Arc<dyn ReaderExtension>>,
}

impl Default for ExtensionChain {
    /// The built-in handler set
    fn default() -> Self {
        Self::new().add(BeanParamExtension)
    }
}

impl std::fmt::Debug for ExtensionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionChain")
            .field("extensions", &self.names())
            .finish()
    }
}

impl ExtensionChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Append an extension
    pub fn add<E: ReaderExtension + 'static>(mut self, extension: E) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Append a shared extension
    pub fn add_shared(mut self, extension: Arc<dyn ReaderExtension>) -> Self {
        self.extensions.push(extension);
        self
    }

    /// Swap the whole list, returning the previous one so it can be restored
    pub fn replace(&mut self, other: ExtensionChain) -> ExtensionChain {
        std::mem::replace(self, other)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Extension names in consultation order
    pub fn names(&self) -> Vec<&'static str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Consult the chain for a parameter; `None` means nobody had an opinion
    pub fn resolve_parameters(
        &self,
        param: &ParamDescriptor,
        ctx: &ParameterContext<'_>,
    ) -> ApiDocResult<Option<Vec<Parameter>>> {
        for extension in &self.extensions {
            let outcome = extension
                .resolve_parameters(param, ctx)
                .map_err(|e| wrap_failure(extension.name(), e))?;
            if let ExtensionOutcome::Contribute(parameters) = outcome {
                tracing::trace!(
                    "Extension {} resolved parameter {} of {}",
                    extension.name(),
                    param.name,
                    ctx.method.name
                );
                return Ok(Some(parameters));
            }
        }
        Ok(None)
    }

    /// Consult the chain for a member schema
    pub fn resolve_property(
        &self,
        member: &Member,
        owner: &TypeDescriptor,
    ) -> ApiDocResult<Option<Property>> {
        for extension in &self.extensions {
            let outcome = extension
                .resolve_property(member, owner)
                .map_err(|e| wrap_failure(extension.name(), e))?;
            if let ExtensionOutcome::Contribute(property) = outcome {
                return Ok(Some(property));
            }
        }
        Ok(None)
    }
}

fn wrap_failure(name: &str, error: ApiDocError) -> ApiDocError {
    match error {
        ApiDocError::ExtensionFailure { .. } => error,
        other => ApiDocError::extension_failure(name, other),
    }
}

/// Expands an aggregate (`BeanParam`) parameter into the parameters its members declare
#[derive(Debug, Clone, Copy, Default)]
pub struct BeanParamExtension;

impl BeanParamExtension {
    fn binding(member: &Member) -> Option<(ParameterLocation, String)> {
        let bindings = [
            (annotations::PATH_PARAM, ParameterLocation::Path),
            (annotations::QUERY_PARAM, ParameterLocation::Query),
            (annotations::HEADER_PARAM, ParameterLocation::Header),
            (annotations::FORM_PARAM, ParameterLocation::Form),
            (annotations::COOKIE_PARAM, ParameterLocation::Cookie),
        ];
        bindings.iter().find_map(|(name, location)| {
            member.annotation(name).map(|a| {
                let bound = a.str(keys::VALUE).unwrap_or(&member.name).to_string();
                (*location, bound)
            })
        })
    }
}

impl ReaderExtension for BeanParamExtension {
    fn name(&self) -> &'static str {
        "bean-param"
    }

    fn resolve_parameters(
        &self,
        param: &ParamDescriptor,
        ctx: &ParameterContext<'_>,
    ) -> ApiDocResult<ExtensionOutcome<Vec<Parameter>>> {
        if !param.has_annotation(annotations::BEAN_PARAM) {
            return Ok(ExtensionOutcome::NoOpinion);
        }
        let bean = match &param.type_ref {
            TypeRef::Named { name, .. } => ctx.registry.get(name),
            _ => None,
        };
        let Some(bean) = bean else {
            return Err(ApiDocError::malformed(
                &param.name,
                format!("aggregate parameter type {} is not registered", param.type_ref.display_name()),
            ));
        };

        let mut parameters = Vec::new();
        for member in ctx.registry.members(bean) {
            if member.is_hidden() {
                continue;
            }
            let Some((location, name)) = Self::binding(&member) else {
                continue;
            };
            let mut parameter = Parameter::new(&name, location)
                .with_schema(inline_property(ctx.registry, &member.type_ref));
            if let Some(doc) = member.annotation(annotations::API_PARAM) {
                parameter.description = doc.str(keys::VALUE).map(str::to_string);
                parameter = parameter.required(doc.bool(keys::REQUIRED).unwrap_or(false));
            }
            if let Some(default) = member.annotation(annotations::DEFAULT_VALUE) {
                parameter.default = default.str(keys::VALUE).map(|v| v.into());
            }
            parameters.push(parameter);
        }
        Ok(ExtensionOutcome::Contribute(parameters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Annotation, Primitive};

    struct Fixed(&'static str, Vec<Parameter>);

    impl ReaderExtension for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn resolve_parameters(
            &self,
            _param: &ParamDescriptor,
            _ctx: &ParameterContext<'_>,
        ) -> ApiDocResult<ExtensionOutcome<Vec<Parameter>>> {
            Ok(ExtensionOutcome::Contribute(self.1.clone()))
        }
    }

    struct Failing;

    impl ReaderExtension for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn resolve_parameters(
            &self,
            _param: &ParamDescriptor,
            _ctx: &ParameterContext<'_>,
        ) -> ApiDocResult<ExtensionOutcome<Vec<Parameter>>> {
            Err(ApiDocError::config_error("boom"))
        }
    }

    struct Silent;

    impl ReaderExtension for Silent {
        fn name(&self) -> &'static str {
            "silent"
        }
    }

    fn fixture() -> (TypeRegistry, TypeDescriptor, MethodDescriptor) {
        let registry = TypeRegistry::new().with(
            TypeDescriptor::class("Filter")
                .with_member(
                    Member::new("limit", TypeRef::Primitive(Primitive::Int32))
                        .with_annotation(Annotation::new(annotations::QUERY_PARAM).with_value("limit"))
                        .with_annotation(Annotation::new(annotations::DEFAULT_VALUE).with_value("10")),
                )
                .with_member(
                    Member::new("id", TypeRef::string())
                        .with_annotation(Annotation::new(annotations::PATH_PARAM)),
                )
                .with_property("scratch", TypeRef::string()),
        );
        let resource = TypeDescriptor::class("Pets");
        let method = MethodDescriptor::new("list", TypeRef::Void);
        (registry, resource, method)
    }

    #[test]
    fn test_first_contribution_wins() {
        let (registry, resource, method) = fixture();
        let ctx = ParameterContext { registry: &registry, resource: &resource, method: &method, path: "/" };
        let chain = ExtensionChain::new()
            .add(Silent)
            .add(Fixed("first", vec![Parameter::new("a", ParameterLocation::Query)]))
            .add(Fixed("second", vec![Parameter::new("b", ParameterLocation::Query)]));

        let param = ParamDescriptor::new("p", TypeRef::string());
        let resolved = chain.resolve_parameters(&param, &ctx).unwrap().unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].name, "a");
    }

    #[test]
    fn test_no_opinion_falls_through() {
        let (registry, resource, method) = fixture();
        let ctx = ParameterContext { registry: &registry, resource: &resource, method: &method, path: "/" };
        let chain = ExtensionChain::new().add(Silent);
        let param = ParamDescriptor::new("p", TypeRef::string());
        assert_eq!(chain.resolve_parameters(&param, &ctx).unwrap(), None);
    }

    #[test]
    fn test_failure_is_fatal_and_attributed() {
        let (registry, resource, method) = fixture();
        let ctx = ParameterContext { registry: &registry, resource: &resource, method: &method, path: "/" };
        let chain = ExtensionChain::new()
            .add(Failing)
            .add(Fixed("never", Vec::new()));
        let param = ParamDescriptor::new("p", TypeRef::string());
        let err = chain.resolve_parameters(&param, &ctx).unwrap_err();
        assert!(matches!(err, ApiDocError::ExtensionFailure { ref extension, .. } if extension == "failing"));
    }

    #[test]
    fn test_replace_returns_previous_chain() {
        let mut chain = ExtensionChain::default();
        assert_eq!(chain.names(), vec!["bean-param"]);

        let previous = chain.replace(ExtensionChain::new().add(Silent));
        assert_eq!(chain.names(), vec!["silent"]);

        chain.replace(previous);
        assert_eq!(chain.names(), vec!["bean-param"]);
    }

    #[test]
    fn test_bean_param_expansion() {
        let (registry, resource, method) = fixture();
        let ctx = ParameterContext { registry: &registry, resource: &resource, method: &method, path: "/pets/{id}" };
        let param = ParamDescriptor::new("filter", TypeRef::named("Filter"))
            .with_annotation(Annotation::new(annotations::BEAN_PARAM));

        let resolved = ExtensionChain::default()
            .resolve_parameters(&param, &ctx)
            .unwrap()
            .unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].name, "limit");
        assert_eq!(resolved[0].location, ParameterLocation::Query);
        assert_eq!(resolved[0].default, Some(serde_json::json!("10")));
        assert_eq!(resolved[1].name, "id");
        assert!(resolved[1].required);
    }

    #[test]
    fn test_bean_param_with_unknown_type_fails() {
        let (registry, resource, method) = fixture();
        let ctx = ParameterContext { registry: &registry, resource: &resource, method: &method, path: "/" };
        let param = ParamDescriptor::new("filter", TypeRef::named("Missing"))
            .with_annotation(Annotation::new(annotations::BEAN_PARAM));
        let err = ExtensionChain::default().resolve_parameters(&param, &ctx).unwrap_err();
        assert!(matches!(err, ApiDocError::ExtensionFailure { .. }));
    }
}
