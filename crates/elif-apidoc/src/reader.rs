use crate::{
    annotations::{self, keys},
    config::ReaderConfig,
    error::{ApiDocError, ApiDocResult, ReadWarning},
    extensions::ExtensionChain,
    metadata::{Annotated, TypeDescriptor, TypeRegistry},
    operation::{OperationResolver, ResourceScope},
    paths::PathNormalizer,
    schema::ModelResolver,
    specification::*,
};
use std::collections::{HashMap, HashSet};

/// Reads annotated resource types into an [`ApiDescription`]
pub struct ApiReader<'a> {
    registry: &'a TypeRegistry,
    /// Accumulated description
    description: ApiDescription,
    config: ReaderConfig,
    extensions: ExtensionChain,
    operations: OperationResolver<'a>,
    models: ModelResolver<'a>,
    outcomes: Vec<RootOutcome>,
    warnings: Vec<ReadWarning>,
}

/// Inputs biasing one read before any type is processed
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Path every root resource is nested under
    pub parent_path: String,
    /// Read hidden root types anyway
    pub include_hidden: bool,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    /// Tag metadata by tag name
    pub tags: HashMap<String, Tag>,
    /// Parameters prepended to every operation
    pub parameters: Vec<Parameter>,
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent_path(mut self, parent_path: &str) -> Self {
        self.parent_path = parent_path.to_string();
        self
    }

    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    pub fn with_media_types(mut self, consumes: &[&str], produces: &[&str]) -> Self {
        self.consumes = consumes.iter().map(|s| s.to_string()).collect();
        self.produces = produces.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag.name.clone(), tag);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

impl From<&ReaderConfig> for ReadOptions {
    fn from(config: &ReaderConfig) -> Self {
        Self {
            parent_path: config.parent_path.clone(),
            include_hidden: config.include_hidden,
            consumes: config.consumes.clone(),
            produces: config.produces.clone(),
            tags: config.tag_map(),
            parameters: config.parameters.clone(),
        }
    }
}

/// Why a root type was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionReason {
    /// No `Api` marker
    NotAnnotated,
    /// Hidden without the include-hidden override
    Hidden,
}

/// Outcome of reading one root type
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Intentionally not documented
    Excluded(ExclusionReason),
    /// Every operation was resolved
    Resolved { operations: usize },
    /// At least one operation failed; the others were kept
    Failed {
        operations: usize,
        errors: Vec<ApiDocError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RootOutcome {
    pub root: String,
    pub resolution: Resolution,
}

/// Final result of a reader
#[derive(Debug, Clone)]
pub struct ReadReport {
    pub description: ApiDescription,
    pub outcomes: Vec<RootOutcome>,
    pub warnings: Vec<ReadWarning>,
}

impl ReadReport {
    /// Outcome of a root by name, from its latest read
    pub fn outcome(&self, root: &str) -> Option<&Resolution> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| o.root == root)
            .map(|o| &o.resolution)
    }
}

/// Per-resource counters
#[derive(Default)]
struct ResourceTally {
    operations: usize,
    errors: Vec<ApiDocError>,
}

impl<'a> ApiReader<'a> {
    /// Create a new reader, extending `description` when one is supplied
    pub fn new(registry: &'a TypeRegistry, description: Option<ApiDescription>) -> ApiDocResult<Self> {
        let config = ReaderConfig::default();
        let extensions = ExtensionChain::default();
        let description = description.unwrap_or_default();
        let models = ModelResolver::new(registry, extensions.clone(), config.schema_config())
            .with_known(description.definitions.keys().cloned());

        Ok(Self {
            registry,
            operations: OperationResolver::new(registry, extensions.clone(), PathNormalizer::new()?),
            models,
            description,
            config,
            extensions,
            outcomes: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// Use a specific extension chain for every following read
    pub fn with_extensions(mut self, extensions: ExtensionChain) -> Self {
        self.extensions = extensions;
        self.rebuild_resolvers();
        self
    }

    /// Use a specific configuration for every following read
    pub fn with_config(mut self, config: ReaderConfig) -> Self {
        if self.description.base_path.is_none() {
            self.description.base_path = config.base_path.clone();
        }
        self.config = config;
        self.rebuild_resolvers();
        self
    }

    fn rebuild_resolvers(&mut self) {
        let paths = self.operations.paths().clone();
        self.operations = OperationResolver::new(self.registry, self.extensions.clone(), paths);
        self.models = ModelResolver::new(self.registry, self.extensions.clone(), self.config.schema_config())
            .with_known(self.description.definitions.keys().cloned());
    }

    pub fn extensions(&self) -> &ExtensionChain {
        &self.extensions
    }

    pub fn description(&self) -> &ApiDescription {
        &self.description
    }

    pub fn warnings(&self) -> &[ReadWarning] {
        &self.warnings
    }

    pub fn outcomes(&self) -> &[RootOutcome] {
        &self.outcomes
    }

    pub fn into_description(self) -> ApiDescription {
        self.description
    }

    pub fn into_report(self) -> ReadReport {
        ReadReport {
            description: self.description,
            outcomes: self.outcomes,
            warnings: self.warnings,
        }
    }

    /// Read root types with the configured defaults
    pub fn read(&mut self, roots: &[&TypeDescriptor]) -> &ApiDescription {
        let options = ReadOptions::from(&self.config);
        self.read_with(roots, &options)
    }

    /// Read registered root types by name
    pub fn read_named(&mut self, names: &[&str]) -> &ApiDescription {
        let registry = self.registry;
        let mut roots = Vec::with_capacity(names.len());
        for name in names {
            match registry.get(name) {
                Some(root) => roots.push(root),
                None => {
                    let error = ApiDocError::UnknownType(name.to_string());
                    self.warnings.push(ReadWarning::new(name, error.clone()));
                    self.outcomes.push(RootOutcome {
                        root: name.to_string(),
                        resolution: Resolution::Failed {
                            operations: 0,
                            errors: vec![error],
                        },
                    });
                }
            }
        }
        self.read(&roots)
    }

    /// Read root types with explicit options
    pub fn read_with(&mut self, roots: &[&TypeDescriptor], options: &ReadOptions) -> &ApiDescription {
        if self.description.consumes.is_empty() {
            self.description.consumes = options.consumes.clone();
        }
        if self.description.produces.is_empty() {
            self.description.produces = options.produces.clone();
        }

        // Polymorphic bases referenced by any operation of this read decide
        // model shapes, so they are collected before anything is resolved
        let mut direct = HashSet::new();
        for root in roots {
            if self.exclusion(root, options).is_none() {
                let mut visiting = vec![root.name.clone()];
                self.collect_direct_refs(root, options, &mut visiting, &mut direct);
            }
        }
        tracing::debug!("Types referenced directly by operations: {:?}", direct);
        self.models.add_direct_refs(direct);

        for root in roots {
            let resolution = self.read_root(root, options);
            tracing::debug!("Read {}: {:?}", root.name, resolution);
            self.outcomes.push(RootOutcome {
                root: root.name.clone(),
                resolution,
            });
        }
        &self.description
    }

    fn exclusion(&self, root: &TypeDescriptor, options: &ReadOptions) -> Option<ExclusionReason> {
        if !root.has_annotation(annotations::API) {
            Some(ExclusionReason::NotAnnotated)
        } else if root.is_hidden() && !options.include_hidden {
            Some(ExclusionReason::Hidden)
        } else {
            None
        }
    }

    fn collect_direct_refs(
        &self,
        resource: &TypeDescriptor,
        options: &ReadOptions,
        visiting: &mut Vec<String>,
        direct: &mut HashSet<String>,
    ) {
        for method in self.registry.methods(resource) {
            if method.is_hidden() {
                continue;
            }
            if let Some(target) = self.operations.locator_target(&method) {
                let skipped = target.is_hidden() && !options.include_hidden;
                if !skipped && !visiting.contains(&target.name) {
                    visiting.push(target.name.clone());
                    self.collect_direct_refs(target, options, visiting, direct);
                    visiting.pop();
                }
                continue;
            }
            if method.http_verb().is_some() {
                for type_ref in self.operations.referenced_types(&method) {
                    direct.extend(type_ref.named_types().into_iter().map(str::to_string));
                }
            }
        }
    }

    fn read_root(&mut self, root: &TypeDescriptor, options: &ReadOptions) -> Resolution {
        if let Some(reason) = self.exclusion(root, options) {
            return Resolution::Excluded(reason);
        }

        let tags = self.resource_tags(root, &[], options);
        let path = match root.annotation(annotations::PATH).and_then(|a| a.str(keys::VALUE)) {
            Some(path) => self.operations.paths().join(&options.parent_path, path),
            None => self.operations.paths().normalize(&options.parent_path),
        };
        let consumes = media_types(root, annotations::CONSUMES).unwrap_or_else(|| options.consumes.clone());
        let produces = media_types(root, annotations::PRODUCES).unwrap_or_else(|| options.produces.clone());

        let scope = ResourceScope::new(root, &path)
            .with_tags(tags)
            .with_media_types(consumes, produces)
            .with_parameters(&options.parameters)
            .hidden(root.is_hidden());

        let mut tally = ResourceTally::default();
        let mut visiting = vec![root.name.clone()];
        self.read_resource(&scope, options, &mut visiting, &mut tally);

        if tally.errors.is_empty() {
            Resolution::Resolved {
                operations: tally.operations,
            }
        } else {
            Resolution::Failed {
                operations: tally.operations,
                errors: tally.errors,
            }
        }
    }

    /// `Api(tags)` of a resource, registered on the description
    fn resource_tags(&mut self, resource: &TypeDescriptor, inherited: &[String], options: &ReadOptions) -> Vec<String> {
        let tags = resource
            .annotation(annotations::API)
            .map(|a| a.strings(keys::TAGS))
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| inherited.to_vec());
        for name in &tags {
            self.register_tag(name, options);
        }
        tags
    }

    fn register_tag(&mut self, name: &str, options: &ReadOptions) {
        let tag = options.tags.get(name).cloned().unwrap_or_else(|| Tag::new(name));
        self.description.add_tag(tag);
    }

    fn read_resource(
        &mut self,
        scope: &ResourceScope<'_>,
        options: &ReadOptions,
        visiting: &mut Vec<String>,
        tally: &mut ResourceTally,
    ) {
        let registry = self.registry;
        for method in registry.methods(scope.resource) {
            if method.is_hidden() {
                tracing::trace!("Skipping hidden method {}.{}", scope.resource.name, method.name);
                continue;
            }

            if let Some(target) = self.operations.locator_target(&method) {
                if target.is_hidden() && !options.include_hidden {
                    tracing::trace!("Skipping hidden sub-resource {} of {}", target.name, scope.resource.name);
                    continue;
                }
                if visiting.contains(&target.name) {
                    self.warnings.push(ReadWarning::new(
                        format!("{}.{}", scope.resource.name, method.name),
                        ApiDocError::malformed(&target.name, "cyclic sub-resource locator ignored"),
                    ));
                    continue;
                }
                let tags = self.resource_tags(target, &scope.tags, options);
                let consumes = media_types(target, annotations::CONSUMES).unwrap_or_else(|| scope.consumes.clone());
                let produces = media_types(target, annotations::PRODUCES).unwrap_or_else(|| scope.produces.clone());
                let sub_scope = ResourceScope::new(target, &self.operations.operation_path(&scope.path, &method))
                    .with_tags(tags)
                    .with_media_types(consumes, produces)
                    .with_parameters(scope.parameters)
                    .hidden(scope.hidden || target.is_hidden());

                tracing::debug!("Reading sub-resource {} at {}", target.name, sub_scope.path);
                visiting.push(target.name.clone());
                self.read_resource(&sub_scope, options, visiting, tally);
                visiting.pop();
                continue;
            }

            if method.http_verb().is_none() {
                continue;
            }

            let source = format!("{}.{}", scope.resource.name, method.name);
            match self.operations.resolve(scope, &method, &mut self.models) {
                Ok(resolved) => {
                    let mut operation = resolved.operation;
                    if operation.consumes == self.description.consumes {
                        operation.consumes.clear();
                    }
                    if operation.produces == self.description.produces {
                        operation.produces.clear();
                    }
                    let tags = operation.tags.clone();

                    let item = self.description.paths.entry(resolved.path.clone()).or_default();
                    if !item.set_operation(resolved.verb, operation) {
                        tracing::warn!("Duplicate operation {} {} from {}", resolved.verb, resolved.path, source);
                        self.warnings.push(ReadWarning::new(
                            &source,
                            ApiDocError::malformed(
                                &source,
                                format!("{} {} is already documented", resolved.verb, resolved.path),
                            ),
                        ));
                    } else {
                        for tag in &tags {
                            self.register_tag(tag, options);
                        }
                        tally.operations += 1;
                    }

                    for (name, definition) in self.models.commit() {
                        self.description.definitions.entry(name).or_insert(definition);
                    }
                }
                Err(error) => {
                    self.models.rollback();
                    tracing::warn!("Failed to resolve operation {}: {}", source, error);
                    self.warnings.push(ReadWarning::new(&source, error.clone()));
                    tally.errors.push(error);
                }
            }
            self.warnings.extend(self.models.take_warnings());
        }
    }
}

fn media_types(resource: &TypeDescriptor, annotation: &str) -> Option<Vec<String>> {
    resource
        .annotation(annotation)
        .map(|a| a.strings(keys::VALUE))
        .filter(|types| !types.is_empty())
}
