/*!
Model resolution.

Maps type references to properties and registers a named [`ModelDefinition`]
for every object type reached. Inheritance is represented one of two ways:

- a supertype carrying `JsonTypeInfo` that is also referenced directly by an
  operation of the run becomes its own flat model, and each subtype becomes a
  composed model (parent reference plus only the subtype's own properties);
- any other supertype is merged into the subtype's flat model.

Definitions created while resolving one operation are staged and only handed
to the reader once that operation succeeds.
*/

use crate::{
    annotations::{self, keys},
    error::{ApiDocError, ApiDocResult, ReadWarning},
    extensions::ExtensionChain,
    metadata::{Annotated, Bindings, Member, Primitive, TypeDescriptor, TypeKind, TypeRef, TypeRegistry},
    specification::{ComposedModel, FlatModel, ModelDefinition, Property},
};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Configuration for model resolution
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// Include `ApiModelProperty(example)` values
    pub include_examples: bool,
    /// Named types documented as primitives instead of models
    pub type_mappings: HashMap<String, Primitive>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            include_examples: true,
            type_mappings: HashMap::new(),
        }
    }
}

impl SchemaConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set example inclusion
    pub fn with_examples(mut self, include: bool) -> Self {
        self.include_examples = include;
        self
    }

    /// Document a named type as a primitive
    pub fn with_type_mapping(mut self, type_name: &str, primitive: Primitive) -> Self {
        self.type_mappings.insert(type_name.to_string(), primitive);
        self
    }
}

/// Cached inheritance decision for one type
#[derive(Debug, Clone, PartialEq)]
enum ModelShape {
    /// All own and inherited properties in one map
    Flat { discriminator: Option<String> },
    /// Parent first, then further composed bases
    Composed { bases: Vec<String> },
}

/// Model resolver for one reader
pub struct ModelResolver<'a> {
    registry: &'a TypeRegistry,
    extensions: ExtensionChain,
    config: SchemaConfig,
    /// Names already handed to the reader
    known: HashSet<String>,
    /// Definitions created for the operation being resolved
    staged: IndexMap<String, ModelDefinition>,
    in_progress: HashSet<String>,
    /// Types referenced directly by operations
    direct_refs: HashSet<String>,
    shapes: HashMap<String, ModelShape>,
    warnings: Vec<ReadWarning>,
}

impl<'a> ModelResolver<'a> {
    /// Create a new model resolver
    pub fn new(registry: &'a TypeRegistry, extensions: ExtensionChain, config: SchemaConfig) -> Self {
        Self {
            registry,
            extensions,
            config,
            known: HashSet::new(),
            staged: IndexMap::new(),
            in_progress: HashSet::new(),
            direct_refs: HashSet::new(),
            shapes: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Treat already existing definitions as resolved
    pub fn with_known<I: IntoIterator<Item = String>>(mut self, names: I) -> Self {
        self.known.extend(names);
        self
    }

    /// Record types that operations reference directly
    pub fn add_direct_refs<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.direct_refs.len();
        self.direct_refs.extend(names.into_iter().map(Into::into));
        if self.direct_refs.len() != before {
            self.shapes.clear();
        }
    }

    pub fn is_direct_ref(&self, name: &str) -> bool {
        self.direct_refs.contains(name)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name) || self.staged.contains_key(name)
    }

    /// Hand over the staged definitions of a successful operation
    pub fn commit(&mut self) -> IndexMap<String, ModelDefinition> {
        let staged = std::mem::take(&mut self.staged);
        self.known.extend(staged.keys().cloned());
        staged
    }

    /// Forget the staged definitions of a failed operation
    pub fn rollback(&mut self) {
        if !self.staged.is_empty() {
            tracing::debug!("Discarding {} staged model definitions", self.staged.len());
        }
        self.staged.clear();
        self.in_progress.clear();
    }

    pub fn take_warnings(&mut self) -> Vec<ReadWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Resolve a type reference; `None` means the type carries no schema
    pub fn resolve(&mut self, type_ref: &TypeRef) -> ApiDocResult<Option<Property>> {
        match type_ref {
            TypeRef::Void | TypeRef::Opaque(_) => Ok(None),
            TypeRef::Primitive(p) => Ok(Some(Property::primitive(*p))),
            TypeRef::Param(_) => Ok(Some(Property::object())),
            TypeRef::Collection(inner) | TypeRef::Array(inner) => {
                let items = self.resolve(inner)?.unwrap_or_else(Property::object);
                Ok(Some(Property::array(items)))
            }
            TypeRef::Map(inner) => {
                let values = self.resolve(inner)?.unwrap_or_else(Property::object);
                Ok(Some(Property::map(values)))
            }
            TypeRef::Named { name, args } => self.resolve_named(name, args).map(Some),
        }
    }

    fn resolve_named(&mut self, name: &str, args: &[TypeRef]) -> ApiDocResult<Property> {
        if let Some(primitive) = self.config.type_mappings.get(name) {
            return Ok(Property::primitive(*primitive));
        }
        let registry = self.registry;
        let Some(descriptor) = registry.get(name) else {
            self.warnings
                .push(ReadWarning::new(name, ApiDocError::UnknownType(name.to_string())));
            return Ok(Property::object());
        };

        match &descriptor.kind {
            TypeKind::Enum => Ok(Property::string_enum(&descriptor.enum_values)),
            TypeKind::Primitive(p) => Ok(Property::primitive(*p)),
            TypeKind::Collection(element) | TypeKind::Array(element) => {
                let element = element.substitute(&descriptor.bindings(args));
                let items = self.resolve(&element)?.unwrap_or_else(Property::object);
                Ok(Property::array(items))
            }
            _ => {
                let model_name = model_name(name, args);
                self.ensure_model(descriptor, &descriptor.bindings(args), &model_name)?;
                Ok(Property::reference(&model_name))
            }
        }
    }

    fn ensure_model(
        &mut self,
        descriptor: &'a TypeDescriptor,
        bindings: &Bindings,
        model_name: &str,
    ) -> ApiDocResult<()> {
        if self.is_known(model_name) || self.in_progress.contains(model_name) {
            return Ok(());
        }
        tracing::trace!("Resolving model {}", model_name);
        self.in_progress.insert(model_name.to_string());
        let result = self.build_model(descriptor, bindings);
        self.in_progress.remove(model_name);

        let definition = result?;
        self.staged.insert(model_name.to_string(), definition);
        Ok(())
    }

    fn build_model(
        &mut self,
        descriptor: &'a TypeDescriptor,
        bindings: &Bindings,
    ) -> ApiDocResult<ModelDefinition> {
        match self.shape(descriptor) {
            ModelShape::Flat { discriminator } => {
                let members = self.collect_members(descriptor, bindings, &HashSet::new())?;
                let mut model = self.flat_model(descriptor, &members)?;
                if let Some(property) = discriminator {
                    if !model.properties.contains_key(&property) {
                        model.properties.insert(property.clone(), Property::string());
                    }
                    model.require(&property);
                    model.discriminator = Some(property);
                }
                Ok(ModelDefinition::Flat(model))
            }
            ModelShape::Composed { bases } => {
                let mut references = Vec::with_capacity(bases.len());
                let mut excluded: HashSet<String> = HashSet::new();
                let registry = self.registry;
                for base_name in &bases {
                    if let Some(base) = registry.get(base_name) {
                        self.ensure_model(base, &Bindings::new(), base_name)?;
                        excluded.extend(registry.members(base).into_iter().map(|m| m.name));
                        if let Some(discriminator) = base.discriminator() {
                            excluded.insert(discriminator.to_string());
                        }
                    }
                    references.push(Property::reference(base_name));
                }

                let stop: HashSet<String> = bases.iter().cloned().collect();
                let mut members = self.collect_members(descriptor, bindings, &stop)?;
                members.retain(|name, _| !excluded.contains(name));
                let child = self.flat_model(descriptor, &members)?;

                let parent = references.remove(0);
                Ok(ModelDefinition::Composed(ComposedModel {
                    parent,
                    interfaces: references,
                    child,
                }))
            }
        }
    }

    /// Decide, once per type, how its inheritance is represented
    fn shape(&mut self, descriptor: &TypeDescriptor) -> ModelShape {
        if let Some(shape) = self.shapes.get(&descriptor.name) {
            return shape.clone();
        }

        let registry = self.registry;
        let ancestors = registry.ancestors(descriptor);
        let candidates: Vec<&TypeDescriptor> = ancestors
            .iter()
            .copied()
            .filter(|a| a.discriminator().is_some() && self.direct_refs.contains(&a.name))
            .collect();
        // Keep the nearest composed bases only
        let bases: Vec<String> = candidates
            .iter()
            .filter(|candidate| {
                !candidates.iter().any(|other| {
                    other.name != candidate.name
                        && registry
                            .ancestors(other)
                            .iter()
                            .any(|a| a.name == candidate.name)
                })
            })
            .map(|c| c.name.clone())
            .collect();

        let shape = if bases.is_empty() {
            ModelShape::Flat {
                discriminator: self.effective_discriminator(descriptor, &ancestors),
            }
        } else {
            if let Some(own) = descriptor.discriminator() {
                self.check_discriminator(descriptor, own, &ancestors);
            }
            ModelShape::Composed { bases }
        };
        tracing::debug!("Model shape of {}: {:?}", descriptor.name, shape);
        self.shapes.insert(descriptor.name.clone(), shape.clone());
        shape
    }

    fn effective_discriminator(
        &mut self,
        descriptor: &TypeDescriptor,
        ancestors: &[&TypeDescriptor],
    ) -> Option<String> {
        let inherited = ancestors.iter().find_map(|a| a.discriminator());
        match (descriptor.discriminator(), inherited) {
            (Some(own), Some(_)) => Some(self.check_discriminator(descriptor, own, ancestors)),
            (Some(own), None) => Some(own.to_string()),
            (None, inherited) => inherited.map(str::to_string),
        }
    }

    /// The nearest base's discriminator wins over a conflicting redeclaration
    fn check_discriminator(
        &mut self,
        descriptor: &TypeDescriptor,
        own: &str,
        ancestors: &[&TypeDescriptor],
    ) -> String {
        let Some(base) = ancestors.iter().find(|a| a.discriminator().is_some()) else {
            return own.to_string();
        };
        let inherited = base.discriminator().unwrap_or(own);
        if inherited != own {
            tracing::warn!(
                "{} declares discriminator '{}' but {} declares '{}'",
                descriptor.name,
                own,
                base.name,
                inherited
            );
            self.warnings.push(ReadWarning::new(
                &descriptor.name,
                ApiDocError::malformed(
                    &descriptor.name,
                    format!(
                        "discriminator '{}' conflicts with '{}' declared by {}",
                        own, inherited, base.name
                    ),
                ),
            ));
        }
        inherited.to_string()
    }

    /// Own then inherited members, stopping at composed bases.
    ///
    /// The most derived declaration of a name wins; two supertypes that
    /// contribute the same name with different types are a conflict.
    fn collect_members(
        &mut self,
        descriptor: &TypeDescriptor,
        bindings: &Bindings,
        stop: &HashSet<String>,
    ) -> ApiDocResult<IndexMap<String, Member>> {
        let mut visiting = vec![descriptor.name.clone()];
        self.collect_members_inner(descriptor, bindings, stop, &mut visiting)
    }

    fn collect_members_inner(
        &mut self,
        descriptor: &TypeDescriptor,
        bindings: &Bindings,
        stop: &HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> ApiDocResult<IndexMap<String, Member>> {
        let mut own: IndexMap<String, Member> = IndexMap::new();
        for member in &descriptor.members {
            let mut member = member.clone();
            member.type_ref = member.type_ref.substitute(bindings);
            member.declared_by = descriptor.name.clone();
            member.inherited = false;
            own.entry(member.name.clone()).or_insert(member);
        }

        let registry = self.registry;
        let mut inherited: IndexMap<String, Member> = IndexMap::new();
        for (parent, parent_bindings) in registry.supertypes(descriptor) {
            if stop.contains(&parent.name) {
                continue;
            }
            if visiting.contains(&parent.name) {
                self.warnings.push(ReadWarning::new(
                    &descriptor.name,
                    ApiDocError::malformed(
                        &descriptor.name,
                        format!("cyclic supertype {} ignored", parent.name),
                    ),
                ));
                continue;
            }
            let parent_bindings: Bindings = parent_bindings
                .into_iter()
                .map(|(k, v)| (k, v.substitute(bindings)))
                .collect();

            visiting.push(parent.name.clone());
            let parent_members =
                self.collect_members_inner(parent, &parent_bindings, stop, visiting);
            visiting.pop();

            for (name, mut member) in parent_members? {
                if own.contains_key(&name) {
                    continue;
                }
                if let Some(existing) = inherited.get(&name) {
                    if existing.type_ref != member.type_ref {
                        return Err(ApiDocError::model_conflict(
                            &descriptor.name,
                            &name,
                            format!("{} ({})", existing.type_ref.display_name(), existing.declared_by),
                            format!("{} ({})", member.type_ref.display_name(), member.declared_by),
                        ));
                    }
                    continue;
                }
                member.inherited = true;
                inherited.insert(name, member);
            }
        }

        own.extend(inherited);
        Ok(own)
    }

    fn flat_model(
        &mut self,
        descriptor: &TypeDescriptor,
        members: &IndexMap<String, Member>,
    ) -> ApiDocResult<FlatModel> {
        let mut model = FlatModel::new();
        if let Some(doc) = descriptor.annotation(annotations::API_MODEL) {
            model.description = doc
                .str(keys::DESCRIPTION)
                .or_else(|| doc.str(keys::VALUE))
                .map(str::to_string);
        }

        for member in members.values() {
            if member.is_hidden() || member.has_annotation(annotations::JSON_IGNORE) {
                continue;
            }
            let doc = member.annotation(annotations::API_MODEL_PROPERTY);
            let name = member
                .annotation(annotations::JSON_PROPERTY)
                .and_then(|a| a.str(keys::VALUE))
                .or_else(|| doc.and_then(|d| d.str(keys::NAME)))
                .unwrap_or(member.name.as_str())
                .to_string();

            let extended = self.extensions.resolve_property(member, descriptor)?;
            let mut property = match extended {
                Some(property) => property,
                None => self.resolve(&member.type_ref)?.unwrap_or_else(Property::object),
            };

            if let Some(doc) = doc {
                if let Some(description) = doc.str(keys::VALUE) {
                    property.description = Some(description.to_string());
                }
                if self.config.include_examples {
                    property.example = doc.str(keys::EXAMPLE).map(|e| e.into());
                }
                if doc.bool(keys::READ_ONLY) == Some(true) {
                    property.read_only = Some(true);
                }
                if let Some(allowed) = doc.str(keys::ALLOWABLE_VALUES) {
                    property.enum_values = split_allowable(allowed);
                }
                if doc.bool(keys::REQUIRED) == Some(true) {
                    model.require(&name);
                }
            }
            model.properties.insert(name, property);
        }
        Ok(model)
    }
}

/// Registered name of a (possibly generic) named type
pub fn model_name(name: &str, args: &[TypeRef]) -> String {
    let mut out = name.to_string();
    for arg in args {
        out.push_str(&name_part(arg));
    }
    out
}

fn name_part(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Named { name, args } => model_name(name, args),
        TypeRef::Primitive(p) => format!("{:?}", p),
        TypeRef::Collection(inner) | TypeRef::Array(inner) => format!("ListOf{}", name_part(inner)),
        TypeRef::Map(inner) => format!("MapOf{}", name_part(inner)),
        TypeRef::Param(p) => p.clone(),
        TypeRef::Opaque(name) => name.clone(),
        TypeRef::Void => "Void".to_string(),
    }
}

/// `"a, b,c"` => `["a", "b", "c"]`
pub(crate) fn split_allowable(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Schema of a type without registering any model.
///
/// Used for non-body parameters, where named object types are documented as
/// strings.
pub fn inline_property(registry: &TypeRegistry, type_ref: &TypeRef) -> Property {
    match type_ref {
        TypeRef::Primitive(p) => Property::primitive(*p),
        TypeRef::Collection(inner) | TypeRef::Array(inner) => {
            Property::array(inline_property(registry, inner))
        }
        TypeRef::Map(inner) => Property::map(inline_property(registry, inner)),
        TypeRef::Named { name, .. } => match registry.get(name).map(|d| &d.kind) {
            Some(TypeKind::Enum) => registry
                .get(name)
                .map(|d| Property::string_enum(&d.enum_values))
                .unwrap_or_else(Property::string),
            Some(TypeKind::Primitive(p)) => Property::primitive(*p),
            Some(TypeKind::Collection(element)) | Some(TypeKind::Array(element)) => {
                Property::array(inline_property(registry, element))
            }
            _ => Property::string(),
        },
        TypeRef::Void | TypeRef::Param(_) | TypeRef::Opaque(_) => Property::object(),
    }
}
