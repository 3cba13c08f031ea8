/*!
Type metadata facade.

Discovery hands the reader a finite [`TypeRegistry`] of [`TypeDescriptor`]s.
Everything the resolvers know about a type (members, routed methods,
annotations, supertypes and generic parameters) is read through this module;
no host-language reflection is involved.
*/

use crate::annotations::{self, keys};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Generic parameter bindings (`T` => `User`)
pub type Bindings = HashMap<String, TypeRef>;

/// Structured annotation attribute value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    String(String),
    List(Vec<AnnotationValue>),
    Annotation(Annotation),
}

/// Metadata annotation attached to a type, member, method or parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name (simple or qualified)
    pub name: String,
    /// Attribute values by key
    #[serde(default)]
    pub values: IndexMap<String, AnnotationValue>,
}

impl Annotation {
    /// Create an annotation without attributes
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            values: IndexMap::new(),
        }
    }

    /// Set an attribute
    pub fn with<V: Into<AnnotationValue>>(mut self, key: &str, value: V) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Set the default `value` attribute
    pub fn with_value<V: Into<AnnotationValue>>(self, value: V) -> Self {
        self.with(keys::VALUE, value)
    }

    /// Raw attribute lookup; absent keys are `None`, never an error
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            AnnotationValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            AnnotationValue::Bool(b) => Some(*b),
            AnnotationValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            AnnotationValue::Int(i) => Some(*i),
            AnnotationValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// A string or list-of-strings attribute as a list, empty entries removed
    pub fn strings(&self, key: &str) -> Vec<String> {
        let mut out = Vec::new();
        match self.get(key) {
            Some(AnnotationValue::String(s)) => out.push(s.clone()),
            Some(AnnotationValue::List(items)) => {
                for item in items {
                    if let AnnotationValue::String(s) = item {
                        out.push(s.clone());
                    }
                }
            }
            _ => {}
        }
        out.retain(|s| !s.trim().is_empty());
        out
    }

    /// Nested annotations stored under a key
    pub fn annotations(&self, key: &str) -> Vec<&Annotation> {
        match self.get(key) {
            Some(AnnotationValue::Annotation(a)) => vec![a],
            Some(AnnotationValue::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    AnnotationValue::Annotation(a) => Some(a),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl From<bool> for AnnotationValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for AnnotationValue {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Annotation> for AnnotationValue {
    fn from(value: Annotation) -> Self {
        Self::Annotation(value)
    }
}

impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Anything that carries annotations
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];

    /// Annotation by simple name; unknown names are simply absent
    fn annotation(&self, name: &str) -> Option<&Annotation> {
        annotations::find(self.annotations(), name)
    }

    fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    fn is_hidden(&self) -> bool {
        annotations::is_hidden(self.annotations())
    }
}

/// Primitive schema types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    String,
    Boolean,
    Int32,
    Int64,
    Float,
    Double,
    Byte,
    Date,
    DateTime,
    Uuid,
    Object,
}

impl Primitive {
    /// Schema `(type, format)` pair
    pub fn schema_type(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Primitive::String => ("string", None),
            Primitive::Boolean => ("boolean", None),
            Primitive::Int32 => ("integer", Some("int32")),
            Primitive::Int64 => ("integer", Some("int64")),
            Primitive::Float => ("number", Some("float")),
            Primitive::Double => ("number", Some("double")),
            Primitive::Byte => ("string", Some("byte")),
            Primitive::Date => ("string", Some("date")),
            Primitive::DateTime => ("string", Some("date-time")),
            Primitive::Uuid => ("string", Some("uuid")),
            Primitive::Object => ("object", None),
        }
    }
}

/// Reference to a type as it appears in a signature
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// No value
    Void,
    Primitive(Primitive),
    /// Registered (or unknown) named type with generic arguments
    Named { name: String, args: Vec<TypeRef> },
    /// Unbound generic parameter
    Param(String),
    Collection(Box<TypeRef>),
    Array(Box<TypeRef>),
    /// String-keyed map of values
    Map(Box<TypeRef>),
    /// Raw framework object that is never documented
    Opaque(String),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        Self::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    pub fn generic(name: &str, args: Vec<TypeRef>) -> Self {
        Self::Named {
            name: name.to_string(),
            args,
        }
    }

    pub fn string() -> Self {
        Self::Primitive(Primitive::String)
    }

    pub fn list(inner: TypeRef) -> Self {
        Self::Collection(Box::new(inner))
    }

    pub fn array(inner: TypeRef) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn map(value: TypeRef) -> Self {
        Self::Map(Box::new(value))
    }

    pub fn opaque(name: &str) -> Self {
        Self::Opaque(name.to_string())
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Collection(_) | Self::Array(_))
    }

    /// Replace generic parameters with their bound types
    pub fn substitute(&self, bindings: &Bindings) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            TypeRef::Param(p) => bindings.get(p).cloned().unwrap_or_else(|| self.clone()),
            TypeRef::Named { name, args } => TypeRef::Named {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute(bindings)).collect(),
            },
            TypeRef::Collection(inner) => TypeRef::list(inner.substitute(bindings)),
            TypeRef::Array(inner) => TypeRef::array(inner.substitute(bindings)),
            TypeRef::Map(inner) => TypeRef::map(inner.substitute(bindings)),
            other => other.clone(),
        }
    }

    /// Named types this reference mentions, looking through wrappers and arguments
    pub fn named_types(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_named(&mut out);
        out
    }

    fn collect_named<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TypeRef::Named { name, args } => {
                out.push(name.as_str());
                for arg in args {
                    arg.collect_named(out);
                }
            }
            TypeRef::Collection(inner) | TypeRef::Array(inner) | TypeRef::Map(inner) => {
                inner.collect_named(out)
            }
            _ => {}
        }
    }

    /// Human readable name used in messages and generic model names
    pub fn display_name(&self) -> String {
        match self {
            TypeRef::Void => "void".to_string(),
            TypeRef::Primitive(p) => {
                let (ty, format) = p.schema_type();
                format.unwrap_or(ty).to_string()
            }
            TypeRef::Named { name, args } if args.is_empty() => name.clone(),
            TypeRef::Named { name, args } => format!(
                "{}<{}>",
                name,
                args.iter().map(|a| a.display_name()).collect::<Vec<_>>().join(", ")
            ),
            TypeRef::Param(p) => p.clone(),
            TypeRef::Collection(inner) => format!("List<{}>", inner.display_name()),
            TypeRef::Array(inner) => format!("{}[]", inner.display_name()),
            TypeRef::Map(inner) => format!("Map<string, {}>", inner.display_name()),
            TypeRef::Opaque(name) => name.clone(),
        }
    }
}

/// Kind of a registered type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    AbstractClass,
    Enum,
    /// Named alias of a primitive
    Primitive(Primitive),
    /// Named collection of an element type
    Collection(TypeRef),
    /// Named array of an element type
    Array(TypeRef),
}

/// Field- or accessor-like property of a type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Property name
    pub name: String,
    /// Declared type
    pub type_ref: TypeRef,
    /// Whether the member came from a supertype
    #[serde(default)]
    pub inherited: bool,
    /// Type that declares the member (filled in by the facade)
    #[serde(default)]
    pub declared_by: String,
    /// Annotations overriding visibility, name or serialization
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl Member {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            type_ref,
            inherited: false,
            declared_by: String::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for Member {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Method parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    pub type_ref: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ParamDescriptor {
    pub fn new(name: &str, type_ref: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            type_ref,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl Annotated for ParamDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Method of a type, routed or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
    pub return_type: TypeRef,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Type that declares the method (filled in by the facade)
    #[serde(default)]
    pub declared_by: String,
}

impl MethodDescriptor {
    pub fn new(name: &str, return_type: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
            return_type,
            annotations: Vec::new(),
            declared_by: String::new(),
        }
    }

    pub fn with_param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// HTTP verb from routing metadata
    pub fn http_verb(&self) -> Option<&'static str> {
        annotations::http_verb(&self.annotations)
    }

    /// Whether the method carries any routing metadata at all
    pub fn is_routed(&self) -> bool {
        self.http_verb().is_some() || self.has_annotation(annotations::PATH)
    }

    fn signature(&self) -> (String, usize) {
        (self.name.clone(), self.params.len())
    }
}

impl Annotated for MethodDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Immutable description of a reachable type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Simple name, unique within a registry
    pub name: String,
    /// Qualified name as reported by discovery
    #[serde(default)]
    pub qualified_name: String,
    pub kind: TypeKind,
    /// Generic parameter names
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub supertype: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Constants of an enum
    #[serde(default)]
    pub enum_values: Vec<String>,
}

impl TypeDescriptor {
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            qualified_name: name.to_string(),
            kind,
            type_params: Vec::new(),
            supertype: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            enum_values: Vec::new(),
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn abstract_class(name: &str) -> Self {
        Self::new(name, TypeKind::AbstractClass)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        let mut descriptor = Self::new(name, TypeKind::Enum);
        descriptor.enum_values = values.iter().map(|v| v.to_string()).collect();
        descriptor
    }

    pub fn with_qualified_name(mut self, qualified_name: &str) -> Self {
        self.qualified_name = qualified_name.to_string();
        self
    }

    pub fn with_type_param(mut self, param: &str) -> Self {
        self.type_params.push(param.to_string());
        self
    }

    pub fn extends(mut self, supertype: TypeRef) -> Self {
        self.supertype = Some(supertype);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// Shorthand for an unannotated member
    pub fn with_property(self, name: &str, type_ref: TypeRef) -> Self {
        self.with_member(Member::new(name, type_ref))
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Direct supertype references, superclass first
    pub fn supertype_refs(&self) -> impl Iterator<Item = &TypeRef> {
        self.supertype.iter().chain(self.interfaces.iter())
    }

    /// Discriminator property declared by `JsonTypeInfo`, if any
    pub fn discriminator(&self) -> Option<&str> {
        self.annotation(annotations::JSON_TYPE_INFO)
            .map(|a| a.str(keys::PROPERTY).unwrap_or("@type"))
    }

    /// Bind this type's generic parameters to concrete arguments
    pub fn bindings(&self, args: &[TypeRef]) -> Bindings {
        self.type_params
            .iter()
            .cloned()
            .zip(args.iter().cloned())
            .collect()
    }
}

impl Annotated for TypeDescriptor {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// The finite set of type descriptors a reader works on
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor, replacing one with the same name
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    /// Builder form of [`TypeRegistry::register`]
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// Annotation applied directly to a type
    pub fn annotation<'a>(&self, ty: &'a TypeDescriptor, name: &str) -> Option<&'a Annotation> {
        ty.annotation(name)
    }

    pub fn is_hidden(&self, ty: &TypeDescriptor) -> bool {
        ty.is_hidden()
    }

    /// Registered direct supertypes with their generic bindings, superclass first
    pub fn supertypes(&self, ty: &TypeDescriptor) -> Vec<(&TypeDescriptor, Bindings)> {
        ty.supertype_refs()
            .filter_map(|r| match r {
                TypeRef::Named { name, args } => self
                    .get(name)
                    .map(|descriptor| (descriptor, descriptor.bindings(args))),
                _ => None,
            })
            .collect()
    }

    /// Every registered ancestor, nearest first, each listed once
    pub fn ancestors(&self, ty: &TypeDescriptor) -> Vec<&TypeDescriptor> {
        let mut seen: HashSet<&str> = HashSet::from([ty.name.as_str()]);
        let mut queue: Vec<&TypeDescriptor> = vec![ty];
        let mut out = Vec::new();
        let mut index = 0;
        while index < queue.len() {
            let current = queue[index];
            index += 1;
            for (parent, _) in self.supertypes(current) {
                if seen.insert(parent.name.as_str()) {
                    queue.push(parent);
                    out.push(parent);
                }
            }
        }
        out
    }

    /// Declared then inherited members; the most derived declaration of a name wins
    pub fn members(&self, ty: &TypeDescriptor) -> Vec<Member> {
        let mut out: Vec<Member> = Vec::new();
        let mut names: HashSet<String> = HashSet::new();
        let owners = std::iter::once(ty).chain(self.ancestors(ty));
        for (depth, owner) in owners.enumerate() {
            for member in &owner.members {
                if names.insert(member.name.clone()) {
                    let mut member = member.clone();
                    member.inherited = depth > 0;
                    member.declared_by = owner.name.clone();
                    out.push(member);
                }
            }
        }
        out
    }

    /// Declared then inherited methods.
    ///
    /// An override that carries no routing metadata of its own picks up the
    /// annotations of the supertype method it overrides.
    pub fn methods(&self, ty: &TypeDescriptor) -> Vec<MethodDescriptor> {
        let mut out: Vec<MethodDescriptor> = Vec::new();
        let mut index: HashMap<(String, usize), usize> = HashMap::new();
        let owners = std::iter::once(ty).chain(self.ancestors(ty));
        for owner in owners {
            for method in &owner.methods {
                match index.get(&method.signature()) {
                    Some(&pos) => {
                        let existing = &mut out[pos];
                        if !existing.is_routed() && method.is_routed() {
                            for annotation in &method.annotations {
                                if !existing.has_annotation(&annotation.name) {
                                    existing.annotations.push(annotation.clone());
                                }
                            }
                            for (param, inherited) in
                                existing.params.iter_mut().zip(method.params.iter())
                            {
                                if param.annotations.is_empty() {
                                    param.annotations = inherited.annotations.clone();
                                }
                            }
                        }
                    }
                    None => {
                        let mut method = method.clone();
                        method.declared_by = owner.name.clone();
                        index.insert(method.signature(), out.len());
                        out.push(method);
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{API_OPERATION, PATH, PATH_PARAM};

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::interface("Named")
                    .with_property("name", TypeRef::string()),
            )
            .with(
                TypeDescriptor::abstract_class("Base")
                    .with_property("id", TypeRef::Primitive(Primitive::Int64))
                    .with_property("name", TypeRef::string()),
            )
            .with(
                TypeDescriptor::class("Child")
                    .extends(TypeRef::named("Base"))
                    .implements(TypeRef::named("Named"))
                    .with_property("name", TypeRef::string())
                    .with_property("age", TypeRef::Primitive(Primitive::Int32)),
            )
    }

    #[test]
    fn test_members_most_derived_wins() {
        let registry = registry();
        let child = registry.get("Child").unwrap();
        let members = registry.members(child);

        let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["name", "age", "id"]);
        assert!(!members[0].inherited);
        assert_eq!(members[0].declared_by, "Child");
        assert!(members[2].inherited);
        assert_eq!(members[2].declared_by, "Base");
    }

    #[test]
    fn test_ancestors_are_cycle_safe() {
        let registry = TypeRegistry::new()
            .with(TypeDescriptor::class("A").extends(TypeRef::named("B")))
            .with(TypeDescriptor::class("B").extends(TypeRef::named("A")));
        let a = registry.get("A").unwrap();
        let ancestors: Vec<&str> = registry.ancestors(a).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(ancestors, vec!["B"]);
    }

    #[test]
    fn test_unknown_annotation_is_absent() {
        let registry = registry();
        let child = registry.get("Child").unwrap();
        assert!(registry.annotation(child, "NoSuchAnnotation").is_none());
        assert!(!registry.is_hidden(child));
    }

    #[test]
    fn test_override_inherits_routing_annotations() {
        let registry = TypeRegistry::new()
            .with(
                TypeDescriptor::interface("PetResource").with_method(
                    MethodDescriptor::new("get", TypeRef::named("Pet"))
                        .with_annotation(Annotation::new("GET"))
                        .with_annotation(Annotation::new(PATH).with_value("/{id}"))
                        .with_param(
                            ParamDescriptor::new("id", TypeRef::string())
                                .with_annotation(Annotation::new(PATH_PARAM).with_value("id")),
                        ),
                ),
            )
            .with(
                TypeDescriptor::class("PetResourceImpl")
                    .implements(TypeRef::named("PetResource"))
                    .with_method(
                        MethodDescriptor::new("get", TypeRef::named("Pet"))
                            .with_annotation(Annotation::new(API_OPERATION).with_value("Find"))
                            .with_param(ParamDescriptor::new("id", TypeRef::string())),
                    ),
            );

        let ty = registry.get("PetResourceImpl").unwrap();
        let methods = registry.methods(ty);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].http_verb(), Some("GET"));
        assert_eq!(methods[0].declared_by, "PetResourceImpl");
        assert!(methods[0].has_annotation(API_OPERATION));
        assert!(methods[0].params[0].has_annotation(PATH_PARAM));
    }

    #[test]
    fn test_generic_substitution() {
        let bindings: Bindings = HashMap::from([("T".to_string(), TypeRef::named("User"))]);
        let field = TypeRef::list(TypeRef::Param("T".to_string()));
        assert_eq!(field.substitute(&bindings), TypeRef::list(TypeRef::named("User")));
        assert_eq!(
            TypeRef::generic("Page", vec![TypeRef::named("User")]).named_types(),
            vec!["Page", "User"]
        );
    }

    #[test]
    fn test_annotation_values() {
        let annotation = Annotation::new("Api")
            .with("tags", vec!["a", "", "b"])
            .with("hidden", "true")
            .with("position", 3);
        assert_eq!(annotation.strings("tags"), vec!["a", "b"]);
        assert_eq!(annotation.bool("hidden"), Some(true));
        assert_eq!(annotation.int("position"), Some(3));
        assert_eq!(annotation.str("missing"), None);
    }
}
