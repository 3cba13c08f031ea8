/*!
# elif-apidoc

Annotation-driven API description reader for elif.rs framework.

Given annotated resource types (supplied by a discovery collaborator as a
[`TypeRegistry`]), this crate resolves every routed method into an operation
and every request or response type reachable from those operations into a
named model definition.

## Features

- Path, verb, parameter and response resolution from routing annotations
- Flat or composed models for polymorphic hierarchies
- Ordered, per-reader extension chain for parameter and property resolution
- Consistent hidden-flag filtering for types, methods, parameters and members
- Per-operation failure attribution with a warning list per reader

## Usage

```rust,no_run
use elif_apidoc::{ApiReader, TypeRegistry};

let registry = TypeRegistry::new(); // Filled by discovery
let mut reader = ApiReader::new(&registry, None).unwrap();
reader.read_named(&["PetResource"]);
let report = reader.into_report();
```
*/

// Re-export main types
pub use crate::{
    config::ReaderConfig,
    error::{ApiDocError, ApiDocResult, ReadWarning, WarningLevel},
    extensions::{BeanParamExtension, ExtensionChain, ExtensionOutcome, ParameterContext, ReaderExtension},
    metadata::{Annotated, Annotation, AnnotationValue, Member, MethodDescriptor, ParamDescriptor, Primitive, TypeDescriptor, TypeKind, TypeRef, TypeRegistry},
    reader::{ApiReader, ExclusionReason, ReadOptions, ReadReport, Resolution, RootOutcome},
    schema::{ModelResolver, SchemaConfig},
    specification::{ApiDescription, ModelDefinition},
};

// Core modules
pub mod config;
pub mod error;
pub mod reader;
pub mod specification;

// Type metadata
pub mod annotations;
pub mod metadata;

// Resolution
pub mod extensions;
pub mod operation;
pub mod paths;
pub mod schema;

// Test utilities
#[cfg(test)]
mod test_utils;
