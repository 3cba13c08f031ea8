#![allow(dead_code)]

use elif_apidoc::{
    annotations::{self, keys},
    Annotation, MethodDescriptor, ParamDescriptor, Primitive, TypeDescriptor, TypeRef, TypeRegistry,
};

pub fn api(tags: &[&str]) -> Annotation {
    Annotation::new(annotations::API).with(keys::TAGS, tags.to_vec())
}

pub fn path(value: &str) -> Annotation {
    Annotation::new(annotations::PATH).with_value(value)
}

pub fn type_info(property: &str) -> Annotation {
    Annotation::new(annotations::JSON_TYPE_INFO).with(keys::PROPERTY, property)
}

pub fn get(name: &str, returns: TypeRef) -> MethodDescriptor {
    MethodDescriptor::new(name, returns).with_annotation(Annotation::new("GET"))
}

pub fn get_at(name: &str, at: &str, returns: TypeRef) -> MethodDescriptor {
    get(name, returns).with_annotation(path(at))
}

pub fn resource(name: &str, at: &str, tags: &[&str]) -> TypeDescriptor {
    TypeDescriptor::class(name)
        .with_annotation(api(tags))
        .with_annotation(path(at))
}

/// Response hierarchy shared by the polymorphism tests
pub fn response_types() -> TypeRegistry {
    TypeRegistry::new()
        .with(
            TypeDescriptor::abstract_class("SomeResponseBaseClass")
                .with_annotation(type_info("type"))
                .with_annotation(
                    Annotation::new(annotations::JSON_SUB_TYPES)
                        .with_value(vec!["SomeResponseWithAbstractInheritance"]),
                )
                .with_property("inheritedProperty", TypeRef::string()),
        )
        .with(
            TypeDescriptor::class("SomeResponseWithAbstractInheritance")
                .extends(TypeRef::named("SomeResponseBaseClass"))
                .with_property("classProperty", TypeRef::string()),
        )
        .with(
            TypeDescriptor::interface("SomeResponseInterface")
                .with_annotation(type_info("type"))
                .with_property("inheritedProperty", TypeRef::string()),
        )
        .with(
            TypeDescriptor::class("SomeResponseWithInterfaceInheritance")
                .implements(TypeRef::named("SomeResponseInterface"))
                .with_property("classProperty", TypeRef::string())
                .with_property("inheritedProperty", TypeRef::string()),
        )
        .with(
            TypeDescriptor::class("SomeResponse")
                .with_annotation(type_info("type"))
                .with_property("classProperty", TypeRef::string()),
        )
        .with(
            TypeDescriptor::class("SomeOtherResponse")
                .with_annotation(type_info("type"))
                .with_property("classProperty", TypeRef::string()),
        )
}

/// Plain, hidden and unannotated resources plus the inheritance resource
pub fn registry() -> TypeRegistry {
    let mut registry = response_types();
    registry.register(
        resource("AnApi", "/apath", &["atag"])
            .with_method(get("getOperation", TypeRef::opaque("Response"))),
    );
    registry.register(
        TypeDescriptor::class("HiddenApi")
            .with_annotation(api(&["atag"]).with(keys::HIDDEN, true))
            .with_annotation(path("/hidden/path"))
            .with_method(get("getOperation", TypeRef::opaque("Response"))),
    );
    registry.register(
        TypeDescriptor::class("NotAnnotatedApi")
            .with_annotation(path("/apath"))
            .with_method(get("getOperation", TypeRef::opaque("Response"))),
    );
    registry.register(
        resource("AnApiWithInheritance", "/apath", &["atag"])
            .with_method(get_at(
                "getAbstract",
                "/abstract",
                TypeRef::named("SomeResponseWithAbstractInheritance"),
            ))
            .with_method(get_at("getBase", "/base", TypeRef::named("SomeResponseBaseClass")))
            .with_method(get_at(
                "getImplementation",
                "/implementation",
                TypeRef::named("SomeResponseWithInterfaceInheritance"),
            ))
            .with_method(get_at("getInterface", "/interface", TypeRef::named("SomeResponseInterface")))
            .with_method(get_at("getList", "/list", TypeRef::list(TypeRef::named("SomeResponse"))))
            .with_method(get_at(
                "getArray",
                "/array",
                TypeRef::array(TypeRef::named("SomeOtherResponse")),
            )),
    );
    registry.register(
        resource("SubtypeOnlyApi", "/subtype", &["subtype"])
            .with_method(get("getSubtype", TypeRef::named("SomeResponseWithAbstractInheritance"))),
    );
    registry.register(
        resource("BaseOnlyApi", "/base", &["base"])
            .with_method(get("getBase", TypeRef::named("SomeResponseBaseClass"))),
    );
    registry
}

/// Resource whose second operation returns a model with an irreconcilable member
pub fn conflicting_registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(TypeDescriptor::interface("HasId").with_property("id", TypeRef::string()))
        .with(TypeDescriptor::interface("HasNumericId").with_property("id", TypeRef::Primitive(Primitive::Int64)))
        .with(
            TypeDescriptor::class("Ambiguous")
                .implements(TypeRef::named("HasId"))
                .implements(TypeRef::named("HasNumericId"))
                .with_property("label", TypeRef::named("Label")),
        )
        .with(TypeDescriptor::class("Label").with_property("text", TypeRef::string()))
        .with(TypeDescriptor::class("Pet").with_property("name", TypeRef::string()))
        .with(
            resource("PetApi", "/pets", &["pets"])
                .with_method(get("listPets", TypeRef::list(TypeRef::named("Pet"))))
                .with_method(get_at("ambiguous", "/ambiguous", TypeRef::named("Ambiguous"))),
        )
}

/// Root resource delegating to a sub-resource through a locator
pub fn locator_registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(TypeDescriptor::class("Owner").with_property("name", TypeRef::string()))
        .with(
            TypeDescriptor::class("OwnerResource")
                .with_method(
                    get_at("getOwner", "/{ownerId}", TypeRef::named("Owner")).with_param(
                        ParamDescriptor::new("ownerId", TypeRef::Primitive(Primitive::Int64))
                            .with_annotation(Annotation::new(annotations::PATH_PARAM).with_value("ownerId")),
                    ),
                )
                .with_method(
                    MethodDescriptor::new("back", TypeRef::named("StoreApi"))
                        .with_annotation(path("/store")),
                ),
        )
        .with(
            resource("StoreApi", "/store", &["store"]).with_method(
                MethodDescriptor::new("owners", TypeRef::named("OwnerResource"))
                    .with_annotation(path("/owners")),
            ),
        )
}
