#[cfg(test)]
pub mod test_utils {
    use crate::{
        annotations::{self, keys},
        metadata::{Annotation, MethodDescriptor, TypeDescriptor, TypeRef, TypeRegistry},
    };

    fn api(tags: &[&str]) -> Annotation {
        Annotation::new(annotations::API).with(keys::TAGS, tags.to_vec())
    }

    fn path(value: &str) -> Annotation {
        Annotation::new(annotations::PATH).with_value(value)
    }

    fn type_info() -> Annotation {
        Annotation::new(annotations::JSON_TYPE_INFO).with(keys::PROPERTY, "type")
    }

    fn get(name: &str, returns: TypeRef) -> MethodDescriptor {
        MethodDescriptor::new(name, returns)
            .with_annotation(Annotation::new("GET"))
            .with_annotation(Annotation::new(annotations::API_OPERATION).with_value("Get operation"))
    }

    /// Plain, hidden and unannotated resources
    #[allow(dead_code)]
    pub fn api_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::class("AnApi")
                    .with_annotation(api(&["atag"]))
                    .with_annotation(path("/apath"))
                    .with_method(get("getOperation", TypeRef::opaque("Response"))),
            )
            .with(
                TypeDescriptor::class("HiddenApi")
                    .with_annotation(api(&["atag"]).with(keys::HIDDEN, true))
                    .with_annotation(path("/hidden/path"))
                    .with_method(get("getOperation", TypeRef::opaque("Response"))),
            )
            .with(
                TypeDescriptor::class("NotAnnotatedApi")
                    .with_annotation(path("/apath"))
                    .with_method(get("getOperation", TypeRef::opaque("Response"))),
            )
    }

    /// Polymorphic response hierarchy and a resource returning every member of it
    #[allow(dead_code)]
    pub fn inheritance_registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::abstract_class("SomeResponseBaseClass")
                    .with_annotation(type_info())
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
                    .with_annotation(type_info())
                    .with_annotation(
                        Annotation::new(annotations::JSON_SUB_TYPES)
                            .with_value(vec!["SomeResponseWithInterfaceInheritance"]),
                    )
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
                    .with_annotation(type_info())
                    .with_property("classProperty", TypeRef::string()),
            )
            .with(
                TypeDescriptor::class("SomeOtherResponse")
                    .with_annotation(type_info())
                    .with_property("classProperty", TypeRef::string()),
            )
            .with(
                TypeDescriptor::class("AnApiWithInheritance")
                    .with_annotation(api(&["atag"]))
                    .with_annotation(path("/apath"))
                    .with_method(
                        get("getAbstract", TypeRef::named("SomeResponseWithAbstractInheritance"))
                            .with_annotation(path("/abstract")),
                    )
                    .with_method(
                        get("getBase", TypeRef::named("SomeResponseBaseClass"))
                            .with_annotation(path("/base")),
                    )
                    .with_method(
                        get("getImplementation", TypeRef::named("SomeResponseWithInterfaceInheritance"))
                            .with_annotation(path("/implementation")),
                    )
                    .with_method(
                        get("getInterface", TypeRef::named("SomeResponseInterface"))
                            .with_annotation(path("/interface")),
                    )
                    .with_method(
                        get("getList", TypeRef::list(TypeRef::named("SomeResponse")))
                            .with_annotation(path("/list")),
                    )
                    .with_method(
                        get("getArray", TypeRef::array(TypeRef::named("SomeOtherResponse")))
                            .with_annotation(path("/array")),
                    ),
            )
    }
}
