//! Integration tests for the metadata inspector.

use metarize::{prelude::*, MetadataTable, Result, CONSTRUCTOR};
use std::sync::Arc;

fn private_store() -> (Arc<TypeRegistry>, MetadataStore) {
    let registry = Arc::new(TypeRegistry::new());
    let store =
        MetadataStore::with_table(Arc::new(MetadataTable::new()), None, Some(registry.clone()));
    (registry, store)
}

/// Member enumeration covers inherited members, lets the subclass win and never lists the
/// constructor.
#[test]
fn test_member_enumeration() -> Result<()> {
    let (registry, store) = private_store();
    let base = registry
        .declare("Repository")
        .constructor(MethodDesign::new(vec![DesignType::Object], DesignType::Void))
        .method("find")
        .method("count")
        .property("table", DesignType::String)
        .build()?;
    let sub = registry
        .declare("UserRepository")
        .extends(base.token)
        .method("find")
        .method("findByEmail")
        .build()?;

    let doc: MetadataKey<String> = MetadataKey::new("doc");
    store.define(&doc, "ctor".to_string(), base.prototype(), Some(CONSTRUCTOR))?;
    store.define(&doc, "base find".to_string(), base.prototype(), Some("find"))?;
    store.define(&doc, "count".to_string(), base.prototype(), Some("count"))?;
    store.define(&doc, "table".to_string(), base.prototype(), Some("table"))?;
    store.define(&doc, "sub find".to_string(), sub.prototype(), Some("find"))?;
    store.define(&doc, "by email".to_string(), sub.prototype(), Some("findByEmail"))?;

    let inspector = MetadataInspector::for_store(&store);
    let methods = inspector.get_all_method_metadata(&doc, sub.prototype());

    assert_eq!(
        methods.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["count", "find", "findByEmail"]
    );
    assert_eq!(methods["find"].as_str(), "sub find");
    assert_eq!(methods["count"].as_str(), "count");

    let properties = inspector.get_all_property_metadata(&doc, sub.prototype());
    assert_eq!(properties.len(), 1);
    assert_eq!(properties["table"].as_str(), "table");

    // the base class only sees its own members
    let base_methods = inspector.get_all_method_metadata(&doc, base.prototype());
    assert_eq!(base_methods["find"].as_str(), "base find");
    assert!(!base_methods.contains_key("findByEmail"));

    Ok(())
}

#[test]
fn test_single_value_reads() -> Result<()> {
    let (registry, store) = private_store();
    let base = registry.declare("Base").method("run").property("id", DesignType::Number).build()?;
    let sub = registry.declare("Sub").extends(base.token).build()?;

    let inspector = MetadataInspector::for_store(&store);
    inspector.define_metadata("class", 1u8, base.target(), None)?;
    inspector.define_metadata("method", 2u8, base.prototype(), Some("run"))?;
    inspector.define_metadata("property", 3u8, base.prototype(), Some("id"))?;

    assert_eq!(inspector.get_class_metadata::<u8>("class", sub.target()).as_deref(), Some(&1));
    assert_eq!(
        inspector.get_method_metadata::<u8>("method", sub.prototype(), "run").as_deref(),
        Some(&2)
    );
    assert_eq!(
        inspector.get_property_metadata::<u8>("property", sub.prototype(), "id").as_deref(),
        Some(&3)
    );
    assert!(inspector.has_metadata("method", sub.prototype(), Some("run")));
    assert!(!inspector.has_metadata("method", sub.prototype(), Some("stop")));
    assert!(inspector.get_class_metadata::<u8>("class", sub.prototype()).is_none());

    Ok(())
}

#[test]
fn test_parameter_reads_without_decorations() -> Result<()> {
    let (registry, store) = private_store();
    let info = registry.declare("Plain").method("call").build()?;

    let inspector = MetadataInspector::for_store(&store);
    assert!(inspector
        .get_all_parameter_metadata::<String>("param", info.prototype(), "call")
        .is_empty());
    assert!(inspector
        .get_parameter_metadata::<String>("param", info.prototype(), "call", 0)
        .is_none());

    ParameterDecoratorFactory::create("param", "id".to_string())
        .apply(&store, &info.parameter_site("call", 1))?;
    assert!(inspector
        .get_parameter_metadata::<String>("param", info.prototype(), "call", 5)
        .is_none());
    assert_eq!(
        inspector
            .get_parameter_metadata::<String>("param", info.prototype(), "call", 1)
            .as_deref()
            .map(String::as_str),
        Some("id")
    );

    Ok(())
}

#[test]
fn test_design_types() -> Result<()> {
    let (registry, store) = private_store();
    let base = registry
        .declare("Entity")
        .property("id", DesignType::Number)
        .method_with_signature(
            "save",
            MethodDesign::new(vec![DesignType::Boolean], DesignType::Void),
        )
        .build()?;
    let user = registry
        .declare("User")
        .extends(base.token)
        .property("tags", DesignType::Array(Box::new(DesignType::String)))
        .property("owner", DesignType::Declared(base.token))
        .untyped_property("extra")
        .build()?;

    let inspector = MetadataInspector::for_store(&store);
    assert_eq!(
        inspector.get_design_type_for_property(user.prototype(), "id"),
        Some(DesignType::Number)
    );
    assert_eq!(
        inspector
            .get_design_type_for_property(user.prototype(), "tags")
            .map(|t| t.to_string()),
        Some("string[]".to_string())
    );
    assert_eq!(
        inspector.get_design_type_for_property(user.prototype(), "owner"),
        Some(DesignType::Declared(base.token))
    );
    assert!(inspector
        .get_design_type_for_property(user.prototype(), "extra")
        .is_none());
    assert!(inspector
        .get_design_type_for_property(user.prototype(), "missing")
        .is_none());

    let save = inspector
        .get_design_type_for_method(user.prototype(), "save")
        .unwrap();
    assert_eq!(save.parameter_types, vec![DesignType::Boolean]);
    assert_eq!(save.return_type, Some(DesignType::Void));

    Ok(())
}

#[test]
fn test_type_mismatch_is_absent() -> Result<()> {
    let (registry, store) = private_store();
    let info = registry.declare("Mismatch").method("m").build()?;
    store.define("k", 7u32, info.prototype(), Some("m"))?;

    let inspector = MetadataInspector::for_store(&store);
    assert!(inspector.get_method_metadata::<String>("k", info.prototype(), "m").is_none());
    assert!(inspector.get_all_method_metadata::<String>("k", info.prototype()).is_empty());
    assert_eq!(inspector.get_all_method_metadata::<u32>("k", info.prototype()).len(), 1);

    Ok(())
}
