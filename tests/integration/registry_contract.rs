//! Registry lookup, registration rules and fresh-instance semantics

use crate::integration::test_utils::EchoIdTool;
use synthgen::{GeneratorTool, RegistryError, ToolArgs, ToolRegistry};

fn echo_id() -> Box<dyn GeneratorTool> {
    Box::new(EchoIdTool)
}

#[test]
fn test_builtin_registry_lists_sorted_names() {
    let registry = ToolRegistry::with_builtin_tools().unwrap();
    assert_eq!(
        registry.names(),
        vec!["product_review", "qa_pair", "support_dialogue"]
    );
}

#[test]
fn test_custom_tool_registers_beside_builtins() {
    let mut registry = ToolRegistry::with_builtin_tools().unwrap();
    registry.register("echo_id", echo_id).unwrap();

    assert_eq!(registry.len(), 4);
    let tool = registry.from_name("echo_id").unwrap();
    assert_eq!(tool.scenario_name(), "echo_id");
    assert_eq!(tool.artifact_prefix(), "echo");
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let mut registry = ToolRegistry::with_builtin_tools().unwrap();
    let err = registry.register("qa_pair", echo_id).unwrap_err();
    assert_eq!(err, RegistryError::DuplicateRegistration("qa_pair".to_string()));
    assert_eq!(registry.from_name("qa_pair").unwrap().artifact_prefix(), "qa");
}

#[test]
fn test_unknown_name_is_an_error() {
    let registry = ToolRegistry::with_builtin_tools().unwrap();
    let err = registry.from_name("haiku").err().unwrap();
    assert_eq!(err, RegistryError::UnknownTool("haiku".to_string()));
}

#[test]
fn test_lookups_return_independent_instances() {
    let registry = ToolRegistry::with_builtin_tools().unwrap();

    let mut configured = registry.from_name("qa_pair").unwrap();
    configured
        .validate_args(&ToolArgs::new().with("difficulty", "hard"))
        .unwrap();
    let fresh = registry.from_name("qa_pair").unwrap();

    assert!(configured.unique_id().starts_with("hard-"));
    assert!(fresh.unique_id().starts_with("medium-"));
}
