//! Declaring-type resolution against the fixture hierarchy.
//!
//! Covers:
//! 1. Overrides move the declaring type down to the overriding type
//! 2. Inherited members keep the declaring type of the supertype
//! 3. Interface-inherited members and interface inheritance chains
//! 4. java.lang.Object as the last resort
//! 5. Private members and types that cannot be resolved

mod common;

use common::{fixture, fixture_provider};
use pubapi_check::{ApiChecker, CheckError, HierarchyResolver, Verdict};
use pubapi_meta::{MethodKey, ROOT_TYPE};
use pubapi_rules::{PermissionIndex, RuleMatch};

fn declaring_type(type_name: &str, method: &str, descriptor: &str) -> String {
    let provider = fixture_provider();
    HierarchyResolver::new(&provider)
        .resolve(type_name, &MethodKey::new(method, descriptor))
        .unwrap()
        .type_name()
        .to_string()
}

fn checker(config: &str) -> ApiChecker {
    ApiChecker::new(fixture_provider()).with_index(PermissionIndex::from_config_str(config))
}

#[test]
fn test_superclass_member_resolves_to_superclass() {
    assert_eq!(
        declaring_type(&fixture("superclass.Sub"), "testSuper", "()V"),
        fixture("superclass.Super")
    );
    assert_eq!(
        declaring_type(&fixture("superclass.Sub"), "overridden", "()V"),
        fixture("superclass.Sub")
    );
}

#[test]
fn test_permitted_superclass_method_usable_from_subclass() {
    let checker = checker(&format!("{} testSuper ()V", fixture("superclass.Super")));
    assert!(checker
        .is_permitted(&fixture("superclass.Sub"), "testSuper", "()V")
        .unwrap());
    assert!(!checker
        .is_permitted(&fixture("superclass.Sub"), "testSub", "()V")
        .unwrap());
}

#[test]
fn test_override_requires_entry_on_overriding_type() {
    let checker = checker(&fixture("superclass.Super"));
    assert!(checker
        .is_permitted(&fixture("superclass.Super"), "overridden", "()V")
        .unwrap());
    assert!(!checker
        .is_permitted(&fixture("superclass.Sub"), "overridden", "()V")
        .unwrap());
}

#[test]
fn test_entry_on_subtype_does_not_cover_inherited_member() {
    let checker = checker(&fixture("superclass.Sub"));
    assert!(checker
        .is_permitted(&fixture("superclass.Sub"), "overridden", "()V")
        .unwrap());
    assert!(!checker
        .is_permitted(&fixture("superclass.Sub"), "testSuper", "()V")
        .unwrap());
}

#[test]
fn test_interface_members() {
    let imple = fixture("interfaze.TwoInterfaceImple");
    assert_eq!(
        declaring_type(&imple, "test1InterfaceImple", "()V"),
        fixture("interfaze.InterfaceFor1Interface")
    );
    assert_eq!(declaring_type(&imple, "test2InterfaceImple", "()V"), imple);

    let checker = checker(&format!(
        "{}\n{}\n",
        fixture("interfaze.InterfaceFor1Interface"),
        fixture("interfaze.InterfaceFor2Interface")
    ));
    assert!(checker.is_permitted(&imple, "test1InterfaceImple", "()V").unwrap());
    // Implemented on the class itself, which is not listed.
    assert!(!checker.is_permitted(&imple, "test2InterfaceImple", "()V").unwrap());
}

#[test]
fn test_superclass_searched_before_interfaces() {
    let imple = fixture("interfaze.SubInterfaceImple");
    assert_eq!(
        declaring_type(&imple, "testSuper", "()V"),
        fixture("superclass.Super")
    );
    assert_eq!(
        declaring_type(&imple, "superPublishedInterfaceMethod", "()V"),
        fixture("interfaze.SuperInterface")
    );
    assert_eq!(
        declaring_type(&imple, "subUnpublishedInterfaceMethod", "()V"),
        fixture("interfaze.SubInterface")
    );
    assert_eq!(declaring_type(&imple, "subPublishedInterfaceMethod", "()V"), imple);
}

#[test]
fn test_sub_interface_entries() {
    let checker = checker(&format!(
        "{} subPublishedInterfaceMethod ()V\n{} superPublishedInterfaceMethod ()V\n",
        fixture("interfaze.SubInterface"),
        fixture("interfaze.SuperInterface"),
    ));
    let sub = fixture("interfaze.SubInterface");
    assert!(checker.is_permitted(&sub, "superPublishedInterfaceMethod", "()V").unwrap());
    assert!(checker.is_permitted(&sub, "subPublishedInterfaceMethod", "()V").unwrap());
    assert!(!checker.is_permitted(&sub, "superUnpublishedInterfaceMethod", "()V").unwrap());
    assert!(!checker.is_permitted(&sub, "subUnpublishedInterfaceMethod", "()V").unwrap());

    let imple = fixture("interfaze.SubInterfaceImple");
    assert!(checker.is_permitted(&imple, "superPublishedInterfaceMethod", "()V").unwrap());
    // Overridden on the implementation.
    assert!(!checker.is_permitted(&imple, "subPublishedInterfaceMethod", "()V").unwrap());
}

#[test]
fn test_unlisted_super_interface_is_denied() {
    let checker = checker(&fixture("interfaze.InterfaceFor1Interface"));
    let sub = fixture("interfaze.SubInterface");
    assert!(!checker.is_permitted(&sub, "superInterfaceMethod", "()V").unwrap());
    assert!(!checker.is_permitted(&sub, "subInterfaceMethod", "()V").unwrap());
}

#[test]
fn test_root_methods() {
    assert_eq!(
        declaring_type(&fixture("TestClass"), "hashCode", "()I"),
        ROOT_TYPE
    );
    assert_eq!(
        declaring_type(&fixture("interfaze.SubInterface"), "hashCode", "()I"),
        ROOT_TYPE
    );

    let checker = checker("java.lang.Object toString ()Ljava/lang/String;");
    // The return type is not part of the comparison.
    assert!(checker.is_permitted(&fixture("TestClass"), "toString", "()V").unwrap());
    assert!(!checker.is_permitted(&fixture("TestClass"), "hashCode", "()I").unwrap());
    // Overridden on the implementation.
    assert!(!checker
        .is_permitted(&fixture("interfaze.SubInterfaceImple"), "toString", "()V")
        .unwrap());
}

#[test]
fn test_enum_members_resolve_through_library_types() {
    let enumz = fixture("enumz.TestImpleEnum");
    assert_eq!(declaring_type(&enumz, "name", "()Ljava/lang/String;"), "java.lang.Enum");
    assert_eq!(
        declaring_type(&enumz, "compareTo", "(Ljava/lang/Object;)I"),
        "java.lang.Comparable"
    );
    assert_eq!(declaring_type(&enumz, "getClass", "()Ljava/lang/Class;"), ROOT_TYPE);

    let checker = checker("java.lang.Enum");
    assert!(checker.is_permitted(&enumz, "ordinal", "()I").unwrap());
    assert!(!checker.is_permitted(&enumz, "values", "()V").unwrap());
}

#[test]
fn test_private_members_always_permitted() {
    let checker = checker("");
    assert!(checker
        .is_permitted(&fixture("TestClass"), "privateMethod", "()V")
        .unwrap());
    assert!(checker
        .is_permitted(&fixture("enumz.TestImpleEnum"), "<init>", "(Ljava/lang/String;I)V")
        .unwrap());
    assert_eq!(
        checker
            .explain(&fixture("TestClass"), "privateMethod", "()V")
            .unwrap(),
        Verdict::Private {
            declaring_type: fixture("TestClass"),
        }
    );
}

#[test]
fn test_slash_separated_names() {
    let checker = checker(&fixture("superclass.Super"));
    assert!(checker
        .is_permitted("fixture/java/superclass/Sub", "testSuper", "()V")
        .unwrap());
    assert_eq!(
        checker
            .explain("fixture/java/superclass/Sub", "testSuper", "()V")
            .unwrap(),
        Verdict::Granted {
            declaring_type: fixture("superclass.Super"),
            rule: RuleMatch::Class,
        }
    );
}

#[test]
fn test_unknown_type_cannot_be_judged() {
    let checker = checker(FIXTURE_PACKAGE_WILDCARD);
    let err = checker
        .is_permitted(&fixture("NoExistingClass"), "testMethod", "()V")
        .unwrap_err();
    assert!(err.is_cannot_judge());
    assert_eq!(err.error_code(), "UNRESOLVABLE_TYPE");
    assert_eq!(
        err.to_string(),
        format!(
            "Couldn't find JavaClass of itself or super class. ClassName=[{}]",
            fixture("NoExistingClass")
        )
    );
}

#[test]
fn test_missing_superclass_cannot_be_judged() {
    let checker = checker(FIXTURE_PACKAGE_WILDCARD);
    let orphan = fixture("orphan.Orphan");

    assert!(checker.is_permitted(&orphan, "own", "()V").unwrap());

    match checker.is_permitted(&orphan, "hashCode", "()I").unwrap_err() {
        CheckError::UnresolvableType { type_name, source } => {
            assert_eq!(type_name, orphan);
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_member_missing_everywhere_cannot_be_judged() {
    let checker = checker(FIXTURE_PACKAGE_WILDCARD);
    let err = checker
        .is_permitted(&fixture("TestClass"), "noSuchMethod", "()V")
        .unwrap_err();
    assert!(err.is_cannot_judge());
}

const FIXTURE_PACKAGE_WILDCARD: &str = "fixture.java.*";

#[test]
fn test_fixture_written_with_internal_names() {
    let provider = pubapi_meta::InMemoryProvider::from_json_str(
        r#"[
            {"name": "int/ernal/Base", "superclass": "java/lang/Object",
             "interfaces": ["int/ernal/Api"],
             "methods": [{"name": "run", "descriptor": "(Ljava/lang/String;)V"}]},
            {"name": "int/ernal/Api", "kind": "interface",
             "methods": [{"name": "call", "descriptor": "()V"}]}
        ]"#,
    )
    .unwrap();
    let checker = ApiChecker::new(provider).with_index(PermissionIndex::from_config_str("int.ernal.Api"));

    assert!(checker.is_permitted("int.ernal.Base", "call", "()V").unwrap());
    assert!(checker.is_permitted("int/ernal/Base", "call", "()V").unwrap());
    assert!(!checker
        .is_permitted("int.ernal.Base", "run", "(Ljava/lang/String;)V")
        .unwrap());
    assert_eq!(
        checker.explain("int.ernal.Base", "hashCode", "()I").unwrap(),
        Verdict::Denied {
            declaring_type: ROOT_TYPE.to_string(),
        }
    );
}
