use super::*;

fn parse(stem: &str, source: &str) -> FileSkeleton {
    parse_source(stem, source).unwrap_or_else(|e| panic!("parse failed: {e}"))
}

// =============================================================================
// FILE KIND DETECTION
// =============================================================================

#[test]
fn test_script_file() {
    let skeleton = parse("setup", "x = 1;\ndisp(x)\n");
    assert_eq!(skeleton.kind, FileKind::Script);
    assert_eq!(skeleton.declared_name, None);
    assert!(skeleton.members.is_empty());
}

#[test]
fn test_function_file() {
    let skeleton = parse("area", "function a = area(r)\na = pi * r^2;\nend\n");
    assert_eq!(skeleton.kind, FileKind::Function);
    assert_eq!(skeleton.declared_name.as_deref(), Some("area"));
}

#[test]
fn test_classdef_file() {
    let skeleton = parse("circle", "classdef circle\nend\n");
    assert_eq!(skeleton.kind, FileKind::Classdef);
    assert_eq!(skeleton.declared_name.as_deref(), Some("circle"));
    assert!(skeleton.superclasses.is_empty());
}

#[test]
fn test_leading_comments_do_not_change_kind() {
    let skeleton = parse("circle", "% shape helper\n\nclassdef circle\nend\n");
    assert_eq!(skeleton.kind, FileKind::Classdef);
}

#[test]
fn test_invalid_file_stem_rejected() {
    assert!(matches!(
        parse_source("2bad", "x = 1;"),
        Err(ParseFailure::InvalidName(_))
    ));
}

#[test]
fn test_declared_name_may_differ_from_stem() {
    let skeleton = parse("class00", "classdef somethingelse\nend\n");
    assert_eq!(skeleton.name, "class00");
    assert_eq!(skeleton.declared_name.as_deref(), Some("somethingelse"));
}

// =============================================================================
// CLASSDEF HEADERS
// =============================================================================

#[test]
fn test_single_superclass() {
    let skeleton = parse("circle", "classdef circle < shape\nend\n");
    assert_eq!(skeleton.superclasses, vec![SmolStr::from("shape")]);
}

#[test]
fn test_multiple_superclasses_in_order() {
    let skeleton = parse("c", "classdef c < a & b\nend\n");
    assert_eq!(
        skeleton.superclasses,
        vec![SmolStr::from("a"), SmolStr::from("b")]
    );
}

#[test]
fn test_dotted_superclass() {
    let skeleton = parse("c", "classdef c < pkg.inner.base\nend\n");
    assert_eq!(skeleton.superclasses, vec![SmolStr::from("pkg.inner.base")]);
}

#[test]
fn test_continued_header() {
    let skeleton = parse("c", "classdef c < ...\n        base & ...\n        handle\nend\n");
    assert_eq!(
        skeleton.superclasses,
        vec![SmolStr::from("base"), SmolStr::from("handle")]
    );
}

#[test]
fn test_classdef_attributes_skipped() {
    let skeleton = parse("c", "classdef (Sealed, Hidden) c < base\nend\n");
    assert_eq!(skeleton.declared_name.as_deref(), Some("c"));
    assert_eq!(skeleton.superclasses, vec![SmolStr::from("base")]);
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[test]
fn test_properties_default_public() {
    let skeleton = parse("c", "classdef c\nproperties\nradius\ncenter\nend\nend\n");
    let radius = skeleton.member("radius").unwrap();
    assert_eq!(radius.kind, MemberKind::Property);
    assert_eq!(radius.visibility, Visibility::Public);
    assert!(skeleton.member("center").is_some());
}

#[test]
fn test_private_access_properties() {
    let skeleton = parse(
        "c",
        "classdef c\nproperties (Access = private)\nsecret\nend\nend\n",
    );
    assert_eq!(skeleton.member("secret").unwrap().visibility, Visibility::Private);
}

#[test]
fn test_getaccess_governs_visibility() {
    let source = "classdef c\n\
                  properties (GetAccess = public, SetAccess = private)\n\
                  readable\n\
                  end\n\
                  properties (GetAccess = private)\n\
                  hidden\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    assert_eq!(skeleton.member("readable").unwrap().visibility, Visibility::Public);
    assert_eq!(skeleton.member("hidden").unwrap().visibility, Visibility::Private);
}

#[test]
fn test_property_defaults_and_validators_skipped() {
    let source = "classdef c\n\
                  properties\n\
                  a (1,3) double {mustBePositive} = [1, 2, 3]\n\
                  b = zeros(2, 2)\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    let names: Vec<_> = skeleton.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
}

// =============================================================================
// METHODS
// =============================================================================

#[test]
fn test_method_forms() {
    let source = "classdef c\n\
                  methods\n\
                  function obj = c(r)\n\
                  obj.r = r;\n\
                  end\n\
                  function a = area(obj)\n\
                  a = pi * obj.r^2;\n\
                  end\n\
                  function [lo, hi] = bounds(obj)\n\
                  lo = 0; hi = obj.r;\n\
                  end\n\
                  function show(obj)\n\
                  disp(obj.r)\n\
                  end\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    let names: Vec<_> = skeleton.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["c", "area", "bounds", "show"]);
    assert!(skeleton.members.iter().all(|m| m.kind == MemberKind::Method));
}

#[test]
fn test_private_methods_block() {
    let source = "classdef c\n\
                  methods (Access = private)\n\
                  function helper(obj)\n\
                  end\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    assert_eq!(skeleton.member("helper").unwrap().visibility, Visibility::Private);
}

#[test]
fn test_accessor_method_keeps_dotted_name() {
    let source = "classdef c\n\
                  methods\n\
                  function obj = set.radius(obj, v)\n\
                  obj.radius = v;\n\
                  end\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    assert!(skeleton.member("set.radius").is_some());
}

#[test]
fn test_abstract_method_signatures() {
    let source = "classdef shape\n\
                  methods (Abstract)\n\
                  a = area(obj)\n\
                  show(obj)\n\
                  end\n\
                  end\n";
    let skeleton = parse("shape", source);
    let names: Vec<_> = skeleton.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["area", "show"]);
}

#[test]
fn test_end_indexing_inside_method_body() {
    let source = "classdef c\n\
                  methods\n\
                  function v = last(obj)\n\
                  v = obj.data(end);\n\
                  if v > 0\n\
                  v = obj.data(end - 1);\n\
                  end\n\
                  end\n\
                  function w = other(obj)\n\
                  w = 1;\n\
                  end\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    let names: Vec<_> = skeleton.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["last", "other"]);
}

#[test]
fn test_arguments_block_inside_method() {
    let source = "classdef c\n\
                  methods\n\
                  function scale(obj, factor)\n\
                  arguments\n\
                  obj\n\
                  factor (1,1) double = 1\n\
                  end\n\
                  obj.r = obj.r * factor;\n\
                  end\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    assert!(skeleton.member("scale").is_some());
    assert_eq!(skeleton.members.len(), 1);
}

#[test]
fn test_events_and_enumeration_blocks_skipped() {
    let source = "classdef c\n\
                  events\n\
                  Changed\n\
                  end\n\
                  enumeration\n\
                  Red (1)\n\
                  Blue (2)\n\
                  end\n\
                  properties\n\
                  p\n\
                  end\n\
                  end\n";
    let skeleton = parse("c", source);
    let names: Vec<_> = skeleton.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["p"]);
}

#[test]
fn test_truncated_classdef_fails() {
    assert!(matches!(
        parse_source("c", "classdef c\nproperties\nx\n"),
        Err(ParseFailure::UnexpectedEof { .. })
    ));
}

// =============================================================================
// FUNCTION FILES
// =============================================================================

#[test]
fn test_local_functions_recorded() {
    let source = "function y = outer(x)\n\
                  y = inner(x) + 1;\n\
                  end\n\
                  function y = inner(x)\n\
                  y = x * 2;\n\
                  end\n";
    let skeleton = parse("outer", source);
    assert_eq!(skeleton.declared_name.as_deref(), Some("outer"));
    assert_eq!(skeleton.local_functions, vec![SmolStr::from("inner")]);
}

#[test]
fn test_function_file_without_ends() {
    let source = "function main()\n\
                  helper()\n\
                  \n\
                  function helper()\n\
                  disp('hi')\n";
    let skeleton = parse("main", source);
    assert_eq!(skeleton.local_functions, vec![SmolStr::from("helper")]);
}

#[test]
fn test_script_with_trailing_local_functions() {
    let source = "x = compute(3);\ndisp(x)\n\nfunction y = compute(n)\ny = n^2;\nend\n";
    let skeleton = parse("runme", source);
    assert_eq!(skeleton.kind, FileKind::Script);
    assert_eq!(skeleton.local_functions, vec![SmolStr::from("compute")]);
}

// =============================================================================
// KIND PRECEDENCE & OPAQUE SKELETONS
// =============================================================================

#[test]
fn test_kind_precedence_order() {
    assert!(FileKind::Classdef.precedence() < FileKind::Function.precedence());
    assert!(FileKind::Function.precedence() < FileKind::Script.precedence());
}

#[test]
fn test_opaque_function_skeleton() {
    let skeleton = FileSkeleton::opaque_function("compiled");
    assert_eq!(skeleton.kind, FileKind::Function);
    assert_eq!(skeleton.declared_name, None);
    assert!(skeleton.members.is_empty());
}
