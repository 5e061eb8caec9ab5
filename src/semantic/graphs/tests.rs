use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::parser::{FileKind, FileSkeleton, Member, MemberKind, Visibility};
use crate::semantic::symbol_table::{PathKind, SymbolTable};

use super::*;

fn class(name: &str, supers: &[&str], members: &[(&str, MemberKind, Visibility)]) -> Arc<FileSkeleton> {
    Arc::new(FileSkeleton {
        name: name.into(),
        declared_name: Some(name.into()),
        kind: FileKind::Classdef,
        superclasses: supers.iter().map(|s| SmolStr::from(*s)).collect(),
        members: members
            .iter()
            .map(|(n, k, v)| Member::new(*n, *k, *v))
            .collect(),
        local_functions: Vec::new(),
    })
}

fn add_class(
    table: &mut SymbolTable,
    name: &str,
    supers: &[&str],
    members: &[(&str, MemberKind, Visibility)],
) {
    let entry = table.push_entry(PathBuf::from(format!("/g/{name}_dir")), PathKind::Plain);
    table.insert(
        name,
        PathBuf::from(format!("/g/{name}_dir/{name}.m")),
        entry,
        class(name, supers, members),
    );
}

fn build(table: &SymbolTable, graph: &mut ClassGraph, name: &str) -> ResolutionState {
    let symbol = table.first_candidate(name).expect("class indexed").clone();
    ClassGraphBuilder::new(table, graph).build(&symbol)
}

const PROP: MemberKind = MemberKind::Property;
const METH: MemberKind = MemberKind::Method;
const PUB: Visibility = Visibility::Public;
const PRIV: Visibility = Visibility::Private;

#[test]
fn test_leaf_class_resolves() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[("area", METH, PUB)]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "base"), ResolutionState::Resolved);
    let node = graph.get("base").unwrap();
    assert!(node.member("area").is_some());
}

#[test]
fn test_inherited_members_flatten() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[("area", METH, PUB), ("r", PROP, PUB)]);
    add_class(&mut table, "sub", &["base"], &[("grow", METH, PUB)]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "sub"), ResolutionState::Resolved);
    let node = graph.get("sub").unwrap();
    assert_eq!(node.member("area").unwrap().origin.as_ref(), "base");
    assert_eq!(node.member("grow").unwrap().origin.as_ref(), "sub");
    // Building the subclass memoizes the superclass too.
    assert!(graph.get("base").is_some());
}

#[test]
fn test_subclass_overrides_inherited() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[("radius", PROP, PUB)]);
    add_class(&mut table, "sub", &["base"], &[("radius", PROP, PUB)]);
    let mut graph = ClassGraph::new();

    build(&table, &mut graph, "sub");
    let node = graph.get("sub").unwrap();
    assert_eq!(node.member("radius").unwrap().origin.as_ref(), "sub");
    assert_eq!(node.members.len(), 1);
}

#[test]
fn test_first_listed_superclass_wins() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "left", &[], &[("shared", METH, PUB)]);
    add_class(&mut table, "right", &[], &[("shared", METH, PUB), ("extra", METH, PUB)]);
    add_class(&mut table, "both", &["left", "right"], &[]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "both"), ResolutionState::Resolved);
    let node = graph.get("both").unwrap();
    assert_eq!(node.member("shared").unwrap().origin.as_ref(), "left");
    assert_eq!(node.member("extra").unwrap().origin.as_ref(), "right");
}

#[test]
fn test_private_members_do_not_flatten() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[("secret", PROP, PRIV), ("open", PROP, PUB)]);
    add_class(&mut table, "sub", &["base"], &[]);
    let mut graph = ClassGraph::new();

    build(&table, &mut graph, "sub");
    let node = graph.get("sub").unwrap();
    assert!(node.member("secret").is_none());
    assert!(node.member("open").is_some());
}

#[test]
fn test_missing_superclass_is_partial() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "orphan", &["nowhere"], &[("own", METH, PUB)]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "orphan"), ResolutionState::Partial);
    let node = graph.get("orphan").unwrap();
    assert_eq!(node.members.len(), 1);
    assert!(node.member("own").is_some());
    assert_eq!(node.superclasses, vec![crate::core::IStr::from("nowhere")]);
}

#[test]
fn test_two_cycle_terminates_as_circular() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "ying", &["yang"], &[("a", METH, PUB)]);
    add_class(&mut table, "yang", &["ying"], &[("b", METH, PUB)]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "ying"), ResolutionState::Circular);
    let ying = graph.get("ying").unwrap();
    assert_eq!(ying.state, ResolutionState::Circular);
    // Own members only, no inherited layer.
    assert!(ying.member("a").is_some());
    assert!(ying.member("b").is_none());
}

#[test]
fn test_subclass_of_cycle_is_partial_not_circular() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "ying", &["yang"], &[]);
    add_class(&mut table, "yang", &["ying"], &[]);
    add_class(&mut table, "observer", &["ying"], &[("own", METH, PUB)]);
    let mut graph = ClassGraph::new();

    assert_eq!(
        build(&table, &mut graph, "observer"),
        ResolutionState::Partial
    );
    // The cycle members themselves stay Circular.
    assert_eq!(graph.get("ying").unwrap().state, ResolutionState::Circular);
    assert_eq!(graph.get("yang").unwrap().state, ResolutionState::Circular);
    let observer = graph.get("observer").unwrap();
    assert!(observer.member("own").is_some());
    assert_eq!(observer.members.len(), 1);
}

#[test]
fn test_three_cycle_marks_only_its_members() {
    // base <- mid <- top, with base closing the cycle back to top: all
    // three are on the cycle; a sibling under mid is not.
    let mut table = SymbolTable::new();
    add_class(&mut table, "top", &["mid"], &[]);
    add_class(&mut table, "mid", &["base"], &[]);
    add_class(&mut table, "base", &["top"], &[]);
    add_class(&mut table, "outsider", &["mid"], &[]);
    let mut graph = ClassGraph::new();

    assert_eq!(build(&table, &mut graph, "top"), ResolutionState::Circular);
    assert_eq!(graph.get("mid").unwrap().state, ResolutionState::Circular);
    assert_eq!(graph.get("base").unwrap().state, ResolutionState::Circular);
    assert_eq!(
        build(&table, &mut graph, "outsider"),
        ResolutionState::Partial
    );
}

#[test]
fn test_self_inheritance_is_circular() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "uroboros", &["uroboros"], &[]);
    let mut graph = ClassGraph::new();
    assert_eq!(
        build(&table, &mut graph, "uroboros"),
        ResolutionState::Circular
    );
}

#[test]
fn test_flattening_is_idempotent() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[("m1", METH, PUB), ("m2", METH, PUB)]);
    add_class(&mut table, "sub", &["base"], &[("m2", METH, PUB), ("m3", METH, PUB)]);

    let mut first = ClassGraph::new();
    build(&table, &mut first, "sub");
    let mut second = ClassGraph::new();
    build(&table, &mut second, "sub");

    let a: Vec<_> = first.get("sub").unwrap().members.keys().collect();
    let b: Vec<_> = second.get("sub").unwrap().members.keys().collect();
    assert_eq!(a, b);
}

#[test]
fn test_invalidate_cascades_to_dependents() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[]);
    add_class(&mut table, "mid", &["base"], &[]);
    add_class(&mut table, "leaf", &["mid"], &[]);
    let mut graph = ClassGraph::new();
    build(&table, &mut graph, "leaf");
    assert_eq!(graph.len(), 3);

    graph.invalidate("base");
    assert!(graph.get("base").is_none());
    assert!(graph.get("mid").is_none());
    assert!(graph.get("leaf").is_none());
}

#[test]
fn test_invalidate_file_removes_its_nodes() {
    let mut table = SymbolTable::new();
    add_class(&mut table, "base", &[], &[]);
    add_class(&mut table, "sub", &["base"], &[]);
    let mut graph = ClassGraph::new();
    build(&table, &mut graph, "sub");

    graph.invalidate_file(&PathBuf::from("/g/sub_dir/sub.m"));
    assert!(graph.get("sub").is_none());
    assert!(graph.get("base").is_some());
}
