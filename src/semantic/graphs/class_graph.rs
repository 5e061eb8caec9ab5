use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use tracing::{trace, warn};

use crate::core::{IStr, normalize_path};
use crate::parser::{MemberKind, Visibility};
use crate::semantic::resolver::{Resolution, ResolutionContext, Resolver};
use crate::semantic::symbol_table::{PathKind, Symbol, SymbolTable};

/// How completely a class's hierarchy could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    /// Every superclass resolved and flattened.
    Resolved,
    /// At least one superclass was unresolved, ambiguous, or itself
    /// broken; the member table holds the class's own members only.
    Partial,
    /// The class sits on an inheritance cycle. Permanent for the lifetime
    /// of the node; the member table holds own members only. A class that
    /// merely inherits from a cycle without being on it is Partial.
    Circular,
}

/// One entry of a flattened member table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatMember {
    /// Qualified name of the class the member was inherited from (or the
    /// class itself for own members).
    pub origin: IStr,
    pub kind: MemberKind,
    pub visibility: Visibility,
}

/// A resolved class with its flattened member table.
///
/// Nodes are self-contained (names and paths, no table ids) so they stay
/// valid across symbol table rebuilds; invalidation is by name.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassNode {
    pub qualified_name: IStr,
    pub file: PathBuf,
    pub state: ResolutionState,
    /// Superclass names in declaration order: resolved qualified names
    /// where resolution succeeded, the written name otherwise.
    pub superclasses: Vec<IStr>,
    /// Flattened members in insertion order: inherited first (left-to-right
    /// across superclasses, first definition wins), own members overlaid.
    pub members: IndexMap<SmolStr, FlatMember>,
}

impl ClassNode {
    pub fn member(&self, name: &str) -> Option<&FlatMember> {
        self.members.get(name)
    }
}

/// Arena of resolved class nodes, keyed by qualified name.
#[derive(Debug, Default)]
pub struct ClassGraph {
    nodes: IndexMap<IStr, ClassNode>,
    /// superclass name -> subclasses that inherit from it. Tracks both
    /// resolved qualified names and unresolved written names, so a class
    /// appearing later under a previously missing name still invalidates
    /// its Partial dependents.
    dependents: FxHashMap<IStr, FxHashSet<IStr>>,
    nodes_by_file: FxHashMap<PathBuf, Vec<IStr>>,
}

impl ClassGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, qualified_name: &str) -> Option<&ClassNode> {
        self.nodes.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.nodes.contains_key(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop a node and, transitively, every node that inherits from it.
    pub fn invalidate(&mut self, qualified_name: &str) {
        let mut queue = vec![IStr::from(qualified_name)];
        let mut visited = FxHashSet::default();
        while let Some(name) = queue.pop() {
            if !visited.insert(IStr::clone(&name)) {
                continue;
            }
            self.remove_node(&name);
            if let Some(subs) = self.dependents.remove(&name) {
                queue.extend(subs);
            }
        }
    }

    /// Invalidate every node built from `file`.
    pub fn invalidate_file(&mut self, file: &Path) {
        let normalized = normalize_path(file);
        if let Some(names) = self.nodes_by_file.remove(&normalized) {
            for name in names {
                self.invalidate(&name);
            }
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.dependents.clear();
        self.nodes_by_file.clear();
    }

    fn remove_node(&mut self, qualified_name: &str) {
        let Some(node) = self.nodes.shift_remove(qualified_name) else {
            return;
        };
        trace!("[CLASS_GRAPH] invalidating node '{}'", qualified_name);
        for superclass in &node.superclasses {
            if let Some(subs) = self.dependents.get_mut(superclass) {
                subs.remove(qualified_name);
            }
        }
        if let Some(names) = self.nodes_by_file.get_mut(&node.file) {
            names.retain(|n| &**n != qualified_name);
        }
    }

    fn insert_node(&mut self, node: ClassNode) {
        self.nodes_by_file
            .entry(node.file.clone())
            .or_default()
            .push(IStr::clone(&node.qualified_name));
        self.nodes.insert(IStr::clone(&node.qualified_name), node);
    }
}

/// Builds class nodes on demand against a symbol table snapshot.
///
/// Memoized: a class already in the graph is never rebuilt. Cycle
/// detection uses the in-progress set of the current resolution walk.
pub struct ClassGraphBuilder<'a> {
    resolver: Resolver<'a>,
    graph: &'a mut ClassGraph,
    in_progress: FxHashSet<IStr>,
}

impl<'a> ClassGraphBuilder<'a> {
    pub fn new(table: &'a SymbolTable, graph: &'a mut ClassGraph) -> Self {
        Self {
            resolver: Resolver::new(table),
            graph,
            in_progress: FxHashSet::default(),
        }
    }

    /// Ensure a node exists for `symbol` and return its state.
    pub fn build(&mut self, symbol: &Symbol) -> ResolutionState {
        self.build_node(symbol).0
    }

    /// Recursive worker. The returned set holds the qualified names of
    /// cycle entry points detected below this frame whose cycles are not
    /// yet closed: a frame receiving a non-empty set is itself on each of
    /// those cycles, and a cycle stops propagating at its entry point.
    /// Callers above a closed cycle see a plain Circular state and become
    /// Partial, not Circular.
    fn build_node(&mut self, symbol: &Symbol) -> (ResolutionState, FxHashSet<IStr>) {
        let qname = IStr::clone(&symbol.qualified_name);
        if let Some(node) = self.graph.nodes.get(&*qname) {
            return (node.state, FxHashSet::default());
        }
        if self.in_progress.contains(&qname) {
            // Back edge of the current walk; the stack below this frame is
            // on the cycle.
            warn!("[CLASS_GRAPH] inheritance cycle through '{}'", qname);
            let mut targets = FxHashSet::default();
            targets.insert(IStr::clone(&qname));
            return (ResolutionState::Circular, targets);
        }
        self.in_progress.insert(IStr::clone(&qname));
        trace!("[CLASS_GRAPH] building node '{}'", qname);

        let ctx = self.class_context(symbol);
        let mut open_cycles: FxHashSet<IStr> = FxHashSet::default();
        let mut partial = false;
        let mut superclasses = Vec::with_capacity(symbol.skeleton.superclasses.len());
        let mut inherited: IndexMap<SmolStr, FlatMember> = IndexMap::new();

        for written in &symbol.skeleton.superclasses {
            match self.resolver.resolve(written, &ctx) {
                Resolution::Found(superclass) if superclass.is_class() => {
                    let super_qname = IStr::clone(&superclass.qualified_name);
                    self.note_dependent(&super_qname, &qname);
                    superclasses.push(IStr::clone(&super_qname));

                    let (state, targets) = self.build_node(superclass);
                    open_cycles.extend(targets);
                    match state {
                        // A closed cycle below breaks this class without
                        // putting it on the cycle.
                        ResolutionState::Circular | ResolutionState::Partial => partial = true,
                        ResolutionState::Resolved => {}
                    }
                    if let Some(node) = self.graph.nodes.get(&*super_qname) {
                        // Left-to-right, first definition wins. Private
                        // superclass members never flatten into subclasses.
                        for (name, member) in &node.members {
                            if member.visibility == Visibility::Private {
                                continue;
                            }
                            if !inherited.contains_key(name) {
                                inherited.insert(name.clone(), member.clone());
                            }
                        }
                    }
                }
                _ => {
                    trace!(
                        "[CLASS_GRAPH] superclass '{}' of '{}' did not resolve to a class",
                        written, qname
                    );
                    partial = true;
                    let raw: IStr = Arc::from(written.as_str());
                    self.note_dependent(&raw, &qname);
                    superclasses.push(raw);
                }
            }
        }

        self.in_progress.remove(&qname);

        // Cycles entered at this class close here and stop propagating.
        let on_cycle = !open_cycles.is_empty();
        open_cycles.remove(&qname);

        let state = if on_cycle {
            ResolutionState::Circular
        } else if partial {
            ResolutionState::Partial
        } else {
            ResolutionState::Resolved
        };

        // Partial and Circular nodes expose own members only; a half
        // flattened table would be misleading.
        let mut members = match state {
            ResolutionState::Resolved => inherited,
            _ => IndexMap::new(),
        };
        for own in &symbol.skeleton.members {
            members.insert(
                own.name.clone(),
                FlatMember {
                    origin: IStr::clone(&qname),
                    kind: own.kind,
                    visibility: own.visibility,
                },
            );
        }

        self.graph.insert_node(ClassNode {
            qualified_name: qname,
            file: symbol.file.clone(),
            state,
            superclasses,
            members,
        });
        (state, open_cycles)
    }

    fn note_dependent(&mut self, superclass: &IStr, subclass: &IStr) {
        self.graph
            .dependents
            .entry(IStr::clone(superclass))
            .or_default()
            .insert(IStr::clone(subclass));
    }

    /// The vantage point superclass names are resolved from: the class
    /// file's directory, inside whatever namespace the class lives in.
    fn class_context(&self, symbol: &Symbol) -> ResolutionContext {
        let table = self.resolver.table();
        let dir = symbol.file.parent().map(Path::to_path_buf);
        let namespace = match &table.entry(symbol.entry).kind {
            PathKind::Namespace { prefix } => Some(IStr::clone(prefix)),
            _ => None,
        };
        ResolutionContext { dir, namespace }
    }
}
