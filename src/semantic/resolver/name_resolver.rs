use tracing::{trace, warn};

use crate::semantic::symbol_table::{PathKind, Symbol, SymbolTable};

use super::context::ResolutionContext;

/// Outcome of resolving a name against the path index.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'a> {
    Found(&'a Symbol),
    Unresolved,
    /// Distinct candidates tied on (rank, kind precedence). This cannot
    /// arise from a well-formed scan and indicates index corruption.
    Ambiguous(Vec<&'a Symbol>),
}

impl<'a> Resolution<'a> {
    pub fn found(&self) -> Option<&'a Symbol> {
        match self {
            Self::Found(symbol) => Some(symbol),
            _ => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }
}

/// Resolver provides the lookup policy over the path index.
///
/// All resolution logic lives here, keeping SymbolTable as a pure data
/// structure. Visibility is tiered: private folder symbols shadow
/// same-namespace symbols, which shadow plain path symbols; within a tier
/// the candidate list's (rank, kind precedence) order decides.
pub struct Resolver<'a> {
    table: &'a SymbolTable,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a SymbolTable {
        self.table
    }

    /// Resolve a name (qualified or simple) from the given context.
    pub fn resolve(&self, name: &str, ctx: &ResolutionContext) -> Resolution<'a> {
        trace!("[RESOLVE] name='{}' ctx={:?}", name, ctx);
        let result = if name.contains('.') {
            self.resolve_qualified(name)
        } else {
            self.resolve_simple(name, ctx)
        };
        trace!(
            "[RESOLVE] -> {:?}",
            result.found().map(|s| &*s.qualified_name)
        );
        result
    }

    /// Resolve a dotted name. Namespace symbols are addressable by their
    /// qualified name from anywhere; there is no relative shortening.
    fn resolve_qualified(&self, name: &str) -> Resolution<'a> {
        let candidates: Vec<&Symbol> = self
            .table
            .candidates_for(name)
            .filter(|s| {
                matches!(
                    self.table.entry(s.entry).kind,
                    PathKind::Namespace { .. }
                )
            })
            .collect();
        self.pick(candidates)
    }

    fn resolve_simple(&self, name: &str, ctx: &ResolutionContext) -> Resolution<'a> {
        // Tier 1: private folder symbols visible from this context.
        let private: Vec<&Symbol> = self
            .table
            .candidates_for(name)
            .filter(|s| self.private_visible(s, ctx))
            .collect();
        if !private.is_empty() {
            trace!("[RESOLVE] '{}' found in private tier", name);
            return self.pick(private);
        }

        // Tier 2: unqualified use of a sibling in the same namespace.
        if let Some(namespace) = &ctx.namespace {
            let qualified = format!("{namespace}.{name}");
            let siblings: Vec<&Symbol> = self.table.candidates_for(&qualified).collect();
            if !siblings.is_empty() {
                trace!("[RESOLVE] '{}' found as namespace sibling '{}'", name, qualified);
                return self.pick(siblings);
            }
        }

        // Tier 3: plain search path entries.
        let plain: Vec<&Symbol> = self
            .table
            .candidates_for(name)
            .filter(|s| self.table.entry(s.entry).kind == PathKind::Plain)
            .collect();
        self.pick(plain)
    }

    /// A private folder's symbols are visible to files directly in its
    /// parent directory and to files inside the folder itself.
    fn private_visible(&self, symbol: &Symbol, ctx: &ResolutionContext) -> bool {
        let entry = self.table.entry(symbol.entry);
        let PathKind::Private { parent } = &entry.kind else {
            return false;
        };
        match &ctx.dir {
            Some(dir) => dir == parent || *dir == entry.dir,
            None => false,
        }
    }

    /// Pick the best of a rank-ordered candidate list, detecting ties.
    fn pick(&self, candidates: Vec<&'a Symbol>) -> Resolution<'a> {
        let Some(&best) = candidates.first() else {
            return Resolution::Unresolved;
        };
        let best_key = self.key(best);
        let tied: Vec<&Symbol> = candidates
            .iter()
            .copied()
            .take_while(|s| self.key(s) == best_key)
            .collect();
        if tied.len() > 1 {
            warn!(
                "[RESOLVE] ambiguous candidates for '{}': {} entries at rank {}",
                best.qualified_name,
                tied.len(),
                best_key.0
            );
            return Resolution::Ambiguous(tied);
        }
        Resolution::Found(best)
    }

    fn key(&self, symbol: &Symbol) -> (u32, u8) {
        (
            self.table.entry(symbol.entry).rank,
            symbol.kind().precedence(),
        )
    }
}
