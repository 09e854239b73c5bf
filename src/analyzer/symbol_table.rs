use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Global,
    Local,
}

impl Visibility {
    pub fn for_depth(depth: usize) -> Self {
        if depth == 1 {
            Visibility::Global
        } else {
            Visibility::Local
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Global => f.write_str("global"),
            Visibility::Local => f.write_str("local"),
        }
    }
}

/// Declared type plus where it was declared; renders as `int-global`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub ty: String,
    pub visibility: Visibility,
}

impl Symbol {
    pub fn new(ty: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            ty: ty.into(),
            visibility,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ty, self.visibility)
    }
}

/// One block's worth of declarations, kept in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
    symbols: Vec<(String, Symbol)>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, symbol)| symbol)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts `name`, overwriting an existing entry in place.
    pub fn insert(&mut self, name: &str, symbol: Symbol) {
        match self.symbols.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = symbol,
            None => self.symbols.push((name.to_string(), symbol)),
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(n, s)| (n.as_str(), s))
    }
}

/// Stack of active scopes over a permanent global scope.
///
/// Closed scopes are moved to an archive that is only kept for reporting and
/// never consulted by [`SymbolTable::lookup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    archived: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
            archived: vec![],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
        log::trace!("enter scope, depth {}", self.scope_depth());
    }

    /// Closes the innermost local scope. The global scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() <= 1 {
            log::debug!("ignoring exit from the global scope");
            return;
        }
        if let Some(scope) = self.scopes.pop() {
            self.archived.push(scope);
        }
        log::trace!("exit scope, depth {}", self.scope_depth());
    }

    pub fn add_symbol(&mut self, name: &str, symbol: Symbol) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name, symbol);
        }
    }

    pub fn exists_in_current_scope(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.contains(name))
    }

    /// Finds `name` in the nearest active scope that declares it.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn lookup(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// 1 means only the global scope is active.
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn global(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Closed local scopes, in the order they were closed.
    pub fn archived(&self) -> &[Scope] {
        &self.archived
    }

    /// Local scopes that were never closed, outermost first.
    pub fn open_locals(&self) -> &[Scope] {
        &self.scopes[1..]
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_scope(f: &mut fmt::Formatter<'_>, title: &str, scope: &Scope) -> fmt::Result {
            writeln!(f, "{}:", title)?;
            for (name, symbol) in scope.iter() {
                writeln!(f, "  {} : {}", name, symbol)?;
            }
            Ok(())
        }

        write_scope(f, "global scope", self.global())?;
        for scope in self.archived() {
            write_scope(f, "local scope (exited)", scope)?;
        }
        for scope in self.open_locals() {
            write_scope(f, "local scope (active)", scope)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(visibility: Visibility) -> Symbol {
        Symbol::new("int", visibility)
    }

    #[test]
    fn closed_scope_is_archived_not_visible() {
        let mut table = SymbolTable::new();
        table.enter_scope();
        table.add_symbol("x", int(Visibility::Local));
        assert!(table.lookup("x"));
        table.exit_scope();

        assert!(!table.lookup("x"));
        assert_eq!(table.archived().len(), 1);
        assert_eq!(table.archived()[0].get("x"), Some(&int(Visibility::Local)));
        assert_eq!(table.archived()[0].get("x").unwrap().to_string(), "int-local");
    }

    #[test]
    fn global_scope_survives_extra_exits() {
        let mut table = SymbolTable::new();
        table.add_symbol("a", int(Visibility::Global));
        table.exit_scope();
        table.exit_scope();

        assert_eq!(table.scope_depth(), 1);
        assert!(table.lookup("a"));
        assert!(table.archived().is_empty());
    }

    #[test]
    fn current_scope_versus_any_scope() {
        let mut table = SymbolTable::new();
        table.add_symbol("a", int(Visibility::Global));
        table.enter_scope();

        assert_eq!(table.scope_depth(), 2);
        assert!(!table.exists_in_current_scope("a"));
        assert!(table.lookup("a"));
    }

    #[test]
    fn nearest_scope_wins() {
        let mut table = SymbolTable::new();
        table.add_symbol("a", int(Visibility::Global));
        table.enter_scope();
        table.add_symbol("a", Symbol::new("char", Visibility::Local));

        assert_eq!(table.resolve("a").unwrap().ty, "char");
        table.exit_scope();
        assert_eq!(table.resolve("a").unwrap().ty, "int");
    }

    #[test]
    fn add_overwrites_within_scope() {
        let mut scope = Scope::new();
        scope.insert("a", int(Visibility::Global));
        scope.insert("b", int(Visibility::Global));
        scope.insert("a", Symbol::new("bool", Visibility::Global));

        let names: Vec<_> = scope.iter().map(|(n, s)| format!("{} {}", n, s)).collect();
        assert_eq!(names, vec!["a bool-global", "b int-global"]);
    }

    #[test]
    fn renders_all_sections() {
        let mut table = SymbolTable::new();
        table.add_symbol("a", int(Visibility::Global));
        table.enter_scope();
        table.add_symbol("b", int(Visibility::Local));
        table.exit_scope();
        table.enter_scope();
        table.add_symbol("c", Symbol::new("char", Visibility::Local));

        assert_eq!(
            table.to_string(),
            "global scope:\n  a : int-global\n\
             local scope (exited):\n  b : int-local\n\
             local scope (active):\n  c : char-local\n"
        );
    }
}
