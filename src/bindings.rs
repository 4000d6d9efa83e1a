use std::collections::HashMap;

use crate::ir::CompileError;

/// How a name was introduced in the scope enclosing the component invocation.
/// The driver collects these while walking the module; the pass only reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Const,
    Let,
    Var,
    Function,
    Import,
}

impl BindingKind {
    /// A binding whose value can be reassigned after initialization.
    pub fn is_mutable(self) -> bool {
        matches!(self, BindingKind::Let | BindingKind::Var)
    }
}

/// Scope information for the compiled file. Frozen by the driver once the
/// module walk is complete, before any component is compiled.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: HashMap<String, BindingKind>,
    frozen: bool,
}

impl BindingTable {
    pub fn new() -> Self {
        BindingTable::default()
    }

    pub fn add(&mut self, name: &str, kind: BindingKind) -> Result<(), CompileError> {
        if self.frozen {
            return Err(CompileError::FrozenBindingTable(name.to_string()));
        }
        self.bindings.insert(name.to_string(), kind);
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn kind_of(&self, name: &str) -> Option<BindingKind> {
        self.bindings.get(name).copied()
    }

    pub fn is_mutable(&self, name: &str) -> bool {
        self.kind_of(name).is_some_and(BindingKind::is_mutable)
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_after_freeze_is_rejected() {
        let mut table = BindingTable::new();
        table.add("count", BindingKind::Let).unwrap();
        table.freeze();
        assert!(table.add("other", BindingKind::Const).is_err());
        assert!(table.is_mutable("count"));
        assert!(!table.is_mutable("missing"));
    }
}
