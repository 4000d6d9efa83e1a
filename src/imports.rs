use indexmap::IndexMap;

/// Per-file registry of runtime helper imports. Each helper gets a stable
/// local alias on first registration; later registrations return the same
/// alias. One registry exists per compiled file and outlives every component
/// invocation in it.
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    module: String,
    helpers: IndexMap<String, String>,
}

impl ImportRegistry {
    pub fn new(module: impl Into<String>) -> Self {
        ImportRegistry {
            module: module.into(),
            helpers: IndexMap::new(),
        }
    }

    /// Returns the local binding for a named runtime helper, registering the
    /// import on first use.
    pub fn register(&mut self, name: &str) -> String {
        if let Some(alias) = self.helpers.get(name) {
            return alias.clone();
        }
        let alias = format!("_${}", name);
        log::debug!("registering runtime helper {} as {}", name, alias);
        self.helpers.insert(name.to_string(), alias.clone());
        alias
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty()
    }

    /// Renders the import statement for everything registered so far, in
    /// first-registration order.
    pub fn render(&self) -> String {
        if self.helpers.is_empty() {
            return String::new();
        }
        let specifiers = self
            .helpers
            .iter()
            .map(|(name, alias)| format!("{} as {}", name, alias))
            .collect::<Vec<_>>()
            .join(", ");
        format!("import {{ {} }} from \"{}\";", specifiers, self.module)
    }
}
