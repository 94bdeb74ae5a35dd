//! Function registry: a one-time pre-scan of top-level function declarations.

use jstep_ir::Stmt;

use crate::{BlockIndex, Unit, UnitKind};

/// Signature and extent of a top-level function declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<String>,
    /// 1-based line of the `function` header.
    pub start_line: u32,
    /// 1-based line of the closing `}`.
    pub end_line: u32,
    /// Unit index of the header.
    pub header: usize,
    /// Unit index of the closing `}`.
    pub end: usize,
}

/// Top-level functions by name, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FunctionRegistry {
    defs: Vec<FunctionDef>,
}

impl FunctionRegistry {
    /// Collect every function header at block depth 0. A later declaration
    /// of the same name replaces the earlier one.
    pub fn scan(units: &[Unit], blocks: &BlockIndex) -> Self {
        let mut registry = FunctionRegistry::default();
        let mut depth = 0usize;

        for (index, unit) in units.iter().enumerate() {
            match unit.kind {
                UnitKind::Header => {
                    if depth == 0 {
                        if let Ok(Stmt::FunctionDecl { name, params }) = &unit.stmt {
                            let end = blocks.end_of(index).unwrap_or(index);
                            registry.insert(FunctionDef {
                                name: name.clone(),
                                params: params.clone(),
                                start_line: unit.line,
                                end_line: units[end].line,
                                header: index,
                                end,
                            });
                        }
                    }
                    depth += 1;
                }
                UnitKind::BlockEnd => depth = depth.saturating_sub(1),
                UnitKind::Statement => {}
            }
        }

        tracing::debug!(count = registry.defs.len(), "function registry built");
        registry
    }

    fn insert(&mut self, def: FunctionDef) {
        if let Some(existing) = self.defs.iter_mut().find(|d| d.name == def.name) {
            *existing = def;
        } else {
            self.defs.push(def);
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.defs.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FunctionDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
