//! Module resolution, execution and caching.
//!
//! `std:` sources map to built-in capsule tables. Any other source is a file
//! path relative to the directory of the module doing the import (the
//! configured base directory for the entry program). A file module runs in
//! a fresh child frame of the importer's frame; the bindings that frame owns
//! afterwards form the module's export table.

use crate::config::CachePolicy;
use crate::error::{EvalError, EvalResult};
use crate::evaluator::{Flow, Interpreter};
use crate::stdlib;
use crate::value::Value;
use gravox_parser::parse_source;
use gravox_types::ast::{ImportKind, ImportStmt};
use gravox_types::SourceFile;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Exported name → value.
pub type ExportTable = BTreeMap<String, Value>;

/// A module that has finished executing.
#[derive(Debug, Clone)]
pub struct CachedModule {
    /// Hex SHA-256 of the source the exports were produced from.
    pub digest: String,
    pub exports: ExportTable,
}

/// Resolved path → executed module.
#[derive(Debug, Default)]
pub struct ModuleCache {
    entries: HashMap<PathBuf, CachedModule>,
    /// Modules whose top level is currently running.
    loading: Vec<PathBuf>,
}

impl ModuleCache {
    pub fn get(&self, path: &Path) -> Option<&CachedModule> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Hex SHA-256 digest of module source text.
pub fn source_digest(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

impl Interpreter {
    /// Drop every cached module; the next import of each re-executes it.
    pub fn invalidate_modules(&mut self) {
        self.modules.clear();
    }

    pub fn module_cache(&self) -> &ModuleCache {
        &self.modules
    }

    pub(crate) fn exec_import(&mut self, stmt: &ImportStmt) -> EvalResult<()> {
        let exports = self.load_exports(&stmt.source)?;
        match &stmt.kind {
            ImportKind::Wildcard => {
                for (name, value) in exports {
                    self.env.define(self.current, &name, value);
                }
            }
            ImportKind::Named(items) => {
                for item in items {
                    let value = exports.get(&item.name.name).cloned().ok_or_else(|| {
                        EvalError::ExportNotFound {
                            name: item.name.name.clone(),
                            module: stmt.source.clone(),
                        }
                    })?;
                    self.env.define(self.current, item.local_name(), value);
                }
            }
        }
        Ok(())
    }

    fn load_exports(&mut self, source: &str) -> EvalResult<ExportTable> {
        if let Some(name) = source.strip_prefix("std:") {
            return stdlib::module_exports(name)
                .ok_or_else(|| EvalError::ImportNotFound(source.to_string()));
        }

        let path = self
            .current_dir()
            .join(source)
            .canonicalize()
            .map_err(|_| EvalError::ImportNotFound(source.to_string()))?;
        let policy = self.config.module_cache;

        if policy == CachePolicy::Reuse {
            if let Some(cached) = self.modules.get(&path) {
                return Ok(cached.exports.clone());
            }
        }
        if self.modules.loading.contains(&path) {
            return Err(EvalError::CircularImport(source.to_string()));
        }

        let text = std::fs::read_to_string(&path)
            .map_err(|_| EvalError::ImportNotFound(source.to_string()))?;
        let digest = source_digest(&text);
        if policy == CachePolicy::Revalidate {
            if let Some(cached) = self.modules.get(&path) {
                if cached.digest == digest {
                    return Ok(cached.exports.clone());
                }
            }
        }

        let exports = self.execute_module(&path, text)?;
        if policy != CachePolicy::Disabled {
            self.modules.entries.insert(
                path,
                CachedModule {
                    digest,
                    exports: exports.clone(),
                },
            );
        }
        Ok(exports)
    }

    /// Lex, parse and run a module file, returning what it binds at its top
    /// level.
    fn execute_module(&mut self, path: &Path, text: String) -> EvalResult<ExportTable> {
        let source_file = SourceFile::new(path.display().to_string(), text);
        let (program, lexed) = parse_source(&source_file);
        self.report_lex_errors(&lexed.errors);
        let program = program.map_err(|e| EvalError::Syntax(Box::new(e)))?;

        self.module_paths.push(path.to_path_buf());
        self.modules.loading.push(path.to_path_buf());

        let parent = self.current;
        let result = self.with_frame(parent, |interp| {
            match interp.exec_stmts(&program.stmts)? {
                Flow::Normal => Ok(interp.env.bindings(interp.current).clone()),
                Flow::Return(_) => Err(EvalError::ReturnOutsideFunction),
            }
        });

        self.modules.loading.pop();
        self.module_paths.pop();
        result
    }

    /// Directory relative imports resolve against right now.
    fn current_dir(&self) -> &Path {
        self.module_paths
            .last()
            .and_then(|path| path.parent())
            .unwrap_or(self.config.base_dir.as_path())
    }
}
