//! Source discovery.
//!
//! [`SourceTree`] crawls the consumer crate from its root file, following
//! `mod` declarations the way rustc resolves them. Candidate and entity
//! scans then run over the collected modules without touching the
//! filesystem again.
//!
//! Nothing in here fails because of one bad file: unreadable or unparsable
//! module files are skipped with a warning, and the rest of the tree is
//! still scanned.

mod candidates;
mod display;
mod entities;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use syn::{Attribute, Item, ItemMod, ItemStruct, Meta};

use crate::error::{GenerateError, GenerateResult};

pub use candidates::discover_candidates;
pub use display::{canonical_display, canonical_display_str};
pub use entities::discover_entities;

/// One module of the consumer crate and its direct items.
///
/// Inline child modules are split out into their own `SourceModule`.
#[derive(Debug, Clone)]
pub struct SourceModule {
    namespace: Option<String>,
    file: Option<PathBuf>,
    items: Vec<Item>,
}

impl SourceModule {
    /// Module path relative to the crate root; `None` for the root.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// File the module was read from; `None` for in-memory sources.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn structs(&self) -> impl Iterator<Item = &ItemStruct> {
        self.items.iter().filter_map(|item| match item {
            Item::Struct(item) => Some(item),
            _ => None,
        })
    }
}

/// Every module of the consumer crate that discovery looks at.
#[derive(Debug, Clone, Default)]
pub struct SourceTree {
    modules: Vec<SourceModule>,
    files: Vec<PathBuf>,
}

impl SourceTree {
    /// Crawl the crate whose root (`lib.rs` or `main.rs`) lives in `src_dir`.
    pub fn load(src_dir: &Path) -> GenerateResult<Self> {
        let root = ["lib.rs", "main.rs"]
            .into_iter()
            .map(|name| src_dir.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| GenerateError::MissingCrateRoot(src_dir.to_path_buf()))?;

        let text = std::fs::read_to_string(&root).map_err(GenerateError::io(&root))?;
        let mut loader = Loader {
            tree: Self::default(),
            visited: HashSet::new(),
        };
        loader.visited.insert(root.clone());
        loader.tree.files.push(root.clone());
        match syn::parse_file(&text) {
            Ok(file) => loader.add_items(Vec::new(), Some(&root), src_dir, src_dir, file.items),
            Err(err) => {
                tracing::warn!(path = %root.display(), error = %err, "crate root does not parse; nothing to scan");
            }
        }

        tracing::debug!(
            modules = loader.tree.modules.len(),
            files = loader.tree.files.len(),
            "loaded source tree"
        );
        Ok(loader.tree)
    }

    /// Build a tree from in-memory `(module path, source)` pairs.
    ///
    /// The module path is relative to the crate root (`""` for the root,
    /// `"domain::billing"` otherwise). Inline `mod` blocks are descended
    /// into; `mod name;` declarations are not resolved. Sources that fail
    /// to parse are skipped with a warning.
    pub fn from_sources<'a, I>(sources: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut loader = Loader {
            tree: Self::default(),
            visited: HashSet::new(),
        };
        for (module, source) in sources {
            let relative = match module.strip_prefix("crate") {
                Some(rest) if rest.is_empty() || rest.starts_with("::") => rest,
                _ => module,
            };
            let path: Vec<String> = relative
                .split("::")
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect();
            match syn::parse_file(source) {
                Ok(file) => loader.add_items(path, None, Path::new(""), Path::new(""), file.items),
                Err(err) => tracing::warn!(module, error = %err, "source does not parse; skipped"),
            }
        }
        loader.tree
    }

    pub fn modules(&self) -> &[SourceModule] {
        &self.modules
    }

    /// Every file read while loading, for `cargo:rerun-if-changed`.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The struct `name` declared directly in `namespace`.
    pub fn find_struct(&self, namespace: Option<&str>, name: &str) -> Option<&ItemStruct> {
        self.modules
            .iter()
            .filter(|module| module.namespace() == namespace)
            .flat_map(SourceModule::structs)
            .find(|item| item.ident == name)
    }
}

struct Loader {
    tree: SourceTree,
    visited: HashSet<PathBuf>,
}

impl Loader {
    /// Record one module and recurse into its children.
    ///
    /// `child_dir` is where `mod name;` declarations of this module resolve,
    /// `path_base` is where their `#[path]` attributes resolve.
    fn add_items(
        &mut self,
        path: Vec<String>,
        file: Option<&Path>,
        child_dir: &Path,
        path_base: &Path,
        items: Vec<Item>,
    ) {
        let mut own = Vec::with_capacity(items.len());
        let mut children = Vec::new();

        for item in items {
            match item {
                Item::Mod(module) if is_cfg_test(&module.attrs) => {
                    tracing::trace!(module = %module.ident, "skipping test module");
                }
                Item::Mod(module) => children.push(module),
                other => own.push(other),
            }
        }

        self.tree.modules.push(SourceModule {
            namespace: (!path.is_empty()).then(|| path.join("::")),
            file: file.map(Path::to_path_buf),
            items: own,
        });

        for module in children {
            self.add_child(&path, file, child_dir, path_base, module);
        }
    }

    fn add_child(
        &mut self,
        parent: &[String],
        file: Option<&Path>,
        child_dir: &Path,
        path_base: &Path,
        module: ItemMod,
    ) {
        let name = module.ident.to_string();
        let mut path = parent.to_vec();
        path.push(name.clone());
        let dir_name = name.strip_prefix("r#").unwrap_or(&name).to_owned();

        if let Some((_, items)) = module.content {
            let nested_dir = path_attr(&module.attrs)
                .map_or_else(|| child_dir.join(&dir_name), |custom| child_dir.join(custom));
            self.add_items(path, file, &nested_dir, &nested_dir, items);
            return;
        }

        // In-memory sources have nothing to resolve against.
        if file.is_none() {
            tracing::debug!(module = %path.join("::"), "out-of-line module in in-memory source; skipped");
            return;
        }

        let candidates = match path_attr(&module.attrs) {
            Some(custom) => vec![path_base.join(custom)],
            None => vec![
                child_dir.join(format!("{dir_name}.rs")),
                child_dir.join(&dir_name).join("mod.rs"),
            ],
        };
        let Some(found) = candidates.into_iter().find(|candidate| candidate.is_file()) else {
            tracing::warn!(module = %path.join("::"), "module file not found; skipped");
            return;
        };
        if !self.visited.insert(found.clone()) {
            return;
        }

        let text = match std::fs::read_to_string(&found) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %found.display(), error = %err, "cannot read module file; skipped");
                return;
            }
        };
        self.tree.files.push(found.clone());

        let parsed = match syn::parse_file(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(path = %found.display(), error = %err, "module file does not parse; skipped");
                return;
            }
        };

        // `foo.rs` owns `foo/`; `foo/mod.rs` and `#[path]` files own their directory.
        let is_mod_rs = found.file_name().is_some_and(|file_name| file_name == "mod.rs")
            || path_attr(&module.attrs).is_some();
        let next_dir = if is_mod_rs {
            found.parent().map_or_else(PathBuf::new, Path::to_path_buf)
        } else {
            child_dir.join(&dir_name)
        };
        let next_base = found.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        self.add_items(path, Some(&found), &next_dir, &next_base, parsed.items);
    }
}

/// `#[cfg(test)]`
fn is_cfg_test(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| match &attr.meta {
        Meta::List(list) if list.path.is_ident("cfg") => list.tokens.to_string().trim() == "test",
        _ => false,
    })
}

/// `#[path = "..."]`
fn path_attr(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("path") => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => Some(lit.value()),
            _ => None,
        },
        _ => None,
    })
}
