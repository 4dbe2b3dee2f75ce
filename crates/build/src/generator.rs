//! The generation pass: discovery, emission and output.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::config::{CONFIG_FILE, GeneratorConfig};
use crate::descriptor::{EntityProperty, PayloadGroup, ValueDescriptor};
use crate::discovery::{SourceTree, discover_candidates, discover_entities};
use crate::emit::{self, EmitterKind, WrapperContext, namespace_camel};
use crate::error::{GenerateError, GenerateResult};
use crate::kind::{Classification, KindClassifier, full_name, simple_name};
use crate::unit::{GeneratedUnit, HEADER};

/// Directory under `OUT_DIR` holding the units.
pub const UNIT_DIR: &str = "valuegen";
/// Index file under `OUT_DIR` that `include!`s every unit.
pub const INDEX_FILE: &str = "valuegen.rs";
const STAGING_DIR: &str = ".valuegen.staging";

// ============================================================================
// GROUPING
// ============================================================================

/// Group descriptors by payload display and name each group.
///
/// Groups come out ordered by display. A group is named after the payload's
/// simple name; groups whose simple names collide use the full-path name.
pub fn group_by_payload(descriptors: &[ValueDescriptor]) -> Vec<PayloadGroup> {
    let mut by_display: BTreeMap<&str, Vec<ValueDescriptor>> = BTreeMap::new();
    for descriptor in descriptors {
        by_display
            .entry(descriptor.payload_type_display.as_str())
            .or_default()
            .push(descriptor.clone());
    }

    let mut simple_counts: HashMap<String, usize> = HashMap::new();
    for display in by_display.keys() {
        *simple_counts.entry(simple_name(display)).or_default() += 1;
    }

    by_display
        .into_iter()
        .map(|(display, members)| {
            let simple = simple_name(display);
            let name = if simple_counts[&simple] > 1 { full_name(display) } else { simple };
            PayloadGroup {
                payload_type_display: display.to_owned(),
                name,
                members,
            }
        })
        .collect()
}

/// Converter stem per wrapper: the type name, or namespace + type name when
/// the type name is not unique.
///
/// Stems are assigned in descriptor order. A stem whose converter names are
/// already taken, by an earlier wrapper or by a group's `As` items, falls
/// back to the namespaced form and then to a numbered one.
fn converter_stems(
    descriptors: &[ValueDescriptor],
    groups: &[PayloadGroup],
) -> HashMap<(Option<String>, String), String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for descriptor in descriptors {
        *counts.entry(descriptor.type_name.as_str()).or_default() += 1;
    }

    let mut taken: HashSet<String> = groups
        .iter()
        .flat_map(|group| [format!("As{}", group.name), format!("{}AsExt", group.name)])
        .collect();
    let clashes = |stem: &str, taken: &HashSet<String>| converter_names(stem).iter().any(|name| taken.contains(name));

    let mut stems = HashMap::with_capacity(descriptors.len());
    for d in descriptors {
        let namespaced = format!("{}{}", namespace_camel(d.namespace.as_deref()), crate::kind::upper_camel(&d.type_name));
        let mut stem = if counts[d.type_name.as_str()] > 1 {
            namespaced.clone()
        } else {
            d.type_name.strip_prefix("r#").unwrap_or(&d.type_name).to_owned()
        };
        if clashes(&stem, &taken) {
            stem.clone_from(&namespaced);
            let mut n = 2;
            while clashes(&stem, &taken) {
                stem = format!("{namespaced}{n}");
                n += 1;
            }
            tracing::debug!(wrapper = %d, stem = %stem, "converter name taken; using a qualified stem");
        }
        taken.extend(converter_names(&stem));
        stems.insert((d.namespace.clone(), d.type_name.clone()), stem);
    }
    stems
}

fn converter_names(stem: &str) -> [String; 2] {
    [format!("{stem}Converter"), format!("{stem}NullableConverter")]
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Runs discovery and every enabled emitter.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

/// Everything one pass produced.
#[derive(Debug, Default)]
pub struct GenerationOutput {
    descriptors: Vec<ValueDescriptor>,
    properties: Vec<EntityProperty>,
    units: Vec<GeneratedUnit>,
    diagnostics: Vec<GenerateError>,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Discover value objects in `tree` and emit their units.
    pub fn generate(&self, tree: &SourceTree) -> GenerationOutput {
        let descriptors = discover_candidates(tree);
        let properties = if self.config.generate_relational_adapter {
            discover_entities(tree, &descriptors)
        } else {
            Vec::new()
        };
        self.emit(&descriptors, &properties)
    }

    /// Emit units for already-discovered descriptors and entity properties.
    ///
    /// A unit that fails validation is reported in
    /// [`GenerationOutput::diagnostics`]; the remaining units are unaffected.
    pub fn emit(&self, descriptors: &[ValueDescriptor], properties: &[EntityProperty]) -> GenerationOutput {
        let mut classifier = KindClassifier::new();
        let classifications: HashMap<&str, Classification> = descriptors
            .iter()
            .map(|d| {
                let display = d.payload_type_display.as_str();
                (display, classifier.classify(display).clone())
            })
            .collect();

        let mut out = GenerationOutput {
            descriptors: descriptors.to_vec(),
            properties: properties.to_vec(),
            ..GenerationOutput::default()
        };
        let groups = group_by_payload(descriptors);
        let stems = converter_stems(descriptors, &groups);
        let mut registered = Vec::new();

        for descriptor in descriptors {
            let stem = descriptor.unit_stem();
            let classification = &classifications[descriptor.payload_type_display.as_str()];
            let ctx = match WrapperContext::new(descriptor, classification) {
                Ok(ctx) => ctx,
                Err(err) => {
                    tracing::error!(wrapper = %descriptor, error = %err, "cannot generate wrapper");
                    out.diagnostics.push(err);
                    continue;
                }
            };

            out.push(GeneratedUnit::render(&stem, EmitterKind::Operators, emit::operators::emit(&ctx)));
            out.push(GeneratedUnit::render(&stem, EmitterKind::Parse, emit::parse::emit(&ctx)));

            if self.config.generate_relational_adapter {
                let key = (descriptor.namespace.clone(), descriptor.type_name.clone());
                let converter_stem = stems.get(&key).map_or(descriptor.type_name.as_str(), String::as_str);
                out.push(
                    emit::relational::emit(&ctx, converter_stem)
                        .and_then(|tokens| GeneratedUnit::render(&stem, EmitterKind::Relational, tokens)),
                );
            }

            if self.config.generate_document_store_adapter {
                out.push(GeneratedUnit::render(&stem, EmitterKind::Document, emit::document::emit(&ctx)));
                registered.push(ctx.wrapper.clone());
            }
        }

        for group in groups {
            let classification = &classifications[group.payload_type_display.as_str()];
            let unit = group
                .members
                .iter()
                .map(|member| WrapperContext::new(member, classification))
                .collect::<GenerateResult<Vec<_>>>()
                .and_then(|members| emit::extensions::emit(&group, &members))
                .and_then(|tokens| {
                    GeneratedUnit::render(&format!("As{}", group.name), EmitterKind::Extensions, tokens)
                });
            out.push(unit);
        }

        if self.config.generate_relational_adapter {
            let mut by_entity: BTreeMap<(Option<&str>, &str), Vec<EntityProperty>> = BTreeMap::new();
            for property in properties {
                by_entity
                    .entry((property.entity_namespace.as_deref(), property.entity_name.as_str()))
                    .or_default()
                    .push(property.clone());
            }
            for rows in by_entity.values() {
                let stem_of = |p: &EntityProperty| {
                    stems
                        .get(&(p.wrapper_namespace.clone(), p.wrapper_type_name.clone()))
                        .cloned()
                        .unwrap_or_else(|| p.wrapper_type_name.clone())
                };
                let unit = emit::relational::emit_entity(rows, stem_of).and_then(|tokens| {
                    GeneratedUnit::render(&rows[0].entity_stem(), EmitterKind::EntityConverters, tokens)
                });
                out.push(unit);
            }
        }

        if self.config.generate_document_store_adapter {
            out.push(GeneratedUnit::render(
                "DocumentSerializers",
                EmitterKind::Registration,
                emit::document::emit_registration(&registered),
            ));
        }

        tracing::info!(
            wrappers = out.descriptors.len(),
            units = out.units.len(),
            failed = out.diagnostics.len(),
            "valuegen pass complete"
        );
        out
    }
}

impl GenerationOutput {
    fn push(&mut self, unit: GenerateResult<GeneratedUnit>) {
        match unit {
            Ok(unit) => self.units.push(unit),
            Err(err) => {
                tracing::error!(error = %err, "generation failed for one unit");
                self.diagnostics.push(err);
            }
        }
    }

    pub fn descriptors(&self) -> &[ValueDescriptor] {
        &self.descriptors
    }

    pub fn properties(&self) -> &[EntityProperty] {
        &self.properties
    }

    pub fn units(&self) -> &[GeneratedUnit] {
        &self.units
    }

    /// Generation-fatal problems of individual units.
    pub fn diagnostics(&self) -> &[GenerateError] {
        &self.diagnostics
    }

    /// The unit called `name`, if it was generated.
    pub fn unit(&self, name: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|unit| unit.name() == name)
    }

    /// Write every unit to `out_dir/valuegen/` and the index to
    /// `out_dir/valuegen.rs`; returns the index path.
    ///
    /// Units are written to a staging directory first, which replaces the
    /// previous output only once every unit has been written.
    pub fn write_to(&self, out_dir: &Path) -> GenerateResult<PathBuf> {
        let staging = out_dir.join(STAGING_DIR);
        let target = out_dir.join(UNIT_DIR);
        let index = out_dir.join(INDEX_FILE);

        remove_dir_if_exists(&staging)?;
        std::fs::create_dir_all(&staging).map_err(GenerateError::io(&staging))?;
        for unit in &self.units {
            let path = staging.join(unit.name());
            std::fs::write(&path, unit.contents()).map_err(GenerateError::io(&path))?;
        }

        remove_dir_if_exists(&target)?;
        std::fs::rename(&staging, &target).map_err(GenerateError::io(&target))?;

        let mut text = format!("{HEADER}\n");
        for unit in &self.units {
            let path = target.join(unit.name());
            text.push_str(&format!("include!({:?});\n", path.display().to_string()));
        }
        let index_tmp = out_dir.join(format!("{INDEX_FILE}.tmp"));
        std::fs::write(&index_tmp, text).map_err(GenerateError::io(&index_tmp))?;
        std::fs::rename(&index_tmp, &index).map_err(GenerateError::io(&index))?;

        tracing::debug!(path = %index.display(), units = self.units.len(), "wrote generated units");
        Ok(index)
    }
}

fn remove_dir_if_exists(path: &Path) -> GenerateResult<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(GenerateError::io(path)(err)),
    }
}

// ============================================================================
// BUILD SCRIPT ENTRY
// ============================================================================

/// Configures one generation pass from a build script.
#[derive(Debug, Clone)]
pub struct Builder {
    manifest_dir: PathBuf,
    out_dir: PathBuf,
    src_dir: Option<PathBuf>,
    config: Option<GeneratorConfig>,
    emit_cargo_directives: bool,
}

impl Builder {
    pub fn new(manifest_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest_dir: manifest_dir.into(),
            out_dir: out_dir.into(),
            src_dir: None,
            config: None,
            emit_cargo_directives: true,
        }
    }

    /// Read `CARGO_MANIFEST_DIR` and `OUT_DIR`.
    pub fn from_env() -> GenerateResult<Self> {
        let manifest_dir = std::env::var_os("CARGO_MANIFEST_DIR").ok_or(GenerateError::MissingEnv("CARGO_MANIFEST_DIR"))?;
        let out_dir = std::env::var_os("OUT_DIR").ok_or(GenerateError::MissingEnv("OUT_DIR"))?;
        Ok(Self::new(manifest_dir, out_dir))
    }

    /// Source directory to scan; `<manifest>/src` by default.
    pub fn src_dir(mut self, src_dir: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(src_dir.into());
        self
    }

    /// Use `config` instead of reading `valuegen.toml`.
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Print `cargo:` directives (on by default).
    pub fn emit_cargo_directives(mut self, enabled: bool) -> Self {
        self.emit_cargo_directives = enabled;
        self
    }

    /// Load, generate, write.
    pub fn run(self) -> GenerateResult<GenerationOutput> {
        let config_path = self.manifest_dir.join(CONFIG_FILE);
        let config = match self.config {
            Some(config) => config,
            None => GeneratorConfig::load(&config_path)?,
        };
        let src_dir = self.src_dir.unwrap_or_else(|| self.manifest_dir.join("src"));

        let tree = SourceTree::load(&src_dir)?;
        let output = Generator::new(config).generate(&tree);
        output.write_to(&self.out_dir)?;

        if self.emit_cargo_directives {
            // A missing path would make cargo rerun on every build.
            if config_path.is_file() {
                println!("cargo:rerun-if-changed={}", config_path.display());
            }
            for file in tree.files() {
                println!("cargo:rerun-if-changed={}", file.display());
            }
            for diagnostic in output.diagnostics() {
                println!("cargo:warning=valuegen: {diagnostic}");
            }
        }
        Ok(output)
    }
}

/// Generate for the crate being built, with its `valuegen.toml` if any.
///
/// ```rust,ignore
/// // build.rs
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     valuegen_build::compile()?;
///     Ok(())
/// }
/// ```
pub fn compile() -> GenerateResult<GenerationOutput> {
    Builder::from_env()?.run()
}
