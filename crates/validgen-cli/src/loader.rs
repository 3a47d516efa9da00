// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! Discovery and parsing of compilation units.
//!
//! Every `.rs` file becomes one unit named after its file stem (dashes
//! mapped to underscores so the name stays a valid path segment in
//! annotations). Previously generated `*_gen.rs` companions are skipped so
//! regeneration never feeds on its own output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, bail};
use validgen::{Unit, UnitGraph};

/// One discovered source file and the unit it produced.
pub struct Source {
    /// Path of the input file.
    pub file: PathBuf,
    /// Unit path derived from the file stem.
    pub unit_path: String,
}

impl Source {
    /// Path of the generated companion, next to the input.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        let stem = self.file.file_stem().unwrap_or_default().to_string_lossy();
        self.file.with_file_name(format!("{stem}_gen.rs"))
    }
}

/// The loaded inputs of one run.
pub struct SourceSet {
    /// Discovered sources, in walk order.
    pub sources: Vec<Source>,
    /// Symbol graph over all loaded units.
    pub graph: UnitGraph,
}

/// Walk `paths`, parse every eligible `.rs` file and assemble the graph.
pub fn load_sources(paths: &[PathBuf]) -> anyhow::Result<SourceSet> {
    let mut files = Vec::new();
    for path in paths {
        collect_files(path, &mut files)?;
    }
    files.sort();
    files.dedup();
    if files.is_empty() {
        bail!("no .rs input files found");
    }

    let mut sources = Vec::new();
    let mut units = Vec::new();
    for file in files {
        let unit_path = unit_path_of(&file)?;
        if sources.iter().any(|s: &Source| s.unit_path == unit_path) {
            bail!("duplicate unit name {unit_path:?} (file stems must be unique)");
        }
        let text = fs::read_to_string(&file)
            .with_context(|| format!("reading {}", file.display()))?;
        let parsed = syn::parse_file(&text)
            .with_context(|| format!("parsing {}", file.display()))?;
        units.push(Unit::from_file(unit_path.clone(), &parsed));
        sources.push(Source { file, unit_path });
    }

    Ok(SourceSet {
        sources,
        graph: UnitGraph::new(units),
    })
}

fn collect_files(path: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let meta = fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
    if meta.is_dir() {
        let mut entries: Vec<_> = fs::read_dir(path)
            .with_context(|| format!("listing {}", path.display()))?
            .collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| e.path());
        for entry in entries {
            let child = entry.path();
            if child.is_dir() {
                collect_files(&child, out)?;
            } else if is_input(&child) {
                out.push(child);
            }
        }
        return Ok(());
    }
    if !is_input(path) {
        bail!("{} is not a .rs source file", path.display());
    }
    out.push(path.to_path_buf());
    Ok(())
}

fn is_input(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".rs") && !name.ends_with("_gen.rs")
}

fn unit_path_of(file: &Path) -> anyhow::Result<String> {
    let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
        bail!("{} has no usable file stem", file.display());
    };
    Ok(stem.replace('-', "_"))
}
