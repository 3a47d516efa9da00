// SPDX-FileCopyrightText: 2026 validgen contributors
// SPDX-License-Identifier: MIT

//! `validgen` binary: load compilation units from disk, run the generator,
//! write (or verify) the `<stem>_gen.rs` companions.

mod loader;

use std::{fs, path::PathBuf, process::ExitCode};

use anyhow::{Context as _, bail};
use clap::Parser;
use validgen::Generator;

use crate::loader::{SourceSet, load_sources};

/// Generate validation methods from `#[validate(...)]` field annotations.
#[derive(Parser)]
#[command(name = "validgen", version, about)]
struct Cli {
    /// Source files or directories to load; directories are walked
    /// recursively for `.rs` files.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Field attribute to read the error-key label from (for example
    /// `serde`, honoring `rename = "..."`).
    #[arg(long)]
    tag: Option<String>,

    /// Verify that existing generated files are up to date instead of
    /// writing them.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("validgen: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let SourceSet { sources, graph } = load_sources(&cli.paths)?;
    let generator = Generator::new().with_tag(cli.tag);

    let mut stale = Vec::new();
    for source in &sources {
        let Some(tokens) = generator
            .generate_unit(&graph, &source.unit_path)
            .with_context(|| format!("generating {}", source.file.display()))?
        else {
            continue;
        };
        let rendered = render(tokens)
            .with_context(|| format!("formatting output for {}", source.file.display()))?;
        let out_path = source.output_path();

        if cli.check {
            let existing = fs::read_to_string(&out_path).unwrap_or_default();
            if existing != rendered {
                stale.push(out_path);
            }
        } else {
            fs::write(&out_path, &rendered)
                .with_context(|| format!("writing {}", out_path.display()))?;
        }
    }

    if !stale.is_empty() {
        for path in &stale {
            eprintln!("out of date: {}", path.display());
        }
        bail!("{} generated file(s) out of date", stale.len());
    }
    Ok(())
}

/// Pretty-print the generated tokens under the standard header.
fn render(tokens: proc_macro2::TokenStream) -> anyhow::Result<String> {
    let file: syn::File = syn::parse2(tokens).context("generated tokens are not a valid file")?;
    let mut out = String::from("// Code generated by validgen. DO NOT EDIT.\n\n");
    out.push_str(&prettyplease::unparse(&file));
    Ok(out)
}
