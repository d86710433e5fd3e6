//! protoc-gen-elm - Generate Elm types and JSON codecs from protobuf definitions
//!
//! Invoked by protoc (`protoc --elm_out=DIR file.proto`) the plugin reads a
//! `CodeGeneratorRequest` on stdin and answers with a `CodeGeneratorResponse`
//! on stdout. With `--descriptor-set` it instead reads a serialized
//! `FileDescriptorSet` and writes the generated modules to a directory.

use anyhow::{bail, Context, Result};
use clap::Parser;
use elmgen_core::{plugin, GeneratedFile, Generator, GeneratorConfig};
use prost::Message;
use prost_types::FileDescriptorSet;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Generate Elm types and JSON encoders/decoders from protobuf definitions
#[derive(Parser, Debug)]
#[command(name = "protoc-gen-elm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Read a serialized FileDescriptorSet instead of a protoc request on stdin
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,

    /// Output directory for generated .elm files (descriptor set mode)
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Schema file to generate from the descriptor set; repeatable (default: all)
    #[arg(long = "file", value_name = "NAME")]
    files: Vec<String>,

    /// Generator parameter, as given to protoc with --elm_opt
    #[arg(long, value_name = "PARAMS", default_value = "")]
    param: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dry run - don't write files, just show what would be generated
    #[arg(long)]
    dry_run: bool,

    /// Overwrite existing files without prompting
    #[arg(long)]
    force: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries the plugin response, so all logging goes to stderr
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.descriptor_set {
        Some(ref path) => run_descriptor_set(&cli, path),
        None => run_plugin(),
    }
}

/// Answer a single protoc request
fn run_plugin() -> Result<()> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("expected a CodeGeneratorRequest on stdin; run through protoc --elm_out=DIR or pass --descriptor-set");
    }

    debug!("Running as protoc plugin");
    plugin::run(stdin.lock(), io::stdout().lock()).context("Code generation failed")
}

/// Generate from a descriptor set file into the output directory
fn run_descriptor_set(cli: &Cli, path: &Path) -> Result<()> {
    if !path.is_file() {
        bail!("Descriptor set does not exist: {}", path.display());
    }

    let data = fs::read(path)
        .with_context(|| format!("Failed to read descriptor set: {}", path.display()))?;
    let set = FileDescriptorSet::decode(data.as_slice())
        .with_context(|| format!("Failed to decode descriptor set: {}", path.display()))?;
    info!("Loaded {} files from {}", set.file.len(), path.display());

    let config = GeneratorConfig::from_parameter(&cli.param).context("Invalid --param")?;
    let generated = Generator::with_config(config)
        .generate(&set.file, &cli.files)
        .context("Code generation failed")?;

    if generated.is_empty() {
        warn!("Descriptor set contained no files to generate");
    }

    let planned = plan_outputs(&cli.output, &generated)?;

    if cli.dry_run {
        for (output_path, file) in &planned {
            println!("Would write: {}", output_path.display());
            if cli.verbose > 0 {
                println!("---");
                println!("{}", file.content);
                println!("---");
            }
        }
        return Ok(());
    }

    // Nothing is written unless every target can be
    if !cli.force {
        check_conflicts(&planned)?;
    }
    for (output_path, file) in &planned {
        write_elm_file(output_path, &file.content, cli.force)?;
        println!("Wrote {}", output_path.display());
    }

    Ok(())
}

/// Resolve the target path of every generated file
fn plan_outputs<'a>(
    output_dir: &Path,
    generated: &'a [GeneratedFile],
) -> Result<Vec<(PathBuf, &'a GeneratedFile)>> {
    generated
        .iter()
        .map(|file| resolve_output_path(output_dir, file).map(|path| (path, file)))
        .collect()
}

/// Fail if any target already exists
fn check_conflicts(planned: &[(PathBuf, &GeneratedFile)]) -> Result<()> {
    let existing: Vec<String> = planned
        .iter()
        .filter(|(path, _)| path.exists())
        .map(|(path, _)| path.display().to_string())
        .collect();

    if !existing.is_empty() {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            existing.join(", ")
        );
    }
    Ok(())
}

/// Join a generated file name onto the output directory, refusing names
/// that would escape it.
fn resolve_output_path(output_dir: &Path, file: &GeneratedFile) -> Result<PathBuf> {
    let relative = Path::new(&file.name);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        bail!(
            "path traversal detected: '{}' would escape output directory",
            file.name
        );
    }
    Ok(output_dir.join(relative))
}

/// Write a generated module to disk
fn write_elm_file(output_path: &Path, content: &str, force: bool) -> Result<()> {
    // Create parent directories
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    // Check if file exists
    if output_path.exists() && !force {
        bail!(
            "File already exists: {} (use --force to overwrite)",
            output_path.display()
        );
    }

    let mut file = fs::File::create(output_path)
        .with_context(|| format!("Failed to create file: {}", output_path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write file: {}", output_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::FileDescriptorProto;
    use tempfile::TempDir;

    fn generated(name: &str) -> GeneratedFile {
        GeneratedFile {
            name: name.to_string(),
            content: "module Foo exposing (..)\n".to_string(),
        }
    }

    #[test]
    fn test_resolve_output_path() {
        let dir = Path::new("/out");
        assert_eq!(
            resolve_output_path(dir, &generated("Foo/Bar.elm")).unwrap(),
            PathBuf::from("/out/Foo/Bar.elm")
        );
        assert!(resolve_output_path(dir, &generated("../Escape.elm")).is_err());
        assert!(resolve_output_path(dir, &generated("/abs/Path.elm")).is_err());
    }

    #[test]
    fn test_write_elm_file_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Foo/Bar.elm");

        write_elm_file(&path, "first", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        assert!(write_elm_file(&path, "second", false).is_err());
        write_elm_file(&path, "second", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_descriptor_set_mode() {
        let temp_dir = TempDir::new().unwrap();
        let set = FileDescriptorSet {
            file: vec![FileDescriptorProto {
                name: Some("acme/empty.proto".to_string()),
                syntax: Some("proto3".to_string()),
                ..Default::default()
            }],
        };
        let set_path = temp_dir.path().join("set.pb");
        fs::write(&set_path, set.encode_to_vec()).unwrap();

        let out_dir = temp_dir.path().join("out");
        let cli = Cli::parse_from([
            "protoc-gen-elm",
            "--descriptor-set",
            set_path.to_str().unwrap(),
            "--output",
            out_dir.to_str().unwrap(),
        ]);
        run_descriptor_set(&cli, &set_path).unwrap();

        let content = fs::read_to_string(out_dir.join("Acme/Empty.elm")).unwrap();
        assert!(content.starts_with("module Acme.Empty exposing (..)\n"));
    }

    #[test]
    fn test_existing_target_blocks_every_write() {
        let temp_dir = TempDir::new().unwrap();
        let proto3 = |name: &str| FileDescriptorProto {
            name: Some(name.to_string()),
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };
        let set = FileDescriptorSet {
            file: vec![proto3("a.proto"), proto3("b.proto")],
        };
        let set_path = temp_dir.path().join("set.pb");
        fs::write(&set_path, set.encode_to_vec()).unwrap();

        let out_dir = temp_dir.path().join("out");
        fs::create_dir_all(&out_dir).unwrap();
        fs::write(out_dir.join("B.elm"), "existing").unwrap();

        let cli = Cli::parse_from([
            "protoc-gen-elm",
            "--descriptor-set",
            set_path.to_str().unwrap(),
            "--output",
            out_dir.to_str().unwrap(),
        ]);
        let err = run_descriptor_set(&cli, &set_path).unwrap_err();
        assert!(err.to_string().contains("B.elm"));
        assert!(!out_dir.join("A.elm").exists());
        assert_eq!(fs::read_to_string(out_dir.join("B.elm")).unwrap(), "existing");
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
