use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use stmtgen::{
    statement_file_stem, ConfigFile, Error, GeneratedModule, Options, Pipeline, PlaceholderMode,
    ReturnShape, GENERATED_FILE_SUFFIX, SOURCE_SUFFIX,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "stmtgen")]
#[command(about = "stmtgen - typed Go accessors from annotated .sql files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Go accessors from .sql files
    Generate(GenerateArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Folder to scan for .sql files
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Folder that receives the generated package folder
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Package (and folder) name of the generated files
    #[arg(long, visible_alias = "genPkg")]
    package: Option<String>,

    /// Placeholder written into statements: named (@name), positional (?), sequential ($1)
    #[arg(long, value_enum)]
    placeholder: Option<PlaceholderMode>,

    /// Argument payload: keyed (map[string]any, named only) or ordered ([]any)
    #[arg(long, value_enum, visible_alias = "returnType")]
    return_shape: Option<ReturnShape>,

    /// TOML file with defaults for the options above
    #[arg(long)]
    config: Option<PathBuf>,

    /// Remove previously generated files from the package folder first
    #[arg(long)]
    clean: bool,

    /// Read one statement file from stdin and print the module
    #[arg(long)]
    stdin: bool,

    /// Base name used for stdin input
    #[arg(long, default_value = "statements")]
    name: String,

    /// With --stdin, print the module as JSON
    #[arg(long, requires = "stdin")]
    json: bool,
}

/// Effective settings after merging flags over the config file
struct Settings {
    input: PathBuf,
    output: PathBuf,
    options: Options,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => run_generate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn resolve_settings(args: &GenerateArgs) -> anyhow::Result<Settings> {
    let file = match &args.config {
        Some(path) => ConfigFile::load(path)
            .with_context(|| format!("cannot load config file {}", path.display()))?,
        None => ConfigFile::default(),
    };
    let defaults = Options::default();

    Ok(Settings {
        input: args.input.clone().or(file.input).unwrap_or_else(|| PathBuf::from(".")),
        output: args.output.clone().or(file.output).unwrap_or_else(|| PathBuf::from(".")),
        options: Options {
            package: args.package.clone().or(file.package).unwrap_or(defaults.package),
            placeholder: args.placeholder.or(file.placeholder).unwrap_or(defaults.placeholder),
            return_shape: args.return_shape.or(file.return_shape).unwrap_or(defaults.return_shape),
        },
    })
}

fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let settings = resolve_settings(&args)?;
    // Validated before anything is read from disk.
    let pipeline = Pipeline::new(settings.options.clone())?;

    if args.stdin {
        return generate_stdin(&pipeline, &args.name, args.json);
    }

    generate_directory(&pipeline, &settings.input, &settings.output, args.clean)
}

fn generate_stdin(pipeline: &Pipeline, name: &str, json_output: bool) -> anyhow::Result<()> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source).context("cannot read stdin")?;

    let module = compile(pipeline, name, &source, "<stdin>")?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&module)?);
    } else {
        print!("{}", module.code);
    }
    Ok(())
}

/// Statement files under `dir` in file-name order, first file per base name.
fn collect_statement_files(dir: &Path) -> anyhow::Result<Vec<(String, PathBuf)>> {
    let mut files: Vec<(String, PathBuf)> = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("cannot walk input dir {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(stem) = entry.file_name().to_str().and_then(statement_file_stem) else {
            continue;
        };

        match files.iter().find(|(name, _)| name == stem) {
            Some((_, first)) => warn!(
                skipped = %entry.path().display(),
                kept = %first.display(),
                "statement file with the same name already parsed"
            ),
            None => files.push((stem.to_string(), entry.path().to_path_buf())),
        }
    }

    Ok(files)
}

fn generate_directory(pipeline: &Pipeline, input: &Path, output: &Path, clean: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    let files = collect_statement_files(input)?;
    if files.is_empty() {
        warn!(input = %input.display(), "no {} files found", SOURCE_SUFFIX);
    }

    let mut modules = Vec::with_capacity(files.len());
    for (name, path) in &files {
        let source = fs::read_to_string(path)
            .with_context(|| format!("cannot read statement file {}", path.display()))?;
        modules.push(compile(pipeline, name, &source, &path.display().to_string())?);
    }

    let out_dir = output.join(pipeline.package());
    prepare_output_dir(&out_dir, clean)?;

    for module in &modules {
        let path = out_dir.join(module.file_name());
        fs::write(&path, &module.code)
            .with_context(|| format!("cannot write generated file {}", path.display()))?;
        print_generated(&path.display().to_string());
    }

    print_summary(modules.len(), start.elapsed());
    Ok(())
}

/// Compile, printing parse errors with source context.
fn compile(pipeline: &Pipeline, name: &str, source: &str, filename: &str) -> anyhow::Result<GeneratedModule> {
    match pipeline.compile(name, source) {
        Ok(module) => Ok(module),
        Err(err @ Error::Parse(_)) => {
            if io::stderr().is_terminal() {
                eprint!("{}", err.render_color(source, filename));
            } else {
                eprint!("{}", err.render(source, filename));
            }
            bail!("cannot generate accessors for {}", filename)
        }
        Err(err) => Err(err).with_context(|| format!("cannot generate accessors for {}", filename)),
    }
}

fn prepare_output_dir(dir: &Path, clean: bool) -> anyhow::Result<()> {
    if !dir.exists() {
        info!(dir = %dir.display(), "directory for generated files will be created");
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create folder for generated files {}", dir.display()))?;
        return Ok(());
    }

    if clean {
        for entry in fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
            let path = entry?.path();
            let generated = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(GENERATED_FILE_SUFFIX));
            if generated && path.is_file() {
                fs::remove_file(&path).with_context(|| format!("cannot remove {}", path.display()))?;
                info!(file = %path.display(), "removed stale generated file");
            }
        }
    }
    Ok(())
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\n\x1b[1mGenerated {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("\nGenerated {} {} in {}", count, files_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
