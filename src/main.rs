#![allow(unused_assignments)]

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hocon::{
    ErrorKind, FileResolver, HoconError, HoconResult, HoconWriter, OutputFormat, Reader, Sink,
    Store,
};

/// HOCON-style configuration tool
///
/// Validates, queries, reformats and flattens configuration files.
#[derive(Parser)]
#[command(name = "hocon")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Delimiter joining path segments in the store
    #[arg(long, global = true, default_value = ".")]
    delimiter: String,

    /// Directory includes resolve against (defaults to the file's directory)
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file and report errors
    Check {
        /// Source file (`-` for stdin)
        file: PathBuf,
    },

    /// Print the value at a path
    Get {
        /// Source file (`-` for stdin)
        file: PathBuf,

        /// Path to look up, joined with the delimiter
        path: String,
    },

    /// Rewrite a file in canonical block form
    Fmt {
        /// Source file (`-` for stdin)
        file: PathBuf,

        /// Comment header to put at the top
        #[arg(long)]
        header: Option<String>,

        /// Write formatted output back to the file
        #[arg(short, long)]
        write: bool,
    },

    /// Print the parsed store
    Dump {
        /// Source file (`-` for stdin)
        file: PathBuf,

        /// Output format: flat, json, json-pretty, hocon
        #[arg(short, long, default_value = "flat")]
        format: String,
    },
}

/// Exit status for a path that is not in the store
const EXIT_MISSING_PATH: u8 = 2;

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let loader = Loader {
        delimiter: cli.delimiter,
        base_dir: cli.base_dir,
    };

    let result = match cli.command {
        Commands::Check { file } => cmd_check(&loader, &file),
        Commands::Get { file, path } => cmd_get(&loader, &file, &path),
        Commands::Fmt {
            file,
            header,
            write,
        } => cmd_fmt(&loader, &file, header.as_deref(), write),
        Commands::Dump { file, format } => cmd_dump(&loader, &file, &format),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let exit_code = match e.kind() {
                // I/O errors
                ErrorKind::Io | ErrorKind::SourceNotFound => ExitCode::from(3),
                // Everything the document itself got wrong
                _ => ExitCode::from(1),
            };
            eprintln!("{:?}", miette::Report::new(e));
            exit_code
        }
    }
}

/// Store settings shared by every command
struct Loader {
    delimiter: String,
    base_dir: Option<PathBuf>,
}

impl Loader {
    fn load(&self, file: &Path) -> HoconResult<Store> {
        let is_stdin = file.to_str() == Some("-");
        let base_dir = match &self.base_dir {
            Some(dir) => dir.clone(),
            None if is_stdin => std::env::current_dir()
                .map_err(|e| HoconError::io_error(format!("failed to get cwd: {}", e)))?,
            None => match file.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            },
        };

        let mut store = Store::new()
            .with_delimiter(self.delimiter.as_str())
            .with_resolver(FileResolver::new(base_dir));

        if is_stdin {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| HoconError::io_error(format!("failed to read stdin: {}", e)))?;
            store.read_str(&content)?;
        } else {
            let content = std::fs::read_to_string(file).map_err(|e| {
                HoconError::io_error(format!("failed to read {}: {}", file.display(), e))
            })?;
            let name = file
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("<input>");
            Reader::new(&mut store).read_source(name, &content)?;
        }

        tracing::debug!(file = %file.display(), entries = store.len(), "loaded");
        Ok(store)
    }
}

fn cmd_check(loader: &Loader, file: &Path) -> HoconResult<ExitCode> {
    let store = loader.load(file)?;
    let values = store.iter().filter(|(_, value)| !value.is_node()).count();
    println!("✓ {} is valid ({} values)", file.display(), values);
    Ok(ExitCode::SUCCESS)
}

fn cmd_get(loader: &Loader, file: &Path, path: &str) -> HoconResult<ExitCode> {
    let store = loader.load(file)?;
    match store.get_value(path) {
        None => {
            eprintln!("path not found: {}", path);
            Ok(ExitCode::from(EXIT_MISSING_PATH))
        }
        Some(value) if value.is_node() => {
            let subtree = store.get_subtree(path);
            let text = HoconWriter::new()
                .with_delimiter(store.delimiter())
                .write_string(subtree.iter().map(|(p, v)| (p.as_str(), v)), None)?;
            print!("{}", text);
            Ok(ExitCode::SUCCESS)
        }
        Some(value) => {
            println!("{}", value);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_fmt(loader: &Loader, file: &Path, header: Option<&str>, write: bool) -> HoconResult<ExitCode> {
    let store = loader.load(file)?;
    let text = store.to_hocon(header)?;

    if write && file.to_str() != Some("-") {
        std::fs::write(file, &text).map_err(|e| {
            HoconError::io_error(format!("failed to write {}: {}", file.display(), e))
        })?;
        eprintln!("Formatted {}", file.display());
    } else {
        print!("{}", text);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_dump(loader: &Loader, file: &Path, format: &str) -> HoconResult<ExitCode> {
    let output_format = OutputFormat::parse(format).ok_or_else(|| {
        HoconError::io_error(format!(
            "unknown output format '{}'. Use: flat, json, json-pretty, hocon",
            format
        ))
    })?;

    let store = loader.load(file)?;
    let mut output = hocon::emit(&store, output_format)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    print!("{}", output);
    Ok(ExitCode::SUCCESS)
}
