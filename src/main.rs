use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;
use ttcn3_syn::{FormatTree, Position, Tree};

mod query;

fn main() -> ExitCode {
    let opt = Opt::parse();
    init_logging(opt.verbose);

    match run(opt.cmd) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: usize) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &Path) -> Result<Tree, String> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(Tree::parse(source))
}

/// Print parse errors. Returns `false` if there were any.
fn report_parse_errors(path: &Path, tree: &Tree) -> bool {
    for err in tree.errors() {
        let pos = tree.position(u32::from(err.span.start()) as usize);
        eprintln!("{}:{}: {:?}: {}", path.display(), pos, err.level, err.kind);
    }
    tree.errors().is_empty()
}

/// Returns `Ok(false)` when the command ran but found problems.
fn run(cmd: Command) -> Result<bool, String> {
    match cmd {
        Command::Parse { file } => {
            let tree = load(&file)?;
            print!("{}", FormatTree(&tree.root()));
            Ok(report_parse_errors(&file, &tree))
        }
        Command::Symbols { file } => {
            let tree = load(&file)?;
            report_parse_errors(&file, &tree);
            for sym in query::symbols(&tree) {
                println!("{}\t{:?}\t{}", sym.name, sym.kind, sym.position);
            }
            Ok(true)
        }
        Command::Definition { file, line, column } => {
            let tree = load(&file)?;
            let defs = query::goto_definition(&tree, Position { line, column });
            if defs.is_empty() {
                eprintln!("no definition found at {}:{}:{}", file.display(), line, column);
                return Ok(false);
            }
            for def in defs {
                println!(
                    "{}:{}\t{}\t{:?}",
                    file.display(),
                    def.position(),
                    def.name(),
                    def.node().kind()
                );
            }
            Ok(true)
        }
        Command::Check { file } => {
            let tree = load(&file)?;
            let mut ok = report_parse_errors(&file, &tree);
            let name = file.display().to_string();
            for redecl in query::redeclarations(&tree) {
                eprint!("{}", query::render_redeclaration(&name, &redecl));
                ok = false;
            }
            Ok(ok)
        }
        Command::Imports { file } => {
            let tree = load(&file)?;
            for module in tree.imported_modules() {
                println!("{}", module);
            }
            Ok(true)
        }
    }
}

#[derive(clap::Parser)]
#[clap(about, version, author)]
struct Opt {
    /// Log more. Repeat for even more output. `RUST_LOG` takes precedence.
    #[clap(short, long, parse(from_occurrences), global = true)]
    verbose: usize,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Print the syntax tree of a file and its parse errors.
    Parse { file: PathBuf },

    /// List the definitions visible at module scope.
    Symbols { file: PathBuf },

    /// Find where the identifier at a position is declared.
    Definition {
        file: PathBuf,
        /// 1-based line.
        line: usize,
        /// 1-based column, counted in characters.
        column: usize,
    },

    /// Report names declared more than once in the same scope.
    Check { file: PathBuf },

    /// List the modules a file imports.
    Imports { file: PathBuf },
}
