mod logging;

use cascade_codegen::{GenerateOptions, SourceMap};
use cascade_parser::{Node, ParseOptions};
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing::debug;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Cascade: CSS parser and generator with source maps")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rewrite a stylesheet as canonical minimal CSS
    Build {
        /// Input .css file
        path: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Write `<output>.map` and link it from the CSS
        #[arg(long, requires = "output")]
        source_map: bool,

        /// `sourceRoot` recorded in the map
        #[arg(long, requires = "source_map")]
        source_root: Option<String>,
    },

    /// Check a stylesheet for errors without writing output
    Check {
        /// Input .css file
        path: String,
    },

    /// Print the plain-object AST as JSON
    Ast {
        /// Input .css file
        path: String,

        /// Include source locations
        #[arg(long)]
        positions: bool,
    },
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            path,
            output,
            source_map,
            source_root,
        } => cmd_build(&path, output.as_deref(), source_map, source_root),
        Command::Check { path } => cmd_check(&path),
        Command::Ast { path, positions } => cmd_ast(&path, positions),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_file(path: &str, positions: bool) -> Node {
    let source = read_source(path);
    let options = ParseOptions {
        filename: Some(path.to_string()),
        positions,
    };
    match cascade_parser::Parser::parse(&source, &options) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn write_file(path: &str, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("Error writing {path}: {e}");
        std::process::exit(1);
    }
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}

fn cmd_build(path: &str, output: Option<&str>, source_map: bool, source_root: Option<String>) {
    let ast = parse_file(path, source_map);

    let options = GenerateOptions {
        source_map,
        file: output.map(|out| file_name(out).to_string()),
        source_root,
    };
    let generated = cascade_codegen::generate_with_options(&ast, &options);

    let Some(output) = output else {
        println!("{}", generated.css);
        return;
    };

    let mut css = generated.css;
    if let Some(map) = generated.map {
        let map_path = format!("{output}.map");
        write_file(&map_path, &map.to_string());
        css.push('\n');
        css.push_str(&SourceMap::to_comment(file_name(&map_path)));
        debug!(path = %map_path, mappings = map.mappings.len(), "wrote source map");
    }
    css.push('\n');
    write_file(output, &css);

    eprintln!("Built: {output}");
}

fn cmd_check(path: &str) {
    let ast = parse_file(path, false);
    let css = cascade_codegen::generate(&ast);
    debug!(chars = css.chars().count(), "generated");
    eprintln!("OK: {path}");
}

fn cmd_ast(path: &str, positions: bool) {
    let ast = parse_file(path, positions);
    let tree = match cascade_codegen::to_plain_object(&ast) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    match serde_json::to_string_pretty(&tree) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing AST: {e}");
            std::process::exit(1);
        }
    }
}
