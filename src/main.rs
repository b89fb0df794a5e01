//! UI Markup CLI
//!
//! Usage:
//!   ui-markup [OPTIONS] [FILE]
//!
//! Options:
//!   -m, --model <FILE>        Model values for template expansion (TOML)
//!   -c, --components <DIR>    Directory of `<Name>.suim` component files
//!   -t, --theme <FILE>        Theme metrics (TOML)
//!       --width <PX>          Viewport width
//!       --height <PX>         Viewport height
//!   -s, --strict              Fail on any parse error
//!   -g, --grammar             Show markup syntax reference
//!   -v, --verbose...          More log output on stderr
//!   -h, --help                Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;

use ui_markup::{build_with_config, outline, BuildConfig, BuildError, ComponentRegistry, Model, ThemeMetrics};

#[derive(Parser)]
#[command(name = "ui-markup")]
#[command(about = "Parse, expand and lay out declarative UI markup")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Model values for template expansion (TOML)
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Directory searched for component files
    #[arg(short, long)]
    components: Option<PathBuf>,

    /// Theme metrics file (TOML)
    #[arg(short, long)]
    theme: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Fail on any parse error, not only fatal ones
    #[arg(short, long)]
    strict: bool,

    /// Show markup syntax reference
    #[arg(short, long)]
    grammar: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(format!("ui_markup={}", level)))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let theme = match &cli.theme {
        Some(path) => match ThemeMetrics::from_file(path) {
            Ok(theme) => theme,
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => ThemeMetrics::default(),
    };

    let model = match &cli.model {
        Some(path) => match Model::from_file(path) {
            Ok(model) => model,
            Err(e) => {
                eprintln!("Error loading model '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Model::default(),
    };

    let components = match &cli.components {
        Some(dir) if !dir.is_dir() => {
            eprintln!("Component directory '{}' does not exist", dir.display());
            std::process::exit(1);
        }
        Some(dir) => ComponentRegistry::with_base_path(dir.clone()),
        None => ComponentRegistry::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = BuildConfig::new()
        .with_theme(theme)
        .with_viewport(cli.width, cli.height)
        .with_components(components)
        .with_model(model)
        .with_strict(cli.strict);

    match build_with_config(&source, &config) {
        Ok(built) => {
            for error in &built.parse_errors {
                eprint!("{}", error.format(&source, &filename));
            }
            for warning in &built.parse_warnings {
                eprintln!("{}", warning);
            }
            for warning in &built.expansion.warnings {
                eprintln!("warning: {}", warning);
            }
            print!("{}", outline(&built.root));
        }
        Err(BuildError::Parse(errors)) => {
            for error in &errors {
                eprint!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        r#"UI Markup - declarative UI markup engine

USAGE:
    ui-markup [OPTIONS] [FILE]
    echo '<markup>' | ui-markup

OPTIONS:
    -m, --model        Model values for templates (TOML file)
    -c, --components   Directory of component files
    -t, --theme        Theme metrics (TOML file)
    --width, --height  Viewport size (default 800x600)
    -s, --strict       Fail on any parse error
    -g, --grammar      Show markup syntax reference
    -v                 More log output (repeat for more)
    -h, --help         Print help

QUICK START:
    echo '<vstack><button>OK</button><p>Ready</p></vstack>' | ui-markup

This prints every node with its computed rectangle.
Run --grammar for the syntax reference."#
    );
}

fn print_grammar() {
    println!(
        r#"UI MARKUP SYNTAX
================

ELEMENTS
--------
<tag attr=value ...> children </tag>
<tag attr=value ... />              Self-closing, no children
Text between tags becomes a text node.

Containers:  div stack vstack (vbox) hstack (hbox) grid dock overlay scroll
Controls:    button input textarea select progress
Text:        h1..h6 p label
Any other tag is a component instance.

SIZING
------
width=100 / 100px   Absolute pixels
width=2rem          Multiple of the root font size
width=50pw          Percent of parent width (50ph: parent height, 50%: same axis)
width=2*            Share of the space left in a stack (* = 1*)
width=auto          Theme default for the element's role

BOX MODEL
---------
margin=8   padding=4,8   border=1,2,1,2     (all, vertical,horizontal, t,r,b,l)
min-width max-width min-height max-height
x=10 y=20            Absolute position
visible=false        Hidden, takes no space
z-index=2            Paint order among siblings

CONTAINERS
----------
<vstack spacing=8>        spacing=auto uses the theme default
<grid columns=3 rows=2>
<dock>  children with dock=top|bottom|left|right, last one fills
<scroll scroll-y=40 direction=vertical|horizontal|both>

DIRECTIVES
----------
@if Status == "Active"
  ...
@else-if Status != null
  ...
@else
  ...
@end

@foreach item in Items
  <label>{{item}}</label>
@end

Conditions: key, key == literal, key != literal (literal: "text", 'text', word, null)
{{key}} in text or attribute values is replaced by the model value.

COMPONENTS
----------
Greeting.suim:
  <model>{{ name: "World" }}</model>
  <label>Hello {{name}}</label>

Usage:
  <Greeting name="Ada"/>"#
    );
}
