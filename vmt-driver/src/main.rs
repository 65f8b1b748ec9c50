use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::warn;
use std::fs;
use std::path::PathBuf;
use vmt_driver::{discovery, Translator, TranslatorOptions};

#[derive(Parser, Debug)]
#[command(name = "vmt", version, about = "Translates Hack VM code into Hack assembly")]
struct Args {
    /// A .vm file, or a directory whose .vm files form one program
    input: PathBuf,

    /// Output assembly file (defaults to X.asm next to X.vm, or D/D.asm for a directory D)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not restate each VM instruction as a comment
    #[arg(long)]
    no_comments: bool,

    /// Fail on unrecognized instructions instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Print the parsed modules as JSON instead of translating
    #[arg(long)]
    dump_json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Warnings are shown unless RUST_LOG says otherwise
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    let modules = discovery::load_modules(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    if args.dump_json {
        println!("{}", serde_json::to_string_pretty(&modules)?);
        return Ok(());
    }

    let translator = Translator::new(TranslatorOptions {
        emit_comments: !args.no_comments,
        strict: args.strict,
    });
    let output = translator.translate_modules(&modules)?;

    if !output.warnings.is_empty() {
        warn!("{}", output.summary);
    }

    let output_path = args
        .output
        .unwrap_or_else(|| discovery::output_path(&args.input));
    fs::write(&output_path, output.render())
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!(
        "Translated {} module(s) into {} ({} lines)",
        output.modules.len(),
        output_path.display(),
        output.lines.len()
    );

    Ok(())
}
