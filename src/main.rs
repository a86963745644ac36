//! Baseforge - Entry Point
//!
//! One-shot mode compiles the instructions given on the command line and
//! prints (or writes) the final document. With no instructions it drops
//! into an interactive loop where each line edits the working document.

use baseforge::catalog::TemplateCatalog;
use baseforge::core::error::Result;
use baseforge::llm::GeneratorClient;
use baseforge::studio::Session;

use clap::Parser;
use std::io::{self, Write};
use tokio::runtime::Runtime;

/// Compile natural-language instructions into a query document
#[derive(Parser, Debug)]
#[command(name = "baseforge")]
#[command(about = "Compile natural-language instructions into a query document")]
struct Args {
    /// Instructions to apply in order; omit for interactive mode
    instructions: Vec<String>,

    /// Delegate generation and patching to the remote service
    /// (requires BASEFORGE_API_URL)
    #[arg(long)]
    remote: bool,

    /// Write the final document to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<std::path::PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("baseforge=debug")
        .init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    let mut session = Session::new(TemplateCatalog::builtin());
    if args.remote {
        session = session.with_remote(GeneratorClient::from_env()?);
    }

    if !args.instructions.is_empty() {
        for instruction in &args.instructions {
            rt.block_on(session.submit(instruction))?;
        }
        let document = session.current().unwrap_or_default();
        match &args.output {
            Some(path) => std::fs::write(path, document)?,
            None => println!("{}", document),
        }
        return Ok(());
    }

    run_interactive(&rt, &mut session)
}

/// Line-oriented interactive loop.
fn run_interactive(rt: &Runtime, session: &mut Session) -> Result<()> {
    println!("\n=== BASEFORGE ===");
    println!("Describe the view you want; each line refines the document.");
    println!();
    println!("Commands:");
    println!("  :templates      - List the built-in templates");
    println!("  :reset          - Discard the working document");
    println!("  :quit / :q      - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == ":quit" || input == ":q" {
            break;
        }

        if input == ":reset" {
            session.reset();
            println!("Working document discarded.");
            continue;
        }

        if input == ":templates" {
            for entry in session.templates() {
                println!("  {:<10} {}", entry.id, entry.label);
                println!("             {}", entry.description);
            }
            continue;
        }

        match rt.block_on(session.submit(input)) {
            Ok(document) => {
                println!();
                println!("{}", document);
                println!();
            }
            Err(e) => {
                println!("Could not process instruction: {}", e);
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}
