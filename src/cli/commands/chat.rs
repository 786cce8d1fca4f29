//! Interactive question loop.

use crate::cli::{Output, StartupArgs};
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
///
/// Each line is answered independently; nothing is remembered between questions.
pub async fn run_chat(startup: &StartupArgs, settings: Settings) -> Result<()> {
    let orchestrator = crate::cli::start(settings, startup).await?;
    let engine = orchestrator.rag_engine();

    println!("\n{}", style("Folio").bold().cyan());
    println!("{}\n", style("Type your questions, or 'exit' to quit.").dim());

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            println!();
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if is_exit_command(input) {
            Output::info("Goodbye!");
            break;
        }

        let spinner = Output::spinner("Thinking...");
        let result = engine.ask(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                println!("\n{} {}", style("Folio:").cyan().bold(), response.answer);
                let files = response.source_files();
                if !files.is_empty() {
                    println!("{}", style(format!("Sources: {}", files.join(", "))).dim());
                }
                println!();
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}

fn is_exit_command(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}
