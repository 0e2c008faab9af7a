//! CLI - reedline-based REPL interface
//!
//! Loads dumps written by `write_fab`/`write_multifab` and runs the
//! diagnostics on them interactively.

pub mod commands;
pub mod session;

use std::borrow::Cow;
use std::io;

use anyhow::Result;
use colored::Colorize;
use reedline::{Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal};

pub use commands::{parse_command, ParsedCommand};
pub use session::{load_dump, Flow, Loaded, Session};

/// Prompt showing what is loaded
pub struct FabviewPrompt {
    status: String,
}

impl FabviewPrompt {
    pub fn new() -> Self {
        Self {
            status: "---".to_string(),
        }
    }

    pub fn set_status(&mut self, status: String) {
        self.status = status;
    }
}

impl Default for FabviewPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for FabviewPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(format!("[{}]", self.status))
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Print the help message
pub fn print_help() {
    println!("{}", "Fabview Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());

    println!("\n{}", "Files:".bold().yellow());
    println!("  {}           Load a FAB or MULTIFAB dump", "load <path>".green());
    println!("  {}          Dump the loaded data", "write <path>".green());
    println!("  {}                  Describe the loaded data", "info".green());

    println!("\n{}", "Values:".bold().yellow());
    println!("  {}          Min/max per grid (valid and total)", "stats [comp]".green());
    println!("  {}     Minimum, optionally within a box", "min <comp> [box]".green());
    println!("  {}     Maximum, optionally within a box", "max <comp> [box]".green());
    println!("  {}          Print cell values", "print [grid]".green());
    println!("  {}         Classify a number or 0x bit pattern", "class <value>".green());

    println!("\n{}", "Grids:".bold().yellow());
    println!("  {}                 Print the BoxArray", "boxes".green());
    println!("  {}                Print the BoxDomain", "domain".green());
    println!("  {}                 Print the boundary register", "bndry".green());

    println!("\n{}", "Tags:".bold().yellow());
    println!("  {}  Tag cells with comp > threshold", "tag <comp> <thresh>".green());
    println!("  {}                  List tagged cells", "tags".green());
    println!("  {}              Count tagged cells", "tagcount".green());

    println!("\n{}", "Other:".bold().yellow());
    println!("  {}                     Show this help", "?".green());
    println!("  {}                     Quit", "q".green());
    println!(
        "\n  Boxes are written as {}",
        "((lo_i,lo_j,lo_k) (hi_i,hi_j,hi_k))".dimmed()
    );
}

/// Run the CLI REPL
pub fn run_cli(mut session: Session) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = FabviewPrompt::new();
    prompt.set_status(session.status());

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║  Fabview CLI - Type '?' for help, 'q' to quit                ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════╝".cyan()
    );

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                let stdout = io::stdout();
                let mut out = stdout.lock();
                match session.execute(&mut out, cmd) {
                    Ok(Flow::Quit) => {
                        println!("[*] Shutting down...");
                        break;
                    }
                    Ok(Flow::Continue) => {}
                    Err(e) => {
                        println!("{} {:#}", "[!]".red(), e);
                        println!("    Type '?' for help");
                    }
                }
                prompt.set_status(session.status());
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}
