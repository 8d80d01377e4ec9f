//! CLI console utilities

use colored::*;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue().bold(), message);
    }

    /// Print only in verbose mode
    pub fn detail(&self, message: &str) {
        if self.verbose {
            println!("  {}", message.dimmed());
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a section header
    pub fn print_header(&self, title: &str) {
        println!("\n{}", title.bold().underline());
    }
}
