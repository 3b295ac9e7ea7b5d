use colored::Colorize;

use crate::core::{
    Card,
    Severity,
    ValidationWarning,
};

pub fn print_error(message: &str) {
    eprintln!("{}", format!("Error: {message}").red());
}

pub fn print_success(message: &str) {
    println!("{}", message.green());
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_info(message: &str) {
    println!("{}", message.blue());
}

pub fn print_card(card: &Card, position: usize, total: usize) {
    println!("\n{}", "=".repeat(60));
    println!("{}", format!("[{position}/{total}]").cyan().bold());

    println!();
    println!("{}", "Front:".yellow().bold());
    println!("  {}", card.front);
    println!();
    println!("{}", "Back:".yellow().bold());
    println!("  {}", card.back);

    if !card.context.is_empty() {
        println!();
        println!("{}", "Context:".yellow().bold());
        println!("  {}", card.context);
    }

    if !card.tags.is_empty() {
        println!();
        println!("{}", "Tags:".yellow().bold());
        println!("  {}", card.tags.join(", "));
    }

    if !card.source.is_empty() {
        println!();
        println!("{}", "Source:".yellow().bold());
        println!("  {}", card.source);
    }

    println!();
    println!("{}", format!("Deck: {} | Model: {}", card.deck, card.model).cyan());
}

pub fn print_validation_warnings(warnings: &[ValidationWarning]) {
    if warnings.is_empty() {
        return;
    }

    println!();
    for warning in warnings {
        let line = format!("  {}", warning.message);
        match warning.severity {
            Severity::Error => println!("{}", line.red()),
            Severity::Warning => println!("{}", line.yellow()),
            Severity::Info => println!("{}", line.blue()),
        }
    }
}
