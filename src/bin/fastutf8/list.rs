//! CLI handler for the `list` command.

use anyhow::Result;
use clap::Parser;
use fastutf8::implementation::{self, Implementation};
use fastutf8::isa::detect_supported_architectures;
use serde::Serialize;

/// List registered implementations and whether this CPU can run them.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ImplementationInfo {
    name: &'static str,
    description: &'static str,
    required_instruction_sets: String,
    supported: bool,
    active: bool,
}

#[derive(Debug, Serialize)]
struct Listing {
    detected_instruction_sets: String,
    implementations: Vec<ImplementationInfo>,
}

fn describe(imp: &'static Implementation, active: &'static Implementation) -> ImplementationInfo {
    ImplementationInfo {
        name: imp.name(),
        description: imp.description(),
        required_instruction_sets: imp.required_instruction_sets().to_string(),
        supported: imp.supported_by_runtime_system(),
        active: std::ptr::eq(imp, active),
    }
}

fn listing() -> Listing {
    let active = implementation::active_implementation();
    Listing {
        detected_instruction_sets: detect_supported_architectures().to_string(),
        implementations: implementation::available_implementations()
            .iter()
            .copied()
            .map(|imp| describe(imp, active))
            .collect(),
    }
}

/// Run the list command.
pub fn run(args: ListArgs) -> Result<i32> {
    let listing = listing();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(0);
    }

    println!("Detected: {}", listing.detected_instruction_sets);
    println!();
    println!(
        "  {:<12} {:<10} {:<32} Description",
        "Name", "Supported", "Requires"
    );
    for info in &listing.implementations {
        println!(
            "{} {:<12} {:<10} {:<32} {}",
            if info.active { "*" } else { " " },
            info.name,
            if info.supported { "yes" } else { "no" },
            info.required_instruction_sets,
            info.description
        );
    }
    if !listing.implementations.iter().any(|info| info.active) {
        let active = implementation::active_implementation();
        println!("* {:<12} (forced)   {}", active.name(), active.description());
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_marks_fallback_supported() {
        let listing = listing();
        let fallback = listing
            .implementations
            .iter()
            .find(|info| info.name == "fallback")
            .unwrap();
        assert!(fallback.supported);
        assert_eq!(fallback.required_instruction_sets, "default");
    }

    #[test]
    fn test_listing_serializes() {
        let json = serde_json::to_value(listing()).unwrap();
        assert!(json["implementations"].is_array());
        assert!(json["detected_instruction_sets"].is_string());
    }
}
