//! Corpus Command
//!
//! Validates the bundled few-shot examples and lists them.

use crate::drill::{DrillPromptBuilder, corpus};
use crate::types::Result;

pub fn run(show_prompt: bool) -> Result<()> {
    let drills = corpus::validate_corpus()?;

    println!("Few-shot corpus: {} examples, all valid", drills.len());
    for drill in &drills {
        println!(
            "  {:<18} {} ({} min, {})",
            drill.drill_type().as_str(),
            drill.base.title,
            drill.base.time_minutes,
            drill.base.shot_area
        );
    }

    if show_prompt {
        println!();
        println!("{}", DrillPromptBuilder::default().build_system_prompt());
    }
    Ok(())
}
