use anyhow::Result;
use recall_core::MemoryEngine;

pub fn show(engine: &MemoryEngine, base: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&engine.context_for_ai())?);
    } else {
        println!("{}", engine.enhanced_system_prompt(base).trim_start());
    }
    Ok(())
}
