use anyhow::Result;

use archaive_tools::default_registry;

pub fn execute() -> Result<()> {
    println!("Flows:");
    for spec in archaive_flows::all_specs() {
        println!("  {:<20} {}", spec.name, spec.description);
    }

    println!("\nTools:");
    let mut definitions = default_registry().list_definitions();
    definitions.sort_by(|a, b| a.name.cmp(&b.name));
    for def in definitions {
        println!("  {:<20} {}", def.name, def.description);
    }

    Ok(())
}
