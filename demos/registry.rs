//! Block registry: a name <-> numeric id bijection.

use probemap_rs::{BiMap, MapError};

fn main() -> Result<(), MapError> {
    let mut registry: BiMap<String, u16> = BiMap::new();

    for (id, name) in ["air", "stone", "grass_block", "dirt"].iter().enumerate() {
        registry.add(format!("minecraft:{name}"), id as u16)?;
    }
    println!("registered {} blocks", registry.len());

    // Strict registration refuses to reuse a name or an id.
    match registry.add("minecraft:stone".to_string(), 99) {
        Err(e) => println!("duplicate name rejected: {e}"),
        Ok(()) => println!("unexpected: duplicate name accepted"),
    }
    match registry.add("minecraft:granite".to_string(), 1) {
        Err(e) => println!("duplicate id rejected: {e}"),
        Ok(()) => println!("unexpected: duplicate id accepted"),
    }

    // Remapping an id evicts whichever pairs held either side.
    let evicted = registry.set("minecraft:granite".to_string(), 1);
    println!(
        "granite took id 1, evicted key {:?} and value {:?}",
        evicted.previous_key, evicted.previous_value
    );

    println!("id 1 -> {}", registry.get_key(&1)?);
    println!("dirt -> {}", registry.get_value("minecraft:dirt")?);
    if let Err(e) = registry.get_value("minecraft:stone") {
        println!("stone lookup: {e}");
    }

    let mut entries: Vec<_> = registry.iter().collect();
    entries.sort_by_key(|(_, id)| **id);
    for (name, id) in entries {
        println!("  {id:>3} {name}");
    }
    Ok(())
}
