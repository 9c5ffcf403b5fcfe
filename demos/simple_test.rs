use probemap_rs::ProbeMap;

fn main() {
    println!("Creating ProbeMap...");
    let mut map: ProbeMap<i32, i32> = ProbeMap::new();

    println!("Inserting values...");
    map.set(1, 10);
    map.set(2, 20);
    map.set(3, 30);

    println!("Removing 2...");
    map.remove(&2);
    println!("  len = {}, tombstones = {}", map.len(), map.tombstones());

    println!("Iterating...");
    for (k, v) in map.iter() {
        println!("  {} -> {}", k, v);
    }

    match map.get(&2) {
        Ok(v) => println!("  2 -> {}", v),
        Err(e) => println!("  2: {}", e),
    }

    println!("Done!");
}
