//! Chunk index keyed by packed (x, z) coordinates.

use probemap_rs::LongMap;

fn pack(x: i32, z: i32) -> i64 {
    ((x as i64) << 32) | (z as u32 as i64)
}

#[derive(Debug)]
struct Chunk {
    x: i32,
    z: i32,
    loaded_at: u32,
}

fn main() {
    let mut chunks: LongMap<Chunk> = LongMap::new();
    let view_distance = 8;
    let mut tick = 0u32;

    // Player walks east; chunks behind fall out of view and get unloaded.
    for player_x in 0..64 {
        tick += 1;
        for x in player_x - view_distance..=player_x + view_distance {
            for z in -view_distance..=view_distance {
                chunks.get_or_add_with(pack(x, z), || Chunk {
                    x,
                    z,
                    loaded_at: tick,
                });
            }
        }
        chunks.retain(|_, chunk| (chunk.x - player_x).abs() <= view_distance);
    }

    println!(
        "loaded = {}, capacity = {}, tombstones = {}",
        chunks.len(),
        chunks.capacity(),
        chunks.tombstones()
    );
    if let Ok(chunk) = chunks.get(&pack(63, 0)) {
        println!("chunk at player: {:?}", chunk);
    }
    let oldest = chunks.values().map(|c| c.loaded_at).min();
    println!("oldest loaded tick: {:?}", oldest);
}
