use cmap::{CMap, Coord};

fn main() {
    // D = 2: coordinates are (x, y) pairs. W = 32, since we picked u32 as
    // the axis type. Colliding inserts are folded together by summing —
    // here that just counts how many times each cell was touched.
    let mut grid: CMap<u32, u32, _> = CMap::new(2, |count: &mut u32, hit: u32| *count += hit).unwrap();

    for x in 0..8u32 {
        for y in 0..8u32 {
            grid.insert(Coord::new(&[x, y]).unwrap(), 1);
        }
    }
    assert_eq!(grid.len(), 64);

    // Inserting the same cell again merges instead of overwriting.
    grid.insert(Coord::new(&[0, 0]).unwrap(), 1);
    assert_eq!(*grid.get(&Coord::new(&[0, 0]).unwrap()).unwrap(), 2);

    let total_before: u32 = grid.iter().map(|(_, count)| *count).sum();
    println!("before resize: {} cells, total hits = {total_before}", grid.len());

    // resize() halves every coordinate and fuses whatever collides. With a
    // 32-bit axis the root starts far above the handful of low bits these
    // small coordinates actually use, so a single call typically only
    // merges cells that were already sharing a bucket — not the whole 2x2
    // block its coordinates would suggest. What it always preserves is the
    // total: merging never drops or duplicates a hit.
    grid.resize();
    assert_eq!(grid.num_resizes(), 1);

    let total_after: u32 = grid.iter().map(|(_, count)| *count).sum();
    assert_eq!(total_before, total_after);
    assert!(grid.len() <= 64);
    println!("after resize:  {} cells, total hits = {total_after}", grid.len());

    // Calling resize() repeatedly keeps halving and fusing; eventually
    // everything collapses onto the origin.
    for _ in 0..32 {
        grid.resize();
    }
    assert_eq!(grid.len(), 1);
    assert_eq!(*grid.get(&Coord::new(&[0, 0]).unwrap()).unwrap(), total_before);
    println!(
        "after {} total resizes: everything has fused into {:?}",
        grid.num_resizes(),
        grid
    );

    grid.remove(&Coord::new(&[0, 0]).unwrap());
    assert!(grid.is_empty());
    println!("removed the last cell: {} cells left", grid.len());
}
