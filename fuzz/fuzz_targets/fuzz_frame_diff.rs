//! Fuzz target for frame diffing.
//!
//! Feeds a sequence of arbitrary frames through one cache and checks that
//! the cache always ends up holding the last frame.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use termtile::renderer::encode_frame;
use termtile::{Console, Rgb, Tile, TileCache};

#[derive(Arbitrary, Debug)]
struct FuzzFrame {
    width: u8,
    height: u8,
    tiles: Vec<(i32, [u8; 3], [u8; 3])>,
}

impl FuzzFrame {
    fn to_console(&self) -> Console {
        let width = u32::from(self.width % 32) + 1;
        let height = u32::from(self.height % 16) + 1;
        let mut console = Console::new(width, height);
        for (i, (ch, fg, bg)) in self.tiles.iter().enumerate() {
            let i = i as u32;
            if i >= width * height {
                break;
            }
            let tile = Tile::from_raw(
                *ch,
                Rgb::new(fg[0], fg[1], fg[2]),
                Rgb::new(bg[0], bg[1], bg[2]),
            );
            console.set(i % width, i / width, tile);
        }
        console
    }
}

fuzz_target!(|frames: Vec<FuzzFrame>| {
    let mut cache = TileCache::new();
    let mut out = Vec::new();
    for frame in frames.iter().take(8) {
        let console = frame.to_console();
        out.clear();
        if encode_frame(&mut cache, &console, &mut out).is_err() {
            return;
        }
        assert_eq!(cache.tiles(), console.tiles());
    }
});
