/// Built-in level tables.
///
/// Five 50-column maps, played in order.  Glyphs: `#` wall, `.` floor,
/// `E` enemy spawn, `P` player spawn.

use crate::error::{Result, SimError};
use crate::level::LevelLayout;

#[rustfmt::skip]
const LEVEL_1: &[&str] = &[
    "##################################################",
    "#................................................#",
    "#................................................#",
    "#.........#.................#....................#",
    "#.........#..E..............#.......#............#",
    "#......E..#.................#......##..E.........#",
    "#.........#...E.....#.......#......#........E....#",
    "#.........#.........#.......#.....##.............#",
    "#..##...............#..E.E..E.....#.......E......#",
    "#...#...............#.............##.............#",
    "#.P.#...............#..............###.EE........#",
    "#...#...............#................#...........#",
    "#..##...............#..E..E..E.......##....E.....#",
    "#...................#.................##.........#",
    "#...................#.......#..........#.........#",
    "#.........#.................#.........##..E......#",
    "#.........#...E.............#.........#...E......#",
    "#......E..#.E...............#.........#.......E..#",
    "#.........#.................##...................#",
    "#............................#...................#",
    "#................................................#",
    "##################################################",
];

#[rustfmt::skip]
const LEVEL_2: &[&str] = &[
    "##################################################",
    "#.P.#......#......#......#....E.#......#.........#",
    "#...#..E...#..E...#..E...#.........E...#..E....E.#",
    "#...#...........................#................#",
    "##.##...######...######...########...######...####",
    "#...#......#......#.........#.........#........E.#",
    "#.....E..E...E..E...E..E..E...E..E..E...E..E.....#",
    "#...#......#......#.........#.........#..........#",
    "##.######..#########...#########...#########...###",
    "#....................E...........E...........E...#",
    "#.E..E..E...E..E..E.....E..E..E.....E..E..E......#",
    "#....................E...........E...........E...#",
    "#########..#########...#########...#########...###",
    "#...#.........#...........#...........#........E.#",
    "#.E...E..E...E..E...E..E....E..E..E..E..E..E.....#",
    "#...#.........#...........#...........#..........#",
    "##.##...########...#########...#########...#######",
    "#...#......#.........#............#...........E..#",
    "#.E...E..E...E..E...E..E..E..E..E...E..E..E......#",
    "#...#......#.........#............#..........E...#",
    "##################################################",
];

#[rustfmt::skip]
const LEVEL_3: &[&str] = &[
    "##################################################",
    "#P.#....#....E..#....E..#.......#..E.............#",
    "#..#..E.#.......#.......#..E..E.#.....E..E..E..E.#",
    "#..###....E.##....E.##......##....E.##.......#...#",
    "#.#.##..#...##..#...##..#.E.##..#...##..#....#.E.#",
    "#.....E.#.E...E.#.E...E.#.....E.#.E...E.#.E......#",
    "#.E.......................E...................E..#",
    "##.###.###.###.###.###.###.###.###.###.#####.#...#",
    "#...#...#...#...#...#.......#...#...#........#.E.#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E..#...#",
    "#.......................#...............#......E.#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E..#...#",
    "#...#...#...#...#...#.......#...#...#........#.E.#",
];

#[rustfmt::skip]
const LEVEL_4: &[&str] = &[
    "##################################################",
    "#P......................#......................E.#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#................................................#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#.....E.....E.....E.....#......E.....E.....E.....#",
    "#####...###...###...###.#.###...###...###...###..#",
    "#.....E.....E.....E...........E.....E.....E......#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#.......................#......................E.#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#.....E.....E.....E.....#......E.....E.....E.....#",
    "#####...###...###...###.#.###...###...###...###..#",
    "#.....E.....E.....E...........E.....E.....E......#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#.......................#......................E.#",
    "#.####.#####.#####.####.#.#####.#####.#####.###..#",
    "#.....E.....E.....E............E.....E.....E.....#",
    "#####...###...###...###.#.###...###...###...###..#",
    "#.....E.....E.....E.....#.....E.....E.....E......#",
    "##################################################",
];

#[rustfmt::skip]
const LEVEL_5: &[&str] = &[
    "##################################################",
    "#.......#.......#.......#.......#............#...#",
    "#..E..E.#..E..E....E..E.#..E..E.#..E..E..E.......#",
    "#...##......##..#...##...E..##......##.......#...#",
    "#...##..#...##..#...##..#...##..#...##..#....#...#",
    "#.E.....#.E.....#.E.....#.E.....#.E.....#.E......#",
    "#.....E.#.....E.#.....E.#.....E.#.....E.#........#",
    "##.###.###.###.###.###.###.###.###.###.#####.#...#",
    "#...#...#...#...#...#.......#...#...#........#...#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E..#...#",
    "#........E..............#...............#........#",
    "#...#...#...#...#...#...#.E.#...#...#...#....#...#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E..#...#",
    "#............................................#...#",
    "##.###.###.###.###.###.###.###.###.###.###.###..P#",
    "#...#...#...#.......#...#.E.#.......#............#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#....#...#",
    "#......E........#...............#.......#....#...#",
    "#...#...#...#...#...#...#...#...#...#...#....#...#",
    "#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E.#.E......#",
    "#............................................#...#",
    "##################################################",
];

const TABLES: [&[&str]; 5] = [LEVEL_1, LEVEL_2, LEVEL_3, LEVEL_4, LEVEL_5];

/// Number of built-in levels.
pub fn level_count() -> usize {
    TABLES.len()
}

/// Parse the built-in levels, numbered from 1.
pub fn builtin_levels() -> Result<Vec<LevelLayout>> {
    TABLES
        .iter()
        .enumerate()
        .map(|(i, rows)| {
            let id = i + 1;
            LevelLayout::from_ascii(id, rows)
                .map_err(|source| SimError::InvalidLevel { level: id, source })
        })
        .collect()
}
