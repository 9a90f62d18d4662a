use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

/// Grid dimension of the playable game. The helpers below stay generic over
/// the dimension because the solvability rule differs for odd and even grids.
pub const GRID_SIZE: usize = 4;
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// A single grid value. 0 is the empty slot.
pub type Tile = u8;

pub const EMPTY: Tile = 0;

const MAX_SHUFFLE_ATTEMPTS: usize = 1000;

/// A sliding direction, named for the tile that moves: `Up` slides the tile
/// below the empty slot up into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Left,
    Down,
    Right,
}

impl Move {
    /// (row, col) offset from the empty slot to the tile that would slide.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Move::Up => (1, 0),
            Move::Left => (0, 1),
            Move::Down => (-1, 0),
            Move::Right => (0, -1),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Move::Up => "Up",
            Move::Left => "Left",
            Move::Down => "Down",
            Move::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Index of the empty slot. The grid invariant guarantees exactly one.
pub fn empty_index(tiles: &[Tile]) -> usize {
    debug_assert!(tiles.contains(&EMPTY));
    tiles.iter().position(|&tile| tile == EMPTY).unwrap_or(0)
}

fn count_inversions(tiles: &[Tile]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != EMPTY)
        .map(|(i, &val)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != EMPTY && next < val)
                .count()
        })
        .sum()
}

/// The classic 15-puzzle reachability rule.
///
/// Odd grids are solvable iff the inversion count is even. On even grids the
/// row of the empty slot enters the parity: counting rows from the bottom
/// (bottom row = 1), an even row demands an odd inversion count and an odd
/// row an even one.
pub fn is_solvable(tiles: &[Tile], grid_size: usize) -> bool {
    let inversions = count_inversions(tiles);

    if grid_size % 2 == 1 {
        inversions % 2 == 0
    } else {
        let empty_row = empty_index(tiles) / grid_size;
        let row_from_bottom = grid_size - empty_row;
        if row_from_bottom % 2 == 0 {
            inversions % 2 == 1
        } else {
            inversions % 2 == 0
        }
    }
}

/// A uniformly random permutation of `tiles`. The input is left untouched;
/// the copy is shuffled in place (Fisher-Yates).
pub fn shuffled(tiles: &[Tile], rng: &mut impl Rng) -> Vec<Tile> {
    let mut copy = tiles.to_vec();
    copy.shuffle(rng);
    copy
}

/// The solved arrangement: tiles ascending with the empty slot last.
pub fn solved_grid(grid_size: usize) -> Vec<Tile> {
    let count = grid_size * grid_size;
    let mut tiles: Vec<Tile> = (1..count as Tile).collect();
    tiles.push(EMPTY);
    tiles
}

/// A random solvable grid via rejection sampling. Roughly half of all
/// permutations are solvable, so the attempt cap is never reached in
/// practice; if it somehow is, the solved grid is the fallback.
pub fn generate_solvable(grid_size: usize, rng: &mut impl Rng) -> Vec<Tile> {
    let ordered = solved_grid(grid_size);
    for _ in 0..MAX_SHUFFLE_ATTEMPTS {
        let candidate = shuffled(&ordered, rng);
        if is_solvable(&candidate, grid_size) {
            return candidate;
        }
    }
    ordered
}

/// Whether two flat indices are grid-adjacent: same row or same column, one
/// step apart. Diagonals do not count.
pub fn are_neighbours(a: usize, b: usize, grid_size: usize) -> bool {
    let (ar, ac) = (a / grid_size, a % grid_size);
    let (br, bc) = (b / grid_size, b % grid_size);
    (ar.abs_diff(br) == 1 && ac == bc) || (ac.abs_diff(bc) == 1 && ar == br)
}

/// A new grid with positions `a` and `b` exchanged. Pure; self-inverse.
pub fn swap_elements(tiles: &[Tile], a: usize, b: usize) -> Vec<Tile> {
    let mut next = tiles.to_vec();
    next.swap(a, b);
    next
}

/// True iff every tile sits on its target (`tiles[k] == k + 1`) and the
/// empty slot is last.
pub fn is_solved(tiles: &[Tile]) -> bool {
    let Some((&last, rest)) = tiles.split_last() else {
        return false;
    };
    last == EMPTY && rest.iter().enumerate().all(|(i, &tile)| tile as usize == i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn solved_grid_is_solved() {
        let tiles = solved_grid(GRID_SIZE);
        assert_eq!(
            tiles,
            vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0]
        );
        assert!(is_solved(&tiles));
    }

    #[test]
    fn any_other_grid_is_not_solved() {
        // One swap away from solved.
        let tiles = swap_elements(&solved_grid(GRID_SIZE), 14, 15);
        assert!(!is_solved(&tiles));

        // Empty slot first instead of last.
        let rotated = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
        assert!(!is_solved(&rotated));
    }

    #[test]
    fn classic_unsolvable_arrangement() {
        // The 15-14 swap of Sam Loyd's puzzle is unreachable.
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 15, 14, 0];
        assert!(!is_solvable(&tiles, GRID_SIZE));
    }

    #[test]
    fn solved_grid_is_solvable() {
        assert!(is_solvable(&solved_grid(GRID_SIZE), GRID_SIZE));
    }

    #[test]
    fn one_slide_from_solved_is_solvable() {
        // Tile 12 slid down into the corner: a legal position one move deep.
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12];
        assert!(is_solvable(&tiles, GRID_SIZE));
    }

    #[test]
    fn odd_grid_parity_rule() {
        // 3x3: a single inversion (2 before 1) flips solvability.
        let solvable = vec![1, 2, 3, 4, 5, 6, 7, 8, 0];
        let unsolvable = vec![2, 1, 3, 4, 5, 6, 7, 8, 0];
        assert!(is_solvable(&solvable, 3));
        assert!(!is_solvable(&unsolvable, 3));
    }

    #[test]
    fn generated_grids_are_solvable() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let tiles = generate_solvable(GRID_SIZE, &mut rng);
            assert!(is_solvable(&tiles, GRID_SIZE));
            assert_eq!(tiles.len(), TILE_COUNT);
            assert_eq!(tiles.iter().filter(|&&t| t == EMPTY).count(), 1);
        }
    }

    #[test]
    fn shuffled_leaves_input_alone() {
        let original = solved_grid(GRID_SIZE);
        let mut rng = StdRng::seed_from_u64(11);
        let copy = shuffled(&original, &mut rng);
        assert_eq!(original, solved_grid(GRID_SIZE));
        let mut sorted = copy.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..TILE_COUNT as Tile).collect::<Vec<_>>());
    }

    #[test]
    fn swap_is_its_own_inverse() {
        let tiles = solved_grid(GRID_SIZE);
        let once = swap_elements(&tiles, 3, 9);
        assert_ne!(once, tiles);
        assert_eq!(swap_elements(&once, 3, 9), tiles);
    }

    #[test]
    fn neighbours_share_a_row_or_column() {
        // Index 5 = (1, 1): four orthogonal neighbours.
        assert!(are_neighbours(5, 1, GRID_SIZE));
        assert!(are_neighbours(5, 9, GRID_SIZE));
        assert!(are_neighbours(5, 4, GRID_SIZE));
        assert!(are_neighbours(5, 6, GRID_SIZE));
        // Diagonals and far cells are out.
        assert!(!are_neighbours(5, 0, GRID_SIZE));
        assert!(!are_neighbours(5, 10, GRID_SIZE));
        assert!(!are_neighbours(5, 7, GRID_SIZE));
        assert!(!are_neighbours(5, 5, GRID_SIZE));
        // Indices 3 and 4 are consecutive but sit on different rows.
        assert!(!are_neighbours(3, 4, GRID_SIZE));
    }

    #[test]
    fn empty_index_finds_the_hole() {
        let tiles = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 0, 13, 14, 15, 12];
        assert_eq!(empty_index(&tiles), 11);
    }
}
