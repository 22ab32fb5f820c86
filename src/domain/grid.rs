use chrono::{Timelike, Utc};
use rand::Rng;
use rand::seq::index;
use serde::{Serialize, Serializer};
use std::fmt;

/// Width and height of every generated grid.
pub const GRID_SIZE: usize = 10;
/// Total number of cells in a grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
/// Number of cells forced to the bias letter (20% of the grid).
pub const BIAS_CELLS: usize = CELL_COUNT / 5;

const ALPHABET_LEN: u8 = 26;

/// Cells whose letters determine the two code digits, as `(row, col)`.
const CODE_CELLS: [(usize, usize); 2] = [(3, 6), (6, 3)];

/// A single lowercase ASCII letter (`a`-`z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Letter(u8);

impl Letter {
    /// Builds a letter from a byte, rejecting anything outside `a`-`z`.
    pub fn new(byte: u8) -> Option<Self> {
        byte.is_ascii_lowercase().then_some(Self(byte))
    }

    /// Parses a string holding exactly one lowercase letter.
    pub fn parse(s: &str) -> Option<Self> {
        match s.as_bytes() {
            [byte] => Self::new(*byte),
            _ => None,
        }
    }

    fn from_index(index: u8) -> Self {
        debug_assert!(index < ALPHABET_LEN);
        Self(b'a' + index)
    }

    fn index(self) -> u8 {
        self.0 - b'a'
    }

    pub fn as_char(self) -> char {
        char::from(self.0)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Letter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

/// A 10x10 matrix of letters, serialized as `string[10][10]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Grid([[Letter; GRID_SIZE]; GRID_SIZE]);

impl Grid {
    pub fn from_rows(rows: [[Letter; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self(rows)
    }

    pub fn rows(&self) -> &[[Letter; GRID_SIZE]; GRID_SIZE] {
        &self.0
    }

    pub fn get(&self, row: usize, col: usize) -> Letter {
        self.0[row][col]
    }

    pub fn cells(&self) -> impl Iterator<Item = Letter> + '_ {
        self.0.iter().flatten().copied()
    }

    pub fn count(&self, letter: Letter) -> usize {
        self.cells().filter(|&cell| cell == letter).count()
    }
}

/// Generates a fresh grid.
///
/// Without a bias every cell is drawn uniformly from the 26 letters. With a
/// bias, the grid is first filled from the 25 other letters and then exactly
/// [`BIAS_CELLS`] distinct positions are overwritten with the bias letter.
pub fn generate_grid<R: Rng + ?Sized>(rng: &mut R, bias: Option<Letter>) -> Grid {
    let mut rows = [[Letter(b'a'); GRID_SIZE]; GRID_SIZE];

    for cell in rows.iter_mut().flatten() {
        *cell = match bias {
            None => Letter::from_index(rng.gen_range(0..ALPHABET_LEN)),
            Some(bias) => {
                // Skip over the bias letter so the draw stays uniform over 25.
                let drawn = rng.gen_range(0..ALPHABET_LEN - 1);
                if drawn >= bias.index() {
                    Letter::from_index(drawn + 1)
                } else {
                    Letter::from_index(drawn)
                }
            }
        };
    }

    if let Some(bias) = bias {
        for position in index::sample(rng, CELL_COUNT, BIAS_CELLS) {
            rows[position / GRID_SIZE][position % GRID_SIZE] = bias;
        }
    }

    Grid(rows)
}

/// Halves `count` until it fits in a single decimal digit.
pub fn fold_count(mut count: usize) -> u8 {
    while count > 9 {
        count /= 2;
    }
    count as u8
}

/// Derives the two-digit code of a grid.
pub fn compute_code(grid: &Grid) -> Code {
    let [first, second] = CODE_CELLS.map(|(row, col)| fold_count(grid.count(grid.get(row, col))));
    Code([first, second])
}

/// Two decimal digits derived from a grid, serialized as a 2-character string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code([u8; 2]);

impl Code {
    pub fn digits(&self) -> [u8; 2] {
        self.0
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

impl Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The unit returned by every generation path: a grid, its code and the
/// seconds-of-minute at which it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct GridData {
    pub grid: Grid,
    pub code: Code,
    pub seconds: u32,
}

impl GridData {
    pub fn new(grid: Grid) -> Self {
        let code = compute_code(&grid);
        Self {
            grid,
            code,
            seconds: Utc::now().second(),
        }
    }

    /// Generates a grid with the thread-local RNG and wraps it with its code.
    pub fn generate(bias: Option<Letter>) -> Self {
        Self::new(generate_grid(&mut rand::thread_rng(), bias))
    }
}
