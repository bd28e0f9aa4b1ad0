use std::collections::{BTreeSet, VecDeque};

use rand::{Rng, seq::SliceRandom};

use crate::{
    LayoutError,
    core::{Layout, Position, WallRow},
};

/// Seeded generator for point-symmetric capture boards.
///
/// The west half is carved as a braided maze, then mirrored through the board
/// center onto the east half, so both teams face the same board. Red starts in
/// the south-west corner and Blue in the north-east one.
///
/// # Example
///
/// ```
/// use capture_engine::LayoutGenerator;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let layout = LayoutGenerator::default().generate(&mut rng).unwrap();
/// assert_eq!(layout.agent_starts().unwrap().len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGenerator {
    pub width: usize,
    pub height: usize,
    pub food_per_side: usize,
    pub capsules_per_side: usize,
    /// Probability of knocking out each remaining inner wall after carving.
    pub openness: f64,
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self {
            width: 32,
            height: 16,
            food_per_side: 20,
            capsules_per_side: 1,
            openness: 0.2,
        }
    }
}

const MIN_WIDTH: usize = 8;
const MIN_HEIGHT: usize = 5;
const AGENTS_PER_TEAM: usize = 2;

impl LayoutGenerator {
    pub fn generate<R>(&self, rng: &mut R) -> Result<Layout, LayoutError>
    where
        R: Rng + ?Sized,
    {
        let Self {
            width,
            height,
            food_per_side,
            capsules_per_side,
            openness,
        } = *self;
        if width < MIN_WIDTH || height < MIN_HEIGHT || width % 2 != 0 {
            return Err(LayoutError::TooSmall { width, height });
        }
        if width > WallRow::MAX_WIDTH {
            return Err(LayoutError::TooWide {
                width,
                max: WallRow::MAX_WIDTH,
            });
        }

        let half = width / 2;
        let mut open = vec![vec![false; height]; half];
        carve_maze(&mut open, height, rng);
        braid(&mut open, height, openness, rng);
        open_border(&mut open, height, rng);

        let mirror = |p: Position| Position::new(width - 1 - p.x, height - 1 - p.y);
        let mut layout = Layout::new(width, height)?;
        for x in 0..half {
            for y in 0..height {
                if !open[x][y] {
                    let p = Position::new(x, y);
                    layout.set_wall(p, true)?;
                    layout.set_wall(mirror(p), true)?;
                }
            }
        }
        layout.enclose();
        seal_unreachable(&mut layout, Position::new(1, 1))?;

        let red_starts = nearest_open(&layout, Position::new(1, 1), AGENTS_PER_TEAM);
        for (slot, start) in red_starts.iter().enumerate() {
            layout.set_agent_start(slot * 2, *start)?;
            layout.set_agent_start(slot * 2 + 1, mirror(*start))?;
        }

        let mut candidates: Vec<Position> = layout
            .open_cells()
            .filter(|p| p.x < half && !red_starts.contains(p))
            .collect();
        candidates.shuffle(rng);
        let mut picks = candidates.into_iter();
        for p in picks.by_ref().take(capsules_per_side) {
            layout.add_capsule(p)?;
            layout.add_capsule(mirror(p))?;
        }
        for p in picks.take(food_per_side) {
            layout.add_food(p)?;
            layout.add_food(mirror(p))?;
        }
        Ok(layout)
    }
}

/// Depth-first carving over the odd-coordinate lattice of the west half.
fn carve_maze<R>(open: &mut [Vec<bool>], height: usize, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let half = open.len();
    let is_cell = |x: usize, y: usize| x % 2 == 1 && y % 2 == 1 && x < half && y + 1 < height;
    open[1][1] = true;
    let mut stack: Vec<(usize, usize)> = vec![(1, 1)];
    while let Some(&(x, y)) = stack.last() {
        let mut next: Vec<(usize, usize)> = [(2, 0), (0, 2), (-2, 0), (0, -2)]
            .into_iter()
            .filter_map(|(dx, dy): (isize, isize)| {
                Some((x.checked_add_signed(dx)?, y.checked_add_signed(dy)?))
            })
            .filter(|&(nx, ny)| is_cell(nx, ny) && !open[nx][ny])
            .collect();
        if next.is_empty() {
            stack.pop();
            continue;
        }
        next.shuffle(rng);
        let (nx, ny) = next[0];
        open[(x + nx) / 2][(y + ny) / 2] = true;
        open[nx][ny] = true;
        stack.push((nx, ny));
    }
}

/// Opens random inner walls to create loops. Pillars (even, even) stay.
fn braid<R>(open: &mut [Vec<bool>], height: usize, openness: f64, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let half = open.len();
    for x in 1..half {
        for y in 1..height - 1 {
            let pillar = x % 2 == 0 && y % 2 == 0;
            if !open[x][y] && !pillar && rng.random_bool(openness.clamp(0.0, 1.0)) {
                open[x][y] = true;
            }
        }
    }
}

/// Opens crossing rows on the border column.
///
/// A row `y` crosses the midline when both `y` and its mirror row are open on
/// the west border column; at least one crossing is always made.
fn open_border<R>(open: &mut [Vec<bool>], height: usize, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let border = open.len() - 1;
    let mut open_with_west = |row: usize| {
        open[border][row] = true;
        let west = border - 1;
        if west % 2 == 1 || row % 2 == 1 {
            open[west][row] = true;
        }
    };
    let rows: Vec<usize> = (1..height - 1).step_by(2).collect();
    let forced = rows[rng.random_range(0..rows.len())];
    for y in rows {
        if y == forced || rng.random_bool(0.5) {
            open_with_west(y);
            open_with_west(height - 1 - y);
        }
    }
}

/// Walls off every open cell not connected to `origin`.
fn seal_unreachable(layout: &mut Layout, origin: Position) -> Result<(), LayoutError> {
    let reachable = flood(layout, origin);
    let sealed: Vec<Position> = layout
        .open_cells()
        .filter(|p| !reachable.contains(p))
        .collect();
    for p in sealed {
        layout.set_wall(p, true)?;
    }
    Ok(())
}

fn flood(layout: &Layout, origin: Position) -> BTreeSet<Position> {
    let mut seen = BTreeSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(cell) = queue.pop_front() {
        for next in layout.open_neighbors(cell) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

/// The first `count` open cells reached by a breadth-first walk from `origin`.
fn nearest_open(layout: &Layout, origin: Position, count: usize) -> Vec<Position> {
    let mut found = vec![origin];
    let mut seen = BTreeSet::from([origin]);
    let mut queue = VecDeque::from([origin]);
    while let Some(cell) = queue.pop_front() {
        if found.len() >= count {
            break;
        }
        for next in layout.open_neighbors(cell) {
            if seen.insert(next) {
                found.push(next);
                queue.push_back(next);
            }
        }
    }
    found.truncate(count);
    found
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::{Distancer, Team};

    fn generate(seed: u64) -> Layout {
        let mut rng = Pcg32::seed_from_u64(seed);
        LayoutGenerator::default().generate(&mut rng).unwrap()
    }

    #[test]
    fn test_is_point_symmetric() {
        let layout = generate(1);
        let (w, h) = (layout.width(), layout.height());
        for x in 0..w {
            for y in 0..h {
                let p = Position::new(x, y);
                let m = Position::new(w - 1 - x, h - 1 - y);
                assert_eq!(layout.has_wall(p), layout.has_wall(m), "at {p}");
                assert_eq!(layout.food().contains(&p), layout.food().contains(&m));
            }
        }
    }

    #[test]
    fn test_all_open_cells_connected() {
        for seed in 0..8 {
            let layout = generate(seed);
            let distancer = Distancer::new(&layout);
            let starts = layout.agent_starts().unwrap();
            for cell in layout.open_cells() {
                assert_ne!(
                    distancer.maze_distance(starts[0], cell),
                    Distancer::UNREACHABLE,
                    "seed {seed}: {cell} cut off"
                );
            }
        }
    }

    #[test]
    fn test_starts_on_home_halves() {
        let layout = generate(3);
        let width = layout.width();
        for (agent, start) in layout.agent_starts().unwrap().into_iter().enumerate() {
            assert!(Team::of_agent(agent).is_home_column(start.x, width));
        }
    }

    #[test]
    fn test_food_counts() {
        let layout = generate(5);
        assert_eq!(layout.food().len(), 40);
        assert_eq!(layout.capsules().len(), 2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        assert_eq!(generate(11), generate(11));
    }

    #[test]
    fn test_rejects_odd_width() {
        let generator = LayoutGenerator {
            width: 21,
            ..LayoutGenerator::default()
        };
        let mut rng = Pcg32::seed_from_u64(0);
        assert!(generator.generate(&mut rng).is_err());
    }
}
