use std::collections::VecDeque;

use super::{geometry::Position, layout::Layout};

/// All-pairs shortest path lengths over the open cells of a layout.
///
/// Distances are computed once with one breadth-first search per open cell and
/// stored in a flat `cells x cells` table. Walls and disconnected cells report
/// [`Distancer::UNREACHABLE`].
#[derive(Debug, Clone)]
pub struct Distancer {
    width: usize,
    height: usize,
    table: Vec<u16>,
}

impl Distancer {
    pub const UNREACHABLE: u32 = u32::MAX;

    const NO_PATH: u16 = u16::MAX;

    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        let width = layout.width();
        let height = layout.height();
        let cells = width * height;
        let mut table = vec![Self::NO_PATH; cells * cells];
        let mut queue = VecDeque::new();

        for source in layout.open_cells() {
            let row = &mut table[(source.y * width + source.x) * cells..][..cells];
            row[source.y * width + source.x] = 0;
            queue.clear();
            queue.push_back(source);
            while let Some(current) = queue.pop_front() {
                let next_distance = row[current.y * width + current.x] + 1;
                for next in layout.open_neighbors(current) {
                    let slot = &mut row[next.y * width + next.x];
                    if *slot == Self::NO_PATH {
                        *slot = next_distance;
                        queue.push_back(next);
                    }
                }
            }
        }

        Self {
            width,
            height,
            table,
        }
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.x < self.width && position.y < self.height)
            .then_some(position.y * self.width + position.x)
    }

    /// Shortest path length between two cells, respecting walls.
    #[must_use]
    pub fn maze_distance(&self, from: Position, to: Position) -> u32 {
        let (Some(from), Some(to)) = (self.index(from), self.index(to)) else {
            return Self::UNREACHABLE;
        };
        let cells = self.width * self.height;
        match self.table[from * cells + to] {
            Self::NO_PATH => Self::UNREACHABLE,
            distance => u32::from(distance),
        }
    }
}
