//! Level files: adversary spawn headers followed by a `0`/`1` grid.
//!
//! ```text
//! Karakter:DarthVader,Kapi:A
//! Karakter:KyloRen,Kapi:B
//! 1 1 1 1 0 1 1 1 1 1 1 1 1 1
//! ...
//! ```
//!
//! Door, start and goal cells are not part of the text. They come from a
//! [`LevelLayout`] and are stamped onto the parsed grid.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    DoorId, Position,
    agent::{AdversaryKind, UnknownAdversary},
    map::{Cell, Grid, GridError},
};

const CHARACTER_KEY: &str = "Karakter";
const DOOR_KEY: &str = "Kapi";

/// Errors raised while loading a level. All of them prevent a session from
/// starting.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("Failed to read level file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Line {line}: malformed character header '{content}'")]
    MalformedHeader { line: usize, content: String },
    #[error("Line {line}: {source}")]
    UnknownAdversary {
        line: usize,
        #[source]
        source: UnknownAdversary,
    },
    #[error("Unknown grid symbol '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: String,
    },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("Grid is {found_width}x{found_height}, level requires {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },
    #[error("{anchor} at {position} lies outside the {width}x{height} grid")]
    AnchorOutOfBounds {
        anchor: String,
        position: Position,
        width: usize,
        height: usize,
    },
    #[error("Door '{0}' is declared more than once")]
    DuplicateDoor(DoorId),
    #[error("Line {line}: spawn references undeclared door '{door}'")]
    UnknownDoor { line: usize, door: DoorId },
    #[error("Start and goal share cell {0}")]
    StartIsGoal(Position),
    #[error("Start {position} covers door '{door}'")]
    StartOnDoor { door: DoorId, position: Position },
}

/// Placement of a named door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorAnchor {
    pub id: DoorId,
    pub position: Position,
}

/// Per-level constants that are not encoded in the level text: expected
/// dimensions and the door, start and goal overlays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub width: usize,
    pub height: usize,
    pub doors: Vec<DoorAnchor>,
    pub start: Position,
    pub goal: Position,
}

impl Default for LevelLayout {
    /// The reference deployment: a 14x11 maze with doors on the top and
    /// bottom edges and the goal sharing the bottom door's cell.
    fn default() -> Self {
        LevelLayout {
            width: 14,
            height: 11,
            doors: vec![
                DoorAnchor {
                    id: DoorId('A'),
                    position: Position::new(4, 0),
                },
                DoorAnchor {
                    id: DoorId('B'),
                    position: Position::new(4, 10),
                },
            ],
            start: Position::new(6, 5),
            goal: Position::new(4, 10),
        }
    }
}

/// One adversary declared in a level header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdversarySpawn {
    pub kind: AdversaryKind,
    pub door: DoorId,
}

/// A parsed level: the finished grid plus everything needed to populate a
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    grid: Grid<Cell>,
    spawns: Vec<AdversarySpawn>,
    doors: BTreeMap<DoorId, Position>,
    start: Position,
    goal: Position,
}

impl Level {
    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    pub fn spawns(&self) -> &[AdversarySpawn] {
        &self.spawns
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn door(&self, id: DoorId) -> Option<Position> {
        self.doors.get(&id).copied()
    }

    /// Spawn list resolved to concrete positions, in header order.
    pub fn spawn_points(&self) -> impl Iterator<Item = (AdversaryKind, Position)> + '_ {
        self.spawns
            .iter()
            .filter_map(|spawn| Some((spawn.kind, self.door(spawn.door)?)))
    }
}

/// Reads and parses a level file.
pub fn load_level(path: impl AsRef<Path>, layout: &LevelLayout) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let level = parse_level(&text, layout)?;
    tracing::info!(
        path = %path.display(),
        adversaries = level.spawns.len(),
        "level loaded"
    );
    Ok(level)
}

/// Parses level text against `layout`.
pub fn parse_level(text: &str, layout: &LevelLayout) -> Result<Level, LevelError> {
    let mut lines = text.lines().enumerate().peekable();

    let mut header = Vec::new();
    while let Some((index, line)) = lines.peek() {
        if !line.contains(CHARACTER_KEY) {
            break;
        }
        header.push((index + 1, parse_header_line(index + 1, line)?));
        lines.next();
    }

    let mut rows = Vec::new();
    for (_, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let row = rows.len();
        let cells = line
            .split_whitespace()
            .enumerate()
            .map(|(column, symbol)| match symbol {
                "0" => Ok(Cell::Floor),
                "1" => Ok(Cell::Wall),
                other => Err(LevelError::UnknownSymbol {
                    row,
                    column,
                    symbol: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(cells);
    }

    let grid = Grid::from_rows(rows)?;
    if grid.width() != layout.width || grid.height() != layout.height {
        return Err(LevelError::DimensionMismatch {
            width: layout.width,
            height: layout.height,
            found_width: grid.width(),
            found_height: grid.height(),
        });
    }

    let doors = door_table(layout, &grid)?;
    for (anchor, position) in [("Start", layout.start), ("Goal", layout.goal)] {
        check_anchor(&grid, anchor, position)?;
    }
    if layout.start == layout.goal {
        return Err(LevelError::StartIsGoal(layout.start));
    }
    if let Some((door, _)) = doors.iter().find(|(_, position)| **position == layout.start) {
        return Err(LevelError::StartOnDoor {
            door: *door,
            position: layout.start,
        });
    }

    let spawns = header
        .into_iter()
        .map(|(line, spawn)| {
            if doors.contains_key(&spawn.door) {
                Ok(spawn)
            } else {
                Err(LevelError::UnknownDoor {
                    line,
                    door: spawn.door,
                })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Goal is stamped last so it wins over a door on the same cell.
    let mut grid = grid;
    for (id, position) in &doors {
        grid = grid.with_cell(*position, Cell::Door(*id))?;
    }
    let grid = grid
        .with_cell(layout.start, Cell::Start)?
        .with_cell(layout.goal, Cell::Goal)?;

    Ok(Level {
        grid,
        spawns,
        doors,
        start: layout.start,
        goal: layout.goal,
    })
}

/// Parses `Karakter:<Kind>,Kapi:<DoorId>`.
fn parse_header_line(line: usize, content: &str) -> Result<AdversarySpawn, LevelError> {
    let malformed = || LevelError::MalformedHeader {
        line,
        content: content.trim().to_string(),
    };

    let mut fields = content.trim().split(',').map(|field| {
        field
            .split_once(':')
            .map(|(key, value)| (key.trim(), value.trim()))
    });
    let (Some(Some((CHARACTER_KEY, kind))), Some(Some((DOOR_KEY, door))), None) =
        (fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    let mut door_chars = door.chars();
    let (Some(door), None) = (door_chars.next(), door_chars.next()) else {
        return Err(malformed());
    };

    let kind = kind
        .parse()
        .map_err(|source| LevelError::UnknownAdversary { line, source })?;
    Ok(AdversarySpawn {
        kind,
        door: DoorId(door),
    })
}

fn door_table(
    layout: &LevelLayout,
    grid: &Grid<Cell>,
) -> Result<BTreeMap<DoorId, Position>, LevelError> {
    let mut doors = BTreeMap::new();
    for anchor in &layout.doors {
        check_anchor(grid, &format!("Door '{}'", anchor.id), anchor.position)?;
        if doors.insert(anchor.id, anchor.position).is_some() {
            return Err(LevelError::DuplicateDoor(anchor.id));
        }
    }
    Ok(doors)
}

fn check_anchor(grid: &Grid<Cell>, anchor: &str, position: Position) -> Result<(), LevelError> {
    if grid.contains(position) {
        Ok(())
    } else {
        Err(LevelError::AnchorOutOfBounds {
            anchor: anchor.to_string(),
            position,
            width: grid.width(),
            height: grid.height(),
        })
    }
}
