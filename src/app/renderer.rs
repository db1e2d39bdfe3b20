use std::{
    fmt,
    io::{Stdout, Write},
};

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    controller::{CellView, Snapshot},
    maze::{PathId, Side},
};

/// A single drawable square of the terminal picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile {
    /// A wall segment, drawn thicker for heavier borders.
    Wall(WallWeight),
    /// Cell interior, or an open passage between two cells.
    Floor(Floor),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WallWeight {
    Light,
    Medium,
    Heavy,
}

impl WallWeight {
    pub fn from_border_weight(border_weight: u32) -> Self {
        match border_weight {
            0..=3 => WallWeight::Light,
            4..=7 => WallWeight::Medium,
            _ => WallWeight::Heavy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Floor {
    Unvisited,
    Lane(PathId),
    Cursor,
    Backtrack,
}

impl Floor {
    fn of(cell: &CellView) -> Self {
        if cell.cursor {
            Floor::Cursor
        } else if cell.backtrack {
            Floor::Backtrack
        } else {
            Floor::lane(cell)
        }
    }

    /// Lane color of a cell, ignoring the transient markers.
    fn lane(cell: &CellView) -> Self {
        match (cell.visited, cell.path_id) {
            (true, Some(path_id)) => Floor::Lane(path_id),
            _ => Floor::Unvisited,
        }
    }
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const TILE_WIDTH: u16 = 2;

    fn styled(&self) -> StyledContent<&'static str> {
        match self {
            Tile::Wall(weight) => match weight {
                WallWeight::Light => "░░".with(Color::Grey),
                WallWeight::Medium => "▓▓".with(Color::Grey),
                WallWeight::Heavy => "██".with(Color::White),
            },
            Tile::Floor(floor) => match floor {
                Floor::Unvisited => "  ".on(Color::Black),
                Floor::Lane(PathId::A) => "  ".on(Color::DarkBlue),
                Floor::Lane(PathId::Z) => "  ".on(Color::DarkGreen),
                Floor::Cursor => "  ".on(Color::Yellow),
                Floor::Backtrack => "  ".on(Color::White),
            },
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = self.styled();

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::TILE_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Lays a snapshot out as a grid of tiles.
///
/// Every cell interior is `span` tiles square and is separated from its
/// neighbors by one tile of wall or passage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    rows: usize,
    cols: usize,
    span: usize,
}

impl Layout {
    pub fn new(snapshot: &Snapshot) -> Self {
        Layout {
            rows: snapshot.rows,
            cols: snapshot.cols,
            span: (snapshot.cell_size / 10).clamp(1, 2) as usize,
        }
    }

    /// Size of the picture in tiles (width, height).
    pub fn tiles(&self) -> (usize, usize) {
        (
            self.cols * (self.span + 1) + 1,
            self.rows * (self.span + 1) + 1,
        )
    }

    /// Size of the picture in terminal columns and rows.
    pub fn terminal_size(&self) -> (u16, u16) {
        let (w, h) = self.tiles();
        (w as u16 * Tile::TILE_WIDTH, h as u16)
    }

    /// Which tile sits at tile coordinate `(x, y)`.
    pub fn tile_at(&self, snapshot: &Snapshot, x: usize, y: usize) -> Tile {
        let stride = self.span + 1;
        let wall = Tile::Wall(WallWeight::from_border_weight(snapshot.border_weight));
        let (on_col_line, on_row_line) = (x % stride == 0, y % stride == 0);

        // Cell containing (or directly right/below) this tile
        let col = (x / stride).min(self.cols.saturating_sub(1));
        let row = (y / stride).min(self.rows.saturating_sub(1));
        let Some(cell) = snapshot.cell(row, col) else {
            return wall;
        };

        match (on_col_line, on_row_line) {
            // Corners are always solid
            (true, true) => wall,
            (true, false) => {
                let side = if x / stride >= self.cols { Side::East } else { Side::West };
                self.passage(cell, side, wall)
            }
            (false, true) => {
                let side = if y / stride >= self.rows { Side::South } else { Side::North };
                self.passage(cell, side, wall)
            }
            (false, false) => Tile::Floor(Floor::of(cell)),
        }
    }

    fn passage(&self, cell: &CellView, side: Side, wall: Tile) -> Tile {
        if cell.has_wall(side) {
            wall
        } else {
            // Passages take the lane color, never the transient markers
            Tile::Floor(Floor::lane(cell))
        }
    }
}

/// Draws snapshots to the terminal.
pub struct Renderer {
    /// Layout and session of the last frame, to know when to clear the screen
    last_frame: Option<(Layout, u64)>,
}

impl Renderer {
    /// Number of terminal rows reserved below the maze for status and help.
    pub const NUM_LOG_ROWS: u16 = 3;

    pub fn new() -> Self {
        Renderer { last_frame: None }
    }

    /// Force a full clear before the next frame, e.g. after a terminal resize.
    pub fn invalidate(&mut self) {
        self.last_frame = None;
    }

    /// Draw one frame with a status line below it.
    pub fn draw(&mut self, stdout: &mut Stdout, snapshot: &Snapshot, status: &str) -> std::io::Result<()> {
        let layout = Layout::new(snapshot);
        let (term_width, term_height) = terminal::size()?;
        let (width, height) = layout.terminal_size();

        if self.last_frame != Some((layout, snapshot.session_id)) {
            queue!(stdout, terminal::Clear(ClearType::All))?;
            self.last_frame = Some((layout, snapshot.session_id));
        }

        let maze_rows = if snapshot.cells.is_empty() {
            0
        } else if term_width < width || term_height < height + Renderer::NUM_LOG_ROWS {
            queue!(
                stdout,
                cursor::MoveTo(0, 0),
                terminal::Clear(ClearType::All),
                style::PrintStyledContent(
                    format!(
                        "Terminal size is too small ({}x{}) for the maze ({}x{}). Please resize the terminal.",
                        term_width, term_height, width, height
                    )
                    .with(Color::Yellow)
                    .attribute(Attribute::Bold)
                ),
            )?;
            1
        } else {
            let (tiles_w, tiles_h) = layout.tiles();
            for y in 0..tiles_h {
                queue!(stdout, cursor::MoveTo(0, y as u16))?;
                for x in 0..tiles_w {
                    queue!(stdout, style::Print(layout.tile_at(snapshot, x, y)))?;
                }
            }
            height
        };

        let status = status.unicode_truncate(term_width as usize).0;
        queue!(
            stdout,
            cursor::MoveTo(0, maze_rows + 1),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(Color::Cyan).attribute(Attribute::Bold)),
        )?;
        stdout.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new()
    }
}
