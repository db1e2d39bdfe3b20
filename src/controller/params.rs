use std::{fmt, ops::RangeInclusive, str::FromStr, time::Duration};

/// Names of the tunable generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    Fps,
    CellSize,
    BorderWeight,
    GridColumns,
    GridRows,
}

impl ParamName {
    pub const ALL: [ParamName; 5] = [
        ParamName::Fps,
        ParamName::CellSize,
        ParamName::BorderWeight,
        ParamName::GridColumns,
        ParamName::GridRows,
    ];

    /// Inclusive range every value of this parameter is clamped to.
    pub const fn bounds(self) -> RangeInclusive<u32> {
        match self {
            ParamName::Fps => 5..=60,
            ParamName::CellSize => 10..=25,
            ParamName::BorderWeight => 1..=10,
            ParamName::GridColumns => 2..=25,
            ParamName::GridRows => 2..=25,
        }
    }

    /// Clamp an arbitrary value into this parameter's bounds.
    pub fn clamp(self, value: i64) -> u32 {
        let bounds = self.bounds();
        value.clamp(*bounds.start() as i64, *bounds.end() as i64) as u32
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamName::Fps => write!(f, "fps"),
            ParamName::CellSize => write!(f, "cellSize"),
            ParamName::BorderWeight => write!(f, "borderWeight"),
            ParamName::GridColumns => write!(f, "gridColumns"),
            ParamName::GridRows => write!(f, "gridRows"),
        }
    }
}

impl FromStr for ParamName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fps" => Ok(ParamName::Fps),
            "cellSize" | "cell_size" => Ok(ParamName::CellSize),
            "borderWeight" | "border_weight" => Ok(ParamName::BorderWeight),
            "gridColumns" | "grid_columns" => Ok(ParamName::GridColumns),
            "gridRows" | "grid_rows" => Ok(ParamName::GridRows),
            other => Err(format!(
                "Unknown parameter '{}'. Expected one of: fps, cellSize, borderWeight, gridColumns, gridRows.",
                other
            )),
        }
    }
}

/// Parameters a generation session is created with.
///
/// Grid size and speed are read by the controller; cell size and border weight
/// are only forwarded to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    pub fps: u32,
    pub cell_size: u32,
    pub border_weight: u32,
    pub grid_columns: u32,
    pub grid_rows: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            fps: 30,
            cell_size: 20,
            border_weight: 2,
            grid_columns: 15,
            grid_rows: 15,
        }
    }
}

impl GenerationParams {
    pub fn get(&self, name: ParamName) -> u32 {
        match name {
            ParamName::Fps => self.fps,
            ParamName::CellSize => self.cell_size,
            ParamName::BorderWeight => self.border_weight,
            ParamName::GridColumns => self.grid_columns,
            ParamName::GridRows => self.grid_rows,
        }
    }

    /// Set a parameter, clamping it into its bounds. Returns the stored value.
    pub fn set(&mut self, name: ParamName, value: i64) -> u32 {
        let clamped = name.clamp(value);
        if clamped as i64 != value {
            tracing::debug!("Clamped {} from {} to {}", name, value, clamped);
        }
        let slot = match name {
            ParamName::Fps => &mut self.fps,
            ParamName::CellSize => &mut self.cell_size,
            ParamName::BorderWeight => &mut self.border_weight,
            ParamName::GridColumns => &mut self.grid_columns,
            ParamName::GridRows => &mut self.grid_rows,
        };
        *slot = clamped;
        clamped
    }

    /// Time between two scheduled ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
