//! CSV export of learned values over the full state grid
//!
//! Each export is one value per (dealer showing, player sum) cell, derived
//! from the two action values by a [`ValueTransform`]. Files are keyed by
//! algorithm name and transform name so several runs can share a directory.

use std::{
    fmt,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    str::FromStr,
};

use crate::{
    Error, Result,
    easy21::{
        Action, MAX_SUM, MIN_SUM, State,
        card::{MAX_CARD_VALUE, MIN_CARD_VALUE},
    },
    learning::ValueTable,
};

/// How the two action values of a state collapse into one plotted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTransform {
    /// Value of hitting
    Hit,
    /// Value of sticking
    Stick,
    /// Larger of the two, the greedy state value
    Max,
    /// Hit minus stick; positive where hitting looks better
    HitMinusStick,
}

impl ValueTransform {
    pub const ALL: [ValueTransform; 4] = [
        ValueTransform::Hit,
        ValueTransform::Stick,
        ValueTransform::Max,
        ValueTransform::HitMinusStick,
    ];

    const EXPECTED: &'static str = "hit, stick, max, hit-minus-stick";

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTransform::Hit => "hit",
            ValueTransform::Stick => "stick",
            ValueTransform::Max => "max",
            ValueTransform::HitMinusStick => "hit-minus-stick",
        }
    }

    pub fn apply(&self, table: &ValueTable, state: &State) -> f64 {
        let hit = table.get(state, Action::Hit);
        let stick = table.get(state, Action::Stick);
        match self {
            ValueTransform::Hit => hit,
            ValueTransform::Stick => stick,
            ValueTransform::Max => hit.max(stick),
            ValueTransform::HitMinusStick => hit - stick,
        }
    }
}

impl fmt::Display for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueTransform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hit" => Ok(ValueTransform::Hit),
            "stick" => Ok(ValueTransform::Stick),
            "max" => Ok(ValueTransform::Max),
            "hit-minus-stick" | "diff" => Ok(ValueTransform::HitMinusStick),
            other => Err(Error::ParseTransform {
                input: other.to_string(),
                expected: Self::EXPECTED.to_string(),
            }),
        }
    }
}

/// Exporter for value grid CSV files
pub struct ValueGridExporter;

impl ValueGridExporter {
    /// File name for an (algorithm, transform) pair, e.g. `q-learning_max.csv`.
    pub fn file_name(algorithm: &str, transform: ValueTransform) -> String {
        let algorithm = algorithm.to_ascii_lowercase().replace([' ', '/'], "-");
        format!("{algorithm}_{transform}.csv")
    }

    /// Write every grid cell to `path`.
    ///
    /// Returns the number of rows written.
    pub fn export(table: &ValueTable, transform: ValueTransform, path: &Path) -> Result<usize> {
        let mut writer = BufWriter::new(File::create(path)?);
        let rows = Self::write(table, transform, &mut writer)?;
        writer.flush()?;
        Ok(rows)
    }

    /// Write the grid as CSV to any writer
    pub fn write<W: Write>(
        table: &ValueTable,
        transform: ValueTransform,
        writer: &mut W,
    ) -> Result<usize> {
        writeln!(writer, "dealer_showing,player_sum,value")?;

        let mut rows = 0;
        for dealer in MIN_CARD_VALUE..=MAX_CARD_VALUE {
            for player in MIN_SUM..=MAX_SUM {
                let value = transform.apply(table, &State::new(dealer, player));
                writeln!(writer, "{dealer},{player},{value}")?;
                rows += 1;
            }
        }
        Ok(rows)
    }
}
