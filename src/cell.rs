use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

/// The kind of a grid cell.
///
/// Each variant carries a fixed capability set which never changes; see [`allow_building`](Self::allow_building),
/// [`is_traversable`](Self::is_traversable), [`is_spawn`](Self::is_spawn) and [`is_exit`](Self::is_exit).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, VariantArray, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// Open ground; walkable and buildable.
    #[default]
    Basic,
    /// Walkable, but nothing may be built here.
    Unbuildable,
    /// Not part of the map at all.
    Void,
    /// Where enemies enter.
    Spawn,
    /// Where enemies leave.
    Exit,
    /// A blocker (tower or wall).
    Occupied,
    /// A marked route tile; walkable and buildable.
    Route,
}

impl CellType {
    /// A blocker may be placed on this cell.
    pub const fn allow_building(self) -> bool {
        matches!(self, Self::Basic | Self::Route)
    }

    /// Enemies may walk across this cell.
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Void | Self::Occupied)
    }

    /// This cell is a spawn.
    pub const fn is_spawn(self) -> bool {
        matches!(self, Self::Spawn)
    }

    /// This cell is an exit.
    pub const fn is_exit(self) -> bool {
        matches!(self, Self::Exit)
    }

    /// The character used for this cell in a grid snapshot.
    pub const fn symbol(self) -> char {
        match self {
            Self::Basic => '.',
            Self::Unbuildable => '_',
            Self::Void => '~',
            Self::Spawn => 'S',
            Self::Exit => 'E',
            Self::Occupied => '#',
            Self::Route => '+',
        }
    }

    /// Inverse of [`Self::symbol`].
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|cell_type| cell_type.symbol() == symbol)
    }

    /// The type an editor cycles to when a cell is clicked.
    ///
    /// [`Route`](Self::Route) is not part of the cycle and moves back to [`Basic`](Self::Basic).
    pub const fn next_in_rotation(self) -> Self {
        match self {
            Self::Basic => Self::Unbuildable,
            Self::Unbuildable => Self::Void,
            Self::Void => Self::Spawn,
            Self::Spawn => Self::Exit,
            Self::Exit => Self::Occupied,
            Self::Occupied | Self::Route => Self::Basic,
        }
    }

    /// Reverse of [`Self::next_in_rotation`].
    pub const fn previous_in_rotation(self) -> Self {
        match self {
            Self::Basic | Self::Route => Self::Occupied,
            Self::Unbuildable => Self::Basic,
            Self::Void => Self::Unbuildable,
            Self::Spawn => Self::Void,
            Self::Exit => Self::Spawn,
            Self::Occupied => Self::Exit,
        }
    }
}
