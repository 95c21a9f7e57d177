//! The fixed world map: territories, continents and the adjacency table.
//!
//! This module provides the static data the rest of the engine is built on:
//! - `Territory`: the 42 named regions of the standard map
//! - `Continent`: the six continent groupings and their reinforcement bonus
//! - `EDGES`: the 82 undirected borders between territories
//!
//! Territories are an enum rather than strings so that referencing an unknown
//! territory is impossible once a name has been parsed. The `#[repr(u8)]`
//! discriminant doubles as an index into per-territory arrays.

use crate::cards::CardKind;
use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Number of territories on the map
pub const TERRITORY_COUNT: usize = 42;

/// Number of undirected borders on the map
pub const EDGE_COUNT: usize = 82;

/// A territory on the world map, in alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Territory {
    Afghanistan = 0,
    Alaska = 1,
    Alberta = 2,
    Argentina = 3,
    Brazil = 4,
    CentralAmerica = 5,
    China = 6,
    Congo = 7,
    EastAfrica = 8,
    EasternAustralia = 9,
    EasternUnitedStates = 10,
    Egypt = 11,
    GreatBritain = 12,
    Greenland = 13,
    Iceland = 14,
    India = 15,
    Indonesia = 16,
    Irkutsk = 17,
    Japan = 18,
    Kamchatka = 19,
    Madagascar = 20,
    MiddleEast = 21,
    Mongolia = 22,
    NewGuinea = 23,
    NorthAfrica = 24,
    NorthernEurope = 25,
    NorthwestTerritory = 26,
    Ontario = 27,
    Peru = 28,
    Quebec = 29,
    Scandinavia = 30,
    Siam = 31,
    Siberia = 32,
    SouthAfrica = 33,
    SouthernEurope = 34,
    Ukraine = 35,
    Ural = 36,
    Venezuela = 37,
    WesternAustralia = 38,
    WesternEurope = 39,
    WesternUnitedStates = 40,
    Yakutsk = 41,
}

use Territory as T;

impl Territory {
    /// All territories, indexed by discriminant
    pub const ALL: [Territory; TERRITORY_COUNT] = [
        T::Afghanistan,
        T::Alaska,
        T::Alberta,
        T::Argentina,
        T::Brazil,
        T::CentralAmerica,
        T::China,
        T::Congo,
        T::EastAfrica,
        T::EasternAustralia,
        T::EasternUnitedStates,
        T::Egypt,
        T::GreatBritain,
        T::Greenland,
        T::Iceland,
        T::India,
        T::Indonesia,
        T::Irkutsk,
        T::Japan,
        T::Kamchatka,
        T::Madagascar,
        T::MiddleEast,
        T::Mongolia,
        T::NewGuinea,
        T::NorthAfrica,
        T::NorthernEurope,
        T::NorthwestTerritory,
        T::Ontario,
        T::Peru,
        T::Quebec,
        T::Scandinavia,
        T::Siam,
        T::Siberia,
        T::SouthAfrica,
        T::SouthernEurope,
        T::Ukraine,
        T::Ural,
        T::Venezuela,
        T::WesternAustralia,
        T::WesternEurope,
        T::WesternUnitedStates,
        T::Yakutsk,
    ];

    /// Index into per-territory arrays
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name as printed on the board
    pub fn name(self) -> &'static str {
        match self {
            T::Afghanistan => "Afghanistan",
            T::Alaska => "Alaska",
            T::Alberta => "Alberta",
            T::Argentina => "Argentina",
            T::Brazil => "Brazil",
            T::CentralAmerica => "Central America",
            T::China => "China",
            T::Congo => "Congo",
            T::EastAfrica => "East Africa",
            T::EasternAustralia => "Eastern Australia",
            T::EasternUnitedStates => "Eastern United States",
            T::Egypt => "Egypt",
            T::GreatBritain => "Great Britain",
            T::Greenland => "Greenland",
            T::Iceland => "Iceland",
            T::India => "India",
            T::Indonesia => "Indonesia",
            T::Irkutsk => "Irkutsk",
            T::Japan => "Japan",
            T::Kamchatka => "Kamchatka",
            T::Madagascar => "Madagascar",
            T::MiddleEast => "Middle East",
            T::Mongolia => "Mongolia",
            T::NewGuinea => "New Guinea",
            T::NorthAfrica => "North Africa",
            T::NorthernEurope => "Northern Europe",
            T::NorthwestTerritory => "Northwest Territory",
            T::Ontario => "Ontario",
            T::Peru => "Peru",
            T::Quebec => "Quebec",
            T::Scandinavia => "Scandinavia",
            T::Siam => "Siam",
            T::Siberia => "Siberia",
            T::SouthAfrica => "South Africa",
            T::SouthernEurope => "Southern Europe",
            T::Ukraine => "Ukraine",
            T::Ural => "Ural",
            T::Venezuela => "Venezuela",
            T::WesternAustralia => "Western Australia",
            T::WesternEurope => "Western Europe",
            T::WesternUnitedStates => "Western United States",
            T::Yakutsk => "Yakutsk",
        }
    }

    /// The kind printed on this territory's card
    pub fn card_kind(self) -> CardKind {
        use CardKind::{Artillery, Cavalry, Infantry};
        match self {
            T::Afghanistan
            | T::Alaska
            | T::Alberta
            | T::EasternAustralia
            | T::Egypt
            | T::Iceland
            | T::India
            | T::Irkutsk
            | T::Japan
            | T::Madagascar
            | T::NorthAfrica
            | T::WesternEurope
            | T::WesternUnitedStates => Infantry,

            T::Argentina
            | T::CentralAmerica
            | T::China
            | T::Congo
            | T::GreatBritain
            | T::Greenland
            | T::Indonesia
            | T::Kamchatka
            | T::NewGuinea
            | T::NorthernEurope
            | T::Peru
            | T::SouthernEurope
            | T::Ural
            | T::Yakutsk => Cavalry,

            T::Brazil
            | T::EastAfrica
            | T::EasternUnitedStates
            | T::MiddleEast
            | T::Mongolia
            | T::NorthwestTerritory
            | T::Ontario
            | T::Quebec
            | T::Scandinavia
            | T::Siam
            | T::Siberia
            | T::SouthAfrica
            | T::Ukraine
            | T::Venezuela
            | T::WesternAustralia => Artillery,
        }
    }

    /// The continent this territory belongs to
    pub fn continent(self) -> Continent {
        Continent::ALL
            .into_iter()
            .find(|c| c.territories().contains(&self))
            .unwrap_or_else(|| unreachable!("{} belongs to no continent", self.name()))
    }

    /// Territories sharing a border with this one
    pub fn neighbors(self) -> &'static [Territory] {
        &NEIGHBORS[self.index()]
    }

    /// Whether two territories share a border
    pub fn borders(self, other: Territory) -> bool {
        self.neighbors().contains(&other)
    }
}

impl fmt::Display for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Territory {
    type Err = GameError;

    /// Parses either the display name ("Western United States") or the
    /// variant spelling ("WesternUnitedStates"), ignoring case and spaces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Territory::ALL
            .into_iter()
            .find(|t| normalize(t.name()) == wanted)
            .ok_or_else(|| GameError::UnknownTerritory(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A continent grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Australia,
}

impl Continent {
    /// All continents
    pub const ALL: [Continent; 6] = [
        Continent::NorthAmerica,
        Continent::SouthAmerica,
        Continent::Europe,
        Continent::Africa,
        Continent::Asia,
        Continent::Australia,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Australia => "Australia",
        }
    }

    /// Extra troops per turn for holding every territory of the continent
    pub fn bonus(self) -> u32 {
        match self {
            Continent::NorthAmerica => 5,
            Continent::SouthAmerica => 2,
            Continent::Europe => 5,
            Continent::Africa => 3,
            Continent::Asia => 7,
            Continent::Australia => 2,
        }
    }

    /// Member territories in board order
    pub fn territories(self) -> &'static [Territory] {
        match self {
            Continent::NorthAmerica => &[
                T::Alaska,
                T::NorthwestTerritory,
                T::Greenland,
                T::Alberta,
                T::Ontario,
                T::Quebec,
                T::WesternUnitedStates,
                T::EasternUnitedStates,
                T::CentralAmerica,
            ],
            Continent::SouthAmerica => &[T::Venezuela, T::Peru, T::Brazil, T::Argentina],
            Continent::Europe => &[
                T::Iceland,
                T::GreatBritain,
                T::Scandinavia,
                T::NorthernEurope,
                T::SouthernEurope,
                T::WesternEurope,
                T::Ukraine,
            ],
            Continent::Africa => &[
                T::NorthAfrica,
                T::Egypt,
                T::EastAfrica,
                T::Congo,
                T::SouthAfrica,
                T::Madagascar,
            ],
            Continent::Asia => &[
                T::Ural,
                T::Siberia,
                T::Yakutsk,
                T::Kamchatka,
                T::Irkutsk,
                T::Mongolia,
                T::Japan,
                T::Afghanistan,
                T::China,
                T::MiddleEast,
                T::India,
                T::Siam,
            ],
            Continent::Australia => &[
                T::Indonesia,
                T::NewGuinea,
                T::WesternAustralia,
                T::EasternAustralia,
            ],
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every border on the map, listed once.
pub static EDGES: [(Territory, Territory); EDGE_COUNT] = [
    // North America
    (T::Alaska, T::NorthwestTerritory),
    (T::Alaska, T::Alberta),
    (T::Alaska, T::Kamchatka),
    (T::NorthwestTerritory, T::Greenland),
    (T::NorthwestTerritory, T::Alberta),
    (T::NorthwestTerritory, T::Ontario),
    (T::Greenland, T::Ontario),
    (T::Greenland, T::Quebec),
    (T::Greenland, T::Iceland),
    (T::Alberta, T::Ontario),
    (T::Alberta, T::WesternUnitedStates),
    (T::Ontario, T::Quebec),
    (T::Ontario, T::WesternUnitedStates),
    (T::Ontario, T::EasternUnitedStates),
    (T::Quebec, T::EasternUnitedStates),
    (T::WesternUnitedStates, T::EasternUnitedStates),
    (T::WesternUnitedStates, T::CentralAmerica),
    (T::EasternUnitedStates, T::CentralAmerica),
    (T::CentralAmerica, T::Venezuela),
    // South America
    (T::Venezuela, T::Peru),
    (T::Venezuela, T::Brazil),
    (T::Peru, T::Brazil),
    (T::Peru, T::Argentina),
    (T::Brazil, T::Argentina),
    (T::Brazil, T::NorthAfrica),
    // Europe and Africa
    (T::NorthAfrica, T::WesternEurope),
    (T::NorthAfrica, T::SouthernEurope),
    (T::NorthAfrica, T::Egypt),
    (T::NorthAfrica, T::EastAfrica),
    (T::WesternEurope, T::GreatBritain),
    (T::WesternEurope, T::NorthernEurope),
    (T::WesternEurope, T::SouthernEurope),
    (T::GreatBritain, T::Iceland),
    (T::GreatBritain, T::Scandinavia),
    (T::GreatBritain, T::NorthernEurope),
    (T::Scandinavia, T::Iceland),
    (T::Scandinavia, T::NorthernEurope),
    (T::Scandinavia, T::Ukraine),
    (T::NorthernEurope, T::SouthernEurope),
    (T::NorthernEurope, T::Ukraine),
    (T::SouthernEurope, T::Ukraine),
    (T::SouthernEurope, T::MiddleEast),
    (T::SouthernEurope, T::Egypt),
    (T::Egypt, T::EastAfrica),
    (T::Egypt, T::MiddleEast),
    (T::EastAfrica, T::MiddleEast),
    (T::EastAfrica, T::Congo),
    (T::EastAfrica, T::SouthAfrica),
    (T::EastAfrica, T::Madagascar),
    (T::Congo, T::SouthAfrica),
    (T::Congo, T::NorthAfrica),
    (T::SouthAfrica, T::Madagascar),
    // Asia
    (T::Ural, T::Siberia),
    (T::Ural, T::China),
    (T::Ural, T::Afghanistan),
    (T::Ural, T::Ukraine),
    (T::Siberia, T::Yakutsk),
    (T::Siberia, T::Irkutsk),
    (T::Siberia, T::China),
    (T::Yakutsk, T::Kamchatka),
    (T::Yakutsk, T::Irkutsk),
    (T::Kamchatka, T::Irkutsk),
    (T::Kamchatka, T::Mongolia),
    (T::Kamchatka, T::Japan),
    (T::Irkutsk, T::Mongolia),
    (T::Mongolia, T::China),
    (T::Mongolia, T::Japan),
    (T::Afghanistan, T::China),
    (T::Afghanistan, T::MiddleEast),
    (T::Afghanistan, T::India),
    (T::Afghanistan, T::Ukraine),
    (T::China, T::India),
    (T::China, T::Siam),
    (T::MiddleEast, T::India),
    (T::MiddleEast, T::Ukraine),
    (T::India, T::Siam),
    // Australia
    (T::Siam, T::Indonesia),
    (T::Indonesia, T::NewGuinea),
    (T::Indonesia, T::WesternAustralia),
    (T::NewGuinea, T::WesternAustralia),
    (T::NewGuinea, T::EasternAustralia),
    (T::WesternAustralia, T::EasternAustralia),
];

/// Per-territory neighbor lists, built from `EDGES` on first access.
static NEIGHBORS: LazyLock<Vec<Vec<Territory>>> = LazyLock::new(|| {
    let mut neighbors = vec![Vec::new(); TERRITORY_COUNT];
    for &(a, b) in EDGES.iter() {
        neighbors[a.index()].push(b);
        neighbors[b.index()].push(a);
    }
    for list in &mut neighbors {
        list.sort();
    }
    neighbors
});
