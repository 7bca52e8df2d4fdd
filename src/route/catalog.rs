//! Predefined walking routes and route selection.
//!
//! The built-in catalog holds three routes around Lindholmen in Gothenburg,
//! one per duration choice. A TOML catalog with the same shape can replace it.

use super::types::{Challenges, DurationChoice, Route, RouteError, Waypoint};
use crate::geo::Coordinate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Static description of one stop.
struct StopDef {
    name: &'static str,
    lat: f64,
    lng: f64,
    easy: &'static str,
    medium: &'static str,
    hard: &'static str,
    exercise: Option<u32>,
}

const PINGISBORDET: StopDef = StopDef {
    name: "Pingisbordet",
    lat: 57.70579643449758,
    lng: 11.935602150050574,
    easy: "Gör 3x3 dips mot bänken",
    medium: "Gör 6x3 dips mot bänken",
    hard: "Gör 12x3 dips mot bänken",
    exercise: Some(1),
};

const PINGISBORDET_NORTH: StopDef = StopDef {
    lat: 57.705792013988,
    lng: 11.937850430535947,
    ..PINGISBORDET
};

const LUNCHBRYGGAN: StopDef = StopDef {
    name: "Lunchbryggan",
    lat: 57.70549121502736,
    lng: 11.938579413848506,
    easy: "Gör 3x3 squats och njut av utsikten",
    medium: "Gör 6x3 squats och njut av utsikten",
    hard: "Gör 12x3 squats och njut av utsikten",
    exercise: None,
};

const BAGEN: StopDef = StopDef {
    name: "Bågen",
    lat: 57.705053637391764,
    lng: 11.938487523301008,
    easy: "Spring så fort du kan mellan bågarna 3x3 gånger",
    medium: "Spring så fort du kan mellan bågarna 6x3 gånger",
    hard: "Spring så fort du kan mellan bågarna 12x3 gånger",
    exercise: Some(3),
};

const DIAGONALEN: StopDef = StopDef {
    name: "Restaurang Diagonalen",
    lat: 57.704410187796114,
    lng: 11.937695571152092,
    easy: "Gör 3x3 utfallssteg och njut av utsikten",
    medium: "Gör 6x3 utfallssteg och njut av utsikten",
    hard: "Gör 12x3 utfallssteg och njut av utsikten",
    exercise: Some(4),
};

const MONKEY_BAR: StopDef = StopDef {
    name: "Monkey Bar",
    lat: 57.70520196261045,
    lng: 11.934671071152092,
    easy: "Gör 1x1 pull up på monkeybaren",
    medium: "Gör 3x3 pull ups på monkeybaren",
    hard: "Gör 6x3 pull ups på monkeybaren",
    exercise: Some(5),
};

const HASSELBLADSPARKEN: StopDef = StopDef {
    name: "Hasselbladsparken",
    lat: 57.70520028683433,
    lng: 11.934458914084187,
    easy: "Gör 3x3 situps på en bänk",
    medium: "Gör 6x3 situps på en bänk",
    hard: "Gör 12x3 situps på en bänk",
    exercise: Some(6),
};

const TRAPPAN: StopDef = StopDef {
    name: "Trappan",
    lat: 57.705362002126876,
    lng: 11.934110495232032,
    easy: "Spring upp och ner för trappan 1x1 gång",
    medium: "Spring upp och ner för trappan 1x2 gånger",
    hard: "Spring upp och ner för trappan 1x3 gånger",
    exercise: Some(7),
};

const PIZZERIAN: StopDef = StopDef {
    name: "Lindholmens Pizzeria",
    lat: 57.705452587842544,
    lng: 11.933770482196561,
    easy: "Gå upp för backen mot Verkmästaregatan",
    medium: "Jogga upp för backen mot Verkmästaregatan",
    hard: "Spring upp för backen mot Verkmästaregatan",
    exercise: Some(8),
};

const ROSENRABATTEN: StopDef = StopDef {
    name: "Rosenrabatten",
    lat: 57.706724880186925,
    lng: 11.933639093853229,
    easy: "Gör 10x3 tåhävningar på trottoarkanten",
    medium: "Gör 12x3 tåhävningar på trottoarkanten",
    hard: "Gör 15x3 tåhävningar på trottoarkanten",
    exercise: Some(9),
};

const NARGANGEN: StopDef = StopDef {
    name: "Närgången",
    lat: 57.706150333610786,
    lng: 11.935910998986797,
    easy: "Gör 3x3 dips",
    medium: "Gör 6x3 dips",
    hard: "Gör 12x3 dips",
    exercise: Some(1),
};

const RONDELLEN: StopDef = StopDef {
    name: "Rondellen",
    lat: 57.707132561531495,
    lng: 11.935025053987637,
    easy: "Gör plankan i 15 sek x3",
    medium: "Gör plankan i 30 sek x3",
    hard: "Gör plankan i 1 min x3",
    exercise: Some(10),
};

const RONDELLTRAPPAN: StopDef = StopDef {
    name: "Rondelltrappan",
    lat: 57.70728914612908,
    lng: 11.934199060153833,
    easy: "Jogga ner för trappan",
    medium: "Spring ner för trappan",
    hard: "Spring upp och ner för trappan en gång",
    exercise: Some(7),
};

const ROSENRABATTEN_FINAL: StopDef = StopDef {
    lat: 57.706780243711236,
    lng: 11.933639515943836,
    easy: "Tåhävningar på två ben 12x3",
    medium: "Tåhävningar på 1 ben 12x3",
    hard: "Tåhävningar mot trottoaren 12x3",
    ..ROSENRABATTEN
};

const SHORT_ROUTE: &[StopDef] = &[PINGISBORDET_NORTH, LUNCHBRYGGAN, BAGEN, DIAGONALEN];

const MEDIUM_ROUTE: &[StopDef] = &[
    PINGISBORDET,
    LUNCHBRYGGAN,
    BAGEN,
    DIAGONALEN,
    MONKEY_BAR,
    HASSELBLADSPARKEN,
    TRAPPAN,
    PIZZERIAN,
    ROSENRABATTEN,
];

const LONG_ROUTE: &[StopDef] = &[
    PINGISBORDET,
    LUNCHBRYGGAN,
    BAGEN,
    DIAGONALEN,
    MONKEY_BAR,
    HASSELBLADSPARKEN,
    TRAPPAN,
    PIZZERIAN,
    ROSENRABATTEN,
    NARGANGEN,
    RONDELLEN,
    RONDELLTRAPPAN,
    ROSENRABATTEN_FINAL,
];

fn build_route(name: &str, duration: DurationChoice, stops: &[StopDef]) -> Route {
    let waypoints = stops
        .iter()
        .zip(1u32..)
        .map(|(stop, id)| {
            let waypoint = Waypoint::new(
                id,
                stop.name,
                Coordinate::new(stop.lat, stop.lng),
                Challenges::new(stop.easy, stop.medium, stop.hard),
            );
            match stop.exercise {
                Some(exercise) => waypoint.with_exercise(exercise),
                None => waypoint,
            }
        })
        .collect();

    Route::from_parts(name, duration, waypoints)
}

/// One route per duration choice.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    short: Route,
    medium: Route,
    long: Route,
}

impl RouteCatalog {
    /// Build a catalog from exactly one route per duration.
    pub fn from_routes(routes: Vec<Route>) -> Result<Self, RouteError> {
        let mut short = None;
        let mut medium = None;
        let mut long = None;

        for route in routes {
            let slot = match route.duration {
                DurationChoice::Short => &mut short,
                DurationChoice::Medium => &mut medium,
                DurationChoice::Long => &mut long,
            };
            if slot.is_some() {
                return Err(RouteError::DuplicateDuration(route.duration));
            }
            *slot = Some(route);
        }

        Ok(Self {
            short: short.ok_or(RouteError::MissingDuration(DurationChoice::Short))?,
            medium: medium.ok_or(RouteError::MissingDuration(DurationChoice::Medium))?,
            long: long.ok_or(RouteError::MissingDuration(DurationChoice::Long))?,
        })
    }

    /// The built-in Lindholmen routes.
    pub fn builtin() -> Self {
        Self {
            short: build_route("Lindholmen kort", DurationChoice::Short, SHORT_ROUTE),
            medium: build_route("Lindholmen mellan", DurationChoice::Medium, MEDIUM_ROUTE),
            long: build_route("Lindholmen lång", DurationChoice::Long, LONG_ROUTE),
        }
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RouteError> {
        let file: CatalogFile =
            toml::from_str(content).map_err(|e| RouteError::ParseError(e.to_string()))?;

        let routes = file
            .routes
            .into_iter()
            .map(CatalogRoute::into_route)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_routes(routes)
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, RouteError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!("Loaded route catalog from {}", path.display());
        Ok(catalog)
    }

    /// Route for a duration choice, with every waypoint unvisited.
    pub fn select(&self, choice: DurationChoice) -> Route {
        let mut route = self.get(choice).clone();
        route.clear_visits();
        tracing::info!(
            "Selected route '{}' ({}, {} waypoints)",
            route.name,
            choice,
            route.len()
        );
        route
    }

    /// Borrow the route for a duration choice.
    pub fn get(&self, choice: DurationChoice) -> &Route {
        match choice {
            DurationChoice::Short => &self.short,
            DurationChoice::Medium => &self.medium,
            DurationChoice::Long => &self.long,
        }
    }

    /// All routes, shortest first.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        DurationChoice::ALL.into_iter().map(|choice| self.get(choice))
    }
}

impl Default for RouteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Select a route from the built-in catalog.
pub fn select_route(choice: DurationChoice) -> Route {
    RouteCatalog::builtin().select(choice)
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    routes: Vec<CatalogRoute>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogRoute {
    name: String,
    duration: DurationChoice,
    waypoints: Vec<CatalogWaypoint>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogWaypoint {
    id: Option<u32>,
    name: String,
    latitude: f64,
    longitude: f64,
    easy: String,
    medium: String,
    hard: String,
    exercise_id: Option<u32>,
}

impl CatalogRoute {
    fn into_route(self) -> Result<Route, RouteError> {
        let waypoints = self
            .waypoints
            .into_iter()
            .zip(1u32..)
            .map(|(wp, position)| {
                let waypoint = Waypoint::new(
                    wp.id.unwrap_or(position),
                    wp.name,
                    Coordinate::new(wp.latitude, wp.longitude),
                    Challenges::new(wp.easy, wp.medium, wp.hard),
                );
                match wp.exercise_id {
                    Some(exercise) => waypoint.with_exercise(exercise),
                    None => waypoint,
                }
            })
            .collect();

        Route::new(self.name, self.duration, waypoints)
    }
}
