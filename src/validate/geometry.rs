// src/validate/geometry.rs

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, Coord, InteriorPoint, Line, LineString, Polygon};
use geojson::{PolygonType, Position, Value};
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

/// First rule a geometry was found to break.
#[derive(Debug, Clone, PartialEq)]
pub enum Defect {
    /// A position with fewer than two ordinates inside a non-empty geometry.
    ShortPosition,
    NonFinite,
    TooFewPoints,
    RingNotClosed,
    RingTooShort,
    ZeroAreaRing,
    SelfIntersection { at: Coord<f64> },
    RingsCross { at: Coord<f64> },
    HoleOutsideShell,
    NestedHoles,
    /// Rings touch in a way that cuts the polygon interior into pieces.
    DisconnectedInterior { at: Coord<f64> },
    NestedPolygons,
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::ShortPosition => write!(f, "position has fewer than two ordinates"),
            Defect::NonFinite => write!(f, "non-finite coordinate"),
            Defect::TooFewPoints => write!(f, "too few distinct points"),
            Defect::RingNotClosed => write!(f, "ring is not closed"),
            Defect::RingTooShort => write!(f, "ring has fewer than four positions"),
            Defect::ZeroAreaRing => write!(f, "ring encloses no area"),
            Defect::SelfIntersection { at } => {
                write!(f, "self-intersection at ({}, {})", at.x, at.y)
            }
            Defect::RingsCross { at } => write!(f, "rings cross at ({}, {})", at.x, at.y),
            Defect::HoleOutsideShell => write!(f, "hole lies outside shell"),
            Defect::NestedHoles => write!(f, "hole nested inside another hole"),
            Defect::DisconnectedInterior { at } => {
                write!(f, "interior disconnected at ({}, {})", at.x, at.y)
            }
            Defect::NestedPolygons => write!(f, "polygon nested inside another polygon"),
        }
    }
}

/// True when the geometry holds no coordinates at all.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Point(p) => p.len() < 2,
        Value::MultiPoint(points) => points.iter().all(|p| p.len() < 2),
        Value::LineString(line) => line.is_empty(),
        Value::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
        Value::Polygon(rings) => polygon_is_empty(rings),
        Value::MultiPolygon(polys) => polys.iter().all(|p| polygon_is_empty(p)),
        Value::GeometryCollection(geoms) => geoms.iter().all(|g| is_empty(&g.value)),
    }
}

fn polygon_is_empty(rings: &PolygonType) -> bool {
    rings.first().map_or(true, Vec::is_empty)
}

/// Check `value` against the simple-features rules. Empty geometries are valid.
pub fn check(value: &Value) -> Result<(), Defect> {
    if is_empty(value) {
        return Ok(());
    }
    match value {
        Value::Point(p) => to_coord(p).map(|_| ()),
        Value::MultiPoint(points) => points
            .iter()
            .filter(|p| !p.is_empty())
            .try_for_each(|p| to_coord(p).map(|_| ())),
        Value::LineString(line) => check_line(line),
        Value::MultiLineString(lines) => lines
            .iter()
            .filter(|l| !l.is_empty())
            .try_for_each(|l| check_line(l)),
        Value::Polygon(rings) => check_polygon(rings).map(|_| ()),
        Value::MultiPolygon(polys) => check_multi_polygon(polys),
        Value::GeometryCollection(geoms) => geoms.iter().try_for_each(|g| check(&g.value)),
    }
}

fn to_coord(p: &Position) -> Result<Coord<f64>, Defect> {
    if p.len() < 2 {
        return Err(Defect::ShortPosition);
    }
    if !p.iter().all(|v| v.is_finite()) {
        return Err(Defect::NonFinite);
    }
    Ok(Coord { x: p[0], y: p[1] })
}

/// Coordinates with consecutive repeats collapsed.
fn to_coords(positions: &[Position]) -> Result<Vec<Coord<f64>>, Defect> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(positions.len());
    for p in positions {
        let c = to_coord(p)?;
        if out.last() != Some(&c) {
            out.push(c);
        }
    }
    Ok(out)
}

fn check_line(positions: &[Position]) -> Result<(), Defect> {
    if to_coords(positions)?.len() < 2 {
        return Err(Defect::TooFewPoints);
    }
    Ok(())
}

fn check_ring(positions: &[Position]) -> Result<Vec<Coord<f64>>, Defect> {
    if positions.len() < 4 {
        return Err(Defect::RingTooShort);
    }
    let coords = to_coords(positions)?;
    if coords.first() != coords.last() {
        return Err(Defect::RingNotClosed);
    }
    // closed ring repeats its first point, so 3 distinct points means 4 coords
    if coords.len() < 4 {
        return Err(Defect::TooFewPoints);
    }
    check_ring_simple(&coords)?;
    if Polygon::new(LineString::from(coords.clone()), vec![]).unsigned_area() == 0.0 {
        return Err(Defect::ZeroAreaRing);
    }
    Ok(coords)
}

fn edges(ring: &[Coord<f64>]) -> Vec<Line<f64>> {
    ring.windows(2).map(|w| Line::new(w[0], w[1])).collect()
}

fn check_ring_simple(ring: &[Coord<f64>]) -> Result<(), Defect> {
    let edges = edges(ring);
    let n = edges.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            match line_intersection(edges[i], edges[j]) {
                None => {}
                Some(LineIntersection::SinglePoint { intersection, .. }) => {
                    if !adjacent {
                        return Err(Defect::SelfIntersection { at: intersection });
                    }
                }
                Some(LineIntersection::Collinear { intersection }) => {
                    if !adjacent || intersection.start != intersection.end {
                        return Err(Defect::SelfIntersection {
                            at: intersection.start,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Points where two rings touch. Rings may touch at isolated points but never
/// cross or share an edge.
fn ring_touches(a: &[Coord<f64>], b: &[Coord<f64>]) -> Result<Vec<Coord<f64>>, Defect> {
    let mut touches: Vec<Coord<f64>> = Vec::new();
    for ea in edges(a) {
        for eb in edges(b) {
            let at = match line_intersection(ea, eb) {
                None => continue,
                Some(LineIntersection::SinglePoint {
                    intersection,
                    is_proper: true,
                }) => return Err(Defect::RingsCross { at: intersection }),
                Some(LineIntersection::SinglePoint { intersection, .. }) => intersection,
                Some(LineIntersection::Collinear { intersection }) => {
                    if intersection.start != intersection.end {
                        return Err(Defect::RingsCross {
                            at: intersection.start,
                        });
                    }
                    intersection.start
                }
            };
            if !touches.contains(&at) {
                touches.push(at);
            }
        }
    }
    Ok(touches)
}

/// Bipartite graph of rings and the points where they touch. A cycle means
/// the touching rings enclose part of the interior on their own.
struct TouchGraph {
    parent: Vec<usize>,
    points: HashMap<(u64, u64), usize>,
    links: HashSet<(usize, usize)>,
}

impl TouchGraph {
    fn new(rings: usize) -> Self {
        Self {
            parent: (0..rings).collect(),
            points: HashMap::new(),
            links: HashSet::new(),
        }
    }

    fn root(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Link `ring` to the touch point `at`. Returns false when that closes a cycle.
    fn link(&mut self, ring: usize, at: Coord<f64>) -> bool {
        // +0.0 folds -0.0 into the same key
        let key = ((at.x + 0.0).to_bits(), (at.y + 0.0).to_bits());
        let next = self.parent.len();
        let point = *self.points.entry(key).or_insert(next);
        if point == next {
            self.parent.push(next);
        }
        if !self.links.insert((ring, point)) {
            return true;
        }
        let (a, b) = (self.root(ring), self.root(point));
        if a == b {
            return false;
        }
        self.parent[a] = b;
        true
    }
}

fn ring_polygon(ring: &[Coord<f64>]) -> Polygon<f64> {
    Polygon::new(LineString::from(ring.to_vec()), vec![])
}

/// `inner` lies inside `outer`, judged by a point strictly inside `inner`.
///
/// Only meaningful once the two boundaries are known not to cross.
fn inside(outer: &Polygon<f64>, inner: &Polygon<f64>) -> bool {
    inner
        .interior_point()
        .is_some_and(|p| outer.contains(&p))
}

fn check_polygon(rings: &PolygonType) -> Result<Polygon<f64>, Defect> {
    let mut checked = Vec::with_capacity(rings.len());
    for ring in rings {
        checked.push(check_ring(ring)?);
    }
    let Some((shell, holes)) = checked.split_first() else {
        return Err(Defect::TooFewPoints);
    };

    let mut touches: Vec<(usize, usize, Coord<f64>)> = Vec::new();
    for i in 0..checked.len() {
        for j in (i + 1)..checked.len() {
            for at in ring_touches(&checked[i], &checked[j])? {
                touches.push((i, j, at));
            }
        }
    }

    let shell_area = ring_polygon(shell);
    let hole_areas: Vec<Polygon<f64>> = holes.iter().map(|h| ring_polygon(h)).collect();
    for (i, hole) in hole_areas.iter().enumerate() {
        if !inside(&shell_area, hole) {
            return Err(Defect::HoleOutsideShell);
        }
        for other in &hole_areas[i + 1..] {
            if inside(hole, other) || inside(other, hole) {
                return Err(Defect::NestedHoles);
            }
        }
    }

    let mut graph = TouchGraph::new(checked.len());
    for (i, j, at) in touches {
        if !graph.link(i, at) || !graph.link(j, at) {
            return Err(Defect::DisconnectedInterior { at });
        }
    }

    Ok(Polygon::new(
        LineString::from(shell.clone()),
        holes.iter().cloned().map(LineString::from).collect(),
    ))
}

fn check_multi_polygon(polys: &[PolygonType]) -> Result<(), Defect> {
    let mut checked: Vec<Polygon<f64>> = Vec::with_capacity(polys.len());
    for rings in polys.iter().filter(|p| !polygon_is_empty(p)) {
        let poly = check_polygon(rings)?;
        for prev in &checked {
            for ra in std::iter::once(prev.exterior()).chain(prev.interiors()) {
                for rb in std::iter::once(poly.exterior()).chain(poly.interiors()) {
                    ring_touches(&ra.0, &rb.0)?;
                }
            }
            if inside(prev, &poly) || inside(&poly, prev) {
                return Err(Defect::NestedPolygons);
            }
        }
        checked.push(poly);
    }
    Ok(())
}
