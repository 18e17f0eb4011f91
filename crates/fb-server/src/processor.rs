//! The command processor: shared dispatch state plus request handling.
//!
//! One `CommandProcessor` is built at startup and shared by every
//! connection handler through an `Arc`.  The road graph and station catalog
//! are immutable after construction and read without locking; the only
//! mutable state is the [`IncidentStore`], which synchronises itself.

use chrono::Local;
use tracing::{debug, warn};

use fb_core::{GeoPoint, NodeId};
use fb_incident::{Incident, IncidentStore, Severity};
use fb_spatial::{DijkstraRouter, RoadGraph, Route, Router, SpatialResult, StationCatalog};

use crate::{Command, CommandError, CommandResult};

/// Shared server state and the request → response mapping.
pub struct CommandProcessor<R: Router = DijkstraRouter> {
    graph:     RoadGraph,
    stations:  StationCatalog,
    incidents: IncidentStore,
    router:    R,
}

impl<R: Router> CommandProcessor<R> {
    /// Assemble the processor.
    ///
    /// # Errors
    ///
    /// `SpatialError::OutOfRange` if a station sits on a vertex the graph
    /// does not have.
    pub fn new(graph: RoadGraph, stations: StationCatalog, router: R) -> SpatialResult<Self> {
        stations.validate(&graph)?;
        Ok(Self {
            graph,
            stations,
            incidents: IncidentStore::new(),
            router,
        })
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn stations(&self) -> &StationCatalog {
        &self.stations
    }

    pub fn incidents(&self) -> &IncidentStore {
        &self.incidents
    }

    /// Answer one request line.  Never fails: errors become `ERROR` lines.
    pub fn process(&self, line: &str) -> String {
        let response = Command::parse(line)
            .and_then(|command| self.execute(command))
            .unwrap_or_else(|e| e.to_response());
        debug!(request = line, response = %response, "handled request");
        response
    }

    /// Run a parsed command against the shared state.
    pub fn execute(&self, command: Command) -> CommandResult<String> {
        match command {
            Command::Route { from, to } => {
                Ok(format!("ROUTE|{}", self.route_between(from, to)?.join_nodes()))
            }
            Command::Dijkstra { from, to } => Ok(format!(
                "DIJKSTRA_RESULT|{}|Path optimized",
                self.route_between(from, to)?.join_nodes()
            )),
            Command::Incident { station, severity, location } => {
                let station  = self.graph.node(station)?;
                let severity = Severity::from_level(severity)?;
                let mut incident = Incident::new(station, severity);
                if let Some(pos) = location {
                    incident = incident.with_location(checked_point(pos)?);
                }
                let id = self.incidents.enqueue(incident);
                Ok(format!("INCIDENT_ADDED|{id}"))
            }
            Command::GetIncidents => Ok(format!("INCIDENTS|{}", self.incidents.total())),
            Command::Pending => Ok(format!("PENDING|{}", self.incidents.size())),
            Command::Dispatch => self.dispatch(),
            Command::Nearest { node } => {
                let node = self.graph.node(node)?;
                let (station, distance) = self
                    .stations
                    .nearest_by_road(&self.graph, &self.router, node)?
                    .ok_or_else(|| no_station_from(node))?;
                Ok(format!("NEAREST|{}|{}|{distance}", station.node, station.name))
            }
            Command::Locate { pos } => {
                let pos = checked_point(pos)?;
                let station = self
                    .stations
                    .nearest_to(pos)
                    .ok_or_else(|| CommandError::Rejected("no stations configured".to_string()))?;
                let metres = station.pos.distance_m(pos).round();
                Ok(format!("LOCATE|{}|{}|{metres}", station.node, station.name))
            }
            Command::Stations => Ok(self.stations_line()),
            Command::Status => Ok(format!(
                "STATUS_RESPONSE|Online|{} stations|System operational",
                self.stations.len()
            )),
            Command::Ping => Ok(format!("PONG|Server alive|{}", Local::now().format("%H:%M:%S"))),
        }
    }

    fn route_between(&self, from: i64, to: i64) -> CommandResult<Route> {
        let (from, to) = (self.graph.node(from)?, self.graph.node(to)?);
        Ok(self.router.route(&self.graph, from, to)?)
    }

    /// Hand the oldest queued incident to the nearest station by road.
    ///
    /// If no reply can be built the incident goes back to the head of the
    /// queue, so a failed DISPATCH leaves the store as it found it.
    fn dispatch(&self) -> CommandResult<String> {
        let incident = self.incidents.dequeue()?;
        match self.assign_station(&incident) {
            Ok(line) => Ok(line),
            Err(e) => {
                warn!(station = %incident.station, error = %e, "dispatch failed, incident requeued");
                self.incidents.requeue_front(incident);
                Err(e)
            }
        }
    }

    /// `DISPATCH|<vertex>|<sev>|<station>|<distance>|<path>[|<metres>]`, the
    /// trailing field being the straight-line distance from the station to
    /// the reported location when the incident carries one.
    fn assign_station(&self, incident: &Incident) -> CommandResult<String> {
        let head = format!("DISPATCH|{}|{}", incident.station, incident.severity.level());

        let Some((station, _)) = self
            .stations
            .nearest_by_road(&self.graph, &self.router, incident.station)?
        else {
            return Ok(format!("{head}|NONE"));
        };
        let route = self.router.route(&self.graph, station.node, incident.station)?;
        let mut line = format!("{head}|{}|{}|{}", station.node, route.distance, route.join_nodes());
        if let Some(pos) = incident.location {
            line.push_str(&format!("|{}", station.pos.distance_m(pos).round()));
        }
        Ok(line)
    }

    /// `STATIONS|<n>|<name>,<lat>,<lon>|...`
    fn stations_line(&self) -> String {
        let mut line = format!("STATIONS|{}", self.stations.len());
        for s in self.stations.iter() {
            line.push_str(&format!("|{},{},{}", s.name, s.pos.lat, s.pos.lon));
        }
        line
    }
}

fn checked_point(pos: GeoPoint) -> CommandResult<GeoPoint> {
    if pos.is_valid() {
        Ok(pos)
    } else {
        Err(CommandError::Malformed(format!("coordinates out of range: {pos}")))
    }
}

fn no_station_from(node: NodeId) -> CommandError {
    CommandError::Rejected(format!("no station reachable from {node}"))
}
