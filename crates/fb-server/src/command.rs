//! Request-line grammar.
//!
//! A request is one line of tokens separated by whitespace and/or `|`, so
//! `ROUTE 0 2` and `ROUTE|0|2` are the same request.  Keywords are
//! case-sensitive.  Arguments are checked for shape here (count, numeric
//! syntax); range checks against the road graph happen in the processor.
//!
//! | Request                               | Command                  |
//! |---------------------------------------|--------------------------|
//! | `ROUTE <src> <dest>`                  | [`Command::Route`]       |
//! | `DIJKSTRA <src> <dest>`               | [`Command::Dijkstra`]    |
//! | `INCIDENT <station> <sev> [<lat> <lon>]` | [`Command::Incident`] |
//! | `GET_INCIDENTS`                       | [`Command::GetIncidents`]|
//! | `PENDING`                             | [`Command::Pending`]     |
//! | `DISPATCH`                            | [`Command::Dispatch`]    |
//! | `NEAREST <vertex>`                    | [`Command::Nearest`]     |
//! | `LOCATE <lat> <lon>`                  | [`Command::Locate`]      |
//! | `STATIONS`                            | [`Command::Stations`]    |
//! | `STATUS`                              | [`Command::Status`]      |
//! | `PING`                                | [`Command::Ping`]        |

use std::str::FromStr;

use fb_core::GeoPoint;

use crate::{CommandError, CommandResult};

/// A parsed request.  Vertex ids stay as raw signed integers until the
/// processor validates them against the graph.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Route { from: i64, to: i64 },
    /// Same search as `Route`, answered in the `DIJKSTRA_RESULT` form.
    Dijkstra { from: i64, to: i64 },
    Incident { station: i64, severity: i64, location: Option<GeoPoint> },
    GetIncidents,
    Pending,
    Dispatch,
    Nearest { node: i64 },
    Locate { pos: GeoPoint },
    Stations,
    Status,
    Ping,
}

impl Command {
    /// Parse one request line (already stripped of its line terminator).
    pub fn parse(line: &str) -> CommandResult<Self> {
        let mut tokens = line
            .split(|c: char| c.is_whitespace() || c == '|')
            .filter(|t| !t.is_empty());

        let keyword = tokens.next().ok_or(CommandError::Empty)?;
        let mut args = Args { keyword, tokens };

        let command = match keyword {
            "ROUTE" => Self::Route {
                from: args.required("src")?,
                to:   args.required("dest")?,
            },
            "DIJKSTRA" => Self::Dijkstra {
                from: args.required("src")?,
                to:   args.required("dest")?,
            },
            "INCIDENT" => {
                let station  = args.required("station")?;
                let severity = args.required("severity")?;
                let location = match args.optional::<f32>("lat")? {
                    None => None,
                    Some(lat) => Some(GeoPoint::new(lat, args.required("lon")?)),
                };
                Self::Incident { station, severity, location }
            }
            "GET_INCIDENTS" => Self::GetIncidents,
            "PENDING"       => Self::Pending,
            "DISPATCH"      => Self::Dispatch,
            "NEAREST"       => Self::Nearest { node: args.required("vertex")? },
            "LOCATE" => {
                let lat = args.required::<f32>("lat")?;
                Self::Locate { pos: GeoPoint::new(lat, args.required("lon")?) }
            }
            "STATIONS" => Self::Stations,
            "STATUS"   => Self::Status,
            "PING"     => Self::Ping,
            other      => return Err(CommandError::Unknown(other.to_string())),
        };

        args.finish()?;
        Ok(command)
    }
}

// ── Argument cursor ───────────────────────────────────────────────────────────

struct Args<'a, I: Iterator<Item = &'a str>> {
    keyword: &'a str,
    tokens:  I,
}

impl<'a, I: Iterator<Item = &'a str>> Args<'a, I> {
    fn required<T: FromStr>(&mut self, name: &str) -> CommandResult<T> {
        self.optional(name)?.ok_or_else(|| {
            CommandError::Malformed(format!("{}: missing <{name}>", self.keyword))
        })
    }

    fn optional<T: FromStr>(&mut self, name: &str) -> CommandResult<Option<T>> {
        self.tokens
            .next()
            .map(|raw| {
                raw.parse::<T>().map_err(|_| {
                    CommandError::Malformed(format!("{}: bad <{name}> {raw:?}", self.keyword))
                })
            })
            .transpose()
    }

    fn finish(mut self) -> CommandResult<()> {
        match self.tokens.next() {
            None => Ok(()),
            Some(extra) => Err(CommandError::Malformed(format!(
                "{}: unexpected argument {extra:?}",
                self.keyword
            ))),
        }
    }
}
