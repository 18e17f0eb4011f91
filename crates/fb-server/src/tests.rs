//! Unit and end-to-end tests for fb-server.

#[cfg(test)]
mod helpers {
    use fb_core::{GeoPoint, NodeId};
    use fb_spatial::{DijkstraRouter, RoadGraphBuilder, Station, StationCatalog};

    use crate::{seed, CommandProcessor};

    /// Processor over the built-in 20-vertex city grid.
    pub fn city() -> CommandProcessor {
        CommandProcessor::new(seed::city_graph().unwrap(), seed::city_stations(), DijkstraRouter)
            .unwrap()
    }

    /// Processor over a six-vertex graph where 0→2 has two candidate paths
    /// (11 via 1, 12 via 1→4) and vertex 5 is cut off.
    pub fn small() -> CommandProcessor {
        let mut b = RoadGraphBuilder::new(6);
        for (u, v, w) in [(0, 1, 5), (1, 2, 6), (1, 4, 4), (4, 2, 3), (3, 0, 7)] {
            b.add_road(NodeId(u), NodeId(v), w).unwrap();
        }
        let stations = StationCatalog::new(vec![Station::new(
            NodeId(3),
            "Faizabad",
            GeoPoint::new(33.66, 73.08),
        )]);
        CommandProcessor::new(b.build(), stations, DijkstraRouter).unwrap()
    }
}

// ── Request grammar ───────────────────────────────────────────────────────────

#[cfg(test)]
mod command {
    use fb_core::GeoPoint;

    use crate::{Command, CommandError};

    #[test]
    fn whitespace_and_pipe_delimiters() {
        let want = Command::Route { from: 0, to: 2 };
        assert_eq!(Command::parse("ROUTE 0 2").unwrap(), want);
        assert_eq!(Command::parse("ROUTE|0|2").unwrap(), want);
        assert_eq!(Command::parse("  ROUTE\t0 |2 ").unwrap(), want);
        assert_eq!(
            Command::parse("DIJKSTRA|0|2").unwrap(),
            Command::Dijkstra { from: 0, to: 2 }
        );
    }

    #[test]
    fn incident_with_and_without_location() {
        assert_eq!(
            Command::parse("INCIDENT 7 2").unwrap(),
            Command::Incident { station: 7, severity: 2, location: None }
        );
        assert_eq!(
            Command::parse("INCIDENT|3|3|33.6844|73.0479").unwrap(),
            Command::Incident {
                station:  3,
                severity: 3,
                location: Some(GeoPoint::new(33.6844, 73.0479)),
            }
        );
    }

    #[test]
    fn bare_keywords() {
        assert_eq!(Command::parse("GET_INCIDENTS").unwrap(), Command::GetIncidents);
        assert_eq!(Command::parse("STATIONS").unwrap(), Command::Stations);
        assert_eq!(Command::parse("STATUS").unwrap(), Command::Status);
        assert_eq!(Command::parse("PING").unwrap(), Command::Ping);
        assert_eq!(Command::parse("PENDING").unwrap(), Command::Pending);
        assert_eq!(Command::parse("DISPATCH").unwrap(), Command::Dispatch);
    }

    #[test]
    fn negative_ids_parse_for_range_check_later() {
        assert_eq!(Command::parse("NEAREST -1").unwrap(), Command::Nearest { node: -1 });
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert!(matches!(Command::parse("route 0 2"), Err(CommandError::Unknown(k)) if k == "route"));
    }

    #[test]
    fn empty_line() {
        assert!(matches!(Command::parse(""), Err(CommandError::Empty)));
        assert!(matches!(Command::parse(" | "), Err(CommandError::Empty)));
    }

    #[test]
    fn malformed_arguments() {
        for line in [
            "ROUTE",
            "ROUTE 0",
            "ROUTE 0 x",
            "ROUTE 0 2 9",
            "INCIDENT 7",
            "INCIDENT 7 2 33.7",
            "INCIDENT 7 2 north south",
            "LOCATE 33.7",
            "PING now",
            "NEAREST 1.5",
        ] {
            assert!(
                matches!(Command::parse(line), Err(CommandError::Malformed(_))),
                "{line:?} should be malformed"
            );
        }
    }

    #[test]
    fn error_rendering() {
        assert_eq!(CommandError::Empty.to_response(), "ERROR");
        assert_eq!(CommandError::Unknown("FOO".into()).to_response(), "ERROR");
        let e = Command::parse("ROUTE 0").unwrap_err();
        assert_eq!(e.to_response(), "ERROR|ROUTE: missing <dest>");
    }
}

// ── Processor ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod processor {
    use fb_core::{IncidentId, NodeId};
    use fb_incident::Severity;

    #[test]
    fn route_prefers_true_minimum() {
        let p = super::helpers::small();
        assert_eq!(p.process("ROUTE 0 2"), "ROUTE|0,1,2");
        assert_eq!(p.process("ROUTE 3 4"), "ROUTE|3,0,1,4");
    }

    #[test]
    fn route_to_self() {
        let p = super::helpers::small();
        assert_eq!(p.process("ROUTE 0 0"), "ROUTE|0");
    }

    #[test]
    fn route_on_city_grid() {
        let p = super::helpers::city();
        assert_eq!(p.process("ROUTE 0 9"), "ROUTE|0,2,5,7,8,9");
        assert_eq!(p.process("ROUTE 15 14"), "ROUTE|15,18,19,14");
    }

    #[test]
    fn dijkstra_reply_form() {
        let p = super::helpers::city();
        assert_eq!(p.process("DIJKSTRA|15|14"), "DIJKSTRA_RESULT|15,18,19,14|Path optimized");
        assert_eq!(p.process("DIJKSTRA 3 3"), "DIJKSTRA_RESULT|3|Path optimized");
        assert_eq!(
            p.process("DIJKSTRA 0 20"),
            "ERROR|node 20 out of range (graph has 20 vertices)"
        );
    }

    #[test]
    fn status_reports_station_count() {
        let p = super::helpers::city();
        assert_eq!(p.process("STATUS"), "STATUS_RESPONSE|Online|5 stations|System operational");
        assert_eq!(p.process("STATUS now"), "ERROR|STATUS: unexpected argument \"now\"");
    }

    #[test]
    fn route_unreachable_is_an_error_not_a_fake_edge() {
        let p = super::helpers::small();
        assert_eq!(p.process("ROUTE 0 5"), "ERROR|no route from 0 to 5");
    }

    #[test]
    fn route_out_of_range() {
        let p = super::helpers::small();
        assert_eq!(
            p.process("ROUTE 0 6"),
            "ERROR|node 6 out of range (graph has 6 vertices)"
        );
        assert_eq!(
            p.process("ROUTE -1 2"),
            "ERROR|node -1 out of range (graph has 6 vertices)"
        );
    }

    #[test]
    fn incident_counter_sequence() {
        let p = super::helpers::city();
        assert_eq!(p.process("INCIDENT 7 2"), "INCIDENT_ADDED|1");
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|1");
        assert_eq!(p.process("INCIDENT 3 1"), "INCIDENT_ADDED|2");
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|2");
        assert_eq!(p.process("PENDING"), "PENDING|2");

        let head = p.incidents().dequeue().unwrap();
        assert_eq!((head.station, head.severity, head.id), (NodeId(7), Severity::Medium, IncidentId(1)));
    }

    #[test]
    fn incident_location_is_kept() {
        let p = super::helpers::city();
        assert_eq!(p.process("INCIDENT|2|3|33.7100|73.0800"), "INCIDENT_ADDED|1");
        let loc = p.incidents().dequeue().unwrap().location.unwrap();
        assert_eq!((loc.lat, loc.lon), (33.71, 73.08));
    }

    #[test]
    fn rejected_incidents_leave_state_unchanged() {
        let p = super::helpers::city();
        assert_eq!(p.process("INCIDENT 25 2"), "ERROR|node 25 out of range (graph has 20 vertices)");
        assert_eq!(
            p.process("INCIDENT 7 4"),
            "ERROR|invalid severity 4 (expected 1=low, 2=medium, 3=critical)"
        );
        assert!(p.process("INCIDENT 7 2 95.0 73.0").starts_with("ERROR|coordinates out of range"));
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|0");
        assert!(p.incidents().is_empty());
    }

    #[test]
    fn unknown_command_is_bare_error_without_side_effects() {
        let p = super::helpers::city();
        p.process("INCIDENT 1 1");
        assert_eq!(p.process("FOO"), "ERROR");
        assert_eq!(p.process(""), "ERROR");
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|1");
        assert_eq!(p.process("PENDING"), "PENDING|1");
    }

    #[test]
    fn stations_catalog_line() {
        let p = super::helpers::city();
        assert_eq!(
            p.process("STATIONS"),
            "STATIONS|5|Downtown,33.7414,74.3569|Airport,33.5651,74.2165|\
             Margalla,33.8186,74.3289|BlueArea,33.7738,74.5175|Rawalpindi,33.5895,74.3055"
        );
    }

    #[test]
    fn ping_reports_wall_clock() {
        let p = super::helpers::city();
        let resp = p.process("PING");
        let time = resp.strip_prefix("PONG|Server alive|").expect(&resp);
        let parts: Vec<&str> = time.split(':').collect();
        assert_eq!(parts.len(), 3, "{time}");
        for (part, max) in parts.iter().zip([23u32, 59, 60]) {
            assert_eq!(part.len(), 2, "{time}");
            assert!(part.parse::<u32>().unwrap() <= max, "{time}");
        }
    }

    #[test]
    fn nearest_station_by_road() {
        let p = super::helpers::city();
        assert_eq!(p.process("NEAREST 7"), "NEAREST|1|BlueArea|17");
        assert_eq!(p.process("NEAREST 14"), "NEAREST|4|Airport|21");
        assert_eq!(p.process("NEAREST 15"), "NEAREST|15|Rawalpindi|0");
    }

    #[test]
    fn nearest_station_cut_off() {
        let p = super::helpers::small();
        assert_eq!(p.process("NEAREST 5"), "ERROR|no station reachable from 5");
    }

    #[test]
    fn locate_snaps_to_station() {
        let p = super::helpers::city();
        assert_eq!(p.process("LOCATE 33.7414 74.3569"), "LOCATE|0|Downtown|0");
        let resp = p.process("LOCATE|33.57|74.22");
        assert!(resp.starts_with("LOCATE|4|Airport|"), "{resp}");
        assert!(p.process("LOCATE 33.7 200").starts_with("ERROR|coordinates out of range"));
    }

    #[test]
    fn dispatch_pops_oldest_and_routes_from_nearest_station() {
        let p = super::helpers::city();
        p.process("INCIDENT 7 2");
        p.process("INCIDENT 14 3");

        assert_eq!(p.process("DISPATCH"), "DISPATCH|7|2|1|17|1,2,5,7");
        assert_eq!(p.process("DISPATCH"), "DISPATCH|14|3|4|21|4,13,14");
        assert_eq!(p.process("DISPATCH"), "ERROR|no incidents queued");

        // The report counter is not a queue length.
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|2");
        assert_eq!(p.process("PENDING"), "PENDING|0");
    }

    #[test]
    fn dispatch_reports_distance_to_reported_location() {
        let p = super::helpers::city();
        // Reported right at BlueArea's doorstep.
        p.process("INCIDENT|7|2|33.7738|74.5175");
        assert_eq!(p.process("DISPATCH"), "DISPATCH|7|2|1|17|1,2,5,7|0");

        p.process("INCIDENT|14|3|33.5651|74.2265");
        let resp = p.process("DISPATCH");
        let metres = resp.strip_prefix("DISPATCH|14|3|4|21|4,13,14|").expect(&resp);
        // 0.01 degrees of longitude at 33.57 N is roughly 927 m.
        let metres: f32 = metres.parse().unwrap();
        assert!((900.0..960.0).contains(&metres), "{resp}");
    }

    #[test]
    fn dispatch_without_reachable_station() {
        let p = super::helpers::small();
        p.process("INCIDENT 5 1");
        assert_eq!(p.process("DISPATCH"), "DISPATCH|5|1|NONE");
    }

    #[test]
    fn failed_dispatch_keeps_incident_at_head() {
        use fb_spatial::{DijkstraRouter, RoadGraph, Route, Router, SpatialError, SpatialResult};

        use crate::{seed, CommandProcessor};

        /// Finds stations like Dijkstra but can never produce a path.
        struct NoPaths;

        impl Router for NoPaths {
            fn route(&self, _graph: &RoadGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
                Err(SpatialError::Unreachable { from, to })
            }

            fn distances(&self, graph: &RoadGraph, from: NodeId) -> SpatialResult<Vec<Option<u64>>> {
                DijkstraRouter.distances(graph, from)
            }
        }

        let p = CommandProcessor::new(seed::city_graph().unwrap(), seed::city_stations(), NoPaths).unwrap();
        p.process("INCIDENT 1 2");
        p.process("INCIDENT 7 3");

        assert_eq!(p.process("DISPATCH"), "ERROR|no route from 1 to 1");
        assert_eq!(p.process("PENDING"), "PENDING|2");
        assert_eq!(p.process("GET_INCIDENTS"), "INCIDENTS|2");

        let head = p.incidents().dequeue().unwrap();
        assert_eq!((head.station, head.id), (NodeId(1), IncidentId(1)));
    }

    #[test]
    fn misplaced_station_rejected_at_startup() {
        use fb_core::GeoPoint;
        use fb_spatial::{DijkstraRouter, RoadGraphBuilder, SpatialError, Station, StationCatalog};

        use crate::CommandProcessor;

        let stations = StationCatalog::new(vec![Station::new(NodeId(9), "Far", GeoPoint::new(0.0, 0.0))]);
        let result = CommandProcessor::new(RoadGraphBuilder::new(3).build(), stations, DijkstraRouter);
        assert!(matches!(result, Err(SpatialError::OutOfRange { node: 9, vertex_count: 3 })));
    }

    #[test]
    fn seeded_city_shape() {
        let p = super::helpers::city();
        assert_eq!(p.graph().vertex_count(), 20);
        assert_eq!(p.graph().road_count(), 33);
        assert_eq!(p.stations().len(), 5);
    }
}

// ── Line framing ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod framing {
    use std::io::Cursor;

    use crate::serve_lines;

    fn run(input: &[u8], max_line_bytes: usize) -> String {
        let p = super::helpers::small();
        let mut out = Vec::new();
        serve_lines(Cursor::new(input.to_vec()), &mut out, &p, max_line_bytes).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn one_response_per_line() {
        let out = run(b"ROUTE 0 2\nROUTE 0 0\nFOO\n", 1024);
        assert_eq!(out, "ROUTE|0,1,2\nROUTE|0\nERROR\n");
    }

    #[test]
    fn crlf_is_stripped() {
        let out = run(b"ROUTE 0 2\r\nGET_INCIDENTS\r\n", 1024);
        assert_eq!(out, "ROUTE|0,1,2\nINCIDENTS|0\n");
    }

    #[test]
    fn unterminated_last_request_is_served() {
        assert_eq!(run(b"ROUTE 0 2", 1024), "ROUTE|0,1,2\n");
    }

    #[test]
    fn no_input_no_output() {
        assert_eq!(run(b"", 1024), "");
    }

    #[test]
    fn blank_line_gets_error() {
        assert_eq!(run(b"\n", 1024), "ERROR\n");
    }

    #[test]
    fn invalid_utf8_is_not_fatal() {
        let out = run(b"ROUTE \xff 2\nROUTE 0 0\n", 1024);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ERROR|ROUTE: bad <src>"), "{}", lines[0]);
        assert_eq!(lines[1], "ROUTE|0");
    }

    #[test]
    fn oversize_request_is_skipped() {
        let out = run(b"ROUTE 0 2\nROUTE 0000000000000000000000000000 2\nROUTE 0 0\n", 16);
        assert_eq!(out, "ROUTE|0,1,2\nERROR|request too long\nROUTE|0\n");
    }

    #[test]
    fn oversize_tail_without_newline() {
        let out = run(b"ROUTE 0 0\nXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX", 16);
        assert_eq!(out, "ROUTE|0\nERROR|request too long\n");
    }

    #[test]
    fn request_at_exact_limit_is_accepted() {
        // "ROUTE 0 2" is 9 bytes.
        assert_eq!(run(b"ROUTE 0 2\r\n", 9), "ROUTE|0,1,2\n");
        assert_eq!(run(b"ROUTE 0 20\n", 9), "ERROR|request too long\n");
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use std::io::Write;
    use std::time::Duration;

    use crate::{ServerConfig, ServerError};

    #[test]
    fn empty_file_gives_defaults() {
        let c = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(c, ServerConfig::default());
        assert_eq!(c.listen.addr(), "127.0.0.1:5000");
        assert_eq!(c.listen.idle_timeout(), None);
        assert_eq!(c.listen.max_line_bytes, 1024);
        assert_eq!(c.network.build_graph().unwrap().vertex_count(), 20);
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let c = ServerConfig::from_toml_str("[listen]\nport = 6001\nidle_timeout_secs = 30\n").unwrap();
        assert_eq!(c.listen.addr(), "127.0.0.1:6001");
        assert_eq!(c.listen.idle_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(c.network.vertex_count, 20);
    }

    #[test]
    fn bad_values_rejected() {
        assert!(matches!(
            ServerConfig::from_toml_str("[listen]\nport = \"high\"\n"),
            Err(ServerError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_toml_str("[listen]\nmax_line_bytes = 0\n"),
            Err(ServerError::Config(_))
        ));
    }

    #[test]
    fn resized_network_needs_csv() {
        let c = ServerConfig::from_toml_str("[network]\nvertex_count = 6\n").unwrap();
        assert!(matches!(c.network.build_graph(), Err(ServerError::Config(_))));
    }

    #[test]
    fn load_from_file_with_roads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let roads = dir.path().join("roads.csv");
        std::fs::write(&roads, "from,to,weight\n0,1,5\n1,2,6\n1,4,4\n4,2,3\n").unwrap();

        let config_path = dir.path().join("fb.toml");
        let mut f = std::fs::File::create(&config_path).unwrap();
        writeln!(f, "[listen]\nport = 0\n\n[network]\nvertex_count = 5\nroads_csv = {:?}", roads).unwrap();
        drop(f);

        let c = ServerConfig::load(&config_path).unwrap();
        let g = c.network.build_graph().unwrap();
        assert_eq!((g.vertex_count(), g.road_count()), (5, 4));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ServerConfig::load(&dir.path().join("nope.toml")),
            Err(ServerError::Io(_))
        ));
    }
}

// ── TCP end-to-end ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tcp {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpStream};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use crate::{ConnectionOptions, ConnectionServer, ServerHandle};

    fn start(options: ConnectionOptions) -> (ServerHandle, thread::JoinHandle<crate::ServerResult<()>>) {
        let processor = Arc::new(super::helpers::city());
        ConnectionServer::bind("127.0.0.1:0", processor, options)
            .unwrap()
            .spawn()
            .unwrap()
    }

    struct Client {
        reader: BufReader<TcpStream>,
        writer: TcpStream,
    }

    impl Client {
        fn connect(addr: SocketAddr) -> Self {
            let stream = TcpStream::connect(addr).unwrap();
            stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
            Self {
                reader: BufReader::new(stream.try_clone().unwrap()),
                writer: stream,
            }
        }

        fn ask(&mut self, request: &str) -> String {
            self.writer.write_all(format!("{request}\n").as_bytes()).unwrap();
            self.read_line()
        }

        fn read_line(&mut self) -> String {
            let mut line = String::new();
            self.reader.read_line(&mut line).unwrap();
            line
        }
    }

    #[test]
    fn single_client_session() {
        let (handle, join) = start(ConnectionOptions::default());
        let mut c = Client::connect(handle.local_addr());

        assert_eq!(c.ask("ROUTE 0 0"), "ROUTE|0\n");
        assert_eq!(c.ask("INCIDENT 7 2"), "INCIDENT_ADDED|1\n");
        assert_eq!(c.ask("GET_INCIDENTS"), "INCIDENTS|1\n");
        assert_eq!(c.ask("INCIDENT 3 1"), "INCIDENT_ADDED|2\n");
        assert_eq!(c.ask("GET_INCIDENTS"), "INCIDENTS|2\n");
        assert_eq!(c.ask("FOO"), "ERROR\n");
        assert!(c.ask("PING").starts_with("PONG|Server alive|"));

        handle.shutdown();
        join.join().unwrap().unwrap();
    }

    #[test]
    fn concurrent_clients_share_incident_state() {
        const CLIENTS: usize = 8;
        const REPORTS: usize = 25;

        let (handle, join) = start(ConnectionOptions::default());
        let addr = handle.local_addr();

        let workers: Vec<_> = (0..CLIENTS)
            .map(|i| {
                thread::spawn(move || {
                    let mut c = Client::connect(addr);
                    for _ in 0..REPORTS {
                        let resp = c.ask(&format!("INCIDENT|{}|3", i % 20));
                        assert!(resp.starts_with("INCIDENT_ADDED|"), "{resp}");
                        assert_eq!(c.ask("ROUTE 0 2"), "ROUTE|0,2\n");
                    }
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        let mut c = Client::connect(addr);
        assert_eq!(c.ask("GET_INCIDENTS"), format!("INCIDENTS|{}\n", CLIENTS * REPORTS));
        assert_eq!(c.ask("PENDING"), format!("PENDING|{}\n", CLIENTS * REPORTS));

        handle.shutdown();
        join.join().unwrap().unwrap();
    }

    #[test]
    fn broken_client_does_not_affect_others() {
        let (handle, join) = start(ConnectionOptions::default());
        let addr = handle.local_addr();

        let mut steady = Client::connect(addr);
        assert_eq!(steady.ask("INCIDENT 1 1"), "INCIDENT_ADDED|1\n");

        // Send half a request and hang up.
        {
            let mut rude = TcpStream::connect(addr).unwrap();
            rude.write_all(b"INCIDENT 2").unwrap();
        }

        assert_eq!(steady.ask("ROUTE 0 0"), "ROUTE|0\n");
        let total = steady.ask("GET_INCIDENTS");
        // The truncated "INCIDENT 2" is malformed and must not count.
        assert_eq!(total, "INCIDENTS|1\n");

        handle.shutdown();
        join.join().unwrap().unwrap();
    }

    #[test]
    fn oversize_request_is_rejected_and_connection_survives() {
        let options = ConnectionOptions { max_line_bytes: 32, ..ConnectionOptions::default() };
        let (handle, join) = start(options);

        let mut c = Client::connect(handle.local_addr());
        assert_eq!(c.ask(&"X".repeat(10_000)), "ERROR|request too long\n");
        assert_eq!(c.ask("ROUTE 0 0"), "ROUTE|0\n");

        handle.shutdown();
        join.join().unwrap().unwrap();
    }

    #[test]
    fn idle_connections_time_out() {
        let options = ConnectionOptions {
            idle_timeout: Some(Duration::from_millis(100)),
            ..ConnectionOptions::default()
        };
        let (handle, join) = start(options);

        let mut idle = Client::connect(handle.local_addr());
        assert_eq!(idle.ask("ROUTE 0 0"), "ROUTE|0\n");
        thread::sleep(Duration::from_millis(400));
        assert_eq!(idle.read_line(), "", "server should have closed the idle connection");

        handle.shutdown();
        join.join().unwrap().unwrap();
    }

    #[test]
    fn shutdown_is_idempotent() {
        let (handle, join) = start(ConnectionOptions::default());
        handle.shutdown();
        handle.shutdown();
        join.join().unwrap().unwrap();
        assert!(TcpStream::connect(handle.local_addr()).is_err());
    }
}
