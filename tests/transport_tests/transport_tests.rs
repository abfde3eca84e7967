//! Tests for the send strategies
//!
//! These tests verify:
//! - Lazy connect on first send
//! - One write per command (monolithic) / per chunk (chunked)
//! - Write failures disconnect and surface a ConnectionError
//! - The next send after a failure reconnects
//! - CommandWriter glue

use std::io;

use respack::transport::{transport_for, transport_with_encoder};
use respack::{
    Argument, ChunkedTransport, CommandTransport, CommandWriter, Config, Connection,
    ConnectionError, DefaultEncoder, MonolithicTransport, PackedCommand, RespackError,
    SendStrategy,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// How a scripted write should fail
#[derive(Clone)]
enum Failure {
    /// io::Error with only a message
    Message(&'static str),

    /// io::Error carrying an OS errno
    Os(i32),
}

impl Failure {
    fn to_io_error(&self) -> io::Error {
        match self {
            Failure::Message(msg) => io::Error::new(io::ErrorKind::BrokenPipe, *msg),
            Failure::Os(errno) => io::Error::from_raw_os_error(*errno),
        }
    }
}

/// In-memory connection that records every write call
#[derive(Default)]
struct MockConnection {
    connected: bool,
    connects: usize,
    disconnects: usize,
    writes: Vec<Vec<u8>>,
    /// Fail the write with this index (0-based, counted across all sends)
    fail_at: Option<(usize, Failure)>,
    refuse_connect: bool,
    attempts: usize,
}

impl MockConnection {
    fn failing_at(index: usize, failure: Failure) -> Self {
        Self {
            fail_at: Some((index, failure)),
            ..Default::default()
        }
    }

    fn wire(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl Connection for MockConnection {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> io::Result<()> {
        if self.refuse_connect {
            return Err(io::Error::from_raw_os_error(111));
        }
        self.connected = true;
        self.connects += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.disconnects += 1;
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        assert!(self.connected, "write on a closed connection");
        let attempt = self.attempts;
        self.attempts += 1;
        if let Some((index, failure)) = &self.fail_at {
            if *index == attempt {
                return Err(failure.to_io_error());
            }
        }
        self.writes.push(buf.to_vec());
        Ok(())
    }
}

fn set_command(value_size: usize) -> Vec<Argument> {
    vec![
        Argument::from("SET"),
        Argument::from("benchmark"),
        Argument::from(vec![b'a'; value_size]),
    ]
}

// =============================================================================
// Monolithic Send Tests
// =============================================================================

#[test]
fn test_monolithic_connects_lazily_and_writes_once() {
    let transport = MonolithicTransport::new();
    let mut conn = MockConnection::default();

    let packed = transport.pack(&set_command(10_000)).unwrap();
    assert!(!conn.is_connected());

    transport.send(&mut conn, &packed).unwrap();

    assert!(conn.is_connected());
    assert_eq!(conn.connects, 1);
    assert_eq!(conn.writes.len(), 1);
    assert_eq!(conn.writes[0].len(), packed.len());
}

#[test]
fn test_monolithic_does_not_reconnect_when_connected() {
    let transport = MonolithicTransport::new();
    let mut conn = MockConnection::default();

    for _ in 0..3 {
        let packed = transport.pack(&set_command(10)).unwrap();
        transport.send(&mut conn, &packed).unwrap();
    }

    assert_eq!(conn.connects, 1);
    assert_eq!(conn.writes.len(), 3);
}

#[test]
fn test_monolithic_joins_chunked_input() {
    let chunked = ChunkedTransport::with_threshold(16).pack(&set_command(100)).unwrap();
    assert!(chunked.chunk_count() > 1);

    let mut conn = MockConnection::default();
    MonolithicTransport::new().send(&mut conn, &chunked).unwrap();

    assert_eq!(conn.writes.len(), 1);
    assert_eq!(conn.wire(), chunked.to_bytes().to_vec());
}

#[test]
fn test_monolithic_write_failure_disconnects() {
    let transport = MonolithicTransport::new();
    let mut conn = MockConnection::failing_at(0, Failure::Message("Broken pipe"));

    let packed = transport.pack(&set_command(10)).unwrap();
    let err = transport.send(&mut conn, &packed).unwrap_err();

    assert_eq!(err, ConnectionError::new("UNKNOWN", "Broken pipe"));
    assert_eq!(
        err.to_string(),
        "Error UNKNOWN while writing to socket. Broken pipe."
    );
    assert!(!conn.is_connected());
    assert_eq!(conn.disconnects, 1);
}

// =============================================================================
// Chunked Send Tests
// =============================================================================

#[test]
fn test_chunked_writes_one_call_per_chunk() {
    let transport = ChunkedTransport::new();
    let mut conn = MockConnection::default();

    let packed = transport.pack(&set_command(10_000)).unwrap();
    assert_eq!(packed.chunk_count(), 3);

    transport.send(&mut conn, &packed).unwrap();

    assert_eq!(conn.writes.len(), 3);
    assert_eq!(conn.writes[1].len(), 10_000);
    assert_eq!(
        conn.wire(),
        MonolithicTransport::new()
            .pack(&set_command(10_000))
            .unwrap()
            .to_bytes()
            .to_vec()
    );
}

#[test]
fn test_chunked_accepts_single_buffer() {
    let transport = ChunkedTransport::new();
    let mut conn = MockConnection::default();

    let packed = PackedCommand::from(bytes::Bytes::from_static(b"*1\r\n$4\r\nPING\r\n"));
    transport.send(&mut conn, &packed).unwrap();

    assert_eq!(conn.writes, vec![b"*1\r\n$4\r\nPING\r\n".to_vec()]);
}

#[test]
fn test_chunked_failure_aborts_remaining_chunks() {
    let transport = ChunkedTransport::new();
    let mut conn = MockConnection::failing_at(1, Failure::Os(32));

    let packed = transport.pack(&set_command(10_000)).unwrap();
    let err = transport.send(&mut conn, &packed).unwrap_err();

    // first chunk went out, the failing one and the tail did not
    assert_eq!(conn.writes.len(), 1);
    assert_eq!(err.code, "32");
    assert!(!err.message.is_empty());
    assert!(!conn.is_connected());
}

#[test]
fn test_send_after_failure_reconnects() {
    let transport = ChunkedTransport::new();
    let mut conn = MockConnection::failing_at(0, Failure::Message("reset"));
    let packed = transport.pack(&set_command(10)).unwrap();

    assert!(transport.send(&mut conn, &packed).is_err());
    assert!(!conn.is_connected());

    transport.send(&mut conn, &packed).unwrap();
    assert!(conn.is_connected());
    assert_eq!(conn.connects, 2);
    assert_eq!(conn.wire(), packed.to_bytes().to_vec());
}

#[test]
fn test_connect_failure_is_connection_error() {
    let transport = MonolithicTransport::new();
    let mut conn = MockConnection {
        refuse_connect: true,
        ..Default::default()
    };

    let packed = transport.pack(&set_command(10)).unwrap();
    let err = transport.send(&mut conn, &packed).unwrap_err();

    assert_eq!(err.code, "111");
    assert!(!conn.is_connected());
    assert!(conn.writes.is_empty());
}

#[test]
fn test_zero_argument_command_both_strategies() {
    for transport in [
        Box::new(MonolithicTransport::new()) as Box<dyn CommandTransport>,
        Box::new(ChunkedTransport::new()) as Box<dyn CommandTransport>,
    ] {
        let mut conn = MockConnection::default();
        let packed = transport.pack(&[]).unwrap();
        transport.send(&mut conn, &packed).unwrap();
        assert_eq!(conn.wire(), b"*0\r\n".to_vec());
    }
}

// =============================================================================
// Selection Tests
// =============================================================================

#[test]
fn test_transport_for_config() {
    let chunked = transport_for(&Config::default());
    assert_eq!(chunked.strategy(), SendStrategy::Chunked);

    let config = Config::builder().strategy(SendStrategy::Monolithic).build();
    assert_eq!(transport_for(&config).strategy(), SendStrategy::Monolithic);
}

#[test]
fn test_configured_threshold_is_used() {
    let config = Config::builder().chunk_threshold(32).build();
    let transport = transport_with_encoder(&config, DefaultEncoder);

    let packed = transport.pack(&set_command(64)).unwrap();
    assert_eq!(packed.chunk_count(), 3);

    let packed = ChunkedTransport::new().pack(&set_command(64)).unwrap();
    assert_eq!(packed.chunk_count(), 1);
}

// =============================================================================
// CommandWriter Tests
// =============================================================================

#[test]
fn test_writer_reports_bytes_written() {
    let mut writer = CommandWriter::new(MockConnection::default(), Box::new(ChunkedTransport::new()));

    let written = writer.write_command(&set_command(10)).unwrap();

    assert_eq!(written, 45);
    assert!(writer.is_connected());
    assert_eq!(writer.connection().wire().len(), 45);
}

#[test]
fn test_writer_pipeline() {
    let mut writer = CommandWriter::new(MockConnection::default(), Box::new(MonolithicTransport::new()));
    let commands = vec![set_command(10), vec![Argument::from("GET"), Argument::from("benchmark")]];

    writer.write_pipeline(&commands).unwrap();

    let conn = writer.into_inner();
    assert_eq!(conn.writes.len(), 1);
    assert!(conn.wire().ends_with(b"*2\r\n$3\r\nGET\r\n$9\r\nbenchmark\r\n"));
}

#[test]
fn test_writer_surfaces_connection_error() {
    let mut writer = CommandWriter::new(
        MockConnection::failing_at(0, Failure::Message("gone")),
        Box::new(MonolithicTransport::new()),
    );

    let err = writer.write_command(&set_command(10)).unwrap_err();
    match err {
        RespackError::Connection(e) => assert_eq!(e.message, "gone"),
        other => panic!("Expected connection error, got {:?}", other),
    }
    assert!(!writer.is_connected());
}

#[test]
fn test_writer_encode_error_sends_nothing() {
    let mut writer = CommandWriter::new(MockConnection::default(), Box::new(ChunkedTransport::new()));

    let err = writer
        .write_command(&[Argument::from("INCRBYFLOAT"), Argument::from("k"), Argument::from(f64::NAN)])
        .unwrap_err();

    assert!(matches!(err, RespackError::Encode(_)));
    assert!(!writer.is_connected());
    assert!(writer.connection().writes.is_empty());
}
