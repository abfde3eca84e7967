//! TCP Connection Tests
//!
//! Exercise both strategies over a real loopback socket and check the server
//! side reads back the exact command.

use std::io::BufReader;
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

use bytes::Bytes;
use respack::protocol::read_command;
use respack::{
    Argument, CommandWriter, Config, Connection, SendStrategy, TcpConnection,
};

// =============================================================================
// Helper Functions
// =============================================================================

/// Accept one client and read `count` commands from it
fn spawn_reader(count: usize) -> (String, mpsc::Receiver<Vec<Vec<Bytes>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut commands = Vec::with_capacity(count);
        for _ in 0..count {
            commands.push(read_command(&mut reader).unwrap());
        }
        tx.send(commands).unwrap();
    });

    (addr, rx)
}

fn set_command(value: &[u8]) -> Vec<Argument> {
    vec![
        Argument::from("SET"),
        Argument::from("benchmark"),
        Argument::from(value.to_vec()),
    ]
}

// =============================================================================
// Round Trip Tests
// =============================================================================

fn round_trip(strategy: SendStrategy) {
    let (addr, rx) = spawn_reader(2);
    let config = Config::builder()
        .server_addr(addr)
        .strategy(strategy)
        .write_timeout_ms(5000)
        .build();

    let mut writer = CommandWriter::from_config(&config).unwrap();
    assert!(!writer.is_connected());

    let large = vec![b'x'; 250_000];
    writer.write_command(&set_command(&large)).unwrap();
    writer
        .write_command(&[Argument::from("GET"), Argument::from("benchmark")])
        .unwrap();
    assert!(writer.is_connected());

    let commands = rx.recv().unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0][0], "SET");
    assert_eq!(commands[0][2].len(), large.len());
    assert_eq!(&commands[0][2][..], &large[..]);
    assert_eq!(commands[1], vec![Bytes::from_static(b"GET"), Bytes::from_static(b"benchmark")]);
}

#[test]
fn test_monolithic_over_tcp() {
    round_trip(SendStrategy::Monolithic);
}

#[test]
fn test_chunked_over_tcp() {
    round_trip(SendStrategy::Chunked);
}

#[test]
fn test_pipeline_over_tcp() {
    let (addr, rx) = spawn_reader(3);
    let config = Config::builder().server_addr(addr).build();
    let mut writer = CommandWriter::from_config(&config).unwrap();

    let commands = vec![
        vec![Argument::from("PING")],
        set_command(&[b'y'; 7000]),
        vec![Argument::from("DEL"), Argument::from("benchmark")],
    ];
    writer.write_pipeline(&commands).unwrap();

    let received = rx.recv().unwrap();
    assert_eq!(received[0], vec![Bytes::from_static(b"PING")]);
    assert_eq!(received[1][2].len(), 7000);
    assert_eq!(received[2][0], "DEL");
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_connect_and_disconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let mut conn = TcpConnection::new(addr.to_string());
    assert!(!conn.is_connected());

    conn.connect().unwrap();
    assert!(conn.is_connected());
    assert_eq!(conn.peer_addr(), Some(addr));

    conn.disconnect();
    assert!(!conn.is_connected());
    // second disconnect is a no-op
    conn.disconnect();
    assert!(!conn.is_connected());
}

#[test]
fn test_write_without_connect_fails() {
    let mut conn = TcpConnection::new("127.0.0.1:1");
    let err = conn.write_all(b"*0\r\n").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotConnected);
}

#[test]
fn test_refused_connect_surfaces_connection_error() {
    // grab a free port, then close it so nothing is listening
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let config = Config::builder()
        .server_addr(addr)
        .connect_timeout_ms(1000)
        .build();
    let mut writer = CommandWriter::from_config(&config).unwrap();

    let err = writer.write_command(&[Argument::from("PING")]).unwrap_err();
    assert!(matches!(err, respack::RespackError::Connection(_)));
    assert!(!writer.is_connected());
}

#[test]
fn test_reconnects_after_peer_goes_away() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let mut conn = TcpConnection::new(addr);
    conn.connect().unwrap();
    let (server_side, _) = listener.accept().unwrap();
    drop(server_side);

    // forced drop, then a fresh connect to the same listener
    conn.disconnect();
    conn.connect().unwrap();
    let (_again, _) = listener.accept().unwrap();
    assert!(conn.is_connected());
}
