// sync-demo — scripted multi-peer session over the loopback transport.
//
// Wires one sharer and N-1 joiners through a `LoopbackHub`, starts a fresh
// grid, plays a round of clicks from every peer, and reports whether all
// grids converged. Useful for eyeballing the protocol traffic: run with
// `RUST_LOG=debug` to see every tube and message decision.
//
// Usage:
//   sync-demo [OPTIONS]
//     --peers <N>    Number of peers, 2..=4 (default: 2)
//     --clicks <N>   Clicks per peer (default: 6)
//     --seed <N>     RNG seed for the fresh grid and the clicks (default: 42)

use std::sync::mpsc::Receiver;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reflection_game::{GRID_COLS, GRID_ROWS, GameState};
use reflection_protocol::types::Orientation;
use reflection_session::loopback::{LoopbackHub, LoopbackTransport};
use reflection_session::{MAX_PARTICIPANTS, Session, SessionEvent};

struct DemoConfig {
    peers: usize,
    clicks: usize,
    seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            peers: 2,
            clicks: 6,
            seed: 42,
        }
    }
}

struct Peer {
    session: Session<LoopbackTransport>,
    events: Receiver<SessionEvent>,
}

impl Peer {
    fn pump(&mut self) {
        self.session.drain(&self.events);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();
    let mut rng = StdRng::seed_from_u64(config.seed);

    let hub = LoopbackHub::new();
    let mut peers: Vec<Peer> = (0..config.peers)
        .map(|_| {
            let (transport, events) = match hub.register_peer() {
                Ok(pair) => pair,
                Err(e) => {
                    eprintln!("Failed to register peer: {e}");
                    std::process::exit(1);
                }
            };
            Peer {
                session: Session::new(GameState::new(Orientation::Horizontal), Some(transport)),
                events,
            }
        })
        .collect();

    // Peer 0 shares; everyone else joins and catches up via enumeration.
    peers[0].session.handle_event(SessionEvent::Shared);
    pump_all(&mut peers);
    for peer in peers.iter_mut().skip(1) {
        peer.session.handle_event(SessionEvent::Joined);
    }
    pump_all(&mut peers);

    // A fresh vertical grid from the sharer re-syncs everyone.
    peers[0]
        .session
        .start_new_game_with_rng(Orientation::Vertical, &mut rng);
    pump_all(&mut peers);

    // Every peer plays some clicks, interleaved.
    let dot_count = GRID_COLS * GRID_ROWS;
    for _ in 0..config.clicks {
        for i in 0..peers.len() {
            let dot = rng.random_range(0..dot_count);
            if let Err(e) = peers[i].session.local_dot_click(dot) {
                eprintln!("click failed: {e}");
            }
            pump_all(&mut peers);
        }
    }

    for (i, peer) in peers.iter().enumerate() {
        let (dots, orientation) = peer.session.game().save();
        println!(
            "peer {i}: {orientation}, {} dots, solved={}",
            dots.len(),
            peer.session.game().is_solved()
        );
    }

    let reference = peers[0].session.game().save();
    let converged = peers.iter().all(|p| p.session.game().save() == reference);
    println!(
        "{} peers, {} clicks each: {}",
        config.peers,
        config.clicks,
        if converged { "in sync" } else { "DIVERGED" }
    );
    if !converged {
        std::process::exit(1);
    }
}

fn pump_all(peers: &mut [Peer]) {
    for peer in peers.iter_mut() {
        peer.pump();
    }
}

/// Parse command-line arguments. Simple `std::env::args()` matching — no
/// clap dependency for a demo binary.
fn parse_args() -> DemoConfig {
    let mut config = DemoConfig::default();
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--peers" => {
                i += 1;
                config.peers = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--peers requires a number in 2..={MAX_PARTICIPANTS}");
                    std::process::exit(1);
                });
                if config.peers < 2 || config.peers > MAX_PARTICIPANTS {
                    eprintln!("--peers must be in 2..={MAX_PARTICIPANTS}");
                    std::process::exit(1);
                }
            }
            "--clicks" => {
                i += 1;
                config.clicks = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--clicks requires a valid number");
                    std::process::exit(1);
                });
            }
            "--seed" => {
                i += 1;
                config.seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--seed requires a valid number");
                    std::process::exit(1);
                });
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    config
}

fn print_usage() {
    println!("Usage: sync-demo [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --peers <N>    Number of peers, 2..={MAX_PARTICIPANTS} (default: 2)");
    println!("  --clicks <N>   Clicks per peer (default: 6)");
    println!("  --seed <N>     RNG seed (default: 42)");
    println!("  --help, -h     Show this help");
}
