// End-to-end synchronization scenarios.
//
// Each test wires real sessions through a loopback hub and drives them the
// way the host shell would. Assertions are about observable game state —
// grids converging, malformed traffic changing nothing — not about
// internals.

use rand::SeedableRng;
use rand::rngs::StdRng;

use reflection_game::{GRID_COLS, GRID_ROWS};
use reflection_protocol::types::Orientation;
use reflection_protocol::wire::{encode_dot_click, encode_new_game};
use reflection_session::loopback::LoopbackHub;
use reflection_session::{Phase, SessionEvent};
use sync_tests::{TestPeer, assert_converged, pump_all};

#[test]
fn sharer_new_game_resyncs_joiner() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);
    sharer.share();
    let mut joiner = TestPeer::new(&hub);
    joiner.join();

    let mut rng = StdRng::seed_from_u64(11);
    sharer
        .session
        .start_new_game_with_rng(Orientation::Bilateral, &mut rng);
    joiner.pump();

    assert_eq!(joiner.snapshot(), sharer.snapshot());
    assert_eq!(
        joiner.session.game().orientation(),
        Orientation::Bilateral
    );
}

#[test]
fn clicks_propagate_both_directions() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);
    sharer.share();
    let mut joiner = TestPeer::new(&hub);
    joiner.join();

    sharer.session.local_dot_click(3).unwrap();
    joiner.pump();
    joiner.session.local_dot_click(90).unwrap();
    sharer.pump();

    assert_eq!(sharer.snapshot(), joiner.snapshot());
    assert_eq!(sharer.session.game().dots()[3], 1);
    assert_eq!(sharer.session.game().dots()[90], 1);
}

#[test]
fn new_game_wire_line_overwrites_local_grid() {
    let hub = LoopbackHub::new();
    let mut peer = TestPeer::new(&hub);

    let wire = encode_new_game(&[0, 1, 2, 3], Orientation::Vertical);
    peer.session
        .handle_event(SessionEvent::Message(wire));

    let (dots, orientation) = peer.snapshot();
    assert_eq!(dots, vec![0, 1, 2, 3]);
    assert_eq!(orientation, Orientation::Vertical);
}

#[test]
fn dot_clicks_on_distinct_dots_commute() {
    let hub = LoopbackHub::new();
    let mut forward = TestPeer::new(&hub);
    let mut reverse = TestPeer::new(&hub);

    let a = encode_dot_click(4, 2);
    let b = encode_dot_click(17, 3);

    forward.session.on_message_received(&a);
    forward.session.on_message_received(&b);
    reverse.session.on_message_received(&b);
    reverse.session.on_message_received(&a);

    assert_eq!(forward.snapshot(), reverse.snapshot());
    assert_eq!(forward.session.game().dots()[4], 2);
    assert_eq!(forward.session.game().dots()[17], 3);
}

#[test]
fn three_peers_fan_out_and_converge() {
    let hub = LoopbackHub::new();
    let mut peers = vec![TestPeer::new(&hub)];
    peers[0].share();
    for _ in 0..2 {
        let mut joiner = TestPeer::new(&hub);
        joiner.join();
        peers.push(joiner);
    }

    let mut rng = StdRng::seed_from_u64(23);
    peers[0]
        .session
        .start_new_game_with_rng(Orientation::Horizontal, &mut rng);
    pump_all(&mut peers);

    // Each peer clicks a different dot; everyone pumps after each click.
    for (i, dot) in [0usize, 25, 60].into_iter().enumerate() {
        peers[i].session.local_dot_click(dot).unwrap();
        pump_all(&mut peers);
    }

    assert_converged(&peers);
}

#[test]
fn late_joiner_catches_up_via_enumeration_and_resync() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);
    sharer.share();

    let mut rng = StdRng::seed_from_u64(5);
    sharer
        .session
        .start_new_game_with_rng(Orientation::Vertical, &mut rng);
    sharer.session.local_dot_click(8).unwrap();

    // The joiner arrives after all of that. Enumeration replay connects it;
    // it holds stale state until the sharer's next full-grid broadcast.
    let mut joiner = TestPeer::new(&hub);
    joiner.join();
    assert_eq!(joiner.session.phase(), Phase::Connected);
    assert_ne!(joiner.snapshot(), sharer.snapshot());

    sharer.session.broadcast_new_game();
    joiner.pump();
    assert_eq!(joiner.snapshot(), sharer.snapshot());
}

#[test]
fn duplicate_tube_notification_keeps_one_channel() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);
    sharer.share();
    let mut joiner = TestPeer::new(&hub);
    joiner.join();

    // Replay the joiner's enumeration a second time: same tube id, already
    // accepted — must be a no-op, not a second channel.
    joiner.session.handle_event(SessionEvent::Joined);
    joiner.pump();
    assert_eq!(joiner.session.phase(), Phase::Connected);

    // One click still arrives exactly once.
    sharer.session.local_dot_click(2).unwrap();
    joiner.pump();
    assert_eq!(joiner.session.game().dots()[2], 1);
}

#[test]
fn malformed_traffic_never_breaks_the_session() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);
    sharer.share();
    let mut joiner = TestPeer::new(&hub);
    joiner.join();

    for raw in ["", "xyz", "q|{}", "n|nonsense", "p|[1]"] {
        joiner
            .session
            .handle_event(SessionEvent::Message(raw.to_string()));
    }
    assert_eq!(joiner.session.phase(), Phase::Connected);

    // The session still applies good traffic afterwards.
    sharer.session.local_dot_click(40).unwrap();
    joiner.pump();
    assert_eq!(joiner.session.game().dots()[40], 1);
}

#[test]
fn journal_roundtrip_survives_a_session() {
    let hub = LoopbackHub::new();
    let mut peer = TestPeer::new(&hub);
    peer.session
        .handle_event(SessionEvent::Message(encode_new_game(
            &[1, 0, 1],
            Orientation::Bilateral,
        )));

    // Shutdown: the host persists the grid as string metadata.
    let mut metadata = std::collections::BTreeMap::new();
    reflection_game::write_metadata(peer.session.game(), &mut metadata);

    // Startup of a later instance: the restored pair matches.
    let (dots, orientation) = reflection_game::read_metadata(&metadata)
        .unwrap()
        .unwrap();
    assert_eq!((dots, orientation), peer.snapshot());
}

#[test]
fn hub_enforces_participant_limit() {
    let hub = LoopbackHub::new();
    let _peers: Vec<TestPeer> = (0..4).map(|_| TestPeer::new(&hub)).collect();
    assert!(hub.register_peer().is_err());
}

#[test]
fn solo_play_then_share_then_resync() {
    let hub = LoopbackHub::new();
    let mut sharer = TestPeer::new(&hub);

    // Solo clicks broadcast to nobody and cost nothing.
    sharer.session.local_dot_click(10).unwrap();
    sharer.session.local_dot_click(11).unwrap();

    sharer.share();
    let mut joiner = TestPeer::new(&hub);
    joiner.join();

    // Sharing alone does not transfer state; the full-grid broadcast does.
    sharer.session.broadcast_new_game();
    joiner.pump();
    assert_eq!(joiner.snapshot(), sharer.snapshot());
    assert_eq!(joiner.session.game().dot_count(), GRID_COLS * GRID_ROWS);
}
