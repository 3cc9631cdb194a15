use tempfile::tempdir;

use crate::agent::RewardEvent;
use crate::config::EngineConfig;
use crate::metrics::{SessionStats, WIN_BLOCK};
use crate::quantizer::Observation;
use crate::types::State;

fn play_episode(session: &mut crate::session::Session, outcome: RewardEvent) -> f64 {
    session.begin_episode().unwrap();
    for tick in 0..6 {
        let x = 50.0 + tick as f64 * 100.0;
        session.observe(&Observation::new(x, 250.0, 300.0, -60.0, 80.0));
        session.act().unwrap();
        if tick % 2 == 0 {
            session.record_event(RewardEvent::BulletHit).unwrap();
        }
    }
    session.record_event(outcome).unwrap();
    session.end_episode()
}

#[test]
fn test_session_counts_wins() {
    let mut config = EngineConfig::lookup_table();
    config.learning.seed = Some(5);
    let mut session = config.build_session().unwrap();

    let reward = play_episode(&mut session, RewardEvent::Won);
    assert_eq!(reward, 3.0 + 2.0);
    play_episode(&mut session, RewardEvent::Lost);
    play_episode(&mut session, RewardEvent::Won);

    let stats = session.end_session().unwrap();
    assert_eq!(stats.episodes, 3);
    assert_eq!(stats.wins, 2);
    assert_eq!(stats.block_wins, vec![2]);
    assert_eq!(stats.episode_rewards, vec![5.0, 2.5, 5.0]);
}

#[test]
fn test_checkpoint_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.txt");
    let config = EngineConfig::lookup_table().with_checkpoint(&path);

    let mut session = config.build_session().unwrap();
    assert!(!path.exists());
    play_episode(&mut session, RewardEvent::Won);
    let learned = {
        let state = State::new(0.0, 2.0, 1.0, 1.0);
        let values = session.controller().action_values(state).unwrap();
        assert!(values.iter().any(|&v| v != 0.0));
        values
    };
    session.end_session().unwrap();
    assert!(path.exists());

    // A new session picks the table back up
    let session = config.build_session().unwrap();
    let restored = session
        .controller()
        .action_values(State::new(0.0, 2.0, 1.0, 1.0))
        .unwrap();
    assert_eq!(restored, learned);
}

#[test]
fn test_begin_episode_writes_checkpoint() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("weights.txt");
    let mut session = EngineConfig::neural_network()
        .with_checkpoint(&path)
        .build_session()
        .unwrap();

    session.begin_episode().unwrap();
    assert!(path.exists());
    assert!(std::fs::read_to_string(&path).unwrap().starts_with("inputs\t5\n"));
}

#[test]
fn test_corrupt_checkpoint_fails_start() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("table.txt");
    std::fs::write(&path, "garbage\n").unwrap();

    let result = EngineConfig::lookup_table().with_checkpoint(&path).build_session();
    assert!(result.is_err());
}

#[test]
fn test_neural_session_with_replay() {
    let mut config = EngineConfig::neural_network();
    config.learning.seed = Some(11);
    let mut session = config.build_session().unwrap();

    for _ in 0..3 {
        play_episode(&mut session, RewardEvent::Lost);
    }

    // The buffer outlives episodes: 21 updates, then 54, then 60
    let controller = session.controller();
    assert_eq!(controller.replay().unwrap().len(), 10);
    assert_eq!(controller.update_count(), 135);

    // Between episodes there is nothing to act on
    assert!(session.act().is_err());
}

#[test]
fn test_session_stats_blocks() {
    let mut stats = SessionStats::new();
    assert_eq!(stats.win_rate(), 0.0);
    assert_eq!(stats.mean_reward(10), None);

    for episode in 0..(WIN_BLOCK + 10) {
        stats.record_episode(episode % 4 == 0, episode as f64);
    }
    assert_eq!(stats.episodes, WIN_BLOCK + 10);
    assert_eq!(stats.block_wins, vec![25, 3]);
    assert_eq!(stats.block_win_rates(), vec![0.25, 0.3]);
    assert_eq!(stats.mean_reward(2), Some(108.5));
}
