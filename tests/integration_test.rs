use tdlearn::{
    agent::{LearningControllerBuilder, Mode, PolicyMode, RewardEvent},
    builders::ExperienceBufferBuilder,
    config::{EngineConfig, LearningConfig},
    q_function::{self, LookupTable, QFunction},
    quantizer::{AxisQuantizer, AxisSpec, Observation, ObservationField, Quantizer},
    types::{Action, MacroAction, State},
};
use tempfile::tempdir;

/// One-dimensional corridor: the agent walks right (action 1) or left (action 0)
/// and wins on reaching the last cell.
struct Corridor {
    position: usize,
    length: usize,
}

impl Corridor {
    fn observation(&self) -> Observation {
        Observation::new(self.position as f64, 0.0, 0.0, 0.0, 0.0)
    }

    fn step(&mut self, action: Action) -> bool {
        if action.index() == 1 {
            self.position += 1;
        } else if self.position > 0 {
            self.position -= 1;
        }
        self.position + 1 >= self.length
    }
}

fn corridor_quantizer(length: usize) -> Quantizer {
    let single = AxisQuantizer::Linear { width: 1.0, buckets: 1 };
    Quantizer::new([
        AxisSpec::new(ObservationField::X, AxisQuantizer::Linear { width: 1.0, buckets: length }),
        AxisSpec::new(ObservationField::Y, single),
        AxisSpec::new(ObservationField::Distance, single),
        AxisSpec::new(ObservationField::Bearing, single),
    ])
}

#[test]
fn test_end_to_end_table_learning() {
    let length = 6;
    let mut controller = LearningControllerBuilder::new()
        .q_function(Box::new(LookupTable::new([length, 1, 1, 1, 2], false).unwrap()))
        .quantizer(corridor_quantizer(length))
        .action_dim(2)
        .config(LearningConfig::lookup_table().with_epsilon(0.2).with_seed(17))
        .build()
        .unwrap();

    for _ in 0..200 {
        controller.reset_episode();
        let mut corridor = Corridor { position: 0, length };
        for _ in 0..100 {
            controller.observe(&corridor.observation());
            let action = controller.act().unwrap();
            if corridor.step(action) {
                // Credit the win to the move into the goal cell
                controller.observe(&corridor.observation());
                controller.record_event(RewardEvent::Won).unwrap();
                break;
            }
            controller.record_event(RewardEvent::HitWall).unwrap();
        }
    }

    // Walking right is preferred in every non-terminal cell
    for cell in 0..length - 1 {
        let state = State::new(cell as f64, 0.0, 0.0, 0.0);
        assert_eq!(controller.greedy_action(state).unwrap().index(), 1, "cell {}", cell);
    }
}

#[test]
fn test_sarsa_and_q_learning_both_run() {
    for policy in [PolicyMode::OffPolicy, PolicyMode::OnPolicy] {
        let mut config = EngineConfig::neural_network();
        config.learning = config.learning.with_policy(policy).with_seed(3);
        let mut controller = config.build_controller().unwrap();

        for tick in 0..50 {
            let t = tick as f64;
            controller.observe(&Observation::new(100.0 + t, 200.0 - t, 300.0, 0.0, 100.0 - t));
            controller.act().unwrap();
            controller.record_event(if tick % 3 == 0 { RewardEvent::BulletHit } else { RewardEvent::HitByBullet }).unwrap();
        }
        controller.record_event(RewardEvent::Lost).unwrap();
        assert_eq!(controller.mode(), Mode::Scan);
        assert!(controller.update_count() > 49);
    }
}

#[test]
fn test_table_file_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lut.txt");

    let mut table = LookupTable::new([8, 6, 4, 4, 5], false).unwrap();
    let key = State::new(6.0, 4.0, 1.0, 2.0).key(MacroAction::Retreat.into());
    table.train(key.as_slice(), 1.68).unwrap();
    q_function::save_to_path(&table, &path).unwrap();

    let mut restored = LookupTable::new([8, 6, 4, 4, 5], false).unwrap();
    q_function::load_from_path(&mut restored, &path).unwrap();
    assert_eq!(restored.output_for(key.as_slice()).unwrap(), 1.68);
    assert_eq!(restored.visit_count(key.as_slice()).unwrap(), 1);
    assert_eq!(key.action_index(), MacroAction::Retreat.index());
}

#[test]
fn test_missing_file_leaves_backend_untouched() {
    let dir = tempdir().unwrap();
    let mut table = LookupTable::new([2, 2, 2, 2, 2], false).unwrap();
    table.train(&[1.0, 1.0, 1.0, 1.0, 1.0], 0.4).unwrap();

    assert!(q_function::load_from_path(&mut table, &dir.path().join("missing.txt")).is_err());
    assert_eq!(table.output_for(&[1.0, 1.0, 1.0, 1.0, 1.0]).unwrap(), 0.4);
}

#[test]
fn test_session_over_many_episodes() {
    let dir = tempdir().unwrap();
    let config = EngineConfig::lookup_table().with_checkpoint(dir.path().join("lut.txt"));
    let mut session = config.build_session().unwrap();

    for episode in 0..120 {
        session.begin_episode().unwrap();
        for tick in 0..20 {
            let angle = (episode * 20 + tick) as f64;
            session.observe(&Observation::new(
                400.0 + 300.0 * (angle / 7.0).sin(),
                300.0 + 250.0 * (angle / 5.0).cos(),
                (angle * 37.0) % 1000.0,
                (angle * 53.0) % 360.0 - 180.0,
                100.0 - tick as f64 * 5.0,
            ));
            let action = session.act().unwrap();
            if MacroAction::from_action(action) == Some(MacroAction::Fire) {
                session.record_event(RewardEvent::BulletHit).unwrap();
            }
        }
        let outcome = if episode % 3 == 0 { RewardEvent::Won } else { RewardEvent::Lost };
        session.record_event(outcome).unwrap();
        session.end_episode();
    }

    let stats = session.end_session().unwrap();
    assert_eq!(stats.episodes, 120);
    assert_eq!(stats.wins, 40);
    assert_eq!(stats.block_wins, vec![34, 6]);
    assert_eq!(stats.episode_rewards.len(), 120);
}

#[test]
fn test_uniform_replay_controller() {
    let mut controller = LearningControllerBuilder::new()
        .q_function(Box::new(LookupTable::new([8, 6, 4, 4, 5], true).unwrap()))
        .action_dim(5)
        .config(LearningConfig::lookup_table().with_seed(8))
        .replay(ExperienceBufferBuilder::new().capacity(4).uniform().seed(8).build().unwrap())
        .build()
        .unwrap();

    for tick in 0..30 {
        controller.observe(&Observation::new(tick as f64 * 25.0, 100.0, 500.0, 45.0, 50.0));
        controller.act().unwrap();
    }
    // 1 + 2 + 3 + 4 * 26 samples
    assert_eq!(controller.update_count(), 110);
}
