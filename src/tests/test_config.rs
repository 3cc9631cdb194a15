use std::io::Write;

use tempfile::NamedTempFile;

use crate::activations::Activation;
use crate::agent::PolicyMode;
use crate::config::{BackendConfig, EngineConfig, LearningConfig, ReplayConfig};
use crate::error::{ErrorKind, LearnError};
use crate::q_function::KeyEncoding;
use crate::quantizer::{AxisQuantizer, Quantizer};
use crate::replay_buffer::SamplingStrategy;

#[test]
fn test_learning_presets() {
    let table = LearningConfig::lookup_table();
    assert_eq!((table.alpha, table.gamma, table.epsilon), (0.7, 0.9, 0.1));
    assert_eq!(table.policy, PolicyMode::OffPolicy);

    let neural = LearningConfig::neural();
    assert_eq!((neural.alpha, neural.gamma, neural.epsilon), (0.2, 0.1, 0.1));
}

#[test]
fn test_learning_config_validation() {
    assert!(LearningConfig::lookup_table().validate().is_ok());
    assert!(LearningConfig::lookup_table().with_epsilon(1.1).validate().is_err());
    let config = LearningConfig { gamma: -0.1, ..LearningConfig::neural() };
    assert!(matches!(config.validate(), Err(LearnError::InvalidParameter { .. })));
}

#[test]
fn test_engine_config_json_round_trip() {
    for config in [EngineConfig::lookup_table(), EngineConfig::neural_network().with_checkpoint("nn.txt")] {
        let json = config.to_json_string().unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}

#[test]
fn test_engine_config_from_minimal_json() {
    let json = r#"{
        "learning": { "alpha": 0.5, "gamma": 0.8, "epsilon": 0.05, "policy": "on_policy" },
        "backend": { "type": "lookup_table", "action_dim": 5 },
        "replay": { "capacity": 4, "strategy": "uniform" }
    }"#;
    let config = EngineConfig::from_json_str(json).unwrap();

    assert_eq!(config.learning.policy, PolicyMode::OnPolicy);
    assert_eq!(config.quantizer, Quantizer::lookup_table());
    assert_eq!(
        config.backend,
        BackendConfig::LookupTable { action_dim: 5, random_init: false, key_encoding: KeyEncoding::FixedWidth }
    );
    assert_eq!(config.replay, Some(ReplayConfig { capacity: 4, strategy: SamplingStrategy::Uniform, seed: None }));
    assert_eq!(config.rewards.good_terminal, 2.0);
    assert!(config.checkpoint.is_none());

    let controller = config.build_controller().unwrap();
    assert_eq!(controller.replay().unwrap().capacity(), 4);
}

#[test]
fn test_engine_config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", EngineConfig::neural_network().to_json_string().unwrap()).unwrap();

    let config = EngineConfig::from_json_file(file.path()).unwrap();
    match config.backend {
        BackendConfig::NeuralNetwork { hidden, activation, .. } => {
            assert_eq!(hidden, 5);
            assert_eq!(activation, Activation::Bipolar);
        }
        other => panic!("unexpected backend {:?}", other),
    }
}

#[test]
fn test_bad_json_is_a_persistence_error() {
    let err = EngineConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, LearnError::SerializationError(_)));
    assert_eq!(err.kind(), ErrorKind::Persistence);

    let err = EngineConfig::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, LearnError::IoError(_)));
}

#[test]
fn test_table_backend_needs_discrete_quantizer() {
    let mut config = EngineConfig::lookup_table();
    config.quantizer = Quantizer::neural();
    assert!(matches!(config.build_controller(), Err(LearnError::InvalidParameter { .. })));
}

#[test]
fn test_wide_axes_need_delimited_keys() {
    let mut config = EngineConfig::lookup_table();
    config.quantizer.axes[0].quantizer = AxisQuantizer::Linear { width: 50.0, buckets: 16 };
    assert!(config.build_controller().is_err());

    config.backend = BackendConfig::LookupTable {
        action_dim: 5,
        random_init: false,
        key_encoding: KeyEncoding::Delimited,
    };
    assert!(config.build_controller().is_ok());
}

#[test]
fn test_invalid_quantizer_rejected() {
    let mut config = EngineConfig::lookup_table();
    config.quantizer.axes[2].quantizer = AxisQuantizer::Linear { width: 0.0, buckets: 4 };
    assert!(config.build_controller().is_err());

    let mut config = EngineConfig::neural_network();
    config.quantizer.axes[3].quantizer = AxisQuantizer::Scaled { factor: 0.0 };
    assert!(config.build_controller().is_err());
}

#[test]
fn test_neural_preset_builds_ready_network() {
    let controller = EngineConfig::neural_network().build_controller().unwrap();
    assert_eq!(controller.q_function().name(), "neural_network");
    assert_eq!(controller.action_dim(), 5);
    assert_eq!(controller.replay().unwrap().capacity(), 10);

    let state = crate::types::State::new(1.0, 2.0, 3.0, 4.0);
    let values = controller.action_values(state).unwrap();
    assert!(values.iter().all(|v| (-1.0..=1.0).contains(v)));
}

#[test]
fn test_replay_config_rejects_zero_capacity() {
    let mut config = EngineConfig::neural_network();
    config.replay = Some(ReplayConfig { capacity: 0, strategy: SamplingStrategy::MostRecent, seed: None });
    assert!(config.build_controller().is_err());
}
