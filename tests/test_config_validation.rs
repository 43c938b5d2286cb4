mod common;

use std::path::Path;

use common::fixture_path;
use trainconf::config::{
    ConfigLoader, DatasetName, LoaderOptions, ModelName, OptimizerName, SchedulerConfig,
};
use trainconf::error::{ConfigError, ConfigIssue, IssueKind};

fn load(name: &str) -> Result<trainconf::config::LoadResult, ConfigError> {
    ConfigLoader::with_defaults().load(&fixture_path(name))
}

/// The reference ResNet18 / CIFAR10 document loads with an empty cosine kwargs.
#[test]
fn reference_document_loads() {
    let result = load("resnet18_cifar10.yml").unwrap();
    let config = &result.config;

    assert_eq!(config.model.name, ModelName::ResNet18);
    assert_eq!(config.dataset.name, DatasetName::Cifar10);
    assert_eq!(config.seed, Some(42));
    assert_eq!(config.training.num_epochs, 200);
    assert_eq!(config.training.optimizer.name, OptimizerName::Sgd);
    assert!((config.training.optimizer.weight_decay - 0.0005).abs() < f64::EPSILON);
    assert_eq!(config.training.batch_size.train, 128);
    assert_eq!(config.training.batch_size.val, 100);
    assert!(!config.training.resume.from_checkpoint);

    match &config.training.scheduler {
        SchedulerConfig::Cosine(kwargs) => assert!(kwargs.is_empty()),
        other => panic!("expected cosine, got {other:?}"),
    }
    assert_eq!(config.training.cosine_t_max(), Some(200));
    assert!(result.warnings.is_empty());
}

/// An architecture outside the closed set is an invalid-choice error.
#[test]
fn unknown_model_rejected() {
    let err = load("alexnet.yml").unwrap_err();
    let issues = err.issues();
    assert_eq!(issues.len(), 1);
    match &issues[0] {
        ConfigIssue::InvalidChoice {
            field,
            value,
            allowed,
            ..
        } => {
            assert_eq!(field, "model.name");
            assert_eq!(value, "AlexNet");
            assert_eq!(allowed, &vec!["VGG16", "ResNet18", "DLA", "WRN_28_10"]);
        }
        other => panic!("expected InvalidChoice, got {other:?}"),
    }
}

/// Case mismatch gets a suggestion rather than silent acceptance.
#[test]
fn near_miss_choice_suggests_spelling() {
    let err = load("many_errors.yml").unwrap_err();
    let first = &err.issues()[0];
    assert_eq!(first.kind(), IssueKind::InvalidChoice);
    assert!(first.to_string().contains("did you mean 'ResNet18'"), "{first}");
}

/// Every violated field appears in one error, in document order.
#[test]
fn every_violation_reported_at_once() {
    let err = load("many_errors.yml").unwrap_err();
    let kinds: Vec<(&str, IssueKind)> = err.issues().iter().map(|i| (i.field(), i.kind())).collect();
    assert_eq!(
        kinds,
        vec![
            ("model.name", IssueKind::InvalidChoice),
            ("training.num_epochs", IssueKind::Range),
            ("training.optimizer.learning_rate", IssueKind::Range),
            ("training.scheduler.kwargs.step_size", IssueKind::Schema),
            ("training.batch_size.val", IssueKind::Schema),
        ]
    );
}

#[test]
fn multistep_kwargs_loaded() {
    let result = load("multistep_wrn.yml").unwrap();
    match &result.config.training.scheduler {
        SchedulerConfig::MultiStep(kwargs) => {
            assert_eq!(kwargs.milestones, vec![60, 120, 160]);
            assert!((kwargs.gamma() - 0.2).abs() < f64::EPSILON);
        }
        other => panic!("expected multistep, got {other:?}"),
    }
    assert_eq!(result.config.seed, None);
    assert_eq!(result.config.training.optimizer.name, OptimizerName::NesterovSgd);
}

#[test]
fn unknown_keys_and_ignored_momentum_warn() {
    let result = load("unknown_keys.yml").unwrap();
    let locations: Vec<Option<&str>> = result
        .warnings
        .iter()
        .map(|w| w.location.as_deref())
        .collect();
    assert_eq!(result.warnings.len(), 3, "{locations:?}");
    assert!(locations.contains(&Some("experiment")));
    assert!(locations.contains(&Some("training.batch_size.tset")));
    assert!(locations.contains(&Some("training.optimizer.momentum")));
}

#[test]
fn empty_file_rejected() {
    let err = load("empty.yml").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn yaml_syntax_error_rejected() {
    let err = load("bad_yaml.yml").unwrap_err();
    match err {
        ConfigError::ParseError { path, line, .. } => {
            assert!(path.ends_with("bad_yaml.yml"));
            assert!(line.is_some());
        }
        other => panic!("expected ParseError, got {other:?}"),
    }
}

#[test]
fn size_limit_applies() {
    let loader = ConfigLoader::new(LoaderOptions {
        max_config_size: 64,
        ..LoaderOptions::default()
    });
    let err = loader.load(&fixture_path("resnet18_cifar10.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::TooLarge { .. }));
}

#[test]
fn resume_directory_must_exist() {
    let yaml = std::fs::read_to_string(fixture_path("resnet18_cifar10.yml"))
        .unwrap()
        .replace(
            "from_checkpoint: false",
            "from_checkpoint: true\n    checkpoint_dir: /nonexistent/trainconf/run",
        );

    let err = ConfigLoader::with_defaults()
        .load_str(&yaml, Path::new("resume.yml"))
        .unwrap_err();
    assert_eq!(err.issues().len(), 1);
    assert_eq!(err.issues()[0].kind(), IssueKind::InconsistentState);

    let unchecked = ConfigLoader::new(LoaderOptions {
        verify_checkpoint_dir: false,
        ..LoaderOptions::default()
    });
    assert!(unchecked.load_str(&yaml, Path::new("resume.yml")).is_ok());
}

#[test]
fn shipped_example_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.yml");
    let result = ConfigLoader::with_defaults().load(&path).unwrap();
    assert_eq!(result.config.model.name, ModelName::ResNet18);
    assert!(result.warnings.is_empty());
}
