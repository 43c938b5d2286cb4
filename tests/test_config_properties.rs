//! Property tests over generated configuration documents.

use std::path::Path;

use proptest::prelude::*;
use proptest::test_runner::Config;

use trainconf::config::{
    Choice, ConfigLoader, DatasetName, ModelName, OptimizerName, RunConfig, SchedulerConfig,
};
use trainconf::error::IssueKind;

fn document(model: &str, dataset: &str, epochs: i64, lr: f64, train: i64, val: i64) -> String {
    format!(
        "model: {{ name: {model} }}
dataset: {{ name: {dataset} }}
training:
  num_epochs: {epochs}
  optimizer: {{ name: sgd, learning_rate: {lr}, momentum: 0.9 }}
  scheduler: {{ name: constant }}
  batch_size: {{ train: {train}, val: {val} }}
"
    )
}

fn load(yaml: &str) -> Result<trainconf::config::LoadResult, trainconf::error::ConfigError> {
    ConfigLoader::with_defaults().load_str(yaml, Path::new("generated.yml"))
}

fn model_names() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ModelName::allowed())
}

fn dataset_names() -> impl Strategy<Value = &'static str> {
    prop::sample::select(DatasetName::allowed())
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn prop_valid_documents_load_unchanged(
        model in model_names(),
        dataset in dataset_names(),
        epochs in 1i64..10_000,
        lr in 0.0001f64..1.0,
        train in 1i64..4096,
        val in 1i64..4096,
    ) {
        let result = load(&document(model, dataset, epochs, lr, train, val));
        prop_assert!(result.is_ok(), "{:?}", result.err());
        let config = result.unwrap().config;

        prop_assert_eq!(config.model.name.as_str(), model);
        prop_assert_eq!(config.dataset.name.as_str(), dataset);
        prop_assert_eq!(i64::from(config.training.num_epochs), epochs);
        prop_assert_eq!(config.training.optimizer.learning_rate, lr);
        prop_assert_eq!(i64::from(config.training.batch_size.train), train);
        prop_assert_eq!(i64::from(config.training.batch_size.val), val);
        prop_assert_eq!(config.training.optimizer.name, OptimizerName::Sgd);
        prop_assert_eq!(&config.training.scheduler, &SchedulerConfig::Constant);
    }

    #[test]
    fn prop_loading_twice_yields_equal_configs(
        model in model_names(),
        dataset in dataset_names(),
        epochs in 1i64..10_000,
        lr in 0.0001f64..1.0,
        train in 1i64..4096,
        val in 1i64..4096,
    ) {
        let yaml = document(model, dataset, epochs, lr, train, val);
        let loader = ConfigLoader::with_defaults();

        let first = loader.load_str(&yaml, Path::new("generated.yml")).unwrap();
        let second = loader.load_str(&yaml, Path::new("generated.yml")).unwrap();

        prop_assert_eq!(first.config.as_ref(), second.config.as_ref());
        prop_assert_eq!(first.warnings, second.warnings);
    }

    #[test]
    fn prop_non_positive_counts_are_range_errors(
        epochs in -1_000i64..=0,
        val in -1_000i64..=0,
    ) {
        let err = load(&document("DLA", "MNIST", epochs, 0.1, 32, val)).unwrap_err();
        let fields: Vec<(&str, IssueKind)> =
            err.issues().iter().map(|i| (i.field(), i.kind())).collect();
        prop_assert_eq!(
            fields,
            vec![
                ("training.num_epochs", IssueKind::Range),
                ("training.batch_size.val", IssueKind::Range),
            ]
        );
    }

    #[test]
    fn prop_non_positive_learning_rate_rejected(lr in -10.0f64..=0.0) {
        let err = load(&document("VGG16", "SVHN", 10, lr, 32, 32)).unwrap_err();
        prop_assert_eq!(err.issues().len(), 1);
        prop_assert_eq!(err.issues()[0].field(), "training.optimizer.learning_rate");
        prop_assert_eq!(err.issues()[0].kind(), IssueKind::Range);
    }

    #[test]
    fn prop_unknown_model_is_invalid_choice(name in "[A-Za-z][A-Za-z0-9_]{0,12}") {
        prop_assume!(ModelName::parse(&name).is_none());
        prop_assume!(!matches!(name.as_str(), "true" | "false" | "null" | "True" | "False"
            | "Null" | "TRUE" | "FALSE" | "NULL" | "yes" | "no" | "on" | "off" | "y" | "n"));

        let err = load(&document(&name, "CIFAR10", 10, 0.1, 32, 32)).unwrap_err();
        prop_assert_eq!(err.issues().len(), 1);
        prop_assert_eq!(err.issues()[0].kind(), IssueKind::InvalidChoice);
        prop_assert_eq!(err.issues()[0].field(), "model.name");
    }

    #[test]
    fn prop_increasing_milestones_accepted(
        mut milestones in prop::collection::btree_set(1u32..500, 1..8)
            .prop_map(|set| set.into_iter().collect::<Vec<_>>()),
        reverse in any::<bool>(),
    ) {
        if reverse && milestones.len() > 1 {
            milestones.reverse();
        }
        let list = milestones
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let yaml = document("ResNet18", "CIFAR100", 500, 0.1, 128, 100).replace(
            "scheduler: { name: constant }",
            &format!("scheduler: {{ name: multistep, kwargs: {{ milestones: [{list}] }} }}"),
        );

        let result = load(&yaml);
        if reverse && milestones.len() > 1 {
            let err = result.unwrap_err();
            prop_assert_eq!(err.issues()[0].kind(), IssueKind::InconsistentState);
        } else {
            let config = result.unwrap().config;
            match &config.training.scheduler {
                SchedulerConfig::MultiStep(kwargs) => prop_assert_eq!(&kwargs.milestones, &milestones),
                other => prop_assert!(false, "expected multistep, got {:?}", other),
            }
        }
    }

    #[test]
    fn prop_resolved_yaml_reloads_equal(
        model in model_names(),
        dataset in dataset_names(),
        seed in proptest::option::of(0u64..1_000_000),
        epochs in 1i64..1_000,
        lr in 0.0001f64..1.0,
    ) {
        let mut yaml = document(model, dataset, epochs, lr, 64, 64);
        if let Some(seed) = seed {
            yaml.push_str(&format!("seed: {seed}\n"));
        }
        let config: RunConfig = load(&yaml).unwrap().config.as_ref().clone();

        let rendered = serde_yaml::to_string(&config).unwrap();
        let reloaded = load(&rendered).unwrap().config;
        prop_assert_eq!(reloaded.as_ref(), &config);
    }
}
