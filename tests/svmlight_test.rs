use std::env;
use std::fs;
use std::path::Path;

use env_logger::{Builder, Env};
use featkit::svmlight::TRAINING_DATA_FILE;
use featkit::{
    load_classifier, Classifier, ClassifierBuilder, DataWriter, Feature, LoadError,
    LoadedClassifier, SvmLightClassifierBuilder, SvmLightDataWriter, TrainError,
};

fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn")).try_init();
}

// A linear model over indices 1..3 whose weight vector is the difference
// of the two training instances below, so the first classifies true and
// the second false.
const CANNED_MODEL: &str = "SVM-light Version V6.02\n\
    0 # kernel type\n\
    3 # kernel parameter -d\n\
    1 # kernel parameter -g\n\
    1 # kernel parameter -s\n\
    1 # kernel parameter -r\n\
    empty# kernel parameter -u\n\
    3 # highest feature index\n\
    2 # number of training documents\n\
    2 # number of support vectors plus 1\n\
    0 # threshold b\n\
    1.0 1:-1.0 2:1.0 3:-1.0 #\n";

fn instance_one() -> Vec<Feature> {
    vec![
        Feature::new("A", 1.1),
        Feature::new("B", 3.0),
        Feature::new("C", 1.234),
    ]
}

fn instance_two() -> Vec<Feature> {
    vec![
        Feature::new("A", 2.1),
        Feature::new("B", 2.0),
        Feature::new("C", 2.234),
    ]
}

fn write_training_data(dir: &Path) {
    let mut writer = SvmLightDataWriter::new(dir).unwrap();
    writer.write(&instance_one(), &true).unwrap();
    writer.write(&instance_two(), &false).unwrap();
    writer.finish().unwrap();
}

// Stands in for svm_learn: copies a canned model into the expected
// location, exercising the real subprocess plumbing.
fn fake_trainer_args(dir: &Path) -> Vec<String> {
    let canned = dir.join("canned-model.txt");
    fs::write(&canned, CANNED_MODEL).unwrap();
    env::set_var(SvmLightClassifierBuilder::TRAINER_ENV, "sh");
    vec![
        "-c".to_string(),
        format!("cp '{}' \"$1\"", canned.display()),
    ]
}

#[test]
fn test_train_package_load_classify() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    write_training_data(dir.path());

    let data = fs::read_to_string(dir.path().join(TRAINING_DATA_FILE))?;
    assert_eq!(data, "+1 1:1.1 2:3.0 3:1.234\n-1 1:2.1 2:2.0 3:2.234\n");

    let builder = SvmLightClassifierBuilder;
    builder.train(dir.path(), &fake_trainer_args(dir.path()))?;
    let archive = builder.package(dir.path())?;

    let classifier = builder.load(&archive)?;
    assert!(classifier.classify(&instance_one())?);
    assert!(!classifier.classify(&instance_two())?);

    // Linear kernel, so the support vectors were collapsed on load.
    assert!(classifier.model().is_compressed());
    Ok(())
}

#[test]
fn test_manifest_round_trip_selects_recorded_builder() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    write_training_data(dir.path());

    let builder = SvmLightClassifierBuilder;
    builder.train(dir.path(), &fake_trainer_args(dir.path()))?;
    let archive = builder.package(dir.path())?;

    let direct = builder.load(&archive)?;
    let dispatched = match load_classifier(&archive)? {
        LoadedClassifier::SvmLight(classifier) => classifier,
        other => panic!("manifest selected the wrong builder: {:?}", other),
    };

    for instance in [instance_one(), instance_two()] {
        assert_eq!(
            direct.classify(&instance)?,
            dispatched.classify(&instance)?
        );
        assert_eq!(
            direct.decision_value(&instance)?,
            dispatched.decision_value(&instance)?
        );
    }
    Ok(())
}

#[test]
fn test_packaging_is_repeatable() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    write_training_data(dir.path());

    let builder = SvmLightClassifierBuilder;
    builder.train(dir.path(), &fake_trainer_args(dir.path()))?;
    builder.package(dir.path())?;
    let archive = builder.package(dir.path())?;
    assert!(builder.load(&archive).is_ok());
    Ok(())
}

#[test]
fn test_trainer_failure_is_propagated() {
    init();
    let dir = tempfile::tempdir().unwrap();
    write_training_data(dir.path());

    env::set_var(SvmLightClassifierBuilder::TRAINER_ENV, "sh");
    let err = SvmLightClassifierBuilder
        .train(dir.path(), &["-c".to_string(), "exit 2".to_string()])
        .unwrap_err();
    assert!(matches!(err, TrainError::Failed { .. }));
}

#[test]
fn test_missing_model_output_is_detected() {
    init();
    let dir = tempfile::tempdir().unwrap();
    write_training_data(dir.path());

    env::set_var(SvmLightClassifierBuilder::TRAINER_ENV, "sh");
    let err = SvmLightClassifierBuilder
        .train(dir.path(), &["-c".to_string(), "true".to_string()])
        .unwrap_err();
    assert!(matches!(err, TrainError::MissingModel(_)));
}

#[test]
fn test_packaging_before_training_fails() {
    init();
    let dir = tempfile::tempdir().unwrap();
    write_training_data(dir.path());
    // No model.dat yet.
    assert!(SvmLightClassifierBuilder.package(dir.path()).is_err());
}

#[test]
fn test_unknown_builder_tag_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    init();
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("model.dat"), "bytes")?;
    fs::write(dir.path().join("encoders.json"), "{}")?;

    let archive = featkit::package::write_archive(
        dir.path(),
        &featkit::package::Manifest::for_builder("NoSuchBuilder"),
        &[
            ("model.dat", dir.path().join("model.dat")),
            ("encoders.json", dir.path().join("encoders.json")),
        ],
    )?;

    let err = load_classifier(&archive).unwrap_err();
    assert!(matches!(err, LoadError::UnknownBuilder(_)));
    Ok(())
}
