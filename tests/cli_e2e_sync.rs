//! E2E tests for the `sync` command against real git repositories.

mod common;

use common::BrainFixture;
use predicates::prelude::*;

#[test]
fn fresh_sync_adds_a_file() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );

    fx.command()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("added"));

    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "v1\n");
}

#[test]
fn second_sync_is_unchanged() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );

    fx.command().arg("sync").assert().success();
    fx.command()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("unchanged"));

    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "v1\n");
}

#[test]
fn prefer_brain_overrides_local_edit() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );
    fx.update_brain_file("utils/common.py", "v2\n", "brain v2");

    std::fs::create_dir_all(fx.consumer.join("src/shared")).unwrap();
    std::fs::write(
        fx.consumer.join("src/shared/common_utils.py"),
        "local\n",
    )
    .unwrap();

    fx.command()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "v2\n");
}

#[test]
fn prompt_without_local_modifications_degrades_to_prefer_brain() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prompt\nALLOW_LOCAL_MODIFICATIONS = false\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );
    fx.update_brain_file("utils/common.py", "v2\n", "brain v2");

    std::fs::create_dir_all(fx.consumer.join("src/shared")).unwrap();
    std::fs::write(
        fx.consumer.join("src/shared/common_utils.py"),
        "local\n",
    )
    .unwrap();

    // No TTY in the test harness; the brain must win without any prompt.
    fx.command().arg("sync").assert().success();
    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "v2\n");
}

#[test]
fn prefer_local_keeps_the_local_edit() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_local\nALLOW_LOCAL_MODIFICATIONS = true\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );
    fx.update_brain_file("utils/common.py", "v2\n", "brain v2");

    std::fs::create_dir_all(fx.consumer.join("src/shared")).unwrap();
    std::fs::write(
        fx.consumer.join("src/shared/common_utils.py"),
        "local\n",
    )
    .unwrap();

    fx.command().arg("sync").assert().success();
    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "local\n");
}

#[test]
fn strategy_flag_overrides_policy() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::utils/common.py::src/shared/common_utils.py\n",
    );
    fx.update_brain_file("utils/common.py", "v2\n", "brain v2");

    std::fs::create_dir_all(fx.consumer.join("src/shared")).unwrap();
    std::fs::write(
        fx.consumer.join("src/shared/common_utils.py"),
        "local\n",
    )
    .unwrap();

    fx.command()
        .args(["sync", "--strategy", "prefer_local"])
        .assert()
        .success();
    assert_eq!(fx.consumer_file("src/shared/common_utils.py"), "local\n");
}

#[test]
fn directory_neuron_syncs_and_merges_requirements() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::pkgs/::vendor/pkgs/\n",
    );
    std::fs::write(
        fx.consumer.join("requirements.txt"),
        "requests==2.20.0\nflask\nnumpy==1.19.0\n",
    )
    .unwrap();

    fx.command()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("requirements merged"));

    assert_eq!(fx.consumer_file("vendor/pkgs/data.txt"), "data\n");
    let merged = fx.consumer_file("requirements.txt");
    assert_eq!(merged, "flask\nnumpy==1.22.0\nrequests==2.20.0\n");
}

#[test]
fn requirements_merge_picks_higher_pin() {
    let fx = BrainFixture::new();
    fx.update_brain_file(
        "pkgs/requirements.txt",
        "requests==2.25.0\n",
        "add plain manifest",
    );
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::pkgs/::vendor/pkgs/\n",
    );
    std::fs::write(
        fx.consumer.join("requirements.txt"),
        "requests==2.20.0\nflask\n",
    )
    .unwrap();

    fx.command().arg("sync").assert().success();

    let merged = fx.consumer_file("requirements.txt");
    assert!(merged.contains("requests==2.25.0"));
    assert!(merged.contains("flask"));
    assert!(!merged.contains("2.20.0"));
}

#[test]
fn sync_subset_only_touches_named_paths() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "a = our-lib::utils/common.py::synced/common.py\nb = our-lib::pkgs/::synced_pkgs/\n",
    );

    fx.command()
        .args(["sync", "synced/common.py"])
        .assert()
        .success();

    assert!(fx.consumer.join("synced/common.py").exists());
    assert!(!fx.consumer.join("synced_pkgs").exists());
}

#[test]
fn missing_source_is_an_error_but_batch_continues() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "bad = our-lib::does/not/exist.py::dst.py\nok = our-lib::utils/common.py::common.py\n",
    );

    fx.command()
        .arg("sync")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("not found"))
        .stdout(predicate::str::contains("added"));

    // The healthy neuron still landed.
    assert_eq!(fx.consumer_file("common.py"), "v1\n");
}

#[test]
fn unknown_path_argument_fails() {
    let fx = BrainFixture::new();
    fx.write_neurons(
        "CONFLICT_STRATEGY = prefer_brain\n",
        "m = our-lib::utils/common.py::common.py\n",
    );

    fx.command()
        .args(["sync", "no/such/neuron.py"])
        .assert()
        .failure();
}
