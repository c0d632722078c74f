use crate::{UnitDescriptor, UnitKind};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, none, some};
use portal_config::{ServerConfig, UnitConfig, UnitKindConfig};

fn server() -> ServerConfig {
    ServerConfig {
        host: "0.0.0.0".to_string(),
        port: 9000,
    }
}

#[test]
fn given_default_in_process_unit_when_from_config_then_check_url_targets_portal_route() {
    // Given
    let unit = UnitConfig::defaults().remove(0);

    // When
    let descriptor = UnitDescriptor::from_config(&unit, &server()).unwrap();

    // Then
    assert_that!(descriptor.name.as_str(), eq("writing"));
    assert_that!(
        descriptor.check_url.as_str(),
        eq("http://127.0.0.1:9000/writing/")
    );
    assert_that!(descriptor.route(), some(eq("/writing")));
    assert_that!(descriptor.port(), none());
    assert_that!(descriptor.service_url().as_str(), eq("/writing/"));
    assert_that!(descriptor.state.started, eq(false));
}

#[test]
fn given_out_of_process_unit_when_from_config_then_check_url_targets_its_port() {
    // Given
    let mut unit = UnitConfig::defaults().remove(1);
    unit.kind = UnitKindConfig::OutOfProcess;
    unit.port = Some(18002);
    unit.command = vec!["python".to_string(), "app.py".to_string()];
    unit.working_dir = Some("/srv/qa".to_string());

    // When
    let descriptor = UnitDescriptor::from_config(&unit, &server()).unwrap();

    // Then
    assert_that!(descriptor.check_url.as_str(), eq("http://127.0.0.1:18002/"));
    assert_that!(descriptor.port(), some(eq(18002)));
    match &descriptor.kind {
        UnitKind::OutOfProcess(spec) => {
            assert_that!(spec.command.len(), eq(2));
            assert_that!(
                spec.working_dir.as_deref(),
                some(eq(std::path::Path::new("/srv/qa")))
            );
        }
        other => panic!("expected out-of-process, got {other:?}"),
    }
}

#[test]
fn given_explicit_check_url_when_from_config_then_used_verbatim() {
    // Given
    let mut unit = UnitConfig::defaults().remove(2);
    unit.check_url = Some("http://10.0.0.5:8080/ready".to_string());

    // When
    let descriptor = UnitDescriptor::from_config(&unit, &server()).unwrap();

    // Then
    assert_that!(
        descriptor.check_url.as_str(),
        eq("http://10.0.0.5:8080/ready")
    );
}

#[test]
fn given_out_of_process_unit_without_command_when_from_config_then_error() {
    // Given
    let mut unit = UnitConfig::defaults().remove(3);
    unit.kind = UnitKindConfig::OutOfProcess;
    unit.port = Some(18004);

    // Then
    assert_that!(UnitDescriptor::from_config(&unit, &server()), err(anything()));
}

#[test]
fn given_descriptor_when_snapshot_then_kind_and_bookkeeping_copied() {
    // Given
    let mut descriptor = UnitDescriptor::from_config(&UnitConfig::defaults().remove(4), &server())
        .unwrap();
    descriptor.state.restart_count = 2;
    descriptor.state.auto_restart_disabled = true;

    // When
    let snapshot = descriptor.snapshot();

    // Then
    assert_that!(snapshot.kind, eq("in_process"));
    assert_that!(snapshot.state.restart_count, eq(2));
    assert_that!(snapshot.state.auto_restart_disabled, eq(true));
    assert_that!(snapshot.pid, none());
    assert_that!(snapshot.icon.as_str(), eq("🎙"));
}
