use std::io;

use rr::errors::PanicMessage;
use rr::{Failure, OutputMode, Recovery, check, must};

fn report(mode: OutputMode, failure: &Failure) -> String {
    let mut out = Vec::new();
    Recovery::new(mode)
        .report(failure, &mut out)
        .expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("report is utf-8")
}

#[test]
fn debug_flag_is_detected_anywhere_after_program_name() {
    assert_eq!(OutputMode::from_args(["app"]), OutputMode::Plain);
    assert_eq!(OutputMode::from_args(["app", "--debug"]), OutputMode::Debug);
    assert_eq!(OutputMode::from_args(["app", "in.txt", "-d"]), OutputMode::Debug);
    assert_eq!(
        OutputMode::from_args(["app", "-d", "--verbose"]),
        OutputMode::Debug
    );
}

#[test]
fn program_name_and_inexact_flags_are_ignored() {
    assert_eq!(OutputMode::from_args(["--debug"]), OutputMode::Plain);
    assert_eq!(OutputMode::from_args(["app", "--debug=true"]), OutputMode::Plain);
    assert_eq!(OutputMode::from_args(["app", "-dv"]), OutputMode::Plain);
    assert_eq!(OutputMode::from_args(Vec::<String>::new()), OutputMode::Plain);
}

#[test]
fn successful_body_is_not_intercepted() {
    let recovery = Recovery::new(OutputMode::Plain);
    let mut ran = false;
    let caught = recovery.intercept(|| {
        must((), None::<io::Error>)?;
        ran = true;
        Ok(())
    });
    assert!(caught.is_none());
    assert!(ran);
}

#[test]
fn returned_failure_is_intercepted() {
    let recovery = Recovery::new(OutputMode::Plain);
    let caught = recovery
        .intercept(|| {
            check(Some(io::Error::other("disk full")))?;
            Ok(())
        })
        .expect("failure intercepted");
    assert_eq!(caught.to_string(), "disk full");
}

#[test]
fn raised_failure_is_intercepted_with_its_payload() {
    let recovery = Recovery::new(OutputMode::Plain);
    let caught = recovery
        .intercept(|| {
            if let Err(failure) = check(Some(io::Error::other("lost connection"))) {
                failure.raise();
            }
            Ok(())
        })
        .expect("unwind intercepted");
    assert_eq!(caught.to_string(), "lost connection");
    assert!(caught.error().is::<io::Error>());
}

#[test]
fn foreign_panics_become_panic_messages() {
    let recovery = Recovery::new(OutputMode::Plain);

    let caught = recovery
        .intercept(|| panic!("index out of range"))
        .expect("panic intercepted");
    assert_eq!(caught.to_string(), "index out of range");
    assert!(caught.error().is::<PanicMessage>());
    assert!(caught.trace().is_empty());

    let caught = recovery
        .intercept(|| panic!("bad value {}", 7))
        .expect("panic intercepted");
    assert_eq!(caught.to_string(), "bad value 7");

    let caught = recovery
        .intercept(|| std::panic::panic_any(12_u32))
        .expect("panic intercepted");
    assert_eq!(caught.to_string(), "panic");
}

#[test]
fn plain_report_is_the_message_on_one_line() {
    let failure = Failure::new(io::Error::other("permission denied"));
    assert_eq!(report(OutputMode::Plain, &failure), "permission denied\n");
}

#[test]
fn debug_report_has_symmetric_borders() {
    let message = "permission denied";
    let failure = Failure::new(io::Error::other(message));
    let output = report(OutputMode::Debug, &failure);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "-".repeat(message.len()));
    assert_eq!(lines[1], message);
    assert_eq!(lines[2], lines[0]);
    assert!(lines[3..].iter().all(|line| line.contains(" :: ")));
}

#[inline(never)]
fn load_settings() -> Result<(), Failure> {
    check(Some(io::Error::other("settings unreadable")))
}

#[test]
fn recovered_trace_hides_the_recovery_boundary() {
    let failure = Recovery::new(OutputMode::Debug)
        .intercept(|| {
            load_settings()?;
            Ok(())
        })
        .expect("failure intercepted");
    let trace = failure.trace();
    let Some(first) = trace.frames().first() else {
        return;
    };

    let leaked: Vec<&str> = trace
        .frames()
        .iter()
        .map(|frame| frame.function.as_str())
        .filter(|function| function.starts_with("rr::") || function.contains("catch_unwind"))
        .collect();
    assert!(leaked.is_empty(), "boundary frames leaked: {leaked:?}");

    assert!(first.function.ends_with("load_settings"), "{first:?}");
    let last = trace.frames().last().expect("trace has frames");
    assert!(
        last.function
            .contains("recovered_trace_hides_the_recovery_boundary"),
        "trace should end at the test entry point, ends at {last:?}"
    );
}

#[test]
fn debug_report_for_panic_has_no_frames() {
    let failure = Recovery::new(OutputMode::Debug)
        .intercept(|| panic!("boom"))
        .expect("panic intercepted");
    assert_eq!(report(OutputMode::Debug, &failure), "----\nboom\n----\n");
}

#[test]
fn recovery_keeps_its_mode() {
    assert_eq!(Recovery::new(OutputMode::Debug).mode(), OutputMode::Debug);
}
