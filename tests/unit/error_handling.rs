//! Unit tests for error handling

use crate::common::test_utils::field;
use crate::common::{MockError, MockInterface, Operation};
use platform_bitfield::{Error, FieldDescriptor, FieldKind, store};

#[test]
fn test_rejected_text_does_no_io() {
    let mut interface = MockInterface::new();
    let cases = [
        ("fan_pwm", "32", Error::OutOfRange),
        ("fan_pwm", "-1", Error::Parse),
        ("fan_pwm", "fast", Error::Parse),
        ("fan_pwm", "", Error::Parse),
        ("temp_offset", "128", Error::OutOfRange),
        ("temp_offset", "-129", Error::OutOfRange),
        ("led_diag", "blue", Error::InvalidValue),
        ("led_diag", "gree", Error::InvalidValue),
        ("led_diag", "Green", Error::InvalidValue),
        ("led_diag", "green off", Error::InvalidValue),
        ("led_diag", "", Error::InvalidValue),
        ("cpld_version", "0x10", Error::ReadOnly),
    ];

    for (name, text, expected) in cases {
        assert_eq!(
            store(&field(name), &mut interface, text),
            Err(expected),
            "{name} <- {text:?}"
        );
    }
    assert!(interface.operations().is_empty());
}

#[test]
fn test_width_boundaries() {
    let mut interface = MockInterface::new();
    let nibble = FieldDescriptor::new("nibble", 0x70, 0, 4, FieldKind::DECIMAL);
    let signed_nibble = FieldDescriptor::new("signed_nibble", 0x70, 4, 4, FieldKind::SIGNED);

    assert_eq!(store(&nibble, &mut interface, "16"), Err(Error::OutOfRange));
    assert_eq!(store(&signed_nibble, &mut interface, "-9"), Err(Error::OutOfRange));
    assert_eq!(store(&signed_nibble, &mut interface, "8"), Err(Error::OutOfRange));
    assert!(interface.operations().is_empty());

    store(&nibble, &mut interface, "15").unwrap();
    store(&signed_nibble, &mut interface, "-8").unwrap();
    assert_eq!(interface.get_register(0x70), 0x8F);
}

#[test]
fn test_read_failure_during_rmw_writes_nothing() {
    let mut interface = MockInterface::new();
    interface.set_register(0x07, 0b0011_0000);
    interface.fail_next_read();

    let result = store(&field("led_diag"), &mut interface, "off");
    assert_eq!(result, Err(Error::Bus(MockError)));
    assert_eq!(interface.write_count(), 0);
    assert_eq!(interface.get_register(0x07), 0b0011_0000);
}

#[test]
fn test_write_failure_is_reported() {
    let mut interface = MockInterface::new();
    interface.set_register(0x07, 0b0011_0000);
    interface.fail_next_write();

    let result = store(&field("led_diag"), &mut interface, "off");
    assert!(result.as_ref().is_err_and(Error::is_bus));
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            register: 0x07,
            count: 1,
            value: 0b0011_0000
        }]
    );
    assert_eq!(interface.get_register(0x07), 0b0011_0000);
}

#[test]
fn test_malformed_descriptor_does_no_io() {
    static EMPTY: [&str; 0] = [];
    static TOO_MANY: [&str; 3] = ["a", "b", "c"];
    static SPACED: [&str; 2] = ["link up", "link down"];

    let mut interface = MockInterface::new();
    let malformed = [
        FieldDescriptor::new("", 0x01, 0, 1, FieldKind::DECIMAL),
        FieldDescriptor::new("zero", 0x01, 0, 0, FieldKind::DECIMAL),
        FieldDescriptor::new("wide", 0x01, 0, 33, FieldKind::HEX),
        FieldDescriptor::new("five_regs", 0x01, 4, 32, FieldKind::HEX),
        FieldDescriptor::new("empty", 0x01, 0, 2, FieldKind::Enumerated(&EMPTY)),
        FieldDescriptor::bit("too_many", 0x01, 0, FieldKind::Enumerated(&TOO_MANY)),
        FieldDescriptor::bit("spaced", 0x01, 0, FieldKind::Enumerated(&SPACED)),
    ];

    for descriptor in &malformed {
        assert_eq!(
            store(descriptor, &mut interface, "0"),
            Err(Error::InvalidConfig),
            "{}",
            descriptor.name
        );
    }
    assert!(interface.operations().is_empty());
}

#[test]
fn test_error_conversion() {
    let error: Error<MockError> = MockError.into();
    assert_eq!(error, Error::Bus(MockError));
    assert!(error.is_bus());

    let mapped: Error<&str> = error.map_bus(|_| "nak");
    assert_eq!(mapped, Error::Bus("nak"));
    assert_eq!(Error::<MockError>::ReadOnly.map_bus(|_| 0u8), Error::ReadOnly);
}

#[test]
fn test_error_messages() {
    assert_eq!(Error::<MockError>::ReadOnly.to_string(), "attribute is read-only");
    assert_eq!(
        Error::Bus(MockError).to_string(),
        "register access failed: MockError"
    );
}
