//! Integration tests for a board CPLD exposed as attributes

use crate::common::create_mock_group;
use crate::common::test_utils::{LED_COLORS, field};
use core::cell::RefCell;
use platform_bitfield::{AttributeGroup, FieldDescriptor, FieldKind, MmioInterface, decode};

#[test]
fn test_diag_led_workflow() {
    let (group, interface) = create_mock_group();
    interface.set_register(0x07, 0b0000_1000);

    assert_eq!(group.get("led_diag").unwrap(), "green");

    group.set("led_diag", "off").unwrap();
    assert_eq!(interface.get_register(0x07), 0b0000_1100);
    assert_eq!(group.get("led_diag").unwrap(), "off");

    // siblings untouched
    assert_eq!(group.get("led_locator").unwrap(), "off");
    assert_eq!(group.get("led_fan").unwrap(), "amber");
}

#[test]
fn test_every_attribute_readable() {
    let (group, _interface) = create_mock_group();

    let mut out = String::new();
    for name in group.names() {
        group.show(name, &mut out).unwrap();
    }
    assert_eq!(out, "0x00\noff\namber\namber\n0xffff\n0\n0\n0\n0x00\n");
}

#[test]
fn test_reset_and_release_ports() {
    let (group, interface) = create_mock_group();
    interface.set_register(0x10, 0xFF);
    interface.set_register(0x11, 0xFF);

    assert_eq!(group.get("qsfp_reset").unwrap(), "0x0000");

    group.store("qsfp_reset", "0x8003\n").unwrap();
    assert_eq!(interface.get_register(0x10), 0xFC);
    assert_eq!(interface.get_register(0x11), 0x7F);

    group.store("qsfp_reset", "0\n").unwrap();
    assert_eq!(interface.get_register(0x10), 0xFF);
    assert_eq!(interface.get_register(0x11), 0xFF);
}

#[test]
fn test_error_recovery() {
    let (group, interface) = create_mock_group();
    interface.set_register(0x07, 0b0000_1000);

    interface.fail_next_read();
    assert!(group.set("led_diag", "off").is_err());
    assert_eq!(interface.get_register(0x07), 0b0000_1000);

    // the failure was transient
    group.set("led_diag", "off").unwrap();
    assert_eq!(interface.get_register(0x07), 0b0000_1100);
}

#[test]
fn test_fpga_window() {
    static FPGA_FIELDS: [FieldDescriptor; 3] = [
        FieldDescriptor::new("fpga_version", 0x00, 0, 32, FieldKind::HEX).read_only(),
        FieldDescriptor::new("port_led", 0x104, 10, 2, FieldKind::Enumerated(&LED_COLORS)),
        FieldDescriptor::new("scratch", 0x108, 0, 16, FieldKind::DECIMAL),
    ];

    let mut window = [0u8; 0x110];
    window[..4].copy_from_slice(&[0x03, 0x00, 0x01, 0x00]);
    window[0x105] = 0b0000_1000;

    {
        let fpga = RefCell::new(MmioInterface::new(&mut window));
        let mut group: AttributeGroup<_, 8> = AttributeGroup::new("fpga", &fpga);
        group.extend(&FPGA_FIELDS).unwrap();

        assert_eq!(group.get("fpga_version").unwrap(), "0x00010003");
        assert_eq!(group.get("port_led").unwrap(), "green");

        group.set("port_led", "red").unwrap();
        group.set("scratch", "4660").unwrap();
    }

    assert_eq!(window[0x105], 0b0000_0100);
    assert_eq!(&window[0x108..0x10A], &[0x34, 0x12]);
}

#[test]
fn test_fpga_window_bounds() {
    let mut window = [0u8; 0x10];
    let fpga = RefCell::new(MmioInterface::new(&mut window));
    let mut group: AttributeGroup<_, 2> = AttributeGroup::new("fpga", &fpga);

    // MMIO windows are bounded at run time, not by the register type
    group
        .register(FieldDescriptor::register("outside", 0x20, FieldKind::HEX))
        .unwrap();
    assert!(group.get("outside").is_err_and(|e| e.is_bus()));
}

#[test]
fn test_decode_matches_show() {
    let (group, interface) = create_mock_group();
    interface.set_register(0x40, 0x9C);

    let offset = field("temp_offset");
    assert_eq!(group.get("temp_offset").unwrap(), decode(0x9C, &offset).unwrap());
    assert_eq!(group.get("temp_offset").unwrap(), "-100");
}
