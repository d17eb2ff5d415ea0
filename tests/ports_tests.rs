use sec_audit_rs::ports::parse_port_spec;

#[test]
fn single_port_and_range_forms() {
    assert_eq!(parse_port_spec("80").expect("parse ok"), vec![80]);
    assert_eq!(
        parse_port_spec("8000-8003").expect("parse ok"),
        vec![8000, 8001, 8002, 8003]
    );
}

#[test]
fn whitespace_is_tolerated() {
    assert_eq!(parse_port_spec(" 22 ").expect("parse ok"), vec![22]);
    assert_eq!(parse_port_spec("20 - 25").expect("parse ok").len(), 6);
}

#[test]
fn invalid_specs_rejected() {
    assert!(parse_port_spec("0").is_err()); // out of range
    assert!(parse_port_spec("65536").is_err()); // out of range
    assert!(parse_port_spec("443-80").is_err()); // start > end
    assert!(parse_port_spec("web").is_err()); // not a number
    assert!(parse_port_spec("").is_err()); // empty
}
