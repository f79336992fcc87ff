use crate::codec::error::CodecError;
use crate::codec::writer::SectionWriter;

fn sample_document() -> String {
    let mut w = SectionWriter::new();
    w.start_section("Outer").unwrap();
    w.write_i64("Id", 42).unwrap();
    w.start_section("Inner").unwrap();
    w.write_opt_str("Label", None).unwrap();
    w.write_str_list("Names", Some(&["a".to_string()])).unwrap();
    w.end_section("Inner").unwrap();
    w.end_section("Outer").unwrap();
    w.finish().unwrap()
}

#[test]
fn test_nested_output_shape() {
    let expected = "\
Outer {
  Id = i64(42)
  Inner {
    Label = null()
    Names = list(\"a\")
  }
}
";
    assert_eq!(sample_document(), expected);
}

#[test]
fn test_output_is_deterministic() {
    assert_eq!(sample_document(), sample_document());
}

#[test]
fn test_end_section_must_match() {
    let mut w = SectionWriter::new();
    w.start_section("A").unwrap();
    let err = w.end_section("B").unwrap_err();
    assert!(matches!(err, CodecError::MismatchedSectionEnd { .. }));

    let mut w = SectionWriter::new();
    assert!(matches!(
        w.end_section("A").unwrap_err(),
        CodecError::NoOpenSection
    ));
}

#[test]
fn test_finish_rejects_open_sections() {
    let mut w = SectionWriter::new();
    w.start_section("A").unwrap();
    assert!(matches!(
        w.finish().unwrap_err(),
        CodecError::UnclosedSections { open: 1 }
    ));
}

#[test]
fn test_names_are_validated() {
    let mut w = SectionWriter::new();
    assert!(matches!(
        w.start_section("has space").unwrap_err(),
        CodecError::InvalidName(_)
    ));
    assert!(matches!(
        w.write_i32("", 1).unwrap_err(),
        CodecError::InvalidName(_)
    ));
}
