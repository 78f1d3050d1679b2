//! Tests for report assembly

#[cfg(test)]
mod tests {
    use crate::error::ReportError;
    use crate::parser::parse_table;
    use crate::report::assemble::format_details;
    use crate::report::{Fragment, PlatformSection, Report, Template};
    use crate::table_format::format_table;
    use crate::types::{PlatformIdentity, TableKind};

    fn section(key: &str, text: &str) -> PlatformSection {
        let table = parse_table(key, text, &TableKind::Timing.schema()).unwrap();
        PlatformSection::new(PlatformIdentity::new(key), table)
    }

    fn nano() -> PlatformSection {
        section("nano", "idle | 2/ 3/ 5 | 1988\nclick | 2/ 3/ 6 | 1988\n")
    }

    fn esp32() -> PlatformSection {
        section("esp32", "idle | 0/ 0/ 1 | 2000\n")
    }

    const TWO_PLATFORMS: &str = "# Results\n\nNano:\n```\n{{nano}}\n```\n\nESP32:\n```\n{{esp32}}\n```\n";

    #[test]
    fn test_tables_substituted_in_caller_order() {
        let report = Report::new(Some(Template::parse(TWO_PLATFORMS))).with_section(nano()).with_section(esp32());
        let document = report.assemble().unwrap();

        let nano_table = format_table(&nano().table);
        let esp32_table = format_table(&esp32().table);
        let nano_at = document.find(&nano_table).unwrap();
        let esp32_at = document.find(&esp32_table).unwrap();
        assert!(nano_at < esp32_at);
        assert!(document.starts_with("# Results\n\nNano:\n```\n+--"));
        assert!(document.ends_with("+\n```\n"));
    }

    #[test]
    fn test_missing_platform_named_in_error() {
        let report = Report::new(Some(Template::parse(TWO_PLATFORMS))).with_section(nano());
        let err = report.assemble().unwrap_err();
        match err {
            ReportError::MissingPlatformData { platform } => assert_eq!(platform, "esp32"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unplaced_platform_is_orphan() {
        let report = Report::new(Some(Template::parse("only {{nano}}"))).with_section(nano()).with_section(esp32());
        let err = report.assemble().unwrap_err();
        assert!(matches!(err, ReportError::OrphanPlatformData { platform } if platform == "esp32"));
    }

    #[test]
    fn test_title_alone_does_not_place_table() {
        let report = Report::new(Some(Template::parse("{{nano.title}}"))).with_section(nano());
        assert!(matches!(report.assemble(), Err(ReportError::OrphanPlatformData { .. })));
    }

    #[test]
    fn test_duplicate_platform_keys_rejected() {
        let report = Report::new(Some(Template::parse("{{nano}}"))).with_section(nano()).with_section(nano());
        assert!(matches!(report.assemble(), Err(ReportError::DuplicatePlatform { platform }) if platform == "nano"));
    }

    #[test]
    fn test_fragment_name_colliding_with_platform_rejected() {
        let report = Report::new(Some(Template::parse("{{nano}}")))
            .with_fragment(Fragment::new("nano", "prose"))
            .with_section(nano());
        assert!(matches!(report.assemble(), Err(ReportError::DuplicatePlatform { .. })));
    }

    #[test]
    fn test_fragments_title_and_details() {
        let identity = PlatformIdentity::new("nano")
            .with_title("Arduino Nano")
            .with_details(vec!["16MHz ATmega328P".to_string(), "Arduino IDE 1.8.13".to_string()]);
        let table = nano().table;
        let template = Template::parse("{{intro}}\n## {{nano.title}}\n{{nano.details}}\n{{nano}}\n{{outro}}");
        let report = Report::new(Some(template))
            .with_fragment(Fragment::new("intro", "Intro text."))
            .with_fragment(Fragment::new("outro", "See also."))
            .with_section(PlatformSection::new(identity, table.clone()));

        let document = report.assemble().unwrap();
        let expected = format!(
            "Intro text.\n## Arduino Nano\n* 16MHz ATmega328P\n* Arduino IDE 1.8.13\n{}\nSee also.",
            format_table(&table)
        );
        assert_eq!(document, expected);
    }

    #[test]
    fn test_title_of_fragment_is_missing() {
        let report = Report::new(Some(Template::parse("{{nano}} {{intro.title}}")))
            .with_fragment(Fragment::new("intro", "x"))
            .with_section(nano());
        let err = report.assemble().unwrap_err();
        assert!(matches!(err, ReportError::MissingPlatformData { platform } if platform == "intro.title"));
    }

    #[test]
    fn test_table_may_appear_twice() {
        let report = Report::new(Some(Template::parse("{{nano}}\n{{nano}}"))).with_section(nano());
        let document = report.assemble().unwrap();
        let table = format_table(&nano().table);
        assert_eq!(document, format!("{}\n{}", table, table));
    }

    #[test]
    fn test_default_layout() {
        let nano = PlatformSection::new(
            PlatformIdentity::new("nano").with_title("Arduino Nano").with_details(vec!["16MHz".to_string()]),
            nano().table,
        );
        let esp32 = esp32();
        let report = Report::new(None)
            .with_fragment(Fragment::new("intro", "# AutoBenchmark"))
            .with_section(nano.clone())
            .with_section(esp32.clone());

        let expected = format!(
            "# AutoBenchmark\n\n## Arduino Nano\n\n* 16MHz\n\n```\n{}\n```\n\n## esp32\n\n```\n{}\n```\n",
            format_table(&nano.table),
            format_table(&esp32.table)
        );
        assert_eq!(report.assemble().unwrap(), expected);
    }

    #[test]
    fn test_platform_without_records_renders_header_only() {
        let empty = section("esp32", "\n+---+\n");
        assert!(empty.table.is_empty());
        assert_eq!(empty.table.title(), "esp32");

        let report = Report::new(Some(Template::parse("{{esp32}}"))).with_section(empty);
        let document = report.assemble().unwrap();
        assert_eq!(document.lines().count(), 4);
        assert!(document.contains("| button event | min/avg/max | samples |"));
    }

    #[test]
    fn test_empty_report_is_empty_document() {
        assert_eq!(Report::new(None).assemble().unwrap(), "");
    }

    #[test]
    fn test_format_details() {
        assert_eq!(format_details(&[]), "");
        assert_eq!(format_details(&["a".to_string(), "b".to_string()]), "* a\n* b");
    }
}
