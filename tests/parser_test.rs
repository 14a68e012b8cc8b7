use parcelnotes::{parse_message, ParsedMessage};

fn fields(parsed: &ParsedMessage) -> (&str, &str, &str) {
    (parsed.courier(), parsed.code(), parsed.location())
}

#[test]
fn test_strict_format_message() {
    let text = "【申通快递】请凭12-2-1203到紫桂苑东区二楼取件，地址：紫桂苑东区二楼";
    let parsed = parse_message(text);

    assert_eq!(fields(&parsed), ("申通快递", "12-2-1203", "紫桂苑东区二楼"));
    assert_eq!(parsed.raw_text(), text);
}

#[test]
fn test_no_recognizable_markers() {
    let parsed = parse_message("hello world");

    assert_eq!(fields(&parsed), ("", "", ""));
    assert_eq!(parsed.raw_text(), "hello world");
    assert!(parsed.is_empty());
}

#[test]
fn test_empty_and_odd_input() {
    for text in ["", "   ", "\n\t", "\u{0}\u{1}\u{fffd}", "【】请凭地址："] {
        let parsed = parse_message(text);
        assert_eq!(parsed.raw_text(), text);
        assert_eq!(fields(&parsed), ("", "", ""), "input: {:?}", text);
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let samples = [
        "【菜鸟驿站】您的中通快递已到达阳光小区3号楼菜鸟驿站，请凭取件码8-3-1024取件",
        "【申通快递】请凭12-2-1203到紫桂苑东区二楼取件，地址：紫桂苑东区二楼",
        "hello world",
    ];
    for text in samples {
        assert_eq!(parse_message(text), parse_message(text));
    }
}

#[test]
fn test_raw_text_is_never_normalized() {
    let text = "  【韵达】 取件码：A-1-0001 \r\n";
    assert_eq!(parse_message(text).raw_text(), text);
}

#[test]
fn test_typical_station_notification() {
    let parsed = parse_message(
        "【菜鸟驿站】您的中通快递已到达阳光小区3号楼菜鸟驿站，请凭取件码8-3-1024取件",
    );
    assert_eq!(fields(&parsed), ("中通快递", "8-3-1024", "阳光小区3号楼菜鸟驿站"));
}

#[test]
fn test_location_excludes_code_clause() {
    let parsed = parse_message("已到创新大厦一楼请凭验证码1234领取");
    assert_eq!(parsed.location(), "创新大厦一楼");
    assert_eq!(parsed.code(), "1234");
}

#[test]
fn test_chinese_after_code_keyword_is_not_a_code() {
    let parsed = parse_message("您的取件码为请到前台查询");
    assert_eq!(parsed.code(), "");

    let parsed = parse_message("您的取件码为请到前台查询，货架 B-12-0345");
    assert_eq!(parsed.code(), "B-12-0345");
}

#[test]
fn test_partial_strict_template_falls_back() {
    let parsed = parse_message("【顺丰速运】您的快递已放置在丰巢柜A区，地址：科技园南路88号");
    // The address marker text is not taken verbatim
    assert_eq!(fields(&parsed), ("顺丰速运", "", "丰巢柜A区"));
}

#[test]
fn test_signature_only_courier() {
    let parsed = parse_message("【极兔】取件码 5566，请及时领取");
    assert_eq!(fields(&parsed), ("极兔", "5566", ""));
}

#[test]
fn test_parser_is_shareable_across_threads() {
    let text = "【申通快递】请凭12-2-1203到紫桂苑东区二楼取件，地址：紫桂苑东区二楼";
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || parse_message(text)))
        .collect();

    let expected = parse_message(text);
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
