// ==========================================
// InstanceParser 集成测试
// ==========================================
// 测试目标: 验证实例文件读取与错误定位
// 覆盖范围: 正常文件、文件不存在、非法整数、目录越界、零需求、多余数据
// ==========================================


use test_helpers::write_temp_file;
use wave_density_optimizer::domain::{WaveBounds, WaveSizeMeasure};
use wave_density_optimizer::importer::{InstanceParser, ParseError};

const INSTANCE: &str = "\
3 3 2
1 0 3
1 1 2
1 2 4
1 2 4
2 0 3 1 2
5 5
";

#[test]
fn test_parse_file() {
    println!("\n=== 测试：解析实例文件 ===");

    let (_dir, path) = write_temp_file("instance_0001.txt", INSTANCE);
    let instance = InstanceParser::new().parse_file(&path).unwrap();

    assert_eq!(instance.orders().len(), 3);
    assert_eq!(instance.aisles().len(), 2);
    assert_eq!(instance.num_items(), 3);
    assert_eq!(instance.bounds(), WaveBounds::units(5, 5));
    assert_eq!(instance.aisles_stocking(0), &[1]);
    assert_eq!(instance.total_stock(2), 4);

    println!("✓ {} 个订单 / {} 个巷道", instance.orders().len(), instance.aisles().len());
}

#[test]
fn test_parse_with_order_count_measure() {
    let instance = InstanceParser::with_measure(WaveSizeMeasure::OrderCount)
        .parse_str(INSTANCE)
        .unwrap();
    assert_eq!(instance.bounds(), WaveBounds::order_count(5, 5));
}

#[test]
fn test_missing_file() {
    let result = InstanceParser::new().parse_file("/nonexistent/instance.txt");
    assert!(matches!(result, Err(ParseError::FileNotFound(_))));
}

#[test]
fn test_invalid_token_reports_line() {
    let bad = "1 1 1\n1 0 x\n1 0 1\n1 1\n";
    match InstanceParser::new().parse_str(bad) {
        Err(ParseError::InvalidInteger { line, token }) => {
            assert_eq!(line, 2);
            assert_eq!(token, "x");
        }
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn test_item_out_of_catalog() {
    let bad = "1 2 1\n1 2 1\n1 0 1\n1 1\n";
    assert!(matches!(
        InstanceParser::new().parse_str(bad),
        Err(ParseError::ItemOutOfCatalog { line: 2, item: 2, num_items: 2 })
    ));
}

#[test]
fn test_zero_order_quantity() {
    let bad = "1 1 1\n1 0 0\n1 0 1\n0 1\n";
    assert!(matches!(
        InstanceParser::new().parse_str(bad),
        Err(ParseError::ZeroQuantity { line: 2, item: 0 })
    ));
}

#[test]
fn test_trailing_data() {
    let bad = "1 1 1\n1 0 1\n1 0 1\n1 1\n7\n";
    assert!(matches!(
        InstanceParser::new().parse_str(bad),
        Err(ParseError::TrailingData(5))
    ));
}

#[test]
fn test_malformed_header() {
    let bad = "1 1\n";
    assert!(matches!(
        InstanceParser::new().parse_str(bad),
        Err(ParseError::MalformedHeader { line: 1, found: 2 })
    ));
    assert!(matches!(
        InstanceParser::new().parse_str("\n\n"),
        Err(ParseError::MissingHeader)
    ));
}

#[test]
fn test_oversized_header_is_an_error() {
    println!("\n=== 测试：表头数量异常大时返回解析错误 ===");

    let bad = "99999999999999999 1 1\n1 0 1\n";
    assert!(matches!(
        InstanceParser::new().parse_str(bad),
        Err(ParseError::UnexpectedEof(_))
    ));
}

#[test]
fn test_oversized_pair_count_is_an_error() {
    // 2^63 对: 乘 2 溢出
    let bad = "1 1 1\n9223372036854775808 0 1\n1 0 1\n1 1\n";
    match InstanceParser::new().parse_str(bad) {
        Err(ParseError::PairCountMismatch { line, found, .. }) => {
            assert_eq!((line, found), (2, 2));
        }
        other => panic!("unexpected: {:?}", other),
    }
}
