/// 兑换码规范化: 去除前后空白并统一大写。
/// 存储与查询都使用规范化形式, 兑换因此大小写不敏感。
pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("welcome10"), "WELCOME10");
        assert_eq!(normalize_code("  Welcome10  "), "WELCOME10");
        assert_eq!(normalize_code("WELCOME10"), "WELCOME10");
    }
}
