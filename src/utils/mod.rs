pub mod client_info;
pub mod ip;
pub mod password;

/// 从给定字符集均匀随机生成指定长度的字符串（非密码学安全）
pub fn generate_from_alphabet(alphabet: &[u8], length: usize) -> String {
    use std::iter;

    iter::repeat_with(|| alphabet[rand::random_range(0..alphabet.len())] as char)
        .take(length)
        .collect()
}

pub fn generate_random_code(length: usize) -> String {
    generate_from_alphabet(
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789",
        length,
    )
}

/// 生成带前缀的业务 ID，如 `cat_1718000000000_k3j9x2`
pub fn generate_prefixed_id(prefix: &str, suffix_len: usize) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        generate_from_alphabet(b"abcdefghijklmnopqrstuvwxyz0123456789", suffix_len)
    )
}

/// 标题转 slug：小写，非 [a-z0-9] 连续字符替换为 `-`，去掉首尾 `-`，最长 100
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > 100 {
        slug.truncate(100);
        while slug.ends_with('-') {
            slug.pop();
        }
    }

    slug
}

/// 按 200 词/分钟估算阅读时长，至少 1 分钟
pub fn reading_time_minutes(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(200).max(1) as i32
}

/// 取前 `max_chars` 个字符（按 char 截断，不会切断 UTF-8）
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_random_code_length() {
        assert_eq!(generate_random_code(8).len(), 8);
        assert!(generate_random_code(16).chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_prefixed_id() {
        let id = generate_prefixed_id("cat", 6);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "cat");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & Cloud -- 2024  "), "rust-cloud-2024");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify("Ünïcode Title"), "n-code-title");
    }

    #[test]
    fn test_slugify_truncates_to_100() {
        let long = "word ".repeat(60);
        let slug = slugify(&long);
        assert!(slug.len() <= 100);
        assert!(!slug.ends_with('-'));

        // 截断点正好落在分隔符上
        let title = format!("{} tail", "a".repeat(99));
        assert_eq!(slugify(&title), "a".repeat(99));
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time_minutes(""), 1);
        assert_eq!(reading_time_minutes(&"w ".repeat(200)), 1);
        assert_eq!(reading_time_minutes(&"w ".repeat(201)), 2);
        assert_eq!(reading_time_minutes(&"w ".repeat(1000)), 5);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
