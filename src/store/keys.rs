use chrono::NaiveDate;

/// 用户记录键前缀
const USER_PREFIX: &str = "user:";

/// 邮箱索引键前缀，索引值为用户ID
const USER_EMAIL_PREFIX: &str = "user_email:";

/// 提交记录键前缀
const SUBMISSION_PREFIX: &str = "submission:";

/// 财务记录键前缀
const FINANCIAL_PREFIX: &str = "financial:";

/// 生成任务键前缀
const GENERATION_PREFIX: &str = "generation:";

/// 会话键前缀
const SESSION_PREFIX: &str = "session:";

/// 生成用户记录键
pub fn user_key(user_id: &str) -> String {
    format!("{}{}", USER_PREFIX, user_id)
}

/// 生成邮箱索引键，邮箱统一小写后索引
pub fn user_email_key(email: &str) -> String {
    format!("{}{}", USER_EMAIL_PREFIX, email.to_lowercase())
}

/// 生成提交记录键
///
/// 分隔符 `:` 不会出现在产品ID、字段名（仅字母数字下划线）和ISO日期中
pub fn submission_key(product_id: &str, field_name: &str, period_start: NaiveDate) -> String {
    format!(
        "{}{}:{}:{}",
        SUBMISSION_PREFIX, product_id, field_name, period_start
    )
}

/// 生成财务记录键，按自然月归并
///
/// `%Y-%m` 等价于把 ISO 日期截断为前7个字符，同月的任意日期落在同一条记录上
pub fn financial_key(period_start: NaiveDate) -> String {
    financial_month_key(&period_start.format("%Y-%m").to_string())
}

/// 直接按 `YYYY-MM` 月份串生成财务记录键
pub fn financial_month_key(year_month: &str) -> String {
    format!("{}{}", FINANCIAL_PREFIX, year_month)
}

/// 生成生成任务键
pub fn generation_key(generation_id: &str) -> String {
    format!("{}{}", GENERATION_PREFIX, generation_id)
}

/// 生成会话键
pub fn session_key(session_id: &str) -> String {
    format!("{}{}", SESSION_PREFIX, session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn submission_key_joins_components() {
        assert_eq!(
            submission_key("sams", "kr1_tof_actual", date("2025-01-06")),
            "submission:sams:kr1_tof_actual:2025-01-06"
        );
    }

    #[test]
    fn financial_key_truncates_to_month() {
        assert_eq!(financial_key(date("2025-01-06")), "financial:2025-01");
        assert_eq!(
            financial_key(date("2025-01-06")),
            financial_key(date("2025-01-31"))
        );
        assert_ne!(
            financial_key(date("2025-01-31")),
            financial_key(date("2025-02-01"))
        );
    }

    #[test]
    fn email_key_is_case_insensitive() {
        assert_eq!(user_email_key("A@X.com"), user_email_key("a@x.COM"));
    }
}
