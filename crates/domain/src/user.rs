//! # ユーザー
//!
//! ログインしたユーザーを表現する。
//!
//! パスワードは形式のみを検証し、照合は行わない。
//! 存在しないユーザー名でログインした場合は、その場でユーザーを作成する。

use crate::{DomainError, role::ActorRole};

define_serial_id! {
    /// ユーザー ID
    pub struct UserId {
        label: "ユーザー ID",
    }
}

define_validated_string! {
    /// ユーザー名（ログイン ID）
    pub struct Username {
        label: "ユーザー名",
        max_length: 50,
    }
}

/// パスワードの最小文字数
const PASSWORD_MIN_LENGTH: usize = 5;

/// パスワードの形式を検証する
///
/// 英字のみ・5 文字以上であることだけを確認する。照合は行わず、値も保持しない。
///
/// # Errors
///
/// 形式を満たさない場合は `DomainError::Validation` を返す。
pub fn validate_password(value: &str) -> Result<(), DomainError> {
    if value.chars().count() < PASSWORD_MIN_LENGTH
        || !value.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(DomainError::Validation(format!(
            "パスワードは英字のみで {} 文字以上である必要があります",
            PASSWORD_MIN_LENGTH
        )));
    }

    Ok(())
}

/// ユーザーエンティティ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:       UserId,
    username: Username,
    name:     String,
    role:     ActorRole,
}

impl User {
    pub fn new(id: UserId, username: Username, name: impl Into<String>, role: ActorRole) -> Self {
        Self {
            id,
            username,
            name: name.into(),
            role,
        }
    }

    /// 初回ログイン時の表示名
    ///
    /// ロールに応じて「Schüler ○○」「Lehrer ○○」とする。
    pub fn first_login_name(username: &Username, role: ActorRole) -> String {
        let prefix = match role {
            ActorRole::Student => "Schüler",
            ActorRole::Teacher => "Lehrer",
        };
        format!("{} {}", prefix, username)
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> ActorRole {
        self.role
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_空のユーザー名はエラー(#[case] input: &str) {
        assert!(Username::new(input).is_err());
    }

    #[test]
    fn test_ユーザー名は前後の空白を除去する() {
        assert_eq!(Username::new(" anna ").unwrap().as_str(), "anna");
    }

    #[test]
    fn test_51文字のユーザー名はエラー() {
        assert!(Username::new("a".repeat(51)).is_err());
    }

    #[rstest]
    #[case("password", true)]
    #[case("Abcde", true)]
    #[case("abcd", false)]
    #[case("abc123", false)]
    #[case("pass word", false)]
    #[case("", false)]
    fn test_パスワード形式の検証(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(validate_password(input).is_ok(), valid);
    }

    #[rstest]
    #[case(ActorRole::Student, "Schüler anna")]
    #[case(ActorRole::Teacher, "Lehrer anna")]
    fn test_初回ログインの表示名はロールで決まる(
        #[case] role: ActorRole,
        #[case] expected: &str,
    ) {
        let username = Username::new("anna").unwrap();

        assert_eq!(User::first_login_name(&username, role), expected);
    }

    #[test]
    fn test_ユーザーidは1以上() {
        assert!(UserId::new(0).is_err());
        assert_eq!(UserId::new(1).unwrap().as_i64(), 1);
    }
}
