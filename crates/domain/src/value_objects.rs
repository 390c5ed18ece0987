//! # 共通値オブジェクト
//!
//! 複数のエンティティで共有される値オブジェクトを定義する。
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`Version`] | `u32` | 楽観的ロック用のバージョン番号 |

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// バージョン番号（値オブジェクト）
///
/// 1 から始まり、欠席届のステータスが遷移するたびにインクリメントされる。
/// ストアは更新時に期待バージョンと比較し、一致しなければ競合として扱う。
///
/// # 使用例
///
/// ```rust
/// use absenz_domain::value_objects::Version;
///
/// let v1 = Version::initial();
/// assert_eq!(v1.as_u32(), 1);
///
/// let v2 = v1.next();
/// assert_eq!(v2.as_u32(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Version(u32);

impl Version {
    /// 初期バージョン（1）を作成する
    pub fn initial() -> Self {
        Self(1)
    }

    /// 指定した値からバージョンを作成する
    ///
    /// # エラー
    ///
    /// 0 の場合は `DomainError::Validation` を返す。
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::Validation(
                "バージョン番号は 1 以上である必要があります".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// 次のバージョンを返す
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// 内部の u32 値を取得する
    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// i32 に変換する（DB 互換用）
    pub fn as_i32(&self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl TryFrom<u32> for Version {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i32> for Version {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let value = u32::try_from(value).map_err(|_| {
            DomainError::Validation("バージョン番号は 1 以上である必要があります".to_string())
        })?;
        Self::new(value)
    }
}

impl From<Version> for u32 {
    fn from(version: Version) -> Self {
        version.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::initial()
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_バージョンの初期値は1() {
        assert_eq!(Version::initial().as_u32(), 1);
    }

    #[test]
    fn test_バージョンのnextはインクリメントする() {
        assert_eq!(Version::initial().next().as_u32(), 2);
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, true)]
    #[case(42, true)]
    fn test_バージョンの生成(#[case] value: u32, #[case] valid: bool) {
        assert_eq!(Version::new(value).is_ok(), valid);
    }

    #[rstest]
    #[case(-1)]
    #[case(0)]
    fn test_i32からの変換で1未満はエラー(#[case] value: i32) {
        assert!(Version::try_from(value).is_err());
    }

    #[test]
    fn test_jsonでは数値としてシリアライズされる() {
        let json = serde_json::to_value(Version::new(3).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!(3));

        let result: Result<Version, _> = serde_json::from_value(serde_json::json!(0));
        assert!(result.is_err());
    }
}
