//! # Clock（時刻プロバイダ）
//!
//! 欠席届の提出日時・処理日時はすべてこのトレイト経由で取得する。
//! ユースケースに注入することで、テストで固定時刻を使える。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 固定時刻を返すテスト用実装
///
/// 一つのテストで複数の時刻を使う場合は `advance` で時刻を進める。
pub struct FixedClock {
   now: std::sync::Mutex<DateTime<Utc>>,
}

impl FixedClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: std::sync::Mutex::new(now),
      }
   }

   /// 時刻を指定した値に進める
   pub fn advance(&self, to: DateTime<Utc>) {
      if let Ok(mut now) = self.now.lock() {
         *now = to;
      }
   }
}

impl Clock for FixedClock {
   fn now(&self) -> DateTime<Utc> {
      match self.now.lock() {
         Ok(now) => *now,
         Err(poisoned) => *poisoned.into_inner(),
      }
   }
}
