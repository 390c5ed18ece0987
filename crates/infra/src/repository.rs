//! # リポジトリ実装
//!
//! ユースケース層が依存するリポジトリトレイトと、その具体的な実装を提供する。
//!
//! | トレイト | 実装 |
//! |----------|------|
//! | [`AbsenceRepository`] | [`InMemoryAbsenceRepository`], [`JsonFileAbsenceRepository`], [`PostgresAbsenceRepository`] |
//! | [`UserRepository`] | [`InMemoryUserRepository`], [`PostgresUserRepository`] |

pub mod absence_repository;
pub mod in_memory_absence_repository;
pub mod json_file_absence_repository;
pub mod user_repository;

pub use absence_repository::{AbsenceRepository, PostgresAbsenceRepository};
pub use in_memory_absence_repository::InMemoryAbsenceRepository;
pub use json_file_absence_repository::JsonFileAbsenceRepository;
pub use user_repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
